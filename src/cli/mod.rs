pub mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "padron")]
#[command(about = "Padron CLI - Operator tooling for the membership API")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Mint a capability token for an administrator")]
    Token {
        #[arg(long, help = "Token subject (user name or id)")]
        subject: String,

        #[arg(
            long = "grant",
            help = "Grant: '*', an entity slug (expands to all five permissions), or a raw permission name"
        )]
        grants: Vec<String>,
    },

    #[command(about = "Create any missing entity tables in the configured database")]
    Init,

    #[command(about = "List the registered entities and their permissions")]
    Entities,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Token { subject, grants } => commands::token::handle(subject, grants, output_format),
        Commands::Init => commands::init::handle().await,
        Commands::Entities => commands::entities::handle(output_format),
    }
}
