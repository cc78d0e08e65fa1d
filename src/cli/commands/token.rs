use anyhow::Context;
use serde_json::json;

use crate::auth::{generate_jwt, Claims};
use crate::cli::OutputFormat;
use crate::entity;
use crate::policy::Action;

const ACTIONS: &[Action] = &[
    Action::List,
    Action::View,
    Action::Create,
    Action::Edit,
    Action::Delete,
];

/// Expand a grant argument into permission names.
/// `*` stays as-is, an entity slug expands to its five permissions,
/// anything else is taken as a raw permission name.
fn expand_grant(grant: &str) -> Vec<String> {
    if grant == "*" {
        return vec!["*".to_string()];
    }
    if let Some(def) = entity::resolve(grant) {
        return ACTIONS.iter().map(|a| def.permission(*a)).collect();
    }
    vec![grant.to_string()]
}

pub fn handle(
    subject: String,
    grants: Vec<String>,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    let mut caps: Vec<String> = grants.iter().flat_map(|g| expand_grant(g)).collect();
    caps.sort();
    caps.dedup();

    if caps.is_empty() {
        anyhow::bail!("at least one --grant is required");
    }

    let claims = Claims::new(subject.clone(), caps.clone());
    let token = generate_jwt(claims).context("failed to sign token")?;

    match output_format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({
                    "subject": subject,
                    "capabilities": caps,
                    "token": token,
                }))?
            );
        }
        OutputFormat::Text => {
            println!("Subject:      {}", subject);
            println!("Capabilities: {}", caps.join(", "));
            println!("{}", token);
        }
    }

    Ok(())
}
