use serde_json::json;

use crate::cli::OutputFormat;
use crate::entity::ENTITIES;
use crate::policy::Action;

pub fn handle(output_format: OutputFormat) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let listing: Vec<_> = ENTITIES
                .iter()
                .map(|def| {
                    json!({
                        "slug": def.slug,
                        "table": def.table,
                        "public_all": def.public_all,
                        "permissions": [
                            def.permission(Action::List),
                            def.permission(Action::View),
                            def.permission(Action::Create),
                            def.permission(Action::Edit),
                            def.permission(Action::Delete),
                        ],
                        "fields": def.fields.iter().map(|f| f.name).collect::<Vec<_>>(),
                        "searchable": def.searchable,
                        "sortable": def.sortable,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&listing)?);
        }
        OutputFormat::Text => {
            for def in ENTITIES {
                println!(
                    "/v1/{:<14} table={:<14} gate={}_*  fields: {}",
                    def.slug,
                    def.table,
                    def.permission_prefix,
                    def.fields
                        .iter()
                        .map(|f| f.name)
                        .collect::<Vec<_>>()
                        .join(", ")
                );
            }
        }
    }

    Ok(())
}
