//! Collections command

use crate::app::OutputFormat;
use anyhow::Result;
use reform_core::{ChromaClient, Settings, VectorIndex};

pub async fn run(settings: &Settings, format: OutputFormat) -> Result<()> {
    let index = ChromaClient::from_settings(settings)?;
    let names = index.list_collections().await?;
    let active = settings.collection_name();

    match format {
        OutputFormat::Json => {
            let collections: Vec<_> = names
                .iter()
                .map(|name| serde_json::json!({ "name": name, "active": *name == active }))
                .collect();
            println!("{}", serde_json::to_string_pretty(&collections)?);
        }
        OutputFormat::Cli => {
            if names.is_empty() {
                println!("No collections at {}", settings.chroma_url());
                return Ok(());
            }
            println!("Collections:");
            for name in &names {
                let marker = if *name == active { " (active)" } else { "" };
                println!("  {}{}", name, marker);
            }
        }
    }
    Ok(())
}
