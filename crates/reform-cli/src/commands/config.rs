//! Config command

use crate::app::OutputFormat;
use anyhow::Result;
use reform_core::Settings;

pub fn run(settings: &Settings, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(settings)?);
        }
        OutputFormat::Cli => {
            println!("Config file:     {}", Settings::config_path().display());
            println!("Collection:      {}", settings.collection_name());
            println!();
            if let serde_json::Value::Object(fields) = serde_json::to_value(settings)? {
                for (key, value) in fields {
                    let shown = match value {
                        serde_json::Value::String(s) => s,
                        serde_json::Value::Null => "-".to_string(),
                        other => other.to_string(),
                    };
                    println!("  {:<26} {}", key, shown);
                }
            }
        }
    }
    Ok(())
}
