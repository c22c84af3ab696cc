//! Improve command

use crate::app::{ImproveArgs, OutputFormat};
use anyhow::Result;
use futures::StreamExt;
use reform_core::{FragmentStream, Pipeline, PipelineOutput, RunOptions, Settings};
use std::io::Write;
use std::sync::Arc;

pub async fn run(args: ImproveArgs, settings: Arc<Settings>, format: OutputFormat) -> Result<()> {
    let pipeline = Pipeline::from_settings(settings)?;
    let options = RunOptions {
        streaming: args.stream,
        model: args.model.clone(),
        temperature: args.temperature,
    };

    let output = match pipeline.try_run(&args.joined(), options).await {
        Ok(output) => output,
        Err(e) => {
            eprintln!("{}", e.user_message());
            std::process::exit(e.exit_code());
        }
    };

    match output {
        PipelineOutput::Text(text) => match format {
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&serde_json::json!({ "content": text }))?
                );
            }
            OutputFormat::Cli => println!("{}", text),
        },
        PipelineOutput::Stream(fragments) => print_stream(fragments, format).await?,
    }
    Ok(())
}

async fn print_stream(mut fragments: FragmentStream, format: OutputFormat) -> Result<()> {
    let mut stdout = std::io::stdout();
    while let Some(fragment) = fragments.next().await {
        match format {
            OutputFormat::Json => {
                writeln!(stdout, "{}", serde_json::json!({ "content": fragment }))?;
            }
            OutputFormat::Cli => write!(stdout, "{}", fragment)?,
        }
        stdout.flush()?;
    }
    match format {
        OutputFormat::Json => writeln!(stdout, "{}", serde_json::json!({ "done": true }))?,
        OutputFormat::Cli => writeln!(stdout)?,
    }
    Ok(())
}
