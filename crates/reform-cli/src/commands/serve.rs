//! Serve command

use crate::app::ServeArgs;
use anyhow::Result;
use reform_core::{Pipeline, Settings};
use std::sync::Arc;

pub async fn run(args: ServeArgs, settings: Arc<Settings>) -> Result<()> {
    tracing::info!(
        "Using collection {} at {}",
        settings.collection_name(),
        settings.chroma_url()
    );
    let pipeline = Arc::new(Pipeline::from_settings(settings)?);
    eprintln!("Serving on http://{}:{}", args.host, args.port);
    reform_server::serve(pipeline, &args.host, args.port).await
}
