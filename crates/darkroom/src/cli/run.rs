//! The `darkroom run` command: process notification batches.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, ValueEnum};

use darkroom_core::{BatchProcessor, Config, FsStore, NotificationBatch, TransformKind};

/// Which transform strategy to run.
#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum TransformArg {
    /// Extract embedded metadata to a JSON document
    Exif,
    /// Convert to 8-bit greyscale
    Greyscale,
    /// Generate an aspect-preserving thumbnail
    Resize,
}

impl From<TransformArg> for TransformKind {
    fn from(arg: TransformArg) -> Self {
        match arg {
            TransformArg::Exif => TransformKind::Exif,
            TransformArg::Greyscale => TransformKind::Greyscale,
            TransformArg::Resize => TransformKind::Resize,
        }
    }
}

/// Arguments for the `run` command.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Notification batch files (JSON), processed in order
    #[arg(required = true)]
    pub events: Vec<PathBuf>,

    /// Transform strategy to apply
    #[arg(short, long, value_enum)]
    pub transform: TransformArg,

    /// Object store root directory (overrides config)
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Pretty-print batch results
    #[arg(long)]
    pub pretty: bool,
}

/// Execute the run command.
///
/// The store handle is built once and shared by every batch; a batch that
/// can't be read or parsed is a transport-level error and aborts the run,
/// while per-item failures only shape the printed result.
pub async fn execute(args: RunArgs, config: Config) -> anyhow::Result<()> {
    let root = args.root.clone().unwrap_or_else(|| config.storage_root());
    let store = Arc::new(FsStore::new(&root));
    tracing::debug!("Object store root: {}", root.display());

    let processor = BatchProcessor::new(store, TransformKind::from(args.transform).build(&config));

    for path in &args.events {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read event file: {}", path.display()))?;
        let batch: NotificationBatch = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse event file: {}", path.display()))?;

        let result = processor.process(&batch).await;

        let rendered = if args.pretty {
            serde_json::to_string_pretty(&result)?
        } else {
            serde_json::to_string(&result)?
        };
        println!("{}", rendered);
    }

    Ok(())
}
