//! Darkroom Core - Notification-driven image transformation engine.
//!
//! Darkroom consumes batches of object-storage change notifications and
//! derives one transformed artifact per object: extracted EXIF metadata,
//! a greyscale rendition, or a thumbnail. The engine is shared; only the
//! strategy varies.
//!
//! # Architecture
//!
//! ```text
//! Batch → Unwrap envelopes → Extract items → Guard → Download → Transform → Upload
//! ```
//!
//! Failures are isolated per envelope and per item; the engine always
//! returns an aggregate [`BatchResult`], never an error.
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use darkroom_core::{BatchProcessor, Config, MemoryStore, NotificationBatch, TransformKind};
//!
//! #[tokio::main]
//! async fn main() -> darkroom_core::Result<()> {
//!     let config = Config::load()?;
//!     let store = Arc::new(MemoryStore::new());
//!     let processor = BatchProcessor::new(store, TransformKind::Resize.build(&config));
//!
//!     let batch: NotificationBatch = serde_json::from_str(r#"{"Records": []}"#)?;
//!     let result = processor.process(&batch).await;
//!     println!("{}", serde_json::to_string(&result)?);
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod codec;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod store;
pub mod transform;
pub mod types;

// Re-exports for convenient access
pub use config::{Config, ExifConfig};
pub use engine::BatchProcessor;
pub use error::{ConfigError, DarkroomError, EventError, ProcessError, Result, StoreError};
pub use event::{Envelope, ItemEvent, ItemEventGroup, NotificationBatch};
pub use store::{FsStore, MemoryStore, ObjectStore};
pub use transform::{SkipReason, Transform, TransformKind, TransformOutput};
pub use types::{BatchResult, BatchStatus};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
