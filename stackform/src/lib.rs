#![deny(missing_docs, unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # stackform
//!
//! A library for building multi-service compose configurations from
//! structured records and round-tripping them through the external
//! document format.
//!
//! ## Core Types
//!
//! - [`ServiceRecord`]: one service's configuration, pure data
//! - [`codec`]: the encode/decode pair between records and the document
//! - [`ComposeGraph`]: the derived dependency graph with layout positions
//! - [`Environment`] and [`apply_overlay`]: sparse per-service overrides
//! - [`Error`], [`Warning`], and [`Result`]: error handling types
//!
//! ## Examples
//!
//! ```
//! use stackform::{decode, encode, ServiceRecord};
//!
//! let mut db = ServiceRecord::new("db", "postgres:13");
//! db.host_port = "5432".to_string();
//! db.container_port = "5432".to_string();
//!
//! let yaml = encode(&[db.clone()], None).unwrap();
//! let result = decode(&yaml).unwrap();
//! assert_eq!(result.records, vec![db]);
//! ```

pub mod codec;
pub mod error;
pub mod graph;
pub mod logging;
pub mod overlay;
pub mod service;
pub mod session;
pub mod store;
pub mod template;
pub mod validate;

// Re-export key types at crate root for convenience
pub use codec::{
    decode, encode, encode_preview, DecodeResult, EncodeMode, EncodeResult,
};
pub use error::{Error, Result, Warning};
pub use graph::{detect_cycles, ComposeGraph, GraphEdge, GraphNode, Position};
pub use logging::{init_logger, LogLevel, Logger};
pub use overlay::{
    apply_overlay, compute_override, Environment, ProjectConfig, ServicePatch, BASE_ENVIRONMENT,
};
pub use service::{DeployConfig, HealthCheck, Resources, RestartPolicy, ServiceRecord};
pub use session::EditorSession;
pub use store::{FileStore, KeyValueStore, MemoryStore};
pub use template::{Template, TemplateMetadata, TemplateStore};
pub use validate::CollectionValidator;
