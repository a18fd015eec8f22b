//! jsonif-compiler
//!
//! This crate implements:
//!  1) A hand-written `prost` subset of `descriptor.proto` / `plugin.proto`
//!     including the reserved jsonif option slots,
//!  2) Descriptor ingestion (dependency-closure pruning, proto3 check,
//!     option resolution) into the normalized schema model,
//!  3) Qualified-name resolution and per-backend type mapping,
//!  4) The four generation backends (C, C++, TypeScript, Unity C#),
//!  5) The plugin driver (one request on stdin, one response on stdout),
//!     and error types (`JsonifError`).

pub mod backends;
pub mod emitter;
pub mod error;
pub mod ingest;
pub mod plugin;
pub mod proto;
pub mod resolve;
pub mod typemap;

pub use backends::{Backend, OutputFile, Target};
pub use error::JsonifError;
pub use ingest::{ingest_files, ingest_request, prune_files};
pub use plugin::{generate_files, generate_response, run_plugin};
