//! Integration with an external RAGFlow-compatible knowledge-base API.
//!
//! Settings come from the `sys_param` store and are snapshotted at startup;
//! `RagflowService::reload` re-reads them. The HTTP surface of this module
//! never fails: any upstream or configuration problem degrades to an empty
//! result with a warning.

pub mod client;
pub mod service;
pub mod types;

pub use client::{RagflowClient, RagflowError};
pub use service::{RagflowService, RagflowSettings};
pub use types::{Dataset, RetrievalChunk};

/// System parameter holding the knowledge-base API base URL.
pub const PARAM_RAGFLOW_API: &str = "ragflow.api";
/// System parameter holding the knowledge-base API bearer token.
pub const PARAM_RAGFLOW_TOKEN: &str = "ragflow.token";
/// Literal stored by the console when a parameter is intentionally unset.
pub const UNSET_PLACEHOLDER: &str = "null";

/// Default number of retrieval chunks returned to callers.
pub const DEFAULT_TOP_K: usize = 5;
