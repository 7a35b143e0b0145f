//! Service layer providing business-oriented operations on top of models.
//! - Separates business logic from data access.
//! - Reuses validation and entity definitions in the `models` crate.
//! - Provides clear error types and documented interfaces.

pub mod errors;
pub mod content;
pub mod param_service;
pub mod ragflow;
pub mod tenant_service;
#[cfg(test)]
pub mod test_support;
