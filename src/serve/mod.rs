//! Thin boundary around the core: the persisted timer record, the store contract and the
//! HTTP response mapping.

/// HTTP boundary mapping.
pub mod handler;
/// Persisted timer row.
pub mod record;
/// Persistence collaborator contract.
pub mod store;
