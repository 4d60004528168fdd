use crate::errors::SirangResult;
use crate::store::DocumentStore;

/// A pluggable source of [DocumentStore]s.
///
/// A module is loaded into [crate::sirang_builder::SirangBuilder] and asked
/// once, when the logger opens, to connect to the configured URI.
pub trait StoreModule: Send + Sync {
    fn open_store(&self, uri: &str) -> SirangResult<DocumentStore>;
}
