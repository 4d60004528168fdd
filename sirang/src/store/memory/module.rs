use crate::common::MEMORY_URI_SCHEME;
use crate::errors::SirangResult;
use crate::store::memory::InMemoryStore;
use crate::store::{DocumentStore, StoreModule};

/// Store module backed by an [InMemoryStore].
///
/// A logger opened on a `memory://` URI without any module uses a fresh
/// `InMemoryModule`. Loaded explicitly, the module accepts any URI without
/// dialling it.
///
/// ```rust,ignore
/// let store = InMemoryStore::new();
/// let logger = Sirang::builder()
///     .load_module(InMemoryModule::with_store(store.clone()))
///     .open()?;
/// ```
#[derive(Default)]
pub struct InMemoryModule {
    store: Option<InMemoryStore>,
}

impl InMemoryModule {
    /// Creates a module opening a new, empty store each time.
    pub fn new() -> InMemoryModule {
        InMemoryModule { store: None }
    }

    /// Creates a module handing out `store`, so its data can be shared.
    pub fn with_store(store: InMemoryStore) -> InMemoryModule {
        InMemoryModule { store: Some(store) }
    }
}

impl StoreModule for InMemoryModule {
    fn open_store(&self, uri: &str) -> SirangResult<DocumentStore> {
        if !uri.starts_with(MEMORY_URI_SCHEME) {
            log::debug!("In-memory store ignores connection uri {}", uri);
        }
        let store = self.store.clone().unwrap_or_default();
        Ok(DocumentStore::new(store))
    }
}
