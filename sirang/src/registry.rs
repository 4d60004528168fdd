use parking_lot::Mutex;
use std::collections::HashMap;

use crate::errors::SirangResult;
use crate::store::{Collection, Database, DocumentStore};

/// Lazily opened database handles under one shared client.
///
/// The first [ConnectionRegistry::get_db] for a name asks the store for a
/// handle and caches it; later calls return that same handle until the
/// registry is cleared.
pub(crate) struct ConnectionRegistry {
    store: DocumentStore,
    dbs: Mutex<HashMap<String, Database>>,
}

impl ConnectionRegistry {
    pub(crate) fn new(store: DocumentStore) -> Self {
        ConnectionRegistry {
            store,
            dbs: Mutex::new(HashMap::new()),
        }
    }

    pub(crate) fn get_db(&self, name: &str) -> SirangResult<Database> {
        let mut dbs = self.dbs.lock();
        if let Some(db) = dbs.get(name) {
            return Ok(db.clone());
        }

        let db = self.store.database(name)?;
        log::debug!("Opened database handle {}", name);
        dbs.insert(name.to_string(), db.clone());
        Ok(db)
    }

    pub(crate) fn collection(&self, db_name: &str, collection_name: &str) -> SirangResult<Collection> {
        self.get_db(db_name)?.collection(collection_name)
    }

    /// Number of documents in `collection_name`; 0 when it does not exist.
    pub(crate) fn collection_doc_count(&self, db_name: &str, collection_name: &str) -> SirangResult<u64> {
        self.collection(db_name, collection_name)?.count()
    }

    pub(crate) fn store(&self) -> &DocumentStore {
        &self.store
    }

    /// Drops every cached handle.
    pub(crate) fn clear(&self) {
        self.dbs.lock().clear();
    }

    pub(crate) fn cached_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.dbs.lock().keys().cloned().collect();
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc;
    use crate::store::memory::InMemoryStore;

    fn registry() -> ConnectionRegistry {
        ConnectionRegistry::new(DocumentStore::new(InMemoryStore::new()))
    }

    #[test]
    fn get_db_returns_same_handle() {
        let registry = registry();
        let first = registry.get_db("db").unwrap();
        let second = registry.get_db("db").unwrap();
        assert!(first.same_handle(&second));
        assert_eq!(registry.cached_names(), vec!["db".to_string()]);
    }

    #[test]
    fn distinct_names_get_distinct_handles() {
        let registry = registry();
        let a = registry.get_db("a").unwrap();
        let b = registry.get_db("b").unwrap();
        assert!(!a.same_handle(&b));
        assert_eq!(a.name(), "a");
        assert_eq!(b.name(), "b");
    }

    #[test]
    fn absent_collection_counts_zero() {
        let registry = registry();
        assert_eq!(registry.collection_doc_count("db", "nothing").unwrap(), 0);
    }

    #[test]
    fn count_follows_inserts() {
        let registry = registry();
        let c = registry.collection("db", "c").unwrap();
        c.insert_one(doc! { a: 1 }).unwrap();
        c.insert_one(doc! { a: 2 }).unwrap();
        assert_eq!(registry.collection_doc_count("db", "c").unwrap(), 2);
    }

    #[test]
    fn clear_drops_cached_handles() {
        let registry = registry();
        registry.get_db("db").unwrap();
        registry.clear();
        assert!(registry.cached_names().is_empty());
    }
}
