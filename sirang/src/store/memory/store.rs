use crate::collection::Document;
use crate::common::Value;
use crate::errors::{ErrorKind, SirangError, SirangResult};
use crate::filter::Filter;
use crate::store::{
    Collection, CollectionProvider, Database, DatabaseProvider, DocumentStoreProvider,
};
use dashmap::DashMap;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// In-memory implementation of a document store.
///
/// # Purpose
/// `InMemoryStore` keeps every database and collection in process memory. It
/// is the store a logger uses when no other module is loaded, and the store
/// the test suites run against.
///
/// # Characteristics
/// - **Thread-Safe**: databases and collections live in concurrent maps
/// - **Insertion Ordered**: `find` returns documents in insertion order
/// - **Unique Ids**: a duplicate `_id` is rejected with [ErrorKind::IdCollision]
/// - **No Persistence**: all data is lost when the last handle is dropped
///
/// Cloning an `InMemoryStore` shares the same data.
#[derive(Clone)]
pub struct InMemoryStore {
    inner: Arc<InMemoryStoreInner>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    pub fn new() -> InMemoryStore {
        InMemoryStore {
            inner: Arc::new(InMemoryStoreInner::new()),
        }
    }
}

impl DocumentStoreProvider for InMemoryStore {
    fn database(&self, name: &str) -> SirangResult<Database> {
        self.inner.database(name)
    }

    fn database_names(&self) -> SirangResult<Vec<String>> {
        self.inner.database_names()
    }

    fn close(&self) -> SirangResult<()> {
        self.inner.close()
    }

    fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::Acquire)
    }
}

struct InMemoryStoreInner {
    databases: DashMap<String, Database>,
    closed: Arc<AtomicBool>,
}

impl InMemoryStoreInner {
    fn new() -> Self {
        InMemoryStoreInner {
            databases: DashMap::new(),
            closed: Arc::new(AtomicBool::new(false)),
        }
    }

    fn database(&self, name: &str) -> SirangResult<Database> {
        ensure_open(&self.closed)?;
        let database = self
            .databases
            .entry(name.to_string())
            .or_insert_with(|| Database::new(InMemoryDatabase::new(name, self.closed.clone())));
        Ok(database.value().clone())
    }

    fn database_names(&self) -> SirangResult<Vec<String>> {
        ensure_open(&self.closed)?;
        let mut names = Vec::new();
        for entry in self.databases.iter() {
            if !entry.value().collection_names()?.is_empty() {
                names.push(entry.key().clone());
            }
        }
        names.sort();
        Ok(names)
    }

    fn close(&self) -> SirangResult<()> {
        self.closed.store(true, Ordering::Release);
        self.databases.clear();
        log::debug!("In-memory store closed");
        Ok(())
    }
}

struct InMemoryDatabase {
    name: String,
    collections: DashMap<String, Collection>,
    closed: Arc<AtomicBool>,
}

impl InMemoryDatabase {
    fn new(name: &str, closed: Arc<AtomicBool>) -> Self {
        InMemoryDatabase {
            name: name.to_string(),
            collections: DashMap::new(),
            closed,
        }
    }
}

impl DatabaseProvider for InMemoryDatabase {
    fn name(&self) -> &str {
        &self.name
    }

    fn collection(&self, name: &str) -> SirangResult<Collection> {
        ensure_open(&self.closed)?;
        let collection = self.collections.entry(name.to_string()).or_insert_with(|| {
            Collection::new(InMemoryCollection::new(name, self.closed.clone()))
        });
        Ok(collection.value().clone())
    }

    fn collection_names(&self) -> SirangResult<Vec<String>> {
        ensure_open(&self.closed)?;
        let mut names = Vec::new();
        for entry in self.collections.iter() {
            if entry.value().count()? > 0 {
                names.push(entry.key().clone());
            }
        }
        names.sort();
        Ok(names)
    }
}

struct InMemoryCollection {
    name: String,
    documents: RwLock<Vec<Document>>,
    closed: Arc<AtomicBool>,
}

impl InMemoryCollection {
    fn new(name: &str, closed: Arc<AtomicBool>) -> Self {
        InMemoryCollection {
            name: name.to_string(),
            documents: RwLock::new(Vec::new()),
            closed,
        }
    }
}

impl CollectionProvider for InMemoryCollection {
    fn name(&self) -> &str {
        &self.name
    }

    fn insert_one(&self, mut doc: Document) -> SirangResult<Value> {
        ensure_open(&self.closed)?;
        let id = match doc.id() {
            Some(id) => id.clone(),
            None => {
                let id = Value::ObjectId(uuid::Uuid::new_v4().simple().to_string());
                doc.set_id(id.clone());
                id
            }
        };

        let mut documents = self.documents.write();
        if documents.iter().any(|existing| existing.id() == Some(&id)) {
            log::error!(
                "Duplicate _id {} in collection {}",
                id,
                self.name
            );
            return Err(SirangError::new(
                &format!("Duplicate _id {} in collection {}", id, self.name),
                ErrorKind::IdCollision,
            ));
        }
        documents.push(doc);
        Ok(id)
    }

    fn find(&self, filter: &Filter) -> SirangResult<Vec<Document>> {
        ensure_open(&self.closed)?;
        let documents = self.documents.read();
        Ok(documents
            .iter()
            .filter(|doc| filter.apply(doc))
            .cloned()
            .collect())
    }

    fn count(&self) -> SirangResult<u64> {
        ensure_open(&self.closed)?;
        Ok(self.documents.read().len() as u64)
    }
}

fn ensure_open(closed: &AtomicBool) -> SirangResult<()> {
    if closed.load(Ordering::Acquire) {
        log::error!("In-memory store is closed");
        return Err(SirangError::new(
            "In-memory store is closed",
            ErrorKind::InvalidOperation,
        ));
    }
    Ok(())
}
