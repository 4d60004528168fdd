use crate::collection::Document;
use crate::common::Value;
use crate::errors::SirangResult;
use crate::filter::Filter;
use std::ops::Deref;
use std::sync::Arc;

/// Client-level contract of a document store.
///
/// # Purpose
/// A document store hosts named databases, each holding named collections of
/// [Document]s. Databases and collections are created on first write; asking
/// for one that does not exist yet returns a usable, empty handle.
///
/// # Implementations
/// - `InMemoryStore`: in-process storage for tests and dry runs
/// - `MongoStore` (in `sirang_mongodb_adapter`): a MongoDB server
///
/// # Thread Safety
/// Implementers must be `Send + Sync`.
pub trait DocumentStoreProvider: Send + Sync {
    /// Returns a handle to the database `name`.
    fn database(&self, name: &str) -> SirangResult<Database>;

    /// Lists the databases holding at least one document.
    fn database_names(&self) -> SirangResult<Vec<String>>;

    /// Releases the connection. Handles obtained earlier fail afterwards.
    fn close(&self) -> SirangResult<()>;

    fn is_closed(&self) -> bool;
}

/// Database-level contract of a document store.
pub trait DatabaseProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Returns a handle to the collection `name` within this database.
    fn collection(&self, name: &str) -> SirangResult<Collection>;

    /// Lists the collections holding at least one document.
    fn collection_names(&self) -> SirangResult<Vec<String>>;
}

/// Collection-level contract of a document store.
///
/// These four operations are everything the logger needs from a store.
pub trait CollectionProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Inserts `doc` and returns its `_id`.
    ///
    /// When `doc` has no `_id` the store generates one. A duplicate `_id`
    /// fails with [crate::errors::ErrorKind::IdCollision]; nothing is retried.
    fn insert_one(&self, doc: Document) -> SirangResult<Value>;

    /// Returns every document matching `filter`, in the store's cursor order.
    fn find(&self, filter: &Filter) -> SirangResult<Vec<Document>>;

    /// Returns the first document matching `filter`.
    fn find_one(&self, filter: &Filter) -> SirangResult<Option<Document>> {
        Ok(self.find(filter)?.into_iter().next())
    }

    /// Returns the number of documents in this collection; 0 when absent.
    fn count(&self) -> SirangResult<u64>;
}

/// A cheaply cloneable handle to a document store.
///
/// Dereferences to the underlying [DocumentStoreProvider].
#[derive(Clone)]
pub struct DocumentStore {
    inner: Arc<dyn DocumentStoreProvider>,
}

impl DocumentStore {
    pub fn new<T: DocumentStoreProvider + 'static>(inner: T) -> Self {
        DocumentStore {
            inner: Arc::new(inner),
        }
    }
}

impl Deref for DocumentStore {
    type Target = Arc<dyn DocumentStoreProvider>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

/// A cheaply cloneable handle to one database of a document store.
#[derive(Clone)]
pub struct Database {
    inner: Arc<dyn DatabaseProvider>,
}

impl Database {
    pub fn new<T: DatabaseProvider + 'static>(inner: T) -> Self {
        Database {
            inner: Arc::new(inner),
        }
    }

    /// Returns true when both handles point at the same opened database.
    pub fn same_handle(&self, other: &Database) -> bool {
        std::ptr::eq(
            Arc::as_ptr(&self.inner) as *const (),
            Arc::as_ptr(&other.inner) as *const (),
        )
    }
}

impl Deref for Database {
    type Target = Arc<dyn DatabaseProvider>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

/// A cheaply cloneable handle to one collection of a database.
#[derive(Clone)]
pub struct Collection {
    inner: Arc<dyn CollectionProvider>,
}

impl Collection {
    pub fn new<T: CollectionProvider + 'static>(inner: T) -> Self {
        Collection {
            inner: Arc::new(inner),
        }
    }
}

impl Deref for Collection {
    type Target = Arc<dyn CollectionProvider>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}
