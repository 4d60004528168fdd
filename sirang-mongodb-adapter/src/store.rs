use mongodb::bson::{self, doc as bson_doc};
use mongodb::sync::Client;
use parking_lot::RwLock;
use sirang::collection::Document;
use sirang::common::Value;
use sirang::errors::{ErrorKind, SirangError, SirangResult};
use sirang::filter::Filter;
use sirang::store::{
    Collection, CollectionProvider, Database, DatabaseProvider, DocumentStoreProvider,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::convert::{from_bson, from_bson_document, to_bson_document, to_query};
use crate::error::map_driver_error;

/// Document store backed by a MongoDB server.
///
/// # Purpose
/// `MongoStore` adapts the driver's synchronous client to sirang's store
/// contracts. One client, and its connection pool, serves every database.
///
/// # Characteristics
/// - **Lazy**: the server is first contacted by the first operation, so an
///   unreachable server surfaces there as a connection failure
/// - **Auto-creating**: databases and collections appear on first insert
/// - **Server-assigned ids**: documents without `_id` get an ObjectId
///
/// Cloning a `MongoStore` shares the same client.
#[derive(Clone)]
pub struct MongoStore {
    inner: Arc<MongoStoreInner>,
}

impl MongoStore {
    pub fn new(client: Client) -> MongoStore {
        MongoStore {
            inner: Arc::new(MongoStoreInner {
                client: RwLock::new(Some(client)),
                closed: Arc::new(AtomicBool::new(false)),
            }),
        }
    }
}

impl DocumentStoreProvider for MongoStore {
    fn database(&self, name: &str) -> SirangResult<Database> {
        let client = self.inner.client()?;
        Ok(Database::new(MongoDatabase {
            name: name.to_string(),
            database: client.database(name),
            closed: self.inner.closed.clone(),
        }))
    }

    fn database_names(&self) -> SirangResult<Vec<String>> {
        let client = self.inner.client()?;
        let mut names = client
            .list_database_names(None, None)
            .map_err(|err| map_driver_error("Failed to list databases", err))?;
        names.sort();
        Ok(names)
    }

    fn close(&self) -> SirangResult<()> {
        self.inner.closed.store(true, Ordering::Release);
        if self.inner.client.write().take().is_some() {
            log::debug!("MongoDB client released");
        }
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::Acquire)
    }
}

struct MongoStoreInner {
    client: RwLock<Option<Client>>,
    closed: Arc<AtomicBool>,
}

impl MongoStoreInner {
    fn client(&self) -> SirangResult<Client> {
        ensure_open(&self.closed)?;
        self.client.read().clone().ok_or_else(|| {
            log::error!("MongoDB store is closed");
            SirangError::new("MongoDB store is closed", ErrorKind::InvalidOperation)
        })
    }
}

struct MongoDatabase {
    name: String,
    database: mongodb::sync::Database,
    closed: Arc<AtomicBool>,
}

impl DatabaseProvider for MongoDatabase {
    fn name(&self) -> &str {
        &self.name
    }

    fn collection(&self, name: &str) -> SirangResult<Collection> {
        ensure_open(&self.closed)?;
        Ok(Collection::new(MongoCollection {
            name: name.to_string(),
            collection: self.database.collection::<bson::Document>(name),
            closed: self.closed.clone(),
        }))
    }

    fn collection_names(&self) -> SirangResult<Vec<String>> {
        ensure_open(&self.closed)?;
        let mut names = self
            .database
            .list_collection_names(None)
            .map_err(|err| map_driver_error("Failed to list collections", err))?;
        names.sort();
        Ok(names)
    }
}

struct MongoCollection {
    name: String,
    collection: mongodb::sync::Collection<bson::Document>,
    closed: Arc<AtomicBool>,
}

impl CollectionProvider for MongoCollection {
    fn name(&self) -> &str {
        &self.name
    }

    fn insert_one(&self, doc: Document) -> SirangResult<Value> {
        ensure_open(&self.closed)?;
        let doc = to_bson_document(&doc)?;
        let result = self
            .collection
            .insert_one(doc, None)
            .map_err(|err| map_driver_error(&format!("Failed to insert into {}", self.name), err))?;
        Ok(from_bson(result.inserted_id)?)
    }

    fn find(&self, filter: &Filter) -> SirangResult<Vec<Document>> {
        ensure_open(&self.closed)?;
        let query = to_query(filter)?;
        let cursor = self
            .collection
            .find(query, None)
            .map_err(|err| map_driver_error(&format!("Failed to query {}", self.name), err))?;

        let mut documents = Vec::new();
        for item in cursor {
            let item = item
                .map_err(|err| map_driver_error(&format!("Failed to read from {}", self.name), err))?;
            documents.push(from_bson_document(item)?);
        }
        Ok(documents)
    }

    fn find_one(&self, filter: &Filter) -> SirangResult<Option<Document>> {
        ensure_open(&self.closed)?;
        let query = to_query(filter)?;
        let found = self
            .collection
            .find_one(query, None)
            .map_err(|err| map_driver_error(&format!("Failed to query {}", self.name), err))?;
        Ok(found.map(from_bson_document).transpose()?)
    }

    fn count(&self) -> SirangResult<u64> {
        ensure_open(&self.closed)?;
        self.collection
            .count_documents(bson_doc! {}, None)
            .map_err(|err| map_driver_error(&format!("Failed to count {}", self.name), err))
    }
}

fn ensure_open(closed: &AtomicBool) -> SirangResult<()> {
    if closed.load(Ordering::Acquire) {
        log::error!("MongoDB store is closed");
        return Err(SirangError::new(
            "MongoDB store is closed",
            ErrorKind::InvalidOperation,
        ));
    }
    Ok(())
}
