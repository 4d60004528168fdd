use std::sync::Arc;

use crate::capture::{CaptureOptions, StoreDecorator};
use crate::collection::identifier;
use crate::collection::{Document, StoreOptions};
use crate::common::{Value, EXE_DATE, GIT_COMMIT, RETRIEVE_ONLY_ID};
use crate::errors::SirangResult;
use crate::filter::Filter;
use crate::provenance::exe_date;
use crate::registry::ConnectionRegistry;
use crate::sirang_builder::SirangBuilder;
use crate::sirang_config::{LoggerMode, SirangConfig, Verbosity};
use crate::store::{Database, DocumentStore};

/// The experiment logger.
///
/// `Sirang` records experiment parameters and results as documents in a
/// document store. It provides:
/// - [Sirang::store]: insert one projected document
/// - [Sirang::store_meta]: insert a meta-record carrying the execution date
///   and source-control revision
/// - [Sirang::retrieve] and [Sirang::retrieve_one]: equality lookups
/// - [Sirang::dstore]: wrap user functions so every call is recorded
///
/// One logger owns one store connection, shared by every database it touches.
/// Clones share the same connection and settings.
///
/// # Examples
///
/// ```rust,ignore
/// use sirang::{doc, Sirang, StoreOptions};
///
/// let logger = Sirang::builder().uri("memory://").verbose(1).open()?;
///
/// let id = logger.store("exp", "runs", doc! { lr: 0.1, seed: 7 }, StoreOptions::new())?;
/// let runs = logger.retrieve("exp", "runs", doc! { seed: 7 })?;
/// # Ok::<(), sirang::errors::SirangError>(())
/// ```
#[derive(Clone)]
pub struct Sirang {
    inner: Arc<SirangInner>,
}

impl Sirang {
    /// Creates a [SirangBuilder] for configuring and opening a logger.
    pub fn builder() -> SirangBuilder {
        SirangBuilder::new()
    }

    /// Opens a logger with the default settings.
    ///
    /// The default URI names a MongoDB server, so without a loaded store
    /// module this fails with [crate::errors::ErrorKind::InvalidConfiguration].
    pub fn open_default() -> SirangResult<Sirang> {
        SirangBuilder::new().open()
    }

    pub(crate) fn new(config: SirangConfig, store: DocumentStore) -> Self {
        Sirang {
            inner: Arc::new(SirangInner {
                registry: ConnectionRegistry::new(store),
                config,
            }),
        }
    }

    /// Returns the handle of database `name`.
    ///
    /// Repeated calls return the same handle.
    pub fn get_db(&self, name: &str) -> SirangResult<Database> {
        self.inner.registry.get_db(name)
    }

    /// Number of documents in `collection`; 0 when it does not exist.
    pub fn collection_doc_count(&self, db: &str, collection: &str) -> SirangResult<u64> {
        self.inner.registry.collection_doc_count(db, collection)
    }

    /// Projects `raw` through the keep set of `options`, assigns its `_id`
    /// and inserts it.
    ///
    /// Returns the string form of the inserted `_id`: the explicit id, the
    /// `_id` already in `raw` when kept, or the id generated by the store.
    ///
    /// In [LoggerMode::RetrieveOnly] nothing is inserted and `"retrieve-only"`
    /// is returned.
    ///
    /// # Errors
    ///
    /// Returns the store's error, such as
    /// [crate::errors::ErrorKind::IdCollision] for a duplicate `_id`.
    pub fn store(
        &self,
        db: &str,
        collection: &str,
        raw: Document,
        options: StoreOptions,
    ) -> SirangResult<String> {
        if self.is_retrieve_only() {
            return Ok(RETRIEVE_ONLY_ID.to_string());
        }

        let (keep, doc_id) = options.into_parts();
        let mut doc = keep.apply(&raw);
        identifier::resolve(doc_id, None, None)?.apply(&mut doc);
        self.insert_record(db, collection, doc)
    }

    /// Inserts a meta-record.
    ///
    /// `doc` (empty by default) gains an `exe-date` field with the current
    /// local time and a `git-commit` field with the configured revision
    /// source's output. Its `_id` is `doc_id` when given, otherwise the
    /// collection's document count plus one.
    ///
    /// # Errors
    ///
    /// Fails with [crate::errors::ErrorKind::ProvenanceUnavailable] when no
    /// revision can be determined; nothing is inserted then.
    pub fn store_meta(
        &self,
        db: &str,
        collection: &str,
        doc: Option<Document>,
        doc_id: Option<Value>,
    ) -> SirangResult<String> {
        if self.is_retrieve_only() {
            return Ok(RETRIEVE_ONLY_ID.to_string());
        }

        let mut doc = doc.unwrap_or_default();
        doc.put(EXE_DATE, exe_date())?;
        let revision = self.inner.config.revision_source().revision()?;
        doc.put(GIT_COMMIT, revision)?;

        let count = || self.collection_doc_count(db, collection);
        identifier::resolve(doc_id, None, Some(&count))?.apply(&mut doc);

        let keep_all = StoreOptions::new()
            .keep(Vec::<String>::new())
            .inversion(true);
        self.store(db, collection, doc, keep_all)
    }

    /// Returns every document of `collection` matching `filter`.
    ///
    /// The filter is conjunctive equality; a [Document] converts into one.
    /// No match is an empty list.
    pub fn retrieve(
        &self,
        db: &str,
        collection: &str,
        filter: impl Into<Filter>,
    ) -> SirangResult<Vec<Document>> {
        let filter = filter.into();
        let docs = self
            .inner
            .registry
            .collection(db, collection)?
            .find(&filter)?;
        if self.is_verbose() {
            for doc in &docs {
                log::info!("{}", doc);
            }
        }
        Ok(docs)
    }

    /// Returns the first document of `collection` matching `filter`, or
    /// `None`.
    pub fn retrieve_one(
        &self,
        db: &str,
        collection: &str,
        filter: impl Into<Filter>,
    ) -> SirangResult<Option<Document>> {
        let filter = filter.into();
        let doc = self
            .inner
            .registry
            .collection(db, collection)?
            .find_one(&filter)?;
        if self.is_verbose() {
            if let Some(doc) = &doc {
                log::info!("{}", doc);
            }
        }
        Ok(doc)
    }

    /// Creates a [StoreDecorator] recording wrapped function calls into
    /// `collection`.
    ///
    /// # Errors
    ///
    /// Fails with [crate::errors::ErrorKind::InvalidTemplate] when the id
    /// template of `options` is malformed.
    pub fn dstore(
        &self,
        db: &str,
        collection: &str,
        options: CaptureOptions,
    ) -> SirangResult<StoreDecorator> {
        StoreDecorator::new(self.clone(), db, collection, options)
    }

    pub fn mode(&self) -> LoggerMode {
        self.inner.config.mode()
    }

    pub fn config(&self) -> &SirangConfig {
        &self.inner.config
    }

    /// Drops the cached database handles and closes the store.
    pub fn close(&self) -> SirangResult<()> {
        self.inner.registry.clear();
        self.inner.registry.store().close()
    }

    pub fn is_closed(&self) -> bool {
        self.inner.registry.store().is_closed()
    }

    /// Inserts an already prepared record; a no-op in retrieve-only mode.
    pub(crate) fn insert_record(
        &self,
        db: &str,
        collection: &str,
        doc: Document,
    ) -> SirangResult<String> {
        if self.is_retrieve_only() {
            return Ok(RETRIEVE_ONLY_ID.to_string());
        }

        let id = self
            .inner
            .registry
            .collection(db, collection)?
            .insert_one(doc)?
            .to_id_string();
        if self.is_verbose() {
            log::info!("{}", id);
        }
        Ok(id)
    }

    fn is_verbose(&self) -> bool {
        self.inner.config.verbosity() == Verbosity::Info
    }

    fn is_retrieve_only(&self) -> bool {
        self.inner.config.mode() == LoggerMode::RetrieveOnly
    }
}

struct SirangInner {
    config: SirangConfig,
    registry: ConnectionRegistry,
}
