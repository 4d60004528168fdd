//! Configuration management for the experiment logger.

use parking_lot::RwLock;
use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::common::{DEFAULT_URI, MEMORY_URI_SCHEME};
use crate::errors::{ErrorKind, SirangError, SirangResult};
use crate::provenance::{GitDescribe, RevisionSource, SharedRevisionSource};
use crate::store::memory::InMemoryModule;
use crate::store::{DocumentStore, StoreModule};

/// How much the logger reports through the `log` facade.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Verbosity {
    /// No records for inserts or retrievals.
    #[default]
    Silent,
    /// An info record for each inserted id and each retrieved document.
    Info,
}

impl TryFrom<u8> for Verbosity {
    type Error = SirangError;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        match level {
            0 => Ok(Verbosity::Silent),
            1 => Ok(Verbosity::Info),
            _ => {
                log::error!("Unsupported verbosity level {}", level);
                Err(SirangError::new(
                    &format!("Unsupported verbosity level {}, expected 0 or 1", level),
                    ErrorKind::InvalidConfiguration,
                ))
            }
        }
    }
}

/// Whether the logger writes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoggerMode {
    /// Every store operation inserts.
    #[default]
    Active,
    /// Store operations are no-ops returning a sentinel id; reads still work.
    RetrieveOnly,
}

impl Display for LoggerMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            LoggerMode::Active => write!(f, "active"),
            LoggerMode::RetrieveOnly => write!(f, "retrieve-only"),
        }
    }
}

/// Settings of a [crate::Sirang] logger.
///
/// Cloning shares the same settings. Every setter fails with
/// [ErrorKind::InvalidOperation] once the logger has been opened.
#[derive(Clone)]
pub struct SirangConfig {
    inner: Arc<SirangConfigInner>,
}

impl Default for SirangConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl SirangConfig {
    pub fn new() -> Self {
        SirangConfig {
            inner: Arc::new(SirangConfigInner::new()),
        }
    }

    /// The document-store URI.
    pub fn uri(&self) -> String {
        self.inner.uri.read().clone()
    }

    /// Sets the document-store URI.
    ///
    /// # Errors
    ///
    /// Returns error if already opened or if the URI is empty.
    pub fn set_uri(&self, uri: &str) -> SirangResult<()> {
        self.inner.set_uri(uri)
    }

    pub fn verbosity(&self) -> Verbosity {
        *self.inner.verbosity.read()
    }

    pub fn set_verbosity(&self, verbosity: Verbosity) -> SirangResult<()> {
        self.inner.ensure_not_configured("Verbosity")?;
        *self.inner.verbosity.write() = verbosity;
        Ok(())
    }

    pub fn mode(&self) -> LoggerMode {
        *self.inner.mode.read()
    }

    pub fn set_mode(&self, mode: LoggerMode) -> SirangResult<()> {
        self.inner.ensure_not_configured("Logger mode")?;
        *self.inner.mode.write() = mode;
        Ok(())
    }

    /// The source queried for the `git-commit` field of meta-records.
    pub fn revision_source(&self) -> SharedRevisionSource {
        self.inner.revision_source.read().clone()
    }

    pub fn set_revision_source<T: RevisionSource + 'static>(&self, source: T) -> SirangResult<()> {
        self.inner.ensure_not_configured("Revision source")?;
        *self.inner.revision_source.write() = Arc::new(source);
        Ok(())
    }

    /// Loads the store module the logger connects through.
    ///
    /// # Errors
    ///
    /// Returns error if already opened or if a module is already loaded.
    pub fn load_module<T: StoreModule + 'static>(&self, module: T) -> SirangResult<()> {
        self.inner.load_module(module)
    }

    pub fn has_module(&self) -> bool {
        self.inner.store_module.read().is_some()
    }

    pub fn is_configured(&self) -> bool {
        self.inner.configured.load(Ordering::Relaxed)
    }

    /// Freezes the settings and opens the store.
    ///
    /// Without a loaded module only a `memory://` URI can be opened; it gets
    /// a fresh in-memory store. Any other URI fails with
    /// [ErrorKind::InvalidConfiguration].
    pub(crate) fn initialize(&self) -> SirangResult<DocumentStore> {
        self.inner.initialize()
    }
}

struct SirangConfigInner {
    configured: AtomicBool,
    uri: RwLock<String>,
    verbosity: RwLock<Verbosity>,
    mode: RwLock<LoggerMode>,
    revision_source: RwLock<SharedRevisionSource>,
    store_module: RwLock<Option<Arc<dyn StoreModule>>>,
}

impl SirangConfigInner {
    fn new() -> Self {
        SirangConfigInner {
            configured: AtomicBool::from(false),
            uri: RwLock::new(DEFAULT_URI.to_string()),
            verbosity: RwLock::new(Verbosity::default()),
            mode: RwLock::new(LoggerMode::default()),
            revision_source: RwLock::new(Arc::new(GitDescribe::default())),
            store_module: RwLock::new(None),
        }
    }

    fn ensure_not_configured(&self, setting: &str) -> SirangResult<()> {
        if self.configured.load(Ordering::Relaxed) {
            log::error!("{} cannot be changed after the logger is opened", setting);
            return Err(SirangError::new(
                &format!("{} cannot be changed after the logger is opened", setting),
                ErrorKind::InvalidOperation,
            ));
        }
        Ok(())
    }

    fn set_uri(&self, uri: &str) -> SirangResult<()> {
        self.ensure_not_configured("Uri")?;
        if uri.trim().is_empty() {
            log::error!("Document store uri cannot be empty");
            return Err(SirangError::new(
                "Document store uri cannot be empty",
                ErrorKind::InvalidConfiguration,
            ));
        }
        *self.uri.write() = uri.to_string();
        Ok(())
    }

    fn load_module<T: StoreModule + 'static>(&self, module: T) -> SirangResult<()> {
        self.ensure_not_configured("Store module")?;
        let mut slot = self.store_module.write();
        if slot.is_some() {
            log::error!("A store module is already loaded");
            return Err(SirangError::new(
                "A store module is already loaded",
                ErrorKind::InvalidConfiguration,
            ));
        }
        *slot = Some(Arc::new(module));
        Ok(())
    }

    fn initialize(&self) -> SirangResult<DocumentStore> {
        if self.configured.swap(true, Ordering::Relaxed) {
            log::error!("Logger configuration is already initialized");
            return Err(SirangError::new(
                "Logger configuration is already initialized",
                ErrorKind::InvalidOperation,
            ));
        }

        let uri = self.uri.read().clone();
        let module = self.store_module.read().clone();
        match module {
            Some(module) => module.open_store(&uri),
            None if uri.starts_with(MEMORY_URI_SCHEME) => {
                log::debug!("No store module loaded, using the in-memory store");
                InMemoryModule::new().open_store(&uri)
            }
            None => {
                log::error!("No store module loaded for uri {}", uri);
                Err(SirangError::new(
                    &format!(
                        "No store module loaded for uri {}; load sirang_mongodb_adapter::MongoModule",
                        uri
                    ),
                    ErrorKind::InvalidConfiguration,
                ))
            }
        }
    }
}
