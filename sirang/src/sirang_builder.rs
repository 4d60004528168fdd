use std::path::Path;

use crate::errors::{SirangError, SirangResult};
use crate::provenance::{GitDescribe, RevisionSource};
use crate::sirang::Sirang;
use crate::sirang_config::{LoggerMode, SirangConfig, Verbosity};
use crate::store::StoreModule;

/// Builder for opening a [Sirang] logger.
///
/// Errors raised while configuring are captured and the first one is
/// returned from [SirangBuilder::open].
///
/// # Examples
///
/// ```rust,ignore
/// use sirang::Sirang;
///
/// let logger = Sirang::builder()
///     .uri("mongodb://localhost:27017")
///     .verbose(1)
///     .load_module(MongoModule::new())
///     .open()?;
/// ```
#[derive(Default)]
pub struct SirangBuilder {
    error: Option<SirangError>,
    config: SirangConfig,
}

impl SirangBuilder {
    /// Creates a builder with the defaults: `mongodb://localhost:27017`,
    /// silent, active, `git describe` in the process's working directory, and
    /// the in-memory store unless a module is loaded.
    pub fn new() -> Self {
        SirangBuilder {
            error: None,
            config: SirangConfig::new(),
        }
    }

    /// Sets the document-store URI handed to the store module.
    pub fn uri(mut self, uri: &str) -> Self {
        if self.error.is_none() {
            if let Err(e) = self.config.set_uri(uri) {
                self.error = Some(e);
            }
        }
        self
    }

    /// Sets the verbosity level: 0 is silent, 1 logs every inserted id and
    /// retrieved document. Any other level fails at [SirangBuilder::open].
    pub fn verbose(mut self, level: u8) -> Self {
        if self.error.is_none() {
            let result = Verbosity::try_from(level).and_then(|v| self.config.set_verbosity(v));
            if let Err(e) = result {
                self.error = Some(e);
            }
        }
        self
    }

    pub fn mode(mut self, mode: LoggerMode) -> Self {
        if self.error.is_none() {
            if let Err(e) = self.config.set_mode(mode) {
                self.error = Some(e);
            }
        }
        self
    }

    /// Loads the store module the logger connects through.
    ///
    /// Without one the logger keeps everything in memory.
    pub fn load_module<T: StoreModule + 'static>(mut self, module: T) -> Self {
        if self.error.is_none() {
            if let Err(e) = self.config.load_module(module) {
                self.error = Some(e);
            }
        }
        self
    }

    /// Sets where meta-records get their `git-commit` field from.
    pub fn revision_source<T: RevisionSource + 'static>(mut self, source: T) -> Self {
        if self.error.is_none() {
            if let Err(e) = self.config.set_revision_source(source) {
                self.error = Some(e);
            }
        }
        self
    }

    /// Runs `git describe` in `dir`. Replaces any earlier revision source.
    pub fn working_dir(self, dir: impl AsRef<Path>) -> Self {
        self.revision_source(GitDescribe::new().in_dir(dir))
    }

    /// Opens the logger.
    ///
    /// Returns the first error captured while configuring, or the store
    /// module's error when the store cannot be opened.
    pub fn open(self) -> SirangResult<Sirang> {
        if let Some(error) = self.error {
            return Err(error);
        }
        let store = self.config.initialize()?;
        Ok(Sirang::new(self.config, store))
    }
}
