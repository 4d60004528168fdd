use crate::config::MongoConfig;
use crate::error::map_driver_error;
use crate::store::MongoStore;
use mongodb::sync::Client;
use sirang::errors::SirangResult;
use sirang::store::{DocumentStore, StoreModule};
use std::time::Duration;

/// sirang store module connecting to a MongoDB server.
///
/// `MongoModule` must be loaded into the logger's builder for records to go
/// to MongoDB; without it the logger keeps them in memory. The server is
/// addressed by the logger's URI.
///
/// # Examples
///
/// ```rust,ignore
/// use sirang::Sirang;
/// use sirang_mongodb_adapter::MongoModule;
///
/// let logger = Sirang::builder()
///     .uri("mongodb://localhost:27017")
///     .load_module(
///         MongoModule::with_config()
///             .app_name("experiments")
///             .server_selection_timeout(Duration::from_secs(5))
///             .build(),
///     )
///     .open()?;
/// ```
#[derive(Default)]
pub struct MongoModule {
    config: MongoConfig,
}

impl MongoModule {
    /// Creates a module with the driver's default settings.
    pub fn new() -> MongoModule {
        MongoModule {
            config: MongoConfig::new(),
        }
    }

    /// Creates a new builder for configuring a MongoDB module.
    #[inline]
    pub fn with_config() -> MongoModuleBuilder {
        MongoModuleBuilder::new()
    }

    pub fn config(&self) -> &MongoConfig {
        &self.config
    }
}

impl StoreModule for MongoModule {
    fn open_store(&self, uri: &str) -> SirangResult<DocumentStore> {
        let connection_string = self.config.connection_string(uri);
        let client = Client::with_uri_str(&connection_string)
            .map_err(|err| map_driver_error(&format!("Failed to open client for {}", uri), err))?;
        log::debug!("MongoDB client opened for {}", uri);
        Ok(DocumentStore::new(MongoStore::new(client)))
    }
}

/// Builder for configuring a MongoDB store module.
pub struct MongoModuleBuilder {
    config: MongoConfig,
}

impl Default for MongoModuleBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MongoModuleBuilder {
    #[inline]
    pub fn new() -> MongoModuleBuilder {
        MongoModuleBuilder {
            config: MongoConfig::new(),
        }
    }

    /// Sets the application name reported to the server.
    pub fn app_name(self, app_name: &str) -> Self {
        self.config.set_app_name(app_name);
        self
    }

    /// Sets how long an operation waits for a usable server before failing
    /// with a connection failure.
    pub fn server_selection_timeout(self, timeout: Duration) -> Self {
        self.config.set_server_selection_timeout(timeout);
        self
    }

    pub fn connect_timeout(self, timeout: Duration) -> Self {
        self.config.set_connect_timeout(timeout);
        self
    }

    pub fn build(self) -> MongoModule {
        MongoModule {
            config: self.config,
        }
    }
}
