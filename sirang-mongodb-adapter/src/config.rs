use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Connection settings of a [crate::MongoModule].
///
/// Cloning shares the same settings. Settings are appended to the connection
/// URI as query options when the store is opened; options already present
/// in the URI take precedence.
#[derive(Clone, Default)]
pub struct MongoConfig {
    inner: Arc<MongoConfigInner>,
}

impl MongoConfig {
    pub fn new() -> MongoConfig {
        MongoConfig {
            inner: Arc::new(MongoConfigInner::default()),
        }
    }

    /// Application name reported to the server.
    pub fn app_name(&self) -> Option<String> {
        self.inner.app_name.read().clone()
    }

    pub fn set_app_name(&self, app_name: &str) {
        *self.inner.app_name.write() = Some(app_name.to_string());
    }

    /// How long an operation waits for a usable server. Zero keeps the
    /// driver's default.
    pub fn server_selection_timeout(&self) -> Duration {
        Duration::from_millis(self.inner.server_selection_timeout_ms.load(Ordering::Relaxed))
    }

    pub fn set_server_selection_timeout(&self, timeout: Duration) {
        self.inner
            .server_selection_timeout_ms
            .store(timeout.as_millis() as u64, Ordering::Relaxed);
    }

    /// How long opening a connection may take. Zero keeps the driver's
    /// default.
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.inner.connect_timeout_ms.load(Ordering::Relaxed))
    }

    pub fn set_connect_timeout(&self, timeout: Duration) {
        self.inner
            .connect_timeout_ms
            .store(timeout.as_millis() as u64, Ordering::Relaxed);
    }

    /// Renders `uri` with these settings appended as query options.
    pub(crate) fn connection_string(&self, uri: &str) -> String {
        let mut options = Vec::new();
        if let Some(app_name) = self.app_name() {
            options.push(("appName", app_name));
        }
        let selection = self.server_selection_timeout().as_millis();
        if selection > 0 {
            options.push(("serverSelectionTimeoutMS", selection.to_string()));
        }
        let connect = self.connect_timeout().as_millis();
        if connect > 0 {
            options.push(("connectTimeoutMS", connect.to_string()));
        }

        let mut result = uri.to_string();
        for (key, value) in options {
            if has_option(uri, key) {
                continue;
            }
            result.push_str(separator(&result));
            result.push_str(key);
            result.push('=');
            result.push_str(&value);
        }
        result
    }
}

#[derive(Default)]
struct MongoConfigInner {
    app_name: RwLock<Option<String>>,
    server_selection_timeout_ms: AtomicU64,
    connect_timeout_ms: AtomicU64,
}

fn separator(uri: &str) -> &'static str {
    match uri.split_once('?') {
        None => {
            let hosts = uri.split_once("://").map(|(_, rest)| rest).unwrap_or(uri);
            if hosts.contains('/') {
                "?"
            } else {
                "/?"
            }
        }
        Some((_, query)) if query.is_empty() || query.ends_with('&') => "",
        Some(_) => "&",
    }
}

fn has_option(uri: &str, key: &str) -> bool {
    uri.split_once('?')
        .map(|(_, query)| {
            query
                .split('&')
                .filter_map(|pair| pair.split('=').next())
                .any(|name| name.eq_ignore_ascii_case(key))
        })
        .unwrap_or(false)
}
