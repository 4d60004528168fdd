use sirang::common::DEFAULT_URI;
use sirang::errors::SirangResult;
use sirang::provenance::FixedRevision;
use sirang::sirang_builder::SirangBuilder;
use sirang::store::memory::{InMemoryModule, InMemoryStore};
use sirang::Sirang;
use std::backtrace::Backtrace;
use std::thread;
use std::time::{Duration, Instant};

/// Revision recorded in meta-records written by the tests.
pub const TEST_REVISION: &str = "v0.1.0-3-g3f2a9c1";

/// Runs a test with retry logic and error handling.
/// Tests run on the current thread to avoid thread exhaustion when running many tests in parallel.
pub fn run_test<T, B, A>(before: B, test: T, after: A)
where
    T: Fn(TestContext) -> SirangResult<()> + std::panic::UnwindSafe + std::panic::RefUnwindSafe,
    B: Fn() -> SirangResult<TestContext> + std::panic::UnwindSafe + std::panic::RefUnwindSafe,
    A: Fn(TestContext) -> SirangResult<()> + std::panic::UnwindSafe + std::panic::RefUnwindSafe,
{
    const MAX_RETRIES: u32 = 3;
    let mut last_error: Option<String> = None;
    let mut last_backtrace: Option<String> = None;

    for attempt in 1..=MAX_RETRIES {
        let start_time = Instant::now();

        let result = std::panic::catch_unwind(|| {
            let backtrace = Backtrace::capture();
            match before() {
                Ok(ctx) => match test(ctx.clone()) {
                    Ok(_) => after(ctx).map_err(|e| {
                        (format!("After run failed: {:?}", e), backtrace.to_string())
                    }),
                    Err(e) => {
                        let _ = after(ctx);
                        Err((format!("Test failed: {:?}", e), backtrace.to_string()))
                    }
                },
                Err(e) => Err((format!("Before run failed: {:?}", e), backtrace.to_string())),
            }
        });

        let elapsed = start_time.elapsed();

        match result {
            Ok(Ok(_)) => return,
            Ok(Err((e, bt))) => {
                last_error = Some(e.clone());
                last_backtrace = Some(bt);
                if attempt < MAX_RETRIES {
                    eprintln!(
                        "\n========== Test Attempt {}/{} Failed (took {:?}) ==========",
                        attempt, MAX_RETRIES, elapsed
                    );
                    eprintln!("Error: {}", e);
                    eprintln!("Retrying in {}ms...\n", 100 * attempt);
                    thread::sleep(Duration::from_millis(100 * attempt as u64));
                }
            }
            Err(panic_err) => {
                let err_msg = if let Some(s) = panic_err.downcast_ref::<&str>() {
                    s.to_string()
                } else if let Some(s) = panic_err.downcast_ref::<String>() {
                    s.clone()
                } else {
                    "Unknown panic".to_string()
                };
                let message = format!("Panic: {}", err_msg);

                if attempt < MAX_RETRIES {
                    eprintln!(
                        "\n========== Test Attempt {}/{} Panicked (took {:?}) ==========",
                        attempt, MAX_RETRIES, elapsed
                    );
                    eprintln!("{}", message);
                    eprintln!("Retrying in {}ms...\n", 100 * attempt);
                    thread::sleep(Duration::from_millis(100 * attempt as u64));
                }
                last_error = Some(message);
                last_backtrace = Some(Backtrace::capture().to_string());
            }
        }
    }

    eprintln!("\n==================== TEST FAILED ====================");
    eprintln!("Failed after {} attempts", MAX_RETRIES);
    eprintln!("Last error: {}", last_error.as_deref().unwrap_or("Unknown"));
    if let Some(bt) = &last_backtrace {
        if !bt.is_empty() && !bt.contains("disabled") {
            eprintln!("\nBacktrace:\n{}", bt);
        }
    }
    eprintln!("=====================================================\n");

    panic!(
        "Test failed after {} attempts. Last error: {}",
        MAX_RETRIES,
        last_error.unwrap_or_default()
    );
}

/// A logger plus the database a test writes to.
#[derive(Clone)]
pub struct TestContext {
    db_name: String,
    logger: Sirang,
    memory_store: Option<InMemoryStore>,
}

impl TestContext {
    pub fn new(db_name: String, logger: Sirang, memory_store: Option<InMemoryStore>) -> Self {
        Self {
            db_name,
            logger,
            memory_store,
        }
    }

    pub fn db_name(&self) -> &str {
        &self.db_name
    }

    pub fn logger(&self) -> Sirang {
        self.logger.clone()
    }

    /// The in-memory store behind the logger, when not running against MongoDB.
    pub fn memory_store(&self) -> Option<InMemoryStore> {
        self.memory_store.clone()
    }
}

/// A database name no other test uses.
pub fn random_db_name() -> String {
    format!("sirang_test_{}", uuid::Uuid::new_v4().simple())
}

/// URI of the MongoDB server the `mongodb` feature runs against.
pub fn test_uri() -> String {
    std::env::var("SIRANG_TEST_URI").unwrap_or_else(|_| DEFAULT_URI.to_string())
}

#[cfg(not(feature = "mongodb"))]
pub fn create_test_context() -> SirangResult<TestContext> {
    let store = InMemoryStore::new();
    let logger = Sirang::builder()
        .uri("memory://")
        .load_module(InMemoryModule::with_store(store.clone()))
        .revision_source(FixedRevision::new(TEST_REVISION))
        .open()?;
    Ok(TestContext::new(random_db_name(), logger, Some(store)))
}

#[cfg(feature = "mongodb")]
pub fn create_test_context() -> SirangResult<TestContext> {
    let logger = remote_builder(Sirang::builder())
        .revision_source(FixedRevision::new(TEST_REVISION))
        .open()?;
    Ok(TestContext::new(random_db_name(), logger, None))
}

/// Opens a second logger on the same store as `ctx`, adjusted by `configure`.
pub fn create_sibling_logger<F>(ctx: &TestContext, configure: F) -> SirangResult<Sirang>
where
    F: FnOnce(SirangBuilder) -> SirangBuilder,
{
    let builder = Sirang::builder().revision_source(FixedRevision::new(TEST_REVISION));
    let builder = match ctx.memory_store() {
        Some(store) => builder.load_module(InMemoryModule::with_store(store)),
        None => remote_builder(builder),
    };
    configure(builder).open()
}

#[cfg(feature = "mongodb")]
fn remote_builder(builder: SirangBuilder) -> SirangBuilder {
    use sirang_mongodb_adapter::MongoModule;

    let module = MongoModule::with_config()
        .app_name("sirang-int-test")
        .server_selection_timeout(Duration::from_secs(5))
        .build();
    builder.uri(&test_uri()).load_module(module)
}

#[cfg(not(feature = "mongodb"))]
fn remote_builder(builder: SirangBuilder) -> SirangBuilder {
    builder
}

#[cfg(not(feature = "mongodb"))]
pub fn cleanup(ctx: TestContext) -> SirangResult<()> {
    ctx.logger().close()
}

#[cfg(feature = "mongodb")]
pub fn cleanup(ctx: TestContext) -> SirangResult<()> {
    match mongodb::sync::Client::with_uri_str(test_uri()) {
        Ok(client) => {
            if let Err(e) = client.database(ctx.db_name()).drop(None) {
                eprintln!("Warning: Failed to drop test database {}: {:?}", ctx.db_name(), e);
            }
        }
        Err(e) => eprintln!("Warning: Failed to connect for cleanup: {:?}", e),
    }
    ctx.logger().close()
}
