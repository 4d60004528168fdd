// doc constants
pub const DOC_ID: &str = "_id";

// meta-record constants
pub const EXE_DATE: &str = "exe-date";
pub const GIT_COMMIT: &str = "git-commit";
pub const EXE_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

// connection constants
pub const DEFAULT_URI: &str = "mongodb://localhost:27017";
pub const MEMORY_URI_SCHEME: &str = "memory://";

// returned by write operations when the logger is in retrieve-only mode
pub const RETRIEVE_ONLY_ID: &str = "retrieve-only";

// provenance constants
pub const GIT_PROGRAM: &str = "git";
pub const GIT_DESCRIBE_ARGS: [&str; 2] = ["describe", "--always"];
