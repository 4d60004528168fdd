//! Documents and the per-insert machinery that shapes them.
//!
//! A [Document] is a key-value map where keys are strings and values are
//! [crate::common::Value]s. Before a document is inserted it is projected
//! through a keep-spec (see [crate::common::project]) and given an `_id`
//! by the [identifier] resolver.
//!
//! ```rust,ignore
//! use sirang::collection::{Document, StoreOptions};
//!
//! let mut doc = Document::new();
//! doc.put("lr", 0.01)?;
//! doc.put("epochs", 20)?;
//!
//! let id = logger.store("experiments", "runs", doc, StoreOptions::new().keep(["lr"]))?;
//! ```

mod document;
mod id_template;
pub(crate) mod identifier;
mod store_options;

pub use document::*;
pub use id_template::*;
pub use identifier::IdSource;
pub use store_options::*;
