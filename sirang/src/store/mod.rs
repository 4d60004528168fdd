//! Document store abstractions.
//!
//! The logger talks to its store through three provider traits, one per level
//! of the store's hierarchy:
//!
//! - [DocumentStoreProvider]: the client, handing out databases by name
//! - [DatabaseProvider]: a database, handing out collections by name
//! - [CollectionProvider]: a collection, supporting `insert_one`, `find`,
//!   `find_one` and `count`
//!
//! Each provider is wrapped in a cheaply cloneable handle ([DocumentStore],
//! [Database], [Collection]) that dereferences to it.
//!
//! Stores are plugged in through a [StoreModule]. sirang ships the
//! [memory::InMemoryModule]; the `sirang_mongodb_adapter` crate provides a
//! MongoDB-backed module.

mod document_store;
pub mod memory;
mod store_module;

pub use document_store::*;
pub use store_module::*;
