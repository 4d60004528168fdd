//! MongoDB storage for the sirang experiment logger.
//!
//! Load [MongoModule] into `Sirang::builder()` to keep records on a MongoDB
//! server reached through the driver's synchronous client. Values map onto
//! BSON one to one; store-assigned ids come back as `Value::ObjectId` holding
//! the hex form.

mod config;
mod convert;
mod error;
mod module;
mod store;

pub use config::*;
pub use convert::{BsonConversionError, BsonConversionResult};
pub use module::*;
pub use store::*;
