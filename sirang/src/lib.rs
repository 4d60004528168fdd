//! # Sirang - Experiment Parameter Logger
//!
//! Sirang records the inputs and outputs of experiment code as documents in a
//! document store, so runs can later be filtered and replayed.
//!
//! ## Key Features
//!
//! - **Projection**: keep or drop parameters by name before storing
//! - **Identifiers**: explicit, templated (`"run-{}"` plus a counter) or
//!   store-generated `_id`s
//! - **Capture**: wrap a function so that every call stores its parameters,
//!   and optionally extra fields taken from its return value
//! - **Provenance**: meta-records carrying the execution date and the
//!   `git describe --always` revision
//! - **Pluggable Stores**: an in-memory store built in, MongoDB through the
//!   `sirang_mongodb_adapter` crate
//! - **Retrieve-only Mode**: turn every write into a no-op without touching
//!   the experiment code
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use sirang::{doc, Sirang};
//! use sirang::capture::CaptureOptions;
//! use sirang::collection::{Document, StoreOptions};
//! use sirang::errors::SirangResult;
//!
//! # fn main() -> SirangResult<()> {
//! let logger = Sirang::builder().uri("memory://").verbose(1).open()?;
//!
//! // Store one document, keeping only the learning rate
//! let id = logger.store("exp", "runs", doc! { lr: 0.1, seed: 7 }, StoreOptions::new().keep(["lr"]))?;
//!
//! // Record every call of a training function
//! let decorator = logger.dstore("exp", "calls", CaptureOptions::new().id_template("call-{}"))?;
//! let mut train = decorator.wrap(|params: &Document| -> SirangResult<f64> {
//!     Ok(params.get("lr").as_f64().unwrap_or_default() * 2.0)
//! })?;
//! train.call(doc! { lr: 0.1 })?;
//!
//! // Provenance
//! logger.store_meta("exp", "meta", None, None)?;
//!
//! let calls = logger.retrieve("exp", "calls", doc! { "_id": "call-0" })?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Organization
//!
//! - [`capture`] - Capture wrappers recording function calls
//! - [`collection`] - Documents, store options and id templates
//! - [`common`] - Values, constants and the projection engine
//! - [`errors`] - Error types and result definitions
//! - [`filter`] - Equality filters
//! - [`provenance`] - Source-control revision sources
//! - [`sirang`] - The logger
//! - [`sirang_builder`] - Logger builder
//! - [`sirang_config`] - Logger configuration
//! - [`store`] - Document store abstractions and the in-memory store

pub mod capture;
pub mod collection;
pub mod common;
pub mod errors;
pub mod filter;
pub mod provenance;
mod registry;
pub mod sirang;
pub mod sirang_builder;
pub mod sirang_config;
pub mod store;

pub use crate::sirang::Sirang;
pub use capture::{CaptureOptions, CapturedFn, StoreDecorator};
pub use collection::{Document, StoreOptions};
pub use common::Value;
pub use errors::{ErrorKind, SirangError, SirangResult};
pub use filter::Filter;
pub use sirang_config::{LoggerMode, Verbosity};
