use parking_lot::Mutex;
use std::sync::Arc;

use crate::capture::CaptureOptions;
use crate::collection::identifier;
use crate::collection::{Document, IdTemplate};
use crate::common::KeepSpec;
use crate::errors::{ErrorKind, SirangError, SirangResult};
use crate::sirang::Sirang;

type CaptureBody<'a, R, E> = Box<dyn FnMut(&Document) -> Result<(Option<Document>, R), E> + 'a>;

/// Turns user functions into [CapturedFn]s that record every call.
///
/// Returned by [Sirang::dstore]. Every function wrapped by one decorator
/// writes to the same collection and draws ids from the same counter.
///
/// # Examples
///
/// ```rust,ignore
/// let decorator = logger.dstore("db", "runs", CaptureOptions::new()
///     .keep(["a", "b"])
///     .id_template("doc-{}"))?;
///
/// let mut f = decorator.wrap(|params: &Document| -> SirangResult<Value> {
///     Ok(params.get("b"))
/// })?;
/// assert_eq!(f.call(doc! { a: 0, b: 1, c: 2, d: 3 })?, Value::I64(1));
/// ```
#[derive(Clone)]
pub struct StoreDecorator {
    target: Arc<CaptureTarget>,
    store_return: bool,
}

struct CaptureTarget {
    logger: Sirang,
    db: String,
    collection: String,
    keep: KeepSpec,
    template: Option<IdTemplate>,
    counter: Mutex<i64>,
}

impl StoreDecorator {
    pub(crate) fn new(
        logger: Sirang,
        db: &str,
        collection: &str,
        options: CaptureOptions,
    ) -> SirangResult<StoreDecorator> {
        let template = options.template().map(IdTemplate::parse).transpose()?;
        Ok(StoreDecorator {
            target: Arc::new(CaptureTarget {
                logger,
                db: db.to_string(),
                collection: collection.to_string(),
                keep: options.keep_spec().clone(),
                template,
                counter: Mutex::new(options.counter_start()),
            }),
            store_return: options.is_store_return(),
        })
    }

    /// Wraps `f`, whose result is returned to the caller and not stored.
    ///
    /// # Errors
    ///
    /// Fails with [ErrorKind::ContractViolation] when the decorator was
    /// configured with `store_return`; use [StoreDecorator::wrap_returning].
    pub fn wrap<'a, F, R, E>(&self, mut f: F) -> SirangResult<CapturedFn<'a, R, E>>
    where
        F: FnMut(&Document) -> Result<R, E> + 'a,
        E: From<SirangError>,
    {
        if self.store_return {
            log::error!("A store_return capture must wrap a function returning extra fields");
            return Err(SirangError::new(
                "A store_return capture must wrap a function returning (extra fields, result)",
                ErrorKind::ContractViolation,
            ));
        }
        Ok(CapturedFn {
            target: self.target.clone(),
            body: Box::new(move |params: &Document| f(params).map(|result| (None, result))),
        })
    }

    /// Wraps `f`, which returns extra fields to store next to the kept
    /// parameters, and its actual result.
    ///
    /// # Errors
    ///
    /// Fails with [ErrorKind::ContractViolation] unless the decorator was
    /// configured with `store_return`.
    pub fn wrap_returning<'a, F, R, E>(&self, mut f: F) -> SirangResult<CapturedFn<'a, R, E>>
    where
        F: FnMut(&Document) -> Result<(Document, R), E> + 'a,
        E: From<SirangError>,
    {
        if !self.store_return {
            log::error!("Only a store_return capture can wrap a function returning extra fields");
            return Err(SirangError::new(
                "Only a store_return capture can wrap a function returning (extra fields, result)",
                ErrorKind::ContractViolation,
            ));
        }
        Ok(CapturedFn {
            target: self.target.clone(),
            body: Box::new(move |params: &Document| {
                f(params).map(|(extra, result)| (Some(extra), result))
            }),
        })
    }

    /// The next counter value substituted into the id template.
    pub fn counter(&self) -> i64 {
        *self.target.counter.lock()
    }

    pub fn template(&self) -> Option<&IdTemplate> {
        self.target.template.as_ref()
    }

    pub fn database_name(&self) -> &str {
        &self.target.db
    }

    pub fn collection_name(&self) -> &str {
        &self.target.collection
    }
}

/// A user function instrumented to record each call.
///
/// A call projects the parameters through the keep set, mints the `_id` from
/// the template when one is bound, runs the user function, merges its extra
/// fields, then inserts the record. When the user function fails nothing is
/// inserted, though the counter has already advanced.
pub struct CapturedFn<'a, R, E> {
    target: Arc<CaptureTarget>,
    body: CaptureBody<'a, R, E>,
}

impl<R, E: From<SirangError>> CapturedFn<'_, R, E> {
    /// Calls the wrapped function with `params` and records the call.
    ///
    /// # Errors
    ///
    /// Returns the user function's error unchanged, or the insert's error
    /// after the user function has run.
    pub fn call(&mut self, params: Document) -> Result<R, E> {
        let mut post = self.target.keep.apply(&params);
        if let Some(template) = &self.target.template {
            let mut counter = self.target.counter.lock();
            let source = identifier::resolve(None, Some((template, &mut *counter)), None)?;
            source.apply(&mut post);
        }

        let (extra, result) = (self.body)(&params)?;
        if let Some(extra) = extra {
            post.merge(&extra);
        }

        self.target
            .logger
            .insert_record(&self.target.db, &self.target.collection, post)?;
        Ok(result)
    }

    /// The next counter value substituted into the id template.
    pub fn counter(&self) -> i64 {
        *self.target.counter.lock()
    }
}
