use crate::common::{KeepSpec, Value};

/// Options for a single [crate::sirang::Sirang::store] call.
///
/// By default every key of the raw document is kept and the `_id` is left to
/// the document itself or the store.
///
/// # Examples
///
/// ```rust,ignore
/// use sirang::collection::StoreOptions;
///
/// // Keep only the learning rate, under an explicit id
/// let options = StoreOptions::new().keep(["lr"]).doc_id("run-1");
///
/// // Keep everything except the random seed
/// let options = StoreOptions::new().keep(["seed"]).inversion(true);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StoreOptions {
    keep: KeepSpec,
    doc_id: Option<Value>,
}

impl StoreOptions {
    pub fn new() -> Self {
        StoreOptions::default()
    }

    /// Sets the keys to keep.
    pub fn keep<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keep.set_keys(keys);
        self
    }

    /// Inverts the keep set: keep every key not listed.
    pub fn inversion(mut self, inversion: bool) -> Self {
        self.keep.set_inversion(inversion);
        self
    }

    /// Sets an explicit `_id`, overriding any `_id` in the raw document.
    pub fn doc_id(mut self, doc_id: impl Into<Value>) -> Self {
        self.doc_id = Some(doc_id.into());
        self
    }

    pub fn keep_spec(&self) -> &KeepSpec {
        &self.keep
    }

    pub fn explicit_id(&self) -> Option<&Value> {
        self.doc_id.as_ref()
    }

    pub(crate) fn into_parts(self) -> (KeepSpec, Option<Value>) {
        (self.keep, self.doc_id)
    }
}

/// Creates `StoreOptions` keeping only `keys`.
pub fn keep_only<I, S>(keys: I) -> StoreOptions
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    StoreOptions::new().keep(keys)
}

/// Creates `StoreOptions` keeping every key except `keys`.
pub fn keep_all_except<I, S>(keys: I) -> StoreOptions
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    StoreOptions::new().keep(keys).inversion(true)
}
