use crate::common::KeepSpec;

/// Settings of a capture wrapper, fixed when [crate::Sirang::dstore] is
/// called.
///
/// # Examples
///
/// ```rust,ignore
/// let options = CaptureOptions::new()
///     .keep(["lr", "epochs"])
///     .store_return(true)
///     .id_template("run-{:03}")
///     .id_counter(1);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CaptureOptions {
    keep: KeepSpec,
    store_return: bool,
    id_template: Option<String>,
    id_counter: i64,
}

impl CaptureOptions {
    pub fn new() -> Self {
        CaptureOptions::default()
    }

    /// Sets the parameter names to keep. Without it every parameter is kept.
    pub fn keep<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keep.set_keys(keys);
        self
    }

    /// Keeps every parameter not listed in `keep` instead.
    pub fn inversion(mut self, inversion: bool) -> Self {
        self.keep.set_inversion(inversion);
        self
    }

    /// Expects the wrapped function to return extra fields alongside its
    /// result. Such functions are wrapped with
    /// [crate::capture::StoreDecorator::wrap_returning].
    pub fn store_return(mut self, store_return: bool) -> Self {
        self.store_return = store_return;
        self
    }

    /// Mints each record's `_id` from `template`, e.g. `"run-{}"`.
    pub fn id_template(mut self, template: &str) -> Self {
        self.id_template = Some(template.to_string());
        self
    }

    /// First counter value substituted into the id template. Defaults to 0.
    pub fn id_counter(mut self, start: i64) -> Self {
        self.id_counter = start;
        self
    }

    pub fn keep_spec(&self) -> &KeepSpec {
        &self.keep
    }

    pub fn is_store_return(&self) -> bool {
        self.store_return
    }

    pub fn template(&self) -> Option<&str> {
        self.id_template.as_deref()
    }

    pub fn counter_start(&self) -> i64 {
        self.id_counter
    }
}
