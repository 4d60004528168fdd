use crate::collection::Document;
use std::collections::BTreeSet;

/// Projects `raw` through a keep set.
///
/// The output holds key `k` iff `keep` contains `k` XOR `inversion`. Values
/// are passed through untouched.
///
/// ```rust,ignore
/// let raw = doc! { x: 0, y: 1 };
/// let keep = BTreeSet::from(["x".to_string()]);
/// assert_eq!(project(&raw, &keep, true), doc! { y: 1 });
/// ```
pub fn project(raw: &Document, keep: &BTreeSet<String>, inversion: bool) -> Document {
    raw.retain_keys(|key| keep.contains(key) != inversion)
}

/// A keep set plus an inversion flag.
///
/// With no keep set, the keep set defaults to the projected document's own
/// keys: everything is kept, or nothing when `inversion` is set.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeepSpec {
    keep: Option<BTreeSet<String>>,
    inversion: bool,
}

impl KeepSpec {
    /// Keeps every key.
    pub fn all() -> Self {
        KeepSpec::default()
    }

    /// Keeps exactly the given keys, or every other key when `inversion` is set.
    pub fn new<I, S>(keys: I, inversion: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        KeepSpec {
            keep: Some(keys.into_iter().map(Into::into).collect()),
            inversion,
        }
    }

    /// Keeps every key except the given ones.
    pub fn except<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        KeepSpec::new(keys, true)
    }

    pub(crate) fn set_keys<I, S>(&mut self, keys: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keep = Some(keys.into_iter().map(Into::into).collect());
    }

    pub(crate) fn set_inversion(&mut self, inversion: bool) {
        self.inversion = inversion;
    }

    pub fn keys(&self) -> Option<&BTreeSet<String>> {
        self.keep.as_ref()
    }

    pub fn is_inverted(&self) -> bool {
        self.inversion
    }

    /// Applies this keep-spec to `raw`.
    pub fn apply(&self, raw: &Document) -> Document {
        match &self.keep {
            Some(keep) => project(raw, keep, self.inversion),
            None if self.inversion => Document::new(),
            None => raw.clone(),
        }
    }
}
