use im::OrdMap;
use smallvec::SmallVec;

use crate::common::{Value, DOC_ID};
use crate::errors::{ErrorKind, SirangError, SirangResult};
use std::fmt::{Debug, Display};

type FieldVec = SmallVec<[String; 8]>;

/// A schema-less record: string keys mapped to [Value]s.
///
/// The key `_id` is reserved for the document's identifier within its
/// collection. When a document is inserted without one, the store assigns
/// a [Value::ObjectId].
///
/// Documents are backed by `im::OrdMap`, so cloning is O(1) and a projected
/// copy shares structure with its source. Key order is irrelevant to
/// equality.
#[derive(Clone, PartialEq, Default, serde::Deserialize, serde::Serialize)]
pub struct Document {
    data: OrdMap<String, Value>,
}

impl Document {
    /// Creates a new empty document.
    pub fn new() -> Self {
        Document {
            data: OrdMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Associates the specified [Value] with the specified key.
    ///
    /// If the key already exists its value is replaced.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is empty.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let mut doc = Document::new();
    /// doc.put("lr", 0.01)?;
    /// doc.put("epochs", 20)?;
    /// assert_eq!(doc.size(), 2);
    /// ```
    pub fn put<T: Into<Value>>(&mut self, key: impl Into<String>, value: T) -> SirangResult<()> {
        let key = key.into();
        if key.is_empty() {
            log::error!("Document does not support empty key");
            return Err(SirangError::new(
                "Document does not support empty key",
                ErrorKind::InvalidOperation,
            ));
        }
        self.data.insert(key, value.into());
        Ok(())
    }

    /// Returns the value for `key`, or [Value::Null] when it is absent.
    pub fn get(&self, key: &str) -> Value {
        self.data.get(key).cloned().unwrap_or(Value::Null)
    }

    /// Returns a reference to the value for `key`, if present.
    pub fn get_ref(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// Returns the `_id` of this document, if one has been assigned.
    pub fn id(&self) -> Option<&Value> {
        self.data.get(DOC_ID)
    }

    pub fn has_id(&self) -> bool {
        self.data.contains_key(DOC_ID)
    }

    /// Sets the `_id` of this document, replacing any previous one.
    pub fn set_id(&mut self, id: impl Into<Value>) {
        self.data.insert(DOC_ID.to_string(), id.into());
    }

    /// Removes `key` and returns its previous value.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.data.remove(key)
    }

    /// Returns the keys of this document in sorted order.
    pub fn keys(&self) -> FieldVec {
        self.data.keys().cloned().collect()
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// Copies every entry of `other` into this document.
    ///
    /// Entries of `other` replace existing entries with the same key.
    pub fn merge(&mut self, other: &Document) {
        for (key, value) in other.data.iter() {
            self.data.insert(key.clone(), value.clone());
        }
    }

    /// Returns a new document holding the entries that satisfy `predicate`.
    ///
    /// Values are shared with this document, not deep-copied.
    pub fn retain_keys<P: Fn(&str) -> bool>(&self, predicate: P) -> Document {
        let data = self
            .data
            .iter()
            .filter(|(key, _)| predicate(key))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        Document { data }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.data.iter()
    }
}

impl IntoIterator for Document {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.data
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect::<Vec<_>>()
            .into_iter()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Document {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let data = iter
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Document { data }
    }
}

impl Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.data.iter()).finish()
    }
}

impl Display for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{")?;
        for (i, (key, value)) in self.data.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "\"{}\": {}", key, value)?;
        }
        write!(f, "}}")
    }
}

#[doc(hidden)]
pub fn normalize(value: &str) -> String {
    value.trim_matches('"').to_string()
}

/// Creates a [Document] with JSON-like syntax.
///
/// Keys may be bare identifiers or string literals.
///
/// ```rust
/// use sirang::doc;
///
/// let run = doc!{
///     "num-of-samples": 1000,
///     location: 0.0,
///     tags: ["cauchy", "mean"],
///     solver: { name: "nelder-mead", tol: 1e-6 }
/// };
/// assert_eq!(run.size(), 4);
/// ```
#[macro_export]
macro_rules! doc {
    () => {
        $crate::collection::Document::new()
    };

    ($($key:tt : $value:tt),* $(,)?) => {
        {
            #[allow(unused_imports)]
            use $crate::doc_value;

            let mut doc = $crate::collection::Document::new();
            $(
                doc.put($crate::collection::normalize(stringify!($key)), $crate::doc_value!($value))
                .expect(&format!("Failed to put value {} in document", stringify!($value)));
            )*
            doc
        }
    };
}

/// Helper macro to convert values for the doc! macro.
/// Handles nested documents, arrays, and expressions.
#[macro_export]
macro_rules! doc_value {
    // match a nested document
    ({ $($key:tt : $value:tt),* $(,)? }) => {
        {
            $crate::common::Value::Document($crate::doc!{ $($key : $value),* })
        }
    };

    // match an array of values
    ([ $($value:tt),* $(,)? ]) => {
        $crate::common::Value::Array(vec![$($crate::doc_value!($value)),*])
    };

    ($value:expr) => {
        $crate::common::Value::from($value)
    };
}
