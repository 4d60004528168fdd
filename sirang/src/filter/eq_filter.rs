use itertools::Itertools;
use std::fmt::{Display, Formatter};

use crate::collection::Document;
use crate::common::{Value, DOC_ID};

/// A conjunction of field equality conditions.
///
/// A document matches when every condition's field is present in the
/// document and equal to the condition's value. A filter without conditions
/// matches every document.
///
/// Equality is [Value] equality, so `1` matches `1.0`. A missing field never
/// matches, not even a condition on [Value::Null].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<(String, Value)>,
}

impl Filter {
    pub(crate) fn equals(field_name: String, value: Value) -> Self {
        Filter {
            conditions: vec![(field_name, value)],
        }
    }

    /// Combines two filters; the result matches documents matching both.
    pub fn and(mut self, other: Filter) -> Filter {
        self.conditions.extend(other.conditions);
        self
    }

    /// Evaluates this filter against `doc`.
    pub fn apply(&self, doc: &Document) -> bool {
        self.conditions
            .iter()
            .all(|(field, value)| doc.get_ref(field).is_some_and(|actual| actual == value))
    }

    pub fn conditions(&self) -> &[(String, Value)] {
        &self.conditions
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Returns the value this filter requires for `_id`, if it constrains it.
    pub fn id_constraint(&self) -> Option<&Value> {
        self.conditions
            .iter()
            .find(|(field, _)| field == DOC_ID)
            .map(|(_, value)| value)
    }
}

impl From<Document> for Filter {
    fn from(doc: Document) -> Self {
        Filter {
            conditions: doc.into_iter().collect(),
        }
    }
}

impl From<&Document> for Filter {
    fn from(doc: &Document) -> Self {
        Filter::from(doc.clone())
    }
}

impl Display for Filter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.conditions.is_empty() {
            return write!(f, "AllFilter");
        }
        let joined = self
            .conditions
            .iter()
            .map(|(field, value)| format!("{} == {}", field, value))
            .join(" && ");
        write!(f, "({})", joined)
    }
}

/// Creates a filter that matches all documents.
pub fn all() -> Filter {
    Filter::default()
}

/// Creates a filter that matches the document with the given `_id`.
pub fn by_id<T: Into<Value>>(id: T) -> Filter {
    Filter::equals(DOC_ID.to_string(), id.into())
}
