use crate::common::Value;

use super::Filter;

/// Creates a fluent filter builder for the specified field name.
///
/// ```rust,ignore
/// let filter = field("test").eq("x").and(field("unique").eq(1));
/// ```
pub fn field(field_name: &str) -> FluentFilter {
    FluentFilter {
        field_name: field_name.to_string(),
    }
}

/// A fluent builder for constructing filters on a specific field.
pub struct FluentFilter {
    field_name: String,
}

impl FluentFilter {
    /// Creates a filter that matches documents where the field equals `value`.
    #[inline]
    pub fn eq<T: Into<Value>>(self, value: T) -> Filter {
        Filter::equals(self.field_name, value.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc;

    #[test]
    fn field_eq_builds_single_condition() {
        let filter = field("unique").eq(1);
        assert_eq!(filter.conditions(), &[("unique".to_string(), Value::I64(1))]);
        assert!(filter.apply(&doc! { unique: 1 }));
    }

    #[test]
    fn fluent_and_matches_document_filter() {
        let fluent = field("test").eq("x").and(field("unique").eq(1));
        let from_doc = Filter::from(doc! { test: "x", unique: 1 });
        let doc = doc! { test: "x", unique: 1 };
        assert_eq!(fluent.apply(&doc), from_doc.apply(&doc));
    }
}
