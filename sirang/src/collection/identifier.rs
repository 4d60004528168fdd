use crate::collection::{Document, IdTemplate};
use crate::common::Value;
use crate::errors::{ErrorKind, SirangError, SirangResult};

/// The origin of the `_id` given to a document about to be inserted.
#[derive(Clone, Debug, PartialEq)]
pub enum IdSource {
    /// The caller supplied the id.
    Explicit(Value),
    /// The id was minted from an id template and counter.
    Templated(String),
    /// The id is the collection's document count plus one.
    Counted(i64),
    /// No id was resolved; the store generates one on insert.
    StoreAssigned,
}

impl IdSource {
    /// Returns the resolved id, or `None` when the store will generate it.
    pub fn value(&self) -> Option<Value> {
        match self {
            IdSource::Explicit(value) => Some(value.clone()),
            IdSource::Templated(id) => Some(Value::String(id.clone())),
            IdSource::Counted(count) => Some(Value::I64(*count)),
            IdSource::StoreAssigned => None,
        }
    }

    /// Writes the resolved id into `doc`.
    ///
    /// [IdSource::StoreAssigned] leaves `doc` untouched, so an `_id` already
    /// present in the document is kept.
    pub(crate) fn apply(&self, doc: &mut Document) {
        if let Some(id) = self.value() {
            doc.set_id(id);
        }
    }
}

/// Resolves the `_id` for one insert.
///
/// The first applicable rule wins: an explicit id, then a bound template
/// (the counter is substituted, then incremented), then the count fallback
/// (`count + 1`), then the store.
///
/// `count_fallback` is only invoked when the earlier rules do not apply.
pub(crate) fn resolve(
    explicit: Option<Value>,
    template: Option<(&IdTemplate, &mut i64)>,
    count_fallback: Option<&dyn Fn() -> SirangResult<u64>>,
) -> SirangResult<IdSource> {
    if let Some(id) = explicit {
        return Ok(IdSource::Explicit(id));
    }

    if let Some((template, counter)) = template {
        let next = counter.checked_add(1).ok_or_else(|| {
            log::error!("Id counter exhausted at {}", counter);
            SirangError::new(
                &format!("Id counter exhausted at {}", counter),
                ErrorKind::InvalidOperation,
            )
        })?;
        let id = template.format(*counter);
        *counter = next;
        return Ok(IdSource::Templated(id));
    }

    if let Some(count) = count_fallback {
        let next = i64::try_from(count()?).unwrap_or(i64::MAX - 1) + 1;
        return Ok(IdSource::Counted(next));
    }

    Ok(IdSource::StoreAssigned)
}
