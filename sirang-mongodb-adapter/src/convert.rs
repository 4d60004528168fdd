use mongodb::bson::oid::ObjectId;
use mongodb::bson::{self, Bson};
use sirang::collection::Document;
use sirang::common::Value;
use sirang::errors::{ErrorKind, SirangError};
use sirang::filter::Filter;
use thiserror::Error;

/// Error converting between sirang values and BSON.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BsonConversionError {
    /// An object id that is not 24 hex digits
    #[error("Invalid object id {0}")]
    InvalidObjectId(String),
    /// A BSON type with no sirang counterpart
    #[error("Unsupported BSON type {0}")]
    UnsupportedType(String),
    /// A document key sirang documents cannot hold
    #[error("Invalid document key: {0}")]
    InvalidKey(String),
}

impl From<BsonConversionError> for SirangError {
    fn from(err: BsonConversionError) -> Self {
        SirangError::new(&err.to_string(), ErrorKind::EncodingError)
    }
}

pub type BsonConversionResult<T> = Result<T, BsonConversionError>;

pub(crate) fn to_bson(value: &Value) -> BsonConversionResult<Bson> {
    Ok(match value {
        Value::Null => Bson::Null,
        Value::Bool(b) => Bson::Boolean(*b),
        Value::I64(i) => Bson::Int64(*i),
        Value::F64(f) => Bson::Double(*f),
        Value::String(s) => Bson::String(s.clone()),
        Value::Array(items) => Bson::Array(items.iter().map(to_bson).collect::<Result<_, _>>()?),
        Value::Document(doc) => Bson::Document(to_bson_document(doc)?),
        Value::ObjectId(hex) => Bson::ObjectId(
            ObjectId::parse_str(hex).map_err(|_| BsonConversionError::InvalidObjectId(hex.clone()))?,
        ),
    })
}

pub(crate) fn from_bson(value: Bson) -> BsonConversionResult<Value> {
    Ok(match value {
        Bson::Null | Bson::Undefined => Value::Null,
        Bson::Boolean(b) => Value::Bool(b),
        Bson::Int32(i) => Value::I64(i as i64),
        Bson::Int64(i) => Value::I64(i),
        Bson::Double(f) => Value::F64(f),
        Bson::String(s) | Bson::Symbol(s) => Value::String(s),
        Bson::Array(items) => {
            Value::Array(items.into_iter().map(from_bson).collect::<Result<_, _>>()?)
        }
        Bson::Document(doc) => Value::Document(from_bson_document(doc)?),
        Bson::ObjectId(oid) => Value::ObjectId(oid.to_hex()),
        Bson::DateTime(dt) => Value::I64(dt.timestamp_millis()),
        other => {
            return Err(BsonConversionError::UnsupportedType(format!(
                "{:?}",
                other.element_type()
            )))
        }
    })
}

pub(crate) fn to_bson_document(doc: &Document) -> BsonConversionResult<bson::Document> {
    let mut result = bson::Document::new();
    for (key, value) in doc.iter() {
        result.insert(key.clone(), to_bson(value)?);
    }
    Ok(result)
}

pub(crate) fn from_bson_document(doc: bson::Document) -> BsonConversionResult<Document> {
    let mut result = Document::new();
    for (key, value) in doc {
        let value = from_bson(value)?;
        result
            .put(key.clone(), value)
            .map_err(|_| BsonConversionError::InvalidKey(key))?;
    }
    Ok(result)
}

/// Renders an equality filter as a MongoDB query document.
pub(crate) fn to_query(filter: &Filter) -> BsonConversionResult<bson::Document> {
    let mut query = bson::Document::new();
    for (field, value) in filter.conditions() {
        query.insert(field.clone(), to_bson(value)?);
    }
    Ok(query)
}
