use crate::collection::Document;
use std::fmt::{Debug, Display, Formatter};

/// Compare an integer and a float for equality.
#[inline]
fn num_eq_mixed(int: i64, float: f64) -> bool {
    float.fract() == 0.0 && (int as f64) == float
}

/// Compare two floats for equality with NaN equal to itself.
#[inline]
fn num_eq_float(a: f64, b: f64) -> bool {
    if a.is_nan() && b.is_nan() {
        true
    } else {
        a == b
    }
}

/// Represents a [Document] value.
///
/// A value is either a scalar ([Value::Bool], [Value::I64], [Value::F64],
/// [Value::String]), a container ([Value::Array], [Value::Document]) or an
/// [Value::ObjectId], the identifier a document store assigns when a document
/// is inserted without an `_id`.
///
/// Numbers compare by magnitude, so `Value::I64(1) == Value::F64(1.0)`, the
/// same way the document store matches them in equality filters.
///
/// # Usage
/// ```text
/// let v1: Value = 42.into();
/// let v2 = Value::from("hello");
/// let doc = doc! { "lr": 0.01, "epochs": 20 };
/// ```
#[derive(Clone, Default, serde::Deserialize, serde::Serialize)]
pub enum Value {
    /// Represents a null value.
    #[default]
    Null,
    /// Represents a boolean value.
    Bool(bool),
    /// Represents an integer value.
    I64(i64),
    /// Represents a floating point value.
    F64(f64),
    /// Represents a string value.
    String(String),
    /// Represents an array value.
    Array(Vec<Value>),
    /// Represents a nested document value.
    Document(Document),
    /// Represents a store-assigned document identifier in its string form.
    ObjectId(String),
}

impl Debug for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(v) => write!(f, "bool({})", v),
            Value::I64(v) => write!(f, "i64({})", v),
            Value::F64(v) => write!(f, "f64({})", v),
            Value::String(v) => write!(f, "string({:?})", v),
            Value::Array(v) => f.debug_list().entries(v.iter()).finish(),
            Value::Document(v) => write!(f, "object({:?})", v),
            Value::ObjectId(v) => write!(f, "object_id({:?})", v),
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(v) => write!(f, "{}", v),
            Value::I64(v) => write!(f, "{}", v),
            Value::F64(v) => write!(f, "{}", v),
            Value::String(v) => write!(f, "\"{}\"", v),
            Value::Array(v) => {
                write!(f, "[")?;
                for (i, item) in v.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Document(v) => write!(f, "{}", v),
            Value::ObjectId(v) => write!(f, "ObjectId(\"{}\")", v),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::I64(a), Value::I64(b)) => a == b,
            (Value::F64(a), Value::F64(b)) => num_eq_float(*a, *b),
            (Value::I64(a), Value::F64(b)) | (Value::F64(b), Value::I64(a)) => {
                num_eq_mixed(*a, *b)
            }
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Document(a), Value::Document(b)) => a == b,
            (Value::ObjectId(a), Value::ObjectId(b)) => a == b,
            _ => false,
        }
    }
}

impl Value {
    /// Creates a value from anything convertible into one.
    #[inline]
    pub fn from<T: Into<Value>>(value: T) -> Value {
        value.into()
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::I64(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the numeric value as a float, widening integers.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::F64(v) => Some(*v),
            Value::I64(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_string(&self) -> Option<&String> {
        match self {
            Value::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_document(&self) -> Option<&Document> {
        match self {
            Value::Document(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_object_id(&self) -> Option<&String> {
        match self {
            Value::ObjectId(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Value::I64(_) | Value::F64(_))
    }

    /// Renders the value the way an inserted id is reported back to callers.
    ///
    /// Strings and object ids render without quotes, numbers in their plain
    /// decimal form, anything else through [Display].
    pub fn to_id_string(&self) -> String {
        match self {
            Value::String(v) => v.clone(),
            Value::ObjectId(v) => v.clone(),
            Value::I64(v) => v.to_string(),
            other => other.to_string(),
        }
    }
}

impl From<bool> for Value {
    #[inline]
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

macro_rules! impl_from_integer {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                #[inline]
                fn from(value: $t) -> Self {
                    Value::I64(value as i64)
                }
            }
        )*
    };
}

impl_from_integer!(i8, u8, i16, u16, i32, u32, i64);

impl From<usize> for Value {
    #[inline]
    fn from(value: usize) -> Self {
        Value::I64(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<u64> for Value {
    #[inline]
    fn from(value: u64) -> Self {
        Value::I64(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<f32> for Value {
    #[inline]
    fn from(value: f32) -> Self {
        Value::F64(value as f64)
    }
}

impl From<f64> for Value {
    #[inline]
    fn from(value: f64) -> Self {
        Value::F64(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<&String> for Value {
    fn from(value: &String) -> Self {
        Value::String(value.clone())
    }
}

impl From<Document> for Value {
    fn from(value: Document) -> Self {
        Value::Document(value)
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}

impl<T> From<Vec<T>> for Value
where
    T: Into<Value>,
{
    fn from(value: Vec<T>) -> Self {
        Value::Array(value.into_iter().map(|v| v.into()).collect())
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Null
    }
}
