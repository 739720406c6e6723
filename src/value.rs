use rust_decimal::Decimal;

use crate::edm::{EnumTypeId, PrimitiveKind, TypeRef};

/// A literal value carried by constant nodes and key segments.
///
/// Temporal and identifier values keep their canonical literal text; the
/// semantic tree never computes with them.
///
/// # Examples
///
/// ```
/// use odata_semantic::ODataValue;
/// use odata_semantic::edm::PrimitiveKind;
///
/// let id = ODataValue::Int32(42);
/// assert_eq!(id.primitive_kind(), Some(PrimitiveKind::Int32));
/// assert_eq!(id.to_literal(), "42");
///
/// let name = ODataValue::String("O'Neil".to_string());
/// assert_eq!(name.to_literal(), "'O''Neil'");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum ODataValue {
    /// `null`
    Null,

    Boolean(bool),

    Int32(i32),

    Int64(i64),

    /// Exact decimal (`Edm.Decimal`)
    Decimal(Decimal),

    Double(f64),

    String(String),

    /// Canonical GUID text
    Guid(String),

    /// `YYYY-MM-DD`
    Date(String),

    /// ISO 8601 timestamp with offset
    DateTimeOffset(String),

    /// ISO 8601 duration, e.g. `P1DT2H`
    Duration(String),

    /// Enum member of the given type, by member name
    Enum {
        type_id: EnumTypeId,
        type_name: String,
        member: String,
    },
}

impl ODataValue {
    /// The primitive kind of this literal, if it is primitive and not null.
    pub fn primitive_kind(&self) -> Option<PrimitiveKind> {
        use ODataValue::*;
        match self {
            Null | Enum { .. } => None,
            Boolean(_) => Some(PrimitiveKind::Boolean),
            Int32(_) => Some(PrimitiveKind::Int32),
            Int64(_) => Some(PrimitiveKind::Int64),
            Decimal(_) => Some(PrimitiveKind::Decimal),
            Double(_) => Some(PrimitiveKind::Double),
            String(_) => Some(PrimitiveKind::String),
            Guid(_) => Some(PrimitiveKind::Guid),
            Date(_) => Some(PrimitiveKind::Date),
            DateTimeOffset(_) => Some(PrimitiveKind::DateTimeOffset),
            Duration(_) => Some(PrimitiveKind::Duration),
        }
    }

    /// The type a constant holding this value resolves to.
    pub fn type_ref(&self) -> Option<TypeRef> {
        match self {
            ODataValue::Null => None,
            ODataValue::Enum { type_id, .. } => Some(TypeRef::enumeration(*type_id, false)),
            other => other
                .primitive_kind()
                .map(|kind| TypeRef::primitive(kind, false)),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ODataValue::Null)
    }

    /// URI literal form, as used in key predicates.
    pub fn to_literal(&self) -> String {
        match self {
            ODataValue::Null => "null".to_string(),
            ODataValue::Boolean(b) => b.to_string(),
            ODataValue::Int32(n) => n.to_string(),
            ODataValue::Int64(n) => n.to_string(),
            ODataValue::Decimal(d) => d.to_string(),
            ODataValue::Double(n) => {
                if n.is_nan() {
                    "NaN".to_string()
                } else if n.is_infinite() {
                    let sign = if *n > 0.0 { "" } else { "-" };
                    format!("{}INF", sign)
                } else {
                    n.to_string()
                }
            }
            ODataValue::String(s) => format!("'{}'", s.replace('\'', "''")),
            ODataValue::Guid(s)
            | ODataValue::Date(s)
            | ODataValue::DateTimeOffset(s) => s.clone(),
            ODataValue::Duration(s) => format!("duration'{}'", s),
            ODataValue::Enum {
                type_name, member, ..
            } => format!("{}'{}'", type_name, member),
        }
    }
}

#[cfg(feature = "json")]
impl ODataValue {
    /// Converts a JSON scalar into a literal.
    ///
    /// Integers that fit 32 bits become `Int32`, larger ones `Int64`; other
    /// numbers become `Double`. Arrays and objects are not literals and yield
    /// `None`.
    pub fn from_json(value: &serde_json::Value) -> Option<ODataValue> {
        match value {
            serde_json::Value::Null => Some(ODataValue::Null),
            serde_json::Value::Bool(b) => Some(ODataValue::Boolean(*b)),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Some(match i32::try_from(i) {
                        Ok(small) => ODataValue::Int32(small),
                        Err(_) => ODataValue::Int64(i),
                    })
                } else {
                    n.as_f64().map(ODataValue::Double)
                }
            }
            serde_json::Value::String(s) => Some(ODataValue::String(s.clone())),
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => None,
        }
    }

    /// JSON representation; decimals are written as strings to keep
    /// precision, enums as their member name.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            ODataValue::Null => serde_json::Value::Null,
            ODataValue::Boolean(b) => serde_json::Value::Bool(*b),
            ODataValue::Int32(n) => serde_json::Value::Number((*n).into()),
            ODataValue::Int64(n) => serde_json::Value::Number((*n).into()),
            ODataValue::Decimal(d) => serde_json::Value::String(d.to_string()),
            ODataValue::Double(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or_else(|| serde_json::Value::String(self.to_literal())),
            ODataValue::String(s)
            | ODataValue::Guid(s)
            | ODataValue::Date(s)
            | ODataValue::DateTimeOffset(s)
            | ODataValue::Duration(s) => serde_json::Value::String(s.clone()),
            ODataValue::Enum { member, .. } => serde_json::Value::String(member.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_literal_forms() {
        assert_eq!(ODataValue::Boolean(true).to_literal(), "true");
        assert_eq!(
            ODataValue::Decimal(Decimal::from_str("12.50").unwrap()).to_literal(),
            "12.50"
        );
        assert_eq!(ODataValue::Double(f64::INFINITY).to_literal(), "INF");
        assert_eq!(
            ODataValue::Duration("P1D".to_string()).to_literal(),
            "duration'P1D'"
        );
        assert_eq!(
            ODataValue::Enum {
                type_id: EnumTypeId(0),
                type_name: "NS.Color".to_string(),
                member: "Red".to_string(),
            }
            .to_literal(),
            "NS.Color'Red'"
        );
    }

    #[test]
    fn test_null_has_no_type() {
        assert_eq!(ODataValue::Null.type_ref(), None);
        assert_eq!(
            ODataValue::Int64(1).type_ref(),
            Some(TypeRef::primitive(PrimitiveKind::Int64, false))
        );
    }

    #[cfg(feature = "json")]
    #[test]
    fn test_json_numbers_pick_smallest_integer() {
        assert_eq!(
            ODataValue::from_json(&serde_json::json!(7)),
            Some(ODataValue::Int32(7))
        );
        assert_eq!(
            ODataValue::from_json(&serde_json::json!(5_000_000_000_i64)),
            Some(ODataValue::Int64(5_000_000_000))
        );
        assert_eq!(
            ODataValue::from_json(&serde_json::json!(1.5)),
            Some(ODataValue::Double(1.5))
        );
        assert_eq!(ODataValue::from_json(&serde_json::json!([1])), None);
    }
}
