//! Variable values held in the pipeline environment.
//!
//! Values arrive as loosely typed JSON and are decoded once into [`VarValue`].
//! Stages never inspect raw JSON: interpolation goes through
//! [`VarValue::render`], comparison through [`VarValue::unwrap_typed`] and
//! [`Scalar`], and truthiness through [`VarValue::is_truthy`].

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

/// The variable environment: variable name to current value.
///
/// Iterated in ascending name order.
pub type Variables = BTreeMap<String, VarValue>;

/// A single scalar value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl Scalar {
    /// Numeric view used for mixed comparisons. Booleans count as 0/1.
    fn as_number(&self) -> Option<f64> {
        match self {
            Scalar::Int(i) => Some(*i as f64),
            Scalar::Float(f) => Some(*f),
            Scalar::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Scalar::Text(_) | Scalar::Null => None,
        }
    }

    /// Ordering between two scalars, or `None` when the kinds cannot be ordered
    /// (text against a number, anything against null, or a NaN operand).
    pub fn partial_order(&self, other: &Scalar) -> Option<Ordering> {
        match (self, other) {
            (Scalar::Int(a), Scalar::Int(b)) => Some(a.cmp(b)),
            (Scalar::Text(a), Scalar::Text(b)) => Some(a.cmp(b)),
            _ => {
                let a = self.as_number()?;
                let b = other.as_number()?;
                a.partial_cmp(&b)
            }
        }
    }

    /// Equality with numeric widening. Incompatible kinds are never equal.
    pub fn loosely_equals(&self, other: &Scalar) -> bool {
        match (self, other) {
            (Scalar::Null, Scalar::Null) => true,
            (Scalar::Text(a), Scalar::Text(b)) => a == b,
            (Scalar::Int(a), Scalar::Int(b)) => a == b,
            _ => match (self.as_number(), other.as_number()) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
        }
    }

    pub fn is_numeric(&self) -> bool {
        self.as_number().is_some()
    }

    /// Short name of the scalar kind, used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Scalar::Text(_) => "text",
            Scalar::Int(_) => "integer",
            Scalar::Float(_) => "float",
            Scalar::Bool(_) => "boolean",
            Scalar::Null => "null",
        }
    }

    fn is_truthy(&self) -> bool {
        match self {
            Scalar::Text(s) => !s.is_empty(),
            Scalar::Int(i) => *i != 0,
            Scalar::Float(f) => *f != 0.0,
            Scalar::Bool(b) => *b,
            Scalar::Null => false,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Text(s) => f.write_str(s),
            Scalar::Int(i) => write!(f, "{}", i),
            Scalar::Float(x) => f.write_str(&format_float(*x)),
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Null => Ok(()),
        }
    }
}

/// Format a float the way prompt weights are written: shortest round-trip
/// form, with `.0` kept on integral values (`2.0`, `0.5`, `1.25`).
pub fn format_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

/// A value in the variable environment.
#[derive(Debug, Clone, PartialEq)]
pub enum VarValue {
    /// A plain scalar.
    Scalar(Scalar),
    /// A comma-delimited string read as an ordered list of options.
    OptionList {
        /// The original text, interpolated verbatim when no option is selected.
        raw: String,
        /// Comma-split, whitespace-trimmed options.
        options: Vec<String>,
    },
    /// A record carrying an explicit `type` tag and an inner `value`.
    Typed { kind: String, value: Box<VarValue> },
    /// Arrays and records without `type`/`value`.
    Other(Value),
}

impl VarValue {
    /// Build a text value, classifying comma-delimited strings as option lists.
    pub fn text(s: impl Into<String>) -> Self {
        let s = s.into();
        if s.contains(',') {
            let options = split_options(&s);
            VarValue::OptionList { raw: s, options }
        } else {
            VarValue::Scalar(Scalar::Text(s))
        }
    }

    /// Build a value that is never treated as an option list.
    pub fn literal(s: impl Into<String>) -> Self {
        VarValue::Scalar(Scalar::Text(s.into()))
    }

    pub fn int(i: i64) -> Self {
        VarValue::Scalar(Scalar::Int(i))
    }

    pub fn float(f: f64) -> Self {
        VarValue::Scalar(Scalar::Float(f))
    }

    pub fn bool(b: bool) -> Self {
        VarValue::Scalar(Scalar::Bool(b))
    }

    /// Decode a JSON value.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => VarValue::Scalar(Scalar::Null),
            Value::Bool(b) => VarValue::bool(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => VarValue::int(i),
                None => VarValue::float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => VarValue::text(s.as_str()),
            Value::Object(map) => match (map.get("type"), map.get("value")) {
                (Some(kind), Some(inner)) => VarValue::Typed {
                    kind: kind
                        .as_str()
                        .map(str::to_string)
                        .unwrap_or_else(|| kind.to_string()),
                    value: Box::new(VarValue::from_json(inner)),
                },
                _ => VarValue::Other(value.clone()),
            },
            Value::Array(_) => VarValue::Other(value.clone()),
        }
    }

    /// Encode back to JSON.
    pub fn to_json(&self) -> Value {
        match self {
            VarValue::Scalar(Scalar::Text(s)) => Value::String(s.clone()),
            VarValue::Scalar(Scalar::Int(i)) => Value::from(*i),
            VarValue::Scalar(Scalar::Float(f)) => serde_json::Number::from_f64(*f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            VarValue::Scalar(Scalar::Bool(b)) => Value::Bool(*b),
            VarValue::Scalar(Scalar::Null) => Value::Null,
            VarValue::OptionList { raw, .. } => Value::String(raw.clone()),
            VarValue::Typed { kind, value } => {
                let mut map = serde_json::Map::new();
                map.insert("type".to_string(), Value::String(kind.clone()));
                map.insert("value".to_string(), value.to_json());
                Value::Object(map)
            }
            VarValue::Other(v) => v.clone(),
        }
    }

    /// Strip `Typed` wrappers down to the value that is compared.
    pub fn unwrap_typed(&self) -> &VarValue {
        let mut current = self;
        while let VarValue::Typed { value, .. } = current {
            current = value;
        }
        current
    }

    /// The scalar used for comparisons, if the unwrapped value has one.
    ///
    /// Option lists compare as their raw text.
    pub fn comparable(&self) -> Option<Scalar> {
        match self.unwrap_typed() {
            VarValue::Scalar(s) => Some(s.clone()),
            VarValue::OptionList { raw, .. } => Some(Scalar::Text(raw.clone())),
            VarValue::Typed { .. } | VarValue::Other(_) => None,
        }
    }

    /// Truthiness used by bare `{if:name:...}` conditions.
    pub fn is_truthy(&self) -> bool {
        match self.unwrap_typed() {
            VarValue::Scalar(s) => s.is_truthy(),
            VarValue::OptionList { raw, .. } => !raw.is_empty(),
            VarValue::Other(Value::Array(a)) => !a.is_empty(),
            VarValue::Other(Value::Object(o)) => !o.is_empty(),
            VarValue::Other(_) => true,
            VarValue::Typed { .. } => true,
        }
    }

    /// The options of an option list, if this is one.
    pub fn options(&self) -> Option<&[String]> {
        match self {
            VarValue::OptionList { options, .. } => Some(options),
            _ => None,
        }
    }

    /// The string form interpolated into prompts.
    pub fn render(&self) -> String {
        match self {
            VarValue::Scalar(s) => s.to_string(),
            VarValue::OptionList { raw, .. } => raw.clone(),
            VarValue::Typed { value, .. } => value.render(),
            VarValue::Other(v) => v.to_string(),
        }
    }
}

impl fmt::Display for VarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl From<&str> for VarValue {
    fn from(s: &str) -> Self {
        VarValue::text(s)
    }
}

impl From<String> for VarValue {
    fn from(s: String) -> Self {
        VarValue::text(s)
    }
}

impl From<i64> for VarValue {
    fn from(i: i64) -> Self {
        VarValue::int(i)
    }
}

impl From<f64> for VarValue {
    fn from(f: f64) -> Self {
        VarValue::float(f)
    }
}

impl From<bool> for VarValue {
    fn from(b: bool) -> Self {
        VarValue::bool(b)
    }
}

impl Serialize for VarValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for VarValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(VarValue::from_json(&value))
    }
}

/// Split a comma-delimited option string, trimming each option.
pub fn split_options(raw: &str) -> Vec<String> {
    raw.split(',').map(|opt| opt.trim().to_string()).collect()
}

/// Decode a JSON object into a variable environment.
///
/// Non-object input yields an empty environment.
pub fn variables_from_json(value: &Value) -> Variables {
    match value {
        Value::Object(map) => map
            .iter()
            .map(|(k, v)| (k.clone(), VarValue::from_json(v)))
            .collect(),
        _ => Variables::new(),
    }
}

/// Helper to create a variable environment from key-value pairs.
pub fn vars<I, K, V>(pairs: I) -> Variables
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<VarValue>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}
