//! Declarative field descriptors
//!
//! A resource type declares its attributes as a static slice of
//! [`FieldSpec`]s. One generic routine, [`parse_fields`], interprets such a
//! schema against a JSON document. Descriptors hold no state and can be
//! evaluated against any number of documents.

use serde_json::Value;
use std::collections::BTreeMap;

use crate::error::{Error, Result};

/// How the JSON found at a field's path is interpreted
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    String,
    Integer,
    Float,
    Bool,
    StringList,
    /// Array of `{"@odata.id": ...}` objects
    Links,
    /// Untouched JSON
    Raw,
    /// Nested object resolved against its own sub-schema
    Composite(&'static [FieldSpec]),
    /// Array of nested objects sharing one sub-schema
    List(&'static [FieldSpec]),
    /// Object keyed by arbitrary names, every value sharing one sub-schema
    Map(&'static [FieldSpec]),
}

/// One declared attribute: a name, a key path into the document, and a kind
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub path: &'static [&'static str],
    pub required: bool,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub const fn new(name: &'static str, path: &'static [&'static str], kind: FieldKind) -> Self {
        Self {
            name,
            path,
            required: false,
            kind,
        }
    }

    pub const fn required(self) -> Self {
        Self {
            required: true,
            ..self
        }
    }

    /// The key path joined with `/`, as reported in errors
    pub fn attribute(&self) -> String {
        self.path.join("/")
    }

    /// Walk the key path.
    ///
    /// A missing key, a non-object intermediate or a JSON `null` all yield
    /// `None`.
    pub fn lookup<'a>(&self, doc: &'a Value) -> Option<&'a Value> {
        let mut current = doc;
        for key in self.path {
            current = current.as_object()?.get(*key)?;
        }
        (!current.is_null()).then_some(current)
    }

    /// Resolve this field against `doc`.
    ///
    /// An absent value is never an error here; required-ness is enforced
    /// when the value is accessed. A present value of the wrong JSON type is
    /// reported as malformed.
    pub fn resolve(&self, doc: &Value, resource: &str) -> Result<FieldValue> {
        let Some(raw) = self.lookup(doc) else {
            return Ok(FieldValue::Absent);
        };
        let malformed = |expected: &'static str| Error::MalformedAttribute {
            attribute: self.attribute(),
            resource: resource.to_string(),
            expected,
        };

        let value = match self.kind {
            FieldKind::String => FieldValue::String(
                raw.as_str().ok_or_else(|| malformed("a string"))?.to_string(),
            ),
            FieldKind::Integer => {
                FieldValue::Integer(lenient_integer(raw).ok_or_else(|| malformed("an integer"))?)
            }
            FieldKind::Float => FieldValue::Float(raw.as_f64().ok_or_else(|| malformed("a number"))?),
            FieldKind::Bool => FieldValue::Bool(raw.as_bool().ok_or_else(|| malformed("a boolean"))?),
            FieldKind::StringList => {
                let items = raw.as_array().ok_or_else(|| malformed("an array of strings"))?;
                let strings = items
                    .iter()
                    .map(|item| item.as_str().map(str::to_string))
                    .collect::<Option<Vec<_>>>()
                    .ok_or_else(|| malformed("an array of strings"))?;
                FieldValue::StringList(strings)
            }
            FieldKind::Links => {
                let items = raw.as_array().ok_or_else(|| malformed("an array of links"))?;
                let links = items
                    .iter()
                    .map(|item| item.get("@odata.id").and_then(Value::as_str).map(str::to_string))
                    .collect::<Option<Vec<_>>>()
                    .ok_or_else(|| malformed("an array of links"))?;
                FieldValue::Links(links)
            }
            FieldKind::Raw => FieldValue::Raw(raw.clone()),
            FieldKind::Composite(fields) => {
                if !raw.is_object() {
                    return Err(malformed("an object"));
                }
                FieldValue::Composite(parse_fields(fields, raw, resource)?)
            }
            FieldKind::List(fields) => {
                let items = raw.as_array().ok_or_else(|| malformed("an array of objects"))?;
                let parsed = items
                    .iter()
                    .map(|item| parse_fields(fields, item, resource))
                    .collect::<Result<Vec<_>>>()?;
                FieldValue::List(parsed)
            }
            FieldKind::Map(fields) => {
                let entries = raw.as_object().ok_or_else(|| malformed("an object"))?;
                let mut parsed = BTreeMap::new();
                for (key, item) in entries {
                    parsed.insert(key.clone(), parse_fields(fields, item, resource)?);
                }
                FieldValue::Map(parsed)
            }
        };

        Ok(value)
    }
}

/// An integer, a whole-number float or a numeric string
fn lenient_integer(raw: &Value) -> Option<i64> {
    if let Some(value) = raw.as_i64() {
        return Some(value);
    }
    let whole = |value: f64| {
        (value.is_finite() && value.fract() == 0.0 && value.abs() < i64::MAX as f64).then_some(value as i64)
    };
    if let Some(value) = raw.as_f64() {
        return whole(value);
    }
    let text = raw.as_str()?.trim();
    text.parse::<i64>()
        .ok()
        .or_else(|| text.parse::<f64>().ok().and_then(whole))
}

/// A resolved attribute value
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Absent,
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    StringList(Vec<String>),
    Links(Vec<String>),
    Raw(Value),
    Composite(Attributes),
    List(Vec<Attributes>),
    Map(BTreeMap<String, Attributes>),
}

impl FieldValue {
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

/// Materialized values of one schema, in declaration order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attributes {
    values: Vec<(&'static FieldSpec, FieldValue)>,
}

impl Attributes {
    pub fn spec(&self, name: &str) -> Option<&'static FieldSpec> {
        self.values
            .iter()
            .find(|(spec, _)| spec.name == name)
            .map(|(spec, _)| *spec)
    }

    /// The value of a declared field, `None` if `name` is not declared
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values
            .iter()
            .find(|(spec, _)| spec.name == name)
            .map(|(_, value)| value)
    }

    /// Access a field, enforcing its `required` flag.
    ///
    /// An undeclared name is reported as missing as well.
    pub fn require(&self, name: &str, resource: &str) -> Result<&FieldValue> {
        let Some((spec, value)) = self.values.iter().find(|(spec, _)| spec.name == name) else {
            return Err(Error::missing_attribute(name, resource));
        };
        if spec.required && value.is_absent() {
            return Err(Error::missing_attribute(spec.attribute(), resource));
        }
        Ok(value)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.values.iter().map(|(spec, _)| spec.name)
    }

    pub fn str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(FieldValue::as_str)
    }

    pub fn int(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(FieldValue::as_i64)
    }

    pub fn float(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(FieldValue::as_f64)
    }

    pub fn bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(FieldValue::as_bool)
    }

    pub fn strings(&self, name: &str) -> &[String] {
        match self.get(name) {
            Some(FieldValue::StringList(items)) => items,
            _ => &[],
        }
    }

    pub fn links(&self, name: &str) -> &[String] {
        match self.get(name) {
            Some(FieldValue::Links(items)) => items,
            _ => &[],
        }
    }

    pub fn composite(&self, name: &str) -> Option<&Attributes> {
        match self.get(name) {
            Some(FieldValue::Composite(nested)) => Some(nested),
            _ => None,
        }
    }

    pub fn list(&self, name: &str) -> &[Attributes] {
        match self.get(name) {
            Some(FieldValue::List(items)) => items,
            _ => &[],
        }
    }

    pub fn map(&self, name: &str) -> Option<&BTreeMap<String, Attributes>> {
        match self.get(name) {
            Some(FieldValue::Map(entries)) => Some(entries),
            _ => None,
        }
    }

    pub fn raw(&self, name: &str) -> Option<&Value> {
        match self.get(name) {
            Some(FieldValue::Raw(value)) => Some(value),
            _ => None,
        }
    }
}

/// Materialize every field of `schema` against `doc`; composites recurse
pub fn parse_fields(schema: &'static [FieldSpec], doc: &Value, resource: &str) -> Result<Attributes> {
    let values = schema
        .iter()
        .map(|spec| Ok((spec, spec.resolve(doc, resource)?)))
        .collect::<Result<Vec<_>>>()?;
    Ok(Attributes { values })
}

/// Like [`parse_fields`], but a field that fails to resolve reads as absent
/// instead of failing the whole schema. The first failure is returned
/// alongside.
pub fn parse_fields_lenient(
    schema: &'static [FieldSpec],
    doc: &Value,
    resource: &str,
) -> (Attributes, Option<Error>) {
    let mut first_error = None;
    let values = schema
        .iter()
        .map(|spec| match spec.resolve(doc, resource) {
            Ok(value) => (spec, value),
            Err(e) => {
                first_error.get_or_insert(e);
                (spec, FieldValue::Absent)
            }
        })
        .collect();
    (Attributes { values }, first_error)
}
