//! Dynamically-typed values returned by script execution.
//!
//! The node answers with JSON-Cadence, a self-describing encoding where every
//! value carries its Cadence type tag. [`RawValue`] is the closed set of shapes
//! this crate understands; kinds it does not model are kept verbatim as
//! [`RawValue::Opaque`] so nothing is silently dropped.

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::{
    basic_elements::serializers::{format_fixed_point, parse_fixed_point, parse_integer},
    constants::{FIX64_SCALE, FIX128_SCALE},
    error::{Error, Result},
    types::FlowAddress,
};

const INTEGER_TYPES: &[&str] = &[
    "Int", "Int8", "Int16", "Int32", "Int64", "Int128", "Int256", "UInt", "UInt8", "UInt16",
    "UInt32", "UInt64", "UInt128", "UInt256", "Word8", "Word16", "Word32", "Word64", "Word128",
    "Word256",
];

const COMPOSITE_KINDS: &[&str] = &["Struct", "Resource", "Event", "Contract", "Enum"];

/// A Cadence static type as reported by the node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDescriptor {
    pub kind: String,
    pub id: String,
}

impl TypeDescriptor {
    /// Parses the `staticType` payload of a `Type` value. An empty string
    /// stands for "no type".
    pub fn from_json(json: &Value) -> Result<Option<Self>> {
        match json {
            Value::String(s) if s.is_empty() => Ok(None),
            // Recursive types are encoded by reference to an already seen ID
            Value::String(s) => Ok(Some(TypeDescriptor {
                kind: "TypeID".to_string(),
                id: s.clone(),
            })),
            Value::Object(obj) => {
                let kind = obj
                    .get("kind")
                    .and_then(Value::as_str)
                    .ok_or_else(|| Error::decode("type object without kind"))?
                    .to_string();
                let id = render_type_id(&kind, obj)?;
                Ok(Some(TypeDescriptor { kind, id }))
            }
            Value::Null => Ok(None),
            other => Err(Error::decode(format!("unexpected static type {other}"))),
        }
    }
}

impl Serialize for TypeDescriptor {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.id)
    }
}

fn nested_type_id(obj: &Map<String, Value>, key: &str) -> Result<String> {
    match obj.get(key) {
        Some(inner) => Ok(TypeDescriptor::from_json(inner)?
            .map(|t| t.id)
            .unwrap_or_default()),
        None => Ok(String::new()),
    }
}

fn render_type_id(kind: &str, obj: &Map<String, Value>) -> Result<String> {
    if let Some(id) = obj.get("typeID").and_then(Value::as_str) {
        if !id.is_empty() {
            return Ok(id.to_string());
        }
    }

    let rendered = match kind {
        "Optional" => format!("{}?", nested_type_id(obj, "type")?),
        "VariableSizedArray" => format!("[{}]", nested_type_id(obj, "type")?),
        "ConstantSizedArray" => {
            let size = obj.get("size").and_then(Value::as_u64).unwrap_or_default();
            format!("[{}; {}]", nested_type_id(obj, "type")?, size)
        }
        "Dictionary" => format!(
            "{{{}: {}}}",
            nested_type_id(obj, "key")?,
            nested_type_id(obj, "value")?
        ),
        "Reference" => format!("&{}", nested_type_id(obj, "type")?),
        "Capability" => {
            let inner = nested_type_id(obj, "type")?;
            if inner.is_empty() {
                "Capability".to_string()
            } else {
                format!("Capability<{inner}>")
            }
        }
        "Intersection" | "Restriction" => {
            let mut ids = Vec::new();
            for member in obj
                .get("types")
                .and_then(Value::as_array)
                .map(Vec::as_slice)
                .unwrap_or_default()
            {
                if let Some(t) = TypeDescriptor::from_json(member)? {
                    ids.push(t.id);
                }
            }
            format!("{{{}}}", ids.join(", "))
        }
        other => other.to_string(),
    };
    Ok(rendered)
}

/// Fixed-point number kept as its raw integer magnitude plus implicit scale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedPoint {
    pub type_id: String,
    pub negative: bool,
    pub raw: String,
    pub scale: usize,
}

impl FixedPoint {
    pub fn to_decimal(&self) -> Result<String> {
        let unsigned = format_fixed_point(&self.raw, self.scale)?;
        Ok(if self.negative {
            format!("-{unsigned}")
        } else {
            unsigned
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Void,
    Bool(bool),
    Number {
        type_id: String,
        negative: bool,
        digits: String,
    },
    FixedPoint(FixedPoint),
    String(String),
    Address(FlowAddress),
    Path {
        domain: String,
        identifier: String,
    },
    Optional(Option<Box<RawValue>>),
    Array(Vec<RawValue>),
    Dictionary(Vec<(RawValue, RawValue)>),
    Composite {
        kind: String,
        type_id: String,
        fields: Vec<(String, RawValue)>,
    },
    Type(Option<TypeDescriptor>),
    Capability {
        address: FlowAddress,
        borrow_type: Option<TypeDescriptor>,
    },
    Opaque {
        kind: String,
        payload: Value,
    },
    /// An array element that failed to parse. Kept in place so the rest of
    /// the array survives.
    Malformed {
        reason: String,
    },
}

fn payload<'a>(obj: &'a Map<String, Value>, kind: &str) -> Result<&'a Value> {
    obj.get("value")
        .ok_or_else(|| Error::decode(format!("{kind} value without payload")))
}

fn payload_str<'a>(obj: &'a Map<String, Value>, kind: &str) -> Result<&'a str> {
    payload(obj, kind)?
        .as_str()
        .ok_or_else(|| Error::decode(format!("{kind} payload is not a string")))
}

fn parse_address(literal: &str) -> Result<FlowAddress> {
    literal
        .parse::<FlowAddress>()
        .map_err(|_| Error::decode(format!("malformed address '{literal}'")))
}

impl RawValue {
    pub fn from_json_cdc_bytes(bytes: &[u8]) -> Result<Self> {
        let json: Value = serde_json::from_slice(bytes)
            .map_err(|e| Error::decode(format!("result is not valid JSON: {e}")))?;
        Self::from_json_cdc(&json)
    }

    /// Converts one JSON-Cadence value, recursing into containers.
    pub fn from_json_cdc(json: &Value) -> Result<Self> {
        let obj = json
            .as_object()
            .ok_or_else(|| Error::decode(format!("expected a JSON-Cadence object, got {json}")))?;
        let kind = obj
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::decode("JSON-Cadence value without type tag"))?;

        let value = match kind {
            "Void" => RawValue::Void,
            "Bool" => RawValue::Bool(
                payload(obj, kind)?
                    .as_bool()
                    .ok_or_else(|| Error::decode("Bool payload is not a boolean"))?,
            ),
            "String" | "Character" => RawValue::String(payload_str(obj, kind)?.to_string()),
            "Address" => RawValue::Address(parse_address(payload_str(obj, kind)?)?),
            "Fix64" | "UFix64" | "Fix128" | "UFix128" => {
                let scale = if kind.ends_with("128") {
                    FIX128_SCALE
                } else {
                    FIX64_SCALE
                };
                let (negative, raw) = parse_fixed_point(payload_str(obj, kind)?, scale)?;
                RawValue::FixedPoint(FixedPoint {
                    type_id: kind.to_string(),
                    negative,
                    raw,
                    scale,
                })
            }
            k if INTEGER_TYPES.contains(&k) => {
                let (negative, digits) = parse_integer(payload_str(obj, kind)?)?;
                RawValue::Number {
                    type_id: kind.to_string(),
                    negative,
                    digits,
                }
            }
            "Optional" => match obj.get("value") {
                None | Some(Value::Null) => RawValue::Optional(None),
                Some(inner) => RawValue::Optional(Some(Box::new(Self::from_json_cdc(inner)?))),
            },
            "Array" => {
                let items = payload(obj, kind)?
                    .as_array()
                    .ok_or_else(|| Error::decode("Array payload is not a list"))?;
                RawValue::Array(
                    items
                        .iter()
                        .map(|item| {
                            Self::from_json_cdc(item).unwrap_or_else(|e| RawValue::Malformed {
                                reason: e.to_string(),
                            })
                        })
                        .collect(),
                )
            }
            "Dictionary" => {
                let entries = payload(obj, kind)?
                    .as_array()
                    .ok_or_else(|| Error::decode("Dictionary payload is not a list"))?;
                let mut pairs = Vec::with_capacity(entries.len());
                for entry in entries {
                    let key = entry
                        .get("key")
                        .ok_or_else(|| Error::decode("Dictionary entry without key"))?;
                    let value = entry
                        .get("value")
                        .ok_or_else(|| Error::decode("Dictionary entry without value"))?;
                    pairs.push((Self::from_json_cdc(key)?, Self::from_json_cdc(value)?));
                }
                RawValue::Dictionary(pairs)
            }
            k if COMPOSITE_KINDS.contains(&k) => {
                let body = payload(obj, kind)?;
                let type_id = body
                    .get("id")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                let raw_fields = body
                    .get("fields")
                    .and_then(Value::as_array)
                    .ok_or_else(|| Error::decode(format!("{kind} {type_id} without fields")))?;
                let mut fields = Vec::with_capacity(raw_fields.len());
                for field in raw_fields {
                    let name = field
                        .get("name")
                        .and_then(Value::as_str)
                        .ok_or_else(|| Error::decode(format!("unnamed field in {type_id}")))?;
                    let value = field
                        .get("value")
                        .ok_or_else(|| Error::decode(format!("field {name} without value")))?;
                    fields.push((name.to_string(), Self::from_json_cdc(value)?));
                }
                RawValue::Composite {
                    kind: kind.to_string(),
                    type_id,
                    fields,
                }
            }
            "Path" => {
                let body = payload(obj, kind)?;
                let domain = body.get("domain").and_then(Value::as_str);
                let identifier = body.get("identifier").and_then(Value::as_str);
                match (domain, identifier) {
                    (Some(domain), Some(identifier)) => RawValue::Path {
                        domain: domain.to_string(),
                        identifier: identifier.to_string(),
                    },
                    _ => return Err(Error::decode("Path without domain or identifier")),
                }
            }
            "Type" => {
                match payload(obj, kind)?.get("staticType") {
                    Some(static_type) => RawValue::Type(TypeDescriptor::from_json(static_type)?),
                    None => RawValue::Type(None),
                }
            }
            "Capability" => {
                let body = payload(obj, kind)?;
                let address = body
                    .get("address")
                    .and_then(Value::as_str)
                    .ok_or_else(|| Error::decode("Capability without address"))?;
                let borrow_type = match body.get("borrowType") {
                    Some(t) => TypeDescriptor::from_json(t)?,
                    None => None,
                };
                RawValue::Capability {
                    address: parse_address(address)?,
                    borrow_type,
                }
            }
            other => RawValue::Opaque {
                kind: other.to_string(),
                payload: obj.get("value").cloned().unwrap_or(Value::Null),
            },
        };
        Ok(value)
    }

    /// Short name of the variant, used in decode error messages.
    pub fn kind(&self) -> &str {
        match self {
            RawValue::Void => "Void",
            RawValue::Bool(_) => "Bool",
            RawValue::Number { type_id, .. } => type_id.as_str(),
            RawValue::FixedPoint(fix) => fix.type_id.as_str(),
            RawValue::String(_) => "String",
            RawValue::Address(_) => "Address",
            RawValue::Path { .. } => "Path",
            RawValue::Optional(_) => "Optional",
            RawValue::Array(_) => "Array",
            RawValue::Dictionary(_) => "Dictionary",
            RawValue::Composite { kind, .. } => kind.as_str(),
            RawValue::Type(_) => "Type",
            RawValue::Capability { .. } => "Capability",
            RawValue::Opaque { kind, .. } => kind.as_str(),
            RawValue::Malformed { .. } => "Malformed",
        }
    }

    /// Peels optional layers. `None` means the value is absent.
    pub fn unwrap_optional(&self) -> Option<&RawValue> {
        match self {
            RawValue::Optional(None) => None,
            RawValue::Optional(Some(inner)) => inner.unwrap_optional(),
            other => Some(other),
        }
    }

    /// Looks a composite field up by its declared name.
    pub fn field(&self, name: &str) -> Option<&RawValue> {
        match self {
            RawValue::Composite { fields, .. } => fields
                .iter()
                .find(|(field_name, _)| field_name == name)
                .map(|(_, value)| value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self.unwrap_optional()? {
            RawValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_address(&self) -> Option<FlowAddress> {
        match self.unwrap_optional()? {
            RawValue::Address(addr) => Some(*addr),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self.unwrap_optional()? {
            RawValue::Number {
                negative: false,
                digits,
                ..
            } => digits.parse().ok(),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[RawValue]> {
        match self.unwrap_optional()? {
            RawValue::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Path rendered as `/domain/identifier`; plain strings pass through.
    pub fn as_path_string(&self) -> Option<String> {
        match self.unwrap_optional()? {
            RawValue::Path { domain, identifier } => Some(format!("/{domain}/{identifier}")),
            RawValue::String(s) => Some(s.clone()),
            _ => None,
        }
    }

    /// Projects the value into plain JSON for the web layer. Numbers are
    /// emitted as strings so no consumer ever parses them as floats.
    pub fn to_json(&self) -> Value {
        match self {
            RawValue::Void => Value::Null,
            RawValue::Bool(b) => Value::Bool(*b),
            RawValue::Number {
                negative, digits, ..
            } => Value::String(if *negative {
                format!("-{digits}")
            } else {
                digits.clone()
            }),
            // Magnitude was validated on parse
            RawValue::FixedPoint(fix) => fix
                .to_decimal()
                .map(Value::String)
                .unwrap_or(Value::Null),
            RawValue::String(s) => Value::String(s.clone()),
            RawValue::Address(addr) => Value::String(addr.to_prefixed()),
            RawValue::Path { domain, identifier } => {
                Value::String(format!("/{domain}/{identifier}"))
            }
            RawValue::Optional(None) => Value::Null,
            RawValue::Optional(Some(inner)) => inner.to_json(),
            RawValue::Array(items) => Value::Array(items.iter().map(RawValue::to_json).collect()),
            RawValue::Dictionary(pairs) => {
                let string_keys: Option<Vec<String>> = pairs
                    .iter()
                    .map(|(key, _)| match key.to_json() {
                        Value::String(s) => Some(s),
                        _ => None,
                    })
                    .collect();
                match string_keys {
                    Some(keys) => Value::Object(
                        keys.into_iter()
                            .zip(pairs.iter().map(|(_, value)| value.to_json()))
                            .collect(),
                    ),
                    None => Value::Array(
                        pairs
                            .iter()
                            .map(|(key, value)| {
                                serde_json::json!({"key": key.to_json(), "value": value.to_json()})
                            })
                            .collect(),
                    ),
                }
            }
            RawValue::Composite { fields, .. } => Value::Object(
                fields
                    .iter()
                    .map(|(name, value)| (name.clone(), value.to_json()))
                    .collect(),
            ),
            RawValue::Type(t) => t
                .as_ref()
                .map(|t| Value::String(t.id.clone()))
                .unwrap_or(Value::Null),
            RawValue::Capability {
                address,
                borrow_type,
            } => serde_json::json!({
                "address": address.to_prefixed(),
                "borrowType": borrow_type.as_ref().map(|t| t.id.clone()),
            }),
            RawValue::Opaque { payload, .. } => payload.clone(),
            RawValue::Malformed { .. } => Value::Null,
        }
    }
}

impl Serialize for RawValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}
