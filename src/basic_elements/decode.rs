use std::collections::BTreeMap;

use tracing::warn;

use crate::{
    basic_elements::value::RawValue,
    error::{Error, Result},
    types::{FtHolding, StorageItem, StorageOverview},
};

// A composite identifier is `<tag>.<hex address>.<contract>[.<type>...]`
const MIN_IDENTIFIER_SEGMENTS: usize = 3;

/// Projection of a [`RawValue`] into a static record.
pub trait FromRawValue: Sized {
    fn from_raw(value: &RawValue) -> Result<Self>;
}

/// Decodes a whole result whose outer shape must match `T`.
pub fn decode<T: FromRawValue>(value: &RawValue) -> Result<T> {
    T::from_raw(value)
}

/// Decodes every element of an array result independently.
///
/// The outer value must be an array; an element that fails to decode is
/// dropped and the rest are kept.
pub fn decode_array<T: FromRawValue>(value: &RawValue) -> Result<Vec<T>> {
    let items = value.as_array().ok_or_else(|| {
        Error::decode(format!("expected Array result, got {}", value.kind()))
    })?;

    let mut result = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        match T::from_raw(item) {
            Ok(decoded) => result.push(decoded),
            Err(e) => warn!(
                index,
                target_type = std::any::type_name::<T>(),
                error = %e,
                "skipping malformed array element"
            ),
        }
    }
    Ok(result)
}

/// Field of a struct, or entry of a string-keyed dictionary.
fn lookup<'a>(value: &'a RawValue, name: &str) -> Option<&'a RawValue> {
    match value.unwrap_optional()? {
        composite @ RawValue::Composite { .. } => composite.field(name),
        RawValue::Dictionary(pairs) => pairs
            .iter()
            .find(|(key, _)| key.as_str() == Some(name))
            .map(|(_, value)| value),
        _ => None,
    }
}

fn expect_record<'a>(value: &'a RawValue, what: &str) -> Result<&'a RawValue> {
    match value.unwrap_optional() {
        Some(record @ (RawValue::Composite { .. } | RawValue::Dictionary(_))) => Ok(record),
        Some(RawValue::Malformed { reason }) => Err(Error::decode(reason.clone())),
        Some(other) => Err(Error::decode(format!(
            "expected {what} struct, got {}",
            other.kind()
        ))),
        None => Err(Error::decode(format!("expected {what} struct, got nil"))),
    }
}

/// Absent or non-string values decode to the empty string.
pub fn string_or_empty(value: Option<&RawValue>) -> String {
    value.and_then(RawValue::as_str).unwrap_or_default().to_string()
}

/// Exact decimal rendering of a fixed-point field; absent means zero.
pub fn fixed_point_or_zero(value: Option<&RawValue>) -> Result<String> {
    match value.and_then(RawValue::unwrap_optional) {
        None => Ok("0".to_string()),
        Some(RawValue::FixedPoint(fix)) => fix.to_decimal(),
        Some(RawValue::Number {
            negative, digits, ..
        }) => Ok(if *negative {
            format!("-{digits}")
        } else {
            digits.clone()
        }),
        Some(other) => Err(Error::decode(format!(
            "expected fixed-point number, got {}",
            other.kind()
        ))),
    }
}

fn path_list(value: Option<&RawValue>) -> Vec<String> {
    value
        .and_then(RawValue::as_array)
        .map(|items| items.iter().filter_map(RawValue::as_path_string).collect())
        .unwrap_or_default()
}

impl FromRawValue for FtHolding {
    fn from_raw(value: &RawValue) -> Result<Self> {
        let record = expect_record(value, "FT vault")?;

        let contract_address = lookup(record, "contractAddress")
            .and_then(RawValue::as_address)
            .ok_or_else(|| Error::decode("FT vault without contractAddress"))?;

        let identifier = string_or_empty(lookup(record, "identifier"));
        let segments: Vec<&str> = identifier.split('.').collect();
        if segments.len() < MIN_IDENTIFIER_SEGMENTS {
            return Err(Error::decode(format!(
                "vault type identifier '{identifier}' has fewer than {MIN_IDENTIFIER_SEGMENTS} segments"
            )));
        }

        let mut contract_name = string_or_empty(lookup(record, "contractName"));
        if contract_name.is_empty() {
            contract_name = segments[2].to_string();
        }

        let evm_address = lookup(record, "evmAddress")
            .and_then(RawValue::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        Ok(FtHolding {
            name: string_or_empty(lookup(record, "name")),
            symbol: string_or_empty(lookup(record, "symbol")),
            balance: fixed_point_or_zero(lookup(record, "balance"))?,
            contract_address: contract_address.hex(),
            contract_name,
            storage_path: lookup(record, "storagePath")
                .and_then(RawValue::as_path_string)
                .unwrap_or_default(),
            identifier,
            evm_address,
        })
    }
}

impl FromRawValue for StorageOverview {
    fn from_raw(value: &RawValue) -> Result<Self> {
        let record = expect_record(value, "storage overview")?;

        let used = lookup(record, "used").and_then(RawValue::as_u64).unwrap_or(0);
        let capacity = lookup(record, "capacity")
            .and_then(RawValue::as_u64)
            .unwrap_or(0);

        let mut types = BTreeMap::new();
        if let Some(RawValue::Dictionary(pairs)) =
            lookup(record, "types").and_then(RawValue::unwrap_optional)
        {
            for (key, type_value) in pairs {
                let Some(path) = key.as_path_string() else {
                    continue;
                };
                // Paths whose type lookup failed are left out
                if let Some(RawValue::Type(Some(descriptor))) = type_value.unwrap_optional() {
                    types.insert(path, descriptor.id.clone());
                }
            }
        }

        Ok(StorageOverview {
            used,
            capacity,
            available: capacity.saturating_sub(used),
            storage_paths: path_list(lookup(record, "storagePaths")),
            public_paths: path_list(lookup(record, "publicPaths")),
            types,
        })
    }
}

/// Ordered list of paths, e.g. the public paths of an account.
pub fn decode_path_list(value: &RawValue) -> Result<Vec<String>> {
    let items = value.as_array().ok_or_else(|| {
        Error::decode(format!("expected Array of paths, got {}", value.kind()))
    })?;
    Ok(items.iter().filter_map(RawValue::as_path_string).collect())
}

/// Result of the storage-item query. A nil result, or a struct with both
/// members nil, means nothing is stored at `path`.
pub fn decode_storage_item(path: String, value: &RawValue) -> Result<StorageItem> {
    let Some(record) = value.unwrap_optional() else {
        return Ok(StorageItem {
            path,
            type_: None,
            value: None,
        });
    };
    let record = expect_record(record, "storage item")?;

    let type_ = match lookup(record, "type").and_then(RawValue::unwrap_optional) {
        Some(RawValue::Type(descriptor)) => descriptor.clone(),
        Some(other) => {
            return Err(Error::decode(format!(
                "storage item type is {}, expected Type",
                other.kind()
            )));
        }
        None => None,
    };
    let value = lookup(record, "value")
        .and_then(RawValue::unwrap_optional)
        .cloned();

    Ok(StorageItem { path, type_, value })
}
