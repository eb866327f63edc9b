use serde_json::{Value, json};

use crate::{error::Result, types::FlowAddress};

/// A typed script argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Argument {
    Address(FlowAddress),
    String(String),
    UInt64(u64),
}

impl Argument {
    /// Cadence type name used in the JSON-Cadence envelope.
    pub fn type_name(&self) -> &'static str {
        match self {
            Argument::Address(_) => "Address",
            Argument::String(_) => "String",
            Argument::UInt64(_) => "UInt64",
        }
    }

    pub fn to_json_cdc(&self) -> Value {
        match self {
            Argument::Address(addr) => json!({"type": "Address", "value": addr.to_prefixed()}),
            Argument::String(s) => json!({"type": "String", "value": s}),
            // Integers travel as decimal strings
            Argument::UInt64(n) => json!({"type": "UInt64", "value": n.to_string()}),
        }
    }
}

/// Ordered argument list of a script call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Args {
    arguments: Vec<Argument>,
}

impl Args {
    pub fn new() -> Self {
        Self {
            arguments: Vec::new(),
        }
    }

    pub fn add_address(&mut self, value: FlowAddress) -> &mut Self {
        self.arguments.push(Argument::Address(value));
        self
    }

    pub fn add_string(&mut self, value: &str) -> &mut Self {
        self.arguments.push(Argument::String(value.to_string()));
        self
    }

    pub fn add_u64(&mut self, value: u64) -> &mut Self {
        self.arguments.push(Argument::UInt64(value));
        self
    }

    pub fn len(&self) -> usize {
        self.arguments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arguments.is_empty()
    }

    pub fn arguments(&self) -> &[Argument] {
        &self.arguments
    }

    /// Encodes each argument as its own JSON-Cadence document, the form the
    /// access API expects.
    pub fn serialize(&self) -> Result<Vec<Vec<u8>>> {
        self.arguments
            .iter()
            .map(|arg| {
                serde_json::to_vec(&arg.to_json_cdc()).map_err(|e| {
                    crate::error::Error::invalid_input(format!(
                        "failed to encode {} argument: {e}",
                        arg.type_name()
                    ))
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_serialize_in_order() -> Result<()> {
        let addr: FlowAddress = "0x1654653399040a61".parse()?;
        let mut args = Args::new();
        args.add_address(addr).add_string("flowTokenVault").add_u64(42);

        assert_eq!(args.len(), 3);
        let encoded = args.serialize()?;
        let decoded: Vec<Value> = encoded
            .iter()
            .map(|bytes| serde_json::from_slice(bytes).unwrap())
            .collect();

        assert_eq!(
            decoded,
            vec![
                json!({"type": "Address", "value": "0x1654653399040a61"}),
                json!({"type": "String", "value": "flowTokenVault"}),
                json!({"type": "UInt64", "value": "42"}),
            ]
        );
        Ok(())
    }

    #[test]
    fn test_u64_beyond_json_number_precision() {
        let mut args = Args::new();
        args.add_u64(u64::MAX);

        assert_eq!(args.arguments()[0].type_name(), "UInt64");
        assert_eq!(
            args.arguments()[0].to_json_cdc(),
            json!({"type": "UInt64", "value": "18446744073709551615"})
        );
    }

    #[test]
    fn test_empty_args() -> Result<()> {
        let args = Args::new();
        assert!(args.is_empty());
        assert!(args.serialize()?.is_empty());
        Ok(())
    }
}
