//! Interface-document driven decoding of aggregator call results.
//!
//! The aggregator returns a single struct (or array of structs) whose shape
//! is described by the contract interface document. Decoding pairs the
//! depth-first leaf names from the document with the depth-first leaves of
//! the decoded value, so arbitrarily nested structs surface as flat records.

use std::collections::HashMap;

use alloy::{
    dyn_abi::DynSolValue,
    json_abi::{JsonAbi, Param},
    primitives::Address,
};
use fastnum::D256;

use crate::{error::MarketDataError, num::Converter};

/// Output struct components of `function`, as declared by the interface
/// document.
///
/// The aggregator functions all return one struct (or struct array), so the
/// components of the first output parameter fully describe the value shape.
/// An absent function or an empty component list is an error; the caller
/// decides whether to abort.
pub fn output_components<'a>(
    abi: &'a JsonAbi,
    function: &str,
) -> Result<&'a [Param], MarketDataError> {
    let components = abi
        .function(function)
        .and_then(|overloads| overloads.first())
        .and_then(|function| function.outputs.first())
        .map(|output| output.components.as_slice())
        .unwrap_or_default();
    if components.is_empty() {
        return Err(MarketDataError::SchemaNotFound(function.to_owned()));
    }
    Ok(components)
}

/// Depth-first leaf field names of the `function` return struct.
///
/// Composite fields surface only their leaves: a struct's own name never
/// appears in the output, mirroring how nested return values decode to
/// scalar leaves only. Ordering reflects declaration order at every nesting
/// level.
pub fn extract_names(abi: &JsonAbi, function: &str) -> Result<Vec<String>, MarketDataError> {
    let components = output_components(abi, function)?;
    let mut names = Vec::new();
    push_leaf_names(components, &mut names);
    Ok(names)
}

fn push_leaf_names(params: &[Param], names: &mut Vec<String>) {
    for param in params {
        if param.components.is_empty() {
            names.push(param.name.clone());
        } else {
            push_leaf_names(&param.components, names);
        }
    }
}

/// Depth-first leaves of an arbitrarily nested decoded value.
///
/// Already-flat input comes back unchanged.
pub fn flatten(value: DynSolValue) -> Vec<DynSolValue> {
    let mut leaves = Vec::new();
    flatten_into(value, &mut leaves);
    leaves
}

fn flatten_into(value: DynSolValue, leaves: &mut Vec<DynSolValue>) {
    match value {
        DynSolValue::Tuple(items) | DynSolValue::Array(items) | DynSolValue::FixedArray(items) => {
            for item in items {
                flatten_into(item, leaves);
            }
        }
        leaf => leaves.push(leaf),
    }
}

/// Decode a single struct return value into a flat record.
pub fn assemble(
    abi: &JsonAbi,
    function: &str,
    value: DynSolValue,
) -> Result<FlatRecord, MarketDataError> {
    let names = extract_names(abi, function)?;
    FlatRecord::from_parts(function, &names, flatten(value))
}

/// Decode a struct-array return value into one flat record per element,
/// preserving element order.
///
/// Names are extracted once; the schema is shared across elements.
pub fn assemble_all(
    abi: &JsonAbi,
    function: &str,
    elements: Vec<DynSolValue>,
) -> Result<Vec<FlatRecord>, MarketDataError> {
    let names = extract_names(abi, function)?;
    elements
        .into_iter()
        .map(|element| FlatRecord::from_parts(function, &names, flatten(element)))
        .collect()
}

/// Leaf field name -> decoded leaf value mapping for one logical record.
///
/// Consumed by the normalization accessors below; raw values are not meant
/// to be retained past snapshot construction.
#[derive(Clone, Debug)]
pub struct FlatRecord {
    fields: HashMap<String, DynSolValue>,
}

impl FlatRecord {
    /// Pair leaf names with flattened leaf values index-for-index.
    ///
    /// A length mismatch means the interface document and the on-chain value
    /// shape have drifted; it is always surfaced, never truncated or padded.
    pub fn from_parts(
        function: &str,
        names: &[String],
        values: Vec<DynSolValue>,
    ) -> Result<Self, MarketDataError> {
        if names.len() != values.len() {
            return Err(MarketDataError::ShapeMismatch {
                function: function.to_owned(),
                names: names.len(),
                values: values.len(),
            });
        }
        Ok(Self { fields: names.iter().cloned().zip(values).collect() })
    }

    pub fn len(&self) -> usize { self.fields.len() }

    pub fn is_empty(&self) -> bool { self.fields.is_empty() }

    fn field(&self, name: &str) -> Result<&DynSolValue, MarketDataError> {
        self.fields
            .get(name)
            .ok_or_else(|| MarketDataError::MissingField(name.to_owned()))
    }

    /// Wad-scaled (1e18) integer field as a decimal number.
    pub fn wad(&self, name: &str) -> Result<D256, MarketDataError> {
        match self.field(name)? {
            DynSolValue::Uint(raw, _) => Ok(Converter::WAD.from_unsigned(*raw)),
            DynSolValue::Int(raw, _) => Ok(Converter::WAD.from_signed(*raw)),
            _ => Err(MarketDataError::FieldType { field: name.to_owned(), expected: "uint/int" }),
        }
    }

    /// Fixed-width byte-string field as text, trimmed at the first NUL.
    pub fn text(&self, name: &str) -> Result<String, MarketDataError> {
        match self.field(name)? {
            DynSolValue::FixedBytes(word, size) => {
                let bytes = &word[..*size];
                let text = bytes.split(|byte| *byte == 0).next().unwrap_or_default();
                core::str::from_utf8(text)
                    .map(str::to_owned)
                    .map_err(|_| MarketDataError::InvalidText(name.to_owned()))
            }
            _ => Err(MarketDataError::FieldType { field: name.to_owned(), expected: "bytes32" }),
        }
    }

    /// Boolean flag field, passed through unchanged.
    pub fn flag(&self, name: &str) -> Result<bool, MarketDataError> {
        match self.field(name)? {
            DynSolValue::Bool(flag) => Ok(*flag),
            _ => Err(MarketDataError::FieldType { field: name.to_owned(), expected: "bool" }),
        }
    }

    pub fn address(&self, name: &str) -> Result<Address, MarketDataError> {
        match self.field(name)? {
            DynSolValue::Address(address) => Ok(*address),
            _ => Err(MarketDataError::FieldType { field: name.to_owned(), expected: "address" }),
        }
    }
}
