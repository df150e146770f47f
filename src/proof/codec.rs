//! ProofCodec — wire map <-> typed proof objects
//!
//! The wire map is the nested string-keyed structure the UI shell sends
//! over its method channel:
//!
//! ```text
//! { "proof": { "a": {x,y,z}, "b": {x:[2],y:[2],z:[2]}, "c": {x,y,z},
//!              "protocol": str, "curve": str },
//!   "inputs": [str, ...] }
//! ```
//!
//! Encoding is total. Decoding rejects any present key with the wrong
//! shape and, depending on [`DecodePolicy`], fills missing curve points
//! with fixed defaults or rejects them too.

use super::types::{Proof, ProofResult, G1, G2};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use thiserror::Error;

/// How decode treats a curve point or coordinate that is absent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecodePolicy {
    /// Missing `a`/`c` become `(0, 0, 1)`, missing `b` becomes
    /// `([1,0], [1,0], [1,0])`, per point and per coordinate
    #[default]
    FillDefaults,
    /// Any missing point or coordinate is a decode failure
    Strict,
}

/// Structural mismatch between a wire map and the proof model
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("expected a map at '{path}'")]
    NotAMap { path: String },

    #[error("expected a sequence at '{path}'")]
    NotASequence { path: String },

    #[error("expected a string at '{path}'")]
    NotAString { path: String },

    #[error("expected {expected} elements at '{path}', found {found}")]
    WrongArity {
        path: String,
        expected: usize,
        found: usize,
    },

    #[error("missing field '{path}'")]
    MissingField { path: String },
}

/// Encode a proof result into its wire map
pub fn encode(result: &ProofResult) -> Value {
    let proof = result.proof();
    json!({
        "proof": {
            "a": encode_g1(&proof.a),
            "b": encode_g2(&proof.b),
            "c": encode_g1(&proof.c),
            "protocol": proof.protocol,
            "curve": proof.curve,
        },
        "inputs": result.inputs(),
    })
}

fn encode_g1(p: &G1) -> Value {
    json!({ "x": p.x, "y": p.y, "z": p.z })
}

fn encode_g2(p: &G2) -> Value {
    json!({ "x": p.x, "y": p.y, "z": p.z })
}

/// Decode a wire map, filling missing curve points with defaults
pub fn decode(wire: &Value) -> Result<ProofResult, FormatError> {
    decode_with(wire, DecodePolicy::FillDefaults)
}

/// Decode a wire map under an explicit policy
pub fn decode_with(wire: &Value, policy: DecodePolicy) -> Result<ProofResult, FormatError> {
    let root = as_map(wire, "")?;

    let proof_map = match root.get("proof") {
        Some(v) => as_map(v, "proof")?,
        None => return Err(missing("proof")),
    };

    let a = decode_g1(proof_map.get("a"), "proof.a", policy)?;
    let b = decode_g2(proof_map.get("b"), "proof.b", policy)?;
    let c = decode_g1(proof_map.get("c"), "proof.c", policy)?;
    let protocol = required_string(proof_map, "protocol", "proof.protocol")?;
    let curve = required_string(proof_map, "curve", "proof.curve")?;

    let inputs = match root.get("inputs") {
        Some(v) => string_seq(v, "inputs")?,
        None => return Err(missing("inputs")),
    };

    Ok(ProofResult::new(
        Proof {
            a,
            b,
            c,
            protocol,
            curve,
        },
        inputs,
    ))
}

fn decode_g1(value: Option<&Value>, path: &str, policy: DecodePolicy) -> Result<G1, FormatError> {
    let map = match value {
        Some(v) => as_map(v, path)?,
        None if policy == DecodePolicy::FillDefaults => return Ok(G1::default_point()),
        None => return Err(missing(path)),
    };
    let fallback = G1::default_point();
    Ok(G1 {
        x: g1_coordinate(map, "x", path, policy, fallback.x)?,
        y: g1_coordinate(map, "y", path, policy, fallback.y)?,
        z: g1_coordinate(map, "z", path, policy, fallback.z)?,
    })
}

fn g1_coordinate(
    map: &Map<String, Value>,
    key: &str,
    parent: &str,
    policy: DecodePolicy,
    fallback: String,
) -> Result<String, FormatError> {
    let path = format!("{}.{}", parent, key);
    match map.get(key) {
        Some(v) => as_string(v, &path),
        None if policy == DecodePolicy::FillDefaults => Ok(fallback),
        None => Err(FormatError::MissingField { path }),
    }
}

fn decode_g2(value: Option<&Value>, path: &str, policy: DecodePolicy) -> Result<G2, FormatError> {
    let map = match value {
        Some(v) => as_map(v, path)?,
        None if policy == DecodePolicy::FillDefaults => return Ok(G2::default_point()),
        None => return Err(missing(path)),
    };
    Ok(G2 {
        x: g2_coordinate(map, "x", path, policy)?,
        y: g2_coordinate(map, "y", path, policy)?,
        z: g2_coordinate(map, "z", path, policy)?,
    })
}

fn g2_coordinate(
    map: &Map<String, Value>,
    key: &str,
    parent: &str,
    policy: DecodePolicy,
) -> Result<[String; 2], FormatError> {
    let path = format!("{}.{}", parent, key);
    let value = match map.get(key) {
        Some(v) => v,
        None if policy == DecodePolicy::FillDefaults => return Ok(G2::default_coordinate()),
        None => return Err(FormatError::MissingField { path }),
    };
    let pair = string_seq(value, &path)?;
    <[String; 2]>::try_from(pair).map_err(|found| FormatError::WrongArity {
        path,
        expected: 2,
        found: found.len(),
    })
}

fn required_string(
    map: &Map<String, Value>,
    key: &str,
    path: &str,
) -> Result<String, FormatError> {
    match map.get(key) {
        Some(v) => as_string(v, path),
        None => Err(missing(path)),
    }
}

fn as_map<'a>(value: &'a Value, path: &str) -> Result<&'a Map<String, Value>, FormatError> {
    value.as_object().ok_or_else(|| FormatError::NotAMap {
        path: path.to_string(),
    })
}

fn as_string(value: &Value, path: &str) -> Result<String, FormatError> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| FormatError::NotAString {
            path: path.to_string(),
        })
}

fn string_seq(value: &Value, path: &str) -> Result<Vec<String>, FormatError> {
    let items = value.as_array().ok_or_else(|| FormatError::NotASequence {
        path: path.to_string(),
    })?;
    items
        .iter()
        .enumerate()
        .map(|(i, item)| as_string(item, &format!("{}[{}]", path, i)))
        .collect()
}

fn missing(path: &str) -> FormatError {
    FormatError::MissingField {
        path: path.to_string(),
    }
}
