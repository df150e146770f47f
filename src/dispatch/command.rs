//! Typed commands parsed from the method channel
//!
//! The UI shell sends a method name plus a loosely typed argument map.
//! Everything is checked here, once, so the dispatcher only ever sees a
//! well-formed [`Command`].

use super::dispatcher::DispatchError;
use super::engine::ProofLib;
use crate::proof::{self, DecodePolicy, ProofResult};
use serde_json::{Map, Value};

pub const GENERATE_METHOD: &str = "generateCircomProof";
pub const VERIFY_METHOD: &str = "verifyCircomProof";

const GENERATE_ALIAS: &str = "generateProof";
const VERIFY_ALIAS: &str = "verifyProof";

/// The operations the bridge knows how to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    GenerateProof,
    VerifyProof,
}

impl Method {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            GENERATE_METHOD | GENERATE_ALIAS => Some(Method::GenerateProof),
            VERIFY_METHOD | VERIFY_ALIAS => Some(Method::VerifyProof),
            _ => None,
        }
    }

    /// Canonical channel name
    pub fn name(&self) -> &'static str {
        match self {
            Method::GenerateProof => GENERATE_METHOD,
            Method::VerifyProof => VERIFY_METHOD,
        }
    }
}

/// A validated command, one variant per operation
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    GenerateProof {
        zkey_path: String,
        circuit_inputs: String,
        proof_lib: ProofLib,
    },
    VerifyProof {
        zkey_path: String,
        proof: ProofResult,
        proof_lib: ProofLib,
    },
}

impl Command {
    /// Validate a raw method call into a command
    ///
    /// Every argument is checked for presence and type before the proof
    /// map is decoded; nothing here touches the engine.
    pub fn parse(method: &str, args: &Value, policy: DecodePolicy) -> Result<Self, DispatchError> {
        let method = Method::from_name(method)
            .ok_or_else(|| DispatchError::NotImplemented(method.to_string()))?;
        let args = args
            .as_object()
            .ok_or_else(|| DispatchError::missing_argument("arguments: expected a map"))?;

        match method {
            Method::GenerateProof => {
                let zkey_path = string_arg(args, "zkeyPath")?;
                let circuit_inputs = circuit_inputs_arg(args)?;
                let proof_lib = proof_lib_arg(args)?;
                Ok(Command::GenerateProof {
                    zkey_path,
                    circuit_inputs,
                    proof_lib,
                })
            }
            Method::VerifyProof => {
                let zkey_path = string_arg(args, "zkeyPath")?;
                let proof_map = match args.get("proof") {
                    Some(v) if v.is_object() => v,
                    Some(_) => return Err(DispatchError::missing_argument("proof: expected a map")),
                    None => return Err(DispatchError::missing_argument("proof: missing")),
                };
                let proof_lib = proof_lib_arg(args)?;
                let proof = proof::decode_with(proof_map, policy)?;
                Ok(Command::VerifyProof {
                    zkey_path,
                    proof,
                    proof_lib,
                })
            }
        }
    }

    pub fn method(&self) -> Method {
        match self {
            Command::GenerateProof { .. } => Method::GenerateProof,
            Command::VerifyProof { .. } => Method::VerifyProof,
        }
    }

    pub fn proof_lib(&self) -> ProofLib {
        match self {
            Command::GenerateProof { proof_lib, .. } | Command::VerifyProof { proof_lib, .. } => {
                *proof_lib
            }
        }
    }
}

fn string_arg(args: &Map<String, Value>, key: &str) -> Result<String, DispatchError> {
    match args.get(key) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(DispatchError::missing_argument(format!("{}: expected string", key))),
        None => Err(DispatchError::missing_argument(format!("{}: missing", key))),
    }
}

/// `inputs`, with `circuitInputs` accepted when `inputs` is absent
fn circuit_inputs_arg(args: &Map<String, Value>) -> Result<String, DispatchError> {
    match (args.contains_key("inputs"), args.contains_key("circuitInputs")) {
        (true, _) => string_arg(args, "inputs"),
        (false, true) => string_arg(args, "circuitInputs"),
        (false, false) => Err(DispatchError::missing_argument("inputs: missing")),
    }
}

fn proof_lib_arg(args: &Map<String, Value>) -> Result<ProofLib, DispatchError> {
    let parsed = match args.get("proofLib") {
        Some(Value::String(name)) => ProofLib::from_name(name),
        Some(Value::Number(n)) => n.as_u64().and_then(ProofLib::from_index),
        Some(_) => None,
        None => return Err(DispatchError::missing_argument("proofLib: missing")),
    };
    parsed.ok_or_else(|| {
        DispatchError::missing_argument("proofLib: expected one of arkworks, rapidsnark")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn proof_wire() -> Value {
        json!({
            "proof": {
                "a": {"x": "1", "y": "2", "z": "1"},
                "b": {"x": ["1", "0"], "y": ["2", "0"], "z": ["1", "0"]},
                "c": {"x": "3", "y": "4", "z": "1"},
                "protocol": "groth16",
                "curve": "bn128"
            },
            "inputs": ["5"]
        })
    }

    fn parse(method: &str, args: Value) -> Result<Command, DispatchError> {
        Command::parse(method, &args, DecodePolicy::FillDefaults)
    }

    #[test]
    fn test_parse_generate() {
        let cmd = parse(
            GENERATE_METHOD,
            json!({"zkeyPath": "/keys/multiplier2.zkey", "inputs": "{\"a\":[\"3\"]}", "proofLib": "arkworks"}),
        )
        .unwrap();
        assert_eq!(
            cmd,
            Command::GenerateProof {
                zkey_path: "/keys/multiplier2.zkey".into(),
                circuit_inputs: "{\"a\":[\"3\"]}".into(),
                proof_lib: ProofLib::Arkworks,
            }
        );
        assert_eq!(cmd.method(), Method::GenerateProof);
    }

    #[test]
    fn test_parse_generate_circuit_inputs_alias() {
        let cmd = parse(
            "generateProof",
            json!({"zkeyPath": "k.zkey", "circuitInputs": "{}", "proofLib": 1}),
        )
        .unwrap();
        match cmd {
            Command::GenerateProof { circuit_inputs, proof_lib, .. } => {
                assert_eq!(circuit_inputs, "{}");
                assert_eq!(proof_lib, ProofLib::Rapidsnark);
            }
            other => panic!("Expected GenerateProof, got {:?}", other),
        }
    }

    #[test]
    fn test_inputs_wins_over_circuit_inputs() {
        let cmd = parse(
            GENERATE_METHOD,
            json!({"zkeyPath": "k", "inputs": "A", "circuitInputs": "B", "proofLib": "arkworks"}),
        )
        .unwrap();
        assert!(matches!(cmd, Command::GenerateProof { ref circuit_inputs, .. } if circuit_inputs == "A"));
    }

    #[test]
    fn test_non_string_zkey_path() {
        let err = parse(
            GENERATE_METHOD,
            json!({"zkeyPath": 42, "inputs": "{}", "proofLib": "arkworks"}),
        )
        .unwrap_err();
        assert!(err.is_argument_error());
        assert_eq!(err.details(), Some("zkeyPath: expected string"));
    }

    #[test]
    fn test_mistyped_circuit_inputs_alias() {
        let err = parse(
            GENERATE_METHOD,
            json!({"zkeyPath": "k", "circuitInputs": {"a": 1}, "proofLib": "arkworks"}),
        )
        .unwrap_err();
        assert_eq!(err.details(), Some("circuitInputs: expected string"));
    }

    #[test]
    fn test_missing_inputs() {
        let err = parse(GENERATE_METHOD, json!({"zkeyPath": "k", "proofLib": "arkworks"})).unwrap_err();
        assert_eq!(err.details(), Some("inputs: missing"));
    }

    #[test]
    fn test_unknown_proof_lib() {
        let err = parse(
            GENERATE_METHOD,
            json!({"zkeyPath": "k", "inputs": "{}", "proofLib": "halo2"}),
        )
        .unwrap_err();
        assert!(err.is_argument_error());

        let err = parse(
            GENERATE_METHOD,
            json!({"zkeyPath": "k", "inputs": "{}", "proofLib": -1}),
        )
        .unwrap_err();
        assert!(err.is_argument_error());
    }

    #[test]
    fn test_args_not_a_map() {
        let err = parse(VERIFY_METHOD, json!(["zkeyPath"])).unwrap_err();
        assert!(err.is_argument_error());
    }

    #[test]
    fn test_parse_verify() {
        let cmd = parse(
            VERIFY_METHOD,
            json!({"zkeyPath": "k.zkey", "proof": proof_wire(), "proofLib": "rapidsnark"}),
        )
        .unwrap();
        match cmd {
            Command::VerifyProof { proof, proof_lib, .. } => {
                assert_eq!(proof.inputs(), ["5".to_string()]);
                assert_eq!(proof.proof().protocol, "groth16");
                assert_eq!(proof_lib, ProofLib::Rapidsnark);
            }
            other => panic!("Expected VerifyProof, got {:?}", other),
        }
    }

    #[test]
    fn test_verify_proof_not_a_map() {
        let err = parse(
            VERIFY_METHOD,
            json!({"zkeyPath": "k", "proof": "deadbeef", "proofLib": "arkworks"}),
        )
        .unwrap_err();
        assert_eq!(err.details(), Some("proof: expected a map"));
    }

    #[test]
    fn test_verify_format_error_escalates() {
        let mut wire = proof_wire();
        wire["proof"]["c"] = json!("oops");
        let err = parse(
            VERIFY_METHOD,
            json!({"zkeyPath": "k", "proof": wire, "proofLib": "arkworks"}),
        )
        .unwrap_err();
        assert!(err.is_argument_error());
        assert_eq!(err.details(), Some("expected a map at 'proof.c'"));
    }

    #[test]
    fn test_verify_args_checked_before_decode() {
        // a malformed proof map must not mask a missing proofLib
        let err = parse(
            VERIFY_METHOD,
            json!({"zkeyPath": "k", "proof": {"proof": 1}}),
        )
        .unwrap_err();
        assert_eq!(err.details(), Some("proofLib: missing"));
    }

    #[test]
    fn test_unknown_method() {
        let err = parse("deleteEverything", json!({})).unwrap_err();
        assert!(matches!(err, DispatchError::NotImplemented(ref m) if m == "deleteEverything"));
    }
}
