//! Dispatcher — routes validated commands to the proving engine
//!
//! One command, one engine call, one terminal reply. The call runs on the
//! caller's thread for its full duration; there is no retry, timeout or
//! cancellation here. Timeout policy belongs to whoever calls `handle`.

use super::command::Command;
use super::engine::{EngineError, ProofLib, ProvingEngine};
use super::reply::{ErrorCode, Reply};
use crate::proof::{self, DecodePolicy, FormatError, ProofResult};
use log::{debug, info, warn};
use serde_json::Value;
use thiserror::Error;

const MISSING_ARGUMENTS: &str = "Missing arguments";
const INVALID_PROOF: &str = "Invalid proof";
const GENERATION_FAILED: &str = "Failed to generate proof";
const VERIFICATION_FAILED: &str = "Failed to verify proof";

/// Terminal failure of a dispatched call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// Missing or mistyped argument, including a malformed proof map
    #[error("{message} ({})", .details.as_deref().unwrap_or("no details"))]
    Argument {
        message: String,
        details: Option<String>,
    },

    /// Engine failed while proving; carries the engine text verbatim
    #[error("proof generation failed: {0}")]
    ProofGeneration(String),

    /// Engine failed while verifying; carries the engine text verbatim
    #[error("proof verification failed: {0}")]
    ProofVerification(String),

    #[error("method not implemented: {0}")]
    NotImplemented(String),
}

impl DispatchError {
    pub(crate) fn missing_argument(details: impl Into<String>) -> Self {
        DispatchError::Argument {
            message: MISSING_ARGUMENTS.to_string(),
            details: Some(details.into()),
        }
    }

    pub fn is_argument_error(&self) -> bool {
        matches!(self, DispatchError::Argument { .. })
    }

    /// Wire code, `None` for an unknown method
    pub fn error_code(&self) -> Option<ErrorCode> {
        match self {
            DispatchError::Argument { .. } => Some(ErrorCode::ArgumentError),
            DispatchError::ProofGeneration(_) => Some(ErrorCode::ProofGenerationError),
            DispatchError::ProofVerification(_) => Some(ErrorCode::ProofVerificationError),
            DispatchError::NotImplemented(_) => None,
        }
    }

    /// The `message` field of the error reply
    pub fn message(&self) -> String {
        match self {
            DispatchError::Argument { message, .. } => message.clone(),
            DispatchError::ProofGeneration(text) | DispatchError::ProofVerification(text) => {
                text.clone()
            }
            DispatchError::NotImplemented(method) => format!("Method not implemented: {}", method),
        }
    }

    /// The `details` field of the error reply
    pub fn details(&self) -> Option<&str> {
        match self {
            DispatchError::Argument { details, .. } => details.as_deref(),
            DispatchError::ProofGeneration(_) => Some(GENERATION_FAILED),
            DispatchError::ProofVerification(_) => Some(VERIFICATION_FAILED),
            DispatchError::NotImplemented(_) => None,
        }
    }
}

impl From<FormatError> for DispatchError {
    fn from(err: FormatError) -> Self {
        DispatchError::Argument {
            message: INVALID_PROOF.to_string(),
            details: Some(err.to_string()),
        }
    }
}

/// Command router in front of a proving engine
#[derive(Debug)]
pub struct Dispatcher<E> {
    engine: E,
    policy: DecodePolicy,
}

impl<E: ProvingEngine> Dispatcher<E> {
    pub fn new(engine: E) -> Self {
        Self::with_policy(engine, DecodePolicy::default())
    }

    pub fn with_policy(engine: E, policy: DecodePolicy) -> Self {
        Self { engine, policy }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn policy(&self) -> DecodePolicy {
        self.policy
    }

    /// Generate a proof through the engine
    pub fn generate_proof(
        &self,
        zkey_path: &str,
        circuit_inputs: &str,
        proof_lib: ProofLib,
    ) -> Result<ProofResult, DispatchError> {
        info!("Generating proof: zkey={}, lib={}", zkey_path, proof_lib);
        let result = self
            .engine
            .generate_proof(zkey_path, circuit_inputs, proof_lib)
            .map_err(|EngineError(text)| {
                warn!("Proof generation failed for {}: {}", zkey_path, text);
                DispatchError::ProofGeneration(text)
            })?;
        info!(
            "Generated proof {} with {} public inputs",
            result.short_fingerprint(),
            result.inputs().len()
        );
        Ok(result)
    }

    /// Verify a proof through the engine
    pub fn verify_proof(
        &self,
        zkey_path: &str,
        proof: &ProofResult,
        proof_lib: ProofLib,
    ) -> Result<bool, DispatchError> {
        // fingerprints are computed only when the record is enabled
        info!(
            "Verifying proof {}: zkey={}, lib={}",
            proof.short_fingerprint(),
            zkey_path,
            proof_lib
        );
        let valid = self
            .engine
            .verify_proof(zkey_path, proof, proof_lib)
            .map_err(|EngineError(text)| {
                warn!(
                    "Proof verification errored for {}: {}",
                    proof.short_fingerprint(),
                    text
                );
                DispatchError::ProofVerification(text)
            })?;
        info!("Proof {} valid={}", proof.short_fingerprint(), valid);
        Ok(valid)
    }

    /// Run a validated command and encode its result for the wire
    pub fn execute(&self, command: Command) -> Result<Value, DispatchError> {
        match command {
            Command::GenerateProof {
                zkey_path,
                circuit_inputs,
                proof_lib,
            } => self
                .generate_proof(&zkey_path, &circuit_inputs, proof_lib)
                .map(|result| proof::encode(&result)),
            Command::VerifyProof {
                zkey_path,
                proof,
                proof_lib,
            } => self
                .verify_proof(&zkey_path, &proof, proof_lib)
                .map(Value::Bool),
        }
    }

    /// Handle a raw method call end to end
    pub fn handle(&self, method: &str, args: &Value) -> Reply {
        debug!("Method call: {}", method);
        let outcome = Command::parse(method, args, self.policy).and_then(|cmd| self.execute(cmd));
        match outcome {
            Ok(value) => Reply::Success(value),
            Err(err) => {
                if err.is_argument_error() {
                    warn!("Rejected {} call: {}", method, err);
                } else if let DispatchError::NotImplemented(_) = err {
                    debug!("No handler for method {}", method);
                }
                Reply::from(err)
            }
        }
    }
}
