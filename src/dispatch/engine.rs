//! Native proving engine seam
//!
//! The bridge never proves anything itself. Whatever sits behind this
//! trait (an FFI binding, a fixture, a test double) receives already
//! validated arguments and answers with a typed result or a diagnostic.

use crate::proof::ProofResult;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Proving backend selected by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProofLib {
    Arkworks,
    Rapidsnark,
}

impl ProofLib {
    /// All variants, in wire index order
    pub const ALL: [ProofLib; 2] = [ProofLib::Arkworks, ProofLib::Rapidsnark];

    pub fn name(&self) -> &'static str {
        match self {
            ProofLib::Arkworks => "arkworks",
            ProofLib::Rapidsnark => "rapidsnark",
        }
    }

    /// Parse a tag name, ignoring ASCII case
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|lib| lib.name().eq_ignore_ascii_case(name))
    }

    /// Look up by enum index, as UI shells often send enums
    pub fn from_index(index: u64) -> Option<Self> {
        usize::try_from(index)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
    }
}

impl fmt::Display for ProofLib {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Failure reported by the native engine
///
/// The text is the engine's own diagnostic and travels to the caller
/// unmodified.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct EngineError(pub String);

impl EngineError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    pub fn message(&self) -> &str {
        &self.0
    }
}

/// The native proving service consumed by the dispatcher
///
/// Calls are blocking. Implementations own their own threading; the
/// dispatcher issues exactly one call per command and never retries.
pub trait ProvingEngine {
    /// Generate a proof for `circuit_inputs` (an opaque serialized string)
    fn generate_proof(
        &self,
        zkey_path: &str,
        circuit_inputs: &str,
        proof_lib: ProofLib,
    ) -> Result<ProofResult, EngineError>;

    /// Verify a proof against the key at `zkey_path`
    fn verify_proof(
        &self,
        zkey_path: &str,
        proof: &ProofResult,
        proof_lib: ProofLib,
    ) -> Result<bool, EngineError>;
}

impl<E: ProvingEngine + ?Sized> ProvingEngine for Arc<E> {
    fn generate_proof(
        &self,
        zkey_path: &str,
        circuit_inputs: &str,
        proof_lib: ProofLib,
    ) -> Result<ProofResult, EngineError> {
        (**self).generate_proof(zkey_path, circuit_inputs, proof_lib)
    }

    fn verify_proof(
        &self,
        zkey_path: &str,
        proof: &ProofResult,
        proof_lib: ProofLib,
    ) -> Result<bool, EngineError> {
        (**self).verify_proof(zkey_path, proof, proof_lib)
    }
}
