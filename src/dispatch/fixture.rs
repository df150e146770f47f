//! FixtureEngine — a recorded-proof stand-in for the native prover
//!
//! Loads one `ProofResult` wire map captured from a real prover and plays
//! it back. Lets the host binary and integration setups exercise the full
//! dispatch path on machines without the native library.

use super::engine::{EngineError, ProofLib, ProvingEngine};
use crate::proof::{self, ProofResult};
use log::{debug, info};
use std::path::{Path, PathBuf};

pub struct FixtureEngine {
    fixture: ProofResult,
    source: PathBuf,
}

impl std::fmt::Debug for FixtureEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FixtureEngine")
            .field("source", &self.source)
            .field("fingerprint", &self.fixture.fingerprint())
            .finish()
    }
}

impl FixtureEngine {
    /// Load the fixture wire map from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| EngineError::new(format!("cannot read fixture {}: {}", path.display(), e)))?;
        let wire: serde_json::Value = serde_json::from_str(&json)
            .map_err(|e| EngineError::new(format!("fixture {} is not JSON: {}", path.display(), e)))?;
        let fixture = proof::decode(&wire)
            .map_err(|e| EngineError::new(format!("fixture {} is malformed: {}", path.display(), e)))?;
        info!(
            "Loaded proof fixture {} from {}",
            fixture.short_fingerprint(),
            path.display()
        );
        Ok(Self {
            fixture,
            source: path.to_path_buf(),
        })
    }

    /// Wrap an in-memory result
    pub fn from_result(fixture: ProofResult) -> Self {
        Self {
            fixture,
            source: PathBuf::from("<memory>"),
        }
    }

    pub fn fixture(&self) -> &ProofResult {
        &self.fixture
    }

    fn check_zkey(zkey_path: &str) -> Result<(), EngineError> {
        if Path::new(zkey_path).is_file() {
            Ok(())
        } else {
            Err(EngineError::new(format!("zkey not found: {}", zkey_path)))
        }
    }
}

impl ProvingEngine for FixtureEngine {
    fn generate_proof(
        &self,
        zkey_path: &str,
        circuit_inputs: &str,
        proof_lib: ProofLib,
    ) -> Result<ProofResult, EngineError> {
        Self::check_zkey(zkey_path)?;
        let inputs: serde_json::Value = serde_json::from_str(circuit_inputs)
            .map_err(|e| EngineError::new(format!("invalid circuit inputs: {}", e)))?;
        if !inputs.is_object() {
            return Err(EngineError::new("invalid circuit inputs: expected a JSON object"));
        }
        debug!("Replaying fixture for {} via {}", zkey_path, proof_lib);
        Ok(self.fixture.clone())
    }

    fn verify_proof(
        &self,
        zkey_path: &str,
        proof: &ProofResult,
        _proof_lib: ProofLib,
    ) -> Result<bool, EngineError> {
        Self::check_zkey(zkey_path)?;
        Ok(proof == &self.fixture)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proof::{Proof, G1, G2};

    fn sample() -> ProofResult {
        ProofResult::new(
            Proof {
                a: G1::new("11", "12", "1"),
                b: G2::from_strs(["1", "2"], ["3", "4"], ["1", "0"]),
                c: G1::new("13", "14", "1"),
                protocol: "groth16".into(),
                curve: "bn128".into(),
            },
            vec!["15".into(), "16".into()],
        )
    }

    fn temp_path(suffix: &str) -> PathBuf {
        std::env::temp_dir().join(format!("mopro-bridge-{}-{}", uuid::Uuid::new_v4(), suffix))
    }

    #[test]
    fn test_load_and_replay() {
        let fixture_path = temp_path("fixture.json");
        let zkey_path = temp_path("circuit.zkey");
        std::fs::write(&fixture_path, proof::encode(&sample()).to_string()).unwrap();
        std::fs::write(&zkey_path, b"zkey").unwrap();

        let engine = FixtureEngine::load(&fixture_path).unwrap();
        let zkey = zkey_path.to_str().unwrap();
        let result = engine
            .generate_proof(zkey, "{\"a\":[\"3\"]}", ProofLib::Arkworks)
            .unwrap();
        assert_eq!(result, sample());
        assert!(engine.verify_proof(zkey, &result, ProofLib::Arkworks).unwrap());

        let (proof, _) = result.into_parts();
        let tampered = ProofResult::new(proof, vec!["99".into()]);
        assert!(!engine.verify_proof(zkey, &tampered, ProofLib::Arkworks).unwrap());

        std::fs::remove_file(fixture_path).ok();
        std::fs::remove_file(zkey_path).ok();
    }

    #[test]
    fn test_missing_zkey() {
        let engine = FixtureEngine::from_result(sample());
        let err = engine
            .generate_proof("/definitely/not/here.zkey", "{}", ProofLib::Arkworks)
            .unwrap_err();
        assert_eq!(err.message(), "zkey not found: /definitely/not/here.zkey");
    }

    #[test]
    fn test_bad_circuit_inputs() {
        let zkey_path = temp_path("inputs.zkey");
        std::fs::write(&zkey_path, b"zkey").unwrap();
        let engine = FixtureEngine::from_result(sample());
        let err = engine
            .generate_proof(zkey_path.to_str().unwrap(), "[1,2]", ProofLib::Arkworks)
            .unwrap_err();
        assert!(err.message().starts_with("invalid circuit inputs"));
        std::fs::remove_file(zkey_path).ok();
    }

    #[test]
    fn test_load_malformed_fixture() {
        let fixture_path = temp_path("bad.json");
        std::fs::write(&fixture_path, r#"{"proof": {"c": "x"}, "inputs": []}"#).unwrap();
        let err = FixtureEngine::load(&fixture_path).unwrap_err();
        assert!(err.message().contains("malformed"));
        std::fs::remove_file(fixture_path).ok();
    }
}
