//! Proof domain objects — the typed side of the bridge
//!
//! Field elements stay decimal strings end to end: the bridge never does
//! curve arithmetic, it only moves coordinates between the UI shell and
//! the native prover without loss.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A point on the base-field curve (G1), projective coordinates
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct G1 {
    pub x: String,
    pub y: String,
    pub z: String,
}

impl G1 {
    pub fn new(x: impl Into<String>, y: impl Into<String>, z: impl Into<String>) -> Self {
        Self {
            x: x.into(),
            y: y.into(),
            z: z.into(),
        }
    }

    /// The point substituted for a missing `a` or `c` on decode
    pub fn default_point() -> Self {
        Self::new("0", "0", "1")
    }
}

/// A point on the quadratic-extension curve (G2)
///
/// Each coordinate is an ordered pair `[c0, c1]`; the array type keeps the
/// pair shape out of reach of malformed input.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct G2 {
    pub x: [String; 2],
    pub y: [String; 2],
    pub z: [String; 2],
}

impl G2 {
    pub fn new(x: [String; 2], y: [String; 2], z: [String; 2]) -> Self {
        Self { x, y, z }
    }

    /// Build from string slices, mostly useful in tests and fixtures
    pub fn from_strs(x: [&str; 2], y: [&str; 2], z: [&str; 2]) -> Self {
        Self {
            x: x.map(str::to_string),
            y: y.map(str::to_string),
            z: z.map(str::to_string),
        }
    }

    /// The coordinate substituted for a missing G2 coordinate on decode
    pub fn default_coordinate() -> [String; 2] {
        ["1".to_string(), "0".to_string()]
    }

    /// The point substituted for a missing `b` on decode
    pub fn default_point() -> Self {
        Self::new(
            Self::default_coordinate(),
            Self::default_coordinate(),
            Self::default_coordinate(),
        )
    }
}

/// A pairing-based proof as produced by the native engine
///
/// `protocol` and `curve` are opaque tags (e.g. `groth16` / `bn128`);
/// only the engine knows which values it accepts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Proof {
    pub a: G1,
    pub b: G2,
    pub c: G1,
    pub protocol: String,
    pub curve: String,
}

/// A proof plus its public inputs
///
/// Immutable once built: fields are private and only readable. The value
/// is transcoded across the boundary and dropped with the reply.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProofResult {
    proof: Proof,
    inputs: Vec<String>,
}

impl ProofResult {
    pub fn new(proof: Proof, inputs: Vec<String>) -> Self {
        Self { proof, inputs }
    }

    pub fn proof(&self) -> &Proof {
        &self.proof
    }

    /// Public inputs, in circuit order
    pub fn inputs(&self) -> &[String] {
        &self.inputs
    }

    pub fn into_parts(self) -> (Proof, Vec<String>) {
        (self.proof, self.inputs)
    }

    /// Hex SHA256 over the encoded wire map, for log correlation only
    pub fn fingerprint(&self) -> String {
        // serde_json::Map is a BTreeMap here, so key order is stable
        let wire = super::codec::encode(self);
        let mut hasher = Sha256::new();
        hasher.update(wire.to_string().as_bytes());
        hex::encode(hasher.finalize())
    }

    /// First 12 hex chars of the fingerprint, as printed in log lines
    pub fn short_fingerprint(&self) -> String {
        let mut fingerprint = self.fingerprint();
        fingerprint.truncate(12);
        fingerprint
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ProofResult {
        ProofResult::new(
            Proof {
                a: G1::new("1", "2", "1"),
                b: G2::from_strs(["1", "0"], ["2", "0"], ["1", "0"]),
                c: G1::new("3", "4", "1"),
                protocol: "groth16".into(),
                curve: "bn128".into(),
            },
            vec!["5".into()],
        )
    }

    #[test]
    fn test_defaults() {
        assert_eq!(G1::default_point(), G1::new("0", "0", "1"));
        let b = G2::default_point();
        assert_eq!(b.x, ["1".to_string(), "0".to_string()]);
        assert_eq!(b.x, b.y);
        assert_eq!(b.y, b.z);
    }

    #[test]
    fn test_fingerprint_stable() {
        let a = sample();
        let b = sample();
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_eq!(a.fingerprint().len(), 64);
    }

    #[test]
    fn test_short_fingerprint_is_prefix() {
        let result = sample();
        let short = result.short_fingerprint();
        assert_eq!(short.len(), 12);
        assert!(result.fingerprint().starts_with(&short));
    }

    #[test]
    fn test_fingerprint_tracks_inputs() {
        let a = sample();
        let (proof, _) = sample().into_parts();
        let b = ProofResult::new(proof, vec!["6".into()]);
        assert_ne!(a.fingerprint(), b.fingerprint());
    }
}
