//! Replies sent back over the method channel

use super::dispatcher::DispatchError;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Caller-visible error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    ArgumentError,
    ProofGenerationError,
    ProofVerificationError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ArgumentError => "ARGUMENT_ERROR",
            ErrorCode::ProofGenerationError => "PROOF_GENERATION_ERROR",
            ErrorCode::ProofVerificationError => "PROOF_VERIFICATION_ERROR",
        }
    }
}

/// The error object of a failed call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorReply {
    pub code: ErrorCode,
    pub message: String,
    pub details: Option<String>,
}

/// Outcome of one method call
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// Encoded result: a proof wire map, or a bool for verification
    Success(Value),
    Error(ErrorReply),
    /// The method name is not one the bridge handles
    NotImplemented,
}

impl Reply {
    pub fn is_success(&self) -> bool {
        matches!(self, Reply::Success(_))
    }

    pub fn error(&self) -> Option<&ErrorReply> {
        match self {
            Reply::Error(e) => Some(e),
            _ => None,
        }
    }

    /// JSON rendering for line-oriented hosts
    pub fn to_json(&self) -> Value {
        match self {
            Reply::Success(value) => json!({ "ok": value }),
            Reply::Error(e) => json!({ "error": e }),
            Reply::NotImplemented => json!({
                "error": {
                    "code": "NOT_IMPLEMENTED",
                    "message": "Method not implemented",
                    "details": null,
                }
            }),
        }
    }
}

impl From<DispatchError> for Reply {
    fn from(err: DispatchError) -> Self {
        match err.error_code() {
            Some(code) => Reply::Error(ErrorReply {
                code,
                message: err.message(),
                details: err.details().map(str::to_string),
            }),
            None => Reply::NotImplemented,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_wire_names() {
        for code in [
            ErrorCode::ArgumentError,
            ErrorCode::ProofGenerationError,
            ErrorCode::ProofVerificationError,
        ] {
            let wire = serde_json::to_value(code).unwrap();
            assert_eq!(wire, Value::String(code.as_str().to_string()));
        }
    }

    #[test]
    fn test_error_reply_shape() {
        let reply = Reply::from(DispatchError::ProofVerification("pairing check failed".into()));
        let wire = reply.to_json();
        assert_eq!(wire["error"]["code"], "PROOF_VERIFICATION_ERROR");
        assert_eq!(wire["error"]["message"], "pairing check failed");
        assert_eq!(wire["error"]["details"], "Failed to verify proof");
    }

    #[test]
    fn test_not_implemented_reply() {
        let reply = Reply::from(DispatchError::NotImplemented("foo".into()));
        assert_eq!(reply, Reply::NotImplemented);
        assert!(reply.error().is_none());
        assert_eq!(reply.to_json()["error"]["code"], "NOT_IMPLEMENTED");
    }

    #[test]
    fn test_success_json() {
        let reply = Reply::Success(Value::Bool(true));
        assert!(reply.is_success());
        assert_eq!(reply.to_json(), json!({"ok": true}));
    }
}
