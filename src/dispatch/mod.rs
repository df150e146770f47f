//! Dispatch — the proof command protocol
//!
//! - Command: typed, validated method calls
//! - Dispatcher: runs a command against the engine, classifies failures
//! - Reply: success value or `{code, message, details}` error object
//! - Engine: the native prover seam, plus a fixture-backed implementation

mod command;
mod dispatcher;
mod engine;
pub mod fixture;
mod reply;

pub use command::{Command, Method, GENERATE_METHOD, VERIFY_METHOD};
pub use dispatcher::{DispatchError, Dispatcher};
pub use engine::{EngineError, ProofLib, ProvingEngine};
pub use fixture::FixtureEngine;
pub use reply::{ErrorCode, ErrorReply, Reply};
