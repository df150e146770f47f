//! mopro-bridge — Mobile platform bridge for a native ZK prover
//!
//! Carries proof objects between a cross-platform UI shell and a native
//! proving engine over a typed boundary, and relays OS deep links to the
//! UI's single event subscriber.

pub mod proof;
pub mod dispatch;
pub mod events;
pub mod platform;

pub use proof::{ProofResult, Proof, G1, G2, DecodePolicy, FormatError};
pub use dispatch::{Dispatcher, DispatchError, ProvingEngine, ProofLib, EngineError, Reply, FixtureEngine};
pub use events::{EventRelay, EventSink, Delivery};
pub use platform::{PlatformBridge, BridgeConfig};
