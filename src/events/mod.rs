//! Events — OS deep-link delivery to the UI shell
//!
//! A single-subscriber relay: one current sink, replaced on subscribe,
//! cleared on cancel. Each event is the absolute URI text of a link.

mod relay;

pub use relay::{ChannelSink, Delivery, EventRelay, EventSink, SubscriptionId};
