//! PlatformBridge — the per-OS entry point
//!
//! Platform callbacks land here and nowhere else:
//! - method calls on the proof channel go to the dispatcher
//! - stream listen / cancel on the event channel drive the relay's sink
//! - every OS deep-link callback (launch link, URL opened while running,
//!   universal-link activity, re-delivered intent) publishes through the
//!   same relay, in the order the OS invokes them

use super::config::BridgeConfig;
use crate::dispatch::{Dispatcher, ProvingEngine, Reply};
use crate::events::{Delivery, EventRelay, EventSink, SubscriptionId};
use log::{debug, info, warn};
use serde_json::Value;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Activity type carried by universal-link activities
pub const BROWSING_WEB_ACTIVITY: &str = "NSUserActivityTypeBrowsingWeb";

/// Which OS callback produced a link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkSource {
    /// Link pending when the app started
    Launch,
    /// Custom URL scheme opened while running
    UrlScheme,
    /// Universal link continued as a user activity
    UniversalLink,
    /// Intent re-delivered to a running activity
    NewIntent,
}

impl fmt::Display for LinkSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LinkSource::Launch => "launch",
            LinkSource::UrlScheme => "url-scheme",
            LinkSource::UniversalLink => "universal-link",
            LinkSource::NewIntent => "new-intent",
        };
        f.write_str(s)
    }
}

/// A user activity handed over by the OS
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserActivity {
    pub activity_type: String,
    pub webpage_url: Option<String>,
}

impl UserActivity {
    pub fn new(activity_type: impl Into<String>, webpage_url: Option<String>) -> Self {
        Self {
            activity_type: activity_type.into(),
            webpage_url,
        }
    }

    pub fn browsing_web(url: impl Into<String>) -> Self {
        Self::new(BROWSING_WEB_ACTIVITY, Some(url.into()))
    }

    pub fn is_browsing_web(&self) -> bool {
        self.activity_type == BROWSING_WEB_ACTIVITY
    }
}

/// Wires platform callbacks to a dispatcher and an injected relay
pub struct PlatformBridge<E> {
    config: BridgeConfig,
    dispatcher: Dispatcher<E>,
    relay: Arc<EventRelay>,
    launched: AtomicBool,
}

impl<E> fmt::Debug for PlatformBridge<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlatformBridge")
            .field("config", &self.config)
            .field("relay", &self.relay)
            .field("launched", &self.launched.load(Ordering::SeqCst))
            .finish()
    }
}

impl<E: ProvingEngine> PlatformBridge<E> {
    pub fn new(engine: E, relay: Arc<EventRelay>, config: BridgeConfig) -> Self {
        info!(
            "Bridge up: methods on '{}', events on '{}', decode policy {:?}",
            config.method_channel, config.event_channel, config.decode_policy
        );
        Self {
            dispatcher: Dispatcher::with_policy(engine, config.decode_policy),
            config,
            relay,
            launched: AtomicBool::new(false),
        }
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub fn dispatcher(&self) -> &Dispatcher<E> {
        &self.dispatcher
    }

    pub fn relay(&self) -> &Arc<EventRelay> {
        &self.relay
    }

    /// A method call on the proof channel
    pub fn handle_method_call(&self, method: &str, args: &Value) -> Reply {
        self.dispatcher.handle(method, args)
    }

    /// A method call that names its channel; other channels are not ours
    pub fn handle_channel_call(&self, channel: &str, method: &str, args: &Value) -> Reply {
        if channel != self.config.method_channel {
            debug!("Ignoring call {} on foreign channel '{}'", method, channel);
            return Reply::NotImplemented;
        }
        self.handle_method_call(method, args)
    }

    /// The UI side started listening on the event channel
    pub fn on_listen(&self, sink: impl EventSink + 'static) -> SubscriptionId {
        debug!("Listener attached to '{}'", self.config.event_channel);
        self.relay.subscribe(sink)
    }

    /// The UI side cancelled its event stream
    pub fn on_cancel(&self) {
        debug!("Listener detached from '{}'", self.config.event_channel);
        self.relay.unsubscribe();
    }

    /// Launch-time link check; effective once per bridge
    ///
    /// Returns `None` when there was no launch link or the check already
    /// ran. A launch link that arrives before anyone listens is dropped.
    pub fn on_launch(&self, launch_url: Option<&str>) -> Option<Delivery> {
        if self.launched.swap(true, Ordering::SeqCst) {
            warn!("Launch link check already performed; ignoring");
            return None;
        }
        match launch_url {
            Some(url) => Some(self.relay_link(LinkSource::Launch, url)),
            None => {
                debug!("No deep link at launch");
                None
            }
        }
    }

    /// A URL opened into the running app
    pub fn on_open_url(&self, url: &str) -> bool {
        self.relay_link(LinkSource::UrlScheme, url);
        true
    }

    /// An intent re-delivered to the running app, with optional link data
    pub fn on_new_intent(&self, data: Option<&str>) -> Option<Delivery> {
        match data {
            Some(url) => Some(self.relay_link(LinkSource::NewIntent, url)),
            None => {
                debug!("No deep link data in intent");
                None
            }
        }
    }

    /// A continued user activity; handled only for web-browsing links
    pub fn on_continue_user_activity(&self, activity: &UserActivity) -> bool {
        if !activity.is_browsing_web() {
            debug!("Ignoring user activity of type {}", activity.activity_type);
            return false;
        }
        match &activity.webpage_url {
            Some(url) => {
                self.relay_link(LinkSource::UniversalLink, url);
                true
            }
            None => false,
        }
    }

    fn relay_link(&self, source: LinkSource, url: &str) -> Delivery {
        // link text never goes above debug
        info!("Received deep link via {}", source);
        debug!("Deep link via {}: {}", source, url);
        self.relay.publish(url)
    }
}
