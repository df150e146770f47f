//! mopro-bridge host — drive the bridge from a terminal or a test harness
//!
//! Reads one command per line on stdin, writes JSON replies and events on
//! stdout:
//!   call <method> <json-args>   — method call on the proof channel
//!   listen | cancel             — attach / detach the event stream
//!   open <url>                  — URL opened while running
//!   intent [url]                — intent re-delivered with link data
//!   activity <type> [url]       — continued user activity
//!   help | quit
//!
//! The launch-time link check runs once at startup, fed by `--launch-url`.

use mopro_bridge::dispatch::{EngineError, FixtureEngine, ProofLib, ProvingEngine};
use mopro_bridge::platform::{BridgeConfig, PlatformBridge, UserActivity};
use mopro_bridge::{EventRelay, ProofResult};
use serde_json::{json, Value};
use std::env;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

const CONFIG_ENV: &str = "MOPRO_BRIDGE_CONFIG";

fn print_usage() {
    println!(
        r#"
mopro-bridge — proof command & deep-link bridge host

Usage: mopro-bridge [--config <path>] [--fixture <proof.json>]
                    [--listen] [--launch-url <url>]

  --listen             Attach the event stream before the launch check
  --launch-url <url>   Deep link the app was launched with

Then, one command per line on stdin:
  call <method> <json-args>   Method call, e.g.
                              call generateCircomProof {{"zkeyPath":"m.zkey","inputs":"{{}}","proofLib":"arkworks"}}
  listen                      Attach the event stream (events print as JSON lines)
  cancel                      Detach the event stream
  open <url>                  URL opened while running
  intent [url]                Intent re-delivered to the running app
  activity <type> [url]       Continued user activity (universal links)
  help                        Show this text
  quit                        Exit

Config path may also come from ${}.
"#,
        CONFIG_ENV
    );
}

/// Engine used when no fixture is given: every call fails with a diagnostic
struct UnlinkedEngine;

impl ProvingEngine for UnlinkedEngine {
    fn generate_proof(&self, _: &str, _: &str, _: ProofLib) -> Result<ProofResult, EngineError> {
        Err(EngineError::new("no native prover linked; start with --fixture"))
    }

    fn verify_proof(&self, _: &str, _: &ProofResult, _: ProofLib) -> Result<bool, EngineError> {
        Err(EngineError::new("no native prover linked; start with --fixture"))
    }
}

enum Engine {
    Fixture(FixtureEngine),
    Unlinked(UnlinkedEngine),
}

impl ProvingEngine for Engine {
    fn generate_proof(&self, zkey_path: &str, circuit_inputs: &str, proof_lib: ProofLib) -> Result<ProofResult, EngineError> {
        match self {
            Engine::Fixture(e) => e.generate_proof(zkey_path, circuit_inputs, proof_lib),
            Engine::Unlinked(e) => e.generate_proof(zkey_path, circuit_inputs, proof_lib),
        }
    }

    fn verify_proof(&self, zkey_path: &str, proof: &ProofResult, proof_lib: ProofLib) -> Result<bool, EngineError> {
        match self {
            Engine::Fixture(e) => e.verify_proof(zkey_path, proof, proof_lib),
            Engine::Unlinked(e) => e.verify_proof(zkey_path, proof, proof_lib),
        }
    }
}

#[derive(Debug, Default)]
struct Options {
    config_path: Option<String>,
    fixture_path: Option<String>,
    launch_url: Option<String>,
    listen: bool,
}

fn parse_options(args: &[String]) -> Result<Options, String> {
    let mut options = Options {
        config_path: env::var(CONFIG_ENV).ok(),
        ..Options::default()
    };
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                options.config_path = Some(iter.next().ok_or("--config needs a path")?.clone());
            }
            "--fixture" => {
                options.fixture_path = Some(iter.next().ok_or("--fixture needs a path")?.clone());
            }
            "--launch-url" => {
                options.launch_url = Some(iter.next().ok_or("--launch-url needs a url")?.clone());
            }
            "--listen" => options.listen = true,
            other => return Err(format!("Unknown option: {}", other)),
        }
    }
    Ok(options)
}

fn emit(value: Value) {
    println!("{}", value);
}

#[tokio::main]
async fn main() {
    let args: Vec<String> = env::args().skip(1).collect();
    if args.iter().any(|a| a == "help" || a == "--help" || a == "-h") {
        print_usage();
        return;
    }

    let options = match parse_options(&args) {
        Ok(o) => o,
        Err(e) => {
            eprintln!("{}", e);
            print_usage();
            std::process::exit(2);
        }
    };

    let config = match &options.config_path {
        Some(path) => match BridgeConfig::load_or_default(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("{}", e);
                std::process::exit(2);
            }
        },
        None => BridgeConfig::default(),
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(config.log_filter.as_str()))
        .format_timestamp_millis()
        .init();

    let engine = match &options.fixture_path {
        Some(path) => match FixtureEngine::load(path) {
            Ok(e) => Engine::Fixture(e),
            Err(e) => {
                eprintln!("{}", e);
                std::process::exit(2);
            }
        },
        None => {
            log::warn!("No fixture given; proof calls will fail");
            Engine::Unlinked(UnlinkedEngine)
        }
    };

    let relay = Arc::new(EventRelay::new());
    let bridge = Arc::new(PlatformBridge::new(engine, Arc::clone(&relay), config));
    if options.listen {
        cmd_listen(&bridge);
    }
    // consumes the once-only check even without a url
    bridge.on_launch(options.launch_url.as_deref());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                eprintln!("stdin: {}", e);
                break;
            }
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let mut parts = line.splitn(2, char::is_whitespace);
        let cmd = parts.next().unwrap_or_default();
        let rest = parts.next().unwrap_or_default().trim();

        match cmd {
            "call" => cmd_call(&bridge, rest).await,
            "listen" => cmd_listen(&bridge),
            "cancel" => bridge.on_cancel(),
            "open" => match non_empty(rest) {
                Some(url) => {
                    bridge.on_open_url(url);
                }
                None => eprintln!("Usage: open <url>"),
            },
            "intent" => {
                bridge.on_new_intent(non_empty(rest));
            }
            "activity" => cmd_activity(&bridge, rest),
            "help" => print_usage(),
            "quit" | "exit" => break,
            other => eprintln!("Unknown command: {}", other),
        }
    }
}

fn non_empty(s: &str) -> Option<&str> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

async fn cmd_call(bridge: &Arc<PlatformBridge<Engine>>, rest: &str) {
    let mut parts = rest.splitn(2, char::is_whitespace);
    let method = parts.next().unwrap_or_default().to_string();
    if method.is_empty() {
        eprintln!("Usage: call <method> <json-args>");
        return;
    }
    let args: Value = match parts.next().map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => match serde_json::from_str(raw) {
            Ok(v) => v,
            Err(e) => {
                eprintln!("Arguments are not JSON: {}", e);
                return;
            }
        },
        None => Value::Null,
    };

    // the engine call blocks for its full duration; keep it off the reactor
    let worker = Arc::clone(bridge);
    match tokio::task::spawn_blocking(move || worker.handle_method_call(&method, &args)).await {
        Ok(reply) => emit(reply.to_json()),
        Err(e) => eprintln!("Call aborted: {}", e),
    }
}

fn cmd_listen(bridge: &Arc<PlatformBridge<Engine>>) {
    let (sink, mut rx) = mopro_bridge::events::ChannelSink::new();
    let id = bridge.on_listen(sink);
    tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            emit(json!({ "event": event, "subscription": id.to_string() }));
        }
    });
}

fn cmd_activity(bridge: &Arc<PlatformBridge<Engine>>, rest: &str) {
    let mut parts = rest.split_whitespace();
    let activity_type = match parts.next() {
        Some(t) => t,
        None => {
            eprintln!("Usage: activity <type> [url]");
            return;
        }
    };
    let activity = UserActivity::new(activity_type, parts.next().map(str::to_string));
    let handled = bridge.on_continue_user_activity(&activity);
    log::debug!("Activity {} handled={}", activity_type, handled);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_launch_options() {
        let options = parse_options(&args(&["--listen", "--launch-url", "wc:abc@2"])).unwrap();
        assert!(options.listen);
        assert_eq!(options.launch_url.as_deref(), Some("wc:abc@2"));
        assert!(options.fixture_path.is_none());
    }

    #[test]
    fn test_launch_url_defaults_to_none() {
        let options = parse_options(&args(&["--fixture", "proof.json"])).unwrap();
        assert!(!options.listen);
        assert!(options.launch_url.is_none());
        assert_eq!(options.fixture_path.as_deref(), Some("proof.json"));
    }

    #[test]
    fn test_launch_url_needs_value() {
        let err = parse_options(&args(&["--launch-url"])).unwrap_err();
        assert_eq!(err, "--launch-url needs a url");
        assert!(parse_options(&args(&["--launch"])).is_err());
    }
}
