// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! reqscope CLI - Request Observability
//!
//! Issues a request through one of the instrumented APIs and prints the
//! telemetry it produced.

use std::env;
use std::process::ExitCode;
use std::sync::Arc;

use reqscope::{
    Clock, CollectingSink, EventBus, FetchOptions, HttpClient, InstallOutcome, NetworkObserver,
    ObservedFetch, ObserverOptions, SystemClock, XmlHttpRequest,
};

/// Everything a command needs to issue observed requests
struct Session {
    bus: EventBus,
    sink: CollectingSink,
    clock: Arc<dyn Clock>,
    client: HttpClient,
    _observer: NetworkObserver,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("reqscope=info".parse().unwrap()),
        )
        .init();

    let mut args: Vec<String> = env::args().collect();
    let config_path = match take_option(&mut args, "--config") {
        Ok(path) => path,
        Err(msg) => {
            eprintln!("{}", msg);
            return ExitCode::from(1);
        }
    };

    if args.len() < 2 {
        print_usage();
        return ExitCode::from(1);
    }

    match args[1].as_str() {
        "fetch" => {
            if args.len() < 3 {
                eprintln!("Usage: reqscope fetch <url> [--config <file>]");
                return ExitCode::from(1);
            }
            match session(config_path.as_deref()) {
                Some(session) => run_fetch(session, &args[2]).await,
                None => ExitCode::from(1),
            }
        }
        "xhr" => {
            if args.len() < 4 {
                eprintln!("Usage: reqscope xhr <method> <url> [body] [--config <file>]");
                return ExitCode::from(1);
            }
            match session(config_path.as_deref()) {
                Some(session) => {
                    run_xhr(session, &args[2], &args[3], args.get(4).map(String::as_str)).await
                }
                None => ExitCode::from(1),
            }
        }
        "--help" | "-h" | "help" => {
            print_usage();
            ExitCode::SUCCESS
        }
        "--version" | "-v" | "version" => {
            println!("reqscope {}", reqscope::VERSION);
            ExitCode::SUCCESS
        }
        cmd => {
            eprintln!("Unknown command: {}", cmd);
            print_usage();
            ExitCode::from(1)
        }
    }
}

fn print_usage() {
    println!(
        r#"reqscope - Request Observability

USAGE:
    reqscope <COMMAND> [OPTIONS]

COMMANDS:
    fetch <url>                   Issue a GET through the promise-style API
    xhr <method> <url> [body]     Issue a request through the callback-style API
    help                          Show this help message
    version                       Show version information

OPTIONS:
    --config <file>    JSON observer options (default: all channels enabled)

EXAMPLES:
    reqscope fetch https://example.com
    reqscope xhr POST https://httpbin.org/post 'a=1'
    reqscope fetch https://example.com/health --config observer.json

Telemetry events are printed as one JSON object per line.
"#
    );
}

/// Remove `--name <value>` from the argument list
fn take_option(args: &mut Vec<String>, name: &str) -> Result<Option<String>, String> {
    let Some(pos) = args.iter().position(|a| a == name) else {
        return Ok(None);
    };
    if pos + 1 >= args.len() {
        return Err(format!("{} requires a value", name));
    }
    let value = args.remove(pos + 1);
    args.remove(pos);
    Ok(Some(value))
}

fn session(config_path: Option<&str>) -> Option<Session> {
    let options = match config_path {
        Some(path) => match ObserverOptions::from_file(path) {
            Ok(options) => options,
            Err(e) => {
                eprintln!("Failed to load {}: {}", path, e);
                return None;
            }
        },
        None => ObserverOptions::all_enabled(),
    };

    let client = match HttpClient::new() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to create HTTP client: {}", e);
            return None;
        }
    };

    let bus = EventBus::new();
    let sink = CollectingSink::new();
    let clock: Arc<dyn Clock> = Arc::new(SystemClock::new());
    let observer =
        NetworkObserver::with_clock(options, bus.clone(), Arc::new(sink.clone()), clock.clone());

    match observer.init_network_observability() {
        InstallOutcome::Disabled => {
            eprintln!("All request channels are disabled; no telemetry will be produced");
        }
        InstallOutcome::Rejected => {
            eprintln!("Interceptors already installed by another observer");
            return None;
        }
        InstallOutcome::Installed | InstallOutcome::AlreadyInstalled => {}
    }

    Some(Session {
        bus,
        sink,
        clock,
        client,
        _observer: observer,
    })
}

async fn run_fetch(session: Session, url: &str) -> ExitCode {
    let fetch = ObservedFetch::new(session.client, session.bus, session.clock);

    match fetch.fetch(url, FetchOptions::default()).await {
        Ok(response) => {
            eprintln!(
                "{} {} ({}ms, {})",
                response.status_code(),
                response.url_str(),
                response.response_time_ms,
                response.content_type().unwrap_or("no content type")
            );
            print_events(&session.sink)
        }
        Err(e) => {
            eprintln!("Request failed: {}", e);
            ExitCode::from(1)
        }
    }
}

async fn run_xhr(session: Session, method: &str, url: &str, body: Option<&str>) -> ExitCode {
    let xhr = XmlHttpRequest::new(session.bus);
    xhr.open(method, url);

    let result = xhr.send_via(&session.client, body).await;
    if let Err(ref e) = result {
        eprintln!("Request failed: {}", e);
    } else {
        eprintln!("{} {}", xhr.status(), xhr.response_url());
    }

    // A network failure still produces an error event worth printing.
    let printed = print_events(&session.sink);
    if result.is_err() {
        ExitCode::from(1)
    } else {
        printed
    }
}

fn print_events(sink: &CollectingSink) -> ExitCode {
    for event in sink.drain() {
        match serde_json::to_string(&event) {
            Ok(line) => println!("{}", line),
            Err(e) => {
                eprintln!("Failed to serialize event: {}", e);
                return ExitCode::from(1);
            }
        }
    }
    ExitCode::SUCCESS
}
