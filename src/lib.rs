// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! # reqscope - Request Observability Core
//!
//! Observes every outbound HTTP request a hosted application makes, through
//! either of two networking APIs, and turns each completion into a typed
//! telemetry event.
//!
//! ## Features
//!
//! - Promise-style API: observed at its single completion, no shared state
//! - Callback-style API: `open` / `send` / readiness changes correlated per
//!   request handle, so overlapping requests keep their own metadata
//! - Ignore rules: exact URLs or regex patterns
//! - Classification: 200/304 are performance events, everything else errors
//! - Channel gating from an immutable options snapshot
//! - Observer failures never reach the host request
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use reqscope::{
//!     CollectingSink, EventBus, HttpClient, NetworkObserver, ObserverOptions, XmlHttpRequest,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let bus = EventBus::new();
//!     let sink = CollectingSink::new();
//!     let observer = NetworkObserver::new(
//!         ObserverOptions::all_enabled().ignore_exact("https://example.com/health"),
//!         bus.clone(),
//!         Arc::new(sink.clone()),
//!     );
//!     observer.init_network_observability();
//!
//!     let xhr = XmlHttpRequest::new(bus);
//!     xhr.open("GET", "https://example.com/");
//!     xhr.send_via(&HttpClient::new()?, None).await?;
//!
//!     for event in sink.events() {
//!         println!("{}", serde_json::to_string(&event)?);
//!     }
//!     Ok(())
//! }
//! ```

pub mod clock;
pub mod config;
pub mod error;
pub mod host;
pub mod http;
pub mod network;
pub mod observer;

// Re-exports for convenience

// Observer
pub use observer::{InstallOutcome, NetworkObserver};

// Configuration
pub use config::{ChannelToggles, InterceptorConfig, ObserverOptions};

// Clock
pub use clock::{Clock, ManualClock, SystemClock};

// Errors
pub use error::{Error, Result};

// Hosts
pub use host::{ObservedFetch, XmlHttpRequest};

// HTTP
pub use http::{HttpClient, HttpClientConfig, Request, Response};

// Network
pub use network::{
    CallbackInterceptor, FetchInterceptor, IgnoreMatcher, IgnoreRule, RequestContext,
    RequestHandle,
};
pub use network::{ChannelSink, CollectingSink, TelemetryDispatcher, TelemetrySink};
pub use network::{ErrorEvent, EventBus, EventId, PerformanceEvent, TelemetryEvent};
pub use network::{FetchCompletion, FetchOptions, FetchResponse, ReadyState};

/// reqscope version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
