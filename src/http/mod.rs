// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP client layer used by the instrumented hosts
//!
//! A thin `reqwest` wrapper whose responses keep the final URL and status
//! text the observers read at completion.

mod client;
mod request;
mod response;

pub use client::{HttpClient, HttpClientConfig};
pub use request::Request;
pub use response::Response;

/// Default user agent string
pub const DEFAULT_USER_AGENT: &str = concat!("reqscope/", env!("CARGO_PKG_VERSION"));
