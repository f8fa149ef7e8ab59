// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Observer and interceptor configuration
//!
//! [`ObserverOptions`] is the configuration snapshot the interceptors read. It is
//! built once (in code or from JSON), wrapped in an `Arc` and never mutated
//! afterwards.

use std::path::Path;

use serde::Deserialize;

use crate::error::Result;
use crate::network::IgnoreRule;

/// Per-channel reporting switches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ChannelToggles {
    /// Report requests issued by the host application
    pub server: bool,
}

/// Observer configuration snapshot
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ObserverOptions {
    /// Performance reporting switches
    pub performance: ChannelToggles,
    /// Error reporting switches
    pub error: ChannelToggles,
    /// URLs excluded from observation, checked in order
    pub ignore_request: Vec<IgnoreRule>,
    /// Interceptor tuning
    pub interceptor: InterceptorConfig,
}

/// Callback interceptor tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InterceptorConfig {
    /// Pending request contexts kept before the oldest is evicted
    pub max_pending_contexts: usize,
}

impl Default for InterceptorConfig {
    fn default() -> Self {
        Self {
            max_pending_contexts: 1024,
        }
    }
}

impl ObserverOptions {
    /// Create options with every channel disabled
    pub fn new() -> Self {
        Self::default()
    }

    /// Create options with performance and error reporting enabled
    pub fn all_enabled() -> Self {
        Self::new().performance_server(true).error_server(true)
    }

    /// Enable/disable performance reporting for requests
    pub fn performance_server(mut self, enabled: bool) -> Self {
        self.performance.server = enabled;
        self
    }

    /// Enable/disable error reporting for requests
    pub fn error_server(mut self, enabled: bool) -> Self {
        self.error.server = enabled;
        self
    }

    /// Add an ignore rule
    pub fn ignore(mut self, rule: IgnoreRule) -> Self {
        self.ignore_request.push(rule);
        self
    }

    /// Ignore an exact URL
    pub fn ignore_exact(self, url: impl Into<String>) -> Self {
        self.ignore(IgnoreRule::exact(url))
    }

    /// Ignore URLs matching a regex
    pub fn ignore_pattern(self, pattern: &str) -> Result<Self> {
        Ok(self.ignore(IgnoreRule::pattern(pattern)?))
    }

    /// Set the pending context limit
    pub fn max_pending_contexts(mut self, max: usize) -> Self {
        self.interceptor.max_pending_contexts = max;
        self
    }

    /// Whether any request channel is enabled
    pub fn observes_requests(&self) -> bool {
        self.performance.server || self.error.server
    }

    /// Parse options from JSON
    ///
    /// ```json
    /// {
    ///   "performance": { "server": true },
    ///   "error": { "server": true },
    ///   "ignoreRequest": ["https://example.com/health", { "pattern": "/metrics$" }]
    /// }
    /// ```
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load options from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }
}
