// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! The observable surface of a callback-style transport

use std::sync::Arc;

use serde::Serialize;

use super::context::RequestHandle;

/// Transport readiness, numbered like the platform API
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[repr(u8)]
pub enum ReadyState {
    #[default]
    Unsent = 0,
    Opened = 1,
    HeadersReceived = 2,
    Loading = 3,
    Done = 4,
}

impl ReadyState {
    /// Numeric value
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Whether the request has fully completed
    pub fn is_done(self) -> bool {
        self == ReadyState::Done
    }
}

/// Transport fields read by a readiness listener
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransportSnapshot {
    /// Request currently open on the transport
    pub handle: Option<RequestHandle>,
    pub ready_state: ReadyState,
    pub status: u16,
    pub status_text: String,
    /// Final URL; empty when the transport did not report one
    pub response_url: String,
    pub response_text: String,
}

/// Readiness-change listener
pub type ReadyStateListener = Arc<dyn Fn(&TransportSnapshot) + Send + Sync>;

/// A callback-style transport the interceptor can watch
pub trait CallbackTransport: Send + Sync {
    /// Request currently open on the transport
    fn request_handle(&self) -> Option<RequestHandle>;

    /// Register a listener for the request currently open.
    ///
    /// The listener fires on every readiness change. When the transport is
    /// re-opened it sees the new state once and is then dropped.
    fn add_ready_state_listener(&self, listener: ReadyStateListener);
}
