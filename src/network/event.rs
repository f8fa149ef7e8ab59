// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Telemetry event types and request classification

use serde::Serialize;

/// Origin tag carried by every event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventId {
    /// Request issued by the host application
    Server,
}

/// Successful request timing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceEvent {
    pub event_id: EventId,
    pub request_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_method: Option<String>,
    /// Milliseconds from dispatch to completion
    pub duration: u64,
    pub response_status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<String>,
}

/// Failed request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEvent {
    pub event_id: EventId,
    pub err_message: String,
    pub request_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_method: Option<String>,
    pub response_status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<String>,
}

/// Classified request telemetry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TelemetryEvent {
    Performance(PerformanceEvent),
    Error(ErrorEvent),
}

impl TelemetryEvent {
    /// URL the event refers to
    pub fn request_url(&self) -> &str {
        match self {
            TelemetryEvent::Performance(e) => &e.request_url,
            TelemetryEvent::Error(e) => &e.request_url,
        }
    }

    /// HTTP status the event refers to
    pub fn response_status(&self) -> u16 {
        match self {
            TelemetryEvent::Performance(e) => e.response_status,
            TelemetryEvent::Error(e) => e.response_status,
        }
    }

    /// Check if this is a performance event
    pub fn is_performance(&self) -> bool {
        matches!(self, TelemetryEvent::Performance(_))
    }

    /// Check if this is an error event
    pub fn is_error(&self) -> bool {
        matches!(self, TelemetryEvent::Error(_))
    }
}

/// Statuses classified as success. Everything else, including 0, is a failure.
pub fn is_success_status(status: u16) -> bool {
    matches!(status, 200 | 304)
}

/// Methods whose request body is attached to events
pub fn is_post_like(method: &str) -> bool {
    ["POST", "PUT", "PATCH"]
        .iter()
        .any(|m| m.eq_ignore_ascii_case(method))
}

/// A finished request, normalised from either networking API
#[derive(Debug, Clone, Default)]
pub struct CompletedRequest {
    /// Resolved URL
    pub url: String,
    /// Method to report, if the API exposes one to telemetry
    pub reported_method: Option<String>,
    /// Method used to decide whether the body is attached
    pub method: String,
    pub status: u16,
    pub status_text: String,
    /// Body text used when `status_text` is empty
    pub response_text: Option<String>,
    /// Request body
    pub body: Option<String>,
    /// Milliseconds from dispatch to completion
    pub duration: u64,
}

impl CompletedRequest {
    /// Classify into a performance or error event
    pub fn classify(self) -> TelemetryEvent {
        let params = if is_post_like(&self.method) {
            self.body.filter(|b| !b.is_empty())
        } else {
            None
        };

        if is_success_status(self.status) {
            TelemetryEvent::Performance(PerformanceEvent {
                event_id: EventId::Server,
                request_url: self.url,
                request_method: self.reported_method,
                duration: self.duration,
                response_status: self.status,
                params,
            })
        } else {
            let err_message = if self.status_text.is_empty() {
                self.response_text.unwrap_or_default()
            } else {
                self.status_text
            };

            TelemetryEvent::Error(ErrorEvent {
                event_id: EventId::Server,
                err_message,
                request_url: self.url,
                request_method: self.reported_method,
                response_status: self.status,
                params,
            })
        }
    }
}
