// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Callback-style request API (`open` / `send` / readiness changes)

use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::{Error, Result};
use crate::http::{HttpClient, Request};
use crate::network::{
    CallbackTransport, EventBus, ReadyState, ReadyStateListener, RequestHandle, TransportSnapshot,
};

/// Mutable request state
#[derive(Debug, Default)]
struct XhrState {
    handle: Option<RequestHandle>,
    method: String,
    url: String,
    sent: bool,
    ready_state: ReadyState,
    status: u16,
    status_text: String,
    response_url: String,
    response_text: String,
}

struct XhrInner {
    state: RwLock<XhrState>,
    listeners: RwLock<Vec<ReadyStateListener>>,
}

/// `XMLHttpRequest`-like transport
///
/// The request progresses either manually (`receive_headers`,
/// `receive_chunk`, `finish`, `fail`) or through [`send_via`](Self::send_via),
/// which performs the request with an [`HttpClient`]. Every state change
/// notifies the readiness listeners.
#[derive(Clone)]
pub struct XmlHttpRequest {
    inner: Arc<XhrInner>,
    bus: EventBus,
}

impl XmlHttpRequest {
    /// Create an unsent request bound to a bus
    pub fn new(bus: EventBus) -> Self {
        Self {
            inner: Arc::new(XhrInner {
                state: RwLock::new(XhrState::default()),
                listeners: RwLock::new(Vec::new()),
            }),
            bus,
        }
    }

    /// Start a new request. Any request previously open on this object is
    /// abandoned: its listeners see the new state once, then are dropped.
    pub fn open(&self, method: &str, url: &str) -> RequestHandle {
        let handle = RequestHandle::next();
        {
            let mut state = self.inner.state.write();
            *state = XhrState {
                handle: Some(handle),
                method: method.to_string(),
                url: url.to_string(),
                ready_state: ReadyState::Opened,
                ..Default::default()
            };
        }

        let abandoned = std::mem::take(&mut *self.inner.listeners.write());
        if !abandoned.is_empty() {
            let snapshot = self.snapshot();
            for listener in abandoned {
                listener(&snapshot);
            }
        }

        self.bus.emit_open(handle, method, url);
        handle
    }

    /// Dispatch the request
    pub fn send(&self, body: Option<&str>) -> Result<()> {
        {
            let mut state = self.inner.state.write();
            if state.ready_state != ReadyState::Opened || state.sent {
                return Err(Error::other("send() requires an opened, unsent request"));
            }
            state.sent = true;
        }

        self.bus.emit_send(self, body);
        Ok(())
    }

    /// Dispatch and perform the request with `client`
    ///
    /// A transport failure completes the request with status 0 and returns the
    /// error.
    pub async fn send_via(&self, client: &HttpClient, body: Option<&str>) -> Result<()> {
        let request = {
            let state = self.inner.state.read();
            Request::from_method_name(&state.method, &state.url)?
        };
        let request = match body {
            Some(body) => request.body(body.to_string()),
            None => request,
        };

        self.send(body)?;

        match client.execute(request).await {
            Ok(response) => {
                self.receive_headers(
                    response.status_code(),
                    response.status_text(),
                    response.url_str(),
                );
                self.receive_chunk(&response.text_lossy());
                self.finish();
                Ok(())
            }
            Err(e) => {
                tracing::debug!(error = %e, "Request failed at transport level");
                self.fail();
                Err(e)
            }
        }
    }

    /// Status line and final URL arrived
    pub fn receive_headers(&self, status: u16, status_text: &str, response_url: &str) {
        self.transition(ReadyState::HeadersReceived, |state| {
            state.status = status;
            state.status_text = status_text.to_string();
            state.response_url = response_url.to_string();
        });
    }

    /// Part of the body arrived
    pub fn receive_chunk(&self, chunk: &str) {
        self.transition(ReadyState::Loading, |state| {
            state.response_text.push_str(chunk);
        });
    }

    /// Response fully received
    pub fn finish(&self) {
        self.transition(ReadyState::Done, |_| {});
    }

    /// Network-level failure
    pub fn fail(&self) {
        self.transition(ReadyState::Done, |state| {
            state.status = 0;
            state.status_text.clear();
            state.response_text.clear();
        });
    }

    /// Current readiness
    pub fn ready_state(&self) -> ReadyState {
        self.inner.state.read().ready_state
    }

    /// HTTP status, 0 until headers arrive
    pub fn status(&self) -> u16 {
        self.inner.state.read().status
    }

    /// Status text
    pub fn status_text(&self) -> String {
        self.inner.state.read().status_text.clone()
    }

    /// Final URL, empty until headers arrive
    pub fn response_url(&self) -> String {
        self.inner.state.read().response_url.clone()
    }

    /// Body received so far
    pub fn response_text(&self) -> String {
        self.inner.state.read().response_text.clone()
    }

    #[cfg(test)]
    fn listener_count(&self) -> usize {
        self.inner.listeners.read().len()
    }

    fn transition<F: FnOnce(&mut XhrState)>(&self, next: ReadyState, update: F) {
        {
            let mut state = self.inner.state.write();
            if state.ready_state == ReadyState::Done || state.ready_state == ReadyState::Unsent {
                tracing::debug!(?next, "Ignoring transition on a request that is not in flight");
                return;
            }
            update(&mut state);
            state.ready_state = next;
        }
        self.notify();
    }

    fn snapshot(&self) -> TransportSnapshot {
        let state = self.inner.state.read();
        TransportSnapshot {
            handle: state.handle,
            ready_state: state.ready_state,
            status: state.status,
            status_text: state.status_text.clone(),
            response_url: state.response_url.clone(),
            response_text: state.response_text.clone(),
        }
    }

    fn notify(&self) {
        let snapshot = self.snapshot();
        let listeners = self.inner.listeners.read().clone();
        for listener in listeners {
            listener(&snapshot);
        }
    }
}

impl CallbackTransport for XmlHttpRequest {
    fn request_handle(&self) -> Option<RequestHandle> {
        self.inner.state.read().handle
    }

    fn add_ready_state_listener(&self, listener: ReadyStateListener) {
        self.inner.listeners.write().push(listener);
    }
}
