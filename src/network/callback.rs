// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Callback-style request observation (open → send → readiness changes)
//!
//! Every `open` gets its own [`RequestHandle`]. The watcher registered at
//! `send` captures that handle and looks up its own [`RequestContext`] when the
//! transport reports completion, so overlapping requests never borrow each
//! other's URL, method or timing.

use std::sync::Arc;

use super::bus::{guard, EventBus, HookId, LifecycleHook};
use super::context::{ContextTable, RequestContext, RequestHandle};
use super::dispatch::{Dispatch, TelemetryDispatcher};
use super::event::CompletedRequest;
use super::ignore::IgnoreMatcher;
use super::transport::{CallbackTransport, TransportSnapshot};
use crate::clock::Clock;
use crate::config::InterceptorConfig;
use crate::error::{Error, Result};

/// Observer for the callback-style API
pub struct CallbackInterceptor {
    contexts: ContextTable,
    ignore: IgnoreMatcher,
    dispatcher: Arc<TelemetryDispatcher>,
    clock: Arc<dyn Clock>,
}

impl CallbackInterceptor {
    pub const OPEN_HOOK: HookId = HookId::new("callback-interceptor.open");
    pub const SEND_HOOK: HookId = HookId::new("callback-interceptor.send");

    /// Create an interceptor
    pub fn new(
        ignore: IgnoreMatcher,
        dispatcher: Arc<TelemetryDispatcher>,
        clock: Arc<dyn Clock>,
        config: InterceptorConfig,
    ) -> Self {
        Self {
            contexts: ContextTable::new(config.max_pending_contexts),
            ignore,
            dispatcher,
            clock,
        }
    }

    /// Register the open and send hooks. False if either was already registered.
    pub fn install(self: Arc<Self>, bus: &EventBus) -> bool {
        let this = Arc::clone(&self);
        let open = LifecycleHook::Open(Arc::new(
            move |handle: RequestHandle, method: &str, url: &str| {
                this.on_open(handle, method, url);
            },
        ));

        let this = Arc::clone(&self);
        let send = LifecycleHook::Send(Arc::new(
            move |transport: &dyn CallbackTransport, body: Option<&str>| {
                if let Err(e) = this.on_send(transport, body) {
                    tracing::debug!(error = %e, "Send not correlated");
                }
            },
        ));

        let opened = bus.register(Self::OPEN_HOOK, open);
        let sent = bus.register(Self::SEND_HOOK, send);
        opened && sent
    }

    /// Requests opened but not yet completed
    pub fn pending(&self) -> usize {
        self.contexts.len()
    }

    /// Record method and URL for a newly opened request
    pub fn on_open(&self, handle: RequestHandle, method: &str, url: &str) {
        let context = RequestContext::opened(method, url);
        if let Some(evicted) = self.contexts.insert(handle, context) {
            tracing::warn!(%evicted, "Pending request contexts full, dropped oldest");
        }
    }

    /// Record the trigger time and watch the transport for completion
    pub fn on_send(
        self: &Arc<Self>,
        transport: &dyn CallbackTransport,
        body: Option<&str>,
    ) -> Result<()> {
        let handle = transport
            .request_handle()
            .ok_or_else(|| Error::other("send on a transport that was never opened"))?;

        if !self.contexts.mark_sent(handle, self.clock.now_ms()) {
            return Err(Error::MissingContext { handle });
        }

        let this = Arc::clone(self);
        let body = body.map(str::to_owned);
        transport.add_ready_state_listener(Arc::new(move |snapshot: &TransportSnapshot| {
            guard(Self::SEND_HOOK, || {
                match this.on_ready_state_change(handle, body.as_deref(), snapshot) {
                    Ok(_) => {}
                    Err(e) if e.is_correlation() => {
                        tracing::debug!(%handle, error = %e, "Completion not correlated");
                    }
                    Err(e) => {
                        tracing::warn!(%handle, error = %e, "Request telemetry dropped");
                    }
                }
            });
        }));

        Ok(())
    }

    /// Handle one readiness change for `handle`.
    ///
    /// Only the `Done` state classifies. A watcher whose transport has since
    /// been re-opened drops its context on the first change it sees.
    pub fn on_ready_state_change(
        &self,
        handle: RequestHandle,
        body: Option<&str>,
        snapshot: &TransportSnapshot,
    ) -> Result<Option<Dispatch>> {
        if snapshot.handle != Some(handle) {
            // Re-opening a transport abandons the request it carried.
            tracing::trace!(%handle, "Stale readiness watcher");
            self.contexts.take(handle);
            return Ok(None);
        }
        if !snapshot.ready_state.is_done() {
            return Ok(None);
        }

        let context = self
            .contexts
            .take(handle)
            .ok_or(Error::MissingContext { handle })?;
        let trigger_time = context
            .trigger_time
            .ok_or(Error::MissingTriggerTime { handle })?;

        let url = if snapshot.response_url.is_empty() {
            context.request_url
        } else {
            snapshot.response_url.clone()
        };

        if self.ignore.should_ignore(&url) {
            return Ok(None);
        }

        let request = CompletedRequest {
            url,
            reported_method: Some(context.request_method.clone()),
            method: context.request_method,
            status: snapshot.status,
            status_text: snapshot.status_text.clone(),
            response_text: Some(snapshot.response_text.clone()),
            body: body.map(str::to_owned),
            duration: self.clock.now_ms().saturating_sub(trigger_time),
        };

        self.dispatcher.dispatch(request.classify()).map(Some)
    }
}
