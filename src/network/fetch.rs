// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Promise-style request observation
//!
//! The fetch API is observed only at its terminal completion. Every
//! completion carries everything needed to classify it, so no state is kept
//! between calls and concurrent requests cannot interfere.

use std::sync::Arc;

use super::bus::{EventBus, HookId, LifecycleHook};
use super::dispatch::{Dispatch, TelemetryDispatcher};
use super::event::CompletedRequest;
use super::ignore::IgnoreMatcher;
use crate::clock::Clock;
use crate::error::Result;

/// Options the host passed alongside the request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchOptions {
    /// HTTP method; `GET` when absent
    pub method: Option<String>,
    /// Request body
    pub body: Option<String>,
}

impl FetchOptions {
    /// Options with an explicit method
    pub fn method(method: impl Into<String>) -> Self {
        Self {
            method: Some(method.into()),
            body: None,
        }
    }

    /// Set the body
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Effective method
    pub fn method_or_default(&self) -> &str {
        self.method.as_deref().unwrap_or("GET")
    }
}

/// Response fields visible at completion
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchResponse {
    /// Final URL
    pub url: String,
    pub status: u16,
    pub status_text: String,
}

/// Terminal callback payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchCompletion {
    /// URL argument the request was issued with
    pub request_url: String,
    pub options: FetchOptions,
    pub response: FetchResponse,
    /// Clock reading taken immediately before the request was dispatched
    pub start: u64,
}

/// Observer for the promise-style API
pub struct FetchInterceptor {
    ignore: IgnoreMatcher,
    dispatcher: Arc<TelemetryDispatcher>,
    clock: Arc<dyn Clock>,
}

impl FetchInterceptor {
    pub const HOOK: HookId = HookId::new("fetch-interceptor");

    /// Create an interceptor
    pub fn new(
        ignore: IgnoreMatcher,
        dispatcher: Arc<TelemetryDispatcher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            ignore,
            dispatcher,
            clock,
        }
    }

    /// Register the completion hook. False if already registered.
    pub fn install(self: Arc<Self>, bus: &EventBus) -> bool {
        let hook = LifecycleHook::Fetch(Arc::new(move |completion: &FetchCompletion| {
            if let Err(e) = self.on_complete(completion) {
                tracing::warn!(
                    url = %completion.response.url,
                    error = %e,
                    "Fetch telemetry dropped"
                );
            }
        }));
        bus.register(Self::HOOK, hook)
    }

    /// Classify and dispatch one completion.
    ///
    /// Returns `None` when the URL is ignored.
    pub fn on_complete(&self, completion: &FetchCompletion) -> Result<Option<Dispatch>> {
        let response = &completion.response;

        if self.ignore.should_ignore(&response.url) {
            return Ok(None);
        }

        let request = CompletedRequest {
            url: response.url.clone(),
            reported_method: None,
            method: completion.options.method_or_default().to_string(),
            status: response.status,
            status_text: response.status_text.clone(),
            response_text: None,
            body: completion.options.body.clone(),
            duration: self.clock.now_ms().saturating_sub(completion.start),
        };

        self.dispatcher.dispatch(request.classify()).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::config::ObserverOptions;
    use crate::network::dispatch::CollectingSink;
    use crate::network::event::{EventId, PerformanceEvent, TelemetryEvent};
    use crate::network::ignore::IgnoreRule;

    struct Fixture {
        interceptor: Arc<FetchInterceptor>,
        sink: CollectingSink,
        clock: Arc<ManualClock>,
    }

    fn fixture(options: ObserverOptions) -> Fixture {
        let sink = CollectingSink::new();
        let clock = Arc::new(ManualClock::new(1_000));
        let ignore = IgnoreMatcher::new(options.ignore_request.clone());
        let dispatcher = Arc::new(TelemetryDispatcher::new(
            Arc::new(options),
            Arc::new(sink.clone()),
        ));
        Fixture {
            interceptor: Arc::new(FetchInterceptor::new(ignore, dispatcher, clock.clone())),
            sink,
            clock,
        }
    }

    fn completion(
        status: u16,
        status_text: &str,
        options: FetchOptions,
        start: u64,
    ) -> FetchCompletion {
        FetchCompletion {
            request_url: "/api/y".to_string(),
            options,
            response: FetchResponse {
                url: "/api/y".to_string(),
                status,
                status_text: status_text.to_string(),
            },
            start,
        }
    }

    #[test]
    fn test_not_modified_is_performance() {
        let f = fixture(ObserverOptions::all_enabled());
        f.clock.set(1_250);

        let outcome = f
            .interceptor
            .on_complete(&completion(304, "", FetchOptions::method("GET"), 1_000))
            .unwrap();

        assert_eq!(outcome, Some(Dispatch::Sent));
        assert_eq!(
            f.sink.events(),
            vec![TelemetryEvent::Performance(PerformanceEvent {
                event_id: EventId::Server,
                request_url: "/api/y".to_string(),
                request_method: None,
                duration: 250,
                response_status: 304,
                params: None,
            })]
        );
    }

    #[test]
    fn test_method_defaults_to_get() {
        let f = fixture(ObserverOptions::all_enabled());
        let options = FetchOptions {
            method: None,
            body: Some("ignored".to_string()),
        };
        f.interceptor
            .on_complete(&completion(200, "OK", options, 1_000))
            .unwrap();

        match &f.sink.events()[0] {
            TelemetryEvent::Performance(e) => assert!(e.params.is_none()),
            other => panic!("Expected performance event, got {:?}", other),
        }
    }

    #[test]
    fn test_post_failure_carries_body() {
        let f = fixture(ObserverOptions::all_enabled());
        let options = FetchOptions::method("post").with_body(r#"{"a":1}"#);
        f.interceptor
            .on_complete(&completion(502, "Bad Gateway", options, 1_000))
            .unwrap();

        match &f.sink.events()[0] {
            TelemetryEvent::Error(e) => {
                assert_eq!(e.err_message, "Bad Gateway");
                assert_eq!(e.response_status, 502);
                assert_eq!(e.params.as_deref(), Some(r#"{"a":1}"#));
            }
            other => panic!("Expected error event, got {:?}", other),
        }
    }

    #[test]
    fn test_resolves_url_from_response() {
        let f = fixture(ObserverOptions::all_enabled().ignore(IgnoreRule::exact("/redirected")));
        let mut done = completion(200, "OK", FetchOptions::default(), 1_000);
        done.response.url = "/redirected".to_string();

        assert_eq!(f.interceptor.on_complete(&done).unwrap(), None);
        assert!(f.sink.is_empty());
    }

    #[test]
    fn test_disabled_error_channel() {
        let f = fixture(ObserverOptions::new().performance_server(true));
        let outcome = f
            .interceptor
            .on_complete(&completion(404, "Not Found", FetchOptions::default(), 1_000))
            .unwrap();

        assert_eq!(outcome, Some(Dispatch::ChannelDisabled));
        assert!(f.sink.is_empty());
    }

    #[test]
    fn test_install_via_bus() {
        let f = fixture(ObserverOptions::all_enabled());
        let bus = EventBus::new();

        assert!(f.interceptor.clone().install(&bus));
        assert!(!f.interceptor.clone().install(&bus));

        bus.emit_fetch(&completion(200, "OK", FetchOptions::default(), 1_000));
        assert_eq!(f.sink.len(), 1);
    }
}
