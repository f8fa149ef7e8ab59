// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Promise-style request API with a completion hook

use std::sync::Arc;

use crate::clock::Clock;
use crate::error::Result;
use crate::http::{HttpClient, Request, Response};
use crate::network::{EventBus, FetchCompletion, FetchOptions, FetchResponse};

/// `fetch`-like API over [`HttpClient`]
///
/// Resolved requests are reported to the bus. A request that fails at the
/// transport level rejects with the error and is not reported.
#[derive(Clone)]
pub struct ObservedFetch {
    client: HttpClient,
    bus: EventBus,
    clock: Arc<dyn Clock>,
}

impl ObservedFetch {
    /// Create the API. `clock` must be the one the interceptors use.
    pub fn new(client: HttpClient, bus: EventBus, clock: Arc<dyn Clock>) -> Self {
        Self { client, bus, clock }
    }

    /// Issue a request and resolve with its response
    pub async fn fetch(&self, url: &str, options: FetchOptions) -> Result<Response> {
        let mut request = Request::from_method_name(options.method_or_default(), url)?;
        if let Some(ref body) = options.body {
            request = request.body(body.clone());
        }

        let start = self.clock.now_ms();
        let response = self.client.execute(request).await?;

        self.bus.emit_fetch(&FetchCompletion {
            request_url: url.to_string(),
            options,
            response: FetchResponse {
                url: response.url_str().to_string(),
                status: response.status_code(),
                status_text: response.status_text().to_string(),
            },
            start,
        });

        Ok(response)
    }

    /// Issue several requests concurrently
    pub async fn fetch_all(&self, requests: Vec<(String, FetchOptions)>) -> Vec<Result<Response>> {
        let futures: Vec<_> = requests
            .into_iter()
            .map(|(url, options)| async move { self.fetch(&url, options).await })
            .collect();
        futures::future::join_all(futures).await
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::clock::SystemClock;
    use crate::config::ObserverOptions;
    use crate::network::{CollectingSink, TelemetryEvent};
    use crate::observer::NetworkObserver;

    async fn server() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ok"))
            .respond_with(ResponseTemplate::new(200).set_body_string("fine"))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/fail"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        server
    }

    fn setup(options: ObserverOptions) -> (ObservedFetch, CollectingSink, NetworkObserver) {
        let bus = EventBus::new();
        let sink = CollectingSink::new();
        let clock: Arc<dyn Clock> = Arc::new(SystemClock::new());
        let observer = NetworkObserver::with_clock(
            options,
            bus.clone(),
            Arc::new(sink.clone()),
            clock.clone(),
        );
        observer.init_network_observability();

        let fetch = ObservedFetch::new(HttpClient::new().unwrap(), bus, clock);
        (fetch, sink, observer)
    }

    #[tokio::test]
    async fn test_success_reported() {
        let server = server().await;
        let (fetch, sink, _observer) = setup(ObserverOptions::all_enabled());

        let url = format!("{}/ok", server.uri());
        let response = fetch.fetch(&url, FetchOptions::default()).await.unwrap();
        assert_eq!(response.text_lossy(), "fine");

        match &sink.events()[..] {
            [TelemetryEvent::Performance(e)] => {
                assert_eq!(e.request_url, url);
                assert_eq!(e.response_status, 200);
                assert!(e.params.is_none());
            }
            other => panic!("Expected one performance event, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_failure_reported_with_body() {
        let server = server().await;
        let (fetch, sink, _observer) = setup(ObserverOptions::all_enabled());

        let url = format!("{}/fail", server.uri());
        let response = fetch
            .fetch(&url, FetchOptions::method("POST").with_body("k=v"))
            .await
            .unwrap();
        assert_eq!(response.status_code(), 500);

        match &sink.events()[..] {
            [TelemetryEvent::Error(e)] => {
                assert_eq!(e.err_message, "Internal Server Error");
                assert_eq!(e.params.as_deref(), Some("k=v"));
            }
            other => panic!("Expected one error event, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_concurrent_requests_do_not_interfere() {
        let server = server().await;
        let (fetch, sink, _observer) = setup(ObserverOptions::all_enabled());

        let ok = format!("{}/ok", server.uri());
        let fail = format!("{}/fail", server.uri());
        let results = fetch
            .fetch_all(vec![
                (ok.clone(), FetchOptions::default()),
                (fail.clone(), FetchOptions::method("post")),
                (ok.clone(), FetchOptions::default()),
            ])
            .await;
        assert!(results.iter().all(|r| r.is_ok()));

        let events = sink.events();
        assert_eq!(events.len(), 3);
        assert_eq!(events.iter().filter(|e| e.is_performance()).count(), 2);
        assert!(events
            .iter()
            .filter(|e| e.is_error())
            .all(|e| e.request_url() == fail));
    }

    #[tokio::test]
    async fn test_transport_failure_rejects_silently() {
        let (fetch, sink, _observer) = setup(ObserverOptions::all_enabled());

        // Nothing listens on port 9 on test hosts.
        let result = fetch.fetch("http://127.0.0.1:9/", FetchOptions::default()).await;
        assert!(result.is_err());
        assert!(sink.is_empty());
    }

    #[tokio::test]
    async fn test_uninstalled_observer_sees_nothing() {
        let server = server().await;
        let (fetch, sink, observer) = setup(ObserverOptions::new());
        assert!(!observer.is_installed());

        fetch
            .fetch(&format!("{}/ok", server.uri()), FetchOptions::default())
            .await
            .unwrap();
        assert!(sink.is_empty());
    }
}
