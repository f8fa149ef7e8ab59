// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Installation of request observability
//!
//! The decision to install is made once, from the options snapshot the
//! observer was built with. Enabling a channel later means building a new
//! observer.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::clock::{Clock, SystemClock};
use crate::config::ObserverOptions;
use crate::network::{
    CallbackInterceptor, EventBus, FetchInterceptor, IgnoreMatcher, TelemetryDispatcher,
    TelemetrySink,
};

/// Result of [`NetworkObserver::init_network_observability`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
    /// Both interceptors are now registered
    Installed,
    /// A previous call already installed them
    AlreadyInstalled,
    /// The bus already carries another observer's interceptors; this
    /// observer's sink receives nothing
    Rejected,
    /// No request channel is enabled; nothing was registered
    Disabled,
}

/// Owns the interceptors and installs them on an event bus
pub struct NetworkObserver {
    options: Arc<ObserverOptions>,
    bus: EventBus,
    fetch: Arc<FetchInterceptor>,
    callback: Arc<CallbackInterceptor>,
    installed: AtomicBool,
}

impl NetworkObserver {
    /// Create an observer using the system clock
    pub fn new(options: ObserverOptions, bus: EventBus, sink: Arc<dyn TelemetrySink>) -> Self {
        Self::with_clock(options, bus, sink, Arc::new(SystemClock::new()))
    }

    /// Create an observer with an explicit clock
    pub fn with_clock(
        options: ObserverOptions,
        bus: EventBus,
        sink: Arc<dyn TelemetrySink>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let options = Arc::new(options);
        let ignore = IgnoreMatcher::new(options.ignore_request.clone());
        let dispatcher = Arc::new(TelemetryDispatcher::new(options.clone(), sink));

        let fetch = Arc::new(FetchInterceptor::new(
            ignore.clone(),
            dispatcher.clone(),
            clock.clone(),
        ));
        let callback = Arc::new(CallbackInterceptor::new(
            ignore,
            dispatcher,
            clock,
            options.interceptor,
        ));

        Self {
            options,
            bus,
            fetch,
            callback,
            installed: AtomicBool::new(false),
        }
    }

    /// Install both interceptors, once, if any request channel is enabled
    pub fn init_network_observability(&self) -> InstallOutcome {
        if !self.options.observes_requests() {
            tracing::debug!("Request telemetry disabled, interceptors not installed");
            return InstallOutcome::Disabled;
        }
        if self.installed.swap(true, Ordering::SeqCst) {
            return InstallOutcome::AlreadyInstalled;
        }

        let callback = self.callback.clone().install(&self.bus);
        let fetch = self.fetch.clone().install(&self.bus);
        if !callback && !fetch {
            self.installed.store(false, Ordering::SeqCst);
            tracing::warn!("Interceptors already registered on this bus by another observer");
            return InstallOutcome::Rejected;
        }

        tracing::info!(
            callback,
            fetch,
            performance = self.options.performance.server,
            error = self.options.error.server,
            "Request observability installed"
        );

        InstallOutcome::Installed
    }

    /// Whether the interceptors have been installed
    pub fn is_installed(&self) -> bool {
        self.installed.load(Ordering::SeqCst)
    }

    /// Bus the interceptors are installed on
    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    /// Options snapshot
    pub fn options(&self) -> &ObserverOptions {
        &self.options
    }

    /// Callback-style requests still awaiting completion
    pub fn pending_requests(&self) -> usize {
        self.callback.pending()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::network::{
        CollectingSink, FetchCompletion, FetchOptions, FetchResponse, LifecycleKind,
        RequestHandle,
    };

    fn observer(options: ObserverOptions, bus: EventBus) -> (NetworkObserver, CollectingSink) {
        let sink = CollectingSink::new();
        let observer = NetworkObserver::with_clock(
            options,
            bus,
            Arc::new(sink.clone()),
            Arc::new(ManualClock::new(0)),
        );
        (observer, sink)
    }

    fn completion(status: u16) -> FetchCompletion {
        FetchCompletion {
            request_url: "/api".to_string(),
            options: FetchOptions::default(),
            response: FetchResponse {
                url: "/api".to_string(),
                status,
                status_text: String::new(),
            },
            start: 0,
        }
    }

    #[test]
    fn test_disabled_installs_nothing() {
        let bus = EventBus::new();
        let (observer, sink) = observer(ObserverOptions::new(), bus.clone());

        assert_eq!(observer.init_network_observability(), InstallOutcome::Disabled);
        assert!(!observer.is_installed());
        for kind in [LifecycleKind::XhrOpen, LifecycleKind::XhrSend, LifecycleKind::Fetch] {
            assert!(!bus.has_hooks(kind));
        }

        bus.emit_open(RequestHandle::next(), "get", "/api");
        bus.emit_fetch(&completion(200));
        bus.emit_fetch(&completion(500));
        assert!(sink.is_empty());
    }

    #[test]
    fn test_install_is_idempotent() {
        let bus = EventBus::new();
        let (observer, sink) = observer(ObserverOptions::all_enabled(), bus.clone());

        assert_eq!(observer.init_network_observability(), InstallOutcome::Installed);
        assert_eq!(
            observer.init_network_observability(),
            InstallOutcome::AlreadyInstalled
        );
        assert_eq!(bus.hook_count(LifecycleKind::Fetch), 1);
        assert_eq!(bus.hook_count(LifecycleKind::XhrOpen), 1);
        assert_eq!(bus.hook_count(LifecycleKind::XhrSend), 1);

        bus.emit_fetch(&completion(200));
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn test_second_observer_on_same_bus_does_not_duplicate() {
        let bus = EventBus::new();
        let (first, sink) = observer(ObserverOptions::all_enabled(), bus.clone());
        let (second, second_sink) = observer(ObserverOptions::all_enabled(), bus.clone());

        assert_eq!(first.init_network_observability(), InstallOutcome::Installed);
        assert_eq!(second.init_network_observability(), InstallOutcome::Rejected);
        assert!(first.is_installed());
        assert!(!second.is_installed());
        assert_eq!(bus.hook_count(LifecycleKind::Fetch), 1);

        bus.emit_fetch(&completion(404));
        assert_eq!(sink.len(), 1);
        assert!(second_sink.is_empty());

        // Still rejected on retry, never latched as installed.
        assert_eq!(second.init_network_observability(), InstallOutcome::Rejected);
        assert!(!second.is_installed());
    }

    #[test]
    fn test_single_channel_enables_install() {
        let bus = EventBus::new();
        let (observer, sink) = observer(ObserverOptions::new().error_server(true), bus.clone());

        assert_eq!(observer.init_network_observability(), InstallOutcome::Installed);
        bus.emit_fetch(&completion(200));
        bus.emit_fetch(&completion(503));

        let events = sink.events();
        assert_eq!(events.len(), 1);
        assert!(events[0].is_error());
    }
}
