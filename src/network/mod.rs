// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Request interception and correlation
//!
//! Observes the two networking APIs, filters ignored URLs and hands classified
//! events to the telemetry pipeline.

mod bus;
mod callback;
mod context;
mod dispatch;
mod event;
mod fetch;
mod ignore;
mod transport;

pub use bus::{EventBus, FetchHook, HookId, LifecycleHook, LifecycleKind, OpenHook, SendHook};
pub use callback::CallbackInterceptor;
pub use context::{ContextTable, RequestContext, RequestHandle};
pub use dispatch::{ChannelSink, CollectingSink, Dispatch, TelemetryDispatcher, TelemetrySink};
pub use event::{
    is_post_like, is_success_status, CompletedRequest, ErrorEvent, EventId, PerformanceEvent,
    TelemetryEvent,
};
pub use fetch::{FetchCompletion, FetchInterceptor, FetchOptions, FetchResponse};
pub use ignore::{IgnoreMatcher, IgnoreRule};
pub use transport::{CallbackTransport, ReadyState, ReadyStateListener, TransportSnapshot};
