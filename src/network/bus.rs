// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Lifecycle event registry connecting instrumented APIs to interceptors
//!
//! Hosts emit lifecycle events; interceptors register typed hooks. Each hook
//! runs behind `catch_unwind` so a failing observer cannot take the host's
//! request down with it.

use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use dashmap::DashMap;

use super::context::RequestHandle;
use super::fetch::FetchCompletion;
use super::transport::CallbackTransport;

/// `open(handle, method, url)` on a callback-style transport
pub type OpenHook = Arc<dyn Fn(RequestHandle, &str, &str) + Send + Sync>;
/// `send(transport, body)` on a callback-style transport
pub type SendHook = Arc<dyn Fn(&dyn CallbackTransport, Option<&str>) + Send + Sync>;
/// Terminal completion of a promise-style request
pub type FetchHook = Arc<dyn Fn(&FetchCompletion) + Send + Sync>;

/// Lifecycle event kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleKind {
    XhrOpen,
    XhrSend,
    Fetch,
}

/// Registration key; a second hook with the same id and kind is rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HookId(&'static str);

impl HookId {
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub fn name(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for HookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// A typed hook
#[derive(Clone)]
pub enum LifecycleHook {
    Open(OpenHook),
    Send(SendHook),
    Fetch(FetchHook),
}

impl LifecycleHook {
    /// Kind the hook listens to
    pub fn kind(&self) -> LifecycleKind {
        match self {
            LifecycleHook::Open(_) => LifecycleKind::XhrOpen,
            LifecycleHook::Send(_) => LifecycleKind::XhrSend,
            LifecycleHook::Fetch(_) => LifecycleKind::Fetch,
        }
    }
}

impl fmt::Debug for LifecycleHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("LifecycleHook").field(&self.kind()).finish()
    }
}

/// Lifecycle event bus
#[derive(Clone, Default)]
pub struct EventBus {
    hooks: Arc<DashMap<LifecycleKind, Vec<(HookId, LifecycleHook)>>>,
}

impl EventBus {
    /// Create an empty bus
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a hook. Returns false if `id` is already registered for the
    /// hook's kind.
    pub fn register(&self, id: HookId, hook: LifecycleHook) -> bool {
        let kind = hook.kind();
        let mut entry = self.hooks.entry(kind).or_default();

        if entry.iter().any(|(existing, _)| *existing == id) {
            tracing::debug!(hook = %id, ?kind, "Hook already registered");
            return false;
        }
        entry.push((id, hook));
        true
    }

    /// Number of hooks for a kind
    pub fn hook_count(&self, kind: LifecycleKind) -> usize {
        self.hooks.get(&kind).map(|h| h.len()).unwrap_or(0)
    }

    /// Whether any hook is registered for a kind
    pub fn has_hooks(&self, kind: LifecycleKind) -> bool {
        self.hook_count(kind) > 0
    }

    /// Emit `open`
    pub fn emit_open(&self, handle: RequestHandle, method: &str, url: &str) {
        for (id, hook) in self.snapshot(LifecycleKind::XhrOpen) {
            if let LifecycleHook::Open(f) = hook {
                guard(id, || f(handle, method, url));
            }
        }
    }

    /// Emit `send`
    pub fn emit_send(&self, transport: &dyn CallbackTransport, body: Option<&str>) {
        for (id, hook) in self.snapshot(LifecycleKind::XhrSend) {
            if let LifecycleHook::Send(f) = hook {
                guard(id, || f(transport, body));
            }
        }
    }

    /// Emit a promise-style completion
    pub fn emit_fetch(&self, completion: &FetchCompletion) {
        for (id, hook) in self.snapshot(LifecycleKind::Fetch) {
            if let LifecycleHook::Fetch(f) = hook {
                guard(id, || f(completion));
            }
        }
    }

    /// Clone the hook list so no shard lock is held while hooks run
    fn snapshot(&self, kind: LifecycleKind) -> Vec<(HookId, LifecycleHook)> {
        self.hooks
            .get(&kind)
            .map(|hooks| hooks.value().clone())
            .unwrap_or_default()
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("open", &self.hook_count(LifecycleKind::XhrOpen))
            .field("send", &self.hook_count(LifecycleKind::XhrSend))
            .field("fetch", &self.hook_count(LifecycleKind::Fetch))
            .finish()
    }
}

/// Run an observer callback, containing any panic
pub(crate) fn guard<F: FnOnce()>(id: HookId, f: F) {
    if catch_unwind(AssertUnwindSafe(f)).is_err() {
        tracing::error!(hook = %id, "Observer hook panicked; host request unaffected");
    }
}
