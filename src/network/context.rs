// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Per-request correlation state for the callback-style API

use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

/// Opaque identity of one logical request, allocated at `open`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestHandle(u64);

impl RequestHandle {
    /// Allocate a process-unique handle
    pub fn next() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Wrap a raw value
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw value
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "req#{}", self.0)
    }
}

/// Metadata captured between `open` and completion
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    /// URL passed to `open`
    pub request_url: String,
    /// Lower-cased method passed to `open`
    pub request_method: String,
    /// Clock reading at `send`
    pub trigger_time: Option<u64>,
}

impl RequestContext {
    /// Context for a freshly opened request
    pub fn opened(method: &str, url: impl Into<String>) -> Self {
        Self {
            request_url: url.into(),
            request_method: method.to_lowercase(),
            trigger_time: None,
        }
    }
}

/// Bounded table of in-flight request contexts
///
/// Handles grow monotonically, so the first entry is always the oldest.
#[derive(Debug)]
pub struct ContextTable {
    entries: Mutex<BTreeMap<RequestHandle, RequestContext>>,
    capacity: usize,
}

impl ContextTable {
    /// Create a table holding at most `capacity` contexts
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Mutex::new(BTreeMap::new()),
            capacity: capacity.max(1),
        }
    }

    /// Store a context, evicting the oldest when full.
    ///
    /// Returns the evicted handle, if any.
    pub fn insert(&self, handle: RequestHandle, context: RequestContext) -> Option<RequestHandle> {
        let mut entries = self.entries.lock();
        entries.insert(handle, context);

        if entries.len() > self.capacity {
            let (oldest, _) = entries.pop_first()?;
            return Some(oldest);
        }
        None
    }

    /// Record the trigger time for a request. False if the context is gone.
    pub fn mark_sent(&self, handle: RequestHandle, now: u64) -> bool {
        match self.entries.lock().get_mut(&handle) {
            Some(context) => {
                context.trigger_time = Some(now);
                true
            }
            None => false,
        }
    }

    /// Remove and return a context
    pub fn take(&self, handle: RequestHandle) -> Option<RequestContext> {
        self.entries.lock().remove(&handle)
    }

    /// Copy of a context
    pub fn get(&self, handle: RequestHandle) -> Option<RequestContext> {
        self.entries.lock().get(&handle).cloned()
    }

    /// Number of pending contexts
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether no context is pending
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}
