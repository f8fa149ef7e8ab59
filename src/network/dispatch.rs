// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Routing of classified events to the reporting pipeline

use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::mpsc;

use super::event::{ErrorEvent, PerformanceEvent, TelemetryEvent};
use crate::config::ObserverOptions;
use crate::error::{Error, Result};

/// Downstream reporting functions
///
/// Implementations serialize and transmit events; they must not block.
pub trait TelemetrySink: Send + Sync {
    /// Report a successful request
    fn report_performance(&self, event: PerformanceEvent) -> Result<()>;

    /// Report a failed request
    fn report_error(&self, event: ErrorEvent) -> Result<()>;
}

/// Sink keeping events in memory
#[derive(Debug, Clone, Default)]
pub struct CollectingSink {
    events: Arc<RwLock<Vec<TelemetryEvent>>>,
}

impl CollectingSink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// All collected events
    pub fn events(&self) -> Vec<TelemetryEvent> {
        self.events.read().clone()
    }

    /// Remove and return all collected events
    pub fn drain(&self) -> Vec<TelemetryEvent> {
        std::mem::take(&mut *self.events.write())
    }

    /// Event count
    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    /// Whether nothing was collected
    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }
}

impl TelemetrySink for CollectingSink {
    fn report_performance(&self, event: PerformanceEvent) -> Result<()> {
        self.events.write().push(TelemetryEvent::Performance(event));
        Ok(())
    }

    fn report_error(&self, event: ErrorEvent) -> Result<()> {
        self.events.write().push(TelemetryEvent::Error(event));
        Ok(())
    }
}

/// Sink forwarding events to a tokio channel
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<TelemetryEvent>,
}

impl ChannelSink {
    /// Create a sink and the receiving end
    pub fn new() -> (Self, mpsc::UnboundedReceiver<TelemetryEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn send(&self, event: TelemetryEvent) -> Result<()> {
        self.tx
            .send(event)
            .map_err(|_| Error::sink("telemetry receiver dropped"))
    }
}

impl TelemetrySink for ChannelSink {
    fn report_performance(&self, event: PerformanceEvent) -> Result<()> {
        self.send(TelemetryEvent::Performance(event))
    }

    fn report_error(&self, event: ErrorEvent) -> Result<()> {
        self.send(TelemetryEvent::Error(event))
    }
}

/// Outcome of a dispatch attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// Handed to the sink
    Sent,
    /// The event's channel is disabled
    ChannelDisabled,
}

/// Gates classified events on the configured channels
pub struct TelemetryDispatcher {
    options: Arc<ObserverOptions>,
    sink: Arc<dyn TelemetrySink>,
}

impl TelemetryDispatcher {
    /// Create a dispatcher
    pub fn new(options: Arc<ObserverOptions>, sink: Arc<dyn TelemetrySink>) -> Self {
        Self { options, sink }
    }

    /// Options snapshot in use
    pub fn options(&self) -> &ObserverOptions {
        &self.options
    }

    /// Forward an event if its channel is enabled
    pub fn dispatch(&self, event: TelemetryEvent) -> Result<Dispatch> {
        match event {
            TelemetryEvent::Performance(event) => {
                if !self.options.performance.server {
                    return Ok(Dispatch::ChannelDisabled);
                }
                tracing::trace!(
                    url = %event.request_url,
                    duration = event.duration,
                    "Performance event"
                );
                self.sink.report_performance(event)?;
            }
            TelemetryEvent::Error(event) => {
                if !self.options.error.server {
                    return Ok(Dispatch::ChannelDisabled);
                }
                tracing::trace!(
                    url = %event.request_url,
                    status = event.response_status,
                    "Error event"
                );
                self.sink.report_error(event)?;
            }
        }
        Ok(Dispatch::Sent)
    }
}
