//! Fault notifications.
//!
//! Every fault the pipeline renders can be reported to a
//! [`NotificationSink`] as a `dns.api.fault` event. Delivery is
//! best-effort: events go onto a bounded queue without waiting, and a
//! background task delivers them one at a time under a timeout. Nothing
//! that happens on the delivery side can affect the response.

use designate_config::ServiceApiConfig;
use designate_core::{BoxFuture, RequestContext};
use designate_telemetry::record_notification_dropped;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc::{self, error::TrySendError};

/// Event type of fault notifications.
pub const FAULT_EVENT_TYPE: &str = "dns.api.fault";

/// Payload of a fault notification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FaultPayload {
    /// The URL of the failed request.
    pub url: String,
    /// The status code of the rendered response.
    pub status: u16,
    /// The rendered error.
    pub exception: String,
}

/// A fault notification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FaultEvent {
    /// Always [`FAULT_EVENT_TYPE`].
    pub event_type: String,
    /// The serialized request context. Never includes the auth token.
    pub context: serde_json::Value,
    /// Event details.
    pub payload: FaultPayload,
}

impl FaultEvent {
    /// Creates a fault event for a request.
    #[must_use]
    pub fn new(
        context: &RequestContext,
        url: impl Into<String>,
        status: u16,
        exception: impl Into<String>,
    ) -> Self {
        Self {
            event_type: FAULT_EVENT_TYPE.to_string(),
            context: serde_json::to_value(context).unwrap_or(serde_json::Value::Null),
            payload: FaultPayload {
                url: url.into(),
                status,
                exception: exception.into(),
            },
        }
    }
}

/// Errors raised while delivering a notification.
#[derive(Debug, Error)]
pub enum NotificationError {
    /// The sink rejected the event.
    #[error("notification sink failed: {0}")]
    Sink(String),

    /// Delivery did not finish in time.
    #[error("notification delivery timed out after {0:?}")]
    Timeout(Duration),
}

/// Destination of fault notifications.
pub trait NotificationSink: Send + Sync + 'static {
    /// Delivers one event.
    fn notify(&self, event: FaultEvent) -> BoxFuture<'_, Result<(), NotificationError>>;
}

/// Sink that writes events to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotificationSink;

impl NotificationSink for LogNotificationSink {
    fn notify(&self, event: FaultEvent) -> BoxFuture<'_, Result<(), NotificationError>> {
        Box::pin(async move {
            tracing::info!(
                event_type = %event.event_type,
                url = %event.payload.url,
                status = event.payload.status,
                exception = %event.payload.exception,
                context = %event.context,
                "API fault notification"
            );
            Ok(())
        })
    }
}

/// Non-blocking handle for emitting fault notifications.
///
/// Cloning is cheap; clones share one queue. A disabled notifier drops
/// every event silently.
#[derive(Debug, Clone)]
pub struct FaultNotifier {
    tx: Option<mpsc::Sender<FaultEvent>>,
}

impl FaultNotifier {
    /// Creates a notifier that emits nothing.
    #[must_use]
    pub fn disabled() -> Self {
        Self { tx: None }
    }

    /// Starts a dispatcher task delivering events to `sink`.
    ///
    /// Must be called within a tokio runtime; outside one the notifier is
    /// disabled and a warning is logged.
    pub fn spawn(sink: Arc<dyn NotificationSink>, queue_size: usize, timeout: Duration) -> Self {
        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(e) => {
                tracing::warn!(error = %e, "No async runtime, fault notifications disabled");
                return Self::disabled();
            }
        };

        let (tx, rx) = mpsc::channel(queue_size.max(1));
        handle.spawn(dispatch(rx, sink, timeout));
        Self { tx: Some(tx) }
    }

    /// Creates a notifier from the `[service_api]` section.
    ///
    /// Disabled unless `notify-api-faults` is set.
    pub fn from_config(config: &ServiceApiConfig, sink: Arc<dyn NotificationSink>) -> Self {
        if !config.notify_api_faults {
            return Self::disabled();
        }
        Self::spawn(
            sink,
            config.notification_queue_size,
            Duration::from_millis(config.notification_timeout_ms),
        )
    }

    /// Returns `true` if events are emitted.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.tx.is_some()
    }

    /// Queues a `dns.api.fault` event. Never waits.
    pub fn send_api_fault(
        &self,
        context: &RequestContext,
        url: &str,
        status: u16,
        exception: &str,
    ) {
        let Some(tx) = &self.tx else {
            return;
        };

        match tx.try_send(FaultEvent::new(context, url, status, exception)) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                tracing::warn!(
                    request_id = %context.request_id(),
                    "Fault notification queue full, dropping event"
                );
                record_notification_dropped("queue_full");
            }
            Err(TrySendError::Closed(_)) => {
                tracing::warn!(
                    request_id = %context.request_id(),
                    "Fault notification dispatcher stopped, dropping event"
                );
                record_notification_dropped("closed");
            }
        }
    }
}

impl Default for FaultNotifier {
    fn default() -> Self {
        Self::disabled()
    }
}

async fn dispatch(
    mut rx: mpsc::Receiver<FaultEvent>,
    sink: Arc<dyn NotificationSink>,
    timeout: Duration,
) {
    while let Some(event) = rx.recv().await {
        let result = match tokio::time::timeout(timeout, sink.notify(event)).await {
            Ok(result) => result,
            Err(_) => Err(NotificationError::Timeout(timeout)),
        };

        if let Err(e) = result {
            tracing::warn!(error = %e, "Failed to deliver fault notification");
            record_notification_dropped(match e {
                NotificationError::Sink(_) => "sink_error",
                NotificationError::Timeout(_) => "timeout",
            });
        }
    }
    tracing::debug!("Fault notification dispatcher stopped");
}
