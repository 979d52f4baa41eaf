//! Playback progress subscriptions
//!
//! Some embed hosts post progress messages out of their frame. Whatever
//! carries those messages across the boundary hands them to
//! [`ProgressHub::publish`]; interested parties subscribe per title.

use crate::resolver::PlaybackProviderId;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tokio::sync::broadcast;
use tracing::{debug, warn};

const DEFAULT_CAPACITY: usize = 256;

/// A progress report from an embedded player
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressEvent {
    pub title_id: String,
    pub provider: PlaybackProviderId,
    /// Percentage watched as reported by the host
    pub progress: f64,
    pub current_time: Option<f64>,
    pub duration: Option<f64>,
    pub received_at: DateTime<Utc>,
}

/// Fan-out point for progress events
#[derive(Debug, Clone)]
pub struct ProgressHub {
    sender: broadcast::Sender<ProgressEvent>,
}

impl ProgressHub {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Register an observer for one title
    pub fn subscribe(&self, title_id: impl Into<String>) -> ProgressSubscription {
        ProgressSubscription {
            title_id: title_id.into(),
            receiver: self.sender.subscribe(),
        }
    }

    /// Accept a message posted by an embed frame
    ///
    /// The message is accepted only when `origin` belongs to a registered
    /// provider and the payload carries a numeric `progress`. Payloads may
    /// arrive as objects or as JSON-encoded strings. Returns whether the
    /// message was accepted.
    pub fn publish(&self, origin: &str, title_id: &str, payload: &Value) -> bool {
        let Some(provider) = PlaybackProviderId::from_origin(origin) else {
            debug!(origin, "Ignoring message from unregistered origin");
            return false;
        };

        let decoded;
        let payload = match payload {
            Value::String(raw) => match serde_json::from_str::<Value>(raw) {
                Ok(value) => {
                    decoded = value;
                    &decoded
                }
                Err(_) => return false,
            },
            other => other,
        };

        let Some(progress) = payload.get("progress").and_then(Value::as_f64) else {
            return false;
        };

        let event = ProgressEvent {
            title_id: title_id.to_string(),
            provider,
            progress,
            current_time: payload
                .get("currentTime")
                .or_else(|| payload.get("time"))
                .and_then(Value::as_f64),
            duration: payload.get("duration").and_then(Value::as_f64),
            received_at: Utc::now(),
        };

        // No subscribers is fine; the event is simply not observed.
        let _ = self.sender.send(event);
        true
    }

    /// Number of live subscriptions
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for ProgressHub {
    fn default() -> Self {
        Self::new()
    }
}

/// Progress events for a single title
#[derive(Debug)]
pub struct ProgressSubscription {
    title_id: String,
    receiver: broadcast::Receiver<ProgressEvent>,
}

impl ProgressSubscription {
    pub fn title_id(&self) -> &str {
        &self.title_id
    }

    /// Next event for this title, or `None` once the hub is gone
    pub async fn recv(&mut self) -> Option<ProgressEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) if event.title_id == self.title_id => return Some(event),
                Ok(_) => continue,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(title_id = %self.title_id, skipped, "Progress subscriber lagged");
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_subscription_receives_only_its_title() {
        let hub = ProgressHub::new();
        let mut sub = hub.subscribe("550");

        assert!(hub.publish("https://vidking.net", "999", &json!({ "progress": 10.0 })));
        assert!(hub.publish(
            "https://vidking.net",
            "550",
            &json!({ "progress": 42.5, "currentTime": 300.0, "duration": 7000.0 })
        ));

        let event = sub.recv().await.unwrap();
        assert_eq!(event.title_id, "550");
        assert_eq!(event.provider, PlaybackProviderId::Vidking);
        assert_eq!(event.progress, 42.5);
        assert_eq!(event.current_time, Some(300.0));
        assert_eq!(event.duration, Some(7000.0));
    }

    #[test]
    fn test_rejects_unknown_origin() {
        let hub = ProgressHub::new();
        assert!(!hub.publish("https://evil.example", "1", &json!({ "progress": 5 })));
    }

    #[test]
    fn test_rejects_origin_without_progress_support() {
        let hub = ProgressHub::new();
        // vidsrc embeds do not post progress
        assert!(!hub.publish("https://vidsrc.to", "1", &json!({ "progress": 5 })));
    }

    #[test]
    fn test_rejects_payload_without_progress() {
        let hub = ProgressHub::new();
        assert!(!hub.publish("https://vidnest.net", "1", &json!({ "event": "play" })));
        assert!(!hub.publish("https://vidnest.net", "1", &json!({ "progress": "half" })));
    }

    #[tokio::test]
    async fn test_accepts_json_string_payload() {
        let hub = ProgressHub::new();
        let mut sub = hub.subscribe("7");

        let payload = Value::String(r#"{"progress": 12}"#.to_string());
        assert!(hub.publish("https://vidnest.net/", "7", &payload));

        let event = sub.recv().await.unwrap();
        assert_eq!(event.provider, PlaybackProviderId::Vidnest);
        assert_eq!(event.progress, 12.0);
    }

    #[tokio::test]
    async fn test_recv_ends_when_hub_dropped() {
        let hub = ProgressHub::new();
        let mut sub = hub.subscribe("1");
        assert_eq!(hub.subscriber_count(), 1);
        drop(hub);
        assert!(sub.recv().await.is_none());
    }
}
