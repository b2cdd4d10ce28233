//! Conversation state for a single session.
//!
//! A session remembers every exchange plus the service and topic the user
//! was last talking about, so later questions can be resolved against it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One user message and the reply it received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exchange {
    /// What the user said.
    pub user: String,
    /// What the assistant replied.
    pub bot: String,
    /// Service detected for this turn, if any.
    pub service: Option<String>,
    /// Topic detected for this turn, if any.
    pub topic: Option<String>,
    /// When the exchange was recorded.
    pub timestamp: DateTime<Utc>,
}

impl Exchange {
    /// Creates an exchange timestamped now.
    #[must_use]
    pub fn new(
        user: impl Into<String>,
        bot: impl Into<String>,
        service: Option<String>,
        topic: Option<String>,
    ) -> Self {
        Self {
            user: user.into(),
            bot: bot.into(),
            service,
            topic,
            timestamp: Utc::now(),
        }
    }
}

/// The conversation memory of a session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationContext {
    /// Exchanges in the order they happened.
    pub history: Vec<Exchange>,
    /// The last service the user asked about. Sticky across turns.
    pub current_service: Option<String>,
    /// The last topic the user asked about. Sticky across turns.
    pub current_topic: Option<String>,
    /// Stored for compatibility; nothing increments it yet.
    pub follow_up_count: u32,
}

impl ConversationContext {
    /// Returns true if no exchange has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Returns the most recent `n` exchanges, oldest first.
    #[must_use]
    pub fn recent(&self, n: usize) -> &[Exchange] {
        let start = self.history.len().saturating_sub(n);
        &self.history[start..]
    }

    /// Appends an exchange and updates the sticky fields.
    ///
    /// `None` never clears a previously set service or topic.
    pub fn record(&mut self, exchange: Exchange) {
        if let Some(service) = &exchange.service {
            self.current_service = Some(service.clone());
        }
        if let Some(topic) = &exchange.topic {
            self.current_topic = Some(topic.clone());
        }
        self.history.push(exchange);
    }

    /// Drops the oldest exchanges so at most `max` remain.
    pub fn truncate_history(&mut self, max: usize) {
        if self.history.len() > max {
            let excess = self.history.len() - max;
            self.history.drain(..excess);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_context_is_empty() {
        let context = ConversationContext::default();
        assert!(context.is_empty());
        assert!(context.current_service.is_none());
        assert!(context.current_topic.is_none());
        assert_eq!(context.follow_up_count, 0);
    }

    #[test]
    fn record_sets_sticky_fields() {
        let mut context = ConversationContext::default();
        context.record(Exchange::new(
            "s3 versioning",
            "...",
            Some("s3".into()),
            Some("versioning".into()),
        ));
        context.record(Exchange::new("aur kya?", "...", None, None));

        assert_eq!(context.history.len(), 2);
        assert_eq!(context.current_service.as_deref(), Some("s3"));
        assert_eq!(context.current_topic.as_deref(), Some("versioning"));
    }

    #[test]
    fn recent_returns_tail() {
        let mut context = ConversationContext::default();
        for i in 0..5 {
            context.record(Exchange::new(format!("q{i}"), "a", None, None));
        }
        let recent = context.recent(2);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].user, "q3");
        assert_eq!(recent[1].user, "q4");
        assert_eq!(context.recent(10).len(), 5);
    }

    #[test]
    fn truncate_keeps_newest() {
        let mut context = ConversationContext::default();
        for i in 0..4 {
            context.record(Exchange::new(format!("q{i}"), "a", None, None));
        }
        context.truncate_history(2);
        assert_eq!(context.history.len(), 2);
        assert_eq!(context.history[0].user, "q2");
    }

    #[test]
    fn exchange_uses_wire_field_names() {
        let exchange = Exchange::new("hi", "hello", None, None);
        let json = serde_json::to_value(&exchange).expect("serialize");
        assert_eq!(json["user"], "hi");
        assert_eq!(json["bot"], "hello");
        assert!(json["service"].is_null());
        assert!(json.get("timestamp").is_some());
    }
}
