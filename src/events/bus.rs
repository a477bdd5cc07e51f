//! Publish/subscribe notification bus.
//!
//! Handlers are registered per subscriber and topic. Publishing takes a
//! snapshot of the matching subscriptions before calling any handler, so
//! handlers may subscribe and unsubscribe freely while a message is being
//! delivered.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use thiserror::Error;
use uuid::Uuid;

use super::message::{LogLevel, Message, Payload};
use super::topic::{Topic, topics};

/// A handler reported failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct HandlerError {
    pub message: String,
}

impl HandlerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<String> for HandlerError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&str> for HandlerError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

/// A handler failed while a fault report was delivered.
///
/// Failures of ordinary handlers are reported on the log topic; a failure
/// while handling such a report has nowhere left to go and is returned to
/// the publisher.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("log handler failed on '{topic}': {error}")]
pub struct DoubleFault {
    pub topic: String,
    pub error: HandlerError,
}

/// Identity of a subscribing object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriberId(Uuid);

impl SubscriberId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SubscriberId {
    fn default() -> Self {
        Self::new()
    }
}

/// Token for one `subscribe` call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

pub type Handler = Arc<dyn Fn(&Message) -> Result<(), HandlerError> + Send + Sync>;

struct Subscription {
    id: SubscriptionId,
    subscriber: SubscriberId,
    topics: Vec<Topic>,
    handler: Handler,
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    subscriptions: Vec<Subscription>,
}

/// Topic-based publish/subscribe channel.
///
/// Delivery order for one publish is registration order. Subscribing the
/// same handler twice delivers it twice.
#[derive(Default)]
pub struct NotificationBus {
    registry: Mutex<Registry>,
}

impl fmt::Debug for NotificationBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotificationBus")
            .field("subscriptions", &self.subscription_count())
            .finish()
    }
}

impl NotificationBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for every topic in `topics`.
    pub fn subscribe<T, F>(
        &self,
        subscriber: SubscriberId,
        topics: impl IntoIterator<Item = T>,
        handler: F,
    ) -> SubscriptionId
    where
        T: Into<Topic>,
        F: Fn(&Message) -> Result<(), HandlerError> + Send + Sync + 'static,
    {
        let mut registry = self.registry.lock();
        let id = SubscriptionId(registry.next_id);
        registry.next_id += 1;
        let topics: Vec<Topic> = topics.into_iter().map(Into::into).collect();
        tracing::trace!("[BUS] {:?} subscribes to {:?}", subscriber, topics);
        registry.subscriptions.push(Subscription {
            id,
            subscriber,
            topics,
            handler: Arc::new(handler),
        });
        id
    }

    /// Remove one subscription. Returns false if it was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut registry = self.registry.lock();
        let before = registry.subscriptions.len();
        registry.subscriptions.retain(|s| s.id != id);
        registry.subscriptions.len() != before
    }

    /// Remove one topic from a subscription; the subscription goes away
    /// with its last topic. Returns false if nothing was subscribed.
    pub fn unsubscribe_topic(&self, id: SubscriptionId, topic: impl Into<Topic>) -> bool {
        let topic = topic.into();
        let mut registry = self.registry.lock();
        let Some(index) = registry.subscriptions.iter().position(|s| s.id == id) else {
            return false;
        };
        let subscription = &mut registry.subscriptions[index];
        let before = subscription.topics.len();
        subscription.topics.retain(|t| *t != topic);
        let removed = subscription.topics.len() != before;
        if subscription.topics.is_empty() {
            registry.subscriptions.remove(index);
        }
        removed
    }

    /// Remove every subscription of `subscriber`, returning how many there were.
    pub fn unsubscribe_all(&self, subscriber: SubscriberId) -> usize {
        let mut registry = self.registry.lock();
        let before = registry.subscriptions.len();
        registry.subscriptions.retain(|s| s.subscriber != subscriber);
        before - registry.subscriptions.len()
    }

    pub fn subscription_count(&self) -> usize {
        self.registry.lock().subscriptions.len()
    }

    /// Deliver `message` to every matching handler in registration order.
    ///
    /// A failing handler does not stop delivery; its error is logged and
    /// republished on the log topic as a fault report. A failure on a plain
    /// log message is only logged. A failure while delivering a fault
    /// report is a [`DoubleFault`] and stops delivery.
    pub fn publish(&self, message: &Message) -> Result<(), DoubleFault> {
        let handlers: Vec<Handler> = {
            let registry = self.registry.lock();
            registry
                .subscriptions
                .iter()
                .filter(|s| s.topics.iter().any(|t| t.matches(message.topic())))
                .map(|s| Arc::clone(&s.handler))
                .collect()
        };
        tracing::trace!("[BUS] {} -> {} handler(s)", message.topic(), handlers.len());

        let is_log = Topic::new(topics::LOG).matches(message.topic());
        let is_fault_report = is_log && matches!(message.payload(), Payload::Log { origin: Some(_), .. });
        for handler in handlers {
            let Err(error) = handler(message) else {
                continue;
            };
            if is_fault_report {
                tracing::error!("[BUS] handler failed on a fault report: {}", error);
                return Err(DoubleFault {
                    topic: message.topic().to_string(),
                    error,
                });
            }
            tracing::error!("[BUS] handler for '{}' failed: {}", message.topic(), error);
            if is_log {
                continue;
            }
            let report = Message::new(
                topics::LOG,
                Payload::Log {
                    level: LogLevel::Error,
                    message: error.message,
                    origin: Some(message.topic().to_string()),
                },
            );
            self.publish(&report)?;
        }
        Ok(())
    }
}
