//! Notification bus.
//!
//! An explicit [`NotificationBus`] instance is shared by reference with
//! every component that publishes or subscribes; there is no process-wide
//! registry.
//!
//! ## Key Types
//!
//! - [`Topic`] - Dotted, case-insensitive, hierarchical topic path
//! - [`Message`] / [`Payload`] - What is published
//! - [`NotificationBus`] - Subscription registry and delivery
//! - [`HandlerError`] / [`DoubleFault`] - Handler failure reporting

mod bus;
mod message;
mod topic;

pub use bus::{DoubleFault, Handler, HandlerError, NotificationBus, SubscriberId, SubscriptionId};
pub use message::{LogLevel, Message, Payload};
pub use topic::{Topic, topics};
