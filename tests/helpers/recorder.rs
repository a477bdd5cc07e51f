//! Records every notification a bus delivers.

use std::sync::Arc;

use parking_lot::Mutex;
use ride::events::{Message, NotificationBus, SubscriberId, topics};

/// Subscribes to the root topic and keeps every message in order.
#[derive(Clone, Default)]
pub struct Recorder {
    messages: Arc<Mutex<Vec<Message>>>,
}

impl Recorder {
    pub fn attach(bus: &NotificationBus) -> Self {
        let recorder = Self::default();
        let messages = Arc::clone(&recorder.messages);
        bus.subscribe(SubscriberId::new(), [topics::ROOT], move |message| {
            messages.lock().push(message.clone());
            Ok(())
        });
        recorder
    }

    pub fn topics(&self) -> Vec<String> {
        self.messages
            .lock()
            .iter()
            .map(|m| m.topic().as_str().to_string())
            .collect()
    }

    pub fn count(&self, topic: &str) -> usize {
        self.messages
            .lock()
            .iter()
            .filter(|m| m.topic().as_str() == topic)
            .count()
    }

    pub fn messages(&self) -> Vec<Message> {
        self.messages.lock().clone()
    }

    pub fn clear(&self) {
        self.messages.lock().clear();
    }
}
