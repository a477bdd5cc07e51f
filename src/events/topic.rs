//! Hierarchical message topics.

use std::fmt;

use smol_str::SmolStr;

/// Topic paths published by the engine.
pub mod topics {
    /// Parent of every engine topic.
    pub const ROOT: &str = "ride";
    /// Parent of the item change topics.
    pub const ITEM: &str = "ride.item";
    pub const ITEM_STEPS_CHANGED: &str = "ride.item.steps_changed";
    pub const ITEM_SETTINGS_CHANGED: &str = "ride.item.settings_changed";
    pub const ITEM_NAME_CHANGED: &str = "ride.item.name_changed";
    pub const ITEM_VARIABLES_CHANGED: &str = "ride.item.variables_changed";
    pub const GRID_CELL_CHANGED: &str = "ride.grid.cell_changed";
    /// Log messages, including reports of failed handlers.
    pub const LOG: &str = "ride.log";
    pub const SAVING: &str = "ride.saving";
    pub const SAVED: &str = "ride.saved";
    pub const SAVE_ALL: &str = "ride.save_all";
    pub const OPEN_SUITE: &str = "ride.open_suite";
    pub const OPEN_RESOURCE: &str = "ride.open_resource";
}

/// A dotted, case-insensitive topic path such as `ride.item.name_changed`.
///
/// A subscription to a topic receives messages published on that topic
/// and on every topic below it.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Topic(SmolStr);

impl Topic {
    pub fn new(path: &str) -> Self {
        Self(SmolStr::new(path.trim().to_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The enclosing topic, if any (`ride.item` for `ride.item.name_changed`).
    pub fn parent(&self) -> Option<Topic> {
        self.0.rsplit_once('.').map(|(parent, _)| Topic(SmolStr::new(parent)))
    }

    /// Whether a subscription to `self` receives messages published on `published`.
    ///
    /// # Example
    /// ```
    /// use ride::events::Topic;
    ///
    /// let parent = Topic::new("Ride.Item");
    /// assert!(parent.matches(&Topic::new("ride.item.name_changed")));
    /// assert!(!parent.matches(&Topic::new("ride.itemized")));
    /// ```
    pub fn matches(&self, published: &Topic) -> bool {
        match published.0.strip_prefix(self.0.as_str()) {
            Some(rest) => rest.is_empty() || rest.starts_with('.'),
            None => false,
        }
    }
}

impl fmt::Debug for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Topic({})", self.0)
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Topic {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

impl From<&Topic> for Topic {
    fn from(topic: &Topic) -> Self {
        topic.clone()
    }
}
