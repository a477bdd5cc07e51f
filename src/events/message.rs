//! Messages carried by the notification bus.

use std::fmt;
use std::path::PathBuf;

use indexmap::IndexMap;

use crate::base::{CellPos, NodeId};

use super::topic::{Topic, topics};

/// Severity of a log message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        })
    }
}

/// Message contents.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Payload {
    ItemStepsChanged { item: NodeId },
    ItemSettingsChanged { item: NodeId },
    ItemNameChanged { item: NodeId },
    ItemVariablesChanged { item: NodeId },
    GridCellChanged {
        item: NodeId,
        cell: CellPos,
        value: String,
        previous: String,
    },
    Log {
        level: LogLevel,
        message: String,
        /// Topic of the message whose handler failed, for fault reports.
        origin: Option<String>,
    },
    Saving { document: NodeId, path: Option<PathBuf> },
    Saved { document: NodeId, path: Option<PathBuf> },
    SaveAll,
    OpenSuite { document: NodeId, path: Option<PathBuf> },
    OpenResource { document: NodeId, path: Option<PathBuf> },
    /// Free-form key/value data for application topics.
    Data(IndexMap<String, String>),
}

/// A topic plus its payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    topic: Topic,
    payload: Payload,
}

impl Message {
    pub fn new(topic: impl Into<Topic>, payload: Payload) -> Self {
        Self {
            topic: topic.into(),
            payload,
        }
    }

    pub fn topic(&self) -> &Topic {
        &self.topic
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// The tree node the message is about, for item and grid messages.
    pub fn item(&self) -> Option<NodeId> {
        match &self.payload {
            Payload::ItemStepsChanged { item }
            | Payload::ItemSettingsChanged { item }
            | Payload::ItemNameChanged { item }
            | Payload::ItemVariablesChanged { item }
            | Payload::GridCellChanged { item, .. } => Some(*item),
            _ => None,
        }
    }

    pub fn steps_changed(item: NodeId) -> Self {
        Self::new(topics::ITEM_STEPS_CHANGED, Payload::ItemStepsChanged { item })
    }

    pub fn settings_changed(item: NodeId) -> Self {
        Self::new(topics::ITEM_SETTINGS_CHANGED, Payload::ItemSettingsChanged { item })
    }

    pub fn name_changed(item: NodeId) -> Self {
        Self::new(topics::ITEM_NAME_CHANGED, Payload::ItemNameChanged { item })
    }

    pub fn variables_changed(item: NodeId) -> Self {
        Self::new(topics::ITEM_VARIABLES_CHANGED, Payload::ItemVariablesChanged { item })
    }

    pub fn grid_cell_changed(item: NodeId, cell: CellPos, value: String, previous: String) -> Self {
        Self::new(
            topics::GRID_CELL_CHANGED,
            Payload::GridCellChanged {
                item,
                cell,
                value,
                previous,
            },
        )
    }

    pub fn log(level: LogLevel, message: impl Into<String>) -> Self {
        Self::new(
            topics::LOG,
            Payload::Log {
                level,
                message: message.into(),
                origin: None,
            },
        )
    }

    /// Build a message with free-form data on an application topic.
    pub fn data<K, V>(topic: impl Into<Topic>, data: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self::new(
            topic,
            Payload::Data(data.into_iter().map(|(k, v)| (k.into(), v.into())).collect()),
        )
    }
}
