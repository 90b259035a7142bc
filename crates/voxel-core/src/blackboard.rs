use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Value stored on a blackboard channel.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(untagged))]
pub enum BbValue {
    Flag(bool),
    Text(String),
}

impl BbValue {
    pub const FALSE: BbValue = BbValue::Flag(false);

    pub fn text(value: impl Into<String>) -> Self {
        BbValue::Text(value.into())
    }
}

impl From<bool> for BbValue {
    fn from(value: bool) -> Self {
        BbValue::Flag(value)
    }
}

impl From<&str> for BbValue {
    fn from(value: &str) -> Self {
        BbValue::Text(value.to_owned())
    }
}

impl fmt::Display for BbValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BbValue::Flag(v) => write!(f, "{v}"),
            BbValue::Text(v) => f.write_str(v),
        }
    }
}

/// Mission-scoped channel store shared by every agent task.
///
/// Cloning yields another handle to the same store. Each `set` is a single-key upsert; there
/// is no ordering between writers beyond last-writer-wins.
#[derive(Debug, Clone, Default)]
pub struct Blackboard {
    values: Arc<DashMap<String, BbValue>>,
}

impl Blackboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, channel: &str, default: BbValue) -> BbValue {
        self.values
            .get(channel)
            .map(|v| v.value().clone())
            .unwrap_or(default)
    }

    /// Read with the coordination default of `false` for unwritten channels.
    pub fn read(&self, channel: &str) -> BbValue {
        self.get(channel, BbValue::FALSE)
    }

    pub fn set(&self, channel: impl Into<String>, value: impl Into<BbValue>) {
        self.values.insert(channel.into(), value.into());
    }

    pub fn contains(&self, channel: &str) -> bool {
        self.values.contains_key(channel)
    }

    pub fn remove(&self, channel: &str) -> Option<BbValue> {
        self.values.remove(channel).map(|(_, v)| v)
    }

    pub fn clear(&self) {
        self.values.clear();
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
