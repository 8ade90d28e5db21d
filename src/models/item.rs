#[cfg(test)]
#[path = "item_test.rs"]
mod tests;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Lifecycle state of an item. The wire names are the ones the store
/// persists, the labels are what the user sees.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemState {
    #[default]
    #[serde(rename = "to-do")]
    Todo,
    #[serde(rename = "in-progress")]
    InProgress,
    #[serde(rename = "done")]
    Done,
}

impl ItemState {
    pub const ALL: [ItemState; 3] = [ItemState::Todo, ItemState::InProgress, ItemState::Done];

    pub fn as_str(&self) -> &'static str {
        match self {
            ItemState::Todo => "to-do",
            ItemState::InProgress => "in-progress",
            ItemState::Done => "done",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ItemState::Todo => "To Do",
            ItemState::InProgress => "In Progress",
            ItemState::Done => "Done",
        }
    }
}

impl fmt::Display for ItemState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ItemState {
    type Err = eyre::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "to-do" => Ok(ItemState::Todo),
            "in-progress" => Ok(ItemState::InProgress),
            "done" => Ok(ItemState::Done),
            _ => eyre::bail!("unknown item state: {}", s),
        }
    }
}

/// A user task. The title doubles as the natural key, the store keeps it
/// unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub title: String,
    pub state: ItemState,
}

impl Item {
    pub fn new(title: impl Into<String>, state: ItemState) -> Item {
        Item {
            title: title.into(),
            state,
        }
    }
}
