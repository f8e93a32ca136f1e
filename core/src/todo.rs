//! The todo record and its wire shapes.
//!
//! [`Todo`] is the stored record. [`TodoDto`] is what crosses HTTP: it
//! derives `isCompleted` from the completion timestamp and renders the id and
//! row version as strings. [`CreateTodoRequest`] is the raw create body before
//! validation turns it into a [`NewTodo`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use std::fmt;
use std::str::FromStr;

/// Unique identifier for a todo item.
///
/// Identifiers are assigned by the store from a monotonically increasing
/// counter starting at 1. On the wire they are JSON strings; numbers are
/// accepted on input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TodoId(u64);

impl TodoId {
    /// Creates a `TodoId` from its numeric value
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the numeric value
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TodoId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

impl Serialize for TodoId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for TodoId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(U64Visitor).map(Self)
    }
}

/// Accepts a `u64` written either as a JSON number or a numeric string.
struct U64Visitor;

impl de::Visitor<'_> for U64Visitor {
    type Value = u64;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an unsigned integer or a string containing one")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<u64, E> {
        Ok(v)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<u64, E> {
        u64::try_from(v).map_err(|_| E::invalid_value(de::Unexpected::Signed(v), &self))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<u64, E> {
        v.trim()
            .parse()
            .map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
    }
}

mod row_version {
    use super::U64Visitor;
    use serde::{Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &u64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        deserializer.deserialize_any(U64Visitor)
    }
}

/// Priority of a todo.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    /// No priority set
    #[default]
    None,
    /// Low priority
    Low,
    /// Medium priority
    Medium,
    /// High priority
    High,
}

impl Priority {
    /// Every priority, lowest first.
    pub const ALL: [Self; 4] = [Self::None, Self::Low, Self::Medium, Self::High];

    /// Wire name of the priority.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string names no [`Priority`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown priority: {0}")]
pub struct UnknownPriority(pub String);

impl FromStr for Priority {
    type Err = UnknownPriority;

    /// Parses a wire name (case-insensitive) or its ordinal (`0`..=`3`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(ordinal) = trimmed.parse::<usize>() {
            return Self::ALL
                .get(ordinal)
                .copied()
                .ok_or_else(|| UnknownPriority(s.to_string()));
        }
        Self::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownPriority(s.to_string()))
    }
}

/// A stored todo record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Todo {
    /// Unique identifier
    pub id: TodoId,
    /// Sanitized description
    pub description: String,
    /// Priority
    pub priority: Priority,
    /// Optional due date
    pub due_date: Option<DateTime<Utc>>,
    /// When the todo was completed; `None` while open
    pub completed_at: Option<DateTime<Utc>>,
    /// When the todo was archived; `None` while listed by default
    pub archived_at: Option<DateTime<Utc>>,
    /// When the todo was created
    pub creation_time: DateTime<Utc>,
    /// When the todo was last changed
    pub last_modified_time: DateTime<Utc>,
    /// Bumped on every mutation, starting at 1
    pub row_version: u64,
}

impl Todo {
    /// Creates a fresh todo stamped at `now`.
    #[must_use]
    pub fn new(id: TodoId, todo: NewTodo, now: DateTime<Utc>) -> Self {
        Self {
            id,
            description: todo.description,
            priority: todo.priority,
            due_date: todo.due_date,
            completed_at: None,
            archived_at: None,
            creation_time: now,
            last_modified_time: now,
            row_version: 1,
        }
    }

    /// Whether the todo is completed
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }

    /// Whether the todo is archived
    #[must_use]
    pub const fn is_archived(&self) -> bool {
        self.archived_at.is_some()
    }

    /// Sets or clears the completion timestamp.
    pub fn toggle_completion(&mut self, now: DateTime<Utc>) {
        self.completed_at = match self.completed_at {
            Some(_) => None,
            None => Some(now),
        };
        self.touch(now);
    }

    /// Archives the todo. The first archive timestamp is kept.
    ///
    /// Returns `true` if this call archived the todo.
    pub fn archive(&mut self, now: DateTime<Utc>) -> bool {
        let first = self.archived_at.is_none();
        if first {
            self.archived_at = Some(now);
        }
        self.touch(now);
        first
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.last_modified_time = now;
        self.row_version += 1;
    }
}

/// A validated create request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTodo {
    /// Description
    pub description: String,
    /// Priority
    #[serde(default)]
    pub priority: Priority,
    /// Optional due date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
}

impl NewTodo {
    /// Creates a request with default priority and no due date
    #[must_use]
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            priority: Priority::None,
            due_date: None,
        }
    }

    /// Set the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Set the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }
}

/// Raw create body as received over HTTP.
///
/// Every field is optional here so that a missing description or an unknown
/// priority is reported as a field error instead of a parse failure.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTodoRequest {
    /// Description, required
    pub description: Option<String>,
    /// Priority name or ordinal
    pub priority: Option<PriorityInput>,
    /// Optional due date
    pub due_date: Option<DateTime<Utc>>,
}

/// A priority as sent by a client: a name or an ordinal.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum PriorityInput {
    /// `"High"`, `"low"`, ...
    Name(String),
    /// `0` ..= `3`
    Ordinal(i64),
}

impl PriorityInput {
    /// Resolve to a [`Priority`].
    ///
    /// # Errors
    ///
    /// Returns [`UnknownPriority`] when the name or ordinal is out of range.
    pub fn resolve(&self) -> Result<Priority, UnknownPriority> {
        match self {
            Self::Name(name) => name.parse(),
            Self::Ordinal(n) => usize::try_from(*n)
                .ok()
                .and_then(|i| Priority::ALL.get(i).copied())
                .ok_or_else(|| UnknownPriority(n.to_string())),
        }
    }
}

/// Wire representation of a todo.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoDto {
    /// Identifier, rendered as a string
    pub id: TodoId,
    /// Description
    pub description: String,
    /// Derived from `completed_at`
    pub is_completed: bool,
    /// Completion timestamp
    pub completed_at: Option<DateTime<Utc>>,
    /// Archive timestamp
    #[serde(default)]
    pub archived_at: Option<DateTime<Utc>>,
    /// Priority
    #[serde(default)]
    pub priority: Priority,
    /// Due date
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    /// Creation timestamp
    pub creation_time: DateTime<Utc>,
    /// Last modification timestamp
    pub last_modified_time: DateTime<Utc>,
    /// Row version, rendered as a string
    #[serde(with = "row_version")]
    pub row_version: u64,
}

impl From<&Todo> for TodoDto {
    fn from(todo: &Todo) -> Self {
        Self {
            id: todo.id,
            description: todo.description.clone(),
            is_completed: todo.is_completed(),
            completed_at: todo.completed_at,
            archived_at: todo.archived_at,
            priority: todo.priority,
            due_date: todo.due_date,
            creation_time: todo.creation_time,
            last_modified_time: todo.last_modified_time,
            row_version: todo.row_version,
        }
    }
}

impl From<Todo> for TodoDto {
    fn from(todo: Todo) -> Self {
        Self::from(&todo)
    }
}
