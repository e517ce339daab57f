//! Domain model for the normalized metric event.
//!
//! A [`MetricEvent`] is an ordered tree of string keys. Leaves are typed by
//! unit so that consumers never need to know which source fields were
//! reported in bytes and which in megabytes; the unit also appears as the
//! final key of every size-like path (`bytes` or `mb`).

use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;

/// A single value inside a [`MetricEvent`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetricValue {
    /// A size in bytes.
    Bytes(u64),
    /// A size in megabytes, as reported by the cluster.
    Megabytes(u64),
    /// A plain count.
    Count(u64),
    /// A nested group of metrics.
    Group(MetricEvent),
}

impl MetricValue {
    /// Returns the integer carried by a leaf, or `None` for a group.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            MetricValue::Bytes(v) | MetricValue::Megabytes(v) | MetricValue::Count(v) => Some(*v),
            MetricValue::Group(_) => None,
        }
    }

    /// Returns the nested group, or `None` for a leaf.
    pub fn as_group(&self) -> Option<&MetricEvent> {
        match self {
            MetricValue::Group(group) => Some(group),
            _ => None,
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(self, MetricValue::Group(_))
    }
}

impl Serialize for MetricValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            MetricValue::Bytes(v) | MetricValue::Megabytes(v) | MetricValue::Count(v) => {
                serializer.serialize_u64(*v)
            }
            MetricValue::Group(group) => group.serialize(serializer),
        }
    }
}

/// Why a value could not be placed at a destination path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertConflict {
    /// The path is empty.
    EmptyPath,
    /// A leaf already occupies an intermediate segment.
    LeafInPath { segment: String },
    /// A group already occupies the final segment.
    GroupAtLeaf { segment: String },
    /// A leaf already occupies the final segment.
    Occupied { segment: String },
}

impl fmt::Display for InsertConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InsertConflict::EmptyPath => write!(f, "destination path is empty"),
            InsertConflict::LeafInPath { segment } => {
                write!(f, "'{}' already holds a value, not a group", segment)
            }
            InsertConflict::GroupAtLeaf { segment } => {
                write!(f, "'{}' already holds a group", segment)
            }
            InsertConflict::Occupied { segment } => {
                write!(f, "'{}' already holds a value", segment)
            }
        }
    }
}

/// An ordered, nested mapping of metric names to values.
///
/// Keys keep the order in which they were first inserted. Serializes as a
/// JSON object with leaves rendered as bare integers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricEvent {
    entries: Vec<(String, MetricValue)>,
}

impl MetricEvent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over the top-level entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &MetricValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns the top-level entry stored under `key`.
    pub fn get_key(&self, key: &str) -> Option<&MetricValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    fn get_key_mut(&mut self, key: &str) -> Option<&mut MetricValue> {
        self.entries
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Resolves a nested path such as `["ram", "total", "bytes"]`.
    pub fn get<S: AsRef<str>>(&self, path: &[S]) -> Option<&MetricValue> {
        let (last, parents) = path.split_last()?;
        let mut group = self;
        for segment in parents {
            group = group.get_key(segment.as_ref())?.as_group()?;
        }
        group.get_key(last.as_ref())
    }

    /// Places `value` at `path`, creating intermediate groups as needed.
    ///
    /// Nothing already in the event is ever overwritten: an occupied final
    /// segment, or a leaf where a group is needed, is an [`InsertConflict`]
    /// and leaves the event unchanged.
    pub fn insert_at<S: AsRef<str>>(
        &mut self,
        path: &[S],
        value: MetricValue,
    ) -> Result<(), InsertConflict> {
        let (last, parents) = path.split_last().ok_or(InsertConflict::EmptyPath)?;

        let mut group = self;
        for segment in parents {
            let segment = segment.as_ref();
            if group.get_key(segment).is_none() {
                group
                    .entries
                    .push((segment.to_string(), MetricValue::Group(MetricEvent::new())));
            }
            group = match group.get_key_mut(segment) {
                Some(MetricValue::Group(inner)) => inner,
                _ => {
                    return Err(InsertConflict::LeafInPath {
                        segment: segment.to_string(),
                    });
                }
            };
        }

        let last = last.as_ref();
        match group.get_key_mut(last) {
            Some(MetricValue::Group(_)) => Err(InsertConflict::GroupAtLeaf {
                segment: last.to_string(),
            }),
            Some(_) => Err(InsertConflict::Occupied {
                segment: last.to_string(),
            }),
            None => {
                group.entries.push((last.to_string(), value));
                Ok(())
            }
        }
    }

    /// Returns every leaf with its dotted path, in event order.
    pub fn flatten(&self) -> Vec<(String, MetricValue)> {
        let mut out = Vec::new();
        self.flatten_into("", &mut out);
        out
    }

    fn flatten_into(&self, prefix: &str, out: &mut Vec<(String, MetricValue)>) {
        for (key, value) in &self.entries {
            let path = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{}.{}", prefix, key)
            };
            match value {
                MetricValue::Group(group) => group.flatten_into(&path, out),
                leaf => out.push((path, leaf.clone())),
            }
        }
    }

    /// Number of leaves in the whole tree.
    pub fn leaf_count(&self) -> usize {
        self.entries
            .iter()
            .map(|(_, v)| match v {
                MetricValue::Group(group) => group.leaf_count(),
                _ => 1,
            })
            .sum()
    }

    /// Renders the event as a JSON value, ready for shipping.
    pub fn to_json(&self) -> serde_json::Value {
        // Serializing this type into a Value cannot fail: all keys are strings
        // and all leaves are u64.
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

impl Serialize for MetricEvent {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl fmt::Display for MetricEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&rendered)
    }
}
