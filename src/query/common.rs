/*!
# Shared Types

Defines [`Match`], the value produced by resolving a path against a tree.
Matches borrow from the caller's tree; the only structure the engine builds
itself is the group collected while fanning a segment out over a sequence.
*/
use serde::{Serialize, Serializer, ser::SerializeSeq};
use serde_json::Value;

/// A resolved value.
#[derive(PartialEq, Debug, Clone)]
pub enum Match<'a> {
    /// A node of the source tree
    Node(&'a Value),
    /// The per-element results of applying one segment to every element of
    /// a sequence, in element order. Each element contributes exactly one
    /// entry, so fanning out over nested sequences nests groups.
    Group(Vec<Self>),
}

impl<'a> Match<'a> {
    /// Returns the borrowed tree node, if this match is one.
    #[must_use]
    pub const fn as_node(&self) -> Option<&'a Value> {
        match self {
            Self::Node(value) => Some(*value),
            Self::Group(_) => None,
        }
    }

    /// Returns the items of a sequence match (a tree array or a group), or
    /// `None` for maps and scalars.
    #[must_use]
    pub fn items(&self) -> Option<Vec<Self>> {
        match self {
            Self::Node(node) => match *node {
                Value::Array(values) => {
                    Some(values.iter().map(Match::Node).collect())
                }
                _ => None,
            },
            Self::Group(items) => Some(items.clone()),
        }
    }

    /// Looks up a key on a map node.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Self> {
        match self.as_node()? {
            Value::Object(map) => map.get(key).map(Match::Node),
            _ => None,
        }
    }

    /// Builds an owned [`Value`] with the same shape, turning groups into
    /// arrays.
    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Self::Node(value) => (*value).clone(),
            Self::Group(items) => {
                Value::Array(items.iter().map(Match::to_value).collect())
            }
        }
    }
}

impl<'a> From<&'a Value> for Match<'a> {
    fn from(value: &'a Value) -> Self {
        Self::Node(value)
    }
}

impl PartialEq<Value> for Match<'_> {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Self::Node(value), other) => *value == other,
            (Self::Group(items), Value::Array(values)) => {
                items.len() == values.len()
                    && items.iter().zip(values).all(|(m, v)| m == v)
            }
            (Self::Group(_), _) => false,
        }
    }
}

impl Serialize for Match<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Node(value) => value.serialize(serializer),
            Self::Group(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
        }
    }
}

impl std::fmt::Display for Match<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match serde_json::to_string(self) {
            Ok(json) => write!(f, "{json}"),
            Err(_) => Err(std::fmt::Error),
        }
    }
}
