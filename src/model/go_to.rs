use super::definition::NodeId;
use itertools::Itertools;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Ordered list of "next step" node ids offered from a root node.
///
/// The backend transports this as a comma-joined string (`"4,7,9"`). Parsing is
/// lenient: whitespace is trimmed and entries that are not ids are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct GoTo(Vec<NodeId>);

impl GoTo {
    pub fn new(ids: Vec<NodeId>) -> Self {
        Self(ids)
    }

    pub fn parse(raw: &str) -> Self {
        raw.split(',')
            .filter_map(|part| part.trim().parse::<NodeId>().ok())
            .collect()
    }

    pub fn ids(&self) -> &[NodeId] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.0.contains(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.0.iter().copied()
    }

    /// The comma-joined wire form. An empty list yields an empty string.
    pub fn to_transport(&self) -> String {
        self.0.iter().join(",")
    }
}

impl FromIterator<NodeId> for GoTo {
    fn from_iter<I: IntoIterator<Item = NodeId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<Vec<NodeId>> for GoTo {
    fn from(ids: Vec<NodeId>) -> Self {
        Self(ids)
    }
}

impl fmt::Display for GoTo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_transport())
    }
}

impl Serialize for GoTo {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_transport())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IdRepr {
    Number(NodeId),
    Text(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum GoToRepr {
    Single(NodeId),
    Text(String),
    List(Vec<IdRepr>),
}

impl<'de> Deserialize<'de> for GoTo {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let go_to = match GoToRepr::deserialize(deserializer)? {
            GoToRepr::Single(id) => GoTo(vec![id]),
            GoToRepr::Text(raw) => GoTo::parse(&raw),
            GoToRepr::List(items) => items
                .into_iter()
                .filter_map(|item| match item {
                    IdRepr::Number(id) => Some(id),
                    IdRepr::Text(raw) => raw.trim().parse().ok(),
                })
                .collect(),
        };
        Ok(go_to)
    }
}
