use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

/// Kind of row a like can point at.
///
/// Both kinds share the same toggle semantics and differ only in which
/// target table and mark table back them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum TargetKind {
    Post,
    Comment,
}

impl TargetKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Post => "post",
            Self::Comment => "comment",
        }
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A likeable row: kind plus id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LikeTarget {
    pub kind: TargetKind,
    pub id: i32,
}

impl LikeTarget {
    pub fn new(kind: TargetKind, id: i32) -> Self {
        Self { kind, id }
    }
}

impl fmt::Display for LikeTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}

/// Like state of one requester on one target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LikeStatus {
    pub liked: bool,
}
