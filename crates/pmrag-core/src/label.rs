//! Node labels for the project-management graph

use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of object classes stored as graph nodes
///
/// Labels are interpolated into Cypher, so they come from this enum and never from
/// runtime strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NodeLabel {
    /// A user story, child of an epic
    UserStory,
    /// An epic, child of a goal
    Epic,
    /// A goal, child of a project
    Goal,
    /// A project
    Project,
    /// A backlog
    Backlog,
}

impl NodeLabel {
    /// Every label, in hierarchy order
    pub const ALL: [NodeLabel; 5] = [
        NodeLabel::UserStory,
        NodeLabel::Epic,
        NodeLabel::Goal,
        NodeLabel::Project,
        NodeLabel::Backlog,
    ];

    /// The Cypher label text
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeLabel::UserStory => "UserStory",
            NodeLabel::Epic => "Epic",
            NodeLabel::Goal => "Goal",
            NodeLabel::Project => "Project",
            NodeLabel::Backlog => "Backlog",
        }
    }

    /// Map an object-class value (the `pxobjclass` column) to a label
    ///
    /// Accepts the bare class name or a dash-qualified class such as
    /// `PegaProjMgmt-Work-UserStory`, case-insensitively.
    pub fn from_object_class(class: &str) -> Option<Self> {
        let class = class.trim();
        Self::from_name(class).or_else(|| class.rsplit('-').next().and_then(Self::from_name))
    }

    fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "userstory" | "user_story" | "story" => Some(NodeLabel::UserStory),
            "epic" => Some(NodeLabel::Epic),
            "goal" => Some(NodeLabel::Goal),
            "project" => Some(NodeLabel::Project),
            "backlog" => Some(NodeLabel::Backlog),
            _ => None,
        }
    }
}

impl fmt::Display for NodeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
