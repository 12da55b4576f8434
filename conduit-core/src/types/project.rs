use super::Policy;
use serde::{Deserialize, Serialize};

/// A project, as returned by `project.search`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Project {
    pub id: u64,
    #[serde(rename = "type")]
    pub kind: String,
    pub phid: String,
    pub fields: ProjectFields,
    pub attachments: ProjectAttachments,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProjectFields {
    pub name: String,
    pub slug: Option<String>,
    pub milestone: Option<u64>,
    pub depth: u64,
    pub parent: Option<ProjectRef>,
    pub icon: ProjectIcon,
    pub color: ProjectColor,
    #[serde(rename = "spacePHID")]
    pub space_phid: Option<String>,
    pub date_created: i64,
    pub date_modified: i64,
    pub policy: Policy,
    pub description: Option<String>,
}

/// A parent or ancestor project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectRef {
    pub id: u64,
    pub phid: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectIcon {
    pub key: String,
    pub name: String,
    pub icon: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectColor {
    pub key: String,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectAttachments {
    pub members: Members,
    pub watchers: Watchers,
    pub ancestors: Ancestors,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Members {
    pub members: Vec<PhidRef>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Watchers {
    pub watchers: Vec<PhidRef>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Ancestors {
    pub ancestors: Vec<ProjectRef>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhidRef {
    pub phid: String,
}
