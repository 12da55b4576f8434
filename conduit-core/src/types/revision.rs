use super::{Policy, Projects, Subscribers, is_false};
use serde::{Deserialize, Serialize};

/// Arguments of `differential.revision.search`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevisionSearchArgs {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_key: Option<String>,
    pub attachments: RevisionAttachmentsArgs,
    pub constraints: RevisionConstraints,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RevisionAttachmentsArgs {
    #[serde(skip_serializing_if = "is_false")]
    pub reviewers: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub subscribers: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub projects: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevisionConstraints {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ids: Vec<u64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub phids: Vec<String>,
    #[serde(rename = "responsiblePHIDs", skip_serializing_if = "Vec::is_empty")]
    pub responsible_phids: Vec<String>,
    #[serde(rename = "authorPHIDs", skip_serializing_if = "Vec::is_empty")]
    pub author_phids: Vec<String>,
    #[serde(rename = "reviewerPHIDs", skip_serializing_if = "Vec::is_empty")]
    pub reviewer_phids: Vec<String>,
    #[serde(rename = "repositoryPHIDs", skip_serializing_if = "Vec::is_empty")]
    pub repository_phids: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub statuses: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_start: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_end: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub subscribers: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub projects: Vec<String>,
}

/// A Differential revision.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Revision {
    pub id: u64,
    #[serde(rename = "type")]
    pub kind: String,
    pub phid: String,
    pub fields: RevisionFields,
    pub attachments: RevisionAttachments,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RevisionFields {
    pub title: String,
    #[serde(rename = "authorPHID")]
    pub author_phid: String,
    pub status: RevisionStatus,
    #[serde(rename = "repositoryPHID")]
    pub repository_phid: Option<String>,
    #[serde(rename = "diffPHID")]
    pub diff_phid: String,
    pub summary: String,
    pub test_plan: String,
    pub is_draft: bool,
    pub hold_as_draft: bool,
    pub date_created: i64,
    pub date_modified: i64,
    pub policy: Policy,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevisionStatus {
    pub value: String,
    pub name: String,
    pub closed: bool,
    #[serde(rename = "color.ansi")]
    pub color_ansi: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevisionAttachments {
    pub reviewers: Reviewers,
    pub subscribers: Subscribers,
    pub projects: Projects,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Reviewers {
    pub reviewers: Vec<Reviewer>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Reviewer {
    #[serde(rename = "reviewerPHID")]
    pub reviewer_phid: String,
    pub status: String,
    pub is_blocking: bool,
    #[serde(rename = "actorPHID")]
    pub actor_phid: Option<String>,
}
