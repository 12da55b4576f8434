use super::{Policy, is_false};
use serde::{Deserialize, Serialize};

/// Arguments of `differential.diff.search`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffSearchArgs {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_key: Option<String>,
    pub attachments: DiffAttachmentsArgs,
    pub constraints: DiffConstraints,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiffAttachmentsArgs {
    #[serde(skip_serializing_if = "is_false")]
    pub commits: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiffConstraints {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ids: Vec<u64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub phids: Vec<String>,
    #[serde(rename = "revisionPHIDs", skip_serializing_if = "Vec::is_empty")]
    pub revision_phids: Vec<String>,
}

/// A Differential diff.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Diff {
    pub id: u64,
    #[serde(rename = "type")]
    pub kind: String,
    pub phid: String,
    pub fields: DiffFields,
    pub attachments: DiffAttachments,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DiffFields {
    #[serde(rename = "revisionPHID")]
    pub revision_phid: Option<String>,
    #[serde(rename = "authorPHID")]
    pub author_phid: Option<String>,
    #[serde(rename = "repositoryPHID")]
    pub repository_phid: Option<String>,
    pub refs: Vec<DiffRef>,
    pub date_created: i64,
    pub date_modified: i64,
    pub policy: Policy,
}

/// A VCS reference the diff was created from (branch, bookmark, base commit...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffRef {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: Option<String>,
    pub identifier: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffAttachments {
    pub commits: Commits,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Commits {
    pub commits: Vec<Commit>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Commit {
    pub identifier: String,
    pub tree: Option<String>,
    pub parents: Vec<String>,
    pub author: CommitAuthor,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommitAuthor {
    pub name: String,
    pub email: String,
    pub raw: String,
    pub epoch: Option<i64>,
}
