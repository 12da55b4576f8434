use super::{Policy, Projects, is_false};
use serde::{Deserialize, Serialize};

/// Arguments of `diffusion.repository.search`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositorySearchArgs {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_key: Option<String>,
    pub attachments: RepositoryAttachmentsArgs,
    pub constraints: RepositoryConstraints,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RepositoryAttachmentsArgs {
    #[serde(skip_serializing_if = "is_false")]
    pub uris: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub projects: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryConstraints {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ids: Vec<u64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub phids: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub callsigns: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub short_names: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub types: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub uris: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub projects: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub spaces: Vec<String>,
}

/// A Diffusion repository.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Repository {
    pub id: u64,
    #[serde(rename = "type")]
    pub kind: String,
    pub phid: String,
    pub fields: RepositoryFields,
    pub attachments: RepositoryAttachments,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RepositoryFields {
    pub name: String,
    pub vcs: String,
    pub callsign: Option<String>,
    pub short_name: Option<String>,
    pub status: String,
    pub is_importing: bool,
    #[serde(rename = "almanacServicePHID")]
    pub almanac_service_phid: Option<String>,
    #[serde(rename = "spacePHID")]
    pub space_phid: Option<String>,
    pub date_created: i64,
    pub date_modified: i64,
    pub policy: Policy,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositoryAttachments {
    pub uris: Uris,
    pub projects: Projects,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Uris {
    pub uris: Vec<RepositoryUri>,
}

/// One clone/mirror URI of a repository.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositoryUri {
    pub id: u64,
    #[serde(rename = "type")]
    pub kind: String,
    pub phid: String,
    pub fields: RepositoryUriFields,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RepositoryUriFields {
    #[serde(rename = "repositoryPHID")]
    pub repository_phid: String,
    pub uri: UriForms,
    #[serde(rename = "credentialPHID")]
    pub credential_phid: Option<String>,
    pub disabled: bool,
    pub builtin: Builtin,
    pub date_created: i64,
    pub date_modified: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UriForms {
    pub raw: String,
    pub display: String,
    pub effective: String,
    pub normalized: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Builtin {
    pub protocol: Option<String>,
    pub identifier: Option<String>,
}
