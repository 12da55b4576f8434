use super::Policy;
use serde::{Deserialize, Serialize};

/// A user account, as returned by `user.search`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    pub id: u64,
    #[serde(rename = "type")]
    pub kind: String,
    pub phid: String,
    pub fields: UserFields,
    pub attachments: UserAttachments,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserFields {
    pub username: String,
    pub real_name: String,
    pub roles: Vec<String>,
    pub date_created: i64,
    pub date_modified: i64,
    pub policy: Policy,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserAttachments {
    pub availability: Availability,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Availability {
    pub value: Option<String>,
    pub until: Option<i64>,
    pub name: Option<String>,
    pub color: Option<String>,
}
