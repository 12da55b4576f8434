use super::{Policy, Projects, Subscribers, is_false};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// Arguments of `maniphest.search`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketSearchArgs {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_key: Option<String>,
    pub attachments: TicketAttachmentsArgs,
    pub constraints: TicketConstraints,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TicketAttachmentsArgs {
    #[serde(skip_serializing_if = "is_false")]
    pub columns: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub subscribers: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub projects: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketConstraints {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ids: Vec<u64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub phids: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub assigned: Vec<String>,
    #[serde(rename = "authorPHIDs", skip_serializing_if = "Vec::is_empty")]
    pub author_phids: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub statuses: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub priorities: Vec<i64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub subtypes: Vec<String>,
    #[serde(rename = "columnPHIDs", skip_serializing_if = "Vec::is_empty")]
    pub column_phids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_parents: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_subtasks: Option<bool>,
    #[serde(rename = "parentIDs", skip_serializing_if = "Vec::is_empty")]
    pub parent_ids: Vec<u64>,
    #[serde(rename = "subtaskIDs", skip_serializing_if = "Vec::is_empty")]
    pub subtask_ids: Vec<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_start: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_end: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_start: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_end: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closed_start: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closed_end: Option<i64>,
    #[serde(rename = "closerPHIDs", skip_serializing_if = "Vec::is_empty")]
    pub closer_phids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub subscribers: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub projects: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub spaces: Vec<String>,
}

/// A Maniphest task, as returned by `maniphest.search`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Ticket {
    pub id: u64,
    #[serde(rename = "type")]
    pub kind: String,
    pub phid: String,
    pub fields: TicketFields,
    pub attachments: TicketAttachments,
}

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}: {}", self.id, self.fields.name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TicketFields {
    pub name: String,
    pub description: Description,
    #[serde(rename = "authorPHID")]
    pub author_phid: String,
    #[serde(rename = "ownerPHID")]
    pub owner_phid: Option<String>,
    pub status: TicketStatus,
    pub priority: TicketPriority,
    pub points: Option<String>,
    pub subtype: String,
    #[serde(rename = "closerPHID")]
    pub closer_phid: Option<String>,
    pub date_closed: Option<i64>,
    #[serde(rename = "spacePHID")]
    pub space_phid: Option<String>,
    pub date_created: i64,
    pub date_modified: i64,
    pub policy: Policy,
    /// Custom fields (`custom.*`) and anything else the server adds.
    #[serde(flatten)]
    pub custom: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Description {
    pub raw: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TicketStatus {
    pub value: String,
    pub name: String,
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TicketPriority {
    pub value: i64,
    pub subpriority: f64,
    pub name: String,
    pub color: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TicketAttachments {
    pub columns: ColumnsAttachment,
    pub subscribers: Subscribers,
    pub projects: Projects,
}

/// Workboard columns of a task, keyed by board (project) PHID.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnsAttachment {
    pub boards: BTreeMap<String, Board>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Board {
    pub columns: Vec<Column>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Column {
    pub id: u64,
    pub phid: String,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::FormArgs;

    #[test]
    fn test_decodes_task() {
        let ticket: Ticket = serde_json::from_str(
            r#"{
                "id": 42,
                "type": "TASK",
                "phid": "PHID-TASK-1",
                "fields": {
                    "name": "Fix the flux capacitor",
                    "description": { "raw": "It is broken." },
                    "authorPHID": "PHID-USER-1",
                    "ownerPHID": null,
                    "status": { "value": "open", "name": "Open", "color": null },
                    "priority": { "value": 90, "subpriority": 0, "name": "Needs Triage", "color": "violet" },
                    "points": null,
                    "subtype": "default",
                    "closerPHID": null,
                    "dateClosed": null,
                    "spacePHID": null,
                    "dateCreated": 1700000000,
                    "dateModified": 1700000100,
                    "policy": { "view": "users", "interact": "users", "edit": "users" },
                    "custom.app-version": "1.2.3"
                },
                "attachments": {
                    "columns": { "boards": { "PHID-PROJ-1": { "columns": [ { "id": 3, "phid": "PHID-PCOL-3", "name": "Backlog" } ] } } }
                }
            }"#,
        )
        .unwrap();

        assert_eq!(ticket.to_string(), "T42: Fix the flux capacitor");
        assert_eq!(ticket.fields.owner_phid, None);
        assert_eq!(ticket.fields.priority.value, 90);
        assert_eq!(ticket.fields.policy.interact.as_deref(), Some("users"));
        assert_eq!(ticket.fields.custom["custom.app-version"], "1.2.3");
        assert_eq!(
            ticket.attachments.columns.boards["PHID-PROJ-1"].columns[0].name,
            "Backlog"
        );
        assert!(ticket.attachments.subscribers.subscriber_phids.is_empty());
    }

    #[test]
    fn test_search_args_encoding() {
        let args = TicketSearchArgs {
            query_key: Some("open".into()),
            attachments: TicketAttachmentsArgs {
                projects: true,
                ..Default::default()
            },
            constraints: TicketConstraints {
                statuses: vec!["open".into(), "resolved".into()],
                author_phids: vec!["PHID-USER-1".into()],
                ..Default::default()
            },
            ..Default::default()
        };

        assert_eq!(
            FormArgs::from_serializable(&args).unwrap().encode(),
            "queryKey=open&attachments[projects]=true&constraints[authorPHIDs][0]=PHID-USER-1&constraints[statuses][0]=open&constraints[statuses][1]=resolved"
        );
    }
}
