//! # Edit Invoker
//!
//! `*.edit` procedures mutate one object through an ordered list of transactions, applied
//! server-side in sequence. Without an object identifier the procedure creates a new object.
//!
//! ```text
//! objectIdentifier=42&transactions[0][type]=title&transactions[0][value]=Foo
//! ```
//!
//! An edit is a single request: no pagination, no retries.
use crate::{
    catalog::{ProcedureCatalog, ProcedureKind},
    client::Session,
    encoding::{EncodeError, FormArgs, decode_envelope, json_kind},
    error::CallError,
    transport::Transport,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// The object an edit applies to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ObjectIdentifier {
    /// Numeric ID (e.g., `42` for `T42`).
    Id(u64),
    /// PHID (e.g., `PHID-TASK-abcd`) or monogram (e.g., `T42`).
    Phid(String),
}

impl ObjectIdentifier {
    /// Reads an identifier from JSON. Only integers, strings and `null` (no identifier) are
    /// accepted.
    pub fn from_json(value: &Value) -> Result<Option<Self>, EncodeError> {
        match value {
            Value::Null => Ok(None),
            Value::String(phid) => Ok(Some(ObjectIdentifier::Phid(phid.clone()))),
            Value::Number(n) => n
                .as_u64()
                .map(|id| Some(ObjectIdentifier::Id(id)))
                .ok_or(EncodeError::UnsupportedIdentifier("a non-integer number")),
            other => Err(EncodeError::UnsupportedIdentifier(json_kind(other))),
        }
    }
}

impl fmt::Display for ObjectIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectIdentifier::Id(id) => write!(f, "{id}"),
            ObjectIdentifier::Phid(phid) => f.write_str(phid),
        }
    }
}

impl From<u64> for ObjectIdentifier {
    fn from(id: u64) -> Self {
        ObjectIdentifier::Id(id)
    }
}

impl From<&str> for ObjectIdentifier {
    fn from(phid: &str) -> Self {
        ObjectIdentifier::Phid(phid.to_string())
    }
}

impl From<String> for ObjectIdentifier {
    fn from(phid: String) -> Self {
        ObjectIdentifier::Phid(phid)
    }
}

/// One mutation instruction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The transaction type (e.g., `title`, `status`, `projects.add`).
    #[serde(rename = "type")]
    pub kind: String,
    pub value: Value,
}

impl Transaction {
    pub fn new(kind: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            kind: kind.into(),
            value: value.into(),
        }
    }

    /// Strings are sent as-is, anything else as JSON.
    fn form_value(&self) -> String {
        match &self.value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

/// Arguments of an edit call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditArguments {
    pub object_identifier: Option<ObjectIdentifier>,
    pub transactions: Vec<Transaction>,
}

impl EditArguments {
    /// Arguments that create a new object.
    pub fn new() -> Self {
        Self::default()
    }

    /// Arguments that edit an existing object.
    pub fn for_object(id: impl Into<ObjectIdentifier>) -> Self {
        Self {
            object_identifier: Some(id.into()),
            transactions: Vec::new(),
        }
    }

    /// Appends a transaction.
    pub fn transaction(mut self, kind: impl Into<String>, value: impl Into<Value>) -> Self {
        self.transactions.push(Transaction::new(kind, value));
        self
    }

    /// Encodes the arguments, transactions in order.
    pub fn to_form(&self) -> FormArgs {
        let mut form = FormArgs::new();

        if let Some(id) = &self.object_identifier {
            form.push("objectIdentifier", id.to_string());
        }

        for (index, transaction) in self.transactions.iter().enumerate() {
            form.push(format!("transactions[{index}][type]"), transaction.kind.as_str());
            form.push(format!("transactions[{index}][value]"), transaction.form_value());
        }

        form
    }
}

#[derive(Debug, Default, Deserialize)]
struct EditReceipt {
    #[serde(default)]
    object: EditedObject,
    #[serde(default)]
    transactions: Vec<TransactionReceipt>,
}

#[derive(Debug, Default, Deserialize)]
struct EditedObject {
    id: Option<u64>,
    phid: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TransactionReceipt {
    #[serde(default, alias = "PHID")]
    phid: String,
}

/// Runs one edit call.
pub(crate) async fn edit<T: Transport>(
    session: &Session<T>,
    catalog: &ProcedureCatalog,
    cancel: CancellationToken,
    procedure: &str,
    args: &EditArguments,
) -> Result<(), CallError> {
    catalog.require(procedure, ProcedureKind::Edit)?;
    let url = session.endpoint(procedure)?;
    let body = session.authenticated(args.to_form()).encode();

    if cancel.is_cancelled() {
        debug!(procedure, "Edit cancelled before it was sent");
        return Err(CallError::Cancelled);
    }

    let response = session.post(procedure, &url, body).await?;
    let receipt: EditReceipt = decode_envelope(procedure, &response)?;

    debug!(
        procedure,
        object_id = ?receipt.object.id,
        object_phid = ?receipt.object.phid,
        transactions = ?receipt.transactions.iter().map(|t| t.phid.as_str()).collect::<Vec<_>>(),
        "Edit applied"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_encodes_identifier_and_transactions_in_order() {
        let args = EditArguments::for_object(42u64)
            .transaction("name", "Foo")
            .transaction("status", "open");

        assert_eq!(
            args.to_form().encode(),
            "objectIdentifier=42&transactions[0][type]=name&transactions[0][value]=Foo&transactions[1][type]=status&transactions[1][value]=open"
        );
    }

    #[test]
    fn test_structured_values_are_json_encoded() {
        let args = EditArguments::new()
            .transaction("projects.add", json!(["PHID-PROJ-1", "PHID-PROJ-2"]))
            .transaction("points", 3)
            .transaction("custom.flag", true);

        let form = args.to_form();

        assert_eq!(
            form.pairs(),
            [
                ("transactions[0][type]".to_string(), "projects.add".to_string()),
                (
                    "transactions[0][value]".to_string(),
                    r#"["PHID-PROJ-1","PHID-PROJ-2"]"#.to_string()
                ),
                ("transactions[1][type]".to_string(), "points".to_string()),
                ("transactions[1][value]".to_string(), "3".to_string()),
                ("transactions[2][type]".to_string(), "custom.flag".to_string()),
                ("transactions[2][value]".to_string(), "true".to_string()),
            ]
        );
    }

    #[test]
    fn test_phid_identifier() {
        let args = EditArguments::for_object("PHID-TASK-abcd").transaction("title", "x");
        assert!(args.to_form().encode().starts_with("objectIdentifier=PHID-TASK-abcd&"));
    }

    #[test]
    fn test_identifier_from_json() {
        assert_eq!(
            ObjectIdentifier::from_json(&json!(42)).unwrap(),
            Some(ObjectIdentifier::Id(42))
        );
        assert_eq!(
            ObjectIdentifier::from_json(&json!("T42")).unwrap(),
            Some(ObjectIdentifier::Phid("T42".into()))
        );
        assert_eq!(ObjectIdentifier::from_json(&Value::Null).unwrap(), None);

        assert!(matches!(
            ObjectIdentifier::from_json(&json!(true)),
            Err(EncodeError::UnsupportedIdentifier("a boolean"))
        ));
        assert!(matches!(
            ObjectIdentifier::from_json(&json!({ "id": 1 })),
            Err(EncodeError::UnsupportedIdentifier("an object"))
        ));
        assert!(matches!(
            ObjectIdentifier::from_json(&json!(-1)),
            Err(EncodeError::UnsupportedIdentifier(_))
        ));
    }

    #[test]
    fn test_receipt_shape() {
        let receipt: EditReceipt = serde_json::from_str(
            r#"{"object":{"id":42,"phid":"PHID-TASK-1"},"transactions":[{"phid":"PHID-XACT-1"},{"PHID":"PHID-XACT-2"}]}"#,
        )
        .unwrap();

        assert_eq!(receipt.object.id, Some(42));
        assert_eq!(receipt.transactions[1].phid, "PHID-XACT-2");
    }
}
