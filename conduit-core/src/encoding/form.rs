use super::{EncodeError, json_kind};
use serde::Serialize;
use serde_json::Value;
use url::form_urlencoded::byte_serialize;

/// An ordered list of form parameters.
///
/// Keys keep their brackets unescaped when rendered, values are form-escaped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormArgs {
    pairs: Vec<(String, String)>,
}

impl FormArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a parameter list authenticated with `api.token`.
    pub fn with_token(token: &str) -> Self {
        let mut args = Self::new();
        args.push("api.token", token);
        args
    }

    /// Encodes a serializable argument struct.
    ///
    /// * Scalars become `key=value`; `null` (e.g. a `None` field) is omitted.
    /// * Lists become indexed keys: `ids[0]=1&ids[1]=2`. Empty lists are omitted.
    /// * Nested objects become bracketed keys: `attachments[subscribers]=true`.
    ///
    /// Field order follows the serialization order of `args`.
    pub fn from_serializable<A: Serialize + ?Sized>(args: &A) -> Result<Self, EncodeError> {
        let mut form = Self::new();

        match serde_json::to_value(args)? {
            Value::Object(map) => {
                for (key, value) in map {
                    flatten(&mut form.pairs, key, value);
                }
            }
            Value::Null => {}
            other => return Err(EncodeError::NotAnObject(json_kind(&other))),
        }

        Ok(form)
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((key.into(), value.into()));
    }

    pub fn extend(&mut self, other: FormArgs) {
        self.pairs.extend(other.pairs);
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Renders the `application/x-www-form-urlencoded` body.
    pub fn encode(&self) -> String {
        let mut out = String::new();

        for (index, (key, value)) in self.pairs.iter().enumerate() {
            if index > 0 {
                out.push('&');
            }
            push_key(&mut out, key);
            out.push('=');
            out.extend(byte_serialize(value.as_bytes()));
        }

        out
    }
}

fn flatten(pairs: &mut Vec<(String, String)>, key: String, value: Value) {
    match value {
        Value::Null => {}
        Value::Bool(b) => pairs.push((key, b.to_string())),
        Value::Number(n) => pairs.push((key, n.to_string())),
        Value::String(s) => pairs.push((key, s)),
        Value::Array(items) => {
            for (index, item) in items.into_iter().enumerate() {
                flatten(pairs, format!("{key}[{index}]"), item);
            }
        }
        Value::Object(map) => {
            for (field, item) in map {
                flatten(pairs, format!("{key}[{field}]"), item);
            }
        }
    }
}

fn push_key(out: &mut String, key: &str) {
    let mut rest = key;

    while let Some(pos) = rest.find(|c| c == '[' || c == ']') {
        out.extend(byte_serialize(rest[..pos].as_bytes()));
        out.push_str(&rest[pos..pos + 1]);
        rest = &rest[pos + 1..];
    }

    out.extend(byte_serialize(rest.as_bytes()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Serialize, Default)]
    struct Attachments {
        #[serde(skip_serializing_if = "std::ops::Not::not")]
        subscribers: bool,
        #[serde(skip_serializing_if = "std::ops::Not::not")]
        projects: bool,
    }

    #[derive(Serialize, Default)]
    struct Constraints {
        #[serde(skip_serializing_if = "Vec::is_empty")]
        ids: Vec<u64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        query: Option<String>,
    }

    #[derive(Serialize, Default)]
    #[serde(rename_all = "camelCase")]
    struct Args {
        #[serde(skip_serializing_if = "Option::is_none")]
        query_key: Option<String>,
        attachments: Attachments,
        constraints: Constraints,
    }

    #[test]
    fn test_nested_and_indexed_keys() {
        let args = Args {
            query_key: Some("authored".into()),
            attachments: Attachments {
                subscribers: true,
                projects: false,
            },
            constraints: Constraints {
                ids: vec![5, 7],
                query: None,
            },
        };

        let form = FormArgs::from_serializable(&args).unwrap();

        assert_eq!(
            form.encode(),
            "queryKey=authored&attachments[subscribers]=true&constraints[ids][0]=5&constraints[ids][1]=7"
        );
    }

    #[test]
    fn test_empty_fields_are_omitted() {
        let form = FormArgs::from_serializable(&Args::default()).unwrap();
        assert!(form.is_empty());
        assert_eq!(form.encode(), "");
    }

    #[test]
    fn test_values_are_escaped_but_brackets_in_keys_are_not() {
        let form = FormArgs::from_serializable(&json!({
            "constraints": { "query": "title:\"a & b\"" }
        }))
        .unwrap();

        assert_eq!(
            form.encode(),
            "constraints[query]=title%3A%22a+%26+b%22"
        );
    }

    #[test]
    fn test_unit_arguments_encode_to_nothing() {
        let form = FormArgs::from_serializable(&()).unwrap();
        assert!(form.is_empty());
    }

    #[test]
    fn test_rejects_non_object_arguments() {
        let err = FormArgs::from_serializable(&vec![1, 2]).unwrap_err();
        assert!(matches!(err, EncodeError::NotAnObject("an array")));
    }

    #[test]
    fn test_token_comes_first() {
        let mut form = FormArgs::with_token("api-abc");
        form.extend(FormArgs::from_serializable(&json!({ "queryKey": "all" })).unwrap());
        form.push("after", "42");

        assert_eq!(form.encode(), "api.token=api-abc&queryKey=all&after=42");
    }
}
