use bytes::Bytes;
use memchr::memmem;
use std::collections::HashMap;

/// A literal byte rewrite applied to a raw response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fixup {
    from: Vec<u8>,
    to: Vec<u8>,
}

impl Fixup {
    pub fn new(from: impl Into<Vec<u8>>, to: impl Into<Vec<u8>>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Rewrites `"field":[]` into `"field":{}`.
    ///
    /// Conduit serializes an empty map as an empty list, which does not decode into a map.
    pub fn empty_map(field: &str) -> Self {
        Self::new(format!("\"{field}\":[]"), format!("\"{field}\":{{}}"))
    }

    /// Replaces every non-overlapping occurrence. A body without any occurrence is
    /// returned as is.
    pub fn apply(&self, body: Bytes) -> Bytes {
        if self.from.is_empty() {
            return body;
        }

        let finder = memmem::Finder::new(&self.from);
        if finder.find(&body).is_none() {
            return body;
        }

        let mut out = Vec::with_capacity(body.len());
        let mut last = 0;

        for pos in finder.find_iter(&body) {
            out.extend_from_slice(&body[last..pos]);
            out.extend_from_slice(&self.to);
            last = pos + self.from.len();
        }
        out.extend_from_slice(&body[last..]);

        Bytes::from(out)
    }
}

/// Response fixups keyed by procedure name.
///
/// The default table holds the anomalies known so far; more can be registered with
/// [`FixupRules::with`] as they are found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixupRules {
    rules: HashMap<String, Vec<Fixup>>,
}

impl Default for FixupRules {
    fn default() -> Self {
        Self::empty()
            .with("conduit.query", Fixup::empty_map("params"))
            .with("maniphest.search", Fixup::empty_map("boards"))
    }
}

impl FixupRules {
    /// A table with no rules at all.
    pub fn empty() -> Self {
        Self {
            rules: HashMap::new(),
        }
    }

    pub fn with(mut self, procedure: impl Into<String>, fixup: Fixup) -> Self {
        self.rules.entry(procedure.into()).or_default().push(fixup);
        self
    }

    pub fn rules_for(&self, procedure: &str) -> &[Fixup] {
        self.rules.get(procedure).map(Vec::as_slice).unwrap_or_default()
    }

    /// Applies every rule registered for `procedure`, in registration order.
    pub fn apply(&self, procedure: &str, body: Bytes) -> Bytes {
        self.rules_for(procedure)
            .iter()
            .fold(body, |body, fixup| fixup.apply(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rewrites_empty_params() {
        let body = Bytes::from_static(
            br#"{"result":{"user.whoami":{"description":"d","params":[],"return":"x"}}}"#,
        );

        let fixed = FixupRules::default().apply("conduit.query", body);

        assert_eq!(
            fixed,
            Bytes::from_static(
                br#"{"result":{"user.whoami":{"description":"d","params":{},"return":"x"}}}"#
            )
        );
    }

    #[test]
    fn test_rewrites_every_occurrence() {
        let fixup = Fixup::empty_map("boards");
        let body = Bytes::from_static(br#"[{"boards":[]},{"boards":[]},{"boards":{"a":1}}]"#);

        assert_eq!(
            fixup.apply(body),
            Bytes::from_static(br#"[{"boards":{}},{"boards":{}},{"boards":{"a":1}}]"#)
        );
    }

    #[test]
    fn test_body_without_pattern_is_untouched() {
        let body = Bytes::from_static(br#"{"result":{"data":[],"cursor":{"after":null}}}"#);

        let fixed = FixupRules::default().apply("maniphest.search", body.clone());

        assert_eq!(fixed, body);
        // Same allocation: nothing was copied.
        assert_eq!(fixed.as_ptr(), body.as_ptr());
    }

    #[test]
    fn test_procedures_without_rules_are_untouched() {
        let body = Bytes::from_static(br#"{"params":[]}"#);
        assert_eq!(FixupRules::default().apply("project.search", body.clone()), body);
    }

    #[test]
    fn test_rule_table_is_extensible() {
        let rules = FixupRules::empty().with("project.search", Fixup::empty_map("members"));
        let body = Bytes::from_static(br#"{"members":[]}"#);

        assert_eq!(
            rules.apply("project.search", body),
            Bytes::from_static(br#"{"members":{}}"#)
        );
        assert!(rules.rules_for("conduit.query").is_empty());
    }
}
