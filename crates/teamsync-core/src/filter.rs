//! # Filter Rule Evaluator
//!
//! Decides whether a [`UserRecord`] belongs in the desired set.
//!
//! ## Document Format
//!
//! ```json
//! {
//!   "login": { "reject": ["^w"], "allow": ["n$"], "order": 0 }
//! }
//! ```
//!
//! An empty list (`[]`) or empty object means "no rules": everyone is admitted.
//!
//! ## Semantics
//!
//! For each configured field, in ascending `order` (ties by field name):
//!
//! 1. A field the user does not carry is skipped.
//! 2. Any matching `reject` pattern rejects the user. Reject always beats allow.
//! 3. A non-empty `allow` list with no matching pattern rejects the user.
//! 4. Otherwise the field passes.
//!
//! A user is admitted only when every field passes. Patterns are compiled
//! case-insensitively and searched anywhere in the value (unanchored), so
//! `n$` matches `shawn` and `^w` matches `Wendy`.

use std::collections::BTreeMap;

use regex::{Regex, RegexBuilder};
use serde::Deserialize;
use serde_json::Value;

use crate::error::FilterConfigError;
use crate::user::UserRecord;

/// Compiled rules for one field.
#[derive(Debug, Clone)]
pub struct FieldRule {
    field: String,
    order: i64,
    reject: Vec<Regex>,
    allow: Vec<Regex>,
}

impl FieldRule {
    /// Compile a rule for `field`.
    pub fn new(
        field: impl Into<String>,
        reject: &[&str],
        allow: &[&str],
    ) -> Result<Self, FilterConfigError> {
        let field = field.into();
        if field.is_empty() {
            return Err(FilterConfigError::EmptyFieldName);
        }
        Ok(Self {
            reject: compile_all(&field, "reject", reject.iter().copied())?,
            allow: compile_all(&field, "allow", allow.iter().copied())?,
            field,
            order: 0,
        })
    }

    /// Set the evaluation order of this field.
    pub fn with_order(mut self, order: i64) -> Self {
        self.order = order;
        self
    }

    /// Name of the user attribute this rule inspects.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Evaluation order; lower runs first.
    pub fn order(&self) -> i64 {
        self.order
    }

    fn check(&self, value: &str) -> Result<(), Rejection> {
        if let Some(re) = self.reject.iter().find(|re| re.is_match(value)) {
            return Err(Rejection::RejectMatched {
                pattern: re.as_str().to_string(),
            });
        }
        if !self.allow.is_empty() && !self.allow.iter().any(|re| re.is_match(value)) {
            return Err(Rejection::AllowUnmatched);
        }
        Ok(())
    }
}

/// Why a field rejected a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// A `reject` pattern matched.
    RejectMatched {
        /// Source text of the first matching pattern.
        pattern: String,
    },
    /// The `allow` list was non-empty and nothing in it matched.
    AllowUnmatched,
}

/// The admission decision for one user, with the deciding field when rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Every configured field passed (or was absent).
    Admitted,
    /// The first field, in evaluation order, that failed.
    Rejected {
        /// The failing field.
        field: String,
        /// Which list decided it.
        reason: Rejection,
    },
}

impl Verdict {
    /// Whether the user belongs in the desired set.
    pub fn is_admitted(&self) -> bool {
        matches!(self, Verdict::Admitted)
    }
}

/// The configured filtering policy. Immutable once built.
#[derive(Debug, Clone, Default)]
pub struct FilterRuleSet {
    rules: Vec<FieldRule>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawFieldRule {
    #[serde(default)]
    reject: Vec<String>,
    #[serde(default)]
    allow: Vec<String>,
    #[serde(default)]
    order: i64,
}

impl FilterRuleSet {
    /// A rule set that admits everyone.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from already-compiled field rules.
    pub fn new(rules: impl IntoIterator<Item = FieldRule>) -> Self {
        let mut rules: Vec<FieldRule> = rules.into_iter().collect();
        rules.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.field.cmp(&b.field)));
        Self { rules }
    }

    /// Parse and compile a JSON filter document.
    pub fn from_json_str(document: &str) -> Result<Self, FilterConfigError> {
        let value: Value = serde_json::from_str(document)?;
        Self::from_value(value)
    }

    /// Compile a filter document that has already been decoded.
    ///
    /// YAML documents are accepted by decoding them into a [`Value`] first.
    pub fn from_value(document: Value) -> Result<Self, FilterConfigError> {
        let fields = match document {
            Value::Object(map) => map,
            Value::Array(items) if items.is_empty() => return Ok(Self::empty()),
            Value::Null => return Ok(Self::empty()),
            other => return Err(FilterConfigError::InvalidDocument(describe(&other))),
        };

        // BTreeMap gives a stable field order before the `order` sort.
        let fields: BTreeMap<String, Value> = fields.into_iter().collect();
        let mut rules = Vec::with_capacity(fields.len());
        for (field, raw) in fields {
            if field.is_empty() {
                return Err(FilterConfigError::EmptyFieldName);
            }
            let raw: RawFieldRule =
                serde_json::from_value(raw).map_err(|source| FilterConfigError::InvalidRule {
                    field: field.clone(),
                    source,
                })?;
            rules.push(FieldRule {
                reject: compile_all(&field, "reject", raw.reject.iter().map(String::as_str))?,
                allow: compile_all(&field, "allow", raw.allow.iter().map(String::as_str))?,
                order: raw.order,
                field,
            });
        }
        Ok(Self::new(rules))
    }

    /// Whether no field is configured, so every user is admitted.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Field rules in evaluation order.
    pub fn rules(&self) -> &[FieldRule] {
        &self.rules
    }

    /// Field names in evaluation order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|r| r.field.as_str())
    }

    /// Whether evaluating `user` would skip a field because it is absent.
    pub fn references_missing_field(&self, user: &UserRecord) -> bool {
        self.fields().any(|f| !user.has_field(f))
    }

    /// Evaluate `user`, reporting the deciding field on rejection.
    pub fn evaluate(&self, user: &UserRecord) -> Verdict {
        for rule in &self.rules {
            let value = match user.field(&rule.field) {
                Ok(value) => value,
                Err(missing) => {
                    tracing::trace!(%missing, "field absent, rule does not apply");
                    continue;
                }
            };
            if let Err(reason) = rule.check(&value) {
                return Verdict::Rejected {
                    field: rule.field.clone(),
                    reason,
                };
            }
        }
        Verdict::Admitted
    }

    /// The admission decision: `true` when every configured field passes.
    pub fn admit(&self, user: &UserRecord) -> bool {
        self.evaluate(user).is_admitted()
    }
}

/// Free-function form of [`FilterRuleSet::admit`].
pub fn admit(user: &UserRecord, rules: &FilterRuleSet) -> bool {
    rules.admit(user)
}

fn compile_all<'a>(
    field: &str,
    list: &'static str,
    patterns: impl Iterator<Item = &'a str>,
) -> Result<Vec<Regex>, FilterConfigError> {
    patterns
        .map(|pattern| {
            RegexBuilder::new(pattern)
                .case_insensitive(true)
                .build()
                .map_err(|source| FilterConfigError::InvalidPattern {
                    field: field.to_string(),
                    list,
                    pattern: pattern.to_string(),
                    source,
                })
        })
        .collect()
}

fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".into(),
        Value::Bool(_) => "a boolean".into(),
        Value::Number(_) => "a number".into(),
        Value::String(_) => "a string".into(),
        Value::Array(_) => "a non-empty list".into(),
        Value::Object(_) => "an object".into(),
    }
}
