use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use validator::ValidateUrl;

/// JSON kinds a field may be declared as.
#[derive(Debug, Clone, Copy)]
pub enum Kind {
    Bool,
    /// A JSON number without a fractional part.
    Integer,
    Number,
    String,
    /// A string that parses as an absolute URL.
    Url,
    ArrayOf(&'static Kind),
    Object(&'static [Field]),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// Key must be present and non-null.
    Required,
    /// Key must be present, `null` allowed.
    Nullable,
    /// Key may be absent; when present it must not be `null`.
    Optional,
}

#[derive(Debug, Clone, Copy)]
pub struct Field {
    pub name: &'static str,
    pub kind: Kind,
    pub presence: Presence,
}

impl Field {
    pub const fn required(name: &'static str, kind: Kind) -> Self {
        Self { name, kind, presence: Presence::Required }
    }

    pub const fn nullable(name: &'static str, kind: Kind) -> Self {
        Self { name, kind, presence: Presence::Nullable }
    }

    pub const fn optional(name: &'static str, kind: Kind) -> Self {
        Self { name, kind, presence: Presence::Optional }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueKind {
    Missing,
    WrongType {
        expected: &'static str,
        found: &'static str,
    },
    Refinement(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub path: String,
    pub kind: IssueKind,
}

impl std::fmt::Display for Issue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let path = if self.path.is_empty() { "<root>" } else { &self.path };
        match &self.kind {
            IssueKind::Missing => write!(f, "{}: required", path),
            IssueKind::WrongType { expected, found } => {
                write!(f, "{}: expected {}, found {}", path, expected, found)
            }
            IssueKind::Refinement(message) => write!(f, "{}: {}", path, message),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("{shape} failed validation: {}", join_issues(.issues))]
    Invalid {
        shape: &'static str,
        issues: Vec<Issue>,
    },
    #[error("{shape} could not be decoded: {source}")]
    Decode {
        shape: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl SchemaError {
    pub fn issues(&self) -> &[Issue] {
        match self {
            SchemaError::Invalid { issues, .. } => issues,
            SchemaError::Decode { .. } => &[],
        }
    }
}

fn join_issues(issues: &[Issue]) -> String {
    issues
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// A response type with a declared JSON shape.
///
/// `validate` walks the whole value and reports every violation before any
/// decoding happens, so a failure lists all offending fields at once.
pub trait Shape: Sized + Serialize + DeserializeOwned {
    const NAME: &'static str;
    const FIELDS: &'static [Field];

    fn validate(value: &Value) -> Result<Self, SchemaError> {
        let issues = check(value, Self::FIELDS);
        if !issues.is_empty() {
            return Err(SchemaError::Invalid {
                shape: Self::NAME,
                issues,
            });
        }
        <Self as serde::Deserialize>::deserialize(value).map_err(|source| SchemaError::Decode {
            shape: Self::NAME,
            source,
        })
    }
}

/// Check `value` against an object shape, returning every issue found.
pub fn check(value: &Value, fields: &'static [Field]) -> Vec<Issue> {
    let mut issues = Vec::new();
    check_kind(value, &Kind::Object(fields), String::new(), &mut issues);
    issues
}

fn check_kind(value: &Value, kind: &Kind, path: String, issues: &mut Vec<Issue>) {
    match kind {
        Kind::Bool => expect(value.is_boolean(), "boolean", value, path, issues),
        Kind::Integer => expect(
            value.is_i64() || value.is_u64(),
            "integer",
            value,
            path,
            issues,
        ),
        Kind::Number => expect(value.is_number(), "number", value, path, issues),
        Kind::String => expect(value.is_string(), "string", value, path, issues),
        Kind::Url => match value.as_str() {
            Some(s) if s.validate_url() => {}
            Some(_) => issues.push(Issue {
                path,
                kind: IssueKind::Refinement("not a valid URL".to_string()),
            }),
            None => expect(false, "string", value, path, issues),
        },
        Kind::ArrayOf(inner) => match value.as_array() {
            Some(items) => {
                for (idx, item) in items.iter().enumerate() {
                    check_kind(item, inner, format!("{}[{}]", path, idx), issues);
                }
            }
            None => expect(false, "array", value, path, issues),
        },
        Kind::Object(fields) => match value.as_object() {
            Some(map) => check_fields(map, fields, &path, issues),
            None => expect(false, "object", value, path, issues),
        },
    }
}

fn check_fields(
    map: &Map<String, Value>,
    fields: &'static [Field],
    path: &str,
    issues: &mut Vec<Issue>,
) {
    for field in fields {
        let field_path = if path.is_empty() {
            field.name.to_string()
        } else {
            format!("{}.{}", path, field.name)
        };

        match (map.get(field.name), field.presence) {
            (None, Presence::Optional) => {}
            (None, _) => issues.push(Issue {
                path: field_path,
                kind: IssueKind::Missing,
            }),
            (Some(Value::Null), Presence::Nullable) => {}
            (Some(Value::Null), Presence::Required) => issues.push(Issue {
                path: field_path,
                kind: IssueKind::Missing,
            }),
            (Some(value), _) => check_kind(value, &field.kind, field_path, issues),
        }
    }
}

fn expect(ok: bool, expected: &'static str, value: &Value, path: String, issues: &mut Vec<Issue>) {
    if !ok {
        issues.push(Issue {
            path,
            kind: IssueKind::WrongType {
                expected,
                found: type_name(value),
            },
        });
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "number",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
