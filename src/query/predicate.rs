use serde::{Deserialize, Serialize};

/// Value interpretation for a predicate's comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PredicateKind {
    #[default]
    String,
    Number,
    Date,
    FullText,
}

/// Comparison operator. `Contains` is the default; for numeric kinds it
/// degrades to `Equals`, and `FullText` ignores it entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompareOp {
    Equals,
    Different,
    #[default]
    Contains,
    Gte,
    Lte,
    Gt,
    Lt,
}

/// One filter condition. A query is an ordered list of predicates combined
/// with AND semantics; the empty list matches every record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Predicate {
    #[serde(alias = "key", default)]
    pub field: String,
    #[serde(rename = "type", default)]
    pub kind: PredicateKind,
    pub content: String,
    #[serde(default)]
    pub compare: CompareOp,
}

impl Predicate {
    /// String predicate with the default `Contains` comparison.
    pub fn new(field: &str, content: &str) -> Self {
        Predicate {
            field: field.to_string(),
            kind: PredicateKind::String,
            content: content.to_string(),
            compare: CompareOp::Contains,
        }
    }

    pub fn string(field: &str, compare: CompareOp, content: &str) -> Self {
        Predicate {
            field: field.to_string(),
            kind: PredicateKind::String,
            content: content.to_string(),
            compare,
        }
    }

    pub fn number(field: &str, compare: CompareOp, content: &str) -> Self {
        Predicate {
            field: field.to_string(),
            kind: PredicateKind::Number,
            content: content.to_string(),
            compare,
        }
    }

    pub fn date(field: &str, compare: CompareOp, content: &str) -> Self {
        Predicate {
            field: field.to_string(),
            kind: PredicateKind::Date,
            content: content.to_string(),
            compare,
        }
    }

    /// Full-text predicate over the derived search text; the field and
    /// comparison operator are not consulted.
    pub fn fulltext(content: &str) -> Self {
        Predicate {
            field: String::new(),
            kind: PredicateKind::FullText,
            content: content.to_string(),
            compare: CompareOp::Contains,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_string_contains() {
        let json = r#"{"field": "title", "content": "hobb"}"#;
        let p: Predicate = serde_json::from_str(json).unwrap();
        assert_eq!(p.kind, PredicateKind::String);
        assert_eq!(p.compare, CompareOp::Contains);
    }

    #[test]
    fn wire_names_match_the_query_format() {
        let json = r#"{"field": "age", "type": "number", "content": "30", "compare": "gte"}"#;
        let p: Predicate = serde_json::from_str(json).unwrap();
        assert_eq!(p.kind, PredicateKind::Number);
        assert_eq!(p.compare, CompareOp::Gte);

        let json = r#"{"type": "fulltext", "content": "red car"}"#;
        let p: Predicate = serde_json::from_str(json).unwrap();
        assert_eq!(p.kind, PredicateKind::FullText);

        // the legacy wire name for the field is accepted too
        let json = r#"{"key": "title", "content": "hobb"}"#;
        let p: Predicate = serde_json::from_str(json).unwrap();
        assert_eq!(p.field, "title");
    }
}
