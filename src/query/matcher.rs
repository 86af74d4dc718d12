use regex::Regex;
use serde_json::Value;

use crate::analysis::normalizer::normalize;
use crate::core::error::Result;
use crate::core::types::{Record, SEARCH_TEXT_FIELD};
use crate::query::predicate::{CompareOp, Predicate, PredicateKind};

/// A predicate with its content pre-processed for matching: string content
/// normalized, numeric content parsed, full-text content tokenized into
/// boundary-anchored patterns. Compiled once per query, evaluated per record.
pub struct CompiledPredicate {
    field: String,
    check: PredicateCheck,
}

enum PredicateCheck {
    Text {
        content: String,
        compare: CompareOp,
    },
    Numeric {
        value: f64,
        compare: CompareOp,
    },
    FullText {
        patterns: Vec<Regex>,
    },
}

/// Compile an ordered predicate list. Full-text content is normalized, then
/// split on whitespace; every non-empty token becomes one pattern that must
/// match the stored search text.
pub fn compile(predicates: &[Predicate]) -> Result<Vec<CompiledPredicate>> {
    let mut compiled = Vec::with_capacity(predicates.len());
    for predicate in predicates {
        let check = match predicate.kind {
            PredicateKind::String => PredicateCheck::Text {
                content: normalize(&predicate.content),
                compare: predicate.compare,
            },
            PredicateKind::Number | PredicateKind::Date => PredicateCheck::Numeric {
                value: parse_int_prefix(&predicate.content),
                compare: predicate.compare,
            },
            PredicateKind::FullText => {
                let normalized = normalize(&predicate.content);
                let mut patterns = Vec::new();
                for token in normalized.split_whitespace() {
                    patterns.push(token_pattern(token)?);
                }
                PredicateCheck::FullText { patterns }
            }
        };
        compiled.push(CompiledPredicate {
            field: predicate.field.clone(),
            check,
        });
    }
    Ok(compiled)
}

/// AND across the list, short-circuiting on the first failure.
pub fn matches(record: &Record, predicates: &[CompiledPredicate]) -> bool {
    predicates.iter().all(|p| p.matches(record))
}

impl CompiledPredicate {
    pub fn matches(&self, record: &Record) -> bool {
        match &self.check {
            PredicateCheck::FullText { patterns } => {
                let text = record
                    .get(SEARCH_TEXT_FIELD)
                    .and_then(Value::as_str)
                    .unwrap_or("");
                patterns.iter().all(|re| re.is_match(text))
            }
            PredicateCheck::Text { content, compare } => {
                let Some(value) = present(record, &self.field) else {
                    return false;
                };
                let candidate = normalize(&stringify(value));
                match compare {
                    CompareOp::Equals => candidate == *content,
                    CompareOp::Different => candidate != *content,
                    _ => candidate.contains(content.as_str()),
                }
            }
            PredicateCheck::Numeric { value, compare } => {
                let Some(field_value) = present(record, &self.field) else {
                    return false;
                };
                let lhs = parse_int_prefix(&stringify(field_value));
                // Operators are negative-form checks: NaN fails every
                // primitive comparison, so a non-numeric side passes all of
                // them except Equals.
                match compare {
                    CompareOp::Different => !(lhs == *value),
                    CompareOp::Gte => !(lhs < *value),
                    CompareOp::Lte => !(lhs > *value),
                    CompareOp::Lt => !(lhs >= *value),
                    CompareOp::Gt => !(lhs <= *value),
                    // Contains degrades to equality for numeric kinds
                    CompareOp::Equals | CompareOp::Contains => lhs == *value,
                }
            }
        }
    }
}

fn present<'a>(record: &'a Record, field: &str) -> Option<&'a Value> {
    match record.get(field) {
        None | Some(Value::Null) => None,
        Some(value) => Some(value),
    }
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// parseInt-style integer prefix: leading whitespace, optional sign, then
/// decimal digits. Anything else yields the NaN sentinel.
fn parse_int_prefix(input: &str) -> f64 {
    let trimmed = input.trim_start();
    let (sign, rest) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1.0, rest),
        None => (1.0, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    match digits.parse::<f64>() {
        Ok(n) => sign * n,
        Err(_) => f64::NAN,
    }
}

/// Token boundary: start/end of text, whitespace, or light punctuation.
/// The closing parenthesis only terminates a token and the opening one only
/// starts it.
fn token_pattern(token: &str) -> Result<Regex> {
    let pattern = format!(
        "(\\s|^|[-.,;:_'\"(]){}(\\s|$|[-.,;:_'\")])",
        regex::escape(token)
    );
    Ok(Regex::new(&pattern)?)
}
