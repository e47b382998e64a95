//! Declarative field rules for inbound book requests.
//!
//! Each request type lists its fields once, with an accessor and the rules
//! that apply; [`validate`] walks that table and reports every violation.

use super::error::{FieldViolation, ValidationErrors};
use super::models::{CreateBookRequest, UpdateBookRequest};

pub const TITLE_MAX_CHARS: usize = 100;
pub const AUTHOR_MAX_CHARS: usize = 100;

/// A single constraint on a field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Text must be non-empty; numbers must be present.
    Required,
    /// Text must not exceed this many characters.
    MaxLength(usize),
    /// Numbers must be zero or greater.
    NonNegative,
}

impl Rule {
    fn code(self) -> &'static str {
        match self {
            Rule::Required => "required",
            Rule::MaxLength(_) => "max_length",
            Rule::NonNegative => "non_negative",
        }
    }

    fn check(self, value: &FieldValue<'_>) -> Option<String> {
        match (self, value) {
            (Rule::Required, FieldValue::Text(text)) if text.is_empty() => {
                Some("is required".to_string())
            }
            (Rule::Required, FieldValue::Integer(None)) => Some("is required".to_string()),
            (Rule::MaxLength(max), FieldValue::Text(text)) if text.chars().count() > max => {
                Some(format!("must be at most {max} characters"))
            }
            (Rule::NonNegative, FieldValue::Integer(Some(number))) if *number < 0 => {
                Some("must not be negative".to_string())
            }
            _ => None,
        }
    }
}

/// Borrowed view of a field, as seen by the rules.
#[derive(Debug, Clone, Copy)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Integer(Option<i64>),
}

/// One row of a rule table.
pub struct FieldRule<T> {
    pub field: &'static str,
    pub value: fn(&T) -> FieldValue<'_>,
    pub rules: &'static [Rule],
}

/// Request types that carry a rule table.
pub trait Validate: Sized + 'static {
    const RULES: &'static [FieldRule<Self>];
}

impl Validate for CreateBookRequest {
    const RULES: &'static [FieldRule<Self>] = &[
        FieldRule {
            field: "title",
            value: |request| FieldValue::Text(&request.title),
            rules: &[Rule::Required, Rule::MaxLength(TITLE_MAX_CHARS)],
        },
        FieldRule {
            field: "author",
            value: |request| FieldValue::Text(&request.author),
            rules: &[Rule::Required, Rule::MaxLength(AUTHOR_MAX_CHARS)],
        },
        FieldRule {
            field: "quantity",
            value: |request| FieldValue::Integer(request.quantity),
            rules: &[Rule::Required, Rule::NonNegative],
        },
    ];
}

impl Validate for UpdateBookRequest {
    const RULES: &'static [FieldRule<Self>] = &[
        FieldRule {
            field: "id",
            value: |request| FieldValue::Text(&request.id),
            rules: &[Rule::Required],
        },
        FieldRule {
            field: "title",
            value: |request| FieldValue::Text(&request.title),
            rules: &[Rule::Required, Rule::MaxLength(TITLE_MAX_CHARS)],
        },
        FieldRule {
            field: "author",
            value: |request| FieldValue::Text(&request.author),
            rules: &[Rule::Required, Rule::MaxLength(AUTHOR_MAX_CHARS)],
        },
        FieldRule {
            field: "quantity",
            value: |request| FieldValue::Integer(request.quantity),
            rules: &[Rule::Required, Rule::NonNegative],
        },
    ];
}

/// Evaluate `T`'s rule table against `input`, collecting every violation.
///
/// A field that fails `Required` is not checked any further.
pub fn validate<T: Validate>(input: &T) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();

    for field_rule in T::RULES {
        let value = (field_rule.value)(input);
        for &rule in field_rule.rules {
            if let Some(message) = rule.check(&value) {
                errors.push(FieldViolation {
                    field: field_rule.field,
                    rule: rule.code(),
                    message,
                });
                if rule == Rule::Required {
                    break;
                }
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
