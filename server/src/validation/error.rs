use std::fmt;
use thiserror::Error;

/// A single field that failed schema validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    /// Dotted path to the offending value, `(root)` for the document itself
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Every violation found in one document, in discovery order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaViolations(Vec<FieldViolation>);

impl SchemaViolations {
    pub fn new(violations: Vec<FieldViolation>) -> Self {
        Self(violations)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldViolation> {
        self.0.iter()
    }

    /// Returns true if any violation was reported for `field`
    pub fn contains_field(&self, field: &str) -> bool {
        self.0.iter().any(|v| v.field == field)
    }
}

impl fmt::Display for SchemaViolations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, violation) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{violation}")?;
        }
        Ok(())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("unknown config type: {0}")]
    UnknownType(String),

    #[error("{0}")]
    Schema(SchemaViolations),

    #[error("failed to compile schema for {config_type}: {reason}")]
    SchemaCompile { config_type: String, reason: String },
}
