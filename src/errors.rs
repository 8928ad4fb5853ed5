//! Error types for schema declaration, value validation and schema comparison.

use crate::value::Value;

/// Errors produced while declaring a record type or building a descriptor.
///
/// These surface at declaration time and are never recovered from automatically.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// No primitive kind is registered under this name.
    #[error("unknown primitive kind `{0}`")]
    UnknownKind(String),
    /// Arrays of characters are not allowed; use `CHAR_ARRAY` instead.
    #[error("character kinds cannot be used as array elements, use CHAR_ARRAY(n) instead")]
    CharArray,
    /// Array (or character sequence) length is zero.
    #[error("length must be at least 1")]
    ZeroLength,
    /// Two fields share a name.
    #[error("field `{0}` is declared more than once")]
    DuplicateField(String),
    /// Field name is empty or not an identifier.
    #[error("invalid field name `{0}`")]
    InvalidFieldName(String),
    /// A declared default does not satisfy its own field descriptor.
    #[error("default for field `{field}` is invalid: {source}")]
    InvalidDefault {
        field: String,
        source: ValidationError,
    },
    /// The header importer could not make sense of a line.
    #[error("header line {line}: {reason}")]
    Header { line: usize, reason: String },
}

/// Errors produced when a value does not satisfy a descriptor, or when a
/// record is constructed or mutated with bad field names.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// The value's representation is not accepted by the descriptor.
    #[error("expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: Value },
    /// Integral value outside the kind's range.
    #[error("{found} is out of range for {expected} ({min}..={max})")]
    OutOfRange {
        expected: String,
        min: i128,
        max: i128,
        found: Value,
    },
    /// Floating-point value too large for the target width.
    #[error("{found} is not representable as {expected}")]
    NotRepresentable { expected: String, found: Value },
    /// A `CHAR` field was given more or fewer than one character.
    #[error("expected a single character for {expected}, found {found}")]
    NotSingleChar { expected: String, found: Value },
    /// Sequence length does not match the declared length.
    #[error("{found} has length {actual}, {expected} requires {declared}")]
    LengthMismatch {
        expected: String,
        declared: usize,
        actual: usize,
        found: Value,
    },
    /// An array element failed validation. Only the first failing element is reported.
    #[error("element {index}: {source}")]
    Element {
        index: usize,
        source: Box<ValidationError>,
    },
    /// A field value failed validation.
    #[error("field `{field}`: {source}")]
    Field {
        field: String,
        source: Box<ValidationError>,
    },
    #[error("unknown field `{0}`")]
    UnknownField(String),
    #[error("missing required field `{0}`")]
    MissingField(String),
    #[error("field `{0}` supplied more than once")]
    DuplicateField(String),
}

impl ValidationError {
    pub(crate) fn in_field(self, field: &str) -> Self {
        ValidationError::Field {
            field: field.to_string(),
            source: Box::new(self),
        }
    }

    /// Name of the offending field, when the error is attributable to one.
    pub fn field(&self) -> Option<&str> {
        match self {
            ValidationError::Field { field, .. }
            | ValidationError::UnknownField(field)
            | ValidationError::MissingField(field)
            | ValidationError::DuplicateField(field) => Some(field),
            _ => None,
        }
    }

    /// The innermost error, with field and element wrappers peeled off.
    pub fn root_cause(&self) -> &ValidationError {
        match self {
            ValidationError::Field { source, .. } | ValidationError::Element { source, .. } => {
                source.root_cause()
            }
            other => other,
        }
    }
}

/// The first structural difference found between two record schemas.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaMismatchError {
    #[error("field count differs: {left} vs {right}")]
    FieldCount { left: usize, right: usize },
    #[error("field {index} is named `{left}` vs `{right}`")]
    FieldName {
        index: usize,
        left: String,
        right: String,
    },
    #[error("field `{field}` is {left} vs {right}")]
    Descriptor {
        field: String,
        left: String,
        right: String,
    },
}
