//! Declaration of record fields, before they are compiled into a [crate::schema::RecordType].

use crate::{
    primitive::{Kind, Primitive},
    value::Value,
};

/// A single named field in a record declaration.
#[derive(Debug, Clone)]
pub struct Field {
    /// Name used to address the field on a record.
    pub name: String,
    /// What values the field holds.
    pub ty: FieldType,
    /// Value used when construction does not supply one.
    pub default: Option<Value>,
}

impl Field {
    pub fn scalar(name: impl Into<String>, primitive: impl Into<Primitive>) -> Self {
        Field {
            name: name.into(),
            ty: FieldType::Scalar(primitive.into()),
            default: None,
        }
    }

    /// Field typed by a registry expression such as `INT32`, `INT8[4]` or `CHAR_ARRAY(10)`.
    pub fn named(name: impl Into<String>, expr: impl Into<String>) -> Self {
        Field {
            name: name.into(),
            ty: FieldType::Named(expr.into()),
            default: None,
        }
    }

    pub fn array(name: impl Into<String>, kind: Kind, len: usize) -> Self {
        Field {
            name: name.into(),
            ty: FieldType::Array(ArraySpec { kind, len }),
            default: None,
        }
    }

    pub fn char_seq(name: impl Into<String>, len: usize) -> Self {
        Field::scalar(name, Primitive::char_seq(len))
    }

    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }
}

/// How a field's type is declared.
#[derive(Debug, Clone)]
pub enum FieldType {
    /// A primitive descriptor, possibly with custom accepted representations.
    Scalar(Primitive),
    /// A type expression resolved through the registry.
    Named(String),
    /// A fixed-length array of a registry kind.
    Array(ArraySpec),
}

/// Parameters for an array field.
#[derive(Debug, Clone, Copy)]
pub struct ArraySpec {
    /// Element kind. Character kinds are rejected at compile time.
    pub kind: Kind,
    /// Number of elements.
    pub len: usize,
}
