//! Field descriptors: a primitive, or a fixed-length array of one.

use std::fmt;

use crate::{
    errors::{ConfigError, ValidationError},
    primitive::Primitive,
    value::Value,
};

/// A fixed-length array of a non-character primitive.
///
/// Elements are primitives only; arrays do not nest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayDescriptor {
    element: Primitive,
    len: usize,
}

impl ArrayDescriptor {
    /// Fails for character kinds and for a zero length.
    pub fn new(element: Primitive, len: usize) -> Result<Self, ConfigError> {
        if element.kind().is_character() {
            return Err(ConfigError::CharArray);
        } else if len == 0 {
            return Err(ConfigError::ZeroLength);
        }

        Ok(ArrayDescriptor { element, len })
    }

    pub fn element(&self) -> &Primitive {
        &self.element
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn size_bits(&self) -> usize {
        self.element.size_bits() * self.len
    }

    pub fn validate(&self, value: &Value) -> Result<(), ValidationError> {
        let Some(items) = value.as_array() else {
            return Err(ValidationError::TypeMismatch {
                expected: self.to_string(),
                found: value.clone(),
            });
        };

        if items.len() != self.len {
            return Err(ValidationError::LengthMismatch {
                expected: self.to_string(),
                declared: self.len,
                actual: items.len(),
                found: value.clone(),
            });
        }

        for (index, item) in items.iter().enumerate() {
            self.element
                .validate(item)
                .map_err(|source| ValidationError::Element {
                    index,
                    source: Box::new(source),
                })?;
        }

        Ok(())
    }

    /// Normalizes each element of a validated array. See [`Primitive::normalize`].
    pub fn normalize(&self, value: Value) -> Value {
        match value {
            Value::Array(items) => Value::Array(
                items
                    .into_iter()
                    .map(|item| self.element.normalize(item))
                    .collect(),
            ),
            other => other,
        }
    }
}

impl fmt::Display for ArrayDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.element, self.len)
    }
}

/// What a record field is declared as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Descriptor {
    Primitive(Primitive),
    Array(ArrayDescriptor),
}

impl Descriptor {
    pub fn validate(&self, value: &Value) -> Result<(), ValidationError> {
        match self {
            Descriptor::Primitive(primitive) => primitive.validate(value),
            Descriptor::Array(array) => array.validate(value),
        }
    }

    pub fn normalize(&self, value: Value) -> Value {
        match self {
            Descriptor::Primitive(primitive) => primitive.normalize(value),
            Descriptor::Array(array) => array.normalize(value),
        }
    }

    pub fn size_bits(&self) -> usize {
        match self {
            Descriptor::Primitive(primitive) => primitive.size_bits(),
            Descriptor::Array(array) => array.size_bits(),
        }
    }
}

impl From<Primitive> for Descriptor {
    fn from(primitive: Primitive) -> Self {
        Descriptor::Primitive(primitive)
    }
}

impl From<ArrayDescriptor> for Descriptor {
    fn from(array: ArrayDescriptor) -> Self {
        Descriptor::Array(array)
    }
}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Descriptor::Primitive(primitive) => primitive.fmt(f),
            Descriptor::Array(array) => array.fmt(f),
        }
    }
}
