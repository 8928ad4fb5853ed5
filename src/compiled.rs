use crate::{
    descriptor::Descriptor,
    errors::{ConfigError, ValidationError},
    field::{Field, FieldType},
    primitive::Kind,
    registry,
    value::Value,
};

/// A field whose type has been resolved and whose default has been checked.
#[derive(Debug, Clone)]
pub struct CompiledField {
    pub name: String,
    pub descriptor: Descriptor,
    pub default: Option<Value>,
}

impl CompiledField {
    /// Validates `value` for this field, attributing any failure to the field name.
    pub fn validate(&self, value: &Value) -> Result<(), ValidationError> {
        self.descriptor
            .validate(value)
            .map_err(|err| err.in_field(&self.name))
    }

    /// Validates `value` and returns it in the descriptor's canonical form.
    pub fn accept(&self, value: Value) -> Result<Value, ValidationError> {
        self.validate(&value)?;
        Ok(self.descriptor.normalize(value))
    }
}

impl TryFrom<&Field> for CompiledField {
    type Error = ConfigError;

    fn try_from(value: &Field) -> Result<Self, Self::Error> {
        if !is_identifier(&value.name) {
            return Err(ConfigError::InvalidFieldName(value.name.clone()));
        }

        let descriptor = match &value.ty {
            FieldType::Scalar(primitive) => {
                if primitive.kind() == Kind::CharSeq && primitive.len() == Some(0) {
                    return Err(ConfigError::ZeroLength);
                }
                Descriptor::Primitive(primitive.clone())
            }
            FieldType::Named(expr) => registry::global().resolve(expr)?,
            FieldType::Array(spec) => registry::array_of(spec.kind, spec.len)?.into(),
        };

        let default = match &value.default {
            Some(default) => {
                descriptor
                    .validate(default)
                    .map_err(|source| ConfigError::InvalidDefault {
                        field: value.name.clone(),
                        source,
                    })?;
                Some(descriptor.normalize(default.clone()))
            }
            None => None,
        };

        Ok(CompiledField {
            name: value.name.clone(),
            descriptor,
            default,
        })
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {
            chars.all(|c| c.is_alphanumeric() || c == '_')
        }
        _ => false,
    }
}
