//! Record types: an ordered, named set of compiled fields shared by all instances.

use std::sync::Arc;

use indexmap::IndexMap;

use crate::{
    compiled::CompiledField,
    errors::{ConfigError, SchemaMismatchError},
    field::Field,
};

/// A compiled record type. Use [RecordType::compile] (or [RecordType::builder])
/// to declare one, then [crate::record::Record::new] to build instances.
///
/// Record types are immutable once compiled and are shared through [Arc].
#[derive(Debug, Clone)]
pub struct RecordType {
    name: String,
    parent: Option<String>,
    fields: IndexMap<String, CompiledField>,
}

impl RecordType {
    /// Compiles `fields`, in order, into a record type. Fails on the first invalid field.
    pub fn compile(name: impl Into<String>, fields: &[Field]) -> Result<Arc<Self>, ConfigError> {
        let mut record_type = RecordType {
            name: name.into(),
            parent: None,
            fields: IndexMap::with_capacity(fields.len()),
        };
        record_type.push_fields(fields)?;

        log::debug!(
            "compiled record type `{}` with {} fields",
            record_type.name,
            record_type.fields.len()
        );

        Ok(Arc::new(record_type))
    }

    /// Starts a fluent declaration. Nothing is checked until [RecordTypeBuilder::build].
    pub fn builder(name: impl Into<String>) -> RecordTypeBuilder {
        RecordTypeBuilder {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Declares a subtype: this type's fields followed by `fields`.
    ///
    /// Redeclaring an inherited field is an error.
    pub fn extend(&self, name: impl Into<String>, fields: &[Field]) -> Result<Arc<Self>, ConfigError> {
        let mut record_type = RecordType {
            name: name.into(),
            parent: Some(self.name.clone()),
            fields: self.fields.clone(),
        };
        record_type.push_fields(fields)?;

        log::debug!(
            "compiled record type `{}` extending `{}` with {} fields",
            record_type.name,
            self.name,
            fields.len()
        );

        Ok(Arc::new(record_type))
    }

    fn push_fields(&mut self, fields: &[Field]) -> Result<(), ConfigError> {
        for field in fields {
            let compiled = CompiledField::try_from(field)?;
            if self.fields.contains_key(&compiled.name) {
                return Err(ConfigError::DuplicateField(compiled.name));
            }
            self.fields.insert(compiled.name.clone(), compiled);
        }

        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the type this one was extended from, if any.
    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> impl ExactSizeIterator<Item = &CompiledField> {
        self.fields.values()
    }

    pub fn field(&self, name: &str) -> Option<&CompiledField> {
        self.fields.get(name)
    }

    /// Declaration index of a field.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.get_index_of(name)
    }

    /// A field together with its declaration index.
    pub fn field_full(&self, name: &str) -> Option<(usize, &CompiledField)> {
        self.fields
            .get_full(name)
            .map(|(index, _, field)| (index, field))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Sum of the informational field sizes.
    pub fn size_bits(&self) -> usize {
        self.fields().map(|f| f.descriptor.size_bits()).sum()
    }

    /// Same field names, in the same order, with equal descriptors.
    /// Type names and ancestry are not considered.
    pub fn is_compatible(&self, other: &RecordType) -> bool {
        self.check_compatible(other).is_ok()
    }

    /// Like [RecordType::is_compatible], but reports the first difference.
    pub fn check_compatible(&self, other: &RecordType) -> Result<(), SchemaMismatchError> {
        if self.len() != other.len() {
            return Err(SchemaMismatchError::FieldCount {
                left: self.len(),
                right: other.len(),
            });
        }

        for (index, (left, right)) in self.fields().zip(other.fields()).enumerate() {
            if left.name != right.name {
                return Err(SchemaMismatchError::FieldName {
                    index,
                    left: left.name.clone(),
                    right: right.name.clone(),
                });
            }
            if left.descriptor != right.descriptor {
                return Err(SchemaMismatchError::Descriptor {
                    field: left.name.clone(),
                    left: left.descriptor.to_string(),
                    right: right.descriptor.to_string(),
                });
            }
        }

        Ok(())
    }
}

/// Collects field declarations for [RecordType::compile].
#[derive(Debug, Clone)]
pub struct RecordTypeBuilder {
    name: String,
    fields: Vec<Field>,
}

impl RecordTypeBuilder {
    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    pub fn build(self) -> Result<Arc<RecordType>, ConfigError> {
        RecordType::compile(self.name, &self.fields)
    }
}
