//! Serde-friendly record type description.
//!
//! These types describe the *shape* of a record. They are intended to be
//! loaded from JSON (or any serde format) shipped with an application and then
//! compiled into a [`RecordType`].
//!
//! ```json
//! {
//!   "name": "Reading",
//!   "fields": [
//!     { "name": "id",      "kind": { "type": "Scalar", "kind": "UINT16" } },
//!     { "name": "label",   "kind": { "type": "CharArray", "len": 8 } },
//!     { "name": "samples", "kind": { "type": "Array", "kind": "INT8", "len": 4 } },
//!     { "name": "active",  "kind": { "type": "Scalar", "kind": "BOOL" }, "default": false }
//!   ]
//! }
//! ```

use std::sync::Arc;

use serde::{Deserialize, Serialize, Serializer};

use crate::{
    descriptor::Descriptor,
    errors::ConfigError,
    field::Field,
    primitive::Kind,
    record::Record,
    registry,
    schema::RecordType,
    value::Value,
};

/// Top-level record description: a name and its fields in order.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct RecordDef {
    pub name: String,
    pub fields: Vec<FieldDef>,
}

/// Description of a single field.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct FieldDef {
    /// Field name; becomes the key used with [`Record::get`].
    pub name: String,
    /// What the field holds.
    pub kind: FieldKindDef,
    /// Value used when construction does not supply one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

/// Kind of field in the description.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum FieldKindDef {
    /// Single primitive, by registry name (`INT32`, `uint8_t`, ...).
    Scalar { kind: String },
    /// Fixed-length array of a primitive.
    Array { kind: String, len: usize },
    /// Fixed-length character sequence.
    CharArray { len: usize },
}

impl RecordDef {
    pub fn compile(self) -> Result<Arc<RecordType>, ConfigError> {
        let fields = self
            .fields
            .into_iter()
            .map(Field::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        RecordType::compile(self.name, &fields)
    }
}

impl TryFrom<FieldDef> for Field {
    type Error = ConfigError;

    fn try_from(value: FieldDef) -> Result<Self, Self::Error> {
        let field = match value.kind {
            FieldKindDef::Scalar { kind } => Field::named(value.name, kind),
            FieldKindDef::Array { kind, len } => {
                let kind = registry::global()
                    .kind_named(&kind)
                    .ok_or(ConfigError::UnknownKind(kind))?;
                Field::array(value.name, kind, len)
            }
            FieldKindDef::CharArray { len } => Field::char_seq(value.name, len),
        };

        Ok(match value.default {
            Some(default) => field.with_default(default),
            None => field,
        })
    }
}

impl From<&RecordType> for RecordDef {
    fn from(value: &RecordType) -> Self {
        let fields = value
            .fields()
            .map(|field| FieldDef {
                name: field.name.clone(),
                kind: match &field.descriptor {
                    Descriptor::Primitive(p) => match (p.kind(), p.len()) {
                        (Kind::CharSeq, Some(len)) => FieldKindDef::CharArray { len },
                        (kind, _) => FieldKindDef::Scalar {
                            kind: kind.name().to_string(),
                        },
                    },
                    Descriptor::Array(a) => FieldKindDef::Array {
                        kind: a.element().kind().name().to_string(),
                        len: a.len(),
                    },
                },
                default: field.default.clone(),
            })
            .collect();

        RecordDef {
            name: value.name().to_string(),
            fields,
        }
    }
}

/// Records serialize as a map of field name to value, in declaration order.
impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.fields())
    }
}
