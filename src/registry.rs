//! Process-wide registry of primitive kinds.
//!
//! The registry is built once, on first use, and is read-only afterwards.
//! Array descriptors are produced on demand and owned by the caller.

use std::{collections::HashMap, sync::LazyLock};

use crate::{
    descriptor::{ArrayDescriptor, Descriptor},
    errors::ConfigError,
    primitive::{Kind, Primitive},
};

static REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::builtin);

/// Alternative spellings resolved to a canonical kind.
const ALIASES: &[(&str, Kind)] = &[
    ("U_INT8", Kind::UInt8),
    ("U_INT16", Kind::UInt16),
    ("U_INT32", Kind::UInt32),
    ("U_INT64", Kind::UInt64),
    ("FLOAT32", Kind::Float32),
    ("FLOAT64", Kind::Float64),
    ("bool", Kind::Bool),
    ("char", Kind::Char),
    ("int8_t", Kind::Int8),
    ("uint8_t", Kind::UInt8),
    ("int16_t", Kind::Int16),
    ("uint16_t", Kind::UInt16),
    ("int32_t", Kind::Int32),
    ("uint32_t", Kind::UInt32),
    ("int64_t", Kind::Int64),
    ("uint64_t", Kind::UInt64),
    ("float", Kind::Float32),
    ("double", Kind::Float64),
];

/// One descriptor per [`Kind`], addressable by name.
#[derive(Debug)]
pub struct Registry {
    descriptors: Vec<Primitive>,
    names: HashMap<&'static str, Kind>,
}

/// The process-wide registry.
pub fn global() -> &'static Registry {
    &REGISTRY
}

/// Builds an array descriptor from the global registry. See [`Registry::array_of`].
pub fn array_of(kind: Kind, len: usize) -> Result<ArrayDescriptor, ConfigError> {
    global().array_of(kind, len)
}

impl Registry {
    fn builtin() -> Self {
        let descriptors: Vec<Primitive> = Kind::ALL.into_iter().map(Primitive::new).collect();

        let mut names: HashMap<&'static str, Kind> = Kind::ALL
            .into_iter()
            .map(|kind| (kind.name(), kind))
            .collect();
        names.extend(ALIASES.iter().copied());

        log::debug!(
            "primitive registry initialised with {} kinds, {} names",
            descriptors.len(),
            names.len()
        );

        Registry { descriptors, names }
    }

    /// The descriptor for `kind`.
    pub fn get(&self, kind: Kind) -> &Primitive {
        &self.descriptors[kind as usize]
    }

    /// Looks up a kind by canonical name or alias.
    pub fn kind_named(&self, name: &str) -> Option<Kind> {
        self.names.get(name).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Primitive> {
        self.descriptors.iter()
    }

    /// Produces an array-of-`kind` descriptor with `len` elements.
    ///
    /// Character kinds are rejected: fixed-length text is `CHAR_ARRAY(n)`.
    pub fn array_of(&self, kind: Kind, len: usize) -> Result<ArrayDescriptor, ConfigError> {
        ArrayDescriptor::new(self.get(kind).clone(), len)
    }

    /// Resolves a type expression into a descriptor.
    ///
    /// Accepts a kind name (`INT32`, `uint8_t`), a character sequence
    /// (`CHAR_ARRAY(10)`) or an array (`INT8[4]`), i.e. the forms descriptors
    /// display as.
    pub fn resolve(&self, expr: &str) -> Result<Descriptor, ConfigError> {
        let expr = expr.trim();

        if let Some((name, rest)) = expr.split_once('[') {
            let len = parse_len(rest.strip_suffix(']'), expr)?;
            let kind = self.kind_or_err(name.trim())?;
            return Ok(self.array_of(kind, len)?.into());
        }

        if let Some((name, rest)) = expr.split_once('(') {
            let kind = self.kind_or_err(name.trim())?;
            if kind != Kind::CharSeq {
                return Err(ConfigError::UnknownKind(expr.to_string()));
            }
            let len = parse_len(rest.strip_suffix(')'), expr)?;
            if len == 0 {
                return Err(ConfigError::ZeroLength);
            }
            return Ok(Primitive::char_seq(len).into());
        }

        let kind = self.kind_or_err(expr)?;
        Ok(self.get(kind).clone().into())
    }

    fn kind_or_err(&self, name: &str) -> Result<Kind, ConfigError> {
        self.kind_named(name)
            .ok_or_else(|| ConfigError::UnknownKind(name.to_string()))
    }
}

fn parse_len(inner: Option<&str>, expr: &str) -> Result<usize, ConfigError> {
    inner
        .and_then(|n| n.trim().parse().ok())
        .ok_or_else(|| ConfigError::UnknownKind(expr.to_string()))
}
