//! Primitive kinds and the descriptors that validate values against them.

use std::fmt;

use crate::{
    errors::ValidationError,
    value::{SourceRepr, Value},
};

/// The closed set of primitive kinds a record field can be declared with.
///
/// Discriminants index [`Kind::ALL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Bool = 0,
    /// A single character.
    Char = 1,
    /// A fixed-length character sequence. The length lives on the [`Primitive`].
    CharSeq = 2,
    Int8 = 3,
    UInt8 = 4,
    Int16 = 5,
    UInt16 = 6,
    Int32 = 7,
    UInt32 = 8,
    Int64 = 9,
    UInt64 = 10,
    Float32 = 11,
    Float64 = 12,
}

impl Kind {
    pub const ALL: [Kind; 13] = [
        Kind::Bool,
        Kind::Char,
        Kind::CharSeq,
        Kind::Int8,
        Kind::UInt8,
        Kind::Int16,
        Kind::UInt16,
        Kind::Int32,
        Kind::UInt32,
        Kind::Int64,
        Kind::UInt64,
        Kind::Float32,
        Kind::Float64,
    ];

    /// Canonical registry name.
    pub fn name(self) -> &'static str {
        match self {
            Kind::Bool => "BOOL",
            Kind::Char => "CHAR",
            Kind::CharSeq => "CHAR_ARRAY",
            Kind::Int8 => "INT8",
            Kind::UInt8 => "UINT8",
            Kind::Int16 => "INT16",
            Kind::UInt16 => "UINT16",
            Kind::Int32 => "INT32",
            Kind::UInt32 => "UINT32",
            Kind::Int64 => "INT64",
            Kind::UInt64 => "UINT64",
            Kind::Float32 => "FLOAT",
            Kind::Float64 => "DOUBLE",
        }
    }

    /// Size of one element in bits. Informational only.
    pub fn size_bits(self) -> usize {
        match self {
            Kind::Bool | Kind::Char | Kind::CharSeq | Kind::Int8 | Kind::UInt8 => 8,
            Kind::Int16 | Kind::UInt16 => 16,
            Kind::Int32 | Kind::UInt32 | Kind::Float32 => 32,
            Kind::Int64 | Kind::UInt64 | Kind::Float64 => 64,
        }
    }

    pub fn is_character(self) -> bool {
        matches!(self, Kind::Char | Kind::CharSeq)
    }

    /// Inclusive range for integer kinds, `None` otherwise.
    pub fn int_range(self) -> Option<(i128, i128)> {
        let range = match self {
            Kind::Int8 => (i8::MIN as i128, i8::MAX as i128),
            Kind::UInt8 => (0, u8::MAX as i128),
            Kind::Int16 => (i16::MIN as i128, i16::MAX as i128),
            Kind::UInt16 => (0, u16::MAX as i128),
            Kind::Int32 => (i32::MIN as i128, i32::MAX as i128),
            Kind::UInt32 => (0, u32::MAX as i128),
            Kind::Int64 => (i64::MIN as i128, i64::MAX as i128),
            Kind::UInt64 => (0, u64::MAX as i128),
            _ => return None,
        };

        Some(range)
    }

    /// Representations accepted when a descriptor is not configured otherwise.
    pub fn default_accepts(self) -> Accepts {
        match self {
            Kind::Bool => Accepts::from(SourceRepr::Bool),
            Kind::Char => Accepts::from([SourceRepr::Char, SourceRepr::Str]),
            Kind::CharSeq => Accepts::from(SourceRepr::Str),
            Kind::Float32 | Kind::Float64 => {
                Accepts::from([SourceRepr::Float, SourceRepr::Signed, SourceRepr::Unsigned])
            }
            _ => Accepts::from([SourceRepr::Signed, SourceRepr::Unsigned]),
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The set of source representations a descriptor accepts.
///
/// Build from a single [`SourceRepr`] or from any collection of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accepts(Vec<SourceRepr>);

impl Accepts {
    pub fn contains(&self, repr: SourceRepr) -> bool {
        self.0.contains(&repr)
    }

    pub fn iter(&self) -> impl Iterator<Item = SourceRepr> + '_ {
        self.0.iter().copied()
    }
}

impl From<SourceRepr> for Accepts {
    fn from(repr: SourceRepr) -> Self {
        Accepts(vec![repr])
    }
}

impl From<Vec<SourceRepr>> for Accepts {
    fn from(mut reprs: Vec<SourceRepr>) -> Self {
        let mut seen = Vec::with_capacity(reprs.len());
        reprs.retain(|r| {
            if seen.contains(r) {
                false
            } else {
                seen.push(*r);
                true
            }
        });
        Accepts(reprs)
    }
}

impl<const N: usize> From<[SourceRepr; N]> for Accepts {
    fn from(reprs: [SourceRepr; N]) -> Self {
        Accepts::from(reprs.to_vec())
    }
}

impl From<&[SourceRepr]> for Accepts {
    fn from(reprs: &[SourceRepr]) -> Self {
        Accepts::from(reprs.to_vec())
    }
}

/// Validation descriptor for one primitive kind.
///
/// Equality compares the kind and, for [`Kind::CharSeq`], the length. The
/// accepted representations are configuration and do not take part.
#[derive(Debug, Clone)]
pub struct Primitive {
    kind: Kind,
    len: Option<usize>,
    accepts: Accepts,
}

impl PartialEq for Primitive {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.len == other.len
    }
}

impl Eq for Primitive {}

impl Primitive {
    /// Descriptor for `kind` with its default accepted representations.
    ///
    /// A [`Kind::CharSeq`] built this way has no fixed length; use
    /// [`Primitive::char_seq`] to pin one.
    pub fn new(kind: Kind) -> Self {
        Primitive {
            kind,
            len: None,
            accepts: kind.default_accepts(),
        }
    }

    /// Fixed-length character sequence (`CHAR_ARRAY(len)`).
    pub fn char_seq(len: usize) -> Self {
        Primitive {
            len: Some(len),
            ..Primitive::new(Kind::CharSeq)
        }
    }

    /// Replaces the accepted source representations.
    pub fn accepting(mut self, accepts: impl Into<Accepts>) -> Self {
        self.accepts = accepts.into();
        self
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// Fixed length of a character sequence, if any.
    pub fn len(&self) -> Option<usize> {
        self.len
    }

    pub fn accepts(&self) -> &Accepts {
        &self.accepts
    }

    pub fn size_bits(&self) -> usize {
        self.kind.size_bits() * self.len.unwrap_or(1)
    }

    fn mismatch(&self, value: &Value) -> ValidationError {
        ValidationError::TypeMismatch {
            expected: self.to_string(),
            found: value.clone(),
        }
    }

    /// Checks `value` against this descriptor.
    pub fn validate(&self, value: &Value) -> Result<(), ValidationError> {
        if !self.accepts.contains(value.repr()) {
            log::trace!("{self} rejects {:?} representation", value.repr());
            return Err(self.mismatch(value));
        }

        match self.kind {
            Kind::Bool => match value {
                Value::Bool(_) => Ok(()),
                _ => Err(self.mismatch(value)),
            },
            Kind::Char => self.validate_char(value),
            Kind::CharSeq => self.validate_char_seq(value),
            Kind::Float32 | Kind::Float64 => self.validate_float(value),
            _ => self.validate_int(value),
        }
    }

    fn validate_int(&self, value: &Value) -> Result<(), ValidationError> {
        let Some((min, max)) = self.kind.int_range() else {
            return Err(self.mismatch(value));
        };

        let Some(n) = integral(value) else {
            return Err(self.mismatch(value));
        };

        if n < min || n > max {
            log::trace!("{value} out of range for {self}");
            return Err(ValidationError::OutOfRange {
                expected: self.to_string(),
                min,
                max,
                found: value.clone(),
            });
        }

        Ok(())
    }

    fn validate_float(&self, value: &Value) -> Result<(), ValidationError> {
        let Some(f) = value.as_f64() else {
            return Err(self.mismatch(value));
        };

        if self.kind == Kind::Float32 && f.is_finite() && f.abs() > f32::MAX as f64 {
            return Err(ValidationError::NotRepresentable {
                expected: self.to_string(),
                found: value.clone(),
            });
        }

        Ok(())
    }

    fn validate_char(&self, value: &Value) -> Result<(), ValidationError> {
        match value {
            Value::Char(_) => Ok(()),
            Value::Str(s) if s.chars().count() == 1 => Ok(()),
            Value::Str(_) => Err(ValidationError::NotSingleChar {
                expected: self.to_string(),
                found: value.clone(),
            }),
            _ => Err(self.mismatch(value)),
        }
    }

    fn validate_char_seq(&self, value: &Value) -> Result<(), ValidationError> {
        let Some(s) = value.as_str() else {
            return Err(self.mismatch(value));
        };

        match self.len {
            Some(declared) => {
                let actual = s.chars().count();
                if actual != declared {
                    return Err(ValidationError::LengthMismatch {
                        expected: self.to_string(),
                        declared,
                        actual,
                        found: value.clone(),
                    });
                }
                Ok(())
            }
            None => Ok(()),
        }
    }

    /// Rewrites an already validated value into this kind's canonical form.
    ///
    /// Signed kinds store [`Value::I64`], unsigned kinds [`Value::U64`], float
    /// kinds [`Value::F64`] and `CHAR` stores [`Value::Char`]. Values that do not
    /// validate are returned unchanged.
    pub fn normalize(&self, value: Value) -> Value {
        match self.kind {
            Kind::Char => {
                let single = value.as_str().and_then(|s| {
                    let mut chars = s.chars();
                    chars.next().filter(|_| chars.next().is_none())
                });
                single.map_or(value, Value::Char)
            }
            Kind::Float32 | Kind::Float64 => value.as_f64().map_or(value, Value::F64),
            kind => match (kind.int_range(), integral(&value)) {
                (Some((min, _)), Some(n)) if min < 0 => {
                    i64::try_from(n).map_or(value, Value::I64)
                }
                (Some(_), Some(n)) => u64::try_from(n).map_or(value, Value::U64),
                _ => value,
            },
        }
    }
}

/// Integral reading of a value for integer kinds: `Bool` as 0/1, `Char` as its code point.
fn integral(value: &Value) -> Option<i128> {
    match *value {
        Value::I64(v) => Some(v.into()),
        Value::U64(v) => Some(v.into()),
        Value::Char(c) => Some(u32::from(c).into()),
        _ => value.as_bool().map(i128::from),
    }
}

impl From<Kind> for Primitive {
    fn from(kind: Kind) -> Self {
        Primitive::new(kind)
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.len {
            Some(len) => write!(f, "{}({len})", self.kind),
            None => write!(f, "{}", self.kind),
        }
    }
}
