//! Import record types from C `typedef struct { ... } Name;` declarations.
//!
//! Only flat structs of fixed-width primitives are understood:
//!
//! ```c
//! typedef struct {
//!     uint16_t id;      // sensor id
//!     char     name[8];
//!     int8_t   samples[4];
//!     bool     active;
//! } Reading;
//! ```
//!
//! `char x[N]` becomes a `CHAR_ARRAY(N)` field; any other `T x[N]` becomes an
//! array of `T`. Nested structs, pointers and multi-declarator lines are rejected.

use std::sync::{Arc, LazyLock};

use regex::Regex;

use crate::{
    errors::ConfigError,
    field::Field,
    primitive::Kind,
    registry,
    schema::RecordType,
};

static COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)/\*.*?\*/|//[^\n]*").expect("comment pattern is valid"));

static TYPEDEF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"typedef\s+struct\s*(?:\w+\s*)?\{([^}]*)\}\s*(\w+)\s*;")
        .expect("typedef pattern is valid")
});

static MEMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\w+)\s+(\w+)\s*(?:\[\s*(\d+)\s*\])?$").expect("member pattern is valid")
});

/// Parses every `typedef struct` in `src` into a record type, in source order.
pub fn parse_header(src: &str) -> Result<Vec<Arc<RecordType>>, ConfigError> {
    let src = strip_comments(src);
    let mut record_types = Vec::new();

    for caps in TYPEDEF.captures_iter(&src) {
        let (Some(body), Some(name)) = (caps.get(1), caps.get(2)) else {
            continue;
        };

        if body.as_str().contains('{') {
            return Err(ConfigError::Header {
                line: line_at(&src, body.start()),
                reason: "nested structs are not supported".to_string(),
            });
        }

        let fields = parse_members(&src, body.start(), body.as_str())?;
        record_types.push(RecordType::compile(name.as_str(), &fields)?);
    }

    log::debug!("imported {} record types from header", record_types.len());

    Ok(record_types)
}

/// Replaces comments with blank text, keeping newlines so line numbers survive.
fn strip_comments(src: &str) -> String {
    COMMENT
        .replace_all(src, |caps: &regex::Captures| {
            caps[0].chars().filter(|c| *c == '\n').collect::<String>()
        })
        .into_owned()
}

fn line_at(src: &str, offset: usize) -> usize {
    src[..offset].matches('\n').count() + 1
}

fn parse_members(src: &str, body_start: usize, body: &str) -> Result<Vec<Field>, ConfigError> {
    let mut fields = Vec::new();
    let mut offset = body_start;
    let mut pieces = body.split(';').peekable();

    while let Some(piece) = pieces.next() {
        let member = piece.trim();
        let line = line_at(src, offset + (piece.len() - piece.trim_start().len()));
        offset += piece.len() + 1;

        if member.is_empty() {
            continue;
        }

        if pieces.peek().is_none() {
            return Err(ConfigError::Header {
                line,
                reason: format!("expected `;` after `{member}`"),
            });
        }

        fields.push(parse_member(member, line)?);
    }

    Ok(fields)
}

fn parse_member(member: &str, line: usize) -> Result<Field, ConfigError> {
    let normalized = member.split_whitespace().collect::<Vec<_>>().join(" ");

    let Some(caps) = MEMBER.captures(&normalized) else {
        return Err(ConfigError::Header {
            line,
            reason: format!("cannot parse member `{normalized}`"),
        });
    };

    let c_type = &caps[1];
    let name = &caps[2];

    let kind = registry::global()
        .kind_named(c_type)
        .ok_or_else(|| ConfigError::UnknownKind(c_type.to_string()))?;

    let Some(len) = caps.get(3) else {
        return Ok(Field::scalar(name, kind));
    };

    let len: usize = len.as_str().parse().map_err(|_| ConfigError::Header {
        line,
        reason: format!("array length `{}` is too large", len.as_str()),
    })?;

    if kind == Kind::Char {
        Ok(Field::char_seq(name, len))
    } else {
        Ok(Field::array(name, kind, len))
    }
}
