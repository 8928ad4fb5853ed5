//! # structcraft
//!
//! Declarative record types over a closed set of fixed-width primitive kinds.
//!
//! Declare a record as an ordered list of named fields, each a primitive
//! (`INT8`..`UINT64`, `FLOAT`, `DOUBLE`, `BOOL`, `CHAR`, `CHAR_ARRAY(n)`) or a
//! fixed-length array of one. Every value is checked against its field when a
//! record is built and again on each assignment. Records compare structurally:
//! two records are equal when their schemas line up field by field and the
//! values match, whatever the record types are called.
//!
//! ## Example
//!
//! ```
//! use structcraft::field::Field;
//! use structcraft::primitive::Kind;
//! use structcraft::record::Record;
//! use structcraft::schema::RecordType;
//! use structcraft::value::Value;
//!
//! let point = RecordType::compile(
//!     "Point",
//!     &[Field::scalar("x", Kind::Int32), Field::scalar("y", Kind::Int32)],
//! )
//! .unwrap();
//!
//! let mut p = Record::new(&point, [("x", 3), ("y", 4)]).unwrap();
//! assert!(p.set("x", "abc").is_err());
//! assert_eq!(p.get("x"), Ok(&Value::I64(3)));
//! assert_eq!(p.to_string(), "(x=3, y=4)");
//! ```

pub mod compiled;
pub mod descriptor;
pub mod errors;
pub mod field;
pub mod header;
pub mod primitive;
pub mod record;
pub mod registry;
pub mod schema;
#[cfg(feature = "serde")]
pub mod serde;
pub mod value;
