//! Record instances: validated field values laid out by their [RecordType].

use std::{any::Any, fmt, sync::Arc};

use indexmap::IndexMap;

use crate::{errors::ValidationError, schema::RecordType, value::Value};

/// An instance of a [RecordType].
///
/// Every stored value satisfies its field descriptor: construction is
/// all-or-nothing and a failed [Record::set] leaves the previous value in place.
/// Values are stored in their descriptor's canonical form (see
/// [crate::primitive::Primitive::normalize]), so `3i32` and `3u32` in an `INT32`
/// field are the same value.
#[derive(Debug, Clone)]
pub struct Record {
    record_type: Arc<RecordType>,
    /// One value per field, in declaration order.
    values: Vec<Value>,
}

impl Record {
    /// Builds an instance from `(field name, value)` pairs.
    ///
    /// Fields not supplied take their declared default; a field with no default
    /// is a [ValidationError::MissingField].
    pub fn new<I, K, V>(record_type: &Arc<RecordType>, values: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        let mut slots: Vec<Option<Value>> = vec![None; record_type.len()];

        for (name, value) in values {
            let name = name.as_ref();
            let (index, field) = record_type
                .field_full(name)
                .ok_or_else(|| ValidationError::UnknownField(name.to_string()))?;

            if slots[index].is_some() {
                return Err(ValidationError::DuplicateField(name.to_string()));
            }

            slots[index] = Some(field.accept(value.into())?);
        }

        let values = record_type
            .fields()
            .zip(slots)
            .map(|(field, slot)| match slot {
                Some(value) => Ok(value),
                None => field
                    .default
                    .clone()
                    .ok_or_else(|| ValidationError::MissingField(field.name.clone())),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Record {
            record_type: Arc::clone(record_type),
            values,
        })
    }

    /// Builds an instance from field defaults alone.
    pub fn from_defaults(record_type: &Arc<RecordType>) -> Result<Self, ValidationError> {
        Record::new(record_type, std::iter::empty::<(&str, Value)>())
    }

    pub fn record_type(&self) -> &Arc<RecordType> {
        &self.record_type
    }

    pub fn get(&self, name: &str) -> Result<&Value, ValidationError> {
        self.record_type
            .index_of(name)
            .map(|index| &self.values[index])
            .ok_or_else(|| ValidationError::UnknownField(name.to_string()))
    }

    /// Replaces a field value after validating it. On error nothing changes.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<(), ValidationError> {
        let (index, field) = self
            .record_type
            .field_full(name)
            .ok_or_else(|| ValidationError::UnknownField(name.to_string()))?;

        self.values[index] = field.accept(value.into())?;

        Ok(())
    }

    /// `(name, value)` pairs in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.record_type
            .fields()
            .map(|field| field.name.as_str())
            .zip(self.values.iter())
    }

    /// Field values keyed by name, in declaration order.
    pub fn to_map(&self) -> IndexMap<String, Value> {
        self.fields()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect()
    }

    /// Structural equality: compatible schemas and equal values field by field.
    /// The record types' names and ancestry are not considered, and a NaN
    /// field equals NaN.
    pub fn equals(&self, other: &Record) -> bool {
        debug_assert_eq!(self.values.len(), self.record_type.len());

        (Arc::ptr_eq(&self.record_type, &other.record_type)
            || self.record_type.is_compatible(&other.record_type))
            && self
                .values
                .iter()
                .zip(&other.values)
                .all(|(a, b)| a.same_as(b))
    }

    /// Equality against an arbitrary value; anything that is not a [Record] is unequal.
    pub fn eq_any(&self, other: &dyn Any) -> bool {
        other
            .downcast_ref::<Record>()
            .is_some_and(|other| self.equals(other))
    }

    pub fn to_display_string(&self) -> String {
        self.to_string()
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

/// `(name=value, ...)` in declaration order. The type name is left out so that
/// equal records of a type and its subtype print the same.
impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, (name, value)) in self.fields().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{name}={value}")?;
        }
        f.write_str(")")
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::{field::Field, primitive::Kind};

    use super::*;

    fn point() -> Arc<RecordType> {
        RecordType::compile(
            "Point",
            &[Field::scalar("x", Kind::Int32), Field::scalar("y", Kind::Int32)],
        )
        .unwrap()
    }

    fn mixed() -> Arc<RecordType> {
        RecordType::builder("MixedStruct")
            .field(Field::scalar("bool_val", Kind::Bool))
            .field(Field::scalar("char_val", Kind::Char))
            .field(Field::scalar("int16_val", Kind::Int16))
            .field(Field::scalar("float_val", Kind::Float32))
            .field(Field::char_seq("string_val", 5))
            .field(Field::array("samples", Kind::Int8, 4))
            .build()
            .unwrap()
    }

    fn mixed_values() -> Vec<(&'static str, Value)> {
        vec![
            ("bool_val", Value::from(true)),
            ("char_val", Value::from('X')),
            ("int16_val", Value::from(-1234)),
            ("float_val", Value::from(3.14)),
            ("string_val", Value::from("Hello")),
            ("samples", Value::from([1, -2, 3, 127])),
        ]
    }

    #[test]
    fn test_point_scenario() {
        let ty = point();
        let mut p = Record::new(&ty, [("x", 3), ("y", 4)]).unwrap();
        assert_eq!(p.get("x"), Ok(&Value::I64(3)));
        assert_eq!(p.get("y"), Ok(&Value::I64(4)));

        assert_eq!(
            Record::new(&ty, [("x", 3)]).unwrap_err(),
            ValidationError::MissingField("y".to_string())
        );

        let err = p.set("x", "abc").unwrap_err();
        assert_eq!(err.field(), Some("x"));
        assert!(matches!(err.root_cause(), ValidationError::TypeMismatch { .. }));
        assert_eq!(p.get("x"), Ok(&Value::I64(3)));
    }

    #[test]
    fn test_new_keeps_canonical_values() {
        let ty = mixed();
        let record = Record::new(&ty, mixed_values()).unwrap();
        for (name, value) in mixed_values() {
            assert_eq!(record.get(name), Ok(&value));
        }
    }

    #[test]
    fn test_new_is_atomic() {
        let ty = mixed();
        let mut values = mixed_values();
        values[5].1 = Value::from([1, 2, 200, 4]);

        let err = Record::new(&ty, values).unwrap_err();
        assert_eq!(err.field(), Some("samples"));
        assert!(matches!(
            err,
            ValidationError::Field { ref source, .. }
                if matches!(**source, ValidationError::Element { index: 2, .. })
        ));
    }

    #[test]
    fn test_new_rejects_unknown_and_duplicate_fields() {
        let ty = point();
        assert_eq!(
            Record::new(&ty, [("x", 1), ("y", 2), ("z", 3)]).unwrap_err(),
            ValidationError::UnknownField("z".to_string())
        );
        assert_eq!(
            Record::new(&ty, [("x", 1), ("x", 2)]).unwrap_err(),
            ValidationError::DuplicateField("x".to_string())
        );
    }

    #[test]
    fn test_defaults() {
        let ty = RecordType::compile(
            "Config",
            &[
                Field::scalar("retries", Kind::UInt8).with_default(3u8),
                Field::scalar("verbose", Kind::Bool).with_default(false),
                Field::scalar("id", Kind::UInt32),
            ],
        )
        .unwrap();

        let record = Record::new(&ty, [("id", 9u32)]).unwrap();
        assert_eq!(record.get("retries"), Ok(&Value::U64(3)));
        assert_eq!(record.get("verbose"), Ok(&Value::Bool(false)));

        assert_eq!(
            Record::from_defaults(&ty).unwrap_err(),
            ValidationError::MissingField("id".to_string())
        );
    }

    #[test]
    fn test_set_validates_and_keeps_prior_value() {
        let ty = mixed();
        let mut record = Record::new(&ty, mixed_values()).unwrap();

        record.set("int16_val", 12345).unwrap();
        assert_eq!(record.get("int16_val"), Ok(&Value::I64(12345)));

        assert!(record.set("int16_val", 2i64.pow(15)).is_err());
        assert!(record.set("bool_val", 1).is_err());
        assert!(record.set("char_val", "AB").is_err());
        assert!(record.set("string_val", "Hi").is_err());
        assert!(record.set("samples", [1, 2, 3]).is_err());
        assert_eq!(
            record.set("nope", 1),
            Err(ValidationError::UnknownField("nope".to_string()))
        );

        let untouched = Record::new(&ty, mixed_values()).unwrap();
        record.set("int16_val", -1234).unwrap();
        assert_eq!(record, untouched);
    }

    #[test]
    fn test_get_unknown_field() {
        let p = Record::new(&point(), [("x", 1), ("y", 2)]).unwrap();
        assert_eq!(
            p.get("z"),
            Err(ValidationError::UnknownField("z".to_string()))
        );
    }

    #[test]
    fn test_equality_is_structural() {
        let base = point();
        let sub = base.extend("LabelledPoint", &[]).unwrap();

        let a = Record::new(&base, [("x", 1), ("y", 2)]).unwrap();
        let mut b = Record::new(&sub, [("y", 2), ("x", 1)]).unwrap();
        assert_eq!(a, b);
        assert_eq!(b, a);
        assert_eq!(a, a.clone());

        b.set("y", 3).unwrap();
        assert_ne!(a, b);
        assert_ne!(b, a);
    }

    #[test]
    fn test_equality_across_incompatible_schemas_is_false() {
        let a = Record::new(&point(), [("x", 1), ("y", 2)]).unwrap();
        let wide = RecordType::compile(
            "Wide",
            &[Field::scalar("x", Kind::Int64), Field::scalar("y", Kind::Int64)],
        )
        .unwrap();
        let b = Record::new(&wide, [("x", 1), ("y", 2)]).unwrap();

        assert!(!a.equals(&b));
        assert!(!a.eq_any(&"(x=1, y=2)"));
        assert!(!a.eq_any(&42));
        assert!(a.eq_any(&a.clone()));
    }

    #[test]
    fn test_display_follows_declaration_order() {
        let ty = point();
        let a = Record::new(&ty, [("y", 4), ("x", 3)]).unwrap();
        let b = Record::new(&ty, [("x", 3), ("y", 4)]).unwrap();
        assert_eq!(a.to_display_string(), "(x=3, y=4)");
        assert_eq!(a.to_string(), b.to_string());

        let c = Record::new(&ty, [("x", 3), ("y", 5)]).unwrap();
        assert_ne!(a.to_string(), c.to_string());
    }

    #[test]
    fn test_display_mixed() {
        let record = Record::new(&mixed(), mixed_values()).unwrap();
        assert_eq!(
            record.to_display_string(),
            "(bool_val=true, char_val='X', int16_val=-1234, float_val=3.14, \
             string_val=\"Hello\", samples=[1, -2, 3, 127])"
        );
    }

    #[test]
    fn test_display_ignores_type_name() {
        let base = point();
        let sub = base.extend("LabelledPoint", &[]).unwrap();

        let a = Record::new(&base, [("x", 1), ("y", 2)]).unwrap();
        let b = Record::new(&sub, [("x", 1), ("y", 2)]).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_display_string(), b.to_display_string());
    }

    #[test]
    fn test_equality_across_representations() {
        let ty = point();
        let signed = Record::new(&ty, [("x", 3i32), ("y", 4i32)]).unwrap();
        let unsigned = Record::new(&ty, [("x", 3u32), ("y", 4u32)]).unwrap();
        assert_eq!(signed, unsigned);
        assert_eq!(unsigned.get("x"), Ok(&Value::I64(3)));

        let d = RecordType::compile("D", &[Field::scalar("v", Kind::Float64)]).unwrap();
        let from_int = Record::new(&d, [("v", 3)]).unwrap();
        let from_float = Record::new(&d, [("v", 3.0)]).unwrap();
        assert_eq!(from_int, from_float);
        assert_eq!(from_int.to_string(), "(v=3.0)");

        let c = RecordType::compile("C", &[Field::scalar("c", Kind::Char)]).unwrap();
        let from_char = Record::new(&c, [("c", Value::from('A'))]).unwrap();
        let mut from_str = Record::new(&c, [("c", Value::from("A"))]).unwrap();
        assert_eq!(from_char, from_str);
        assert_eq!(from_str.to_string(), "(c='A')");

        from_str.set("c", "B").unwrap();
        assert_eq!(from_str.get("c"), Ok(&Value::Char('B')));
        assert_ne!(from_char, from_str);
    }

    #[test]
    fn test_nan_field_equals_itself() {
        let ty = mixed();
        let mut record = Record::new(&ty, mixed_values()).unwrap();
        record.set("float_val", f64::NAN).unwrap();

        assert!(record.equals(&record));
        assert_eq!(record, record.clone());
        assert_ne!(record, Record::new(&ty, mixed_values()).unwrap());
    }

    #[test]
    fn test_to_map() {
        let record = Record::new(&mixed(), mixed_values()).unwrap();
        let map = record.to_map();
        let keys: Vec<&str> = map.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec!["bool_val", "char_val", "int16_val", "float_val", "string_val", "samples"]
        );
        assert_eq!(map["int16_val"], Value::I64(-1234));
    }

    proptest! {
        #[test]
        fn prop_equality_symmetric(x1 in any::<i32>(), y1 in any::<i32>(), x2 in any::<i32>(), y2 in any::<i32>()) {
            let ty = point();
            let a = Record::new(&ty, [("x", x1), ("y", y1)]).unwrap();
            let b = Record::new(&ty, [("x", x2), ("y", y2)]).unwrap();
            prop_assert_eq!(a == b, b == a);
            prop_assert_eq!(a == b, x1 == x2 && y1 == y2);
            prop_assert_eq!(a.to_string() == b.to_string(), a == b);
        }

        #[test]
        fn prop_equality_ignores_representation(x in any::<i32>(), y in 0..=i32::MAX) {
            let ty = point();
            let a = Record::new(&ty, [("x", Value::from(x)), ("y", Value::from(y))]).unwrap();
            let b = Record::new(&ty, [("x", Value::from(i64::from(x))), ("y", Value::from(y as u32))])
                .unwrap();
            prop_assert!(a == b && b == a);
            prop_assert_eq!(a.to_string(), b.to_string());

            let d = RecordType::compile("D", &[Field::scalar("v", Kind::Float64)]).unwrap();
            let from_int = Record::new(&d, [("v", Value::from(x))]).unwrap();
            let from_float = Record::new(&d, [("v", Value::from(f64::from(x)))]).unwrap();
            prop_assert_eq!(&from_int, &from_float);
            prop_assert_eq!(from_int.to_string(), from_float.to_string());
        }

        #[test]
        fn prop_float_record_is_reflexive(v in any::<f64>()) {
            let d = RecordType::compile("D", &[Field::scalar("v", Kind::Float64)]).unwrap();
            let a = Record::new(&d, [("v", v)]).unwrap();
            prop_assert!(a == a.clone());
        }
    }
}
