use crate::{
    schema::meta::{MetaType, ScalarMeta},
    value::{ScalarValue, Value},
};

/// Metadata of the scalars every schema has.
pub(crate) fn builtin_scalars() -> [MetaType; 5] {
    [int(), float(), string(), boolean(), id()]
}

fn int() -> MetaType {
    ScalarMeta::new(arcstr::literal!("Int"))
        .description(arcstr::literal!(
            "The `Int` scalar type represents non-fractional signed whole numeric values. \
             Int can represent values between -(2^31) and 2^31 - 1."
        ))
        .validate_with(|v| v.as_int().is_some())
        .into_meta()
}

fn float() -> MetaType {
    ScalarMeta::new(arcstr::literal!("Float"))
        .description(arcstr::literal!(
            "The `Float` scalar type represents signed double-precision fractional values as \
             specified by [IEEE 754](https://en.wikipedia.org/wiki/IEEE_floating_point)."
        ))
        .validate_with(|v| v.as_scalar().and_then(ScalarValue::as_float).is_some())
        .serialize_with(|v| to_float(v.clone()))
        .parse_with(to_float)
        .into_meta()
}

fn string() -> MetaType {
    ScalarMeta::new(arcstr::literal!("String"))
        .description(arcstr::literal!(
            "The `String` scalar type represents textual data, represented as UTF-8 character \
             sequences. The String type is most often used by GraphQL to represent free-form \
             human-readable text."
        ))
        .serialize_with(|v| match v.as_scalar() {
            Some(ScalarValue::String(_)) | None => v.clone(),
            Some(s) => Value::scalar(s.to_string()),
        })
        .into_meta()
}

fn boolean() -> MetaType {
    ScalarMeta::new(arcstr::literal!("Boolean"))
        .description(arcstr::literal!(
            "The `Boolean` scalar type represents `true` or `false`."
        ))
        .validate_with(|v| v.as_bool().is_some())
        .into_meta()
}

fn id() -> MetaType {
    ScalarMeta::new(arcstr::literal!("ID"))
        .description(arcstr::literal!(
            "The `ID` scalar type represents a unique identifier, often used to refetch an \
             object or as key for a cache. The ID type appears in a JSON response as a String; \
             however, it is not intended to be human-readable."
        ))
        .validate_with(|v| matches!(v, Value::Scalar(ScalarValue::String(_) | ScalarValue::Int(_))))
        .serialize_with(|v| to_id(v.clone()))
        .parse_with(to_id)
        .into_meta()
}

fn to_float(v: Value) -> Value {
    match v {
        Value::Scalar(ScalarValue::Int(i)) => Value::scalar(f64::from(i)),
        v => v,
    }
}

fn to_id(v: Value) -> Value {
    match v {
        Value::Scalar(ScalarValue::Int(i)) => Value::scalar(i.to_string()),
        v => v,
    }
}
