//! Annotation wire format
//!
//! An annotation is stored as the pair `[kind, {fields}]`. Only the kind's
//! exported fields are written, and Point values nest as `["P", [x, y]]`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::domain::{
    Annotation, AnnotationContext, AnnotationKind, FieldError, FieldValue, POINT_TAG, Point,
};

/// One stored annotation: the kind tag and its exported fields
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AnnotationRecord(pub String, pub Map<String, Value>);

impl AnnotationRecord {
    pub fn kind(&self) -> &str {
        &self.0
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.1
    }
}

impl TryFrom<Value> for AnnotationRecord {
    type Error = DecodeError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let Value::Array(mut pair) = value else {
            return Err(DecodeError::Malformed("record is not an array".into()));
        };
        if pair.len() != 2 {
            return Err(DecodeError::Malformed(format!(
                "record has {} elements, expected 2",
                pair.len()
            )));
        }
        let fields = match pair.pop() {
            Some(Value::Object(fields)) => fields,
            _ => return Err(DecodeError::Malformed("fields are not an object".into())),
        };
        let kind = match pair.pop() {
            Some(Value::String(kind)) => kind,
            _ => return Err(DecodeError::Malformed("kind is not a string".into())),
        };
        Ok(Self(kind, fields))
    }
}

/// Why a stored annotation could not be rebuilt
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DecodeError {
    #[error("unknown annotation kind: {0}")]
    UnknownKind(String),
    #[error("{kind} annotation is missing field `{field}`")]
    MissingField { kind: AnnotationKind, field: String },
    #[error("{kind} annotation has an invalid value for `{field}`")]
    InvalidField { kind: AnnotationKind, field: String },
    #[error("malformed annotation record: {0}")]
    Malformed(String),
}

// ============================================================================
// Encoding
// ============================================================================

/// Serialize `annotation`, restricted to its kind's exported fields
pub fn encode(annotation: &Annotation) -> AnnotationRecord {
    let kind = annotation.kind();
    let mut fields = Map::new();
    for &name in kind.export_properties() {
        if let Some(value) = annotation.field(name) {
            fields.insert(name.to_string(), field_to_json(value));
        }
    }
    AnnotationRecord(kind.tag().to_string(), fields)
}

/// Serialize a sequence in order
pub fn encode_all<'a>(annotations: impl IntoIterator<Item = &'a Annotation>) -> Vec<AnnotationRecord> {
    annotations.into_iter().map(encode).collect()
}

fn field_to_json(value: FieldValue) -> Value {
    match value {
        FieldValue::Point(p) => json!([POINT_TAG, [p.x, p.y]]),
        FieldValue::Bool(b) => Value::Bool(b),
        FieldValue::Number(n) => json!(n),
        FieldValue::Text(s) => Value::String(s),
    }
}

// ============================================================================
// Decoding
// ============================================================================

/// Rebuild an annotation from its stored form
///
/// Unknown kinds, missing exported fields and mistyped values are errors.
/// Field names the kind does not have are skipped.
pub fn decode(record: &AnnotationRecord, ctx: &AnnotationContext) -> Result<Annotation, DecodeError> {
    let kind = AnnotationKind::from_tag(record.kind())
        .ok_or_else(|| DecodeError::UnknownKind(record.kind().to_string()))?;

    if let Some(field) = kind
        .export_properties()
        .iter()
        .find(|name| !record.fields().contains_key(**name))
    {
        return Err(DecodeError::MissingField {
            kind,
            field: field.to_string(),
        });
    }

    let mut annotation = kind.create(ctx, Point::default());
    for (name, value) in record.fields() {
        let invalid = || DecodeError::InvalidField {
            kind,
            field: name.clone(),
        };
        let value = field_from_json(value).ok_or_else(invalid)?;
        match annotation.assign(name, value) {
            Ok(()) => {}
            Err(FieldError::WrongType) => return Err(invalid()),
            Err(FieldError::Unknown) => {
                log::debug!("Ignoring unknown field `{name}` on {kind} annotation");
            }
        }
    }
    Ok(annotation)
}

/// Decode a raw JSON value, checking the record shape first
pub fn decode_value(value: Value, ctx: &AnnotationContext) -> Result<Annotation, DecodeError> {
    decode(&AnnotationRecord::try_from(value)?, ctx)
}

/// Point-tagged pairs become Points, everything else is taken as-is
fn field_from_json(value: &Value) -> Option<FieldValue> {
    match value {
        Value::Array(items) if items.first().and_then(Value::as_str) == Some(POINT_TAG) => {
            serde_json::from_value::<Point>(value.clone())
                .ok()
                .map(FieldValue::Point)
        }
        Value::Bool(b) => Some(FieldValue::Bool(*b)),
        Value::Number(n) => n.as_f64().map(FieldValue::Number),
        Value::String(s) => Some(FieldValue::Text(s.clone())),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use image::RgbaImage;

    use super::*;

    fn ctx() -> AnnotationContext {
        AnnotationContext::new(Rc::new(RgbaImage::new(20, 20)))
    }

    fn sample(kind: AnnotationKind) -> Annotation {
        let ctx = ctx();
        let mut a = kind.create(&ctx, Point::new(3.0, 4.0));
        match &mut a {
            Annotation::Text(t) => t.text = "hello".into(),
            other => other.drag_to(Point::new(15.5, 9.0), kind == AnnotationKind::Circle),
        }
        a
    }

    fn exported(a: &Annotation) -> Vec<Option<FieldValue>> {
        a.kind()
            .export_properties()
            .iter()
            .map(|name| a.field(name))
            .collect()
    }

    #[test]
    fn test_round_trip_every_kind() {
        for kind in AnnotationKind::ALL {
            let a = sample(kind);
            let decoded = decode(&encode(&a), &ctx()).unwrap();
            assert_eq!(decoded.kind(), kind);
            assert_eq!(exported(&decoded), exported(&a), "{kind}");
        }
    }

    #[test]
    fn test_stored_shape() {
        let record = encode(&sample(AnnotationKind::Line));
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            json!(["Line", {"start": ["P", [3.0, 4.0]], "last": ["P", [15.5, 9.0]]}])
        );
    }

    #[test]
    fn test_text_exports_start_and_text() {
        let record = encode(&sample(AnnotationKind::Text));
        assert_eq!(record.kind(), "Text");
        assert_eq!(record.fields()["text"], json!("hello"));
        assert!(!record.fields().contains_key("font_size"));
    }

    #[test]
    fn test_circle_persists_snap_flag_but_line_does_not() {
        let circle = encode(&sample(AnnotationKind::Circle));
        assert_eq!(circle.fields()["lastSnap"], json!(true));

        let mut a = AnnotationKind::Line.create(&ctx(), Point::new(0.0, 0.0));
        a.drag_to(Point::new(10.0, 3.0), true);
        let record = encode(&a);
        assert!(!record.fields().contains_key("lastSnap"));
        assert_eq!(record.fields()["last"], json!(["P", [10.0, 0.0]]));
    }

    #[test]
    fn test_decode_stored_json() {
        let value = json!(["Box", {"start": ["P", [1, 2]], "last": ["P", [5, 6]]}]);
        let a = decode_value(value, &ctx()).unwrap();
        assert_eq!(a.kind(), AnnotationKind::Box);
        assert_eq!(a.start(), Point::new(1.0, 2.0));
        assert_eq!(a.last(), Some(Point::new(5.0, 6.0)));
    }

    #[test]
    fn test_unknown_kind_is_an_error() {
        let record = AnnotationRecord("Bogus".into(), Map::new());
        assert_eq!(
            decode(&record, &ctx()),
            Err(DecodeError::UnknownKind("Bogus".into()))
        );
    }

    #[test]
    fn test_missing_exported_field() {
        let value = json!(["Arrow", {"start": ["P", [1, 2]]}]);
        assert_eq!(
            decode_value(value, &ctx()),
            Err(DecodeError::MissingField {
                kind: AnnotationKind::Arrow,
                field: "last".into()
            })
        );
    }

    #[test]
    fn test_mistyped_field() {
        let value = json!(["Text", {"start": ["P", [1, 2]], "text": 42}]);
        assert!(matches!(
            decode_value(value, &ctx()),
            Err(DecodeError::InvalidField { field, .. }) if field == "text"
        ));

        let value = json!(["Line", {"start": ["P", [1]], "last": ["P", [5, 6]]}]);
        assert!(matches!(
            decode_value(value, &ctx()),
            Err(DecodeError::InvalidField { field, .. }) if field == "start"
        ));
    }

    #[test]
    fn test_unknown_and_unexported_fields() {
        let value = json!(["Line", {
            "start": ["P", [0, 0]],
            "last": ["P", [4, 4]],
            "lastSnap": true,
            "colour": "blue"
        }]);
        let a = decode_value(value, &ctx()).unwrap();
        assert_eq!(a.field("lastSnap"), Some(FieldValue::Bool(true)));
    }

    #[test]
    fn test_malformed_records() {
        for value in [json!("Line"), json!(["Line"]), json!([1, {}]), json!(["Line", []])] {
            assert!(matches!(
                decode_value(value, &ctx()),
                Err(DecodeError::Malformed(_))
            ));
        }
    }

    #[test]
    fn test_blur_rebuilds_pixelated_copy() {
        let a = decode(&encode(&sample(AnnotationKind::Blur)), &ctx()).unwrap();
        let Annotation::Blur(blur) = a else {
            panic!("expected blur");
        };
        assert_eq!(blur.pixelated().dimensions(), (20, 20));
    }
}
