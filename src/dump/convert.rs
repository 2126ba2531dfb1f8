//! Live field values to their serialized JSON forms.

use serde_json::{Map, Value, json};

use super::SceneDumper;
use crate::cache::json_f32;
use crate::error::UnearthResult;
use crate::scene::{AnimCurve, CurveKey, FieldValue, Scene};

impl SceneDumper {
    /// Converts one field value for emission into a behaviour record.
    ///
    /// `None` means the field has nothing to emit (a null payload or a
    /// dangling object reference) and the caller drops the whole line.
    /// Inside lists and structs the same cases degrade to JSON null
    /// instead, so element positions stay aligned.
    ///
    /// Object references pull the target component into the document
    /// before the reference is written; a target that cannot be emitted
    /// becomes a null reference rather than a dangling id.
    pub(super) fn field_json(
        &mut self,
        scene: &Scene,
        value: &FieldValue,
    ) -> UnearthResult<Option<Value>> {
        let json = match value {
            FieldValue::Null | FieldValue::ObjectRef(None) => return Ok(None),
            FieldValue::Bool(flag) => Value::from(i32::from(*flag)),
            FieldValue::Int(number) => Value::from(*number),
            FieldValue::Float(number) => json_f32(*number),
            FieldValue::Str(text) => Value::from(text.as_str()),
            FieldValue::Vec2(v) => json!({"x": json_f32(v.x), "y": json_f32(v.y)}),
            FieldValue::Vec3(v) => {
                json!({"x": json_f32(v.x), "y": json_f32(v.y), "z": json_f32(v.z)})
            }
            FieldValue::Vec4(v) => json!({
                "x": json_f32(v.x),
                "y": json_f32(v.y),
                "z": json_f32(v.z),
                "w": json_f32(v.w),
            }),
            FieldValue::Quat(q) => json!({
                "x": json_f32(q.x),
                "y": json_f32(q.y),
                "z": json_f32(q.z),
                "w": json_f32(q.w),
            }),
            FieldValue::Color(c) => json!({
                "r": json_f32(c.r),
                "g": json_f32(c.g),
                "b": json_f32(c.b),
                "a": json_f32(c.a),
            }),
            FieldValue::Curve(curve) => curve_json(curve),
            FieldValue::ObjectRef(Some(id)) => {
                if self.try_add_component(scene, *id)? {
                    json!({"fileID": id.get()})
                } else {
                    json!({"fileID": 0})
                }
            }
            FieldValue::List(items) => {
                let mut array = Vec::with_capacity(items.len());
                for item in items {
                    array.push(self.field_json(scene, item)?.unwrap_or(Value::Null));
                }
                Value::Array(array)
            }
            FieldValue::Struct(fields) => {
                let mut map = Map::new();
                for (name, item) in fields {
                    let slot = self.field_json(scene, item)?.unwrap_or(Value::Null);
                    map.insert(name.clone(), slot);
                }
                Value::Object(map)
            }
        };
        Ok(Some(json))
    }
}

pub(crate) fn curve_json(curve: &AnimCurve) -> Value {
    let keys: Vec<Value> = curve.keys.iter().map(key_json).collect();
    json!({
        "m_Curve": keys,
        "m_PreInfinity": curve.pre_wrap.extrapolation_code(),
        "m_PostInfinity": curve.post_wrap.extrapolation_code(),
        "m_RotationOrder": 4,
    })
}

fn key_json(key: &CurveKey) -> Value {
    json!({
        "serializedVersion": 3,
        "time": json_f32(key.time),
        "value": json_f32(key.value),
        "inSlope": json_f32(key.in_tangent),
        "outSlope": json_f32(key.out_tangent),
        "tangentMode": key.tangent_mode,
        "weightedMode": key.weighted_mode,
        "inWeight": json_f32(key.in_weight),
        "outWeight": json_f32(key.out_weight),
    })
}
