//! Captured field values.
//!
//! A host bridge reads each serializable field of a live behavior into a
//! [`FieldValue`]; the converter pipeline in [`crate::dump`] turns these into
//! document fragments. Object references stay symbolic ([`ObjectId`]) until
//! conversion time, because resolving one may pull more records into the
//! document.

use glam::{Quat, Vec2, Vec3, Vec4};

use crate::ident::ObjectId;

/// An RGBA color with float channels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

/// Curve extrapolation mode as the engine reports it.
///
/// The engine's enumeration is wider than the document format's; unknown raw
/// values are preserved here and collapsed at conversion time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WrapMode {
    #[default]
    Default,
    Once,
    Loop,
    PingPong,
    ClampForever,
    /// An engine value outside the known set.
    Raw(i32),
}

impl WrapMode {
    /// Map to the document's extrapolation encoding: loop and ping-pong keep
    /// their own codes, everything else (including legacy raw values) clamps.
    pub fn extrapolation_code(self) -> i32 {
        match self {
            WrapMode::Loop => 3,
            WrapMode::PingPong => 4,
            _ => 2,
        }
    }
}

/// One key of a piecewise interpolation curve.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CurveKey {
    pub time: f32,
    pub value: f32,
    pub in_tangent: f32,
    pub out_tangent: f32,
    pub tangent_mode: i32,
    pub weighted_mode: i32,
    pub in_weight: f32,
    pub out_weight: f32,
}

impl CurveKey {
    /// A key with zero tangents and weights.
    pub fn new(time: f32, value: f32) -> Self {
        Self {
            time,
            value,
            ..Self::default()
        }
    }
}

/// A piecewise interpolation curve with pre/post extrapolation modes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AnimCurve {
    pub keys: Vec<CurveKey>,
    pub pre_wrap: WrapMode,
    pub post_wrap: WrapMode,
}

impl AnimCurve {
    pub fn new(keys: Vec<CurveKey>) -> Self {
        Self {
            keys,
            pre_wrap: WrapMode::ClampForever,
            post_wrap: WrapMode::ClampForever,
        }
    }
}

/// A captured field value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// A null reference or a value the bridge could not read.
    Null,
    Bool(bool),
    Int(i64),
    Float(f32),
    Str(String),
    Vec2(Vec2),
    Vec3(Vec3),
    Vec4(Vec4),
    Quat(Quat),
    Color(Color),
    Curve(AnimCurve),
    /// A reference to another live object; `None` is a null reference.
    ObjectRef(Option<ObjectId>),
    List(Vec<FieldValue>),
    /// A plain structure, fields in declaration order.
    Struct(Vec<(String, FieldValue)>),
}

/// One captured field of a live behavior.
#[derive(Debug, Clone, PartialEq)]
pub struct LiveField {
    pub name: String,
    /// The host's serializability classification for the declared field.
    pub serializable: bool,
    pub value: FieldValue,
}

impl LiveField {
    pub fn new(name: impl Into<String>, value: FieldValue) -> Self {
        Self {
            name: name.into(),
            serializable: true,
            value,
        }
    }

    pub fn non_serializable(mut self) -> Self {
        self.serializable = false;
        self
    }
}
