//! Asset payloads extracted from a live scene.
//!
//! These are plain data captured by a host bridge: geometry with its index
//! buffers, material parameter blocks and raw texture pixels. The caches in
//! [`crate::cache`] turn them into content-addressed files on disk.

use std::collections::BTreeMap;

use glam::{Vec2, Vec3, Vec4};

use crate::ident::ObjectId;
use crate::scene::value::Color;

/// Extracted geometry.
///
/// `normals` and `uv0` are either empty or match `positions` in length.
/// Each submesh is a triangle list of indices into the vertex arrays.
#[derive(Debug, Clone, Default)]
pub struct MeshAsset {
    pub name: String,
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub uv0: Vec<Vec2>,
    pub submeshes: Vec<Vec<u32>>,
}

impl MeshAsset {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn has_uv(&self) -> bool {
        !self.uv0.is_empty()
    }
}

/// A texture slot of a material: an optional texture reference plus the
/// UV transform applied when sampling it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureBinding {
    pub texture: Option<ObjectId>,
    pub scale: Vec2,
    pub offset: Vec2,
}

impl Default for TextureBinding {
    fn default() -> Self {
        Self {
            texture: None,
            scale: Vec2::ONE,
            offset: Vec2::ZERO,
        }
    }
}

impl TextureBinding {
    pub fn new(texture: Option<ObjectId>) -> Self {
        Self {
            texture,
            ..Self::default()
        }
    }
}

/// Extracted material state.
///
/// Parameter maps are keyed by shader property name. Sorted maps keep the
/// capture independent of bridge enumeration order; the serializer applies
/// its own fixed property order anyway.
#[derive(Debug, Clone, Default)]
pub struct MaterialAsset {
    pub name: String,
    pub shader: String,
    pub shader_keywords: Vec<String>,
    pub lightmap_flags: i32,
    pub enable_instancing: bool,
    pub double_sided_gi: bool,
    pub render_queue: i32,
    pub floats: BTreeMap<String, f32>,
    pub colors: BTreeMap<String, Color>,
    pub vectors: BTreeMap<String, Vec4>,
    pub textures: BTreeMap<String, TextureBinding>,
}

impl MaterialAsset {
    pub fn new(name: impl Into<String>, shader: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            shader: shader.into(),
            ..Self::default()
        }
    }
}

/// Raw pixel layout of a captured texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// 4 bytes per pixel, r g b a order.
    Rgba32,
    /// 4 bytes per pixel, a r g b order.
    Argb32,
    /// 3 bytes per pixel, no alpha.
    Rgb24,
    /// 1 byte per pixel, alpha only.
    Alpha8,
}

impl PixelFormat {
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Rgba32 | PixelFormat::Argb32 => 4,
            PixelFormat::Rgb24 => 3,
            PixelFormat::Alpha8 => 1,
        }
    }
}

/// Extracted texture pixels, row-major from the top-left corner.
#[derive(Debug, Clone)]
pub struct TextureAsset {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    pub data: Vec<u8>,
}

impl TextureAsset {
    pub fn new(
        name: impl Into<String>,
        width: u32,
        height: u32,
        format: PixelFormat,
        data: Vec<u8>,
    ) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            format,
            data,
        }
    }

    /// The byte length `data` must have for the declared dimensions.
    pub fn expected_len(&self) -> usize {
        self.width as usize * self.height as usize * self.format.bytes_per_pixel()
    }
}
