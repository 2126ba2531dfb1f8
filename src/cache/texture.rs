//! Texture cache: PNG files named by the digest of their encoded bytes.
//!
//! Source textures arrive in whatever pixel layout the capture produced.
//! Everything is normalized to straight RGBA8 before encoding, so the
//! digest depends only on the visible pixels, not on the source format.

use std::collections::HashMap;
use std::path::PathBuf;

use image::codecs::png::PngEncoder;
use image::{ColorType, ImageEncoder};
use tracing::{debug, trace};

use crate::error::{AssetError, AssetResult};
use crate::ident::{ContentDigest, ObjectId};
use crate::scene::{PixelFormat, TextureAsset};

use super::{ensure_dir, write_asset};

/// Writes each distinct texture once and hands out its digest.
#[derive(Debug)]
pub struct TextureCache {
    dir: PathBuf,
    dumped: HashMap<ObjectId, ContentDigest>,
    // Readback buffers pooled per image size, reused across dumps.
    scratch: HashMap<(u32, u32), Vec<u8>>,
}

impl TextureCache {
    pub fn new(dir: impl Into<PathBuf>) -> AssetResult<Self> {
        let dir = dir.into();
        ensure_dir(&dir)?;
        Ok(Self {
            dir,
            dumped: HashMap::new(),
            scratch: HashMap::new(),
        })
    }

    /// Encode `texture` as PNG, write it if its content is new, and return
    /// the digest that names it.
    pub fn dump(&mut self, id: ObjectId, texture: &TextureAsset) -> AssetResult<ContentDigest> {
        if let Some(known) = self.dumped.get(&id) {
            return Ok(known.clone());
        }

        let expected = texture.expected_len();
        if texture.data.len() != expected {
            return Err(AssetError::PixelData {
                expected,
                actual: texture.data.len(),
            });
        }

        let buffer = self
            .scratch
            .entry((texture.width, texture.height))
            .or_default();
        normalize_rgba(texture, buffer);
        let png = encode_png(texture.width, texture.height, buffer)?;

        let digest = ContentDigest::from_bytes(&png);
        self.dumped.insert(id, digest.clone());

        let meta = self.dir.join(format!("{digest}.png.meta"));
        if meta.exists() {
            trace!(digest = %digest, "texture already on disk");
            return Ok(digest);
        }

        write_asset(&self.dir.join(format!("{digest}.png")), &png)?;
        write_asset(&meta, texture_importer_meta(&digest))?;
        debug!(texture = %texture.name, digest = %digest, "dumped texture");
        Ok(digest)
    }
}

fn normalize_rgba(texture: &TextureAsset, out: &mut Vec<u8>) {
    out.clear();
    out.reserve(texture.width as usize * texture.height as usize * 4);
    match texture.format {
        PixelFormat::Rgba32 => out.extend_from_slice(&texture.data),
        PixelFormat::Argb32 => {
            for px in texture.data.chunks_exact(4) {
                out.extend_from_slice(&[px[1], px[2], px[3], px[0]]);
            }
        }
        PixelFormat::Rgb24 => {
            for px in texture.data.chunks_exact(3) {
                out.extend_from_slice(&[px[0], px[1], px[2], 255]);
            }
        }
        PixelFormat::Alpha8 => {
            for &alpha in &texture.data {
                out.extend_from_slice(&[0, 0, 0, alpha]);
            }
        }
    }
}

fn encode_png(width: u32, height: u32, rgba: &[u8]) -> AssetResult<Vec<u8>> {
    let mut bytes = Vec::new();
    PngEncoder::new(&mut bytes)
        .write_image(rgba, width, height, ColorType::Rgba8)
        .map_err(|err| AssetError::Encode {
            message: err.to_string(),
        })?;
    Ok(bytes)
}

fn texture_importer_meta(digest: &ContentDigest) -> String {
    format!(
        concat!(
            "fileFormatVersion: 2\n",
            "guid: {digest}\n",
            "TextureImporter:\n",
            "  serializedVersion: 7",
        ),
        digest = digest
    )
}
