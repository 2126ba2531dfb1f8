//! Content-addressed asset caches.
//!
//! Meshes, materials, and textures carried by a captured scene are written
//! into per-kind directories, named by the digest of their canonical
//! content. Two conversions of the same asset therefore land on the same
//! file name, and an existing sidecar `.meta` file short-circuits the write
//! entirely. Nothing is ever overwritten in place; repeated runs against
//! the same output tree only add files.
//!
//! Each cache also memoizes per-run by transient object id, so a scene that
//! shares one mesh across a hundred objects digests it once.

mod material;
mod mesh;
mod obj;
mod texture;

pub use material::MaterialCache;
pub use mesh::{MeshCache, MeshRef};
pub use obj::{MeshPlacement, ObjWriter};
pub use texture::TextureCache;

use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::error::{AssetError, AssetResult};

pub(crate) fn ensure_dir(path: &Path) -> AssetResult<()> {
    fs::create_dir_all(path).map_err(|source| AssetError::Io {
        path: path.display().to_string(),
        source,
    })
}

pub(crate) fn write_asset(path: &Path, bytes: impl AsRef<[u8]>) -> AssetResult<()> {
    fs::write(path, bytes).map_err(|source| AssetError::Io {
        path: path.display().to_string(),
        source,
    })
}

/// Binary floats widen to `f64` on the way into JSON; going through the
/// shortest decimal form first keeps `0.1f32` serializing as `0.1` instead
/// of its 17-digit double expansion.
pub(crate) fn json_f32(value: f32) -> Value {
    format!("{value}")
        .parse::<f64>()
        .map_or(Value::Null, Value::from)
}
