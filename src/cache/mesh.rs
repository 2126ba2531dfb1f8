//! Mesh cache: OBJ files named by canonical content digest.

use std::collections::HashMap;
use std::path::PathBuf;

use glam::{Vec2, Vec3};
use tracing::{debug, trace};

use crate::error::AssetResult;
use crate::ident::{ContentDigest, ObjectId};
use crate::scene::MeshAsset;

use super::obj::ObjWriter;
use super::{ensure_dir, write_asset};

const MESH_FILE_ID: i32 = 4300002;
const MESH_REF_KIND: i32 = 3;

/// Durable reference to a dumped mesh, ready for document records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeshRef {
    pub file_id: i32,
    pub digest: ContentDigest,
    pub kind: i32,
}

impl MeshRef {
    /// Flow-style mapping as document records embed it.
    pub fn flow_ref(&self) -> String {
        format!(
            "{{fileID: {}, guid: {}, type: {}}}",
            self.file_id, self.digest, self.kind
        )
    }
}

/// Writes each distinct mesh once and hands out stable references.
#[derive(Debug)]
pub struct MeshCache {
    dir: PathBuf,
    dumped: HashMap<ObjectId, MeshRef>,
}

impl MeshCache {
    pub fn new(dir: impl Into<PathBuf>) -> AssetResult<Self> {
        let dir = dir.into();
        ensure_dir(&dir)?;
        Ok(Self {
            dir,
            dumped: HashMap::new(),
        })
    }

    /// Dump `mesh` if its content has not been written yet and return its
    /// reference. Calls with the same `id` short-circuit on the in-run memo;
    /// calls with equal content under different ids converge on the same
    /// digest and share one file pair.
    pub fn dump(&mut self, id: ObjectId, mesh: &MeshAsset) -> AssetResult<MeshRef> {
        if let Some(known) = self.dumped.get(&id) {
            return Ok(known.clone());
        }

        let digest = canonical_digest(mesh);
        let reference = MeshRef {
            file_id: MESH_FILE_ID,
            digest: digest.clone(),
            kind: MESH_REF_KIND,
        };
        self.dumped.insert(id, reference.clone());

        let meta = self.dir.join(format!("{digest}.obj.meta"));
        if meta.exists() {
            trace!(digest = %digest, "mesh already on disk");
            return Ok(reference);
        }

        let mut writer = ObjWriter::new();
        writer.add_mesh(mesh, None);
        write_asset(&self.dir.join(format!("{digest}.obj")), writer.finish())?;
        write_asset(&meta, model_importer_meta(&digest, &mesh.name))?;
        debug!(mesh = %mesh.name, digest = %digest, "dumped mesh");
        Ok(reference)
    }
}

/// Digest of the geometry that actually ends up in the OBJ: vertex
/// positions, normals, triangle indices per submesh, and the first UV
/// channel. Each section contributes its element count plus a 32-bit fold
/// of its elements. The index fold rotates between elements so that
/// reordered triangles produce a different digest.
fn canonical_digest(mesh: &MeshAsset) -> ContentDigest {
    let mut bytes = Vec::with_capacity(8 * (4 + mesh.submeshes.len()));

    push_section(&mut bytes, mesh.positions.len(), {
        let mut fold = 0u32;
        for v in &mesh.positions {
            fold ^= hash_vec3(*v);
        }
        fold
    });
    push_section(&mut bytes, mesh.normals.len(), {
        let mut fold = 0u32;
        for v in &mesh.normals {
            fold ^= hash_vec3(*v);
        }
        fold
    });
    for submesh in &mesh.submeshes {
        let mut fold = 0u32;
        for &index in submesh {
            fold = fold.rotate_left(5) ^ index.wrapping_add(1);
        }
        push_section(&mut bytes, submesh.len(), fold);
    }
    push_section(&mut bytes, mesh.uv0.len(), {
        let mut fold = 0u32;
        for uv in &mesh.uv0 {
            fold ^= hash_vec2(*uv);
        }
        fold
    });

    ContentDigest::from_bytes(&bytes)
}

fn push_section(bytes: &mut Vec<u8>, count: usize, fold: u32) {
    bytes.extend_from_slice(&(count as u32).to_le_bytes());
    bytes.extend_from_slice(&fold.to_le_bytes());
}

fn hash_vec3(v: Vec3) -> u32 {
    v.x.to_bits() ^ v.y.to_bits().rotate_left(2) ^ v.z.to_bits().rotate_right(2)
}

fn hash_vec2(v: Vec2) -> u32 {
    v.x.to_bits() ^ v.y.to_bits().rotate_left(2)
}

fn model_importer_meta(digest: &ContentDigest, name: &str) -> String {
    format!(
        concat!(
            "fileFormatVersion: 2\n",
            "guid: {digest}\n",
            "ModelImporter:\n",
            "  serializedVersion: 23\n",
            "  fileIDToRecycleName:\n",
            "    100000: //RootNode\n",
            "    100002: {name}\n",
            "    400000: //RootNode\n",
            "    400002: {name}\n",
            "    2100000: default\n",
            "    3300000: default\n",
            "    4300000: default\n",
        ),
        digest = digest,
        name = name
    )
}
