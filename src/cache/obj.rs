//! Wavefront OBJ serialization of captured meshes.
//!
//! The output is deliberately rough: one `v`/`vn`/`vt` block per mesh
//! followed by one `g` group per submesh, mirroring the engine's internal
//! representation rather than anything optimized. The engine is left-handed
//! while OBJ consumers expect right-handed data, so the x axis is negated
//! and triangle winding is reversed to compensate.

use glam::{Quat, Vec3};

use crate::scene::MeshAsset;

/// World placement applied to a mesh while writing it.
///
/// Positions go through the full scale-rotate-translate chain; normals are
/// rotated only.
#[derive(Debug, Clone)]
pub struct MeshPlacement {
    pub name: String,
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl MeshPlacement {
    pub fn new(name: impl Into<String>, translation: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            name: name.into(),
            translation,
            rotation,
            scale,
        }
    }

    fn transform_point(&self, point: Vec3) -> Vec3 {
        self.translation + self.rotation * (self.scale * point)
    }

    fn transform_direction(&self, direction: Vec3) -> Vec3 {
        self.rotation * direction
    }
}

/// Accumulates meshes into one OBJ document.
///
/// OBJ indices are global and 1-based, so the writer tracks running vertex
/// and texture-coordinate offsets across every mesh added to it.
#[derive(Debug)]
pub struct ObjWriter {
    geometry: String,
    groups: String,
    vertex_offset: u32,
    uv_offset: u32,
    group_count: usize,
}

impl ObjWriter {
    pub fn new() -> Self {
        Self {
            geometry: String::new(),
            groups: String::new(),
            vertex_offset: 1,
            uv_offset: 1,
            group_count: 0,
        }
    }

    pub fn add_mesh(&mut self, mesh: &MeshAsset, placement: Option<&MeshPlacement>) {
        let offset = self.vertex_offset;
        self.vertex_offset += mesh.positions.len() as u32;

        for position in &mesh.positions {
            let p = match placement {
                Some(at) => at.transform_point(*position),
                None => *position,
            };
            self.geometry
                .push_str(&format!("v {:.5} {:.5} {:.5}\n", -p.x, p.y, p.z));
        }
        self.geometry.push('\n');

        for normal in &mesh.normals {
            let n = match placement {
                Some(at) => at.transform_direction(*normal),
                None => *normal,
            };
            self.geometry
                .push_str(&format!("vn {:.5} {:.5} {:.5}\n", -n.x, n.y, n.z));
        }
        self.geometry.push('\n');

        for uv in &mesh.uv0 {
            self.geometry.push_str(&format!("vt {} {}\n", uv.x, uv.y));
        }
        self.geometry.push('\n');

        let has_uv = mesh.has_uv();
        let uv_offset = self.uv_offset;
        self.uv_offset += mesh.uv0.len() as u32;

        let corner = |index: u32| {
            if has_uv {
                format!("{}/{}/{}", index + offset, index + uv_offset, index + offset)
            } else {
                format!("{0}//{0}", index + offset)
            }
        };

        let group_name = placement.map_or("submesh", |at| at.name.as_str());
        for (m, submesh) in mesh.submeshes.iter().enumerate() {
            self.groups
                .push_str(&format!("g {}_{}\n", group_name, self.group_count + m));
            for triangle in submesh.chunks_exact(3) {
                // Reversed winding pairs with the x flip above.
                self.groups.push_str(&format!(
                    "f {} {} {}\n",
                    corner(triangle[2]),
                    corner(triangle[1]),
                    corner(triangle[0])
                ));
            }
            self.groups.push('\n');
        }
        self.group_count += mesh.submeshes.len();
    }

    pub fn finish(self) -> String {
        self.geometry + &self.groups
    }
}

impl Default for ObjWriter {
    fn default() -> Self {
        Self::new()
    }
}
