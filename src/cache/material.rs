//! Material cache: document-formatted .mat files named by text digest.
//!
//! Unlike meshes and textures, a material's digest is computed over the
//! final serialized text, so any observable difference in properties or
//! shader state yields a distinct file. Texture references inside the
//! material are resolved through [`TextureCache`] while the property block
//! is built, which is what pulls the referenced textures onto disk.

use std::collections::HashMap;
use std::path::PathBuf;

use glam::Vec2;
use serde_json::{Map, Value, json};
use tracing::{debug, trace, warn};

use crate::error::AssetResult;
use crate::ident::{ContentDigest, ObjectId};
use crate::scene::{Color, MaterialAsset, Scene, TextureBinding};

use super::texture::TextureCache;
use super::{ensure_dir, json_f32, write_asset};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PropertyKind {
    Scalar,
    Color,
    TexEnv,
}

/// Properties the built-in shaders are known to carry, in the order the
/// serialized property block lists them. Only properties actually present
/// on a material are emitted.
const PROPERTY_TABLE: [(PropertyKind, &str); 29] = [
    (PropertyKind::Color, "_Color"),
    (PropertyKind::TexEnv, "_MainTex"),
    (PropertyKind::Scalar, "_Cutoff"),
    (PropertyKind::Scalar, "_Glossiness"),
    (PropertyKind::Scalar, "_GlossMapScale"),
    (PropertyKind::Scalar, "_SmoothnessTextureChannel"),
    (PropertyKind::Scalar, "_Metallic"),
    (PropertyKind::TexEnv, "_MetallicGlossMap"),
    (PropertyKind::Scalar, "_SpecularHighlights"),
    (PropertyKind::Scalar, "_GlossyReflections"),
    (PropertyKind::Scalar, "_BumpScale"),
    (PropertyKind::TexEnv, "_BumpMap"),
    (PropertyKind::Scalar, "_Parallax"),
    (PropertyKind::TexEnv, "_ParallaxMap"),
    (PropertyKind::Scalar, "_OcclusionStrength"),
    (PropertyKind::TexEnv, "_OcclusionMap"),
    (PropertyKind::Color, "_EmissionColor"),
    (PropertyKind::TexEnv, "_EmissionMap"),
    (PropertyKind::TexEnv, "_DetailMask"),
    (PropertyKind::TexEnv, "_DetailAlbedoMap"),
    (PropertyKind::Scalar, "_DetailNormalMapScale"),
    (PropertyKind::TexEnv, "_DetailNormalMap"),
    (PropertyKind::Scalar, "_UVSec"),
    (PropertyKind::Scalar, "_Mode"),
    (PropertyKind::Scalar, "_SrcBlend"),
    (PropertyKind::Scalar, "_DstBlend"),
    (PropertyKind::Scalar, "_ZWrite"),
    (PropertyKind::Color, "_SpecColor"),
    (PropertyKind::TexEnv, "_SpecGlossMap"),
];

/// Writes each distinct material once and hands out its digest.
#[derive(Debug)]
pub struct MaterialCache {
    dir: PathBuf,
    dumped: HashMap<ObjectId, ContentDigest>,
}

impl MaterialCache {
    pub fn new(dir: impl Into<PathBuf>) -> AssetResult<Self> {
        let dir = dir.into();
        ensure_dir(&dir)?;
        Ok(Self {
            dir,
            dumped: HashMap::new(),
        })
    }

    /// Serialize `material`, dumping any textures it references through
    /// `textures`, and return the digest that names it.
    pub fn dump(
        &mut self,
        id: ObjectId,
        material: &MaterialAsset,
        scene: &Scene,
        textures: &mut TextureCache,
    ) -> AssetResult<ContentDigest> {
        if let Some(known) = self.dumped.get(&id) {
            return Ok(known.clone());
        }

        let mut floats = Map::new();
        let mut colors = Map::new();
        let mut tex_envs = Map::new();
        for (kind, name) in &PROPERTY_TABLE {
            match kind {
                PropertyKind::Scalar => {
                    if let Some(&value) = material.floats.get(*name) {
                        floats.insert((*name).to_string(), json_f32(value));
                    }
                }
                PropertyKind::Color => {
                    if let Some(color) = material.colors.get(*name) {
                        colors.insert((*name).to_string(), json_color(color));
                    }
                }
                PropertyKind::TexEnv => {
                    if let Some(binding) = material.textures.get(*name) {
                        tex_envs.insert(
                            (*name).to_string(),
                            tex_env_json(binding, scene, textures)?,
                        );
                    }
                }
            }
        }
        let saved = json!({
            "serializedVersion": 3,
            "m_Floats": floats,
            "m_Colors": colors,
            "m_TexEnvs": tex_envs,
        });

        let text = material_text(material, &saved);
        let digest = ContentDigest::from_text(&text);
        self.dumped.insert(id, digest.clone());

        let meta = self.dir.join(format!("{digest}.mat.meta"));
        if meta.exists() {
            trace!(digest = %digest, "material already on disk");
            return Ok(digest);
        }

        write_asset(&meta, native_format_meta(&digest))?;
        write_asset(&self.dir.join(format!("{digest}.mat")), &text)?;
        debug!(material = %material.name, digest = %digest, "dumped material");
        Ok(digest)
    }
}

fn material_text(material: &MaterialAsset, saved: &Value) -> String {
    format!(
        concat!(
            "%YAML 1.1\n",
            "%TAG !u! tag:unity3d.com,2011:\n",
            "--- !u!21 &2100000\n",
            "Material:\n",
            "  serializedVersion: 6\n",
            "  m_ObjectHideFlags: 0\n",
            "  m_CorrespondingSourceObject: {{fileID: 0}}\n",
            "  m_PrefabInstance: {{fileID: 0}}\n",
            "  m_PrefabAsset: {{fileID: 0}}\n",
            "  m_Name: {name}\n",
            "  m_Shader: {{fileID: {shader}, guid: 0000000000000000f000000000000000, type: 0}}\n",
            "  m_ShaderKeywords: {keywords}\n",
            "  m_LightmapFlags: {lightmap}\n",
            "  m_EnableInstancingVariants: {instancing}\n",
            "  m_DoubleSidedGI: {double_sided}\n",
            "  m_CustomRenderQueue: {queue}\n",
            "  stringTagMap: {{}}\n",
            "  disabledShaderPasses: []\n",
            "  m_SavedProperties: {saved}",
        ),
        name = material.name,
        shader = shader_file_id(&material.shader),
        keywords = material.shader_keywords.join(" "),
        lightmap = material.lightmap_flags,
        instancing = i32::from(material.enable_instancing),
        double_sided = i32::from(material.double_sided_gi),
        queue = material.render_queue,
        saved = saved
    )
}

/// Built-in shader file ids. Anything unknown falls back to Standard.
fn shader_file_id(shader: &str) -> i32 {
    match shader {
        "Standard" => 46,
        "Standard (Specular setup)" => 45,
        "Unlit/Color" => 10755,
        "Unlit/Texture" => 10752,
        _ => {
            warn!(shader, "no file id known for shader, assuming Standard");
            46
        }
    }
}

fn tex_env_json(
    binding: &TextureBinding,
    scene: &Scene,
    textures: &mut TextureCache,
) -> AssetResult<Value> {
    let resolved = binding
        .texture
        .and_then(|id| scene.texture(id).map(|asset| (id, asset)));
    let texture = match resolved {
        Some((id, asset)) => {
            let digest = textures.dump(id, asset)?;
            json!({ "fileID": 2800000, "guid": digest.as_str(), "type": 3 })
        }
        None => json!({ "fileID": 0 }),
    };
    Ok(json!({
        "m_Texture": texture,
        "m_Scale": json_vec2(binding.scale),
        "m_Offset": json_vec2(binding.offset),
    }))
}

fn json_vec2(v: Vec2) -> Value {
    json!({ "x": json_f32(v.x), "y": json_f32(v.y) })
}

fn json_color(c: &Color) -> Value {
    json!({
        "r": json_f32(c.r),
        "g": json_f32(c.g),
        "b": json_f32(c.b),
        "a": json_f32(c.a),
    })
}

fn native_format_meta(digest: &ContentDigest) -> String {
    format!(
        concat!(
            "fileFormatVersion: 2\n",
            "guid: {digest}\n",
            "NativeFormatImporter:\n",
            "  externalObjects: {{}}\n",
            "  mainObjectFileID: 2100000\n",
            "  userData: \n",
            "  assetBundleName: \n",
            "  assetBundleVariant: \n",
        ),
        digest = digest
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{PixelFormat, TextureAsset};
    use std::fs;
    use tempfile::TempDir;

    fn oid(raw: i32) -> ObjectId {
        ObjectId::new(raw).unwrap()
    }

    struct Fixture {
        tmp: TempDir,
        materials: MaterialCache,
        textures: TextureCache,
    }

    impl Fixture {
        fn new() -> Self {
            let tmp = TempDir::new().unwrap();
            let materials = MaterialCache::new(tmp.path().join("materials")).unwrap();
            let textures = TextureCache::new(tmp.path().join("textures")).unwrap();
            Self {
                tmp,
                materials,
                textures,
            }
        }

        fn dir(&self) -> PathBuf {
            self.tmp.path().join("materials")
        }

        fn texture_dir(&self) -> PathBuf {
            self.tmp.path().join("textures")
        }
    }

    fn crate_material() -> MaterialAsset {
        let mut material = MaterialAsset::new("Crate", "Standard");
        material.shader_keywords = vec!["_EMISSION".to_string()];
        material.lightmap_flags = 2;
        material.render_queue = -1;
        material.floats.insert("_Glossiness".to_string(), 0.5);
        material
            .colors
            .insert("_Color".to_string(), Color::new(1.0, 1.0, 1.0, 1.0));
        material
            .textures
            .insert("_MainTex".to_string(), TextureBinding::new(None));
        material
    }

    #[test]
    fn serializes_the_exact_document_text() {
        let mut fx = Fixture::new();
        let scene = Scene::new();
        let digest = fx
            .materials
            .dump(oid(1), &crate_material(), &scene, &mut fx.textures)
            .unwrap();

        let text = fs::read_to_string(fx.dir().join(format!("{digest}.mat"))).unwrap();
        let expected = concat!(
            "%YAML 1.1\n",
            "%TAG !u! tag:unity3d.com,2011:\n",
            "--- !u!21 &2100000\n",
            "Material:\n",
            "  serializedVersion: 6\n",
            "  m_ObjectHideFlags: 0\n",
            "  m_CorrespondingSourceObject: {fileID: 0}\n",
            "  m_PrefabInstance: {fileID: 0}\n",
            "  m_PrefabAsset: {fileID: 0}\n",
            "  m_Name: Crate\n",
            "  m_Shader: {fileID: 46, guid: 0000000000000000f000000000000000, type: 0}\n",
            "  m_ShaderKeywords: _EMISSION\n",
            "  m_LightmapFlags: 2\n",
            "  m_EnableInstancingVariants: 0\n",
            "  m_DoubleSidedGI: 0\n",
            "  m_CustomRenderQueue: -1\n",
            "  stringTagMap: {}\n",
            "  disabledShaderPasses: []\n",
            "  m_SavedProperties: {\"serializedVersion\":3,",
            "\"m_Floats\":{\"_Glossiness\":0.5},",
            "\"m_Colors\":{\"_Color\":{\"r\":1.0,\"g\":1.0,\"b\":1.0,\"a\":1.0}},",
            "\"m_TexEnvs\":{\"_MainTex\":{\"m_Texture\":{\"fileID\":0},",
            "\"m_Scale\":{\"x\":1.0,\"y\":1.0},\"m_Offset\":{\"x\":0.0,\"y\":0.0}}}}",
        );
        assert_eq!(text, expected);
        assert_eq!(digest, ContentDigest::from_text(expected));
    }

    #[test]
    fn properties_follow_table_order_not_map_order() {
        let mut fx = Fixture::new();
        let scene = Scene::new();
        let mut material = MaterialAsset::new("m", "Standard");
        // Map order is alphabetical (_Mode first); table order puts _UVSec
        // first.
        material.floats.insert("_Mode".to_string(), 1.0);
        material.floats.insert("_UVSec".to_string(), 0.0);

        let digest = fx
            .materials
            .dump(oid(1), &material, &scene, &mut fx.textures)
            .unwrap();
        let text = fs::read_to_string(fx.dir().join(format!("{digest}.mat"))).unwrap();
        assert!(text.contains("\"m_Floats\":{\"_UVSec\":0.0,\"_Mode\":1.0}"));
    }

    #[test]
    fn assigned_texture_is_dumped_and_referenced() {
        let mut fx = Fixture::new();
        let mut scene = Scene::new();
        let tex_id = oid(40);
        scene.insert_texture(
            tex_id,
            TextureAsset::new("wood", 1, 1, PixelFormat::Rgba32, vec![1, 2, 3, 4]),
        );

        let mut material = crate_material();
        material
            .textures
            .insert("_MainTex".to_string(), TextureBinding::new(Some(tex_id)));

        let digest = fx
            .materials
            .dump(oid(1), &material, &scene, &mut fx.textures)
            .unwrap();
        let text = fs::read_to_string(fx.dir().join(format!("{digest}.mat"))).unwrap();
        assert!(text.contains("\"m_Texture\":{\"fileID\":2800000,\"guid\":\""));
        assert!(text.contains("\",\"type\":3}"));

        let pngs: Vec<_> = fs::read_dir(fx.texture_dir()).unwrap().collect();
        assert_eq!(pngs.len(), 2);
    }

    #[test]
    fn unresolvable_texture_reference_degrades_to_null_slot() {
        let mut fx = Fixture::new();
        let scene = Scene::new();
        let mut material = crate_material();
        material
            .textures
            .insert("_MainTex".to_string(), TextureBinding::new(Some(oid(99))));

        let digest = fx
            .materials
            .dump(oid(1), &material, &scene, &mut fx.textures)
            .unwrap();
        let text = fs::read_to_string(fx.dir().join(format!("{digest}.mat"))).unwrap();
        assert!(text.contains("\"m_Texture\":{\"fileID\":0}"));
    }

    #[test]
    fn unknown_shader_falls_back_to_standard() {
        assert_eq!(shader_file_id("Custom/Hologram"), 46);
        assert_eq!(shader_file_id("Standard (Specular setup)"), 45);
        assert_eq!(shader_file_id("Unlit/Color"), 10755);
        assert_eq!(shader_file_id("Unlit/Texture"), 10752);
    }

    #[test]
    fn identical_content_shares_one_file_pair() {
        let mut fx = Fixture::new();
        let scene = Scene::new();
        let a = fx
            .materials
            .dump(oid(1), &crate_material(), &scene, &mut fx.textures)
            .unwrap();
        let b = fx
            .materials
            .dump(oid(2), &crate_material(), &scene, &mut fx.textures)
            .unwrap();
        assert_eq!(a, b);
        let files: Vec<_> = fs::read_dir(fx.dir()).unwrap().collect();
        assert_eq!(files.len(), 2);
    }

    #[test]
    fn meta_sidecar_keeps_trailing_space_fields() {
        let mut fx = Fixture::new();
        let scene = Scene::new();
        let digest = fx
            .materials
            .dump(oid(1), &crate_material(), &scene, &mut fx.textures)
            .unwrap();
        let meta = fs::read_to_string(fx.dir().join(format!("{digest}.mat.meta"))).unwrap();
        assert_eq!(
            meta,
            format!(
                concat!(
                    "fileFormatVersion: 2\n",
                    "guid: {digest}\n",
                    "NativeFormatImporter:\n",
                    "  externalObjects: {{}}\n",
                    "  mainObjectFileID: 2100000\n",
                    "  userData: \n",
                    "  assetBundleName: \n",
                    "  assetBundleVariant: \n",
                ),
                digest = digest
            )
        );
    }
}
