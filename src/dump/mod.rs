//! Scene graph serialization.
//!
//! [`SceneDumper`] walks a captured [`Scene`] from requested root objects and
//! renders one text document describing everything it reached. Records
//! cross-reference each other by transient id, so visiting a component can
//! recursively pull its owner, its transform hierarchy or any object its
//! fields point at into the same document. Binary payloads never enter the
//! document: meshes, materials and textures leave through the content
//! addressed caches, behavior types through the skeleton generator, each
//! contributing only the digest its record embeds.

mod convert;
mod document;
mod joints;
mod physics;

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use serde_json::{Value, json};
use tracing::{debug, trace, warn};

use crate::cache::{MaterialCache, MeshCache, TextureCache};
use crate::error::UnearthResult;
use crate::ident::{ContentDigest, ObjectId};
use crate::paths::OutputPaths;
use crate::reflect::TypeRef;
use crate::scene::{
    AnimCurve, AudioSource, Behavior, Component, ComponentKind, MeshFilter, MeshRenderer, Scene,
    Transform,
};
use crate::skeleton::SkeletonGenerator;

use convert::curve_json;
use document::{
    AUDIO_SOURCE_CLASS, BEHAVIOUR_CLASS, Document, GAME_OBJECT_CLASS, MESH_FILTER_CLASS,
    MESH_RENDERER_CLASS, TRANSFORM_CLASS, escape, file_ref, flow_quat, flow_vec3,
};

/// Configuration for a [`SceneDumper`].
#[derive(Debug, Clone)]
pub struct DumpConfig {
    /// Output root for skeleton and asset files. `None` runs document-only:
    /// records are still emitted, but asset references degrade to zero refs
    /// and behaviors are omitted because no digest can back them.
    pub output_dir: Option<PathBuf>,
    /// Group skeleton files under an assembly-name subfolder.
    pub assembly_subfolder: bool,
    /// When `false`, startup scans the output root so previously generated
    /// skeletons are neither rewritten nor renumbered.
    pub overwrite_skeletons: bool,
}

impl Default for DumpConfig {
    fn default() -> Self {
        Self {
            output_dir: None,
            assembly_subfolder: true,
            overwrite_skeletons: true,
        }
    }
}

/// Serializes captured scenes into text documents.
///
/// Owns the traversal state and all identity collaborators: the visited set,
/// the behavior digest cache, the skeleton generator and the three asset
/// caches. One dumper produces one document; dumpers sharing an output root
/// stay consistent across runs because every file on it is content addressed
/// and written at most once.
pub struct SceneDumper {
    document: Document,
    visited: HashSet<ObjectId>,
    /// Qualified behavior type name to skeleton digest, merged from every
    /// generator request and from recovery.
    behavior_digests: HashMap<String, ContentDigest>,
    skeletons: Option<SkeletonGenerator>,
    meshes: Option<MeshCache>,
    materials: Option<MaterialCache>,
    textures: Option<TextureCache>,
}

impl SceneDumper {
    /// Create a dumper for the given configuration.
    ///
    /// With an output directory set this prepares the on-disk layout and,
    /// when `overwrite_skeletons` is off, recovers type identities from the
    /// skeletons already present under it.
    pub fn new(config: DumpConfig) -> UnearthResult<Self> {
        let mut behavior_digests = HashMap::new();
        let mut skeletons = None;
        let mut meshes = None;
        let mut materials = None;
        let mut textures = None;

        if let Some(root) = &config.output_dir {
            let paths = OutputPaths::new(root.clone());
            paths.ensure_dirs()?;
            let mut generator = SkeletonGenerator::new(root.clone(), config.assembly_subfolder);
            if !config.overwrite_skeletons {
                behavior_digests = generator.scan_existing()?;
            }
            skeletons = Some(generator);
            meshes = Some(MeshCache::new(&paths.models_dir)?);
            textures = Some(TextureCache::new(&paths.textures_dir)?);
            materials = Some(MaterialCache::new(&paths.materials_dir)?);
        }

        Ok(Self {
            document: Document::new(),
            visited: HashSet::new(),
            behavior_digests,
            skeletons,
            meshes,
            materials,
            textures,
        })
    }

    /// Serialize `id` and everything reachable from it into the document.
    ///
    /// Already-visited objects are a no-op, so roots may overlap freely.
    pub fn add_object(&mut self, scene: &Scene, id: ObjectId) -> UnearthResult<()> {
        if !self.visited.insert(id) {
            return Ok(());
        }
        let Some(object) = scene.object(id) else {
            warn!(object = %id, "object not captured, skipping its record");
            return Ok(());
        };

        let slot = self.document.reserve();
        let mut text = format!(
            concat!(
                "--- !u!{cls} &{id}\n",
                "GameObject:\n",
                "  m_ObjectHideFlags: {hide_flags}\n",
                "  m_CorrespondingSourceObject: {{fileID: 0}}\n",
                "  m_PrefabInternal: {{fileID: 0}}\n",
                "  serializedVersion: 6\n",
                "  m_Component:\n",
            ),
            cls = GAME_OBJECT_CLASS,
            id = object.id.transient(),
            hide_flags = object.hide_flags,
        );
        for &component in &object.components {
            if self.try_add_component(scene, component)? {
                text.push_str(&format!("  - component: {}\n", file_ref(component)));
            }
        }
        text.push_str(&format!(
            concat!(
                "  m_Layer: {layer}\n",
                "  m_Name: {name}\n",
                "  m_TagString: {tag}\n",
                "  m_Icon: {{fileID: 0}}\n",
                "  m_NavMeshLayer: 0\n",
                "  m_StaticEditorFlags: 0\n",
                "  m_IsActive: {active}\n",
            ),
            layer = object.layer,
            name = escape(&object.name),
            tag = escape(&object.tag),
            active = i32::from(object.active),
        ));
        self.document.fill(slot, text);
        Ok(())
    }

    /// Render the accumulated document.
    pub fn render(&self) -> String {
        self.document.render()
    }

    /// Emit the record for one component, recursing into whatever it
    /// references.
    ///
    /// Returns `false` when the component cannot appear in the document (it
    /// was never captured, or it is a behavior without a recoverable type
    /// identity); the caller must then omit its own reference to it. An
    /// already-visited component reports `true` without re-emitting.
    fn try_add_component(&mut self, scene: &Scene, id: ObjectId) -> UnearthResult<bool> {
        let Some(component) = scene.component(id) else {
            debug!(component = %id, "component not captured, omitting reference");
            return Ok(false);
        };
        match &component.kind {
            ComponentKind::Transform(transform) => {
                self.add_transform(scene, component, transform)?;
                Ok(true)
            }
            ComponentKind::RigidBody(body) => {
                self.add_rigid_body(scene, component, body)?;
                Ok(true)
            }
            ComponentKind::BoxCollider(collider) => {
                self.add_box_collider(scene, component, collider)?;
                Ok(true)
            }
            ComponentKind::CapsuleCollider(collider) => {
                self.add_capsule_collider(scene, component, collider)?;
                Ok(true)
            }
            ComponentKind::HingeJoint(joint) => {
                self.add_hinge_joint(scene, component, joint)?;
                Ok(true)
            }
            ComponentKind::ConfigurableJoint(joint) => {
                self.add_configurable_joint(scene, component, joint)?;
                Ok(true)
            }
            ComponentKind::AudioSource(source) => {
                self.add_audio_source(scene, component, source)?;
                Ok(true)
            }
            ComponentKind::MeshFilter(filter) => {
                self.add_mesh_filter(scene, component, filter)?;
                Ok(true)
            }
            ComponentKind::MeshRenderer(renderer) => {
                self.add_mesh_renderer(scene, component, renderer)?;
                Ok(true)
            }
            ComponentKind::Behavior(behavior) => self.add_behavior(scene, component, behavior),
        }
    }

    /// Resolve an optional component reference through the document: the
    /// target is pulled in if possible, otherwise the reference is zero.
    fn ensure_or_zero(&mut self, scene: &Scene, target: Option<ObjectId>) -> UnearthResult<String> {
        if let Some(id) = target {
            if self.try_add_component(scene, id)? {
                return Ok(file_ref(id));
            }
        }
        Ok(file_ref(None))
    }

    /// Emit a transform and close over its hierarchy: the owning object, the
    /// parent chain and all children end up in the same document. The
    /// visited mark lands before any recursion, so parent and child can
    /// reference each other without looping.
    fn add_transform(
        &mut self,
        scene: &Scene,
        component: &Component,
        transform: &Transform,
    ) -> UnearthResult<()> {
        if !self.visited.insert(component.id) {
            return Ok(());
        }
        let slot = self.document.reserve();
        self.add_object(scene, component.owner)?;

        // Sibling index among the parent's children; a detached or unknown
        // parent pins it to zero.
        let root_order = transform
            .parent
            .and_then(|parent| scene.component(parent))
            .and_then(|parent| match &parent.kind {
                ComponentKind::Transform(payload) => payload
                    .children
                    .iter()
                    .position(|&child| child == component.id),
                _ => None,
            })
            .unwrap_or(0);

        let father = self.ensure_or_zero(scene, transform.parent)?;
        let mut children = String::new();
        for &child in &transform.children {
            if self.try_add_component(scene, child)? {
                children.push_str(&format!("  - {}\n", file_ref(child)));
            }
        }

        let text = format!(
            concat!(
                "--- !u!{cls} &{id}\n",
                "Transform:\n",
                "  m_ObjectHideFlags: {hide_flags}\n",
                "  m_CorrespondingSourceObject: {{fileID: 0}}\n",
                "  m_PrefabInternal: {{fileID: 0}}\n",
                "  m_GameObject: {owner}\n",
                "  m_LocalRotation: {rotation}\n",
                "  m_LocalPosition: {position}\n",
                "  m_LocalScale: {scale}\n",
                "  m_Children:\n",
                "{children}",
                "  m_Father: {father}\n",
                "  m_RootOrder: {root_order}\n",
                "  m_LocalEulerAnglesHint: {euler}\n",
            ),
            cls = TRANSFORM_CLASS,
            id = component.id.transient(),
            hide_flags = component.hide_flags,
            owner = file_ref(component.owner),
            rotation = flow_quat(transform.local_rotation),
            position = flow_vec3(transform.local_position),
            scale = flow_vec3(transform.local_scale),
            children = children,
            father = father,
            root_order = root_order,
            euler = flow_vec3(transform.local_euler_hint),
        );
        self.document.fill(slot, text);
        Ok(())
    }

    fn add_audio_source(
        &mut self,
        scene: &Scene,
        component: &Component,
        source: &AudioSource,
    ) -> UnearthResult<()> {
        if !self.visited.insert(component.id) {
            return Ok(());
        }
        self.document.append(format!(
            concat!(
                "--- !u!{cls} &{id}\n",
                "AudioSource:\n",
                "  m_ObjectHideFlags: {hide_flags}\n",
                "  m_CorrespondingSourceObject: {{fileID: 0}}\n",
                "  m_PrefabInternal: {{fileID: 0}}\n",
                "  m_GameObject: {owner}\n",
                "  m_Enabled: {enabled}\n",
                "  serializedVersion: 4\n",
                "  OutputAudioMixerGroup: {{fileID: 0}}\n",
                "  m_audioClip: {{fileID: 0}}\n",
                "  m_PlayOnAwake: {play_on_awake}\n",
                "  m_Volume: {volume}\n",
                "  m_Pitch: {pitch}\n",
                "  Loop: {looped}\n",
                "  Mute: {mute}\n",
                "  Spatialize: {spatialize}\n",
                "  SpatializePostEffects: {spatialize_post_effects}\n",
                "  Priority: {priority}\n",
                "  DopplerLevel: {doppler_level}\n",
                "  MinDistance: {min_distance}\n",
                "  MaxDistance: {max_distance}\n",
                "  Pan2D: {pan_2d}\n",
                "  rolloffMode: {rolloff_mode}\n",
                "  BypassEffects: {bypass_effects}\n",
                "  BypassListenerEffects: {bypass_listener_effects}\n",
                "  BypassReverbZones: {bypass_reverb_zones}\n",
                "  rolloffCustomCurve: {rolloff_curve}\n",
                "  panLevelCustomCurve: {pan_level_curve}\n",
                "  spreadCustomCurve: {spread_curve}\n",
                "  reverbZoneMixCustomCurve: {reverb_zone_mix_curve}\n",
            ),
            cls = AUDIO_SOURCE_CLASS,
            id = component.id.transient(),
            hide_flags = component.hide_flags,
            owner = file_ref(component.owner),
            enabled = i32::from(source.enabled),
            play_on_awake = i32::from(source.play_on_awake),
            volume = source.volume,
            pitch = source.pitch,
            looped = i32::from(source.looped),
            mute = i32::from(source.mute),
            spatialize = i32::from(source.spatialize),
            spatialize_post_effects = i32::from(source.spatialize_post_effects),
            priority = source.priority,
            doppler_level = source.doppler_level,
            min_distance = source.min_distance,
            max_distance = source.max_distance,
            pan_2d = source.pan_2d,
            rolloff_mode = source.rolloff_mode,
            bypass_effects = i32::from(source.bypass_effects),
            bypass_listener_effects = i32::from(source.bypass_listener_effects),
            bypass_reverb_zones = i32::from(source.bypass_reverb_zones),
            rolloff_curve = curve_or_null(&source.rolloff_custom_curve),
            pan_level_curve = curve_or_null(&source.pan_level_custom_curve),
            spread_curve = curve_or_null(&source.spread_custom_curve),
            reverb_zone_mix_curve = curve_or_null(&source.reverb_zone_mix_custom_curve),
        ));
        self.add_object(scene, component.owner)
    }

    /// Emit a behavior record, dumping its type skeleton on first sight.
    ///
    /// The digest resolves before anything else: a type that cannot be
    /// dumped (no output root, ineligible, or only reachable as a nested
    /// type) leaves the component without an identity, and the record is
    /// omitted rather than emitted with a dangling script reference.
    fn add_behavior(
        &mut self,
        scene: &Scene,
        component: &Component,
        behavior: &Behavior,
    ) -> UnearthResult<bool> {
        let qualified = behavior.type_name.qualified();
        if !self.behavior_digests.contains_key(&qualified) {
            let Some(generator) = self.skeletons.as_mut() else {
                trace!(ty = %qualified, "no output root, omitting behavior");
                return Ok(false);
            };
            let ty = TypeRef::named(behavior.type_name.clone());
            if let Some(digests) = generator.dump_if_missing(scene.types(), &ty)? {
                self.behavior_digests.extend(digests);
            }
        }
        let Some(digest) = self.behavior_digests.get(&qualified) else {
            debug!(ty = %qualified, "behavior type has no recoverable identity, omitting");
            return Ok(false);
        };
        let digest = digest.clone();

        if !self.visited.insert(component.id) {
            return Ok(true);
        }
        let slot = self.document.reserve();
        let mut text = format!(
            concat!(
                "--- !u!{cls} &{id}\n",
                "MonoBehaviour:\n",
                "  m_ObjectHideFlags: {hide_flags}\n",
                "  m_CorrespondingSourceObject: {{fileID: 0}}\n",
                "  m_PrefabInternal: {{fileID: 0}}\n",
                "  m_GameObject: {owner}\n",
                "  m_Enabled: {enabled}\n",
                "  m_EditorHideFlags: 0\n",
                "  m_Script: {{fileID: 11500000, guid: {guid}, type: 3}}\n",
                "  m_Name: \n",
                "  m_EditorClassIdentifier: \n",
            ),
            cls = BEHAVIOUR_CLASS,
            id = component.id.transient(),
            hide_flags = component.hide_flags,
            owner = file_ref(component.owner),
            enabled = i32::from(behavior.enabled),
            guid = digest,
        );
        for field in &behavior.fields {
            if !field.serializable {
                continue;
            }
            match self.field_json(scene, &field.value)? {
                Some(value) => text.push_str(&format!("  {}: {}\n", field.name, value)),
                None => {
                    debug!(ty = %qualified, field = %field.name, "did not serialize null field");
                }
            }
        }
        self.document.fill(slot, text);
        self.add_object(scene, component.owner)?;
        Ok(true)
    }

    fn add_mesh_filter(
        &mut self,
        scene: &Scene,
        component: &Component,
        filter: &MeshFilter,
    ) -> UnearthResult<()> {
        if !self.visited.insert(component.id) {
            return Ok(());
        }
        let mesh_ref = match filter.mesh {
            Some(mesh) => match (scene.mesh(mesh), self.meshes.as_mut()) {
                (Some(asset), Some(cache)) => cache.dump(mesh, asset)?.flow_ref(),
                (None, _) => {
                    debug!(mesh = %mesh, "mesh asset not captured, writing zero reference");
                    file_ref(None)
                }
                (_, None) => file_ref(None),
            },
            None => file_ref(None),
        };
        self.document.append(format!(
            concat!(
                "--- !u!{cls} &{id}\n",
                "MeshFilter:\n",
                "  m_ObjectHideFlags: 0\n",
                "  m_CorrespondingSourceObject: {{fileID: 0}}\n",
                "  m_PrefabInstance: {{fileID: 0}}\n",
                "  m_PrefabAsset: {{fileID: 0}}\n",
                "  m_GameObject: {owner}\n",
                "  m_Mesh: {mesh}\n",
            ),
            cls = MESH_FILTER_CLASS,
            id = component.id.transient(),
            owner = file_ref(component.owner),
            mesh = mesh_ref,
        ));
        self.add_object(scene, component.owner)
    }

    fn add_mesh_renderer(
        &mut self,
        scene: &Scene,
        component: &Component,
        renderer: &MeshRenderer,
    ) -> UnearthResult<()> {
        if !self.visited.insert(component.id) {
            return Ok(());
        }
        let mut slots = Vec::with_capacity(renderer.materials.len());
        for &slot in &renderer.materials {
            slots.push(self.material_ref(scene, slot)?);
        }
        let materials = Value::Array(slots);
        self.document.append(format!(
            concat!(
                "--- !u!{cls} &{id}\n",
                "MeshRenderer:\n",
                "  m_ObjectHideFlags: 0\n",
                "  m_CorrespondingSourceObject: {{fileID: 0}}\n",
                "  m_PrefabInstance: {{fileID: 0}}\n",
                "  m_PrefabAsset: {{fileID: 0}}\n",
                "  m_GameObject: {owner}\n",
                "  m_Enabled: {enabled}\n",
                "  m_CastShadows: {cast_shadows}\n",
                "  m_ReceiveShadows: {receive_shadows}\n",
                "  m_DynamicOccludee: {dynamic_occludee}\n",
                "  m_MotionVectors: {motion_vectors}\n",
                "  m_LightProbeUsage: {light_probe_usage}\n",
                "  m_ReflectionProbeUsage: {reflection_probe_usage}\n",
                "  m_RenderingLayerMask: {rendering_layer_mask}\n",
                "  m_RendererPriority: {renderer_priority}\n",
                "  m_Materials: {materials}\n",
            ),
            cls = MESH_RENDERER_CLASS,
            id = component.id.transient(),
            owner = file_ref(component.owner),
            enabled = i32::from(renderer.enabled),
            cast_shadows = renderer.cast_shadows,
            receive_shadows = i32::from(renderer.receive_shadows),
            dynamic_occludee = i32::from(renderer.dynamic_occludee),
            motion_vectors = renderer.motion_vectors,
            light_probe_usage = renderer.light_probe_usage,
            reflection_probe_usage = renderer.reflection_probe_usage,
            rendering_layer_mask = renderer.rendering_layer_mask,
            renderer_priority = renderer.renderer_priority,
            materials = materials,
        ));
        self.add_object(scene, component.owner)
    }

    /// One material slot of a renderer, as its document reference. The
    /// material and anything it binds (textures) land on disk as a side
    /// effect; a missing asset or a document-only run writes the zero ref.
    fn material_ref(&mut self, scene: &Scene, slot: Option<ObjectId>) -> UnearthResult<Value> {
        let Some(material) = slot else {
            return Ok(json!({"fileID": 0}));
        };
        let Some(asset) = scene.material(material) else {
            debug!(material = %material, "material asset not captured, writing zero reference");
            return Ok(json!({"fileID": 0}));
        };
        let (Some(cache), Some(textures)) = (self.materials.as_mut(), self.textures.as_mut())
        else {
            return Ok(json!({"fileID": 0}));
        };
        let digest = cache.dump(material, asset, scene, textures)?;
        Ok(json!({"fileID": 2100000, "guid": digest.as_str(), "type": 2}))
    }
}

fn curve_or_null(curve: &Option<AnimCurve>) -> String {
    match curve {
        Some(curve) => curve_json(curve).to_string(),
        None => "null".to_string(),
    }
}
