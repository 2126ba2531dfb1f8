//! In-memory model of a captured scene.
//!
//! A host bridge walks the live engine state and populates a [`Scene`] with
//! objects, components and asset payloads, all keyed by [`ObjectId`]. The
//! model is inert: nothing here touches the engine or the filesystem, which
//! keeps the serialization pipeline testable with hand-built scenes.

pub mod assets;
pub mod components;
pub mod value;

use std::collections::HashMap;

use crate::ident::ObjectId;
use crate::reflect::TypeRegistry;

pub use assets::{MaterialAsset, MeshAsset, PixelFormat, TextureAsset, TextureBinding};
pub use components::{
    AudioSource, Behavior, BoxCollider, CapsuleCollider, ConfigurableJoint, HingeJoint,
    JointDrive, JointLimits, JointMotor, JointSpring, LimitSpring, MeshFilter, MeshRenderer,
    RigidBody, SoftLimit, Transform,
};
pub use value::{AnimCurve, Color, CurveKey, FieldValue, LiveField, WrapMode};

/// A captured scene object with its attached component ids.
#[derive(Debug, Clone, PartialEq)]
pub struct GameObject {
    pub id: ObjectId,
    pub name: String,
    pub tag: String,
    pub layer: i32,
    pub active: bool,
    pub hide_flags: i32,
    /// Attached components in engine order.
    pub components: Vec<ObjectId>,
}

impl GameObject {
    pub fn new(id: ObjectId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            tag: "Untagged".to_string(),
            layer: 0,
            active: true,
            hide_flags: 0,
            components: Vec::new(),
        }
    }

    pub fn with_component(mut self, component: ObjectId) -> Self {
        self.components.push(component);
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn with_layer(mut self, layer: i32) -> Self {
        self.layer = layer;
        self
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }
}

/// A captured component: identity, owner and kind-specific payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    pub id: ObjectId,
    pub owner: ObjectId,
    pub hide_flags: i32,
    pub kind: ComponentKind,
}

impl Component {
    pub fn new(id: ObjectId, owner: ObjectId, kind: ComponentKind) -> Self {
        Self {
            id,
            owner,
            hide_flags: 0,
            kind,
        }
    }
}

/// The closed set of component kinds the serializer understands.
///
/// Anything a bridge cannot express here is simply not captured; the
/// serializer never has to guess at unknown component state.
#[derive(Debug, Clone, PartialEq)]
pub enum ComponentKind {
    Transform(Transform),
    RigidBody(RigidBody),
    BoxCollider(BoxCollider),
    CapsuleCollider(CapsuleCollider),
    HingeJoint(HingeJoint),
    ConfigurableJoint(ConfigurableJoint),
    AudioSource(AudioSource),
    MeshFilter(MeshFilter),
    MeshRenderer(MeshRenderer),
    Behavior(Behavior),
}

impl ComponentKind {
    /// Short name for log lines.
    pub fn name(&self) -> &'static str {
        match self {
            ComponentKind::Transform(_) => "Transform",
            ComponentKind::RigidBody(_) => "RigidBody",
            ComponentKind::BoxCollider(_) => "BoxCollider",
            ComponentKind::CapsuleCollider(_) => "CapsuleCollider",
            ComponentKind::HingeJoint(_) => "HingeJoint",
            ComponentKind::ConfigurableJoint(_) => "ConfigurableJoint",
            ComponentKind::AudioSource(_) => "AudioSource",
            ComponentKind::MeshFilter(_) => "MeshFilter",
            ComponentKind::MeshRenderer(_) => "MeshRenderer",
            ComponentKind::Behavior(_) => "Behavior",
        }
    }
}

/// The full captured state of a scene.
///
/// Plain lookup tables, no interior structure: hierarchy lives on
/// [`Transform`] payloads and ownership on [`Component`] records.
#[derive(Debug, Default)]
pub struct Scene {
    objects: HashMap<ObjectId, GameObject>,
    components: HashMap<ObjectId, Component>,
    meshes: HashMap<ObjectId, MeshAsset>,
    materials: HashMap<ObjectId, MaterialAsset>,
    textures: HashMap<ObjectId, TextureAsset>,
    types: TypeRegistry,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_object(&mut self, object: GameObject) {
        self.objects.insert(object.id, object);
    }

    pub fn insert_component(&mut self, component: Component) {
        self.components.insert(component.id, component);
    }

    pub fn insert_mesh(&mut self, id: ObjectId, mesh: MeshAsset) {
        self.meshes.insert(id, mesh);
    }

    pub fn insert_material(&mut self, id: ObjectId, material: MaterialAsset) {
        self.materials.insert(id, material);
    }

    pub fn insert_texture(&mut self, id: ObjectId, texture: TextureAsset) {
        self.textures.insert(id, texture);
    }

    pub fn object(&self, id: ObjectId) -> Option<&GameObject> {
        self.objects.get(&id)
    }

    pub fn component(&self, id: ObjectId) -> Option<&Component> {
        self.components.get(&id)
    }

    pub fn mesh(&self, id: ObjectId) -> Option<&MeshAsset> {
        self.meshes.get(&id)
    }

    pub fn material(&self, id: ObjectId) -> Option<&MaterialAsset> {
        self.materials.get(&id)
    }

    pub fn texture(&self, id: ObjectId) -> Option<&TextureAsset> {
        self.textures.get(&id)
    }

    /// Type descriptors gathered while capturing behaviors.
    pub fn types(&self) -> &TypeRegistry {
        &self.types
    }

    pub fn types_mut(&mut self) -> &mut TypeRegistry {
        &mut self.types
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn oid(raw: i32) -> ObjectId {
        ObjectId::new(raw).unwrap()
    }

    #[test]
    fn objects_round_trip_by_id() {
        let mut scene = Scene::new();
        scene.insert_object(GameObject::new(oid(7), "Crate").with_layer(3));
        let go = scene.object(oid(7)).unwrap();
        assert_eq!(go.name, "Crate");
        assert_eq!(go.layer, 3);
        assert!(scene.object(oid(8)).is_none());
    }

    #[test]
    fn new_object_defaults() {
        let go = GameObject::new(oid(1), "Thing");
        assert_eq!(go.tag, "Untagged");
        assert!(go.active);
        assert_eq!(go.hide_flags, 0);
        assert!(go.components.is_empty());
    }

    #[test]
    fn components_carry_their_owner() {
        let mut scene = Scene::new();
        scene.insert_component(Component::new(
            oid(20),
            oid(1),
            ComponentKind::Transform(Transform::default()),
        ));
        let comp = scene.component(oid(20)).unwrap();
        assert_eq!(comp.owner, oid(1));
        assert_eq!(comp.kind.name(), "Transform");
    }

    #[test]
    fn asset_tables_are_independent() {
        let mut scene = Scene::new();
        scene.insert_mesh(oid(100), MeshAsset::new("quad"));
        assert!(scene.mesh(oid(100)).is_some());
        assert!(scene.material(oid(100)).is_none());
        assert!(scene.texture(oid(100)).is_none());
    }
}
