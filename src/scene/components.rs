//! Component payloads.
//!
//! One struct per supported component kind, holding exactly the state the
//! document serializer emits. `Default` impls mirror the engine's own
//! component defaults so bridges only write what they observed.

use glam::{Quat, Vec3};

use crate::ident::ObjectId;
use crate::reflect::QualName;
use crate::scene::value::{AnimCurve, LiveField};

/// Spatial state plus the hierarchy edges of an object.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    pub local_position: Vec3,
    pub local_rotation: Quat,
    pub local_scale: Vec3,
    pub local_euler_hint: Vec3,
    /// Parent transform component, if any.
    pub parent: Option<ObjectId>,
    /// Child transform components, in sibling order.
    pub children: Vec<ObjectId>,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            local_position: Vec3::ZERO,
            local_rotation: Quat::IDENTITY,
            local_scale: Vec3::ONE,
            local_euler_hint: Vec3::ZERO,
            parent: None,
            children: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Physics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigidBody {
    pub mass: f32,
    pub drag: f32,
    pub angular_drag: f32,
    pub use_gravity: bool,
    pub is_kinematic: bool,
    pub interpolation: i32,
    pub constraints: i32,
    pub collision_detection: i32,
}

impl Default for RigidBody {
    fn default() -> Self {
        Self {
            mass: 1.0,
            drag: 0.0,
            angular_drag: 0.05,
            use_gravity: true,
            is_kinematic: false,
            interpolation: 0,
            constraints: 0,
            collision_detection: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxCollider {
    pub enabled: bool,
    pub is_trigger: bool,
    pub center: Vec3,
    pub size: Vec3,
}

impl Default for BoxCollider {
    fn default() -> Self {
        Self {
            enabled: true,
            is_trigger: false,
            center: Vec3::ZERO,
            size: Vec3::ONE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CapsuleCollider {
    pub enabled: bool,
    pub is_trigger: bool,
    pub center: Vec3,
    pub radius: f32,
    pub height: f32,
    /// Long axis: 0 = x, 1 = y, 2 = z.
    pub direction: i32,
}

impl Default for CapsuleCollider {
    fn default() -> Self {
        Self {
            enabled: true,
            is_trigger: false,
            center: Vec3::ZERO,
            radius: 0.5,
            height: 2.0,
            direction: 1,
        }
    }
}

// ---------------------------------------------------------------------------
// Joints
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct JointSpring {
    pub spring: f32,
    pub damper: f32,
    pub target_position: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct JointMotor {
    pub target_velocity: f32,
    pub force: f32,
    pub free_spin: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct JointLimits {
    pub min: f32,
    pub max: f32,
    pub bounciness: f32,
    pub bounce_min_velocity: f32,
    pub contact_distance: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HingeJoint {
    /// Body on the far side of the joint; emitted as a record reference.
    pub connected_body: Option<ObjectId>,
    pub anchor: Vec3,
    pub axis: Vec3,
    pub auto_configure_connected_anchor: bool,
    pub connected_anchor: Vec3,
    pub use_spring: bool,
    pub spring: JointSpring,
    pub use_motor: bool,
    pub motor: JointMotor,
    pub use_limits: bool,
    pub limits: JointLimits,
    pub break_force: f32,
    pub break_torque: f32,
    pub enable_collision: bool,
    pub enable_preprocessing: bool,
    pub mass_scale: f32,
    pub connected_mass_scale: f32,
}

impl Default for HingeJoint {
    fn default() -> Self {
        Self {
            connected_body: None,
            anchor: Vec3::ZERO,
            axis: Vec3::X,
            auto_configure_connected_anchor: true,
            connected_anchor: Vec3::ZERO,
            use_spring: false,
            spring: JointSpring::default(),
            use_motor: false,
            motor: JointMotor::default(),
            use_limits: false,
            limits: JointLimits::default(),
            break_force: f32::INFINITY,
            break_torque: f32::INFINITY,
            enable_collision: false,
            enable_preprocessing: true,
            mass_scale: 1.0,
            connected_mass_scale: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LimitSpring {
    pub spring: f32,
    pub damper: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SoftLimit {
    pub limit: f32,
    pub bounciness: f32,
    pub contact_distance: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JointDrive {
    pub position_spring: f32,
    pub position_damper: f32,
    pub maximum_force: f32,
}

impl Default for JointDrive {
    fn default() -> Self {
        Self {
            position_spring: 0.0,
            position_damper: 0.0,
            maximum_force: f32::MAX,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConfigurableJoint {
    pub connected_body: Option<ObjectId>,
    pub anchor: Vec3,
    pub axis: Vec3,
    pub auto_configure_connected_anchor: bool,
    pub connected_anchor: Vec3,
    pub secondary_axis: Vec3,
    /// Per-axis motion locks: 0 = locked, 1 = limited, 2 = free.
    pub x_motion: i32,
    pub y_motion: i32,
    pub z_motion: i32,
    pub angular_x_motion: i32,
    pub angular_y_motion: i32,
    pub angular_z_motion: i32,
    pub linear_limit_spring: LimitSpring,
    pub linear_limit: SoftLimit,
    pub angular_x_limit_spring: LimitSpring,
    pub low_angular_x_limit: SoftLimit,
    pub high_angular_x_limit: SoftLimit,
    pub angular_yz_limit_spring: LimitSpring,
    pub angular_y_limit: SoftLimit,
    pub angular_z_limit: SoftLimit,
    pub target_position: Vec3,
    pub target_velocity: Vec3,
    pub x_drive: JointDrive,
    pub y_drive: JointDrive,
    pub z_drive: JointDrive,
    pub target_rotation: Quat,
    pub target_angular_velocity: Vec3,
    pub rotation_drive_mode: i32,
    pub angular_x_drive: JointDrive,
    pub angular_yz_drive: JointDrive,
    pub slerp_drive: JointDrive,
    pub projection_mode: i32,
    pub projection_distance: f32,
    pub projection_angle: f32,
    pub configured_in_world_space: bool,
    pub swap_bodies: bool,
    pub break_force: f32,
    pub break_torque: f32,
    pub enable_collision: bool,
    pub enable_preprocessing: bool,
    pub mass_scale: f32,
    pub connected_mass_scale: f32,
}

impl Default for ConfigurableJoint {
    fn default() -> Self {
        Self {
            connected_body: None,
            anchor: Vec3::ZERO,
            axis: Vec3::X,
            auto_configure_connected_anchor: true,
            connected_anchor: Vec3::ZERO,
            secondary_axis: Vec3::Y,
            x_motion: 2,
            y_motion: 2,
            z_motion: 2,
            angular_x_motion: 2,
            angular_y_motion: 2,
            angular_z_motion: 2,
            linear_limit_spring: LimitSpring::default(),
            linear_limit: SoftLimit::default(),
            angular_x_limit_spring: LimitSpring::default(),
            low_angular_x_limit: SoftLimit::default(),
            high_angular_x_limit: SoftLimit::default(),
            angular_yz_limit_spring: LimitSpring::default(),
            angular_y_limit: SoftLimit::default(),
            angular_z_limit: SoftLimit::default(),
            target_position: Vec3::ZERO,
            target_velocity: Vec3::ZERO,
            x_drive: JointDrive::default(),
            y_drive: JointDrive::default(),
            z_drive: JointDrive::default(),
            target_rotation: Quat::IDENTITY,
            target_angular_velocity: Vec3::ZERO,
            rotation_drive_mode: 0,
            angular_x_drive: JointDrive::default(),
            angular_yz_drive: JointDrive::default(),
            slerp_drive: JointDrive::default(),
            projection_mode: 0,
            projection_distance: 0.1,
            projection_angle: 180.0,
            configured_in_world_space: false,
            swap_bodies: false,
            break_force: f32::INFINITY,
            break_torque: f32::INFINITY,
            enable_collision: false,
            enable_preprocessing: true,
            mass_scale: 1.0,
            connected_mass_scale: 1.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Audio
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct AudioSource {
    pub enabled: bool,
    pub play_on_awake: bool,
    pub volume: f32,
    pub pitch: f32,
    pub looped: bool,
    pub mute: bool,
    pub spatialize: bool,
    pub spatialize_post_effects: bool,
    pub priority: i32,
    pub doppler_level: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub pan_2d: f32,
    pub rolloff_mode: i32,
    pub bypass_effects: bool,
    pub bypass_listener_effects: bool,
    pub bypass_reverb_zones: bool,
    pub rolloff_custom_curve: Option<AnimCurve>,
    pub pan_level_custom_curve: Option<AnimCurve>,
    pub spread_custom_curve: Option<AnimCurve>,
    pub reverb_zone_mix_custom_curve: Option<AnimCurve>,
}

impl Default for AudioSource {
    fn default() -> Self {
        Self {
            enabled: true,
            play_on_awake: true,
            volume: 1.0,
            pitch: 1.0,
            looped: false,
            mute: false,
            spatialize: false,
            spatialize_post_effects: false,
            priority: 128,
            doppler_level: 1.0,
            min_distance: 1.0,
            max_distance: 500.0,
            pan_2d: 0.0,
            rolloff_mode: 0,
            bypass_effects: false,
            bypass_listener_effects: false,
            bypass_reverb_zones: false,
            rolloff_custom_curve: None,
            pan_level_custom_curve: None,
            spread_custom_curve: None,
            reverb_zone_mix_custom_curve: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Binds a mesh asset to its object. The mesh itself lives in the scene's
/// asset table and is resolved through the mesh cache at serialization time.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MeshFilter {
    pub mesh: Option<ObjectId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MeshRenderer {
    pub enabled: bool,
    pub cast_shadows: i32,
    pub receive_shadows: bool,
    pub dynamic_occludee: bool,
    pub motion_vectors: i32,
    pub light_probe_usage: i32,
    pub reflection_probe_usage: i32,
    pub rendering_layer_mask: u32,
    pub renderer_priority: i32,
    /// Material slots in renderer order; `None` is an empty slot.
    pub materials: Vec<Option<ObjectId>>,
}

impl Default for MeshRenderer {
    fn default() -> Self {
        Self {
            enabled: true,
            cast_shadows: 1,
            receive_shadows: true,
            dynamic_occludee: true,
            motion_vectors: 1,
            light_probe_usage: 1,
            reflection_probe_usage: 1,
            rendering_layer_mask: 1,
            renderer_priority: 0,
            materials: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Scripted behaviors
// ---------------------------------------------------------------------------

/// A user-script component captured by reflection.
///
/// Serialization needs a skeleton digest for `type_name`; without one the
/// component cannot be referenced from the document.
#[derive(Debug, Clone, PartialEq)]
pub struct Behavior {
    pub type_name: QualName,
    pub enabled: bool,
    /// Declared fields in declaration order, serializable or not.
    pub fields: Vec<LiveField>,
}

impl Behavior {
    pub fn new(type_name: QualName) -> Self {
        Self {
            type_name,
            enabled: true,
            fields: Vec::new(),
        }
    }

    pub fn with_field(mut self, field: LiveField) -> Self {
        self.fields.push(field);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transform_defaults_to_identity() {
        let t = Transform::default();
        assert_eq!(t.local_scale, Vec3::ONE);
        assert_eq!(t.local_rotation, Quat::IDENTITY);
        assert!(t.parent.is_none());
        assert!(t.children.is_empty());
    }

    #[test]
    fn rigid_body_defaults_match_engine() {
        let rb = RigidBody::default();
        assert_eq!(rb.mass, 1.0);
        assert_eq!(rb.angular_drag, 0.05);
        assert!(rb.use_gravity);
        assert!(!rb.is_kinematic);
    }

    #[test]
    fn configurable_joint_axes_start_free() {
        let joint = ConfigurableJoint::default();
        assert_eq!(joint.x_motion, 2);
        assert_eq!(joint.angular_z_motion, 2);
        assert_eq!(joint.secondary_axis, Vec3::Y);
    }
}
