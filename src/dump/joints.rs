//! Joint records.
//!
//! Both joint kinds serialize under the configurable joint class id; the
//! hinge variant is the older, shorter field list. Connected bodies go
//! through the ensure-or-zero path so the reference always resolves inside
//! the document.

use super::SceneDumper;
use super::document::{JOINT_CLASS, file_ref, flow_quat, flow_vec3};
use crate::error::UnearthResult;
use crate::scene::{Component, ConfigurableJoint, HingeJoint, JointDrive, LimitSpring, Scene, SoftLimit};

impl SceneDumper {
    pub(super) fn add_hinge_joint(
        &mut self,
        scene: &Scene,
        component: &Component,
        joint: &HingeJoint,
    ) -> UnearthResult<()> {
        if !self.visited.insert(component.id) {
            return Ok(());
        }
        let slot = self.document.reserve();
        let connected = self.ensure_or_zero(scene, joint.connected_body)?;
        let text = format!(
            concat!(
                "--- !u!{cls} &{id}\n",
                "ConfigurableJoint:\n",
                "  m_ObjectHideFlags: 0\n",
                "  m_CorrespondingSourceObject: {{fileID: 0}}\n",
                "  m_PrefabInternal: {{fileID: 0}}\n",
                "  m_GameObject: {owner}\n",
                "  m_ConnectedBody: {connected}\n",
                "  m_Anchor: {anchor}\n",
                "  m_Axis: {axis}\n",
                "  m_AutoConfigureConnectedAnchor: {auto_anchor}\n",
                "  m_ConnectedAnchor: {connected_anchor}\n",
                "  m_UseSpring: {use_spring}\n",
                "  m_Spring:\n",
                "    spring: {spring}\n",
                "    damper: {damper}\n",
                "    targetPosition: {target_position}\n",
                "  m_UseMotor: {use_motor}\n",
                "  m_Motor:\n",
                "    targetVelocity: {target_velocity}\n",
                "    force: {force}\n",
                "    freeSpin: {free_spin}\n",
                "  m_UseLimits: {use_limits}\n",
                "  m_Limits:\n",
                "    min: {min}\n",
                "    max: {max}\n",
                "    bounciness: {bounciness}\n",
                "    bounceMinVelocity: {bounce_min_velocity}\n",
                "    contactDistance: {contact_distance}\n",
                "  m_BreakForce: {break_force}\n",
                "  m_BreakTorque: {break_torque}\n",
                "  m_EnableCollision: {enable_collision}\n",
                "  m_EnablePreprocessing: {enable_preprocessing}\n",
                "  m_MassScale: {mass_scale}\n",
                "  m_ConnectedMassScale: {connected_mass_scale}\n",
            ),
            cls = JOINT_CLASS,
            id = component.id.transient(),
            owner = file_ref(component.owner),
            connected = connected,
            anchor = flow_vec3(joint.anchor),
            axis = flow_vec3(joint.axis),
            auto_anchor = i32::from(joint.auto_configure_connected_anchor),
            connected_anchor = flow_vec3(joint.connected_anchor),
            use_spring = i32::from(joint.use_spring),
            spring = joint.spring.spring,
            damper = joint.spring.damper,
            target_position = joint.spring.target_position,
            use_motor = i32::from(joint.use_motor),
            target_velocity = joint.motor.target_velocity,
            force = joint.motor.force,
            free_spin = i32::from(joint.motor.free_spin),
            use_limits = i32::from(joint.use_limits),
            min = joint.limits.min,
            max = joint.limits.max,
            bounciness = joint.limits.bounciness,
            bounce_min_velocity = joint.limits.bounce_min_velocity,
            contact_distance = joint.limits.contact_distance,
            break_force = joint.break_force,
            break_torque = joint.break_torque,
            enable_collision = i32::from(joint.enable_collision),
            enable_preprocessing = i32::from(joint.enable_preprocessing),
            mass_scale = joint.mass_scale,
            connected_mass_scale = joint.connected_mass_scale,
        );
        self.document.fill(slot, text);
        self.add_object(scene, component.owner)
    }

    pub(super) fn add_configurable_joint(
        &mut self,
        scene: &Scene,
        component: &Component,
        joint: &ConfigurableJoint,
    ) -> UnearthResult<()> {
        if !self.visited.insert(component.id) {
            return Ok(());
        }
        let slot = self.document.reserve();
        let connected = self.ensure_or_zero(scene, joint.connected_body)?;
        let text = format!(
            concat!(
                "--- !u!{cls} &{id}\n",
                "ConfigurableJoint:\n",
                "  m_ObjectHideFlags: 0\n",
                "  m_CorrespondingSourceObject: {{fileID: 0}}\n",
                "  m_PrefabInternal: {{fileID: 0}}\n",
                "  m_GameObject: {owner}\n",
                "  m_ConnectedBody: {connected}\n",
                "  m_Anchor: {anchor}\n",
                "  m_Axis: {axis}\n",
                "  m_AutoConfigureConnectedAnchor: {auto_anchor}\n",
                "  m_ConnectedAnchor: {connected_anchor}\n",
                "  serializedVersion: 2\n",
                "  m_SecondaryAxis: {secondary_axis}\n",
                "  m_XMotion: {x_motion}\n",
                "  m_YMotion: {y_motion}\n",
                "  m_ZMotion: {z_motion}\n",
                "  m_AngularXMotion: {angular_x_motion}\n",
                "  m_AngularYMotion: {angular_y_motion}\n",
                "  m_AngularZMotion: {angular_z_motion}\n",
                "{linear_limit_spring}",
                "{linear_limit}",
                "{angular_x_limit_spring}",
                "{low_angular_x_limit}",
                "{high_angular_x_limit}",
                "{angular_yz_limit_spring}",
                "{angular_y_limit}",
                "{angular_z_limit}",
                "  m_TargetPosition: {target_position}\n",
                "  m_TargetVelocity: {target_velocity}\n",
                "{x_drive}",
                "{y_drive}",
                "{z_drive}",
                "  m_TargetRotation: {target_rotation}\n",
                "  m_TargetAngularVelocity: {target_angular_velocity}\n",
                "  m_RotationDriveMode: {rotation_drive_mode}\n",
                "{angular_x_drive}",
                "{angular_yz_drive}",
                "{slerp_drive}",
                "  m_ProjectionMode: {projection_mode}\n",
                "  m_ProjectionDistance: {projection_distance}\n",
                "  m_ProjectionAngle: {projection_angle}\n",
                "  m_ConfiguredInWorldSpace: {world_space}\n",
                "  m_SwapBodies: {swap_bodies}\n",
                "  m_BreakForce: {break_force}\n",
                "  m_BreakTorque: {break_torque}\n",
                "  m_EnableCollision: {enable_collision}\n",
                "  m_EnablePreprocessing: {enable_preprocessing}\n",
                "  m_MassScale: {mass_scale}\n",
                "  m_ConnectedMassScale: {connected_mass_scale}\n",
            ),
            cls = JOINT_CLASS,
            id = component.id.transient(),
            owner = file_ref(component.owner),
            connected = connected,
            anchor = flow_vec3(joint.anchor),
            axis = flow_vec3(joint.axis),
            auto_anchor = i32::from(joint.auto_configure_connected_anchor),
            connected_anchor = flow_vec3(joint.connected_anchor),
            secondary_axis = flow_vec3(joint.secondary_axis),
            x_motion = joint.x_motion,
            y_motion = joint.y_motion,
            z_motion = joint.z_motion,
            angular_x_motion = joint.angular_x_motion,
            angular_y_motion = joint.angular_y_motion,
            angular_z_motion = joint.angular_z_motion,
            linear_limit_spring = limit_spring_block("m_LinearLimitSpring", &joint.linear_limit_spring),
            linear_limit = soft_limit_block("m_LinearLimit", &joint.linear_limit),
            angular_x_limit_spring =
                limit_spring_block("m_AngularXLimitSpring", &joint.angular_x_limit_spring),
            low_angular_x_limit = soft_limit_block("m_LowAngularXLimit", &joint.low_angular_x_limit),
            high_angular_x_limit =
                soft_limit_block("m_HighAngularXLimit", &joint.high_angular_x_limit),
            angular_yz_limit_spring =
                limit_spring_block("m_AngularYZLimitSpring", &joint.angular_yz_limit_spring),
            angular_y_limit = soft_limit_block("m_AngularYLimit", &joint.angular_y_limit),
            angular_z_limit = soft_limit_block("m_AngularZLimit", &joint.angular_z_limit),
            target_position = flow_vec3(joint.target_position),
            target_velocity = flow_vec3(joint.target_velocity),
            x_drive = drive_block("m_XDrive", &joint.x_drive),
            y_drive = drive_block("m_YDrive", &joint.y_drive),
            z_drive = drive_block("m_ZDrive", &joint.z_drive),
            target_rotation = flow_quat(joint.target_rotation),
            target_angular_velocity = flow_vec3(joint.target_angular_velocity),
            rotation_drive_mode = joint.rotation_drive_mode,
            angular_x_drive = drive_block("m_AngularXDrive", &joint.angular_x_drive),
            angular_yz_drive = drive_block("m_AngularYZDrive", &joint.angular_yz_drive),
            slerp_drive = drive_block("m_SlerpDrive", &joint.slerp_drive),
            projection_mode = joint.projection_mode,
            projection_distance = joint.projection_distance,
            projection_angle = joint.projection_angle,
            world_space = i32::from(joint.configured_in_world_space),
            swap_bodies = i32::from(joint.swap_bodies),
            break_force = joint.break_force,
            break_torque = joint.break_torque,
            enable_collision = i32::from(joint.enable_collision),
            enable_preprocessing = i32::from(joint.enable_preprocessing),
            mass_scale = joint.mass_scale,
            connected_mass_scale = joint.connected_mass_scale,
        );
        self.document.fill(slot, text);
        self.add_object(scene, component.owner)
    }
}

fn limit_spring_block(name: &str, spring: &LimitSpring) -> String {
    format!(
        concat!(
            "  {name}:\n",
            "    spring: {spring}\n",
            "    damper: {damper}\n",
        ),
        name = name,
        spring = spring.spring,
        damper = spring.damper,
    )
}

fn soft_limit_block(name: &str, limit: &SoftLimit) -> String {
    format!(
        concat!(
            "  {name}:\n",
            "    limit: {limit}\n",
            "    bounciness: {bounciness}\n",
            "    contactDistance: {contact_distance}\n",
        ),
        name = name,
        limit = limit.limit,
        bounciness = limit.bounciness,
        contact_distance = limit.contact_distance,
    )
}

fn drive_block(name: &str, drive: &JointDrive) -> String {
    format!(
        concat!(
            "  {name}:\n",
            "    serializedVersion: 3\n",
            "    positionSpring: {spring}\n",
            "    positionDamper: {damper}\n",
            "    maximumForce: {force}\n",
        ),
        name = name,
        spring = drive.position_spring,
        damper = drive.position_damper,
        force = drive.maximum_force,
    )
}
