//! Collider and rigid body records.

use super::SceneDumper;
use super::document::{
    BOX_COLLIDER_CLASS, CAPSULE_COLLIDER_CLASS, RIGID_BODY_CLASS, file_ref, flow_vec3,
};
use crate::error::UnearthResult;
use crate::scene::{BoxCollider, CapsuleCollider, Component, RigidBody, Scene};

impl SceneDumper {
    pub(super) fn add_box_collider(
        &mut self,
        scene: &Scene,
        component: &Component,
        collider: &BoxCollider,
    ) -> UnearthResult<()> {
        if !self.visited.insert(component.id) {
            return Ok(());
        }
        self.document.append(format!(
            concat!(
                "--- !u!{cls} &{id}\n",
                "BoxCollider:\n",
                "  m_ObjectHideFlags: {hide_flags}\n",
                "  m_CorrespondingSourceObject: {{fileID: 0}}\n",
                "  m_PrefabInternal: {{fileID: 0}}\n",
                "  m_GameObject: {owner}\n",
                "  m_Material: {{fileID: 0}}\n",
                "  m_IsTrigger: {is_trigger}\n",
                "  m_Enabled: {enabled}\n",
                "  serializedVersion: 2\n",
                "  m_Size: {size}\n",
                "  m_Center: {center}\n",
            ),
            cls = BOX_COLLIDER_CLASS,
            id = component.id.transient(),
            hide_flags = component.hide_flags,
            owner = file_ref(component.owner),
            is_trigger = i32::from(collider.is_trigger),
            enabled = i32::from(collider.enabled),
            size = flow_vec3(collider.size),
            center = flow_vec3(collider.center),
        ));
        self.add_object(scene, component.owner)
    }

    pub(super) fn add_rigid_body(
        &mut self,
        scene: &Scene,
        component: &Component,
        body: &RigidBody,
    ) -> UnearthResult<()> {
        if !self.visited.insert(component.id) {
            return Ok(());
        }
        self.document.append(format!(
            concat!(
                "--- !u!{cls} &{id}\n",
                "Rigidbody:\n",
                "  m_ObjectHideFlags: {hide_flags}\n",
                "  m_CorrespondingSourceObject: {{fileID: 0}}\n",
                "  m_PrefabInternal: {{fileID: 0}}\n",
                "  m_GameObject: {owner}\n",
                "  serializedVersion: 2\n",
                "  m_Mass: {mass}\n",
                "  m_Drag: {drag}\n",
                "  m_AngularDrag: {angular_drag}\n",
                "  m_UseGravity: {use_gravity}\n",
                "  m_IsKinematic: {is_kinematic}\n",
                "  m_Interpolate: {interpolate}\n",
                "  m_Constraints: {constraints}\n",
                "  m_CollisionDetection: {collision_detection}\n",
            ),
            cls = RIGID_BODY_CLASS,
            id = component.id.transient(),
            hide_flags = component.hide_flags,
            owner = file_ref(component.owner),
            mass = body.mass,
            drag = body.drag,
            angular_drag = body.angular_drag,
            use_gravity = i32::from(body.use_gravity),
            is_kinematic = i32::from(body.is_kinematic),
            interpolate = body.interpolation,
            constraints = body.constraints,
            collision_detection = body.collision_detection,
        ));
        self.add_object(scene, component.owner)
    }

    // The capsule record carries no serializedVersion line; the consuming
    // format never versioned it.
    pub(super) fn add_capsule_collider(
        &mut self,
        scene: &Scene,
        component: &Component,
        collider: &CapsuleCollider,
    ) -> UnearthResult<()> {
        if !self.visited.insert(component.id) {
            return Ok(());
        }
        self.document.append(format!(
            concat!(
                "--- !u!{cls} &{id}\n",
                "CapsuleCollider:\n",
                "  m_ObjectHideFlags: {hide_flags}\n",
                "  m_CorrespondingSourceObject: {{fileID: 0}}\n",
                "  m_PrefabInternal: {{fileID: 0}}\n",
                "  m_GameObject: {owner}\n",
                "  m_Material: {{fileID: 0}}\n",
                "  m_IsTrigger: {is_trigger}\n",
                "  m_Enabled: {enabled}\n",
                "  m_Radius: {radius}\n",
                "  m_Height: {height}\n",
                "  m_Direction: {direction}\n",
                "  m_Center: {center}\n",
            ),
            cls = CAPSULE_COLLIDER_CLASS,
            id = component.id.transient(),
            hide_flags = component.hide_flags,
            owner = file_ref(component.owner),
            is_trigger = i32::from(collider.is_trigger),
            enabled = i32::from(collider.enabled),
            radius = collider.radius,
            height = collider.height,
            direction = collider.direction,
            center = flow_vec3(collider.center),
        ));
        self.add_object(scene, component.owner)
    }
}
