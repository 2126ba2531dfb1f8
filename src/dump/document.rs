//! Record arena for one scene document.
//!
//! Records reference each other by transient id, and emitting one record can
//! discover more that belong *after* it in the stream. Emitters therefore
//! reserve a slot up front, recurse, and fill the slot once their own text
//! is complete; rendering later concatenates the slots in reservation order.

use glam::{Quat, Vec3};

use crate::ident::TransientRef;

pub(crate) const PROLOGUE: &str = "%YAML 1.1\n%TAG !u! tag:unity3d.com,2011:\n";

// Serialized class ids.
pub(crate) const GAME_OBJECT_CLASS: u32 = 1;
pub(crate) const TRANSFORM_CLASS: u32 = 4;
pub(crate) const MESH_RENDERER_CLASS: u32 = 23;
pub(crate) const MESH_FILTER_CLASS: u32 = 33;
pub(crate) const RIGID_BODY_CLASS: u32 = 54;
pub(crate) const BOX_COLLIDER_CLASS: u32 = 65;
pub(crate) const AUDIO_SOURCE_CLASS: u32 = 82;
pub(crate) const BEHAVIOUR_CLASS: u32 = 114;
pub(crate) const CAPSULE_COLLIDER_CLASS: u32 = 136;
pub(crate) const JOINT_CLASS: u32 = 153;

/// Claim on one record position, handed back to [`Document::fill`].
#[derive(Debug)]
pub(crate) struct RecordSlot(usize);

#[derive(Debug, Default)]
pub(crate) struct Document {
    records: Vec<Option<String>>,
}

impl Document {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn reserve(&mut self) -> RecordSlot {
        self.records.push(None);
        RecordSlot(self.records.len() - 1)
    }

    pub(crate) fn fill(&mut self, slot: RecordSlot, text: String) {
        self.records[slot.0] = Some(text);
    }

    /// Reserve and fill in one step, for records with no nested emission.
    pub(crate) fn append(&mut self, text: String) {
        let slot = self.reserve();
        self.fill(slot, text);
    }

    pub(crate) fn render(&self) -> String {
        let mut out = String::from(PROLOGUE);
        for record in self.records.iter().flatten() {
            out.push_str(record);
        }
        out
    }
}

pub(crate) fn escape(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

pub(crate) fn flow_vec3(v: Vec3) -> String {
    format!("{{x: {}, y: {}, z: {}}}", v.x, v.y, v.z)
}

pub(crate) fn flow_quat(q: Quat) -> String {
    format!("{{x: {}, y: {}, z: {}, w: {}}}", q.x, q.y, q.z, q.w)
}

pub(crate) fn file_ref(target: impl Into<TransientRef>) -> String {
    format!("{{fileID: {}}}", target.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ident::ObjectId;

    #[test]
    fn slots_render_in_reservation_order() {
        let mut doc = Document::new();
        let outer = doc.reserve();
        doc.append("--- !u!4 &2\ninner\n".to_string());
        doc.fill(outer, "--- !u!1 &1\nouter\n".to_string());

        assert_eq!(
            doc.render(),
            "%YAML 1.1\n%TAG !u! tag:unity3d.com,2011:\n--- !u!1 &1\nouter\n--- !u!4 &2\ninner\n"
        );
    }

    #[test]
    fn empty_document_is_just_the_prologue() {
        assert_eq!(Document::new().render(), PROLOGUE);
    }

    #[test]
    fn escaping_doubles_single_quotes() {
        assert_eq!(escape("plain"), "'plain'");
        assert_eq!(escape("it's"), "'it''s'");
        assert_eq!(escape(""), "''");
    }

    #[test]
    fn flow_values_use_shortest_float_form() {
        assert_eq!(
            flow_vec3(Vec3::new(0.5, -1.0, 0.0)),
            "{x: 0.5, y: -1, z: 0}"
        );
        assert_eq!(
            flow_quat(Quat::from_xyzw(0.0, 0.0, 0.0, 1.0)),
            "{x: 0, y: 0, z: 0, w: 1}"
        );
    }

    #[test]
    fn file_refs_accept_live_ids_and_nulls() {
        let id = ObjectId::new(77).unwrap();
        assert_eq!(file_ref(id), "{fileID: 77}");
        assert_eq!(file_ref(None), "{fileID: 0}");
        assert_eq!(file_ref(Some(id)), "{fileID: 77}");
    }
}
