//! End-to-end extraction tests.
//!
//! These exercise the full pipeline from a hand-built scene through document
//! serialization, asset caching and skeleton generation, validating that the
//! document, the files on disk and the digests embedded in both agree.

use std::fs;
use std::path::Path;

use glam::{Vec2, Vec3};
use tempfile::TempDir;

use unearth::dump::{DumpConfig, SceneDumper};
use unearth::ident::{ContentDigest, ObjectId};
use unearth::reflect::{FieldDescriptor, Primitive, QualName, TypeDescriptor, TypeRef};
use unearth::scene::{
    Behavior, Component, ComponentKind, FieldValue, GameObject, LiveField, MaterialAsset,
    MeshAsset, MeshFilter, MeshRenderer, PixelFormat, Scene, TextureAsset, TextureBinding,
    Transform,
};

fn oid(raw: i32) -> ObjectId {
    ObjectId::new(raw).unwrap()
}

fn dumper(root: &Path) -> SceneDumper {
    SceneDumper::new(DumpConfig {
        output_dir: Some(root.to_path_buf()),
        ..DumpConfig::default()
    })
    .unwrap()
}

fn file_count(dir: &Path) -> usize {
    fs::read_dir(dir).unwrap().count()
}

fn game_type(name: &str) -> QualName {
    QualName::new("Game.Core", Some("My.Game"), name)
}

fn quad() -> MeshAsset {
    let mut mesh = MeshAsset::new("Quad");
    mesh.positions = vec![
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::new(1.0, 1.0, 0.0),
        Vec3::new(0.0, 1.0, 0.0),
    ];
    mesh.normals = vec![Vec3::Z; 4];
    mesh.uv0 = vec![
        Vec2::new(0.0, 0.0),
        Vec2::new(1.0, 0.0),
        Vec2::new(1.0, 1.0),
        Vec2::new(0.0, 1.0),
    ];
    mesh.submeshes = vec![vec![0, 1, 2, 0, 2, 3]];
    mesh
}

/// One object carrying a transform, rendered geometry and a scripted
/// behavior, with the mesh, material and texture assets behind them.
fn crate_scene() -> Scene {
    let mut scene = Scene::new();
    scene.types_mut().register(
        TypeDescriptor::class(game_type("Spin"))
            .engine_object()
            .with_field(FieldDescriptor::new(
                "speed",
                TypeRef::Primitive(Primitive::Float),
            )),
    );

    scene.insert_object(
        GameObject::new(oid(1), "Crate")
            .with_component(oid(4))
            .with_component(oid(33))
            .with_component(oid(23))
            .with_component(oid(10)),
    );
    scene.insert_component(Component::new(
        oid(4),
        oid(1),
        ComponentKind::Transform(Transform::default()),
    ));
    scene.insert_component(Component::new(
        oid(33),
        oid(1),
        ComponentKind::MeshFilter(MeshFilter {
            mesh: Some(oid(400)),
        }),
    ));
    scene.insert_component(Component::new(
        oid(23),
        oid(1),
        ComponentKind::MeshRenderer(MeshRenderer {
            materials: vec![Some(oid(500))],
            ..MeshRenderer::default()
        }),
    ));
    scene.insert_component(Component::new(
        oid(10),
        oid(1),
        ComponentKind::Behavior(
            Behavior::new(game_type("Spin"))
                .with_field(LiveField::new("speed", FieldValue::Float(0.5))),
        ),
    ));

    scene.insert_mesh(oid(400), quad());
    let mut material = MaterialAsset::new("CrateSkin", "Standard");
    material
        .textures
        .insert("_MainTex".to_string(), TextureBinding::new(Some(oid(600))));
    scene.insert_material(oid(500), material);
    scene.insert_texture(
        oid(600),
        TextureAsset::new("CrateTex", 2, 2, PixelFormat::Rgba32, vec![128; 16]),
    );
    scene
}

#[test]
fn full_scene_lands_document_assets_and_skeletons() {
    let tmp = TempDir::new().unwrap();
    let scene = crate_scene();
    let mut dumper = dumper(tmp.path());
    dumper.add_object(&scene, oid(1)).unwrap();
    let text = dumper.render();

    // The document itself.
    assert!(text.starts_with("%YAML 1.1\n%TAG !u! tag:unity3d.com,2011:\n--- !u!"));
    for anchor in [
        "--- !u!1 &1\nGameObject:\n",
        "--- !u!4 &4\nTransform:\n",
        "--- !u!33 &33\nMeshFilter:\n",
        "--- !u!23 &23\nMeshRenderer:\n",
        "--- !u!114 &10\nMonoBehaviour:\n",
    ] {
        assert_eq!(text.matches(anchor).count(), 1, "{anchor}");
    }
    assert!(text.contains("  speed: 0.5\n"));

    // One obj, one mat, one png, each with its sidecar.
    assert_eq!(file_count(&tmp.path().join("models")), 2);
    assert_eq!(file_count(&tmp.path().join("materials")), 2);
    assert_eq!(file_count(&tmp.path().join("textures")), 2);

    // The skeleton's digest is the script guid in the document.
    let skeleton = tmp.path().join("Game.Core/My.Game/Spin.cs");
    assert!(skeleton.is_file());
    let digest = ContentDigest::from_text("My.Game.Spin");
    assert!(text.contains(&format!(
        "  m_Script: {{fileID: 11500000, guid: {digest}, type: 3}}\n"
    )));
}

#[test]
fn document_guids_name_the_files_on_disk() {
    let tmp = TempDir::new().unwrap();
    let scene = crate_scene();
    let mut dumper = dumper(tmp.path());
    dumper.add_object(&scene, oid(1)).unwrap();
    let text = dumper.render();

    let mesh_guid = capture(&text, "m_Mesh: {fileID: 4300002, guid: ", ",");
    assert!(tmp.path().join(format!("models/{mesh_guid}.obj")).is_file());
    assert!(
        tmp.path()
            .join(format!("models/{mesh_guid}.obj.meta"))
            .is_file()
    );

    let material_guid = capture(&text, "\"guid\":\"", "\"");
    assert!(
        tmp.path()
            .join(format!("materials/{material_guid}.mat"))
            .is_file()
    );
    // The material pulled its texture along.
    let material_text =
        fs::read_to_string(tmp.path().join(format!("materials/{material_guid}.mat"))).unwrap();
    let texture_guid = capture(&material_text, "\"guid\":\"", "\"");
    assert!(
        tmp.path()
            .join(format!("textures/{texture_guid}.png"))
            .is_file()
    );
}

/// First substring between `start` and the next `end` after it.
fn capture(text: &str, start: &str, end: &str) -> String {
    let from = text.find(start).expect(start) + start.len();
    let len = text[from..].find(end).expect(end);
    text[from..from + len].to_string()
}

#[test]
fn repeated_runs_share_identical_asset_files() {
    let tmp = TempDir::new().unwrap();
    let scene = crate_scene();

    // First session: everything lands on disk.
    let first = {
        let mut dumper = dumper(tmp.path());
        dumper.add_object(&scene, oid(1)).unwrap();
        dumper.render()
    };

    // Second session over the same root: same document, no new files.
    let second = {
        let mut dumper = dumper(tmp.path());
        dumper.add_object(&scene, oid(1)).unwrap();
        dumper.render()
    };

    assert_eq!(first, second);
    assert_eq!(file_count(&tmp.path().join("models")), 2);
    assert_eq!(file_count(&tmp.path().join("materials")), 2);
    assert_eq!(file_count(&tmp.path().join("textures")), 2);
    assert_eq!(file_count(&tmp.path().join("Game.Core/My.Game")), 2);
}

#[test]
fn identical_geometry_under_two_ids_shares_one_file_pair() {
    let tmp = TempDir::new().unwrap();
    let mut scene = Scene::new();
    for (object, filter, mesh) in [(1, 33, 400), (2, 34, 401)] {
        scene.insert_object(GameObject::new(oid(object), "Crate").with_component(oid(filter)));
        scene.insert_component(Component::new(
            oid(filter),
            oid(object),
            ComponentKind::MeshFilter(MeshFilter {
                mesh: Some(oid(mesh)),
            }),
        ));
        scene.insert_mesh(oid(mesh), quad());
    }

    let mut dumper = dumper(tmp.path());
    dumper.add_object(&scene, oid(1)).unwrap();
    dumper.add_object(&scene, oid(2)).unwrap();
    let text = dumper.render();

    // Two filter records, one guid, one obj + meta pair.
    let guid = capture(&text, "m_Mesh: {fileID: 4300002, guid: ", ",");
    assert_eq!(text.matches(&guid).count(), 2);
    assert_eq!(file_count(&tmp.path().join("models")), 2);
}

#[test]
fn shared_mesh_and_material_write_a_single_pair_each() {
    let tmp = TempDir::new().unwrap();
    let mut scene = Scene::new();

    let mut mesh = MeshAsset::new("Hull");
    for i in 0..100 {
        let t = i as f32 * 0.1;
        mesh.positions.push(Vec3::new(t.sin(), t.cos(), t));
        mesh.normals.push(Vec3::Y);
        mesh.uv0.push(Vec2::new(t, 1.0 - t));
    }
    mesh.submeshes = vec![(1..99).flat_map(|i| [0, i, i + 1]).collect()];
    scene.insert_mesh(oid(400), mesh);
    scene.insert_material(oid(500), MaterialAsset::new("HullSkin", "Standard"));

    // Two objects share both assets.
    for (object, filter, renderer) in [(1, 33, 23), (2, 34, 24)] {
        scene.insert_object(
            GameObject::new(oid(object), "Hull")
                .with_component(oid(filter))
                .with_component(oid(renderer)),
        );
        scene.insert_component(Component::new(
            oid(filter),
            oid(object),
            ComponentKind::MeshFilter(MeshFilter {
                mesh: Some(oid(400)),
            }),
        ));
        scene.insert_component(Component::new(
            oid(renderer),
            oid(object),
            ComponentKind::MeshRenderer(MeshRenderer {
                materials: vec![Some(oid(500))],
                ..MeshRenderer::default()
            }),
        ));
    }

    let mut dumper = dumper(tmp.path());
    dumper.add_object(&scene, oid(1)).unwrap();
    dumper.add_object(&scene, oid(2)).unwrap();
    let text = dumper.render();

    // The second dump of each asset reuses the digest of the first.
    let mesh_guid = capture(&text, "m_Mesh: {fileID: 4300002, guid: ", ",");
    assert_eq!(text.matches(&mesh_guid).count(), 2);
    let material_guid = capture(&text, "\"guid\":\"", "\"");
    assert_eq!(text.matches(&material_guid).count(), 2);

    assert_eq!(file_count(&tmp.path().join("models")), 2);
    assert_eq!(file_count(&tmp.path().join("materials")), 2);
}

#[test]
fn cyclic_field_references_terminate() {
    let tmp = TempDir::new().unwrap();
    let mut scene = Scene::new();
    for name in ["Ping", "Pong"] {
        scene
            .types_mut()
            .register(TypeDescriptor::class(game_type(name)).engine_object());
    }
    scene.insert_object(GameObject::new(oid(1), "A").with_component(oid(10)));
    scene.insert_object(GameObject::new(oid(2), "B").with_component(oid(20)));
    scene.insert_component(Component::new(
        oid(10),
        oid(1),
        ComponentKind::Behavior(
            Behavior::new(game_type("Ping"))
                .with_field(LiveField::new("other", FieldValue::ObjectRef(Some(oid(20))))),
        ),
    ));
    scene.insert_component(Component::new(
        oid(20),
        oid(2),
        ComponentKind::Behavior(
            Behavior::new(game_type("Pong"))
                .with_field(LiveField::new("other", FieldValue::ObjectRef(Some(oid(10))))),
        ),
    ));

    let mut dumper = dumper(tmp.path());
    dumper.add_object(&scene, oid(1)).unwrap();
    let text = dumper.render();

    // Each side of the cycle appears exactly once, referencing the other.
    assert_eq!(text.matches("--- !u!114 &10\n").count(), 1);
    assert_eq!(text.matches("--- !u!114 &20\n").count(), 1);
    assert_eq!(text.matches("--- !u!1 &1\n").count(), 1);
    assert_eq!(text.matches("--- !u!1 &2\n").count(), 1);
    assert!(text.contains("  other: {\"fileID\":20}\n"));
    assert!(text.contains("  other: {\"fileID\":10}\n"));
}

#[test]
fn behavior_type_closure_is_dumped_once_per_type() {
    let tmp = TempDir::new().unwrap();
    let mut scene = Scene::new();
    scene.types_mut().register(
        TypeDescriptor::class(game_type("Carrier"))
            .engine_object()
            .with_field(FieldDescriptor::new(
                "payload",
                TypeRef::named(game_type("Payload")),
            )),
    );
    scene.types_mut().register(
        TypeDescriptor::class(game_type("Payload"))
            .serializable()
            .with_field(FieldDescriptor::new(
                "weight",
                TypeRef::named(game_type("Density")),
            )),
    );
    scene.types_mut().register(
        TypeDescriptor::class(game_type("Density"))
            .serializable()
            .with_field(FieldDescriptor::new(
                "value",
                TypeRef::Primitive(Primitive::Float),
            )),
    );
    for (object, component) in [(1, 10), (2, 11)] {
        scene.insert_object(GameObject::new(oid(object), "Hauler").with_component(oid(component)));
        scene.insert_component(Component::new(
            oid(component),
            oid(object),
            ComponentKind::Behavior(Behavior::new(game_type("Carrier"))),
        ));
    }

    let mut dumper = dumper(tmp.path());
    dumper.add_object(&scene, oid(1)).unwrap();
    dumper.add_object(&scene, oid(2)).unwrap();
    let text = dumper.render();

    // Three types, one file pair each, even with two live instances.
    let dir = tmp.path().join("Game.Core/My.Game");
    assert_eq!(file_count(&dir), 6);
    for name in ["Carrier", "Payload", "Density"] {
        assert!(dir.join(format!("{name}.cs")).is_file(), "{name}");
    }

    // Both instances share the Carrier digest.
    let digest = ContentDigest::from_text("My.Game.Carrier");
    let script = format!("guid: {digest}, type: 3}}");
    assert_eq!(text.matches(&script).count(), 2);
}
