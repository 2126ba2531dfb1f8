// thiserror's #[error("...{field}...")] format strings reference struct fields,
// but the compiler doesn't see through the derive macro and reports false positives.
#![allow(unused_assignments)]

//! # unearth
//!
//! Runtime scene extraction: walks a captured scene graph and turns it into a
//! text document plus content-addressed asset files and compilable type
//! skeletons, so a live scene can be rebuilt in an editor.
//!
//! ## Architecture
//!
//! - **Scene model** (`scene`): inert captured state: objects, components,
//!   mesh/material/texture payloads
//! - **Document serializer** (`dump`): recursive traversal with dedup,
//!   rendering one record per reached object
//! - **Asset caches** (`cache`): content-addressed OBJ, material and PNG
//!   files, each written at most once per digest
//! - **Skeleton generator** (`skeleton`): C# source skeletons for behavior
//!   types, closed over their field references
//! - **Identity** (`ident`): transient in-document ids vs. durable content
//!   digests
//!
//! ## Library usage
//!
//! ```no_run
//! use unearth::dump::{DumpConfig, SceneDumper};
//! use unearth::ident::ObjectId;
//! use unearth::scene::{GameObject, Scene};
//!
//! let mut scene = Scene::new();
//! let root = ObjectId::new(1).unwrap();
//! scene.insert_object(GameObject::new(root, "Level"));
//!
//! let mut dumper = SceneDumper::new(DumpConfig {
//!     output_dir: Some("extracted".into()),
//!     ..DumpConfig::default()
//! })
//! .unwrap();
//! dumper.add_object(&scene, root).unwrap();
//! std::fs::write("extracted/level.unity", dumper.render()).unwrap();
//! ```

pub mod cache;
pub mod dump;
pub mod error;
pub mod ident;
pub mod paths;
pub mod reflect;
pub mod scene;
pub mod skeleton;
