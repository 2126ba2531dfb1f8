//! Type skeleton generation.
//!
//! Behaviors captured from a live scene reference script types the consuming
//! editor has never seen. [`SkeletonGenerator`] regenerates a minimal source
//! declaration for each such type: enough fields and shape for the dumped
//! data to be reloaded, no method bodies. Each skeleton file starts with a
//! machine-parseable header line carrying the type's qualified name and its
//! content digest; the digest doubles as the script guid that document
//! records reference, so it must stay stable across runs. The header is what
//! makes that work: a later run parses it back instead of renumbering.
//!
//! Discovery is breadth-first. Rendering one type collects every type it
//! references (base, generic arguments, field types, nested declarations)
//! into a work queue, and the queue is drained until the transitive closure
//! is on disk. A visited set guarantees each root type is processed at most
//! once per generator lifetime.

mod csharp;

use std::collections::{HashMap, HashSet, VecDeque};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, trace};

use crate::error::{SkeletonError, SkeletonResult};
use crate::ident::ContentDigest;
use crate::paths::OutputPaths;
use crate::reflect::{QualName, TypeDescriptor, TypeRef, TypeRegistry};

/// Engine value types that field declarations may reference even though no
/// descriptor for them is ever captured.
const WHITELISTED_TYPES: [&str; 10] = [
    "UnityEngine.AnimationCurve",
    "UnityEngine.AudioSource",
    "UnityEngine.AudioClip",
    "UnityEngine.Vector2",
    "UnityEngine.Vector3",
    "UnityEngine.Vector4",
    "UnityEngine.Matrix4x4",
    "UnityEngine.Color",
    "UnityEngine.Rect",
    "UnityEngine.LayerMask",
];

static HEADER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"typeof\((.+?)\), *"(.+?)""#).expect("header pattern compiles")
});

/// Regenerates source skeletons for captured script types.
///
/// Owns the visited set and the pending-reference queue for one output tree.
/// Skeleton files land under the output root, nested by assembly (optional)
/// and namespace, one directory per dotted namespace.
#[derive(Debug)]
pub struct SkeletonGenerator {
    paths: OutputPaths,
    assembly_subfolder: bool,
    visited: HashSet<String>,
    queue: VecDeque<TypeRef>,
    denylist: HashSet<String>,
}

impl SkeletonGenerator {
    pub fn new(root: impl Into<PathBuf>, assembly_subfolder: bool) -> Self {
        Self {
            paths: OutputPaths::new(root),
            assembly_subfolder,
            visited: HashSet::new(),
            queue: VecDeque::new(),
            denylist: HashSet::new(),
        }
    }

    /// Exclude a qualified type name from dumping and from field references.
    pub fn deny(&mut self, qualified: impl Into<String>) {
        self.denylist.insert(qualified.into());
    }

    /// Dump `ty` and its transitive reference closure, skipping anything
    /// already visited in this generator's lifetime.
    ///
    /// The requested type is resolved to its array-stripped root: arrays dump
    /// their element type, nested types their outermost declaring type, and a
    /// constructed generic dumps its open definition while each bound type
    /// argument is queued for its own dump.
    ///
    /// Returns `None` when the root was already visited, is ineligible, or
    /// was never captured in `registry`. Otherwise returns the digest of
    /// every type written by this call, keyed by qualified name.
    pub fn dump_if_missing(
        &mut self,
        registry: &TypeRegistry,
        ty: &TypeRef,
    ) -> SkeletonResult<Option<HashMap<String, ContentDigest>>> {
        let Some(root) = resolve_root(ty, &mut self.queue) else {
            return Ok(None);
        };
        let key = root.qualified();
        if !self.visited.insert(key.clone()) || !self.should_dump(&root) {
            trace!(ty = %key, "skip type");
            return Ok(None);
        }
        let Some(desc) = registry.get_qualified(&key) else {
            trace!(ty = %key, "type not captured in registry");
            return Ok(None);
        };

        let mut digests = HashMap::new();
        digests.insert(key, self.dump_type(registry, desc)?);

        // Drain everything discovered while rendering, breadth-first, until
        // the reference closure is complete.
        while let Some(pending) = self.queue.pop_front() {
            let Some(root) = resolve_root(&pending, &mut self.queue) else {
                continue;
            };
            let key = root.qualified();
            if !self.visited.insert(key.clone()) || !self.should_dump(&root) {
                continue;
            }
            let Some(desc) = registry.get_qualified(&key) else {
                trace!(ty = %key, "referenced type not captured in registry");
                continue;
            };
            digests.insert(key, self.dump_type(registry, desc)?);
        }

        Ok(Some(digests))
    }

    /// Walk the output root for previously generated skeletons and seed the
    /// visited set from their headers.
    ///
    /// Returns the recovered qualified-name to digest mapping so the caller
    /// can seed its own reference cache. Files without a parseable header are
    /// ignored; they will be regenerated on the next dump request.
    pub fn scan_existing(&mut self) -> SkeletonResult<HashMap<String, ContentDigest>> {
        let mut recovered = HashMap::new();
        if !self.paths.root.exists() {
            return Ok(recovered);
        }

        let mut stack = vec![self.paths.root.clone()];
        while let Some(dir) = stack.pop() {
            let entries = fs::read_dir(&dir).map_err(|source| SkeletonError::Io {
                path: dir.display().to_string(),
                source,
            })?;
            for entry in entries {
                let entry = entry.map_err(|source| SkeletonError::Io {
                    path: dir.display().to_string(),
                    source,
                })?;
                let path = entry.path();
                if path.is_dir() {
                    stack.push(path);
                } else if path.extension().is_some_and(|ext| ext == "cs") {
                    if let Some((name, digest)) = Self::recover_identity(&path)? {
                        self.visited.insert(name.clone());
                        recovered.insert(name, digest);
                    }
                }
            }
        }

        Ok(recovered)
    }

    /// Parse the identity header of an existing skeleton file.
    ///
    /// `None` means the file is absent or its header cannot be trusted
    /// (missing, malformed name capture, or a digest that is not 32 hex
    /// characters); the caller regenerates in that case.
    pub fn recover_identity(path: &Path) -> SkeletonResult<Option<(String, ContentDigest)>> {
        if !path.exists() {
            return Ok(None);
        }
        let text = fs::read_to_string(path).map_err(|source| SkeletonError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let Some(first) = text.lines().next() else {
            return Ok(None);
        };
        let Some(caps) = HEADER_PATTERN.captures(first) else {
            debug!(path = %path.display(), "skeleton file has no parseable header");
            return Ok(None);
        };
        let name = caps[1].to_string();
        match ContentDigest::parse(&caps[2]) {
            Some(digest) => Ok(Some((name, digest))),
            None => {
                debug!(path = %path.display(), "skeleton header digest is malformed");
                Ok(None)
            }
        }
    }

    fn dump_type(
        &mut self,
        registry: &TypeRegistry,
        desc: &TypeDescriptor,
    ) -> SkeletonResult<ContentDigest> {
        trace!(ty = %desc.name, "dump type");
        let (source, refs) = self.render_source(registry, desc);
        self.queue.extend(refs);

        let dir = self.paths.skeleton_dir(
            self.assembly_subfolder
                .then_some(desc.name.assembly.as_str()),
            desc.name.namespace.as_deref(),
        );
        fs::create_dir_all(&dir).map_err(|source| SkeletonError::Io {
            path: dir.display().to_string(),
            source,
        })?;

        let file = dir.join(source_file_name(desc));
        let qualified = desc.name.qualified();
        let digest = match Self::recover_identity(&file)? {
            Some((existing, digest)) if existing == qualified => digest,
            Some((existing, _)) => {
                return Err(SkeletonError::IdentityConflict {
                    path: file.display().to_string(),
                    existing,
                    requested: qualified,
                });
            }
            None => ContentDigest::from_text(&qualified),
        };

        let header = format!("// {{ typeof({qualified}), \"{digest}\" }}");
        write_file(&file, &format!("{header}\n{source}"))?;
        write_file(&sidecar_path(&file), &mono_importer_meta(&digest))?;
        Ok(digest)
    }

    /// Eligibility for dumping: engine and platform types never get
    /// skeletons, and the denylist excludes by qualified name.
    fn should_dump(&self, name: &QualName) -> bool {
        let assembly = name.assembly.as_str();
        if assembly.starts_with("UnityEngine")
            || assembly == "mscorlib"
            || assembly.starts_with("System")
        {
            return false;
        }
        if let Some(ns) = &name.namespace {
            if ns.starts_with("UnityEngine") || ns.starts_with("TMPro") {
                return false;
            }
        }
        !self.denylist.contains(&name.qualified())
    }

    /// Whether a field of this declared type can appear in a skeleton body.
    ///
    /// Checked on the array-stripped element type. Generic fields are never
    /// emitted; they cannot be reloaded generically.
    fn field_type_referencable(&self, registry: &TypeRegistry, ty: &TypeRef) -> bool {
        match ty.element() {
            TypeRef::Primitive(_) => true,
            TypeRef::Named(name) => {
                let qualified = name.qualified();
                if self.denylist.contains(&qualified) {
                    return false;
                }
                if WHITELISTED_TYPES.contains(&qualified.as_str()) {
                    return true;
                }
                registry
                    .get_qualified(&qualified)
                    .is_some_and(|d| d.is_enum() || d.engine_object || d.serializable_marker)
            }
            TypeRef::Generic { .. } | TypeRef::GenericParam(_) => false,
            TypeRef::Array(_) => unreachable!("element() strips array nesting"),
        }
    }

    /// Whether a nested type is embedded inside its declaring type's
    /// skeleton. Others are skipped, never dumped separately.
    fn should_embed_nested(&self, desc: &TypeDescriptor) -> bool {
        if !self.should_dump(&desc.name) {
            return false;
        }
        if desc.is_public && desc.is_enum() {
            return true;
        }
        desc.is_public && (desc.engine_object || desc.serializable_marker)
    }

    fn base_eligible(&self, base: &TypeRef) -> bool {
        match base.element() {
            TypeRef::Named(name) => self.should_dump(&name.root()),
            TypeRef::Generic { def, .. } => self.should_dump(&def.root()),
            _ => false,
        }
    }
}

/// Resolve a reference to the root type that would actually be dumped:
/// arrays are stripped to their element, nested names walk out to the
/// outermost declaring type, and a constructed generic resolves to its open
/// definition with each bound argument queued separately.
fn resolve_root(ty: &TypeRef, queue: &mut VecDeque<TypeRef>) -> Option<QualName> {
    match ty.element() {
        TypeRef::Named(name) => Some(name.root()),
        TypeRef::Generic { def, args } => {
            for arg in args {
                if !arg.is_generic_param() {
                    queue.push_back(arg.clone());
                }
            }
            Some(def.root())
        }
        _ => None,
    }
}

/// One file per type name; generic arity renders as `(T, U)` because angle
/// brackets are not portable in file names.
fn source_file_name(desc: &TypeDescriptor) -> String {
    if desc.generic_params.is_empty() {
        format!("{}.cs", desc.name.name())
    } else {
        format!("{}({}).cs", desc.name.name(), desc.generic_params.join(", "))
    }
}

fn sidecar_path(path: &Path) -> PathBuf {
    let mut sidecar = path.to_path_buf().into_os_string();
    sidecar.push(".meta");
    PathBuf::from(sidecar)
}

fn write_file(path: &Path, contents: &str) -> SkeletonResult<()> {
    fs::write(path, contents).map_err(|source| SkeletonError::Io {
        path: path.display().to_string(),
        source,
    })
}

fn mono_importer_meta(digest: &ContentDigest) -> String {
    format!(
        concat!(
            "fileFormatVersion: 2\n",
            "guid: {digest}\n",
            "MonoImporter:\n",
            "  externalObjects: {{}}\n",
            "  serializedVersion: 2\n",
            "  defaultReferences: []\n",
            "  executionOrder: 0\n",
            "  icon: {{instanceID: 0}}\n",
            "  userData: \n",
            "  assetBundleName: \n",
            "  assetBundleVariant: \n",
        ),
        digest = digest
    )
}
