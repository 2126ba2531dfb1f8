//! Output directory layout for an extraction run.
//!
//! Provides [`OutputPaths`], the fixed on-disk layout under a caller-supplied
//! root: skeleton sources directly under the root (optionally nested by
//! assembly and namespace), and the three content-addressed asset directories.

use std::path::{Path, PathBuf};

use miette::Diagnostic;
use thiserror::Error;

/// Errors from path resolution.
#[derive(Debug, Error, Diagnostic)]
pub enum PathError {
    #[error("failed to create directory: {path}")]
    #[diagnostic(
        code(unearth::paths::create_dir),
        help("Check that the parent directory exists and you have write permissions.")
    )]
    CreateDir {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type PathResult<T> = std::result::Result<T, PathError>;

/// On-disk layout under one extraction output root.
#[derive(Debug, Clone)]
pub struct OutputPaths {
    /// Caller-supplied root; skeleton sources land here.
    pub root: PathBuf,
    /// `root/models/` for `<digest>.obj` geometry files.
    pub models_dir: PathBuf,
    /// `root/materials/` for `<digest>.mat` documents.
    pub materials_dir: PathBuf,
    /// `root/textures/` for `<digest>.png` images.
    pub textures_dir: PathBuf,
}

impl OutputPaths {
    /// Lay out the standard directories under `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            models_dir: root.join("models"),
            materials_dir: root.join("materials"),
            textures_dir: root.join("textures"),
            root,
        }
    }

    /// Directory a skeleton file belongs in.
    ///
    /// The consuming editor requires one file per type name, so namespaces are
    /// simulated with directories; the dotted namespace becomes a single
    /// directory component. The assembly level is optional and exists so
    /// downstream assembly-definition tooling can split the output.
    pub fn skeleton_dir(&self, assembly: Option<&str>, namespace: Option<&str>) -> PathBuf {
        let mut dir = self.root.clone();
        if let Some(assembly) = assembly {
            dir.push(assembly);
        }
        if let Some(namespace) = namespace {
            dir.push(namespace);
        }
        dir
    }

    /// Create all base directories. Idempotent.
    pub fn ensure_dirs(&self) -> PathResult<()> {
        for dir in [
            &self.root,
            &self.models_dir,
            &self.materials_dir,
            &self.textures_dir,
        ] {
            create_dir(dir)?;
        }
        Ok(())
    }
}

pub(crate) fn create_dir(dir: &Path) -> PathResult<()> {
    std::fs::create_dir_all(dir).map_err(|e| PathError::CreateDir {
        path: dir.display().to_string(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_derives_from_root() {
        let paths = OutputPaths::new("/out/extract");
        assert_eq!(paths.root, PathBuf::from("/out/extract"));
        assert_eq!(paths.models_dir, PathBuf::from("/out/extract/models"));
        assert_eq!(paths.materials_dir, PathBuf::from("/out/extract/materials"));
        assert_eq!(paths.textures_dir, PathBuf::from("/out/extract/textures"));
    }

    #[test]
    fn skeleton_dir_nests_assembly_then_namespace() {
        let paths = OutputPaths::new("/out");
        assert_eq!(
            paths.skeleton_dir(Some("Game.Core"), Some("My.Game.Ai")),
            PathBuf::from("/out/Game.Core/My.Game.Ai")
        );
        assert_eq!(
            paths.skeleton_dir(None, Some("My.Game")),
            PathBuf::from("/out/My.Game")
        );
        assert_eq!(paths.skeleton_dir(None, None), PathBuf::from("/out"));
    }

    #[test]
    fn ensure_dirs_is_idempotent() {
        let tmp = tempfile::TempDir::new().unwrap();
        let paths = OutputPaths::new(tmp.path().join("run"));
        paths.ensure_dirs().unwrap();
        paths.ensure_dirs().unwrap();
        assert!(paths.models_dir.is_dir());
        assert!(paths.materials_dir.is_dir());
        assert!(paths.textures_dir.is_dir());
    }
}
