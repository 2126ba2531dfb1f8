//! Rich diagnostic error types for the extraction engine.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]` derives,
//! providing error codes, help text, and source chains. Recoverable conditions
//! (ineligible types, null references, unknown shaders) never become errors;
//! they are absorbed where detected. These types cover only the fatal ones:
//! identity conflicts and I/O or encoding failures.

use miette::Diagnostic;
use thiserror::Error;

/// Top-level error type for the extraction engine.
///
/// Each variant wraps a subsystem-specific error, preserving the full diagnostic
/// chain (error codes, help text, source chains) through to the user.
#[derive(Debug, Error, Diagnostic)]
pub enum UnearthError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Skeleton(#[from] SkeletonError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Asset(#[from] AssetError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Path(#[from] crate::paths::PathError),
}

// ---------------------------------------------------------------------------
// Skeleton generator errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum SkeletonError {
    #[error("identity conflict: {path} belongs to {existing}, cannot dump {requested}")]
    #[diagnostic(
        code(unearth::skeleton::conflict),
        help(
            "Two distinct types map to the same skeleton file path. The file on \
             disk is never silently overwritten. Rename one of the types, or \
             point the dump at a fresh output directory."
        )
    )]
    IdentityConflict {
        path: String,
        existing: String,
        requested: String,
    },

    #[error("skeleton I/O error: {path}")]
    #[diagnostic(
        code(unearth::skeleton::io),
        help(
            "A skeleton file or its directory could not be read or written. \
             Check that the output root exists and has write permissions."
        )
    )]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type SkeletonResult<T> = std::result::Result<T, SkeletonError>;

// ---------------------------------------------------------------------------
// Asset cache errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum AssetError {
    #[error("asset I/O error: {path}")]
    #[diagnostic(
        code(unearth::asset::io),
        help(
            "An asset file or its directory could not be written. Check that \
             the output root exists, has write permissions, and the disk is \
             not full."
        )
    )]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("image encode error: {message}")]
    #[diagnostic(
        code(unearth::asset::encode),
        help("The readback pixels could not be encoded. This usually indicates a corrupt pixel buffer.")
    )]
    Encode { message: String },

    #[error("pixel buffer size mismatch: expected {expected} bytes, got {actual}")]
    #[diagnostic(
        code(unearth::asset::pixel_data),
        help(
            "The texture's raw data does not match its declared width, height, \
             and format. The host bridge that captured the texture is handing \
             over a truncated or mis-sized buffer."
        )
    )]
    PixelData { expected: usize, actual: usize },
}

pub type AssetResult<T> = std::result::Result<T, AssetError>;

/// Convenience alias for functions returning extraction results.
pub type UnearthResult<T> = std::result::Result<T, UnearthError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skeleton_error_converts_to_unearth_error() {
        let err = SkeletonError::IdentityConflict {
            path: "out/My/Widget.cs".into(),
            existing: "My.Widget".into(),
            requested: "Other.Widget".into(),
        };
        let top: UnearthError = err.into();
        assert!(matches!(
            top,
            UnearthError::Skeleton(SkeletonError::IdentityConflict { .. })
        ));
    }

    #[test]
    fn asset_error_converts_to_unearth_error() {
        let err = AssetError::PixelData {
            expected: 16,
            actual: 4,
        };
        let top: UnearthError = err.into();
        assert!(matches!(
            top,
            UnearthError::Asset(AssetError::PixelData { .. })
        ));
    }

    #[test]
    fn error_display_messages_are_descriptive() {
        let err = SkeletonError::IdentityConflict {
            path: "out/My/Widget.cs".into(),
            existing: "My.Widget".into(),
            requested: "Other.Widget".into(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("My.Widget"));
        assert!(msg.contains("Other.Widget"));
        assert!(msg.contains("out/My/Widget.cs"));
    }
}
