//! Error types.
//!
//! Only load-time problems are surfaced as errors. Render-time conditions
//! (backfaces, out-of-range depth, a full primitive arena) are counted and
//! logged by the renderer but never propagate out of a draw call.

use std::path::PathBuf;

/// Content-integrity problems found while loading or validating assets.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssetError {
    /// Blob ended before a complete record could be read
    #[error("unexpected end of data at offset {offset} (needed {needed} more bytes)")]
    UnexpectedEof { offset: usize, needed: usize },

    /// Armature has more joints than a u8 id with a null sentinel can address
    #[error("armature has {0} joints (maximum is 254)")]
    TooManyJoints(usize),

    /// Joint link points past the end of the joint array
    #[error("joint {joint} links to {link}, but the armature only has {count} joints")]
    InvalidJointLink { joint: u8, link: u8, count: usize },

    /// Joint hierarchy revisits a joint
    #[error("joint hierarchy is not a tree (joint {0} reached twice)")]
    CyclicHierarchy(u8),

    /// Track type tag other than rotation or translation
    #[error("animation track has unsupported type {0}")]
    UnknownTrackType(u8),

    /// Track targets a joint the armature does not have
    #[error("animation track targets joint {joint}, but the armature only has {count} joints")]
    TrackJointOutOfRange { joint: u8, count: usize },

    /// Track without any keys
    #[error("animation track for joint {0} has no keys")]
    EmptyTrack(u8),

    /// Keys not sorted by frame
    #[error("animation track for joint {joint} has key {index} out of frame order")]
    KeysOutOfOrder { joint: u8, index: usize },

    /// Mesh vertex count disagrees with its face counts
    #[error("mesh has {actual} vertices but its face groups need {expected}")]
    VertexCountMismatch { expected: usize, actual: usize },

    /// Mesh is skinned to a joint the model's armature does not have
    #[error("mesh {mesh} follows joint {joint}, but the armature only has {count} joints")]
    MeshJointOutOfRange { mesh: usize, joint: u8, count: usize },

    /// Data continues after the last expected record
    #[error("{0} unexpected trailing bytes")]
    TrailingData(usize),
}

/// Render-time resource problems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    /// Primitive arena for the current parity has no room left
    #[error("primitive arena full ({used} of {capacity} bytes used, {requested} requested)")]
    ArenaFull {
        used: usize,
        capacity: usize,
        requested: usize,
    },

    /// Depth bucket outside the ordering table
    #[error("depth {z} outside ordering table of {size} buckets")]
    DepthOutOfRange { z: i32, size: usize },

    /// Handle from an earlier frame
    #[error("primitive handle from epoch {handle} used in epoch {current}")]
    StaleHandle { handle: u32, current: u32 },
}

/// Renderer configuration loading errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid renderer config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid renderer config: {0}")]
    Invalid(String),
}
