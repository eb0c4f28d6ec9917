//! Error types for blueprint loading, scheduling and persisted build state.

use blockwright_core::BlockPos;
use thiserror::Error;

use crate::Energy;

/// Recoverable scheduling outcomes. None of these abort a build.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// The builder cannot pay for the next slot yet; the same slot is offered again later.
    #[error("not enough energy: need {needed}, have {available}")]
    ResourceUnavailable {
        /// Energy the slot costs.
        needed: Energy,
        /// Energy the builder reported.
        available: Energy,
    },
    /// A persisted in-flight item no longer maps onto the blueprint being restored.
    #[error("in-flight item at {pos} does not map onto the current blueprint")]
    UnresolvableCoordinateMapping {
        /// Absolute destination of the dropped item.
        pos: BlockPos,
    },
}

/// Errors emitted while constructing or loading a blueprint.
#[derive(Debug, Error)]
pub enum BlueprintError {
    /// Every dimension must be at least one block.
    #[error("blueprint size {size} must be positive on every axis")]
    EmptySize {
        /// Offending size.
        size: BlockPos,
    },
    /// A placement lies outside `[0, size)`.
    #[error("placement at {pos} lies outside blueprint size {size}")]
    PlacementOutOfBounds {
        /// Relative placement coordinate.
        pos: BlockPos,
        /// Blueprint size.
        size: BlockPos,
    },
    /// Anchoring the blueprint at `origin` puts part of it outside the coordinate range.
    #[error("blueprint of size {size} anchored at {anchor} does not fit at origin {origin}")]
    RegionOverflow {
        /// Requested absolute origin.
        origin: BlockPos,
        /// Blueprint anchor.
        anchor: BlockPos,
        /// Blueprint size.
        size: BlockPos,
    },
    /// Wrap IO errors when reading blueprint files.
    #[error("failed to read blueprint: {0}")]
    Io(#[from] std::io::Error),
    /// Wrap serde parsing issues.
    #[error("failed to parse blueprint: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Persisted build state could not be written or read back.
#[derive(Debug, Error)]
pub enum PersistError {
    /// Wrap IO errors when touching the state file.
    #[error("failed to access build state: {0}")]
    Io(#[from] std::io::Error),
    /// The state could not be serialized.
    #[error("failed to encode build state: {0}")]
    Encode(#[source] serde_json::Error),
    /// The payload is not a valid build state record.
    #[error("malformed build state: {0}")]
    Decode(#[source] serde_json::Error),
    /// zstd failed to compress or decompress the payload.
    #[error("failed to (de)compress build state: {0}")]
    Compression(#[source] std::io::Error),
    /// The file does not start with the state magic number.
    #[error("invalid build state magic: expected 0x{expected:08X}, got 0x{found:08X}")]
    BadMagic {
        /// Magic this build writes.
        expected: u32,
        /// Magic found in the file.
        found: u32,
    },
    /// The file was written by an unknown format version.
    #[error("unsupported build state version {0}")]
    UnsupportedVersion(u16),
    /// The payload checksum does not match the header.
    #[error("CRC32 mismatch: expected {expected:08X}, got {found:08X}")]
    ChecksumMismatch {
        /// Checksum stored in the header.
        expected: u32,
        /// Checksum computed over the payload.
        found: u32,
    },
    /// The file ends before the header or payload does.
    #[error("build state truncated: expected {expected} bytes, got {found}")]
    Truncated {
        /// Bytes required.
        expected: usize,
        /// Bytes available.
        found: usize,
    },
}
