//! Persisted build progress.
//!
//! Format: 14-byte header (magic u32, version u16, crc32 u32, payload_len u32,
//! all little-endian) followed by a zstd-compressed JSON [`BuildState`].

use std::fs;
use std::path::Path;

use blockwright_core::BlockPos;
use serde::{Deserialize, Serialize};

use crate::{BuildingItemRecord, PersistError};

/// Magic number for build state files ("BWST").
pub const STATE_MAGIC: u32 = 0x4257_5354;
/// Current state file version.
pub const STATE_VERSION: u16 = 1;

const HEADER_SIZE: usize = 14;
const ZSTD_LEVEL: i32 = 3;

/// Progress sets and in-flight items of one build.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildState {
    /// Cells approved for clearing.
    #[serde(rename = "clearList", default)]
    pub clear_list: Vec<BlockPos>,
    /// Cells approved for placement or found already correct.
    #[serde(rename = "builtList", default)]
    pub built_list: Vec<BlockPos>,
    /// Items still travelling when the state was taken.
    #[serde(rename = "buildersInAction", default)]
    pub builders_in_action: Vec<BuildingItemRecord>,
}

impl BuildState {
    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String, PersistError> {
        serde_json::to_string(self).map_err(PersistError::Encode)
    }

    /// Parse from JSON; absent fields are empty.
    pub fn from_json(json: &str) -> Result<Self, PersistError> {
        serde_json::from_str(json).map_err(PersistError::Decode)
    }
}

/// Region header preceding the compressed payload.
#[derive(Debug, Clone, Copy)]
struct StateHeader {
    magic: u32,
    version: u16,
    crc32: u32,
    payload_len: u32,
}

impl StateHeader {
    fn to_bytes(self) -> [u8; HEADER_SIZE] {
        let mut bytes = [0u8; HEADER_SIZE];
        bytes[0..4].copy_from_slice(&self.magic.to_le_bytes());
        bytes[4..6].copy_from_slice(&self.version.to_le_bytes());
        bytes[6..10].copy_from_slice(&self.crc32.to_le_bytes());
        bytes[10..14].copy_from_slice(&self.payload_len.to_le_bytes());
        bytes
    }

    fn from_bytes(bytes: &[u8; HEADER_SIZE]) -> Self {
        Self {
            magic: u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
            version: u16::from_le_bytes([bytes[4], bytes[5]]),
            crc32: u32::from_le_bytes([bytes[6], bytes[7], bytes[8], bytes[9]]),
            payload_len: u32::from_le_bytes([bytes[10], bytes[11], bytes[12], bytes[13]]),
        }
    }
}

/// Encode `state` into the on-disk byte layout.
pub fn encode_state(state: &BuildState) -> Result<Vec<u8>, PersistError> {
    let json = serde_json::to_vec(state).map_err(PersistError::Encode)?;
    let payload = zstd::encode_all(&json[..], ZSTD_LEVEL).map_err(PersistError::Compression)?;
    let header = StateHeader {
        magic: STATE_MAGIC,
        version: STATE_VERSION,
        crc32: crc32fast::hash(&payload),
        payload_len: payload.len() as u32,
    };
    let mut bytes = Vec::with_capacity(HEADER_SIZE + payload.len());
    bytes.extend_from_slice(&header.to_bytes());
    bytes.extend_from_slice(&payload);
    Ok(bytes)
}

/// Decode bytes produced by [`encode_state`], validating header and checksum.
pub fn decode_state(bytes: &[u8]) -> Result<BuildState, PersistError> {
    let header_bytes: &[u8; HEADER_SIZE] = bytes
        .get(..HEADER_SIZE)
        .and_then(|slice| slice.try_into().ok())
        .ok_or(PersistError::Truncated {
            expected: HEADER_SIZE,
            found: bytes.len(),
        })?;
    let header = StateHeader::from_bytes(header_bytes);

    if header.magic != STATE_MAGIC {
        return Err(PersistError::BadMagic {
            expected: STATE_MAGIC,
            found: header.magic,
        });
    }
    if header.version != STATE_VERSION {
        return Err(PersistError::UnsupportedVersion(header.version));
    }

    let expected = HEADER_SIZE + header.payload_len as usize;
    let payload = bytes
        .get(HEADER_SIZE..expected)
        .ok_or(PersistError::Truncated {
            expected,
            found: bytes.len(),
        })?;

    let found = crc32fast::hash(payload);
    if found != header.crc32 {
        return Err(PersistError::ChecksumMismatch {
            expected: header.crc32,
            found,
        });
    }

    let json = zstd::decode_all(payload).map_err(PersistError::Compression)?;
    serde_json::from_slice(&json).map_err(PersistError::Decode)
}

/// Write `state` to `path`, replacing any previous file.
pub fn save_state_file(path: &Path, state: &BuildState) -> Result<(), PersistError> {
    let bytes = encode_state(state)?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, bytes)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

/// Read a state file written by [`save_state_file`].
pub fn load_state_file(path: &Path) -> Result<BuildState, PersistError> {
    let bytes = fs::read(path)?;
    decode_state(&bytes)
}
