use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const SCHEMA: u32 = 1;

#[derive(Debug, Error)]
pub enum ReproError {
    #[error("failed to encode record: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Inputs needed to reproduce a headless run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecordMeta {
    pub schema: u32,
    /// Full generator configuration, as the application serialized it.
    pub config: serde_json::Value,
    pub fixed_dt: f64,
    pub frames: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ShiftEvent {
    pub frame: u32,
    pub back_row: i32,
    pub front_row: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Record {
    pub meta: RecordMeta,
    pub shifts: Vec<ShiftEvent>,
    #[serde(default)]
    pub final_digest: String,
}

impl Record {
    pub fn new(meta: RecordMeta) -> Self {
        Self {
            meta,
            shifts: Vec::new(),
            final_digest: String::new(),
        }
    }

    pub fn push_shift(&mut self, frame: u32, back_row: i32, front_row: i32) {
        self.shifts.push(ShiftEvent {
            frame,
            back_row,
            front_row,
        });
    }

    pub fn canonical_json(&self) -> Result<String, ReproError> {
        let bytes = canonical_json_bytes(self)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    pub fn hash_hex(&self) -> Result<String, ReproError> {
        hash_record(self)
    }
}

/// Serializes with sorted object keys and a trailing LF.
pub fn canonical_json_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, ReproError> {
    // serde_json's Map is ordered by key unless `preserve_order` is enabled.
    let sorted = serde_json::to_value(value)?;
    let mut bytes = serde_json::to_vec(&sorted)?;
    bytes.push(b'\n');
    Ok(bytes)
}

pub fn hash_record(rec: &Record) -> Result<String, ReproError> {
    let bytes = canonical_json_bytes(rec)?;
    Ok(blake3::hash(&bytes).to_hex().to_string())
}

/// blake3 over the little-endian bytes of a vertex/triangle buffer pair.
pub fn window_digest(vertices: &[[f32; 3]], triangles: &[[u32; 3]]) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(&(vertices.len() as u64).to_le_bytes());
    for v in vertices {
        for c in v {
            hasher.update(&c.to_le_bytes());
        }
    }
    hasher.update(&(triangles.len() as u64).to_le_bytes());
    for t in triangles {
        for i in t {
            hasher.update(&i.to_le_bytes());
        }
    }
    hasher.finalize().to_hex().to_string()
}
