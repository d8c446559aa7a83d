use chrono::{DateTime, Utc};

/// A single still frame captured from the camera.
///
/// The registry keeps one most-recent snapshot; each capture overwrites it,
/// no history is retained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// Encoded JPEG bytes as written by the encoder.
    pub data: Vec<u8>,
    /// Dimensions the capture was requested at.
    pub width: u32,
    pub height: u32,
    pub captured_at: DateTime<Utc>,
}

impl Snapshot {
    pub fn new(data: Vec<u8>, width: u32, height: u32) -> Self {
        Self {
            data,
            width,
            height,
            captured_at: Utc::now(),
        }
    }
}
