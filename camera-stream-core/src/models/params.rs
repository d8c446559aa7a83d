//! Negotiated session parameters handed over by the protocol stack.
//!
//! These types mirror what the controller negotiates during stream setup:
//! transport endpoints and key material in [`SetupRequest`]/[`SetupResponse`],
//! codec choices in [`VideoParameters`]/[`AudioParameters`]. Codec and level
//! values arrive as raw protocol bytes, so every enum keeps an `Other`
//! variant instead of failing at the decoding boundary — unsupported values
//! are rejected later, when a command is actually built.

use serde::{Deserialize, Serialize};

/// IP version of the controller endpoint, as negotiated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IpVersion {
    V4,
    V6,
    Other(u8),
}

/// Address and ports the controller expects the media stream on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerAddr {
    pub ip: String,
    pub ip_version: IpVersion,
    pub video_rtp_port: u16,
    pub audio_rtp_port: u16,
}

/// SRTP key material for one media direction.
///
/// Rendered as `base64(key || salt)` when passed to the encoder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SrtpKeys {
    pub key: Vec<u8>,
    pub salt: Vec<u8>,
}

impl SrtpKeys {
    /// The encoder's `-srtp_out_params` value: base64 of key followed by salt.
    pub fn to_params(&self) -> String {
        use base64::Engine as _;

        let mut material = Vec::with_capacity(self.key.len() + self.salt.len());
        material.extend_from_slice(&self.key);
        material.extend_from_slice(&self.salt);
        base64::engine::general_purpose::STANDARD.encode(material)
    }
}

/// Endpoints requested by the controller during stream setup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetupRequest {
    pub session_id: String,
    pub controller_addr: ControllerAddr,
    pub video_crypto: SrtpKeys,
    pub audio_crypto: SrtpKeys,
}

/// Synchronization source identifiers allocated in the setup response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetupResponse {
    pub video_ssrc: u32,
    pub audio_ssrc: u32,
}

/// Negotiated video codec type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VideoCodec {
    H264,
    Other(u8),
}

/// Negotiated H.264 level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum H264Level {
    L3_1,
    L3_2,
    L4,
    Other(u8),
}

/// Negotiated H.264 profile. Carried for completeness; the built command
/// does not emit a profile flag because older encoder builds reject it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum H264Profile {
    ConstrainedBaseline,
    Main,
    High,
    Other(u8),
}

/// Resolution and framerate the controller asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoAttributes {
    pub width: u16,
    pub height: u16,
    pub framerate: u8,
}

/// Codec capability tiers negotiated for the stream.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VideoCodecParameters {
    pub levels: Vec<H264Level>,
    pub profiles: Vec<H264Profile>,
}

/// RTP-level parameters for one media stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RtpParameters {
    pub payload_type: u8,
    /// Negotiated bitrate in kbps. May be zero when the controller leaves
    /// the choice to us; the configured floor then applies.
    pub bitrate: u32,
}

/// Everything negotiated for the video stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoParameters {
    pub codec: VideoCodec,
    pub attributes: VideoAttributes,
    pub codec_params: VideoCodecParameters,
    pub rtp: RtpParameters,
}

/// Negotiated audio codec type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AudioCodec {
    Opus,
    AacEld,
    Other(u8),
}

/// Everything negotiated for the audio stream.
///
/// Accepted on the API for contract completeness; the current invocation
/// disables audio (`-an`) and streams video only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioParameters {
    pub codec: AudioCodec,
    pub rtp: RtpParameters,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn srtp_params_concatenate_key_and_salt() {
        let keys = SrtpKeys {
            key: vec![0x01, 0x02],
            salt: vec![0x03],
        };

        use base64::Engine as _;
        let expected = base64::engine::general_purpose::STANDARD.encode([0x01, 0x02, 0x03]);
        assert_eq!(keys.to_params(), expected);
    }
}
