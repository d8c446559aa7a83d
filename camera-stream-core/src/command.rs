//! Translation of negotiated session parameters into encoder invocations.
//!
//! The external encoder parses its arguments positionally and by exact
//! string, so the token order and formatting here are part of the contract.
//! Everything in this module is pure: no state, no I/O.

use std::path::Path;

use crate::models::config::StreamConfiguration;
use crate::models::error::StreamError;
use crate::models::params::{
    H264Level, IpVersion, SetupRequest, SetupResponse, VideoAttributes, VideoCodec,
    VideoCodecParameters, VideoParameters,
};

/// The one SRTP profile the controller negotiates.
const SRTP_SUITE: &str = "AES_CM_128_HMAC_SHA1_80";

/// Packet size for fragmenting the encoded stream, by IP version.
const MTU_IPV4: &str = "1378";
const MTU_IPV6: &str = "1228";

/// Seconds the encoder waits for RTP traffic before giving up.
const RTP_TIMEOUT_SECS: u32 = 60;

/// Builds encoder argument lists from negotiated parameters.
///
/// Holds the session-invariant inputs (device, encoder choice, bitrate
/// floor); the per-call methods combine them with what the controller
/// negotiated. Deterministic by construction — the same inputs always
/// yield the same token sequence.
#[derive(Debug, Clone)]
pub struct CommandBuilder {
    capture_api: String,
    input_filename: String,
    h264_decoder: Option<String>,
    h264_encoder: String,
    min_video_bitrate: u32,
    forced_framerate: Option<u8>,
}

impl CommandBuilder {
    pub fn new(
        capture_api: impl Into<String>,
        input_filename: impl Into<String>,
        h264_decoder: Option<String>,
        h264_encoder: impl Into<String>,
        min_video_bitrate: u32,
        forced_framerate: Option<u8>,
    ) -> Self {
        Self {
            capture_api: capture_api.into(),
            input_filename: input_filename.into(),
            h264_decoder,
            h264_encoder: h264_encoder.into(),
            min_video_bitrate,
            forced_framerate,
        }
    }

    /// Builder reading from the shared (loopback-aware) input filename.
    pub fn from_configuration(config: &StreamConfiguration) -> Self {
        Self::new(
            config.backend.api.clone(),
            config.video_input_filename().to_string(),
            config.h264_decoder.clone(),
            config.h264_encoder.clone(),
            config.min_video_bitrate,
            config.backend.forced_framerate,
        )
    }

    /// Arguments for a long-running encrypted RTP stream.
    ///
    /// Fails with [`StreamError::UnsupportedCodec`] when the negotiated
    /// codec has no encoder mapping — never substitutes a default.
    pub fn stream_args(
        &self,
        req: &SetupRequest,
        resp: &SetupResponse,
        video: &VideoParameters,
    ) -> Result<Vec<String>, StreamError> {
        let encoder = self.video_encoder(video.codec)?;

        let mut args: Vec<String> = vec![
            "-re".into(),
            "-i".into(),
            self.input_filename.clone(),
            "-framerate".into(),
            self.capture_framerate(&video.attributes).to_string(),
        ];

        // Decoder override only when explicitly configured.
        if let Some(decoder) = &self.h264_decoder {
            args.push("-codec:v".into());
            args.push(decoder.clone());
        }

        args.extend([
            // Audio is disabled; the controller receives video only.
            "-an".into(),
            "-codec:v".into(),
            encoder.to_string(),
            "-pix_fmt".into(),
            "yuv420p".into(),
            "-vsync".into(),
            "vfr".into(),
            // Height -2 keeps the aspect ratio.
            "-video_size".into(),
            format!("{}:-2", video.attributes.width),
            "-framerate".into(),
            video.attributes.framerate.to_string(),
        ]);

        // Omit the level flag entirely when no negotiated level maps.
        if let Some(level) = video_level(&video.codec_params) {
            args.push("-level:v".into());
            args.push(level.to_string());
        }

        let addr = &req.controller_addr;
        args.extend([
            "-f".into(),
            "rawvideo".into(),
            "-b:v".into(),
            format!("{}k", self.video_bitrate(video)),
            "-payload_type".into(),
            video.rtp.payload_type.to_string(),
            "-ssrc".into(),
            resp.video_ssrc.to_string(),
            "-f".into(),
            "rtp".into(),
            "-srtp_out_suite".into(),
            SRTP_SUITE.into(),
            "-srtp_out_params".into(),
            req.video_crypto.to_params(),
            format!(
                "srtp://{}:{}?rtcpport={}&pkt_size={}&timeout={}",
                addr.ip,
                addr.video_rtp_port,
                addr.video_rtp_port,
                video_mtu(addr.ip_version),
                RTP_TIMEOUT_SECS,
            ),
        ]);

        Ok(args)
    }

    /// Arguments for a one-shot still-frame capture into `output`.
    pub fn snapshot_args(&self, width: u32, height: u32, output: &Path) -> Vec<String> {
        vec![
            "-f".into(),
            self.capture_api.clone(),
            "-i".into(),
            self.input_filename.clone(),
            "-frames:v".into(),
            "1".into(),
            "-vf".into(),
            format!("scale={}:{}", width, height),
            output.to_string_lossy().into_owned(),
        ]
    }

    /// Arguments for the loopback bridge: copy the physical device's frames
    /// into the virtual device without re-encoding.
    pub fn bridge_args(capture_api: &str, input: &str, loopback: &str) -> Vec<String> {
        vec![
            "-f".into(),
            capture_api.to_string(),
            "-i".into(),
            input.to_string(),
            "-codec:v".into(),
            "copy".into(),
            "-f".into(),
            capture_api.to_string(),
            loopback.to_string(),
        ]
    }

    fn video_encoder(&self, codec: VideoCodec) -> Result<&str, StreamError> {
        match codec {
            VideoCodec::H264 => Ok(&self.h264_encoder),
            other => Err(StreamError::UnsupportedCodec(other)),
        }
    }

    /// `max(negotiated, configured floor)` in kbps.
    fn video_bitrate(&self, video: &VideoParameters) -> u32 {
        video.rtp.bitrate.max(self.min_video_bitrate)
    }

    /// Capture-side framerate: the platform's fixed rate when the capture
    /// API only supports one, otherwise the negotiated rate.
    fn capture_framerate(&self, attrs: &VideoAttributes) -> u8 {
        self.forced_framerate.unwrap_or(attrs.framerate)
    }
}

/// First negotiated level with a known encoder flag, or `None`.
fn video_level(params: &VideoCodecParameters) -> Option<&'static str> {
    params.levels.iter().find_map(|level| match level {
        H264Level::L3_1 => Some("3.1"),
        H264Level::L3_2 => Some("3.2"),
        H264Level::L4 => Some("4.0"),
        H264Level::Other(_) => None,
    })
}

/// Packet size for the negotiated IP version; unknown versions use the
/// IPv4 constant.
fn video_mtu(version: IpVersion) -> &'static str {
    match version {
        IpVersion::V4 => MTU_IPV4,
        IpVersion::V6 => MTU_IPV6,
        IpVersion::Other(_) => MTU_IPV4,
    }
}
