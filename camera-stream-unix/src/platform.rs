//! Platform default resolution.
//!
//! Capture API, device paths, and encoder choices differ per OS. They are
//! resolved here once into a [`StreamConfiguration`] with its
//! [`CaptureBackend`] capability descriptor; nothing downstream branches on
//! the OS again.

use camera_stream_core::models::config::{CaptureBackend, StreamConfiguration};

/// Linux: V4L2 grants exclusive device access, so a v4l2loopback device is
/// configured to multiplex the camera between streams and snapshots.
#[cfg(target_os = "linux")]
pub fn default_configuration() -> StreamConfiguration {
    StreamConfiguration {
        backend: CaptureBackend {
            api: "v4l2".into(),
            forced_framerate: None,
            native_multi_access: false,
        },
        input_filename: "/dev/video0".into(),
        loopback_filename: Some("/dev/video99".into()),
        h264_encoder: "h264_v4l2m2m".into(),
        h264_decoder: None,
        min_video_bitrate: 0,
        verbose_encoder_output: false,
    }
}

/// macOS: AVFoundation supports concurrent readers, so no loopback device
/// is needed. The capture side only delivers 30 fps regardless of what was
/// negotiated, hence the forced framerate.
#[cfg(target_os = "macos")]
pub fn default_configuration() -> StreamConfiguration {
    StreamConfiguration {
        backend: CaptureBackend {
            api: "avfoundation".into(),
            forced_framerate: Some(30),
            native_multi_access: true,
        },
        input_filename: "default".into(),
        loopback_filename: None,
        h264_encoder: "h264_videotoolbox".into(),
        h264_decoder: None,
        min_video_bitrate: 0,
        verbose_encoder_output: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(default_configuration().validate().is_ok());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn linux_defaults_use_a_loopback_device() {
        let config = default_configuration();
        assert!(config.loopback_filename.is_some());
        assert!(!config.backend.native_multi_access);
        assert_eq!(config.video_input_filename(), "/dev/video99");
    }

    #[cfg(target_os = "macos")]
    #[test]
    fn macos_defaults_rely_on_native_multi_access() {
        let config = default_configuration();
        assert!(config.loopback_filename.is_none());
        assert!(config.backend.native_multi_access);
        assert_eq!(config.backend.forced_framerate, Some(30));
    }
}
