/// Capability descriptor for the capture API in use.
///
/// Resolved once at startup by the platform backend and never branched on
/// again; the core only reads the fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureBackend {
    /// Capture API name passed to the encoder's `-f` flag, e.g. `v4l2`
    /// or `avfoundation`.
    pub api: String,

    /// Some capture APIs only deliver one fixed rate regardless of what
    /// was negotiated. When set, the built command uses this capture
    /// framerate instead of the negotiated one.
    pub forced_framerate: Option<u8>,

    /// Whether the capture API allows several consumers to read one
    /// physical device. When true, no loopback device is needed.
    pub native_multi_access: bool,
}

/// Configuration for the stream-session manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamConfiguration {
    /// Capture API descriptor for the input device.
    pub backend: CaptureBackend,

    /// Path of the physical input device (e.g. `/dev/video0`).
    pub input_filename: String,

    /// Path of the virtual loopback device mirroring the physical one,
    /// or `None` on platforms with native multi-access capture.
    pub loopback_filename: Option<String>,

    /// Encoder name for H.264 output (e.g. `h264_v4l2m2m`).
    pub h264_encoder: String,

    /// Optional decoder override for the input stream.
    pub h264_decoder: Option<String>,

    /// Floor applied to the negotiated video bitrate, in kbps.
    pub min_video_bitrate: u32,

    /// Pass encoder stdout/stderr through instead of discarding it.
    pub verbose_encoder_output: bool,
}

impl StreamConfiguration {
    pub fn validate(&self) -> Result<(), String> {
        if self.backend.api.is_empty() {
            return Err("capture API must not be empty".into());
        }
        if self.input_filename.is_empty() {
            return Err("input filename must not be empty".into());
        }
        if self.h264_encoder.is_empty() {
            return Err("h264 encoder must not be empty".into());
        }
        if let Some(loopback) = &self.loopback_filename {
            if loopback.is_empty() {
                return Err("loopback filename must not be empty when set".into());
            }
            if loopback == &self.input_filename {
                return Err("loopback filename must differ from input filename".into());
            }
        }
        Ok(())
    }

    /// The filename streams and snapshots read from: the loopback device
    /// when one is configured, otherwise the physical device.
    pub fn video_input_filename(&self) -> &str {
        self.loopback_filename
            .as_deref()
            .unwrap_or(&self.input_filename)
    }
}

impl Default for StreamConfiguration {
    fn default() -> Self {
        Self {
            backend: CaptureBackend {
                api: "v4l2".into(),
                forced_framerate: None,
                native_multi_access: false,
            },
            input_filename: "/dev/video0".into(),
            loopback_filename: None,
            h264_encoder: "libx264".into(),
            h264_decoder: None,
            min_video_bitrate: 0,
            verbose_encoder_output: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_configuration_is_valid() {
        assert!(StreamConfiguration::default().validate().is_ok());
    }

    #[test]
    fn rejects_empty_encoder() {
        let config = StreamConfiguration {
            h264_encoder: String::new(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_loopback_equal_to_input() {
        let config = StreamConfiguration {
            loopback_filename: Some("/dev/video0".into()),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn input_filename_prefers_loopback() {
        let mut config = StreamConfiguration::default();
        assert_eq!(config.video_input_filename(), "/dev/video0");

        config.loopback_filename = Some("/dev/video99".into());
        assert_eq!(config.video_input_filename(), "/dev/video99");
    }
}
