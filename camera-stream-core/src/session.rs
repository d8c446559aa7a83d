//! Concurrent stream-session registry.
//!
//! The registry is the single entry point the protocol stack calls into.
//! Every operation serializes on one coarse `parking_lot::Mutex` covering
//! the session table, the snapshot cache, and the loopback bridge — held
//! for the operation's full duration, including process spawns and blocking
//! exit waits. One slow spawn therefore stalls unrelated sessions; that is
//! the accepted trade-off for making the loopback teardown predicate
//! atomic: "any session active OR snapshot in flight" can never be observed
//! mid-change.

use std::collections::HashMap;

use parking_lot::Mutex;

use crate::capture::SnapshotCapturer;
use crate::command::CommandBuilder;
use crate::loopback::LoopbackCoordinator;
use crate::models::config::StreamConfiguration;
use crate::models::error::StreamError;
use crate::models::params::{AudioParameters, SetupRequest, SetupResponse, VideoParameters};
use crate::models::snapshot::Snapshot;
use crate::models::stream_id::StreamId;
use crate::process::StreamProcess;
use crate::traits::transcoder::Transcoder;

/// Result of a reconfigure request.
///
/// Mid-stream parameter changes are a known capability gap: the request is
/// validated and acknowledged, but nothing about the running process
/// changes. The outcome makes that visible to callers instead of
/// pretending the new parameters took effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconfigureOutcome {
    Unsupported,
}

/// One controller-negotiated streaming context.
///
/// Input and codec choices are snapshotted from the configuration at
/// prepare time, so a configuration change never retroactively alters a
/// session that was already negotiated.
struct Session {
    input_filename: String,
    h264_decoder: Option<String>,
    h264_encoder: String,
    min_video_bitrate: u32,
    request: SetupRequest,
    response: SetupResponse,
    process: StreamProcess,
}

struct RegistryInner {
    streams: HashMap<StreamId, Session>,
    loopback: Option<LoopbackCoordinator>,
    recent_snapshot: Option<Snapshot>,
}

/// Stream-session manager: session table, process lifecycles, device
/// sharing, snapshot cache.
///
/// Generic over the encoder backend via [`Transcoder`], the way platform
/// capture backends plug into the core elsewhere in this workspace; tests
/// run against an in-memory mock, production uses
/// `camera_stream_unix::FfmpegTranscoder`.
pub struct SessionRegistry<T: Transcoder> {
    config: StreamConfiguration,
    transcoder: T,
    capturer: SnapshotCapturer,
    inner: Mutex<RegistryInner>,
}

impl<T: Transcoder> std::fmt::Debug for SessionRegistry<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionRegistry")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<T: Transcoder> SessionRegistry<T> {
    /// Build a registry. A loopback coordinator is set up when the
    /// configuration names a loopback device; otherwise device sharing is
    /// left to the capture API.
    pub fn new(config: StreamConfiguration, transcoder: T) -> Result<Self, StreamError> {
        config
            .validate()
            .map_err(StreamError::ConfigurationInvalid)?;

        let loopback = config.loopback_filename.as_ref().map(|loopback_filename| {
            LoopbackCoordinator::new(
                config.backend.api.clone(),
                config.input_filename.clone(),
                loopback_filename.clone(),
            )
        });
        let capturer = SnapshotCapturer::new(&config);

        Ok(Self {
            config,
            transcoder,
            capturer,
            inner: Mutex::new(RegistryInner {
                streams: HashMap::new(),
                loopback,
                recent_snapshot: None,
            }),
        })
    }

    /// Register a new session from negotiated endpoints. Always succeeds;
    /// the returned id equals the negotiated session identifier.
    pub fn prepare(&self, request: SetupRequest, response: SetupResponse) -> StreamId {
        let id = StreamId::new(request.session_id.clone());
        log::info!("stream control: prepare {id}");

        let session = Session {
            input_filename: self.config.video_input_filename().to_string(),
            h264_decoder: self.config.h264_decoder.clone(),
            h264_encoder: self.config.h264_encoder.clone(),
            min_video_bitrate: self.config.min_video_bitrate,
            request,
            response,
            process: StreamProcess::new(),
        };

        self.inner.lock().streams.insert(id.clone(), session);
        id
    }

    /// Spawn the encoder for a prepared session.
    ///
    /// Fails with [`StreamError::SessionNotFound`] for unknown ids and
    /// spawns nothing. On spawn failure the session stays registered but
    /// inactive. `audio` is accepted for contract completeness; the built
    /// command streams video only.
    pub fn start(
        &self,
        id: &StreamId,
        video: &VideoParameters,
        _audio: &AudioParameters,
    ) -> Result<(), StreamError> {
        log::info!("stream control: start {id}");
        let mut guard = self.inner.lock();
        let inner = &mut *guard;

        let Some(session) = inner.streams.get_mut(id) else {
            return Err(StreamError::SessionNotFound(id.clone()));
        };

        if let Some(loopback) = &mut inner.loopback {
            if let Err(e) = loopback.start(&self.transcoder) {
                // The stream may still work if the device tolerates a
                // second reader; the spawn below reports if it does not.
                log::warn!("starting loopback failed: {e}");
            }
        }

        let builder = CommandBuilder::new(
            self.config.backend.api.clone(),
            session.input_filename.clone(),
            session.h264_decoder.clone(),
            session.h264_encoder.clone(),
            session.min_video_bitrate,
            self.config.backend.forced_framerate,
        );
        let args = builder.stream_args(&session.request, &session.response, video)?;

        let mut process = StreamProcess::new();
        let result = process.start(&self.transcoder, &args);
        session.process = process;
        result
    }

    /// Terminate a session's process, wait for it to exit, and drop the
    /// session. Unknown ids log and no-op — teardown never errors.
    pub fn stop(&self, id: &StreamId) {
        log::info!("stream control: stop {id}");
        let mut guard = self.inner.lock();
        let inner = &mut *guard;

        let Some(mut session) = inner.streams.remove(id) else {
            log::info!("stop: session {id} not found");
            return;
        };

        session.process.stop();
        Self::reevaluate_loopback(inner);
    }

    /// Pause a session's process. Unknown ids log and no-op; sessions
    /// without an active process are left untouched.
    pub fn suspend(&self, id: &StreamId) {
        log::info!("stream control: suspend {id}");
        match self.inner.lock().streams.get_mut(id) {
            Some(session) => session.process.suspend(),
            None => log::info!("suspend: session {id} not found"),
        }
    }

    /// Resume a suspended session's process.
    pub fn resume(&self, id: &StreamId) {
        log::info!("stream control: resume {id}");
        match self.inner.lock().streams.get_mut(id) {
            Some(session) => session.process.resume(),
            None => log::info!("resume: session {id} not found"),
        }
    }

    /// Acknowledge new parameters for a running session.
    ///
    /// Currently always [`ReconfigureOutcome::Unsupported`]: nothing about
    /// the running process changes. Callers that must report success to
    /// the controller may do so, but should not assume the parameters took
    /// effect.
    pub fn reconfigure(
        &self,
        id: &StreamId,
        _video: &VideoParameters,
        _audio: &AudioParameters,
    ) -> Result<ReconfigureOutcome, StreamError> {
        log::info!("stream control: reconfigure {id}");
        let guard = self.inner.lock();

        let Some(session) = guard.streams.get(id) else {
            return Err(StreamError::SessionNotFound(id.clone()));
        };

        session.process.reconfigure();
        log::warn!("reconfigure {id}: mid-stream parameter changes are not supported, nothing changed");
        Ok(ReconfigureOutcome::Unsupported)
    }

    /// Number of registered sessions.
    ///
    /// Counts every entry in the table, including sessions that were
    /// prepared but never started. Callers wanting "sessions with a live
    /// encoder" need a different query; this one reports registry
    /// membership.
    pub fn active_streams(&self) -> usize {
        self.inner.lock().streams.len()
    }

    /// Capture a fresh still frame and cache it.
    ///
    /// Runs synchronously under the registry lock: the capture and the
    /// loopback teardown re-evaluation form one atomic step, so a
    /// concurrent stop can never pull the device out from under the
    /// capture.
    pub fn snapshot(&self, width: u32, height: u32) -> Result<Snapshot, StreamError> {
        log::info!("stream control: snapshot {width}x{height}");
        let mut guard = self.inner.lock();
        let inner = &mut *guard;

        if let Some(loopback) = &mut inner.loopback {
            if let Err(e) = loopback.start(&self.transcoder) {
                log::warn!("starting loopback failed: {e}");
            }
        }

        let result = self.capturer.capture(&self.transcoder, width, height);
        if let Ok(snapshot) = &result {
            inner.recent_snapshot = Some(snapshot.clone());
        }

        Self::reevaluate_loopback(inner);
        result
    }

    /// The most recent captured snapshot, without capturing a new one.
    /// Dimensions are accepted for interface symmetry; the cache holds
    /// whatever size was last captured.
    pub fn recent_snapshot(&self, _width: u32, _height: u32) -> Option<Snapshot> {
        self.inner.lock().recent_snapshot.clone()
    }

    /// Stop the loopback bridge when nothing needs the camera anymore.
    ///
    /// Must run with the registry lock held so the predicate and the
    /// teardown are one atomic step. Snapshots count implicitly: a capture
    /// in flight holds the same lock, so this can never run concurrently
    /// with one.
    fn reevaluate_loopback(inner: &mut RegistryInner) {
        let Some(loopback) = &mut inner.loopback else {
            return;
        };

        if inner.streams.values().any(|s| s.process.is_active()) {
            log::debug!("loopback kept: at least one session is active");
            return;
        }
        loopback.stop();
    }
}
