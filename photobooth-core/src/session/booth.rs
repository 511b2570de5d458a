use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use super::countdown::{Countdown, ShotOutcome, Tick};
use super::frames::FrameSession;
use crate::models::composite_result::{CompositeResult, ExportOutcome};
use crate::models::config::{BoothConfiguration, CompositeConfig, CountdownPlan, TickMode};
use crate::models::error::BoothError;
use crate::models::frame::{CameraDevice, CapturedFrame, VideoFrame};
use crate::models::state::{BoothSnapshot, CountdownState};
use crate::processing::capture::FrameCapturer;
use crate::processing::compositor::StripCompositor;
use crate::processing::mirror::mirror_horizontal_in_place;
use crate::storage::directory::DirectoryDownload;
use crate::storage::export::Exporter;
use crate::traits::booth_delegate::BoothDelegate;
use crate::traits::export_target::ShareTarget;
use crate::traits::frame_source::FrameSource;

/// Result of asking for a countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    Started,
    /// A countdown was already running; nothing changed.
    AlreadyRunning,
}

/// Mutable booth state. One mutex guards the session and the countdown
/// together so capture-append and tick are serialized.
struct BoothState {
    countdown: Countdown,
    session: FrameSession,
    camera_open: bool,
    live_view_mirrored: bool,
    last_error: Option<BoothError>,
}

impl BoothState {
    fn new() -> Self {
        Self {
            countdown: Countdown::new(),
            session: FrameSession::new(),
            camera_open: false,
            live_view_mirrored: false,
            last_error: None,
        }
    }

    fn snapshot(&self) -> BoothSnapshot {
        BoothSnapshot {
            countdown: self.countdown.state(),
            frames_captured: self.session.len(),
            camera_open: self.camera_open,
            live_view_mirrored: self.live_view_mirrored,
            last_error: self.last_error.clone(),
        }
    }
}

/// Notifications collected under the lock and delivered after it is released,
/// so delegates may call back into the booth.
enum BoothEvent {
    State(CountdownState),
    Countdown(u32),
    Captured(usize),
    Error(BoothError),
}

fn dispatch(delegate: Option<&Arc<dyn BoothDelegate>>, events: Vec<BoothEvent>) {
    let Some(delegate) = delegate else {
        return;
    };
    for event in events {
        match event {
            BoothEvent::State(state) => delegate.on_state_changed(&state),
            BoothEvent::Countdown(remaining) => delegate.on_countdown(remaining),
            BoothEvent::Captured(slot) => delegate.on_frame_captured(slot),
            BoothEvent::Error(error) => delegate.on_error(&error),
        }
    }
}

/// Photobooth orchestrator.
///
/// Generic over the camera backend via the `FrameSource` trait.
/// ```text
/// [FrameSource] → [FrameCapturer] → [FrameSession] → [StripCompositor] → [Exporter]
///                        ↑
///                  [Countdown] ← tick (ticker thread or host loop)
/// ```
pub struct Photobooth<S: FrameSource + 'static> {
    source: Arc<Mutex<S>>,
    config: BoothConfiguration,
    capturer: FrameCapturer,
    compositor: StripCompositor,
    exporter: Exporter,
    state: Arc<Mutex<BoothState>>,
    delegate: Option<Arc<dyn BoothDelegate>>,

    // Ticker thread control
    ticker_running: Arc<AtomicBool>,
    ticker_handle: Option<thread::JoinHandle<()>>,
}

impl<S: FrameSource + 'static> Photobooth<S> {
    pub fn new(source: S, config: BoothConfiguration) -> Result<Self, BoothError> {
        config.validate().map_err(BoothError::ConfigurationFailed)?;

        let compositor = StripCompositor::from_config(&config)?;
        let download = DirectoryDownload::new(config.output_directory.clone())
            .with_metadata(config.write_metadata);

        Ok(Self {
            source: Arc::new(Mutex::new(source)),
            capturer: FrameCapturer::new(config.jpeg_quality),
            compositor,
            exporter: Exporter::new(Arc::new(download)),
            config,
            state: Arc::new(Mutex::new(BoothState::new())),
            delegate: None,
            ticker_running: Arc::new(AtomicBool::new(false)),
            ticker_handle: None,
        })
    }

    pub fn set_delegate(&mut self, delegate: Arc<dyn BoothDelegate>) {
        self.delegate = Some(delegate);
    }

    /// Prefer `share` over downloading when it can take files. The current
    /// download target stays as the fallback.
    pub fn set_share_target(&mut self, share: Arc<dyn ShareTarget>) {
        self.exporter.set_share(share);
    }

    pub fn set_exporter(&mut self, exporter: Exporter) {
        self.exporter = exporter;
    }

    pub fn set_compositor(&mut self, compositor: StripCompositor) {
        self.compositor = compositor;
    }

    pub fn config(&self) -> &BoothConfiguration {
        &self.config
    }

    pub fn snapshot(&self) -> BoothSnapshot {
        self.state.lock().snapshot()
    }

    /// Copies of the captured frames, oldest first.
    pub fn frames(&self) -> Vec<CapturedFrame> {
        self.state.lock().session.frames().to_vec()
    }

    pub fn device_info(&self) -> CameraDevice {
        self.source.lock().device_info()
    }

    /// Attach the camera stream.
    pub fn open_camera(&mut self) -> Result<(), BoothError> {
        let result = {
            let mut source = self.source.lock();
            if !source.is_available() {
                Err(BoothError::CameraUnavailable("no camera device found".into()))
            } else {
                source.start(&self.config.camera).map_err(|e| match e {
                    BoothError::CameraUnavailable(msg) => BoothError::CameraUnavailable(msg),
                    other => BoothError::CameraUnavailable(other.to_string()),
                })
            }
        };

        let mut s = self.state.lock();
        match result {
            Ok(()) => {
                s.camera_open = true;
                s.last_error = None;
                drop(s);
                log::info!("camera opened: {}", self.device_info().name);
                Ok(())
            }
            Err(e) => {
                log::warn!("camera unavailable: {}", e);
                s.last_error = Some(e.clone());
                Err(e)
            }
        }
    }

    /// Detach the camera. A running countdown is cancelled first.
    pub fn close_camera(&mut self) -> Result<(), BoothError> {
        self.cancel_countdown();
        self.source.lock().stop()?;
        self.state.lock().camera_open = false;
        log::info!("camera closed");
        Ok(())
    }

    /// Flip the live preview. Captures are unaffected. Returns the new setting.
    pub fn toggle_live_view_mirror(&self) -> bool {
        let mut s = self.state.lock();
        s.live_view_mirrored = !s.live_view_mirrored;
        s.live_view_mirrored
    }

    /// Current frame for display, mirrored when the live-view toggle is on.
    pub fn preview_frame(&self) -> Result<VideoFrame, BoothError> {
        let mirrored = self.state.lock().live_view_mirrored;
        let frame = self.source.lock().current_frame()?;
        if !mirrored {
            return Ok(frame);
        }
        let mut image = frame.into_image();
        mirror_horizontal_in_place(&mut image);
        Ok(VideoFrame::new(image))
    }

    pub fn start_default_countdown(&mut self) -> Result<StartOutcome, BoothError> {
        self.start_countdown(self.config.countdown)
    }

    /// Start a countdown sequence.
    ///
    /// A no-op returning `AlreadyRunning` while another sequence is active.
    /// Transitions: idle → counting_down.
    pub fn start_countdown(&mut self, plan: CountdownPlan) -> Result<StartOutcome, BoothError> {
        plan.validate().map_err(BoothError::ConfigurationFailed)?;

        if !self.state.lock().countdown.state().is_idle() {
            log::debug!("countdown already running, ignoring start");
            return Ok(StartOutcome::AlreadyRunning);
        }

        // A previous ticker may still be on its way out.
        self.stop_ticker();

        let state = {
            let mut s = self.state.lock();
            if !s.countdown.start(plan)? {
                return Ok(StartOutcome::AlreadyRunning);
            }
            if plan.clear_session {
                s.session.clear();
            }
            s.last_error = None;
            s.countdown.state()
        };

        log::info!(
            "countdown started: {} shot(s), {}s apart",
            plan.total_shots,
            plan.interval_secs
        );
        dispatch(
            self.delegate.as_ref(),
            vec![
                BoothEvent::State(state),
                BoothEvent::Countdown(plan.interval_secs),
            ],
        );

        if let TickMode::Thread(period) = self.config.tick_mode {
            self.start_ticker(period)?;
        }
        Ok(StartOutcome::Started)
    }

    /// Advance the countdown by one second.
    ///
    /// Called by the ticker thread, or by the host in `TickMode::Manual`.
    pub fn tick(&self) -> Tick {
        let (tick, events) = Self::advance(&self.state, &self.source, &self.capturer);
        dispatch(self.delegate.as_ref(), events);
        tick
    }

    /// Stop a running countdown and discard the partial session it started.
    /// Returns whether a countdown was running.
    pub fn cancel_countdown(&mut self) -> bool {
        let was_running = {
            let mut s = self.state.lock();
            let clears_session = s.countdown.plan().map(|p| p.clear_session).unwrap_or(false);
            let was_running = s.countdown.cancel();
            if was_running && clears_session {
                s.session.clear();
            }
            was_running
        };

        self.stop_ticker();

        if was_running {
            log::info!("countdown cancelled");
            dispatch(self.delegate.as_ref(), vec![BoothEvent::State(CountdownState::Idle)]);
        }
        was_running
    }

    /// Capture immediately, without a countdown. Rejected while one is running.
    pub fn capture_now(&self) -> Result<CapturedFrame, BoothError> {
        let (frame, slot) = {
            let mut s = self.state.lock();
            if !s.countdown.state().is_idle() {
                return Err(BoothError::ConfigurationFailed("countdown in progress".into()));
            }
            let frame = match self.capturer.capture(&*self.source.lock()) {
                Ok(frame) => frame,
                Err(e) => {
                    s.last_error = Some(e.clone());
                    return Err(e);
                }
            };
            if s.session.push(frame.clone()).is_some() {
                log::debug!("session full, evicted oldest frame");
            }
            s.last_error = None;
            (frame, s.session.len())
        };

        dispatch(self.delegate.as_ref(), vec![BoothEvent::Captured(slot)]);
        Ok(frame)
    }

    /// Empty the session for a new round. Rejected while a countdown runs.
    pub fn reset_session(&self) -> Result<(), BoothError> {
        let mut s = self.state.lock();
        if !s.countdown.state().is_idle() {
            return Err(BoothError::ConfigurationFailed("countdown in progress".into()));
        }
        s.session.clear();
        s.last_error = None;
        Ok(())
    }

    /// Composite the current session into a strip.
    pub fn composite(&self, config: &CompositeConfig) -> Result<CompositeResult, BoothError> {
        let frames = self.frames();
        self.compositor.composite(&frames, config)
    }

    /// Share or download a composited strip.
    pub fn export(&self, result: &CompositeResult) -> Result<ExportOutcome, BoothError> {
        self.exporter.export(result)
    }

    /// Block until the countdown is idle or `timeout` elapses.
    /// Returns whether the booth is idle.
    pub fn wait_until_idle(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            if self.state.lock().countdown.state().is_idle() {
                return true;
            }
            if Instant::now() >= deadline {
                return false;
            }
            thread::sleep(Duration::from_millis(5));
        }
    }

    // --- Internal helpers ---

    /// One countdown step: decrement, and capture when the counter hits zero.
    fn advance(
        state: &Mutex<BoothState>,
        source: &Mutex<S>,
        capturer: &FrameCapturer,
    ) -> (Tick, Vec<BoothEvent>) {
        let mut s = state.lock();
        let mut events = Vec::new();

        let tick = s.countdown.tick();
        match tick {
            Tick::Counting { remaining, .. } => {
                events.push(BoothEvent::Countdown(remaining));
                events.push(BoothEvent::State(s.countdown.state()));
            }
            Tick::Fire { shot } => {
                events.push(BoothEvent::Countdown(0));
                events.push(BoothEvent::State(s.countdown.state()));

                let captured = capturer.capture(&*source.lock());
                match captured {
                    Ok(frame) => {
                        if s.session.push(frame).is_some() {
                            log::debug!("session full, evicted oldest frame");
                        }
                        log::info!("shot {} captured ({} in session)", shot, s.session.len());
                        events.push(BoothEvent::Captured(s.session.len()));

                        if let ShotOutcome::Finished = s.countdown.finish_shot() {
                            log::info!("countdown finished");
                        }
                        events.push(BoothEvent::State(s.countdown.state()));
                    }
                    Err(e) => {
                        log::error!("shot {} failed, aborting countdown: {}", shot, e);
                        s.countdown.cancel();
                        s.last_error = Some(e.clone());
                        events.push(BoothEvent::Error(e));
                        events.push(BoothEvent::State(CountdownState::Idle));
                    }
                }
            }
            Tick::Idle | Tick::Waiting => {}
        }

        (tick, events)
    }

    /// Spawn the ticker thread; it exits once the countdown is idle.
    fn start_ticker(&mut self, period: Duration) -> Result<(), BoothError> {
        let running = Arc::new(AtomicBool::new(true));
        self.ticker_running = Arc::clone(&running);

        let state = Arc::clone(&self.state);
        let source = Arc::clone(&self.source);
        let capturer = self.capturer;
        let delegate = self.delegate.clone();

        let handle = thread::Builder::new()
            .name("countdown-ticker".into())
            .spawn(move || {
                while running.load(Ordering::SeqCst) {
                    thread::sleep(period);
                    if !running.load(Ordering::SeqCst) {
                        break;
                    }

                    let (tick, events) = Self::advance(&state, &source, &capturer);
                    dispatch(delegate.as_ref(), events);

                    if tick == Tick::Idle || state.lock().countdown.state().is_idle() {
                        break;
                    }
                }
                running.store(false, Ordering::SeqCst);
            })
            .map_err(|e| {
                self.state.lock().countdown.cancel();
                BoothError::ConfigurationFailed(format!("failed to spawn ticker thread: {}", e))
            })?;

        self.ticker_handle = Some(handle);
        Ok(())
    }

    fn stop_ticker(&mut self) {
        self.ticker_running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.ticker_handle.take() {
            let _ = handle.join();
        }
    }
}

impl<S: FrameSource + 'static> Drop for Photobooth<S> {
    fn drop(&mut self) {
        self.stop_ticker();
    }
}
