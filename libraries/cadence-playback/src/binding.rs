//! Media binding
//!
//! Keeps one [`MediaHandle`] in step with the [`PlaybackStore`].
//!
//! Store changes flow down: the binding reads the *latest* snapshot and
//! issues whatever commands bring the handle in line (new source, volume,
//! loop, position, play/pause). Handle events flow up: positions and
//! durations are written back into the store, and a natural track end
//! either rewinds (loop on) or schedules a debounced `next`.
//!
//! Loading a new source is asynchronous. Until the handle reports
//! [`MediaEvent::Loaded`] for the source the store currently points at,
//! the binding does not start playback and ignores position and end
//! reports. A `Loaded` for any other source is stale and dropped.

use crate::error::{MediaError, PlaybackError};
use crate::media::{MediaEvent, MediaHandle};
use crate::scheduler::ScheduledTask;
use crate::state::PlaybackState;
use crate::store::PlaybackStore;
use crate::types::PlaybackConfig;
use cadence_core::types::TrackId;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Sole driver of a media handle
pub struct MediaBinding<H: MediaHandle> {
    store: Arc<PlaybackStore>,
    handle: H,
    config: PlaybackConfig,

    /// Source most recently handed to the handle
    loaded_source: Option<String>,
    /// Waiting for `Loaded` of `loaded_source`
    load_pending: bool,
    /// Whether the binding last told the handle to play
    playing: bool,

    applied_volume: Option<f32>,
    applied_loop: Option<bool>,
    applied_epoch: Option<u64>,

    missing_reported: Option<TrackId>,
    pending_advance: Option<ScheduledTask>,
    last_error: Option<PlaybackError>,
}

impl<H: MediaHandle> MediaBinding<H> {
    pub fn new(store: Arc<PlaybackStore>, handle: H, config: PlaybackConfig) -> Self {
        Self {
            store,
            handle,
            config,
            loaded_source: None,
            load_pending: false,
            playing: false,
            applied_volume: None,
            applied_loop: None,
            applied_epoch: None,
            missing_reported: None,
            pending_advance: None,
            last_error: None,
        }
    }

    /// The driven handle
    pub fn handle(&self) -> &H {
        &self.handle
    }

    /// Most recent non-fatal error
    pub fn last_error(&self) -> Option<&PlaybackError> {
        self.last_error.as_ref()
    }

    /// Take the most recent error, clearing it
    pub fn take_error(&mut self) -> Option<PlaybackError> {
        self.last_error.take()
    }

    /// Whether an automatic advance is scheduled
    pub fn has_pending_advance(&self) -> bool {
        self.pending_advance
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }

    /// Drive the binding until the event stream closes
    ///
    /// Store changes and handle events are processed one at a time on
    /// the calling task.
    pub async fn run(&mut self, mut events: mpsc::Receiver<MediaEvent>) {
        let mut changes = self.store.subscribe();
        self.sync().await;

        loop {
            tokio::select! {
                changed = changes.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    self.sync().await;
                }
                event = events.recv() => match event {
                    Some(event) => self.handle_event(event).await,
                    None => break,
                },
            }
        }

        debug!("Media event stream closed, binding stopped");
    }

    /// Bring the handle in line with the latest store snapshot
    pub async fn sync(&mut self) {
        let state = self.store.snapshot();
        let Some(track) = state.current_track() else {
            return;
        };

        self.push_volume_and_loop(&state);

        let Some(url) = track.media_url() else {
            self.cancel_pending_advance();
            self.pause_handle();
            // Whatever the handle holds is abandoned; the next playable
            // track must load from scratch
            self.loaded_source = None;
            self.load_pending = false;
            if self.missing_reported != Some(track.id) {
                self.missing_reported = Some(track.id);
                self.report(PlaybackError::ResourceMissing(track.id));
            }
            if state.is_playing() {
                self.store.pause();
            }
            return;
        };
        self.missing_reported = None;

        if self.loaded_source.as_deref() != Some(url) {
            self.cancel_pending_advance();
            self.pause_handle();
            self.handle.set_source(url);
            self.handle.load();
            debug!(track_id = %track.id, source = url, "Loading media");

            self.loaded_source = Some(url.to_string());
            self.load_pending = true;
            self.applied_epoch = Some(state.position_epoch());
            return;
        }

        if self.load_pending {
            return;
        }

        if self.applied_epoch != Some(state.position_epoch()) {
            self.cancel_pending_advance();
            self.handle.set_current_time(state.current_time());
            self.applied_epoch = Some(state.position_epoch());
        }

        // Leave the handle alone while a natural end is settling
        if self.has_pending_advance() {
            return;
        }

        self.apply_transport(&state).await;
    }

    /// React to one handle event
    pub async fn handle_event(&mut self, event: MediaEvent) {
        match event {
            MediaEvent::TimeUpdate { position, duration } => {
                if self.load_pending {
                    return;
                }
                if let Some(duration) = duration.filter(|d| d.is_finite()) {
                    if self.store.with_state(|s| s.duration() != duration) {
                        self.store.set_duration(duration);
                    }
                }
                self.store.set_current_time(position);
            }

            MediaEvent::Loaded { source, duration } => {
                let current = self.store.with_state(|s| s.current_media_url().map(str::to_owned));
                if current.as_deref() != Some(source.as_str())
                    || self.loaded_source.as_deref() != Some(source.as_str())
                {
                    debug!(source, "Ignoring stale load");
                    return;
                }

                self.load_pending = false;
                self.store.set_duration(duration);
                debug!(source, duration, "Media loaded");

                let state = self.store.snapshot();
                if self.applied_epoch != Some(state.position_epoch()) {
                    self.handle.set_current_time(state.current_time());
                    self.applied_epoch = Some(state.position_epoch());
                }
                self.apply_transport(&state).await;
            }

            MediaEvent::Ended => {
                let current = self.store.with_state(|s| s.current_media_url().map(str::to_owned));
                if self.load_pending || current.is_none() || current != self.loaded_source {
                    debug!("Ignoring end of a superseded source");
                    return;
                }

                self.playing = false;
                self.cancel_pending_advance();

                if self.store.with_state(PlaybackState::is_looping) {
                    debug!("Track ended, looping");
                    self.store.restart_track();
                    self.sync().await;
                } else {
                    self.handle.pause();
                    let store = Arc::clone(&self.store);
                    debug!(delay = ?self.config.advance_debounce, "Track ended, scheduling next");
                    self.pending_advance = Some(ScheduledTask::after(
                        self.config.advance_debounce,
                        move || store.next(),
                    ));
                }
            }

            MediaEvent::Error { message } => {
                self.playing = false;
                self.load_pending = false;
                self.report(MediaError::Other(message).into());
                self.store.pause();
            }
        }
    }

    fn push_volume_and_loop(&mut self, state: &PlaybackState) {
        if self.applied_volume != Some(state.volume()) {
            self.handle.set_volume(state.volume());
            self.applied_volume = Some(state.volume());
        }
        if self.applied_loop != Some(state.is_looping()) {
            self.handle.set_looping(state.is_looping());
            self.applied_loop = Some(state.is_looping());
        }
    }

    async fn apply_transport(&mut self, state: &PlaybackState) {
        if !state.is_playing() {
            self.pause_handle();
            return;
        }
        if self.playing {
            return;
        }

        match self.handle.play().await {
            Ok(()) => self.playing = true,
            Err(e) => {
                self.playing = false;
                self.report(e.into());
                self.store.pause();
            }
        }
    }

    fn pause_handle(&mut self) {
        if self.playing {
            self.handle.pause();
            self.playing = false;
        }
    }

    fn cancel_pending_advance(&mut self) {
        if let Some(task) = self.pending_advance.take() {
            task.cancel();
        }
    }

    fn report(&mut self, error: PlaybackError) {
        warn!(error = %error, "Playback error");
        self.last_error = Some(error);
    }
}
