//! End-to-end tests for the media binding
//!
//! A fake handle records every command; tests feed it events the way a
//! real player would and check both the handle and the store.

use async_trait::async_trait;
use cadence_core::types::{Playlist, Track, TrackId};
use cadence_playback::{
    MediaBinding, MediaError, MediaEvent, MediaHandle, PlaybackConfig, PlaybackError,
    PlaybackStore,
};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;

// ===== Fake handle =====

#[derive(Debug, Clone, PartialEq)]
enum Command {
    SetSource(String),
    Load,
    Play,
    Pause,
    Seek(f64),
}

#[derive(Default)]
struct HandleLog {
    commands: Vec<Command>,
    source: Option<String>,
    time: f64,
    volume: f32,
    looping: bool,
    reject_play: bool,
}

#[derive(Clone, Default)]
struct FakeHandle {
    log: Arc<Mutex<HandleLog>>,
}

impl FakeHandle {
    fn commands(&self) -> Vec<Command> {
        self.log.lock().unwrap().commands.clone()
    }

    fn clear(&self) {
        self.log.lock().unwrap().commands.clear();
    }

    fn count(&self, command: &Command) -> usize {
        self.commands().iter().filter(|c| *c == command).count()
    }

    fn reject_play(&self, reject: bool) {
        self.log.lock().unwrap().reject_play = reject;
    }

    fn try_play(&self) -> Result<(), MediaError> {
        let mut log = self.log.lock().unwrap();
        if log.reject_play {
            return Err(MediaError::PlayRejected("user gesture required".to_string()));
        }
        log.commands.push(Command::Play);
        Ok(())
    }
}

#[async_trait]
impl MediaHandle for FakeHandle {
    fn source(&self) -> Option<String> {
        self.log.lock().unwrap().source.clone()
    }

    fn set_source(&mut self, url: &str) {
        let mut log = self.log.lock().unwrap();
        log.source = Some(url.to_string());
        log.commands.push(Command::SetSource(url.to_string()));
    }

    fn load(&mut self) {
        self.log.lock().unwrap().commands.push(Command::Load);
    }

    async fn play(&mut self) -> Result<(), MediaError> {
        self.try_play()
    }

    fn pause(&mut self) {
        self.log.lock().unwrap().commands.push(Command::Pause);
    }

    fn current_time(&self) -> f64 {
        self.log.lock().unwrap().time
    }

    fn set_current_time(&mut self, seconds: f64) {
        let mut log = self.log.lock().unwrap();
        log.time = seconds;
        log.commands.push(Command::Seek(seconds));
    }

    fn duration(&self) -> Option<f64> {
        None
    }

    fn volume(&self) -> f32 {
        self.log.lock().unwrap().volume
    }

    fn set_volume(&mut self, volume: f32) {
        self.log.lock().unwrap().volume = volume;
    }

    fn is_looping(&self) -> bool {
        self.log.lock().unwrap().looping
    }

    fn set_looping(&mut self, looping: bool) {
        self.log.lock().unwrap().looping = looping;
    }
}

// ===== Helpers =====

fn url(id: i64) -> String {
    format!("https://cdn.example.com/{id}.mp3")
}

fn track(id: i64) -> Track {
    Track::new(TrackId::new(id), format!("Track {id}"), "Artist")
        .with_media(url(id))
        .with_duration_secs(180)
}

/// Playlist [A=1, B=2, C=3]
fn abc() -> Playlist {
    Playlist::main(vec![track(1), track(2), track(3)])
}

fn setup() -> (Arc<PlaybackStore>, MediaBinding<FakeHandle>, FakeHandle) {
    let store = Arc::new(PlaybackStore::with_seed(&PlaybackConfig::default(), 11));
    let handle = FakeHandle::default();
    let binding = MediaBinding::new(Arc::clone(&store), handle.clone(), PlaybackConfig::default());
    (store, binding, handle)
}

/// Select `id` from [A, B, C] and complete its load
async fn start_playing(store: &PlaybackStore, binding: &mut MediaBinding<FakeHandle>, id: i64) {
    let playlist = abc();
    let index = playlist.index_of(TrackId::new(id)).unwrap();
    store.select_track(playlist.tracks[index].clone(), playlist);
    binding.sync().await;
    binding
        .handle_event(MediaEvent::Loaded {
            source: url(id),
            duration: 180.0,
        })
        .await;
}

fn current_id(store: &PlaybackStore) -> Option<i64> {
    store.with_state(|s| s.current_track().map(|t| t.id.as_i64()))
}

/// Let the debounced advance fire (time is paused in these tests)
async fn settle(config: &PlaybackConfig) {
    tokio::time::sleep(config.advance_debounce + Duration::from_millis(1)).await;
}

// ===== Natural end of track =====

#[tokio::test(start_paused = true)]
async fn ended_advances_to_next_track() {
    let (store, mut binding, _handle) = setup();
    start_playing(&store, &mut binding, 1).await;
    store.set_current_time(179.0);

    binding.handle_event(MediaEvent::Ended).await;
    assert!(binding.has_pending_advance());
    assert_eq!(current_id(&store), Some(1));

    settle(&PlaybackConfig::default()).await;

    let state = store.snapshot();
    assert_eq!(current_id(&store), Some(2));
    assert_eq!(state.current_time(), 0.0);
    assert!(state.is_playing());
}

#[tokio::test(start_paused = true)]
async fn ended_on_last_track_wraps_to_first() {
    let (store, mut binding, _handle) = setup();
    start_playing(&store, &mut binding, 3).await;

    binding.handle_event(MediaEvent::Ended).await;
    settle(&PlaybackConfig::default()).await;

    assert_eq!(current_id(&store), Some(1));
    assert!(store.snapshot().is_playing());
}

#[tokio::test(start_paused = true)]
async fn ended_with_loop_rewinds_without_advancing() {
    let (store, mut binding, handle) = setup();
    start_playing(&store, &mut binding, 2).await;
    store.set_loop(true);
    binding.sync().await;
    store.set_current_time(150.0);
    handle.clear();

    binding.handle_event(MediaEvent::Ended).await;

    assert!(!binding.has_pending_advance());
    let state = store.snapshot();
    assert_eq!(current_id(&store), Some(2));
    assert_eq!(state.current_time(), 0.0);
    assert!(state.is_playing());
    assert_eq!(handle.commands(), vec![Command::Seek(0.0), Command::Play]);

    // Nothing happens later either
    settle(&PlaybackConfig::default()).await;
    assert_eq!(current_id(&store), Some(2));
}

#[tokio::test(start_paused = true)]
async fn ended_pauses_handle_before_advancing() {
    let (store, mut binding, handle) = setup();
    start_playing(&store, &mut binding, 1).await;
    handle.clear();

    binding.handle_event(MediaEvent::Ended).await;
    assert_eq!(handle.commands(), vec![Command::Pause]);

    // Unrelated store changes don't restart the finished track
    store.set_volume(0.9);
    binding.sync().await;
    assert_eq!(handle.count(&Command::Play), 0);
}

#[tokio::test(start_paused = true)]
async fn repeated_ended_advances_once() {
    let (store, mut binding, _handle) = setup();
    start_playing(&store, &mut binding, 1).await;

    binding.handle_event(MediaEvent::Ended).await;
    tokio::time::sleep(Duration::from_millis(100)).await;
    binding.handle_event(MediaEvent::Ended).await;
    settle(&PlaybackConfig::default()).await;

    assert_eq!(current_id(&store), Some(2));
}

#[tokio::test(start_paused = true)]
async fn manual_track_change_cancels_pending_advance() {
    let (store, mut binding, _handle) = setup();
    start_playing(&store, &mut binding, 1).await;

    binding.handle_event(MediaEvent::Ended).await;
    let playlist = abc();
    store.select_track(playlist.tracks[2].clone(), playlist);
    binding.sync().await;
    assert!(!binding.has_pending_advance());

    settle(&PlaybackConfig::default()).await;
    assert_eq!(current_id(&store), Some(3));
}

#[tokio::test(start_paused = true)]
async fn late_ended_from_previous_track_is_ignored() {
    let (store, mut binding, _handle) = setup();
    start_playing(&store, &mut binding, 1).await;

    let playlist = abc();
    store.select_track(playlist.tracks[1].clone(), playlist);
    binding.sync().await;

    // A's end was already queued when B was picked
    binding.handle_event(MediaEvent::Ended).await;
    assert!(!binding.has_pending_advance());

    settle(&PlaybackConfig::default()).await;
    assert_eq!(current_id(&store), Some(2));
    assert!(store.snapshot().is_playing());
}

#[tokio::test(start_paused = true)]
async fn ended_before_the_binding_sees_a_new_selection_is_ignored() {
    let (store, mut binding, _handle) = setup();
    start_playing(&store, &mut binding, 1).await;

    let playlist = abc();
    store.select_track(playlist.tracks[1].clone(), playlist);
    binding.handle_event(MediaEvent::Ended).await;
    assert!(!binding.has_pending_advance());

    binding.sync().await;
    settle(&PlaybackConfig::default()).await;
    assert_eq!(current_id(&store), Some(2));
}

// ===== Loading =====

#[tokio::test]
async fn rapid_switches_converge_on_last_track() {
    let (store, mut binding, handle) = setup();
    let playlist = abc();

    store.select_track(playlist.tracks[0].clone(), playlist.clone());
    binding.sync().await;
    store.select_track(playlist.tracks[1].clone(), playlist.clone());
    store.select_track(playlist.tracks[2].clone(), playlist);
    binding.sync().await;

    // B was never loaded; the binding only saw the latest snapshot
    let sources: Vec<_> = handle
        .commands()
        .into_iter()
        .filter_map(|c| match c {
            Command::SetSource(s) => Some(s),
            _ => None,
        })
        .collect();
    assert_eq!(sources, vec![url(1), url(3)]);

    // A's late Loaded is stale
    binding
        .handle_event(MediaEvent::Loaded {
            source: url(1),
            duration: 99.0,
        })
        .await;
    assert_eq!(handle.count(&Command::Play), 0);
    assert_eq!(store.snapshot().duration(), 0.0);

    binding
        .handle_event(MediaEvent::Loaded {
            source: url(3),
            duration: 180.0,
        })
        .await;
    assert_eq!(handle.count(&Command::Play), 1);
    assert_eq!(store.snapshot().duration(), 180.0);
}

#[tokio::test]
async fn reselecting_a_track_abandoned_for_a_silent_one_reloads_it() {
    let (store, mut binding, handle) = setup();
    let silent = Track::new(TrackId::new(9), "Silent", "Nobody");
    let playlist = Playlist::main(vec![track(1), silent.clone(), track(3)]);

    store.select_track(track(1), playlist.clone());
    binding.sync().await;
    store.select_track(silent, playlist.clone());
    binding.sync().await;

    // A finishes loading after it was abandoned
    binding
        .handle_event(MediaEvent::Loaded {
            source: url(1),
            duration: 180.0,
        })
        .await;
    assert_eq!(handle.count(&Command::Play), 0);

    store.select_track(track(1), playlist);
    binding.sync().await;
    binding.sync().await;
    assert_eq!(handle.count(&Command::Load), 2);

    binding
        .handle_event(MediaEvent::Loaded {
            source: url(1),
            duration: 180.0,
        })
        .await;
    assert_eq!(handle.count(&Command::Play), 1);
    assert!(store.snapshot().is_playing());

    binding
        .handle_event(MediaEvent::TimeUpdate {
            position: 5.0,
            duration: Some(180.0),
        })
        .await;
    assert_eq!(store.snapshot().current_time(), 5.0);
}

#[tokio::test]
async fn loaded_while_paused_does_not_play() {
    let (store, mut binding, handle) = setup();
    store.load_tracks_into_playlist(abc().tracks);
    binding.sync().await;

    binding
        .handle_event(MediaEvent::Loaded {
            source: url(1),
            duration: 180.0,
        })
        .await;
    assert_eq!(handle.count(&Command::Play), 0);

    store.toggle_play();
    binding.sync().await;
    assert_eq!(handle.count(&Command::Play), 1);

    store.toggle_play();
    binding.sync().await;
    assert_eq!(handle.count(&Command::Pause), 1);
}

// ===== Failures =====

#[tokio::test]
async fn rejected_play_reconciles_is_playing() {
    let (store, mut binding, handle) = setup();
    handle.reject_play(true);

    start_playing(&store, &mut binding, 1).await;

    assert!(!store.snapshot().is_playing());
    assert!(matches!(
        binding.last_error(),
        Some(PlaybackError::Media(MediaError::PlayRejected(_)))
    ));

    // A later user gesture succeeds
    handle.reject_play(false);
    store.play();
    binding.sync().await;
    assert_eq!(handle.count(&Command::Play), 1);
    assert!(store.snapshot().is_playing());
}

#[tokio::test]
async fn track_without_media_is_skipped_not_played() {
    let (store, mut binding, handle) = setup();
    let silent = Track::new(TrackId::new(9), "Silent", "Nobody");
    let playlist = Playlist::main(vec![track(1), silent.clone(), track(3)]);

    store.select_track(silent, playlist.clone());
    binding.sync().await;

    assert_eq!(
        binding.last_error(),
        Some(&PlaybackError::ResourceMissing(TrackId::new(9)))
    );
    assert_eq!(handle.count(&Command::Play), 0);
    assert_eq!(handle.count(&Command::Load), 0);
    assert!(!store.snapshot().is_playing());

    // The queue is intact: next moves on normally
    store.next();
    binding.sync().await;
    assert_eq!(current_id(&store), Some(3));
    assert_eq!(handle.commands().last(), Some(&Command::Load));
}

// ===== Event loop =====

#[tokio::test(start_paused = true)]
async fn run_drives_a_whole_track_transition() {
    let (store, mut binding, handle) = setup();
    let (events, rx) = mpsc::channel(16);

    let task = tokio::spawn(async move {
        binding.run(rx).await;
        binding
    });

    let playlist = abc();
    store.select_track(playlist.tracks[0].clone(), playlist);
    tokio::task::yield_now().await;
    tokio::time::sleep(Duration::from_millis(10)).await;

    events
        .send(MediaEvent::Loaded {
            source: url(1),
            duration: 180.0,
        })
        .await
        .unwrap();
    events
        .send(MediaEvent::TimeUpdate {
            position: 30.0,
            duration: Some(180.0),
        })
        .await
        .unwrap();
    events.send(MediaEvent::Ended).await.unwrap();
    tokio::time::sleep(Duration::from_millis(400)).await;

    assert_eq!(current_id(&store), Some(2));
    assert!(handle.commands().contains(&Command::SetSource(url(2))));

    drop(events);
    let binding = task.await.unwrap();
    assert!(binding.last_error().is_none());
}
