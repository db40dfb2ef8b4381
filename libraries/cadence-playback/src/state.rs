//! Playback state and its transitions
//!
//! [`PlaybackState`] is a plain value. Every transition is a `&mut self`
//! method that never fails: calls with missing preconditions (no current
//! track, empty playlist) leave the state untouched. Randomness is passed
//! in so callers decide between a seeded and an entropy-backed RNG.
//!
//! Shared access goes through [`crate::PlaybackStore`], which applies each
//! transition atomically and publishes the resulting snapshot.

use crate::shuffle::generate_shuffled_order;
use crate::types::{Direction, PlaybackConfig};
use cadence_core::types::{Playlist, PlaylistId, Track, FAVORITES_PLAYLIST_NAME};
use rand::Rng;

/// Snapshot of everything the player knows
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackState {
    current_track: Option<Track>,
    current_playlist: Option<Playlist>,
    all_tracks: Vec<Track>,
    is_playing: bool,
    volume: f32,
    duration: f64,
    current_time: f64,
    looping: bool,
    shuffle: bool,
    shuffled_order: Vec<usize>,
    shuffle_cursor: Option<usize>,
    position_epoch: u64,
}

impl PlaybackState {
    /// Session-start state: empty "Main" playlist, nothing selected, paused
    pub fn new(config: &PlaybackConfig) -> Self {
        Self {
            current_track: None,
            current_playlist: Some(Playlist::main(Vec::new())),
            all_tracks: Vec::new(),
            is_playing: false,
            volume: clamp_volume(config.volume).unwrap_or(0.5),
            duration: 0.0,
            current_time: 0.0,
            looping: false,
            shuffle: false,
            shuffled_order: Vec::new(),
            shuffle_cursor: None,
            position_epoch: 0,
        }
    }

    // ===== Accessors =====

    /// Track being played, as it was when selected
    pub fn current_track(&self) -> Option<&Track> {
        self.current_track.as_ref()
    }

    /// Playlist governing next/previous
    pub fn current_playlist(&self) -> Option<&Playlist> {
        self.current_playlist.as_ref()
    }

    /// Last full catalog listing
    pub fn all_tracks(&self) -> &[Track] {
        &self.all_tracks
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    /// Volume in `[0, 1]`
    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Track duration in seconds
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Playback position in seconds, within `[0, duration]`
    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    pub fn is_shuffled(&self) -> bool {
        self.shuffle
    }

    /// Visit order of playlist indices while shuffled
    pub fn shuffled_order(&self) -> &[usize] {
        &self.shuffled_order
    }

    /// Position of the current track within [`Self::shuffled_order`]
    pub fn shuffle_cursor(&self) -> Option<usize> {
        self.shuffle_cursor
    }

    /// Bumped whenever the media position must be re-applied
    pub fn position_epoch(&self) -> u64 {
        self.position_epoch
    }

    /// Media URL of the current track, if it has one
    pub fn current_media_url(&self) -> Option<&str> {
        self.current_track.as_ref().and_then(Track::media_url)
    }

    /// Index of the current track in the current playlist
    pub fn current_index(&self) -> Option<usize> {
        let track = self.current_track.as_ref()?;
        self.current_playlist.as_ref()?.index_of(track.id)
    }

    // ===== Transitions =====

    /// Make `track` current within `playlist` and start playing it
    ///
    /// With shuffle on, a fresh order is drawn for `playlist` and the
    /// cursor placed at the track. A track that is not part of `playlist`
    /// puts the cursor at 0, so the following advance continues from
    /// whatever the first shuffled entry happens to be.
    pub fn select_track<R: Rng + ?Sized>(&mut self, track: Track, playlist: Playlist, rng: &mut R) {
        if self.shuffle && !playlist.is_empty() {
            let order = generate_shuffled_order(playlist.len(), rng);
            let cursor = playlist
                .index_of(track.id)
                .and_then(|index| order.iter().position(|&i| i == index))
                .unwrap_or(0);
            self.shuffled_order = order;
            self.shuffle_cursor = Some(cursor);
        } else {
            self.clear_shuffle_order();
        }

        self.current_track = Some(track);
        self.current_playlist = Some(playlist);
        self.current_time = 0.0;
        self.is_playing = true;
        self.position_epoch += 1;
    }

    pub fn toggle_play(&mut self) {
        self.is_playing = !self.is_playing;
    }

    pub fn play(&mut self) {
        self.is_playing = true;
    }

    pub fn pause(&mut self) {
        self.is_playing = false;
    }

    /// Store `volume` clamped to `[0, 1]`; NaN is ignored
    pub fn set_volume(&mut self, volume: f32) {
        if let Some(volume) = clamp_volume(volume) {
            self.volume = volume;
        }
    }

    /// Store the track duration and re-clamp the position into it
    pub fn set_duration(&mut self, duration: f64) {
        self.duration = if duration.is_nan() {
            0.0
        } else {
            duration.max(0.0)
        };
        self.current_time = clamp_time(self.current_time, self.duration);
    }

    /// Store the playback position, clamped to `[0, duration]`
    pub fn set_current_time(&mut self, time: f64) {
        self.current_time = clamp_time(time, self.duration);
    }

    /// User-initiated jump; the media handle picks it up via the epoch
    pub fn seek(&mut self, time: f64) {
        self.set_current_time(time);
        self.position_epoch += 1;
    }

    pub fn set_loop(&mut self, looping: bool) {
        self.looping = looping;
    }

    /// Turning shuffle on draws a fresh order positioned at the current
    /// track (cursor 0 when it can't be found); turning it off clears it
    pub fn set_shuffle<R: Rng + ?Sized>(&mut self, shuffle: bool, rng: &mut R) {
        self.shuffle = shuffle;
        if shuffle {
            self.reshuffle_at_current(rng);
        } else {
            self.clear_shuffle_order();
        }
    }

    /// Move to the next or previous track and start playing it
    ///
    /// Shuffled advancement cycles endlessly: running off either end of
    /// the order draws a new one and continues from the matching end.
    /// Sequential advancement wraps around the playlist.
    pub fn advance<R: Rng + ?Sized>(&mut self, direction: Direction, rng: &mut R) {
        let (len, current_index) = match (&self.current_playlist, &self.current_track) {
            (Some(playlist), Some(track)) => (playlist.len(), playlist.index_of(track.id)),
            _ => return,
        };
        if len == 0 {
            return;
        }

        let index = if self.shuffle && !self.shuffled_order.is_empty() {
            let cursor = self.step_shuffle_cursor(direction, len, rng);
            match self.shuffled_order.get(cursor) {
                Some(&index) if index < len => index,
                _ => edge_index(direction, len),
            }
        } else {
            match (current_index, direction) {
                (None, Direction::Next) => 0,
                (None, Direction::Previous) => len - 1,
                (Some(i), Direction::Next) => (i + 1) % len,
                (Some(0), Direction::Previous) => len - 1,
                (Some(i), Direction::Previous) => i - 1,
            }
        };

        let Some(track) = self
            .current_playlist
            .as_ref()
            .and_then(|playlist| playlist.get(index))
            .cloned()
        else {
            return;
        };

        self.current_track = Some(track);
        self.current_time = 0.0;
        self.is_playing = true;
        self.position_epoch += 1;
    }

    pub fn next<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.advance(Direction::Next, rng);
    }

    pub fn previous<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.advance(Direction::Previous, rng);
    }

    /// Rewind the current track to 0 and keep playing
    pub fn restart_track(&mut self) {
        if self.current_track.is_none() {
            return;
        }
        self.current_time = 0.0;
        self.is_playing = true;
        self.position_epoch += 1;
    }

    /// Replace the working playlist's tracks with a fresh catalog listing
    ///
    /// Selects the first track when nothing is current, without starting
    /// playback. With shuffle on the order is redrawn for the new length.
    pub fn load_tracks_into_playlist<R: Rng + ?Sized>(&mut self, tracks: Vec<Track>, rng: &mut R) {
        if let Some(playlist) = self.current_playlist.as_mut() {
            playlist.tracks.clone_from(&tracks);
        }
        if self.current_track.is_none() {
            self.current_track = tracks.first().cloned();
        }
        self.all_tracks = tracks;

        if self.shuffle {
            self.reshuffle_at_current(rng);
        }
    }

    /// Switch to a different playlist
    ///
    /// Selects the first track when nothing is current. With shuffle on a
    /// new order is drawn and the cursor reset to its start.
    pub fn load_named_playlist<R: Rng + ?Sized>(
        &mut self,
        id: PlaylistId,
        name: impl Into<String>,
        tracks: Vec<Track>,
        rng: &mut R,
    ) {
        if self.current_track.is_none() {
            self.current_track = tracks.first().cloned();
        }

        if self.shuffle {
            if tracks.is_empty() {
                self.clear_shuffle_order();
            } else {
                self.shuffled_order = generate_shuffled_order(tracks.len(), rng);
                self.shuffle_cursor = Some(0);
            }
        }

        self.current_playlist = Some(Playlist::new(id, name, tracks));
    }

    /// Switch to the favorites collection
    pub fn load_favorites<R: Rng + ?Sized>(&mut self, tracks: Vec<Track>, rng: &mut R) {
        self.load_named_playlist(PlaylistId::FAVORITES, FAVORITES_PLAYLIST_NAME, tracks, rng);
    }

    // ===== Helpers =====

    fn step_shuffle_cursor<R: Rng + ?Sized>(
        &mut self,
        direction: Direction,
        len: usize,
        rng: &mut R,
    ) -> usize {
        let order_len = self.shuffled_order.len();
        let stepped = match (direction, self.shuffle_cursor) {
            (Direction::Next, Some(cursor)) => cursor.checked_add(1),
            (Direction::Next, None) => Some(0),
            (Direction::Previous, Some(cursor)) => cursor.checked_sub(1),
            (Direction::Previous, None) => None,
        }
        .filter(|&cursor| cursor < order_len);

        let cursor = stepped.unwrap_or_else(|| {
            self.shuffled_order = generate_shuffled_order(len, rng);
            edge_index(direction, len)
        });
        self.shuffle_cursor = Some(cursor);
        cursor
    }

    fn reshuffle_at_current<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let len = self.current_playlist.as_ref().map_or(0, Playlist::len);
        if len == 0 {
            self.clear_shuffle_order();
            return;
        }

        let order = generate_shuffled_order(len, rng);
        let cursor = self
            .current_index()
            .and_then(|index| order.iter().position(|&i| i == index))
            .unwrap_or(0);
        self.shuffled_order = order;
        self.shuffle_cursor = Some(cursor);
    }

    fn clear_shuffle_order(&mut self) {
        self.shuffled_order.clear();
        self.shuffle_cursor = None;
    }
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self::new(&PlaybackConfig::default())
    }
}

/// First index for `Next`, last for `Previous`
fn edge_index(direction: Direction, len: usize) -> usize {
    match direction {
        Direction::Next => 0,
        Direction::Previous => len.saturating_sub(1),
    }
}

fn clamp_volume(volume: f32) -> Option<f32> {
    (!volume.is_nan()).then(|| volume.clamp(0.0, 1.0))
}

fn clamp_time(time: f64, duration: f64) -> f64 {
    if time.is_nan() {
        0.0
    } else {
        time.max(0.0).min(duration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence_core::types::{TrackId, MAIN_PLAYLIST_NAME};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn track(id: i64) -> Track {
        Track::new(TrackId::new(id), format!("Track {id}"), "Artist")
            .with_media(format!("https://cdn.example.com/{id}.mp3"))
    }

    fn playlist(ids: &[i64]) -> Playlist {
        Playlist::new(
            PlaylistId::new(7),
            "Mix",
            ids.iter().map(|&id| track(id)).collect(),
        )
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(0xC0FFEE)
    }

    fn current_id(state: &PlaybackState) -> Option<i64> {
        state.current_track().map(|t| t.id.as_i64())
    }

    #[test]
    fn initial_state() {
        let state = PlaybackState::default();
        assert!(state.current_track().is_none());
        assert!(!state.is_playing());
        assert_eq!(state.volume(), 0.5);
        assert_eq!(state.shuffle_cursor(), None);

        let playlist = state.current_playlist().unwrap();
        assert_eq!(playlist.id, PlaylistId::MAIN);
        assert_eq!(playlist.name, MAIN_PLAYLIST_NAME);
        assert!(playlist.is_empty());
    }

    #[test]
    fn volume_is_clamped() {
        let mut state = PlaybackState::default();
        state.set_volume(1.5);
        assert_eq!(state.volume(), 1.0);
        state.set_volume(-0.2);
        assert_eq!(state.volume(), 0.0);
        state.set_volume(0.3);
        state.set_volume(f32::NAN);
        assert_eq!(state.volume(), 0.3);
    }

    #[test]
    fn current_time_is_clamped_to_duration() {
        let mut state = PlaybackState::default();
        state.set_duration(120.0);
        state.set_current_time(500.0);
        assert_eq!(state.current_time(), 120.0);
        state.set_current_time(-5.0);
        assert_eq!(state.current_time(), 0.0);
        state.set_current_time(f64::NAN);
        assert_eq!(state.current_time(), 0.0);
    }

    #[test]
    fn shrinking_duration_reclamps_time() {
        let mut state = PlaybackState::default();
        state.set_duration(200.0);
        state.set_current_time(150.0);
        state.set_duration(100.0);
        assert_eq!(state.current_time(), 100.0);

        state.set_duration(-1.0);
        assert_eq!(state.duration(), 0.0);
        assert_eq!(state.current_time(), 0.0);
    }

    #[test]
    fn seek_clamps_and_bumps_epoch() {
        let mut state = PlaybackState::default();
        state.set_duration(60.0);
        let epoch = state.position_epoch();

        state.seek(90.0);
        assert_eq!(state.current_time(), 60.0);
        assert_eq!(state.position_epoch(), epoch + 1);

        state.set_current_time(10.0);
        assert_eq!(state.position_epoch(), epoch + 1);
    }

    #[test]
    fn select_track_resets_time_and_plays() {
        let mut state = PlaybackState::default();
        state.set_duration(100.0);
        state.set_current_time(42.0);

        let list = playlist(&[1, 2, 3]);
        state.select_track(list.tracks[1].clone(), list, &mut rng());

        assert_eq!(current_id(&state), Some(2));
        assert_eq!(state.current_time(), 0.0);
        assert!(state.is_playing());
        assert!(state.shuffled_order().is_empty());
        assert_eq!(state.shuffle_cursor(), None);
    }

    #[test]
    fn toggle_play_only_flips_transport() {
        let mut state = PlaybackState::default();
        let before = state.clone();
        state.toggle_play();
        assert!(state.is_playing());
        state.pause();
        assert_eq!(state, before);
    }

    #[test]
    fn sequential_next_wraps_to_first() {
        let mut state = PlaybackState::default();
        let list = playlist(&[1, 2, 3]);
        state.select_track(list.tracks[2].clone(), list, &mut rng());
        state.pause();

        state.next(&mut rng());
        assert_eq!(current_id(&state), Some(1));
        assert!(state.is_playing());
    }

    #[test]
    fn sequential_previous_wraps_to_last() {
        let mut state = PlaybackState::default();
        let list = playlist(&[1, 2, 3]);
        state.select_track(list.tracks[0].clone(), list, &mut rng());

        state.previous(&mut rng());
        assert_eq!(current_id(&state), Some(3));
    }

    #[test]
    fn sequential_advance_from_unknown_track() {
        let mut state = PlaybackState::default();
        state.select_track(track(99), playlist(&[1, 2, 3]), &mut rng());

        let mut forward = state.clone();
        forward.next(&mut rng());
        assert_eq!(current_id(&forward), Some(1));

        state.previous(&mut rng());
        assert_eq!(current_id(&state), Some(3));
    }

    #[test]
    fn advance_without_preconditions_is_a_no_op() {
        let mut state = PlaybackState::default();
        let before = state.clone();
        state.next(&mut rng());
        assert_eq!(state, before);

        // Current track but empty playlist
        state.select_track(track(1), Playlist::main(Vec::new()), &mut rng());
        let before = state.clone();
        state.previous(&mut rng());
        assert_eq!(state, before);
    }

    #[test]
    fn enabling_shuffle_positions_cursor_at_current_track() {
        let mut state = PlaybackState::default();
        let list = playlist(&[1, 2, 3, 4, 5]);
        state.select_track(list.tracks[3].clone(), list, &mut rng());

        state.set_shuffle(true, &mut rng());
        let cursor = state.shuffle_cursor().unwrap();
        assert_eq!(state.shuffled_order()[cursor], 3);

        state.set_shuffle(false, &mut rng());
        assert!(state.shuffled_order().is_empty());
        assert_eq!(state.shuffle_cursor(), None);
    }

    #[test]
    fn enabling_shuffle_without_current_track_starts_at_zero() {
        let mut state = PlaybackState::default();
        state.load_named_playlist(PlaylistId::new(3), "Mix", playlist(&[1, 2]).tracks, &mut rng());
        // load_named_playlist selected the first track; forget it
        let mut state = PlaybackState {
            current_track: None,
            ..state
        };
        state.set_shuffle(true, &mut rng());
        assert_eq!(state.shuffle_cursor(), Some(0));
        assert_eq!(state.shuffled_order().len(), 2);
    }

    #[test]
    fn shuffle_on_empty_playlist_has_no_order() {
        let mut state = PlaybackState::default();
        state.set_shuffle(true, &mut rng());
        assert!(state.is_shuffled());
        assert!(state.shuffled_order().is_empty());
        assert_eq!(state.shuffle_cursor(), None);
    }

    #[test]
    fn shuffled_next_follows_the_order() {
        let mut state = PlaybackState::default();
        state.set_shuffle(true, &mut rng());
        let list = playlist(&[10, 20, 30, 40]);
        state.select_track(list.tracks[0].clone(), list.clone(), &mut rng());

        let order = state.shuffled_order().to_vec();
        let cursor = state.shuffle_cursor().unwrap();
        if cursor + 1 < order.len() {
            state.next(&mut rng());
            let expected = &list.tracks[order[cursor + 1]];
            assert_eq!(state.current_track(), Some(expected));
            assert_eq!(state.shuffle_cursor(), Some(cursor + 1));
        }
    }

    #[test]
    fn shuffled_overflow_redraws_and_restarts_at_zero() {
        let mut state = PlaybackState::default();
        state.set_shuffle(true, &mut rng());
        let list = playlist(&[1, 2, 3]);
        state.select_track(list.tracks[0].clone(), list, &mut rng());

        let mut rng = rng();
        while state.shuffle_cursor() != Some(2) {
            state.next(&mut rng);
        }
        state.next(&mut rng);
        assert_eq!(state.shuffle_cursor(), Some(0));
        assert_eq!(state.shuffled_order().len(), 3);
    }

    #[test]
    fn shuffled_underflow_redraws_and_restarts_at_end() {
        let mut state = PlaybackState::default();
        state.set_shuffle(true, &mut rng());
        let list = playlist(&[1, 2, 3]);
        state.select_track(list.tracks[0].clone(), list, &mut rng());

        let mut rng = rng();
        while state.shuffle_cursor() != Some(0) {
            state.previous(&mut rng);
        }
        state.previous(&mut rng);
        assert_eq!(state.shuffle_cursor(), Some(2));
        let expected = state.shuffled_order()[2];
        assert_eq!(state.current_index(), Some(expected));
    }

    #[test]
    fn selecting_a_foreign_track_puts_cursor_at_zero() {
        let mut state = PlaybackState::default();
        state.set_shuffle(true, &mut rng());
        let list = playlist(&[1, 2, 3]);

        state.select_track(track(99), list.clone(), &mut rng());
        assert_eq!(state.shuffle_cursor(), Some(0));
        assert_eq!(current_id(&state), Some(99));

        // The next advance lands on shuffled_order[1], unrelated to track 99
        let order = state.shuffled_order().to_vec();
        state.next(&mut rng());
        assert_eq!(state.current_track(), Some(&list.tracks[order[1]]));
    }

    #[test]
    fn load_tracks_selects_first_without_playing() {
        let mut state = PlaybackState::default();
        state.load_tracks_into_playlist(playlist(&[5, 6]).tracks, &mut rng());

        assert_eq!(current_id(&state), Some(5));
        assert!(!state.is_playing());
        assert_eq!(state.all_tracks().len(), 2);
        let working = state.current_playlist().unwrap();
        assert_eq!(working.id, PlaylistId::MAIN);
        assert_eq!(working.len(), 2);
    }

    #[test]
    fn load_tracks_keeps_existing_selection() {
        let mut state = PlaybackState::default();
        state.select_track(track(9), playlist(&[9]), &mut rng());
        state.load_tracks_into_playlist(playlist(&[1, 2]).tracks, &mut rng());

        assert_eq!(current_id(&state), Some(9));
        assert_eq!(state.current_playlist().unwrap().len(), 2);
    }

    #[test]
    fn load_tracks_with_shuffle_keeps_order_a_permutation() {
        let mut state = PlaybackState::default();
        state.set_shuffle(true, &mut rng());
        let list = playlist(&[1, 2]);
        state.select_track(list.tracks[1].clone(), list, &mut rng());

        state.load_tracks_into_playlist(playlist(&[1, 2, 3, 4]).tracks, &mut rng());
        let mut order = state.shuffled_order().to_vec();
        order.sort_unstable();
        assert_eq!(order, vec![0, 1, 2, 3]);
        let cursor = state.shuffle_cursor().unwrap();
        assert_eq!(state.shuffled_order()[cursor], 1);
    }

    #[test]
    fn load_named_playlist_resets_cursor() {
        let mut state = PlaybackState::default();
        state.set_shuffle(true, &mut rng());
        state.load_named_playlist(PlaylistId::new(4), "Road trip", playlist(&[1, 2, 3]).tracks, &mut rng());

        assert_eq!(state.shuffle_cursor(), Some(0));
        assert_eq!(state.shuffled_order().len(), 3);
        assert_eq!(current_id(&state), Some(1));
        assert_eq!(state.current_playlist().unwrap().name, "Road trip");

        state.load_named_playlist(PlaylistId::new(5), "Empty", Vec::new(), &mut rng());
        assert_eq!(state.shuffle_cursor(), None);
        assert!(state.shuffled_order().is_empty());
        // Selection survives the switch
        assert_eq!(current_id(&state), Some(1));
    }

    #[test]
    fn load_favorites_uses_sentinel() {
        let mut state = PlaybackState::default();
        state.load_favorites(playlist(&[8]).tracks, &mut rng());
        let current = state.current_playlist().unwrap();
        assert!(current.is_favorites());
        assert_eq!(current.name, FAVORITES_PLAYLIST_NAME);
    }

    #[test]
    fn restart_track_rewinds_and_plays() {
        let mut state = PlaybackState::default();
        let before = state.clone();
        state.restart_track();
        assert_eq!(state, before);

        let list = playlist(&[1, 2]);
        state.select_track(list.tracks[1].clone(), list, &mut rng());
        state.set_duration(100.0);
        state.set_current_time(99.0);
        state.pause();
        let epoch = state.position_epoch();

        state.restart_track();
        assert_eq!(current_id(&state), Some(2));
        assert_eq!(state.current_time(), 0.0);
        assert!(state.is_playing());
        assert_eq!(state.position_epoch(), epoch + 1);
    }
}
