/// Queue preview: drive a playback store through a playlist
use anyhow::{bail, Result};
use cadence_core::types::{Playlist, Track, TrackId};
use cadence_playback::{Direction, PlaybackStore};

/// Select the starting track of `playlist` and set the shuffle mode
///
/// Starts at `start` when given, otherwise at the first track.
pub fn start_queue(
    store: &PlaybackStore,
    playlist: Playlist,
    start: Option<TrackId>,
    shuffle: bool,
) -> Result<()> {
    let first = match start {
        Some(id) => match playlist.index_of(id).and_then(|i| playlist.get(i)) {
            Some(track) => track.clone(),
            None => bail!("Track {id} is not in playlist {:?}", playlist.name),
        },
        None => match playlist.get(0) {
            Some(track) => track.clone(),
            None => bail!("Playlist {:?} is empty", playlist.name),
        },
    };

    store.select_track(first, playlist);
    store.set_shuffle(shuffle);
    Ok(())
}

/// The current track followed by up to `count - 1` advances
pub fn walk_queue(store: &PlaybackStore, direction: Direction, count: usize) -> Vec<Track> {
    let mut visited = Vec::with_capacity(count);
    for step in 0..count {
        if step > 0 {
            store.advance(direction);
        }
        match store.with_state(|state| state.current_track().cloned()) {
            Some(track) => visited.push(track),
            None => break,
        }
    }
    visited
}
