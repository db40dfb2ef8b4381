mod ids;
mod playlist;
mod track;
mod user;

pub use ids::{PlaylistId, TrackId, UserId};
pub use playlist::{Playlist, FAVORITES_PLAYLIST_NAME, MAIN_PLAYLIST_NAME};
pub use track::Track;
pub use user::{AuthTokens, User};
