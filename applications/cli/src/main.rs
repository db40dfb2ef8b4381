/// Cadence - command-line catalog browser and queue preview
use anyhow::{bail, Context};
use cadence_core::filter::{unique_artists, unique_genres, unique_years};
use cadence_core::types::{Playlist, PlaylistId, Track, TrackId};
use cadence_core::{format_time, TrackFilter};
use cadence_playback::{Direction, PlaybackStore};
use cadence_server_client::{ApiClient, AuthSession};
use cadence_storage::{FavoritesSet, JsonFileStore};
use clap::{Parser, Subcommand};
use crate::config::CliConfig;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod queue;

#[derive(Parser)]
#[command(name = "cadence")]
#[command(about = "Browse the Cadence catalog and preview playback queues", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "CADENCE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List catalog tracks
    Tracks {
        /// Search title, artist and album
        #[arg(short, long)]
        search: Option<String>,
        /// Only this artist
        #[arg(long)]
        artist: Option<String>,
        /// Only this genre
        #[arg(long)]
        genre: Option<String>,
        /// Only this release year
        #[arg(long)]
        year: Option<i32>,
    },
    /// List the artists, genres and years available for filtering
    Facets,
    /// List curated playlists
    Playlists,
    /// Show one playlist
    Playlist {
        /// Playlist id
        id: i64,
    },
    /// Create an account and log in
    Signup {
        #[arg(short, long)]
        email: String,
        #[arg(short, long, env = "CADENCE_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(short, long)]
        username: String,
    },
    /// Log in and remember the session
    Login {
        #[arg(short, long)]
        email: String,
        #[arg(short, long, env = "CADENCE_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the saved session
    Logout,
    /// Show the logged-in user
    Whoami {
        /// Also ask the service whether the token is still valid
        #[arg(long)]
        verify: bool,
    },
    /// Manage favorite tracks
    Favorites {
        #[command(subcommand)]
        action: FavoritesAction,
    },
    /// Preview the play order of a playlist
    Queue {
        /// Play a curated playlist instead of the whole catalog
        #[arg(long, conflicts_with = "favorites")]
        playlist: Option<i64>,
        /// Play the local favorites
        #[arg(long)]
        favorites: bool,
        /// Shuffle the queue
        #[arg(long)]
        shuffle: bool,
        /// Track to start from
        #[arg(long)]
        start: Option<i64>,
        /// Number of tracks to show
        #[arg(short = 'n', long, default_value_t = 10)]
        count: usize,
        /// Walk backwards
        #[arg(long)]
        previous: bool,
    },
}

#[derive(Subcommand)]
enum FavoritesAction {
    /// List favorite tracks
    List {
        /// List the server-side favorites of the logged-in user
        #[arg(long)]
        remote: bool,
    },
    /// Add or remove a track
    Toggle {
        /// Track id
        id: i64,
    },
}

/// Everything a command may need, built once from the configuration
struct App {
    config: CliConfig,
    client: ApiClient,
    store: Arc<JsonFileStore>,
}

impl App {
    fn new(config: CliConfig) -> anyhow::Result<Self> {
        let client = ApiClient::new(config.client_config())?;
        let store = JsonFileStore::open(&config.storage.data_file).with_context(|| {
            format!("Failed to open data file {}", config.storage.data_file.display())
        })?;
        Ok(Self {
            config,
            client,
            store: Arc::new(store),
        })
    }

    async fn session(&self) -> anyhow::Result<AuthSession<Arc<JsonFileStore>>> {
        let session = AuthSession::new(self.client.clone(), Arc::clone(&self.store));
        session.restore().await?;
        Ok(session)
    }

    fn favorites(&self) -> anyhow::Result<FavoritesSet<Arc<JsonFileStore>>> {
        Ok(FavoritesSet::load(Arc::clone(&self.store))?)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cadence=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = CliConfig::load(cli.config.as_deref())?;
    config.validate()?;
    let app = App::new(config)?;

    match cli.command {
        Commands::Tracks {
            search,
            artist,
            genre,
            year,
        } => {
            let filter = TrackFilter {
                query: search,
                artist,
                genre,
                year,
            };
            list_tracks(&app, &filter).await?;
        }
        Commands::Facets => show_facets(&app).await?,
        Commands::Playlists => list_playlists(&app).await?,
        Commands::Playlist { id } => show_playlist(&app, PlaylistId::new(id)).await?,
        Commands::Signup {
            email,
            password,
            username,
        } => {
            let user = app.session().await?.signup(&email, &password, &username).await?;
            println!("Signed up and logged in as {} <{}>", user.username, user.email);
        }
        Commands::Login { email, password } => {
            let user = app.session().await?.login(&email, &password).await?;
            println!("Logged in as {} <{}>", user.username, user.email);
        }
        Commands::Logout => {
            app.session().await?.logout().await?;
            println!("Logged out");
        }
        Commands::Whoami { verify } => whoami(&app, verify).await?,
        Commands::Favorites { action } => match action {
            FavoritesAction::List { remote } => list_favorites(&app, remote).await?,
            FavoritesAction::Toggle { id } => toggle_favorite(&app, TrackId::new(id)).await?,
        },
        Commands::Queue {
            playlist,
            favorites,
            shuffle,
            start,
            count,
            previous,
        } => {
            let source = match (playlist, favorites) {
                (Some(id), _) => QueueSource::Playlist(PlaylistId::new(id)),
                (None, true) => QueueSource::Favorites,
                (None, false) => QueueSource::Catalog,
            };
            let direction = if previous {
                Direction::Previous
            } else {
                Direction::Next
            };
            show_queue(&app, source, shuffle, start.map(TrackId::new), count, direction).await?;
        }
    }

    Ok(())
}

fn print_track(position: usize, track: &Track) {
    let media = if track.has_media() { "" } else { "  (no audio)" };
    println!(
        "{:>3}. [{}] {} - {} ({}){}",
        position,
        track.id,
        track.name,
        track.author,
        format_time(track.duration().as_secs_f64()),
        media
    );
}

async fn list_tracks(app: &App, filter: &TrackFilter) -> anyhow::Result<()> {
    let tracks = app.client.catalog().get_all_tracks().await?;
    let matches = filter.apply(&tracks);

    for (i, track) in matches.iter().enumerate() {
        print_track(i + 1, track);
    }
    println!("{} of {} tracks", matches.len(), tracks.len());
    Ok(())
}

async fn show_facets(app: &App) -> anyhow::Result<()> {
    let tracks = app.client.catalog().get_all_tracks().await?;

    println!("Artists: {}", unique_artists(&tracks).join(", "));
    println!("Genres:  {}", unique_genres(&tracks).join(", "));
    let years: Vec<String> = unique_years(&tracks).iter().map(ToString::to_string).collect();
    println!("Years:   {}", years.join(", "));
    Ok(())
}

async fn list_playlists(app: &App) -> anyhow::Result<()> {
    let playlists = app.client.catalog().get_playlists().await?;

    println!("Playlists:");
    for playlist in playlists {
        println!("  {} - {} ({} tracks)", playlist.id, playlist.name, playlist.len());
    }
    Ok(())
}

async fn show_playlist(app: &App, id: PlaylistId) -> anyhow::Result<()> {
    let playlist = app.client.catalog().get_playlist_by_id(id).await?;

    println!("{}", playlist.name);
    for (i, track) in playlist.tracks.iter().enumerate() {
        print_track(i + 1, track);
    }
    Ok(())
}

async fn whoami(app: &App, verify: bool) -> anyhow::Result<()> {
    let session = app.session().await?;
    let Some(user) = session.user().await else {
        println!("Not logged in");
        return Ok(());
    };

    println!("{} <{}> (id {})", user.username, user.email, user.id);
    if verify {
        let valid = session.verify().await;
        println!("Access token {}", if valid { "valid" } else { "rejected" });
    }
    Ok(())
}

async fn list_favorites(app: &App, remote: bool) -> anyhow::Result<()> {
    let tracks = if remote {
        let session = app.session().await?;
        if !session.is_authenticated().await {
            bail!("Log in to list server-side favorites");
        }
        session.favorite_tracks().await?
    } else {
        app.favorites()?.tracks()
    };

    if tracks.is_empty() {
        println!("No favorite tracks");
    }
    for (i, track) in tracks.iter().enumerate() {
        print_track(i + 1, track);
    }
    Ok(())
}

/// Flip a track's local membership and mirror it to the server when
/// logged in
async fn toggle_favorite(app: &App, id: TrackId) -> anyhow::Result<()> {
    let favorites = app.favorites()?;

    let track = match favorites.tracks().into_iter().find(|t| t.id == id) {
        Some(track) => track,
        None => app
            .client
            .catalog()
            .get_all_tracks()
            .await?
            .into_iter()
            .find(|t| t.id == id)
            .with_context(|| format!("Track {id} not found in the catalog"))?,
    };

    let now_favorite = favorites.toggle_favorite(&track)?;

    let session = app.session().await?;
    if session.is_authenticated().await {
        let synced = if now_favorite {
            session.add_favorite(id).await
        } else {
            session.remove_favorite(id).await
        };
        if let Err(e) = synced {
            tracing::warn!(track_id = %id, error = %e, "Failed to sync favorite with server");
        }
    }

    if now_favorite {
        println!("Added {} to favorites", track.name);
    } else {
        println!("Removed {} from favorites", track.name);
    }
    Ok(())
}

enum QueueSource {
    Catalog,
    Playlist(PlaylistId),
    Favorites,
}

async fn show_queue(
    app: &App,
    source: QueueSource,
    shuffle: bool,
    start: Option<TrackId>,
    count: usize,
    direction: Direction,
) -> anyhow::Result<()> {
    let playlist = match source {
        QueueSource::Catalog => Playlist::main(app.client.catalog().get_all_tracks().await?),
        QueueSource::Playlist(id) => app.client.catalog().get_playlist_by_id(id).await?,
        QueueSource::Favorites => app.favorites()?.playlist(),
    };

    let store = PlaybackStore::new(&app.config.playback_config());
    queue::start_queue(&store, playlist, start, shuffle)?;

    let state = store.snapshot();
    if let Some(playlist) = state.current_playlist() {
        println!(
            "{}{}",
            playlist.name,
            if state.is_shuffled() { " (shuffled)" } else { "" }
        );
    }

    for (i, track) in queue::walk_queue(&store, direction, count).iter().enumerate() {
        print_track(i + 1, track);
    }
    Ok(())
}
