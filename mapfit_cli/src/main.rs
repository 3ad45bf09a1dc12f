use clap::{Parser, Subcommand, ValueEnum};
use mapfit_core::*;
use std::path::PathBuf;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "mapfit")]
#[command(about = "Map-based workout tracker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Log a workout at a map location
    Log {
        /// Map click location as "lat,lng"
        #[arg(long, value_parser = parse_coords, allow_hyphen_values = true)]
        at: Coordinates,

        /// Workout type
        #[arg(long, value_enum)]
        kind: KindArg,

        /// Distance in km
        #[arg(long, allow_hyphen_values = true)]
        distance: String,

        /// Duration in minutes
        #[arg(long, allow_hyphen_values = true)]
        duration: String,

        /// Cadence in steps/min (running)
        #[arg(long, required_if_eq("kind", "running"), allow_hyphen_values = true)]
        cadence: Option<String>,

        /// Elevation gain in meters (cycling)
        #[arg(long, required_if_eq("kind", "cycling"), allow_hyphen_values = true)]
        elevation: Option<String>,

        /// Current position as "lat,lng" (overrides the configured home position)
        #[arg(long, value_parser = parse_coords, allow_hyphen_values = true)]
        position: Option<Coordinates>,
    },

    /// Show the workout history in creation order
    List,

    /// Navigate the map to a workout's location
    Goto {
        /// Workout id
        id: Uuid,

        /// Current position as "lat,lng" (overrides the configured home position)
        #[arg(long, value_parser = parse_coords, allow_hyphen_values = true)]
        position: Option<Coordinates>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    Running,
    Cycling,
}

impl From<KindArg> for WorkoutKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Running => WorkoutKind::Running,
            KindArg::Cycling => WorkoutKind::Cycling,
        }
    }
}

fn parse_coords(raw: &str) -> std::result::Result<Coordinates, String> {
    let (lat, lng) = raw
        .split_once(',')
        .ok_or_else(|| format!("expected \"lat,lng\", got {:?}", raw))?;
    let lat: f64 = lat.trim().parse().map_err(|_| format!("bad latitude {:?}", lat))?;
    let lng: f64 = lng.trim().parse().map_err(|_| format!("bad longitude {:?}", lng))?;

    let coords = Coordinates::new(lat, lng);
    if !coords.is_valid() {
        return Err(format!("coordinates out of range: {}", coords));
    }
    Ok(coords)
}

fn main() -> Result<()> {
    mapfit_core::logging::init();

    let cli = Cli::parse();

    let config = Config::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    tracing::debug!("Using data dir {:?}", data_dir);

    match cli.command {
        Commands::Log {
            at,
            kind,
            distance,
            duration,
            cadence,
            elevation,
            position,
        } => cmd_log(
            data_dir, &config, at, kind.into(), &distance, &duration,
            cadence.as_deref(), elevation.as_deref(), position,
        ),
        Commands::List => cmd_list(data_dir),
        Commands::Goto { id, position } => cmd_goto(data_dir, &config, id, position),
    }
}

/// Terminal rendering of the mapping capability.
struct TerminalMap {
    attribution: String,
}

impl MapSurface for TerminalMap {
    fn init_view(&mut self, center: Coordinates, zoom: u8) -> Result<()> {
        println!("Map centered at ({}) zoom {}", center, zoom);
        println!("Tiles: {}", self.attribution);
        Ok(())
    }

    fn place_marker(
        &mut self,
        coords: Coordinates,
        popup_text: &str,
        style_class: &str,
    ) -> Result<()> {
        println!("Marker at ({}) [{}]: {}", coords, style_class, popup_text);
        Ok(())
    }

    fn center_on(&mut self, coords: Coordinates, zoom: u8) -> Result<()> {
        println!("Centering map on ({}) zoom {}", coords, zoom);
        Ok(())
    }
}

/// Terminal rendering of the workout list.
struct TerminalList;

impl WorkoutListView for TerminalList {
    fn append_entry(&mut self, workout: &Workout) -> Result<()> {
        println!("  {}  {}", workout.description, workout.metric_summary());
        println!("      id: {}", workout.id);
        Ok(())
    }
}

/// One-shot position source: the --position flag, falling back to the
/// configured home position.
struct FixedPosition {
    flag: Option<Coordinates>,
    home: Option<Coordinates>,
}

impl FixedPosition {
    fn new(flag: Option<Coordinates>, config: &Config) -> Self {
        Self {
            flag,
            home: config.map.home_position.map(Into::into),
        }
    }
}

impl GeolocationProvider for FixedPosition {
    fn current_position(&self) -> Result<Coordinates> {
        self.flag.or(self.home).ok_or_else(|| {
            Error::PositionUnavailable(
                "pass --position or set map.home_position in the config".into(),
            )
        })
    }
}

fn build_app(
    data_dir: PathBuf,
    config: &Config,
) -> AppController<TerminalMap, TerminalList, FileBlobStore> {
    let map = TerminalMap {
        attribution: config.map.tile_attribution.clone(),
    };
    AppController::new(map, TerminalList, FileBlobStore::new(data_dir), config)
}

fn start(
    app: &mut AppController<TerminalMap, TerminalList, FileBlobStore>,
    position: Option<Coordinates>,
    config: &Config,
) -> Result<()> {
    let geolocation = FixedPosition::new(position, config);
    match app.startup(&geolocation) {
        Err(Error::PositionUnavailable(reason)) => {
            eprintln!("Could not get current position: {}", reason);
            std::process::exit(1);
        }
        other => other,
    }
}

#[allow(clippy::too_many_arguments)]
fn cmd_log(
    data_dir: PathBuf,
    config: &Config,
    at: Coordinates,
    kind: WorkoutKind,
    distance: &str,
    duration: &str,
    cadence: Option<&str>,
    elevation: Option<&str>,
    position: Option<Coordinates>,
) -> Result<()> {
    let mut app = build_app(data_dir, config);
    start(&mut app, position, config)?;

    app.handle_map_click(at);

    let form = app.form_mut();
    form.set_kind(kind);
    form.set_distance(distance);
    form.set_duration(duration);
    if let Some(cadence) = cadence {
        form.set_cadence(cadence);
    }
    if let Some(elevation) = elevation {
        form.set_elevation(elevation);
    }

    match app.submit_form() {
        Ok(id) => {
            let workout = app
                .workouts()
                .iter()
                .find(|w| w.id == id)
                .expect("just-logged workout is in the store");
            println!();
            println!("✓ Workout logged!");
            println!("  {}  {}", workout.description, workout.metric_summary());
            println!("      id: {}", id);
            Ok(())
        }
        Err(Error::InvalidMetric(reason)) => {
            eprintln!("Invalid input: {}", reason);
            std::process::exit(1);
        }
        Err(e) => Err(e),
    }
}

fn cmd_list(data_dir: PathBuf) -> Result<()> {
    // The history is readable without a map view; restore directly.
    let blob = FileBlobStore::new(data_dir);
    let store = WorkoutStore::restore(&blob);

    if store.is_empty() {
        println!("No workouts yet.");
        return Ok(());
    }

    println!("{} workout(s):", store.len());
    let mut list = TerminalList;
    for workout in store.all() {
        list.append_entry(workout)?;
    }

    Ok(())
}

fn cmd_goto(
    data_dir: PathBuf,
    config: &Config,
    id: Uuid,
    position: Option<Coordinates>,
) -> Result<()> {
    let mut app = build_app(data_dir, config);
    start(&mut app, position, config)?;

    match app.handle_list_click(id) {
        Ok(()) => Ok(()),
        Err(Error::NotFound(id)) => {
            eprintln!("No workout with id {}", id);
            std::process::exit(1);
        }
        Err(e) => Err(e),
    }
}
