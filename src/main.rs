#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_possible_truncation)]

use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use rand::Rng;
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use trail_rust::export::save_trail;
use trail_rust::simulation::{
    params::DEFAULT_TICK_MS, Neighborhood, SeededSource, StartPose, TrailAgent, TrailConfig,
    TrailSettings,
};
use trail_rust::ui::{
    field::compute_trail_grid,
    render::{draw_ui, hud_line},
};

#[derive(Parser, Debug)]
#[command(
    name = "trail-gen",
    about = "Generate insulated random-walk trails on a square grid",
    version = env!("CARGO_PKG_VERSION"),
    allow_negative_numbers = true
)]
struct Cli {
    /// TOML settings file; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Trail name, also the output file stem
    #[arg(long)]
    name: Option<String>,

    /// Grid side length N (>0)
    #[arg(long)]
    grid_size: Option<i64>,

    /// Per-step turn probability in [0, 1]. Under the moore neighbourhood
    /// only the first step can turn
    #[arg(long)]
    tortuosity: Option<f64>,

    /// Per-step gap probability in [0, 1]
    #[arg(long)]
    sparsity: Option<f64>,

    /// Step budget; 0 runs until trapped
    #[arg(long)]
    max_length: Option<i64>,

    /// Adjacency used by the insulation rule. moore counts diagonals, which
    /// leaves a trail at most one turn; pick von-neumann for winding trails
    #[arg(long, value_enum)]
    neighborhood: Option<NeighborhoodOpt>,

    /// Seed for reproducible trails
    #[arg(long)]
    seed: Option<u64>,

    /// Start near the centre with a random heading; `--jitter-start false`
    /// overrides a settings file
    #[arg(long, value_name = "BOOL", num_args = 0..=1, default_missing_value = "true")]
    jitter_start: Option<bool>,

    /// Directory the trail file is written to
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Milliseconds between steps in the interactive view
    #[arg(long, default_value_t = DEFAULT_TICK_MS)]
    tick_ms: u64,

    /// Run to completion and save without opening the terminal view
    #[arg(long)]
    headless: bool,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum NeighborhoodOpt {
    Moore,
    VonNeumann,
}

impl From<NeighborhoodOpt> for Neighborhood {
    fn from(opt: NeighborhoodOpt) -> Self {
        match opt {
            NeighborhoodOpt::Moore => Self::Moore,
            NeighborhoodOpt::VonNeumann => Self::VonNeumann,
        }
    }
}

impl Cli {
    /// File settings (or defaults) with command-line overrides applied.
    fn settings(&self) -> Result<TrailSettings> {
        let mut settings = match &self.config {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("reading settings file {}", path.display()))?;
                TrailSettings::from_toml_str(&text)
                    .with_context(|| format!("parsing settings file {}", path.display()))?
            }
            None => TrailSettings::default(),
        };

        if let Some(name) = &self.name {
            settings.name.clone_from(name);
        }
        if let Some(v) = self.grid_size {
            settings.grid_size = v;
        }
        if let Some(v) = self.tortuosity {
            settings.tortuosity = v;
        }
        if let Some(v) = self.sparsity {
            settings.sparsity = v;
        }
        if let Some(v) = self.max_length {
            settings.max_length = v;
        }
        if let Some(v) = self.neighborhood {
            settings.neighborhood = v.into();
        }
        if self.seed.is_some() {
            settings.seed = self.seed;
        }
        if let Some(v) = self.jitter_start {
            settings.jitter_start = v;
        }
        Ok(settings)
    }
}

/// One generation run: the agent plus the seed that produced it.
struct Session {
    agent: TrailAgent<SeededSource>,
    seed: u64,
}

impl Session {
    fn start(settings: &TrailSettings) -> Result<Self> {
        let config = TrailConfig::try_from(settings).context("invalid trail settings")?;
        let seed = settings.seed.unwrap_or_else(|| rand::rng().random());
        let mut source = SeededSource::seeded(seed);
        let start = if settings.jitter_start {
            StartPose::jittered(config.grid_size(), &mut source)
        } else {
            StartPose::centered(config.grid_size())
        };

        info!(
            name = %config.name(),
            grid_size = config.grid_size(),
            tortuosity = config.tortuosity(),
            sparsity = config.sparsity(),
            seed,
            start = %start.cell,
            heading = %start.heading,
            "starting trail"
        );

        let agent = TrailAgent::with_start(config, start, source)?;
        Ok(Self { agent, seed })
    }

    fn save(&self, out_dir: &Path) -> Result<PathBuf> {
        let name = self.agent.config().name();
        let (path, count) = save_trail(out_dir, name, self.agent.pellets())
            .with_context(|| format!("saving trail {name} to {}", out_dir.display()))?;
        info!(path = %path.display(), pellets = count, seed = self.seed, "trail saved");
        Ok(path)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(if cli.headless { "info" } else { "warn" });

    let settings = cli.settings()?;
    let session = Session::start(&settings)?;

    if cli.headless {
        return run_headless(session, &cli.out_dir);
    }

    // Setup Terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let tick_rate = Duration::from_millis(cli.tick_ms);
    let res = run_app(&mut terminal, session, &settings, &cli.out_dir, tick_rate);

    // Restore Terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    res
}

fn run_headless(mut session: Session, out_dir: &Path) -> Result<()> {
    let status = session.agent.run_to_end();
    info!(
        %status,
        steps = session.agent.steps(),
        pellets = session.agent.pellets().len(),
        "trail finished"
    );
    let path = session.save(out_dir)?;
    println!("{}", path.display());
    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    mut session: Session,
    settings: &TrailSettings,
    out_dir: &Path,
    tick_rate: Duration,
) -> Result<()> {
    let mut last_tick = Instant::now();
    let mut paused = false;
    let mut message = String::new();

    loop {
        // 1. Update
        if last_tick.elapsed() >= tick_rate {
            if !paused && !session.agent.is_terminal() {
                match session.agent.step() {
                    Ok(outcome) if outcome.status.is_terminal() => {
                        info!(status = %outcome.status, steps = outcome.step, "trail finished");
                        message = format!("Finished ({}). [s] save  [r] restart  [q] quit", outcome.status);
                    }
                    Ok(_) => {}
                    Err(err) => message = format!("Step rejected: {err}"),
                }
            }
            last_tick = Instant::now();
        }

        // 2. Render
        terminal.draw(|f| {
            let area = f.area();
            let rows = (area.height as usize).saturating_sub(2); // HUD + footer
            let cols = area.width as usize;

            let grid = compute_trail_grid(&session.agent, rows, cols);
            let hud = hud_line(&session.agent, session.seed);
            let footer = if message.is_empty() {
                "[space] pause  [r] restart  [q] quit"
            } else {
                message.as_str()
            };

            draw_ui(f, grid, &hud, footer);
        })?;

        // 3. Input
        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match key.code {
                    KeyCode::Char('q') => return Ok(()),
                    KeyCode::Char(' ') => paused = !paused,
                    KeyCode::Char('r') => {
                        session = Session::start(settings)?;
                        paused = false;
                        message.clear();
                    }
                    KeyCode::Char('s') if session.agent.is_terminal() => {
                        message = save_message(session.save(out_dir), session.seed);
                    }
                    _ => {}
                }
            }
        }
    }
}

/// Footer text after a save attempt. Stays off stderr while the alternate
/// screen is up.
fn save_message(result: Result<PathBuf>, seed: u64) -> String {
    match result {
        Ok(path) => format!("Saved {} (seed {seed})", path.display()),
        Err(err) => format!("Save failed: {err:#}"),
    }
}

fn init_tracing(default_level: &str) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .with_writer(io::stderr)
        .compact();

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn scratch(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("trail_gen_{tag}_{}", std::process::id()))
    }

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("trail-gen").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_flags_override_settings_file() {
        let path = scratch("override").with_extension("toml");
        std::fs::write(
            &path,
            "name = \"from_file\"\ngrid_size = 20\ntortuosity = 0.1\nseed = 5\njitter_start = true\n",
        )
        .unwrap();

        let cli = parse(&[
            "--config",
            path.to_str().unwrap(),
            "--grid-size",
            "40",
            "--seed",
            "6",
            "--jitter-start",
            "false",
            "--neighborhood",
            "von-neumann",
        ]);
        let settings = cli.settings().unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(settings.name, "from_file");
        assert_eq!(settings.grid_size, 40);
        assert!((settings.tortuosity - 0.1).abs() < f64::EPSILON);
        assert_eq!(settings.seed, Some(6));
        assert!(!settings.jitter_start);
        assert_eq!(settings.neighborhood, Neighborhood::VonNeumann);
    }

    #[test]
    fn test_bare_jitter_flag_enables_it() {
        assert!(parse(&["--jitter-start"]).settings().unwrap().jitter_start);
        assert!(parse(&["--jitter-start", "--grid-size", "8"]).settings().unwrap().jitter_start);
        assert!(!parse(&[]).settings().unwrap().jitter_start);
    }

    #[test]
    fn test_negative_grid_size_is_a_settings_error() {
        let settings = parse(&["--grid-size", "-3"]).settings().unwrap();
        assert_eq!(settings.grid_size, -3);
        assert!(Session::start(&settings).is_err());
    }

    #[test]
    fn test_drawn_seed_is_shown_and_replays() {
        let settings = parse(&["--grid-size", "16", "--neighborhood", "von-neumann"])
            .settings()
            .unwrap();
        let mut first = Session::start(&settings).unwrap();
        assert!(hud_line(&first.agent, first.seed).contains(&format!("Seed: {}", first.seed)));

        let replay_settings = TrailSettings {
            seed: Some(first.seed),
            ..settings
        };
        let mut replay = Session::start(&replay_settings).unwrap();
        first.agent.run_to_end();
        replay.agent.run_to_end();
        assert_eq!(first.agent.path(), replay.agent.path());
    }

    #[test]
    fn test_save_message_names_seed() {
        let dir = scratch("save");
        let mut session = Session::start(&parse(&["--grid-size", "9", "--seed", "77"]).settings().unwrap())
            .unwrap();
        session.agent.run_to_end();

        let message = save_message(session.save(&dir), session.seed);
        std::fs::remove_dir_all(&dir).unwrap();
        assert!(message.starts_with("Saved "), "{message}");
        assert!(message.ends_with("(seed 77)"), "{message}");

        let failed = save_message(Err(anyhow::anyhow!("disk full")), 77);
        assert_eq!(failed, "Save failed: disk full");
    }

    #[test]
    fn test_neighborhood_help_points_to_von_neumann() {
        let command = Cli::command();
        let help = command
            .get_arguments()
            .find(|arg| arg.get_id() == "neighborhood")
            .and_then(|arg| arg.get_help())
            .map(ToString::to_string)
            .unwrap();
        assert!(help.contains("von-neumann"), "{help}");
    }
}
