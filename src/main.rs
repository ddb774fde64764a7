use anyhow::Result;
use clap::{Parser, Subcommand};
use std::io;
use std::path::PathBuf;

use hotel_reservation::config::{DEFAULT_LOG_FILTER, DEFAULT_STATE_FILE};
use hotel_reservation::{HotelConfig, JsonStateFile, ReservationEngine, Shell, SimulatedPayment};

type Engine = ReservationEngine<JsonStateFile, SimulatedPayment>;

#[derive(Debug, Parser)]
#[command(name = "hotel-reservation", version, about = "Hotel room booking desk")]
struct Cli {
    /// File holding the saved rooms and bookings
    #[arg(long, env = "HOTEL_STATE_FILE", default_value = DEFAULT_STATE_FILE)]
    state_file: PathBuf,

    /// JSON list of rooms for a fresh hotel (defaults to the six standard rooms)
    #[arg(long, env = "HOTEL_SEED_FILE")]
    seed_file: Option<PathBuf>,

    /// Guest name (prompted for if not given)
    #[arg(long, env = "HOTEL_USER")]
    user: Option<String>,

    /// Log filter, e.g. "info" or "hotel_reservation=debug"
    #[arg(long, env = "RUST_LOG", default_value = DEFAULT_LOG_FILTER)]
    log: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Clone, Copy, Subcommand)]
enum Command {
    /// Interactive numbered menu (default)
    Menu,
    /// Full-screen terminal UI
    Tui,
    /// Print all rooms and exit
    Rooms,
    /// Print all bookings and exit
    Bookings,
}

impl Cli {
    fn config(&self) -> HotelConfig {
        HotelConfig {
            state_file: self.state_file.clone(),
            seed_file: self.seed_file.clone(),
            user_name: self.user.clone(),
            log_filter: self.log.clone(),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.config();

    init_tracing(&config.log_filter);

    let seed = config.seed_catalog()?;
    let store = JsonStateFile::new(&config.state_file);
    let mut engine = ReservationEngine::open(store, SimulatedPayment, seed);

    match cli.command.unwrap_or(Command::Menu) {
        Command::Menu => run_menu(&mut engine, &config)?,
        Command::Tui => run_ui_mode(&mut engine, &config)?,
        Command::Rooms => {
            for room in engine.view_rooms() {
                println!("{}", room);
            }
        }
        Command::Bookings => {
            let lines = engine.booking_lines();
            if lines.is_empty() {
                println!("No bookings yet.");
            }
            for line in lines {
                println!("{}", line);
            }
        }
    }

    Ok(())
}

/// Logs go to stderr so they never interleave with menu output on stdout
fn init_tracing(filter: &str) {
    let env_filter = tracing_subscriber::EnvFilter::try_new(filter)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .init();
}

fn run_menu(engine: &mut Engine, config: &HotelConfig) -> Result<()> {
    let stdin = io::stdin();
    let mut shell = Shell::new(stdin.lock(), io::stdout());
    shell.run(engine, config.configured_user())
}

#[cfg(feature = "tui")]
fn run_ui_mode(engine: &mut Engine, config: &HotelConfig) -> Result<()> {
    use hotel_reservation::ui;

    let user_name = match config.configured_user() {
        Some(name) => name.to_string(),
        None => {
            eprintln!("❌ The terminal UI needs a guest name.");
            eprintln!("   Pass --user <NAME> or set HOTEL_USER.");
            std::process::exit(2);
        }
    };

    let mut app = ui::App::new(engine, &user_name);
    ui::run_ui(&mut app)
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_engine: &mut Engine, _config: &HotelConfig) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or use the menu: hotel-reservation menu");
    std::process::exit(1);
}
