use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use rand::{rngs::SmallRng, SeedableRng};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin, Write},
    path::PathBuf,
    process,
    time::Duration,
};
use tracing::{error, info};

use tapwpm::{
    app::{App, AppSettings, Flow},
    app_dirs::AppDirs,
    clock::SystemClock,
    config::{Config, ConfigStore, FileConfigStore},
    corpus::{WordCorpus, DEFAULT_CORPUS},
    runtime::{action_for, AppEvent, CrosstermEventSource, EventSource, Runner},
    telemetry,
};

const TICK_RATE_MS: u64 = 100;

/// minimal terminal typing test reporting words-per-minute and accuracy
#[derive(Parser, Debug, Clone)]
#[clap(version, about)]
pub struct Cli {
    /// number of words in the passage
    #[clap(short = 'w', long, value_parser = clap::value_parser!(u32).range(1..))]
    number_of_words: Option<u32>,

    /// JSON word list to sample from instead of the bundled english list
    #[clap(short = 'c', long)]
    corpus: Option<PathBuf>,

    /// only show WPM and accuracy once the passage is complete
    #[clap(long)]
    final_only: bool,

    /// seed the word sampler for a reproducible passage
    #[clap(long)]
    seed: Option<u64>,

    /// store the effective settings as the new defaults
    #[clap(long)]
    save_config: bool,
}

impl Cli {
    /// Layer command-line flags over the stored config.
    fn resolve(&self, mut config: Config) -> Config {
        if let Some(n) = self.number_of_words {
            config.number_of_words = n as usize;
        }
        if let Some(ref path) = self.corpus {
            config.corpus = Some(path.clone());
        }
        if self.final_only {
            config.live_metrics = false;
        }
        config.number_of_words = config.number_of_words.max(1);
        config
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if let Some(log_path) = AppDirs::log_path() {
        telemetry::init(&log_path);
    }

    let store = FileConfigStore::new();
    let config = cli.resolve(store.load());
    if cli.save_config {
        store.save(&config)?;
        info!(path = %store.path().display(), "saved config");
    }

    let corpus = match config.corpus {
        Some(ref path) => WordCorpus::load(path),
        None => WordCorpus::embedded(DEFAULT_CORPUS),
    }
    .unwrap_or_else(|err| {
        error!(error = %err, "failed to load corpus");
        eprintln!("tapwpm: {err}");
        process::exit(1);
    });

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let rng = match cli.seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_entropy(),
    };
    let settings = AppSettings {
        number_of_words: config.number_of_words,
        live_metrics: config.live_metrics,
    };
    let mut app = App::new(corpus, settings, rng, Box::new(SystemClock));

    let runner = Runner::new(
        CrosstermEventSource::new(),
        Duration::from_millis(TICK_RATE_MS),
    );

    enable_raw_mode()?;
    let result = run_in_alternate_screen(&mut io::stdout(), &mut app, &runner);
    disable_raw_mode()?;

    if let Err(ref err) = result {
        error!(error = %err, "event loop failed");
    }
    result
}

/// Leaves the alternate screen on every path once it was entered.
fn run_in_alternate_screen<W: Write, E: EventSource>(
    out: &mut W,
    app: &mut App,
    runner: &Runner<E>,
) -> Result<(), Box<dyn Error>> {
    execute!(out, EnterAlternateScreen)?;
    let result = run_terminal(CrosstermBackend::new(&mut *out), app, runner);
    execute!(out, LeaveAlternateScreen)?;
    result
}

fn run_terminal<W: Write, E: EventSource>(
    backend: CrosstermBackend<W>,
    app: &mut App,
    runner: &Runner<E>,
) -> Result<(), Box<dyn Error>> {
    let mut terminal = Terminal::new(backend)?;
    let result = start_tui(&mut terminal, app, runner);
    terminal.show_cursor()?;
    result
}

fn start_tui<B: Backend, E: EventSource>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &Runner<E>,
) -> Result<(), Box<dyn Error>> {
    terminal.draw(|f| f.render_widget(&*app, f.area()))?;

    loop {
        match runner.step() {
            AppEvent::Tick => {
                // only the live metrics line changes between keystrokes
                let session = app.session();
                if app.settings().live_metrics && session.has_started() && !session.has_ended() {
                    terminal.draw(|f| f.render_widget(&*app, f.area()))?;
                }
            }
            AppEvent::Resize => {
                terminal.draw(|f| f.render_widget(&*app, f.area()))?;
            }
            AppEvent::Key(key) => {
                let Some(action) = action_for(key) else {
                    continue;
                };
                if app.handle(action) == Flow::Quit {
                    return Ok(());
                }
                terminal.draw(|f| f.render_widget(&*app, f.area()))?;
            }
        }
    }
}
