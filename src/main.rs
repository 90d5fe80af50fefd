use std::io::stdout;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use color_eyre::Result;
use crossterm::{cursor, execute};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::info;

use proctop::app::{self, App};
use proctop::config::{self, load_config, load_config_from_path};
use proctop::event::{Console, CrosstermConsole};
use proctop::logging;
use proctop::report::Report;
use proctop::system::procfs::ProcFs;

#[derive(Parser)]
#[command(name = "proctop", about = "Live process monitor built on /proc")]
struct Cli {
    /// Path to config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Refresh rate in milliseconds
    #[arg(long)]
    refresh_rate: Option<u64>,

    /// Initial sort: cpu, memory, pid
    #[arg(long)]
    sort: Option<String>,

    /// Root of the procfs mount to read
    #[arg(long)]
    proc_root: Option<String>,

    /// Append logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Write log lines as JSON
    #[arg(long, default_value_t = false)]
    log_json: bool,

    /// Print one sample and exit instead of running the dashboard.
    #[arg(long, default_value_t = false)]
    once: bool,

    /// With --once, print the sample as JSON.
    #[arg(long, default_value_t = false, requires = "once")]
    json: bool,

    /// With --once, how many processes to print.
    #[arg(long, default_value_t = 20)]
    limit: usize,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let config = load_config_for_cli(&cli);

    if let Some(path) = cli.log_file.as_ref().or(config.general.log_file.as_ref()) {
        logging::init_file_logging(path, &config.general.log_level, cli.log_json)?;
    }

    let source = ProcFs::new(&config.general.proc_root);
    let mut app = App::new(&config, source)?;

    if cli.once {
        return print_once(&mut app, &cli);
    }

    let mut console = CrosstermConsole::new();
    console.enter_raw()?;

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = execute!(stdout(), cursor::Show);
        ratatui::restore();
        original_hook(panic_info);
    }));

    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    terminal.clear()?;

    let result = app::run(&mut terminal, &mut console, &mut app);

    console.restore()?;
    info!("terminated");

    result
}

/// Samples twice, one interval apart, so the rates cover a real window.
fn print_once(app: &mut App, cli: &Cli) -> Result<()> {
    std::thread::sleep(app.refresh_interval.max(Duration::from_millis(100)));
    app.sample();
    let report = Report::from_app(app, cli.limit);

    if cli.json {
        println!("{}", report.render_json()?);
    } else {
        println!("{}", report.render_text());
    }
    Ok(())
}

fn load_config_for_cli(cli: &Cli) -> config::Config {
    let mut config = match &cli.config {
        Some(path) => load_config_from_path(path),
        None => load_config(),
    };

    if let Some(rate) = cli.refresh_rate {
        config.general.refresh_rate_ms = rate;
    }
    if let Some(ref sort) = cli.sort {
        config.general.default_sort = sort.clone();
    }
    if let Some(ref root) = cli.proc_root {
        config.general.proc_root = root.clone();
    }

    config
}
