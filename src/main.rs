mod app;
mod config;
mod convert;
mod counter;
mod theme;
mod ui;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use app::App;
use config::AppConfig;
use convert::{result_line, Conversion, ExchangeRate};
use counter::CounterInputs;
use theme::Theme;

#[derive(Parser, Debug)]
#[command(name = "okuman")]
#[command(version = "0.1.0")]
#[command(about = "Convert 億/万/円 yen amounts into USD")]
struct Args {
    /// Exchange rate in USD per yen (falls back to default_rate in the config)
    #[arg(short, long, allow_negative_numbers = true)]
    rate: Option<f64>,

    /// 億 (hundred-million) field for one-shot mode
    #[arg(long)]
    oku: Option<String>,

    /// 万 (ten-thousand) field for one-shot mode
    #[arg(long)]
    man: Option<String>,

    /// 円 (unit) field for one-shot mode
    #[arg(long)]
    ichi: Option<String>,

    /// Print the result line and exit instead of opening the form
    #[arg(short, long)]
    print: bool,

    /// Print the conversion as JSON and exit
    #[arg(short, long)]
    json: bool,
}

impl Args {
    fn is_one_shot(&self) -> bool {
        self.print || self.json || self.oku.is_some() || self.man.is_some() || self.ichi.is_some()
    }
}

fn main() -> Result<()> {
    // Initialize logging (stderr keeps the alternate screen clean)
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let config = if args.is_one_shot() {
        AppConfig::load_read_only()
    } else {
        AppConfig::load()
    }
    .unwrap_or_default();

    let rate = args
        .rate
        .or(config.default_rate)
        .context("No exchange rate: pass --rate or set default_rate in the config file")?;
    let rate = ExchangeRate::new(rate)?;

    if args.is_one_shot() {
        return print_conversion(&args, rate, &config);
    }

    ui::init_theme(Theme::load(config.theme_path.as_deref()));
    run_tui(App::new(rate, config))
}

fn print_conversion(args: &Args, rate: ExchangeRate, config: &AppConfig) -> Result<()> {
    let inputs = CounterInputs::from_text(
        args.oku.as_deref().unwrap_or(""),
        args.man.as_deref().unwrap_or(""),
        args.ichi.as_deref().unwrap_or(""),
    );
    let conversion = Conversion::compute(&inputs, rate);

    if args.json {
        println!("{}", serde_json::to_string(&conversion)?);
    } else {
        println!("{}", result_line(&conversion.display, config.trailing_symbol));
    }
    Ok(())
}

fn run_tui(mut app: App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    tracing::info!("Starting form with rate {}", app.rate.value());

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(std::time::Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if app.is_quit_key(&key) {
                        return Ok(());
                    }
                    // Show failures in the info line instead of tearing down the terminal
                    if let Err(e) = app.handle_key(key) {
                        tracing::warn!("Key handling failed: {:#}", e);
                        app.status_message = Some(format!("Error: {}", e));
                        app.status_message_time = Some(std::time::Instant::now());
                    }
                }
            }
        }

        app.tick();
    }
}
