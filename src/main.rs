use std::io::stdout;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use ratatui::DefaultTerminal;
use ratatui::crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use ratatui::crossterm::execute;
use tracing::error;
use tracing_error::SpanTrace;

use rtv::controller::Controller;
use rtv::domain::{TVConfig, TVError};
use rtv::loader::{EmbeddedSource, FileSource, RecordSource};
use rtv::logging;
use rtv::model::{Model, Status};
use rtv::ui::TableUI;

/// Show region data as a table with renamable, swappable columns.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// CSV, JSON, Parquet or Arrow file. Shows the built-in dataset if omitted.
    path: Option<String>,

    /// Milliseconds to wait for input before redrawing.
    #[arg(long, default_value_t = 100)]
    poll_ms: u64,

    #[arg(long, default_value_t = 40)]
    max_column_width: usize,

    /// Do not capture the mouse.
    #[arg(long)]
    no_mouse: bool,

    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(args) {
        Err(e) => {
            error!("{e}\n{}", SpanTrace::capture());
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
        Ok(_) => ExitCode::SUCCESS,
    }
}

fn run(args: Args) -> Result<(), TVError> {
    let log_file = args.log_file.clone().unwrap_or_else(logging::default_log_file);
    logging::init(&log_file)?;

    let cfg = TVConfig::default()
        .with_event_poll_time(args.poll_ms)
        .with_max_column_width(args.max_column_width)
        .with_mouse(!args.no_mouse);

    let source: Box<dyn RecordSource> = match args.path {
        Some(path) => {
            let expanded =
                shellexpand::full(&path).map_err(|e| TVError::LoadingFailed(e.to_string()))?;
            Box::new(FileSource::new(PathBuf::from(expanded.as_ref())))
        }
        None => Box::new(EmbeddedSource::default()),
    };
    let mut model = Model::init(source.as_ref(), &cfg)?;

    let ui = TableUI::new(&cfg);
    let controller = Controller::new(&cfg);

    let mut terminal = ratatui::init();
    if cfg.mouse {
        execute!(stdout(), EnableMouseCapture)?;
    }

    let result = event_loop(&mut terminal, &mut model, &ui, &controller);

    if cfg.mouse {
        execute!(stdout(), DisableMouseCapture)?;
    }
    ratatui::restore();
    result
}

fn event_loop(
    terminal: &mut DefaultTerminal,
    model: &mut Model,
    ui: &TableUI,
    controller: &Controller,
) -> Result<(), TVError> {
    while model.status != Status::QUITTING {
        // Render the current view
        terminal.draw(|f| ui.draw(model, f))?;

        // Handle events and map to a Message
        let message = controller.handle_event(model)?;
        model.update(message)?;
    }
    Ok(())
}
