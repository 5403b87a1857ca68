//! A terminal bracket builder for single-elimination tournaments.
//!
//! The roster is edited in the left panel and persisted to a JSON file;
//! the bracket on the right follows every change.

use anyhow::{Context, Result};
use knockout::{FileStore, RosterConfig, RosterEditor, Shuffler};
use ko_client::{logging, tui_app::App};
use pico_args::Arguments;
use std::{path::PathBuf, time::Duration};

const HELP: &str = "\
Build and run a single-elimination tournament bracket

USAGE:
  ko_client [OPTIONS]

OPTIONS:
  --store PATH          Roster file  [default: $KNOCKOUT_STORE or knockout-roster.json]
  --max-name N          Max characters per name  [default: $KNOCKOUT_MAX_NAME_LEN or 30]
  --log PATH            Write logs to PATH
  --seed N              Seed shuffles for reproducible orders

FLAGS:
  -h, --help            Print help information
";

struct Args {
    store: Option<PathBuf>,
    max_name: Option<usize>,
    log: Option<PathBuf>,
    seed: Option<u64>,
}

fn main() -> Result<()> {
    let mut pargs = Arguments::from_env();

    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let args = Args {
        store: pargs.opt_value_from_str("--store")?,
        max_name: pargs.opt_value_from_str("--max-name")?,
        log: pargs.opt_value_from_str("--log")?,
        seed: pargs.opt_value_from_str("--seed")?,
    };

    run(args)
}

fn run(args: Args) -> Result<()> {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    logging::init(args.log.as_deref())?;

    let mut config = RosterConfig::from_env().context("Invalid environment configuration")?;
    if let Some(store) = args.store {
        config.store_path = store;
    }
    if let Some(max_name) = args.max_name {
        config.max_name_len = max_name;
    }
    config.validate().context("Invalid command line option")?;

    let store = FileStore::open(&config.store_path)
        .with_context(|| format!("Failed to open roster {}", config.store_path.display()))?;
    let mut editor = RosterEditor::load(store, &config).context("Failed to load roster")?;
    if let Some(seed) = args.seed {
        editor = editor.with_shuffler(Shuffler::with_seed(seed));
    }

    let app = App::new(editor, Duration::from_millis(config.relayout_delay_ms));

    let terminal = ratatui::init();
    let result = app.run(terminal);
    ratatui::restore();

    result
}
