use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use weaponmods_core::core_api::{DataPaths, GameDatabase, SearchOutcome};
use weaponmods_render::{render_article, render_json};

const LOCATION_PROMPT: &str = "Enter JSON location: ";
const NAME_PROMPT: &str = "Enter weapon mod name: ";

/// Generates Nukapedia articles for Fallout 4 weapon mods from xEdit exports.
#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Cli {
    /// Directory with cmpo.json, misc.json, omod.json, cobj.json and weap.json.
    /// Prompted for when absent.
    #[arg(value_name = "GAME_DATA_DIR", env = "WEAPONMODS_DATA_DIR")]
    game_data_dir: Option<PathBuf>,
    /// Directory with esms.json, models.json, perks.json and weapons.json.
    #[arg(
        long,
        value_name = "DIR",
        env = "WEAPONMODS_REFERENCE_DIR",
        default_value = "."
    )]
    reference_dir: PathBuf,
    /// Look up NAME and exit instead of prompting. Repeatable.
    #[arg(long = "query", value_name = "NAME")]
    queries: Vec<String>,
    /// Print the resolved records as JSON instead of wiki markup.
    #[arg(long)]
    json: bool,
}

fn main() {
    let cli = Cli::parse();
    init_tracing();

    let stdin = io::stdin();
    let mut input = stdin.lock();

    let game_data_dir = match cli.game_data_dir {
        Some(dir) => dir,
        None => match prompt(&mut input, LOCATION_PROMPT) {
            Some(line) => PathBuf::from(line),
            None => {
                eprintln!("No JSON location entered");
                process::exit(1);
            }
        },
    };

    let paths = DataPaths::new(cli.reference_dir, game_data_dir);
    let database = GameDatabase::load(&paths).unwrap_or_else(|e| {
        eprintln!(
            "Error loading weapon mod data from {} and {}",
            paths.reference_dir.display(),
            paths.game_data_dir.display()
        );
        eprintln!("  {e}");
        process::exit(1);
    });

    if !cli.queries.is_empty() {
        for query in &cli.queries {
            print_query(&database, query, cli.json);
        }
        return;
    }

    while let Some(query) = prompt(&mut input, NAME_PROMPT) {
        print_query(&database, &query, cli.json);
    }
    debug!("end of input");
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(false),
        )
        .init();
}

/// Prompts until a non-blank line is entered. `None` at end of input.
fn prompt(input: &mut impl BufRead, message: &str) -> Option<String> {
    let mut line = String::new();
    loop {
        print!("{message}");
        if let Err(e) = io::stdout().flush() {
            error!(error = %e, "failed to flush prompt");
        }

        line.clear();
        match input.read_line(&mut line) {
            Ok(0) => return None,
            Ok(_) => {
                let trimmed = line.trim();
                if !trimmed.is_empty() {
                    return Some(trimmed.to_string());
                }
            }
            Err(e) => {
                error!(error = %e, "failed to read input");
                return None;
            }
        }
    }
}

fn print_query(database: &GameDatabase, query: &str, json: bool) {
    let group = match database.search(query) {
        SearchOutcome::Found(group) => group,
        SearchOutcome::NoResults { query } => {
            println!("No weapon mods by the name `{query}` were found.");
            return;
        }
    };

    if json {
        let rendered = serde_json::to_string_pretty(&render_json(&group)).unwrap_or_else(|e| {
            eprintln!("Error rendering JSON output: {e}");
            process::exit(1);
        });
        println!("{rendered}");
    } else {
        print!("{}", render_article(&group));
    }
}
