mod config;
mod output;
mod prompt;
mod state;

use clap::Parser;
use pairsort_core::{EngineConfig, ItemId, ListOrder, RankingEngine};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;
use std::io::{self, BufRead, IsTerminal};
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::config::PairsortConfig;
use crate::prompt::Answer;
use crate::state::Session;

const DEFAULT_STATE_FILE: &str = "pairsort.json";

pub fn bail(msg: impl std::fmt::Display) -> ! {
    eprintln!("Error: {msg}");
    std::process::exit(1);
}

#[derive(Parser)]
#[command(name = "pairsort", version, about = "Rank a list by answering \"which do you prefer?\" questions")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Ask questions until the list is fully ranked, then print it
    Rank(RankArgs),
    /// Record a single judgment without being asked
    Prefer(PreferArgs),
    /// Leave an item out of the ranking (its judgments are kept)
    Ignore(IgnoreArgs),
    /// Create a default config file ($XDG_CONFIG_HOME/pairsort/config.toml)
    Init,
}

#[derive(clap::Args)]
struct ListArgs {
    /// File with one item per line (# starts a comment line), or a JSON array of strings
    #[arg(long)]
    items: Option<PathBuf>,

    /// Inline item (repeatable)
    #[arg(long = "item")]
    inline_items: Vec<String>,

    /// Judgment file (default: pairsort.json in state_dir, or the current directory)
    #[arg(long)]
    state: Option<PathBuf>,

    /// Path to config file (default: $XDG_CONFIG_HOME/pairsort/config.toml, else ~/.config)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Show debug logging on stderr
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Parser)]
struct RankArgs {
    #[command(flatten)]
    list: ListArgs,

    /// Pivot seed. Defaults to the seed stored in the judgment file, then config.
    #[arg(long)]
    seed: Option<u64>,

    /// Ranges shorter than this are insertion-sorted. Default: 12.
    #[arg(long)]
    insertion_threshold: Option<usize>,

    /// Don't prompt: print the current order and the next question, then exit
    #[arg(long)]
    once: bool,

    /// Output JSON instead of table
    #[arg(long)]
    json: bool,
}

#[derive(Parser)]
struct PreferArgs {
    #[command(flatten)]
    list: ListArgs,

    /// The preferred item
    #[arg(long)]
    greater: String,

    /// The item it beats
    #[arg(long)]
    lesser: String,
}

#[derive(Parser)]
struct IgnoreArgs {
    #[command(flatten)]
    list: ListArgs,

    /// Item to leave out
    item: String,

    /// Put a previously ignored item back into the ranking
    #[arg(long)]
    restore: bool,
}

/// Items from a JSON array of strings, or one per line with `#` comment lines.
/// Names are trimmed and blanks dropped either way.
fn parse_items(content: &str) -> Result<Vec<String>, serde_json::Error> {
    let content = content.trim();
    let raw: Vec<String> = if content.starts_with('[') {
        serde_json::from_str(content)?
    } else {
        content
            .lines()
            .filter(|line| !line.trim_start().starts_with('#'))
            .map(str::to_string)
            .collect()
    };
    Ok(raw
        .into_iter()
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .collect())
}

fn parse_items_or_bail(content: &str, source: &str) -> Vec<String> {
    parse_items(content)
        .unwrap_or_else(|e| bail(format!("Items from {source} look like a JSON array but failed to parse: {e}")))
}

/// First name that appears twice, if any. Judgments are keyed by name.
fn find_duplicate(items: &[String]) -> Option<&str> {
    let mut seen = HashSet::new();
    items.iter().find(|name| !seen.insert(name.as_str())).map(String::as_str)
}

/// Load items from all sources: --items file, --item inline args, or stdin.
fn load_items(args: &ListArgs) -> Vec<String> {
    let mut items = Vec::new();

    if let Some(ref path) = args.items {
        let content = std::fs::read_to_string(path)
            .unwrap_or_else(|e| bail(format!("Failed to read items file {}: {e}", path.display())));
        items = parse_items_or_bail(&content, &path.display().to_string());
    }

    items.extend(args.inline_items.iter().cloned());

    // Stdin only if nothing else was given. `rank` then has no terminal to
    // ask on and behaves like --once.
    if items.is_empty() {
        let stdin = io::stdin();
        if stdin.is_terminal() {
            bail("No items provided. Use --items <file>, --item <name>, or pipe items via stdin.");
        }
        let content = stdin
            .lock()
            .lines()
            .collect::<io::Result<Vec<_>>>()
            .unwrap_or_else(|e| bail(format!("Failed to read from stdin: {e}")))
            .join("\n");
        items = parse_items_or_bail(&content, "stdin");
    }

    if items.is_empty() {
        bail("No items provided");
    }
    if let Some(name) = find_duplicate(&items) {
        bail(format!("Item \"{name}\" is listed more than once"));
    }
    items
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Config file, judgment file location, and the session replayed from it.
struct Context {
    cfg: PairsortConfig,
    state_path: PathBuf,
    session: Session,
}

fn open(args: &ListArgs) -> Context {
    init_tracing(args.verbose);

    let config_path = args.config.clone().unwrap_or_else(config::config_path);
    let cfg = config::load_config(&config_path);

    let state_path = args
        .state
        .clone()
        .or_else(|| cfg.state_dir.as_ref().map(|dir| dir.join(DEFAULT_STATE_FILE)))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_FILE));

    let items = load_items(args);
    let log = state::load_log(&state_path);
    debug!(
        items = items.len(),
        judgments = log.facts.len(),
        state = %state_path.display(),
        "loaded session"
    );
    let session = Session::from_log(items, log)
        .unwrap_or_else(|e| bail(format!("Judgment file {} is unusable: {e}", state_path.display())));

    Context { cfg, state_path, session }
}

fn lookup(session: &Session, name: &str) -> ItemId {
    session
        .id_of(name)
        .unwrap_or_else(|| bail(format!("\"{name}\" is not in the item list")))
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Rank(args) => run_rank(args),
        Commands::Prefer(args) => run_prefer(args),
        Commands::Ignore(args) => run_ignore(args),
        Commands::Init => {
            let path = config::config_path();
            config::create_default_config(&path);
            println!("Created config at {}", path.display());
            println!("Edit it to set a default seed, insertion threshold, or state directory.");
        }
    }
}

fn run_rank(args: RankArgs) {
    let Context { cfg, state_path, mut session } = open(&args.list);

    let insertion_threshold = args
        .insertion_threshold
        .or(cfg.insertion_threshold)
        .unwrap_or(EngineConfig::default().insertion_threshold);
    let engine = RankingEngine::new(EngineConfig { insertion_threshold }).unwrap_or_else(|e| bail(e));

    // Every attempt must reuse one seed: then each question answered is one
    // the final, complete sort also needs.
    let seed = args
        .seed
        .or(session.log.seed)
        .or(cfg.seed)
        .unwrap_or_else(|| rand::rng().random());
    if session.log.seed != Some(seed) {
        session.log.seed = Some(seed);
        state::save_log(&state_path, &session.log);
    }
    debug!(seed, insertion_threshold, "ranking");

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let order = loop {
        let order = attempt(&session, &engine, seed);
        let Some((a, b)) = order.choice.filter(|_| !args.once) else {
            break order;
        };

        let answer = prompt::ask(
            session.name_of(a),
            session.name_of(b),
            order.choices_remaining,
            &mut input,
            &mut io::stderr(),
        )
        .unwrap_or_else(|e| bail(format!("Failed to read answer: {e}")));

        let result = match answer {
            Answer::First => session.prefer(a, b).map(|_| ()),
            Answer::Second => session.prefer(b, a).map(|_| ()),
            Answer::IgnoreFirst => session.ignore(a),
            Answer::IgnoreSecond => session.ignore(b),
            Answer::Quit => break order,
        };
        result.unwrap_or_else(|e| bail(e));
        state::save_log(&state_path, &session.log);
    };

    if args.json {
        println!("{}", output::render_json(&order, &session));
    } else {
        print!("{}", output::render_table(&order, &session));
    }
}

fn attempt(session: &Session, engine: &RankingEngine, seed: u64) -> ListOrder {
    let mut rng = StdRng::seed_from_u64(seed);
    session
        .list
        .attempt_order(engine, &mut rng)
        .unwrap_or_else(|e| bail(e))
}

fn run_prefer(args: PreferArgs) {
    let Context { state_path, mut session, .. } = open(&args.list);
    let greater = lookup(&session, &args.greater);
    let lesser = lookup(&session, &args.lesser);

    let added = session.prefer(greater, lesser).unwrap_or_else(|e| bail(e));
    if added {
        state::save_log(&state_path, &session.log);
        info!(greater = %args.greater, lesser = %args.lesser, "recorded judgment");
        println!("Recorded: \"{}\" over \"{}\"", args.greater, args.lesser);
    } else {
        println!("Already known: \"{}\" over \"{}\"", args.greater, args.lesser);
    }
}

fn run_ignore(args: IgnoreArgs) {
    let Context { state_path, mut session, .. } = open(&args.list);
    let id = lookup(&session, &args.item);

    if args.restore {
        session.restore(id).unwrap_or_else(|e| bail(e));
        println!("Restored \"{}\"", args.item);
    } else {
        session.ignore(id).unwrap_or_else(|e| bail(e));
        println!("Ignoring \"{}\"", args.item);
    }
    state::save_log(&state_path, &session.log);
}
