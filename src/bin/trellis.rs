//! Trellis CLI: node canonicalization, URI tools and statement queries.
//!
//! Usage:
//!   trellis node <kind> <value>
//!   trellis uri resolve|relative|file ...
//!   trellis query <file.jsonl> [-s S] [-p P] [-o O] [-g G] [--count]

use clap::{Parser, Subcommand, ValueEnum};
use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use trellis::{
    Env, Inserter, Model, ModelConfig, Node, Sink, Statement, StatementFlags, TrellisError,
    TrellisResult, World,
};

#[derive(Parser)]
#[command(name = "trellis", version, about = "RDF node canonicalization and statement store")]
struct Cli {
    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the canonical literal for a value
    Node {
        /// Kind of literal to build
        kind: NodeKind,
        /// Value to canonicalize
        value: String,
    },
    /// URI resolution tools
    Uri {
        #[command(subcommand)]
        action: UriAction,
    },
    /// Load JSON-lines statements and print those matching a pattern
    Query {
        /// File with one JSON statement per line
        file: PathBuf,
        /// Subject URI
        #[arg(short)]
        s: Option<String>,
        /// Predicate URI
        #[arg(short)]
        p: Option<String>,
        /// Object URI
        #[arg(short)]
        o: Option<String>,
        /// Graph URI
        #[arg(short)]
        g: Option<String>,
        /// Print only the number of matches
        #[arg(long)]
        count: bool,
        /// Model configuration file (YAML or JSON)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum NodeKind {
    Double,
    Float,
    Integer,
    Decimal,
    Boolean,
    Blob,
    String,
}

#[derive(Subcommand)]
enum UriAction {
    /// Resolve a reference against a base URI
    Resolve { reference: String, base: String },
    /// Express a URI relative to a base
    Relative {
        uri: String,
        base: String,
        /// Only relativise URIs under this root
        #[arg(long)]
        root: Option<String>,
    },
    /// Build a file URI from a path
    File {
        path: String,
        #[arg(long)]
        host: Option<String>,
    },
}

/// Default model config path (~/.config/trellis/model.yaml)
fn default_config_path() -> Option<PathBuf> {
    let path = dirs::config_dir()?.join("trellis").join("model.yaml");
    path.exists().then_some(path)
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn parse_value<T: std::str::FromStr>(value: &str) -> TrellisResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| TrellisError::BadArg(format!("cannot parse '{}'", value)))
}

fn build_node(kind: NodeKind, value: &str) -> TrellisResult<Node> {
    match kind {
        NodeKind::Double => Ok(Node::double(parse_value(value)?)),
        NodeKind::Float => Ok(Node::float(parse_value(value)?)),
        NodeKind::Integer => Ok(Node::integer(parse_value(value)?, None)),
        NodeKind::Decimal => Node::decimal(parse_value(value)?, 0, 8, None),
        NodeKind::Boolean => Ok(Node::boolean(parse_value(value)?)),
        NodeKind::Blob => Node::blob(value.as_bytes(), true, None),
        NodeKind::String => Ok(Node::string(value)),
    }
}

fn cmd_node(kind: NodeKind, value: &str) -> i32 {
    match build_node(kind, value) {
        Ok(node) => {
            println!("{}", node.as_str());
            if let Some(datatype) = node.datatype() {
                println!("{}", datatype.as_str());
            }
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn cmd_uri(action: UriAction) -> i32 {
    let result = match action {
        UriAction::Resolve { reference, base } => {
            Node::uri(&base)
                .and_then(|base| Node::resolved_uri(&reference, &base))
                .map(|n| n.as_str().to_string())
        }
        UriAction::Relative { uri, base, root } => {
            Node::uri(&base).and_then(|base| {
                let root = root.map(|r| Node::uri(&r)).transpose()?;
                Node::relative_uri(&uri, &base, root.as_ref())
            })
            .map(|n| n.as_str().to_string())
        }
        UriAction::File { path, host } => {
            Node::file_uri(&path, host.as_deref()).map(|n| n.as_str().to_string())
        }
    };
    match result {
        Ok(uri) => {
            println!("{}", uri);
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn load_config(config: Option<PathBuf>) -> TrellisResult<ModelConfig> {
    match config.or_else(default_config_path) {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading model config");
            ModelConfig::load(&path)
        }
        None => Ok(ModelConfig::default()),
    }
}

/// Read one JSON statement per line into `sink`, skipping blank lines
fn load_statements(path: &Path, sink: &mut dyn Sink) -> TrellisResult<usize> {
    let file = std::fs::File::open(path)?;
    let mut loaded = 0;
    for (number, line) in std::io::BufReader::new(file).lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let statement: Statement = serde_json::from_str(&line).map_err(|e| {
            TrellisError::Invalid(format!("{}:{}: {}", path.display(), number + 1, e))
        })?;
        sink.on_statement(StatementFlags::empty(), &statement)?;
        loaded += 1;
    }
    Ok(loaded)
}

struct QueryArgs {
    file: PathBuf,
    pattern: [Option<String>; 4],
    count: bool,
    config: Option<PathBuf>,
}

fn run_query(world: Arc<World>, args: QueryArgs) -> TrellisResult<()> {
    let config = load_config(args.config)?;
    let mut model = Model::new(world, config.to_flags()?)?;

    let absolute = std::fs::canonicalize(&args.file).unwrap_or_else(|_| args.file.clone());
    let base = Node::file_uri(&absolute.to_string_lossy(), None)?;
    let loaded = {
        let mut inserter = Inserter::new(&mut model, Env::new(Some(&base)));
        load_statements(&args.file, &mut inserter)?
    };
    tracing::debug!(loaded, size = model.size(), "loaded statements");

    let [s, p, o, g] = args
        .pattern
        .map(|uri| uri.map(|u| Node::uri(&u)).transpose());
    let (s, p, o, g) = (s?, p?, o?, g?);
    if args.count {
        println!("{}", model.count(s.as_ref(), p.as_ref(), o.as_ref(), g.as_ref())?);
        return Ok(());
    }
    for statement in model.range(s.as_ref(), p.as_ref(), o.as_ref(), g.as_ref()) {
        println!("{}", statement?);
    }
    Ok(())
}

fn cmd_query(args: QueryArgs) -> i32 {
    let world = Arc::new(World::new());
    match run_query(Arc::clone(&world), args) {
        Ok(()) => 0,
        Err(e) => {
            let status = world.report(&e);
            eprintln!("Error: {}", e);
            status.code()
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let code = match cli.command {
        Commands::Node { kind, value } => cmd_node(kind, &value),
        Commands::Uri { action } => cmd_uri(action),
        Commands::Query {
            file,
            s,
            p,
            o,
            g,
            count,
            config,
        } => cmd_query(QueryArgs {
            file,
            pattern: [s, p, o, g],
            count,
            config,
        }),
    };
    std::process::exit(code);
}
