mod cmd;
mod logging;

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use vaultdex_core::config::ResolvedConfig;
use vaultdex_core::config::loader::ConfigLoader;

use cmd::query::{Lookup, parse_value};

#[derive(Debug, Parser)]
#[command(name = "vdx", version, about = "Index a markdown vault and query its notes")]
struct Cli {
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[arg(long, global = true)]
    profile: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Validate configuration and print resolved paths
    Doctor,

    /// Index every note in the vault into the cache
    Index(IndexArgs),

    /// Re-index changed notes and drop cache entries for deleted ones
    Refresh(RefreshArgs),

    /// Look up cached notes
    Query(QueryArgs),

    /// Compare the cache against the vault
    Verify,
}

#[derive(Debug, Args)]
struct IndexArgs {
    /// Remove every cache entry before indexing
    #[arg(long)]
    clean: bool,
}

#[derive(Debug, Args)]
struct RefreshArgs {
    /// Only re-index files modified at or after this time
    /// (RFC 3339 or YYYY-MM-DD; defaults to the last run)
    #[arg(long, value_parser = cmd::refresh::parse_since)]
    since: Option<DateTime<Utc>>,
}

#[derive(Debug, Args)]
struct QueryArgs {
    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    by: QueryBy,
}

#[derive(Debug, Subcommand)]
enum QueryBy {
    /// Note with this id (its vault-relative path)
    Id { id: String },

    /// Note at this vault-relative path
    Path { path: String },

    /// Notes whose file name without extension matches
    Basename { name: String },

    /// Notes with this fileClass
    Class { file_class: String },

    /// Notes whose frontmatter field equals a value (parsed as YAML)
    Field { name: String, value: String },
}

impl From<QueryBy> for Lookup {
    fn from(by: QueryBy) -> Self {
        match by {
            QueryBy::Id { id } => Lookup::Id(id),
            QueryBy::Path { path } => Lookup::Path(path),
            QueryBy::Basename { name } => Lookup::Basename(name),
            QueryBy::Class { file_class } => Lookup::FileClass(file_class),
            QueryBy::Field { name, value } => Lookup::Field { name, value: parse_value(&value) },
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = cli.config.as_deref();
    let profile = cli.profile.as_deref();

    let code = match cli.command {
        Commands::Doctor => cmd::doctor::run(config, profile),
        Commands::Index(args) => with_config(config, profile, |rc| cmd::index::run(rc, args.clean)),
        Commands::Refresh(args) => {
            with_config(config, profile, |rc| cmd::refresh::run(rc, args.since))
        }
        Commands::Query(args) => with_config(config, profile, |rc| {
            cmd::query::run(rc, &Lookup::from(args.by), args.json)
        }),
        Commands::Verify => with_config(config, profile, cmd::verify::run),
    };

    logging::flush();
    code
}

/// Load the config, start logging and hand the config to `run`.
fn with_config<F>(config: Option<&Path>, profile: Option<&str>, run: F) -> ExitCode
where
    F: FnOnce(&ResolvedConfig) -> ExitCode,
{
    match ConfigLoader::load(config, profile) {
        Ok(rc) => {
            logging::init(&rc.logging);
            run(&rc)
        }
        Err(e) => {
            eprintln!("Error loading config: {e}");
            ExitCode::FAILURE
        }
    }
}
