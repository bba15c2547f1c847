//! CLI command definitions and handlers

pub mod expand;
pub mod index;
pub mod sample;
pub mod search;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use crate::core::config::Config;
use crate::expand::{HybridProvider, RemoteExpansionProvider};
use crate::names::NameEquivalenceGraph;
use crate::phonetic::PhoneticEncoder;
use crate::pipeline::EnrichmentPipeline;

const LONG_ABOUT: &str = r#"
Nickname- and sound-aware person name search.

Names are expanded through a nickname graph (and, when Workers AI
credentials are configured, a remote model) and encoded with Double
Metaphone, so "liz" finds Elizabeth and "Smyth" finds Smith.

QUICK START:
    1. nameseek index people.json    Index a JSON array of person records
    2. nameseek search "liz smyth"   Search them

    nameseek sample -n 500           Or seed the index with synthetic people

INSPECT:
    nameseek expand bob              Show a name's nickname expansion
    nameseek phonetic Katherine      Show Double Metaphone codes
    nameseek terms "bob smith"       Show the OR-terms a query becomes

REMOTE EXPANSION:
    Set CLOUDFLARE_ACCOUNT_ID and CLOUDFLARE_API_TOKEN (or the [remote]
    section of config.toml). Without them, or with --local, only the
    nickname graph is used.

LOGGING:
    NAMESEEK_LOG=debug nameseek search liz
"#;

/// Nickname- and sound-aware person name search
#[derive(Parser, Debug)]
#[command(name = "nameseek")]
#[command(author, version)]
#[command(about = "Nickname- and sound-aware person name search")]
#[command(long_about = LONG_ABOUT)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Expand a name into nicknames and equivalents
    #[command(visible_alias = "e")]
    Expand(ExpandArgs),

    /// Show the Double Metaphone codes of a term
    #[command(visible_alias = "p")]
    Phonetic(PhoneticArgs),

    /// Show the OR-terms a query expands to
    Terms(TermsArgs),

    /// Index person records from a JSON file
    #[command(visible_alias = "i")]
    Index(IndexArgs),

    /// Index generated sample records
    Sample(SampleArgs),

    /// Search indexed records
    #[command(visible_alias = "s")]
    Search(SearchArgs),
}

#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:
    nameseek expand Liz             Graph + remote (if configured)
    nameseek expand Liz --local     Nickname graph only")]
pub struct ExpandArgs {
    /// Name to expand
    pub name: String,

    /// Nickname graph only, no remote model
    #[arg(short, long)]
    pub local: bool,

    /// JSON output
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
pub struct PhoneticArgs {
    /// Term to encode
    pub term: String,

    /// JSON output
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
pub struct TermsArgs {
    /// Free-text query
    pub query: String,

    /// Nickname graph only, no remote model
    #[arg(short, long)]
    pub local: bool,
}

/// Arguments for the index command
#[derive(Parser, Debug)]
#[command(after_help = "RECORDS:
    A JSON array of objects with firstName and lastName, and optionally
    id, middleName, city, state and dob (YYYY-MM-DD). Records without an
    id get a random one; an existing id is replaced.

EXAMPLES:
    nameseek index people.json
    nameseek index people.json --force     Drop the index first")]
pub struct IndexArgs {
    /// JSON file with an array of records
    pub records: PathBuf,

    /// Drop the existing index before indexing
    #[arg(short, long)]
    pub force: bool,

    /// Nickname graph only, no remote model
    #[arg(short, long)]
    pub local: bool,
}

/// Arguments for the sample command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:
    nameseek sample                 Index 100 synthetic people
    nameseek sample -n 5000 --local At most 5000 per run")]
pub struct SampleArgs {
    /// Number of records to generate (1 to 5000)
    #[arg(short = 'n', long, default_value = "100")]
    pub count: usize,

    /// Nickname graph only, no remote model
    #[arg(short, long)]
    pub local: bool,
}

/// Arguments for the search command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:
    nameseek search liz                 Nickname match
    nameseek search \"jon smyth\" -n 5    Sound-alike match, 5 results
    nameseek search bob --json          JSON output")]
pub struct SearchArgs {
    /// Search query
    pub query: String,

    /// Max results (default from config)
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,

    /// JSON output
    #[arg(long)]
    pub json: bool,

    /// Nickname graph only, no remote model
    #[arg(short, long)]
    pub local: bool,
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Human,
    Json,
}

impl OutputFormat {
    pub fn from_flag(json: bool) -> Self {
        if json {
            Self::Json
        } else {
            Self::Human
        }
    }
}

/// Expansion provider for a command
pub fn build_provider(config: &Config, local: bool) -> HybridProvider {
    let graph = Arc::new(NameEquivalenceGraph::load(config.dictionary.path.as_deref()));
    if local {
        RemoteExpansionProvider::local(graph)
    } else {
        HybridProvider::from_config(&config.remote, graph)
    }
}

pub fn build_pipeline(config: &Config, local: bool) -> EnrichmentPipeline<HybridProvider> {
    EnrichmentPipeline::new(
        Arc::new(build_provider(config, local)),
        PhoneticEncoder::from_config(&config.phonetic),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_search() {
        let cli = Cli::parse_from(["nameseek", "search", "liz smith", "-n", "3", "--json"]);
        match cli.command {
            Commands::Search(args) => {
                assert_eq!(args.query, "liz smith");
                assert_eq!(args.limit, Some(3));
                assert!(args.json);
                assert!(!args.local);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_sample() {
        let cli = Cli::parse_from(["nameseek", "sample"]);
        match cli.command {
            Commands::Sample(args) => assert_eq!(args.count, 100),
            other => panic!("unexpected command {:?}", other),
        }

        let cli = Cli::parse_from(["nameseek", "sample", "-n", "2500", "--local"]);
        match cli.command {
            Commands::Sample(args) => {
                assert_eq!(args.count, 2500);
                assert!(args.local);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_local_provider_ignores_credentials() {
        let mut config = Config::default();
        config.remote.account_id = Some("acct".to_string());
        config.remote.api_token = Some("token".to_string());

        assert!(build_provider(&config, false).is_remote());
        assert!(!build_provider(&config, true).is_remote());
    }
}
