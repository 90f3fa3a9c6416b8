use clap::{Parser, Subcommand};
use sitai::display::SortKey;
use sitai::form::PointFields;
use sitai_core::PointId;
use sitai_db::SearchField;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sitai")]
#[command(author, version, about = "Catalog of archaeological excavation points")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Database file (overrides the config file)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the database file and table if they do not exist
    Init,

    /// List all excavation points
    List {
        /// Column to order by
        #[arg(long, value_enum, default_value_t = SortKey::Id)]
        sort: SortKey,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the details of one point
    Show {
        /// Point ID
        id: PointId,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Register a new excavation point
    Create {
        #[command(flatten)]
        fields: PointFields,
    },

    /// Load a point and change some of its fields
    Update {
        /// Point ID
        id: PointId,

        #[command(flatten)]
        fields: PointFields,
    },

    /// Remove a point after confirmation
    Delete {
        /// Point ID
        id: PointId,

        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Search points by substring
    Search {
        /// Text to look for; empty lists everything
        #[arg(default_value = "")]
        query: String,

        /// Restrict the search to one column
        #[arg(long, value_parser = parse_search_field)]
        field: Option<SearchField>,

        /// Column to order results by
        #[arg(long, value_enum, default_value_t = SortKey::Id)]
        sort: SortKey,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List suggested point types and reference systems
    Vocabulary,

    /// Validate configuration file
    ValidateConfig {
        /// Config file to validate (uses --config if not specified)
        file: Option<PathBuf>,
    },
}

fn parse_search_field(s: &str) -> Result<SearchField, String> {
    s.parse()
}
