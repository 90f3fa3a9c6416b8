mod cli;

use sitai::{
    config::{self, Config},
    display::{self, SortKey, TableRow},
    form::{PointFields, KNOWN_POINT_TYPES},
};
use sitai_core::{Error as CoreError, PointId};
use sitai_db::{PointStore, SearchField};

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "sitai=debug,sitai_db=debug".to_string()
        } else {
            "sitai=warn,sitai_db=warn".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    let catalog = || -> Result<(Config, PathBuf)> {
        let config = config::load_config_or_default(cli.config.as_deref())?;
        let db_path = cli
            .db
            .clone()
            .unwrap_or_else(|| config.database.path.clone());
        Ok((config, db_path))
    };

    match cli.command {
        Commands::Init => {
            let (_, db_path) = catalog()?;
            init(&db_path)
        }
        Commands::List { sort, json } => {
            let (config, db_path) = catalog()?;
            list_points(&open_store(&db_path)?, &config, sort, json)
        }
        Commands::Show { id, json } => {
            let (config, db_path) = catalog()?;
            show_point(&open_store(&db_path)?, &config, id, json)
        }
        Commands::Create { fields } => {
            let (config, db_path) = catalog()?;
            create_point(&open_store(&db_path)?, &config, fields)
        }
        Commands::Update { id, fields } => {
            let (config, db_path) = catalog()?;
            update_point(&open_store(&db_path)?, &config, id, fields)
        }
        Commands::Delete { id, yes } => {
            let (config, db_path) = catalog()?;
            delete_point(&open_store(&db_path)?, &config, id, yes)
        }
        Commands::Search {
            query,
            field,
            sort,
            json,
        } => {
            let (config, db_path) = catalog()?;
            search_points(&open_store(&db_path)?, &config, &query, field, sort, json)
        }
        Commands::Vocabulary => vocabulary(),
        Commands::ValidateConfig { file } => {
            let path = file.or_else(|| cli.config.clone());
            validate_config(path.as_deref())
        }
    }
}

fn open_store(path: &Path) -> Result<PointStore> {
    tracing::debug!("Opening database at {}", path.display());
    PointStore::open(path).with_context(|| format!("Failed to open database {:?}", path))
}

/// Escalate an absent point into a hard error for commands that need one.
fn require_point(store: &PointStore, id: PointId) -> Result<sitai_core::ExcavationPoint> {
    store
        .get_by_id(id)?
        .ok_or_else(|| CoreError::not_found("point", id).into())
}

fn init(path: &Path) -> Result<()> {
    let store = open_store(path)?;
    store.init()?;
    println!(
        "Database ready at {} ({} points)",
        path.display(),
        store.count()?
    );
    Ok(())
}

fn list_points(store: &PointStore, config: &Config, sort: SortKey, json: bool) -> Result<()> {
    let points = display::sort_items(store.get_all()?, sort);

    if json {
        println!("{}", serde_json::to_string_pretty(&points)?);
        return Ok(());
    }

    if points.is_empty() {
        println!("No excavation points registered yet.");
        return Ok(());
    }

    let rows: Vec<TableRow> = points.iter().map(TableRow::from).collect();
    print!("{}", display::render_table(&rows, &config.display.date_format));
    Ok(())
}

fn show_point(store: &PointStore, config: &Config, id: PointId, json: bool) -> Result<()> {
    let point = require_point(store, id)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&point)?);
    } else {
        print!(
            "{}",
            display::render_detail(&point, &config.display.date_format)
        );
    }
    Ok(())
}

fn create_point(store: &PointStore, config: &Config, fields: PointFields) -> Result<()> {
    let point = fields.into_new_point(&config.defaults.srid)?;
    let id = store.create(&point)?;
    println!("Excavation point registered (ID: {id})");
    Ok(())
}

fn update_point(
    store: &PointStore,
    config: &Config,
    id: PointId,
    fields: PointFields,
) -> Result<()> {
    if fields.is_empty() {
        anyhow::bail!("Nothing to update: pass at least one field to change");
    }

    let loaded = require_point(store, id)?;
    let edited = fields.apply_to(loaded)?;

    if !store.update(&edited)? {
        // Removed between the load and the write.
        return Err(CoreError::not_found("point", id).into());
    }

    println!("Excavation point (ID: {id}) updated");
    print!(
        "{}",
        display::render_detail(&edited, &config.display.date_format)
    );
    Ok(())
}

fn delete_point(store: &PointStore, config: &Config, id: PointId, yes: bool) -> Result<()> {
    let point = require_point(store, id)?;

    print!(
        "{}",
        display::render_delete_summary(&point, config.display.description_preview)
    );

    if !yes && !confirm("Confirm deletion? [y/N] ")? {
        println!("Deletion cancelled.");
        return Ok(());
    }

    if store.delete(id)? {
        println!("Excavation point (ID: {id}) removed");
        Ok(())
    } else {
        Err(CoreError::not_found("point", id).into())
    }
}

fn confirm(prompt: &str) -> Result<bool> {
    let mut stdout = std::io::stdout();
    write!(stdout, "{prompt}")?;
    stdout.flush()?;

    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes" | "s" | "sim"))
}

fn search_points(
    store: &PointStore,
    config: &Config,
    query: &str,
    field: Option<SearchField>,
    sort: SortKey,
    json: bool,
) -> Result<()> {
    let results = display::sort_items(store.search(query, field)?, sort);

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    if results.is_empty() {
        println!("No results found.");
        return Ok(());
    }

    let rows: Vec<TableRow> = results.iter().map(TableRow::from).collect();
    println!("Results found: {}", rows.len());
    print!("{}", display::render_table(&rows, &config.display.date_format));
    Ok(())
}

fn vocabulary() -> Result<()> {
    println!("Point types:");
    for t in KNOWN_POINT_TYPES {
        println!("  {t}");
    }
    println!("  (any other text is accepted)");

    println!("\nReference systems:");
    for s in config::KNOWN_SRIDS {
        println!("  {s}");
    }
    println!("  (any other text is accepted)");
    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    let config = match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            config
        }
        None => {
            println!("No config file specified, using defaults");
            Config::default()
        }
    };

    println!("  Database: {}", display_path(&config.database.path).display());
    println!("  Default SRID: {}", config.defaults.srid);
    println!("  Date format: {}", config.display.date_format);

    for warning in config::config_warnings(&config) {
        println!("  warning: {warning}");
    }
    Ok(())
}

fn display_path(path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    }
}
