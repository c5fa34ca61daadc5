//! CLI subcommand handlers.

use crate::Commands;
use crate::ConfigAction;
use crate::SavedAction;
use crate::render::{render_saved_list, render_table};
use compara_core::config::init_workspace_config;
use compara_core::{
    Catalog, ComparaConfig, ComparisonSession, FileStore, ItemId, NotificationKind, Notifier,
    SessionOptions, SnapshotStore, build_catalog, load_config, sort_keys,
};
use std::path::Path;
use std::sync::Arc;

/// Prints notifications to the terminal.
struct ConsoleNotifier {
    quiet: bool,
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, title: &str, description: &str, kind: NotificationKind) {
        match kind {
            NotificationKind::Error => eprintln!("{title}: {description}"),
            _ if self.quiet => {}
            _ => println!("{title}: {description}"),
        }
        tracing::debug!(%title, %description, %kind, "notification");
    }
}

fn parse_ids(raw: &[String]) -> Vec<ItemId> {
    raw.iter()
        .flat_map(|s| s.split(','))
        .filter(|s| !s.trim().is_empty())
        .map(|s| s.parse::<ItemId>().unwrap_or_else(|e| match e {}))
        .collect()
}

/// Hide every key in `hidden`. Returns the keys the comparison does not have.
fn hide_keys<'a>(session: &mut ComparisonSession, hidden: &'a [String]) -> Vec<&'a str> {
    hidden
        .iter()
        .map(String::as_str)
        .filter(|key| !session.hide(key))
        .collect()
}

fn open_session(config: &ComparaConfig, quiet: bool) -> ComparisonSession {
    let store = FileStore::new(config.storage.resolved_path());
    let snapshots = SnapshotStore::with_key(Arc::new(store), config.storage.comparisons_key.clone());
    ComparisonSession::new(
        snapshots,
        Arc::new(ConsoleNotifier { quiet }),
        SessionOptions::from(config),
    )
}

fn load(workspace: &Path) -> anyhow::Result<ComparaConfig> {
    load_config(Some(workspace)).map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
}

/// Handle a CLI subcommand.
pub async fn handle_command(command: Commands, workspace: &Path, quiet: bool) -> anyhow::Result<()> {
    match command {
        Commands::Compare {
            ids,
            hidden,
            no_highlight,
            save,
            json,
        } => handle_compare(workspace, &ids, &hidden, no_highlight, save, json, quiet).await,
        Commands::Keys { ids } => handle_keys(workspace, &ids).await,
        Commands::Saved { action } => handle_saved(action, workspace, quiet).await,
        Commands::Config { action } => handle_config(action, workspace),
    }
}

async fn handle_compare(
    workspace: &Path,
    raw_ids: &[String],
    hidden: &[String],
    no_highlight: bool,
    save: Option<String>,
    json: bool,
    quiet: bool,
) -> anyhow::Result<()> {
    let mut config = load(workspace)?;
    if no_highlight {
        config.comparison.highlight_best = false;
    }
    let catalog = build_catalog(&config.catalog)?;
    let mut session = open_session(&config, quiet);

    let ids = parse_ids(raw_ids);
    session.load(catalog.as_ref(), &ids).await?;
    if session.items().is_empty() {
        anyhow::bail!("None of the requested products exist in the catalog");
    }

    for key in hide_keys(&mut session, hidden) {
        eprintln!("Unknown specification '{key}', ignoring");
    }

    let table = session.table();
    if json {
        println!("{}", serde_json::to_string_pretty(&table)?);
    } else {
        print!("{}", render_table(&table));
    }

    if let Some(name) = save {
        session.save(&name)?;
    }
    Ok(())
}

async fn handle_keys(workspace: &Path, raw_ids: &[String]) -> anyhow::Result<()> {
    let config = load(workspace)?;
    let catalog = build_catalog(&config.catalog)?;
    let items = catalog.fetch_items(&parse_ids(raw_ids)).await?;
    let keys = compara_core::extract_keys(&items);
    for key in sort_keys(&keys) {
        println!("{key}");
    }
    Ok(())
}

async fn handle_saved(action: SavedAction, workspace: &Path, quiet: bool) -> anyhow::Result<()> {
    let config = load(workspace)?;
    let mut session = open_session(&config, quiet);

    match action {
        SavedAction::List => {
            let saved = session.saved();
            if saved.is_empty() {
                println!("No saved comparisons.");
            } else {
                print!("{}", render_saved_list(&saved));
            }
            Ok(())
        }
        SavedAction::Show { id } => {
            let saved = session
                .snapshots()
                .find(&id)
                .ok_or_else(|| anyhow::anyhow!("No saved comparison with id '{}'", id))?;
            println!("{}", serde_json::to_string_pretty(&saved)?);
            Ok(())
        }
        SavedAction::Open { id } => {
            let saved = session
                .snapshots()
                .find(&id)
                .ok_or_else(|| anyhow::anyhow!("No saved comparison with id '{}'", id))?;
            let catalog = build_catalog(&config.catalog)?;
            session.restore(&saved, catalog.as_ref()).await?;
            println!("{} (saved {})", saved.name, saved.date_created);
            print!("{}", render_table(&session.table()));
            Ok(())
        }
        SavedAction::Clear => {
            session.clear_saved()?;
            Ok(())
        }
    }
}

fn handle_config(action: ConfigAction, workspace: &Path) -> anyhow::Result<()> {
    match action {
        ConfigAction::Init => {
            let (path, created) = init_workspace_config(workspace)?;
            if created {
                println!("Created default configuration at: {}", path.display());
            } else {
                println!("Configuration file already exists at: {}", path.display());
            }
            Ok(())
        }
        ConfigAction::Show => {
            let config = load(workspace)?;
            println!("{}", toml::to_string_pretty(&config)?);
            println!(
                "# storage file: {}",
                config.storage.resolved_path().display()
            );
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use compara_core::{ComparableItem, MemoryStore};

    #[test]
    fn test_hide_keys_repeated_stays_hidden() {
        let mut session = ComparisonSession::new(
            SnapshotStore::new(Arc::new(MemoryStore::new())),
            Arc::new(ConsoleNotifier { quiet: true }),
            SessionOptions::default(),
        );
        session
            .set_items(vec![
                ComparableItem::new(1, "Vac")
                    .with_spec("Brand", "Aco")
                    .with_spec("Weight", "2 kg"),
            ])
            .unwrap();

        let hidden = vec!["Brand".to_string(), "Brand".to_string(), "Colour".to_string()];
        assert_eq!(hide_keys(&mut session, &hidden), vec!["Colour"]);
        assert!(!session.is_visible("Brand"));
        assert!(session.is_visible("Weight"));
    }

    #[test]
    fn test_parse_ids_mixes_numbers_and_slugs() {
        let raw = vec!["10,11".to_string(), "robo-clean".to_string(), " ".to_string()];
        assert_eq!(
            parse_ids(&raw),
            vec![
                ItemId::Number(10),
                ItemId::Number(11),
                ItemId::Text("robo-clean".into())
            ]
        );
    }
}
