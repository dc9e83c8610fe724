use anyhow::{Context, Result};
use toml_edit::{value, DocumentMut, Item, Table};

use liner_core::provenance::SourceId;
use liner_resolve::{config, Config};

const THRESHOLD_KEYS: &[&str] = &[
    "confidence_threshold",
    "role_similarity_threshold",
    "name_similarity_threshold",
    "corroboration_bonus",
];

fn valid_keys() -> String {
    let mut keys: Vec<String> = THRESHOLD_KEYS.iter().map(|k| (*k).to_string()).collect();
    keys.push("taxonomy_path".to_string());
    keys.push("source_priority.<source>".to_string());
    keys.join(", ")
}

/// Show the current effective configuration.
pub fn show_config() -> Result<()> {
    let config = Config::load()?;

    println!("Current Configuration");
    println!("=====================\n");

    println!("Config file: {}", config::config_file_path().display());

    let exists = config::config_file_path().exists();
    println!("File exists: {}\n", if exists { "yes" } else { "no (using defaults)" });

    println!("Settings:");
    println!("  confidence_threshold: {}", config.confidence_threshold);
    println!("  role_similarity_threshold: {}", config.role_similarity_threshold);
    println!("  name_similarity_threshold: {}", config.name_similarity_threshold);
    println!("  corroboration_bonus: {}", config.corroboration_bonus);
    println!(
        "  taxonomy_path: {}",
        config
            .taxonomy_path
            .as_ref()
            .map_or_else(|| String::from("<built-in>"), |p| p.display().to_string())
    );
    println!("  logging.level: {:?}", config.logging.level());
    println!("  logging.coloured: {}", config.logging.coloured());
    println!("  logging.output: {:?}", config.logging.output());

    println!("\nSource priority (higher wins ties):");
    let ranking = config.ranking();
    let mut sources: Vec<SourceId> = SourceId::all().collect();
    sources.sort_by_key(|s| std::cmp::Reverse(ranking.rank(*s)));
    for source in sources {
        println!("  {}: {}", source, ranking.rank(source));
    }

    println!("\nPriority: CLI args > ENV vars (LINER_*) > Config file > Defaults");

    Ok(())
}

fn config_value(config: &Config, key: &str) -> Result<String> {
    if let Some(name) = key.strip_prefix("source_priority.") {
        let source = SourceId::parse(name)
            .ok_or_else(|| anyhow::anyhow!("Unknown source: {}", name))?;
        return Ok(config.ranking().rank(source).to_string());
    }

    let rendered = match key {
        "confidence_threshold" => config.confidence_threshold.to_string(),
        "role_similarity_threshold" => config.role_similarity_threshold.to_string(),
        "name_similarity_threshold" => config.name_similarity_threshold.to_string(),
        "corroboration_bonus" => config.corroboration_bonus.to_string(),
        "taxonomy_path" => config
            .taxonomy_path
            .as_ref()
            .map_or_else(|| String::from("<built-in>"), |p| p.display().to_string()),
        _ => {
            anyhow::bail!("Unknown config key: {}\n\nValid keys: {}", key, valid_keys());
        }
    };
    Ok(rendered)
}

/// Get a specific config value.
pub fn get_config(key: Option<String>) -> Result<()> {
    if let Some(key) = key {
        let config = Config::load()?;
        println!("{}", config_value(&config, &key)?);
    } else {
        // No key provided, show entire config file contents
        let config_path = config::config_file_path();

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path)
                .context("Failed to read config file")?;
            print!("{}", contents);
        } else {
            println!("Config file does not exist: {}", config_path.display());
            println!("\nRun 'liner config init' to create it.");
        }
    }

    Ok(())
}

/// Write one setting into a parsed config document, keeping its comments
/// and layout.
fn apply_setting(doc: &mut DocumentMut, key: &str, raw: &str) -> Result<()> {
    if let Some(name) = key.strip_prefix("source_priority.") {
        let source = SourceId::parse(name)
            .ok_or_else(|| anyhow::anyhow!("Unknown source: {}", name))?;
        let rank: u32 = raw
            .parse()
            .with_context(|| format!("{} must be a non-negative whole number", key))?;

        if !doc.contains_key("source_priority") {
            doc.insert("source_priority", Item::Table(Table::new()));
        }
        let table = doc["source_priority"]
            .as_table_mut()
            .ok_or_else(|| anyhow::anyhow!("source_priority is not a table"))?;
        table.insert(source.name(), value(i64::from(rank)));
        return Ok(());
    }

    if THRESHOLD_KEYS.contains(&key) {
        let number: f64 = raw
            .parse()
            .with_context(|| format!("{} must be a number", key))?;
        if !(0.0..=1.0).contains(&number) {
            anyhow::bail!("{} must be within [0, 1], got {}", key, number);
        }
        doc[key] = value(number);
        return Ok(());
    }

    match key {
        "taxonomy_path" => {
            doc[key] = value(raw);
            Ok(())
        }
        _ => anyhow::bail!("Unknown config key: {}\n\nValid keys: {}", key, valid_keys()),
    }
}

/// Set a config value.
pub fn set_config(key: &str, raw: &str) -> Result<()> {
    let config_path = config::config_file_path();

    // Ensure config file exists
    config::ensure_config_file()?;

    let contents = std::fs::read_to_string(&config_path)
        .context("Failed to read config file")?;
    let mut doc: DocumentMut = contents
        .parse()
        .with_context(|| format!("Failed to parse {}", config_path.display()))?;

    apply_setting(&mut doc, key, raw)?;

    std::fs::write(&config_path, doc.to_string())
        .context("Failed to write config file")?;

    println!("✓ Updated {} = {}", key, raw);
    println!("  in {}", config_path.display());

    Ok(())
}

/// Show the config file path.
pub fn show_path() -> Result<()> {
    let config_path = config::config_file_path();
    println!("{}", config_path.display());
    Ok(())
}

/// Show example configuration.
pub fn show_example() -> Result<()> {
    print!("{}", config::example_config());
    Ok(())
}

/// Initialize config file with defaults.
pub fn init_config() -> Result<()> {
    let created = config::ensure_config_file()?;
    let config_path = config::config_file_path();

    if created {
        println!("✓ Created config file: {}", config_path.display());
        println!("\nEdit this file to configure liner.");
    } else {
        println!("Config file already exists: {}", config_path.display());
    }

    Ok(())
}
