use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use liner_core::taxonomy::{RoleCategory, RoleTaxonomy, RoleTaxonomyEntry};
use liner_resolve::Config;

/// Get the default taxonomy file path (platform-specific).
fn default_taxonomy_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
    Ok(config_dir.join("liner").join("roles.toml"))
}

fn group_by_category(taxonomy: &RoleTaxonomy) -> BTreeMap<RoleCategory, Vec<&RoleTaxonomyEntry>> {
    let mut groups: BTreeMap<RoleCategory, Vec<&RoleTaxonomyEntry>> = BTreeMap::new();
    for entry in taxonomy.entries() {
        groups.entry(entry.category).or_default().push(entry);
    }
    groups
}

/// List the active taxonomy grouped by category.
pub fn show_taxonomy(config: &Config) -> Result<()> {
    let taxonomy = config.load_taxonomy()?;

    match &config.taxonomy_path {
        Some(path) => println!("Role taxonomy: {}", path.display()),
        None => println!("Role taxonomy: built-in"),
    }
    println!();

    for (category, entries) in group_by_category(&taxonomy) {
        println!("{}", category);
        for entry in entries {
            let aliases: Vec<&str> = entry.aliases.iter().map(String::as_str).collect();
            if aliases.is_empty() {
                println!("  {}", entry.canonical);
            } else {
                println!("  {:<22} {}", entry.canonical, aliases.join(", "));
            }
        }
        println!();
    }

    let report = taxonomy.report();
    println!("{} roles, {} aliases", report.entries, report.aliases);
    Ok(())
}

fn validate_file(path: &Path) -> Result<RoleTaxonomy> {
    RoleTaxonomy::load(path).with_context(|| format!("Invalid taxonomy: {}", path.display()))
}

/// Validate a taxonomy file, or the configured one when no path is given.
pub fn validate_taxonomy(config: &Config, path: Option<PathBuf>) -> Result<()> {
    let taxonomy = match path.as_deref().or(config.taxonomy_path.as_deref()) {
        Some(path) => {
            println!("Validating {}", path.display());
            validate_file(path)?
        }
        None => {
            println!("Validating built-in taxonomy");
            config.load_taxonomy()?
        }
    };

    let report = taxonomy.report();
    println!(
        "✓ Taxonomy is valid: {} roles, {} aliases",
        report.entries, report.aliases
    );
    Ok(())
}

/// Print the active taxonomy as TOML.
pub fn export_taxonomy(config: &Config) -> Result<()> {
    let taxonomy = config.load_taxonomy()?;
    print!("{}", taxonomy.to_toml_string()?);
    Ok(())
}

fn write_builtin(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("Failed to create config directory")?;
    }
    let content = RoleTaxonomy::builtin()?.to_toml_string()?;
    fs::write(path, content).context("Failed to write taxonomy file")?;
    Ok(true)
}

/// Write the built-in taxonomy to the default path for editing.
pub fn init_taxonomy() -> Result<()> {
    let path = default_taxonomy_path()?;

    if write_builtin(&path)? {
        println!("✓ Created taxonomy file at: {}", path.display());
        println!("\nNext steps:");
        println!("  1. Edit the roles and aliases");
        println!("  2. Validate syntax: liner taxonomy validate {}", path.display());
        println!("  3. Point liner at it: liner config set taxonomy_path {}", path.display());
    } else {
        println!("✓ Taxonomy file already exists at: {}", path.display());
    }

    Ok(())
}

/// Show the default taxonomy file path.
pub fn show_path() -> Result<()> {
    println!("{}", default_taxonomy_path()?.display());
    Ok(())
}
