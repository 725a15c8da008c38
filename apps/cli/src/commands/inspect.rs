//! `cmdforge inspect` - print one command's argument tree.

use anyhow::{Context, anyhow};
use cmdforge_core::SpecLoader;
use colored::Colorize;
use std::path::Path;

/// Execute the inspect command.
pub async fn execute(dir: &Path, name: &str) -> anyhow::Result<()> {
    let report = SpecLoader::new(dir)
        .load()
        .with_context(|| format!("Failed to read commands directory {}", dir.display()))?;

    let spec = report
        .specs
        .iter()
        .find(|spec| {
            spec.name().eq_ignore_ascii_case(name)
                || spec.aliases().iter().any(|alias| alias.eq_ignore_ascii_case(name))
        })
        .ok_or_else(|| anyhow!("Command '{}' not found in {}", name, dir.display()))?;

    println!("{}", format!("/{}", spec.name()).bold().cyan());
    if !spec.aliases().is_empty() {
        println!("  Aliases: {}", spec.aliases().join(", ").dimmed());
    }
    if let Some(permission) = spec.permission() {
        println!("  Permission: {}", permission.dimmed());
    }
    if spec.cost() > 0.0 {
        println!("  Cost: {}", spec.cost());
    }
    if let Some(cooldown) = spec.cooldown() {
        println!("  Cooldown: {}", cooldown);
    }
    println!("  Usage: {}", spec.usage().dimmed());
    println!();

    for line in spec.tree().describe() {
        println!("{}", line);
    }
    Ok(())
}
