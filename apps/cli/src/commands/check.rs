//! `cmdforge check` - load a directory and report every unit.

use anyhow::{Context, bail};
use cmdforge_core::{CmdforgeConfig, CommandSpec, SpecLoader};
use colored::Colorize;
use std::path::PathBuf;
use tabled::{Table, Tabled, settings::Style};

/// One loaded command, as shown in the table.
#[derive(Tabled)]
struct CommandRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Aliases")]
    #[tabled(display_with = "display_list")]
    aliases: Vec<String>,
    #[tabled(rename = "Cost")]
    cost: f64,
    #[tabled(rename = "Cooldown")]
    #[tabled(display_with = "display_option")]
    cooldown: Option<String>,
    #[tabled(rename = "Nodes")]
    nodes: usize,
    #[tabled(rename = "Source")]
    source: String,
}

impl From<&CommandSpec> for CommandRow {
    fn from(spec: &CommandSpec) -> Self {
        Self {
            name: spec.name().to_string(),
            aliases: spec.aliases().to_vec(),
            cost: spec.cost(),
            cooldown: spec.cooldown().map(str::to_string),
            nodes: spec.tree().len(),
            source: spec
                .source()
                .and_then(|path| path.file_name())
                .map_or_else(|| "-".to_string(), |name| name.to_string_lossy().into_owned()),
        }
    }
}

fn display_list(list: &[String]) -> String {
    if list.is_empty() { "-".to_string() } else { list.join(", ") }
}

fn display_option(opt: &Option<String>) -> String {
    opt.as_deref().unwrap_or("-").to_string()
}

/// Execute the check command.
pub async fn execute(config: &CmdforgeConfig, dir: Option<PathBuf>) -> anyhow::Result<()> {
    let dir = super::commands_dir(config, dir);
    let report = SpecLoader::new(&dir)
        .load()
        .with_context(|| format!("Failed to read commands directory {}", dir.display()))?;

    println!("{}", format!("cmdforge check {}", dir.display()).bold().cyan());
    println!();

    if report.specs.is_empty() {
        println!("{}", "No command specifications found".yellow());
    } else {
        let mut rows: Vec<CommandRow> = report.specs.iter().map(CommandRow::from).collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        println!("{}", format!("Loaded {} command(s)", rows.len()).bold().green());
        let table = Table::new(rows).with(Style::rounded()).to_string();
        println!("{}", table);
    }

    if report.is_clean() {
        println!();
        println!("{} {}", "✓".green(), "All units loaded".green());
        return Ok(());
    }

    println!();
    for failure in &report.failures {
        println!("{} {}: {}", "✗".red(), failure.path.display(), failure.error.to_string().dimmed());
    }
    bail!("{} unit(s) failed to load", report.failures.len())
}
