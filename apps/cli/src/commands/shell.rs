//! `cmdforge shell` - a simulated host driven from stdin.
//!
//! The shell owns the in-memory platform built from a world file, routes
//! `/label` input through the registrar the way a server's command map
//! would, and lets [`DriverHandle`] pump the scheduler in the background.
//! Effects are printed after every input line.

use crate::colors::render;
use crate::world::{Simulation, WorldFile};
use anyhow::{Context, bail};
use cmdforge_core::colors::translate;
use cmdforge_core::memory::{Effect, MemoryRegistrar};
use cmdforge_core::{
    AdminCommand, CmdforgeConfig, CommandRegistrar, Dispatcher, DriverHandle, Invocation, Ledger, Platform,
    SenderRef, SharedDispatcher,
};
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::Mutex;

/// Label the admin command answers to.
const ADMIN_LABEL: &str = "cmdforge";

/// One parsed input line.
#[derive(Debug, PartialEq)]
enum Input {
    Invoke { who: String, label: String, args: Vec<String> },
    Tab { who: String, label: String, args: Vec<String> },
    Balance(String),
    Wait(Duration),
    Quit,
    Empty,
}

/// Splits `/label args...`. With `keep_partial`, trailing whitespace yields
/// an empty last argument so tab completion sees the segment being typed.
fn parse_command(text: &str, keep_partial: bool) -> anyhow::Result<(String, Vec<String>)> {
    let Some(text) = text.trim_start().strip_prefix('/') else {
        bail!("expected /<command>");
    };
    let mut words = text.split_whitespace().map(str::to_string);
    let Some(label) = words.next() else {
        bail!("expected /<command>");
    };
    let mut args: Vec<String> = words.collect();
    if keep_partial && text.ends_with(char::is_whitespace) {
        args.push(String::new());
    }
    Ok((label, args))
}

fn split_word(text: &str) -> (&str, &str) {
    let text = text.trim_start();
    text.split_once(char::is_whitespace).unwrap_or((text, ""))
}

fn parse_line(line: &str) -> anyhow::Result<Input> {
    let line = line.trim_start();
    if line.trim().is_empty() || line.starts_with('#') {
        return Ok(Input::Empty);
    }

    let (keyword, rest) = split_word(line);
    match keyword.to_ascii_lowercase().as_str() {
        "quit" | "exit" => Ok(Input::Quit),
        "wait" => {
            let secs: f64 = rest.trim().parse().with_context(|| format!("invalid wait '{}'", rest.trim()))?;
            match Duration::try_from_secs_f64(secs) {
                Ok(duration) => Ok(Input::Wait(duration)),
                Err(_) => bail!("invalid wait '{}'", rest.trim()),
            }
        }
        "balance" => {
            let who = rest.trim();
            if who.is_empty() {
                bail!("usage: balance <player>");
            }
            Ok(Input::Balance(who.to_string()))
        }
        "console" => {
            let (label, args) = parse_command(rest, false)?;
            Ok(Input::Invoke { who: "console".to_string(), label, args })
        }
        "as" => {
            let (who, rest) = split_word(rest);
            if who.is_empty() {
                bail!("usage: as <player> /<command> [args...]");
            }
            let (label, args) = parse_command(rest, false)?;
            Ok(Input::Invoke { who: who.to_string(), label, args })
        }
        "tab" => {
            let (who, rest) = split_word(rest);
            if who.is_empty() {
                bail!("usage: tab <player|console> /<command> [args...]");
            }
            let (label, args) = parse_command(rest, true)?;
            Ok(Input::Tab { who: who.to_string(), label, args })
        }
        other => bail!("unknown input '{}' (try: as, console, tab, balance, wait, quit)", other),
    }
}

/// One printable line per effect.
fn describe(effect: &Effect) -> String {
    match effect {
        Effect::Message { to, text } => format!("[{}] {}", to, render(text)),
        Effect::Console(line) => format!("[console] /{}", render(line)),
        Effect::Broadcast(text) => format!("[broadcast] {}", render(text)),
        Effect::Chat { player, text } => format!("<{}> {}", player, render(text)),
        Effect::Sound { player, sound } => format!("[sound -> {}] {}", player, sound),
        Effect::Title { player, title, subtitle } => {
            format!("[title -> {}] {} / {}", player, render(title), render(subtitle))
        }
        Effect::ActionBar { player, text } => format!("[action bar -> {}] {}", player, render(text)),
        Effect::Teleport { player, to } => {
            format!("[teleport] {} -> {} ({:.1}, {:.1}, {:.1})", player, to.world, to.x, to.y, to.z)
        }
    }
}

struct Session {
    sim: Simulation,
    registrar: Arc<MemoryRegistrar>,
    admin: AdminCommand,
    dispatcher: SharedDispatcher,
}

impl Session {
    fn sender(&self, who: &str) -> anyhow::Result<SenderRef> {
        match self.sim.sender(who) {
            Some(sender) => Ok(sender),
            None => bail!("no player named '{}' in the world file", who),
        }
    }

    async fn invoke(&self, who: &str, label: &str, args: &[String]) -> anyhow::Result<()> {
        let sender = self.sender(who)?;
        let mut dispatcher = self.dispatcher.lock().await;

        if label.eq_ignore_ascii_case(ADMIN_LABEL) {
            self.admin.handle(&mut dispatcher, sender.as_ref(), label, args);
            return Ok(());
        }
        if self.registrar.handle(label).is_none() {
            sender.send_message(&translate(&dispatcher.messages().unknown_command));
            return Ok(());
        }

        match dispatcher.execute(&sender, label, args) {
            Some(Invocation::Completed { command, summary }) => {
                println!("{}", format!("(/{}: {} action(s) run)", command, summary.executed).dimmed());
            }
            Some(Invocation::Scheduled { command, length_secs }) => {
                println!("{}", format!("(/{}: {}s countdown started)", command, length_secs).dimmed());
            }
            None => {}
        }
        Ok(())
    }

    async fn tab(&self, who: &str, label: &str, args: &[String]) -> anyhow::Result<()> {
        let sender = self.sender(who)?;
        let suggestions = if label.eq_ignore_ascii_case(ADMIN_LABEL) {
            self.admin.tab_complete(sender.as_ref(), args)
        } else {
            self.dispatcher.lock().await.tab_complete(sender.as_ref(), label, args)
        };

        if suggestions.is_empty() {
            println!("{}", "(no suggestions)".dimmed());
        } else {
            println!("{} {}", "tab:".cyan(), suggestions.join(", "));
        }
        Ok(())
    }

    fn balance(&self, who: &str) -> anyhow::Result<()> {
        if self.sim.ledger.is_none() {
            bail!("economy is disabled in the world file");
        }
        match self.sim.balance(who) {
            Some(balance) => println!("{} {}: {:.2}", "balance".cyan(), who, balance),
            None => bail!("no player named '{}' in the world file", who),
        }
        Ok(())
    }

    /// Returns false when the session should end.
    async fn handle_line(&self, line: &str) -> anyhow::Result<bool> {
        match parse_line(line)? {
            Input::Invoke { who, label, args } => self.invoke(&who, &label, &args).await?,
            Input::Tab { who, label, args } => self.tab(&who, &label, &args).await?,
            Input::Balance(who) => self.balance(&who)?,
            Input::Wait(duration) => tokio::time::sleep(duration).await,
            Input::Quit => return Ok(false),
            Input::Empty => {}
        }
        Ok(true)
    }

    fn print_effects(&self) {
        for effect in self.sim.platform.drain_effects() {
            println!("{}", describe(&effect));
        }
    }
}

/// Execute the shell command.
pub async fn execute(config: CmdforgeConfig, world: &Path, dir: Option<PathBuf>) -> anyhow::Result<()> {
    let sim = WorldFile::load(world)?.build()?;
    let registrar = Arc::new(MemoryRegistrar::new());

    let mut dispatcher = Dispatcher::from_config(Arc::clone(&sim.platform) as Arc<dyn Platform>, &config)
        .with_registrar(Arc::clone(&registrar) as Arc<dyn CommandRegistrar>)
        .with_commands_dir(super::commands_dir(&config, dir));
    if let Some(ledger) = &sim.ledger {
        dispatcher = dispatcher.with_ledger(Arc::clone(ledger) as Arc<dyn Ledger>);
    }

    let summary = dispatcher
        .reload()
        .with_context(|| format!("Failed to load commands from {}", dispatcher.commands_dir().display()))?;

    println!(
        "{}",
        format!("cmdforge shell: {} command(s) loaded from {}", summary.loaded.len(), dispatcher.commands_dir().display())
            .bold()
            .cyan()
    );
    for failure in &summary.failures {
        println!("{} {}: {}", "✗".red(), failure.path.display(), failure.error.to_string().dimmed());
    }
    println!("{}", "Type 'quit' to exit.".dimmed());

    let session = Session {
        sim,
        registrar,
        admin: AdminCommand::from_config(&config),
        dispatcher: Arc::new(Mutex::new(dispatcher)),
    };
    let driver = DriverHandle::spawn(Arc::clone(&session.dispatcher), config.tick_interval());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        let keep_going = match session.handle_line(&line).await {
            Ok(keep_going) => keep_going,
            Err(e) => {
                println!("{} {}", "✗".red(), e);
                true
            }
        };
        session.print_effects();
        if !keep_going {
            break;
        }
    }

    driver.stop().await;
    session.dispatcher.lock().await.shutdown();
    session.print_effects();
    Ok(())
}
