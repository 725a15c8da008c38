//! The administrative command: `/<label> reload`.

use crate::colors::translate;
use crate::config::CmdforgeConfig;
use crate::dispatcher::Dispatcher;
use crate::host::CommandSender;
use tracing::{error, info, warn};

const SUBCOMMAND_RELOAD: &str = "reload";

/// Re-ingests specifications on request.
#[derive(Debug, Clone)]
pub struct AdminCommand {
    permission: String,
}

impl AdminCommand {
    pub fn new(permission: impl Into<String>) -> Self {
        Self { permission: permission.into() }
    }

    pub fn from_config(config: &CmdforgeConfig) -> Self {
        Self::new(config.admin_permission.clone())
    }

    pub fn permission(&self) -> &str {
        &self.permission
    }

    /// Handles an invocation and sends the reply to `sender`.
    ///
    /// Returns the lines that were sent, already translated.
    pub fn handle<A: AsRef<str>>(
        &self,
        dispatcher: &mut Dispatcher,
        sender: &dyn CommandSender,
        label: &str,
        args: &[A],
    ) -> Vec<String> {
        let lines = if !sender.has_permission(&self.permission) {
            vec![dispatcher.messages().no_permission.clone()]
        } else if args.first().is_some_and(|arg| arg.as_ref().eq_ignore_ascii_case(SUBCOMMAND_RELOAD)) {
            Self::reload(dispatcher, sender)
        } else {
            Self::usage(label)
        };

        let lines: Vec<String> = lines.iter().map(|line| translate(line)).collect();
        for line in &lines {
            sender.send_message(line);
        }
        lines
    }

    fn reload(dispatcher: &mut Dispatcher, sender: &dyn CommandSender) -> Vec<String> {
        match dispatcher.reload() {
            Ok(summary) => {
                info!(
                    by = sender.name(),
                    loaded = summary.loaded.len(),
                    failed = summary.failures.len(),
                    "Specifications reloaded"
                );
                let mut lines = vec![dispatcher.messages().reloaded.clone()];
                if !summary.failures.is_empty() {
                    warn!(failed = summary.failures.len(), "Some specification units were skipped");
                    lines.push(format!(
                        "&e{} specification file(s) could not be loaded; see the server log.",
                        summary.failures.len()
                    ));
                }
                lines
            }
            Err(e) => {
                error!(dir = %dispatcher.commands_dir().display(), error = %e, "Reload failed");
                vec![format!("&cReload failed: {}", e)]
            }
        }
    }

    fn usage(label: &str) -> Vec<String> {
        vec![
            "&6--- Custom Commands Help ---".to_string(),
            format!("&e/{} reload&7 - Reloads all custom commands from files.", label),
        ]
    }

    /// Offers `reload` for the first argument to permission holders.
    pub fn tab_complete<A: AsRef<str>>(&self, sender: &dyn CommandSender, args: &[A]) -> Vec<String> {
        if !sender.has_permission(&self.permission) {
            return Vec::new();
        }
        match args {
            [partial] if SUBCOMMAND_RELOAD.starts_with(&partial.as_ref().to_lowercase()) => {
                vec![SUBCOMMAND_RELOAD.to_string()]
            }
            _ => Vec::new(),
        }
    }
}
