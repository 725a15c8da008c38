//! Reload behaviour: registrar bookkeeping and in-flight countdowns.

mod common;

use cmdforge_core::{CmdforgeError, SpecError};
use common::{Harness, args};

#[test]
fn test_reload_removes_unit_and_aliases() {
    let mut h = Harness::new();
    h.write_unit("warp.yml", "aliases: [w, tp]\nactions:\n  message: [x]\n");
    h.write_unit("home.toml", "aliases = [\"h\"]\n\n[actions]\nmessage = [\"y\"]\n");
    h.reload();
    assert_eq!(h.registrar.labels(), vec!["h", "home", "tp", "w", "warp"]);

    h.remove_unit("warp.yml");
    h.reload();
    assert_eq!(h.registrar.labels(), vec!["h", "home"]);
    assert!(h.dispatcher.command("tp").is_none());
    assert_eq!(h.dispatcher.command_names(), vec!["home"]);
}

#[test]
fn test_registration_carries_handle() {
    let mut h = Harness::new();
    h.write_unit("kit.yml", "permission: kit.use\nusage-message: \"/kit <name>\"\naliases: [k]\nactions:\n  message: [x]\n");
    h.reload();

    let handle = h.registrar.handle("K").unwrap();
    assert_eq!(handle.command, "kit");
    assert_eq!(handle.permission.as_deref(), Some("kit.use"));
    assert_eq!(handle.usage, "/kit <name>");
}

#[test]
fn test_bad_unit_is_skipped_on_reload() {
    let mut h = Harness::new();
    h.write_unit("good.yml", "actions:\n  message: [ok]\n");
    h.write_unit("bad.yml", "arguments:\n  child: not-a-node\n");

    let summary = h.dispatcher.reload().unwrap();
    assert_eq!(summary.loaded, vec!["good"]);
    assert_eq!(summary.failures.len(), 1);
    assert_eq!(h.registrar.labels(), vec!["good"]);
}

#[test]
fn test_in_flight_countdown_survives_reload() {
    let mut h = Harness::new();
    h.write_unit("boom.yml", "delay:\n  length: 2 seconds\nactions:\n  broadcast: [boom]\n");
    h.reload();
    let (alice, _) = h.player("Alice", &[]);

    assert!(h.dispatcher.execute(&alice, "boom", &args("")).is_some());
    h.run_for(1);

    h.remove_unit("boom.yml");
    h.reload();
    assert!(h.dispatcher.command("boom").is_none());

    h.run_for(1);
    assert_eq!(h.effects(), vec![cmdforge_core::memory::Effect::Broadcast("boom".into())]);
    assert!(h.dispatcher.scheduler().is_empty());
}

#[test]
fn test_cooldowns_survive_reload() {
    let mut h = Harness::new();
    h.write_unit("warp.yml", "cooldown: 30 seconds\nactions:\n  message: [x]\n");
    h.reload();
    let (alice, _) = h.player("Alice", &[]);

    assert!(h.dispatcher.dispatch(&alice, "warp", &args("")).is_ok());
    h.reload();
    assert!(h.dispatcher.dispatch(&alice, "warp", &args("")).is_err());
}

#[test]
fn test_unlistable_directory_keeps_table() {
    let mut h = Harness::new();
    h.write_unit("warp.yml", "actions:\n  message: [x]\n");
    h.reload();

    let not_a_dir = h.commands_dir().join("warp.yml");
    let err = h.dispatcher.reload_from(&not_a_dir).unwrap_err();
    assert!(matches!(err, CmdforgeError::Spec(SpecError::Io(_))), "got {:?}", err);
    assert_eq!(h.dispatcher.command_names(), vec!["warp"]);
    assert_eq!(h.registrar.labels(), vec!["warp"]);
}
