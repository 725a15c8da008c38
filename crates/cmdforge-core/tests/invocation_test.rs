//! End-to-end invocation tests: specification files through the gates to
//! recorded host effects.

mod common;

use cmdforge_core::DispatchError;
use cmdforge_core::colors::translate;
use cmdforge_core::memory::Effect;
use common::{Harness, args};

const WARP: &str = r#"
permission: warp.use
usage-message: "&cUsage: /warp <spawn|player>"
aliases: [w]
cooldown: 10 seconds
arguments:
  spawn:
    actions:
      console: ["spawn {sender}"]
      message: ["&aWelcome to spawn, {sender}"]
  "[target]":
    type: online_player
    type-error: "&c%input% is not online."
    actions:
      teleport:
        who: "{sender}"
        toPlayer: "[target]"
"#;

#[test]
fn test_literal_chain_runs_actions_once() {
    let mut h = Harness::new();
    h.write_unit("warp.yml", WARP);
    h.reload();
    let (alice, _) = h.player("Alice", &["warp.use"]);

    assert!(h.dispatcher.execute(&alice, "warp", &args("spawn")).is_some());
    assert_eq!(
        h.effects(),
        vec![
            Effect::Console("spawn Alice".to_string()),
            Effect::Message { to: "Alice".to_string(), text: translate("&aWelcome to spawn, Alice") },
        ]
    );
}

#[test]
fn test_placeholder_path_and_type_error() {
    let mut h = Harness::new();
    h.write_unit("warp.yml", WARP);
    h.reload();
    let (alice, _) = h.player("Alice", &["warp.use"]);
    h.player("Bob", &[]);

    assert!(h.dispatcher.execute(&alice, "w", &args("Bob")).is_some());
    let effects = h.effects();
    assert!(matches!(&effects[..], [Effect::Teleport { player, .. }] if player == "Alice"));

    // Ghost is not online: the only dynamic child reports its type error.
    h.advance(10);
    assert!(h.dispatcher.execute(&alice, "warp", &args("Ghost")).is_none());
    assert_eq!(h.messages(), vec![translate("&cGhost is not online.")]);
}

#[test]
fn test_cooldown_property() {
    let mut h = Harness::new();
    h.write_unit("daily.yml", "cost: 1\ncooldown: 10 seconds\nactions:\n  message: [reward]\n");
    h.reload();
    let (alice, id) = h.player("Alice", &[]);
    h.ledger.set_balance(id, 100.0);

    assert!(h.dispatcher.dispatch(&alice, "daily", &args("")).is_ok());

    h.advance(9);
    h.dispatcher.run_pending();
    let err = h.dispatcher.dispatch(&alice, "daily", &args("")).unwrap_err();
    assert!(matches!(err, DispatchError::OnCooldown(_)));
    assert!((h.ledger.balance(id) - 99.0).abs() < f64::EPSILON, "rejected call must not charge");

    h.advance(1);
    h.dispatcher.run_pending();
    assert_eq!(h.dispatcher.cooldowns().len(), 0);
    assert!(h.dispatcher.dispatch(&alice, "daily", &args("")).is_ok());
    assert!((h.ledger.balance(id) - 98.0).abs() < f64::EPSILON);
    assert!(h.dispatcher.cooldowns().is_active("daily", id, cmdforge_core::Clock::now(h.clock.as_ref())));
}

#[test]
fn test_out_of_range_cooldown_does_not_panic() {
    let mut h = Harness::new();
    h.write_unit("big.yml", "cooldown: 9223372036854775807 seconds\nactions: {message: [ok]}\n");
    h.reload();
    let (alice, id) = h.player("Alice", &[]);

    assert!(h.dispatcher.dispatch(&alice, "big", &args("")).is_ok());
    assert_eq!(h.messages(), vec!["ok".to_string()]);

    h.advance(3600);
    h.dispatcher.run_pending();
    let err = h.dispatcher.dispatch(&alice, "big", &args("")).unwrap_err();
    assert!(matches!(err, DispatchError::OnCooldown(_)));
    assert!(h.dispatcher.cooldowns().is_active("big", id, cmdforge_core::Clock::now(h.clock.as_ref())));
}

#[test]
fn test_cost_property() {
    let mut h = Harness::new();
    h.write_unit("heal.toml", "cost = 5\n\n[actions]\nconsole = [\"heal {sender}\"]\n");
    h.reload();
    let (alice, id) = h.player("Alice", &[]);

    h.ledger.set_balance(id, 3.0);
    assert!(h.dispatcher.execute(&alice, "heal", &args("")).is_none());
    assert_eq!(h.messages(), vec![translate(&h.dispatcher.messages().insufficient_funds)]);
    assert!((h.ledger.balance(id) - 3.0).abs() < f64::EPSILON);

    h.ledger.set_balance(id, 10.0);
    assert!(h.dispatcher.execute(&alice, "heal", &args("")).is_some());
    assert_eq!(h.effects(), vec![Effect::Console("heal Alice".to_string())]);
    assert!((h.ledger.balance(id) - 5.0).abs() < f64::EPSILON);
}

#[test]
fn test_phased_property() {
    let mut h = Harness::new();
    h.write_unit(
        "launch.yml",
        r#"
delay:
  length: 3 seconds
  per_second-actions:
    message: ["Hello {sender}, {seconds_remaining}s left"]
actions:
  broadcast: ["{sender} launched"]
"#,
    );
    h.reload();
    let (alice, _) = h.player("Alice", &[]);

    assert!(h.dispatcher.execute(&alice, "launch", &args("")).is_some());
    h.run_for(10);

    let effects = h.effects();
    assert_eq!(
        effects,
        vec![
            Effect::Message { to: "Alice".into(), text: "Hello Alice, 3s left".into() },
            Effect::Message { to: "Alice".into(), text: "Hello Alice, 2s left".into() },
            Effect::Message { to: "Alice".into(), text: "Hello Alice, 1s left".into() },
            Effect::Broadcast("Alice launched".into()),
        ]
    );
    assert!(h.dispatcher.scheduler().is_empty());
}

#[test]
fn test_concurrent_countdowns_are_independent() {
    let mut h = Harness::new();
    h.write_unit("tp.yml", "delay:\n  length: 2 seconds\nactions:\n  message: [\"go {sender}\"]\n");
    h.reload();
    let (alice, _) = h.player("Alice", &[]);

    assert!(h.dispatcher.execute(&alice, "tp", &args("")).is_some());
    h.run_for(1);
    assert!(h.dispatcher.execute(&alice, "tp", &args("")).is_some());
    assert_eq!(h.dispatcher.scheduler().phased_len(), 2);

    h.run_for(1);
    assert_eq!(h.messages(), vec!["go Alice"]);
    h.run_for(1);
    assert_eq!(h.messages(), vec!["go Alice"]);
    assert!(h.dispatcher.scheduler().is_empty());
}

#[test]
fn test_console_bypasses_gates_but_not_player_only_actions() {
    let mut h = Harness::new();
    h.write_unit("shout.yml", "cost: 50\ncooldown: 1 hour\nactions:\n  player-chat: [hi]\n  broadcast: [hello]\n");
    h.reload();
    let console = h.console();

    assert!(h.dispatcher.execute(&console, "shout", &args("")).is_some());
    assert!(h.dispatcher.execute(&console, "shout", &args("")).is_some());
    let effects = h.effects();
    assert_eq!(effects.iter().filter(|e| matches!(e, Effect::Broadcast(_))).count(), 2);
    assert_eq!(effects.iter().filter(|e| matches!(e, Effect::Message { .. })).count(), 2);
}
