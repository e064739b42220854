//! Handler for the `replay` command.

use std::path::Path;

use serde_json::json;

use crate::adapter::inbound::cli::command::ReplayArgs;
use crate::adapter::inbound::cli::{operator, output};
use crate::error::Result;
use crate::port::inbound::operator::replay::ReplayRequest;

/// Execute `replay <script>`.
pub async fn execute(config_path: Option<&Path>, args: &ReplayArgs) -> Result<()> {
    let config_toml = operator::read_config_toml(config_path)?;
    let script_json = std::fs::read_to_string(&args.script)?;

    let summary = operator::operator()
        .replay(ReplayRequest {
            config_toml,
            script_json,
            ephemeral: args.ephemeral,
        })
        .await?;

    if output::is_json() {
        for event in &summary.events {
            output::event(event.step, event.at_ms, &event.kind, event.id.as_deref());
        }
        output::json_output(json!({
            "command": "replay",
            "backend": summary.backend,
            "steps": summary.steps,
            "seen": summary.seen,
            "collapsed": summary.collapsed,
            "restored": summary.restored,
            "dropped": summary.dropped,
        }));
        return Ok(());
    }

    output::header(env!("CARGO_PKG_VERSION"));
    output::section("Replay");
    output::field("Script", args.script.display());
    output::field("Backend", &summary.backend);
    output::field("Steps", summary.steps);

    output::section("Events");
    if summary.events.is_empty() {
        output::note("(no events)");
    }
    for event in &summary.events {
        if output::verbosity() == 0 && event.kind == "dropped" {
            continue;
        }
        output::event(event.step, event.at_ms, &event.kind, event.id.as_deref());
    }

    output::section("Summary");
    output::field("Seen", summary.seen);
    output::field("Collapsed", summary.collapsed);
    output::field("Restored", summary.restored);
    output::field("Dropped", output::muted(summary.dropped));
    if summary.dropped > 0 && output::verbosity() == 0 {
        output::hint("pass -v to list dropped ticks");
    }
    Ok(())
}
