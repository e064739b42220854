//! Handlers for the `seen` command group.

use std::path::Path;

use serde_json::json;
use tabled::{Table, Tabled};

use crate::adapter::inbound::cli::{operator, output};
use crate::error::Result;

#[derive(Tabled)]
struct SeenRow {
    #[tabled(rename = "Id")]
    id: String,
    #[tabled(rename = "Expires")]
    expires_at: String,
    #[tabled(rename = "Status")]
    status: &'static str,
}

/// Execute `seen list`.
pub fn execute_list(path: Option<&Path>) -> Result<()> {
    let config_toml = operator::read_config_toml(path)?;
    let listing = operator::operator().list_seen(&config_toml)?;

    if output::is_json() {
        let entries: Vec<_> = listing
            .entries
            .iter()
            .map(|entry| {
                json!({
                    "id": entry.id,
                    "expires_at": entry.expires_at.to_rfc3339(),
                    "expired": entry.expired,
                })
            })
            .collect();
        output::json_output(json!({
            "command": "seen.list",
            "backend": listing.backend,
            "entries": entries,
        }));
        return Ok(());
    }
    if output::is_quiet() {
        return Ok(());
    }

    output::section("Seen Items");
    output::field("Backend", &listing.backend);
    output::field("Records", listing.entries.len());
    if listing.entries.is_empty() {
        output::note("(store is empty)");
        return Ok(());
    }

    let expired = listing.entries.iter().filter(|e| e.expired).count();
    let rows: Vec<SeenRow> = listing
        .entries
        .into_iter()
        .map(|entry| SeenRow {
            id: entry.id,
            expires_at: entry.expires_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            status: if entry.expired { "expired" } else { "live" },
        })
        .collect();
    println!();
    output::lines(&Table::new(rows).to_string());

    if expired > 0 {
        output::hint(&format!(
            "{expired} expired record(s); run `xdedupe seen prune` to drop them"
        ));
    }
    Ok(())
}

/// Execute `seen prune`.
pub fn execute_prune(path: Option<&Path>) -> Result<()> {
    let config_toml = operator::read_config_toml(path)?;
    let report = operator::operator().prune_seen(&config_toml)?;

    if output::is_json() {
        output::json_output(json!({
            "command": "seen.prune",
            "kept": report.kept,
            "deleted": report.deleted,
        }));
        return Ok(());
    }

    output::success(&format!(
        "Pruned {} expired record(s), {} kept",
        report.deleted, report.kept
    ));
    Ok(())
}

/// Execute `seen forget <id>`.
pub fn execute_forget(path: Option<&Path>, id: &str) -> Result<()> {
    let config_toml = operator::read_config_toml(path)?;
    let removed = operator::operator().forget_seen(&config_toml, id)?;

    if output::is_json() {
        output::json_output(json!({
            "command": "seen.forget",
            "id": id,
            "removed": removed,
        }));
        return Ok(());
    }

    if removed {
        output::success(&format!("Forgot {}", output::highlight(id)));
    } else {
        output::warning(&format!("No record for {id}"));
    }
    Ok(())
}

/// Execute `seen clear`.
pub fn execute_clear(path: Option<&Path>) -> Result<()> {
    let config_toml = operator::read_config_toml(path)?;
    let removed = operator::operator().clear_seen(&config_toml)?;

    if output::is_json() {
        output::json_output(json!({
            "command": "seen.clear",
            "removed": removed,
        }));
        return Ok(());
    }

    output::success(&format!("Cleared {removed} record(s)"));
    Ok(())
}
