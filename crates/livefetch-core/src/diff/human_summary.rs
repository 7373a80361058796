//! Human-readable summary renderer for edit scripts.

use std::fmt::Debug;

use crate::diff::model::{Change, ChangeKind, EditScript};

/// Render a Markdown summary of an [`EditScript`].
///
/// Intended for CLI output and log review. It is informational only; the
/// structured script remains the source of truth.
pub fn render_human_summary<K: Debug>(script: &EditScript<K>) -> String {
    let mut out = String::new();

    out.push_str("## Edit Script\n\n");
    out.push_str(&format!(
        "**Generations**: {} → {}\n\n",
        script.from_generation, script.to_generation
    ));

    if script.is_empty() {
        out.push_str("_No changes._\n");
        return out;
    }

    // Counts
    out.push_str("| Insert | Delete | Move | Update | Sections + | Sections - |\n");
    out.push_str("|---|---|---|---|---|---|\n");
    out.push_str(&format!(
        "| {} | {} | {} | {} | {} | {} |\n\n",
        script.inserts(),
        script.deletes(),
        script.moves(),
        script.updates(),
        script.count(ChangeKind::InsertSection),
        script.count(ChangeKind::DeleteSection),
    ));

    out.push_str("### Changes\n\n");
    for change in script {
        let line = match change {
            Change::Delete { id, from } => format!("- **delete** `{id}` at {from}"),
            Change::InsertSection { key, at } => {
                format!("- **insert section** {key:?} at {at}")
            }
            Change::Move { id, from, to } => format!("- **move** `{id}` {from} → {to}"),
            Change::DeleteSection { key, at } => {
                format!("- **delete section** {key:?} at {at}")
            }
            Change::Insert { id, at } => format!("- **insert** `{id}` at {at}"),
            Change::Update { id, at } => format!("- **update** `{id}` at {at}"),
        };
        out.push_str(&line);
        out.push('\n');
    }

    out
}
