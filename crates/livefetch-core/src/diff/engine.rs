//! Edit script computation engine.
//!
//! The entry point is [`compute_edit_script`], which compares two snapshots
//! and produces the ordered [`Change`] list that turns the first snapshot's
//! list view into the second's.

use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use crate::diff::model::{Change, ChangeDetector, EditScript};
use crate::errors::{FetchError, Result};
use crate::identity::Identifiable;
use crate::ordering::insertion_index;
use crate::snapshot::{IndexPath, ListView, Snapshot};

/// Compute the edit script from `previous` to `next`.
///
/// Changes are emitted in phases, each addressed against the list view left
/// by every change before it:
///
/// 1. `Delete` for rows only in `previous`, bottom-up
/// 2. `InsertSection` for sections only in `next`
/// 3. `Move` for rows that changed section, and for the fewest rows that
///    must move to restore order inside a retained section
/// 4. `DeleteSection` for sections only in `previous` (now empty), bottom-up
/// 5. `Insert` for rows only in `next`, at their final coordinates
/// 6. `Update` for rows that did not move and that `detector` reports changed
///
/// A row receives at most one change. The script is deterministic: equal
/// inputs yield equal scripts.
///
/// If the two snapshots were built with different section orders the script
/// degenerates to removing everything and inserting `next` afresh.
///
/// # Errors
///
/// Returns `Internal` if the produced script would not reproduce `next`;
/// this indicates a bug rather than bad input.
pub fn compute_edit_script<T, K>(
    previous: &Snapshot<T, K>,
    next: &Snapshot<T, K>,
    detector: &ChangeDetector<T>,
) -> Result<EditScript<K>>
where
    T: Identifiable,
    K: Ord + Clone,
{
    let order = next.section_order();
    if previous.section_order() != order && previous.number_of_sections() > 1 {
        return Ok(reload_script(previous, next));
    }

    let mut working = previous.list_view();
    let mut changes = Vec::new();

    // 1. Deletions, bottom-up so earlier coordinates stay valid
    let mut deleted: Vec<(IndexPath, &str)> = previous
        .iter()
        .filter(|(_, item)| !next.contains(item.id()))
        .map(|(path, item)| (path, item.id()))
        .collect();
    deleted.reverse();
    for (from, id) in deleted {
        working
            .remove_row(from)
            .ok_or_else(|| broken(format!("delete of '{id}' at {from} out of range")))?;
        changes.push(Change::Delete {
            id: id.to_string(),
            from,
        });
    }

    // 2. New sections, slotted by key
    let previous_keys: BTreeSet<&K> = previous.sections().iter().map(|s| s.key()).collect();
    for section in next.sections() {
        let key = section.key();
        if previous_keys.contains(key) {
            continue;
        }
        let keys: Vec<&K> = working.sections.iter().map(|s| &s.key).collect();
        let at = insertion_index(&keys, &key, |a, b| order.key_ordered_before(*a, *b));
        working.insert_section(at, key.clone());
        changes.push(Change::InsertSection {
            key: key.clone(),
            at,
        });
    }

    // 3. Moves, in ascending final coordinate
    let movers = collect_movers(previous, next);
    for &(target, id) in &movers {
        let from = working
            .position_of(id)
            .ok_or_else(|| broken(format!("moved row '{id}' not found")))?;
        working.remove_row(from);

        let to = move_destination(&working, previous, next, target)?;
        if !working.insert_row(to, id.to_string()) {
            return Err(broken(format!("move of '{id}' to {to} out of range")));
        }
        changes.push(Change::Move {
            id: id.to_string(),
            from,
            to,
        });
    }

    // 4. Vacated sections, bottom-up
    let next_keys: BTreeSet<&K> = next.sections().iter().map(|s| s.key()).collect();
    let vacated: Vec<usize> = working
        .sections
        .iter()
        .enumerate()
        .filter(|(_, section)| !next_keys.contains(&section.key))
        .map(|(at, _)| at)
        .collect();
    for at in vacated.into_iter().rev() {
        let removed = working
            .remove_section(at)
            .ok_or_else(|| broken(format!("section {at} out of range")))?;
        if !removed.ids.is_empty() {
            return Err(broken(format!("section {at} still holds rows")));
        }
        changes.push(Change::DeleteSection {
            key: removed.key,
            at,
        });
    }

    // 5. Insertions at final coordinates
    for (at, item) in next.iter() {
        if previous.contains(item.id()) {
            continue;
        }
        if !working.insert_row(at, item.id().to_string()) {
            return Err(broken(format!("insert of '{}' at {at} out of range", item.id())));
        }
        changes.push(Change::Insert {
            id: item.id().to_string(),
            at,
        });
    }

    // 6. In-place updates
    let moved: HashSet<&str> = movers.iter().map(|&(_, id)| id).collect();
    for (at, item) in next.iter() {
        if moved.contains(item.id()) {
            continue;
        }
        let Some(old_path) = previous.index_path_for(item.id()) else {
            continue;
        };
        let old = previous.object_at(old_path)?;
        if !Arc::ptr_eq(old, item) && detector.has_changed(old, item) {
            changes.push(Change::Update {
                id: item.id().to_string(),
                at,
            });
        }
    }

    if working != next.list_view() {
        return Err(broken("script does not reproduce the next list view"));
    }

    Ok(EditScript {
        from_generation: previous.generation(),
        to_generation: next.generation(),
        changes,
    })
}

/// Rows that must move, each paired with its coordinate in `next`, sorted
/// by that coordinate.
///
/// A row moves if its section key changed, or if it falls outside the
/// longest run of rows that already appear in their final relative order
/// within their (unchanged) section.
fn collect_movers<'a, T, K>(
    previous: &'a Snapshot<T, K>,
    next: &'a Snapshot<T, K>,
) -> Vec<(IndexPath, &'a str)>
where
    T: Identifiable,
    K: Ord,
{
    let mut movers = Vec::new();

    for section in previous.sections() {
        let mut stayers: Vec<(IndexPath, &str)> = Vec::new();
        for item in section.rows() {
            let Some(to) = next.index_path_for(item.id()) else {
                continue;
            };
            if next.section_key(to.section) == Some(section.key()) {
                stayers.push((to, item.id()));
            } else {
                movers.push((to, item.id()));
            }
        }

        let rows: Vec<usize> = stayers.iter().map(|(to, _)| to.row).collect();
        let settled = longest_increasing_subsequence(&rows);
        movers.extend(
            stayers
                .into_iter()
                .zip(settled)
                .filter(|(_, keep)| !keep)
                .map(|(stayer, _)| stayer),
        );
    }

    movers.sort_unstable();
    movers
}

/// Where a mover lands in `working`: right after the nearest row that
/// precedes it in `next` and survives from `previous`, or first in its
/// section when there is none.
fn move_destination<T, K>(
    working: &ListView<K>,
    previous: &Snapshot<T, K>,
    next: &Snapshot<T, K>,
    target: IndexPath,
) -> Result<IndexPath>
where
    T: Identifiable,
    K: Ord,
{
    let next_section = &next.sections()[target.section];
    let section = working
        .section_index(next_section.key())
        .ok_or_else(|| broken(format!("destination section {} missing", target.section)))?;

    let anchor = next_section.rows()[..target.row]
        .iter()
        .rev()
        .map(|item| item.id())
        .find(|id| previous.contains(id));

    let row = match anchor {
        Some(anchor) => {
            working.sections[section]
                .ids
                .iter()
                .position(|id| id == anchor)
                .ok_or_else(|| broken(format!("anchor row '{anchor}' not settled")))?
                + 1
        }
        None => 0,
    };

    Ok(IndexPath::new(section, row))
}

/// Membership mask of one longest strictly increasing subsequence of
/// `values`, by patience sorting.
fn longest_increasing_subsequence(values: &[usize]) -> Vec<bool> {
    let mut tail_values: Vec<usize> = Vec::new();
    let mut tail_indices: Vec<usize> = Vec::new();
    let mut predecessor: Vec<Option<usize>> = vec![None; values.len()];

    for (index, value) in values.iter().enumerate() {
        let slot = insertion_index(&tail_values, value, |a, b| a < b);
        predecessor[index] = slot.checked_sub(1).map(|p| tail_indices[p]);
        if slot == tail_values.len() {
            tail_values.push(*value);
            tail_indices.push(index);
        } else {
            tail_values[slot] = *value;
            tail_indices[slot] = index;
        }
    }

    let mut members = vec![false; values.len()];
    let mut cursor = tail_indices.last().copied();
    while let Some(index) = cursor {
        members[index] = true;
        cursor = predecessor[index];
    }
    members
}

/// Remove everything from `previous`, then lay out `next` from scratch.
fn reload_script<T, K>(previous: &Snapshot<T, K>, next: &Snapshot<T, K>) -> EditScript<K>
where
    T: Identifiable,
    K: Clone,
{
    let mut changes = Vec::new();

    let rows: Vec<(IndexPath, &Arc<T>)> = previous.iter().collect();
    for (from, item) in rows.into_iter().rev() {
        changes.push(Change::Delete {
            id: item.id().to_string(),
            from,
        });
    }
    for (at, section) in previous.sections().iter().enumerate().rev() {
        changes.push(Change::DeleteSection {
            key: section.key().clone(),
            at,
        });
    }
    for (at, section) in next.sections().iter().enumerate() {
        changes.push(Change::InsertSection {
            key: section.key().clone(),
            at,
        });
    }
    for (at, item) in next.iter() {
        changes.push(Change::Insert {
            id: item.id().to_string(),
            at,
        });
    }

    EditScript {
        from_generation: previous.generation(),
        to_generation: next.generation(),
        changes,
    }
}

fn broken(message: impl Into<String>) -> FetchError {
    FetchError::Internal {
        message: format!("edit script: {}", message.into()),
    }
}
