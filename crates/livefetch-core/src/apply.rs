//! Functional-boundary replay of edit scripts
//!
//! This module provides [`apply_edit_script`], which mirrors what a consumer
//! (a table view, a cache, a test oracle) does with an edit script: replay
//! each change in order against its own copy of the list.
//!
//! ## Atomicity Contract
//!
//! - **All-or-nothing**: either every change applies and the new view is
//!   returned, or the first inapplicable change produces an error and the
//!   input view is untouched
//! - **No panics**: malformed scripts return typed errors
//! - **Strict validation**: each change must name the id actually found at
//!   the coordinate it addresses
//!
//! ## Example
//!
//! ```
//! use livefetch_core::apply::apply_edit_script;
//! use livefetch_core::diff::{Change, EditScript};
//! use livefetch_core::snapshot::{IndexPath, ListSection, ListView};
//! use livefetch_core::core_types::Generation;
//!
//! let view = ListView {
//!     sections: vec![ListSection { key: "X".to_string(), ids: vec!["a".to_string()] }],
//! };
//! let script = EditScript {
//!     from_generation: Generation::new(1),
//!     to_generation: Generation::new(2),
//!     changes: vec![Change::Insert { id: "b".to_string(), at: IndexPath::new(0, 1) }],
//! };
//!
//! let next = apply_edit_script(&view, &script).unwrap();
//! assert_eq!(next.sections[0].ids, vec!["a", "b"]);
//! ```

use crate::diff::model::{Change, EditScript};
use crate::errors::{FetchError, Result};
use crate::snapshot::{IndexPath, ListView};

/// Replay `script` on a copy of `view`, returning the resulting view
///
/// # Errors
///
/// Returns `InvalidEditScript` naming the failing change's position if any
/// change does not apply: a coordinate out of range, an id that does not
/// match the row it addresses, an inserted id already present, or a
/// section removed while it still holds rows or under a different key.
pub fn apply_edit_script<K>(view: &ListView<K>, script: &EditScript<K>) -> Result<ListView<K>>
where
    K: Clone + PartialEq,
{
    let mut next = view.clone();
    for (step, change) in script.iter().enumerate() {
        apply_change(&mut next, change).map_err(|reason| FetchError::InvalidEditScript {
            reason: format!("change #{step} ({}): {reason}", change.kind().as_str()),
        })?;
    }
    Ok(next)
}

fn apply_change<K>(view: &mut ListView<K>, change: &Change<K>) -> std::result::Result<(), String>
where
    K: Clone + PartialEq,
{
    match change {
        Change::Delete { id, from } => {
            expect_id(view, *from, id)?;
            view.remove_row(*from);
        }
        Change::InsertSection { key, at } => {
            if view.section_index(key).is_some() {
                return Err("section key already present".to_string());
            }
            if !view.insert_section(*at, key.clone()) {
                return Err(format!("section index {at} out of range"));
            }
        }
        Change::Move { id, from, to } => {
            expect_id(view, *from, id)?;
            let moved = view.remove_row(*from).unwrap_or_default();
            if !view.insert_row(*to, moved) {
                return Err(format!("destination {to} out of range"));
            }
        }
        Change::DeleteSection { key, at } => match view.sections.get(*at) {
            None => return Err(format!("section index {at} out of range")),
            Some(section) if &section.key != key => {
                return Err(format!("section {at} has a different key"))
            }
            Some(section) if !section.ids.is_empty() => {
                return Err(format!("section {at} still holds {} rows", section.ids.len()))
            }
            Some(_) => {
                view.remove_section(*at);
            }
        },
        Change::Insert { id, at } => {
            if let Some(existing) = view.position_of(id) {
                return Err(format!("id '{id}' already present at {existing}"));
            }
            if !view.insert_row(*at, id.clone()) {
                return Err(format!("coordinate {at} out of range"));
            }
        }
        Change::Update { id, at } => expect_id(view, *at, id)?,
    }
    Ok(())
}

fn expect_id<K>(view: &ListView<K>, at: IndexPath, id: &str) -> std::result::Result<(), String> {
    match view.id_at(at) {
        Some(found) if found == id => Ok(()),
        Some(found) => Err(format!("expected '{id}' at {at}, found '{found}'")),
        None => Err(format!("coordinate {at} out of range")),
    }
}
