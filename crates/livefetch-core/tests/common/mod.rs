use livefetch_core::core_types::Generation;
use livefetch_core::{
    build_snapshot, FetchRequest, Identifiable, SectionOrder, Sectioning, Snapshot,
    SortDescriptor,
};

/// Minimal record used across integration tests
#[derive(Debug, Clone, PartialEq)]
pub struct Note {
    pub id: String,
    pub folder: String,
    pub order: i32,
    pub body: String,
}

impl Identifiable for Note {
    fn id(&self) -> &str {
        &self.id
    }
}

#[allow(dead_code)]
pub fn note(id: &str, folder: &str, order: i32) -> Note {
    Note {
        id: id.to_string(),
        folder: folder.to_string(),
        order,
        body: String::new(),
    }
}

/// Request ordering notes by `order`, then id
#[allow(dead_code)]
pub fn by_order() -> FetchRequest<Note> {
    FetchRequest::new().sorted_by(SortDescriptor::ascending("order", |n: &Note| n.order))
}

#[allow(dead_code)]
pub fn by_folder(order: SectionOrder) -> Sectioning<Note, String> {
    Sectioning::by(|n: &Note| n.folder.clone()).with_order(order)
}

/// Build a folder-sectioned, order-sorted snapshot
#[allow(dead_code)]
pub fn snapshot_of(raw: Vec<Note>, generation: u64) -> Snapshot<Note, String> {
    build_snapshot(
        raw,
        &by_order(),
        &by_folder(SectionOrder::Ascending),
        Generation::new(generation),
    )
    .unwrap()
}
