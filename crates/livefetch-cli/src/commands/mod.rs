//! Subcommands and the query options they share.

pub mod diff;
pub mod show;

use std::str::FromStr;
use std::sync::Arc;

use clap::Args;
use livefetch_core::{
    ChangeDetector, FetchRequest, Identifiable, SectionOrder, Sectioning, Snapshot,
    SortDescriptor, SortDirection,
};
use livefetch_engine::{ControllerConfig, MemoryConnector, ResultsController, StoreConnector};
use serde_json::Value;

use crate::record::{FieldValue, Record};

pub type RecordController = ResultsController<Record, FieldValue>;

/// `field[:asc|:desc]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub field: String,
    pub direction: SortDirection,
}

impl FromStr for SortSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (field, direction) = match s.rsplit_once(':') {
            Some((field, "asc")) => (field, SortDirection::Ascending),
            Some((field, "desc")) => (field, SortDirection::Descending),
            Some((_, other)) => return Err(format!("unknown sort direction: {}", other)),
            None => (s, SortDirection::Ascending),
        };
        if field.is_empty() {
            return Err("sort field must not be empty".to_string());
        }
        Ok(Self {
            field: field.to_string(),
            direction,
        })
    }
}

#[derive(Debug, Args)]
pub struct QueryArgs {
    /// Field whose value names each record's section (one section if omitted)
    #[arg(long)]
    pub section_field: Option<String>,

    /// Sort by `field[:asc|:desc]`; repeat for tie-breakers, id breaks final ties
    #[arg(long = "sort")]
    pub sort: Vec<SortSpec>,

    /// Sort sections largest key first (overrides the config file)
    #[arg(long)]
    pub descending_sections: bool,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

impl QueryArgs {
    pub fn request(&self) -> FetchRequest<Record> {
        let descriptors = self
            .sort
            .iter()
            .map(|spec| {
                let field = spec.field.clone();
                SortDescriptor::by_key(spec.field.clone(), spec.direction, move |r: &Record| {
                    r.field(&field)
                })
            })
            .collect();
        FetchRequest::new().with_sort_descriptors(descriptors)
    }

    pub fn sectioning(&self) -> Sectioning<Record, FieldValue> {
        match &self.section_field {
            Some(field) => {
                let field = field.clone();
                Sectioning::by(move |r: &Record| r.field(&field))
            }
            None => Sectioning::by(|_: &Record| FieldValue(Value::Null)),
        }
    }

    /// Controller over an in-memory store seeded with `rows`
    pub fn controller(
        &self,
        config: &ControllerConfig,
        rows: Vec<Record>,
    ) -> Result<(Arc<MemoryConnector<Record>>, RecordController), Box<dyn std::error::Error>> {
        let mut config = config.clone();
        if self.descending_sections {
            config.section_order = SectionOrder::Descending;
        }
        let store = Arc::new(MemoryConnector::with_rows(rows));
        let connector: Arc<dyn StoreConnector<Record>> = store.clone();
        let controller = ResultsController::with_config(
            connector,
            self.sectioning(),
            ChangeDetector::by_eq(),
            &config,
        )?;
        Ok((store, controller))
    }
}

/// Text rendering of a snapshot: one header per section, one line per row
pub fn render_snapshot(snapshot: &Snapshot<Record, FieldValue>) -> String {
    let mut out = String::new();
    for (index, section) in snapshot.sections().iter().enumerate() {
        out.push_str(&format!(
            "[{}] {} ({} rows)\n",
            index,
            section.key(),
            section.len()
        ));
        for (row, record) in section.rows().iter().enumerate() {
            out.push_str(&format!("  {}/{}  {}\n", index, row, record.id()));
        }
    }
    out
}
