use crate::dom::{DUE_REGION, Document, PROSPECTIVE_REGION};
use crate::errors::PageError;
use crate::models::Display;
use tracing::info;

/// Rows at or below this count mean the table holds only its header.
const HEADER_ROWS: usize = 1;

pub const TRACKED_REGIONS: [&str; 2] = [PROSPECTIVE_REGION, DUE_REGION];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionState {
    pub region: String,
    pub rows: usize,
    pub empty_state: Display,
}

pub fn empty_state_for(rows: usize) -> Display {
    if rows <= HEADER_ROWS {
        Display::Block
    } else {
        Display::None
    }
}

pub fn reconcile_region(doc: &mut Document, region: &str) -> Result<RegionState, PageError> {
    let rows = doc.row_count(region)?;
    info!("{region} rows length: {rows}");

    let empty_state = empty_state_for(rows);
    doc.set_empty_state(region, empty_state)?;

    Ok(RegionState {
        region: region.to_string(),
        rows,
        empty_state,
    })
}
