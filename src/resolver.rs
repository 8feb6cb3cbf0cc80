use crate::edits::{EditField, PendingEdits};
use crate::error::Result;
use crate::schema::{month_slot, MonthRecord, MONTHS_PER_YEAR};
use log::debug;
use serde::{Deserialize, Serialize};

/// The authoritative per-month scalars after precedence resolution, plus the
/// has-real flags that drove each choice.
///
/// The flags use exactly the same precedence chain as the values, so a
/// "backed by actuals" badge can never disagree with the number next to it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolvedMonth {
    pub revenue: f64,
    pub cost: f64,
    pub ftes: f64,
    pub revenue_is_real: bool,
    pub cost_is_real: bool,
    pub ftes_is_real: bool,
}

/// Applies the pending-edit overlay to one persisted actual. A present key
/// wins even when its value is `None` (an explicit clear); an absent key
/// leaves the persisted value standing.
fn overlay(
    persisted: Option<f64>,
    month: u32,
    field: EditField,
    edits: Option<&PendingEdits>,
) -> Option<f64> {
    match edits.and_then(|e| e.get(month, field)) {
        Some(edited) => edited,
        None => persisted,
    }
}

/// Resolves one month of one entity: pending edit, then persisted actual,
/// then the assigned baseline, per field.
///
/// Cost is compound: both actual components must independently resolve to a
/// value before the actual path (`resource + other`) is taken; a partial set
/// is treated as not yet entered and falls back to the fully projected cost,
/// which already includes secondary components.
pub fn resolve_month(
    record: &MonthRecord,
    month: u32,
    edits: Option<&PendingEdits>,
) -> Result<ResolvedMonth> {
    month_slot(month)?;

    let revenue_real = overlay(record.revenue_real, month, EditField::RevenueReal, edits);
    let ftes_real = overlay(record.ftes_real, month, EditField::FtesReal, edits);
    let resource_real = overlay(
        record.resource_cost_real,
        month,
        EditField::ResourceCostReal,
        edits,
    );
    let other_real = overlay(record.other_cost_real, month, EditField::OtherCostReal, edits);

    let (cost, cost_is_real) = match (resource_real, other_real) {
        (Some(resource), Some(other)) => (resource + other, true),
        _ => (record.cost_projected, false),
    };

    let resolved = ResolvedMonth {
        revenue: revenue_real.unwrap_or(record.revenue_assigned),
        cost,
        ftes: ftes_real.unwrap_or(record.ftes_assigned),
        revenue_is_real: revenue_real.is_some(),
        cost_is_real,
        ftes_is_real: ftes_real.is_some(),
    };

    debug!(
        "Resolved month {}: revenue {} (real: {}), cost {} (real: {}), ftes {} (real: {})",
        month,
        resolved.revenue,
        resolved.revenue_is_real,
        resolved.cost,
        resolved.cost_is_real,
        resolved.ftes,
        resolved.ftes_is_real
    );

    Ok(resolved)
}

/// Resolves all twelve months of an entity against the same pending-edit set.
pub fn resolve_year(
    records: &[MonthRecord; MONTHS_PER_YEAR],
    edits: Option<&PendingEdits>,
) -> Result<Vec<ResolvedMonth>> {
    records
        .iter()
        .enumerate()
        .map(|(slot, record)| resolve_month(record, slot as u32 + 1, edits))
        .collect()
}
