//! # P&L Roll-up Engine
//!
//! A library for turning raw staffing, rate, and manually-entered actuals
//! data into monthly and annual Profit & Loss views at three levels:
//! project, client, and portfolio ("Rolling").
//!
//! ## Core Concepts
//!
//! - **Effective value**: per month and per metric, three sources compete for
//!   the same number (forecast/assigned, manually entered actual, in-session
//!   pending edit). The resolver picks one authoritative value with a fixed
//!   precedence: pending edit, then persisted actual, then assigned baseline.
//! - **Mixed reductions**: rolling twelve months into a year sums flow
//!   metrics (revenue, cost, gross), averages headcount (FTEs), and
//!   recomputes ratios (GM%, blend rate/cost) from the annual sums.
//! - **Rolling**: the portfolio view decomposes every month into backlog
//!   (assigned), potential (unassigned) and new (stand-alone forecast)
//!   buckets, with month-over-month evolution.
//! - **Null, not zero**: missing actuals and undefined ratios are `None`,
//!   never a sentinel zero, `NaN` or `Infinity`.
//!
//! The crate is a pure computation library: fetching records, FX tables and
//! persisting edits belong to external collaborators, which hand in immutable
//! snapshots and receive new values back.
//!
//! ## Example
//!
//! ```rust,ignore
//! use pnl_rollup::*;
//!
//! let months: [MonthRecord; 12] = load_project_months();
//! let mut edits = PendingEdits::new();
//! edits.set(3, EditField::RevenueReal, Some(12_000.0))?;
//!
//! let view = compute_entity_view(&months, Some(&edits))?;
//! println!("annual GM%: {:?}", view.annual.gm_pct);
//! ```

pub mod annual;
pub mod currency;
pub mod edits;
pub mod error;
pub mod monthly;
pub mod resolver;
pub mod rolling;
pub mod schema;
pub mod variance;

pub use annual::{compute_annual, AnnualTotals, Reduction};
pub use currency::{convert, convert_annual, convert_with_fallback};
pub use edits::{EditField, FieldEdit, MonthEdits, PendingEdits, SavePayload};
pub use error::{PnlError, Result};
pub use monthly::{compute_month, EffectiveMonth, STANDARD_MONTHLY_HOURS};
pub use resolver::{resolve_month, resolve_year, ResolvedMonth};
pub use rolling::{compute_rolling, RollingAnnual, RollingPortfolioMonth, RollingView};
pub use schema::*;
pub use variance::{
    classify_health, cost_variance, ftes_variance, revenue_variance, variance_cell, HealthState,
    VarianceCell,
};

use log::{debug, info};
use serde::{Deserialize, Serialize};

/// The full computed view for one entity (project or client): twelve
/// effective months plus the annual roll-up.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityView {
    pub months: Vec<EffectiveMonth>,
    pub annual: AnnualTotals,
}

pub struct PnlProcessor;

impl PnlProcessor {
    /// Computes the monthly and annual P&L view for one entity from its raw
    /// month records, applying the pending-edit overlay when one is supplied.
    pub fn compute_entity_view(
        records: &[MonthRecord; MONTHS_PER_YEAR],
        edits: Option<&PendingEdits>,
    ) -> Result<EntityView> {
        debug!(
            "Computing entity view ({} pending edits)",
            edits.map_or(0, |e| e.len())
        );

        let resolved = resolve_year(records, edits)?;
        let months: Vec<EffectiveMonth> = resolved.iter().map(compute_month).collect();

        let month_array: [EffectiveMonth; MONTHS_PER_YEAR] = months
            .clone()
            .try_into()
            .map_err(|_| PnlError::InvalidSeriesLength {
                entity: "entity view".to_string(),
                len: months.len(),
            })?;
        let annual = compute_annual(&month_array);

        Ok(EntityView { months, annual })
    }

    /// Computes the portfolio ("Rolling") view from per-client fetch outcomes
    /// and stand-alone forecast entries. Failed fetches are excluded and
    /// reported in the result, never fatal.
    pub fn compute_rolling_view(
        clients: &[ClientFetch],
        forecasts: &[ForecastEntry],
    ) -> Result<RollingView> {
        info!(
            "Computing Rolling view over {} client fetches and {} forecast entries",
            clients.len(),
            forecasts.len()
        );
        compute_rolling(clients, forecasts)
    }
}

pub fn compute_entity_view(
    records: &[MonthRecord; MONTHS_PER_YEAR],
    edits: Option<&PendingEdits>,
) -> Result<EntityView> {
    PnlProcessor::compute_entity_view(records, edits)
}

pub fn compute_rolling_view(
    clients: &[ClientFetch],
    forecasts: &[ForecastEntry],
) -> Result<RollingView> {
    PnlProcessor::compute_rolling_view(clients, forecasts)
}
