use crate::error::Result;
use crate::monthly::gm_pct;
use crate::resolver::resolve_month;
use crate::schema::{ClientFetch, FetchFailure, ForecastEntry, MONTHS_PER_YEAR};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// One month of the portfolio ("Rolling") view, decomposed into backlog
/// (assigned), potential (unassigned) and new (stand-alone forecast) buckets.
///
/// `ftes_total = ftes_backlog + ftes_potential + ftes_new` holds exactly, and
/// likewise for revenue.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RollingPortfolioMonth {
    pub month: u32,
    pub ftes_backlog: f64,
    pub ftes_potential: f64,
    pub ftes_new: f64,
    pub ftes_total: f64,
    pub revenue_backlog: f64,
    pub revenue_potential: f64,
    pub revenue_new: f64,
    pub revenue_total: f64,
    pub cost: f64,
    pub gross: f64,
    pub gm_pct: Option<f64>,
    /// Percentage change of `revenue_total` vs. the prior month. `None` for
    /// January and whenever the prior total is zero.
    pub evolution_pct: Option<f64>,
    /// Month-over-month change of `ftes_total`, same guards.
    pub ftes_evolution_pct: Option<f64>,
}

/// Annual roll-up of the Rolling view: money summed, FTEs averaged per
/// bucket.
///
/// `gm_pct` is a plain `f64` that reads `0.0` on a zero-revenue year — unlike
/// every other margin in the crate, an empty portfolio-year reports flat, not
/// undefined. Intentional asymmetry, pending product confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RollingAnnual {
    pub ftes_backlog: f64,
    pub ftes_potential: f64,
    pub ftes_new: f64,
    pub ftes_total: f64,
    pub revenue_backlog: f64,
    pub revenue_potential: f64,
    pub revenue_new: f64,
    pub revenue_total: f64,
    pub cost: f64,
    pub gross: f64,
    pub gm_pct: f64,
}

/// The complete Rolling output: twelve months, the annual roll-up, and the
/// clients excluded because their upstream fetch failed. The skipped list is
/// the warning channel for the presentation layer; it never poisons the
/// aggregate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RollingView {
    pub months: Vec<RollingPortfolioMonth>,
    pub annual: RollingAnnual,
    pub skipped: Vec<FetchFailure>,
}

pub fn compute_rolling(
    clients: &[ClientFetch],
    forecasts: &[ForecastEntry],
) -> Result<RollingView> {
    for forecast in forecasts {
        forecast.validate()?;
    }

    let mut skipped = Vec::new();
    let mut included = Vec::new();
    for fetch in clients {
        match fetch {
            Ok(data) => included.push(data),
            Err(failure) => {
                warn!(
                    "Excluding client '{}' from Rolling aggregate: {}",
                    failure.client, failure.reason
                );
                skipped.push(failure.clone());
            }
        }
    }
    debug!(
        "Rolling aggregate over {} clients ({} skipped) and {} forecast entries",
        included.len(),
        skipped.len(),
        forecasts.len()
    );

    let mut months = Vec::with_capacity(MONTHS_PER_YEAR);
    let mut prior_revenue_total: Option<f64> = None;
    let mut prior_ftes_total: Option<f64> = None;

    for slot in 0..MONTHS_PER_YEAR {
        let month = slot as u32 + 1;

        let mut ftes_backlog = 0.0;
        let mut ftes_potential = 0.0;
        let mut revenue_backlog = 0.0;
        let mut revenue_potential = 0.0;
        let mut cost = 0.0;

        for client in &included {
            let record = &client.months[slot];
            ftes_backlog += record.ftes_assigned;
            ftes_potential += record.ftes_unassigned;
            revenue_backlog += record.revenue_assigned;
            revenue_potential += record.revenue_unassigned;
            // Effective cost honors entered actuals; no editing session at
            // portfolio scope.
            cost += resolve_month(record, month, None)?.cost;
        }

        let mut ftes_new = 0.0;
        let mut revenue_new = 0.0;
        for forecast in forecasts {
            if let Some(entry) = forecast.months.get(&month) {
                ftes_new += entry.ftes;
                revenue_new += entry.revenue;
            }
        }

        let ftes_total = ftes_backlog + ftes_potential + ftes_new;
        let revenue_total = revenue_backlog + revenue_potential + revenue_new;
        let gross = revenue_total - cost;

        months.push(RollingPortfolioMonth {
            month,
            ftes_backlog,
            ftes_potential,
            ftes_new,
            ftes_total,
            revenue_backlog,
            revenue_potential,
            revenue_new,
            revenue_total,
            cost,
            gross,
            gm_pct: gm_pct(gross, revenue_total),
            evolution_pct: evolution(revenue_total, prior_revenue_total),
            ftes_evolution_pct: evolution(ftes_total, prior_ftes_total),
        });

        prior_revenue_total = Some(revenue_total);
        prior_ftes_total = Some(ftes_total);
    }

    let annual = compute_rolling_annual(&months);

    Ok(RollingView {
        months,
        annual,
        skipped,
    })
}

fn evolution(total: f64, prior_total: Option<f64>) -> Option<f64> {
    match prior_total {
        Some(prior) if prior != 0.0 => Some((total - prior) / prior * 100.0),
        _ => None,
    }
}

fn compute_rolling_annual(months: &[RollingPortfolioMonth]) -> RollingAnnual {
    let avg = |f: fn(&RollingPortfolioMonth) -> f64| {
        months.iter().map(f).sum::<f64>() / MONTHS_PER_YEAR as f64
    };
    let sum = |f: fn(&RollingPortfolioMonth) -> f64| months.iter().map(f).sum::<f64>();

    let revenue_total = sum(|m| m.revenue_total);
    let cost = sum(|m| m.cost);
    let gross = revenue_total - cost;

    RollingAnnual {
        ftes_backlog: avg(|m| m.ftes_backlog),
        ftes_potential: avg(|m| m.ftes_potential),
        ftes_new: avg(|m| m.ftes_new),
        ftes_total: avg(|m| m.ftes_total),
        revenue_backlog: sum(|m| m.revenue_backlog),
        revenue_potential: sum(|m| m.revenue_potential),
        revenue_new: sum(|m| m.revenue_new),
        revenue_total,
        cost,
        gross,
        // Empty portfolio-year reads as a flat zero margin, not undefined.
        gm_pct: gm_pct(gross, revenue_total).unwrap_or(0.0),
    }
}
