use crate::monthly::{blend, gm_pct, EffectiveMonth};
use crate::schema::MONTHS_PER_YEAR;
use serde::{Deserialize, Serialize};

/// How a metric rolls up from months to a year. Flow quantities (money) sum;
/// stock quantities (headcount) average over a fixed twelve-month
/// denominator. Every metric must declare its kind here — a uniform reduce
/// would silently misstate one or the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum Reduction {
    Sum,
    Average,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Metric {
    Revenue,
    Cost,
    Gross,
    Ftes,
}

const REDUCTION_TABLE: [(Metric, Reduction); 4] = [
    (Metric::Revenue, Reduction::Sum),
    (Metric::Cost, Reduction::Sum),
    (Metric::Gross, Reduction::Sum),
    (Metric::Ftes, Reduction::Average),
];

fn reduction_for(metric: Metric) -> Reduction {
    REDUCTION_TABLE
        .iter()
        .find(|(m, _)| *m == metric)
        .map(|(_, r)| *r)
        .unwrap_or(Reduction::Sum)
}

/// Reduces twelve monthly values. Averages divide by 12 regardless of how
/// many months are non-zero: a project staffed half the year averages half
/// the headcount.
pub fn reduce(values: impl Iterator<Item = f64>, kind: Reduction) -> f64 {
    let sum: f64 = values.sum();
    match kind {
        Reduction::Sum => sum,
        Reduction::Average => sum / MONTHS_PER_YEAR as f64,
    }
}

/// Annual roll-up of one entity's twelve effective months.
///
/// Ratios are recomputed from the annual sums, never averaged from the
/// monthly ratios — averaging would misstate any front- or back-loaded
/// margin profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnnualTotals {
    pub revenue: f64,
    pub cost: f64,
    pub gross: f64,
    pub ftes: f64,
    pub gm_pct: Option<f64>,
    pub blend_rate: Option<f64>,
    pub blend_cost: Option<f64>,
}

pub fn compute_annual(months: &[EffectiveMonth; MONTHS_PER_YEAR]) -> AnnualTotals {
    let revenue = reduce(months.iter().map(|m| m.revenue), reduction_for(Metric::Revenue));
    let cost = reduce(months.iter().map(|m| m.cost), reduction_for(Metric::Cost));
    let gross = reduce(months.iter().map(|m| m.gross), reduction_for(Metric::Gross));
    let ftes = reduce(months.iter().map(|m| m.ftes), reduction_for(Metric::Ftes));

    AnnualTotals {
        revenue,
        cost,
        gross,
        ftes,
        gm_pct: gm_pct(gross, revenue),
        blend_rate: blend(revenue, ftes),
        blend_cost: blend(cost, ftes),
    }
}
