use crate::resolver::ResolvedMonth;
use crate::schema::MonthRecord;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One variance cell: real minus projected, defined only where real data
/// exists. A metric without actuals is not-applicable, never zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VarianceCell {
    pub has_real: bool,
    pub diff: Option<f64>,
}

impl VarianceCell {
    pub fn not_applicable() -> Self {
        Self {
            has_real: false,
            diff: None,
        }
    }
}

/// `real` carries the resolved actual when the has-real predicate holds for
/// every component the metric needs; `None` produces a not-applicable cell.
pub fn variance_cell(real: Option<f64>, projected: f64) -> VarianceCell {
    match real {
        Some(real) => VarianceCell {
            has_real: true,
            diff: Some(real - projected),
        },
        None => VarianceCell::not_applicable(),
    }
}

/// Revenue variance for one month: resolved actual vs. the commercial
/// forecast. The resolver's has-real flag gates the cell, so the badge and
/// the number always agree.
pub fn revenue_variance(resolved: &ResolvedMonth, record: &MonthRecord) -> VarianceCell {
    let real = resolved.revenue_is_real.then_some(resolved.revenue);
    variance_cell(real, record.revenue_forecast)
}

/// Cost variance: requires both actual cost components (the resolver's
/// compound rule) before a delta is reported.
pub fn cost_variance(resolved: &ResolvedMonth, record: &MonthRecord) -> VarianceCell {
    let real = resolved.cost_is_real.then_some(resolved.cost);
    variance_cell(real, record.cost_projected)
}

pub fn ftes_variance(resolved: &ResolvedMonth, record: &MonthRecord) -> VarianceCell {
    let real = resolved.ftes_is_real.then_some(resolved.ftes);
    variance_cell(real, record.ftes_forecast)
}

/// Project health, classified from two independent signals: coverage
/// (assigned vs. forecast) and profitability (real margin, with the fully
/// potential margin separating a rough patch from a structural problem).
/// The five states are mutually exclusive and exhaustive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum HealthState {
    /// Fully staffed against the forecast and delivering a positive margin.
    CoveredProfitable,
    /// Margin is positive but staffing lags the forecast.
    UnderCoveredProfitable,
    /// Staffed, but the realized margin is negative while the potential
    /// margin is still positive.
    CoveredLosing,
    /// Even the fully potential margin is negative; no staffing mix fixes it.
    StructurallyUnviable,
    /// Assigned exceeds forecast. A tie resolves to the covered states.
    OverAssigned,
}

pub fn classify_health(
    assigned: f64,
    forecast: f64,
    real_margin: f64,
    potential_margin: f64,
) -> HealthState {
    if assigned > forecast {
        HealthState::OverAssigned
    } else if real_margin < 0.0 {
        if potential_margin < 0.0 {
            HealthState::StructurallyUnviable
        } else {
            HealthState::CoveredLosing
        }
    } else if assigned < forecast {
        HealthState::UnderCoveredProfitable
    } else {
        HealthState::CoveredProfitable
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::resolve_month;

    const TOL: f64 = 1e-9;

    fn record() -> MonthRecord {
        MonthRecord {
            revenue_forecast: 11000.0,
            revenue_assigned: 10000.0,
            ftes_forecast: 6.0,
            ftes_assigned: 5.0,
            cost_projected: 9000.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_cell_without_real_is_not_applicable() {
        let rec = record();
        let resolved = resolve_month(&rec, 1, None).unwrap();

        let cell = revenue_variance(&resolved, &rec);
        assert!(!cell.has_real);
        assert_eq!(cell.diff, None);
    }

    #[test]
    fn test_revenue_diff_against_forecast() {
        let mut rec = record();
        rec.revenue_real = Some(12500.0);
        let resolved = resolve_month(&rec, 1, None).unwrap();

        let cell = revenue_variance(&resolved, &rec);
        assert!(cell.has_real);
        assert!((cell.diff.unwrap() - 1500.0).abs() < TOL);
    }

    #[test]
    fn test_cost_cell_requires_both_components() {
        let mut rec = record();
        rec.resource_cost_real = Some(5000.0);
        let resolved = resolve_month(&rec, 1, None).unwrap();
        assert!(!cost_variance(&resolved, &rec).has_real);

        rec.other_cost_real = Some(1000.0);
        let resolved = resolve_month(&rec, 1, None).unwrap();
        let cell = cost_variance(&resolved, &rec);
        assert!(cell.has_real);
        assert!((cell.diff.unwrap() - -3000.0).abs() < TOL);
    }

    #[test]
    fn test_entered_zero_still_produces_a_diff() {
        let mut rec = record();
        rec.ftes_real = Some(0.0);
        let resolved = resolve_month(&rec, 1, None).unwrap();

        let cell = ftes_variance(&resolved, &rec);
        assert!(cell.has_real);
        assert!((cell.diff.unwrap() - -6.0).abs() < TOL);
    }

    #[test]
    fn test_health_states() {
        assert_eq!(
            classify_health(10.0, 10.0, 2000.0, 3000.0),
            HealthState::CoveredProfitable
        );
        assert_eq!(
            classify_health(6.0, 10.0, 2000.0, 3000.0),
            HealthState::UnderCoveredProfitable
        );
        assert_eq!(
            classify_health(10.0, 10.0, -500.0, 3000.0),
            HealthState::CoveredLosing
        );
        assert_eq!(
            classify_health(10.0, 10.0, -500.0, -100.0),
            HealthState::StructurallyUnviable
        );
        assert_eq!(
            classify_health(12.0, 10.0, 2000.0, 3000.0),
            HealthState::OverAssigned
        );
    }

    #[test]
    fn test_coverage_tie_is_covered_not_over_assigned() {
        assert_eq!(
            classify_health(10.0, 10.0, 1.0, 1.0),
            HealthState::CoveredProfitable
        );
        assert_eq!(
            classify_health(10.0, 10.0, -1.0, 1.0),
            HealthState::CoveredLosing
        );
    }
}
