use crate::resolver::ResolvedMonth;
use serde::{Deserialize, Serialize};

/// Standard monthly hours baseline used for blend rate and blend cost.
pub const STANDARD_MONTHLY_HOURS: f64 = 160.0;

/// The full derived indicator set for one month of one entity. Immutable once
/// computed; values carry full precision, rounding belongs to presentation.
///
/// Ratio fields are `None` when their denominator is zero — an undefined
/// ratio, not an error and never `NaN` or `Infinity`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EffectiveMonth {
    pub revenue: f64,
    pub cost: f64,
    pub ftes: f64,
    pub gross: f64,
    pub gm_pct: Option<f64>,
    pub blend_rate: Option<f64>,
    pub blend_cost: Option<f64>,
    pub revenue_is_real: bool,
    pub cost_is_real: bool,
    pub ftes_is_real: bool,
}

/// Guarded ratio: `None` on a non-positive denominator, never a division by
/// zero.
pub(crate) fn ratio(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator > 0.0 {
        Some(numerator / denominator)
    } else {
        None
    }
}

pub(crate) fn gm_pct(gross: f64, revenue: f64) -> Option<f64> {
    ratio(gross, revenue).map(|r| r * 100.0)
}

pub(crate) fn blend(amount: f64, ftes: f64) -> Option<f64> {
    ratio(amount, ftes).map(|per_fte| per_fte / STANDARD_MONTHLY_HOURS)
}

/// Derives the month's P&L indicators from its resolved effective values.
pub fn compute_month(resolved: &ResolvedMonth) -> EffectiveMonth {
    let gross = resolved.revenue - resolved.cost;

    EffectiveMonth {
        revenue: resolved.revenue,
        cost: resolved.cost,
        ftes: resolved.ftes,
        gross,
        gm_pct: gm_pct(gross, resolved.revenue),
        blend_rate: blend(resolved.revenue, resolved.ftes),
        blend_cost: blend(resolved.cost, resolved.ftes),
        revenue_is_real: resolved.revenue_is_real,
        cost_is_real: resolved.cost_is_real,
        ftes_is_real: resolved.ftes_is_real,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-9;

    fn resolved(revenue: f64, cost: f64, ftes: f64) -> ResolvedMonth {
        ResolvedMonth {
            revenue,
            cost,
            ftes,
            revenue_is_real: false,
            cost_is_real: false,
            ftes_is_real: false,
        }
    }

    #[test]
    fn test_full_indicator_set() {
        let month = compute_month(&resolved(16000.0, 12000.0, 5.0));

        assert!((month.gross - 4000.0).abs() < TOL);
        assert!((month.gm_pct.unwrap() - 25.0).abs() < TOL);
        // 16000 / 5 / 160 = 20 per hour
        assert!((month.blend_rate.unwrap() - 20.0).abs() < TOL);
        assert!((month.blend_cost.unwrap() - 15.0).abs() < TOL);
    }

    #[test]
    fn test_zero_revenue_has_null_margin() {
        let month = compute_month(&resolved(0.0, 3000.0, 2.0));
        assert_eq!(month.gm_pct, None);
        assert!((month.gross - -3000.0).abs() < TOL);
        assert!(month.blend_cost.is_some());
    }

    #[test]
    fn test_zero_ftes_have_null_blends() {
        let month = compute_month(&resolved(10000.0, 8000.0, 0.0));
        assert_eq!(month.blend_rate, None);
        assert_eq!(month.blend_cost, None);
        assert!(month.gm_pct.is_some());
    }

    #[test]
    fn test_negative_gross_keeps_defined_margin() {
        let month = compute_month(&resolved(10000.0, 14000.0, 4.0));
        assert!((month.gm_pct.unwrap() - -40.0).abs() < TOL);
    }

    #[test]
    fn test_no_nan_or_infinity() {
        let month = compute_month(&resolved(0.0, 0.0, 0.0));
        assert_eq!(month.gm_pct, None);
        assert_eq!(month.blend_rate, None);
        assert_eq!(month.blend_cost, None);
        assert_eq!(month.gross, 0.0);
    }
}
