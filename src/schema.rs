use crate::error::{PnlError, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Number of months in every series handled by this crate.
pub const MONTHS_PER_YEAR: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[schemars(description = "United States dollar. The planning currency for rates and contracts.")]
    Usd,

    #[schemars(description = "Argentine peso. The local delivery currency; converted via the monthly ARS-per-USD rate.")]
    Ars,
}

/// Raw financial inputs for one entity (project or client) in one month.
///
/// Forecast/assigned/unassigned figures always exist (they come from the
/// staffing plan); the `*_real` fields are manually entered actuals and are
/// `None` until someone types them in. Absence is "not yet entered", which is
/// a different business fact than an entered zero.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct MonthRecord {
    #[schemars(description = "Revenue from the commercial forecast for this month.")]
    pub revenue_forecast: f64,

    #[schemars(description = "Revenue tied to confirmed staffing (backlog).")]
    pub revenue_assigned: f64,

    #[schemars(description = "Forecast revenue not yet staffed (potential).")]
    pub revenue_unassigned: f64,

    #[schemars(description = "Manually entered actual revenue, if any. Supersedes the assigned figure when present.")]
    pub revenue_real: Option<f64>,

    #[schemars(description = "FTEs from the commercial forecast for this month.")]
    pub ftes_forecast: f64,

    #[schemars(description = "FTEs tied to confirmed staffing (backlog).")]
    pub ftes_assigned: f64,

    #[schemars(description = "Forecast FTEs not yet staffed (potential).")]
    pub ftes_unassigned: f64,

    #[schemars(description = "Manually entered actual FTEs, if any.")]
    pub ftes_real: Option<f64>,

    #[schemars(
        description = "Fully projected cost for this month, secondary cost components already included."
    )]
    pub cost_projected: f64,

    #[schemars(description = "Actual resource (people) cost, if entered. Only used together with other_cost_real.")]
    pub resource_cost_real: Option<f64>,

    #[schemars(description = "Actual non-resource cost, if entered. Only used together with resource_cost_real.")]
    pub other_cost_real: Option<f64>,
}

/// Monthly ARS-per-USD exchange rates for one year.
///
/// A missing (or zero) rate makes any cross-currency conversion for that
/// month undefined; it is never silently defaulted to parity.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct FxTable {
    #[schemars(description = "ARS-per-USD rate per month, index 0 = January. Null means the rate is not yet published.")]
    pub rates: [Option<f64>; MONTHS_PER_YEAR],
}

impl FxTable {
    pub fn new(rates: [Option<f64>; MONTHS_PER_YEAR]) -> Self {
        Self { rates }
    }

    /// Uniform rate for every month. Test and back-of-envelope helper.
    pub fn flat(rate: f64) -> Self {
        Self {
            rates: [Some(rate); MONTHS_PER_YEAR],
        }
    }

    pub fn rate(&self, month: u32) -> Result<Option<f64>> {
        Ok(self.rates[month_slot(month)?])
    }

    /// Arithmetic mean of the published monthly rates. Months without a rate
    /// are excluded; `None` when no month has one.
    pub fn mean_rate(&self) -> Option<f64> {
        let published: Vec<f64> = self.rates.iter().filter_map(|r| *r).collect();
        if published.is_empty() {
            None
        } else {
            Some(published.iter().sum::<f64>() / published.len() as f64)
        }
    }
}

/// Successfully fetched year of data for one client.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ClientData {
    #[schemars(description = "Client name, used for logging and warning messages only.")]
    pub name: String,

    #[schemars(description = "The client's twelve month records, index 0 = January.")]
    pub months: Box<[MonthRecord; MONTHS_PER_YEAR]>,
}

/// Upstream fetch failure for one client. The Rolling aggregate excludes the
/// client and carries this alongside the result as a warning channel.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FetchFailure {
    #[schemars(description = "Client whose data could not be fetched.")]
    pub client: String,

    #[schemars(description = "Upstream error description, for display only.")]
    pub reason: String,
}

/// Per-client fetch outcome at the aggregation boundary.
pub type ClientFetch = std::result::Result<ClientData, FetchFailure>;

/// Pipeline forecast entry not tied to any existing client. Contributes to
/// the "new" bucket of the Rolling view and carries no cost (nothing is
/// staffed yet).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ForecastEntry {
    #[schemars(description = "Opportunity name.")]
    pub name: String,

    #[schemars(description = "Expected revenue and FTEs keyed by month number (1-12). Months not listed contribute nothing.")]
    pub months: BTreeMap<u32, ForecastMonth>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, JsonSchema)]
pub struct ForecastMonth {
    pub revenue: f64,
    pub ftes: f64,
}

impl ForecastEntry {
    pub fn validate(&self) -> Result<()> {
        for month in self.months.keys() {
            month_slot(*month)?;
        }
        Ok(())
    }
}

/// The full input set for a Rolling portfolio computation, as the API layer
/// receives it. Exists mostly so its JSON schema can be published.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RollingRequest {
    #[schemars(description = "Twelve month records per client, for every client whose fetch succeeded.")]
    pub clients: Vec<ClientData>,

    #[schemars(description = "Stand-alone pipeline forecast entries.")]
    pub forecasts: Vec<ForecastEntry>,
}

impl RollingRequest {
    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(RollingRequest)
    }

    pub fn schema_as_json() -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&Self::generate_json_schema())
    }
}

/// Maps a 1-based month number to its series slot, failing fast on anything
/// outside 1-12. An out-of-range month is a programming error upstream, not a
/// missing-data condition.
pub fn month_slot(month: u32) -> Result<usize> {
    if (1..=12).contains(&month) {
        Ok((month - 1) as usize)
    } else {
        Err(PnlError::InvalidMonth(month))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_slot_bounds() {
        assert_eq!(month_slot(1).unwrap(), 0);
        assert_eq!(month_slot(12).unwrap(), 11);
        assert!(matches!(month_slot(0), Err(PnlError::InvalidMonth(0))));
        assert!(matches!(month_slot(13), Err(PnlError::InvalidMonth(13))));
    }

    #[test]
    fn test_mean_rate_ignores_missing_months() {
        let mut rates = [None; MONTHS_PER_YEAR];
        rates[0] = Some(900.0);
        rates[5] = Some(1100.0);
        let table = FxTable::new(rates);
        assert!((table.mean_rate().unwrap() - 1000.0).abs() < 1e-9);

        assert_eq!(FxTable::default().mean_rate(), None);
    }

    #[test]
    fn test_schema_generation() {
        let schema_json = RollingRequest::schema_as_json().unwrap();
        assert!(schema_json.contains("clients"));
        assert!(schema_json.contains("forecasts"));
        assert!(schema_json.contains("revenue_assigned"));
    }

    #[test]
    fn test_month_record_serialization() {
        let record = MonthRecord {
            revenue_forecast: 10000.0,
            revenue_assigned: 9000.0,
            revenue_unassigned: 1000.0,
            revenue_real: None,
            ftes_forecast: 5.0,
            ftes_assigned: 4.5,
            ftes_unassigned: 0.5,
            ftes_real: None,
            cost_projected: 7000.0,
            resource_cost_real: Some(6500.0),
            other_cost_real: None,
        };

        let json = serde_json::to_string_pretty(&record).unwrap();
        let back: MonthRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back.revenue_assigned, 9000.0);
        assert_eq!(back.revenue_real, None);
        assert_eq!(back.resource_cost_real, Some(6500.0));
    }
}
