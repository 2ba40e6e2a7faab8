//! Derived figures of a case study.
//!
//! Every quantity has exactly one formula here; answers, tables, charts and the
//! quick-facts panel all read from these functions.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::case::CaseData;
use crate::format;

/// Years 0 through 5.
pub const DEFAULT_HORIZON_YEARS: u32 = 6;

/// Percentage applied when a shipment-volume question names no number.
pub const DEFAULT_SHIPMENT_CHANGE_PCT: i64 = 10;

pub const NO_PAYBACK_STATEMENT: &str = "automation does not pay back under current assumptions";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "years", rename_all = "snake_case")]
pub enum BreakEven {
    Years(Decimal),
    /// Net annual savings are zero or negative, so the investment never pays back.
    NoPayback,
}

impl BreakEven {
    pub fn compute(automation_cost: Decimal, net_savings: Decimal) -> Self {
        if net_savings <= Decimal::ZERO {
            return Self::NoPayback;
        }
        automation_cost.checked_div(net_savings).map_or(Self::NoPayback, Self::Years)
    }

    pub fn years(&self) -> Option<Decimal> {
        match self {
            Self::Years(years) => Some(*years),
            Self::NoPayback => None,
        }
    }

    pub fn pays_back(&self) -> bool {
        matches!(self, Self::Years(_))
    }

    /// `3.9 years`, or the no-payback statement.
    pub fn describe(&self) -> String {
        match self {
            Self::Years(years) => format!("{} years", format::one_decimal(*years)),
            Self::NoPayback => NO_PAYBACK_STATEMENT.to_string(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedMetrics {
    pub labor_savings: Decimal,
    pub net_savings: Decimal,
    pub break_even: BreakEven,
}

impl DerivedMetrics {
    pub fn from_case(case: &CaseData) -> Self {
        let labor_savings = case.current_labor_cost - case.automated_labor_cost;
        let net_savings = labor_savings - case.annual_maintenance;
        let break_even = BreakEven::compute(case.automation_cost, net_savings);

        Self { labor_savings, net_savings, break_even }
    }
}

/// A case together with its derived metrics, computed once.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseAnalysis {
    pub case: CaseData,
    pub metrics: DerivedMetrics,
}

impl CaseAnalysis {
    pub fn new(case: CaseData) -> Self {
        let metrics = DerivedMetrics::from_case(&case);
        Self { case, metrics }
    }

    pub fn savings_per_store(&self) -> Option<Decimal> {
        if self.case.stores == 0 {
            return None;
        }
        self.metrics.net_savings.checked_div(Decimal::from(self.case.stores))
    }

    /// `None` without a shipment baseline, or when the change is too large to represent.
    pub fn shipment_projection(&self, change_pct: Decimal) -> Option<ShipmentProjection> {
        if self.case.shipments == 0 {
            return None;
        }

        let shipments = Decimal::from(self.case.shipments);
        let factor = Decimal::ONE.checked_add(change_pct.checked_div(Decimal::ONE_HUNDRED)?)?;
        let projected_shipments = shipments.checked_mul(factor)?.max(Decimal::ZERO);
        let cost_per_shipment = self.case.automated_labor_cost.checked_div(shipments)?;
        let projected_cost = cost_per_shipment.checked_mul(projected_shipments)?;
        let projected_savings = self.case.current_labor_cost.checked_sub(projected_cost)?;

        Some(ShipmentProjection {
            change_pct,
            projected_shipments,
            cost_per_shipment,
            projected_cost,
            projected_savings,
        })
    }

    pub fn cumulative_projection(&self, horizon_years: u32) -> Vec<YearPosition> {
        (0..horizon_years)
            .map(|year| {
                let elapsed = Decimal::from(year);
                YearPosition {
                    year,
                    cumulative_cost: self.case.automation_cost
                        + elapsed * self.case.annual_maintenance,
                    cumulative_savings: elapsed * self.metrics.labor_savings,
                }
            })
            .collect()
    }
}

impl Default for CaseAnalysis {
    fn default() -> Self {
        Self::new(CaseData::grocery_distribution())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipmentProjection {
    pub change_pct: Decimal,
    pub projected_shipments: Decimal,
    pub cost_per_shipment: Decimal,
    pub projected_cost: Decimal,
    pub projected_savings: Decimal,
}

impl ShipmentProjection {
    pub fn whole_shipments(&self) -> u64 {
        self.projected_shipments.trunc().to_u64().unwrap_or(0)
    }
}

/// Cumulative position at the start of `year`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearPosition {
    pub year: u32,
    pub cumulative_cost: Decimal,
    pub cumulative_savings: Decimal,
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{BreakEven, CaseAnalysis, DerivedMetrics, NO_PAYBACK_STATEMENT};
    use crate::domain::case::CaseData;

    #[test]
    fn fixed_case_metrics() {
        let metrics = DerivedMetrics::from_case(&CaseData::grocery_distribution());

        assert_eq!(metrics.labor_savings, Decimal::from(2_015_000));
        assert_eq!(metrics.net_savings, Decimal::from(1_015_000));

        let years = metrics.break_even.years().expect("fixed case pays back");
        assert_eq!(years.round_dp(2), Decimal::new(394, 2));
        assert_eq!(metrics.break_even.describe(), "3.9 years");
    }

    #[test]
    fn break_even_is_undefined_without_positive_net_savings() {
        let case = CaseData {
            automated_labor_cost: Decimal::from(11_272_000),
            ..CaseData::grocery_distribution()
        };

        let metrics = DerivedMetrics::from_case(&case);
        assert_eq!(metrics.net_savings, Decimal::ZERO);
        assert_eq!(metrics.break_even, BreakEven::NoPayback);
        assert_eq!(metrics.break_even.describe(), NO_PAYBACK_STATEMENT);

        let losing = CaseData {
            automated_labor_cost: Decimal::from(12_000_000),
            ..CaseData::grocery_distribution()
        };
        assert!(!DerivedMetrics::from_case(&losing).break_even.pays_back());
    }

    #[test]
    fn savings_per_store_is_exact() {
        let analysis = CaseAnalysis::default();
        assert_eq!(analysis.savings_per_store(), Some(Decimal::from(20_300)));
    }

    #[test]
    fn ten_percent_more_shipments() {
        let analysis = CaseAnalysis::default();
        let projection =
            analysis.shipment_projection(Decimal::from(10)).expect("shipments are non-zero");

        assert_eq!(projection.whole_shipments(), 1_100_000);
        assert_eq!(projection.projected_cost, Decimal::from(11_282_700));
        assert_eq!(projection.projected_savings, Decimal::from(989_300));
    }

    #[test]
    fn shipment_projection_needs_shipments() {
        let analysis = CaseAnalysis::new(CaseData { shipments: 0, ..CaseData::default() });
        assert!(analysis.shipment_projection(Decimal::from(10)).is_none());
    }

    #[test]
    fn shipment_projection_rejects_unrepresentable_changes() {
        let analysis = CaseAnalysis::default();

        let huge = Decimal::from_i128_with_scale(10_i128.pow(24), 0);

        assert!(analysis.shipment_projection(Decimal::MAX).is_none());
        assert!(analysis.shipment_projection(Decimal::MIN).is_none());
        assert!(analysis.shipment_projection(huge).is_none());

        let collapse =
            analysis.shipment_projection(Decimal::from(-500)).expect("finite decrease projects");
        assert_eq!(collapse.whole_shipments(), 0);
        assert_eq!(collapse.projected_savings, Decimal::from(12_272_000));
    }

    #[test]
    fn cumulative_projection_grows_linearly() {
        let analysis = CaseAnalysis::default();
        let positions = analysis.cumulative_projection(6);

        assert_eq!(positions.len(), 6);
        assert_eq!(positions[0].cumulative_cost, Decimal::from(4_000_000));
        assert_eq!(positions[0].cumulative_savings, Decimal::ZERO);
        for window in positions.windows(2) {
            assert_eq!(
                window[1].cumulative_cost - window[0].cumulative_cost,
                Decimal::from(1_000_000)
            );
            assert_eq!(
                window[1].cumulative_savings - window[0].cumulative_savings,
                Decimal::from(2_015_000)
            );
        }
        assert_eq!(positions[5].year, 5);
        assert_eq!(positions[5].cumulative_savings, Decimal::from(10_075_000));
    }
}
