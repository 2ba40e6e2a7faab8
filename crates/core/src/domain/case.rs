use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Working hours of one full-time-equivalent employee per year (40 h x 52 weeks).
pub const FTE_ANNUAL_HOURS: u32 = 40 * 52;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DepartmentId(pub String);

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    pub id: DepartmentId,
    pub display_name: String,
    pub employees: u32,
    pub employees_after_automation: u32,
    pub hourly_wage: Decimal,
    /// Department hours as recorded in the case study.
    pub annual_hours: u32,
}

impl Department {
    pub fn annual_labor_cost(&self) -> Decimal {
        Decimal::from(self.employees) * self.hourly_wage * Decimal::from(FTE_ANNUAL_HOURS)
    }

    pub fn headcount_change(&self) -> i64 {
        i64::from(self.employees_after_automation) - i64::from(self.employees)
    }
}

/// The fixed inputs of a case study. Built once at startup and only read afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseData {
    pub title: String,
    pub current_labor_cost: Decimal,
    pub automated_labor_cost: Decimal,
    pub automation_cost: Decimal,
    pub annual_maintenance: Decimal,
    pub shipments: u64,
    pub stores: u32,
    pub departments: Vec<Department>,
}

impl CaseData {
    /// The grocery distribution center automation case.
    pub fn grocery_distribution() -> Self {
        Self {
            title: "Grocery Distribution Automation".to_string(),
            current_labor_cost: Decimal::from(12_272_000),
            automated_labor_cost: Decimal::from(10_257_000),
            automation_cost: Decimal::from(4_000_000),
            annual_maintenance: Decimal::from(1_000_000),
            shipments: 1_000_000,
            stores: 50,
            departments: vec![
                department("receiving", "Receiving", 50, 50, 12, 2_000),
                department("holding_picking", "Holding & Picking", 250, 131, 17, 10_000),
                department("shipping", "Shipping", 75, 150, 14, 3_000),
            ],
        }
    }

    pub fn department(&self, id: &str) -> Option<&Department> {
        self.departments.iter().find(|department| department.id.0 == id)
    }

    pub fn headcount(&self) -> u32 {
        self.departments.iter().map(|department| department.employees).sum()
    }

    pub fn headcount_after_automation(&self) -> u32 {
        self.departments.iter().map(|department| department.employees_after_automation).sum()
    }

    pub fn headcount_change(&self) -> i64 {
        i64::from(self.headcount_after_automation()) - i64::from(self.headcount())
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        let money = [
            ("current_labor_cost", self.current_labor_cost),
            ("automated_labor_cost", self.automated_labor_cost),
            ("automation_cost", self.automation_cost),
            ("annual_maintenance", self.annual_maintenance),
        ];
        if let Some((field, _)) = money.iter().find(|(_, amount)| amount.is_sign_negative()) {
            return Err(DomainError::InvariantViolation(format!("{field} must not be negative")));
        }

        if self.shipments == 0 {
            return Err(DomainError::InvariantViolation(
                "shipments must be greater than zero".to_string(),
            ));
        }

        if self.stores == 0 {
            return Err(DomainError::InvariantViolation(
                "stores must be greater than zero".to_string(),
            ));
        }

        if self.departments.is_empty() {
            return Err(DomainError::InvariantViolation(
                "case must describe at least one department".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for CaseData {
    fn default() -> Self {
        Self::grocery_distribution()
    }
}

fn department(
    id: &str,
    display_name: &str,
    employees: u32,
    employees_after_automation: u32,
    hourly_wage: i64,
    annual_hours: u32,
) -> Department {
    Department {
        id: DepartmentId(id.to_string()),
        display_name: display_name.to_string(),
        employees,
        employees_after_automation,
        hourly_wage: Decimal::from(hourly_wage),
        annual_hours,
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::CaseData;
    use crate::errors::DomainError;

    #[test]
    fn department_costs_add_up_to_current_labor_cost() {
        let case = CaseData::grocery_distribution();

        let receiving = case.department("receiving").expect("receiving department");
        let holding = case.department("holding_picking").expect("holding department");
        let shipping = case.department("shipping").expect("shipping department");

        assert_eq!(receiving.annual_labor_cost(), Decimal::from(1_248_000));
        assert_eq!(holding.annual_labor_cost(), Decimal::from(8_840_000));
        assert_eq!(shipping.annual_labor_cost(), Decimal::from(2_184_000));

        let total: Decimal =
            case.departments.iter().map(|department| department.annual_labor_cost()).sum();
        assert_eq!(total, case.current_labor_cost);
    }

    #[test]
    fn headcount_shrinks_by_forty_four() {
        let case = CaseData::grocery_distribution();

        assert_eq!(case.headcount(), 375);
        assert_eq!(case.headcount_after_automation(), 331);
        assert_eq!(case.headcount_change(), -44);

        let holding = case.department("holding_picking").expect("holding department");
        let shipping = case.department("shipping").expect("shipping department");
        assert_eq!(holding.headcount_change(), -119);
        assert_eq!(shipping.headcount_change(), 75);
    }

    #[test]
    fn fixed_case_is_valid() {
        assert_eq!(CaseData::grocery_distribution().validate(), Ok(()));
    }

    #[test]
    fn validation_rejects_zero_shipments() {
        let case = CaseData { shipments: 0, ..CaseData::grocery_distribution() };

        let error = case.validate().expect_err("zero shipments should be rejected");
        assert!(matches!(error, DomainError::InvariantViolation(ref message) if message.contains("shipments")));
    }

    #[test]
    fn validation_rejects_negative_money() {
        let case = CaseData {
            annual_maintenance: Decimal::from(-1),
            ..CaseData::grocery_distribution()
        };

        let error = case.validate().expect_err("negative maintenance should be rejected");
        assert_eq!(
            error,
            DomainError::InvariantViolation("annual_maintenance must not be negative".to_string())
        );
    }
}
