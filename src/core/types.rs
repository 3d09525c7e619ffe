use serde::Serialize;

/// Assumptions for one retirement projection. Rates are annual percentages
/// (5.0 means 5%), money is currency-agnostic.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanInputs {
    pub current_age: i32,
    pub retirement_age: i32,
    pub life_expectancy: i32,
    pub monthly_expenses: f64,
    pub current_savings: f64,
    pub current_investment: f64,
    pub monthly_saving_to_invest: f64,
    pub investment_return: f64,
    pub inflation_rate: f64,
}

impl PlanInputs {
    pub fn years_to_retirement(&self) -> u32 {
        years_between(self.current_age, self.retirement_age)
    }

    pub fn years_in_retirement(&self) -> u32 {
        years_between(self.retirement_age, self.life_expectancy)
    }
}

/// Out-of-order ages count as zero years; validation rejects them anyway.
fn years_between(from: i32, to: i32) -> u32 {
    u32::try_from(to.saturating_sub(from)).unwrap_or(0)
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanStatus {
    Achievable,
    NeedsReview,
}

impl PlanStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PlanStatus::Achievable => "achievable",
            PlanStatus::NeedsReview => "needs_review",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanResult {
    pub total_expenses: f64,
    pub required_savings: f64,
    pub additional_savings_needed: f64,
    pub monthly_savings_required: f64,
    pub yearly_savings_required: f64,
    pub status: PlanStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgeSweepRow {
    pub retirement_age: i32,
    pub additional_savings_needed: f64,
    pub monthly_savings_required: f64,
    pub status: PlanStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgeSweepResult {
    pub earliest_achievable_age: Option<i32>,
    pub rows: Vec<AgeSweepRow>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TaxInputs {
    pub monthly_income: f64,
    pub use_personal_allowance: bool,
    pub use_spouse_allowance: bool,
    pub num_children: u32,
    pub insurance_premium: f64,
    pub social_security: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaxResult {
    pub total_deductions: f64,
    pub gross_income: f64,
    pub tax_to_pay: f64,
}
