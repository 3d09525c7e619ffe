use super::validate::{MAX_RETIREMENT_AGE, ensure_finite, validate_plan};
use super::{AgeSweepResult, AgeSweepRow, PlanInputs, PlanResult, PlanStatus, ValidationError};

const MONTHS_PER_YEAR: u32 = 12;

/// Unrounded figures for one plan. Rounding only happens when a
/// `PlanResult` is built.
#[derive(Clone, Copy, Debug)]
struct Projection {
    total_expenses: f64,
    required_savings: f64,
    additional_savings_needed: f64,
    monthly_savings_required: f64,
}

#[derive(Clone, Copy, Debug)]
struct MonthlyRates {
    investment_return: f64,
    inflation: f64,
}

impl MonthlyRates {
    fn from_inputs(inputs: &PlanInputs) -> Self {
        Self {
            investment_return: monthly_rate(inputs.investment_return),
            inflation: monthly_rate(inputs.inflation_rate),
        }
    }
}

pub fn run_plan(inputs: &PlanInputs) -> Result<PlanResult, ValidationError> {
    let inputs = validate_plan(inputs)?;
    let projection = project(inputs)?;
    Ok(build_plan_result(inputs, projection))
}

/// Re-runs the plan for every retirement age the validator would accept,
/// keeping everything else fixed.
pub fn run_retirement_age_sweep(inputs: &PlanInputs) -> Result<AgeSweepResult, ValidationError> {
    let inputs = validate_plan(inputs)?;

    let last_age = MAX_RETIREMENT_AGE.min(inputs.life_expectancy - 1);
    let mut rows = Vec::new();
    for retirement_age in (inputs.current_age + 1)..=last_age {
        let candidate = PlanInputs {
            retirement_age,
            ..inputs.clone()
        };
        let result = build_plan_result(&candidate, project(&candidate)?);
        rows.push(AgeSweepRow {
            retirement_age,
            additional_savings_needed: result.additional_savings_needed,
            monthly_savings_required: result.monthly_savings_required,
            status: result.status,
        });
    }

    let earliest_achievable_age = rows
        .iter()
        .find(|row| row.status == PlanStatus::Achievable)
        .map(|row| row.retirement_age);

    Ok(AgeSweepResult {
        earliest_achievable_age,
        rows,
    })
}

fn project(inputs: &PlanInputs) -> Result<Projection, ValidationError> {
    let rates = MonthlyRates::from_inputs(inputs);
    let accumulation_months = inputs.years_to_retirement() * MONTHS_PER_YEAR;

    let total_expenses = retirement_expenses(inputs, rates);
    let required_savings = required_savings_at_retirement(inputs, rates);

    let growth = (1.0 + rates.investment_return).powf(accumulation_months as f64);
    let fv_savings = inputs.current_savings * growth;
    let fv_investment = inputs.current_investment * growth;
    let fv_monthly_saving = inputs.monthly_saving_to_invest
        * annuity_factor(rates.investment_return, accumulation_months);

    let additional_savings_needed =
        (required_savings - (fv_savings + fv_investment + fv_monthly_saving)).max(0.0);

    let monthly_savings_required = if additional_savings_needed > 0.0 {
        additional_savings_needed / annuity_factor(rates.investment_return, accumulation_months)
    } else {
        0.0
    };

    ensure_finite(&[
        ("total_expenses", total_expenses),
        ("required_savings", required_savings),
        ("future_value_of_resources", fv_savings + fv_investment + fv_monthly_saving),
        ("monthly_savings_required", monthly_savings_required * MONTHS_PER_YEAR as f64),
    ])?;

    Ok(Projection {
        total_expenses,
        required_savings,
        additional_savings_needed,
        monthly_savings_required,
    })
}

fn build_plan_result(inputs: &PlanInputs, projection: Projection) -> PlanResult {
    let monthly_savings_required = round_to_cents(projection.monthly_savings_required);
    let status = if monthly_savings_required <= inputs.monthly_saving_to_invest {
        PlanStatus::Achievable
    } else {
        PlanStatus::NeedsReview
    };

    PlanResult {
        total_expenses: round_to_cents(projection.total_expenses),
        required_savings: round_to_cents(projection.required_savings),
        additional_savings_needed: round_to_cents(projection.additional_savings_needed),
        monthly_savings_required,
        yearly_savings_required: round_to_cents(
            projection.monthly_savings_required * MONTHS_PER_YEAR as f64,
        ),
        status,
    }
}

/// Annual percentage to the equivalent geometric monthly rate.
fn monthly_rate(annual_percent: f64) -> f64 {
    (1.0 + annual_percent / 100.0).powf(1.0 / MONTHS_PER_YEAR as f64) - 1.0
}

/// Nominal spending over retirement. Inflation applies from month 0 of
/// retirement with no yearly rebasing.
fn retirement_expenses(inputs: &PlanInputs, rates: MonthlyRates) -> f64 {
    let mut total = 0.0;
    for year in 0..inputs.years_in_retirement() {
        let mut yearly = 0.0;
        for month in 0..MONTHS_PER_YEAR {
            let elapsed = (year * MONTHS_PER_YEAR + month) as f64;
            yearly += inputs.monthly_expenses * (1.0 + rates.inflation).powf(elapsed);
        }
        total += yearly;
    }
    total
}

/// Capital needed on the retirement date to fund every inflated month,
/// discounted back at the investment return.
fn required_savings_at_retirement(inputs: &PlanInputs, rates: MonthlyRates) -> f64 {
    let mut total = 0.0;
    for year in 0..inputs.years_in_retirement() {
        for month in 0..MONTHS_PER_YEAR {
            let elapsed = (year * MONTHS_PER_YEAR + month) as f64;
            total += inputs.monthly_expenses * (1.0 + rates.inflation).powf(elapsed)
                / (1.0 + rates.investment_return).powf(elapsed);
        }
    }
    total
}

/// Future value of 1 paid each month for `months` months. A zero rate
/// degrades to a plain count.
fn annuity_factor(monthly_return: f64, months: u32) -> f64 {
    if monthly_return > 0.0 {
        ((1.0 + monthly_return).powf(months as f64) - 1.0) / monthly_return
    } else {
        months as f64
    }
}

pub(super) fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
