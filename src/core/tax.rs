use super::engine::round_to_cents;
use super::validate::{ensure_finite, validate_tax};
use super::{TaxInputs, TaxResult, ValidationError};

const PERSONAL_ALLOWANCE: f64 = 60_000.0;
const SPOUSE_ALLOWANCE: f64 = 60_000.0;
const CHILD_ALLOWANCE: f64 = 30_000.0;

/// (threshold, marginal rate), highest band first.
const TAX_BRACKETS: [(f64, f64); 8] = [
    (5_000_000.0, 0.35),
    (2_000_000.0, 0.30),
    (1_000_000.0, 0.25),
    (750_000.0, 0.20),
    (500_000.0, 0.15),
    (300_000.0, 0.10),
    (150_000.0, 0.05),
    (0.0, 0.00),
];

pub fn run_income_tax(inputs: &TaxInputs) -> Result<TaxResult, ValidationError> {
    validate_tax(inputs)?;

    let gross_income = inputs.monthly_income * 12.0;
    let total_deductions = total_deductions(inputs);
    let tax_to_pay = progressive_tax(gross_income - total_deductions);
    ensure_finite(&[
        ("gross_income", gross_income),
        ("total_deductions", total_deductions),
        ("tax_to_pay", tax_to_pay),
    ])?;

    Ok(TaxResult {
        total_deductions: round_to_cents(total_deductions),
        gross_income: round_to_cents(gross_income),
        tax_to_pay: round_to_cents(tax_to_pay),
    })
}

fn total_deductions(inputs: &TaxInputs) -> f64 {
    let personal = if inputs.use_personal_allowance {
        PERSONAL_ALLOWANCE
    } else {
        0.0
    };
    let spouse = if inputs.use_spouse_allowance {
        SPOUSE_ALLOWANCE
    } else {
        0.0
    };
    let children = inputs.num_children as f64 * CHILD_ALLOWANCE;
    personal + spouse + children + inputs.insurance_premium + inputs.social_security
}

/// Each band taxes only the slice of income above its threshold; what is
/// left drops into the next band down.
fn progressive_tax(net_income: f64) -> f64 {
    let mut remaining = net_income;
    let mut tax = 0.0;
    for (threshold, rate) in TAX_BRACKETS {
        if remaining > threshold {
            tax += (remaining - threshold) * rate;
            remaining = threshold;
        }
    }
    tax
}
