use super::{PlanInputs, TaxInputs, ValidationError};

const MIN_CURRENT_AGE: i32 = 20;
pub(crate) const MAX_RETIREMENT_AGE: i32 = 85;
const MAX_LIFE_EXPECTANCY: i32 = 100;

/// Checks every invariant a plan needs before any arithmetic runs and hands
/// the inputs back once they hold. Numeric sanity is checked across all
/// fields first, then ages, rates and signs.
pub fn validate_plan(inputs: &PlanInputs) -> Result<&PlanInputs, ValidationError> {
    for (field, value) in money_fields(inputs)
        .into_iter()
        .chain(rate_fields(inputs))
    {
        if !value.is_finite() {
            return Err(ValidationError::NotNumeric { field });
        }
    }

    if !(MIN_CURRENT_AGE <= inputs.current_age
        && inputs.current_age < inputs.retirement_age
        && inputs.retirement_age <= MAX_RETIREMENT_AGE)
    {
        return Err(ValidationError::AgeOrder {
            current_age: inputs.current_age,
            retirement_age: inputs.retirement_age,
        });
    }

    if !(inputs.retirement_age < inputs.life_expectancy
        && inputs.life_expectancy <= MAX_LIFE_EXPECTANCY)
    {
        return Err(ValidationError::LifeExpectancyOrder {
            retirement_age: inputs.retirement_age,
            life_expectancy: inputs.life_expectancy,
        });
    }

    for (field, value) in rate_fields(inputs) {
        if !(0.0..=100.0).contains(&value) {
            return Err(ValidationError::RateOutOfRange { field, value });
        }
    }

    for (field, value) in money_fields(inputs) {
        if value < 0.0 {
            return Err(ValidationError::Negative { field, value });
        }
    }

    Ok(inputs)
}

pub fn validate_tax(inputs: &TaxInputs) -> Result<&TaxInputs, ValidationError> {
    let fields = [
        ("monthly_income", inputs.monthly_income),
        ("insurance_premium", inputs.insurance_premium),
        ("social_security", inputs.social_security),
    ];
    for (field, value) in fields {
        if !value.is_finite() {
            return Err(ValidationError::NotNumeric { field });
        }
        if value < 0.0 {
            return Err(ValidationError::Negative { field, value });
        }
    }
    Ok(inputs)
}

/// Valid but absurdly large amounts can still overflow during projection;
/// those are reported rather than serialized as `null`.
pub(super) fn ensure_finite(outputs: &[(&'static str, f64)]) -> Result<(), ValidationError> {
    match outputs.iter().find(|(_, value)| !value.is_finite()) {
        Some((field, _)) => Err(ValidationError::Overflow { field: *field }),
        None => Ok(()),
    }
}

fn money_fields(inputs: &PlanInputs) -> [(&'static str, f64); 4] {
    [
        ("monthly_expenses", inputs.monthly_expenses),
        ("current_savings", inputs.current_savings),
        ("current_investment", inputs.current_investment),
        ("monthly_saving_to_invest", inputs.monthly_saving_to_invest),
    ]
}

fn rate_fields(inputs: &PlanInputs) -> [(&'static str, f64); 2] {
    [
        ("inflation_rate", inputs.inflation_rate),
        ("investment_return", inputs.investment_return),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ErrorClass;

    fn valid_inputs() -> PlanInputs {
        PlanInputs {
            current_age: 30,
            retirement_age: 60,
            life_expectancy: 85,
            monthly_expenses: 20_000.0,
            current_savings: 100_000.0,
            current_investment: 0.0,
            monthly_saving_to_invest: 0.0,
            investment_return: 5.0,
            inflation_rate: 3.0,
        }
    }

    #[test]
    fn accepts_valid_inputs() {
        let inputs = valid_inputs();
        assert_eq!(validate_plan(&inputs), Ok(&inputs));
    }

    #[test]
    fn rejects_retirement_at_current_age() {
        let mut inputs = valid_inputs();
        inputs.current_age = 60;
        let err = validate_plan(&inputs).expect_err("equal ages must be rejected");
        assert!(matches!(err, ValidationError::AgeOrder { .. }));
        assert_eq!(err.class(), ErrorClass::Range);
    }

    #[test]
    fn accepts_retirement_one_year_away_at_upper_bound() {
        let mut inputs = valid_inputs();
        inputs.current_age = 84;
        inputs.retirement_age = 85;
        inputs.life_expectancy = 86;
        assert!(validate_plan(&inputs).is_ok());
    }

    #[test]
    fn accepts_inclusive_upper_bounds() {
        let mut inputs = valid_inputs();
        inputs.investment_return = 100.0;
        inputs.inflation_rate = 100.0;
        assert!(validate_plan(&inputs).is_ok());

        let mut inputs = valid_inputs();
        inputs.retirement_age = 85;
        inputs.life_expectancy = 100;
        assert!(validate_plan(&inputs).is_ok());

        let mut inputs = valid_inputs();
        inputs.investment_return = 0.0;
        inputs.inflation_rate = 0.0;
        assert!(validate_plan(&inputs).is_ok());
    }

    #[test]
    fn negative_ages_are_range_errors() {
        let mut inputs = valid_inputs();
        inputs.current_age = -1;
        let err = validate_plan(&inputs).expect_err("negative age");
        assert_eq!(
            err,
            ValidationError::AgeOrder {
                current_age: -1,
                retirement_age: 60
            }
        );
        assert_eq!(err.class(), ErrorClass::Range);

        let mut inputs = valid_inputs();
        inputs.life_expectancy = -85;
        let err = validate_plan(&inputs).expect_err("negative life expectancy");
        assert!(matches!(err, ValidationError::LifeExpectancyOrder { .. }));
        assert_eq!(err.class(), ErrorClass::Range);
    }

    #[test]
    fn ensure_finite_names_first_bad_output() {
        assert_eq!(ensure_finite(&[("a", 1.0), ("b", 2.0)]), Ok(()));
        let err = ensure_finite(&[("a", 1.0), ("b", f64::INFINITY), ("c", f64::NAN)])
            .expect_err("infinite output");
        assert_eq!(err, ValidationError::Overflow { field: "b" });
        assert_eq!(err.class(), ErrorClass::Range);
    }

    #[test]
    fn rejects_age_bounds() {
        let mut young = valid_inputs();
        young.current_age = 19;
        assert!(matches!(
            validate_plan(&young),
            Err(ValidationError::AgeOrder { .. })
        ));

        let mut late = valid_inputs();
        late.retirement_age = 86;
        late.life_expectancy = 90;
        assert!(matches!(
            validate_plan(&late),
            Err(ValidationError::AgeOrder { .. })
        ));
    }

    #[test]
    fn rejects_life_expectancy_order() {
        let mut inputs = valid_inputs();
        inputs.life_expectancy = inputs.retirement_age;
        assert!(matches!(
            validate_plan(&inputs),
            Err(ValidationError::LifeExpectancyOrder { .. })
        ));

        inputs.life_expectancy = 101;
        assert!(matches!(
            validate_plan(&inputs),
            Err(ValidationError::LifeExpectancyOrder { .. })
        ));
    }

    #[test]
    fn rejects_rates_out_of_range() {
        let mut inputs = valid_inputs();
        inputs.inflation_rate = -0.5;
        let err = validate_plan(&inputs).expect_err("negative inflation");
        assert!(err.to_string().contains("inflation_rate"));

        let mut inputs = valid_inputs();
        inputs.investment_return = 100.5;
        let err = validate_plan(&inputs).expect_err("return above 100");
        assert!(err.to_string().contains("investment_return"));
    }

    #[test]
    fn rejects_negative_money() {
        let mut inputs = valid_inputs();
        inputs.monthly_saving_to_invest = -1.0;
        assert_eq!(
            validate_plan(&inputs),
            Err(ValidationError::Negative {
                field: "monthly_saving_to_invest",
                value: -1.0
            })
        );
    }

    #[test]
    fn non_finite_values_fail_before_range_checks() {
        let mut inputs = valid_inputs();
        inputs.current_age = 10;
        inputs.current_savings = f64::NAN;
        let err = validate_plan(&inputs).expect_err("NaN must be rejected");
        assert_eq!(
            err,
            ValidationError::NotNumeric {
                field: "current_savings"
            }
        );
        assert_eq!(err.class(), ErrorClass::Type);
    }

    #[test]
    fn tax_rejects_negative_income() {
        let inputs = TaxInputs {
            monthly_income: -10.0,
            ..TaxInputs::default()
        };
        assert!(matches!(
            validate_tax(&inputs),
            Err(ValidationError::Negative {
                field: "monthly_income",
                ..
            })
        ));
    }
}
