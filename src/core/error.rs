use thiserror::Error;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    /// A field is absent or not a usable number.
    Type,
    /// A number is present but breaks an ordering, bound or sign constraint.
    Range,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("{field} is required")]
    Missing { field: &'static str },

    #[error("{field} must be numeric")]
    NotNumeric { field: &'static str },

    #[error("{field} must be a whole number")]
    NotWholeNumber { field: &'static str },

    #[error(
        "invalid age values: ensure 20 <= current_age < retirement_age <= 85 (got current_age={current_age}, retirement_age={retirement_age})"
    )]
    AgeOrder {
        current_age: i32,
        retirement_age: i32,
    },

    #[error(
        "invalid age values: ensure retirement_age < life_expectancy <= 100 (got retirement_age={retirement_age}, life_expectancy={life_expectancy})"
    )]
    LifeExpectancyOrder {
        retirement_age: i32,
        life_expectancy: i32,
    },

    #[error("{field} must be between 0 and 100 (got {value})")]
    RateOutOfRange { field: &'static str, value: f64 },

    #[error("{field} must be >= 0 (got {value})")]
    Negative { field: &'static str, value: f64 },

    #[error("inputs are too large to project: {field} is not finite")]
    Overflow { field: &'static str },
}

impl ValidationError {
    pub fn class(&self) -> ErrorClass {
        match self {
            ValidationError::Missing { .. }
            | ValidationError::NotNumeric { .. }
            | ValidationError::NotWholeNumber { .. } => ErrorClass::Type,
            ValidationError::AgeOrder { .. }
            | ValidationError::LifeExpectancyOrder { .. }
            | ValidationError::RateOutOfRange { .. }
            | ValidationError::Negative { .. }
            | ValidationError::Overflow { .. } => ErrorClass::Range,
        }
    }
}
