mod engine;
mod error;
mod tax;
mod types;
mod validate;

pub use engine::{run_plan, run_retirement_age_sweep};
pub use error::{ErrorClass, ValidationError};
pub use tax::run_income_tax;
pub use types::{
    AgeSweepResult, AgeSweepRow, PlanInputs, PlanResult, PlanStatus, TaxInputs, TaxResult,
};
pub use validate::{validate_plan, validate_tax};
