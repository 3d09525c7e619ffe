use clap::{Args, Parser, Subcommand};

use crate::core::{PlanInputs, TaxInputs};

const DEFAULT_PORT: u16 = 8080;

#[derive(Parser, Debug)]
#[command(
    name = "nestplan",
    about = "Deterministic retirement savings planner with a companion income-tax calculator"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the JSON HTTP API
    Serve {
        #[arg(long, help = "Listen port; falls back to $PORT, then 8080")]
        port: Option<u16>,
    },
    /// Compute one retirement plan and print it as JSON
    Plan(PlanArgs),
    /// Evaluate the plan for every allowed retirement age
    Sweep(PlanArgs),
    /// Compute personal income tax and print it as JSON
    Tax(TaxArgs),
}

#[derive(Args, Debug, Clone)]
pub struct PlanArgs {
    #[arg(long, allow_negative_numbers = true)]
    pub current_age: i32,
    #[arg(long, allow_negative_numbers = true)]
    pub retirement_age: i32,
    #[arg(long, allow_negative_numbers = true)]
    pub life_expectancy: i32,
    #[arg(long, help = "Expected monthly expenses in retirement, in today's money")]
    pub monthly_expenses: f64,
    #[arg(long)]
    pub current_savings: f64,
    #[arg(long, help = "Expected annual investment return in percent, e.g. 5")]
    pub investment_return: f64,
    #[arg(long, default_value_t = 0.0)]
    pub current_investment: f64,
    #[arg(long, default_value_t = 0.0)]
    pub monthly_saving_to_invest: f64,
    #[arg(
        long,
        default_value_t = 3.0,
        help = "Expected annual inflation in percent"
    )]
    pub inflation_rate: f64,
}

impl From<PlanArgs> for PlanInputs {
    fn from(args: PlanArgs) -> Self {
        PlanInputs {
            current_age: args.current_age,
            retirement_age: args.retirement_age,
            life_expectancy: args.life_expectancy,
            monthly_expenses: args.monthly_expenses,
            current_savings: args.current_savings,
            current_investment: args.current_investment,
            monthly_saving_to_invest: args.monthly_saving_to_invest,
            investment_return: args.investment_return,
            inflation_rate: args.inflation_rate,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct TaxArgs {
    #[arg(long)]
    pub monthly_income: f64,
    #[arg(long)]
    pub personal_allowance: bool,
    #[arg(long)]
    pub spouse_allowance: bool,
    #[arg(long, default_value_t = 0)]
    pub num_children: u32,
    #[arg(long, default_value_t = 0.0)]
    pub insurance_premium: f64,
    #[arg(long, default_value_t = 0.0)]
    pub social_security: f64,
}

impl From<TaxArgs> for TaxInputs {
    fn from(args: TaxArgs) -> Self {
        TaxInputs {
            monthly_income: args.monthly_income,
            use_personal_allowance: args.personal_allowance,
            use_spouse_allowance: args.spouse_allowance,
            num_children: args.num_children,
            insurance_premium: args.insurance_premium,
            social_security: args.social_security,
        }
    }
}

/// `--port`, then `$PORT`, then the default.
pub fn resolve_port(flag: Option<u16>) -> u16 {
    flag.or_else(|| {
        std::env::var("PORT")
            .ok()
            .and_then(|raw| raw.parse::<u16>().ok())
    })
    .unwrap_or(DEFAULT_PORT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_command_applies_keyword_defaults() {
        let cli = Cli::try_parse_from([
            "nestplan",
            "plan",
            "--current-age",
            "30",
            "--retirement-age",
            "60",
            "--life-expectancy",
            "85",
            "--monthly-expenses",
            "20000",
            "--current-savings",
            "100000",
            "--investment-return",
            "5",
        ])
        .expect("valid args");

        let Command::Plan(args) = cli.command else {
            panic!("expected plan command");
        };
        let inputs = PlanInputs::from(args);
        assert_eq!(inputs.current_investment, 0.0);
        assert_eq!(inputs.monthly_saving_to_invest, 0.0);
        assert_eq!(inputs.inflation_rate, 3.0);
        assert_eq!(inputs.retirement_age, 60);
    }

    #[test]
    fn plan_command_requires_core_fields() {
        let err = Cli::try_parse_from(["nestplan", "plan", "--current-age", "30"]);
        assert!(err.is_err());
    }

    #[test]
    fn plan_command_passes_negative_ages_to_validation() {
        let cli = Cli::try_parse_from([
            "nestplan",
            "plan",
            "--current-age",
            "-1",
            "--retirement-age",
            "60",
            "--life-expectancy",
            "85",
            "--monthly-expenses",
            "1",
            "--current-savings",
            "1",
            "--investment-return",
            "5",
        ])
        .expect("negative numbers parse as values");

        let Command::Plan(args) = cli.command else {
            panic!("expected plan command");
        };
        let err = crate::core::run_plan(&PlanInputs::from(args)).expect_err("age below 20");
        assert_eq!(err.class(), crate::core::ErrorClass::Range);
    }

    #[test]
    fn tax_command_parses_flags() {
        let cli = Cli::try_parse_from([
            "nestplan",
            "tax",
            "--monthly-income",
            "50000",
            "--personal-allowance",
            "--num-children",
            "2",
        ])
        .expect("valid args");

        let Command::Tax(args) = cli.command else {
            panic!("expected tax command");
        };
        let inputs = TaxInputs::from(args);
        assert!(inputs.use_personal_allowance);
        assert!(!inputs.use_spouse_allowance);
        assert_eq!(inputs.num_children, 2);
    }

    #[test]
    fn explicit_port_wins() {
        assert_eq!(resolve_port(Some(9090)), 9090);
    }
}
