use axum::{
    Router,
    extract::{
        Json, Query,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

use crate::core::{
    ErrorClass, PlanInputs, TaxInputs, ValidationError, run_income_tax, run_plan,
    run_retirement_age_sweep,
};

const DEFAULT_CURRENT_INVESTMENT: f64 = 0.0;
const DEFAULT_MONTHLY_SAVING_TO_INVEST: f64 = 0.0;
const DEFAULT_INFLATION_RATE: f64 = 3.0;

/// Raw plan request. Every field is kept as an untyped JSON value so that
/// query strings and JSON numbers go through the same numeric coercion, and a
/// non-numeric field is reported by name instead of failing deserialization.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PlanPayload {
    #[serde(alias = "currentAge")]
    current_age: Option<Value>,
    #[serde(alias = "retirementAge")]
    retirement_age: Option<Value>,
    #[serde(alias = "lifeExpectancy")]
    life_expectancy: Option<Value>,
    #[serde(alias = "monthlyExpenses")]
    monthly_expenses: Option<Value>,
    #[serde(alias = "currentSavings")]
    current_savings: Option<Value>,
    #[serde(alias = "investmentReturn")]
    investment_return: Option<Value>,
    #[serde(alias = "currentInvestment")]
    current_investment: Option<Value>,
    #[serde(alias = "monthlySavingToInvest")]
    monthly_saving_to_invest: Option<Value>,
    #[serde(alias = "inflationRate")]
    inflation_rate: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TaxPayload {
    #[serde(alias = "monthlyIncome")]
    monthly_income: Option<Value>,
    #[serde(alias = "usePersonalAllowance")]
    use_personal_allowance: Option<Value>,
    #[serde(alias = "useSpouseAllowance")]
    use_spouse_allowance: Option<Value>,
    #[serde(alias = "numChildren")]
    num_children: Option<Value>,
    #[serde(alias = "insurancePremium")]
    insurance_premium: Option<Value>,
    #[serde(alias = "socialSecurity")]
    social_security: Option<Value>,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
enum ErrorKind {
    Type,
    Range,
}

impl From<ErrorClass> for ErrorKind {
    fn from(value: ErrorClass) -> Self {
        match value {
            ErrorClass::Type => ErrorKind::Type,
            ErrorClass::Range => ErrorKind::Range,
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    kind: Option<ErrorKind>,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

pub fn router() -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/plan", get(plan_get_handler).post(plan_post_handler))
        .route(
            "/api/plan/sweep",
            get(sweep_get_handler).post(sweep_post_handler),
        )
        .route("/api/tax", get(tax_get_handler).post(tax_post_handler))
        .fallback(not_found_handler)
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    info!("nestplan HTTP API listening on http://{addr}");
    info!("Local access: http://127.0.0.1:{port}/health");

    axum::serve(listener, router()).await
}

async fn health_handler() -> Response {
    json_response(StatusCode::OK, HealthResponse { status: "ok" })
}

async fn not_found_handler() -> Response {
    json_response(
        StatusCode::NOT_FOUND,
        ErrorResponse {
            error: "Not found".to_string(),
            kind: None,
        },
    )
}

async fn plan_get_handler(payload: Result<Query<PlanPayload>, QueryRejection>) -> Response {
    match payload {
        Ok(Query(payload)) => plan_handler_impl(payload),
        Err(rejection) => rejection_response(rejection.status(), rejection.body_text()),
    }
}

async fn plan_post_handler(payload: Result<Json<PlanPayload>, JsonRejection>) -> Response {
    match payload {
        Ok(Json(payload)) => plan_handler_impl(payload),
        Err(rejection) => rejection_response(rejection.status(), rejection.body_text()),
    }
}

async fn sweep_get_handler(payload: Result<Query<PlanPayload>, QueryRejection>) -> Response {
    match payload {
        Ok(Query(payload)) => sweep_handler_impl(payload),
        Err(rejection) => rejection_response(rejection.status(), rejection.body_text()),
    }
}

async fn sweep_post_handler(payload: Result<Json<PlanPayload>, JsonRejection>) -> Response {
    match payload {
        Ok(Json(payload)) => sweep_handler_impl(payload),
        Err(rejection) => rejection_response(rejection.status(), rejection.body_text()),
    }
}

async fn tax_get_handler(payload: Result<Query<TaxPayload>, QueryRejection>) -> Response {
    match payload {
        Ok(Query(payload)) => tax_handler_impl(payload),
        Err(rejection) => rejection_response(rejection.status(), rejection.body_text()),
    }
}

async fn tax_post_handler(payload: Result<Json<TaxPayload>, JsonRejection>) -> Response {
    match payload {
        Ok(Json(payload)) => tax_handler_impl(payload),
        Err(rejection) => rejection_response(rejection.status(), rejection.body_text()),
    }
}

fn plan_handler_impl(payload: PlanPayload) -> Response {
    let result = plan_inputs_from_payload(payload).and_then(|inputs| run_plan(&inputs));
    match result {
        Ok(plan) => {
            info!(status = plan.status.as_str(), "retirement plan computed");
            debug!(?plan, "retirement plan result");
            json_response(StatusCode::OK, plan)
        }
        Err(err) => validation_error_response(&err),
    }
}

fn sweep_handler_impl(payload: PlanPayload) -> Response {
    let result =
        plan_inputs_from_payload(payload).and_then(|inputs| run_retirement_age_sweep(&inputs));
    match result {
        Ok(sweep) => {
            info!(
                candidates = sweep.rows.len(),
                earliest_achievable_age = ?sweep.earliest_achievable_age,
                "retirement age sweep computed"
            );
            json_response(StatusCode::OK, sweep)
        }
        Err(err) => validation_error_response(&err),
    }
}

fn tax_handler_impl(payload: TaxPayload) -> Response {
    let result = tax_inputs_from_payload(payload).and_then(|inputs| run_income_tax(&inputs));
    match result {
        Ok(tax) => {
            info!(tax_to_pay = tax.tax_to_pay, "income tax computed");
            json_response(StatusCode::OK, tax)
        }
        Err(err) => validation_error_response(&err),
    }
}

fn validation_error_response(err: &ValidationError) -> Response {
    warn!(error = %err, "rejected request");
    json_response(
        StatusCode::BAD_REQUEST,
        ErrorResponse {
            error: err.to_string(),
            kind: Some(err.class().into()),
        },
    )
}

/// Bodies or query strings the extractor could not read at all. Field-level
/// type problems never reach here because every field is an untyped value.
fn rejection_response(status: StatusCode, message: String) -> Response {
    warn!(%status, error = %message, "unreadable request");
    json_response(
        status,
        ErrorResponse {
            error: message,
            kind: Some(ErrorKind::Type),
        },
    )
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}

fn plan_inputs_from_payload(payload: PlanPayload) -> Result<PlanInputs, ValidationError> {
    // Types are settled here; the engine only ever sees finite numbers.
    let current_age = required(
        "current_age",
        age_field("current_age", payload.current_age.as_ref())?,
    )?;
    let retirement_age = required(
        "retirement_age",
        age_field("retirement_age", payload.retirement_age.as_ref())?,
    )?;
    let life_expectancy = required(
        "life_expectancy",
        age_field("life_expectancy", payload.life_expectancy.as_ref())?,
    )?;
    let monthly_expenses = required(
        "monthly_expenses",
        number_field("monthly_expenses", payload.monthly_expenses.as_ref())?,
    )?;
    let current_savings = required(
        "current_savings",
        number_field("current_savings", payload.current_savings.as_ref())?,
    )?;
    let investment_return = required(
        "investment_return",
        number_field("investment_return", payload.investment_return.as_ref())?,
    )?;
    let current_investment =
        number_field("current_investment", payload.current_investment.as_ref())?
            .unwrap_or(DEFAULT_CURRENT_INVESTMENT);
    let monthly_saving_to_invest = number_field(
        "monthly_saving_to_invest",
        payload.monthly_saving_to_invest.as_ref(),
    )?
    .unwrap_or(DEFAULT_MONTHLY_SAVING_TO_INVEST);
    let inflation_rate = number_field("inflation_rate", payload.inflation_rate.as_ref())?
        .unwrap_or(DEFAULT_INFLATION_RATE);

    Ok(PlanInputs {
        current_age,
        retirement_age,
        life_expectancy,
        monthly_expenses,
        current_savings,
        current_investment,
        monthly_saving_to_invest,
        investment_return,
        inflation_rate,
    })
}

fn tax_inputs_from_payload(payload: TaxPayload) -> Result<TaxInputs, ValidationError> {
    Ok(TaxInputs {
        monthly_income: number_field("monthly_income", payload.monthly_income.as_ref())?
            .unwrap_or(0.0),
        use_personal_allowance: flag_field(payload.use_personal_allowance.as_ref()),
        use_spouse_allowance: flag_field(payload.use_spouse_allowance.as_ref()),
        num_children: count_field("num_children", payload.num_children.as_ref())?
            .unwrap_or(0),
        insurance_premium: number_field("insurance_premium", payload.insurance_premium.as_ref())?
            .unwrap_or(0.0),
        social_security: number_field("social_security", payload.social_security.as_ref())?
            .unwrap_or(0.0),
    })
}

fn required<T>(field: &'static str, value: Option<T>) -> Result<T, ValidationError> {
    value.ok_or(ValidationError::Missing { field })
}

/// JSON numbers and numeric strings both count; an empty string or `null`
/// is treated as absent.
fn number_field(field: &'static str, value: Option<&Value>) -> Result<Option<f64>, ValidationError> {
    let parsed = match value {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) if s.trim().is_empty() => return Ok(None),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(_) => None,
    };
    match parsed {
        Some(v) if v.is_finite() => Ok(Some(v)),
        _ => Err(ValidationError::NotNumeric { field }),
    }
}

/// Ages only have to be whole here; negative or implausible ages are left
/// for the plan validator to reject as ordering errors.
fn age_field(field: &'static str, value: Option<&Value>) -> Result<Option<i32>, ValidationError> {
    let Some(v) = number_field(field, value)? else {
        return Ok(None);
    };
    if v.fract() != 0.0 {
        return Err(ValidationError::NotWholeNumber { field });
    }
    // `as` saturates, and anything near i32's bounds fails validation anyway.
    Ok(Some(v as i32))
}

fn count_field(field: &'static str, value: Option<&Value>) -> Result<Option<u32>, ValidationError> {
    let Some(v) = number_field(field, value)? else {
        return Ok(None);
    };
    if v.fract() != 0.0 {
        return Err(ValidationError::NotWholeNumber { field });
    }
    if v < 0.0 {
        return Err(ValidationError::Negative { field, value: v });
    }
    Ok(Some(v as u32))
}

/// Only an explicit true switches an allowance on.
fn flag_field(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => s.trim().eq_ignore_ascii_case("true"),
        _ => false,
    }
}
