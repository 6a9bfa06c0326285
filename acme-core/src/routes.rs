use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    middleware,
    response::{IntoResponse, Json, Redirect, Response},
    routing::{get, post},
    Extension, Form, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use uuid::Uuid;

use crate::actions::{ActionOutcome, FormState};
use crate::auth::{require_session, Credentials, CurrentUser, LoginOutcome};
use crate::data;
use crate::error::AppError;
use crate::format::{format_currency, format_date_to_local};
use crate::labels::{generate_pagination, RevenueChart};
use crate::models::customer::CustomersTableRow;
use crate::models::invoice::{InvoicesTableRow, LatestInvoice};
use crate::revalidate::{invoice_edit_path, INVOICES_PATH};
use crate::state::AppState;
use crate::validation::RawInvoiceForm;

/// Height in pixels of the revenue chart.
pub const CHART_HEIGHT: f64 = 350.0;

/// Creates the main application router.
///
/// Everything under `/dashboard` requires a session token.
pub fn create_router(state: AppState) -> Router {
    let dashboard = Router::new()
        .route("/", get(overview))
        .route("/revenue", get(revenue_chart))
        .route("/invoices", get(list_invoices).post(create_invoice))
        .route("/invoices/:id/edit", get(edit_invoice).post(update_invoice))
        .route("/invoices/:id/delete", post(delete_invoice))
        .route("/customers", get(list_customers))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_session));

    Router::new()
        // Public routes
        .route("/health", get(health_check))
        .route("/health/db", get(db_health_check))
        .route("/login", post(login))
        .nest("/dashboard", dashboard)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "service": "acme-core",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Database health check endpoint.
///
/// Verifies that the database connection is working by executing
/// a simple query.
async fn db_health_check(State(state): State<AppState>) -> Result<Json<serde_json::Value>, StatusCode> {
    sqlx::query("SELECT 1")
        .execute(&state.db)
        .await
        .map_err(|e| {
            error!("Database health check failed: {}", e);
            StatusCode::SERVICE_UNAVAILABLE
        })?;

    Ok(Json(json!({
        "status": "ok",
        "database": "connected"
    })))
}

async fn login(
    State(state): State<AppState>,
    Form(credentials): Form<Credentials>,
) -> Result<Response, AppError> {
    let response = match state.auth.authenticate(&credentials).await? {
        LoginOutcome::SignedIn { token } => Json(json!({ "token": token })).into_response(),
        LoginOutcome::Rejected(message) => {
            (StatusCode::UNAUTHORIZED, Json(json!({ "message": message }))).into_response()
        }
    };
    Ok(response)
}

async fn create_invoice(
    State(state): State<AppState>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    Form(form): Form<RawInvoiceForm>,
) -> Response {
    info!("User {} submitted a new invoice", user_id);
    let outcome = state.actions.create_invoice(FormState::default(), form).await;
    action_response(outcome)
}

async fn update_invoice(
    State(state): State<AppState>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Form(form): Form<RawInvoiceForm>,
) -> Response {
    info!("User {} submitted changes to invoice {}", user_id, id);
    let outcome = state
        .actions
        .update_invoice(id, FormState::default(), form)
        .await;
    action_response(outcome)
}

async fn delete_invoice(
    State(state): State<AppState>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    info!("User {} deleting invoice {}", user_id, id);
    state
        .actions
        .delete_invoice(id)
        .await
        .map_err(|e| AppError::Internal(e.into()))?;
    Ok(StatusCode::NO_CONTENT)
}

/// Turns an action outcome into the navigation or the re-rendered form state.
fn action_response(outcome: ActionOutcome) -> Response {
    match outcome {
        ActionOutcome::Redirect(path) => Redirect::to(&path).into_response(),
        ActionOutcome::Failure(form_state) => {
            let status = if form_state.has_field_errors() {
                StatusCode::UNPROCESSABLE_ENTITY
            } else {
                StatusCode::INTERNAL_SERVER_ERROR
            };
            (status, Json(form_state)).into_response()
        }
    }
}

#[derive(Debug, Deserialize)]
struct ListParams {
    query: Option<String>,
    page: Option<String>,
}

/// Reads the 1-based page number; missing, empty, non-numeric or zero
/// values fall back to the first page.
fn page_param(raw: Option<&str>) -> u32 {
    raw.and_then(|page| page.trim().parse::<u32>().ok())
        .filter(|page| *page > 0)
        .unwrap_or(1)
}

#[derive(Serialize)]
struct InvoiceListItem {
    #[serde(flatten)]
    row: InvoicesTableRow,
    amount_display: String,
    date_display: String,
}

impl From<InvoicesTableRow> for InvoiceListItem {
    fn from(row: InvoicesTableRow) -> Self {
        Self {
            amount_display: format_currency(row.amount),
            date_display: format_date_to_local(row.date),
            row,
        }
    }
}

async fn list_invoices(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Response, AppError> {
    let query = params.query.unwrap_or_default();
    let current_page = page_param(params.page.as_deref());

    let total_pages = data::fetch_invoices_pages(&state.db, &query).await?;
    let invoices: Vec<InvoiceListItem> = data::fetch_filtered_invoices(&state.db, &query, current_page)
        .await?
        .into_iter()
        .map(InvoiceListItem::from)
        .collect();
    let generation = state.views.generation(INVOICES_PATH).await;

    let body = json!({
        "invoices": invoices,
        "current_page": current_page,
        "total_pages": total_pages,
        "pagination": generate_pagination(current_page, total_pages),
    });
    Ok(([(header::ETAG, etag(generation))], Json(body)).into_response())
}

async fn edit_invoice(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let invoice = data::fetch_invoice_by_id(&state.db, id)
        .await?
        .ok_or(AppError::NotFound)?;
    let customers = data::fetch_customers(&state.db).await?;
    let generation = state.views.generation(&invoice_edit_path(id)).await;

    let body = json!({
        "invoice": invoice,
        "customers": customers,
    });
    Ok(([(header::ETAG, etag(generation))], Json(body)).into_response())
}

#[derive(Serialize)]
struct LatestInvoiceItem {
    #[serde(flatten)]
    invoice: LatestInvoice,
    amount_display: String,
}

async fn overview(State(state): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    let cards = data::fetch_card_data(&state.db).await?;
    let latest: Vec<LatestInvoiceItem> = data::fetch_latest_invoices(&state.db)
        .await?
        .into_iter()
        .map(|invoice| LatestInvoiceItem {
            amount_display: format_currency(invoice.amount),
            invoice,
        })
        .collect();

    Ok(Json(json!({
        "cards": {
            "number_of_customers": cards.number_of_customers,
            "number_of_invoices": cards.number_of_invoices,
            "total_paid_invoices": format_currency(cards.total_paid_invoices),
            "total_pending_invoices": format_currency(cards.total_pending_invoices),
        },
        "latest_invoices": latest,
    })))
}

async fn revenue_chart(State(state): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    let revenue = data::fetch_revenue(&state.db).await?;

    let body = match RevenueChart::build(&revenue, CHART_HEIGHT) {
        Some(chart) => json!({ "chart": chart }),
        None => json!({ "chart": null, "message": "No data available." }),
    };
    Ok(Json(body))
}

#[derive(Serialize)]
struct CustomerListItem {
    #[serde(flatten)]
    customer: CustomersTableRow,
    total_pending_display: String,
    total_paid_display: String,
}

async fn list_customers(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<serde_json::Value>, AppError> {
    let query = params.query.unwrap_or_default();
    let customers: Vec<CustomerListItem> = data::fetch_filtered_customers(&state.db, &query)
        .await?
        .into_iter()
        .map(|customer| CustomerListItem {
            total_pending_display: format_currency(customer.total_pending),
            total_paid_display: format_currency(customer.total_paid),
            customer,
        })
        .collect();

    Ok(Json(json!({ "customers": customers })))
}

fn etag(generation: u64) -> String {
    format!("\"{}\"", generation)
}
