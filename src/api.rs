// HRMS Lite - HTTP API
// REST surface over the storage adapter and the reporting engines (axum)

use crate::clock::Clock;
use crate::config::AppConfig;
use crate::db;
use crate::error::ReportError;
use crate::export::{build_export_rows, export_as, render_html_report, ExportFilter, ExportFormat};
use crate::identifier::{generate_employee_id, SuffixParsing};
use crate::models::{
    AttendanceEntry, AttendanceRecord, AttendanceStatus, Department, Employee, NewAttendance, NewEmployee,
};
use crate::report::{generate_employee_report, EmployeeReport};
use crate::search::{search_with_filters, SearchQuery, DEFAULT_SEARCH_LIMIT};
use crate::stats::{
    calculate_attendance_stats, dashboard_stats, get_department_summary, AttendanceStats, DashboardStats,
    DepartmentSummary,
};
use crate::throttle::{RateDecision, RateLimiter, TtlCache};
use crate::trend::{get_attendance_trends, TrendReport, DEFAULT_TREND_WINDOW};
use crate::validation::{validate_attendance_data, validate_employee_data, RawFields};
use crate::window::{get_monthly_attendance, DateRange};

use axum::{
    body::{Body, Bytes},
    extract::{ConnectInfo, Path, Query, Request, State},
    http::{header, HeaderValue, Method, StatusCode},
    middleware::{self, Next},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;
use thiserror::Error;
use tower_http::cors::CorsLayer;
use tracing::{error, info, warn};
use uuid::Uuid;

// ============================================================================
// STATE
// ============================================================================

#[derive(Debug, Clone)]
pub struct CachedResponse {
    status: StatusCode,
    content_type: Option<HeaderValue>,
    body: Bytes,
}

/// Shared application state. Cache and limiter live here, one per process.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Mutex<Connection>>,
    pub clock: Arc<dyn Clock>,
    pub config: Arc<AppConfig>,
    pub cache: Arc<Mutex<TtlCache<String, CachedResponse>>>,
    pub limiter: Arc<Mutex<RateLimiter>>,
}

impl AppState {
    pub fn new(conn: Connection, config: AppConfig, clock: Arc<dyn Clock>) -> Self {
        let cache = TtlCache::new(config.cache_ttl());
        let limiter = RateLimiter::new(config.rate_limit, config.rate_limit_period());

        AppState {
            db: Arc::new(Mutex::new(conn)),
            clock,
            config: Arc::new(config),
            cache: Arc::new(Mutex::new(cache)),
            limiter: Arc::new(Mutex::new(limiter)),
        }
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, ApiError> {
        self.db.lock().map_err(|_| ApiError::LockPoisoned)
    }
}

// ============================================================================
// RESPONSES & ERRORS
// ============================================================================

/// API Response wrapper
#[derive(Serialize)]
pub struct ApiResponse<T> {
    success: bool,
    data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            error: None,
        }
    }
}

type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<String>,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{0}")]
    BadRequest(String),
    #[error("Validation failed")]
    Validation(Vec<String>),
    #[error(transparent)]
    Report(#[from] ReportError),
    #[error("Storage error: {0:#}")]
    Storage(#[from] anyhow::Error),
    #[error("Failed to acquire lock")]
    LockPoisoned,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Report(ReportError::UnsupportedFormat(_))
            | ApiError::Report(ReportError::InvalidRange(_)) => StatusCode::BAD_REQUEST,
            ApiError::Report(_) | ApiError::Storage(_) | ApiError::LockPoisoned => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        if status.is_server_error() {
            error!("Error occurred: {}", self);
        }

        let body = ErrorBody {
            success: false,
            error: if status.is_server_error() {
                "Internal server error".to_string()
            } else {
                self.to_string()
            },
            errors: match self {
                ApiError::Validation(errors) => errors,
                _ => Vec::new(),
            },
        };

        (status, Json(body)).into_response()
    }
}

// ============================================================================
// HELPERS
// ============================================================================

fn entries_of(records: &[AttendanceRecord]) -> Vec<AttendanceEntry> {
    records.iter().map(AttendanceEntry::from).collect()
}

fn require_employee(conn: &Connection, id: i64) -> Result<Employee, ApiError> {
    db::get_employee(conn, id)?.ok_or(ApiError::NotFound("Employee"))
}

// ============================================================================
// CORE HANDLERS
// ============================================================================

#[derive(Serialize)]
struct Message {
    message: String,
}

/// GET / - Service banner
async fn home() -> impl IntoResponse {
    Json(ApiResponse::ok(Message {
        message: "HRMS API is running".to_string(),
    }))
}

/// GET /health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("healthy"))
}

/// POST /employees - Validate and create an employee
async fn create_employee(
    State(state): State<AppState>,
    Json(fields): Json<RawFields>,
) -> ApiResult<Employee> {
    let outcome = validate_employee_data(&fields);
    if !outcome.is_valid {
        return Err(ApiError::Validation(outcome.errors));
    }

    let new_employee: NewEmployee = outcome
        .cleaned_as()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let conn = state.conn()?;
    if db::employee_id_exists(&conn, &new_employee.employee_id)? {
        return Err(ApiError::BadRequest("Employee ID already exists".to_string()));
    }
    if db::email_exists(&conn, &new_employee.email)? {
        return Err(ApiError::BadRequest("Email already exists".to_string()));
    }

    let employee = db::insert_employee(&conn, &new_employee)?;
    Ok(Json(ApiResponse::ok(employee)))
}

/// GET /employees - All employees
async fn list_employees(State(state): State<AppState>) -> ApiResult<Vec<Employee>> {
    let conn = state.conn()?;
    Ok(Json(ApiResponse::ok(db::get_all_employees(&conn)?)))
}

#[derive(Serialize)]
struct EmployeeWithAttendance {
    #[serde(flatten)]
    employee: Employee,
    attendances: Vec<AttendanceRecord>,
}

/// GET /employees/:id - One employee with attendance history
async fn get_employee(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<EmployeeWithAttendance> {
    let conn = state.conn()?;
    let employee = require_employee(&conn, id)?;
    let attendances = db::get_attendance_for_employee(&conn, id)?;

    Ok(Json(ApiResponse::ok(EmployeeWithAttendance {
        employee,
        attendances,
    })))
}

/// DELETE /employees/:id - Delete employee and attendance
async fn delete_employee(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Message> {
    let conn = state.conn()?;
    if !db::delete_employee(&conn, id)? {
        return Err(ApiError::NotFound("Employee"));
    }

    Ok(Json(ApiResponse::ok(Message {
        message: "Employee deleted successfully".to_string(),
    })))
}

/// POST /attendance - Validate and record one attendance mark
async fn mark_attendance(
    State(state): State<AppState>,
    Json(fields): Json<RawFields>,
) -> ApiResult<AttendanceRecord> {
    let outcome = validate_attendance_data(&fields, state.clock.as_ref());
    if !outcome.is_valid {
        return Err(ApiError::Validation(outcome.errors));
    }

    let mark: NewAttendance = outcome
        .cleaned_as()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let conn = state.conn()?;
    require_employee(&conn, mark.employee_id)?;
    if db::attendance_exists(&conn, mark.employee_id, mark.date)? {
        return Err(ApiError::BadRequest("Attendance already marked".to_string()));
    }

    Ok(Json(ApiResponse::ok(db::insert_attendance(&conn, &mark)?)))
}

/// GET /attendance - All attendance records
async fn list_attendance(State(state): State<AppState>) -> ApiResult<Vec<AttendanceRecord>> {
    let conn = state.conn()?;
    Ok(Json(ApiResponse::ok(db::get_all_attendance(&conn)?)))
}

/// GET /attendance/employee/:id - Attendance of one employee
async fn employee_attendance(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Vec<AttendanceRecord>> {
    let conn = state.conn()?;
    require_employee(&conn, id)?;
    Ok(Json(ApiResponse::ok(db::get_attendance_for_employee(&conn, id)?)))
}

// ============================================================================
// EXTENDED HANDLERS (/api/v2)
// ============================================================================

#[derive(Deserialize)]
struct GenerateIdParams {
    department: String,
}

#[derive(Serialize)]
struct GeneratedId {
    employee_id: String,
    department: String,
    status: &'static str,
}

/// POST /api/v2/employees/generate-id?department= - Next free employee code
async fn generate_id(
    State(state): State<AppState>,
    Query(params): Query<GenerateIdParams>,
) -> ApiResult<GeneratedId> {
    let conn = state.conn()?;
    let codes: Vec<String> = db::get_all_employees(&conn)?
        .into_iter()
        .map(|e| e.employee_id)
        .collect();

    let employee_id = generate_employee_id(Some(params.department.as_str()), &codes, SuffixParsing::default());

    Ok(Json(ApiResponse::ok(GeneratedId {
        employee_id,
        department: params.department,
        status: "generated",
    })))
}

#[derive(Deserialize)]
struct SearchParams {
    #[serde(default)]
    query: String,
    department: Option<String>,
    limit: Option<usize>,
}

#[derive(Serialize)]
struct SearchResults {
    query: String,
    department: Option<String>,
    results: Vec<Employee>,
    total: usize,
}

/// GET /api/v2/employees/search - Search by code, name, email or department
async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> ApiResult<SearchResults> {
    let conn = state.conn()?;
    let employees = db::get_all_employees(&conn)?;

    let query = SearchQuery {
        text: params.query,
        department: params.department,
        limit: params.limit.unwrap_or(DEFAULT_SEARCH_LIMIT),
    };
    let results = search_with_filters(&employees, &query);

    Ok(Json(ApiResponse::ok(SearchResults {
        total: results.len(),
        query: query.text,
        department: query.department,
        results,
    })))
}

#[derive(Serialize)]
struct EmployeeStats {
    employee: Employee,
    statistics: AttendanceStats,
}

/// GET /api/v2/employees/:id/stats - Attendance statistics
async fn employee_stats(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<EmployeeStats> {
    let conn = state.conn()?;
    let employee = require_employee(&conn, id)?;
    let entries = entries_of(&db::get_attendance_for_employee(&conn, id)?);

    Ok(Json(ApiResponse::ok(EmployeeStats {
        employee,
        statistics: calculate_attendance_stats(&entries),
    })))
}

/// GET /api/v2/employees/:id/report - Full employee report
async fn employee_report(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<EmployeeReport> {
    let conn = state.conn()?;
    let employee = require_employee(&conn, id)?;
    let entries = entries_of(&db::get_attendance_for_employee(&conn, id)?);

    let report = generate_employee_report(&employee, &entries, state.clock.as_ref())?;
    Ok(Json(ApiResponse::ok(report)))
}

#[derive(Deserialize)]
struct TrendParams {
    days: Option<usize>,
}

/// GET /api/v2/employees/:id/trend?days= - Recent attendance trend
async fn employee_trend(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(params): Query<TrendParams>,
) -> ApiResult<TrendReport> {
    let conn = state.conn()?;
    require_employee(&conn, id)?;
    let entries = entries_of(&db::get_attendance_for_employee(&conn, id)?);

    let days = params.days.unwrap_or(DEFAULT_TREND_WINDOW);
    Ok(Json(ApiResponse::ok(get_attendance_trends(&entries, days))))
}

#[derive(Serialize)]
struct DepartmentStats {
    summary: BTreeMap<Department, DepartmentSummary>,
    generated_at: NaiveDateTime,
}

/// GET /api/v2/departments/stats - Per-department roll-up
async fn department_stats(State(state): State<AppState>) -> ApiResult<DepartmentStats> {
    let conn = state.conn()?;
    let employees = db::get_all_employees(&conn)?;
    let entries = entries_of(&db::get_all_attendance(&conn)?);

    Ok(Json(ApiResponse::ok(DepartmentStats {
        summary: get_department_summary(&employees, &entries),
        generated_at: state.clock.now(),
    })))
}

#[derive(Deserialize)]
struct MonthlyParams {
    year: i32,
    month: u32,
    employee_id: Option<i64>,
}

#[derive(Serialize)]
struct MonthlyRow {
    #[serde(flatten)]
    entry: AttendanceEntry,
    employee_name: String,
}

#[derive(Serialize)]
struct MonthlyAttendance {
    year: i32,
    month: u32,
    attendance_records: Vec<MonthlyRow>,
    total_records: usize,
}

/// GET /api/v2/attendance/monthly?year=&month=&employee_id= - One calendar month
async fn monthly_attendance(
    State(state): State<AppState>,
    Query(params): Query<MonthlyParams>,
) -> ApiResult<MonthlyAttendance> {
    if !(1..=12).contains(&params.month) {
        return Err(ApiError::BadRequest("Month must be between 1 and 12".to_string()));
    }

    let conn = state.conn()?;
    let records = match params.employee_id {
        Some(id) => db::get_attendance_for_employee(&conn, id)?,
        None => db::get_all_attendance(&conn)?,
    };
    let employees = db::get_all_employees(&conn)?;

    let month = get_monthly_attendance(&entries_of(&records), params.year, params.month)?;
    let attendance_records: Vec<MonthlyRow> = month
        .into_iter()
        .map(|entry| {
            let employee_name = employees
                .iter()
                .find(|e| e.id == entry.employee_id)
                .map_or_else(|| "Unknown".to_string(), |e| e.full_name.clone());
            MonthlyRow {
                entry,
                employee_name,
            }
        })
        .collect();

    Ok(Json(ApiResponse::ok(MonthlyAttendance {
        year: params.year,
        month: params.month,
        total_records: attendance_records.len(),
        attendance_records,
    })))
}

#[derive(Deserialize)]
struct BulkAttendanceRequest {
    employee_ids: Vec<i64>,
    date: NaiveDate,
    status: String,
}

#[derive(Serialize)]
struct BulkAttendanceResult {
    date: NaiveDate,
    status: AttendanceStatus,
    marked_employees: usize,
    results: Vec<AttendanceRecord>,
}

/// POST /api/v2/attendance/bulk - Same mark for many employees, all or nothing
async fn bulk_attendance(
    State(state): State<AppState>,
    Json(request): Json<BulkAttendanceRequest>,
) -> ApiResult<BulkAttendanceResult> {
    let status = AttendanceStatus::from_name(request.status.trim()).ok_or_else(|| {
        ApiError::BadRequest("Status must be either \"Present\" or \"Absent\"".to_string())
    })?;
    if request.date > state.clock.today() {
        return Err(ApiError::BadRequest("Date cannot be in the future".to_string()));
    }

    let mut conn = state.conn()?;
    let outcome = db::mark_bulk_attendance(&mut conn, &request.employee_ids, request.date, status)?;
    if !outcome.errors.is_empty() {
        return Err(ApiError::Validation(outcome.errors));
    }

    Ok(Json(ApiResponse::ok(BulkAttendanceResult {
        date: request.date,
        status,
        marked_employees: outcome.marked.len(),
        results: outcome.marked,
    })))
}

#[derive(Deserialize)]
struct AttendanceReportRequest {
    #[serde(default = "default_export_format")]
    format: String,
    employee_id: Option<i64>,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
}

fn default_export_format() -> String {
    "csv".to_string()
}

impl AttendanceReportRequest {
    fn filter(&self) -> Result<ExportFilter, ApiError> {
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            DateRange::new(start, end)?;
        }

        Ok(ExportFilter {
            employee_id: self.employee_id,
            start_date: self.start_date,
            end_date: self.end_date,
        })
    }
}

#[derive(Serialize)]
struct ExportedReport {
    format: ExportFormat,
    records_count: usize,
    data: String,
    exported_at: NaiveDateTime,
}

/// POST /api/v2/reports/attendance - CSV or JSON export
async fn export_attendance(
    State(state): State<AppState>,
    Json(request): Json<AttendanceReportRequest>,
) -> ApiResult<ExportedReport> {
    let format: ExportFormat = request.format.parse()?;
    let filter = request.filter()?;

    let conn = state.conn()?;
    let rows = build_export_rows(
        &db::get_all_employees(&conn)?,
        &db::get_all_attendance(&conn)?,
        &filter,
    );

    Ok(Json(ApiResponse::ok(ExportedReport {
        format,
        records_count: rows.len(),
        data: export_as(&rows, format)?,
        exported_at: state.clock.now(),
    })))
}

/// POST /api/v2/reports/attendance/html - Printable HTML report
async fn export_attendance_html(
    State(state): State<AppState>,
    Json(request): Json<AttendanceReportRequest>,
) -> Result<Html<String>, ApiError> {
    let filter = request.filter()?;

    let conn = state.conn()?;
    let rows = build_export_rows(
        &db::get_all_employees(&conn)?,
        &db::get_all_attendance(&conn)?,
        &filter,
    );

    Ok(Html(render_html_report(&rows, state.clock.now())))
}

#[derive(Serialize)]
struct Dashboard {
    #[serde(flatten)]
    stats: DashboardStats,
    generated_at: NaiveDateTime,
}

/// GET /api/v2/dashboard/stats - Headcount and today's/this week's attendance
async fn dashboard(State(state): State<AppState>) -> ApiResult<Dashboard> {
    let conn = state.conn()?;
    let employees = db::get_all_employees(&conn)?;
    let records = db::get_all_attendance(&conn)?;

    Ok(Json(ApiResponse::ok(Dashboard {
        stats: dashboard_stats(&employees, &records, state.clock.today()),
        generated_at: state.clock.now(),
    })))
}

// ============================================================================
// MIDDLEWARE
// ============================================================================

/// Request id, timing header and one log line per request
async fn request_timing(req: Request, next: Next) -> Response {
    let started = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let request_id = Uuid::new_v4();

    let mut response = next.run(req).await;

    let elapsed = started.elapsed().as_secs_f64();
    info!(
        %request_id,
        "{} {} - Status: {} - Time: {:.4}s",
        method,
        path,
        response.status().as_u16(),
        elapsed
    );

    let headers = response.headers_mut();
    if let Ok(value) = HeaderValue::from_str(&format!("{:.6}", elapsed)) {
        headers.insert("x-process-time", value);
    }
    if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
        headers.insert("x-request-id", value);
    }

    response
}

async fn security_headers(req: Request, next: Next) -> Response {
    let mut response = next.run(req).await;
    let headers = response.headers_mut();

    headers.insert("x-content-type-options", HeaderValue::from_static("nosniff"));
    headers.insert("x-frame-options", HeaderValue::from_static("DENY"));
    headers.insert("x-xss-protection", HeaderValue::from_static("1; mode=block"));
    headers.insert(
        "referrer-policy",
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );
    headers.insert(header::SERVER, HeaderValue::from_static("HRMS-Lite"));

    response
}

async fn rate_limit(State(state): State<AppState>, req: Request, next: Next) -> Response {
    if !state.config.enable_rate_limit {
        return next.run(req).await;
    }

    let client = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    let decision = match state.limiter.lock() {
        Ok(mut limiter) => limiter.check(&client, Instant::now()),
        Err(_) => return ApiError::LockPoisoned.into_response(),
    };

    match decision {
        RateDecision::Allowed { .. } => next.run(req).await,
        RateDecision::Limited { retry_after } => {
            warn!(client = %client, "Rate limit exceeded");
            let secs = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
            let body = ErrorBody {
                success: false,
                error: "Rate limit exceeded".to_string(),
                errors: Vec::new(),
            };
            (
                StatusCode::TOO_MANY_REQUESTS,
                [(header::RETRY_AFTER, secs.to_string())],
                Json(body),
            )
                .into_response()
        }
    }
}

/// Serve repeated GETs from the TTL cache; any successful write empties it
async fn response_cache(State(state): State<AppState>, req: Request, next: Next) -> Response {
    if !state.config.enable_cache {
        return next.run(req).await;
    }

    if req.method() != Method::GET {
        let response = next.run(req).await;
        if response.status().is_success() {
            if let Ok(mut cache) = state.cache.lock() {
                cache.clear();
            }
        }
        return response;
    }

    let key = format!("GET:{}", req.uri());
    let cached = match state.cache.lock() {
        Ok(mut cache) => cache.get(&key, Instant::now()),
        Err(_) => return ApiError::LockPoisoned.into_response(),
    };

    if let Some(hit) = cached {
        info!("Cache hit for {}", key);
        let mut response = Response::new(Body::from(hit.body));
        *response.status_mut() = hit.status;
        if let Some(content_type) = hit.content_type {
            response.headers_mut().insert(header::CONTENT_TYPE, content_type);
        }
        response.headers_mut().insert("x-cache", HeaderValue::from_static("HIT"));
        return response;
    }

    let response = next.run(req).await;
    if response.status() != StatusCode::OK {
        return response;
    }

    let (mut parts, body) = response.into_parts();
    let bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(e) => {
            return ApiError::Storage(anyhow::anyhow!("failed to buffer response: {}", e))
                .into_response()
        }
    };

    if let Ok(mut cache) = state.cache.lock() {
        cache.insert(
            key,
            CachedResponse {
                status: parts.status,
                content_type: parts.headers.get(header::CONTENT_TYPE).cloned(),
                body: bytes.clone(),
            },
            Instant::now(),
        );
    }

    parts.headers.insert("x-cache", HeaderValue::from_static("MISS"));
    Response::from_parts(parts, Body::from(bytes))
}

// ============================================================================
// ROUTER
// ============================================================================

pub fn build_router(state: AppState) -> Router {
    let v2_routes = Router::new()
        .route("/employees/generate-id", post(generate_id))
        .route("/employees/search", get(search))
        .route("/employees/:id/stats", get(employee_stats))
        .route("/employees/:id/report", get(employee_report))
        .route("/employees/:id/trend", get(employee_trend))
        .route("/departments/stats", get(department_stats))
        .route("/attendance/monthly", get(monthly_attendance))
        .route("/attendance/bulk", post(bulk_attendance))
        .route("/reports/attendance", post(export_attendance))
        .route("/reports/attendance/html", post(export_attendance_html))
        .route("/dashboard/stats", get(dashboard));

    Router::new()
        .route("/", get(home))
        .route("/health", get(health_check))
        .route("/employees", get(list_employees).post(create_employee))
        .route("/employees/:id", get(get_employee).delete(delete_employee))
        .route("/attendance", get(list_attendance).post(mark_attendance))
        .route("/attendance/employee/:id", get(employee_attendance))
        .nest("/api/v2", v2_routes)
        .layer(middleware::from_fn_with_state(state.clone(), response_cache))
        .layer(middleware::from_fn_with_state(state.clone(), rate_limit))
        .layer(middleware::from_fn(security_headers))
        .layer(middleware::from_fn(request_timing))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ============================================================================
// TESTS
// ============================================================================
