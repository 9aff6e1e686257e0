use crate::errors::AppError;
use crate::models::{
    AppSettings, AppSettingsPatch, AttendancePatch, AttendanceRecord, NewAppSettings,
    NewAttendanceRecord, NewQuarterSettings, QuarterSettings, QuarterSettingsPatch,
};
use crate::progress::QuarterReport;
use crate::quarter::QuarterLabel;
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use chrono::{Local, NaiveDate};
use tracing::info;

const INVALID_ATTENDANCE: &str = "Invalid attendance data";
const INVALID_QUARTER_SETTINGS: &str = "Invalid quarter settings";
const INVALID_APP_SETTINGS: &str = "Invalid app settings";

pub async fn health() -> &'static str {
    "ok"
}

pub async fn list_attendance(State(state): State<AppState>) -> Json<Vec<AttendanceRecord>> {
    let store = state.store.lock().await;
    Json(store.attendance())
}

pub async fn attendance_by_quarter(
    State(state): State<AppState>,
    Path(quarter): Path<String>,
) -> Json<Vec<AttendanceRecord>> {
    let store = state.store.lock().await;
    Json(store.attendance_by_quarter(&quarter))
}

pub async fn attendance_by_month(
    State(state): State<AppState>,
    Path(month): Path<String>,
) -> Json<Vec<AttendanceRecord>> {
    let store = state.store.lock().await;
    Json(store.attendance_by_month(&month))
}

pub async fn attendance_on(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Result<Json<AttendanceRecord>, AppError> {
    let date = parse_date(&date)?;
    let store = state.store.lock().await;
    store
        .attendance_on(date)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::not_found("No attendance record found for this date"))
}

pub async fn create_attendance(
    State(state): State<AppState>,
    payload: Result<Json<NewAttendanceRecord>, JsonRejection>,
) -> Result<(StatusCode, Json<AttendanceRecord>), AppError> {
    let new = body(payload, INVALID_ATTENDANCE)?;
    let mut store = state.store.lock().await;
    let record = store
        .upsert_attendance(new)
        .map_err(|err| AppError::from_store(err, INVALID_ATTENDANCE))?;
    info!(date = %record.date, location = ?record.location, "attendance logged");
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn update_attendance(
    State(state): State<AppState>,
    Path(date): Path<String>,
    payload: Result<Json<AttendancePatch>, JsonRejection>,
) -> Result<Json<AttendanceRecord>, AppError> {
    let date = parse_date(&date)?;
    let patch = body(payload, INVALID_ATTENDANCE)?;
    let mut store = state.store.lock().await;
    let record = store
        .update_attendance(date, patch)
        .map_err(|err| AppError::from_store(err, INVALID_ATTENDANCE))?;
    info!(date = %record.date, location = ?record.location, "attendance updated");
    Ok(Json(record))
}

pub async fn delete_attendance(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Result<StatusCode, AppError> {
    let date = parse_date(&date)?;
    let mut store = state.store.lock().await;
    store
        .delete_attendance(date)
        .map_err(|err| AppError::from_store(err, INVALID_ATTENDANCE))?;
    info!(%date, "attendance deleted");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_quarter_settings(State(state): State<AppState>) -> Json<Vec<QuarterSettings>> {
    let store = state.store.lock().await;
    Json(store.quarter_settings())
}

pub async fn get_quarter_settings(
    State(state): State<AppState>,
    Path(quarter): Path<String>,
) -> Result<Json<QuarterSettings>, AppError> {
    let quarter = parse_quarter(&quarter, INVALID_QUARTER_SETTINGS)?;
    let store = state.store.lock().await;
    store
        .quarter_settings_for(quarter)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::not_found("Quarter settings not found"))
}

pub async fn create_quarter_settings(
    State(state): State<AppState>,
    payload: Result<Json<NewQuarterSettings>, JsonRejection>,
) -> Result<(StatusCode, Json<QuarterSettings>), AppError> {
    let new = body(payload, INVALID_QUARTER_SETTINGS)?;
    let mut store = state.store.lock().await;
    let settings = store
        .upsert_quarter_settings(new)
        .map_err(|err| AppError::from_store(err, INVALID_QUARTER_SETTINGS))?;
    info!(quarter = %settings.quarter, work_days = settings.total_work_days(), "quarter settings saved");
    Ok((StatusCode::CREATED, Json(settings)))
}

pub async fn update_quarter_settings(
    State(state): State<AppState>,
    Path(quarter): Path<String>,
    payload: Result<Json<QuarterSettingsPatch>, JsonRejection>,
) -> Result<Json<QuarterSettings>, AppError> {
    let quarter = parse_quarter(&quarter, INVALID_QUARTER_SETTINGS)?;
    let patch = body(payload, INVALID_QUARTER_SETTINGS)?;
    let mut store = state.store.lock().await;
    let settings = store
        .update_quarter_settings(quarter, patch)
        .map_err(|err| AppError::from_store(err, INVALID_QUARTER_SETTINGS))?;
    info!(quarter = %settings.quarter, work_days = settings.total_work_days(), "quarter settings updated");
    Ok(Json(settings))
}

pub async fn get_app_settings(State(state): State<AppState>) -> Result<Json<AppSettings>, AppError> {
    let store = state.store.lock().await;
    store
        .app_settings()
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::not_found("App settings not found"))
}

pub async fn create_app_settings(
    State(state): State<AppState>,
    payload: Result<Json<NewAppSettings>, JsonRejection>,
) -> Result<(StatusCode, Json<AppSettings>), AppError> {
    let new = body(payload, INVALID_APP_SETTINGS)?;
    let mut store = state.store.lock().await;
    let settings = store
        .put_app_settings(new)
        .map_err(|err| AppError::from_store(err, INVALID_APP_SETTINGS))?;
    info!(current_quarter = %settings.current_quarter, "app settings saved");
    Ok((StatusCode::CREATED, Json(settings)))
}

pub async fn update_app_settings(
    State(state): State<AppState>,
    payload: Result<Json<AppSettingsPatch>, JsonRejection>,
) -> Result<Json<AppSettings>, AppError> {
    let patch = body(payload, INVALID_APP_SETTINGS)?;
    let mut store = state.store.lock().await;
    let settings = store
        .update_app_settings(patch)
        .map_err(|err| AppError::from_store(err, INVALID_APP_SETTINGS))?;
    info!(current_quarter = %settings.current_quarter, "app settings updated");
    Ok(Json(settings))
}

pub async fn current_progress(State(state): State<AppState>) -> Json<QuarterReport> {
    let store = state.store.lock().await;
    let quarter = store.current_quarter(today());
    Json(store.report(quarter))
}

pub async fn quarter_progress(
    State(state): State<AppState>,
    Path(quarter): Path<String>,
) -> Result<Json<QuarterReport>, AppError> {
    let quarter = parse_quarter(&quarter, "Invalid quarter")?;
    let store = state.store.lock().await;
    Ok(Json(store.report(quarter)))
}

fn body<T>(payload: Result<Json<T>, JsonRejection>, invalid: &str) -> Result<T, AppError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| AppError::from_rejection(rejection, invalid))
}

fn parse_date(raw: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|err| AppError::bad_request(format!("Invalid date {raw:?}, expected YYYY-MM-DD"), err))
}

fn parse_quarter(raw: &str, invalid: &str) -> Result<QuarterLabel, AppError> {
    raw.parse().map_err(|err| AppError::bad_request(invalid, err))
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
