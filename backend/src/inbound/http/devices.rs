//! Device registry endpoints.
//!
//! ```text
//! GET  /api/v1/devices?department=ICU
//! POST /api/v1/devices
//! GET  /api/v1/devices/departments
//! GET  /api/v1/devices/form-defaults
//! GET  /api/v1/devices/{id}
//! GET  /api/v1/devices/{id}/history
//! POST /api/v1/devices/{id}/completions
//! ```

use actix_web::{HttpResponse, get, post, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::CompletionRequest;
use crate::domain::{
    DepartmentFilter, Device, DeviceFormDefaults, DeviceId, Error, HistoryEntry, NewDevice,
    RecordedCompletion,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Optional department narrowing shared by listing endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct DepartmentQuery {
    pub department: Option<String>,
}

impl DepartmentQuery {
    pub(crate) fn filter(&self) -> DepartmentFilter {
        DepartmentFilter::from_query(self.department.as_deref())
    }
}

/// Request payload confirming a completed calibration or maintenance.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompletionRequestBody {
    /// Date the work was performed; defaults to today.
    #[schema(example = "2026-06-15")]
    pub completed_on: Option<NaiveDate>,
    pub note: Option<String>,
}

/// List registered devices, optionally narrowed to one department.
#[utoipa::path(
    get,
    path = "/api/v1/devices",
    params(
        ("department" = Option<String>, Query, description = "Department name, or `all`")
    ),
    responses(
        (status = 200, description = "Devices in insertion order", body = [Device]),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["devices"],
    operation_id = "listDevices"
)]
#[get("/devices")]
pub async fn list_devices(
    state: web::Data<HttpState>,
    query: web::Query<DepartmentQuery>,
) -> ApiResult<web::Json<Vec<Device>>> {
    let devices = state.devices_query.list_devices(&query.filter()).await?;
    Ok(web::Json(devices))
}

/// Register a new device.
#[utoipa::path(
    post,
    path = "/api/v1/devices",
    request_body = NewDevice,
    responses(
        (status = 201, description = "Device registered"),
        (status = 400, description = "Invalid request", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["devices"],
    operation_id = "createDevice"
)]
#[post("/devices")]
pub async fn create_device(
    state: web::Data<HttpState>,
    payload: web::Json<NewDevice>,
) -> ApiResult<HttpResponse> {
    state.devices.create_device(payload.into_inner()).await?;
    Ok(HttpResponse::Created().finish())
}

/// Distinct departments for the filter selector.
#[utoipa::path(
    get,
    path = "/api/v1/devices/departments",
    responses(
        (status = 200, description = "Departments in first-seen order", body = [String]),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["devices"],
    operation_id = "listDepartments"
)]
#[get("/devices/departments")]
pub async fn list_departments(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<String>>> {
    let departments = state.devices_query.departments().await?;
    Ok(web::Json(departments))
}

/// Defaults offered by the device creation form.
#[utoipa::path(
    get,
    path = "/api/v1/devices/form-defaults",
    responses(
        (status = 200, description = "Form defaults", body = DeviceFormDefaults)
    ),
    tags = ["devices"],
    operation_id = "deviceFormDefaults"
)]
#[get("/devices/form-defaults")]
pub async fn form_defaults() -> web::Json<DeviceFormDefaults> {
    web::Json(DeviceFormDefaults::default())
}

/// Fetch one device.
#[utoipa::path(
    get,
    path = "/api/v1/devices/{id}",
    params(("id" = i64, Path, description = "Device identifier")),
    responses(
        (status = 200, description = "Device", body = Device),
        (status = 404, description = "Unknown device", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["devices"],
    operation_id = "getDevice"
)]
#[get("/devices/{id}")]
pub async fn get_device(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<Device>> {
    let device = state
        .devices_query
        .find_device(DeviceId::new(path.into_inner()))
        .await?;
    Ok(web::Json(device))
}

/// History of one device, oldest first.
#[utoipa::path(
    get,
    path = "/api/v1/devices/{id}/history",
    params(("id" = i64, Path, description = "Device identifier")),
    responses(
        (status = 200, description = "History entries", body = [HistoryEntry]),
        (status = 404, description = "Unknown device", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["devices"],
    operation_id = "getDeviceHistory"
)]
#[get("/devices/{id}/history")]
pub async fn device_history(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<Vec<HistoryEntry>>> {
    let history = state
        .devices_query
        .history(DeviceId::new(path.into_inner()))
        .await?;
    Ok(web::Json(history))
}

/// Record a completed calibration, rolling the due date forward.
#[utoipa::path(
    post,
    path = "/api/v1/devices/{id}/completions",
    params(("id" = i64, Path, description = "Device identifier")),
    request_body = CompletionRequestBody,
    responses(
        (status = 200, description = "Updated device and new history entry", body = RecordedCompletion),
        (status = 404, description = "Unknown device", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["devices"],
    operation_id = "recordCompletion"
)]
#[post("/devices/{id}/completions")]
pub async fn record_completion(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
    payload: web::Json<CompletionRequestBody>,
) -> ApiResult<web::Json<RecordedCompletion>> {
    let CompletionRequestBody { completed_on, note } = payload.into_inner();
    let recorded = state
        .devices
        .record_completion(CompletionRequest {
            device_id: DeviceId::new(path.into_inner()),
            completed_on,
            note: note.unwrap_or_default(),
        })
        .await?;
    Ok(web::Json(recorded))
}

#[cfg(test)]
#[path = "devices_tests.rs"]
mod tests;
