//! Dashboard and deadline tracker endpoints.
//!
//! Both read models are recomputed from today's date on every request.

use actix_web::{get, web};

use crate::domain::{DashboardSummary, DeadlineEntry, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::devices::DepartmentQuery;
use crate::inbound::http::state::HttpState;

/// Aggregate urgency counts and the department distribution.
#[utoipa::path(
    get,
    path = "/api/v1/dashboard",
    params(
        ("department" = Option<String>, Query, description = "Department name, or `all`")
    ),
    responses(
        (status = 200, description = "Dashboard summary", body = DashboardSummary),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["deadlines"],
    operation_id = "getDashboard"
)]
#[get("/dashboard")]
pub async fn dashboard(
    state: web::Data<HttpState>,
    query: web::Query<DepartmentQuery>,
) -> ApiResult<web::Json<DashboardSummary>> {
    let summary = state.deadlines.dashboard(&query.filter()).await?;
    Ok(web::Json(summary))
}

/// Every device with its days remaining, most urgent first.
#[utoipa::path(
    get,
    path = "/api/v1/deadlines",
    responses(
        (status = 200, description = "Deadline entries", body = [DeadlineEntry]),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["deadlines"],
    operation_id = "listDeadlines"
)]
#[get("/deadlines")]
pub async fn list_deadlines(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<DeadlineEntry>>> {
    let entries = state.deadlines.deadlines().await?;
    Ok(web::Json(entries))
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use chrono::TimeDelta;
    use rstest::rstest;
    use serde_json::{Value, json};

    use super::*;
    use crate::domain::NewDevice;
    use crate::domain::ports::DeviceRepository;
    use crate::inbound::http::test_utils::{memory_state, test_today};
    use crate::test_support::new_device;

    fn due_in(name: &str, department: &str, days: Option<i64>) -> NewDevice {
        NewDevice {
            next_due: days.map(|d| test_today() + TimeDelta::days(d)),
            ..new_device(name, department)
        }
    }

    async fn seeded_get(uri: &str) -> (StatusCode, Value) {
        let (state, repo) = memory_state(test_today());
        for device in [
            due_in("Máy thở", "ICU", Some(-1)),
            due_in("Monitor", "ICU", Some(30)),
            due_in("Bơm tiêm", "Khoa Nhi", Some(31)),
            due_in("Máy X-quang", "Chẩn đoán hình ảnh", None),
            due_in("ECG", "ICU", Some(0)),
        ] {
            repo.insert(&device).await.expect("seed");
        }
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .service(web::scope("/api/v1").service(dashboard).service(list_deadlines)),
        )
        .await;
        let res =
            actix_test::call_service(&app, actix_test::TestRequest::get().uri(uri).to_request())
                .await;
        let status = res.status();
        (status, actix_test::read_body_json(res).await)
    }

    #[rstest]
    #[actix_web::test]
    async fn dashboard_counts_every_device_once() {
        let (status, body) = seeded_get("/api/v1/dashboard").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 5);
        assert_eq!(body["overdue"], 1);
        assert_eq!(body["dueSoon"], 2);
        assert_eq!(body["safe"], 2);
        assert_eq!(body["departments"][0], json!({"department": "ICU", "count": 3}));
        assert_eq!(body["statuses"][0]["urgency"], "OVERDUE");
        assert_eq!(body["statuses"][0]["colour"], "red");
    }

    #[rstest]
    #[actix_web::test]
    async fn dashboard_narrows_to_department() {
        let (_, body) = seeded_get("/api/v1/dashboard?department=ICU").await;
        assert_eq!(body["total"], 3);
        assert_eq!(body["safe"], 0);
    }

    #[rstest]
    #[actix_web::test]
    async fn deadlines_sort_most_urgent_first_with_undated_last() {
        let (status, body) = seeded_get("/api/v1/deadlines").await;
        assert_eq!(status, StatusCode::OK);
        let order: Vec<(&str, Value, &str)> = body
            .as_array()
            .expect("array body")
            .iter()
            .map(|entry| {
                (
                    entry["device"]["name"].as_str().unwrap_or_default(),
                    entry["daysRemaining"].clone(),
                    entry["urgency"].as_str().unwrap_or_default(),
                )
            })
            .collect();
        assert_eq!(
            order,
            vec![
                ("Máy thở", json!(-1), "OVERDUE"),
                ("ECG", json!(0), "DUE_SOON"),
                ("Monitor", json!(30), "DUE_SOON"),
                ("Bơm tiêm", json!(31), "SAFE"),
                ("Máy X-quang", Value::Null, "SAFE"),
            ]
        );
    }
}
