//! Bulk import endpoints.
//!
//! Uploads arrive as the raw request body; the file name travels in the
//! `fileName` query parameter so the reader can pick a decoder from its
//! extension.
//!
//! ```text
//! POST /api/v1/imports/preview?fileName=thiet_bi.xlsx
//! POST /api/v1/imports?fileName=thiet_bi.xlsx
//! ```

use actix_web::{post, web};
use serde::Deserialize;
use serde_json::json;

use crate::domain::ports::SpreadsheetUpload;
use crate::domain::{Error, ImportOutcome, ImportPreview};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Query parameters accompanying an upload.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadQuery {
    pub file_name: Option<String>,
}

fn into_upload(query: UploadQuery, body: web::Bytes) -> Result<SpreadsheetUpload, Error> {
    let file_name = query
        .file_name
        .map(|name| name.trim().to_owned())
        .filter(|name| !name.is_empty())
        .ok_or_else(|| {
            Error::invalid_request("fileName is required").with_details(json!({
                "field": "fileName",
                "code": "missing_field",
            }))
        })?;
    if body.is_empty() {
        return Err(Error::invalid_request("upload body is empty")
            .with_details(json!({ "field": "body", "code": "empty_upload" })));
    }
    Ok(SpreadsheetUpload::new(file_name, body.to_vec()))
}

/// Show how the first rows of an upload would import, without writing.
#[utoipa::path(
    post,
    path = "/api/v1/imports/preview",
    params(
        ("fileName" = String, Query, description = "Original file name, e.g. `thiet_bi.xlsx`")
    ),
    request_body(content = Vec<u8>, content_type = "application/octet-stream"),
    responses(
        (status = 200, description = "Preview of the first rows", body = ImportPreview),
        (status = 400, description = "Unreadable or unsupported upload", body = Error)
    ),
    tags = ["imports"],
    operation_id = "previewImport"
)]
#[post("/imports/preview")]
pub async fn preview_import(
    state: web::Data<HttpState>,
    query: web::Query<UploadQuery>,
    body: web::Bytes,
) -> ApiResult<web::Json<ImportPreview>> {
    let upload = into_upload(query.into_inner(), body)?;
    let preview = state.imports.preview(&upload).await?;
    Ok(web::Json(preview))
}

/// Create one device per accepted row of an upload.
///
/// A store failure stops the run; rows created before it are kept and the
/// outcome names the failing row.
#[utoipa::path(
    post,
    path = "/api/v1/imports",
    params(
        ("fileName" = String, Query, description = "Original file name, e.g. `thiet_bi.xlsx`")
    ),
    request_body(content = Vec<u8>, content_type = "application/octet-stream"),
    responses(
        (status = 200, description = "Import outcome", body = ImportOutcome),
        (status = 400, description = "Unreadable or unsupported upload", body = Error)
    ),
    tags = ["imports"],
    operation_id = "runImport"
)]
#[post("/imports")]
pub async fn run_import(
    state: web::Data<HttpState>,
    query: web::Query<UploadQuery>,
    body: web::Bytes,
) -> ApiResult<web::Json<ImportOutcome>> {
    let upload = into_upload(query.into_inner(), body)?;
    let outcome = state.imports.import(&upload).await?;
    Ok(web::Json(outcome))
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use rstest::rstest;
    use serde_json::Value;

    use super::*;
    use crate::domain::ports::DeviceRepository;
    use crate::inbound::http::test_utils::{memory_state, test_today};

    const EXPORT: &str = "TRUNG TÂM Y TẾ,,\n\
        DANH SÁCH THIẾT BỊ KIỂM ĐỊNH,,\n\
        Khoa: tất cả,,\n\
        Ngày lập: 01/06/2026,,\n\
        Tên Thiết bị,Nơi đặt thiết bị,Thời gian thực hiện lại/ năm.,\"Thời hạn cấp lại/ Hạn đăng \nkiểm\"\n\
        Máy thở,ICU,2 Năm/ Lần,2027/01/15\n\
        ,ICU,,\n\
        Tên Thiết bị,Nơi đặt thiết bị,,\n\
        Monitor,  Khoa Nhi ,,2026-07-01\n";

    async fn post_upload(uri: &str, body: &'static str) -> (StatusCode, Value, Vec<String>) {
        let (state, repo) = memory_state(test_today());
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .service(web::scope("/api/v1").service(preview_import).service(run_import)),
        )
        .await;
        let req = actix_test::TestRequest::post()
            .uri(uri)
            .set_payload(body)
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        let status = res.status();
        let json: Value = actix_test::read_body_json(res).await;
        let names = repo
            .list_all()
            .await
            .expect("list")
            .into_iter()
            .map(|device| device.name)
            .collect();
        (status, json, names)
    }

    #[rstest]
    #[actix_web::test]
    async fn import_creates_rows_and_skips_blank_and_repeated_headers() {
        let (status, body, names) = post_upload("/api/v1/imports?fileName=thiet_bi.csv", EXPORT).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["created"], 2);
        assert_eq!(body["skipped"], 2);
        assert!(body.get("failure").is_none());
        assert_eq!(names, vec!["Máy thở", "Monitor"]);
    }

    #[rstest]
    #[actix_web::test]
    async fn preview_writes_nothing() {
        let (status, body, names) =
            post_upload("/api/v1/imports/preview?fileName=thiet_bi.csv", EXPORT).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["totalRows"], 4);
        assert_eq!(body["rows"][0]["rowNumber"], 6);
        assert_eq!(body["rows"][0]["device"]["nextDue"], "2027-01-15");
        assert_eq!(body["rows"][1]["skipReason"], "blank_name");
        assert_eq!(body["rows"][2]["skipReason"], "repeated_header");
        assert_eq!(body["rows"][3]["device"]["department"], "Khoa Nhi");
        assert!(names.is_empty());
    }

    #[rstest]
    #[case::missing_name("/api/v1/imports", EXPORT)]
    #[case::empty_body("/api/v1/imports?fileName=thiet_bi.csv", "")]
    #[case::unsupported("/api/v1/imports?fileName=thiet_bi.pdf", EXPORT)]
    #[actix_web::test]
    async fn unusable_uploads_are_invalid_requests(#[case] uri: &str, #[case] body: &'static str) {
        let (status, json, names) = post_upload(uri, body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["code"], "invalid_request");
        assert!(names.is_empty());
    }
}
