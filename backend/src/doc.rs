//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint of the inbound layer together
//! with the domain payloads they exchange. The document backs Swagger UI in
//! debug builds and is exported via `cargo run --bin openapi-dump`.

use utoipa::OpenApi;

use crate::domain::{
    DashboardSummary, DeadlineEntry, DepartmentCount, Device, DeviceFormDefaults, DeviceId, Error,
    ErrorCode, HistoryEntry, ImportFailure, ImportOutcome, ImportPreview, NewDevice, PreviewRow,
    RecordedCompletion, SkipReason, StatusBucket, Urgency,
};
use crate::inbound::http::devices::CompletionRequestBody;

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Calibration tracker API",
        description = "Device registry, calibration deadlines and spreadsheet import for medical equipment."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::devices::list_devices,
        crate::inbound::http::devices::create_device,
        crate::inbound::http::devices::list_departments,
        crate::inbound::http::devices::form_defaults,
        crate::inbound::http::devices::get_device,
        crate::inbound::http::devices::device_history,
        crate::inbound::http::devices::record_completion,
        crate::inbound::http::deadlines::dashboard,
        crate::inbound::http::deadlines::list_deadlines,
        crate::inbound::http::imports::preview_import,
        crate::inbound::http::imports::run_import,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        DeviceId,
        Device,
        NewDevice,
        HistoryEntry,
        RecordedCompletion,
        CompletionRequestBody,
        DeviceFormDefaults,
        Urgency,
        DashboardSummary,
        DepartmentCount,
        StatusBucket,
        DeadlineEntry,
        ImportPreview,
        PreviewRow,
        SkipReason,
        ImportOutcome,
        ImportFailure,
    )),
    tags(
        (name = "devices", description = "Device registry and completion events"),
        (name = "deadlines", description = "Dashboard and deadline tracker"),
        (name = "imports", description = "Bulk import from spreadsheet exports"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    use super::*;

    fn object_fields(name: &str) -> Vec<String> {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        match schemas.get(name).unwrap_or_else(|| panic!("{name} schema")) {
            RefOr::T(Schema::Object(obj)) => obj.properties.keys().cloned().collect(),
            _ => panic!("expected object schema for {name}"),
        }
    }

    #[rstest]
    #[case("Device", &["id", "name", "cycle", "nextDue", "status"])]
    #[case("Error", &["code", "message", "traceId"])]
    #[case("DeadlineEntry", &["device", "daysRemaining", "urgency"])]
    #[case("ImportOutcome", &["created", "skipped", "failure"])]
    fn schemas_expose_camel_case_fields(#[case] name: &str, #[case] fields: &[&str]) {
        let present = object_fields(name);
        for field in fields {
            assert!(
                present.iter().any(|p| p == field),
                "{name} should expose {field}, has {present:?}"
            );
        }
    }

    #[rstest]
    #[case("Device", "name", "Equipment name.")]
    #[case("HistoryEntry", "performedOn", "Date the work was carried out.")]
    #[case("DashboardSummary", "dueSoon", "Devices due within the window.")]
    #[case("ImportOutcome", "created", "Devices created.")]
    fn schema_fields_carry_descriptions(
        #[case] name: &str,
        #[case] field: &str,
        #[case] description: &str,
    ) {
        let doc = serde_json::to_value(ApiDoc::openapi()).expect("serialise document");
        let property = &doc["components"]["schemas"][name]["properties"][field];
        assert_eq!(property["description"], description, "{name}.{field}: {property}");
    }

    #[rstest]
    #[case("/api/v1/devices")]
    #[case("/api/v1/devices/{id}/completions")]
    #[case("/api/v1/dashboard")]
    #[case("/api/v1/deadlines")]
    #[case("/api/v1/imports")]
    #[case("/health/ready")]
    fn paths_are_registered(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing {path}");
    }
}
