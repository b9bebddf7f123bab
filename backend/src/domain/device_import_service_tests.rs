//! Tests for the bulk import service.

use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::{DeviceRepositoryError, MockDeviceRepository, MockSpreadsheetReader};
use crate::domain::{DeviceId, ErrorCode, NewDevice, RawTable, SkipReason};
use crate::test_support::FixedClock;

#[fixture]
fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 6, 1).expect("valid date")
}

fn record(cells: &[&str]) -> Vec<String> {
    cells.iter().map(|&c| c.to_owned()).collect()
}

fn table(data: &[&[&str]]) -> RawTable {
    let mut records = vec![record(&[]); 4];
    records.push(record(&[
        "Tên Thiết bị",
        "Nơi đặt thiết bị",
        "Ngày cấp/ Ngày Đăng kiểm",
    ]));
    records.extend(data.iter().map(|cells| record(cells)));
    RawTable::new(records)
}

fn reader_for(table: RawTable) -> MockSpreadsheetReader {
    let mut reader = MockSpreadsheetReader::new();
    reader.expect_read().return_once(move |_| Ok(table));
    reader
}

fn recording_repo(created: Arc<Mutex<Vec<NewDevice>>>) -> MockDeviceRepository {
    let mut repo = MockDeviceRepository::new();
    repo.expect_insert().returning(move |device| {
        let mut created = created.lock().expect("lock");
        created.push(device.clone());
        let id = i64::try_from(created.len()).expect("small count");
        Ok(DeviceId::new(id))
    });
    repo
}

fn make_service(
    repo: MockDeviceRepository,
    reader: MockSpreadsheetReader,
    today: NaiveDate,
) -> DeviceImportService<MockDeviceRepository, MockSpreadsheetReader> {
    DeviceImportService::new(
        Arc::new(repo),
        Arc::new(reader),
        Arc::new(ImportFieldMapping::default()),
        Arc::new(FixedClock::on(today)),
    )
}

fn upload() -> SpreadsheetUpload {
    SpreadsheetUpload::new("thiet_bi.csv", Vec::new())
}

#[rstest]
#[tokio::test]
async fn sentinel_rows_skip_and_dates_recover(today: NaiveDate) {
    let created = Arc::new(Mutex::new(Vec::new()));
    let service = make_service(
        recording_repo(Arc::clone(&created)),
        reader_for(table(&[
            &["Tên Thiết bị", "Nơi đặt thiết bị", "Ngày cấp/ Ngày Đăng kiểm"],
            &["Máy siêu âm", "Chẩn đoán hình ảnh", "27/06/2026"],
            &["Máy điện tim", "Nội", "không rõ"],
        ])),
        today,
    );

    let outcome = service.import(&upload()).await.expect("import");
    assert_eq!(outcome.created, 2);
    assert_eq!(outcome.skipped, 1);
    assert!(outcome.failure.is_none());

    let created = created.lock().expect("lock");
    let dates: Vec<_> = created.iter().map(|d| d.last_calibration).collect();
    assert_eq!(dates, [NaiveDate::from_ymd_opt(2026, 6, 27), Some(today)]);
}

#[rstest]
#[tokio::test]
async fn first_store_failure_stops_without_rollback(today: NaiveDate) {
    let mut repo = MockDeviceRepository::new();
    let mut calls = 0_i64;
    repo.expect_insert().times(2).returning(move |_| {
        calls += 1;
        if calls == 1 {
            Ok(DeviceId::new(calls))
        } else {
            Err(DeviceRepositoryError::connection("refused"))
        }
    });
    let service = make_service(
        repo,
        reader_for(table(&[&["A", "ICU", ""], &["B", "ICU", ""], &["C", "ICU", ""]])),
        today,
    );

    let outcome = service.import(&upload()).await.expect("import report");
    assert_eq!(outcome.created, 1);
    let failure = outcome.failure.expect("failure reported");
    assert_eq!(failure.row_number, 7);
    assert!(failure.message.contains("refused"));
}

#[rstest]
#[tokio::test]
async fn preview_never_writes_and_limits_rows(today: NaiveDate) {
    let mut repo = MockDeviceRepository::new();
    repo.expect_insert().never();
    let data: Vec<Vec<String>> = (1..=7).map(|n| record(&[format!("Device {n}").as_str(), "ICU", ""])).collect();
    let rows: Vec<Vec<&str>> = data.iter().map(|r| r.iter().map(String::as_str).collect()).collect();
    let mut slices: Vec<&[&str]> = rows.iter().map(Vec::as_slice).collect();
    slices.insert(1, &["", "ICU", ""]);

    let service = make_service(repo, reader_for(table(&slices)), today);
    let preview = service.preview(&upload()).await.expect("preview");

    assert_eq!(preview.total_rows, 8);
    assert_eq!(preview.rows.len(), PREVIEW_ROW_LIMIT);
    let second = preview.rows.get(1).expect("second row");
    assert_eq!(second.skip_reason, Some(SkipReason::BlankName));
    assert!(second.device.is_none());
    assert_eq!(preview.headers.first().map(String::as_str), Some("Tên Thiết bị"));
}

#[rstest]
#[tokio::test]
async fn unreadable_upload_is_invalid_request(today: NaiveDate) {
    let mut reader = MockSpreadsheetReader::new();
    reader
        .expect_read()
        .return_once(|upload| Err(SpreadsheetReadError::unsupported_format(upload.file_name.clone())));
    let service = make_service(MockDeviceRepository::new(), reader, today);

    let error = service.import(&upload()).await.expect_err("rejected");
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[tokio::test]
async fn missing_header_is_invalid_request(today: NaiveDate) {
    let service = make_service(
        MockDeviceRepository::new(),
        reader_for(RawTable::new(vec![record(&["only one row"])])),
        today,
    );
    let error = service.preview(&upload()).await.expect_err("rejected");
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}
