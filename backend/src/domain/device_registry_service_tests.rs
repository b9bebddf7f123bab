//! Tests for the device registry service.

use std::sync::Arc;

use chrono::NaiveDate;
use mockall::predicate::eq;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::MockDeviceRepository;
use crate::domain::{COMPLETION_ACTION_LABEL, ErrorCode};
use crate::outbound::memory::InMemoryDeviceRepository;
use crate::test_support::{FixedClock, new_device};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

#[fixture]
fn today() -> NaiveDate {
    date(2026, 6, 1)
}

fn make_service(repo: MockDeviceRepository, today: NaiveDate) -> DeviceRegistryService<MockDeviceRepository> {
    DeviceRegistryService::new(Arc::new(repo), Arc::new(FixedClock::on(today)))
}

fn stored(id: i64, cycle: &str) -> Device {
    let mut new = new_device("Máy thở", "Hồi sức");
    new.cycle = cycle.to_owned();
    Device::register(DeviceId::new(id), new)
}

fn echo_completion(update: &CompletionUpdate, device: Device) -> RecordedCompletion {
    let mut device = device;
    update.apply_to(&mut device);
    RecordedCompletion {
        entry: HistoryEntry {
            id: 1,
            device_id: update.device_id(),
            performed_on: update.completed_on(),
            action: update.action().to_owned(),
            note: update.note().to_owned(),
        },
        device,
    }
}

#[rstest]
#[tokio::test]
async fn create_inserts_valid_devices(today: NaiveDate) {
    let mut repo = MockDeviceRepository::new();
    repo.expect_insert()
        .times(1)
        .withf(|device| device.name == "Monitor")
        .return_once(|_| Ok(DeviceId::new(1)));

    let service = make_service(repo, today);
    service
        .create_device(new_device("Monitor", "ICU"))
        .await
        .expect("create succeeds");
}

#[rstest]
#[tokio::test]
async fn create_rejects_blank_names_without_writing(today: NaiveDate) {
    let mut repo = MockDeviceRepository::new();
    repo.expect_insert().never();

    let service = make_service(repo, today);
    let error = service
        .create_device(new_device("  ", "ICU"))
        .await
        .expect_err("blank name rejected");
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[case("2 Năm/ Lần", date(2028, 5, 31))]
#[case("3 Năm/ Lần", date(2029, 5, 31))]
#[case("không rõ", date(2027, 6, 1))]
#[case("99999999 Năm", date(2027, 6, 1))]
#[tokio::test]
async fn completion_rolls_next_due_forward(
    today: NaiveDate,
    #[case] cycle: &str,
    #[case] expected_due: NaiveDate,
) {
    let device = stored(5, cycle);
    let completed_on = date(2026, 6, 1);
    let mut repo = MockDeviceRepository::new();
    let found = device.clone();
    repo.expect_find_by_id()
        .with(eq(DeviceId::new(5)))
        .times(1)
        .return_once(move |_| Ok(Some(found)));
    repo.expect_apply_completion()
        .times(1)
        .withf(move |update| update.next_due() == expected_due && update.completed_on() == completed_on)
        .return_once(move |update| Ok(echo_completion(update, device)));

    let service = make_service(repo, today);
    let recorded = service
        .record_completion(CompletionRequest {
            device_id: DeviceId::new(5),
            completed_on: Some(completed_on),
            note: "kiểm định đạt".to_owned(),
        })
        .await
        .expect("completion recorded");

    assert_eq!(recorded.device.last_calibration, Some(completed_on));
    assert_eq!(recorded.device.next_due, Some(expected_due));
    assert_eq!(recorded.entry.action, COMPLETION_ACTION_LABEL);
    assert_eq!(recorded.entry.performed_on, completed_on);
}

#[rstest]
#[tokio::test]
async fn completion_defaults_to_today(today: NaiveDate) {
    let device = stored(2, "1 Năm/ Lần");
    let mut repo = MockDeviceRepository::new();
    let found = device.clone();
    repo.expect_find_by_id()
        .return_once(move |_| Ok(Some(found)));
    repo.expect_apply_completion()
        .times(1)
        .withf(move |update| update.completed_on() == today)
        .return_once(move |update| Ok(echo_completion(update, device)));

    let service = make_service(repo, today);
    let recorded = service
        .record_completion(CompletionRequest {
            device_id: DeviceId::new(2),
            completed_on: None,
            note: String::new(),
        })
        .await
        .expect("completion recorded");
    assert_eq!(recorded.device.last_calibration, Some(today));
}

#[rstest]
#[tokio::test]
async fn completion_of_unknown_device_writes_nothing(today: NaiveDate) {
    let mut repo = MockDeviceRepository::new();
    repo.expect_find_by_id().times(1).return_once(|_| Ok(None));
    repo.expect_apply_completion().never();

    let service = make_service(repo, today);
    let error = service
        .record_completion(CompletionRequest {
            device_id: DeviceId::new(99),
            completed_on: Some(today),
            note: String::new(),
        })
        .await
        .expect_err("unknown device");
    assert_eq!(error.code(), ErrorCode::NotFound);
    assert_eq!(error.message(), "device 99 not found");
}

#[rstest]
#[tokio::test]
async fn completion_race_with_missing_device_maps_to_not_found(today: NaiveDate) {
    let device = stored(3, "1 Năm/ Lần");
    let mut repo = MockDeviceRepository::new();
    repo.expect_find_by_id()
        .return_once(move |_| Ok(Some(device)));
    repo.expect_apply_completion()
        .return_once(|update| Err(DeviceRepositoryError::device_not_found(update.device_id())));

    let service = make_service(repo, today);
    let error = service
        .record_completion(CompletionRequest {
            device_id: DeviceId::new(3),
            completed_on: None,
            note: String::new(),
        })
        .await
        .expect_err("device vanished");
    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[case(DeviceRepositoryError::connection("refused"), ErrorCode::ServiceUnavailable)]
#[case(DeviceRepositoryError::query("syntax"), ErrorCode::InternalError)]
#[tokio::test]
async fn store_failures_propagate(
    today: NaiveDate,
    #[case] failure: DeviceRepositoryError,
    #[case] expected: ErrorCode,
) {
    let mut repo = MockDeviceRepository::new();
    repo.expect_list_all().return_once(move || Err(failure));

    let service = make_service(repo, today);
    let error = service
        .list_devices(&DepartmentFilter::All)
        .await
        .expect_err("store failure");
    assert_eq!(error.code(), expected);
}

#[rstest]
#[tokio::test]
async fn listing_applies_department_filter(today: NaiveDate) {
    let mut repo = MockDeviceRepository::new();
    repo.expect_list_all().return_once(|| {
        Ok(vec![
            Device::register(DeviceId::new(1), new_device("A", "ICU")),
            Device::register(DeviceId::new(2), new_device("B", "Lab")),
            Device::register(DeviceId::new(3), new_device("C", "ICU")),
        ])
    });

    let service = make_service(repo, today);
    let devices = service
        .list_devices(&DepartmentFilter::Only("ICU".to_owned()))
        .await
        .expect("listing");
    let ids: Vec<_> = devices.iter().map(|d| d.id.get()).collect();
    assert_eq!(ids, [1, 3]);
}

#[rstest]
#[tokio::test]
async fn departments_are_distinct_in_first_seen_order(today: NaiveDate) {
    let mut repo = MockDeviceRepository::new();
    repo.expect_list_all().return_once(|| {
        Ok(vec![
            Device::register(DeviceId::new(1), new_device("A", "Lab")),
            Device::register(DeviceId::new(2), new_device("B", "")),
            Device::register(DeviceId::new(3), new_device("C", "ICU")),
            Device::register(DeviceId::new(4), new_device("D", "Lab")),
        ])
    });

    let service = make_service(repo, today);
    let departments = service.departments().await.expect("departments");
    assert_eq!(departments, ["Lab", "ICU"]);
}

#[rstest]
#[tokio::test]
async fn history_of_unknown_device_is_not_found(today: NaiveDate) {
    let mut repo = MockDeviceRepository::new();
    repo.expect_find_by_id().return_once(|_| Ok(None));
    repo.expect_list_history().never();

    let service = make_service(repo, today);
    let error = service
        .history(DeviceId::new(8))
        .await
        .expect_err("unknown device");
    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn repeated_completions_keep_every_history_entry(today: NaiveDate) {
    let repo = Arc::new(InMemoryDeviceRepository::new());
    let id = repo
        .insert(&new_device("Máy điện tim", "Nội"))
        .await
        .expect("seed device");
    let service = DeviceRegistryService::new(Arc::clone(&repo), Arc::new(FixedClock::on(today)));

    for (completed_on, note) in [(date(2026, 2, 1), "lần 1"), (date(2026, 3, 1), "lần 2")] {
        service
            .record_completion(CompletionRequest {
                device_id: id,
                completed_on: Some(completed_on),
                note: note.to_owned(),
            })
            .await
            .expect("completion recorded");
    }

    let device = service.find_device(id).await.expect("device exists");
    assert_eq!(device.last_calibration, Some(date(2026, 3, 1)));
    assert_eq!(device.next_due, Some(date(2027, 3, 1)));

    let history = service.history(id).await.expect("history");
    let dates: Vec<_> = history.iter().map(|entry| entry.performed_on).collect();
    assert_eq!(dates, [date(2026, 2, 1), date(2026, 3, 1)]);
    assert_eq!(history.len(), 2);
}
