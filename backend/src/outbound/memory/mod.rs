//! In-process adapters for tests and database-less runs.

mod in_memory_device_repository;

pub use in_memory_device_repository::InMemoryDeviceRepository;
