//! Object Storage Adapters

mod file_object_storage;

pub use file_object_storage::FileObjectStorage;
