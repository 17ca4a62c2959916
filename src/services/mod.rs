//! Gateway services: upload storage and external conversion

pub mod converter;
pub mod storage;

pub use converter::{ConversionOutput, ConvertError, Converter};
pub use storage::{StoredUpload, UploadStore};
