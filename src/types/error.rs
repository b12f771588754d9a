use thiserror::Error;

use crate::types::{PageNumber, RecordNumber};

#[derive(Error, Debug)]
pub enum PageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Insufficient space: record needs {requested} bytes, {available} available")]
    InsufficientSpace { requested: usize, available: i32 },

    #[error("Invalid record number: {record_number}, record count: {record_count}")]
    InvalidRecordNumber {
        record_number: RecordNumber,
        record_count: u16,
    },

    #[error("Invalid page size: {expected} bytes, got {actual} bytes")]
    InvalidPageSize { expected: usize, actual: usize },

    #[error("Corrupt page: {reason}")]
    CorruptPage { reason: String },

    #[error("Page {page_number} not found (page count: {page_count})")]
    PageNotFound {
        page_number: PageNumber,
        page_count: u64,
    },
}

pub type Result<T> = std::result::Result<T, PageError>;
