pub mod error;
pub mod page;

// Common type aliases
pub type RecordNumber = u16;
pub type PageNumber = u64;

// On-disk layout constants
pub const PAGE_SIZE: usize = 4096;
pub const PAGE_HEADER_SIZE: usize = 4; // record_count (2 bytes) + free_pointer (2 bytes)

pub const RECORD_TABLE_ENTRY_SIZE: usize = 4; // offset (2 bytes) + length (2 bytes)
