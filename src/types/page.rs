use crc32fast::Hasher;

use crate::types::{
    PAGE_HEADER_SIZE, PAGE_SIZE, RECORD_TABLE_ENTRY_SIZE, RecordNumber,
    error::{PageError, Result},
};

/*
 * Page Layout on Disk (Slotted Page Structure)
 * ┌─────────────────────────────────────────────────────────────────┐
 * │                    PAGE HEADER (4 bytes)                        │
 * │  record_count(2) | free_pointer(2)                              │
 * ├─────────────────────────────────────────────────────────────────┤
 * │                  RECORD TABLE                                   │
 * │  [rec0: offset(2)|len(2)] [rec1: offset(2)|len(2)] ...         │
 * ├─────────────────────────────────────────────────────────────────┤
 * │                    FREE SPACE                                   │
 * │                                                                 │
 * ├──────────────────────── free_pointer ───────────────────────────┤
 * │                   RECORD DATA                                   │
 * │  [...rec N...] [...rec 2...] [...rec 1...] [...rec 0...]       │
 * └─────────────────────────────────────────────────────────────────┘
 *
 * All integers are little-endian. The buffer is the single source of
 * truth; record_count and free_pointer are cached copies of the header.
 */

/// One record table entry: where a record lives and how long it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordEntry {
    pub offset: u16, // Absolute offset from the beginning of the page
    pub length: u16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    record_count: u16,
    free_pointer: u16,
    data: Vec<u8>,
}

impl Default for Page {
    fn default() -> Self {
        Self::new()
    }
}

impl Page {
    pub fn new() -> Self {
        let mut page = Self {
            record_count: 0,
            free_pointer: PAGE_SIZE as u16,
            data: vec![0; PAGE_SIZE],
        };
        page.write_header();
        page
    }

    pub fn record_count(&self) -> u16 {
        self.record_count
    }

    pub fn free_pointer(&self) -> u16 {
        self.free_pointer
    }

    /// Bytes available for the payload of one more record, after reserving
    /// that record's table entry. Negative once the page is full.
    pub fn free_space(&self) -> i32 {
        let table_end = PAGE_HEADER_SIZE as i32
            + self.record_count as i32 * RECORD_TABLE_ENTRY_SIZE as i32;
        self.free_pointer as i32 - table_end - RECORD_TABLE_ENTRY_SIZE as i32
    }

    pub fn can_fit(&self, record_len: usize) -> bool {
        let available = self.free_space();
        available >= 0 && record_len <= available as usize
    }

    /// Appends `record` to the page and returns its record number.
    ///
    /// The page is untouched when the record does not fit.
    pub fn add_record(&mut self, record: &[u8]) -> Result<RecordNumber> {
        if !self.can_fit(record.len()) {
            return Err(PageError::InsufficientSpace {
                requested: record.len(),
                available: self.free_space(),
            });
        }

        // Record data grows downward from the free pointer
        let length = record.len() as u16;
        let offset = self.free_pointer - length;
        let start = offset as usize;
        self.data[start..start + record.len()].copy_from_slice(record);

        let record_number = self.record_count;
        self.write_entry(record_number, RecordEntry { offset, length });

        self.free_pointer = offset;
        self.record_count += 1;
        self.write_header();

        Ok(record_number)
    }

    /// Returns a copy of the record; the page buffer is never lent out.
    pub fn get_record(&self, record_number: RecordNumber) -> Result<Vec<u8>> {
        let entry = self.record_entry(record_number)?;
        let start = entry.offset as usize;
        let end = start + entry.length as usize;
        Ok(self.data[start..end].to_vec())
    }

    pub fn record_entry(&self, record_number: RecordNumber) -> Result<RecordEntry> {
        if record_number >= self.record_count {
            return Err(PageError::InvalidRecordNumber {
                record_number,
                record_count: self.record_count,
            });
        }
        Ok(read_entry(&self.data, record_number))
    }

    /// Serialize the page to exactly `PAGE_SIZE` bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.data.clone()
    }

    /// Deserialize a page, rejecting anything that breaks the layout
    /// invariants instead of deferring the failure to a later read.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != PAGE_SIZE {
            return Err(PageError::InvalidPageSize {
                expected: PAGE_SIZE,
                actual: bytes.len(),
            });
        }

        let record_count = u16::from_le_bytes([bytes[0], bytes[1]]);
        let free_pointer = u16::from_le_bytes([bytes[2], bytes[3]]);

        if free_pointer as usize > PAGE_SIZE {
            return Err(PageError::CorruptPage {
                reason: format!("free pointer {} beyond page end", free_pointer),
            });
        }

        let table_end = PAGE_HEADER_SIZE + record_count as usize * RECORD_TABLE_ENTRY_SIZE;
        if table_end > free_pointer as usize {
            return Err(PageError::CorruptPage {
                reason: format!(
                    "record table for {} records ends at {}, past free pointer {}",
                    record_count, table_end, free_pointer
                ),
            });
        }

        // Records are packed back to front: each one ends where the previous begins
        let mut expected_end = PAGE_SIZE;
        for record_number in 0..record_count {
            let entry = read_entry(bytes, record_number);
            let start = entry.offset as usize;
            let end = start + entry.length as usize;
            if end != expected_end {
                return Err(PageError::CorruptPage {
                    reason: format!(
                        "record {} spans {}..{}, expected to end at {}",
                        record_number, start, end, expected_end
                    ),
                });
            }
            expected_end = start;
        }

        if expected_end != free_pointer as usize {
            return Err(PageError::CorruptPage {
                reason: format!(
                    "record data starts at {}, free pointer is {}",
                    expected_end, free_pointer
                ),
            });
        }

        Ok(Self {
            record_count,
            free_pointer,
            data: bytes.to_vec(),
        })
    }

    /// CRC32 of the serialized page. Not stored in the page itself.
    pub fn checksum(&self) -> u32 {
        let mut hasher = Hasher::new();
        hasher.update(&self.data);
        hasher.finalize()
    }

    /// Adds `record_len`-byte records while more than `record_len` bytes are
    /// free. The i-th record added is filled with `i as u8`.
    pub fn fill_with(&mut self, record_len: usize) -> Result<u16> {
        let mut added: u16 = 0;
        while self.can_fit(record_len.saturating_add(1)) {
            let record = vec![added as u8; record_len];
            self.add_record(&record)?;
            added += 1;
        }
        Ok(added)
    }

    fn write_header(&mut self) {
        self.data[0..2].copy_from_slice(&self.record_count.to_le_bytes());
        self.data[2..4].copy_from_slice(&self.free_pointer.to_le_bytes());
    }

    fn write_entry(&mut self, record_number: RecordNumber, entry: RecordEntry) {
        let position = entry_position(record_number);
        self.data[position..position + 2].copy_from_slice(&entry.offset.to_le_bytes());
        self.data[position + 2..position + 4].copy_from_slice(&entry.length.to_le_bytes());
    }
}

fn entry_position(record_number: RecordNumber) -> usize {
    PAGE_HEADER_SIZE + record_number as usize * RECORD_TABLE_ENTRY_SIZE
}

fn read_entry(bytes: &[u8], record_number: RecordNumber) -> RecordEntry {
    let position = entry_position(record_number);
    RecordEntry {
        offset: u16::from_le_bytes([bytes[position], bytes[position + 1]]),
        length: u16::from_le_bytes([bytes[position + 2], bytes[position + 3]]),
    }
}
