use std::{
    fs::{File, OpenOptions},
    io::{Read, Seek, SeekFrom, Write},
    path::{Path, PathBuf},
};

use log::debug;

use crate::types::{
    PAGE_SIZE, PageNumber,
    error::{PageError, Result},
    page::Page,
};

/// A file of back-to-back `PAGE_SIZE` blocks. Page `n` lives at byte
/// offset `n * PAGE_SIZE`; there is no file header.
pub struct PageFile {
    pub path: PathBuf,
    file: File,
    page_count: u64,
}

impl PageFile {
    /// Creates (or truncates) a page file.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(true)
            .open(path)?;
        debug!("Created page file at {}", path.display());
        Ok(Self {
            path: path.to_path_buf(),
            file,
            page_count: 0,
        })
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new().read(true).write(true).open(path)?;
        let file_size = file.metadata()?.len();
        if file_size % PAGE_SIZE as u64 != 0 {
            return Err(PageError::CorruptPage {
                reason: format!(
                    "file size {} is not a multiple of the page size {}",
                    file_size, PAGE_SIZE
                ),
            });
        }
        let page_count = file_size / PAGE_SIZE as u64;
        debug!(
            "Opened page file at {} ({} pages)",
            path.display(),
            page_count
        );
        Ok(Self {
            path: path.to_path_buf(),
            file,
            page_count,
        })
    }

    pub fn page_count(&self) -> u64 {
        self.page_count
    }

    fn page_offset(page_number: PageNumber) -> u64 {
        page_number * PAGE_SIZE as u64
    }

    pub fn read_page(&mut self, page_number: PageNumber) -> Result<Page> {
        if page_number >= self.page_count {
            return Err(PageError::PageNotFound {
                page_number,
                page_count: self.page_count,
            });
        }
        let mut buffer = vec![0u8; PAGE_SIZE];
        self.file
            .seek(SeekFrom::Start(Self::page_offset(page_number)))?;
        self.file.read_exact(&mut buffer)?;
        debug!("Read page {} from {}", page_number, self.path.display());
        Page::from_bytes(&buffer)
    }

    /// Overwrites page `page_number`; writing at `page_count` appends.
    pub fn write_page(&mut self, page_number: PageNumber, page: &Page) -> Result<()> {
        if page_number > self.page_count {
            return Err(PageError::PageNotFound {
                page_number,
                page_count: self.page_count,
            });
        }
        let page_bytes = page.to_bytes();
        self.file
            .seek(SeekFrom::Start(Self::page_offset(page_number)))?;
        self.file.write_all(&page_bytes)?;
        if page_number == self.page_count {
            self.page_count += 1;
        }
        debug!(
            "Wrote page {} ({} records) to {}",
            page_number,
            page.record_count(),
            self.path.display()
        );
        Ok(())
    }

    pub fn append_page(&mut self, page: &Page) -> Result<PageNumber> {
        let page_number = self.page_count;
        self.write_page(page_number, page)?;
        Ok(page_number)
    }

    pub fn sync(&mut self) -> Result<()> {
        self.file.flush()?;
        self.file.sync_data()?;
        Ok(())
    }
}
