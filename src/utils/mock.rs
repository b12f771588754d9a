use std::path::PathBuf;

use tempfile::TempDir;

use crate::{
    storage::page_file::PageFile,
    types::{error::PageError, page::Page},
};

/// A page file inside its own temporary directory, removed on drop.
pub struct TempPageFile {
    pub path: PathBuf,
    _dir: TempDir,
}

impl TempPageFile {
    pub fn new() -> std::io::Result<Self> {
        Self::with_prefix("slotpage_test")
    }

    pub fn with_prefix(prefix: &str) -> std::io::Result<Self> {
        let dir = tempfile::Builder::new().prefix(prefix).tempdir()?;
        let path = dir.path().join("pagefile");
        Ok(Self { path, _dir: dir })
    }

    pub fn create_page_file(&self) -> Result<PageFile, Box<dyn std::error::Error>> {
        Ok(PageFile::create(&self.path)?)
    }

    pub fn open_page_file(&self) -> Result<PageFile, Box<dyn std::error::Error>> {
        Ok(PageFile::open(&self.path)?)
    }
}

/// Builds a page holding `records` in order.
pub fn page_with_records(records: &[&[u8]]) -> Result<Page, PageError> {
    let mut page = Page::new();
    for record in records {
        page.add_record(record)?;
    }
    Ok(page)
}
