pub mod page_file;
