use std::{
    error::Error,
    path::{Path, PathBuf},
};

use clap::{Parser, Subcommand};
use log::{error, info};
use rustyline::{DefaultEditor, error::ReadlineError};
use slotpage::{
    storage::page_file::PageFile,
    types::{PageNumber, page::Page},
};

/// Generate and inspect files of slotted pages
#[derive(Parser, Debug)]
#[command(name = "pagefile", version, about)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Append full pages of fixed-length records to a page file
    Write {
        #[arg(short, long, default_value = "pagefile")]
        path: PathBuf,

        /// Number of pages to append
        #[arg(short, long, default_value_t = 10)]
        count: u64,

        /// Length of every generated record
        #[arg(short, long, default_value_t = 10)]
        record_len: usize,
    },
    /// Dump the records of one page, or prompt for page numbers
    Read {
        #[arg(short, long, default_value = "pagefile")]
        path: PathBuf,

        #[arg(long)]
        page: Option<PageNumber>,
    },
    /// Summarise every page in a page file
    Info {
        #[arg(short, long, default_value = "pagefile")]
        path: PathBuf,
    },
}

fn write_pages(path: &Path, count: u64, record_len: usize) -> Result<(), Box<dyn Error>> {
    let mut page_file = if path.exists() {
        PageFile::open(path)?
    } else {
        PageFile::create(path)?
    };

    for _ in 0..count {
        let mut page = Page::new();
        page.fill_with(record_len)?;
        page_file.append_page(&page)?;
    }
    page_file.sync()?;

    info!(
        "Appended {} pages to {} ({} pages total)",
        count,
        path.display(),
        page_file.page_count()
    );
    Ok(())
}

fn print_page(page_file: &mut PageFile, page_number: PageNumber) -> Result<(), Box<dyn Error>> {
    let page = page_file.read_page(page_number)?;
    println!(
        "page {}: record count: {}, free space: {}, checksum: {:08x}",
        page_number,
        page.record_count(),
        page.free_space(),
        page.checksum()
    );
    for record_number in 0..page.record_count() {
        let record = page.get_record(record_number)?;
        println!("record {}: {:?}", record_number, record);
    }
    Ok(())
}

fn prompt_for_pages(page_file: &mut PageFile) -> Result<(), Box<dyn Error>> {
    let mut rl = DefaultEditor::new()?;

    loop {
        match rl.readline("page number: ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                rl.add_history_entry(line)?;

                match line.parse::<PageNumber>() {
                    Ok(page_number) => {
                        if let Err(err) = print_page(page_file, page_number) {
                            println!("{}", err);
                        }
                    }
                    Err(_) => println!("Enter a page number"),
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(err) => return Err(err.into()),
        }
    }

    Ok(())
}

fn print_info(page_file: &mut PageFile) -> Result<(), Box<dyn Error>> {
    println!("{}: {} pages", page_file.path.display(), page_file.page_count());
    for page_number in 0..page_file.page_count() {
        let page = page_file.read_page(page_number)?;
        println!(
            "  page {:>6}  records {:>5}  free {:>5}  crc {:08x}",
            page_number,
            page.record_count(),
            page.free_space(),
            page.checksum()
        );
    }
    Ok(())
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    match args.command {
        Command::Write {
            path,
            count,
            record_len,
        } => write_pages(&path, count, record_len),
        Command::Read { path, page } => {
            let mut page_file = PageFile::open(&path)?;
            match page {
                Some(page_number) => print_page(&mut page_file, page_number),
                None => prompt_for_pages(&mut page_file),
            }
        }
        Command::Info { path } => {
            let mut page_file = PageFile::open(&path)?;
            print_info(&mut page_file)
        }
    }
}

fn main() {
    env_logger::init();

    if let Err(err) = run(Args::parse()) {
        error!("{}", err);
        std::process::exit(1);
    }
}
