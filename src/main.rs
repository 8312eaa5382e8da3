//! mobitext - MOBI text and cover extractor

use std::fs;
use std::process::ExitCode;

use clap::Parser;

use mobitext::headers::{EXTH_AUTHOR, EXTH_TITLE};
use mobitext::Book;

#[derive(Parser)]
#[command(name = "mobitext")]
#[command(version, about = "MOBI text and cover extractor", long_about = None)]
#[command(after_help = "EXAMPLES:
    mobitext book.mobi                    Print the book's plain text
    mobitext --markup raw.html book.mobi  Save the raw markup
    mobitext --cover cover.jpg book.mobi  Save the cover image
    mobitext -i book.mobi                 Show book metadata")]
struct Cli {
    /// Input MOBI file
    #[arg(value_name = "INPUT")]
    input: String,

    /// Write the plain text to a file instead of stdout
    #[arg(long, value_name = "FILE")]
    text: Option<String>,

    /// Write the raw markup to a file
    #[arg(long, value_name = "FILE")]
    markup: Option<String>,

    /// Write the cover image to a file
    #[arg(long, value_name = "FILE")]
    cover: Option<String>,

    /// Show book metadata without extracting anything
    #[arg(short, long)]
    info: bool,

    /// Suppress output messages
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), String> {
    let book = Book::open(&cli.input).map_err(|e| e.to_string())?;

    if cli.info {
        return show_info(&cli.input, &book);
    }

    if let Some(ref path) = cli.cover {
        match book.cover().map_err(|e| e.to_string())? {
            Some(image) => {
                fs::write(path, image).map_err(|e| e.to_string())?;
                if !cli.quiet {
                    println!("Wrote cover to {path}");
                }
            }
            None => return Err("book has no cover".to_string()),
        }
    }

    if let Some(ref path) = cli.markup {
        let markup = book.markup().map_err(|e| e.to_string())?;
        fs::write(path, markup).map_err(|e| e.to_string())?;
        if !cli.quiet {
            println!("Wrote markup to {path}");
        }
    }

    let extract_text = cli.text.is_some() || (cli.cover.is_none() && cli.markup.is_none());
    if extract_text {
        let text = book.text().map_err(|e| e.to_string())?;
        match cli.text {
            Some(ref path) => {
                fs::write(path, text).map_err(|e| e.to_string())?;
                if !cli.quiet {
                    println!("Wrote text to {path}");
                }
            }
            None => println!("{text}"),
        }
    }

    Ok(())
}

fn show_info(path: &str, book: &Book) -> Result<(), String> {
    println!("File: {path}");
    if let Some(exth) = book.exth() {
        if let Some(title) = exth.find_string(EXTH_TITLE) {
            println!("Title: {title}");
        }
        if let Some(author) = exth.find_string(EXTH_AUTHOR) {
            println!("Author: {author}");
        }
    }
    let has_cover = book.cover().map_err(|e| e.to_string())?.is_some();
    println!("Cover: {}", if has_cover { "yes" } else { "no" });

    Ok(())
}
