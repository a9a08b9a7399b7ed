//! foldmark CLI - Markdown with disclosure blocks to HTML
//!
//! Usage: `foldmark [--max-nesting N] [--no-disclosures] [--no-lists] [FILE|-]`

use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use foldmark::Options;
use foldmark::limits::MAX_BLOCK_NESTING;
use log::{debug, error};

/// Render Markdown with `+++`/`>>>` disclosure blocks and classy lists to HTML.
#[derive(Parser, Clone, Debug)]
#[command(name = "foldmark")]
#[command(version)]
#[command(about, long_about = None)]
struct Cli {
    /// Input file; reads stdin when absent or `-`
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Maximum block nesting depth before the parse fails
    #[arg(long, value_name = "N", default_value_t = MAX_BLOCK_NESTING)]
    max_nesting: usize,

    /// Treat `+++` and `>>>` lines as ordinary text
    #[arg(long)]
    no_disclosures: bool,

    /// Disable the classy list rule
    #[arg(long)]
    no_lists: bool,
}

impl Cli {
    fn options(&self) -> Options {
        Options {
            max_nesting: self.max_nesting,
            disclosures: !self.no_disclosures,
            classy_lists: !self.no_lists,
        }
    }

    fn read_input(&self) -> io::Result<String> {
        match &self.input {
            Some(path) if path.as_os_str() != "-" => std::fs::read_to_string(path),
            _ => {
                let mut buf = String::new();
                io::stdin().read_to_string(&mut buf)?;
                Ok(buf)
            }
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();

    // Usage errors exit with status 2.
    let cli = Cli::parse();
    let options = cli.options();

    let input = match cli.read_input() {
        Ok(input) => input,
        Err(err) => {
            error!("failed to read input: {err}");
            eprintln!("foldmark: {err}");
            return ExitCode::FAILURE;
        }
    };
    debug!("read {} bytes, options {options:?}", input.len());

    let html = match foldmark::to_html_with_options(&input, &options) {
        Ok(html) => html,
        Err(err) => {
            eprintln!("foldmark: {err}");
            return ExitCode::FAILURE;
        }
    };
    if let Err(err) = io::stdout().write_all(html.as_bytes()) {
        eprintln!("foldmark: {err}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
