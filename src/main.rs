use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use clap::Parser;

use minimd::config::Config;
use minimd::document::read_markdown;
use minimd::export::{self, ExportFormat};

#[derive(Parser)]
#[command(name = "minimd")]
#[command(version, about = "Convert Markdown files to PDF, SVG, HTML or Typst")]
struct Cli {
    /// Input Markdown file (reads stdin when omitted)
    input: Option<PathBuf>,

    /// Output file (defaults to input name with the format's extension)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = ExportFormat::Pdf)]
    format: ExportFormat,

    /// Config file (defaults to the user config, then built-in settings)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the scanned blocks as JSON instead of converting
    #[arg(long)]
    blocks: bool,
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", message);
    std::process::exit(1);
}

fn read_input(path: Option<&Path>) -> String {
    match path {
        Some(path) => read_markdown(path).unwrap_or_else(|e| fail(e)),
        None => {
            let mut buf = String::new();
            if let Err(e) = io::stdin().read_to_string(&mut buf) {
                fail(format!("reading stdin: {}", e));
            }
            buf
        }
    }
}

/// Whether two paths name the same existing file, however they are spelled.
fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

fn load_config(path: Option<&Path>) -> Config {
    let loaded = match path {
        Some(path) => {
            log::debug!("Using config from: {}", path.display());
            Config::load(path)
        }
        None => Config::discover(),
    };
    loaded.unwrap_or_else(|e| fail(e))
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let markdown = read_input(cli.input.as_deref());

    if cli.blocks {
        let blocks = minimd::parse(&markdown);
        match serde_json::to_string_pretty(&blocks) {
            Ok(json) => println!("{}", json),
            Err(e) => fail(e),
        }
        return;
    }

    let config = load_config(cli.config.as_deref());

    // Determine output path
    let output = match (cli.output, &cli.input) {
        (Some(output), _) => output,
        (None, Some(input)) => input.with_extension(cli.format.extension()),
        (None, None) if cli.format.is_text() => {
            let text = match cli.format {
                ExportFormat::Html => minimd::markdown_to_html_with_config(&markdown, &config),
                ExportFormat::Typst => minimd::markdown_to_typst_with_config(&markdown, &config),
                _ => minimd::markdown_to_markdown(&markdown),
            };
            print!("{}", text);
            return;
        }
        (None, None) => fail(format!(
            "{} output needs --output when reading from stdin",
            cli.format
        )),
    };

    let target = export::normalize_output_path(&output, cli.format);
    if cli.input.as_deref().is_some_and(|input| same_file(input, &target)) {
        fail("output would overwrite the input file, pass a different --output");
    }

    let written = export::export_to_path(&markdown, cli.format, &output, &config)
        .unwrap_or_else(|e| fail(e));

    for path in written {
        println!("Created {}", path.display());
    }
}
