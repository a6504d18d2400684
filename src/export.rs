use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use typst_as_lib::TypstEngine;
use typst_as_lib::typst_kit_options::TypstKitFontOptions;
use typst_library::layout::PagedDocument;
use typst_pdf::PdfOptions;

use crate::config::Config;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Typst compilation failed: {0}")]
    Compile(String),

    #[error("PDF generation failed: {0}")]
    Pdf(String),

    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Output formats the converter can write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    Pdf,
    Svg,
    Html,
    Typst,
    Markdown,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Svg => "svg",
            ExportFormat::Html => "html",
            ExportFormat::Typst => "typ",
            ExportFormat::Markdown => "md",
        }
    }

    /// Whether the output is text that can go to stdout.
    pub fn is_text(self) -> bool {
        matches!(
            self,
            ExportFormat::Html | ExportFormat::Typst | ExportFormat::Markdown
        )
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExportFormat::Pdf => "PDF",
            ExportFormat::Svg => "SVG",
            ExportFormat::Html => "HTML",
            ExportFormat::Typst => "Typst",
            ExportFormat::Markdown => "Markdown",
        };
        f.write_str(name)
    }
}

/// Result of rendering markdown to SVG pages.
pub struct SvgDocument {
    pub pages: Vec<String>,
    pub width_pt: f64,
    pub height_pt: f64,
}

/// Give `path` the format's extension unless it already has it (any case).
pub fn normalize_output_path(path: &Path, format: ExportFormat) -> PathBuf {
    let wanted = format.extension();
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case(wanted) => path.to_path_buf(),
        _ => path.with_extension(wanted),
    }
}

/// Compile Typst markup to a paged document using the embedded fonts.
pub(crate) fn compile_document(typst_content: String) -> Result<PagedDocument, ExportError> {
    let font_options = TypstKitFontOptions::new()
        .include_embedded_fonts(true)
        .include_system_fonts(false);

    let engine = TypstEngine::builder()
        .main_file(typst_content)
        .search_fonts_with(font_options)
        .build();

    engine
        .compile()
        .output
        .map_err(|e| ExportError::Compile(format!("{:?}", e)))
}

pub(crate) fn document_to_pdf(doc: &PagedDocument) -> Result<Vec<u8>, ExportError> {
    typst_pdf::pdf(doc, &PdfOptions::default()).map_err(|e| ExportError::Pdf(format!("{:?}", e)))
}

pub(crate) fn document_to_svg(doc: &PagedDocument) -> SvgDocument {
    let pages: Vec<String> = doc.pages.iter().map(|page| typst_svg::svg(page)).collect();

    // Get dimensions from first page (assuming all pages same size)
    let (width_pt, height_pt) = if let Some(first_page) = doc.pages.first() {
        let size = first_page.frame.size();
        (size.x.to_pt(), size.y.to_pt())
    } else {
        (595.0, 842.0) // A4 default
    };

    SvgDocument {
        pages,
        width_pt,
        height_pt,
    }
}

fn write_file(path: &Path, contents: impl AsRef<[u8]>) -> Result<(), ExportError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| ExportError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, contents).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("Wrote {}", path.display());
    Ok(())
}

/// Paths for each SVG page: the plain path for one page, `<stem>-<n>.svg` otherwise.
fn svg_page_paths(path: &Path, count: usize) -> Vec<PathBuf> {
    if count == 1 {
        return vec![path.to_path_buf()];
    }
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    (1..=count)
        .map(|n| path.with_file_name(format!("{stem}-{n}.svg")))
        .collect()
}

/// Convert `markdown` and write it to `path` (extension normalized).
///
/// Returns every file written; SVG writes one file per page.
pub fn export_to_path(
    markdown: &str,
    format: ExportFormat,
    path: &Path,
    config: &Config,
) -> Result<Vec<PathBuf>, ExportError> {
    let path = normalize_output_path(path, format);
    log::debug!("Exporting {} to {}", format, path.display());

    match format {
        ExportFormat::Pdf => {
            let bytes = crate::markdown_to_pdf_with_config(markdown, config)?;
            write_file(&path, bytes)?;
            Ok(vec![path])
        }
        ExportFormat::Svg => {
            let doc = crate::markdown_to_svg_with_config(markdown, config)?;
            let paths = svg_page_paths(&path, doc.pages.len());
            for (page, page_path) in doc.pages.iter().zip(&paths) {
                write_file(page_path, page)?;
            }
            Ok(paths)
        }
        ExportFormat::Html => {
            write_file(&path, crate::markdown_to_html_with_config(markdown, config))?;
            Ok(vec![path])
        }
        ExportFormat::Typst => {
            write_file(&path, crate::markdown_to_typst_with_config(markdown, config))?;
            Ok(vec![path])
        }
        ExportFormat::Markdown => {
            write_file(&path, crate::markdown_to_markdown(markdown))?;
            Ok(vec![path])
        }
    }
}
