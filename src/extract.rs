use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

pub const CODE_MARKER: &str = "### CODE CELL ###";
pub const MARKDOWN_MARKER: &str = "### MARKDOWN CELL ###";

// nbformat v4 document, reduced to the fields the extraction needs.
#[derive(Debug, Deserialize)]
struct Notebook {
    cells: Vec<Cell>,
}

#[derive(Debug, Deserialize)]
struct Cell {
    cell_type: String,
    #[serde(default)]
    source: CellSource,
}

// Cell sources are either one string or a list of line strings, each line
// carrying its own trailing newline.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CellSource {
    Text(String),
    Lines(Vec<String>),
}

impl Default for CellSource {
    fn default() -> Self {
        CellSource::Text(String::new())
    }
}

impl CellSource {
    fn as_text(&self) -> String {
        match self {
            CellSource::Text(s) => s.clone(),
            CellSource::Lines(lines) => lines.concat(),
        }
    }
}

/// Reads a notebook document and returns the type-tagged concatenation of
/// its cells: section marker, newline, cell source verbatim, blank line.
/// Cell order is preserved; cells that are neither code nor markdown are
/// skipped.
pub fn extract_notebook(path: &Path) -> Result<String> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read notebook: {:?}", path))?;
    let notebook: Notebook = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse notebook document: {:?}", path))?;

    Ok(render_cells(&notebook.cells))
}

fn render_cells(cells: &[Cell]) -> String {
    let mut text = String::new();
    for cell in cells {
        let marker = match cell.cell_type.as_str() {
            "code" => CODE_MARKER,
            "markdown" => MARKDOWN_MARKER,
            _ => continue,
        };
        text.push_str(marker);
        text.push('\n');
        text.push_str(&cell.source.as_text());
        text.push_str("\n\n");
    }
    text
}

/// Extracts the notebook at `notebook` into a UTF-8 text file at `output`,
/// truncating any prior content. The blob is assembled in memory first, so
/// a failed read leaves no partial output behind.
pub fn run(notebook: &Path, output: &Path) -> Result<()> {
    println!("Extracting notebook {:?}...", notebook);
    let text = extract_notebook(notebook)?;
    fs::write(output, &text)
        .with_context(|| format!("Failed to write text dump: {:?}", output))?;
    Ok(())
}
