//! Renderers for a finished character grid.

use crate::{CharGrid, Result};
use std::io::Write;
use std::path::PathBuf;

pub trait AsciiOutput {
    fn output(&mut self, grid: &CharGrid) -> Result<()>;
}

/// Prints the grid, one line per row.
pub struct ConsoleOutput<W> {
    out: W,
}

impl<W: Write> ConsoleOutput<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> AsciiOutput for ConsoleOutput<W> {
    fn output(&mut self, grid: &CharGrid) -> Result<()> {
        write!(self.out, "{grid}")?;
        self.out.flush()?;
        Ok(())
    }
}

/// Writes the grid to a standalone HTML page in a monospace font.
pub struct HtmlOutput {
    path: PathBuf,
    font_name: String,
}

impl HtmlOutput {
    pub fn new(path: impl Into<PathBuf>, font_name: impl Into<String>) -> Self {
        Self { path: path.into(), font_name: font_name.into() }
    }

    pub fn render(&self, grid: &CharGrid) -> String {
        let mut html = String::new();
        html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
        html.push_str("<title>ASCII Art</title>\n</head>\n<body>\n");
        html.push_str(&format!(
            "<pre style=\"font-family: '{}', monospace; font-size: 4pt; line-height: 1;\">\n",
            escape(&self.font_name)
        ));
        for line in grid.lines() {
            html.push_str(&escape(&line));
            html.push('\n');
        }
        html.push_str("</pre>\n</body>\n</html>\n");
        html
    }
}

impl AsciiOutput for HtmlOutput {
    fn output(&mut self, grid: &CharGrid) -> Result<()> {
        std::fs::write(&self.path, self.render(grid))?;
        log::info!("wrote {}x{} grid to {}", grid.rows(), grid.cols(), self.path.display());
        Ok(())
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}
