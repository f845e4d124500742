//! Interactive command loop: edit the character set, change resolution and
//! render the image.

use crate::charset::parse_range;
use crate::output::{AsciiOutput, ConsoleOutput, HtmlOutput};
use crate::padded::prev_power_of_two;
use crate::{AsciiArtError, BrightnessMatcher, CharSet, GlyphRasterizer, PaddedImage, Result};
use std::io::{BufRead, Write};

pub const INITIAL_COLUMNS: u32 = 64;
/// Narrowest tile side the shell allows
const MIN_PIXELS_PER_CHAR: u32 = 2;

const PROMPT: &str = ">>> ";
const WRONG_COMMAND: &str = "Did not execute due to incorrect command";
const BAD_ADD: &str = "Did not add due to incorrect format";
const BAD_REMOVE: &str = "Did not remove due to incorrect format";
const BAD_RESOLUTION: &str = "Did not change due to exceeding boundaries";
const EMPTY_CHARS: &str = "Did not render due to empty character set";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Html,
    Console,
}

pub struct Shell<R, W> {
    image: PaddedImage,
    matcher: BrightnessMatcher<R>,
    chars: CharSet,
    min_columns: u32,
    max_columns: u32,
    columns: u32,
    target: Target,
    html: HtmlOutput,
    out: W,
}

impl<R: GlyphRasterizer, W: Write> Shell<R, W> {
    pub fn new(image: PaddedImage, matcher: BrightnessMatcher<R>, html: HtmlOutput, out: W) -> Self {
        let min_columns = (image.width() / image.height()).max(1);
        let max_columns = image.width() / MIN_PIXELS_PER_CHAR;
        let mut shell = Self {
            image,
            matcher,
            chars: CharSet::digits(),
            min_columns,
            max_columns,
            columns: min_columns,
            target: Target::Html,
            html,
            out,
        };
        shell.columns = shell.clamp_columns(INITIAL_COLUMNS);
        shell
    }

    /// Start at `columns`, clamped to the allowed range and rounded down to
    /// a power of two so tiles divide the image exactly
    pub fn with_columns(mut self, columns: u32) -> Self {
        self.columns = prev_power_of_two(self.clamp_columns(columns));
        self
    }

    pub fn with_chars(mut self, chars: CharSet) -> Self {
        self.chars = chars;
        self
    }

    pub fn columns(&self) -> u32 {
        self.columns
    }

    pub fn chars(&self) -> &CharSet {
        &self.chars
    }

    pub fn target(&self) -> Target {
        self.target
    }

    pub fn into_output(self) -> W {
        self.out
    }

    fn clamp_columns(&self, columns: u32) -> u32 {
        columns.min(self.max_columns).max(self.min_columns)
    }

    /// Read commands until `exit` or end of input.
    pub fn run(&mut self, mut input: impl BufRead) -> Result<()> {
        let mut line = String::new();
        loop {
            write!(self.out, "{PROMPT}")?;
            self.out.flush()?;

            line.clear();
            if input.read_line(&mut line)? == 0 {
                writeln!(self.out)?;
                return Ok(());
            }
            let words: Vec<&str> = line.split_whitespace().collect();
            let Some(&command) = words.first() else {
                continue;
            };

            match command {
                "exit" if words.len() == 1 => return Ok(()),
                "chars" if words.len() == 1 => writeln!(self.out, "{}", self.chars)?,
                "add" if words.len() == 2 => self.add(words[1])?,
                "remove" if words.len() == 2 => self.remove(words[1])?,
                "res" if words.len() == 2 => self.change_resolution(words[1])?,
                "console" if words.len() == 1 => self.target = Target::Console,
                "render" if words.len() == 1 => self.render()?,
                _ => {
                    log::warn!("rejected command {:?}", line.trim_end());
                    writeln!(self.out, "{WRONG_COMMAND}")?;
                }
            }
        }
    }

    fn add(&mut self, spec: &str) -> Result<()> {
        match parse_range(spec) {
            Some(range) => self.chars.add_range(range),
            None => writeln!(self.out, "{BAD_ADD}")?,
        }
        Ok(())
    }

    fn remove(&mut self, spec: &str) -> Result<()> {
        match parse_range(spec) {
            Some(range) => self.chars.remove_range(range),
            None => writeln!(self.out, "{BAD_REMOVE}")?,
        }
        Ok(())
    }

    fn change_resolution(&mut self, direction: &str) -> Result<()> {
        let columns = match direction {
            "up" => self.columns.saturating_mul(2),
            "down" => self.columns / 2,
            _ => {
                writeln!(self.out, "{WRONG_COMMAND}")?;
                return Ok(());
            }
        };
        if columns < self.min_columns || columns > self.max_columns {
            writeln!(self.out, "{BAD_RESOLUTION}")?;
        } else {
            self.columns = columns;
            writeln!(self.out, "Width set to {columns}")?;
        }
        Ok(())
    }

    fn render(&mut self) -> Result<()> {
        let grid = match self.matcher.choose_chars(&self.image, self.columns, &self.chars) {
            Ok(grid) => grid,
            Err(AsciiArtError::EmptyCharSet) => {
                writeln!(self.out, "{EMPTY_CHARS}")?;
                return Ok(());
            }
            Err(e) => {
                log::warn!("render failed: {e}");
                writeln!(self.out, "Did not render: {e}")?;
                return Ok(());
            }
        };
        match self.target {
            Target::Console => ConsoleOutput::new(&mut self.out).output(&grid),
            Target::Html => {
                if let Err(e) = self.html.output(&grid) {
                    log::warn!("html output failed: {e}");
                    writeln!(self.out, "Did not render: {e}")?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GlyphBitmap;
    use image::{Rgb, RgbImage};
    use std::path::Path;

    /// Density grows with the code point
    struct CodeRasterizer;

    impl GlyphRasterizer for CodeRasterizer {
        fn rasterize(&self, ch: char, resolution: u32) -> Result<GlyphBitmap> {
            let rows = ch as u32 % (resolution + 1);
            Ok(GlyphBitmap::from_fn(resolution, |_, y| y < rows))
        }
    }

    fn shell(dir: &Path, width: u32, height: u32) -> Shell<CodeRasterizer, Vec<u8>> {
        let img = RgbImage::from_pixel(width, height, Rgb([0, 0, 0]));
        let image = PaddedImage::normalize(&img).unwrap();
        let html = HtmlOutput::new(dir.join("out.html"), "Courier New");
        Shell::new(image, BrightnessMatcher::new(CodeRasterizer), html, Vec::new())
    }

    fn run(mut shell: Shell<CodeRasterizer, Vec<u8>>, script: &str) -> (String, Shell<CodeRasterizer, Vec<u8>>) {
        shell.run(script.as_bytes()).unwrap();
        let out = String::from_utf8(std::mem::take(&mut shell.out)).unwrap();
        (out.replace(PROMPT, ""), shell)
    }

    #[test]
    fn initial_columns_are_clamped() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(shell(dir.path(), 256, 256).columns(), 64);
        assert_eq!(shell(dir.path(), 32, 32).columns(), 16);
        // wide image: min = 64 / 2
        assert_eq!(shell(dir.path(), 64, 2).with_columns(1).columns(), 32);
    }

    #[test]
    fn requested_columns_round_down_to_power_of_two() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(shell(dir.path(), 256, 256).with_columns(50).columns(), 32);
        assert_eq!(shell(dir.path(), 256, 256).with_columns(1000).columns(), 128);
        assert_eq!(shell(dir.path(), 256, 256).with_columns(0).columns(), 1);

        // every rendered line is exactly `columns` wide
        for (side, requested, expected) in [(16, 5, 4), (256, 50, 32)] {
            let sh = shell(dir.path(), side, side).with_columns(requested);
            let columns = sh.columns() as usize;
            assert_eq!(columns, expected);
            let (out, _) = run(sh, "console\nrender\nexit\n");
            let lines: Vec<&str> = out.lines().collect();
            assert_eq!(lines.len(), columns);
            assert!(lines.iter().all(|l| l.chars().count() == columns));
        }
    }

    #[test]
    fn chars_add_remove() {
        let dir = tempfile::tempdir().unwrap();
        let script = "remove all\nadd a-c\nadd space\nchars\nremove b\nchars\n";
        let (out, sh) = run(shell(dir.path(), 8, 8), script);
        assert_eq!(out, "  a b c\n  a c\n\n");
        assert_eq!(sh.chars().len(), 3);
    }

    #[test]
    fn bad_formats_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        let (out, _) = run(shell(dir.path(), 8, 8), "add ab\nremove a+b\nadd\nbogus\nexit\n");
        assert_eq!(out, format!("{BAD_ADD}\n{BAD_REMOVE}\n{WRONG_COMMAND}\n{WRONG_COMMAND}\n"));
    }

    #[test]
    fn resolution_bounds() {
        let dir = tempfile::tempdir().unwrap();
        // 8x8: min 1, max 4, starts at 4
        let script = "res up\nres down\nres down\nres down\nres down\nres sideways\n";
        let (out, sh) = run(shell(dir.path(), 8, 8), script);
        assert_eq!(
            out,
            format!(
                "{BAD_RESOLUTION}\nWidth set to 2\nWidth set to 1\n{BAD_RESOLUTION}\n{BAD_RESOLUTION}\n{WRONG_COMMAND}\n\n"
            )
        );
        assert_eq!(sh.columns(), 1);
    }

    #[test]
    fn console_render_prints_grid() {
        let dir = tempfile::tempdir().unwrap();
        // black image -> densest char everywhere
        let (out, sh) = run(shell(dir.path(), 4, 4), "remove all\nadd 0-1\nconsole\nrender\nexit\n");
        assert_eq!(sh.target(), Target::Console);
        assert_eq!(out, "11\n11\n");
    }

    #[test]
    fn html_render_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        // 8x8 starts at 4 columns -> 4x4 grid
        let (out, sh) = run(shell(dir.path(), 8, 8), "remove all\nadd 0-1\nrender\nexit\n");
        assert_eq!(sh.target(), Target::Html);
        assert_eq!(out, "");

        let html = std::fs::read_to_string(dir.path().join("out.html")).unwrap();
        let body = html.split("<pre").nth(1).unwrap();
        let body = &body[body.find('\n').unwrap() + 1..body.find("</pre>").unwrap()];
        assert_eq!(body, "1111\n1111\n1111\n1111\n");
    }

    #[test]
    fn html_failure_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let img = PaddedImage::normalize(&RgbImage::from_pixel(4, 4, Rgb([0, 0, 0]))).unwrap();
        // parent directory does not exist
        let html = HtmlOutput::new(dir.path().join("missing").join("out.html"), "Courier New");
        let sh = Shell::new(img, BrightnessMatcher::new(CodeRasterizer), html, Vec::new());
        let (out, _) = run(sh, "render\nexit\n");
        assert!(out.starts_with("Did not render: IO error"), "{out}");
    }

    #[test]
    fn empty_set_does_not_render() {
        let dir = tempfile::tempdir().unwrap();
        let (out, _) = run(shell(dir.path(), 4, 4), "remove all\nconsole\nrender\nexit\n");
        assert_eq!(out, format!("{EMPTY_CHARS}\n"));
    }

    #[test]
    fn blank_lines_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let (out, _) = run(shell(dir.path(), 4, 4), "\n   \nexit\n");
        assert_eq!(out, "");
    }
}
