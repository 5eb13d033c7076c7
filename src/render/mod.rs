// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Lofform-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of lofform and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Unicode text rendering for bracket forms.
//!
//! [`TextSurface`] measures every cross in character cells and implements
//! [`RenderSurface`](crate::layout::RenderSurface), so the connector layout runs against it
//! exactly as it would against any other surface. Marks and connectors are then painted onto a
//! [`Canvas`] whose box-drawing characters merge into junctions where lines meet.

use std::fmt;

pub mod form;
mod text;

pub use form::{render_form_unicode, CellBox, TextSurface};

/// Options of the Unicode text surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
    /// Blank cells between neighbouring items of one space.
    pub sibling_gap: usize,
    /// Blank cells left of a cross's items, before any requested inset.
    pub left_padding: usize,
    /// Rows per cell of connector drop; connectors are laid out in cells, and terminal rows
    /// are roughly twice as tall as they are wide.
    pub vertical_scale: f64,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            sibling_gap: 1,
            left_padding: 1,
            vertical_scale: 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct Strokes(u8);

impl Strokes {
    const LEFT: Self = Self(1 << 0);
    const RIGHT: Self = Self(1 << 1);
    const UP: Self = Self(1 << 2);
    const DOWN: Self = Self(1 << 3);

    fn with(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    fn glyph(self) -> Option<char> {
        let glyph = match self.0 {
            0 => return None,
            // Stubs and straight runs.
            0b0001 | 0b0010 | 0b0011 => '─',
            0b0100 | 0b1000 | 0b1100 => '│',
            // Corners.
            0b1010 => '┌',
            0b1001 => '┐',
            0b0110 => '└',
            0b0101 => '┘',
            // Tees.
            0b1110 => '├',
            0b1101 => '┤',
            0b1011 => '┬',
            0b0111 => '┴',
            _ => '┼',
        };
        Some(glyph)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: char,
    strokes: Strokes,
}

/// A fixed-size character grid with line drawing.
///
/// Lines record which neighbours each cell connects to, so strokes that meet render as
/// corners, tees and crossings regardless of drawing order. Text written over a stroke
/// replaces it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Canvas {
    /// Creates a blank canvas.
    pub fn new(width: usize, height: usize) -> Result<Self, CanvasError> {
        let len = width
            .checked_mul(height)
            .filter(|&len| len <= isize::MAX as usize / std::mem::size_of::<Cell>())
            .ok_or(CanvasError::AreaOverflow { width, height })?;

        Ok(Self {
            width,
            height,
            cells: vec![
                Cell {
                    ch: ' ',
                    strokes: Strokes::default(),
                };
                len
            ],
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the character shown at `(x, y)`.
    pub fn get(&self, x: usize, y: usize) -> Result<char, CanvasError> {
        let cell = self.cells[self.index_of(x, y)?];
        Ok(cell.strokes.glyph().unwrap_or(cell.ch))
    }

    /// Writes `text` left-to-right starting at `(x, y)`, clipping at the right edge.
    pub fn write_str(&mut self, x: usize, y: usize, text: &str) -> Result<(), CanvasError> {
        self.index_of(x.min(self.width.saturating_sub(1)), y)?;

        for (x, ch) in (x..self.width).zip(text.chars()) {
            let idx = (y * self.width) + x;
            self.cells[idx] = Cell {
                ch,
                strokes: Strokes::default(),
            };
        }
        Ok(())
    }

    /// Draws a horizontal line over `x0..=x1` at `y`.
    ///
    /// Fails without drawing anything if either end is off the canvas.
    pub fn draw_hline(&mut self, x0: usize, x1: usize, y: usize) -> Result<(), CanvasError> {
        let (min_x, max_x) = (x0.min(x1), x0.max(x1));
        self.index_of(min_x, y)?;
        self.index_of(max_x, y)?;

        for x in min_x..=max_x {
            let mut strokes = Strokes::default();
            if x > min_x {
                strokes = strokes.with(Strokes::LEFT);
            }
            if x < max_x {
                strokes = strokes.with(Strokes::RIGHT);
            }
            self.add_strokes(x, y, strokes);
        }
        Ok(())
    }

    /// Draws a vertical line over `y0..=y1` at `x`.
    ///
    /// Fails without drawing anything if either end is off the canvas.
    pub fn draw_vline(&mut self, x: usize, y0: usize, y1: usize) -> Result<(), CanvasError> {
        let (min_y, max_y) = (y0.min(y1), y0.max(y1));
        self.index_of(x, min_y)?;
        self.index_of(x, max_y)?;

        for y in min_y..=max_y {
            let mut strokes = Strokes::default();
            if y > min_y {
                strokes = strokes.with(Strokes::UP);
            }
            if y < max_y {
                strokes = strokes.with(Strokes::DOWN);
            }
            self.add_strokes(x, y, strokes);
        }
        Ok(())
    }

    /// The canvas as lines with trailing blanks and trailing empty lines removed.
    pub fn to_trimmed_string(&self) -> String {
        text::trimmed_lines(self.rows())
    }

    fn rows(&self) -> impl Iterator<Item = String> + '_ {
        self.cells.chunks(self.width.max(1)).map(|row| {
            row.iter()
                .map(|cell| cell.strokes.glyph().unwrap_or(cell.ch))
                .collect()
        })
    }

    fn add_strokes(&mut self, x: usize, y: usize, strokes: Strokes) {
        let idx = (y * self.width) + x;
        let cell = &mut self.cells[idx];
        cell.strokes = cell.strokes.with(strokes);
    }

    fn index_of(&self, x: usize, y: usize) -> Result<usize, CanvasError> {
        if x >= self.width || y >= self.height {
            return Err(CanvasError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok((y * self.width) + x)
    }
}

impl fmt::Display for Canvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (y, row) in self.rows().enumerate() {
            if y > 0 {
                f.write_str("\n")?;
            }
            f.write_str(&row)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CanvasError {
    AreaOverflow {
        width: usize,
        height: usize,
    },
    OutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },
}

impl fmt::Display for CanvasError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AreaOverflow { width, height } => {
                write!(f, "canvas area overflow: {width}*{height}")
            }
            Self::OutOfBounds {
                x,
                y,
                width,
                height,
            } => write!(f, "out of bounds: ({x},{y}) for {width}x{height} canvas"),
        }
    }
}

impl std::error::Error for CanvasError {}

#[cfg(test)]
mod tests {
    use super::{Canvas, CanvasError};

    #[test]
    fn cross_mark_closes_into_a_corner() {
        let mut c = Canvas::new(4, 2).expect("canvas");
        c.draw_hline(0, 3, 0).expect("bar");
        c.draw_vline(3, 0, 1).expect("stroke");
        c.write_str(1, 1, "a").expect("content");
        assert_eq!(c.to_string(), "───┐\n a │");
    }

    #[test]
    fn connector_hooks_back_under_the_mark() {
        let mut c = Canvas::new(5, 4).expect("canvas");
        c.draw_hline(0, 4, 0).expect("bar");
        c.draw_vline(4, 0, 3).expect("stroke and drop");
        c.draw_hline(1, 4, 3).expect("run");
        c.draw_vline(1, 2, 3).expect("rise");
        assert_eq!(c.to_string(), "────┐\n    │\n │  │\n └──┘");
    }

    #[test]
    fn crossing_lines_merge_regardless_of_order() {
        let mut first = Canvas::new(3, 3).expect("canvas");
        first.draw_hline(0, 2, 1).expect("h");
        first.draw_vline(1, 0, 2).expect("v");

        let mut second = Canvas::new(3, 3).expect("canvas");
        second.draw_vline(1, 0, 2).expect("v");
        second.draw_hline(0, 2, 1).expect("h");

        assert_eq!(first.to_string(), " │ \n─┼─\n │ ");
        assert_eq!(first, second);
    }

    #[test]
    fn tees_where_a_line_ends_on_another() {
        let mut c = Canvas::new(3, 3).expect("canvas");
        c.draw_vline(0, 0, 2).expect("v");
        c.draw_hline(0, 2, 1).expect("h");
        assert_eq!(c.to_string(), "│  \n├──\n│  ");
    }

    #[test]
    fn write_str_clips_and_replaces_strokes() {
        let mut c = Canvas::new(4, 1).expect("canvas");
        c.draw_hline(0, 3, 0).expect("h");
        c.write_str(2, 0, "abcdef").expect("write");
        assert_eq!(c.to_string(), "──ab");
    }

    #[test]
    fn out_of_bounds_line_draws_nothing() {
        let mut c = Canvas::new(3, 2).expect("canvas");
        let err = c.draw_hline(1, 3, 0).expect_err("off canvas");
        assert_eq!(
            err,
            CanvasError::OutOfBounds {
                x: 3,
                y: 0,
                width: 3,
                height: 2
            }
        );
        assert_eq!(c.to_string(), "   \n   ");
    }

    #[test]
    fn rejects_area_overflow() {
        let err = Canvas::new(usize::MAX, 2).expect_err("overflow");
        assert_eq!(
            err,
            CanvasError::AreaOverflow {
                width: usize::MAX,
                height: 2
            }
        );

        let err = Canvas::new(usize::MAX / 2, 1).expect_err("unallocatable");
        assert_eq!(
            err,
            CanvasError::AreaOverflow {
                width: usize::MAX / 2,
                height: 1
            }
        );
    }

    #[test]
    fn trimmed_string_drops_trailing_blanks() {
        let mut c = Canvas::new(4, 3).expect("canvas");
        c.write_str(0, 0, "ab").expect("write");
        assert_eq!(c.to_trimmed_string(), "ab");
    }
}
