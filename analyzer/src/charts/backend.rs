//! Plotters drawing backend that writes PDF content-stream operators.
//!
//! Coordinates arrive in plotters' pixel space (origin top-left, y down) and
//! are emitted in PDF user space (origin bottom-left, y up), one pixel per
//! point. Text is set in the standard Helvetica font registered as `/F1` by
//! the exporter. Translucent colors are pre-blended against a white page.

use std::fmt::Write;

use plotters_backend::text_anchor::{HPos, VPos};
use plotters_backend::{
    BackendColor, BackendCoord, BackendStyle, BackendTextStyle, DrawingBackend, DrawingErrorKind,
    FontTransform,
};

/// Name of the page font resource the content stream refers to.
pub const FONT_RESOURCE: &str = "F1";

/// Average Helvetica glyph advance, as a fraction of the font size.
const GLYPH_ADVANCE: f64 = 0.52;

/// Bezier handle length for a quarter circle.
const KAPPA: f64 = 0.552_284_749_8;

type DrawResult = Result<(), DrawingErrorKind<std::fmt::Error>>;

/// Writes the drawing into a borrowed buffer as PDF operators.
pub struct PdfBackend<'a> {
    ops: &'a mut String,
    size: (u32, u32),
}

impl<'a> PdfBackend<'a> {
    pub fn new(ops: &'a mut String, size: (u32, u32)) -> Self {
        Self { ops, size }
    }

    fn y(&self, y: i32) -> f64 {
        f64::from(self.size.1) - f64::from(y)
    }

    fn set_fill(&mut self, color: BackendColor) -> Result<(), std::fmt::Error> {
        let (r, g, b) = blend(color);
        writeln!(self.ops, "{:.3} {:.3} {:.3} rg", r, g, b)
    }

    fn set_stroke(&mut self, color: BackendColor, width: u32) -> Result<(), std::fmt::Error> {
        let (r, g, b) = blend(color);
        writeln!(self.ops, "{:.3} {:.3} {:.3} RG {} w", r, g, b, width.max(1))
    }

    fn path(&mut self, points: &[BackendCoord]) -> Result<(), std::fmt::Error> {
        for (i, &(x, y)) in points.iter().enumerate() {
            let op = if i == 0 { "m" } else { "l" };
            let y = self.y(y);
            writeln!(self.ops, "{} {:.2} {}", x, y, op)?;
        }
        Ok(())
    }
}

/// Mix a translucent color with white; PDF operators here are opaque.
fn blend(color: BackendColor) -> (f64, f64, f64) {
    let alpha = color.alpha.clamp(0.0, 1.0);
    let mix = |c: u8| (f64::from(c) * alpha + 255.0 * (1.0 - alpha)) / 255.0;
    (mix(color.rgb.0), mix(color.rgb.1), mix(color.rgb.2))
}

/// Escape text for a PDF literal string; non-Latin characters become `?`.
pub fn escape_pdf_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '(' | ')' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            ' '..='~' => out.push(c),
            _ => out.push('?'),
        }
    }
    out
}

fn text_width(text: &str, size: f64) -> f64 {
    text.chars().count() as f64 * size * GLYPH_ADVANCE
}

impl DrawingBackend for PdfBackend<'_> {
    type ErrorType = std::fmt::Error;

    fn get_size(&self) -> (u32, u32) {
        self.size
    }

    fn ensure_prepared(&mut self) -> DrawResult {
        Ok(())
    }

    fn present(&mut self) -> DrawResult {
        Ok(())
    }

    fn draw_pixel(&mut self, point: BackendCoord, color: BackendColor) -> DrawResult {
        if color.alpha <= 0.0 {
            return Ok(());
        }
        self.set_fill(color).map_err(DrawingErrorKind::DrawingError)?;
        let (x, y) = (point.0, self.y(point.1) - 1.0);
        writeln!(self.ops, "{} {:.2} 1 1 re f", x, y).map_err(DrawingErrorKind::DrawingError)
    }

    fn draw_line<S: BackendStyle>(
        &mut self,
        from: BackendCoord,
        to: BackendCoord,
        style: &S,
    ) -> DrawResult {
        if style.color().alpha <= 0.0 {
            return Ok(());
        }
        self.set_stroke(style.color(), style.stroke_width())
            .and_then(|_| self.path(&[from, to]))
            .and_then(|_| writeln!(self.ops, "S"))
            .map_err(DrawingErrorKind::DrawingError)
    }

    fn draw_rect<S: BackendStyle>(
        &mut self,
        upper_left: BackendCoord,
        bottom_right: BackendCoord,
        style: &S,
        fill: bool,
    ) -> DrawResult {
        if style.color().alpha <= 0.0 {
            return Ok(());
        }
        let (x0, x1) = (upper_left.0.min(bottom_right.0), upper_left.0.max(bottom_right.0));
        let (top, bottom) = (upper_left.1.min(bottom_right.1), upper_left.1.max(bottom_right.1));
        let (w, h) = (x1 - x0, bottom - top);
        let y = self.y(bottom);

        let result = if fill {
            self.set_fill(style.color())
                .and_then(|_| writeln!(self.ops, "{} {:.2} {} {} re f", x0, y, w.max(1), h.max(1)))
        } else {
            self.set_stroke(style.color(), style.stroke_width())
                .and_then(|_| writeln!(self.ops, "{} {:.2} {} {} re S", x0, y, w, h))
        };
        result.map_err(DrawingErrorKind::DrawingError)
    }

    fn draw_path<S: BackendStyle, I: IntoIterator<Item = BackendCoord>>(
        &mut self,
        path: I,
        style: &S,
    ) -> DrawResult {
        if style.color().alpha <= 0.0 {
            return Ok(());
        }
        let points: Vec<BackendCoord> = path.into_iter().collect();
        if points.len() < 2 {
            return Ok(());
        }
        self.set_stroke(style.color(), style.stroke_width())
            .and_then(|_| writeln!(self.ops, "1 j 1 J"))
            .and_then(|_| self.path(&points))
            .and_then(|_| writeln!(self.ops, "S"))
            .map_err(DrawingErrorKind::DrawingError)
    }

    fn draw_circle<S: BackendStyle>(
        &mut self,
        center: BackendCoord,
        radius: u32,
        style: &S,
        fill: bool,
    ) -> DrawResult {
        if style.color().alpha <= 0.0 {
            return Ok(());
        }
        let (cx, cy) = (f64::from(center.0), self.y(center.1));
        let r = f64::from(radius);
        let k = r * KAPPA;

        let paint = if fill {
            self.set_fill(style.color())
        } else {
            self.set_stroke(style.color(), style.stroke_width())
        };
        let result = paint.and_then(|_| {
            writeln!(self.ops, "{:.2} {:.2} m", cx + r, cy)?;
            // Four quarter arcs, counter-clockwise from the rightmost point
            let arcs = [
                [cx + r, cy + k, cx + k, cy + r, cx, cy + r],
                [cx - k, cy + r, cx - r, cy + k, cx - r, cy],
                [cx - r, cy - k, cx - k, cy - r, cx, cy - r],
                [cx + k, cy - r, cx + r, cy - k, cx + r, cy],
            ];
            for [x1, y1, x2, y2, x3, y3] in arcs {
                writeln!(
                    self.ops,
                    "{:.2} {:.2} {:.2} {:.2} {:.2} {:.2} c",
                    x1, y1, x2, y2, x3, y3
                )?;
            }
            writeln!(self.ops, "{}", if fill { "f" } else { "S" })
        });
        result.map_err(DrawingErrorKind::DrawingError)
    }

    fn fill_polygon<S: BackendStyle, I: IntoIterator<Item = BackendCoord>>(
        &mut self,
        vert: I,
        style: &S,
    ) -> DrawResult {
        if style.color().alpha <= 0.0 {
            return Ok(());
        }
        let points: Vec<BackendCoord> = vert.into_iter().collect();
        if points.len() < 3 {
            return Ok(());
        }
        self.set_fill(style.color())
            .and_then(|_| self.path(&points))
            .and_then(|_| writeln!(self.ops, "h f"))
            .map_err(DrawingErrorKind::DrawingError)
    }

    fn draw_text<TStyle: BackendTextStyle>(
        &mut self,
        text: &str,
        style: &TStyle,
        pos: BackendCoord,
    ) -> DrawResult {
        let color = style.color();
        if color.alpha <= 0.0 || text.is_empty() {
            return Ok(());
        }
        let size = style.size();
        let width = text_width(text, size);

        // Offsets from the anchor to the baseline start, in text-local space
        let along = match style.anchor().h_pos {
            HPos::Left => 0.0,
            HPos::Center => -width / 2.0,
            HPos::Right => -width,
        };
        let down = match style.anchor().v_pos {
            VPos::Top => size * 0.8,
            VPos::Center => size * 0.35,
            VPos::Bottom => -size * 0.2,
        };

        // Text direction and "down" direction in screen space, plus the
        // matching PDF text matrix (y flipped)
        let (dir, below, [a, b, c, d]) = match style.transform() {
            FontTransform::Rotate90 => ((0.0, 1.0), (-1.0, 0.0), [0, -1, 1, 0]),
            FontTransform::Rotate180 => ((-1.0, 0.0), (0.0, -1.0), [-1, 0, 0, -1]),
            FontTransform::Rotate270 => ((0.0, -1.0), (1.0, 0.0), [0, 1, -1, 0]),
            _ => ((1.0, 0.0), (0.0, 1.0), [1, 0, 0, 1]),
        };

        let sx = f64::from(pos.0) + dir.0 * along + below.0 * down;
        let sy = f64::from(pos.1) + dir.1 * along + below.1 * down;
        let (x, y) = (sx, f64::from(self.size.1) - sy);

        self.set_fill(color)
            .and_then(|_| {
                writeln!(
                    self.ops,
                    "BT /{} {:.1} Tf {} {} {} {} {:.2} {:.2} Tm ({}) Tj ET",
                    FONT_RESOURCE,
                    size,
                    a,
                    b,
                    c,
                    d,
                    x,
                    y,
                    escape_pdf_text(text)
                )
            })
            .map_err(DrawingErrorKind::DrawingError)
    }

    fn estimate_text_size<TStyle: BackendTextStyle>(
        &self,
        text: &str,
        style: &TStyle,
    ) -> Result<(u32, u32), DrawingErrorKind<Self::ErrorType>> {
        let size = style.size();
        Ok((text_width(text, size).ceil() as u32, size.ceil() as u32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plotters::prelude::*;

    #[test]
    fn test_escape_pdf_text() {
        assert_eq!(escape_pdf_text("a (b) \\ c"), "a \\(b\\) \\\\ c");
        assert_eq!(escape_pdf_text("Société"), "Soci?t?");
    }

    #[test]
    fn test_blend_alpha() {
        let half = BackendColor { alpha: 0.5, rgb: (0, 0, 0) };
        let (r, g, b) = blend(half);
        assert!((r - 0.5).abs() < 1e-9 && (g - 0.5).abs() < 1e-9 && (b - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_rect_flips_y_axis() {
        let mut ops = String::new();
        {
            let mut backend = PdfBackend::new(&mut ops, (100, 50));
            backend
                .draw_rect((10, 10), (20, 30), &RED.filled(), true)
                .unwrap();
        }
        assert!(ops.contains("1.000 0.000 0.000 rg"));
        assert!(ops.contains("10 20.00 10 20 re f"));
    }

    #[test]
    fn test_text_is_positioned_and_escaped() {
        let mut ops = String::new();
        {
            let root = PdfBackend::new(&mut ops, (200, 100)).into_drawing_area();
            root.draw(&Text::new("Hi (there)", (10, 10), ("sans-serif", 10).into_font()))
                .unwrap();
        }
        assert!(ops.contains("BT /F1 10.0 Tf 1 0 0 1"));
        assert!(ops.contains("(Hi \\(there\\)) Tj ET"));
    }

    #[test]
    fn test_transparent_shapes_skipped() {
        let mut ops = String::new();
        {
            let mut backend = PdfBackend::new(&mut ops, (10, 10));
            backend
                .draw_line((0, 0), (5, 5), &TRANSPARENT)
                .unwrap();
        }
        assert!(ops.is_empty());
    }
}
