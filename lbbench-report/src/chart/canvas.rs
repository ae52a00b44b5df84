//! RGB Raster Canvas
//!
//! Minimal drawing surface for the chart: pixels, thick lines, filled
//! circles, rectangles and 8×13 bitmap text. Coordinates are signed so shapes
//! may extend past the edges; out-of-bounds pixels are clipped.

use embedded_graphics::mono_font::ascii::FONT_8X13;
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Baseline, Text};

/// Glyph cell width in pixels at scale 1
pub const GLYPH_WIDTH: i64 = 8;

/// Glyph cell height in pixels at scale 1
pub const GLYPH_HEIGHT: i64 = 13;

/// 8-bit RGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Opaque white
    pub const WHITE: Rgb = Rgb(0xff, 0xff, 0xff);
    /// Opaque black
    pub const BLACK: Rgb = Rgb(0x00, 0x00, 0x00);

    /// Colour from a `0xRRGGBB` literal
    pub const fn from_hex(hex: u32) -> Self {
        Rgb((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
    }
}

/// Owned RGB8 pixel buffer
#[derive(Debug, Clone)]
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Canvas {
    /// Create a canvas filled with `background`
    pub fn new(width: u32, height: u32, background: Rgb) -> Self {
        let mut pixels = Vec::with_capacity(width as usize * height as usize * 3);
        for _ in 0..(width as usize * height as usize) {
            pixels.extend_from_slice(&[background.0, background.1, background.2]);
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGB8 bytes, row-major
    pub fn as_raw(&self) -> &[u8] {
        &self.pixels
    }

    fn offset(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return None;
        }
        Some((y as usize * self.width as usize + x as usize) * 3)
    }

    #[cfg(test)]
    fn pixel(&self, x: i64, y: i64) -> Option<Rgb> {
        self.offset(x, y)
            .map(|i| Rgb(self.pixels[i], self.pixels[i + 1], self.pixels[i + 2]))
    }

    /// Set one pixel (clipped)
    pub fn put(&mut self, x: i64, y: i64, color: Rgb) {
        if let Some(i) = self.offset(x, y) {
            self.pixels[i] = color.0;
            self.pixels[i + 1] = color.1;
            self.pixels[i + 2] = color.2;
        }
    }

    /// Fill the inclusive rectangle spanned by two corners
    pub fn fill_rect(&mut self, x0: i64, y0: i64, x1: i64, y1: i64, color: Rgb) {
        let (xa, xb) = (x0.min(x1), x0.max(x1));
        let (ya, yb) = (y0.min(y1), y0.max(y1));
        for y in ya.max(0)..=yb.min(self.height as i64 - 1) {
            for x in xa.max(0)..=xb.min(self.width as i64 - 1) {
                self.put(x, y, color);
            }
        }
    }

    /// One-pixel outline of the rectangle spanned by two corners
    pub fn stroke_rect(&mut self, x0: i64, y0: i64, x1: i64, y1: i64, color: Rgb) {
        self.line(x0, y0, x1, y0, color, 1);
        self.line(x1, y0, x1, y1, color, 1);
        self.line(x1, y1, x0, y1, color, 1);
        self.line(x0, y1, x0, y0, color, 1);
    }

    /// Bresenham line; `thickness` > 1 stamps a square brush at every step
    pub fn line(&mut self, x0: i64, y0: i64, x1: i64, y1: i64, color: Rgb, thickness: u32) {
        let half = thickness.max(1) as i64 / 2;
        let lo = -half;
        let hi = thickness.max(1) as i64 - 1 - half;

        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let (mut x, mut y) = (x0, y0);

        loop {
            for oy in lo..=hi {
                for ox in lo..=hi {
                    self.put(x + ox, y + oy, color);
                }
            }
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Filled disc of radius `r` centred on `(cx, cy)`
    pub fn fill_circle(&mut self, cx: i64, cy: i64, r: i64, color: Rgb) {
        for y in -r..=r {
            for x in -r..=r {
                if x * x + y * y <= r * r {
                    self.put(cx + x, cy + y, color);
                }
            }
        }
    }

    /// Rendered width of `text` at `scale`
    pub fn text_width(text: &str, scale: u32) -> i64 {
        text.chars().count() as i64 * GLYPH_WIDTH * scale as i64
    }

    /// Horizontal text with its top-left corner at `(x, y)`
    pub fn text(&mut self, x: i64, y: i64, text: &str, color: Rgb, scale: u32) {
        let s = scale.max(1) as i64;
        for (mx, my) in TextMask::render(text).lit() {
            let px = x + mx * s;
            let py = y + my * s;
            self.fill_rect(px, py, px + s - 1, py + s - 1, color);
        }
    }

    /// Text rotated 90° counter-clockwise, read bottom to top.
    ///
    /// `(x, y)` is the bottom-left corner of the first glyph.
    pub fn text_vertical(&mut self, x: i64, y: i64, text: &str, color: Rgb, scale: u32) {
        let s = scale.max(1) as i64;
        for (mx, my) in TextMask::render(text).lit() {
            let px = x + my * s;
            let py = y - (mx + 1) * s;
            self.fill_rect(px, py, px + s - 1, py + s - 1, color);
        }
    }

    /// Encode as an 8-bit RGB PNG
    pub fn encode_png(&self) -> Result<Vec<u8>, png::EncodingError> {
        let mut out = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut out, self.width, self.height);
            encoder.set_color(png::ColorType::Rgb);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder.write_header()?;
            writer.write_image_data(&self.pixels)?;
        }
        Ok(out)
    }
}

/// One-bit raster of a text run at scale 1.
///
/// The ASCII font draws anything it has no glyph for as `?`.
struct TextMask {
    width: usize,
    height: usize,
    bits: Vec<bool>,
}

impl TextMask {
    fn render(text: &str) -> Self {
        let width = text.chars().count() * GLYPH_WIDTH as usize;
        let height = GLYPH_HEIGHT as usize;
        let mut mask = Self {
            width,
            height,
            bits: vec![false; width * height],
        };
        let style = MonoTextStyle::new(&FONT_8X13, BinaryColor::On);
        // Drawing into the mask cannot fail
        let _ = Text::with_baseline(text, Point::zero(), style, Baseline::Top).draw(&mut mask);
        mask
    }

    /// Coordinates of every lit pixel
    fn lit(&self) -> impl Iterator<Item = (i64, i64)> + '_ {
        self.bits
            .iter()
            .enumerate()
            .filter_map(|(i, on)| on.then_some(i))
            .map(move |i| ((i % self.width) as i64, (i / self.width) as i64))
    }
}

impl OriginDimensions for TextMask {
    fn size(&self) -> Size {
        Size::new(self.width as u32, self.height as u32)
    }
}

impl DrawTarget for TextMask {
    type Color = BinaryColor;
    type Error = std::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            let (x, y) = (point.x, point.y);
            let inside =
                x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height;
            if color.is_on() && inside {
                self.bits[y as usize * self.width + x as usize] = true;
            }
        }
        Ok(())
    }
}
