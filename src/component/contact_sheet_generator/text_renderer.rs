use crate::error::ComposeError;
use ab_glyph::{FontRef, PxScale};
use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_text_mut;

/// DejaVu Sans Mono, embedded at compile time
const FONT_DATA: &[u8] = include_bytes!("../../../assets/DejaVuSansMono.ttf");

pub const BACKGROUND_COLOR: Rgba<u8> = Rgba([0xE0, 0xEB, 0xF5, 0xFF]);
pub const TEXT_COLOR: Rgba<u8> = Rgba([0x00, 0x00, 0x00, 0xFF]);

/// Parsed font and fill colours. Built once and shared read-only by all workers.
pub struct RenderResources {
    font: FontRef<'static>,
    pub background: Rgba<u8>,
    pub text_color: Rgba<u8>,
}

impl RenderResources {
    pub fn new() -> Result<Self, ComposeError> {
        let font = FontRef::try_from_slice(FONT_DATA).map_err(|_| ComposeError::Font)?;
        Ok(Self {
            font,
            background: BACKGROUND_COLOR,
            text_color: TEXT_COLOR,
        })
    }

    #[must_use]
    pub const fn font(&self) -> &FontRef<'static> {
        &self.font
    }
}

/// Monospace line style: every glyph advances by `font_size * advance_ratio`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub font_size: f32,
    pub advance_ratio: f32,
}

impl TextStyle {
    #[must_use]
    pub fn advance(&self) -> f32 {
        self.font_size * self.advance_ratio
    }

    /// Left edge of each character of `text` when the line starts at `x`.
    pub fn glyph_offsets(&self, text: &str, x: i32) -> impl Iterator<Item = (i32, char)> {
        let advance = self.advance();
        text.chars()
            .enumerate()
            .map(move |(i, ch)| (x + (i as f32 * advance).round() as i32, ch))
    }
}

/// Draws one left-aligned line with its top-left corner at `(x, y)`.
pub fn draw_line(
    canvas: &mut RgbaImage,
    resources: &RenderResources,
    style: TextStyle,
    x: i32,
    y: i32,
    text: &str,
) {
    let scale = PxScale::from(style.font_size);
    let mut buffer = [0u8; 4];
    for (glyph_x, ch) in style.glyph_offsets(text, x) {
        if ch.is_whitespace() {
            continue;
        }
        draw_text_mut(
            canvas,
            resources.text_color,
            glyph_x,
            y,
            scale,
            resources.font(),
            ch.encode_utf8(&mut buffer),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STYLE: TextStyle = TextStyle {
        font_size: 40.0,
        advance_ratio: 0.5,
    };

    #[test]
    fn test_embedded_font_loads() {
        assert!(RenderResources::new().is_ok());
    }

    #[test]
    fn test_glyph_offsets() {
        let offsets: Vec<_> = STYLE.glyph_offsets("ab c", 10).collect();
        assert_eq!(offsets, vec![(10, 'a'), (30, 'b'), (50, ' '), (70, 'c')]);

        // one advance per char, not per byte
        let offsets: Vec<_> = STYLE.glyph_offsets("éé", 0).collect();
        assert_eq!(offsets, vec![(0, 'é'), (20, 'é')]);
    }

    #[test]
    fn test_draw_line_marks_pixels_inside_line_box() {
        let resources = RenderResources::new().unwrap();
        let mut canvas = RgbaImage::from_pixel(200, 60, BACKGROUND_COLOR);

        draw_line(&mut canvas, &resources, STYLE, 5, 5, "HI");

        let changed: Vec<_> = canvas
            .enumerate_pixels()
            .filter(|(_, _, p)| **p != BACKGROUND_COLOR)
            .map(|(x, _, _)| x)
            .collect();
        assert!(!changed.is_empty());
        let line_end = 5 + (2.0 * STYLE.advance()) as u32;
        assert!(changed.iter().all(|&x| x < line_end + 20));
    }

    #[test]
    fn test_draw_line_clips_at_canvas_edge() {
        let resources = RenderResources::new().unwrap();
        let mut canvas = RgbaImage::from_pixel(30, 30, BACKGROUND_COLOR);
        draw_line(&mut canvas, &resources, STYLE, 0, 0, "a very long line of text");
    }
}
