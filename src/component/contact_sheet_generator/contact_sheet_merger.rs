use super::grid_layout::GridGeometry;
use super::text_renderer::{RenderResources, TextStyle, draw_line};
use super::thumbnail_extractor::SampledFrame;
use super::timestamp_selector::stamp_to_string;
use super::video::VideoDescriptor;
use crate::error::ComposeError;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbaImage, imageops};
use log::debug;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub const GUTTER_SIZE: u32 = 20;
pub const HEADER_SIZE: u32 = 200;

pub const FONT_SIZE: f32 = 40.0;
pub const ADVANCE_RATIO: f32 = 0.63;

const TEXT_MARGIN: i32 = 10;
const LINE_SPACING: f32 = 1.25;

/// Fixed sheet parameters, everything except the tile size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SheetLayout {
    pub frame_count: usize,
    pub frames_per_row: usize,
    pub gutter: u32,
    pub header_height: u32,
    pub text: TextStyle,
}

impl SheetLayout {
    #[must_use]
    pub const fn new(frame_count: usize, frames_per_row: usize) -> Self {
        Self {
            frame_count,
            frames_per_row,
            gutter: GUTTER_SIZE,
            header_height: HEADER_SIZE,
            text: TextStyle {
                font_size: FONT_SIZE,
                advance_ratio: ADVANCE_RATIO,
            },
        }
    }

    #[must_use]
    pub fn geometry(&self, tile_width: u32, tile_height: u32) -> GridGeometry {
        GridGeometry::new(
            self.frame_count,
            self.frames_per_row,
            tile_width,
            tile_height,
            self.gutter,
            self.header_height,
        )
    }
}

/// A composed sheet, ready to encode.
#[derive(Debug, Clone)]
pub struct ContactSheet {
    pub geometry: GridGeometry,
    pub image: RgbaImage,
}

impl ContactSheet {
    pub fn write_png(&self, writer: impl Write) -> Result<(), ComposeError> {
        PngEncoder::new(writer).write_image(
            self.image.as_raw(),
            self.image.width(),
            self.image.height(),
            ExtendedColorType::Rgba8,
        )?;
        Ok(())
    }

    pub fn encode_png(&self) -> Result<Vec<u8>, ComposeError> {
        let mut bytes = Vec::new();
        self.write_png(&mut bytes)?;
        Ok(bytes)
    }

    pub fn save(&self, path: &Path) -> Result<(), ComposeError> {
        let io_error = |source| ComposeError::Io {
            path: path.to_path_buf(),
            source,
        };

        let file = File::create(path).map_err(io_error)?;
        let mut writer = BufWriter::new(file);
        self.write_png(&mut writer)?;
        writer.flush().map_err(io_error)?;
        Ok(())
    }
}

/// The three header lines: filename, checksum, duration and dimensions.
#[must_use]
pub fn header_lines(video: &VideoDescriptor) -> [String; 3] {
    [
        video.filename.clone(),
        format!("SHA1: {}", video.checksum.hex()),
        format!(
            "Duration: {}, Dimensions: {}x{}",
            stamp_to_string(video.duration),
            video.width,
            video.height
        ),
    ]
}

/// Assembles sampled frames and header text into a contact sheet.
pub struct SheetComposer<'a> {
    resources: &'a RenderResources,
    layout: SheetLayout,
}

impl<'a> SheetComposer<'a> {
    #[must_use]
    pub const fn new(resources: &'a RenderResources, layout: SheetLayout) -> Self {
        Self { resources, layout }
    }

    /// Refuses to compose unless every index has exactly one frame and all
    /// frames share the first frame's dimensions.
    pub fn compose(
        &self,
        video: &VideoDescriptor,
        frames: &[SampledFrame],
    ) -> Result<ContactSheet, ComposeError> {
        let ordered = order_frames(frames, self.layout.frame_count)?;
        let (tile_width, tile_height) = ordered[0].image.dimensions();

        for frame in &ordered[1..] {
            let (width, height) = frame.image.dimensions();
            if (width, height) != (tile_width, tile_height) {
                return Err(ComposeError::DimensionMismatch {
                    index: frame.index,
                    expected_width: tile_width,
                    expected_height: tile_height,
                    found_width: width,
                    found_height: height,
                });
            }
        }

        let geometry = self.layout.geometry(tile_width, tile_height);
        debug!(
            "{}: sheet {}x{} ({} rows)",
            video.filename, geometry.sheet_width, geometry.sheet_height, geometry.rows
        );

        let mut canvas = RgbaImage::from_pixel(
            geometry.sheet_width,
            geometry.sheet_height,
            self.resources.background,
        );

        self.draw_header(&mut canvas, video);

        for frame in ordered {
            let (x, y) = geometry.tile_origin(frame.index);
            imageops::replace(&mut canvas, &frame.image, i64::from(x), i64::from(y));
        }

        Ok(ContactSheet {
            geometry,
            image: canvas,
        })
    }

    fn draw_header(&self, canvas: &mut RgbaImage, video: &VideoDescriptor) {
        let style = self.layout.text;
        let line_height = style.font_size * LINE_SPACING;

        for (i, line) in header_lines(video).iter().enumerate() {
            let y = TEXT_MARGIN + (i as f32 * line_height) as i32;
            draw_line(canvas, self.resources, style, TEXT_MARGIN, y, line);
        }
    }
}

/// Slots frames by index; every index in `0..expected` must be filled once.
fn order_frames(
    frames: &[SampledFrame],
    expected: usize,
) -> Result<Vec<&SampledFrame>, ComposeError> {
    if expected == 0 {
        return Err(ComposeError::Empty);
    }

    let mut slots: Vec<Option<&SampledFrame>> = vec![None; expected];
    for frame in frames {
        match slots.get_mut(frame.index) {
            Some(slot) if slot.is_none() => *slot = Some(frame),
            _ => {
                return Err(ComposeError::UnexpectedFrame {
                    index: frame.index,
                    expected,
                });
            }
        }
    }

    slots
        .into_iter()
        .enumerate()
        .map(|(index, slot)| slot.ok_or(ComposeError::MissingFrame { index }))
        .collect()
}
