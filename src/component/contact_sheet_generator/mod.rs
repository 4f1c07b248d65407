//! Contact sheet generation component
//!
//! Per video, on one worker:
//! 1. checksum and ffprobe metadata
//! 2. optional JSON sidecar
//! 3. evenly spaced frames through ffmpeg, one after another
//! 4. header text and tiles composed into one PNG

mod contact_sheet_merger;
mod grid_layout;
mod main;
mod pipeline;
mod text_renderer;
mod thumbnail_extractor;
mod timestamp_selector;
mod video;

pub use contact_sheet_merger::{
    ADVANCE_RATIO, ContactSheet, FONT_SIZE, GUTTER_SIZE, HEADER_SIZE, SheetComposer, SheetLayout,
    header_lines,
};
pub use grid_layout::GridGeometry;
pub use main::{ContactSheetGenerator, GenerationResult};
pub use pipeline::{PipelineOutcome, SkipReason, VideoPipeline};
pub use text_renderer::{BACKGROUND_COLOR, RenderResources, TEXT_COLOR, TextStyle, draw_line};
pub use thumbnail_extractor::{FfmpegDecoder, FrameDecoder, FrameSampler, FrameSet, SampledFrame};
pub use timestamp_selector::{select_timestamps, stamp_to_string};
pub use video::{VideoDescriptor, VideoTask};
