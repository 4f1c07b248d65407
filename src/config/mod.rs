pub mod load;
pub mod save;
pub mod types;

pub use save::save_settings;
pub use types::{
    Config, DEFAULT_FRAME_COUNT, DEFAULT_FRAME_WIDTH, DEFAULT_FRAMES_PER_ROW, SETTINGS_FILE,
    SheetSettings, VideoExtensionTable, VideoExtensions, default_worker_count,
};
