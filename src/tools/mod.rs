mod binaries;
mod ffprobe_info;
mod file_hasher;
mod path_validator;
mod task_scheduler;
mod video_scanner;

pub use binaries::resolve_binary;
pub use ffprobe_info::{FfprobeProber, FormatInfo, MetadataProbe, ProbeResult, StreamInfo};
pub use file_hasher::{Checksum, calculate_file_hash, calculate_hash};
pub use path_validator::{ensure_directory_exists, validate_path_exists};
pub use task_scheduler::{DispatchSummary, Dispatcher, TaskOutcome, TaskQueue};
pub use video_scanner::{VideoFileInfo, scan_video_files};
