//! Processing pipeline components.

mod coordinator;
mod processor;
mod watch;

pub use coordinator::{
    ProcessCheck, ProcessOptions, collect_input_files, missing_path_for, output_dir_for,
    output_path_for, should_process,
};
pub use processor::{ProcessResult, process_file, settings_for};
pub use watch::{WatchUpdate, Watcher};
