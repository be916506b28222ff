//! Processing pipeline components.

mod cleanup;
mod coordinator;
mod processor;

pub use cleanup::{cleanup_intermediates, remove_files};
pub use coordinator::{RunStats, collect_input_tiles, partition_batches, run_batches};
pub use processor::process_batch;
