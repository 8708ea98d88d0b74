//! # Download Pipeline
//!
//! Turns a list of [`AudioItem`](crate::types::AudioItem)s into MP3 files:
//!
//! 1. **File name**: `"{artist} - {title}.mp3"` inside the download directory
//! 2. **Skip check**: an existing file is never downloaded again, so running
//!    the pipeline twice over the same list downloads nothing the second time
//! 3. **Streaming**: the response body is copied to disk chunk by chunk as it
//!    arrives, a track is never held in memory as a whole
//! 4. **Cleanup**: a write or stream error removes the partial file and is
//!    reported for that track only
//!
//! Downloads either run one after another or in fixed-size batches that are
//! awaited as a whole before the next batch starts. There is no retry,
//! timeout or cancellation; a hung request stalls the run.

mod pipeline;

pub use pipeline::{Downloader, file_name};
