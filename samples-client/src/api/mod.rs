pub mod samples;
mod wire;

pub use samples::{SamplesApi, DEFAULT_MAX_PAGES, SAMPLES_PATH, SAMPLE_FIELDS};
pub use wire::{decode_page, Page};
