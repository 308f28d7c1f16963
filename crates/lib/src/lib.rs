//! # bookpipe
//!
//! Fetches a catalogue page, hands the raw HTML to an external scraping
//! collaborator, and decodes the JSON it returns into typed book records.
//!
//! The scraping itself is not done here. A [`Transform`] only moves bytes to
//! the collaborator (a subprocess over stdin/stdout, or an HTTP adapter) and
//! brings the answer back.

pub mod config;
pub mod decode;
pub mod errors;
pub mod fetch;
pub mod pipeline;
pub mod render;
pub mod transform;
pub mod types;

pub use config::{
    get_config, load_config, AppConfig, ConfigError, OutputFormat, TransformConfig,
    TransformKind,
};
pub use decode::{decode_page, select_leading};
pub use errors::PipelineError;
pub use fetch::{catalogue_page_url, PageFetcher, DEFAULT_CATALOGUE_URL};
pub use pipeline::Pipeline;
pub use render::render_books;
pub use transform::{RestTransform, StdinTransform, Transform};
pub use types::{Book, Page};
