//! Port definitions for hexagonal architecture.
//!
//! These traits define the boundaries between the domain core and external adapters.

mod image_source;
mod model;
mod progress;
mod result_output;

pub use image_source::{ImageSource, SourceItem};
pub use model::EmotionModel;
pub use progress::{ProgressEvent, ProgressSink};
pub use result_output::ResultOutput;
