//! Test support utilities for emorec.
//!
//! Provides mocks, synthetic image builders, and deterministic model weight
//! files for testing the emotion pipeline and the CLI.
//!
//! # Example
//!
//! ```
//! use emorec_test_support::{FixedScoresModel, MockImageSource, SyntheticImageBuilder};
//!
//! // Create synthetic test images
//! let face = SyntheticImageBuilder::face(96);
//! let gray = SyntheticImageBuilder::gray(64, 64, 128);
//!
//! // Create mock image source and a model that always predicts happiness
//! let source = MockImageSource::new(vec![face, gray]);
//! let model = FixedScoresModel::favoring(3, 0.6);
//! ```

mod builders;
mod mocks;
mod weights;

pub use builders::{encode_png, write_image, SyntheticImageBuilder};
pub use mocks::{
    FailingModel, FixedScoresModel, MockImageSource, MockProgressSink, MockResultOutput,
};
pub use weights::{
    emotion_net_weights, write_biased_weights, write_uniform_weights, write_weights,
};
