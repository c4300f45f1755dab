//! ML inference using Candle.
//!
//! Provides device selection, safetensors loading and the `EmotionNet`
//! classifier.

mod device;
mod emotion_net;
mod loader;

pub use device::{select_device, DevicePreference};
pub use emotion_net::EmotionNet;
pub use loader::{load_safetensors, LazyModel};
