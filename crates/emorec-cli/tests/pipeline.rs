//! Pipeline integration tests using synthetic images.
//!
//! Drives the library pipeline end to end: generated weights on disk,
//! a real `EmotionNet`, and programmatically generated faces.

#![allow(clippy::unwrap_used, clippy::float_cmp)]

use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

use emorec_core::inference::{select_device, DevicePreference, EmotionNet, LazyModel};
use emorec_core::{
    Emotion, EmotionPipeline, InferenceError, PipelineError, Preprocessor, ResizeFilter,
};
use emorec_test_support::{
    encode_png, write_biased_weights, write_uniform_weights, SyntheticImageBuilder,
};
use tempfile::TempDir;

const HAPPINESS: usize = 3;

fn weights(happy: bool) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("emotion-net.safetensors");
    if happy {
        write_biased_weights(&path, HAPPINESS).unwrap();
    } else {
        write_uniform_weights(&path).unwrap();
    }
    (dir, path)
}

fn load(happy: bool) -> (TempDir, EmotionPipeline<EmotionNet>) {
    let (dir, path) = weights(happy);
    let device = select_device(DevicePreference::Cpu);
    let net = EmotionNet::load(&path, &device).unwrap();
    (dir, EmotionPipeline::new(net))
}

#[test]
fn test_uniform_network_on_face() {
    let (_dir, pipeline) = load(false);
    let face = SyntheticImageBuilder::face(128);

    let prediction = pipeline.classify(&face).unwrap();
    assert_eq!(prediction.emotion, Emotion::Anger);
    assert!((prediction.score - 1.0 / 7.0).abs() < 1e-4);
    assert_eq!(prediction.percent(), "14%");
}

#[test]
fn test_biased_network_on_many_shapes() {
    let (_dir, pipeline) = load(true);
    let images = [
        SyntheticImageBuilder::face(48),
        SyntheticImageBuilder::face(300),
        SyntheticImageBuilder::gray(40, 90, 128),
        SyntheticImageBuilder::checkerboard(64, 32, 4),
        SyntheticImageBuilder::rgba_uniform(20, 20, [255, 0, 0, 0]),
    ];

    for image in &images {
        let prediction = pipeline.classify(image).unwrap();
        assert_eq!(prediction.emotion, Emotion::Happiness, "{}", image.path);
        assert_eq!(prediction.emoji, "😀");
        assert_eq!(prediction.percent(), "96%");
    }
}

#[test]
fn test_classify_bytes_matches_decoded() {
    let (_dir, pipeline) = load(true);
    let face = SyntheticImageBuilder::face(64);
    let png = encode_png(&face).unwrap();

    let from_bytes = pipeline.classify_bytes(&png).unwrap();
    let from_image = pipeline.classify(&face).unwrap();
    assert_eq!(from_bytes.emotion, from_image.emotion);
    assert_eq!(from_bytes.score, from_image.score);
}

#[test]
fn test_undecodable_bytes_rejected() {
    let (_dir, pipeline) = load(true);
    assert!(pipeline.classify_bytes(b"\x89PNG broken").is_err());
}

#[test]
fn test_empty_image_rejected() {
    let (_dir, pipeline) = load(true);
    let empty = SyntheticImageBuilder::empty(0, 0);
    assert!(pipeline.classify(&empty).is_err());
}

#[test]
fn test_deterministic() {
    let (_dir, pipeline) = load(true);
    let face = SyntheticImageBuilder::face(100);

    let first = pipeline.classify(&face).unwrap();
    let second = pipeline.classify(&face).unwrap();
    assert_eq!(first.emotion, second.emotion);
    assert_eq!(first.score, second.score);
    assert_eq!(first.tensor, second.tensor);
}

#[test]
fn test_filters_share_tensor_shape() {
    let (_dir, path) = weights(true);
    let device = select_device(DevicePreference::Cpu);
    let face = SyntheticImageBuilder::face(150);

    for filter in [
        ResizeFilter::Triangle,
        ResizeFilter::CatmullRom,
        ResizeFilter::Gaussian,
        ResizeFilter::Lanczos3,
    ] {
        let net = EmotionNet::load(&path, &device).unwrap();
        let pipeline = EmotionPipeline::with_preprocessor(net, Preprocessor::new(filter));
        let prediction = pipeline.classify(&face).unwrap();
        assert_eq!(prediction.tensor.as_slice().len(), 48 * 48 * 3);
        assert_eq!(prediction.emotion, Emotion::Happiness);
    }
}

#[test]
fn test_shared_across_threads() {
    let (_dir, pipeline) = load(true);
    let pipeline = Arc::new(pipeline);

    let handles: Vec<_> = (0..4u32)
        .map(|i| {
            let pipeline = Arc::clone(&pipeline);
            thread::spawn(move || {
                let face = SyntheticImageBuilder::face(48 + i * 16);
                pipeline.classify(&face).unwrap().emotion
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), Emotion::Happiness);
    }
}

#[test]
fn test_lazy_model_loads_on_first_use() {
    let (_dir, path) = weights(true);
    let device = select_device(DevicePreference::Cpu);
    let lazy = LazyModel::new(&path, device, EmotionNet::new);
    assert!(!lazy.is_loaded());

    let pipeline = EmotionPipeline::new(lazy);
    let prediction = pipeline.classify(&SyntheticImageBuilder::face(64)).unwrap();

    assert_eq!(prediction.emotion, Emotion::Happiness);
    assert!(pipeline.classifier().model().is_loaded());
}

#[test]
fn test_lazy_model_missing_file_is_inference_error() {
    let dir = tempfile::tempdir().unwrap();
    let device = select_device(DevicePreference::Cpu);
    let lazy = LazyModel::new(dir.path().join("absent.safetensors"), device, EmotionNet::new);

    let pipeline = EmotionPipeline::new(lazy);
    let err = pipeline.classify(&SyntheticImageBuilder::face(64)).unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Inference(InferenceError::Model(_))
    ));
}
