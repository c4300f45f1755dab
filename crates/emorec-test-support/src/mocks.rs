//! Mock implementations of core port traits.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use emorec_core::domain::{ClassificationRecord, ImageInfo, InputTensor, NUM_EMOTIONS};
use emorec_core::ports::{
    EmotionModel, ImageSource, ProgressEvent, ProgressSink, ResultOutput, SourceItem,
};

/// Mock implementation of `ImageSource` for testing.
///
/// Yields pre-built images, optionally interleaved with load failures, and
/// tracks iteration for assertions.
pub struct MockImageSource {
    items: Vec<(String, Result<ImageInfo, String>)>,
    iteration_count: Arc<Mutex<usize>>,
}

impl MockImageSource {
    /// Creates a new mock source with the given images.
    #[must_use]
    pub fn new(images: Vec<ImageInfo>) -> Self {
        Self {
            items: images
                .into_iter()
                .map(|info| (info.path.clone(), Ok(info)))
                .collect(),
            iteration_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Creates an empty mock source.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(vec![])
    }

    /// Appends an entry that fails to load with `reason`.
    #[must_use]
    pub fn with_failure(mut self, path: impl Into<String>, reason: impl Into<String>) -> Self {
        self.items.push((path.into(), Err(reason.into())));
        self
    }

    /// Returns the number of times the source has been iterated.
    #[must_use]
    pub fn iteration_count(&self) -> usize {
        *self
            .iteration_count
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl ImageSource for MockImageSource {
    fn images(&self) -> Box<dyn Iterator<Item = SourceItem> + Send + '_> {
        if let Ok(mut c) = self.iteration_count.lock() {
            *c += 1;
        }
        Box::new(self.items.iter().map(|(path, item)| SourceItem {
            path: path.clone(),
            image: item.clone().map_err(anyhow::Error::msg),
        }))
    }

    fn count_hint(&self) -> Option<usize> {
        Some(self.items.len())
    }
}

/// Mock implementation of `ResultOutput` for testing.
///
/// Captures records for later assertions, whether written one at a time or
/// as a batch.
pub struct MockResultOutput {
    records: Arc<Mutex<Vec<ClassificationRecord>>>,
    batch_count: AtomicUsize,
    flush_count: Arc<Mutex<usize>>,
}

impl MockResultOutput {
    /// Creates a new mock output.
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: Arc::new(Mutex::new(Vec::new())),
            batch_count: AtomicUsize::new(0),
            flush_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Returns all captured records.
    #[must_use]
    pub fn records(&self) -> Vec<ClassificationRecord> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the number of times `write_batch()` was called.
    #[must_use]
    pub fn batch_count(&self) -> usize {
        self.batch_count.load(Ordering::SeqCst)
    }

    /// Returns the number of times `flush()` was called.
    #[must_use]
    pub fn flush_count(&self) -> usize {
        *self
            .flush_count
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MockResultOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultOutput for MockResultOutput {
    fn write(&self, record: &ClassificationRecord) -> anyhow::Result<()> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record.clone());
        Ok(())
    }

    fn write_batch(&self, records: &[ClassificationRecord]) -> anyhow::Result<()> {
        self.batch_count.fetch_add(1, Ordering::SeqCst);
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(records);
        Ok(())
    }

    fn flush(&self) -> anyhow::Result<()> {
        if let Ok(mut c) = self.flush_count.lock() {
            *c += 1;
        }
        Ok(())
    }
}

/// Mock implementation of `ProgressSink` for testing.
///
/// Captures events for later assertions.
pub struct MockProgressSink {
    events: Arc<Mutex<Vec<ProgressEvent>>>,
}

impl MockProgressSink {
    /// Creates a new mock progress sink.
    #[must_use]
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Returns all captured events.
    #[must_use]
    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the number of `Started` events.
    #[must_use]
    pub fn started_count(&self) -> usize {
        self.count(|e| matches!(e, ProgressEvent::Started { .. }))
    }

    /// Returns the number of `Completed` events.
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.count(|e| matches!(e, ProgressEvent::Completed { .. }))
    }

    /// Returns the number of `Skipped` events.
    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.count(|e| matches!(e, ProgressEvent::Skipped { .. }))
    }

    /// Returns the final counts from the `Finished` event, if any.
    #[must_use]
    pub fn finished_counts(&self) -> Option<(usize, usize)> {
        self.events().iter().find_map(|e| match e {
            ProgressEvent::Finished { processed, skipped } => Some((*processed, *skipped)),
            _ => None,
        })
    }

    fn count(&self, pred: impl Fn(&ProgressEvent) -> bool) -> usize {
        self.events().iter().filter(|e| pred(e)).count()
    }
}

impl Default for MockProgressSink {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for MockProgressSink {
    fn on_event(&self, event: ProgressEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

/// Model that returns the same raw scores for every input.
///
/// The scores are passed through unvalidated, so malformed output can be
/// simulated too.
pub struct FixedScoresModel {
    scores: Vec<f32>,
    calls: AtomicUsize,
}

impl FixedScoresModel {
    /// Creates a model returning `scores`.
    #[must_use]
    pub fn new(scores: impl Into<Vec<f32>>) -> Self {
        Self {
            scores: scores.into(),
            calls: AtomicUsize::new(0),
        }
    }

    /// A model that favors `index` with the given share of a unit total.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn favoring(index: usize, share: f32) -> Self {
        let rest = (1.0 - share) / (NUM_EMOTIONS - 1) as f32;
        let scores = (0..NUM_EMOTIONS)
            .map(|i| if i == index { share } else { rest })
            .collect::<Vec<_>>();
        Self::new(scores)
    }

    /// Number of times `infer` was called.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl EmotionModel for FixedScoresModel {
    fn infer(&self, _input: &InputTensor) -> anyhow::Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.scores.clone())
    }
}

/// Model whose every invocation fails.
pub struct FailingModel {
    message: String,
}

impl FailingModel {
    /// Creates a model that fails with `message`.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl EmotionModel for FailingModel {
    fn infer(&self, _input: &InputTensor) -> anyhow::Result<Vec<f32>> {
        anyhow::bail!("{}", self.message)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use emorec_core::domain::{ImageDimensions, PredictionSummary};
    use emorec_core::Emotion;

    fn input() -> InputTensor {
        InputTensor::from_fn(|_, _, _| 0.0)
    }

    #[test]
    fn test_mock_image_source_empty() {
        let source = MockImageSource::empty();
        assert_eq!(source.count_hint(), Some(0));
        assert_eq!(source.images().count(), 0);
        assert_eq!(source.iteration_count(), 1);
    }

    #[test]
    fn test_mock_image_source_with_failure() {
        let img = image::DynamicImage::new_rgb8(100, 100);
        let source = MockImageSource::new(vec![ImageInfo::new("face.jpg", img)])
            .with_failure("broken.jpg", "truncated file");

        assert_eq!(source.count_hint(), Some(2));
        let items: Vec<_> = source.images().collect();
        assert!(items[0].image.is_ok());
        assert_eq!(items[1].path, "broken.jpg");
        assert!(items[1].image.is_err());
    }

    #[test]
    fn test_mock_result_output() {
        let output = MockResultOutput::new();

        let record = ClassificationRecord {
            path: "face.jpg".into(),
            timestamp: "2024-01-01T00:00:00Z".into(),
            dimensions: ImageDimensions::new(100, 100),
            prediction: PredictionSummary {
                emotion: Emotion::Happiness,
                label: "Happiness".into(),
                emoji: "😀".into(),
                score: 0.6,
                percent: "60%".into(),
            },
            practice: None,
        };

        output.write(&record).unwrap();
        output.write_batch(&[record.clone(), record]).unwrap();
        output.flush().unwrap();

        assert_eq!(output.records().len(), 3);
        assert_eq!(output.records()[0].path, "face.jpg");
        assert_eq!(output.batch_count(), 1);
        assert_eq!(output.flush_count(), 1);
    }

    #[test]
    fn test_mock_progress_sink() {
        let sink = MockProgressSink::new();

        sink.on_event(ProgressEvent::Started {
            path: "face.jpg".into(),
            index: 0,
            total: Some(1),
        });
        sink.on_event(ProgressEvent::Finished {
            processed: 1,
            skipped: 0,
        });

        assert_eq!(sink.started_count(), 1);
        assert_eq!(sink.finished_counts(), Some((1, 0)));
    }

    #[test]
    fn test_fixed_scores_model_counts_calls() {
        let model = FixedScoresModel::favoring(3, 0.7);
        let scores = model.infer(&input()).unwrap();
        assert_eq!(scores.len(), NUM_EMOTIONS);
        assert!((scores[3] - 0.7).abs() < 1e-6);
        assert_eq!(model.calls(), 1);
    }

    #[test]
    fn test_failing_model() {
        let err = FailingModel::new("session closed").infer(&input()).unwrap_err();
        assert_eq!(err.to_string(), "session closed");
    }
}
