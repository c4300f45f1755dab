//! Image source port: where images to classify come from.

use crate::domain::ImageInfo;

/// One entry yielded by an [`ImageSource`].
///
/// The path is always known, even when decoding failed, so callers can
/// report which input was skipped.
#[derive(Debug)]
pub struct SourceItem {
    /// Where the image came from.
    pub path: String,
    /// The decoded image, or why it could not be loaded.
    pub image: anyhow::Result<ImageInfo>,
}

/// Port for loading images to classify.
pub trait ImageSource: Send + Sync {
    /// Returns an iterator over the images of this source, in a stable order.
    fn images(&self) -> Box<dyn Iterator<Item = SourceItem> + Send + '_>;

    /// Returns the total number of images, if known.
    fn count_hint(&self) -> Option<usize>;
}
