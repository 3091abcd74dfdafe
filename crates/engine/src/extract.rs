//! Receipt extraction contract.

use async_trait::async_trait;

use crate::{ExtractedItem, ResultEngine};

/// Reads a receipt image and returns the candidate line items, in receipt
/// order.
///
/// Implementations report failures as [`EngineError::Extraction`] with a
/// message fit for the user.
///
/// [`EngineError::Extraction`]: crate::EngineError::Extraction
#[async_trait]
pub trait ReceiptExtractor: Send + Sync {
    async fn extract(&self, image_base64: &str) -> ResultEngine<Vec<ExtractedItem>>;
}

/// Drops a `data:<mime>;base64,` prefix, if any.
#[must_use]
pub fn strip_data_url(image: &str) -> &str {
    match image.find(',') {
        Some(idx) if image.starts_with("data:") => &image[idx + 1..],
        _ => image,
    }
}
