//! Recognition backends: submit an exported sketch for database matching.

use crate::storage::BoxFuture;
use thiserror::Error;

/// Recognition errors.
#[derive(Debug, Error)]
pub enum RecognitionError {
    #[error("Invalid image: {0}")]
    InvalidImage(String),
    #[error("Backend error: {0}")]
    Backend(String),
}

pub type RecognitionResult<T> = Result<T, RecognitionError>;

/// A database record returned for a positive match.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchedRecord {
    pub record_id: String,
    pub name: String,
    pub note: String,
}

/// Outcome of a recognition request.
#[derive(Debug, Clone, PartialEq)]
pub struct RecognitionOutcome {
    pub matched: bool,
    /// Match confidence in `[0, 1]`.
    pub confidence: f64,
    pub record: Option<MatchedRecord>,
}

/// A service that matches an exported sketch against a records database.
pub trait Recognition: Send + Sync {
    /// Submit encoded image bytes for matching.
    fn recognize(&self, image: &[u8]) -> BoxFuture<'_, RecognitionResult<RecognitionOutcome>>;
}

/// Offline stand-in backend: derives a stable pseudo-confidence from the
/// image bytes so the full submit-and-review workflow can be exercised
/// without a records database.
pub struct MockRecognition {
    threshold: f64,
}

impl Default for MockRecognition {
    fn default() -> Self {
        Self { threshold: 0.7 }
    }
}

impl MockRecognition {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold: threshold.clamp(0.0, 1.0),
        }
    }

    fn confidence_for(image: &[u8]) -> f64 {
        // FNV-1a over the bytes, folded into [0, 1).
        let mut hash: u64 = 0xcbf29ce484222325;
        for &b in image {
            hash ^= b as u64;
            hash = hash.wrapping_mul(0x100000001b3);
        }
        (hash % 10_000) as f64 / 10_000.0
    }
}

impl Recognition for MockRecognition {
    fn recognize(&self, image: &[u8]) -> BoxFuture<'_, RecognitionResult<RecognitionOutcome>> {
        let image = image.to_vec();
        Box::pin(async move {
            // Anything shorter than a PNG signature cannot be an image.
            if image.len() < 8 {
                return Err(RecognitionError::InvalidImage(
                    "image payload too small".to_string(),
                ));
            }
            let confidence = Self::confidence_for(&image);
            let matched = confidence >= self.threshold;
            let record = matched.then(|| MatchedRecord {
                record_id: format!("REC-{:05}", (confidence * 100_000.0) as u32),
                name: "Unidentified subject".to_string(),
                note: "Mock match for workflow testing".to_string(),
            });
            Ok(RecognitionOutcome {
                matched,
                confidence,
                record,
            })
        })
    }
}
