//! Encoding - which numbering convention a stored version uses
//!
//! Legacy is explicit, NOT represented via a nullable tag threaded through
//! the resolution logic. Classification is the single place where a raw tag
//! is parsed; everything downstream branches on the variant.

use crate::batch::BatchId;

/// The numbering convention a stored version was written under.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Encoding {
    /// Current convention: the version number itself encodes the batch.
    Current,
    /// Legacy convention: the sidecar tag holds the upper-bound BatchId.
    Legacy(BatchId),
}

impl Encoding {
    /// Classifies a version by its optional sidecar tag.
    ///
    /// A present, parseable tag means the version was written under the
    /// legacy convention and the tag text is the upper-bound BatchId. An
    /// absent or unparsable tag degrades to the current convention; parse
    /// failure is absorbed here and never surfaced as an error.
    pub fn classify(tag: Option<&str>) -> Encoding {
        match tag {
            Some(raw) => match raw.trim().parse::<BatchId>() {
                Ok(upper_bound) => Encoding::Legacy(upper_bound),
                Err(_) => {
                    tracing::debug!(
                        tag = raw,
                        "version tag does not parse as a batch id; treating as current convention"
                    );
                    Encoding::Current
                }
            },
            None => Encoding::Current,
        }
    }
}
