// notesafe-core/src/orchestrator.rs
//! The safe-rephrase pipeline: redact, rewrite externally, restore.
//!
//! The `Rewriter` trait is the seam to the excluded networking layer;
//! implementations receive only redacted text, and neither the original
//! note nor the redaction map ever crosses that boundary. The pipeline
//! invokes the rewriter exactly once and propagates its failure
//! unchanged, with no retry and no fallback text.
//!
//! License: MIT OR APACHE 2.0

use std::future::Future;
use std::marker::PhantomData;

use anyhow::Result;
use async_trait::async_trait;
use log::debug;

use crate::detector::Detector;
use crate::restorer::restore;

/// An external text-rewriting service.
///
/// This trait decouples the redaction pipeline from whatever transport
/// actually performs the rewrite (an HTTP client in production, a plain
/// closure in tests), allowing implementations to be used
/// interchangeably.
#[async_trait]
pub trait Rewriter: Send + Sync {
    /// Rewrites the given redacted text, returning the rewritten form.
    async fn rewrite(&self, redacted_text: &str) -> Result<String>;
}

/// Adapts a plain async closure into a [`Rewriter`].
pub struct FnRewriter<F, Fut> {
    rewrite_fn: F,
    _marker: PhantomData<fn() -> Fut>,
}

impl<F, Fut> FnRewriter<F, Fut>
where
    F: Fn(String) -> Fut + Send + Sync,
    Fut: Future<Output = Result<String>> + Send + 'static,
{
    pub fn new(rewrite_fn: F) -> Self {
        Self {
            rewrite_fn,
            _marker: PhantomData,
        }
    }
}

#[async_trait]
impl<F, Fut> Rewriter for FnRewriter<F, Fut>
where
    F: Fn(String) -> Fut + Send + Sync,
    Fut: Future<Output = Result<String>> + Send + 'static,
{
    async fn rewrite(&self, redacted_text: &str) -> Result<String> {
        (self.rewrite_fn)(redacted_text.to_string()).await
    }
}

impl Detector {
    /// Runs the full redact -> rewrite -> restore pipeline over `text`.
    ///
    /// The rewriter sees the redacted text only. If it fails, the error
    /// is returned unchanged and no restoration is attempted; no partial
    /// output is produced. Concurrent invocations are fully independent.
    pub async fn rewrite_with_redaction(
        &self,
        text: &str,
        rewriter: &dyn Rewriter,
    ) -> Result<String> {
        let detection = self.detect(text);

        if log::log_enabled!(log::Level::Debug) {
            let summary = serde_json::to_string(&detection.summary()).unwrap_or_default();
            debug!(
                "Privacy redaction: original_len={} redacted_len={} summary={}",
                text.len(),
                detection.redacted_text.len(),
                summary
            );
        }

        let rewritten = rewriter.rewrite(&detection.redacted_text).await?;

        let final_text = restore(&rewritten, &detection.map);
        debug!(
            "Privacy re-insertion: rewritten_len={} final_len={}",
            rewritten.len(),
            final_text.len()
        );

        Ok(final_text)
    }
}

/// One-shot pipeline over the default lexicon, for callers that do not
/// manage a `Detector` of their own.
pub async fn safe_rephrase(text: &str, rewriter: &dyn Rewriter) -> Result<String> {
    let detector = Detector::with_default_lexicon()?;
    detector.rewrite_with_redaction(text, rewriter).await
}
