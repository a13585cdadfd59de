//! Visual-artifact capture around one execution attempt.
//!
//! [`ArtifactCapture::begin`] empties the plot context, [`ArtifactCapture::collect`]
//! turns the current figure into base64 PNG text, and dropping the capture
//! empties the context again on every exit path.

use base64::Engine;

use super::context;
use super::render;

/// Errors that can occur while turning a figure into an image
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    /// PNG encoding failed
    #[error("failed to encode figure: {0}")]
    Encode(#[from] image::ImageError),

    /// The pixel buffer does not match the canvas dimensions
    #[error("pixel buffer does not match {width}x{height}")]
    BufferSize { width: u32, height: u32 },
}

/// Scoped ownership of the plot context for one attempt
#[derive(Debug)]
pub struct ArtifactCapture {
    width: u32,
    height: u32,
}

impl ArtifactCapture {
    /// Start a capture; any figure left behind by an earlier attempt is dropped.
    pub fn begin(width: u32, height: u32) -> Self {
        let stale = {
            let mut figures = context::lock();
            let stale = figures.len();
            figures.clear();
            stale
        };
        if stale > 0 {
            tracing::warn!(stale, "discarded figures left in the plot context");
        }
        Self { width, height }
    }

    /// Render the most recently active figure, if the script made any.
    pub fn collect(&self) -> Result<Option<String>, ArtifactError> {
        let figures = context::lock();
        let Some(figure) = figures.current() else {
            return Ok(None);
        };

        let png = render::render_png(figure, self.width, self.height)?;
        tracing::debug!(
            figure = figure.number,
            total = figures.len(),
            bytes = png.len(),
            "rendered figure"
        );
        Ok(Some(base64::engine::general_purpose::STANDARD.encode(png)))
    }
}

impl Drop for ArtifactCapture {
    fn drop(&mut self) {
        context::clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::EXECUTION_LOCK;
    use crate::figure::types::{Series, SeriesKind};

    #[test]
    fn test_begin_clears_and_drop_clears() {
        let _guard = EXECUTION_LOCK.lock();
        context::lock().new_figure();

        let capture = ArtifactCapture::begin(320, 240);
        assert_eq!(context::figure_count(), 0);

        context::lock().new_figure();
        assert_eq!(context::figure_count(), 1);
        drop(capture);
        assert_eq!(context::figure_count(), 0);
    }

    #[test]
    fn test_collect_without_figures() {
        let _guard = EXECUTION_LOCK.lock();
        let capture = ArtifactCapture::begin(320, 240);
        assert_eq!(capture.collect().unwrap(), None);
    }

    #[test]
    fn test_collect_encodes_current_figure() {
        let _guard = EXECUTION_LOCK.lock();
        let capture = ArtifactCapture::begin(320, 240);
        context::lock()
            .current_mut()
            .series
            .push(Series::indexed(SeriesKind::Line, vec![1.0, 2.0, 3.0]));

        let encoded = capture.collect().unwrap().expect("figure should render");
        let png = base64::engine::general_purpose::STANDARD
            .decode(encoded)
            .unwrap();
        let decoded = image::load_from_memory(&png).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (320, 240));
    }
}
