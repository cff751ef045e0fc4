use crate::chart::request::ChartRequest;
use crate::error::ChartRenderError;

/// Turns a chart request into encoded image bytes.
///
/// Implementations are called synchronously, twice per report that carries
/// charts, and may block the training loop while they run.
pub trait ChartRenderer {
    fn render(&self, request: &ChartRequest) -> Result<Vec<u8>, ChartRenderError>;

    /// MIME type of the bytes `render` produces.
    fn content_type(&self) -> &'static str;

    /// File extension used when charts are persisted to disk.
    fn file_extension(&self) -> &'static str;
}

impl<R: ChartRenderer + ?Sized> ChartRenderer for &R {
    fn render(&self, request: &ChartRequest) -> Result<Vec<u8>, ChartRenderError> {
        (**self).render(request)
    }

    fn content_type(&self) -> &'static str {
        (**self).content_type()
    }

    fn file_extension(&self) -> &'static str {
        (**self).file_extension()
    }
}

impl<R: ChartRenderer + ?Sized> ChartRenderer for Box<R> {
    fn render(&self, request: &ChartRequest) -> Result<Vec<u8>, ChartRenderError> {
        (**self).render(request)
    }

    fn content_type(&self) -> &'static str {
        (**self).content_type()
    }

    fn file_extension(&self) -> &'static str {
        (**self).file_extension()
    }
}

/// Line colours, one per series, in ggplot's default hue order.
pub(crate) const PALETTE: [[u8; 3]; 4] = [
    [248, 118, 109],
    [0, 191, 196],
    [124, 174, 0],
    [199, 124, 255],
];

/// Vertical range to plot, padded so flat series stay visible.
pub(crate) fn padded_range(lo: f64, hi: f64) -> (f64, f64) {
    if hi - lo < f64::EPSILON {
        let pad = if lo.abs() > f64::EPSILON { lo.abs() * 0.05 } else { 0.5 };
        (lo - pad, hi + pad)
    } else {
        let pad = (hi - lo) * 0.05;
        (lo - pad, hi + pad)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_series_gets_padding() {
        assert_eq!(padded_range(0.0, 0.0), (-0.5, 0.5));
        let (lo, hi) = padded_range(2.0, 2.0);
        assert!(lo < 2.0 && hi > 2.0);
    }

    #[test]
    fn range_is_widened_by_five_percent() {
        let (lo, hi) = padded_range(0.0, 10.0);
        assert!((lo + 0.5).abs() < 1e-12);
        assert!((hi - 10.5).abs() < 1e-12);
    }
}
