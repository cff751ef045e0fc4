//! Raster chart renderer backed by `plotters`.
//!
//! Each chart gets the request title as caption, axis descriptions on the
//! mesh, one 2px line per series and a legend in the top-right corner. The
//! plot is drawn into an RGB buffer and encoded to PNG with the `image` crate.

use std::io::Cursor;

use image::{DynamicImage, ImageOutputFormat, RgbImage};
use plotters::prelude::*;

use crate::chart::renderer::{padded_range, ChartRenderer, PALETTE};
use crate::chart::request::ChartRequest;
use crate::error::ChartRenderError;

const MIN_WIDTH: u32 = 160;
const MIN_HEIGHT: u32 = 120;

pub struct PngChartRenderer {
    pub width: u32,
    pub height: u32,
}

impl Default for PngChartRenderer {
    fn default() -> Self {
        PngChartRenderer { width: 640, height: 480 }
    }
}

impl PngChartRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        PngChartRenderer { width, height }
    }

    fn draw(&self, request: &ChartRequest) -> Result<RgbImage, ChartRenderError> {
        if self.width < MIN_WIDTH || self.height < MIN_HEIGHT {
            return Err(ChartRenderError::InvalidDimensions { width: self.width, height: self.height });
        }
        let n = request.point_count();
        let (lo, hi) = match request.value_range() {
            Some(range) if n > 0 => padded_range(range.0, range.1),
            _ => return Err(ChartRenderError::EmptySeries { title: request.title.clone() }),
        };
        let x_max = n.max(2) as f64 - 1.0;

        let mut buffer = vec![255u8; (self.width * self.height * 3) as usize];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, (self.width, self.height))
                .into_drawing_area();
            root.fill(&WHITE).map_err(backend_error)?;

            let mut chart = ChartBuilder::on(&root)
                .caption(&request.title, ("sans-serif", 20).into_font())
                .margin(10)
                .x_label_area_size(40)
                .y_label_area_size(50)
                .build_cartesian_2d(0f64..x_max, lo..hi)
                .map_err(backend_error)?;

            chart
                .configure_mesh()
                .x_desc(request.x_label.as_str())
                .y_desc(request.y_label.as_str())
                .axis_desc_style(("sans-serif", 14).into_font())
                .light_line_style(RGBColor(235, 235, 235))
                .draw()
                .map_err(backend_error)?;

            for (series, rgb) in request.series.iter().zip(PALETTE.iter().cycle()) {
                let colour = RGBColor(rgb[0], rgb[1], rgb[2]);
                let points = series
                    .values
                    .iter()
                    .enumerate()
                    .filter(|(_, v)| v.is_finite())
                    .map(|(i, &v)| (i as f64, v));
                chart
                    .draw_series(LineSeries::new(points, colour.stroke_width(2)).point_size(2))
                    .map_err(backend_error)?
                    .label(series.label.as_str())
                    .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], colour.stroke_width(2)));
            }

            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperRight)
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK)
                .draw()
                .map_err(backend_error)?;

            root.present().map_err(backend_error)?;
        }

        RgbImage::from_raw(self.width, self.height, buffer)
            .ok_or_else(|| ChartRenderError::Encoding("plot buffer does not match image size".into()))
    }
}

fn backend_error<E: std::fmt::Display>(e: E) -> ChartRenderError {
    ChartRenderError::Backend(e.to_string())
}

impl ChartRenderer for PngChartRenderer {
    fn render(&self, request: &ChartRequest) -> Result<Vec<u8>, ChartRenderError> {
        let img = self.draw(request)?;
        let mut bytes = Vec::new();
        DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png)
            .map_err(|e| ChartRenderError::Encoding(e.to_string()))?;
        Ok(bytes)
    }

    fn content_type(&self) -> &'static str {
        "image/png"
    }

    fn file_extension(&self) -> &'static str {
        "png"
    }
}
