use crate::chart::renderer::{padded_range, ChartRenderer, PALETTE};
use crate::chart::request::ChartRequest;
use crate::error::ChartRenderError;
use crate::report::html::escape;

/// Vector chart renderer producing a standalone SVG document.
///
/// Unlike the PNG renderer this one carries the title, axis labels, tick
/// values and a labelled legend. Many mail clients refuse inline SVG, so it
/// suits the outbox notifier better than SMTP delivery.
pub struct SvgChartRenderer {
    pub width: f64,
    pub height: f64,
}

impl Default for SvgChartRenderer {
    fn default() -> Self {
        SvgChartRenderer { width: 760.0, height: 320.0 }
    }
}

impl SvgChartRenderer {
    pub fn to_svg(&self, request: &ChartRequest) -> Result<String, ChartRenderError> {
        let (w, h) = (self.width, self.height);
        let pad_l = 60.0f64;
        let pad_r = 16.0f64;
        let pad_t = 34.0f64;
        let pad_b = 40.0f64;
        if w <= pad_l + pad_r || h <= pad_t + pad_b {
            return Err(ChartRenderError::InvalidDimensions { width: w as u32, height: h as u32 });
        }

        let n = request.point_count();
        let (min_y, max_y) = match request.value_range() {
            Some((lo, hi)) if n > 0 => padded_range(lo, hi),
            _ => return Err(ChartRenderError::EmptySeries { title: request.title.clone() }),
        };

        let px = |i: usize, v: f64| -> (f64, f64) {
            let fx = if n > 1 { i as f64 / (n - 1) as f64 } else { 0.5 };
            let x = pad_l + fx * (w - pad_l - pad_r);
            let y = pad_t + (max_y - v) / (max_y - min_y) * (h - pad_t - pad_b);
            (x, y)
        };

        let grey_grid = "#e5e5e5";
        let grey_text = "#777";
        let dark_text = "#333";

        // Y axis ticks and grid.
        let y_labels: String = (0..=4).map(|g| {
            let frac = g as f64 / 4.0;
            let val  = min_y + (max_y - min_y) * frac;
            let y    = pad_t + (1.0 - frac) * (h - pad_t - pad_b);
            format!(
                "<text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"end\" fill=\"{}\" font-size=\"10\">{:.3}</text>\n\
                 <line x1=\"{:.1}\" y1=\"{:.1}\" x2=\"{:.1}\" y2=\"{:.1}\" stroke=\"{}\" stroke-width=\"1\"/>",
                pad_l - 4.0, y + 4.0, grey_text, val,
                pad_l, y, w - pad_r, y, grey_grid
            )
        }).collect::<Vec<_>>().join("\n");

        // X axis ticks: first, middle and last iteration.
        let mut ticks = vec![0, n / 2, n - 1];
        ticks.dedup();
        let x_labels: String = ticks.iter().map(|&i| {
            let (x, _) = px(i, min_y);
            format!(
                "<text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"middle\" fill=\"{}\" font-size=\"10\">{}</text>",
                x, h - pad_b + 14.0, grey_text, i
            )
        }).collect::<Vec<_>>().join("\n");

        let mut lines = String::new();
        let mut legend = String::new();
        for (k, (series, rgb)) in request.series.iter().zip(PALETTE.iter().cycle()).enumerate() {
            let colour = format!("rgb({},{},{})", rgb[0], rgb[1], rgb[2]);
            lines.push_str(&format!(
                "<path d=\"{}\" stroke=\"{}\" stroke-width=\"2\" fill=\"none\"/>\n",
                path_data(&series.values, &px), colour
            ));
            let ly = pad_t + 8.0 + k as f64 * 14.0;
            let lx = w - pad_r - 110.0;
            legend.push_str(&format!(
                "<rect x=\"{:.1}\" y=\"{:.1}\" width=\"18\" height=\"4\" fill=\"{}\"/>\n\
                 <text x=\"{:.1}\" y=\"{:.1}\" fill=\"{}\" font-size=\"10\">{}</text>\n",
                lx, ly - 4.0, colour,
                lx + 22.0, ly, dark_text, escape(&series.label)
            ));
        }

        Ok(format!(
            "<svg width=\"{w}\" height=\"{h}\" xmlns=\"http://www.w3.org/2000/svg\">\n\
             <rect width=\"100%\" height=\"100%\" fill=\"white\"/>\n\
             <text x=\"{tx:.1}\" y=\"20\" text-anchor=\"middle\" fill=\"{dark_text}\" font-size=\"14\">{title}</text>\n\
             {y_labels}\n{x_labels}\n\
             <text x=\"{tx:.1}\" y=\"{xl_y:.1}\" text-anchor=\"middle\" fill=\"{dark_text}\" font-size=\"11\">{x_label}</text>\n\
             <text x=\"14\" y=\"{yl_y:.1}\" text-anchor=\"middle\" fill=\"{dark_text}\" font-size=\"11\" transform=\"rotate(-90 14 {yl_y:.1})\">{y_label}</text>\n\
             {lines}\
             <!-- Legend -->\n\
             {legend}\
             </svg>",
            tx = w / 2.0,
            xl_y = h - 6.0,
            yl_y = h / 2.0,
            title = escape(&request.title),
            x_label = escape(&request.x_label),
            y_label = escape(&request.y_label),
        ))
    }
}

/// `M x,y L x,y ...` path; non-finite values break the line.
fn path_data<F>(values: &[f64], px: &F) -> String
where
    F: Fn(usize, f64) -> (f64, f64),
{
    let mut d = String::new();
    let mut pen_down = false;
    for (i, &v) in values.iter().enumerate() {
        if !v.is_finite() {
            pen_down = false;
            continue;
        }
        let (x, y) = px(i, v);
        let cmd = if pen_down { " L" } else if d.is_empty() { "M" } else { " M" };
        d.push_str(&format!("{cmd}{x:.1},{y:.1}"));
        pen_down = true;
    }
    d
}

impl ChartRenderer for SvgChartRenderer {
    fn render(&self, request: &ChartRequest) -> Result<Vec<u8>, ChartRenderError> {
        self.to_svg(request).map(String::into_bytes)
    }

    fn content_type(&self) -> &'static str {
        "image/svg+xml"
    }

    fn file_extension(&self) -> &'static str {
        "svg"
    }
}
