pub mod request;
pub mod renderer;
pub mod png;
pub mod svg;
pub mod artifact;

pub use request::{ChartKind, ChartRequest, NamedSeries};
pub use renderer::ChartRenderer;
pub use png::PngChartRenderer;
pub use svg::SvgChartRenderer;
