//! Chart geometry and document layout engine for municipal analytics
//! reports.
//!
//! Geometry generators and the layout engine are pure over their inputs and
//! emit backend-agnostic draw commands; the SVG backend consumes those
//! commands to produce the downloadable document artifact.

pub mod chart;
pub mod interpret;
pub mod render_engine;
pub mod render_ir;
pub mod render_layout;
pub mod svg;

pub use chart::{bar_geometry, pie_slices, Bar, BarGeometry, LegendEntry, Slice};
pub use render_engine::{ReportEngine, ReportOptions};
pub use render_ir::{
    Color, DrawCommand, FontTier, LineCommand, PolygonCommand, RectCommand, RenderPage,
    TextAlign, TextCommand, BANNER_COLOR, CHART_PALETTE,
};
pub use render_layout::{Cursor, DocumentComposer, LayoutConfig};
