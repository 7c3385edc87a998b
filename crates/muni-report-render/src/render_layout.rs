//! Document layout engine.
//!
//! A composition session owns the page list and a single [`Cursor`]. Every
//! block write first checks the remaining vertical space against the block's
//! estimated height and breaks the page when it does not fit, so callers
//! compose sections top to bottom without tracking pages themselves.
//!
//! Tables report their final cursor position through the return value of
//! [`DocumentComposer::write_table`]; chart blocks have fixed height
//! contracts ([`PIE_BLOCK_HEIGHT`], [`BAR_BLOCK_HEIGHT`]) because their
//! bounding boxes are known before rendering.

use muni_report::aggregate::{series_total, SeriesPoint};
use serde::{Deserialize, Serialize};

use crate::chart::{bar_geometry, pie_slices, LEGEND_ROW_STEP, LEGEND_SWATCH};
use crate::render_ir::{
    Color, DrawCommand, FontTier, LineCommand, PolygonCommand, RectCommand, RenderPage, TextAlign,
    TextCommand, BANNER_COLOR,
};

/// Minimum height of a pie chart block; a legend with many rows extends it.
pub const PIE_BLOCK_HEIGHT: f32 = 55.0;
/// Height contract of a bar chart block (plot box plus labels).
pub const BAR_BLOCK_HEIGHT: f32 = 50.0;

/// Layout configuration in logical page units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub page_width: f32,
    pub page_height: f32,
    pub margin_left: f32,
    pub margin_right: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
    /// Banner band height on cover and section pages.
    pub banner_height: f32,
    /// Redraw a slim banner band after every page break.
    pub repeat_banner: bool,
    /// Height of one table row.
    pub table_row_height: f32,
    /// Character width used to wrap interpretation text.
    pub interpretation_wrap_chars: usize,
    /// Width reserved for the chart column in a chart block.
    pub chart_column_width: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            page_width: 210.0,
            page_height: 297.0,
            margin_left: 14.0,
            margin_right: 14.0,
            margin_top: 18.0,
            margin_bottom: 27.0,
            banner_height: 24.0,
            repeat_banner: true,
            table_row_height: 6.0,
            interpretation_wrap_chars: 46,
            chart_column_width: 100.0,
        }
    }
}

impl LayoutConfig {
    /// Lowest usable `y` before a break is forced.
    pub fn content_bottom(&self) -> f32 {
        self.page_height - self.margin_bottom
    }

    /// Usable width between the side margins.
    pub fn content_width(&self) -> f32 {
        self.page_width - self.margin_left - self.margin_right
    }

    fn content_right(&self) -> f32 {
        self.page_width - self.margin_right
    }
}

/// Page index and vertical position during one composition.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Cursor {
    /// 0-based page index.
    pub page_index: usize,
    /// Vertical position; advances monotonically within a page.
    pub y: f32,
}

/// Composition session that folds document sections into pages.
///
/// Lifecycle: construction is the idle state, block writes run the
/// writing/page-break loop, and [`DocumentComposer::finish`] emits the
/// final page list.
pub struct DocumentComposer {
    cfg: LayoutConfig,
    pages: Vec<RenderPage>,
    cursor: Cursor,
    /// Title repeated on break banners when `repeat_banner` is set.
    banner_title: String,
}

impl DocumentComposer {
    /// Start a session with an empty first page.
    pub fn new(cfg: LayoutConfig) -> Self {
        Self {
            cfg,
            pages: vec![RenderPage::new(1)],
            cursor: Cursor {
                page_index: 0,
                y: cfg.margin_top,
            },
            banner_title: String::new(),
        }
    }

    /// The layout configuration in use.
    pub fn config(&self) -> &LayoutConfig {
        &self.cfg
    }

    /// Current cursor value.
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Pages composed so far.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page(&mut self) -> &mut RenderPage {
        let index = self.cursor.page_index;
        &mut self.pages[index]
    }

    /// Break to a new page: advance the page index and reset `y` to the top
    /// margin (below the repeated banner when configured).
    fn page_break(&mut self) {
        let next = self.pages.len() + 1;
        self.pages.push(RenderPage::new(next));
        self.cursor.page_index += 1;
        self.cursor.y = self.cfg.margin_top;
        if self.cfg.repeat_banner && !self.banner_title.is_empty() {
            self.draw_banner_band(self.cfg.banner_height * 0.5, None);
        }
        log::debug!("page break to page {}", next);
    }

    /// Guarantee room for a block of the given estimated height.
    fn ensure_room(&mut self, estimated_height: f32) {
        if self.cursor.y + estimated_height > self.cfg.content_bottom() {
            self.page_break();
        }
    }

    fn draw_banner_band(&mut self, height: f32, subtitle: Option<&str>) {
        let width = self.cfg.page_width;
        let title = self.banner_title.clone();
        let page = self.page();
        page.push_chrome(DrawCommand::Rect(RectCommand {
            x: 0.0,
            y: 0.0,
            width,
            height,
            color: BANNER_COLOR,
            fill: true,
        }));
        let tier = if subtitle.is_some() {
            FontTier::Title
        } else {
            FontTier::Heading
        };
        page.push_chrome(DrawCommand::Text(TextCommand {
            x: width / 2.0,
            y: height / 2.0 + tier.size() / 2.0,
            text: title,
            tier,
            bold: true,
            color: Color::WHITE,
            align: TextAlign::Center,
        }));
        if let Some(subtitle) = subtitle {
            page.push_chrome(DrawCommand::Text(TextCommand {
                x: width / 2.0,
                y: height - 3.0,
                text: subtitle.to_string(),
                tier: FontTier::Body,
                bold: false,
                color: Color::WHITE,
                align: TextAlign::Center,
            }));
        }
        self.cursor.y = self.cursor.y.max(height + 6.0);
    }

    /// Full banner band at the top of the current page. Sets the repeating
    /// banner title for subsequent page breaks.
    pub fn write_banner(&mut self, title: &str, subtitle: Option<&str>) {
        self.banner_title = title.to_string();
        self.draw_banner_band(self.cfg.banner_height, subtitle);
    }

    /// Start a new section on a fresh page with its own banner band.
    ///
    /// No break happens when the current page is still untouched.
    pub fn start_section(&mut self, title: &str, subtitle: Option<&str>) {
        let page_is_untouched =
            self.page().command_count() == 0 && self.cursor.y <= self.cfg.margin_top;
        if !page_is_untouched {
            // The section banner replaces the slim break banner.
            self.banner_title.clear();
            self.page_break();
        }
        self.write_banner(title, subtitle);
    }

    /// Bold section heading.
    pub fn write_heading(&mut self, text: &str) {
        let line = FontTier::Heading.line_height();
        self.ensure_room(line + 2.0);
        let x = self.cfg.margin_left;
        let y = self.cursor.y + FontTier::Heading.size();
        self.page().push_content(DrawCommand::Text(TextCommand {
            x,
            y,
            text: text.to_string(),
            tier: FontTier::Heading,
            bold: true,
            color: Color::BLACK,
            align: TextAlign::Left,
        }));
        self.cursor.y += line + 2.0;
    }

    /// Body paragraph wrapped to the content width; may break mid-paragraph.
    pub fn write_paragraph(&mut self, text: &str) {
        let line = FontTier::Body.line_height();
        for wrapped in wrap_text(text, self.cfg.interpretation_wrap_chars * 2) {
            self.ensure_room(line);
            let x = self.cfg.margin_left;
            let y = self.cursor.y + FontTier::Body.size();
            self.page()
                .push_content(DrawCommand::Text(TextCommand::plain(
                    x,
                    y,
                    wrapped,
                    FontTier::Body,
                )));
            self.cursor.y += line;
        }
        self.cursor.y += 2.0;
    }

    /// Vertical gap between blocks.
    pub fn add_gap(&mut self, gap: f32) {
        self.cursor.y += gap;
    }

    /// Table with equal-width columns. Breaks between rows when needed,
    /// repeating the header row on the new page.
    ///
    /// Returns the final cursor `y`, which callers must re-read instead of
    /// assuming a fixed increment.
    pub fn write_table(&mut self, headers: &[&str], rows: &[Vec<String>]) -> f32 {
        let row_height = self.cfg.table_row_height;
        // Header plus at least one data row must fit before starting.
        self.ensure_room(row_height * 2.0);
        self.write_table_header(headers);
        for row in rows {
            if self.cursor.y + row_height > self.cfg.content_bottom() {
                self.page_break();
                self.write_table_header(headers);
            }
            self.write_table_row(headers.len(), row, false);
        }
        self.cursor.y += 4.0;
        self.cursor.y
    }

    fn write_table_header(&mut self, headers: &[&str]) {
        let cells: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
        self.write_table_row(headers.len(), &cells, true);
        let y = self.cursor.y - 1.0;
        let (left, right) = (self.cfg.margin_left, self.cfg.content_right());
        self.page()
            .push_content(DrawCommand::Line(LineCommand {
                x1: left,
                y1: y,
                x2: right,
                y2: y,
                color: Color::GRAY,
                width: 0.3,
            }));
    }

    fn write_table_row(&mut self, columns: usize, cells: &[String], bold: bool) {
        let columns = columns.max(1);
        let column_width = self.cfg.content_width() / columns as f32;
        let y = self.cursor.y + FontTier::Table.size();
        for (i, cell) in cells.iter().take(columns).enumerate() {
            let x = self.cfg.margin_left + i as f32 * column_width;
            self.page().push_content(DrawCommand::Text(TextCommand {
                x,
                y,
                text: cell.clone(),
                tier: FontTier::Table,
                bold,
                color: Color::BLACK,
                align: TextAlign::Left,
            }));
        }
        self.cursor.y += self.cfg.table_row_height;
    }

    /// Pie chart with interpretation text in a two-column block.
    ///
    /// Skipped entirely (no heading, no geometry) when the series has no
    /// data; the check runs before any geometry is generated.
    pub fn write_pie_block(&mut self, title: &str, series: &[SeriesPoint], interpretation: &str) {
        if series.is_empty() || series_total(series) <= 0.0 {
            log::debug!("skipping empty pie block: {title}");
            return;
        }
        let text_lines = wrap_text(interpretation, self.cfg.interpretation_wrap_chars);
        // The legend column grows one row per series entry and can outgrow
        // the circle, so the chart column height is whichever is taller.
        let legend_height = 4.0 + series.len() as f32 * LEGEND_ROW_STEP + LEGEND_SWATCH;
        let block_height = chart_block_height(PIE_BLOCK_HEIGHT.max(legend_height), &text_lines);
        let heading = FontTier::Heading.line_height() + 2.0;
        self.ensure_room(heading + block_height);
        self.write_heading(title);

        let top = self.cursor.y;
        let radius = 21.0;
        let center = (self.cfg.margin_left + radius + 4.0, top + radius + 4.0);
        for slice in pie_slices(series, center, radius) {
            if !slice.polygon.is_empty() {
                self.page()
                    .push_content(DrawCommand::Polygon(PolygonCommand {
                        points: slice.polygon,
                        color: slice.color,
                    }));
            }
            self.page().push_content(DrawCommand::Rect(RectCommand {
                x: slice.legend.x,
                y: slice.legend.y,
                width: LEGEND_SWATCH,
                height: LEGEND_SWATCH,
                color: slice.legend.color,
                fill: true,
            }));
            self.page()
                .push_content(DrawCommand::Text(TextCommand::plain(
                    slice.legend.x + LEGEND_SWATCH + 2.0,
                    slice.legend.y + LEGEND_SWATCH,
                    slice.legend.label,
                    FontTier::Table,
                )));
        }
        self.write_interpretation_column(top, &text_lines);
        self.cursor.y = top + block_height + 4.0;
    }

    /// Bar chart with interpretation text in a two-column block. Same
    /// skip-on-empty contract as [`DocumentComposer::write_pie_block`].
    pub fn write_bar_block(&mut self, title: &str, series: &[SeriesPoint], interpretation: &str) {
        if series.is_empty() {
            log::debug!("skipping empty bar block: {title}");
            return;
        }
        let text_lines = wrap_text(interpretation, self.cfg.interpretation_wrap_chars);
        let block_height = chart_block_height(BAR_BLOCK_HEIGHT, &text_lines);
        let heading = FontTier::Heading.line_height() + 2.0;
        self.ensure_room(heading + block_height);
        self.write_heading(title);

        let top = self.cursor.y;
        let origin = (self.cfg.margin_left + 6.0, top + 6.0);
        let plot_width = self.cfg.chart_column_width - 18.0;
        let plot_height = BAR_BLOCK_HEIGHT - 18.0;
        if let Some(geometry) = bar_geometry(series, origin, plot_width, plot_height) {
            self.page()
                .push_content(DrawCommand::Line(geometry.y_axis));
            self.page()
                .push_content(DrawCommand::Line(geometry.x_axis));
            for bar in geometry.bars {
                self.page().push_content(DrawCommand::Rect(RectCommand {
                    x: bar.x,
                    y: bar.y,
                    width: bar.width,
                    height: bar.height,
                    color: bar.color,
                    fill: true,
                }));
                self.page().push_content(DrawCommand::Text(TextCommand {
                    x: bar.value_label.x,
                    y: bar.value_label.y,
                    text: bar.value_label.text,
                    tier: FontTier::Table,
                    bold: false,
                    color: Color::BLACK,
                    align: TextAlign::Center,
                }));
                self.page().push_content(DrawCommand::Text(TextCommand {
                    x: bar.name_label.x,
                    y: bar.name_label.y,
                    text: bar.name_label.text,
                    tier: FontTier::Table,
                    bold: false,
                    color: Color::BLACK,
                    align: TextAlign::Center,
                }));
            }
        }
        self.write_interpretation_column(top, &text_lines);
        self.cursor.y = top + block_height + 4.0;
    }

    /// Right-hand column of a chart block, sharing the block's starting `y`.
    fn write_interpretation_column(&mut self, top: f32, lines: &[String]) {
        let x = self.cfg.margin_left + self.cfg.chart_column_width;
        let line_height = FontTier::Body.line_height();
        for (i, line) in lines.iter().enumerate() {
            let y = top + FontTier::Body.size() + i as f32 * line_height;
            self.page()
                .push_content(DrawCommand::Text(TextCommand::plain(
                    x,
                    y,
                    line.clone(),
                    FontTier::Body,
                )));
        }
    }

    /// Finalize and emit the composed pages.
    pub fn finish(self) -> Vec<RenderPage> {
        self.pages
    }
}

/// Two-column block height: the chart contract or the text column,
/// whichever is taller.
fn chart_block_height(chart_height: f32, text_lines: &[String]) -> f32 {
    let text_height = text_lines.len() as f32 * FontTier::Body.line_height();
    chart_height.max(text_height)
}

/// Greedy word wrap at a fixed character width.
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if current.is_empty() {
            current = word.to_string();
        } else if current.chars().count() + 1 + word.chars().count() <= max_chars {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(core::mem::take(&mut current));
            current = word.to_string();
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
