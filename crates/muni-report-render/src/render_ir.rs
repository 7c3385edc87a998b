//! Backend-agnostic draw-command IR.
//!
//! The layout engine and the chart generators emit these commands; backends
//! (currently SVG) consume them. Styles are explicit on every command, so no
//! hidden pen state orders the stream.

use serde::{Deserialize, Serialize};

/// RGB color for fills, strokes, and text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const BLACK: Color = Color::rgb(33, 33, 33);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const GRAY: Color = Color::rgb(120, 120, 120);

    /// `#rrggbb` form used by the SVG backend.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Fixed 6-color chart palette, cycled by index across every chart in a
/// document.
pub const CHART_PALETTE: [Color; 6] = [
    Color::rgb(54, 162, 235),
    Color::rgb(255, 99, 132),
    Color::rgb(255, 206, 86),
    Color::rgb(75, 192, 192),
    Color::rgb(153, 102, 255),
    Color::rgb(255, 159, 64),
];

/// Banner band color on cover and section pages.
pub const BANNER_COLOR: Color = Color::rgb(27, 94, 62);

/// Fixed font-size tiers for document text, in page units.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FontTier {
    Title,
    Heading,
    Body,
    Table,
}

impl FontTier {
    /// Glyph size in page units.
    pub const fn size(self) -> f32 {
        match self {
            Self::Title => 7.0,
            Self::Heading => 5.0,
            Self::Body => 3.5,
            Self::Table => 3.0,
        }
    }

    /// Vertical advance for one line of this tier.
    pub const fn line_height(self) -> f32 {
        match self {
            Self::Title => 9.5,
            Self::Heading => 7.0,
            Self::Body => 5.0,
            Self::Table => 4.2,
        }
    }
}

/// Horizontal text anchoring.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Text placement. `y` is the text baseline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TextCommand {
    pub x: f32,
    pub y: f32,
    pub text: String,
    pub tier: FontTier,
    pub bold: bool,
    pub color: Color,
    pub align: TextAlign,
}

impl TextCommand {
    /// Left-aligned black text of the given tier.
    pub fn plain(x: f32, y: f32, text: impl Into<String>, tier: FontTier) -> Self {
        Self {
            x,
            y,
            text: text.into(),
            tier,
            bold: false,
            color: Color::BLACK,
            align: TextAlign::Left,
        }
    }
}

/// Line segment.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LineCommand {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    pub color: Color,
    pub width: f32,
}

/// Axis-aligned rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RectCommand {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub color: Color,
    pub fill: bool,
}

/// Filled polygon from an explicit vertex list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PolygonCommand {
    pub points: Vec<(f32, f32)>,
    pub color: Color,
}

/// One drawable primitive.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum DrawCommand {
    Text(TextCommand),
    Line(LineCommand),
    Rect(RectCommand),
    Polygon(PolygonCommand),
}

/// One composed document page.
///
/// Chrome (the banner band) draws beneath content, so iteration yields
/// chrome commands first.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderPage {
    /// 1-based page number.
    pub page_number: usize,
    /// Section content.
    pub content: Vec<DrawCommand>,
    /// Page banner band and other repeating decoration.
    pub chrome: Vec<DrawCommand>,
}

impl RenderPage {
    /// Create an empty page.
    pub fn new(page_number: usize) -> Self {
        Self {
            page_number,
            content: Vec::new(),
            chrome: Vec::new(),
        }
    }

    /// Push a content-layer command.
    pub fn push_content(&mut self, cmd: DrawCommand) {
        self.content.push(cmd);
    }

    /// Push a chrome-layer command.
    pub fn push_chrome(&mut self, cmd: DrawCommand) {
        self.chrome.push(cmd);
    }

    /// Iterate all commands in draw order (chrome first).
    pub fn commands(&self) -> impl Iterator<Item = &DrawCommand> {
        self.chrome.iter().chain(self.content.iter())
    }

    /// Total command count across layers.
    pub fn command_count(&self) -> usize {
        self.chrome.len() + self.content.len()
    }

    /// Collect the text payloads on this page, in draw order.
    pub fn text_contents(&self) -> Vec<&str> {
        self.commands()
            .filter_map(|cmd| match cmd {
                DrawCommand::Text(text) => Some(text.text.as_str()),
                _ => None,
            })
            .collect()
    }
}
