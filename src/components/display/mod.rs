//! E-paper panel collaborator.
//!
//! The core never touches pixels: it issues drawing directives against this
//! trait and commits the framebuffer when a region is complete. The
//! appliance build wires the panel driver; the host build logs directives.

pub mod grid;
pub mod render;

use tracing::debug;

/// Font tiers available on the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontTier {
    Tiny,
    Small,
    Mid,
    Header,
}

/// Horizontal text alignment relative to the anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

/// Screen anchor position in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Coordinates {
    pub x: i32,
    pub y: i32,
}

/// Axis-aligned pixel rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// Drawing directives the core issues; implementations own the pixels
pub trait Display: Send {
    fn width(&self) -> i32;

    fn height(&self) -> i32;

    fn draw_text(&mut self, font: FontTier, align: TextAlign, x: i32, y: i32, text: &str);

    /// White-on-dark text for the inverted today cell
    fn draw_text_inverted(&mut self, font: FontTier, align: TextAlign, x: i32, y: i32, text: &str);

    fn draw_progress_bar(&mut self, x: i32, y: i32, percent: u8);

    fn fill_rect(&mut self, rect: Rect);

    fn outline_rect(&mut self, rect: Rect);

    /// Push the framebuffer to the physical panel
    fn commit(&mut self);
}

/// Host display: traces every directive instead of driving a panel
pub struct LogDisplay {
    width: i32,
    height: i32,
}

impl LogDisplay {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

impl Display for LogDisplay {
    fn width(&self) -> i32 {
        self.width
    }

    fn height(&self) -> i32 {
        self.height
    }

    fn draw_text(&mut self, font: FontTier, align: TextAlign, x: i32, y: i32, text: &str) {
        debug!("text {:?} {:?} at ({}, {}): {}", font, align, x, y, text);
    }

    fn draw_text_inverted(&mut self, font: FontTier, align: TextAlign, x: i32, y: i32, text: &str) {
        debug!(
            "inverted text {:?} {:?} at ({}, {}): {}",
            font, align, x, y, text
        );
    }

    fn draw_progress_bar(&mut self, x: i32, y: i32, percent: u8) {
        debug!("progress bar at ({}, {}): {}%", x, y, percent);
    }

    fn fill_rect(&mut self, rect: Rect) {
        debug!("fill rect {:?}", rect);
    }

    fn outline_rect(&mut self, rect: Rect) {
        debug!("outline rect {:?}", rect);
    }

    fn commit(&mut self) {
        debug!("commit framebuffer");
    }
}
