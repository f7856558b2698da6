//! # RegionView Component
//!
//! Draws a core `Surface` into a bordered box. Row `n` of the surface lands on
//! row `n` of the area; the border is drawn last, over rows 0 and `height-1`
//! and the outer columns, so text never bleeds past it. Rows are not wrapped:
//! anything wider than the area is clipped.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::Line;
use ratatui::widgets::{Block, Paragraph};

use crate::core::surface::Surface;
use crate::tui::component::Component;

pub struct RegionView<'a> {
    pub surface: &'a Surface,
}

impl<'a> RegionView<'a> {
    pub fn new(surface: &'a Surface) -> Self {
        Self { surface }
    }
}

impl Component for RegionView<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let lines: Vec<Line> = self.surface.lines().map(Line::from).collect();
        frame.render_widget(Paragraph::new(lines), area);
        frame.render_widget(Block::bordered(), area);
    }
}
