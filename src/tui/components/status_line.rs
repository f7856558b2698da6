//! # StatusLineView Component
//!
//! The bottom line, reverse video across the full width, text from column 1.
//! Urgent messages are bold.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::Paragraph;

use crate::core::status::StatusLine;
use crate::tui::component::Component;

pub struct StatusLineView {
    pub line: StatusLine,
}

impl StatusLineView {
    pub fn new(line: StatusLine) -> Self {
        Self { line }
    }

    fn style(&self) -> Style {
        let style = Style::default().add_modifier(Modifier::REVERSED);
        if self.line.emphasized {
            style.add_modifier(Modifier::BOLD)
        } else {
            style
        }
    }
}

impl Component for StatusLineView {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let paragraph = Paragraph::new(format!(" {}", self.line.text)).style(self.style());
        frame.render_widget(paragraph, area);
    }
}
