//! # ModalView Component
//!
//! Draws a core `Modal` over whatever is already in the frame:
//!
//! ```text
//! ┌──────── Command Help: nick ────────┐
//! │Syntax: \NICK [NEW_NICKNAME]        │
//! │                                    │
//! │Change your nickname, or show the   │
//! │current one.                        │
//! └─── Press any key to continue... ───┘
//! ```
//!
//! The box is placed by `ModalExtent::area` against the full frame, so `render`
//! expects the whole terminal as its area. Text bodies are wrapped to the inner
//! width; tables use the modal's column percentages.

use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style, Stylize};
use ratatui::text::Line;
use ratatui::widgets::{Block, Clear, Paragraph, Row, Table};

use crate::core::modal::{MODAL_FOOTER, Modal, ModalBody};
use crate::tui::component::Component;

pub struct ModalView<'a> {
    pub modal: &'a Modal,
}

impl<'a> ModalView<'a> {
    pub fn new(modal: &'a Modal) -> Self {
        Self { modal }
    }

    fn wrapped(paragraphs: &[String], width: u16) -> Vec<Line<'static>> {
        let width = usize::from(width.max(1));
        paragraphs
            .iter()
            .flat_map(|p| textwrap::wrap(p, width))
            .map(|l| Line::from(l.into_owned()))
            .collect()
    }
}

impl Component for ModalView<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let region = self.modal.extent.area(area.height, area.width);
        let rect = Rect::new(
            area.x + region.origin_col,
            area.y + region.origin_row,
            region.width,
            region.height,
        )
        .intersection(area);
        if rect.is_empty() {
            return;
        }

        let block = Block::bordered()
            .title(Line::from(self.modal.title.as_str()).bold().centered())
            .title_bottom(Line::from(MODAL_FOOTER).centered());
        let inner = block.inner(rect);

        frame.render_widget(Clear, rect);
        frame.render_widget(block, rect);

        match &self.modal.body {
            ModalBody::Text(paragraphs) => {
                let lines = Self::wrapped(paragraphs, inner.width);
                frame.render_widget(Paragraph::new(lines), inner);
            }
            ModalBody::Table {
                headers,
                rows,
                widths,
            } => {
                let header = Row::new(headers.clone())
                    .style(Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED));
                let rows = rows.iter().map(|r| Row::new(r.clone()));
                let widths = widths.iter().map(|w| Constraint::Percentage(*w));
                let table = Table::new(rows, widths).header(header).column_spacing(0);
                frame.render_widget(table, inner);
            }
        }
    }
}
