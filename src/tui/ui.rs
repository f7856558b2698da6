use ratatui::Frame;
use ratatui::layout::{Position, Rect};

use crate::core::layout::Region;
use crate::core::modal::Modal;
use crate::core::state::UiState;
use crate::tui::component::Component;
use crate::tui::components::{ModalView, RegionView, StatusLineView};

/// Region geometry comes from the core; clip it to the frame in case the
/// terminal shrank since the last resize was handled.
fn rect(frame: &Frame, region: Region) -> Rect {
    Rect::new(
        region.origin_col,
        region.origin_row,
        region.width,
        region.height,
    )
    .intersection(frame.area())
}

pub fn draw_ui(frame: &mut Frame, state: &UiState) {
    let geometry = state.geometry;

    let transcript_area = rect(frame, geometry.transcript);
    RegionView::new(state.transcript.surface()).render(frame, transcript_area);

    let input_area = rect(frame, geometry.input);
    RegionView::new(state.editor.surface()).render(frame, input_area);

    let status_area = rect(frame, geometry.status);
    StatusLineView::new(state.status.visible()).render(frame, status_area);

    let (line, col) = state.editor.cursor();
    let cursor = Position::new(input_area.x + col, input_area.y + line);
    if input_area.contains(cursor) {
        frame.set_cursor_position(cursor);
    }
}

pub fn draw_modal(frame: &mut Frame, state: &UiState, modal: &Modal) {
    draw_ui(frame, state);
    let area = frame.area();
    ModalView::new(modal).render(frame, area);
}
