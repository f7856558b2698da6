//! # TUI Components
//!
//! Stateless, props-based components. Each one borrows what it draws from the
//! core for a single frame:
//!
//! - `RegionView`: a bordered region showing a core `Surface` cell for cell
//! - `StatusLineView`: the reverse-video status line
//! - `ModalView`: help text or a table in a box over the main UI
//!
//! ```text
//! components/
//! ├── mod.rs           (this file)
//! ├── region_view.rs   (transcript and input regions)
//! ├── status_line.rs   (bottom line)
//! └── modal_view.rs    (HELP / LIST / PEERLIST surfaces)
//! ```

mod modal_view;
mod region_view;
mod status_line;

pub use modal_view::ModalView;
pub use region_view::RegionView;
pub use status_line::StatusLineView;

#[cfg(test)]
pub(crate) fn buffer_lines(buffer: &ratatui::buffer::Buffer) -> Vec<String> {
    let area = buffer.area;
    (area.top()..area.bottom())
        .map(|y| {
            (area.left()..area.right())
                .map(|x| buffer[(x, y)].symbol())
                .collect::<String>()
        })
        .collect()
}
