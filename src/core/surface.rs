//! Character-cell backing store for a bordered region.
//!
//! Rows are indexed the way the region is: row 0 and the last row sit under the
//! border, so writers use rows `1..=height-2`. Rows are not clipped to the
//! region width here; the renderer clips, so a long row never spills into the
//! next one.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Surface {
    rows: Vec<Vec<char>>,
}

impl Surface {
    pub fn new(height: u16) -> Self {
        Self {
            rows: vec![Vec::new(); height as usize],
        }
    }

    pub fn height(&self) -> u16 {
        self.rows.len() as u16
    }

    /// Overwrite cells starting at `(row, col)`, padding with spaces if the row
    /// is shorter than `col`. Writes to rows outside the surface are dropped.
    pub fn put_str(&mut self, row: u16, col: u16, text: &str) {
        let Some(cells) = self.rows.get_mut(row as usize) else {
            return;
        };
        let mut at = col as usize;
        for ch in text.chars() {
            if at < cells.len() {
                cells[at] = ch;
            } else {
                cells.resize(at, ' ');
                cells.push(ch);
            }
            at += 1;
        }
    }

    pub fn put_char(&mut self, row: u16, col: u16, ch: char) {
        let mut buf = [0u8; 4];
        self.put_str(row, col, ch.encode_utf8(&mut buf));
    }

    pub fn clear_row(&mut self, row: u16) {
        if let Some(cells) = self.rows.get_mut(row as usize) {
            cells.clear();
        }
    }

    pub fn clear(&mut self) {
        self.rows.iter_mut().for_each(Vec::clear);
    }

    /// Scroll rows `top..=bottom` up by one: `top` is discarded, `bottom` becomes
    /// blank. A one-row region is just cleared.
    pub fn scroll_up(&mut self, top: u16, bottom: u16) {
        let (top, bottom) = (top as usize, bottom as usize);
        if top > bottom || bottom >= self.rows.len() {
            return;
        }
        self.rows[top..=bottom].rotate_left(1);
        self.rows[bottom].clear();
    }

    /// Scroll rows `top..=bottom` down by one: `bottom` is discarded, `top` becomes blank.
    pub fn scroll_down(&mut self, top: u16, bottom: u16) {
        let (top, bottom) = (top as usize, bottom as usize);
        if top > bottom || bottom >= self.rows.len() {
            return;
        }
        self.rows[top..=bottom].rotate_right(1);
        self.rows[top].clear();
    }

    /// Change the number of rows, keeping the top ones.
    pub fn set_height(&mut self, height: u16) {
        self.rows.resize(height as usize, Vec::new());
    }

    pub fn row(&self, row: u16) -> String {
        self.rows
            .get(row as usize)
            .map(|cells| cells.iter().collect())
            .unwrap_or_default()
    }

    pub fn lines(&self) -> impl Iterator<Item = String> + '_ {
        self.rows.iter().map(|cells| cells.iter().collect())
    }
}
