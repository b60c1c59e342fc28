//! Cyclic cursor navigation for the binding grid.
//!
//! The binding menu never has an out-of-bounds cursor: moving past the last
//! item lands on the first one, and moving before the first lands on the last.

/// Returns `(index + delta) mod item_count`, always in `0..item_count`.
///
/// Uses Euclidean remainder so negative deltas wrap backwards.  An empty list
/// has no valid index; the result is then 0.
///
/// ```rust
/// use keybind_core::advance;
///
/// assert_eq!(advance(4, 1, 5), 0);
/// assert_eq!(advance(0, -1, 5), 4);
/// ```
pub fn advance(index: usize, delta: isize, item_count: usize) -> usize {
    if item_count == 0 {
        return 0;
    }
    let count = item_count as i64;
    let next = (index as i64 + delta as i64).rem_euclid(count);
    next as usize
}

/// How many binding slots per action fit on a screen `width` pixels wide.
///
/// The stock resolutions of the engine family map to 1–3 rows; anything
/// wider gets 4.
pub fn rows_for_screen_width(width: u32) -> usize {
    match width {
        544 => 1,
        640 => 2,
        800 => 3,
        _ => 4,
    }
}

/// Cursor over a `columns × rows` grid with wraparound on both axes.
///
/// Columns are actions and rows are the binding slots under each action, one
/// per device.  The flat index is `column * rows + row`, matching the order in
/// which the menu lays out its boxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridCursor {
    columns: usize,
    rows: usize,
    column: usize,
    row: usize,
}

impl GridCursor {
    /// Creates a cursor at `(0, 0)`.
    pub fn new(columns: usize, rows: usize) -> Self {
        Self {
            columns,
            rows,
            column: 0,
            row: 0,
        }
    }

    /// Moves by `dx` columns and `dy` rows, wrapping on each axis independently.
    pub fn move_by(&mut self, dx: isize, dy: isize) {
        self.column = advance(self.column, dx, self.columns);
        self.row = advance(self.row, dy, self.rows);
    }

    /// Current column (action index).
    pub fn column(&self) -> usize {
        self.column
    }

    /// Current slot within the column.
    pub fn row(&self) -> usize {
        self.row
    }

    /// Flat box index: `column * rows + row`.
    pub fn index(&self) -> usize {
        self.column * self.rows + self.row
    }

    /// Total number of boxes in the grid.
    pub fn len(&self) -> usize {
        self.columns * self.rows
    }

    /// Returns `true` if the grid has no boxes.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
