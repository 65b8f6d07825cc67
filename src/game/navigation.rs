#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NavDirection {
    Left,
    Right,
    Up,
    Down,
}

/// Index reached by moving one cell from `current` in a row-major grid of
/// `len` titles, or `None` when the grid edge blocks the move.
///
/// Horizontal moves never wrap onto a neighbouring row.
#[inline(always)]
pub fn step(current: usize, columns: usize, len: usize, dir: NavDirection) -> Option<usize> {
    let columns = columns.max(1);
    if current >= len {
        return None;
    }
    match dir {
        NavDirection::Left => (current % columns > 0).then(|| current - 1),
        NavDirection::Right => {
            (current % columns < columns - 1 && current + 1 < len).then(|| current + 1)
        }
        NavDirection::Up => (current >= columns).then(|| current - columns),
        NavDirection::Down => (current + columns < len).then(|| current + columns),
    }
}
