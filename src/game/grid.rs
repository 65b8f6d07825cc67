use crate::assets::{FontRef, TextureRef};
use crate::game::navigation::{self, NavDirection};
use crate::game::title::TitleRecord;

/// Pixels between neighbouring cells unless the index file says otherwise.
pub const DEFAULT_GUTTER: u32 = 10;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }
}

/// Border drawn around the selected cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Highlight {
    pub width: u32,
    pub rgba: [u8; 4],
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridLayout {
    pub columns: u32,
    /// Left offset that centers the grid; negative when one cell is wider than the viewport.
    pub margin: i32,
}

/// Column count and horizontal centering margin for a viewport.
///
/// Integer division truncates, so an odd amount of leftover space puts the
/// extra pixel on the right.
pub fn compute_layout(cell_w: u32, _cell_h: u32, gutter: u32, viewport_w: u32) -> GridLayout {
    let stride = u64::from(cell_w) + u64::from(gutter);
    let columns = if stride == 0 {
        1
    } else {
        (u64::from(viewport_w) / stride).clamp(1, u64::from(u32::MAX)) as u32
    };
    let used = i64::from(cell_w) * i64::from(columns) + i64::from(gutter) * i64::from(columns - 1);
    let margin = (i64::from(viewport_w) - used) / 2;
    GridLayout {
        columns,
        margin: margin.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32,
    }
}

#[derive(Clone, Debug)]
pub struct GridSettings {
    pub cell_w: u32,
    pub cell_h: u32,
    pub gutter: u32,
    pub margin: i32,
    pub highlight: Highlight,
    /// Where a title's inset thumbnail sits inside its cell.
    pub inset_rect: Rect,
    pub box_template: TextureRef,
    pub overlay: Option<TextureRef>,
    pub font: Option<FontRef>,
}

#[derive(Clone, Debug)]
pub struct GridModel {
    titles: Vec<TitleRecord>,
    columns: u32,
    current: Option<usize>,
}

impl GridModel {
    /// Selection starts on the first title, or nowhere for an empty catalog.
    pub fn new(titles: Vec<TitleRecord>, columns: u32) -> Self {
        let current = if titles.is_empty() { None } else { Some(0) };
        Self {
            titles,
            columns: columns.max(1),
            current,
        }
    }

    #[inline(always)]
    pub fn titles(&self) -> &[TitleRecord] {
        &self.titles
    }

    #[inline(always)]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.titles.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }

    #[inline(always)]
    pub const fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current(&self) -> Option<&TitleRecord> {
        self.current.and_then(|i| self.titles.get(i))
    }

    /// Out-of-range indices are ignored.
    pub fn select(&mut self, index: usize) {
        if index < self.titles.len() {
            self.current = Some(index);
        }
    }

    /// Moves the selection one cell; returns whether it changed.
    pub fn navigate(&mut self, dir: NavDirection) -> bool {
        let Some(current) = self.current else {
            return false;
        };
        match navigation::step(current, self.columns as usize, self.titles.len(), dir) {
            Some(next) => {
                self.current = Some(next);
                true
            }
            None => false,
        }
    }
}
