use crate::game::grid::{GridModel, GridSettings, Rect};
use crate::game::title::{BoxArt, TitleRecord};
use crate::ui::actors::Actor;
use log::debug;

// --- Colors ---
const BACKDROP_RGBA: [u8; 4] = [128, 128, 128, 255];
const INSET_BACKING_RGBA: [u8; 4] = [20, 20, 20, 255];

/// Vertical slice of the full grid that is on screen: `[top, bottom)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CameraBand {
    pub top: i64,
    pub bottom: i64,
}

impl CameraBand {
    /// Band that follows a selected cell whose top edge sits at `selected_y`.
    pub fn follow(selected_y: i32, viewport_h: u32, cell_h: u32) -> Self {
        let top = i64::from(selected_y) - i64::from(viewport_h / 2) - i64::from(cell_h);
        Self {
            top,
            bottom: top + i64::from(viewport_h) + i64::from(cell_h),
        }
    }

    #[inline(always)]
    pub fn contains(&self, y: i32) -> bool {
        (self.top..self.bottom).contains(&i64::from(y))
    }
}

#[derive(Clone, Copy, Debug)]
pub struct VisibleTitle<'a> {
    pub index: usize,
    pub title: &'a TitleRecord,
    pub draw_x: i32,
    pub draw_y: i32,
    pub selected: bool,
}

#[inline(always)]
fn to_screen(v: i64) -> i32 {
    v.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// Titles inside the camera band, translated into screen space.
///
/// Recomputed from the model on every call; nothing is cached between frames.
pub fn visible_titles<'a>(
    grid: &'a GridModel,
    settings: &GridSettings,
    viewport_h: u32,
) -> Vec<VisibleTitle<'a>> {
    let Some(current) = grid.current() else {
        return Vec::new();
    };
    let selected = grid.current_index();
    let band = CameraBand::follow(current.pixel_position.1, viewport_h, settings.cell_h);

    grid.titles()
        .iter()
        .enumerate()
        .filter(|(_, t)| band.contains(t.pixel_position.1))
        .map(|(index, title)| VisibleTitle {
            index,
            title,
            draw_x: to_screen(i64::from(title.pixel_position.0) + i64::from(settings.margin)),
            draw_y: to_screen(i64::from(title.pixel_position.1) - band.top),
            selected: selected == Some(index),
        })
        .collect()
}

pub struct TitleGridParams<'a> {
    pub grid: &'a GridModel,
    pub settings: &'a GridSettings,
    pub viewport_w: u32,
    pub viewport_h: u32,
}

/// Draw list for one frame: backdrop, selection highlight, cells, then the
/// grid-wide overlay on top.
pub fn build(p: TitleGridParams) -> Vec<Actor> {
    let s = p.settings;
    let visible = visible_titles(p.grid, s, p.viewport_h);
    let mut actors = Vec::with_capacity(visible.len() * 3 + 3);

    actors.push(Actor::Quad {
        rect: Rect::new(0, 0, p.viewport_w, p.viewport_h),
        rgba: BACKDROP_RGBA,
    });

    if let Some(sel) = visible.iter().find(|v| v.selected) {
        let hw = s.highlight.width;
        let pad = i32::try_from(hw).unwrap_or(i32::MAX);
        actors.push(Actor::Quad {
            rect: Rect::new(
                sel.draw_x.saturating_sub(pad),
                sel.draw_y.saturating_sub(pad),
                s.cell_w.saturating_add(hw.saturating_mul(2)),
                s.cell_h.saturating_add(hw.saturating_mul(2)),
            ),
            rgba: s.highlight.rgba,
        });
    }

    for v in &visible {
        let cell = Rect::new(v.draw_x, v.draw_y, s.cell_w, s.cell_h);
        actors.push(Actor::Sprite {
            texture: s.box_template.clone(),
            rect: cell,
        });
        match &v.title.art {
            BoxArt::Inset(tex) => {
                let inset = Rect::new(
                    v.draw_x.saturating_add(s.inset_rect.x),
                    v.draw_y.saturating_add(s.inset_rect.y),
                    s.inset_rect.w,
                    s.inset_rect.h,
                );
                actors.push(Actor::Quad {
                    rect: inset,
                    rgba: INSET_BACKING_RGBA,
                });
                actors.push(Actor::Sprite {
                    texture: tex.clone(),
                    rect: inset,
                });
            }
            BoxArt::Overlay(tex) => actors.push(Actor::Sprite {
                texture: tex.clone(),
                rect: cell,
            }),
            BoxArt::None => debug!(
                "{}: nothing to render (no overlay and no inset graphic)",
                v.title.path.display()
            ),
        }
    }

    if let Some(overlay) = &s.overlay {
        actors.push(Actor::Sprite {
            texture: overlay.clone(),
            rect: Rect::new(0, 0, p.viewport_w, p.viewport_h),
        });
    }
    actors
}

#[cfg(test)]
mod tests {
    use super::{CameraBand, TitleGridParams, build, visible_titles};
    use crate::assets::{TexMeta, Texture, TextureRef};
    use crate::game::grid::{GridModel, GridSettings, Highlight, Rect};
    use crate::game::title::{BoxArt, TitleRecord};
    use crate::ui::actors::Actor;
    use image::RgbaImage;
    use std::sync::Arc;

    fn tex(key: &str, w: u32, h: u32) -> TextureRef {
        Arc::new(Texture {
            key: key.to_string(),
            meta: TexMeta { w, h },
            image: RgbaImage::new(1, 1),
        })
    }

    fn settings() -> GridSettings {
        GridSettings {
            cell_w: 300,
            cell_h: 200,
            gutter: 10,
            margin: 25,
            highlight: Highlight {
                width: 5,
                rgba: [255, 255, 0, 255],
            },
            inset_rect: Rect::new(10, 10, 100, 50),
            box_template: tex("box", 300, 200),
            overlay: Some(tex("overlay", 1280, 768)),
            font: None,
        }
    }

    /// 4 columns x 10 rows, placed like the catalog loader does.
    fn grid(len: usize) -> GridModel {
        let titles = (0..len)
            .map(|i| {
                let (col, row) = (i % 4, i / 4);
                let mut t = TitleRecord::new(format!("t{i}"));
                t.grid_position = (col as u32, row as u32);
                t.pixel_position = ((col * 310) as i32, (row * 210 + 10) as i32);
                t
            })
            .collect();
        GridModel::new(titles, 4)
    }

    #[test]
    fn band_spans_viewport_plus_one_cell() {
        let band = CameraBand::follow(640, 768, 200);
        assert_eq!(band.top, 640 - 384 - 200);
        assert_eq!(band.bottom - band.top, 968);
        assert!(band.contains(band.top as i32));
        assert!(!band.contains(band.bottom as i32));
    }

    #[test]
    fn only_rows_inside_band_are_visible() {
        let mut g = grid(40);
        g.select(17); // row 4, y = 850
        let s = settings();
        let visible = visible_titles(&g, &s, 768);
        let band = CameraBand::follow(850, 768, 200);
        assert!(!visible.is_empty());
        for v in &visible {
            assert!(band.contains(v.title.pixel_position.1));
            assert_eq!(v.draw_x, v.title.pixel_position.0 + 25);
            assert_eq!(i64::from(v.draw_y), i64::from(v.title.pixel_position.1) - band.top);
        }
        let rows: Vec<u32> = visible.iter().map(|v| v.title.grid_position.1).collect();
        assert_eq!(rows.first(), Some(&2));
        assert_eq!(rows.last(), Some(&5));
        assert_eq!(visible.iter().filter(|v| v.selected).count(), 1);
        assert!(visible.iter().any(|v| v.selected && v.index == 17));
    }

    #[test]
    fn recomputation_is_idempotent() {
        let mut g = grid(40);
        g.select(9);
        let s = settings();
        let a: Vec<_> = visible_titles(&g, &s, 768)
            .iter()
            .map(|v| (v.index, v.draw_x, v.draw_y, v.selected))
            .collect();
        let b: Vec<_> = visible_titles(&g, &s, 768)
            .iter()
            .map(|v| (v.index, v.draw_x, v.draw_y, v.selected))
            .collect();
        assert_eq!(a, b);
    }

    #[test]
    fn empty_catalog_draws_backdrop_and_overlay_only() {
        let g = grid(0);
        let s = settings();
        assert!(visible_titles(&g, &s, 768).is_empty());
        let actors = build(TitleGridParams {
            grid: &g,
            settings: &s,
            viewport_w: 1280,
            viewport_h: 768,
        });
        assert_eq!(actors.len(), 2);
        assert!(matches!(actors[0], Actor::Quad { .. }));
        assert!(matches!(&actors[1], Actor::Sprite { texture, .. } if texture.key == "overlay"));
    }

    #[test]
    fn highlight_surrounds_selection_before_cells() {
        let mut g = grid(1);
        g.select(0);
        let s = settings();
        let actors = build(TitleGridParams {
            grid: &g,
            settings: &s,
            viewport_w: 1280,
            viewport_h: 768,
        });
        let Actor::Quad { rect, rgba } = &actors[1] else {
            panic!("expected highlight quad, got {:?}", actors[1]);
        };
        let Actor::Sprite { rect: cell, .. } = &actors[2] else {
            panic!("expected box sprite, got {:?}", actors[2]);
        };
        assert_eq!(*rgba, [255, 255, 0, 255]);
        assert_eq!(rect.x, cell.x - 5);
        assert_eq!(rect.y, cell.y - 5);
        assert_eq!((rect.w, rect.h), (310, 210));
    }

    #[test]
    fn inset_art_gets_backing_and_is_clipped_to_inset_rect() {
        let mut titles = vec![TitleRecord::new("a")];
        titles[0].pixel_position = (0, 10);
        titles[0].art = BoxArt::Inset(tex("shot", 640, 480));
        let g = GridModel::new(titles, 4);
        let s = settings();
        let actors = build(TitleGridParams {
            grid: &g,
            settings: &s,
            viewport_w: 1280,
            viewport_h: 768,
        });
        // backdrop, highlight, box, backing, inset, overlay
        assert_eq!(actors.len(), 6);
        let cell = actors[2].rect();
        let backing = actors[3].rect();
        assert_eq!(backing, actors[4].rect());
        assert_eq!(backing, Rect::new(cell.x + 10, cell.y + 10, 100, 50));
    }
}
