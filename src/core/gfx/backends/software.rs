use crate::core::gfx::Renderer;
use crate::game::grid::Rect;
use crate::ui::actors::Actor;
use image::{Rgba, RgbaImage};
use log::{error, info, trace};
use std::path::PathBuf;

/// CPU compositor that paints the draw list into an in-memory canvas.
pub struct State {
    canvas: RgbaImage,
    frames: u64,
    dump_path: Option<PathBuf>,
}

pub fn init(width: u32, height: u32, dump_path: Option<PathBuf>) -> State {
    info!("Initializing software renderer ({width}x{height})...");
    State {
        canvas: RgbaImage::new(width, height),
        frames: 0,
        dump_path,
    }
}

impl State {
    pub const fn canvas(&self) -> &RgbaImage {
        &self.canvas
    }
}

#[inline(always)]
fn blend(dst: &mut Rgba<u8>, src: [u8; 4]) {
    let sa = u32::from(src[3]);
    if sa == 0 {
        return;
    }
    let inv = 255 - sa;
    for c in 0..3 {
        dst.0[c] = ((u32::from(src[c]) * sa + u32::from(dst.0[c]) * inv + 127) / 255) as u8;
    }
    dst.0[3] = (sa + (u32::from(dst.0[3]) * inv + 127) / 255).min(255) as u8;
}

/// Intersection of `rect` and the canvas as `(x0, y0, x1, y1)`.
fn clip(rect: Rect, width: u32, height: u32) -> Option<(u32, u32, u32, u32)> {
    let x0 = i64::from(rect.x).max(0);
    let y0 = i64::from(rect.y).max(0);
    let x1 = (i64::from(rect.x) + i64::from(rect.w)).min(i64::from(width));
    let y1 = (i64::from(rect.y) + i64::from(rect.h)).min(i64::from(height));
    (x0 < x1 && y0 < y1).then(|| (x0 as u32, y0 as u32, x1 as u32, y1 as u32))
}

fn fill(canvas: &mut RgbaImage, rect: Rect, rgba: [u8; 4]) {
    let Some((x0, y0, x1, y1)) = clip(rect, canvas.width(), canvas.height()) else {
        return;
    };
    for y in y0..y1 {
        for x in x0..x1 {
            blend(canvas.get_pixel_mut(x, y), rgba);
        }
    }
}

/// Copies the texture's top-left corner into `rect`, clipped to both.
fn blit(canvas: &mut RgbaImage, rect: Rect, image: &RgbaImage) {
    let limited = Rect::new(
        rect.x,
        rect.y,
        rect.w.min(image.width()),
        rect.h.min(image.height()),
    );
    let Some((x0, y0, x1, y1)) = clip(limited, canvas.width(), canvas.height()) else {
        return;
    };
    for y in y0..y1 {
        let sy = (i64::from(y) - i64::from(rect.y)) as u32;
        for x in x0..x1 {
            let sx = (i64::from(x) - i64::from(rect.x)) as u32;
            blend(canvas.get_pixel_mut(x, y), image.get_pixel(sx, sy).0);
        }
    }
}

impl Renderer for State {
    fn draw(&mut self, actors: &[Actor]) {
        for actor in actors {
            match actor {
                Actor::Quad { rect, rgba } => fill(&mut self.canvas, *rect, *rgba),
                Actor::Sprite { texture, rect } => blit(&mut self.canvas, *rect, &texture.image),
            }
        }
        self.frames += 1;
        trace!("frame {} composed ({} actors)", self.frames, actors.len());
    }

    fn finish(&mut self) {
        let Some(path) = &self.dump_path else {
            return;
        };
        match self.canvas().save(path) {
            Ok(()) => info!("Wrote last frame to {}", path.display()),
            Err(e) => error!("Failed to write frame to {}: {e}", path.display()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::init;
    use crate::assets::{AssetManager, DEFAULT_FONT, FontLoader, TexMeta, TextRenderer, Texture};
    use crate::core::gfx::Renderer;
    use crate::game::grid::Rect;
    use crate::ui::actors::Actor;
    use image::{Rgba, RgbaImage};
    use std::sync::Arc;

    #[test]
    fn quads_are_clipped_to_canvas() {
        let mut r = init(4, 4, None);
        r.draw(&[Actor::Quad {
            rect: Rect::new(-2, 2, 10, 10),
            rgba: [255, 0, 0, 255],
        }]);
        assert_eq!(*r.canvas().get_pixel(0, 1), Rgba([0, 0, 0, 0]));
        assert_eq!(*r.canvas().get_pixel(3, 3), Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn sprites_are_clipped_to_their_rect() {
        let mut img = RgbaImage::new(4, 4);
        for p in img.pixels_mut() {
            *p = Rgba([0, 255, 0, 255]);
        }
        let texture = Arc::new(Texture {
            key: "green".into(),
            meta: TexMeta { w: 4, h: 4 },
            image: img,
        });
        let mut r = init(8, 8, None);
        r.draw(&[Actor::Sprite {
            texture,
            rect: Rect::new(1, 1, 2, 2),
        }]);
        assert_eq!(*r.canvas().get_pixel(1, 1), Rgba([0, 255, 0, 255]));
        assert_eq!(*r.canvas().get_pixel(2, 2), Rgba([0, 255, 0, 255]));
        assert_eq!(*r.canvas().get_pixel(3, 3), Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn title_labels_composite_as_glyphs() {
        let assets = AssetManager::new(concat!(env!("CARGO_MANIFEST_DIR"), "/assets"));
        let font = assets
            .load_font(&assets.builtin(DEFAULT_FONT), 48)
            .expect("bundled font should parse");
        let label = assets.render_text(&font, "ZELDA").expect("label");
        let rect = Rect::new(0, 0, label.meta.w, label.meta.h);

        let mut r = init(label.meta.w, label.meta.h, None);
        r.draw(&[
            Actor::Quad {
                rect,
                rgba: [20, 20, 20, 255],
            },
            Actor::Sprite {
                texture: label,
                rect,
            },
        ]);
        let shades: std::collections::BTreeSet<u8> = r.canvas().pixels().map(|p| p.0[0]).collect();
        assert!(shades.contains(&20), "backing shows between glyphs");
        assert!(shades.contains(&255), "glyph interiors are solid");
        assert!(shades.len() > 2, "edges are anti-aliased, got {shades:?}");
    }

    #[test]
    fn finish_writes_png_when_requested() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("frame.png");
        let mut r = init(2, 2, Some(path.clone()));
        r.draw(&[]);
        r.finish();
        let saved = image::open(&path).expect("frame should be readable");
        assert_eq!((saved.width(), saved.height()), (2, 2));
    }
}
