use crate::assets::TextureRef;
use crate::game::grid::Rect;

/// One entry of a frame's draw list, painted in list order.
#[derive(Clone, Debug)]
pub enum Actor {
    /// Solid fill.
    Quad { rect: Rect, rgba: [u8; 4] },
    /// Texture blitted at `rect.x/rect.y`, clipped to `rect.w x rect.h`.
    Sprite { texture: TextureRef, rect: Rect },
}

impl Actor {
    pub const fn rect(&self) -> Rect {
        match self {
            Self::Quad { rect, .. } | Self::Sprite { rect, .. } => *rect,
        }
    }
}
