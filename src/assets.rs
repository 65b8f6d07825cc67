use image::{ImageFormat, ImageReader, Rgba, RgbaImage};
use log::{debug, warn};
use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};
use thiserror::Error;

/// Point size used for every title-label font.
pub const TITLE_FONT_SIZE: u32 = 48;

pub const DEFAULT_OVERLAY: &str = "overlay.png";
pub const DEFAULT_FONT: &str = "DejaVuSansMono.ttf";

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("{}: not found", .0.display())]
    NotFound(PathBuf),
    #[error("{}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{}: not a usable font ({reason})", path.display())]
    FontParse { path: PathBuf, reason: &'static str },
    #[error("cannot render empty label text")]
    EmptyLabel,
}

// --- Texture Metadata ---

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TexMeta {
    pub w: u32,
    pub h: u32,
}

#[derive(Debug)]
pub struct Texture {
    pub key: String,
    pub meta: TexMeta,
    pub image: RgbaImage,
}

pub type TextureRef = Arc<Texture>;

/// A parsed TrueType face bound to the point size it was requested at.
pub struct Font {
    pub key: String,
    pub size: u32,
    face: fontdue::Font,
}

impl Font {
    pub fn from_bytes(key: String, size: u32, data: Vec<u8>) -> Result<Self, &'static str> {
        let settings = fontdue::FontSettings {
            scale: size as f32,
            ..fontdue::FontSettings::default()
        };
        let face = fontdue::Font::from_bytes(data, settings)?;
        Ok(Self { key, size, face })
    }
}

impl std::fmt::Debug for Font {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Font")
            .field("key", &self.key)
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}

pub type FontRef = Arc<Font>;

pub trait ImageLoader {
    fn load_image(&self, path: &Path) -> Result<TextureRef, AssetError>;
}

pub trait FontLoader {
    fn load_font(&self, path: &Path, size: u32) -> Result<FontRef, AssetError>;
}

pub trait TextRenderer {
    fn render_text(&self, font: &FontRef, text: &str) -> Result<TextureRef, AssetError>;
}

pub fn canonical_texture_key<P: AsRef<Path>>(p: P) -> String {
    p.as_ref().to_string_lossy().replace('\\', "/")
}

fn open_image_fallback(path: &Path) -> image::ImageResult<image::DynamicImage> {
    let hint = ImageFormat::from_path(path).ok();
    if let Some(fmt) = hint {
        let mut reader = ImageReader::open(path).map_err(image::ImageError::IoError)?;
        reader.set_format(fmt);
        if let Ok(img) = reader.decode() {
            return Ok(img);
        }
    }

    let guessed = ImageReader::open(path)
        .map_err(image::ImageError::IoError)?
        .with_guessed_format()?;
    if let (Some(hint_fmt), Some(real_fmt)) = (hint, guessed.format())
        && hint_fmt != real_fmt
    {
        warn!(
            "Graphic file '{}' is really {:?}",
            path.to_string_lossy(),
            real_fmt
        );
    }
    guessed.decode()
}

/// Filesystem-backed implementation of every asset collaborator.
#[derive(Debug, Default)]
pub struct AssetManager {
    asset_dir: PathBuf,
}

impl AssetManager {
    pub fn new<P: Into<PathBuf>>(asset_dir: P) -> Self {
        Self {
            asset_dir: asset_dir.into(),
        }
    }

    /// Path of a built-in asset shipped next to the binary.
    pub fn builtin(&self, name: &str) -> PathBuf {
        self.asset_dir.join(name)
    }
}

impl ImageLoader for AssetManager {
    fn load_image(&self, path: &Path) -> Result<TextureRef, AssetError> {
        if !path.is_file() {
            return Err(AssetError::NotFound(path.to_path_buf()));
        }
        let rgba = open_image_fallback(path)
            .map_err(|source| AssetError::Decode {
                path: path.to_path_buf(),
                source,
            })?
            .to_rgba8();
        debug!(
            "Loaded image {} ({}x{})",
            path.display(),
            rgba.width(),
            rgba.height()
        );
        Ok(Arc::new(Texture {
            key: canonical_texture_key(path),
            meta: TexMeta {
                w: rgba.width(),
                h: rgba.height(),
            },
            image: rgba,
        }))
    }
}

impl FontLoader for AssetManager {
    fn load_font(&self, path: &Path, size: u32) -> Result<FontRef, AssetError> {
        let data = fs::read(path).map_err(|source| match source.kind() {
            std::io::ErrorKind::NotFound => AssetError::NotFound(path.to_path_buf()),
            _ => AssetError::Io {
                path: path.to_path_buf(),
                source,
            },
        })?;
        let font = Font::from_bytes(canonical_texture_key(path), size, data).map_err(|reason| {
            AssetError::FontParse {
                path: path.to_path_buf(),
                reason,
            }
        })?;
        debug!("Loaded font {} at {size}px", path.display());
        Ok(Arc::new(font))
    }
}

/// Renders `text` as a single line of white glyphs whose alpha is the glyph coverage.
fn rasterize_line(font: &Font, text: &str) -> RgbaImage {
    let px = font.size as f32;
    let (ascent, descent) = font
        .face
        .horizontal_line_metrics(px)
        .map_or((px, 0.0), |m| (m.ascent, m.descent));
    let height = (ascent - descent).ceil().max(1.0) as u32;

    let glyphs: Vec<_> = text.chars().map(|c| font.face.rasterize(c, px)).collect();
    let advance: f32 = glyphs.iter().map(|(m, _)| m.advance_width).sum();
    let width = advance.ceil().max(1.0) as u32;

    let mut image = RgbaImage::new(width, height);
    let mut pen = 0.0f32;
    for (metrics, coverage) in &glyphs {
        let left = pen.round() as i32 + metrics.xmin;
        // fontdue's ymin is the bottom edge relative to the baseline, y up.
        let top = ascent.round() as i32 - metrics.ymin - metrics.height as i32;
        for (i, &alpha) in coverage.iter().enumerate() {
            if alpha == 0 {
                continue;
            }
            let x = left + (i % metrics.width) as i32;
            let y = top + (i / metrics.width) as i32;
            if x < 0 || y < 0 || x >= width as i32 || y >= height as i32 {
                continue;
            }
            let dst = image.get_pixel_mut(x as u32, y as u32);
            *dst = Rgba([255, 255, 255, dst.0[3].max(alpha)]);
        }
        pen += metrics.advance_width;
    }
    image
}

impl TextRenderer for AssetManager {
    fn render_text(&self, font: &FontRef, text: &str) -> Result<TextureRef, AssetError> {
        if text.is_empty() {
            return Err(AssetError::EmptyLabel);
        }
        let image = rasterize_line(font, text);
        Ok(Arc::new(Texture {
            key: format!("label:{}:{text}", font.key),
            meta: TexMeta {
                w: image.width(),
                h: image.height(),
            },
            image,
        }))
    }
}
