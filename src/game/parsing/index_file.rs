use crate::assets::{
    AssetError, FontLoader, FontRef, ImageLoader, TITLE_FONT_SIZE, TextRenderer, TextureRef,
};
use crate::game::grid::{DEFAULT_GUTTER, GridModel, GridSettings, Highlight, Rect, compute_layout};
use crate::game::parsing::directive::{self, Line, parse_int_args};
use crate::game::parsing::title_file::load_title;
use crate::game::title::{BoxArt, TitleRecord};
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use thiserror::Error;

pub const INDEX_FILE: &str = ".index";

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("{}: cannot open catalog index: {source}", path.display())]
    CatalogNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{}:{line}: box image not found; aborting", path.display())]
    BoxTemplate {
        path: PathBuf,
        line: usize,
        #[source]
        source: AssetError,
    },
    #[error("{}: no box cover art template specified; aborting", path.display())]
    MissingBoxTemplate { path: PathBuf },
}

/// Everything the catalog loader needs from the outside world.
pub trait CatalogAssets: ImageLoader + FontLoader + TextRenderer {}

impl<T: ImageLoader + FontLoader + TextRenderer> CatalogAssets for T {}

#[derive(Clone, Debug)]
pub struct LoadOptions {
    pub viewport_width: u32,
    /// Used when the index names no overlay, or names one that cannot be loaded.
    pub default_overlay: PathBuf,
    /// Used when the index names no font, or names one that cannot be loaded.
    pub default_font: PathBuf,
}

/// A fully built, read-only catalog.
#[derive(Clone, Debug)]
pub struct Catalog {
    pub root: PathBuf,
    pub settings: GridSettings,
    pub grid: GridModel,
}

#[derive(Default)]
struct IndexState {
    box_template: Option<TextureRef>,
    overlay: Option<TextureRef>,
    font: Option<FontRef>,
    inset_rect: Rect,
    gutter: Option<u32>,
    highlight: Highlight,
    titles: Vec<TitleRecord>,
}

/// Reads `<root>/.index` and every title it lists.
pub fn load_catalog<A: CatalogAssets>(
    root: &Path,
    opts: &LoadOptions,
    assets: &A,
) -> Result<Catalog, CatalogError> {
    let started = Instant::now();
    let path = root.join(INDEX_FILE);
    let bytes = fs::read(&path).map_err(|source| CatalogError::CatalogNotFound {
        path: path.clone(),
        source,
    })?;
    let content = String::from_utf8_lossy(&bytes);
    info!("Scanning catalog index '{}'...", path.display());

    let mut st = IndexState::default();
    for (line_no, parsed) in directive::lines(&content) {
        let d = match parsed {
            Ok(Line::Skip) => continue,
            Ok(Line::Entry(d)) => d,
            Err(e) => {
                warn!("{}:{line_no}: {e}; skipping", path.display());
                continue;
            }
        };

        if d.is("BOX") {
            let box_path = root.join(d.value);
            let tex = assets
                .load_image(&box_path)
                .map_err(|source| CatalogError::BoxTemplate {
                    path: path.clone(),
                    line: line_no,
                    source,
                })?;
            st.box_template = Some(tex);
        } else if d.is("OVERLAY") {
            st.overlay = match assets.load_image(&root.join(d.value)) {
                Ok(tex) => Some(tex),
                Err(e) => {
                    warn!("{}:{line_no}: overlay {e}", path.display());
                    None
                }
            };
        } else if d.is("FONT") {
            st.font = match assets.load_font(&root.join(d.value), TITLE_FONT_SIZE) {
                Ok(font) => Some(font),
                Err(e) => {
                    warn!("{}:{line_no}: font {e}", path.display());
                    None
                }
            };
        } else if d.is("INSET") {
            match parse_int_args::<4>(d.value) {
                Ok([x, y, w, h]) => {
                    info!("setting inset rect to ({x},{y}) {w}x{h}");
                    st.inset_rect = Rect::new(clamp_i32(x), clamp_i32(y), w, h);
                }
                Err(e) => warn!(
                    "{}:{line_no}: inset requires four integer arguments - `inset x y width height' ({e}); skipping",
                    path.display()
                ),
            }
        } else if d.is("GUTTER") {
            match parse_int_args::<1>(d.value) {
                Ok([g]) => {
                    info!("setting gutter to {g}");
                    st.gutter = Some(g);
                }
                Err(e) => warn!(
                    "{}:{line_no}: gutter value must be an integer ({e}); skipping",
                    path.display()
                ),
            }
        } else if d.is("HIGHLIGHT") {
            match parse_int_args::<5>(d.value) {
                Ok([width, r, g, b, a]) => {
                    let rgba = [channel(r), channel(g), channel(b), channel(a)];
                    info!("setting highlight to {width} wide, rgba({r},{g},{b},{a})");
                    st.highlight = Highlight { width, rgba };
                }
                Err(e) => warn!(
                    "{}:{line_no}: highlight requires five integer arguments - `highlight width R G B A' ({e}); skipping",
                    path.display()
                ),
            }
        } else if d.is("GAME") {
            info!("checking title {}/{}", root.display(), d.value);
            st.titles.push(load_title(root, d.value, assets));
        } else {
            warn!(
                "{}:{line_no}: unrecognized key `{}'; skipping",
                path.display(),
                d.key
            );
        }
    }

    let Some(box_template) = st.box_template else {
        return Err(CatalogError::MissingBoxTemplate { path });
    };
    let overlay = st
        .overlay
        .or_else(|| load_default(&opts.default_overlay, |p| assets.load_image(p)));
    let font = st.font.or_else(|| {
        load_default(&opts.default_font, |p| {
            assets.load_font(p, TITLE_FONT_SIZE)
        })
    });

    let gutter = st.gutter.unwrap_or(DEFAULT_GUTTER);
    let (cell_w, cell_h) = (box_template.meta.w, box_template.meta.h);
    let layout = compute_layout(cell_w, cell_h, gutter, opts.viewport_width);

    let mut titles = st.titles;
    place_titles(&mut titles, layout.columns, cell_w, cell_h, gutter);
    if let Some(font) = &font {
        synthesize_labels(&mut titles, font, assets);
    }

    info!(
        "Finished catalog scan. Found {} titles in {} columns (cell {}x{}, gutter {}, margin {}) in {:.2?}.",
        titles.len(),
        layout.columns,
        cell_w,
        cell_h,
        gutter,
        layout.margin,
        started.elapsed()
    );

    Ok(Catalog {
        root: root.to_path_buf(),
        settings: GridSettings {
            cell_w,
            cell_h,
            gutter,
            margin: layout.margin,
            highlight: st.highlight,
            inset_rect: st.inset_rect,
            box_template,
            overlay,
            font,
        },
        grid: GridModel::new(titles, layout.columns),
    })
}

fn load_default<T>(
    path: &Path,
    load: impl FnOnce(&Path) -> Result<T, AssetError>,
) -> Option<T> {
    match load(path) {
        Ok(v) => Some(v),
        Err(e) => {
            warn!("default asset unavailable: {e}");
            None
        }
    }
}

#[inline(always)]
fn clamp_i32(v: u32) -> i32 {
    i32::try_from(v).unwrap_or(i32::MAX)
}

#[inline(always)]
fn channel(v: u32) -> u8 {
    u8::try_from(v).unwrap_or(u8::MAX)
}

/// Row-major placement in index-file order.
fn place_titles(titles: &mut [TitleRecord], columns: u32, cell_w: u32, cell_h: u32, gutter: u32) {
    let columns = columns.max(1) as usize;
    let stride_x = i64::from(cell_w) + i64::from(gutter);
    let stride_y = i64::from(cell_h) + i64::from(gutter);
    for (i, title) in titles.iter_mut().enumerate() {
        let col = i % columns;
        let row = i / columns;
        title.grid_position = (col as u32, row as u32);
        title.pixel_position = (
            saturate(col as i64 * stride_x),
            saturate(row as i64 * stride_y + i64::from(gutter)),
        );
    }
}

#[inline(always)]
fn saturate(v: i64) -> i32 {
    v.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// Gives every art-less title a rendered name plate as its inset.
fn synthesize_labels(titles: &mut [TitleRecord], font: &FontRef, text: &dyn TextRenderer) {
    for title in titles.iter_mut().filter(|t| t.art.is_none()) {
        let label = title.display_title().to_uppercase();
        match text.render_text(font, &label) {
            Ok(tex) => title.art = BoxArt::Inset(tex),
            Err(e) => warn!(
                "{}: failed to render title label: {e}",
                title.path.display()
            ),
        }
    }
}
