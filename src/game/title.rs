use crate::assets::TextureRef;
use std::path::{Path, PathBuf};

/// Per-title cover art. A title carries at most one of the two kinds.
#[derive(Clone, Debug, Default)]
pub enum BoxArt {
    #[default]
    None,
    /// Thumbnail drawn inside the grid's inset rectangle.
    Inset(TextureRef),
    /// Full-cell image drawn over the box template.
    Overlay(TextureRef),
}

impl BoxArt {
    #[inline(always)]
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    pub const fn inset(&self) -> Option<&TextureRef> {
        match self {
            Self::Inset(t) => Some(t),
            _ => None,
        }
    }

    pub const fn overlay(&self) -> Option<&TextureRef> {
        match self {
            Self::Overlay(t) => Some(t),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct TitleRecord {
    /// Directory of the title, relative to the catalog root.
    pub path: PathBuf,
    pub title: Option<String>,
    pub developer: Option<String>,
    pub publisher: Option<String>,
    pub released: Option<String>,
    /// Shell template; `%s` is replaced by the title's absolute path at launch.
    pub launch_command: Option<String>,
    pub art: BoxArt,
    /// (column, row)
    pub grid_position: (u32, u32),
    /// Top-left corner within the full, unclipped grid.
    pub pixel_position: (i32, i32),
}

impl TitleRecord {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Record used when the title directory has no readable metadata.
    pub fn from_dir_name(dir: &str) -> Self {
        let mut record = Self::new(dir);
        record.title = Some(base_name(dir).to_string());
        record
    }

    pub fn display_title(&self) -> &str {
        match self.title.as_deref() {
            Some(t) if !t.trim().is_empty() => t,
            _ => base_name_of(&self.path),
        }
    }

    pub fn absolute_path(&self, root: &Path) -> PathBuf {
        root.join(&self.path)
    }
}

fn base_name(dir: &str) -> &str {
    dir.trim_end_matches(['/', '\\'])
        .rsplit(['/', '\\'])
        .next()
        .filter(|s| !s.is_empty())
        .unwrap_or(dir)
}

fn base_name_of(path: &Path) -> &str {
    path.file_name().and_then(|s| s.to_str()).unwrap_or("")
}
