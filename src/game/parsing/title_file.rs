use crate::assets::ImageLoader;
use crate::game::parsing::directive::{self, Line};
use crate::game::title::{BoxArt, TitleRecord};
use log::{info, warn};
use std::fs;
use std::path::Path;

pub const TITLE_FILE: &str = ".title";

/// Loads `<root>/<dir>/.title`.
///
/// An unreadable metadata file is not an error: the title is named after its
/// directory and carries nothing else.
pub fn load_title(root: &Path, dir: &str, images: &dyn ImageLoader) -> TitleRecord {
    let title_dir = root.join(dir);
    let path = title_dir.join(TITLE_FILE);
    let content = match fs::read(&path) {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(e) => {
            warn!("{}: not readable ({e})", path.display());
            return TitleRecord::from_dir_name(dir);
        }
    };

    let mut record = TitleRecord::new(dir);
    for (line_no, parsed) in directive::lines(&content) {
        let d = match parsed {
            Ok(Line::Skip) => continue,
            Ok(Line::Entry(d)) => d,
            Err(e) => {
                warn!("{}:{line_no}: {e}; skipping", path.display());
                continue;
            }
        };

        if d.is("TITLE") {
            record.title = Some(d.value.to_string());
        } else if d.is("DEVELOPER") {
            record.developer = Some(d.value.to_string());
        } else if d.is("PUBLISHER") {
            record.publisher = Some(d.value.to_string());
        } else if d.is("RELEASED") {
            record.released = Some(d.value.to_string());
        } else if d.is("EXEC") {
            record.launch_command = Some(d.value.to_string());
        } else if d.is("INSET") || d.is("OVERLAY") {
            let is_inset = d.is("INSET");
            let image_path = title_dir.join(d.value);
            info!(
                "loading {} from {}",
                if is_inset { "inset" } else { "overlay" },
                image_path.display()
            );
            record.art = match images.load_image(&image_path) {
                Ok(tex) if is_inset => BoxArt::Inset(tex),
                Ok(tex) => BoxArt::Overlay(tex),
                Err(e) => {
                    warn!("{}:{line_no}: failed to load {e}; skipping", path.display());
                    BoxArt::None
                }
            };
        } else {
            warn!(
                "{}:{line_no}: unrecognized key `{}'; skipping",
                path.display(),
                d.key
            );
        }
    }

    if record.title.is_none() {
        record.title = TitleRecord::from_dir_name(dir).title;
    }
    record
}
