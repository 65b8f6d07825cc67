use ini::Ini;
use log::{LevelFilter, info, warn};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::{Mutex, MutexGuard};

const CONFIG_PATH: &str = "boxgrid.ini";
const SECTION: &str = "Options";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    const fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "Error",
            Self::Warn => "Warn",
            Self::Info => "Info",
            Self::Debug => "Debug",
            Self::Trace => "Trace",
        }
    }

    pub const fn as_level_filter(&self) -> LevelFilter {
        match self {
            Self::Error => LevelFilter::Error,
            Self::Warn => LevelFilter::Warn,
            Self::Info => LevelFilter::Info,
            Self::Debug => LevelFilter::Debug,
            Self::Trace => LevelFilter::Trace,
        }
    }
}

impl FromStr for LogLevel {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "error" => Ok(Self::Error),
            "warn" | "warning" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            "trace" => Ok(Self::Trace),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory holding `.index` and one sub-directory per title.
    pub root: PathBuf,
    pub display_width: u32,
    pub display_height: u32,
    /// Built-in fallback overlay and font live here.
    pub asset_dir: PathBuf,
    pub log_level: LogLevel,
    /// Interpreter for launch commands, invoked as `<shell> -c <command>`.
    pub shell: PathBuf,
    /// When set, the last composed frame is written here as PNG on exit.
    pub frame_dump_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root: PathBuf::from("./root"),
            display_width: 1280,
            display_height: 768,
            asset_dir: PathBuf::from("assets"),
            log_level: LogLevel::Warn,
            shell: PathBuf::from("/bin/sh"),
            frame_dump_path: None,
        }
    }
}

static CONFIG: std::sync::LazyLock<Mutex<Config>> =
    std::sync::LazyLock::new(|| Mutex::new(Config::default()));

// --- File I/O ---

fn create_default_config_file(path: &Path) -> std::io::Result<()> {
    info!("'{}' not found, creating with default values.", path.display());
    let default = Config::default();
    let mut conf = Ini::new();
    conf.with_section(Some(SECTION))
        .set("Root", default.root.to_string_lossy())
        .set("DisplayWidth", default.display_width.to_string())
        .set("DisplayHeight", default.display_height.to_string())
        .set("AssetDir", default.asset_dir.to_string_lossy())
        .set("LogLevel", default.log_level.as_str())
        .set("Shell", default.shell.to_string_lossy())
        .set("FrameDumpPath", "");
    conf.write_to_file(path)
}

/// Builds a `Config` from a parsed ini, keeping defaults for missing or bad keys.
fn from_ini(conf: &Ini) -> Config {
    let default = Config::default();
    let get = |key: &str| {
        conf.get_from(Some(SECTION), key)
            .map(str::trim)
            .filter(|v| !v.is_empty())
    };
    let dimension = |key: &str, fallback: u32| {
        get(key)
            .and_then(|v| match v.parse::<u32>() {
                Ok(n) if n > 0 => Some(n),
                _ => {
                    warn!("Ignoring invalid {key}={v}");
                    None
                }
            })
            .unwrap_or(fallback)
    };

    Config {
        root: get("Root").map_or(default.root, PathBuf::from),
        display_width: dimension("DisplayWidth", default.display_width),
        display_height: dimension("DisplayHeight", default.display_height),
        asset_dir: get("AssetDir").map_or(default.asset_dir, PathBuf::from),
        log_level: get("LogLevel")
            .and_then(|v| LogLevel::from_str(v).ok())
            .unwrap_or(default.log_level),
        shell: get("Shell").map_or(default.shell, PathBuf::from),
        frame_dump_path: get("FrameDumpPath").map(PathBuf::from),
    }
}

fn load_from(path: &Path) -> Config {
    if !path.exists()
        && let Err(e) = create_default_config_file(path)
    {
        warn!("Failed to create default config file: {e}");
    }

    match Ini::load_from_file(path) {
        Ok(conf) => from_ini(&conf),
        Err(e) => {
            warn!("Failed to load '{}': {e}. Using defaults.", path.display());
            Config::default()
        }
    }
}

/// A panic while holding the lock leaves the last written value in place.
fn lock_config() -> MutexGuard<'static, Config> {
    CONFIG.lock().unwrap_or_else(|poisoned| {
        warn!("Configuration lock was poisoned; recovering.");
        poisoned.into_inner()
    })
}

pub fn load() {
    let cfg = load_from(Path::new(CONFIG_PATH));
    info!("Configuration loaded: {cfg:?}");
    *lock_config() = cfg;
}

/// Overrides the catalog root, e.g. from the command line.
pub fn set_root(root: PathBuf) {
    lock_config().root = root;
}

pub fn get() -> Config {
    lock_config().clone()
}
