//! Font discovery for chart text.
//!
//! plotters' `ab_glyph` backend only knows fonts that were registered by
//! name. We register one font file under the `sans-serif` family, which is
//! what every default plotters text style asks for. If no candidate file can
//! be loaded, charts are drawn without text.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use plotters::style::{register_font, FontStyle};

use crate::config::RendererConfig;

/// Family every chart text style uses.
pub const FAMILY: &str = "sans-serif";

/// Font file currently registered under [`FAMILY`].
static REGISTERED: Mutex<Option<PathBuf>> = Mutex::new(None);

/// Register the configured font, or the first loadable candidate.
///
/// Returns the font file in use, or `None` when text has to be skipped.
pub fn load_font(config: &RendererConfig) -> Option<PathBuf> {
    let candidates: Vec<&Path> = match &config.font_path {
        Some(path) => vec![path.as_path()],
        None => config.font_candidates.iter().map(PathBuf::as_path).collect(),
    };

    for path in candidates {
        if !path.is_file() {
            continue;
        }
        match register(path) {
            Ok(()) => {
                log::debug!("chart font: {}", path.display());
                if !is_cjk_font(path) {
                    log::warn!(
                        "chart font {} has no CJK glyphs; Chinese titles and names will not render",
                        path.display()
                    );
                }
                return Some(path.to_path_buf());
            }
            Err(reason) => log::warn!("skipping font {}: {reason}", path.display()),
        }
    }

    log::warn!("no usable font file found; charts will be drawn without titles or labels");
    None
}

/// File-name markers of fonts known to cover Chinese.
const CJK_MARKERS: [&str; 9] = [
    "cjk", "wqy", "pingfang", "heiti", "simhei", "simsun", "msyh", "unicode", "sourcehan",
];

/// Whether `path` names a font that covers CJK characters.
pub fn is_cjk_font(path: &Path) -> bool {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    CJK_MARKERS.iter().any(|m| name.contains(m))
}

fn register(path: &Path) -> Result<(), String> {
    let mut current = REGISTERED
        .lock()
        .map_err(|_| "font registry lock poisoned".to_string())?;
    if current.as_deref() == Some(path) {
        return Ok(());
    }

    let bytes = std::fs::read(path).map_err(|e| e.to_string())?;
    // The registry keeps the bytes for the rest of the process.
    let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
    register_font(FAMILY, FontStyle::Normal, bytes).map_err(|_| "invalid font".to_string())?;

    *current = Some(path.to_path_buf());
    Ok(())
}
