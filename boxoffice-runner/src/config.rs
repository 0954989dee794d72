//! Run options and renderer configuration.
//!
//! Nothing here is read from user files: the only user input is the optional
//! snapshot path. These structs exist so every chart receives its settings
//! explicitly instead of through process-wide plotting state.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Settings handed to every chart routine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RendererConfig {
    /// Line, bar and scatter charts (10x6 in at 150 dpi).
    pub wide_size: (u32, u32),

    /// Pie chart (7x7 in at 150 dpi).
    pub square_size: (u32, u32),

    /// Pixel offset of point annotations, right and up from the point.
    pub annotation_offset: (i32, i32),

    /// Bars shown in the two top-N bar charts.
    pub bar_top_n: usize,

    /// Records taken from each ranking for scatter highlights.
    pub scatter_top_n: usize,

    pub title_font_size: u32,
    pub label_font_size: u32,

    /// Font file to use for all text. When unset, `font_candidates` are tried in order.
    pub font_path: Option<PathBuf>,

    /// Fonts tried when `font_path` is unset. CJK-capable fonts come first so
    /// Chinese titles render.
    pub font_candidates: Vec<PathBuf>,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            wide_size: (1500, 900),
            square_size: (1050, 1050),
            annotation_offset: (5, 5),
            bar_top_n: 10,
            scatter_top_n: 5,
            title_font_size: 32,
            label_font_size: 16,
            font_path: None,
            font_candidates: default_font_candidates(),
        }
    }
}

fn default_font_candidates() -> Vec<PathBuf> {
    [
        "/usr/share/fonts/truetype/wqy/wqy-microhei.ttc",
        "/usr/share/fonts/truetype/wqy/wqy-zenhei.ttc",
        "/usr/share/fonts/wenquanyi/wqy-microhei/wqy-microhei.ttc",
        "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
        "/usr/share/fonts/noto-cjk/NotoSansCJK-Regular.ttc",
        "/usr/share/fonts/google-noto-cjk/NotoSansCJK-Regular.ttc",
        "/System/Library/Fonts/PingFang.ttc",
        "/System/Library/Fonts/STHeiti Medium.ttc",
        "C:\\Windows\\Fonts\\simhei.ttf",
        "C:\\Windows\\Fonts\\msyh.ttc",
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/dejavu/DejaVuSans.ttf",
        "/Library/Fonts/Arial Unicode.ttf",
    ]
    .iter()
    .map(PathBuf::from)
    .collect()
}

/// Everything a single run needs besides the data provider.
#[derive(Debug, Clone, Default)]
pub struct PipelineOptions {
    /// Local CSV snapshot. Used only if the file exists.
    pub snapshot: Option<PathBuf>,

    /// Directory in which the timestamped run directory is created.
    pub output_root: PathBuf,

    pub renderer: RendererConfig,
}

impl PipelineOptions {
    pub fn new(snapshot: Option<PathBuf>, output_root: impl Into<PathBuf>) -> Self {
        Self {
            snapshot,
            output_root: output_root.into(),
            renderer: RendererConfig::default(),
        }
    }
}
