pub mod check;
pub mod estimate;
pub mod export;
pub mod init;
pub mod layout;

use mosaic_common::config::{AppConfig, QualityPreset};
use mosaic_project_model::{LayoutConfig, LayoutMode};
use mosaic_render_engine::{PixelBudget, PlatformClass};

/// Layout flags shared by `init` and `layout`.
#[derive(clap::Args, Debug, Clone)]
pub struct LayoutArgs {
    /// Packing mode: masonry|justified (overrides a document's layout)
    #[arg(long)]
    pub mode: Option<String>,

    /// Masonry column count
    #[arg(long, default_value = "3")]
    pub columns: u32,

    /// Gap between photos
    #[arg(long, default_value = "8")]
    pub gutter: f64,

    /// Layout width
    #[arg(long, default_value = "2400")]
    pub width: f64,

    /// Justified target row height
    #[arg(long, default_value = "240")]
    pub row_height: f64,
}

impl LayoutArgs {
    /// The `--mode` flag, if given.
    fn mode(&self) -> anyhow::Result<Option<LayoutMode>> {
        self.mode
            .as_deref()
            .map(|name| {
                LayoutMode::parse(name)
                    .ok_or_else(|| anyhow::anyhow!("Unknown mode: {name}. Use: masonry, justified"))
            })
            .transpose()
    }

    /// Layout config for `mode` built from the remaining flags.
    fn config_for(&self, mode: LayoutMode) -> LayoutConfig {
        match mode {
            LayoutMode::Masonry => LayoutConfig::masonry(self.columns, self.gutter, self.width),
            LayoutMode::Justified => {
                LayoutConfig::justified(self.row_height, self.gutter, self.width)
            }
        }
    }

    /// Layout config from the flags alone, masonry unless `--mode` says otherwise.
    fn config(&self) -> anyhow::Result<LayoutConfig> {
        Ok(self.config_for(self.mode()?.unwrap_or(LayoutMode::Masonry)))
    }
}

/// Budget for `--platform`, or for the platform this binary runs on.
fn budget_for(config: &AppConfig, platform: Option<&str>) -> anyhow::Result<PixelBudget> {
    let class = match platform {
        Some(name) => PlatformClass::parse(name).ok_or_else(|| {
            anyhow::anyhow!("Unknown platform: {name}. Use: constrained, mobile, desktop")
        })?,
        None => PlatformClass::classify(),
    };
    Ok(PixelBudget::for_class(class, &config.budget))
}

/// `--quality` if given, else the document's preset.
fn quality_for(flag: Option<&str>, document: QualityPreset) -> anyhow::Result<QualityPreset> {
    match flag {
        Some(name) => QualityPreset::parse(name)
            .ok_or_else(|| anyhow::anyhow!("Unknown quality: {name}. Use: low, medium, high, max")),
        None => Ok(document),
    }
}

fn format_bytes(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    let b = bytes as f64;
    if b >= KB * KB {
        format!("{:.1} MB", b / (KB * KB))
    } else if b >= KB {
        format!("{:.0} KB", b / KB)
    } else {
        format!("{bytes} B")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2 KB");
        assert_eq!(format_bytes(3 * 1024 * 1024 / 2), "1.5 MB");
    }

    fn layout_args(mode: Option<&str>) -> LayoutArgs {
        LayoutArgs {
            mode: mode.map(str::to_string),
            columns: 4,
            gutter: 2.0,
            width: 1000.0,
            row_height: 180.0,
        }
    }

    #[test]
    fn test_layout_args_pick_mode() {
        assert_eq!(
            layout_args(None).config().unwrap(),
            LayoutConfig::masonry(4, 2.0, 1000.0)
        );
        assert_eq!(
            layout_args(Some("justified")).config().unwrap(),
            LayoutConfig::justified(180.0, 2.0, 1000.0)
        );
        assert!(layout_args(Some("grid")).config().is_err());
    }

    #[test]
    fn test_unknown_flags_are_rejected() {
        let config = AppConfig::default();
        assert!(budget_for(&config, Some("toaster")).is_err());
        assert_eq!(
            budget_for(&config, Some("constrained")).unwrap().ceiling(),
            config.budget.constrained_pixels
        );
        assert!(quality_for(Some("ultra"), QualityPreset::High).is_err());
        assert_eq!(
            quality_for(None, QualityPreset::Low).unwrap(),
            QualityPreset::Low
        );
    }
}
