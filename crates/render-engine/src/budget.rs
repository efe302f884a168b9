//! Pixel budgets: how large a single raster surface may get per platform.
//!
//! The safe scale is rounded *down* to the nearest 0.05. Rounding up could
//! land back above the ceiling the budget exists to respect.

use serde::{Deserialize, Serialize};

use mosaic_common::config::BudgetConfig;

/// Platform tiers, each bound to a fixed pixel ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlatformClass {
    /// Touch devices with historically strict rasterizer limits.
    Constrained,
    /// Other mobile devices.
    Mobile,
    /// Desktop.
    Desktop,
}

impl PlatformClass {
    /// Classify the platform this binary was built for.
    pub fn classify() -> Self {
        if cfg!(any(target_os = "ios", target_os = "tvos", target_os = "watchos")) {
            Self::Constrained
        } else if cfg!(target_os = "android") {
            Self::Mobile
        } else {
            Self::Desktop
        }
    }

    /// Parse a class name as given on the command line.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "constrained" => Some(Self::Constrained),
            "mobile" => Some(Self::Mobile),
            "desktop" => Some(Self::Desktop),
            _ => None,
        }
    }

    /// The ceiling configured for this class.
    pub fn ceiling(self, config: &BudgetConfig) -> u64 {
        match self {
            Self::Constrained => config.constrained_pixels,
            Self::Mobile => config.mobile_pixels,
            Self::Desktop => config.desktop_pixels,
        }
    }
}

/// Maximum total pixel count for one render surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelBudget {
    ceiling: u64,
}

impl PixelBudget {
    /// Budget for an explicit ceiling (at least one pixel).
    pub fn new(ceiling: u64) -> Self {
        Self {
            ceiling: ceiling.max(1),
        }
    }

    /// Budget for a platform class.
    pub fn for_class(class: PlatformClass, config: &BudgetConfig) -> Self {
        Self::new(class.ceiling(config))
    }

    /// Budget for the current platform.
    pub fn detect(config: &BudgetConfig) -> Self {
        Self::for_class(PlatformClass::classify(), config)
    }

    pub fn ceiling(&self) -> u64 {
        self.ceiling
    }

    /// Whether a `width × height` surface fits.
    pub fn fits(&self, width: u32, height: u32) -> bool {
        width as u64 * height as u64 <= self.ceiling
    }

    /// Largest scale ≤ 1, in steps of 0.05, keeping the surface under the ceiling.
    pub fn safe_scale(&self, width: u32, height: u32) -> f64 {
        if self.fits(width, height) {
            return 1.0;
        }
        let pixels = width as f64 * height as f64;
        let scale = (self.ceiling as f64 / pixels).sqrt();
        (scale * 20.0).floor() / 20.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_is_one_within_budget() {
        let budget = PixelBudget::new(1_000_000);
        assert_eq!(budget.safe_scale(1000, 1000), 1.0);
        assert_eq!(budget.safe_scale(0, 5000), 1.0);
    }

    #[test]
    fn test_scale_rounds_down_to_twentieths() {
        let budget = PixelBudget::new(1_000_000);
        // sqrt(1e6 / 8.64e6) ≈ 0.3402 -> 0.30
        assert_eq!(budget.safe_scale(3600, 2400), 0.3);
        // One pixel over budget still drops a full step.
        assert_eq!(budget.safe_scale(1000, 1001), 0.95);
    }

    #[test]
    fn test_class_ceilings_come_from_config() {
        let config = BudgetConfig::default();
        assert_eq!(
            PixelBudget::for_class(PlatformClass::Constrained, &config).ceiling(),
            16_777_216
        );
        assert!(
            PlatformClass::Mobile.ceiling(&config) < PlatformClass::Desktop.ceiling(&config)
        );
        assert_eq!(PlatformClass::parse("Mobile"), Some(PlatformClass::Mobile));
    }

    #[cfg(not(any(target_os = "ios", target_os = "android")))]
    #[test]
    fn test_host_classifies_as_desktop() {
        assert_eq!(PlatformClass::classify(), PlatformClass::Desktop);
    }
}
