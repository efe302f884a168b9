//! Show the platform class and pixel budget.

use mosaic_common::config::AppConfig;
use mosaic_render_engine::{PixelBudget, PlatformClass};

pub fn run(config: &AppConfig, write_config: bool) -> anyhow::Result<()> {
    println!("Mosaic System Check");
    println!("{}", "=".repeat(50));

    let detected = PlatformClass::classify();
    let budget = PixelBudget::detect(&config.budget);
    let side = (budget.ceiling() as f64).sqrt().floor();
    println!("[OK] Platform class: {detected:?}");
    println!(
        "[OK] Pixel ceiling: {} px (about {side:.0}x{side:.0})",
        budget.ceiling()
    );

    println!();
    println!("Configured ceilings:");
    for class in [
        PlatformClass::Constrained,
        PlatformClass::Mobile,
        PlatformClass::Desktop,
    ] {
        let marker = if class == detected { " (this platform)" } else { "" };
        println!("     {class:?}: {} px{marker}", class.ceiling(&config.budget));
    }

    println!();
    println!(
        "Export ladder: {:?} x safe scale, floor {}",
        config.ladder.safe_scale_factors, config.ladder.floor_scale
    );
    println!("Output directory: {}", config.output_dir.display());

    if write_config {
        config
            .save()
            .map_err(|e| anyhow::anyhow!("Failed to write config: {e}"))?;
        println!("Configuration written.");
    }

    Ok(())
}
