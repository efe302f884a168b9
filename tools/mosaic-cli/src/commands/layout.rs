//! Compute a layout and print it as JSON.

use std::path::PathBuf;

use mosaic_assets::probe_dimensions;
use mosaic_layout::compute_layout;
use mosaic_project_model::{CollageDocument, Photo};

use super::LayoutArgs;

pub fn run(inputs: Vec<PathBuf>, args: &LayoutArgs) -> anyhow::Result<()> {
    let is_document = inputs.len() == 1
        && inputs[0]
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let doc = if is_document {
        let mut doc = CollageDocument::load(&inputs[0])
            .map_err(|e| anyhow::anyhow!("Failed to load collage: {e}"))?;
        if let Some(mode) = args.mode()? {
            doc.layout = args.config_for(mode);
        }
        doc
    } else {
        let doc = CollageDocument::from_paths(inputs, args.config()?);
        doc.validate()
            .map_err(|e| anyhow::anyhow!("Invalid input: {e}"))?;
        doc
    };

    let mut photos = Vec::with_capacity(doc.photos.len());
    for source in &doc.photos {
        match probe_dimensions(&source.path) {
            Ok((w, h)) => photos.push(Photo::new(source.id.clone(), w as f64, h as f64)),
            Err(e) => tracing::warn!(id = %source.id, error = %e, "Skipping photo"),
        }
    }

    let layout = compute_layout(&photos, &doc.layout);
    println!("{}", serde_json::to_string_pretty(&layout)?);
    Ok(())
}
