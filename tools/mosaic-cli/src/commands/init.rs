//! Create a collage document from image files.

use std::path::PathBuf;

use mosaic_project_model::CollageDocument;

use super::LayoutArgs;

pub fn run(
    photos: Vec<PathBuf>,
    output: PathBuf,
    force: bool,
    args: &LayoutArgs,
) -> anyhow::Result<()> {
    if output.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            output.display()
        );
    }

    // Absolute paths keep the document valid wherever it is written.
    let photos = photos
        .into_iter()
        .map(|path| {
            std::fs::canonicalize(&path)
                .map_err(|e| anyhow::anyhow!("Photo {}: {e}", path.display()))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    let doc = CollageDocument::from_paths(photos, args.config()?);
    doc.validate()
        .map_err(|e| anyhow::anyhow!("Invalid input: {e}"))?;
    doc.save(&output)
        .map_err(|e| anyhow::anyhow!("Failed to write collage: {e}"))?;

    println!("Collage created: {}", output.display());
    println!("  Photos: {}", doc.photos.len());
    println!("  Layout: {:?}", doc.layout.mode());
    println!("  Quality: {:?}", doc.quality);

    Ok(())
}
