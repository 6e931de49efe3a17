// * Screenshot Stitcher
// * Stacks the ordered captures into one tall debug image: white canvas of
// * max width x total height, each capture pasted at its running y offset.

use image::{imageops, Rgba, RgbaImage};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum StitchError {
    #[error("No screenshots to combine")]
    NoInput,

    #[error("Image operation failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Combines screenshots vertically into a single image at `output`
pub fn combine_captures(paths: &[PathBuf], output: &Path) -> Result<(), StitchError> {
    if paths.is_empty() {
        return Err(StitchError::NoInput);
    }

    let mut images = Vec::with_capacity(paths.len());
    for path in paths {
        images.push(image::open(path)?.to_rgba8());
    }

    let max_width = images.iter().map(|img| img.width()).max().unwrap_or(1);
    let total_height: u32 = images.iter().map(|img| img.height()).sum();

    let mut canvas = RgbaImage::from_pixel(max_width, total_height, Rgba([255, 255, 255, 255]));

    let mut y_offset: i64 = 0;
    for img in &images {
        imageops::overlay(&mut canvas, img, 0, y_offset);
        y_offset += i64::from(img.height());
    }

    if let Some(parent) = output.parent() {
        std::fs::create_dir_all(parent)?;
    }
    canvas.save(output)?;
    debug!(
        output = %output.display(),
        width = max_width,
        height = total_height,
        "Combined screenshots written"
    );

    Ok(())
}
