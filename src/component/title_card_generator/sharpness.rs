use anyhow::{Context, Result};
use image::GrayImage;
use std::path::Path;

/// Scores a decoded still image for sharpness; higher means sharper.
pub trait FocusScorer {
    fn focus_score(&self, image_path: &Path) -> Result<f64>;
}

/// Variance of the 4-neighbour Laplacian over the grayscale plane.
/// A flat (blurry) image has near-zero response everywhere.
pub struct LaplacianScorer;

impl FocusScorer for LaplacianScorer {
    fn focus_score(&self, image_path: &Path) -> Result<f64> {
        let image = image::open(image_path)
            .with_context(|| format!("Cannot decode candidate frame: {}", image_path.display()))?;
        Ok(laplacian_variance(&image.to_luma8()))
    }
}

#[must_use]
pub fn laplacian_variance(gray: &GrayImage) -> f64 {
    let (width, height) = gray.dimensions();
    if width < 3 || height < 3 {
        return 0.0;
    }

    let mut responses = Vec::with_capacity(((width - 2) * (height - 2)) as usize);
    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let center = f64::from(gray.get_pixel(x, y).0[0]);
            let up = f64::from(gray.get_pixel(x, y - 1).0[0]);
            let down = f64::from(gray.get_pixel(x, y + 1).0[0]);
            let left = f64::from(gray.get_pixel(x - 1, y).0[0]);
            let right = f64::from(gray.get_pixel(x + 1, y).0[0]);
            responses.push(up + down + left + right - 4.0 * center);
        }
    }

    let mean = responses.iter().sum::<f64>() / responses.len() as f64;
    responses
        .iter()
        .map(|response| (response - mean).powi(2))
        .sum::<f64>()
        / responses.len() as f64
}
