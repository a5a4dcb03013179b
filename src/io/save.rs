//! Image saving functionality

use std::path::Path;

use image::RgbImage;
use ndarray::{ArrayView3, ArrayView4, Axis};

use crate::error::{Error, Result};

/// Map a (H, W, 3) image in [-1, 1] to 8-bit RGB
///
/// Values outside [-1, 1] are clamped.
pub fn to_rgb8(image: ArrayView3<'_, f32>) -> Result<RgbImage> {
    let (h, w, c) = image.dim();
    if c != 3 {
        return Err(Error::invalid_input("to_rgb8", format!("expected 3 channels, got {c}")));
    }
    let raw: Vec<u8> = image
        .iter()
        .map(|&v| ((v.clamp(-1.0, 1.0) + 1.0) * 127.5).round() as u8)
        .collect();
    let (w, h) = (dim_u32(w)?, dim_u32(h)?);
    RgbImage::from_raw(w, h, raw)
        .ok_or_else(|| Error::invalid_input("to_rgb8", format!("cannot build a {w}×{h} image")))
}

/// Write a (H, W, 3) image in [-1, 1] as PNG
///
/// # Example
///
/// ```no_run
/// use artgan::io::save_image;
/// use ndarray::Array3;
///
/// let image = Array3::<f32>::zeros((64, 64, 3));
/// save_image(image.view(), "grey.png").unwrap();
/// ```
pub fn save_image(image: ArrayView3<'_, f32>, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    to_rgb8(image)?
        .save(path)
        .map_err(|source| Error::ImageWrite { path: path.to_path_buf(), source })
}

/// Write the first `grid`×`grid` images of an (N, H, W, 3) batch as one
/// mosaic, row-major; missing tiles stay black
pub fn save_grid(images: ArrayView4<'_, f32>, grid: usize, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let (n, h, w, _) = images.dim();
    if grid == 0 {
        return Err(Error::invalid_input("save_grid", "grid must be positive"));
    }

    let mut mosaic = RgbImage::new(dim_u32(w * grid)?, dim_u32(h * grid)?);
    for (i, image) in images.axis_iter(Axis(0)).take(n.min(grid * grid)).enumerate() {
        let tile = to_rgb8(image)?;
        let x = dim_u32((i % grid) * w)?;
        let y = dim_u32((i / grid) * h)?;
        image::imageops::replace(&mut mosaic, &tile, i64::from(x), i64::from(y));
    }

    mosaic
        .save(path)
        .map_err(|source| Error::ImageWrite { path: path.to_path_buf(), source })?;
    tracing::debug!(path = %path.display(), grid, "wrote image grid");
    Ok(())
}

fn dim_u32(v: usize) -> Result<u32> {
    u32::try_from(v).map_err(|_| Error::invalid_input("image", format!("dimension {v} too large")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array3, Array4};
    use proptest::prelude::*;
    use tempfile::TempDir;

    #[test]
    fn test_to_rgb8_endpoints() {
        let mut image = Array3::<f32>::zeros((2, 2, 3));
        image[[0, 0, 0]] = -1.0;
        image[[0, 0, 1]] = 1.0;
        image[[1, 1, 2]] = 5.0;
        let rgb = to_rgb8(image.view()).unwrap();
        assert_eq!(rgb.get_pixel(0, 0).0, [0, 255, 128]);
        assert_eq!(rgb.get_pixel(1, 1).0, [128, 128, 255]);
    }

    #[test]
    fn test_to_rgb8_rejects_grayscale() {
        let image = Array3::<f32>::zeros((2, 2, 1));
        assert!(to_rgb8(image.view()).is_err());
    }

    #[test]
    fn test_save_image_roundtrips_through_decoder() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sample.png");
        let image = Array3::from_elem((8, 8, 3), 1.0f32);
        save_image(image.view(), &path).unwrap();

        let decoded = crate::data::decode_image(&path, 8).unwrap();
        assert!(decoded.iter().all(|&v| (v - 1.0).abs() < 1e-6));
    }

    #[test]
    fn test_save_image_missing_directory() {
        let image = Array3::<f32>::zeros((4, 4, 3));
        let err = save_image(image.view(), "/definitely/not/here/x.png").unwrap_err();
        assert!(matches!(err, Error::ImageWrite { .. }));
    }

    #[test]
    fn test_save_grid_layout() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("grid.png");
        let mut images = Array4::<f32>::from_elem((3, 4, 4, 3), -1.0);
        images.index_axis_mut(Axis(0), 1).fill(1.0);
        save_grid(images.view(), 2, &path).unwrap();

        let mosaic = image::open(&path).unwrap().to_rgb8();
        assert_eq!(mosaic.dimensions(), (8, 8));
        assert_eq!(mosaic.get_pixel(0, 0).0, [0, 0, 0]);
        assert_eq!(mosaic.get_pixel(5, 1).0, [255, 255, 255]);
        // Fourth tile has no image
        assert_eq!(mosaic.get_pixel(6, 6).0, [0, 0, 0]);
    }

    proptest! {
        #[test]
        fn prop_to_rgb8_is_monotonic(a in -2.0f32..2.0, b in -2.0f32..2.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let lo_px = to_rgb8(Array3::from_elem((1, 1, 3), lo).view()).unwrap().get_pixel(0, 0).0[0];
            let hi_px = to_rgb8(Array3::from_elem((1, 1, 3), hi).view()).unwrap().get_pixel(0, 0).0[0];
            prop_assert!(lo_px <= hi_px);
        }
    }
}
