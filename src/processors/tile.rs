//! Grid tiling of batched pixel images.
//!
//! A batch of same-size images is arranged into one composite image with a
//! padding band around every cell, including the outer edge: an RxC grid has
//! (R+1) horizontal and (C+1) vertical bands, all filled with the pad value
//! broadcast across channels. Cells beyond the batch stay entirely at the
//! pad value.

use crate::core::{RenderError, RenderResult};
use image::{imageops, Rgb, RgbImage};
use tracing::debug;

/// A composite image together with the grid geometry used to build it.
///
/// Invariant: `image.width() == cols * cell_w + (cols + 1) * padding`, and
/// the same relation holds for the height.
#[derive(Debug)]
pub struct ImageGrid {
    /// The assembled composite image.
    pub image: RgbImage,
    /// Number of grid rows.
    pub rows: usize,
    /// Number of grid columns.
    pub cols: usize,
    /// Width of each padding band in pixels.
    pub padding: u32,
    /// Intensity used for padding bands and filler cells.
    pub pad_value: u8,
}

/// Resolves the grid shape for a batch.
///
/// A zero for `nrow` or `ncol` means "derive": with both zero the grid is
/// near-square (`cols = ceil(sqrt(batch))`, `rows = ceil(batch / cols)`);
/// with one given, the other is `ceil(batch / given)`.
///
/// # Errors
///
/// Returns [`RenderError::GridTooSmall`] when both are given and their
/// product cannot hold the batch, and [`RenderError::InvalidDimension`] for
/// an empty batch.
pub fn grid_shape(batch: usize, nrow: usize, ncol: usize) -> RenderResult<(usize, usize)> {
    if batch == 0 {
        return Err(RenderError::invalid_dimension(
            "cannot tile an empty batch",
        ));
    }

    let (rows, cols) = match (nrow, ncol) {
        (0, 0) => {
            let cols = (batch as f64).sqrt().ceil() as usize;
            (batch.div_ceil(cols), cols)
        }
        (0, cols) => (batch.div_ceil(cols), cols),
        (rows, 0) => (rows, batch.div_ceil(rows)),
        (rows, cols) => {
            if rows * cols < batch {
                return Err(RenderError::grid_too_small(rows, cols, batch));
            }
            (rows, cols)
        }
    };

    Ok((rows, cols))
}

/// Tiles a batch of same-size images into one padded composite.
///
/// # Errors
///
/// Returns [`RenderError::InvalidDimension`] when the batch is empty or the
/// images disagree on dimensions, and propagates [`RenderError::GridTooSmall`]
/// from the grid-shape resolution.
pub fn tile(
    images: &[RgbImage],
    nrow: usize,
    ncol: usize,
    padding: u32,
    pad_value: u8,
) -> RenderResult<ImageGrid> {
    let first = images.first().ok_or_else(|| {
        RenderError::invalid_dimension("cannot tile an empty batch")
    })?;
    let (cell_w, cell_h) = first.dimensions();

    for (i, img) in images.iter().enumerate() {
        if img.dimensions() != (cell_w, cell_h) {
            return Err(RenderError::invalid_dimension(format!(
                "batch images disagree on dimensions: image 0 is {}x{}, image {} is {}x{}",
                cell_w,
                cell_h,
                i,
                img.width(),
                img.height()
            )));
        }
    }

    let (rows, cols) = grid_shape(images.len(), nrow, ncol)?;
    debug!(rows, cols, padding, "tiling batch into grid");

    let grid_w = cols as u32 * cell_w + (cols as u32 + 1) * padding;
    let grid_h = rows as u32 * cell_h + (rows as u32 + 1) * padding;
    let mut canvas = RgbImage::from_pixel(grid_w, grid_h, Rgb([pad_value; 3]));

    for (k, img) in images.iter().enumerate() {
        let row = (k / cols) as u32;
        let col = (k % cols) as u32;
        let x0 = padding + col * (cell_w + padding);
        let y0 = padding + row * (cell_h + padding);
        imageops::replace(&mut canvas, img, i64::from(x0), i64::from(y0));
    }

    Ok(ImageGrid {
        image: canvas,
        rows,
        cols,
        padding,
        pad_value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(w: u32, h: u32, v: u8) -> RgbImage {
        RgbImage::from_pixel(w, h, Rgb([v; 3]))
    }

    #[test]
    fn test_auto_grid_is_near_square() {
        assert_eq!(grid_shape(4, 0, 0).unwrap(), (2, 2));
        assert_eq!(grid_shape(5, 0, 0).unwrap(), (2, 3));
        assert_eq!(grid_shape(9, 0, 0).unwrap(), (3, 3));
        assert_eq!(grid_shape(10, 0, 0).unwrap(), (3, 4));
        assert_eq!(grid_shape(1, 0, 0).unwrap(), (1, 1));
    }

    #[test]
    fn test_one_given_derives_the_other() {
        assert_eq!(grid_shape(6, 2, 0).unwrap(), (2, 3));
        assert_eq!(grid_shape(6, 0, 2).unwrap(), (3, 2));
        assert_eq!(grid_shape(7, 2, 0).unwrap(), (2, 4));
    }

    #[test]
    fn test_explicit_grid_too_small() {
        assert!(matches!(
            grid_shape(5, 2, 2),
            Err(RenderError::GridTooSmall {
                rows: 2,
                cols: 2,
                batch: 5
            })
        ));
        assert!(grid_shape(4, 2, 2).is_ok());
    }

    #[test]
    fn test_empty_batch_is_invalid() {
        assert!(matches!(
            grid_shape(0, 0, 0),
            Err(RenderError::InvalidDimension { .. })
        ));
        assert!(matches!(
            tile(&[], 0, 0, 2, 0),
            Err(RenderError::InvalidDimension { .. })
        ));
    }

    #[test]
    fn test_batch_of_four_composite_geometry() {
        let images: Vec<RgbImage> = (0..4u8).map(|i| solid(8, 8, 50 * (i + 1))).collect();
        let grid = tile(&images, 0, 0, 2, 0).unwrap();

        assert_eq!((grid.rows, grid.cols), (2, 2));
        // width = 2 * cellW + 3 * padding
        assert_eq!(grid.image.width(), 2 * 8 + 3 * 2);
        assert_eq!(grid.image.height(), 2 * 8 + 3 * 2);

        // Outer border and the inner band are pad pixels.
        assert_eq!(grid.image.get_pixel(0, 0).0, [0, 0, 0]);
        assert_eq!(grid.image.get_pixel(10, 10).0, [0, 0, 0]);
        // Cell interiors carry their image values.
        assert_eq!(grid.image.get_pixel(2, 2).0, [50, 50, 50]);
        assert_eq!(grid.image.get_pixel(12, 2).0, [100, 100, 100]);
        assert_eq!(grid.image.get_pixel(2, 12).0, [150, 150, 150]);
        assert_eq!(grid.image.get_pixel(12, 12).0, [200, 200, 200]);
    }

    #[test]
    fn test_filler_cell_is_entirely_pad_value() {
        let images: Vec<RgbImage> = (0..4).map(|_| solid(4, 4, 255)).collect();
        let grid = tile(&images, 1, 5, 2, 7).unwrap();

        assert_eq!((grid.rows, grid.cols), (1, 5));
        assert_eq!(grid.image.width(), 5 * 4 + 6 * 2);
        assert_eq!(grid.image.height(), 4 + 2 * 2);

        // The fifth cell starts at x = padding + 4 * (cell_w + padding).
        let x0 = 2 + 4 * (4 + 2);
        for y in 2..6 {
            for x in x0..x0 + 4 {
                assert_eq!(grid.image.get_pixel(x, y).0, [7, 7, 7]);
            }
        }
    }

    #[test]
    fn test_mismatched_dimensions_rejected() {
        let images = vec![solid(4, 4, 0), solid(8, 8, 0)];
        assert!(matches!(
            tile(&images, 0, 0, 2, 0),
            Err(RenderError::InvalidDimension { .. })
        ));
    }

    #[test]
    fn test_zero_padding_packs_cells_tightly() {
        let images: Vec<RgbImage> = (0..2).map(|_| solid(3, 3, 9)).collect();
        let grid = tile(&images, 1, 2, 0, 0).unwrap();
        assert_eq!(grid.image.dimensions(), (6, 3));
        assert!(grid.image.pixels().all(|p| p.0 == [9, 9, 9]));
    }
}
