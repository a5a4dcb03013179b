//! Patch extraction for convolutions with "same" padding

use ndarray::{Array2, Array3, ArrayView2, ArrayView3};

/// Geometry of a strided square-kernel convolution over an (H, W, C) image
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Geometry {
    pub in_h: usize,
    pub in_w: usize,
    pub channels: usize,
    pub kernel: usize,
    pub stride: usize,
    pub pad_top: usize,
    pub pad_left: usize,
    pub out_h: usize,
    pub out_w: usize,
}

impl Geometry {
    /// "same" padding: output is `ceil(in / stride)`, the odd pixel of padding
    /// goes to the bottom/right
    pub fn same(in_h: usize, in_w: usize, channels: usize, kernel: usize, stride: usize) -> Self {
        let out_h = in_h.div_ceil(stride);
        let out_w = in_w.div_ceil(stride);
        let pad_h = ((out_h - 1) * stride + kernel).saturating_sub(in_h);
        let pad_w = ((out_w - 1) * stride + kernel).saturating_sub(in_w);
        Self {
            in_h,
            in_w,
            channels,
            kernel,
            stride,
            pad_top: pad_h / 2,
            pad_left: pad_w / 2,
            out_h,
            out_w,
        }
    }

    /// Width of one patch row
    pub fn patch_len(&self) -> usize {
        self.kernel * self.kernel * self.channels
    }

    fn source(&self, out: usize, k: usize, pad: usize, limit: usize) -> Option<usize> {
        (out * self.stride + k).checked_sub(pad).filter(|&i| i < limit)
    }
}

/// Gather patches into rows: (out_h * out_w, kernel * kernel * channels)
///
/// Column index is `(ky * kernel + kx) * channels + c`. Out-of-image taps are zero.
pub(crate) fn im2col(image: ArrayView3<'_, f32>, g: &Geometry) -> Array2<f32> {
    let image = image.as_standard_layout();
    let src = image.as_slice().unwrap_or(&[]);
    let c = g.channels;
    let mut cols = Array2::<f32>::zeros((g.out_h * g.out_w, g.patch_len()));
    let dst = cols.as_slice_mut().unwrap_or(&mut []);
    let row_len = g.patch_len();

    for oy in 0..g.out_h {
        for ox in 0..g.out_w {
            let row = &mut dst[(oy * g.out_w + ox) * row_len..][..row_len];
            for ky in 0..g.kernel {
                let Some(iy) = g.source(oy, ky, g.pad_top, g.in_h) else { continue };
                for kx in 0..g.kernel {
                    let Some(ix) = g.source(ox, kx, g.pad_left, g.in_w) else { continue };
                    let from = (iy * g.in_w + ix) * c;
                    let to = (ky * g.kernel + kx) * c;
                    row[to..to + c].copy_from_slice(&src[from..from + c]);
                }
            }
        }
    }
    cols
}

/// Scatter-add patch rows back into an (in_h, in_w, channels) image
///
/// Adjoint of [`im2col`].
pub(crate) fn col2im(cols: ArrayView2<'_, f32>, g: &Geometry) -> Array3<f32> {
    let cols = cols.as_standard_layout();
    let src = cols.as_slice().unwrap_or(&[]);
    let c = g.channels;
    let row_len = g.patch_len();
    let mut image = Array3::<f32>::zeros((g.in_h, g.in_w, c));
    let dst = image.as_slice_mut().unwrap_or(&mut []);

    for oy in 0..g.out_h {
        for ox in 0..g.out_w {
            let row = &src[(oy * g.out_w + ox) * row_len..][..row_len];
            for ky in 0..g.kernel {
                let Some(iy) = g.source(oy, ky, g.pad_top, g.in_h) else { continue };
                for kx in 0..g.kernel {
                    let Some(ix) = g.source(ox, kx, g.pad_left, g.in_w) else { continue };
                    let to = (iy * g.in_w + ix) * c;
                    let from = (ky * g.kernel + kx) * c;
                    for (d, s) in dst[to..to + c].iter_mut().zip(&row[from..from + c]) {
                        *d += s;
                    }
                }
            }
        }
    }
    image
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array;

    #[test]
    fn test_same_geometry_stride_two() {
        let g = Geometry::same(64, 64, 3, 5, 2);
        assert_eq!((g.out_h, g.out_w), (32, 32));
        // total padding 3: one before, two after
        assert_eq!((g.pad_top, g.pad_left), (1, 1));
    }

    #[test]
    fn test_same_geometry_stride_one() {
        let g = Geometry::same(7, 7, 1, 3, 1);
        assert_eq!((g.out_h, g.pad_top), (7, 1));
    }

    #[test]
    fn test_im2col_center_tap() {
        let image = Array::from_shape_fn((4, 4, 1), |(y, x, _)| (y * 4 + x) as f32);
        let g = Geometry::same(4, 4, 1, 3, 1);
        let cols = im2col(image.view(), &g);
        assert_eq!(cols.shape(), &[16, 9]);
        // center tap (ky = kx = 1) sees the pixel itself
        for p in 0..16 {
            assert_eq!(cols[[p, 4]], p as f32);
        }
        // top-left output has zero padding above and to the left
        assert_eq!(cols[[0, 0]], 0.0);
    }

    #[test]
    fn test_col2im_is_adjoint_of_im2col() {
        // <im2col(x), y> == <x, col2im(y)>
        let g = Geometry::same(6, 6, 2, 5, 2);
        let x = Array::from_shape_fn((6, 6, 2), |(a, b, c)| ((a * 7 + b * 3 + c) % 5) as f32 - 2.0);
        let y = Array::from_shape_fn((g.out_h * g.out_w, g.patch_len()), |(a, b)| {
            ((a * 11 + b) % 7) as f32 - 3.0
        });
        let lhs: f32 = (&im2col(x.view(), &g) * &y).sum();
        let rhs: f32 = (&x * &col2im(y.view(), &g)).sum();
        assert!((lhs - rhs).abs() < 1e-3, "{lhs} vs {rhs}");
    }
}
