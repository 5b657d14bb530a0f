/*
 * Copyright (c) Radzivon Bartoshyk, 10/2024. All rights reserved.
 *
 * Redistribution and use in source and binary forms, with or without modification,
 * are permitted provided that the following conditions are met:
 *
 * 1.  Redistributions of source code must retain the above copyright notice, this
 * list of conditions and the following disclaimer.
 *
 * 2.  Redistributions in binary form must reproduce the above copyright notice,
 * this list of conditions and the following disclaimer in the documentation
 * and/or other materials provided with the distribution.
 *
 * 3.  Neither the name of the copyright holder nor the names of its
 * contributors may be used to endorse or promote products derived from
 * this software without specific prior written permission.
 *
 * THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS "AS IS"
 * AND ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO, THE
 * IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE ARE
 * DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT HOLDER OR CONTRIBUTORS BE LIABLE
 * FOR ANY DIRECT, INDIRECT, INCIDENTAL, SPECIAL, EXEMPLARY, OR CONSEQUENTIAL
 * DAMAGES (INCLUDING, BUT NOT LIMITED TO, PROCUREMENT OF SUBSTITUTE GOODS OR
 * SERVICES; LOSS OF USE, DATA, OR PROFITS; OR BUSINESS INTERRUPTION) HOWEVER
 * CAUSED AND ON ANY THEORY OF LIABILITY, WHETHER IN CONTRACT, STRICT LIABILITY,
 * OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE) ARISING IN ANY WAY OUT OF THE USE
 * OF THIS SOFTWARE, EVEN IF ADVISED OF THE POSSIBILITY OF SUCH DAMAGE.
 */

//! A polymorphic bridge to external RGB image types. The core never holds
//! onto a concrete image-library type; instead a caller implements
//! [`RgbImage`] for their own pixel buffer, working entirely in 4:4:4 space,
//! and [`from_yuv_image`]/[`to_yuv_image`] handle the chroma up/down-sampling
//! around it.

use crate::matrix::ConversionMatrix;
use crate::subsample::{down_sample, up_sample};
use crate::subsampling::ChromaSiting;
use crate::yuv_image::YuvImage;

/// Implemented by a caller's own RGB pixel buffer type to integrate it with
/// the codec. Both methods operate on (and produce) 4:4:4 `YuvImage`s;
/// [`from_yuv_image`] and [`to_yuv_image`] are responsible for resampling
/// chroma to and from whatever siting the caller's format actually uses.
pub trait RgbImage: Sized {
    fn from_444(yuv: &YuvImage, matrix: &ConversionMatrix) -> Self;
    fn to_444(&self, matrix: &ConversionMatrix) -> YuvImage;
}

/// Up-samples `image` to 4:4:4 (a no-op if it already is) and builds a `T`
/// from it via [`RgbImage::from_444`].
pub fn from_yuv_image<T: RgbImage>(image: &YuvImage, matrix: &ConversionMatrix) -> T {
    log::trace!("converting {}x{} yuv image to rgb", image.image_w, image.image_h);
    let image_444 = up_sample(image);
    T::from_444(&image_444, matrix)
}

/// Converts `rgb` to a 4:4:4 `YuvImage` via [`RgbImage::to_444`], then
/// down-samples chroma to `siting`.
pub fn to_yuv_image<T: RgbImage>(rgb: &T, matrix: &ConversionMatrix, siting: ChromaSiting) -> YuvImage {
    let image_444 = rgb.to_444(matrix);
    log::trace!(
        "converting rgb image to {}x{} yuv image",
        image_444.image_w,
        image_444.image_h
    );
    down_sample(&image_444, siting)
}

/// One pixel's `(r, g, b)` (each in `[0, 1]`) mapped through `matrix` into
/// `(y, u, v)`, with `y`/`u`/`v` individually shifted and scaled into their
/// packed `[0, 1]` ranges and clamped.
pub fn rgb_to_yuv_pixel(rgb: (f32, f32, f32), matrix: &ConversionMatrix) -> (f32, f32, f32) {
    let m = &matrix.rgb_to_yuv;
    let mut y = m[0][0] * rgb.0 + m[0][1] * rgb.1 + m[0][2] * rgb.2;
    let mut u = m[1][0] * rgb.0 + m[1][1] * rgb.1 + m[1][2] * rgb.2;
    let mut v = m[2][0] * rgb.0 + m[2][1] * rgb.1 + m[2][2] * rgb.2;

    y = (y - matrix.y_range.0) / (matrix.y_range.1 - matrix.y_range.0);
    u = (u - matrix.u_range.0) / (matrix.u_range.1 - matrix.u_range.0);
    v = (v - matrix.v_range.0) / (matrix.v_range.1 - matrix.v_range.0);

    (y.clamp(0.0, 1.0), u.clamp(0.0, 1.0), v.clamp(0.0, 1.0))
}

/// Inverse of [`rgb_to_yuv_pixel`]: unpacks `(y, u, v)` out of their packed
/// ranges and maps back through `matrix.yuv_to_rgb`, clamping the result.
pub fn yuv_to_rgb_pixel(yuv: (f32, f32, f32), matrix: &ConversionMatrix) -> (f32, f32, f32) {
    let y = yuv.0 * (matrix.y_range.1 - matrix.y_range.0) + matrix.y_range.0;
    let u = yuv.1 * (matrix.u_range.1 - matrix.u_range.0) + matrix.u_range.0;
    let v = yuv.2 * (matrix.v_range.1 - matrix.v_range.0) + matrix.v_range.0;

    let m = &matrix.yuv_to_rgb;
    let r = m[0][0] * y + m[0][1] * u + m[0][2] * v;
    let g = m[1][0] * y + m[1][1] * u + m[1][2] * v;
    let b = m[2][0] * y + m[2][1] * u + m[2][2] * v;

    (r.clamp(0.0, 1.0), g.clamp(0.0, 1.0), b.clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct PlanarRgb {
        w: u32,
        h: u32,
        r: Vec<f32>,
        g: Vec<f32>,
        b: Vec<f32>,
    }

    impl RgbImage for PlanarRgb {
        fn from_444(yuv: &YuvImage, matrix: &ConversionMatrix) -> Self {
            let mut out = PlanarRgb {
                w: yuv.image_w,
                h: yuv.image_h,
                r: vec![0.0; (yuv.image_w * yuv.image_h) as usize],
                g: vec![0.0; (yuv.image_w * yuv.image_h) as usize],
                b: vec![0.0; (yuv.image_w * yuv.image_h) as usize],
            };
            for y in 0..yuv.image_h {
                for x in 0..yuv.image_w {
                    let yv = *yuv.y_plane.at(x, y);
                    let u = *yuv.u_plane.at(x, y);
                    let v = *yuv.v_plane.at(x, y);
                    let (r, g, b) = yuv_to_rgb_pixel((yv, u, v), matrix);
                    let idx = (y * yuv.image_w + x) as usize;
                    out.r[idx] = r;
                    out.g[idx] = g;
                    out.b[idx] = b;
                }
            }
            out
        }

        fn to_444(&self, matrix: &ConversionMatrix) -> YuvImage {
            let mut image = YuvImage::new(self.w, self.h, ChromaSiting::full(), true, true, true, false);
            for y in 0..self.h {
                for x in 0..self.w {
                    let idx = (y * self.w + x) as usize;
                    let (yv, u, v) = rgb_to_yuv_pixel((self.r[idx], self.g[idx], self.b[idx]), matrix);
                    *image.y_plane.at_mut(x, y) = yv;
                    *image.u_plane.at_mut(x, y) = u;
                    *image.v_plane.at_mut(x, y) = v;
                }
            }
            image
        }
    }

    #[test]
    fn rgb_yuv_round_trip_is_close() {
        let matrix = ConversionMatrix::bt601_full();
        let rgb = PlanarRgb {
            w: 1,
            h: 1,
            r: vec![0.8],
            g: vec![0.2],
            b: vec![0.4],
        };
        let yuv = to_yuv_image(&rgb, &matrix, ChromaSiting::full());
        let back: PlanarRgb = from_yuv_image(&yuv, &matrix);
        assert!((back.r[0] - 0.8).abs() < 1e-4);
        assert!((back.g[0] - 0.2).abs() < 1e-4);
        assert!((back.b[0] - 0.4).abs() < 1e-4);
    }
}
