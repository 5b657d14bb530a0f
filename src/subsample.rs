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

//! Chroma up/down-sampling and plain surface scaling, used to conform a
//! caller's [`YuvImage`] to a format's declared dimensions and siting
//! before encoding.

use crate::geometry::Surface;
use crate::subsampling::ChromaSiting;
use crate::yuv_image::YuvImage;

/// Replicates chroma samples into a full 4:4:4 image. A no-op if `img` is
/// already 4:4:4.
pub fn up_sample(img: &YuvImage) -> YuvImage {
    if img.siting.subsampling.is_444() {
        return img.clone();
    }
    log::trace!("up-sampling {}x{} chroma to 4:4:4", img.image_w, img.image_h);

    let has_u = img.has_channel(crate::sample::Channel::U);
    let has_v = img.has_channel(crate::sample::Channel::V);
    let mut result = YuvImage::new(
        img.image_w,
        img.image_h,
        ChromaSiting::full(),
        img.has_channel(crate::sample::Channel::Y),
        has_u,
        has_v,
        img.has_channel(crate::sample::Channel::A),
    );

    if has_u || has_v {
        let sub = img.siting.subsampling;
        let (chroma_w, chroma_h) = sub.chroma_dim(img.image_w, img.image_h);
        for cy in 0..chroma_h {
            for cx in 0..chroma_w {
                let u_val = if has_u { *img.u_plane.at(cx, cy) } else { 0.0 };
                let v_val = if has_v { *img.v_plane.at(cx, cy) } else { 0.0 };
                for by in 0..sub.macro_px_h as u32 {
                    let ty = cy * sub.macro_px_h as u32 + by;
                    if ty >= img.image_h {
                        continue;
                    }
                    for bx in 0..sub.macro_px_w as u32 {
                        let tx = cx * sub.macro_px_w as u32 + bx;
                        if tx >= img.image_w {
                            continue;
                        }
                        if has_u {
                            *result.u_plane.at_mut(tx, ty) = u_val;
                        }
                        if has_v {
                            *result.v_plane.at_mut(tx, ty) = v_val;
                        }
                    }
                }
            }
        }
    }

    result.y_plane = img.y_plane.clone();
    result.a_plane = img.a_plane.clone();
    result
}

/// Siting-aware weighted average of the source pixels covering output
/// chroma sample `(cx, cy)`, independently computed per channel using that
/// channel's own sample point.
fn downsample_point(
    src: &Surface<f32>,
    image_w: u32,
    image_h: u32,
    sub: crate::subsampling::Subsampling,
    sample_point: (f32, f32),
    cx: u32,
    cy: u32,
) -> f32 {
    let mut sum = 0.0f32;
    for by in 0..sub.macro_px_h as u32 {
        let wy = 1.0 - (sample_point.1 - by as f32).abs();
        if wy <= 0.0 {
            continue;
        }
        let sy = (cy * sub.macro_px_h as u32 + by).min(image_h - 1);
        for bx in 0..sub.macro_px_w as u32 {
            let wx = 1.0 - (sample_point.0 - bx as f32).abs();
            if wx <= 0.0 {
                continue;
            }
            let sx = (cx * sub.macro_px_w as u32 + bx).min(image_w - 1);
            sum += wx * wy * *src.at(sx, sy);
        }
    }
    sum
}

/// Resamples `img`'s chroma to `siting`. Up-samples to 4:4:4 first if `img`
/// is not already 4:4:4. A no-op if `img.siting == siting`.
pub fn down_sample(img: &YuvImage, siting: ChromaSiting) -> YuvImage {
    if img.siting == siting {
        return img.clone();
    }
    if !img.siting.subsampling.is_444() {
        return down_sample(&up_sample(img), siting);
    }
    log::trace!(
        "down-sampling {}x{} chroma to {}x{} macro pixels",
        img.image_w,
        img.image_h,
        siting.subsampling.macro_px_w,
        siting.subsampling.macro_px_h
    );

    let has_u = img.has_channel(crate::sample::Channel::U);
    let has_v = img.has_channel(crate::sample::Channel::V);
    let mut result = YuvImage::new(
        img.image_w,
        img.image_h,
        siting,
        img.has_channel(crate::sample::Channel::Y),
        has_u,
        has_v,
        img.has_channel(crate::sample::Channel::A),
    );

    if has_u || has_v {
        let (chroma_w, chroma_h) = siting.subsampling.chroma_dim(img.image_w, img.image_h);
        for cy in 0..chroma_h {
            for cx in 0..chroma_w {
                if has_u {
                    *result.u_plane.at_mut(cx, cy) = downsample_point(
                        &img.u_plane,
                        img.image_w,
                        img.image_h,
                        siting.subsampling,
                        siting.u_sample_point,
                        cx,
                        cy,
                    );
                }
                if has_v {
                    *result.v_plane.at_mut(cx, cy) = downsample_point(
                        &img.v_plane,
                        img.image_w,
                        img.image_h,
                        siting.subsampling,
                        siting.v_sample_point,
                        cx,
                        cy,
                    );
                }
            }
        }
    }

    result.y_plane = img.y_plane.clone();
    result.a_plane = img.a_plane.clone();
    result
}

fn scale_surface_into(src: &Surface<f32>, dst: &mut Surface<f32>) {
    if src.is_empty() || dst.is_empty() {
        return;
    }
    for y in 0..dst.height() {
        let sy = (y as u64 * src.height() as u64 / dst.height() as u64) as u32;
        for x in 0..dst.width() {
            let sx = (x as u64 * src.width() as u64 / dst.width() as u64) as u32;
            *dst.at_mut(x, y) = *src.at(sx.min(src.width() - 1), sy.min(src.height() - 1));
        }
    }
}

/// Nearest-neighbor resizes every plane of `img` to `(new_w, new_h)`,
/// keeping the same siting (and therefore the same chroma-plane ratio).
pub fn scale_yuv_image(img: &YuvImage, new_w: u32, new_h: u32) -> YuvImage {
    let mut result = YuvImage::new(
        new_w,
        new_h,
        img.siting,
        img.has_channel(crate::sample::Channel::Y),
        img.has_channel(crate::sample::Channel::U),
        img.has_channel(crate::sample::Channel::V),
        img.has_channel(crate::sample::Channel::A),
    );
    scale_surface_into(&img.y_plane, &mut result.y_plane);
    scale_surface_into(&img.u_plane, &mut result.u_plane);
    scale_surface_into(&img.v_plane, &mut result.v_plane);
    scale_surface_into(&img.a_plane, &mut result.a_plane);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image_420(w: u32, h: u32) -> YuvImage {
        let mut img = YuvImage::new(w, h, ChromaSiting::jpeg_420(), true, true, true, false);
        for y in 0..img.u_plane.height() {
            for x in 0..img.u_plane.width() {
                *img.u_plane.at_mut(x, y) = 0.5;
                *img.v_plane.at_mut(x, y) = 0.25;
            }
        }
        img
    }

    #[test]
    fn up_sample_replicates_into_macro_block() {
        let img = image_420(4, 4);
        let full = up_sample(&img);
        assert!(full.siting.subsampling.is_444());
        for y in 0..4 {
            for x in 0..4 {
                assert_eq!(*full.u_plane.at(x, y), 0.5);
                assert_eq!(*full.v_plane.at(x, y), 0.25);
            }
        }
    }

    #[test]
    fn up_then_down_sample_round_trips_flat_chroma() {
        let img = image_420(8, 8);
        let full = up_sample(&img);
        let back = down_sample(&full, img.siting);
        for y in 0..back.u_plane.height() {
            for x in 0..back.u_plane.width() {
                assert!((back.u_plane.at(x, y) - 0.5).abs() < 1e-5);
                assert!((back.v_plane.at(x, y) - 0.25).abs() < 1e-5);
            }
        }
    }

    #[test]
    fn down_sample_is_noop_for_matching_siting() {
        let img = image_420(4, 4);
        let same = down_sample(&img, img.siting);
        assert_eq!(same, img);
    }
}
