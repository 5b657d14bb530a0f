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

use crate::error::{DomainError, Error};

/// How many luma samples (and in what geometry) share one chroma sample.
/// `(1, 1)` is 4:4:4.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subsampling {
    pub macro_px_w: u8,
    pub macro_px_h: u8,
}

impl Subsampling {
    pub const FULL: Subsampling = Subsampling {
        macro_px_w: 1,
        macro_px_h: 1,
    };

    pub fn new(macro_px_w: u8, macro_px_h: u8) -> Result<Self, Error> {
        if macro_px_w == 0 || macro_px_h == 0 {
            return Err(DomainError::InvalidSubsampling {
                w: macro_px_w as u32,
                h: macro_px_h as u32,
            }
            .into());
        }
        Ok(Subsampling {
            macro_px_w,
            macro_px_h,
        })
    }

    pub fn is_444(&self) -> bool {
        self.macro_px_w == 1 && self.macro_px_h == 1
    }

    pub fn chroma_dim(&self, image_w: u32, image_h: u32) -> (u32, u32) {
        let w = (image_w + self.macro_px_w as u32 - 1) / self.macro_px_w as u32;
        let h = (image_h + self.macro_px_h as u32 - 1) / self.macro_px_h as u32;
        (w, h)
    }
}

/// A [`Subsampling`] plus where, within a macro pixel, the U and V samples
/// are sited (in source-pixel units, each component in `[0, macro_px - 1]`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChromaSiting {
    pub subsampling: Subsampling,
    pub u_sample_point: (f32, f32),
    pub v_sample_point: (f32, f32),
}

impl ChromaSiting {
    /// 4:4:4, samples centered on the luma pixel.
    pub fn full() -> Self {
        ChromaSiting {
            subsampling: Subsampling::FULL,
            u_sample_point: (0.0, 0.0),
            v_sample_point: (0.0, 0.0),
        }
    }

    /// MPEG-2 style 4:2:0 siting: co-sited horizontally, offset a half pixel
    /// vertically.
    pub fn mpeg2_420() -> Self {
        ChromaSiting {
            subsampling: Subsampling {
                macro_px_w: 2,
                macro_px_h: 2,
            },
            u_sample_point: (0.0, 0.5),
            v_sample_point: (0.0, 0.5),
        }
    }

    /// JPEG/H.261 style 4:2:0 siting: centered in the macro pixel.
    pub fn jpeg_420() -> Self {
        ChromaSiting {
            subsampling: Subsampling {
                macro_px_w: 2,
                macro_px_h: 2,
            },
            u_sample_point: (0.5, 0.5),
            v_sample_point: (0.5, 0.5),
        }
    }
}
