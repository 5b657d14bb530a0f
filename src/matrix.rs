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

//! RGB <-> YUV conversion matrices. The 3x3 linear algebra itself is out of
//! scope (spec.md treats it as a collaborator concern); this module only
//! carries the coefficients and the per-channel ranges the packer needs to
//! affine-map a logical sample into its quantization range.

/// A `(min, max)` pair with `min <= max`.
pub type Range = (f32, f32);

/// Two 3x3 matrices plus the six ranges the packer quantizes against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConversionMatrix {
    pub rgb_to_yuv: [[f32; 3]; 3],
    pub yuv_to_rgb: [[f32; 3]; 3],
    pub y_range: Range,
    pub u_range: Range,
    pub v_range: Range,
    pub y_packed_range: Range,
    pub u_packed_range: Range,
    pub v_packed_range: Range,
}

impl ConversionMatrix {
    /// BT.601 (SD), full range in, full range out.
    pub fn bt601_full() -> Self {
        Self::from_kr_kb(0.299, 0.114, false)
    }

    /// BT.601 (SD), studio ("TV") range.
    pub fn bt601_studio() -> Self {
        Self::from_kr_kb(0.299, 0.114, true)
    }

    /// BT.709 (HD), full range.
    pub fn bt709_full() -> Self {
        Self::from_kr_kb(0.2126, 0.0722, false)
    }

    /// BT.709 (HD), studio range.
    pub fn bt709_studio() -> Self {
        Self::from_kr_kb(0.2126, 0.0722, true)
    }

    /// BT.2020 (UHD), full range.
    pub fn bt2020_full() -> Self {
        Self::from_kr_kb(0.2627, 0.0593, false)
    }

    /// BT.2020 (UHD), studio range.
    pub fn bt2020_studio() -> Self {
        Self::from_kr_kb(0.2627, 0.0593, true)
    }

    /// Derives a full set of coefficients and ranges from the luma
    /// coefficients `kr`/`kb` (with `kg = 1 - kr - kb`), the standard
    /// parameterization shared by BT.601/709/2020/etc.
    pub fn from_kr_kb(kr: f32, kb: f32, studio_range: bool) -> Self {
        let kg = 1.0 - kr - kb;

        let cb_r = -0.5 * kr / (1.0 - kb);
        let cb_g = -0.5 * kg / (1.0 - kb);
        let cb_b = 0.5;

        let cr_r = 0.5;
        let cr_g = -0.5 * kg / (1.0 - kr);
        let cr_b = -0.5 * kb / (1.0 - kr);

        let rgb_to_yuv = [[kr, kg, kb], [cb_r, cb_g, cb_b], [cr_r, cr_g, cr_b]];

        let y_r = 1.0;
        let y_b_to_u = 1.0 / (1.0 - kb) / 2.0;
        let y_r_to_v = 1.0 / (1.0 - kr) / 2.0;

        let yuv_to_rgb = [
            [y_r, 0.0, 2.0 * y_r_to_v],
            [y_r, -2.0 * kb / kg * y_b_to_u, -2.0 * kr / kg * y_r_to_v],
            [y_r, 2.0 * y_b_to_u, 0.0],
        ];

        let (y_packed, uv_packed) = if studio_range {
            ((16.0 / 255.0, 235.0 / 255.0), (16.0 / 255.0, 240.0 / 255.0))
        } else {
            ((0.0, 1.0), (0.0, 1.0))
        };

        ConversionMatrix {
            rgb_to_yuv,
            yuv_to_rgb,
            y_range: (0.0, 1.0),
            u_range: (0.0, 1.0),
            v_range: (0.0, 1.0),
            y_packed_range: y_packed,
            u_packed_range: uv_packed,
            v_packed_range: uv_packed,
        }
    }
}
