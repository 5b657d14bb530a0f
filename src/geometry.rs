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

/// A finite sample value. Y/A channels carry `[0.0, 1.0]`; U/V are carried in
/// `[0.0, 1.0]` internally too, after range normalization against a
/// [`ConversionMatrix`](crate::matrix::ConversionMatrix).
pub type PixelQuantum = f32;

/// A row-major 2-D array of `T`. An empty surface (`width == height == 0`)
/// represents an absent channel.
#[derive(Debug, Clone, PartialEq)]
pub struct Surface<T> {
    width: u32,
    height: u32,
    data: Vec<T>,
}

impl<T: Clone + Default> Surface<T> {
    pub fn new(width: u32, height: u32) -> Self {
        Surface {
            width,
            height,
            data: vec![T::default(); (width as usize) * (height as usize)],
        }
    }

    pub fn empty() -> Self {
        Surface {
            width: 0,
            height: 0,
            data: Vec::new(),
        }
    }
}

impl<T> Surface<T> {
    pub fn from_vec(width: u32, height: u32, data: Vec<T>) -> Result<Self, Error> {
        let expected = (width as usize) * (height as usize);
        if data.len() != expected {
            return Err(DomainError::SurfaceLengthMismatch {
                len: data.len(),
                expected,
            }
            .into());
        }
        Ok(Surface { width, height, data })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    #[inline]
    pub fn at(&self, x: u32, y: u32) -> &T {
        &self.data[(y as usize) * (self.width as usize) + (x as usize)]
    }

    #[inline]
    pub fn at_mut(&mut self, x: u32, y: u32) -> &mut T {
        let stride = self.width as usize;
        &mut self.data[(y as usize) * stride + (x as usize)]
    }

    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Option<&T> {
        if x < self.width && y < self.height {
            Some(self.at(x, y))
        } else {
            None
        }
    }
}

impl<T: Clone> Surface<T> {
    /// Clamps `(x, y)` to the surface bounds and returns that pixel — used by
    /// the subsampler when a sample point falls outside the image.
    pub fn at_clamped(&self, x: i64, y: i64) -> T {
        let cx = x.clamp(0, self.width as i64 - 1) as u32;
        let cy = y.clamp(0, self.height as i64 - 1) as u32;
        self.at(cx, cy).clone()
    }

    /// A surface of `(width, height)` with every pixel set to `value` —
    /// used to substitute an implicit, fully-opaque alpha plane when a
    /// format needs one but the caller's image didn't supply it.
    pub fn filled(width: u32, height: u32, value: T) -> Self {
        Surface {
            width,
            height,
            data: vec![value; (width as usize) * (height as usize)],
        }
    }
}
