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

//! The canonical, dimension-tagged pixel buffer the codec converts to and
//! from: up to four planar surfaces (Y, U, V, A) plus the chroma siting
//! those surfaces were sampled at.

use crate::geometry::{PixelQuantum, Surface};
use crate::sample::Channel;
use crate::subsampling::ChromaSiting;

/// A planar YUV(A) image. Any of the four planes may be an empty
/// [`Surface`], meaning that channel is absent.
#[derive(Debug, Clone, PartialEq)]
pub struct YuvImage {
    pub image_w: u32,
    pub image_h: u32,
    pub siting: ChromaSiting,
    pub y_plane: Surface<PixelQuantum>,
    pub u_plane: Surface<PixelQuantum>,
    pub v_plane: Surface<PixelQuantum>,
    pub a_plane: Surface<PixelQuantum>,
}

impl YuvImage {
    pub fn new(
        image_w: u32,
        image_h: u32,
        siting: ChromaSiting,
        has_y: bool,
        has_u: bool,
        has_v: bool,
        has_a: bool,
    ) -> Self {
        let (chroma_w, chroma_h) = siting.subsampling.chroma_dim(image_w, image_h);
        YuvImage {
            image_w,
            image_h,
            siting,
            y_plane: plane_or_empty(has_y, image_w, image_h),
            u_plane: plane_or_empty(has_u, chroma_w, chroma_h),
            v_plane: plane_or_empty(has_v, chroma_w, chroma_h),
            a_plane: plane_or_empty(has_a, image_w, image_h),
        }
    }

    pub fn has_channel(&self, channel: Channel) -> bool {
        !self.plane(channel).is_empty()
    }

    pub fn plane(&self, channel: Channel) -> &Surface<PixelQuantum> {
        match channel {
            Channel::Y => &self.y_plane,
            Channel::U => &self.u_plane,
            Channel::V => &self.v_plane,
            Channel::A => &self.a_plane,
        }
    }

    pub fn plane_mut(&mut self, channel: Channel) -> &mut Surface<PixelQuantum> {
        match channel {
            Channel::Y => &mut self.y_plane,
            Channel::U => &mut self.u_plane,
            Channel::V => &mut self.v_plane,
            Channel::A => &mut self.a_plane,
        }
    }
}

fn plane_or_empty(present: bool, w: u32, h: u32) -> Surface<PixelQuantum> {
    if present {
        Surface::new(w, h)
    } else {
        Surface::empty()
    }
}
