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

/// One of the four logical channels a format may describe.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Y = 0,
    U = 1,
    V = 2,
    A = 3,
}

impl Channel {
    pub const ALL: [Channel; 4] = [Channel::Y, Channel::U, Channel::V, Channel::A];

    pub fn name(self) -> &'static str {
        match self {
            Channel::Y => "Y",
            Channel::U => "U",
            Channel::V => "V",
            Channel::A => "A",
        }
    }
}

impl From<u8> for Channel {
    fn from(v: u8) -> Self {
        match v {
            0 => Channel::Y,
            1 => Channel::U,
            2 => Channel::V,
            3 => Channel::A,
            _ => panic!("invalid channel index {v}"),
        }
    }
}

/// A contiguous run of bits for one value (or one part of a continuation
/// chain) in one plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample {
    pub plane: u8,
    pub offset: u32,
    pub integer_bits: u8,
    pub fractional_bits: u8,
    pub has_continuation: bool,
}

impl Sample {
    pub fn total_bits(&self) -> u32 {
        self.integer_bits as u32 + self.fractional_bits as u32
    }

    /// `max` from the UNORM encoding: `((1 << integer_bits) - 1) << fractional_bits`.
    pub fn unorm_max(&self) -> u64 {
        if self.integer_bits == 0 {
            return 0;
        }
        ((1u64 << self.integer_bits) - 1) << self.fractional_bits
    }
}

/// One channel's block geometry plus its ordered sample list: exactly
/// `block_w * block_h` base entries (one per pixel, row-major) followed by
/// zero or more continuation entries.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChannelBlock {
    pub block_w: u16,
    pub block_h: u16,
    pub samples: Vec<Sample>,
}

impl ChannelBlock {
    pub fn is_empty(&self) -> bool {
        self.block_w == 0 || self.block_h == 0
    }

    pub fn base_sample_count(&self) -> usize {
        self.block_w as usize * self.block_h as usize
    }

    pub fn n_continuation_samples(&self) -> usize {
        self.samples.len().saturating_sub(self.base_sample_count())
    }
}
