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

use crate::block_order::BlockOrder;

/// How logical block rows map onto a plane's physical rows.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterleaveMode {
    /// `p = l` — rows are stored in natural order.
    None = 0,
    /// Odd logical rows first, then even: `p = l/2` if `l` odd; `p = floor(N/2) + l/2` if `l` even.
    OddFirst = 1,
    /// Even logical rows first, then odd: `p = l/2` if `l` even; `p = ceil(N/2) + l/2` if `l` odd.
    EvenFirst = 2,
}

impl InterleaveMode {
    /// Physical block-row index storing logical block row `l`, out of `n`
    /// total block rows.
    pub fn physical_row(self, l: u32, n: u32) -> u32 {
        match self {
            InterleaveMode::None => l,
            InterleaveMode::EvenFirst => {
                if l & 1 == 1 {
                    let split_at = (n + 1) / 2;
                    split_at + l / 2
                } else {
                    l / 2
                }
            }
            InterleaveMode::OddFirst => {
                if l & 1 == 1 {
                    l / 2
                } else {
                    let split_at = n / 2;
                    split_at + l / 2
                }
            }
        }
    }
}

impl From<u8> for InterleaveMode {
    fn from(v: u8) -> Self {
        match v {
            0 => InterleaveMode::None,
            1 => InterleaveMode::OddFirst,
            2 => InterleaveMode::EvenFirst,
            _ => panic!("invalid interleave mode {v}"),
        }
    }
}

/// A contiguous byte range within a frame holding data for one or more
/// channels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub base_offset: u64,
    pub size: u64,
    pub line_stride: u32,
    /// Bits per block (not bytes).
    pub block_stride: u32,
    pub interleave_mode: InterleaveMode,
    pub block_order: BlockOrder,
}
