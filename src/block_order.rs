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

/// Sentinel marking an unused swizzle-mask entry. Must contribute zero bits
/// rather than attempt a shift equal to the integer's bit width.
pub const NOT_USED: u8 = 32;

/// Swizzle descriptor for a plane: a mega-block rectangle of
/// `mega_block_w x mega_block_h` blocks whose on-disk order is a
/// bit-interleaved permutation of their natural order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockOrder {
    pub mega_block_w: u32,
    pub mega_block_h: u32,
    pub x_mask: [u8; 32],
    pub y_mask: [u8; 32],
}

impl BlockOrder {
    /// Identity order: no reordering occurs.
    pub const IDENTITY: BlockOrder = BlockOrder {
        mega_block_w: 1,
        mega_block_h: 1,
        x_mask: [NOT_USED; 32],
        y_mask: [NOT_USED; 32],
    };

    pub fn is_identity(&self) -> bool {
        self.mega_block_w == 1 && self.mega_block_h == 1
    }

    /// Bit-packs `value` through a mask array: for each output bit position
    /// `i`, if `mask[i]` is a valid bit index, that bit of `value`
    /// contributes to bit `i` of the result; `NOT_USED` contributes zero.
    fn bit_pack(value: u32, mask: &[u8; 32]) -> u32 {
        let mut out = 0u32;
        for (i, &m) in mask.iter().enumerate() {
            if m != NOT_USED {
                let bit = (value >> m) & 1;
                out |= bit << i;
            }
        }
        out
    }

    /// Linear offset (in blocks, within one mega-block) for block coordinate
    /// `(block_x, block_y)`.
    pub fn offset(&self, block_x: u32, block_y: u32) -> u32 {
        let xval = Self::bit_pack(block_x, &self.x_mask);
        let yval = Self::bit_pack(block_y, &self.y_mask);
        xval ^ yval
    }

    /// 2-D on-disk coordinate for `(block_x, block_y)` within the mega-block.
    pub fn coords(&self, block_x: u32, block_y: u32) -> (u32, u32) {
        let offset = self.offset(block_x, block_y);
        (offset % self.mega_block_w, offset / self.mega_block_w)
    }
}

impl Default for BlockOrder {
    fn default() -> Self {
        BlockOrder::IDENTITY
    }
}
