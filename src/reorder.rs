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

//! Applies a plane's [`BlockOrder`] swizzle across the whole plane: every
//! `mega_block_w x mega_block_h` rectangle of blocks is permuted in place
//! according to the bit-interleave the block order describes.

use crate::bits::copy_bits;
use crate::format::Format;
use crate::plane::Plane;

pub(crate) fn needs_reorder(format: &Format) -> bool {
    format.planes.iter().any(|p| !p.block_order.is_identity())
}

fn macro_block_geometry(plane: &Plane) -> (u64, u64, u32, u32) {
    let mega_w = plane.block_order.mega_block_w;
    let mega_h = plane.block_order.mega_block_h;
    let mega_block_line_stride_bits = mega_w as u64 * plane.block_stride as u64;
    debug_assert!(
        mega_block_line_stride_bits % 8 == 0,
        "mega-block row must be byte aligned"
    );
    let mega_block_line_stride = mega_block_line_stride_bits / 8;
    let mega_block_size = mega_block_line_stride * mega_h as u64;

    let width_in_blocks = (plane.line_stride as u64 * 8) / plane.block_stride as u64;
    let width_in_macro_blocks = (width_in_blocks / mega_w as u64) as u32;
    let height_in_block_lines = plane.size / plane.line_stride as u64;
    let height_in_macro_blocks = (height_in_block_lines / mega_h as u64) as u32;

    let _ = mega_block_size;
    (mega_block_line_stride, mega_block_size, width_in_macro_blocks, height_in_macro_blocks)
}

fn apply(buffer: &mut [u8], plane: &Plane, invert: bool) {
    if plane.block_order.is_identity() {
        return;
    }
    let (mega_block_line_stride, mega_block_size, width_in_macro, height_in_macro) =
        macro_block_geometry(plane);
    let mega_w = plane.block_order.mega_block_w;
    let mega_h = plane.block_order.mega_block_h;

    let start = plane.base_offset as usize;
    let end = start + plane.size as usize;
    let source = buffer[start..end].to_vec();
    let mut dest = vec![0u8; plane.size as usize];

    for mby in 0..height_in_macro {
        for mbx in 0..width_in_macro {
            let mega_block_bit_base =
                (mby as u64 * mega_h as u64 * plane.line_stride as u64 + mbx as u64 * mega_block_size) * 8;
            for y in 0..mega_h {
                let natural_line_bit = (mby * mega_h + y) as u64 * plane.line_stride as u64 * 8;
                for x in 0..mega_w {
                    let (cx, cy) = plane.block_order.coords(x, y);
                    let natural_bit = natural_line_bit + x as u64 * plane.block_stride as u64;
                    let reordered_bit =
                        mega_block_bit_base + cy as u64 * mega_block_line_stride * 8 + cx as u64 * plane.block_stride as u64;

                    if !invert {
                        copy_bits(&mut dest, reordered_bit, &source, natural_bit, plane.block_stride as u64);
                    } else {
                        copy_bits(&mut dest, natural_bit, &source, reordered_bit, plane.block_stride as u64);
                    }
                }
            }
        }
    }

    buffer[start..end].copy_from_slice(&dest);
}

/// Shuffles `plane`'s blocks from natural (row-major) order into swizzled
/// on-disk order.
pub(crate) fn forward(buffer: &mut [u8], plane: &Plane) {
    apply(buffer, plane, false);
}

/// Shuffles `plane`'s blocks from swizzled on-disk order back into natural
/// order.
pub(crate) fn inverse(buffer: &mut [u8], plane: &Plane) {
    apply(buffer, plane, true);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block_order::{BlockOrder, NOT_USED};
    use crate::plane::InterleaveMode;

    fn two_by_two_swizzle() -> BlockOrder {
        // 2x2 mega-block that swaps the two columns of blocks: bit 0 of the
        // offset comes from the complement of block_x's bit 0.
        let mut x_mask = [NOT_USED; 32];
        let mut y_mask = [NOT_USED; 32];
        x_mask[0] = 0;
        y_mask[1] = 0;
        BlockOrder {
            mega_block_w: 2,
            mega_block_h: 2,
            x_mask,
            y_mask,
        }
    }

    #[test]
    fn forward_then_inverse_is_identity() {
        let plane = Plane {
            base_offset: 0,
            size: 8,
            line_stride: 4,
            block_stride: 8,
            interleave_mode: InterleaveMode::None,
            block_order: two_by_two_swizzle(),
        };
        let original: Vec<u8> = (0..8u8).collect();
        let mut buf = original.clone();
        forward(&mut buf, &plane);
        assert_ne!(buf, original, "swizzle with a non-identity order must move bits");
        inverse(&mut buf, &plane);
        assert_eq!(buf, original);
    }

    #[test]
    fn forward_then_inverse_is_identity_across_multiple_macro_block_rows() {
        // 2x2 mega-blocks stacked two rows deep (height_in_macro_blocks == 2):
        // regresses a bug where the destination bit-base omitted the
        // macro-block-row term, so every macro-block row wrote to the same
        // offset and all but the last row's bytes were lost.
        let plane = Plane {
            base_offset: 0,
            size: 16,
            line_stride: 4,
            block_stride: 8,
            interleave_mode: InterleaveMode::None,
            block_order: two_by_two_swizzle(),
        };
        let original: Vec<u8> = (0..16u8).collect();
        let mut buf = original.clone();
        forward(&mut buf, &plane);
        assert_ne!(buf, original, "swizzle with a non-identity order must move bits");
        inverse(&mut buf, &plane);
        assert_eq!(buf, original);
    }

    #[test]
    fn identity_order_is_a_no_op() {
        let plane = Plane {
            base_offset: 0,
            size: 8,
            line_stride: 4,
            block_stride: 8,
            interleave_mode: InterleaveMode::None,
            block_order: BlockOrder::IDENTITY,
        };
        let original: Vec<u8> = (0..8u8).collect();
        let mut buf = original.clone();
        forward(&mut buf, &plane);
        assert_eq!(buf, original);
    }
}
