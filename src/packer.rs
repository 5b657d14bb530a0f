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

//! Packs a channel's pixels into (and back out of) the bitstream a
//! [`ChannelBlock`] describes: block-by-block, row-major within a block,
//! each pixel a UNORM-quantized value possibly split across a chain of
//! continuation samples.

use crate::bits::{read_bits, write_bits};
use crate::geometry::{PixelQuantum, Surface};
use crate::matrix::Range;
use crate::plane::Plane;
use crate::sample::{ChannelBlock, Sample};

/// Groups `block.samples` into one chain per pixel: `block_w * block_h`
/// chains, each the base entry (low-order bits) followed by its
/// continuation tail (increasingly high-order bits), terminating at the
/// first entry with `has_continuation == false`.
fn logical_samples(block: &ChannelBlock) -> Vec<Vec<Sample>> {
    let n_base = block.base_sample_count();
    let mut cursor = n_base;
    let mut chains = Vec::with_capacity(n_base);
    for base in &block.samples[..n_base] {
        let mut chain = vec![*base];
        let mut more = base.has_continuation;
        while more {
            let next = block.samples[cursor];
            cursor += 1;
            more = next.has_continuation;
            chain.push(next);
        }
        chains.push(chain);
    }
    chains
}

fn unorm_max(integer_bits: u32, fractional_bits: u32) -> u64 {
    if integer_bits == 0 {
        return 0;
    }
    ((1u64 << integer_bits) - 1) << fractional_bits
}

fn quantize(value: PixelQuantum, max: u64, range: Range) -> u64 {
    let scaled = value as f64 * (range.1 - range.0) as f64 + range.0 as f64;
    let unorm = (scaled * max as f64 + 0.5).floor();
    unorm.max(0.0) as u64
}

fn dequantize(bits: u64, max: u64, range: Range) -> PixelQuantum {
    if max == 0 {
        return 0.0;
    }
    let normalized = bits as f64 / max as f64;
    let value = (normalized - range.0 as f64) / (range.1 - range.0) as f64;
    value.clamp(0.0, 1.0) as PixelQuantum
}

struct LineAddressing {
    stride: i64,
    base: i64,
}

fn line_addressing(planes: &[Plane], negative_line_stride: bool) -> Vec<LineAddressing> {
    planes
        .iter()
        .map(|p| {
            if negative_line_stride {
                let stride = -(p.line_stride as i64);
                LineAddressing {
                    stride,
                    base: p.size as i64 + stride,
                }
            } else {
                LineAddressing {
                    stride: p.line_stride as i64,
                    base: 0,
                }
            }
        })
        .collect()
}

fn row_base_bits(plane: &Plane, addressing: &LineAddressing, physical_row: u32) -> u64 {
    let byte_offset =
        plane.base_offset as i64 + addressing.base + physical_row as i64 * addressing.stride;
    byte_offset as u64 * 8
}

/// Writes `surf`'s pixels into `buffer` according to `block`'s layout.
/// `surf` must be at least as large as the channel's plane dimensions
/// implied by `block`; pixels beyond `surf`'s bounds are left untouched
/// (the poison fill already covers them).
pub(crate) fn encode_channel(
    buffer: &mut [u8],
    block: &ChannelBlock,
    surf: &Surface<PixelQuantum>,
    planes: &[Plane],
    range: Range,
    negative_line_stride: bool,
    n_blocks_w: u32,
    n_blocks_h: u32,
) {
    if block.is_empty() {
        return;
    }
    let chains = logical_samples(block);
    let addressing = line_addressing(planes, negative_line_stride);

    for block_row in 0..n_blocks_h {
        for block_col in 0..n_blocks_w {
            for py in 0..block.block_h as u32 {
                for px in 0..block.block_w as u32 {
                    let chain = &chains[(py * block.block_w as u32 + px) as usize];
                    let gx = block_col * block.block_w as u32 + px;
                    let gy = block_row * block.block_h as u32 + py;
                    let value = match surf.get(gx, gy) {
                        Some(v) => *v,
                        None => continue,
                    };

                    let total_int: u32 = chain.iter().map(|s| s.integer_bits as u32).sum();
                    let total_frac: u32 = chain.iter().map(|s| s.fractional_bits as u32).sum();
                    let max = unorm_max(total_int, total_frac);
                    let mut unorm = quantize(value, max, range);

                    for sample in chain {
                        let width = sample.total_bits();
                        let plane = &planes[sample.plane as usize];
                        let physical_row = plane.interleave_mode.physical_row(block_row, n_blocks_h);
                        let row_bits = row_base_bits(plane, &addressing[sample.plane as usize], physical_row);
                        let bit_offset =
                            row_bits + block_col as u64 * plane.block_stride as u64 + sample.offset as u64;
                        let low = if width >= 64 { unorm } else { unorm & ((1u64 << width) - 1) };
                        write_bits(buffer, bit_offset, width, low);
                        unorm = if width >= 64 { 0 } else { unorm >> width };
                    }
                }
            }
        }
    }
}

/// The inverse of [`encode_channel`]: reads `block`'s bitstream out of
/// `buffer` into `surf`.
pub(crate) fn decode_channel(
    buffer: &[u8],
    block: &ChannelBlock,
    surf: &mut Surface<PixelQuantum>,
    planes: &[Plane],
    range: Range,
    negative_line_stride: bool,
    n_blocks_w: u32,
    n_blocks_h: u32,
) {
    if block.is_empty() {
        return;
    }
    let chains = logical_samples(block);
    let addressing = line_addressing(planes, negative_line_stride);

    for block_row in 0..n_blocks_h {
        for block_col in 0..n_blocks_w {
            for py in 0..block.block_h as u32 {
                for px in 0..block.block_w as u32 {
                    let chain = &chains[(py * block.block_w as u32 + px) as usize];
                    let gx = block_col * block.block_w as u32 + px;
                    let gy = block_row * block.block_h as u32 + py;
                    if surf.get(gx, gy).is_none() {
                        continue;
                    }

                    let total_int: u32 = chain.iter().map(|s| s.integer_bits as u32).sum();
                    let total_frac: u32 = chain.iter().map(|s| s.fractional_bits as u32).sum();
                    let max = unorm_max(total_int, total_frac);

                    let mut unorm: u64 = 0;
                    let mut shift = 0u32;
                    for sample in chain {
                        let width = sample.total_bits();
                        let plane = &planes[sample.plane as usize];
                        let physical_row = plane.interleave_mode.physical_row(block_row, n_blocks_h);
                        let row_bits = row_base_bits(plane, &addressing[sample.plane as usize], physical_row);
                        let bit_offset =
                            row_bits + block_col as u64 * plane.block_stride as u64 + sample.offset as u64;
                        let bits = read_bits(buffer, bit_offset, width);
                        unorm |= bits << shift;
                        shift += width;
                    }

                    *surf.at_mut(gx, gy) = dequantize(unorm, max, range);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block_order::BlockOrder;
    use crate::plane::InterleaveMode;
    use crate::sample::Sample;

    fn single_plane(size: u64, line_stride: u32, block_stride: u32) -> Vec<Plane> {
        vec![Plane {
            base_offset: 0,
            size,
            line_stride,
            block_stride,
            interleave_mode: InterleaveMode::None,
            block_order: BlockOrder::IDENTITY,
        }]
    }

    #[test]
    fn eight_bit_round_trip() {
        let block = ChannelBlock {
            block_w: 1,
            block_h: 1,
            samples: vec![Sample {
                plane: 0,
                offset: 0,
                integer_bits: 8,
                fractional_bits: 0,
                has_continuation: false,
            }],
        };
        let planes = single_plane(4, 4, 8);
        let mut surf = Surface::<f32>::new(4, 1);
        for (x, v) in [0.0f32, 0.25, 0.5, 1.0].iter().enumerate() {
            *surf.at_mut(x as u32, 0) = *v;
        }
        let mut buf = vec![0u8; 4];
        encode_channel(&mut buf, &block, &surf, &planes, (0.0, 1.0), false, 4, 1);

        let mut out = Surface::<f32>::new(4, 1);
        decode_channel(&buf, &block, &mut out, &planes, (0.0, 1.0), false, 4, 1);
        for x in 0..4 {
            assert!((out.at(x, 0) - surf.at(x, 0)).abs() < 1.0 / 255.0);
        }
    }

    #[test]
    fn continuation_chain_round_trip() {
        // One 16-bit pixel built from four sub-samples, matching the
        // continuation-chain scenario: base carries the low 6 bits, three
        // continuation entries carry the rest.
        let block = ChannelBlock {
            block_w: 1,
            block_h: 1,
            samples: vec![
                Sample { plane: 0, offset: 8, integer_bits: 6, fractional_bits: 0, has_continuation: true },
                Sample { plane: 0, offset: 14, integer_bits: 2, fractional_bits: 0, has_continuation: true },
                Sample { plane: 0, offset: 0, integer_bits: 0, fractional_bits: 4, has_continuation: true },
                Sample { plane: 0, offset: 4, integer_bits: 0, fractional_bits: 4, has_continuation: false },
            ],
        };
        let planes = single_plane(2, 2, 16);
        let mut surf = Surface::<f32>::new(1, 1);
        *surf.at_mut(0, 0) = 0.6;
        let mut buf = vec![0u8; 2];
        encode_channel(&mut buf, &block, &surf, &planes, (0.0, 1.0), false, 1, 1);

        let mut out = Surface::<f32>::new(1, 1);
        decode_channel(&buf, &block, &mut out, &planes, (0.0, 1.0), false, 1, 1);
        assert!((out.at(0, 0) - 0.6).abs() < 1.0 / 65535.0);
    }
}
