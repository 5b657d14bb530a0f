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

//! Top-level wiring: conforms a caller's [`YuvImage`] to a [`Format`]'s
//! dimensions and siting, packs it with [`crate::packer`], and applies the
//! per-plane block swizzle with [`crate::reorder`] — and back again.

use crate::error::Error;
use crate::format::{Format, Frame, Origin};
use crate::geometry::Surface;
use crate::matrix::{ConversionMatrix, Range};
use crate::packer::{decode_channel, encode_channel};
use crate::reorder;
use crate::sample::Channel;
use crate::subsample::down_sample;
use crate::subsampling::ChromaSiting;
use crate::template::FormatTemplate;
use crate::yuv_image::YuvImage;

/// Inflates `template` against `(image_w, image_h, siting, matrix)` and
/// validates the result. Thin wrapper over
/// [`FormatTemplate::inflate`]/[`Format::validate`] matching the public
/// operation named in the library surface.
pub fn create_format(
    image_w: u32,
    image_h: u32,
    template: &FormatTemplate,
    matrix: ConversionMatrix,
    siting: ChromaSiting,
) -> Result<Format, Error> {
    let format = template.inflate(image_w, image_h, siting, matrix)?;
    format.validate()?;
    Ok(format)
}

/// Builds a [`Frame`] for `format`, either poison-filled ([`Frame::new`]) or
/// wrapping caller-supplied bytes that must already be `format.size` long.
pub fn create_frame(format: Format, raw_bytes: Option<Vec<u8>>) -> Result<Frame, Error> {
    match raw_bytes {
        Some(data) => {
            if data.len() as u64 != format.size {
                return Err(crate::error::DomainError::SurfaceLengthMismatch {
                    len: data.len(),
                    expected: format.size as usize,
                }
                .into());
            }
            Ok(Frame { format, data })
        }
        None => Ok(Frame::new(format)),
    }
}

fn channel_dims(format: &Format, channel: Channel) -> (u32, u32) {
    match channel {
        Channel::Y | Channel::A => (format.image_w, format.image_h),
        Channel::U | Channel::V => format
            .chroma_siting
            .subsampling
            .chroma_dim(format.image_w, format.image_h),
    }
}

fn channel_range(matrix: &ConversionMatrix, channel: Channel) -> Range {
    match channel {
        Channel::Y => matrix.y_packed_range,
        Channel::U => matrix.u_packed_range,
        Channel::V => matrix.v_packed_range,
        Channel::A => (0.0, 1.0),
    }
}

fn source_surface(image: &YuvImage, format: &Format, channel: Channel) -> Surface<f32> {
    if image.has_channel(channel) {
        return image.plane(channel).clone();
    }
    let (w, h) = channel_dims(format, channel);
    match channel {
        Channel::A => Surface::filled(w, h, 1.0),
        _ => Surface::new(w, h),
    }
}

/// Packs `image` into a freshly allocated [`Frame`] for `format`: chroma is
/// resampled to `format.chroma_siting` first, then every non-empty channel
/// block is packed in natural block order, and finally each plane's block
/// swizzle is applied.
pub fn encode_frame(image: &YuvImage, format: Format) -> Result<Frame, Error> {
    log::debug!(
        "encoding {}x{} image into format {:?}",
        image.image_w,
        image.image_h,
        format.fourcc
    );
    let conformed = down_sample(image, format.chroma_siting);
    let mut frame = Frame::new(format);
    let negative_line_stride = frame.format.origin == Origin::LowerLeft;

    for channel in Channel::ALL {
        let block = frame.format.channel_block(channel);
        if block.is_empty() {
            continue;
        }
        let (chan_w, chan_h) = channel_dims(&frame.format, channel);
        let n_blocks_w = (chan_w as u64 + block.block_w as u64 - 1) / block.block_w as u64;
        let n_blocks_h = (chan_h as u64 + block.block_h as u64 - 1) / block.block_h as u64;
        let range = channel_range(&frame.format.conversion_matrix, channel);
        let surf = source_surface(&conformed, &frame.format, channel);
        let block = frame.format.channel_block(channel).clone();
        encode_channel(
            &mut frame.data,
            &block,
            &surf,
            &frame.format.planes,
            range,
            negative_line_stride,
            n_blocks_w as u32,
            n_blocks_h as u32,
        );
    }

    if reorder::needs_reorder(&frame.format) {
        for plane in &frame.format.planes {
            reorder::forward(&mut frame.data, plane);
        }
    }

    Ok(frame)
}

/// Inverse of [`encode_frame`]: undoes each plane's block swizzle, then
/// unpacks every non-empty channel block into a fresh [`YuvImage`] sized and
/// sited per `frame.format`.
pub fn decode_frame(frame: &Frame) -> Result<YuvImage, Error> {
    log::debug!(
        "decoding format {:?} into {}x{} image",
        frame.format.fourcc,
        frame.format.image_w,
        frame.format.image_h
    );
    let format = &frame.format;
    let mut buffer = frame.data.clone();
    if reorder::needs_reorder(format) {
        for plane in &format.planes {
            reorder::inverse(&mut buffer, plane);
        }
    }
    let negative_line_stride = format.origin == Origin::LowerLeft;

    let mut image = YuvImage::new(
        format.image_w,
        format.image_h,
        format.chroma_siting,
        !format.channel_block(Channel::Y).is_empty(),
        !format.channel_block(Channel::U).is_empty(),
        !format.channel_block(Channel::V).is_empty(),
        !format.channel_block(Channel::A).is_empty(),
    );

    for channel in Channel::ALL {
        let block = format.channel_block(channel);
        if block.is_empty() {
            continue;
        }
        let (chan_w, chan_h) = channel_dims(format, channel);
        let n_blocks_w = (chan_w as u64 + block.block_w as u64 - 1) / block.block_w as u64;
        let n_blocks_h = (chan_h as u64 + block.block_h as u64 - 1) / block.block_h as u64;
        let range = channel_range(&format.conversion_matrix, channel);
        let block = block.clone();
        decode_channel(
            &buffer,
            &block,
            image.plane_mut(channel),
            &format.planes,
            range,
            negative_line_stride,
            n_blocks_w as u32,
            n_blocks_h as u32,
        );
    }

    Ok(image)
}

/// Decodes `frame` against its own format, then re-encodes the result into
/// `new_format`.
pub fn convert_frame(frame: &Frame, new_format: Format) -> Result<Frame, Error> {
    let image = decode_frame(frame)?;
    encode_frame(&image, new_format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::Expr;
    use crate::template::{ChannelBlockTemplate, PlaneTemplate, SampleTemplate};

    fn planar_y8_template() -> FormatTemplate {
        let mut t = FormatTemplate {
            fourcc: *b"Y8  ",
            origin: Origin::UpperLeft,
            planes: vec![PlaneTemplate {
                base_offset: Expr::int(0),
                line_stride: Expr::var("image_w"),
                plane_size: Expr::parse("image_w * image_h").unwrap(),
                block_stride: Expr::int(8),
                interleave_mode: crate::plane::InterleaveMode::None,
                block_order: crate::block_order::BlockOrder::IDENTITY,
            }],
            ..Default::default()
        };
        t.y_block = Some(ChannelBlockTemplate {
            block_w: 1,
            block_h: 1,
            auto_generate: true,
            samples: vec![SampleTemplate {
                plane: 0,
                offset: Expr::int(0),
                integer_bits: Expr::int(8),
                fractional_bits: Expr::int(0),
                has_continuation: false,
            }],
        });
        t
    }

    #[test]
    fn encode_then_decode_round_trips_y_only() {
        let template = planar_y8_template();
        let format = create_format(4, 2, &template, ConversionMatrix::bt601_full(), ChromaSiting::full()).unwrap();

        let mut image = YuvImage::new(4, 2, ChromaSiting::full(), true, false, false, false);
        let values = [0.0f32, 0.2, 0.4, 0.6, 0.8, 1.0, 0.33, 0.75];
        for (i, v) in values.iter().enumerate() {
            let x = (i as u32) % 4;
            let y = (i as u32) / 4;
            *image.y_plane.at_mut(x, y) = *v;
        }

        let frame = encode_frame(&image, format).unwrap();
        let back = decode_frame(&frame).unwrap();
        for y in 0..2 {
            for x in 0..4 {
                assert!((back.y_plane.at(x, y) - image.y_plane.at(x, y)).abs() < 1.0 / 255.0);
            }
        }
    }

    #[test]
    fn implicit_alpha_defaults_to_opaque() {
        let mut template = planar_y8_template();
        template.planes.push(PlaneTemplate {
            base_offset: Expr::var("planes[0].plane_size"),
            line_stride: Expr::var("image_w"),
            plane_size: Expr::parse("image_w * image_h").unwrap(),
            block_stride: Expr::int(8),
            interleave_mode: crate::plane::InterleaveMode::None,
            block_order: crate::block_order::BlockOrder::IDENTITY,
        });
        template.a_block = Some(ChannelBlockTemplate {
            block_w: 1,
            block_h: 1,
            auto_generate: true,
            samples: vec![SampleTemplate {
                plane: 1,
                offset: Expr::int(0),
                integer_bits: Expr::int(8),
                fractional_bits: Expr::int(0),
                has_continuation: false,
            }],
        });
        let format = create_format(2, 1, &template, ConversionMatrix::bt601_full(), ChromaSiting::full()).unwrap();

        let mut image = YuvImage::new(2, 1, ChromaSiting::full(), true, false, false, false);
        *image.y_plane.at_mut(0, 0) = 0.5;
        *image.y_plane.at_mut(1, 0) = 0.25;

        let frame = encode_frame(&image, format).unwrap();
        let back = decode_frame(&frame).unwrap();
        assert!(back.has_channel(Channel::A));
        assert!((back.a_plane.at(0, 0) - 1.0).abs() < 1e-6);
        assert!((back.a_plane.at(1, 0) - 1.0).abs() < 1e-6);
    }
}
