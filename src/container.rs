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

//! Versioned, big-endian binary container: a fixed-layout header describing
//! a [`Format`] followed by its opaque payload. Block-order swizzles are not
//! persisted — a frame read back from the container always has identity
//! block order on every plane; see DESIGN.md.
//!
//! Unlike the format this container descends from, every multi-byte field —
//! integers and floats alike — is written big-endian, so a container
//! produced on one machine decodes identically on any other.

use std::io::{Read, Write};

use crate::block_order::BlockOrder;
use crate::error::{Error, IoError};
use crate::format::{Format, Frame, Origin};
use crate::matrix::ConversionMatrix;
use crate::plane::{InterleaveMode, Plane};
use crate::sample::{Channel, ChannelBlock, Sample};
use crate::subsampling::{ChromaSiting, Subsampling};

const MAGIC: &[u8; 8] = b"XYUV_FMT";
const VERSION: u16 = 0;
const FILE_HEADER_LEN: usize = 8 + 4 + 2 + 2 + 8;

/// Serializes `frame` onto `sink`: file header, frame header, plane
/// descriptors, channel block descriptors, then the raw payload.
pub fn write_frame<W: Write>(sink: &mut W, frame: &Frame) -> Result<(), Error> {
    log::debug!(
        "writing frame fourcc={:?} {}x{} payload={} bytes",
        frame.format.fourcc,
        frame.format.image_w,
        frame.format.image_h,
        frame.data.len()
    );

    let mut header = Vec::new();
    write_frame_header(&mut header, &frame.format);

    let offset_to_payload = (FILE_HEADER_LEN + header.len()) as u16;
    let payload_size = frame.data.len() as u64;

    sink.write_all(MAGIC)?;
    sink.write_all(&0u32.to_be_bytes())?; // checksum, currently unvalidated
    sink.write_all(&VERSION.to_be_bytes())?;
    sink.write_all(&offset_to_payload.to_be_bytes())?;
    sink.write_all(&payload_size.to_be_bytes())?;
    sink.write_all(&header)?;
    sink.write_all(&frame.data)?;
    Ok(())
}

/// Reads one frame from `source`. Returns `Ok(None)` on a clean end of
/// stream (no bytes available before the next record begins) so callers can
/// loop `while let Some(frame) = read_frame(&mut source)?`.
pub fn read_frame<R: Read>(source: &mut R) -> Result<Option<Frame>, Error> {
    let mut file_header = [0u8; FILE_HEADER_LEN];
    if !fill_or_eof(source, &mut file_header)? {
        return Ok(None);
    }

    let magic = &file_header[0..8];
    if magic != MAGIC {
        let mut got = [0u8; 8];
        got.copy_from_slice(magic);
        return Err(IoError::BadMagic(got).into());
    }
    let version = u16::from_be_bytes(file_header[12..14].try_into().unwrap());
    if version != VERSION {
        return Err(IoError::UnsupportedVersion(version).into());
    }
    let offset_to_payload = u16::from_be_bytes(file_header[14..16].try_into().unwrap()) as usize;
    let payload_size = u64::from_be_bytes(file_header[16..24].try_into().unwrap());

    let header_len = offset_to_payload
        .checked_sub(FILE_HEADER_LEN)
        .ok_or(IoError::UnexpectedEof { needed: FILE_HEADER_LEN, got: offset_to_payload })?;
    let mut header = vec![0u8; header_len];
    read_exact_checked(source, &mut header)?;

    let mut cursor = Cursor { buf: &header, pos: 0 };
    let format = read_frame_header(&mut cursor, payload_size)?;

    let mut data = vec![0u8; payload_size as usize];
    read_exact_checked(source, &mut data)?;

    log::debug!(
        "read frame fourcc={:?} {}x{} payload={} bytes",
        format.fourcc,
        format.image_w,
        format.image_h,
        data.len()
    );

    Ok(Some(Frame { format, data }))
}

fn fill_or_eof<R: Read>(source: &mut R, buf: &mut [u8]) -> Result<bool, Error> {
    let mut total = 0;
    while total < buf.len() {
        let n = source.read(&mut buf[total..])?;
        if n == 0 {
            if total == 0 {
                return Ok(false);
            }
            return Err(IoError::UnexpectedEof {
                needed: buf.len(),
                got: total,
            }
            .into());
        }
        total += n;
    }
    Ok(true)
}

fn read_exact_checked<R: Read>(source: &mut R, buf: &mut [u8]) -> Result<(), Error> {
    if !fill_or_eof(source, buf)? {
        return Err(IoError::UnexpectedEof {
            needed: buf.len(),
            got: 0,
        }
        .into());
    }
    Ok(())
}

fn write_frame_header(out: &mut Vec<u8>, format: &Format) {
    out.extend_from_slice(&format.fourcc);
    out.extend_from_slice(&0u32.to_be_bytes()); // reserved
    out.push(match format.origin {
        Origin::UpperLeft => 0,
        Origin::LowerLeft => 1,
    });
    out.extend_from_slice(&format.image_w.to_be_bytes());
    out.extend_from_slice(&format.image_h.to_be_bytes());
    out.push(format.planes.len() as u8);

    out.push(format.chroma_siting.subsampling.macro_px_w);
    out.push(format.chroma_siting.subsampling.macro_px_h);
    write_f32(out, format.chroma_siting.u_sample_point.0);
    write_f32(out, format.chroma_siting.u_sample_point.1);
    write_f32(out, format.chroma_siting.v_sample_point.0);
    write_f32(out, format.chroma_siting.v_sample_point.1);

    let m = &format.conversion_matrix;
    for row in &m.rgb_to_yuv {
        for v in row {
            write_f32(out, *v);
        }
    }
    for row in &m.yuv_to_rgb {
        for v in row {
            write_f32(out, *v);
        }
    }
    for range in [
        m.y_range,
        m.u_range,
        m.v_range,
        m.y_packed_range,
        m.u_packed_range,
        m.v_packed_range,
    ] {
        write_f32(out, range.0);
        write_f32(out, range.1);
    }

    for plane in &format.planes {
        out.extend_from_slice(&plane.base_offset.to_be_bytes());
        out.extend_from_slice(&plane.size.to_be_bytes());
        out.extend_from_slice(&plane.line_stride.to_be_bytes());
        out.extend_from_slice(&plane.block_stride.to_be_bytes());
        out.push(plane.interleave_mode as u8);
    }

    for channel in Channel::ALL {
        let block = format.channel_block(channel);
        out.extend_from_slice(&block.block_w.to_be_bytes());
        out.extend_from_slice(&block.block_h.to_be_bytes());
        out.extend_from_slice(&(block.n_continuation_samples() as u32).to_be_bytes());
        for sample in &block.samples {
            out.push(sample.plane);
            out.push(sample.integer_bits);
            out.push(sample.fractional_bits);
            out.push(sample.has_continuation as u8);
            out.extend_from_slice(&(sample.offset as u16).to_be_bytes());
        }
    }
}

fn write_f32(out: &mut Vec<u8>, v: f32) {
    out.extend_from_slice(&v.to_be_bytes());
}

/// A read-only cursor over an in-memory header buffer, used while parsing
/// the fixed-layout sections that precede the payload.
struct Cursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn take(&mut self, n: usize) -> Result<&'a [u8], Error> {
        if self.pos + n > self.buf.len() {
            return Err(IoError::UnexpectedEof {
                needed: n,
                got: self.buf.len() - self.pos,
            }
            .into());
        }
        let slice = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn u8(&mut self) -> Result<u8, Error> {
        Ok(self.take(1)?[0])
    }

    fn u16(&mut self) -> Result<u16, Error> {
        Ok(u16::from_be_bytes(self.take(2)?.try_into().unwrap()))
    }

    fn u32(&mut self) -> Result<u32, Error> {
        Ok(u32::from_be_bytes(self.take(4)?.try_into().unwrap()))
    }

    fn u64(&mut self) -> Result<u64, Error> {
        Ok(u64::from_be_bytes(self.take(8)?.try_into().unwrap()))
    }

    fn f32(&mut self) -> Result<f32, Error> {
        Ok(f32::from_be_bytes(self.take(4)?.try_into().unwrap()))
    }
}

fn read_frame_header(c: &mut Cursor<'_>, payload_size: u64) -> Result<Format, Error> {
    let mut fourcc = [0u8; 4];
    fourcc.copy_from_slice(c.take(4)?);
    let _reserved = c.u32()?;
    let origin = match c.u8()? {
        0 => Origin::UpperLeft,
        1 => Origin::LowerLeft,
        other => return Err(IoError::Io(format!("unrecognized origin byte {other}")).into()),
    };
    let image_w = c.u32()?;
    let image_h = c.u32()?;
    let n_planes = c.u8()? as usize;

    let macro_px_w = c.u8()?;
    let macro_px_h = c.u8()?;
    let u_sample_point = (c.f32()?, c.f32()?);
    let v_sample_point = (c.f32()?, c.f32()?);
    let subsampling = Subsampling::new(macro_px_w, macro_px_h)?;
    let chroma_siting = ChromaSiting {
        subsampling,
        u_sample_point,
        v_sample_point,
    };

    let mut rgb_to_yuv = [[0f32; 3]; 3];
    for row in &mut rgb_to_yuv {
        for v in row.iter_mut() {
            *v = c.f32()?;
        }
    }
    let mut yuv_to_rgb = [[0f32; 3]; 3];
    for row in &mut yuv_to_rgb {
        for v in row.iter_mut() {
            *v = c.f32()?;
        }
    }
    let mut ranges = [(0f32, 0f32); 6];
    for r in &mut ranges {
        *r = (c.f32()?, c.f32()?);
    }
    let conversion_matrix = ConversionMatrix {
        rgb_to_yuv,
        yuv_to_rgb,
        y_range: ranges[0],
        u_range: ranges[1],
        v_range: ranges[2],
        y_packed_range: ranges[3],
        u_packed_range: ranges[4],
        v_packed_range: ranges[5],
    };

    let mut planes = Vec::with_capacity(n_planes);
    for _ in 0..n_planes {
        planes.push(Plane {
            base_offset: c.u64()?,
            size: c.u64()?,
            line_stride: c.u32()?,
            block_stride: c.u32()?,
            interleave_mode: InterleaveMode::from(c.u8()?),
            block_order: BlockOrder::IDENTITY,
        });
    }

    let mut channel_blocks: [ChannelBlock; 4] = Default::default();
    for channel in Channel::ALL {
        let block_w = c.u16()?;
        let block_h = c.u16()?;
        let n_continuation = c.u32()? as usize;
        let total = block_w as usize * block_h as usize + n_continuation;
        let mut samples = Vec::with_capacity(total);
        for _ in 0..total {
            samples.push(Sample {
                plane: c.u8()?,
                integer_bits: c.u8()?,
                fractional_bits: c.u8()?,
                has_continuation: c.u8()? != 0,
                offset: c.u16()? as u32,
            });
        }
        channel_blocks[channel as usize] = ChannelBlock {
            block_w,
            block_h,
            samples,
        };
    }

    Ok(Format {
        fourcc,
        origin,
        image_w,
        image_h,
        size: payload_size,
        planes,
        channel_blocks,
        chroma_siting,
        conversion_matrix,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::Sample;

    fn tiny_format() -> Format {
        Format {
            fourcc: *b"Y8__",
            origin: Origin::UpperLeft,
            image_w: 2,
            image_h: 2,
            size: 4,
            planes: vec![Plane {
                base_offset: 0,
                size: 4,
                line_stride: 2,
                block_stride: 8,
                interleave_mode: InterleaveMode::None,
                block_order: BlockOrder::IDENTITY,
            }],
            channel_blocks: [
                ChannelBlock {
                    block_w: 1,
                    block_h: 1,
                    samples: vec![Sample {
                        plane: 0,
                        offset: 0,
                        integer_bits: 8,
                        fractional_bits: 0,
                        has_continuation: false,
                    }],
                },
                ChannelBlock::default(),
                ChannelBlock::default(),
                ChannelBlock::default(),
            ],
            chroma_siting: ChromaSiting::full(),
            conversion_matrix: ConversionMatrix::bt601_full(),
        }
    }

    #[test]
    fn round_trips_a_single_frame() {
        let format = tiny_format();
        let frame = Frame {
            data: vec![10, 20, 30, 40],
            format,
        };
        let mut buf = Vec::new();
        write_frame(&mut buf, &frame).unwrap();

        let mut cursor = std::io::Cursor::new(buf);
        let read_back = read_frame(&mut cursor).unwrap().unwrap();
        assert_eq!(read_back.data, frame.data);
        assert_eq!(read_back.format.image_w, 2);
        assert_eq!(read_back.format.image_h, 2);
        assert_eq!(read_back.format.planes.len(), 1);
        assert_eq!(read_back.format.channel_blocks[0].samples.len(), 1);
        assert!(read_frame(&mut cursor).unwrap().is_none());
    }

    #[test]
    fn round_trips_four_concatenated_frames() {
        let mut buf = Vec::new();
        for i in 0..4u8 {
            let frame = Frame {
                data: vec![i, i + 1, i + 2, i + 3],
                format: tiny_format(),
            };
            write_frame(&mut buf, &frame).unwrap();
        }
        let mut cursor = std::io::Cursor::new(buf);
        let mut count = 0;
        while let Some(frame) = read_frame(&mut cursor).unwrap() {
            assert_eq!(frame.data[0], count as u8);
            count += 1;
        }
        assert_eq!(count, 4);
    }

    #[test]
    fn rejects_bad_magic() {
        let mut buf = vec![0u8; FILE_HEADER_LEN];
        buf[0] = b'X';
        let mut cursor = std::io::Cursor::new(buf);
        let err = read_frame(&mut cursor).unwrap_err();
        assert!(matches!(err, Error::Io(IoError::BadMagic(_))));
    }

    #[test]
    fn empty_stream_is_clean_eof() {
        let mut cursor = std::io::Cursor::new(Vec::<u8>::new());
        assert!(read_frame(&mut cursor).unwrap().is_none());
    }
}
