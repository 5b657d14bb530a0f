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

//! Minimal walkthrough of the public API: build a planar 4:2:0 8-bit
//! format, encode a tiny synthetic image into it, round-trip it through the
//! container, and decode it back.

use xyuv_rs::{
    create_format, decode_frame, encode_frame, read_frame, write_frame, BlockOrder,
    ChannelBlockTemplate, ChromaSiting, ConversionMatrix, Expr, FormatTemplate, InterleaveMode,
    Origin, PlaneTemplate, SampleTemplate, YuvImage,
};

fn planar_yuv420p8_template() -> FormatTemplate {
    let chroma_dim = |axis: &str, macro_px: &str| {
        Expr::parse(&format!(
            "next_multiple({axis}, subsampling_mode.{macro_px}) / subsampling_mode.{macro_px}"
        ))
        .unwrap()
    };
    let sample = |plane: u8| ChannelBlockTemplate {
        block_w: 1,
        block_h: 1,
        auto_generate: true,
        samples: vec![SampleTemplate {
            plane,
            offset: Expr::int(0),
            integer_bits: Expr::int(8),
            fractional_bits: Expr::int(0),
            has_continuation: false,
        }],
    };
    let plane = |base_offset: Expr, line_stride: Expr, plane_size: Expr| PlaneTemplate {
        base_offset,
        line_stride,
        plane_size,
        block_stride: Expr::int(8),
        interleave_mode: InterleaveMode::None,
        block_order: BlockOrder::IDENTITY,
    };

    FormatTemplate {
        fourcc: *b"I420",
        origin: Origin::UpperLeft,
        planes: vec![
            plane(Expr::int(0), Expr::var("image_w"), Expr::parse("image_w * image_h").unwrap()),
            plane(
                Expr::var("planes[0].plane_size"),
                chroma_dim("image_w", "macro_px_w"),
                Expr::parse("planes[1].line_stride * (next_multiple(image_h, subsampling_mode.macro_px_h) / subsampling_mode.macro_px_h)").unwrap(),
            ),
            plane(
                Expr::parse("planes[1].base_offset + planes[1].plane_size").unwrap(),
                chroma_dim("image_w", "macro_px_w"),
                Expr::var("planes[1].plane_size"),
            ),
        ],
        y_block: Some(sample(0)),
        u_block: Some(sample(1)),
        v_block: Some(sample(2)),
        ..Default::default()
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let (w, h) = (4u32, 2u32);
    let template = planar_yuv420p8_template();
    let format = create_format(w, h, &template, ConversionMatrix::bt601_studio(), ChromaSiting::jpeg_420())?;

    let mut image = YuvImage::new(w, h, ChromaSiting::jpeg_420(), true, true, true, false);
    for y in 0..h {
        for x in 0..w {
            *image.y_plane.at_mut(x, y) = ((x + y) % 2) as f32;
        }
    }
    *image.u_plane.at_mut(0, 0) = 0.5;
    *image.v_plane.at_mut(0, 0) = 0.5;

    let frame = encode_frame(&image, format)?;
    println!("encoded {} bytes for a {w}x{h} 4:2:0 frame", frame.data.len());

    let mut stream = Vec::new();
    write_frame(&mut stream, &frame)?;
    let mut cursor = std::io::Cursor::new(stream);
    let read_back = read_frame(&mut cursor)?.expect("one frame was written");

    let decoded = decode_frame(&read_back)?;
    for y in 0..h {
        let row: Vec<f32> = (0..w).map(|x| *decoded.y_plane.at(x, y)).collect();
        println!("row {y}: {row:?}");
    }

    Ok(())
}
