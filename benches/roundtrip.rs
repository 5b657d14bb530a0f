//! Encode/decode throughput for a format that exercises the packer, the
//! block reorderer, and the chroma subsampler together: an 8-bit Y plane
//! swizzled into 4x4 mega-blocks, and 4:2:0 U/V planes whose sample is split
//! into a 4-bit base and a 4-bit continuation.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use xyuv_rs::{
    create_format, decode_frame, encode_frame, BlockOrder, ChannelBlockTemplate, ChromaSiting,
    ConversionMatrix, Expr, FormatTemplate, InterleaveMode, Origin, PlaneTemplate, SampleTemplate,
    YuvImage, NOT_USED,
};

fn swizzled_order() -> BlockOrder {
    let mut x_mask = [NOT_USED; 32];
    let mut y_mask = [NOT_USED; 32];
    x_mask[0] = 0;
    x_mask[2] = 1;
    y_mask[1] = 0;
    y_mask[3] = 1;
    BlockOrder {
        mega_block_w: 4,
        mega_block_h: 4,
        x_mask,
        y_mask,
    }
}

fn synthetic_420_swizzled_template() -> FormatTemplate {
    let y_plane = PlaneTemplate {
        base_offset: Expr::int(0),
        line_stride: Expr::parse("image_w + planes[0].block_order.mega_block_w - planes[0].block_order.mega_block_w").unwrap(),
        plane_size: Expr::parse("planes[0].line_stride * image_h + planes[0].block_order.mega_block_h - planes[0].block_order.mega_block_h").unwrap(),
        block_stride: Expr::int(8),
        interleave_mode: InterleaveMode::None,
        block_order: swizzled_order(),
    };
    let chroma_w = Expr::parse("next_multiple(image_w, subsampling_mode.macro_px_w) / subsampling_mode.macro_px_w").unwrap();
    let u_plane = PlaneTemplate {
        base_offset: Expr::var("planes[0].plane_size"),
        line_stride: chroma_w.clone(),
        plane_size: Expr::parse("planes[1].line_stride * (next_multiple(image_h, subsampling_mode.macro_px_h) / subsampling_mode.macro_px_h)").unwrap(),
        block_stride: Expr::int(8),
        interleave_mode: InterleaveMode::None,
        block_order: BlockOrder::IDENTITY,
    };
    let v_plane = PlaneTemplate {
        base_offset: Expr::parse("planes[1].base_offset + planes[1].plane_size").unwrap(),
        line_stride: chroma_w,
        plane_size: Expr::var("planes[1].plane_size"),
        block_stride: Expr::int(8),
        interleave_mode: InterleaveMode::None,
        block_order: BlockOrder::IDENTITY,
    };

    let continuation_chroma_sample = ChannelBlockTemplate {
        block_w: 1,
        block_h: 1,
        auto_generate: true,
        samples: vec![
            SampleTemplate { plane: 1, offset: Expr::int(0), integer_bits: Expr::int(4), fractional_bits: Expr::int(0), has_continuation: true },
            SampleTemplate { plane: 1, offset: Expr::int(4), integer_bits: Expr::int(4), fractional_bits: Expr::int(0), has_continuation: false },
        ],
    };
    let continuation_chroma_sample_v = ChannelBlockTemplate {
        samples: continuation_chroma_sample
            .samples
            .iter()
            .cloned()
            .map(|mut s| {
                s.plane = 2;
                s
            })
            .collect(),
        ..continuation_chroma_sample.clone()
    };

    FormatTemplate {
        fourcc: *b"BX20",
        origin: Origin::UpperLeft,
        planes: vec![y_plane, u_plane, v_plane],
        y_block: Some(ChannelBlockTemplate {
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
        }),
        u_block: Some(continuation_chroma_sample),
        v_block: Some(continuation_chroma_sample_v),
        ..Default::default()
    }
}

fn synthetic_image(w: u32, h: u32, siting: ChromaSiting) -> YuvImage {
    let mut image = YuvImage::new(w, h, siting, true, true, true, false);
    for y in 0..h {
        for x in 0..w {
            *image.y_plane.at_mut(x, y) = ((x + y) % 256) as f32 / 255.0;
        }
    }
    let (cw, ch) = siting.subsampling.chroma_dim(w, h);
    for cy in 0..ch {
        for cx in 0..cw {
            *image.u_plane.at_mut(cx, cy) = ((cx * 3 + cy) % 16) as f32 / 15.0;
            *image.v_plane.at_mut(cx, cy) = ((cx + cy * 5) % 16) as f32 / 15.0;
        }
    }
    image
}

fn bench_encode(c: &mut Criterion) {
    let siting = ChromaSiting::jpeg_420();
    let (w, h) = (256u32, 256u32);
    let template = synthetic_420_swizzled_template();
    let format = create_format(w, h, &template, ConversionMatrix::bt601_full(), siting).unwrap();
    let image = synthetic_image(w, h, siting);

    c.bench_function("encode_swizzled_420_256x256", |bencher| {
        bencher.iter(|| encode_frame(black_box(&image), black_box(format.clone())).unwrap());
    });
}

fn bench_decode(c: &mut Criterion) {
    let siting = ChromaSiting::jpeg_420();
    let (w, h) = (256u32, 256u32);
    let template = synthetic_420_swizzled_template();
    let format = create_format(w, h, &template, ConversionMatrix::bt601_full(), siting).unwrap();
    let image = synthetic_image(w, h, siting);
    let frame = encode_frame(&image, format).unwrap();

    c.bench_function("decode_swizzled_420_256x256", |bencher| {
        bencher.iter(|| decode_frame(black_box(&frame)).unwrap());
    });
}

criterion_group!(benches, bench_encode, bench_decode);
criterion_main!(benches);
