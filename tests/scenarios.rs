//! End-to-end scenarios exercising the public surface together: template
//! inflation, packing, block reordering, chroma resampling, and container
//! I/O. Mirrors the named scenarios used to validate the core during
//! development, scaled down where the original parameters (e.g. a
//! 256-block-wide swizzle) would make the test unwieldy without changing
//! what property is being checked.

use xyuv_rs::{
    create_format, create_frame, decode_frame, down_sample, encode_frame, evaluate, read_frame,
    up_sample, write_frame, BlockOrder, ChannelBlockTemplate, ChromaSiting, ConversionMatrix,
    Environment, Expr, FormatTemplate, InterleaveMode, Origin, PlaneTemplate, SampleTemplate,
    Value, YuvImage, NOT_USED,
};

fn y8_template(interleave_mode: InterleaveMode) -> FormatTemplate {
    FormatTemplate {
        fourcc: *b"Y8__",
        origin: Origin::UpperLeft,
        planes: vec![PlaneTemplate {
            base_offset: Expr::int(0),
            line_stride: Expr::var("image_w"),
            plane_size: Expr::parse("image_w * image_h").unwrap(),
            block_stride: Expr::int(8),
            interleave_mode,
            block_order: BlockOrder::IDENTITY,
        }],
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
        ..Default::default()
    }
}

/// Scenario A — a 1x5 single-channel format whose plane uses
/// [`InterleaveMode::OddFirst`] ("odd logical rows first, then even").
/// Decoding un-interleaves the physical bytes into logical row order;
/// re-encoding into a [`InterleaveMode::None`] sibling format reproduces the
/// linear byte sequence, and re-encoding with the original interleave
/// reproduces the original bytes.
#[test]
fn scenario_a_interleaved_rows_round_trip() {
    let odd_first = create_format(1, 5, &y8_template(InterleaveMode::OddFirst), ConversionMatrix::bt601_full(), ChromaSiting::full()).unwrap();
    let none = create_format(1, 5, &y8_template(InterleaveMode::None), ConversionMatrix::bt601_full(), ChromaSiting::full()).unwrap();

    let frame = create_frame(odd_first.clone(), Some(vec![1, 3, 0, 2, 4])).unwrap();
    let image = decode_frame(&frame).unwrap();

    let linear = encode_frame(&image, none).unwrap();
    assert_eq!(linear.data, vec![0, 1, 2, 3, 4]);

    let back = encode_frame(&image, odd_first).unwrap();
    assert_eq!(back.data, vec![1, 3, 0, 2, 4]);
}

/// Scenario B — a single pixel whose 8-bit value is split across a
/// continuation chain: a 6-bit base, a 2-bit continuation, and two 4-bit
/// fractional continuations, covering all 16 bits of a 2-byte plane with no
/// gaps or overlap. Decoding then re-encoding must reproduce the bytes.
#[test]
fn scenario_b_continuation_chain_round_trips() {
    let template = FormatTemplate {
        fourcc: *b"CONT",
        origin: Origin::UpperLeft,
        planes: vec![PlaneTemplate {
            base_offset: Expr::int(0),
            line_stride: Expr::int(2),
            plane_size: Expr::int(2),
            block_stride: Expr::int(16),
            interleave_mode: InterleaveMode::None,
            block_order: BlockOrder::IDENTITY,
        }],
        y_block: Some(ChannelBlockTemplate {
            block_w: 1,
            block_h: 1,
            auto_generate: true,
            samples: vec![
                SampleTemplate { plane: 0, offset: Expr::int(8), integer_bits: Expr::int(6), fractional_bits: Expr::int(0), has_continuation: true },
                SampleTemplate { plane: 0, offset: Expr::int(14), integer_bits: Expr::int(2), fractional_bits: Expr::int(0), has_continuation: true },
                SampleTemplate { plane: 0, offset: Expr::int(0), integer_bits: Expr::int(0), fractional_bits: Expr::int(4), has_continuation: true },
                SampleTemplate { plane: 0, offset: Expr::int(4), integer_bits: Expr::int(0), fractional_bits: Expr::int(4), has_continuation: false },
            ],
        }),
        ..Default::default()
    };
    let format = create_format(1, 1, &template, ConversionMatrix::bt601_full(), ChromaSiting::full()).unwrap();

    let frame = create_frame(format.clone(), Some(vec![0x55, 0x7F])).unwrap();
    let image = decode_frame(&frame).unwrap();
    let back = encode_frame(&image, format).unwrap();
    assert_eq!(back.data, vec![0x55, 0x7F]);
}

fn morton_2x2_block_order() -> BlockOrder {
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

/// Scenario C (scaled down from the 256-block-wide original to keep the
/// test fast) — a Y-only identity-sample format whose plane is swizzled by
/// a 4x4 Morton-order [`BlockOrder`]. Filling the logical image with a
/// linear byte sequence, encoding with the swizzle, decoding, then
/// re-encoding into a non-swizzled sibling reproduces the linear sequence.
#[test]
fn scenario_c_block_swizzle_round_trips_through_identity() {
    let block_order = morton_2x2_block_order();
    let swizzled_plane = PlaneTemplate {
        base_offset: Expr::int(0),
        line_stride: Expr::parse("image_w + planes[0].block_order.mega_block_w - planes[0].block_order.mega_block_w").unwrap(),
        plane_size: Expr::parse("planes[0].line_stride * image_h + planes[0].block_order.mega_block_h - planes[0].block_order.mega_block_h").unwrap(),
        block_stride: Expr::int(8),
        interleave_mode: InterleaveMode::None,
        block_order,
    };
    let identity_plane = PlaneTemplate {
        block_order: BlockOrder::IDENTITY,
        ..swizzled_plane.clone()
    };
    let y_block = ChannelBlockTemplate {
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
    };
    let swizzled_template = FormatTemplate {
        fourcc: *b"SWZL",
        origin: Origin::UpperLeft,
        planes: vec![swizzled_plane],
        y_block: Some(y_block.clone()),
        ..Default::default()
    };
    let identity_template = FormatTemplate {
        fourcc: *b"SWZL",
        origin: Origin::UpperLeft,
        planes: vec![identity_plane],
        y_block: Some(y_block),
        ..Default::default()
    };

    let (w, h) = (8u32, 4u32);
    let swizzled = create_format(w, h, &swizzled_template, ConversionMatrix::bt601_full(), ChromaSiting::full()).unwrap();
    let identity = create_format(w, h, &identity_template, ConversionMatrix::bt601_full(), ChromaSiting::full()).unwrap();

    let mut image = YuvImage::new(w, h, ChromaSiting::full(), true, false, false, false);
    for y in 0..h {
        for x in 0..w {
            let i = y * w + x;
            *image.y_plane.at_mut(x, y) = i as f32 / 255.0;
        }
    }

    let encoded = encode_frame(&image, swizzled).unwrap();
    let decoded = decode_frame(&encoded).unwrap();
    for y in 0..h {
        for x in 0..w {
            assert!((decoded.y_plane.at(x, y) - image.y_plane.at(x, y)).abs() < 1.0 / 255.0);
        }
    }

    let relinearized = encode_frame(&decoded, identity).unwrap();
    let expected: Vec<u8> = (0..(w * h) as u32).map(|i| i as u8).collect();
    assert_eq!(relinearized.data, expected);
}

/// Scenario D — expression evaluator builtins and error behavior.
#[test]
fn scenario_d_expression_evaluator() {
    let mut env = Environment::new();
    env.bind("image_w", 50i64);
    let expr = Expr::parse("next_multiple(image_w, 16)").unwrap();
    assert_eq!(evaluate(&expr, &env).unwrap().as_int(), Some(64));

    let mut env2 = Environment::new();
    env2.bind("subsampling_mode.macro_px_w", 2i64);
    env2.bind("image_w", 8i64);
    let expr2 = Expr::parse("if(subsampling_mode.macro_px_w == 2, image_w / 2, image_w)").unwrap();
    assert_eq!(evaluate(&expr2, &env2).unwrap().as_int(), Some(4));

    let expr3 = Expr::parse("gcd(9, 15)").unwrap();
    assert_eq!(evaluate(&expr3, &Environment::new()).unwrap().as_int(), Some(3));

    let expr4 = Expr::parse("1 / 0").unwrap();
    assert!(evaluate(&expr4, &Environment::new()).is_err());

    let _ = Value::Int(0);
}

/// Scenario E — 4:2:0 chroma survives an up-sample/down-sample round trip
/// bit-exactly: nearest-replicate up-sampling makes every pixel within a
/// macro block identical, so any siting-weighted average computed over
/// that (now uniform) macro block recovers the original value exactly,
/// regardless of how the per-block chroma varies from block to block.
#[test]
fn scenario_e_chroma_siting_round_trip() {
    let w = 24u32;
    let h = 24u32;
    let siting = ChromaSiting::jpeg_420();
    let mut image = YuvImage::new(w, h, siting, true, true, true, false);
    let (cw, ch) = siting.subsampling.chroma_dim(w, h);
    for cy in 0..ch {
        for cx in 0..cw {
            let pseudo_random = ((cx * 7 + cy * 13 + 1) % 16) as f32 / 15.0;
            *image.u_plane.at_mut(cx, cy) = pseudo_random;
            *image.v_plane.at_mut(cx, cy) = 1.0 - pseudo_random;
        }
    }

    let full = up_sample(&image);
    let back = down_sample(&full, siting);

    for cy in 0..ch {
        for cx in 0..cw {
            assert_eq!(*back.u_plane.at(cx, cy), *image.u_plane.at(cx, cy));
            assert_eq!(*back.v_plane.at(cx, cy), *image.v_plane.at(cx, cy));
        }
    }
}

/// Scenario F — four frames of the same format written sequentially and
/// read back, matching formats and payloads.
#[test]
fn scenario_f_container_round_trips_multiple_frames() {
    let template = y8_template(InterleaveMode::None);
    let format = create_format(2, 2, &template, ConversionMatrix::bt601_full(), ChromaSiting::full()).unwrap();

    let mut image = YuvImage::new(2, 2, ChromaSiting::full(), true, false, false, false);
    *image.y_plane.at_mut(0, 0) = 0.0;
    *image.y_plane.at_mut(1, 0) = 1.0 / 3.0;
    *image.y_plane.at_mut(0, 1) = 2.0 / 3.0;
    *image.y_plane.at_mut(1, 1) = 1.0;

    let mut stream = Vec::new();
    for _ in 0..4 {
        let frame = encode_frame(&image, format.clone()).unwrap();
        write_frame(&mut stream, &frame).unwrap();
    }

    let mut cursor = std::io::Cursor::new(stream);
    let mut frames = Vec::new();
    while let Some(frame) = read_frame(&mut cursor).unwrap() {
        frames.push(frame);
    }
    assert_eq!(frames.len(), 4);
    let expected = encode_frame(&image, format).unwrap();
    for frame in &frames {
        assert_eq!(frame.format, expected.format);
        assert_eq!(frame.data, expected.data);
    }
}
