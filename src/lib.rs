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

//! Describe, encode and decode arbitrary raw YUV/RGB pixel buffer layouts.
//!
//! A [`template::FormatTemplate`] is a symbolic, dimension-independent pixel
//! layout; [`create_format`] inflates it against concrete image dimensions
//! into a [`format::Format`]. [`encode_frame`]/[`decode_frame`] round-trip
//! between a canonical [`yuv_image::YuvImage`] and a packed [`format::Frame`];
//! [`container::write_frame`]/[`container::read_frame`] persist frames to a
//! byte stream.

mod bits;
mod block_order;
mod codec;
mod container;
mod error;
mod expr;
mod format;
mod geometry;
mod matrix;
mod packer;
mod plane;
mod reorder;
mod rgb;
mod sample;
mod subsample;
mod subsampling;
mod template;
mod yuv_image;

pub use block_order::{BlockOrder, NOT_USED};
pub use error::{DependencyError, DomainError, Error, EvalError, FormatError, IoError, ParseError, Result, TypeError};
pub use expr::{evaluate, BinOp, Builtin, Environment, Expr, UnOp, Value};
pub use format::{Format, Frame, Origin};
pub use geometry::{PixelQuantum, Surface};
pub use matrix::{ConversionMatrix, Range};
pub use plane::{InterleaveMode, Plane};
pub use sample::{Channel, ChannelBlock, Sample};
pub use subsampling::{ChromaSiting, Subsampling};
pub use template::{ChannelBlockTemplate, FormatTemplate, PlaneTemplate, SampleTemplate};
pub use yuv_image::YuvImage;

pub use codec::{convert_frame, create_format, create_frame, decode_frame, encode_frame};
pub use container::{read_frame, write_frame};
pub use rgb::{from_yuv_image, rgb_to_yuv_pixel, to_yuv_image, yuv_to_rgb_pixel, RgbImage};
pub use subsample::{down_sample, scale_yuv_image, up_sample};
