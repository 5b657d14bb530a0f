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

//! Error kinds for every fallible stage of the pipeline: parsing and evaluating
//! expressions, inflating templates, reordering blocks, validating formats, and
//! performing container I/O.

/// Expression syntax is invalid.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ParseError {
    #[error("unexpected character '{0}' at byte offset {1}")]
    UnexpectedChar(char, usize),
    #[error("unexpected end of expression")]
    UnexpectedEof,
    #[error("expected {expected}, found '{found}'")]
    Expected { expected: &'static str, found: String },
    #[error("'{0}' is not a recognized builtin function")]
    UnknownFunction(String),
    #[error("chained comparisons are not allowed")]
    ChainedComparison,
}

/// Expression or template field types do not match.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TypeError {
    #[error("operator '{op}' expects {expected}, found {found}")]
    OperatorMismatch {
        op: &'static str,
        expected: &'static str,
        found: &'static str,
    },
    #[error("branches of 'if' have different types: {then_ty} vs {else_ty}")]
    IfBranchMismatch {
        then_ty: &'static str,
        else_ty: &'static str,
    },
    #[error("function '{name}' expects {expected} arguments, found {found}")]
    Arity {
        name: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("field '{field}' must evaluate to {expected}, found {found}")]
    FieldType {
        field: String,
        expected: &'static str,
        found: &'static str,
    },
}

/// A domain violation or unbound reference encountered while evaluating.
#[derive(Debug, Clone, thiserror::Error)]
pub enum EvalError {
    #[error("unbound variable '{0}'")]
    UnboundVariable(String),
    #[error("division by zero")]
    DivideByZero,
    #[error("modulo by zero")]
    ModuloByZero,
    #[error("negative exponent {0} in '**'")]
    NegativeExponent(i64),
    #[error("gcd/lcm require positive arguments, found ({0}, {1})")]
    NonPositiveGcdLcm(i64, i64),
    #[error("next_multiple requires a positive multiplier, found {0}")]
    NonPositiveMultiplier(i64),
}

/// The template field dependency graph is unsound.
#[derive(Debug, Clone, thiserror::Error)]
pub enum DependencyError {
    #[error("dependency cycle detected among fields: {0:?}")]
    Cycle(Vec<String>),
    #[error("field '{field}' depends on generated sample field '{sample_field}'")]
    DependsOnGeneratedSample { field: String, sample_field: String },
    #[error(
        "plane {plane} has mega_block_w > 1 but '{field}' does not depend on mega_block_w"
    )]
    MissingMegaBlockWDependency { plane: usize, field: &'static str },
    #[error(
        "plane {plane} has mega_block_h > 1 but '{field}' does not depend on mega_block_h"
    )]
    MissingMegaBlockHDependency { plane: usize, field: &'static str },
}

/// An instantiated `Format` violates one of the data-model invariants.
#[derive(Debug, Clone, thiserror::Error)]
pub enum FormatError {
    #[error("samples {a} and {b} overlap in plane {plane} at bit {bit}")]
    OverlappingSamples { plane: usize, a: usize, b: usize, bit: u32 },
    #[error("sample in plane {plane} at offset {offset} with width {width} exceeds block_stride {block_stride}")]
    BlockOverflow {
        plane: usize,
        offset: u32,
        width: u32,
        block_stride: u32,
    },
    #[error("channel {channel} overflows plane {plane}'s line: {needed} bits needed, {available} available")]
    LineOverflow {
        channel: &'static str,
        plane: usize,
        needed: u64,
        available: u64,
    },
    #[error("plane {plane} overflows: {needed} bytes needed, {available} available")]
    PlaneOverflow {
        plane: usize,
        needed: u64,
        available: u64,
    },
    #[error("swizzled plane {a} illegally overlaps plane {b}")]
    IllegalPlaneOverlap { a: usize, b: usize },
    #[error("both RGB and YUV channel blocks were specified in one template")]
    ConflictingChannelModel,
}

/// Container read/write failed.
#[derive(Debug, Clone, thiserror::Error)]
pub enum IoError {
    #[error("unexpected end of stream, {needed} bytes required, {got} available")]
    UnexpectedEof { needed: usize, got: usize },
    #[error("unrecognized magic bytes {0:?}")]
    BadMagic([u8; 8]),
    #[error("unsupported container version {0}")]
    UnsupportedVersion(u16),
    #[error("underlying I/O failure: {0}")]
    Io(String),
}

/// Caller-supplied dimensions or parameters conflict with the format/siting.
#[derive(Debug, Clone, thiserror::Error)]
pub enum DomainError {
    #[error("image dimensions must be non-zero, found {w}x{h}")]
    ZeroDimensions { w: u32, h: u32 },
    #[error("macro pixel dimensions must be in [1,255], found {w}x{h}")]
    InvalidSubsampling { w: u32, h: u32 },
    #[error("surface length {len} does not match width*height = {expected}")]
    SurfaceLengthMismatch { len: usize, expected: usize },
}

/// Top-level error type unifying every fallible stage.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Type(#[from] TypeError),
    #[error(transparent)]
    Eval(#[from] EvalError),
    #[error(transparent)]
    Dependency(#[from] DependencyError),
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error(transparent)]
    Io(#[from] IoError),
    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(IoError::Io(e.to_string()))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
