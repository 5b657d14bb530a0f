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

//! A symbolic, dimension-independent description of a pixel layout. An
//! [`FormatTemplate`] is inflated into a concrete [`Format`] by binding
//! `image_w`/`image_h`/the chroma siting and evaluating every field's
//! expression in dependency order.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::block_order::BlockOrder;
use crate::error::{DependencyError, Error, TypeError};
use crate::expr::{Environment, Expr};
use crate::format::{Format, Origin};
use crate::matrix::ConversionMatrix;
use crate::plane::{InterleaveMode, Plane};
use crate::sample::{ChannelBlock, Sample};
use crate::subsampling::ChromaSiting;

/// One sample's symbolic layout. `plane` and `has_continuation` are fixed
/// at template-authoring time; the bit geometry may depend on the image
/// dimensions (and, inside an auto-generated block, on `block_x`/`block_y`).
#[derive(Debug, Clone)]
pub struct SampleTemplate {
    pub plane: u8,
    pub offset: Expr,
    pub integer_bits: Expr,
    pub fractional_bits: Expr,
    pub has_continuation: bool,
}

/// A channel's block geometry and its sample layout. When `auto_generate`
/// is set, `samples` is the per-pixel pattern evaluated once for every
/// `(block_x, block_y)` in `[0, block_w) x [0, block_h)` (row-major) with
/// those two names bound; otherwise `samples` is the literal, final sample
/// list, evaluated once against the plane-level environment.
#[derive(Debug, Clone)]
pub struct ChannelBlockTemplate {
    pub block_w: u16,
    pub block_h: u16,
    pub auto_generate: bool,
    pub samples: Vec<SampleTemplate>,
}

/// A plane's symbolic geometry.
#[derive(Debug, Clone)]
pub struct PlaneTemplate {
    pub base_offset: Expr,
    pub line_stride: Expr,
    pub plane_size: Expr,
    pub block_stride: Expr,
    pub interleave_mode: InterleaveMode,
    pub block_order: BlockOrder,
}

/// The full symbolic format. Exactly one of `{y,u,v}_block` or `{r,g,b}_block`
/// may be populated (RGB channels fill the Y/U/V slots positionally);
/// `a_block` is independent of that choice.
#[derive(Debug, Clone, Default)]
pub struct FormatTemplate {
    pub fourcc: [u8; 4],
    pub origin: Origin,
    pub planes: Vec<PlaneTemplate>,
    pub y_block: Option<ChannelBlockTemplate>,
    pub u_block: Option<ChannelBlockTemplate>,
    pub v_block: Option<ChannelBlockTemplate>,
    pub r_block: Option<ChannelBlockTemplate>,
    pub g_block: Option<ChannelBlockTemplate>,
    pub b_block: Option<ChannelBlockTemplate>,
    pub a_block: Option<ChannelBlockTemplate>,
}

impl Default for Origin {
    fn default() -> Self {
        Origin::UpperLeft
    }
}

fn plane_field(plane: usize, field: &str) -> String {
    format!("planes[{plane}].{field}")
}

fn channel_sample_field(slot: usize, sample: usize, field: &str) -> String {
    format!("channels[{slot}].samples[{sample}].{field}")
}

impl FormatTemplate {
    /// The four output-channel slots in `(slot_index, template)` order,
    /// with RGB templates substituted positionally into the Y/U/V slots
    /// when no native Y/U/V template is present.
    fn slot_templates(&self) -> Result<[Option<&ChannelBlockTemplate>; 4], Error> {
        let has_yuv = self.y_block.is_some() || self.u_block.is_some() || self.v_block.is_some();
        let has_rgb = self.r_block.is_some() || self.g_block.is_some() || self.b_block.is_some();
        if has_yuv && has_rgb {
            return Err(crate::error::FormatError::ConflictingChannelModel.into());
        }
        if has_rgb {
            Ok([
                self.r_block.as_ref(),
                self.g_block.as_ref(),
                self.b_block.as_ref(),
                self.a_block.as_ref(),
            ])
        } else {
            Ok([
                self.y_block.as_ref(),
                self.u_block.as_ref(),
                self.v_block.as_ref(),
                self.a_block.as_ref(),
            ])
        }
    }

    /// Binds `image_w`/`image_h`/the chroma siting, resolves every field's
    /// dependency graph, evaluates in topological order, and assembles the
    /// resulting [`Format`] (without yet validating it structurally — call
    /// [`Format::validate`] afterwards).
    pub fn inflate(
        &self,
        image_w: u32,
        image_h: u32,
        chroma_siting: ChromaSiting,
        conversion_matrix: ConversionMatrix,
    ) -> Result<Format, Error> {
        if image_w == 0 || image_h == 0 {
            return Err(crate::error::DomainError::ZeroDimensions {
                w: image_w,
                h: image_h,
            }
            .into());
        }
        log::debug!(
            "inflating format template {:?} for {image_w}x{image_h}",
            std::str::from_utf8(&self.fourcc).unwrap_or("????")
        );

        let slots = self.slot_templates()?;

        let mut base_env = Environment::new();
        base_env.bind("image_w", image_w as i64);
        base_env.bind("image_h", image_h as i64);
        base_env.bind("subsampling_mode.macro_px_w", chroma_siting.subsampling.macro_px_w as i64);
        base_env.bind("subsampling_mode.macro_px_h", chroma_siting.subsampling.macro_px_h as i64);
        for (i, plane) in self.planes.iter().enumerate() {
            base_env.bind(
                plane_field(i, "block_order.mega_block_w"),
                plane.block_order.mega_block_w as i64,
            );
            base_env.bind(
                plane_field(i, "block_order.mega_block_h"),
                plane.block_order.mega_block_h as i64,
            );
        }

        let mut fields: BTreeMap<String, Expr> = BTreeMap::new();
        for (i, plane) in self.planes.iter().enumerate() {
            fields.insert(plane_field(i, "base_offset"), plane.base_offset.clone());
            fields.insert(plane_field(i, "line_stride"), plane.line_stride.clone());
            fields.insert(plane_field(i, "plane_size"), plane.plane_size.clone());
            fields.insert(plane_field(i, "block_stride"), plane.block_stride.clone());
        }
        for (slot, block) in slots.iter().enumerate() {
            if let Some(block) = block {
                if !block.auto_generate {
                    for (i, s) in block.samples.iter().enumerate() {
                        fields.insert(channel_sample_field(slot, i, "offset"), s.offset.clone());
                        fields.insert(
                            channel_sample_field(slot, i, "integer_bits"),
                            s.integer_bits.clone(),
                        );
                        fields.insert(
                            channel_sample_field(slot, i, "fractional_bits"),
                            s.fractional_bits.clone(),
                        );
                    }
                }
            }
        }

        self.check_generated_sample_dependencies(&fields, &slots)?;
        self.check_mega_block_dependencies(&fields)?;

        let order = topo_sort(&fields)?;
        let mut env = base_env;
        for name in &order {
            let value = crate::expr::evaluate(&fields[name], &env)?;
            env.bind(name.clone(), value);
        }

        let mut planes = Vec::with_capacity(self.planes.len());
        for (i, plane) in self.planes.iter().enumerate() {
            planes.push(Plane {
                base_offset: as_u64(&env, &plane_field(i, "base_offset"))?,
                size: as_u64(&env, &plane_field(i, "plane_size"))?,
                line_stride: as_u32(&env, &plane_field(i, "line_stride"))?,
                block_stride: as_u32(&env, &plane_field(i, "block_stride"))?,
                interleave_mode: plane.interleave_mode,
                block_order: plane.block_order,
            });
        }

        let mut channel_blocks: [ChannelBlock; 4] = Default::default();
        for (slot, block_tpl) in slots.iter().enumerate() {
            channel_blocks[slot] = match block_tpl {
                None => ChannelBlock::default(),
                Some(block_tpl) => inflate_block(slot, block_tpl, &env)?,
            };
        }

        let size = planes
            .iter()
            .map(|p| p.base_offset + p.size)
            .max()
            .unwrap_or(0);

        Ok(Format {
            fourcc: self.fourcc,
            origin: self.origin,
            image_w,
            image_h,
            size,
            planes,
            channel_blocks,
            chroma_siting,
            conversion_matrix,
        })
    }

    fn check_generated_sample_dependencies(
        &self,
        fields: &BTreeMap<String, Expr>,
        slots: &[Option<&ChannelBlockTemplate>; 4],
    ) -> Result<(), Error> {
        let generated_prefixes: Vec<String> = slots
            .iter()
            .enumerate()
            .filter(|(_, b)| b.map(|b| b.auto_generate).unwrap_or(false))
            .map(|(slot, _)| format!("channels[{slot}].samples["))
            .collect();
        for (name, expr) in fields {
            for var in expr.free_vars() {
                if generated_prefixes.iter().any(|p| var.starts_with(p.as_str())) {
                    return Err(DependencyError::DependsOnGeneratedSample {
                        field: name.clone(),
                        sample_field: var,
                    }
                    .into());
                }
            }
        }
        Ok(())
    }

    fn check_mega_block_dependencies(&self, fields: &BTreeMap<String, Expr>) -> Result<(), Error> {
        for (i, plane) in self.planes.iter().enumerate() {
            if plane.block_order.mega_block_w > 1 {
                let target = plane_field(i, "block_order.mega_block_w");
                let field_name = plane_field(i, "line_stride");
                if !transitively_depends_on(fields, &field_name, &target) {
                    return Err(DependencyError::MissingMegaBlockWDependency {
                        plane: i,
                        field: "line_stride",
                    }
                    .into());
                }
            }
            if plane.block_order.mega_block_h > 1 {
                let target = plane_field(i, "block_order.mega_block_h");
                let field_name = plane_field(i, "plane_size");
                if !transitively_depends_on(fields, &field_name, &target) {
                    return Err(DependencyError::MissingMegaBlockHDependency {
                        plane: i,
                        field: "plane_size",
                    }
                    .into());
                }
            }
        }
        Ok(())
    }
}

fn transitively_depends_on(fields: &BTreeMap<String, Expr>, field: &str, target: &str) -> bool {
    fn walk(fields: &BTreeMap<String, Expr>, field: &str, target: &str, seen: &mut BTreeSet<String>) -> bool {
        if !seen.insert(field.to_string()) {
            return false;
        }
        let expr = match fields.get(field) {
            Some(e) => e,
            None => return false,
        };
        for var in expr.free_vars() {
            if var == target {
                return true;
            }
            if fields.contains_key(&var) && walk(fields, &var, target, seen) {
                return true;
            }
        }
        false
    }
    walk(fields, field, target, &mut BTreeSet::new())
}

fn topo_sort(fields: &BTreeMap<String, Expr>) -> Result<Vec<String>, Error> {
    let mut in_degree: BTreeMap<String, usize> = fields.keys().map(|k| (k.clone(), 0)).collect();
    let mut dependents: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (name, expr) in fields {
        for dep in expr.free_vars() {
            if fields.contains_key(&dep) {
                *in_degree.get_mut(name).unwrap() += 1;
                dependents.entry(dep).or_default().push(name.clone());
            }
        }
    }

    let mut queue: VecDeque<String> = in_degree
        .iter()
        .filter(|(_, &d)| d == 0)
        .map(|(k, _)| k.clone())
        .collect();
    let mut order = Vec::with_capacity(fields.len());
    while let Some(name) = queue.pop_front() {
        order.push(name.clone());
        if let Some(deps) = dependents.get(&name) {
            for dep in deps {
                let entry = in_degree.get_mut(dep).unwrap();
                *entry -= 1;
                if *entry == 0 {
                    queue.push_back(dep.clone());
                }
            }
        }
    }

    if order.len() != fields.len() {
        let remaining: Vec<String> = fields
            .keys()
            .filter(|k| !order.contains(k))
            .cloned()
            .collect();
        return Err(DependencyError::Cycle(remaining).into());
    }
    Ok(order)
}

fn as_u64(env: &Environment, name: &str) -> Result<u64, Error> {
    let v = env
        .get(name)
        .unwrap_or_else(|| panic!("field '{name}' was not solved"));
    v.as_int()
        .map(|i| i as u64)
        .ok_or_else(|| TypeError::FieldType {
            field: name.to_string(),
            expected: "int",
            found: v.type_name(),
        }
        .into())
}

fn as_u32(env: &Environment, name: &str) -> Result<u32, Error> {
    as_u64(env, name).map(|v| v as u32)
}

fn inflate_block(
    slot: usize,
    block_tpl: &ChannelBlockTemplate,
    env: &Environment,
) -> Result<ChannelBlock, Error> {
    if block_tpl.block_w == 0 || block_tpl.block_h == 0 {
        return Ok(ChannelBlock::default());
    }

    let samples = if block_tpl.auto_generate {
        let mut bases = Vec::with_capacity(block_tpl.block_w as usize * block_tpl.block_h as usize);
        let mut tails = Vec::new();
        for by in 0..block_tpl.block_h as i64 {
            for bx in 0..block_tpl.block_w as i64 {
                let mut pixel_env = env.clone();
                pixel_env.bind("block_x", bx);
                pixel_env.bind("block_y", by);

                let mut pattern = Vec::with_capacity(block_tpl.samples.len());
                for s in &block_tpl.samples {
                    let integer_bits = as_u8(&crate::expr::evaluate(&s.integer_bits, &pixel_env)?)?;
                    let fractional_bits = as_u8(&crate::expr::evaluate(&s.fractional_bits, &pixel_env)?)?;
                    if integer_bits == 0 && fractional_bits == 0 {
                        continue;
                    }
                    let offset = as_u32_value(&crate::expr::evaluate(&s.offset, &pixel_env)?)?;
                    pattern.push(Sample {
                        plane: s.plane,
                        offset,
                        integer_bits,
                        fractional_bits,
                        has_continuation: s.has_continuation,
                    });
                }
                let mut iter = pattern.into_iter();
                if let Some(base) = iter.next() {
                    bases.push(base);
                }
                tails.extend(iter);
            }
        }
        bases.extend(tails);
        bases
    } else {
        block_tpl
            .samples
            .iter()
            .enumerate()
            .map(|(i, s)| {
                let name_offset = channel_sample_field(slot, i, "offset");
                let name_int = channel_sample_field(slot, i, "integer_bits");
                let name_frac = channel_sample_field(slot, i, "fractional_bits");
                Ok(Sample {
                    plane: s.plane,
                    offset: as_u32(env, &name_offset)?,
                    integer_bits: as_u32(env, &name_int)? as u8,
                    fractional_bits: as_u32(env, &name_frac)? as u8,
                    has_continuation: s.has_continuation,
                })
            })
            .collect::<Result<Vec<_>, Error>>()?
    };

    Ok(ChannelBlock {
        block_w: block_tpl.block_w,
        block_h: block_tpl.block_h,
        samples,
    })
}

fn as_u8(value: &crate::expr::Value) -> Result<u8, Error> {
    value.as_int().map(|v| v as u8).ok_or_else(|| {
        TypeError::FieldType {
            field: "sample bit width".to_string(),
            expected: "int",
            found: value.type_name(),
        }
        .into()
    })
}

fn as_u32_value(value: &crate::expr::Value) -> Result<u32, Error> {
    value.as_int().map(|v| v as u32).ok_or_else(|| {
        TypeError::FieldType {
            field: "sample offset".to_string(),
            expected: "int",
            found: value.type_name(),
        }
        .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block_order::BlockOrder;

    fn packed_8bit_template(w: u32, h: u32) -> (FormatTemplate, u32, u32) {
        let plane = PlaneTemplate {
            base_offset: Expr::int(0),
            line_stride: Expr::var("image_w"),
            plane_size: Expr::parse("image_w * image_h").unwrap(),
            block_stride: Expr::int(8),
            interleave_mode: InterleaveMode::None,
            block_order: BlockOrder::IDENTITY,
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
        (
            FormatTemplate {
                fourcc: *b"Y8__",
                origin: Origin::UpperLeft,
                planes: vec![plane],
                y_block: Some(y_block),
                ..Default::default()
            },
            w,
            h,
        )
    }

    #[test]
    fn inflates_simple_planar_y8() {
        let (template, w, h) = packed_8bit_template(16, 8);
        let format = template
            .inflate(w, h, ChromaSiting::full(), ConversionMatrix::bt601_full())
            .unwrap();
        assert_eq!(format.planes.len(), 1);
        assert_eq!(format.planes[0].size, 128);
        assert_eq!(format.planes[0].line_stride, 16);
        assert_eq!(format.channel_blocks[0].samples.len(), 1);
        format.validate().unwrap();
    }

    #[test]
    fn rejects_dependency_cycle() {
        let plane = PlaneTemplate {
            base_offset: Expr::var("planes[0].plane_size"),
            line_stride: Expr::int(4),
            plane_size: Expr::var("planes[0].base_offset"),
            block_stride: Expr::int(8),
            interleave_mode: InterleaveMode::None,
            block_order: BlockOrder::IDENTITY,
        };
        let template = FormatTemplate {
            fourcc: *b"BAD_",
            origin: Origin::UpperLeft,
            planes: vec![plane],
            ..Default::default()
        };
        let err = template
            .inflate(4, 4, ChromaSiting::full(), ConversionMatrix::bt601_full())
            .unwrap_err();
        assert!(matches!(err, Error::Dependency(DependencyError::Cycle(_))));
    }

    #[test]
    fn rejects_mega_block_without_dependency() {
        let block_order = BlockOrder {
            mega_block_w: 2,
            mega_block_h: 2,
            x_mask: crate::block_order::BlockOrder::IDENTITY.x_mask,
            y_mask: crate::block_order::BlockOrder::IDENTITY.y_mask,
        };
        let plane = PlaneTemplate {
            base_offset: Expr::int(0),
            line_stride: Expr::var("image_w"),
            plane_size: Expr::parse("image_w * image_h").unwrap(),
            block_stride: Expr::int(8),
            interleave_mode: InterleaveMode::None,
            block_order,
        };
        let template = FormatTemplate {
            fourcc: *b"BAD2",
            origin: Origin::UpperLeft,
            planes: vec![plane],
            ..Default::default()
        };
        let err = template
            .inflate(8, 8, ChromaSiting::full(), ConversionMatrix::bt601_full())
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Dependency(DependencyError::MissingMegaBlockWDependency { .. })
        ));
    }
}
