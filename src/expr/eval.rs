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

use std::collections::BTreeMap;

use crate::error::{Error, EvalError, TypeError};

use super::ast::{BinOp, Builtin, Expr, UnOp};
use super::value::Value;

/// Maps identifiers to bound values for one evaluation pass.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    vars: BTreeMap<String, Value>,
}

impl Environment {
    pub fn new() -> Self {
        Environment::default()
    }

    pub fn bind(&mut self, name: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.vars.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.vars.get(name)
    }
}

pub fn evaluate(expr: &Expr, env: &Environment) -> Result<Value, Error> {
    match expr {
        Expr::Lit(v) => Ok(v.clone()),
        Expr::Var(name) => env
            .get(name)
            .cloned()
            .ok_or_else(|| EvalError::UnboundVariable(name.clone()).into()),
        Expr::UnOp(op, arg) => eval_unop(*op, evaluate(arg, env)?),
        Expr::BinOp(op, lhs, rhs) => eval_binop(*op, evaluate(lhs, env)?, evaluate(rhs, env)?),
        Expr::Call(builtin, args) => eval_call(*builtin, args, env),
    }
}

fn expect_int(op: &'static str, v: Value) -> Result<i64, Error> {
    v.as_int().ok_or_else(|| {
        TypeError::OperatorMismatch {
            op,
            expected: "int",
            found: v.type_name(),
        }
        .into()
    })
}

fn expect_bool(op: &'static str, v: Value) -> Result<bool, Error> {
    v.as_bool().ok_or_else(|| {
        TypeError::OperatorMismatch {
            op,
            expected: "bool",
            found: v.type_name(),
        }
        .into()
    })
}

fn eval_unop(op: UnOp, arg: Value) -> Result<Value, Error> {
    match op {
        UnOp::Neg => Ok(Value::Int(-expect_int(op.symbol(), arg)?)),
        UnOp::Not => Ok(Value::Bool(!expect_bool(op.symbol(), arg)?)),
    }
}

fn eval_binop(op: BinOp, lhs: Value, rhs: Value) -> Result<Value, Error> {
    use BinOp::*;
    match op {
        Add | Sub | Mul | Div | Mod | Pow => {
            let a = expect_int(op.symbol(), lhs)?;
            let b = expect_int(op.symbol(), rhs)?;
            Ok(Value::Int(eval_int_binop(op, a, b)?))
        }
        Lt | Le | Gt | Ge => {
            let a = expect_int(op.symbol(), lhs)?;
            let b = expect_int(op.symbol(), rhs)?;
            Ok(Value::Bool(match op {
                Lt => a < b,
                Le => a <= b,
                Gt => a > b,
                Ge => a >= b,
                _ => unreachable!(),
            }))
        }
        Eq | Ne => {
            let equal = match (&lhs, &rhs) {
                (Value::Int(a), Value::Int(b)) => a == b,
                (Value::Bool(a), Value::Bool(b)) => a == b,
                (Value::Str(a), Value::Str(b)) => a == b,
                _ => {
                    return Err(TypeError::OperatorMismatch {
                        op: op.symbol(),
                        expected: "two operands of the same comparable type",
                        found: "mismatched types",
                    }
                    .into())
                }
            };
            Ok(Value::Bool(if op == Eq { equal } else { !equal }))
        }
        And => Ok(Value::Bool(
            expect_bool(op.symbol(), lhs)? && expect_bool(op.symbol(), rhs)?,
        )),
        Or => Ok(Value::Bool(
            expect_bool(op.symbol(), lhs)? || expect_bool(op.symbol(), rhs)?,
        )),
    }
}

fn eval_int_binop(op: BinOp, a: i64, b: i64) -> Result<i64, Error> {
    Ok(match op {
        BinOp::Add => a + b,
        BinOp::Sub => a - b,
        BinOp::Mul => a * b,
        BinOp::Div => {
            if b == 0 {
                return Err(EvalError::DivideByZero.into());
            }
            a / b
        }
        BinOp::Mod => {
            if b == 0 {
                return Err(EvalError::ModuloByZero.into());
            }
            a % b
        }
        BinOp::Pow => {
            if b < 0 {
                return Err(EvalError::NegativeExponent(b).into());
            }
            a.pow(b as u32)
        }
        _ => unreachable!(),
    })
}

fn eval_call(builtin: Builtin, args: &[Expr], env: &Environment) -> Result<Value, Error> {
    if args.len() != builtin.arity() {
        return Err(TypeError::Arity {
            name: builtin.name(),
            expected: builtin.arity(),
            found: args.len(),
        }
        .into());
    }

    if builtin == Builtin::If {
        let cond = expect_bool("if", evaluate(&args[0], env)?)?;
        let then_val = evaluate(&args[1], env)?;
        let else_val = evaluate(&args[2], env)?;
        if then_val.type_name() != else_val.type_name() {
            return Err(TypeError::IfBranchMismatch {
                then_ty: then_val.type_name(),
                else_ty: else_val.type_name(),
            }
            .into());
        }
        return Ok(if cond { then_val } else { else_val });
    }

    let values: Vec<Value> = args
        .iter()
        .map(|a| evaluate(a, env))
        .collect::<Result<_, _>>()?;

    match builtin {
        Builtin::Abs => Ok(Value::Int(expect_int("abs", values[0].clone())?.abs())),
        Builtin::Gcd => {
            let a = expect_int("gcd", values[0].clone())?;
            let b = expect_int("gcd", values[1].clone())?;
            if a <= 0 || b <= 0 {
                return Err(EvalError::NonPositiveGcdLcm(a, b).into());
            }
            Ok(Value::Int(gcd(a, b)))
        }
        Builtin::Lcm => {
            let a = expect_int("lcm", values[0].clone())?;
            let b = expect_int("lcm", values[1].clone())?;
            if a <= 0 || b <= 0 {
                return Err(EvalError::NonPositiveGcdLcm(a, b).into());
            }
            Ok(Value::Int(a / gcd(a, b) * b))
        }
        Builtin::NextMultiple => {
            let base = expect_int("next_multiple", values[0].clone())?;
            let multiplier = expect_int("next_multiple", values[1].clone())?;
            if multiplier <= 0 {
                return Err(EvalError::NonPositiveMultiplier(multiplier).into());
            }
            let quotient_ceil = (base + (multiplier - 1)) / multiplier;
            Ok(Value::Int(quotient_ceil * multiplier))
        }
        Builtin::CastInt => Ok(Value::Int(match &values[0] {
            Value::Int(v) => *v,
            Value::Bool(v) => *v as i64,
            Value::Str(v) => v.parse().map_err(|_| TypeError::OperatorMismatch {
                op: "int",
                expected: "a numeric string",
                found: "string",
            })?,
        })),
        Builtin::CastBool => Ok(Value::Bool(match &values[0] {
            Value::Bool(v) => *v,
            Value::Int(v) => *v != 0,
            Value::Str(v) => !v.is_empty(),
        })),
        Builtin::CastStr => Ok(Value::Str(values[0].to_string())),
        Builtin::If => unreachable!("handled above"),
    }
}

/// Euclidean GCD; only the resulting value matters here, not the bit-twiddling
/// tricks a binary-GCD implementation would use.
fn gcd(a: i64, b: i64) -> i64 {
    let (mut a, mut b) = (a, b);
    while b != 0 {
        let t = b;
        b = a % b;
        a = t;
    }
    a
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::ast::Expr;

    #[test]
    fn next_multiple_rounds_up() {
        let mut env = Environment::new();
        env.bind("image_w", 50i64);
        let expr = Expr::parse("next_multiple(image_w, 16)").unwrap();
        assert_eq!(evaluate(&expr, &env).unwrap(), Value::Int(64));
    }

    #[test]
    fn if_selects_branch_by_condition() {
        let mut env = Environment::new();
        env.bind("subsampling_mode.macro_px_w", 2i64);
        env.bind("image_w", 8i64);
        let expr = Expr::parse(
            "if(subsampling_mode.macro_px_w == 2, image_w/2, image_w)",
        )
        .unwrap();
        assert_eq!(evaluate(&expr, &env).unwrap(), Value::Int(4));
    }

    #[test]
    fn gcd_builtin() {
        let expr = Expr::parse("gcd(9,15)").unwrap();
        assert_eq!(evaluate(&expr, &Environment::new()).unwrap(), Value::Int(3));
    }

    #[test]
    fn division_by_zero_is_eval_error() {
        let expr = Expr::parse("1 / 0").unwrap();
        let err = evaluate(&expr, &Environment::new()).unwrap_err();
        assert!(matches!(err, Error::Eval(EvalError::DivideByZero)));
    }

    #[test]
    fn unbound_variable_fails() {
        let expr = Expr::var("nope");
        let err = evaluate(&expr, &Environment::new()).unwrap_err();
        assert!(matches!(err, Error::Eval(EvalError::UnboundVariable(_))));
    }

    #[test]
    fn const_expressions_are_detected() {
        assert!(Expr::parse("1 + 2 * 3").unwrap().is_const());
        assert!(!Expr::parse("image_w + 1").unwrap().is_const());
    }

    #[test]
    fn pow_is_right_associative() {
        let expr = Expr::parse("2 ** 3 ** 2").unwrap();
        assert_eq!(evaluate(&expr, &Environment::new()).unwrap(), Value::Int(512));
    }

    #[test]
    fn chained_comparison_is_a_parse_error() {
        assert!(Expr::parse("1 < 2 < 3").is_err());
    }
}
