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

//! The expression AST: a typed sum-of-variants tree over `Int`/`Bool`/`Str`
//! literals, variables, binary/unary operators, and a fixed builtin set.

use std::collections::BTreeSet;

use super::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}

impl BinOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Mod => "%",
            BinOp::Pow => "**",
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
            BinOp::Lt => "<",
            BinOp::Le => "<=",
            BinOp::Gt => ">",
            BinOp::Ge => ">=",
            BinOp::And => "&&",
            BinOp::Or => "||",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    Neg,
    Not,
}

impl UnOp {
    pub fn symbol(self) -> &'static str {
        match self {
            UnOp::Neg => "-",
            UnOp::Not => "!",
        }
    }
}

/// A builtin function call. `If` carries its branches as plain args because
/// it is type-polymorphic and evaluated with the same short-circuit-free
/// pass as everything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Abs,
    Gcd,
    Lcm,
    NextMultiple,
    CastInt,
    CastBool,
    CastStr,
    If,
}

impl Builtin {
    pub fn name(self) -> &'static str {
        match self {
            Builtin::Abs => "abs",
            Builtin::Gcd => "gcd",
            Builtin::Lcm => "lcm",
            Builtin::NextMultiple => "next_multiple",
            Builtin::CastInt => "int",
            Builtin::CastBool => "bool",
            Builtin::CastStr => "str",
            Builtin::If => "if",
        }
    }

    pub fn arity(self) -> usize {
        match self {
            Builtin::Abs | Builtin::CastInt | Builtin::CastBool | Builtin::CastStr => 1,
            Builtin::Gcd | Builtin::Lcm | Builtin::NextMultiple => 2,
            Builtin::If => 3,
        }
    }

    pub fn from_name(name: &str) -> Option<Builtin> {
        Some(match name {
            "abs" => Builtin::Abs,
            "gcd" => Builtin::Gcd,
            "lcm" => Builtin::Lcm,
            "next_multiple" => Builtin::NextMultiple,
            "int" => Builtin::CastInt,
            "bool" => Builtin::CastBool,
            "str" => Builtin::CastStr,
            "if" => Builtin::If,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Lit(Value),
    Var(String),
    BinOp(BinOp, Box<Expr>, Box<Expr>),
    UnOp(UnOp, Box<Expr>),
    Call(Builtin, Vec<Expr>),
}

impl Expr {
    pub fn int(v: i64) -> Expr {
        Expr::Lit(Value::Int(v))
    }

    pub fn boolean(v: bool) -> Expr {
        Expr::Lit(Value::Bool(v))
    }

    pub fn string(v: impl Into<String>) -> Expr {
        Expr::Lit(Value::Str(v.into()))
    }

    pub fn var(name: impl Into<String>) -> Expr {
        Expr::Var(name.into())
    }

    /// Collects every identifier this expression references, for dependency
    /// ordering during template inflation.
    pub fn free_vars(&self) -> BTreeSet<String> {
        let mut set = BTreeSet::new();
        self.collect_free_vars(&mut set);
        set
    }

    fn collect_free_vars(&self, out: &mut BTreeSet<String>) {
        match self {
            Expr::Lit(_) => {}
            Expr::Var(name) => {
                out.insert(name.clone());
            }
            Expr::BinOp(_, lhs, rhs) => {
                lhs.collect_free_vars(out);
                rhs.collect_free_vars(out);
            }
            Expr::UnOp(_, arg) => arg.collect_free_vars(out),
            Expr::Call(_, args) => {
                for a in args {
                    a.collect_free_vars(out);
                }
            }
        }
    }

    /// True when the expression contains no free variables, i.e. its value
    /// is determined irrespective of the evaluation environment.
    pub fn is_const(&self) -> bool {
        self.free_vars().is_empty()
    }
}
