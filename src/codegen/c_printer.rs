//! Prints [`Expr`] trees as C99 expressions.
//!
//! Operands are wrapped in parentheses only when the C precedence rules would
//! otherwise change the tree. Negative coefficients inside sums are printed as
//! subtraction (`a - 3*x` rather than `a + -3*x`). Constants that are operands
//! of a division are printed as floating literals so that no integer division
//! is ever emitted.

use crate::codegen::CodegenError;
use crate::symbolic::symbolic_engine::Expr;
use std::f64::consts::FRAC_PI_2;

// precedence levels, higher binds tighter
const ADD: u8 = 1;
const MUL: u8 = 2;
const UNARY: u8 = 3;
const ATOM: u8 = 4;

/// C99 source of `expr`.
pub fn ccode(expr: &Expr) -> Result<String, CodegenError> {
    Ok(print(expr)?.0)
}

/// Printed text together with the precedence level of its outermost operator.
fn print(expr: &Expr) -> Result<(String, u8), CodegenError> {
    let printed = match expr {
        Expr::Var(name) => (name.clone(), ATOM),
        Expr::Const(val) => {
            let text = number(*val, false)?;
            let level = if text.starts_with('-') { UNARY } else { ATOM };
            (text, level)
        }
        Expr::Add(lhs, rhs) => match negated(rhs) {
            Some(positive) => (
                format!("{} - {}", operand(lhs, ADD)?, operand(&positive, MUL)?),
                ADD,
            ),
            None => (format!("{} + {}", operand(lhs, ADD)?, operand(rhs, MUL)?), ADD),
        },
        Expr::Sub(lhs, rhs) => match negated(rhs) {
            Some(positive) => (
                format!("{} + {}", operand(lhs, ADD)?, operand(&positive, MUL)?),
                ADD,
            ),
            None => (format!("{} - {}", operand(lhs, ADD)?, operand(rhs, MUL)?), ADD),
        },
        Expr::Mul(lhs, rhs) => match lhs.as_ref() {
            Expr::Const(c) if *c == -1.0 => (negate(operand(rhs, MUL)?), UNARY),
            _ => (format!("{}*{}", operand(lhs, MUL)?, operand(rhs, ATOM)?), MUL),
        },
        Expr::Div(lhs, rhs) => (
            format!("{}/{}", div_operand(lhs, MUL)?, div_operand(rhs, ATOM)?),
            MUL,
        ),
        Expr::Pow(base, exp) => print_pow(base, exp)?,
        Expr::Exp(arg) => call("exp", arg)?,
        Expr::Ln(arg) => call("log", arg)?,
        Expr::Abs(arg) => call("fabs", arg)?,
        Expr::sin(arg) => call("sin", arg)?,
        Expr::cos(arg) => call("cos", arg)?,
        Expr::tg(arg) => call("tan", arg)?,
        Expr::ctg(arg) => (format!("1.0/{}", call("tan", arg)?.0), MUL),
        Expr::arcsin(arg) => call("asin", arg)?,
        Expr::arccos(arg) => call("acos", arg)?,
        Expr::arctg(arg) => call("atan", arg)?,
        Expr::arcctg(arg) => (
            format!("({:?} - {})", FRAC_PI_2, call("atan", arg)?.0),
            ATOM,
        ),
    };
    Ok(printed)
}

fn print_pow(base: &Expr, exp: &Expr) -> Result<(String, u8), CodegenError> {
    let base_text = print(base)?.0;
    let printed = match exp {
        Expr::Const(e) if *e == 0.5 => (format!("sqrt({})", base_text), ATOM),
        Expr::Const(e) if *e == -0.5 => (format!("1.0/sqrt({})", base_text), MUL),
        Expr::Const(e) if *e == -1.0 => (format!("1.0/{}", operand(base, ATOM)?), MUL),
        _ => (format!("pow({}, {})", base_text, print(exp)?.0), ATOM),
    };
    Ok(printed)
}

fn call(name: &str, arg: &Expr) -> Result<(String, u8), CodegenError> {
    Ok((format!("{}({})", name, print(arg)?.0), ATOM))
}

/// `expr` printed, parenthesized when it binds looser than `min_level`.
fn operand(expr: &Expr, min_level: u8) -> Result<String, CodegenError> {
    let (text, level) = match negated(expr) {
        // (-3)*x prints as -3*x, (-1)*x as -x
        Some(positive) if !matches!(expr, Expr::Const(_)) => {
            (negate(operand(&positive, MUL)?), UNARY)
        }
        _ => print(expr)?,
    };
    Ok(if level < min_level { format!("({})", text) } else { text })
}

/// Unary minus in front of printed text. A second leading minus is grouped
/// so that `-(-x)` never reaches C as the decrement `--x`.
fn negate(text: String) -> String {
    if text.starts_with('-') {
        format!("-({})", text)
    } else {
        format!("-{}", text)
    }
}

/// Division operand: constants become floating literals.
fn div_operand(expr: &Expr, min_level: u8) -> Result<String, CodegenError> {
    match expr {
        Expr::Const(val) => {
            let text = number(*val, true)?;
            let level = if text.starts_with('-') { UNARY } else { ATOM };
            Ok(if level < min_level { format!("({})", text) } else { text })
        }
        _ => operand(expr, min_level),
    }
}

/// Positive counterpart of a term carrying a negative leading coefficient.
fn negated(expr: &Expr) -> Option<Expr> {
    match expr {
        Expr::Const(c) if *c < 0.0 => Some(Expr::Const(-c)),
        Expr::Mul(lhs, rhs) => match lhs.as_ref() {
            Expr::Const(c) if *c == -1.0 => Some(rhs.as_ref().clone()),
            Expr::Const(c) if *c < 0.0 => Some(Expr::Mul(Box::new(Expr::Const(-c)), rhs.clone())),
            _ => None,
        },
        _ => None,
    }
}

/// C literal for a constant; integers print without a fractional part unless
/// `float_literal` is requested.
fn number(val: f64, float_literal: bool) -> Result<String, CodegenError> {
    if !val.is_finite() {
        return Err(CodegenError::NonFiniteConstant(val));
    }
    let text = if val.fract() == 0.0 && val.abs() < 1e15 {
        if float_literal {
            format!("{:.1}", val)
        } else {
            format!("{}", val as i64)
        }
    } else {
        format!("{:?}", val)
    };
    Ok(text)
}
