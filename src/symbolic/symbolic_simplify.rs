//! # Symbolic Expression Simplification Module
//!
//! Exact algebraic rewriting of [`Expr`] trees into a more compact equivalent
//! form. Nothing here evaluates variables numerically; only constants are
//! folded.
//!
//! ## Simplification Strategy
//!
//! 1. **Constant Folding**: arithmetic between constants is evaluated
//! 2. **Algebraic Identities**: `x + 0 = x`, `x * 1 = x`, `x ^ 1 = x`, `sin(0) = 0`, ...
//! 3. **Like Term Collection**: sums are flattened into `coefficient * monomial`
//!    terms, equal monomials are merged (`3*sin(u) - sin(u) = 2*sin(u)`)
//! 4. **Power Merging**: products are flattened into `base ^ exponent` factors,
//!    equal bases are merged (`sin(v) * sin(v) = sin(v)^2`)
//! 5. **Power Rules**: `(x^a)^n = x^(a*n)` for integer `n`, `(x^2)^(1/2) = |x|`,
//!    `(c*x)^n = c^n * x^n`
//!
//! Sums and products are rebuilt with their terms sorted by their printed form,
//! so the result does not depend on the order in which operands arrived. This
//! makes repeated derivations produce identical trees.

use crate::symbolic::symbolic_engine::Expr;
use std::collections::HashMap;

/// number of `simplify_` passes `simplify` applies at most before giving up on a fixed point
const MAX_PASSES: usize = 8;

impl Expr {
    /// Simplifies until the tree stops changing (or `MAX_PASSES` is reached).
    pub fn simplify(&self) -> Expr {
        let mut current = self.simplify_();
        for _ in 1..MAX_PASSES {
            let next = current.simplify_();
            if next == current {
                break;
            }
            current = next;
        }
        current
    }

    /// One bottom-up simplification pass.
    ///
    /// Children are simplified first, then the rules for the node itself are
    /// applied. Division by a symbolic zero is left in place.
    pub fn simplify_(&self) -> Expr {
        match self {
            Expr::Var(_) | Expr::Const(_) => self.clone(),
            Expr::Add(lhs, rhs) => {
                let lhs = lhs.simplify_();
                let rhs = rhs.simplify_();
                match (&lhs, &rhs) {
                    (Expr::Const(a), Expr::Const(b)) => Expr::Const(a + b),
                    _ if lhs.is_zero() => rhs,
                    _ if rhs.is_zero() => lhs,
                    _ => collect_sum(&Expr::Add(Box::new(lhs), Box::new(rhs))),
                }
            }
            Expr::Sub(lhs, rhs) => {
                let lhs = lhs.simplify_();
                let rhs = rhs.simplify_();
                match (&lhs, &rhs) {
                    (Expr::Const(a), Expr::Const(b)) => Expr::Const(a - b),
                    _ if rhs.is_zero() => lhs,
                    _ if lhs == rhs => Expr::Const(0.0),
                    _ if lhs.is_zero() => collect_sum(&scaled(-1.0, rhs)),
                    // a - b = a + (-1)*b
                    _ => collect_sum(&Expr::Add(Box::new(lhs), Box::new(scaled(-1.0, rhs)))),
                }
            }
            Expr::Mul(lhs, rhs) => {
                let lhs = lhs.simplify_();
                let rhs = rhs.simplify_();
                match (&lhs, &rhs) {
                    (Expr::Const(a), Expr::Const(b)) => Expr::Const(a * b),
                    _ if lhs.is_zero() || rhs.is_zero() => Expr::Const(0.0),
                    _ if lhs.is_one() => rhs,
                    _ if rhs.is_one() => lhs,
                    _ => collect_product(&Expr::Mul(Box::new(lhs), Box::new(rhs))),
                }
            }
            Expr::Div(lhs, rhs) => {
                let lhs = lhs.simplify_();
                let rhs = rhs.simplify_();
                match (&lhs, &rhs) {
                    (Expr::Const(a), Expr::Const(b)) if *b != 0.0 => Expr::Const(a / b),
                    _ if rhs.is_zero() => Expr::Div(Box::new(lhs), Box::new(rhs)),
                    _ if lhs.is_zero() => Expr::Const(0.0),
                    _ if rhs.is_one() => lhs,
                    _ if lhs == rhs => Expr::Const(1.0),
                    // (c1 * expr) / c2 = (c1/c2) * expr
                    (Expr::Mul(inner_lhs, inner_rhs), Expr::Const(c)) => match inner_lhs.as_ref() {
                        Expr::Const(c1) => scaled(c1 / c, inner_rhs.as_ref().clone()),
                        _ => Expr::Div(Box::new(lhs), Box::new(rhs)),
                    },
                    _ => Expr::Div(Box::new(lhs), Box::new(rhs)),
                }
            }
            Expr::Pow(base, exp) => simplify_pow(base.simplify_(), exp.simplify_()),
            Expr::Exp(expr) => {
                let expr = expr.simplify_();
                match &expr {
                    Expr::Const(0.0) => Expr::Const(1.0),
                    _ => Expr::Exp(Box::new(expr)),
                }
            }
            Expr::Ln(expr) => {
                let expr = expr.simplify_();
                match &expr {
                    Expr::Const(1.0) => Expr::Const(0.0),
                    Expr::Exp(inner) => inner.as_ref().clone(),
                    _ => Expr::Ln(Box::new(expr)),
                }
            }
            Expr::Abs(expr) => simplify_abs(expr.simplify_()),
            Expr::sin(expr) => {
                let expr = expr.simplify_();
                match &expr {
                    Expr::Const(0.0) => Expr::Const(0.0),
                    _ => Expr::sin(Box::new(expr)),
                }
            } //sin
            Expr::cos(expr) => {
                let expr = expr.simplify_();
                match &expr {
                    Expr::Const(0.0) => Expr::Const(1.0),
                    _ => Expr::cos(Box::new(expr)),
                }
            } //cos
            Expr::tg(expr) => {
                let expr = expr.simplify_();
                match &expr {
                    Expr::Const(0.0) => Expr::Const(0.0),
                    _ => Expr::tg(Box::new(expr)),
                }
            } //tg
            Expr::ctg(expr) => Expr::ctg(Box::new(expr.simplify_())),
            Expr::arcsin(expr) => {
                let expr = expr.simplify_();
                match &expr {
                    Expr::Const(0.0) => Expr::Const(0.0),
                    _ => Expr::arcsin(Box::new(expr)),
                }
            }
            Expr::arccos(expr) => {
                let expr = expr.simplify_();
                match &expr {
                    Expr::Const(1.0) => Expr::Const(0.0),
                    _ => Expr::arccos(Box::new(expr)),
                }
            }
            Expr::arctg(expr) => {
                let expr = expr.simplify_();
                match &expr {
                    Expr::Const(0.0) => Expr::Const(0.0),
                    _ => Expr::arctg(Box::new(expr)),
                }
            }
            Expr::arcctg(expr) => Expr::arcctg(Box::new(expr.simplify_())),
        }
    }
}

/// integer value of a constant node, if it has one
fn integer_const(expr: &Expr) -> Option<f64> {
    match expr {
        Expr::Const(val) if val.fract() == 0.0 && val.is_finite() => Some(*val),
        _ => None,
    }
}

/// `c * expr` in canonical form: the constant is folded into an existing
/// leading constant and never wraps another constant.
fn scaled(c: f64, expr: Expr) -> Expr {
    match expr {
        Expr::Const(k) => Expr::Const(c * k),
        Expr::Mul(lhs, rhs) if matches!(lhs.as_ref(), Expr::Const(_)) => {
            let k = lhs.as_const().unwrap_or(1.0);
            scaled(c * k, *rhs)
        }
        _ if c == 0.0 => Expr::Const(0.0),
        _ if c == 1.0 => expr,
        _ => Expr::Mul(Box::new(Expr::Const(c)), Box::new(expr)),
    }
}

fn simplify_pow(base: Expr, exp: Expr) -> Expr {
    match (&base, &exp) {
        (Expr::Const(a), Expr::Const(b)) if a.powf(*b).is_finite() => Expr::Const(a.powf(*b)),
        (_, Expr::Const(b)) if *b == 0.0 => Expr::Const(1.0),
        (_, Expr::Const(b)) if *b == 1.0 => base,
        (Expr::Const(a), _) if *a == 1.0 => Expr::Const(1.0),
        (Expr::Pow(inner_base, inner_exp), Expr::Const(b)) => {
            match (integer_const(&exp), inner_exp.as_const()) {
                // (x^a)^n = x^(a*n)
                (Some(n), Some(a)) => simplify_pow(inner_base.as_ref().clone(), Expr::Const(a * n)),
                (Some(_), None) => {
                    let new_exp = Expr::Mul(inner_exp.clone(), Box::new(exp.clone())).simplify_();
                    Expr::Pow(inner_base.clone(), Box::new(new_exp))
                }
                // (x^(2k))^(1/2) = |x|^k
                (None, Some(a)) if *b == 0.5 && a % 2.0 == 0.0 => {
                    simplify_pow(simplify_abs(inner_base.as_ref().clone()), Expr::Const(a / 2.0))
                }
                _ => Expr::Pow(Box::new(base), Box::new(exp)),
            }
        }
        // |x|^(2k) = x^(2k)
        (Expr::Abs(inner), Expr::Const(b)) if b % 2.0 == 0.0 => {
            Expr::Pow(inner.clone(), Box::new(exp))
        }
        // (c * x)^n = c^n * x^n
        (Expr::Mul(lhs, rhs), _) if integer_const(&exp).is_some() => match lhs.as_ref() {
            Expr::Const(c) => {
                let n = integer_const(&exp).unwrap_or(1.0);
                scaled(c.powf(n), simplify_pow(rhs.as_ref().clone(), exp))
            }
            _ => Expr::Pow(Box::new(base), Box::new(exp)),
        },
        _ => Expr::Pow(Box::new(base), Box::new(exp)),
    }
}

fn is_even_power(expr: &Expr) -> bool {
    match expr {
        Expr::Pow(_, exp) => matches!(exp.as_ref(), Expr::Const(b) if b % 2.0 == 0.0),
        _ => false,
    }
}

fn simplify_abs(expr: Expr) -> Expr {
    if is_even_power(&expr) {
        return expr;
    }
    match expr {
        Expr::Const(val) => Expr::Const(val.abs()),
        Expr::Abs(_) => expr,
        Expr::Mul(lhs, rhs) if matches!(lhs.as_ref(), Expr::Const(_)) => {
            let c = lhs.as_const().unwrap_or(1.0);
            scaled(c.abs(), simplify_abs(*rhs))
        }
        _ => Expr::Abs(Box::new(expr)),
    }
}

/// Splits a sum into `(coefficient, monomial)` terms. Constant factors are
/// distributed over nested sums; a pure constant has monomial `Const(1)`.
fn flatten_sum(expr: &Expr, scale: f64, terms: &mut Vec<(f64, Expr)>) {
    match expr {
        Expr::Add(lhs, rhs) => {
            flatten_sum(lhs, scale, terms);
            flatten_sum(rhs, scale, terms);
        }
        Expr::Sub(lhs, rhs) => {
            flatten_sum(lhs, scale, terms);
            flatten_sum(rhs, -scale, terms);
        }
        Expr::Const(c) => terms.push((scale * c, Expr::Const(1.0))),
        Expr::Mul(lhs, rhs) => match (lhs.as_ref(), rhs.as_ref()) {
            (Expr::Const(c), other) | (other, Expr::Const(c)) => flatten_sum(other, scale * c, terms),
            _ => terms.push((scale, expr.clone())),
        },
        _ => terms.push((scale, expr.clone())),
    }
}

/// Collects like terms of a sum and rebuilds it in sorted order, constant last.
fn collect_sum(expr: &Expr) -> Expr {
    let mut terms = Vec::new();
    flatten_sum(expr, 1.0, &mut terms);

    let mut index: HashMap<String, usize> = HashMap::new();
    let mut collected: Vec<(String, f64, Expr)> = Vec::new();
    for (coeff, monomial) in terms {
        let key = monomial.to_string();
        match index.get(&key) {
            Some(&i) => collected[i].1 += coeff,
            None => {
                index.insert(key.clone(), collected.len());
                collected.push((key, coeff, monomial));
            }
        }
    }
    collected.retain(|(_, coeff, _)| *coeff != 0.0);
    collected.sort_by(|(ka, _, ma), (kb, _, mb)| {
        let a_const = matches!(ma, Expr::Const(_));
        let b_const = matches!(mb, Expr::Const(_));
        a_const.cmp(&b_const).then_with(|| ka.cmp(kb))
    });

    collected
        .into_iter()
        .map(|(_, coeff, monomial)| scaled(coeff, monomial))
        .reduce(|acc, term| Expr::Add(Box::new(acc), Box::new(term)))
        .unwrap_or(Expr::Const(0.0))
}

/// Splits a product into a numeric coefficient and `(base, exponent)` factors.
fn flatten_product(expr: &Expr, coeff: &mut f64, factors: &mut Vec<(Expr, Expr)>) {
    match expr {
        Expr::Mul(lhs, rhs) => {
            flatten_product(lhs, coeff, factors);
            flatten_product(rhs, coeff, factors);
        }
        Expr::Const(c) => *coeff *= c,
        Expr::Pow(base, exp) => factors.push((base.as_ref().clone(), exp.as_ref().clone())),
        _ => factors.push((expr.clone(), Expr::Const(1.0))),
    }
}

/// Merges equal bases of a product by adding exponents and rebuilds it sorted,
/// coefficient first.
fn collect_product(expr: &Expr) -> Expr {
    let mut coeff = 1.0;
    let mut factors = Vec::new();
    flatten_product(expr, &mut coeff, &mut factors);
    if coeff == 0.0 {
        return Expr::Const(0.0);
    }

    let mut index: HashMap<String, usize> = HashMap::new();
    let mut collected: Vec<(String, Expr, Expr)> = Vec::new();
    for (base, exp) in factors {
        let key = base.to_string();
        match index.get(&key) {
            Some(&i) => {
                let merged = match (&collected[i].2, &exp) {
                    (Expr::Const(a), Expr::Const(b)) => Expr::Const(a + b),
                    (a, b) => Expr::Add(Box::new(a.clone()), Box::new(b.clone())).simplify_(),
                };
                collected[i].2 = merged;
            }
            None => {
                index.insert(key.clone(), collected.len());
                collected.push((key, base, exp));
            }
        }
    }
    collected.retain(|(_, _, exp)| !exp.is_zero());
    collected.sort_by(|(ka, _, _), (kb, _, _)| ka.cmp(kb));

    let product = collected
        .into_iter()
        .map(|(_, base, exp)| {
            if exp.is_one() {
                base
            } else {
                simplify_pow(base, exp)
            }
        })
        .reduce(|acc, factor| Expr::Mul(Box::new(acc), Box::new(factor)));

    match product {
        Some(product) => scaled(coeff, product),
        None => Expr::Const(coeff),
    }
}
