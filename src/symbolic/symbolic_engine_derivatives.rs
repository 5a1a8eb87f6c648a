//! # Symbolic Engine Derivatives Module
//!
//! Analytical differentiation of [`Expr`] trees, direct numeric evaluation and
//! validation of analytical partial derivatives against central finite
//! differences.
//!
//! ## Key Methods
//! - `diff(var: &str)` - analytical partial derivative
//! - `diff_multi_args(vars)` - gradient as a vector of partial derivatives
//! - `eval_expression(vars, values)` - evaluation without building a closure
//! - `compare_num(vars, points, h)` - worst deviation between analytical and numerical partials
//!
//! Derivatives are returned unsimplified; callers decide when to call
//! `simplify()`.

use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::symbolic_lambdify::EvalError;
use crate::symbolic::utils::{max_abs_diff, numerical_derivative_multi};
use std::f64::consts::PI;

impl Expr {
    /// Computes the analytical derivative of the expression with respect to a variable.
    ///
    /// Implements the standard rules:
    /// - Power rule: d/dx(f^n) = n*f^(n-1)*f' for exponents free of `var`
    /// - General power: d/dx(f^g) = f^g*(g'*ln(f) + g*f'/f)
    /// - Product rule: d/dx(f*g) = f'*g + f*g'
    /// - Quotient rule: d/dx(f/g) = (f'*g - g'*f)/(g*g)
    /// - Chain rule for every elementary function
    ///
    /// # Examples
    /// ```rust, ignore
    /// let u = Expr::Var("u".to_string());
    /// let f = Expr::sin(u.boxed()); // sin(u)
    /// let df_du = f.diff("u"); // cos(u) * 1
    /// ```
    pub fn diff(&self, var: &str) -> Expr {
        match self {
            Expr::Var(name) => {
                if name == var {
                    Expr::Const(1.0)
                } else {
                    Expr::Const(0.0)
                }
            }
            Expr::Const(_) => Expr::Const(0.0),
            Expr::Add(lhs, rhs) => Expr::Add(Box::new(lhs.diff(var)), Box::new(rhs.diff(var))),
            Expr::Sub(lhs, rhs) => Expr::Sub(Box::new(lhs.diff(var)), Box::new(rhs.diff(var))),
            Expr::Mul(lhs, rhs) => Expr::Add(
                Box::new(Expr::Mul(Box::new(lhs.diff(var)), rhs.clone())),
                Box::new(Expr::Mul(lhs.clone(), Box::new(rhs.diff(var)))),
            ),
            Expr::Div(lhs, rhs) => Expr::Div(
                Box::new(Expr::Sub(
                    Box::new(Expr::Mul(Box::new(lhs.diff(var)), rhs.clone())),
                    Box::new(Expr::Mul(Box::new(rhs.diff(var)), lhs.clone())),
                )),
                Box::new(Expr::Mul(rhs.clone(), rhs.clone())),
            ),
            Expr::Pow(base, exp) if !exp.contains_variable(var) => Expr::Mul(
                Box::new(Expr::Mul(
                    exp.clone(),
                    Box::new(Expr::Pow(
                        base.clone(),
                        Box::new(Expr::Sub(exp.clone(), Box::new(Expr::Const(1.0)))),
                    )),
                )),
                Box::new(base.diff(var)),
            ),
            Expr::Pow(base, exp) => Expr::Mul(
                Box::new(self.clone()),
                Box::new(Expr::Add(
                    Box::new(Expr::Mul(Box::new(exp.diff(var)), Box::new(Expr::Ln(base.clone())))),
                    Box::new(Expr::Div(
                        Box::new(Expr::Mul(exp.clone(), Box::new(base.diff(var)))),
                        base.clone(),
                    )),
                )),
            ),
            Expr::Exp(expr) => {
                Expr::Mul(Box::new(Expr::Exp(expr.clone())), Box::new(expr.diff(var)))
            }
            Expr::Ln(expr) => Expr::Div(Box::new(expr.diff(var)), expr.clone()),
            // d|f| = f/|f| * f'
            Expr::Abs(expr) => Expr::Mul(
                Box::new(Expr::Div(expr.clone(), Box::new(Expr::Abs(expr.clone())))),
                Box::new(expr.diff(var)),
            ),
            Expr::sin(expr) => {
                Expr::Mul(Box::new(Expr::cos(expr.clone())), Box::new(expr.diff(var)))
            }
            Expr::cos(expr) => Expr::Mul(
                Box::new(Expr::Mul(
                    Box::new(Expr::Const(-1.0)),
                    Box::new(Expr::sin(expr.clone())),
                )),
                Box::new(expr.diff(var)),
            ),
            Expr::tg(expr) => Expr::Mul(
                Box::new(Expr::Div(
                    Box::new(Expr::Const(1.0)),
                    Box::new(Expr::Pow(
                        Box::new(Expr::cos(expr.clone())),
                        Box::new(Expr::Const(2.0)),
                    )),
                )),
                Box::new(expr.diff(var)),
            ),
            Expr::ctg(expr) => Expr::Mul(
                Box::new(Expr::Div(
                    Box::new(Expr::Const(-1.0)),
                    Box::new(Expr::Pow(
                        Box::new(Expr::sin(expr.clone())),
                        Box::new(Expr::Const(2.0)),
                    )),
                )),
                Box::new(expr.diff(var)),
            ),
            Expr::arcsin(expr) => Expr::Div(
                Box::new(expr.diff(var)),
                Box::new(Expr::Pow(
                    Box::new(Expr::Sub(
                        Box::new(Expr::Const(1.0)),
                        Box::new(Expr::Pow(expr.clone(), Box::new(Expr::Const(2.0)))),
                    )),
                    Box::new(Expr::Const(0.5)),
                )),
            ),
            Expr::arccos(expr) => Expr::Div(
                Box::new(Expr::Mul(
                    Box::new(Expr::Const(-1.0)),
                    Box::new(expr.diff(var)),
                )),
                Box::new(Expr::Pow(
                    Box::new(Expr::Sub(
                        Box::new(Expr::Const(1.0)),
                        Box::new(Expr::Pow(expr.clone(), Box::new(Expr::Const(2.0)))),
                    )),
                    Box::new(Expr::Const(0.5)),
                )),
            ),
            Expr::arctg(expr) => Expr::Div(
                Box::new(expr.diff(var)),
                Box::new(Expr::Add(
                    Box::new(Expr::Const(1.0)),
                    Box::new(Expr::Pow(expr.clone(), Box::new(Expr::Const(2.0)))),
                )),
            ),
            Expr::arcctg(expr) => Expr::Div(
                Box::new(Expr::Mul(
                    Box::new(Expr::Const(-1.0)),
                    Box::new(expr.diff(var)),
                )),
                Box::new(Expr::Add(
                    Box::new(Expr::Const(1.0)),
                    Box::new(Expr::Pow(expr.clone(), Box::new(Expr::Const(2.0)))),
                )),
            ),
        }
    } // end of diff

    /// Partial derivatives with respect to each of `all_vars`, in order.
    pub fn diff_multi_args(&self, all_vars: &[&str]) -> Vec<Expr> {
        all_vars.iter().map(|var| self.diff(var)).collect()
    }

    /// Evaluates the expression directly without creating a closure.
    ///
    /// # Arguments
    /// * `vars` - Variable names in order matching `values`
    /// * `values` - Numerical values for each variable
    ///
    /// # Errors
    /// `EvalError::UnknownVariable` if the tree references a variable missing from `vars`.
    pub fn eval_expression(&self, vars: &[&str], values: &[f64]) -> Result<f64, EvalError> {
        let ev = |e: &Expr| e.eval_expression(vars, values);
        let value = match self {
            Expr::Var(name) => {
                let index = vars
                    .iter()
                    .position(|&x| x == name)
                    .ok_or_else(|| EvalError::UnknownVariable(name.clone()))?;
                *values
                    .get(index)
                    .ok_or_else(|| EvalError::MissingValue(name.clone()))?
            }
            Expr::Const(val) => *val,
            Expr::Add(lhs, rhs) => ev(lhs)? + ev(rhs)?,
            Expr::Sub(lhs, rhs) => ev(lhs)? - ev(rhs)?,
            Expr::Mul(lhs, rhs) => ev(lhs)? * ev(rhs)?,
            Expr::Div(lhs, rhs) => ev(lhs)? / ev(rhs)?,
            Expr::Pow(base, exp) => ev(base)?.powf(ev(exp)?),
            Expr::Exp(expr) => ev(expr)?.exp(),
            Expr::Ln(expr) => ev(expr)?.ln(),
            Expr::Abs(expr) => ev(expr)?.abs(),
            Expr::sin(expr) => ev(expr)?.sin(),
            Expr::cos(expr) => ev(expr)?.cos(),
            Expr::tg(expr) => ev(expr)?.tan(),
            Expr::ctg(expr) => 1.0 / ev(expr)?.tan(),
            Expr::arcsin(expr) => ev(expr)?.asin(),
            Expr::arccos(expr) => ev(expr)?.acos(),
            Expr::arctg(expr) => ev(expr)?.atan(),
            Expr::arcctg(expr) => PI / 2.0 - ev(expr)?.atan(),
        };
        Ok(value)
    }

    /// Compares analytical partial derivatives with central finite differences.
    ///
    /// For every point in `points` (each a slice of values ordered as `vars`)
    /// the gradient is computed both ways; the result holds, per variable, the
    /// largest absolute deviation seen across all points.
    ///
    /// # Arguments
    /// * `vars` - variables of differentiation, also the argument order of the points
    /// * `points` - evaluation points
    /// * `h` - finite-difference step
    pub fn compare_num(
        &self,
        vars: &[&str],
        points: &[Vec<f64>],
        h: f64,
    ) -> Result<Vec<f64>, EvalError> {
        let function = self.lambdify(vars)?;
        let partials = self
            .diff_multi_args(vars)
            .iter()
            .map(|d| d.lambdify(vars))
            .collect::<Result<Vec<_>, _>>()?;

        // one column per variable, one row per point
        let mut numerical_cols = vec![Vec::with_capacity(points.len()); vars.len()];
        let mut analytical_cols = vec![Vec::with_capacity(points.len()); vars.len()];
        for point in points {
            let numerical = numerical_derivative_multi(&function, point, h);
            for (i, df) in partials.iter().enumerate() {
                numerical_cols[i].push(numerical[i]);
                analytical_cols[i].push(df(point));
            }
        }
        Ok(numerical_cols
            .iter()
            .zip(analytical_cols.iter())
            .map(|(num, an)| max_abs_diff(num, an))
            .collect())
    }
}
