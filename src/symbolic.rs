#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
///____________________________________________________________________________________________________________________________
/// # Symbolic engine
/// a module
/// 1) builds symbolic expressions out of variables, constants and elementary functions
/// 2) substitutes variables and queries the free symbols of an expression
/// 3) prints an expression in a fully parenthesized form for control of results
///# Example#
/// ```
/// use RustedSurface::symbolic::symbolic_engine::Expr;
/// let u = Expr::Var("u".to_string());
/// let v = Expr::Var("v".to_string());
/// let x = Expr::sin(v.boxed()) * Expr::Const(15.0) * Expr::sin(u.boxed());
/// println!("x = {}", x);
/// ```
/// ________________________________________________________________________________________________________________________________
pub mod symbolic_engine;
/// analytical derivatives, direct evaluation and comparison with finite differences
///# Example#
/// ```
/// use RustedSurface::symbolic::symbolic_engine::Expr;
/// let v = Expr::Var("v".to_string());
/// let y = Expr::Const(8.0) * Expr::cos(v.boxed());
/// let dy_dv = y.diff("v").simplify();
/// let value = dy_dv.eval_expression(&["v"], &[0.0]).unwrap();
/// assert_eq!(value, 0.0);
/// ```
pub mod symbolic_engine_derivatives;
/// turns a symbolic expression into a Rust closure
pub mod symbolic_lambdify;
/// algebraic simplification: constant folding, identities, like terms and powers
pub mod symbolic_simplify;
/// vectors of symbolic expressions: dot and cross products, norm, normalization
///# Example#
/// ```
/// use RustedSurface::symbolic::symbolic_vectors::ExprVector;
/// let a = ExprVector::from_variables(&["x", "y", "z"]);
/// let n = a.normalize().simplify();
/// assert_eq!(n.len(), 3);
/// ```
pub mod symbolic_vectors;
/// numerical helpers shared by the symbolic modules
pub mod utils;
