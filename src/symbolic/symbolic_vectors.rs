use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::symbolic_lambdify::EvalError;

use nalgebra::DVector;
use std::ops::{Div, Index};

#[derive(Clone, Debug, PartialEq)]
/// Symbolic vector
///
/// Vector operations here build raw trees and never simplify on their own;
/// call [`ExprVector::simplify`] when a compact form is wanted.
pub struct ExprVector {
    pub data: Vec<Expr>,
}

impl ExprVector {
    /// Create new symbolic vector
    pub fn new(data: Vec<Expr>) -> Self {
        Self { data }
    }

    /// Create from variable names
    pub fn from_variables(vars: &[&str]) -> Self {
        Self {
            data: vars.iter().map(|&v| Expr::Var(v.to_string())).collect(),
        }
    }
    /// Get length
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
    pub fn iter(&self) -> std::slice::Iter<'_, Expr> {
        self.data.iter()
    }
    /// Element access
    pub fn get(&self, index: usize) -> Option<&Expr> {
        self.data.get(index)
    }

    /// Dot product (symbolic, unsimplified)
    pub fn dot(&self, other: &ExprVector) -> Expr {
        assert_eq!(self.len(), other.len(), "Vector dimensions must match");

        self.data
            .iter()
            .zip(other.data.iter())
            .map(|(a, b)| a.clone() * b.clone())
            .reduce(|acc, term| acc + term)
            .unwrap_or(Expr::Const(0.0))
    }

    /// Cross product of two 3D vectors:
    /// (a1 b2 - a2 b1 ... ) componentwise as
    /// (a_y b_z - a_z b_y, a_z b_x - a_x b_z, a_x b_y - a_y b_x)
    pub fn cross(&self, other: &ExprVector) -> ExprVector {
        assert_eq!(self.len(), 3, "Cross product is defined for 3D vectors only");
        assert_eq!(other.len(), 3, "Cross product is defined for 3D vectors only");
        let (a, b) = (&self.data, &other.data);
        let component = |i: usize, j: usize| a[i].clone() * b[j].clone() - a[j].clone() * b[i].clone();
        ExprVector::new(vec![component(1, 2), component(2, 0), component(0, 1)])
    }

    /// Euclidean norm (w . w)^(1/2)
    pub fn norm(&self) -> Expr {
        self.dot(self).sqrt()
    }

    /// self / ||self||
    pub fn normalize(&self) -> ExprVector {
        self.clone() / self.norm()
    }

    /// Evaluate vector numerically
    pub fn evaluate(&self, vars: &[&str], values: &[f64]) -> Result<DVector<f64>, EvalError> {
        let evaluated = self
            .data
            .iter()
            .map(|expr| expr.eval_expression(vars, values))
            .collect::<Result<Vec<f64>, EvalError>>()?;
        Ok(DVector::from_vec(evaluated))
    }

    /// Substitute variables
    pub fn substitute(&self, var: &str, value: &Expr) -> ExprVector {
        ExprVector {
            data: self
                .data
                .iter()
                .map(|expr| expr.substitute_variable(var, value))
                .collect(),
        }
    }

    /// Differentiate with respect to variable, componentwise, without simplification
    pub fn diff(&self, var: &str) -> ExprVector {
        ExprVector {
            data: self.data.iter().map(|expr| expr.diff(var)).collect(),
        }
    }

    /// Simplify all expressions
    pub fn simplify(&self) -> ExprVector {
        ExprVector {
            data: self.data.iter().map(|expr| expr.simplify()).collect(),
        }
    }

    /// total number of nodes over all components
    pub fn node_count(&self) -> usize {
        self.data.iter().map(|expr| expr.node_count()).sum()
    }

    /// Convert to lambdified function
    pub fn lambdify(
        &self,
        vars: &[&str],
    ) -> Result<Box<dyn Fn(&[f64]) -> DVector<f64> + Send + Sync>, EvalError> {
        let compiled = self
            .data
            .iter()
            .map(|expr| expr.lambdify(vars))
            .collect::<Result<Vec<_>, EvalError>>()?;

        Ok(Box::new(move |values: &[f64]| {
            DVector::from_iterator(compiled.len(), compiled.iter().map(|f| f(values)))
        }))
    }
}

// Implement indexing
impl Index<usize> for ExprVector {
    type Output = Expr;

    fn index(&self, index: usize) -> &Self::Output {
        &self.data[index]
    }
}

// Division of every component by a scalar expression
impl Div<Expr> for ExprVector {
    type Output = Self;

    fn div(self, scalar: Expr) -> Self::Output {
        let result: Vec<Expr> = self
            .data
            .into_iter()
            .map(|expr| expr / scalar.clone())
            .collect();

        ExprVector { data: result }
    }
}
