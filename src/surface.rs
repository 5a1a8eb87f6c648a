//! # Parametric surface and its normal field
//!
//! The heart surface is given by a position map r(u, v):
//!
//! - x = sin(v) * (15 sin(u) - 4 sin(3u))
//! - y = 8 cos(v)
//! - z = sin(v) * (15 cos(u) - 5 cos(2u) - 2 cos(3u) - cos(4u))
//!
//! with u in [0, 2pi) and v in [0, pi]. The unit normal is derived purely
//! symbolically: r_u and r_v are differentiated componentwise, their cross
//! product is divided by its norm and the result is simplified. At v = 0 and
//! v = pi the cross product vanishes, so the normal evaluates to NaN there.
//!
//! # Example
//! ```rust, ignore
//! let surface = ParametricSurface::heart();
//! let derivation = surface.derive();
//! let n = derivation.normal_at(0.0, std::f64::consts::FRAC_PI_2)?;
//! ```

use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::symbolic_lambdify::EvalError;
use crate::symbolic::symbolic_vectors::ExprVector;
use crate::symbolic::utils::linspace;
use log::{debug, info};
use nalgebra::Vector3;
use std::f64::consts::PI;

/// Rectangle of parameter values the surface map is defined on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterDomain {
    pub u: (f64, f64),
    pub v: (f64, f64),
}

impl Default for ParameterDomain {
    fn default() -> Self {
        Self {
            u: (0.0, 2.0 * PI),
            v: (0.0, PI),
        }
    }
}

impl ParameterDomain {
    /// Maps a point (s, t) of the unit square onto the domain.
    pub fn to_sample_space(&self, s: f64, t: f64) -> (f64, f64) {
        (
            self.u.0 + (self.u.1 - self.u.0) * s,
            self.v.0 + (self.v.1 - self.v.0) * t,
        )
    }

    pub fn contains(&self, u: f64, v: f64) -> bool {
        u >= self.u.0 && u <= self.u.1 && v >= self.v.0 && v <= self.v.1
    }
}

/// Surface given by a symbolic position vector in two parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ParametricSurface {
    pub parameters: (String, String),
    pub position: ExprVector,
    pub domain: ParameterDomain,
}

/// Every intermediate vector of the normal derivation.
///
/// `r_u`, `r_v` and `raw_normal` are kept unsimplified; only `normal` is
/// simplified.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceDerivation {
    pub parameters: (String, String),
    pub position: ExprVector,
    pub r_u: ExprVector,
    pub r_v: ExprVector,
    pub raw_normal: ExprVector,
    pub normal: ExprVector,
}

impl ParametricSurface {
    pub fn new(u: &str, v: &str, position: ExprVector, domain: ParameterDomain) -> Self {
        assert_eq!(position.len(), 3, "Surface position must be a 3D vector");
        Self {
            parameters: (u.to_string(), v.to_string()),
            position,
            domain,
        }
    }

    /// The heart-shaped surface.
    pub fn heart() -> Self {
        let (u, v) = crate::symbols!(u, v);
        let c = Expr::Const;
        let sin = |e: Expr| Expr::sin(e.boxed());
        let cos = |e: Expr| Expr::cos(e.boxed());

        let x = sin(v.clone()) * (c(15.0) * sin(u.clone()) - c(4.0) * sin(c(3.0) * u.clone()));
        let y = c(8.0) * cos(v.clone());
        let z = sin(v)
            * (c(15.0) * cos(u.clone())
                - c(5.0) * cos(c(2.0) * u.clone())
                - c(2.0) * cos(c(3.0) * u.clone())
                - cos(c(4.0) * u));

        Self::new("u", "v", ExprVector::new(vec![x, y, z]), ParameterDomain::default())
    }

    fn vars(&self) -> [&str; 2] {
        [self.parameters.0.as_str(), self.parameters.1.as_str()]
    }

    /// Runs diff -> cross -> normalize -> simplify.
    pub fn derive(&self) -> SurfaceDerivation {
        let [u, v] = self.vars();
        info!("differentiating position with respect to {} and {}", u, v);
        let r_u = self.position.diff(u);
        let r_v = self.position.diff(v);
        debug!("r_u: {} nodes, r_v: {} nodes", r_u.node_count(), r_v.node_count());

        let raw_normal = r_u.cross(&r_v);
        debug!("cross product: {} nodes", raw_normal.node_count());

        let normalized = raw_normal.normalize();
        info!("simplifying normal ({} nodes)", normalized.node_count());
        let normal = normalized.simplify();
        info!("normal simplified to {} nodes", normal.node_count());

        SurfaceDerivation {
            parameters: self.parameters.clone(),
            position: self.position.clone(),
            r_u,
            r_v,
            raw_normal,
            normal,
        }
    }

    pub fn position_at(&self, u: f64, v: f64) -> Result<Vector3<f64>, EvalError> {
        evaluate3(&self.position, &self.vars(), u, v)
    }

    /// Positions on a regular `nu` x `nv` grid over the domain, row per u value.
    pub fn sample_grid(&self, nu: usize, nv: usize) -> Result<Vec<Vec<Vector3<f64>>>, EvalError> {
        let position = self.position.lambdify(&self.vars())?;
        let us = linspace(self.domain.u.0, self.domain.u.1, nu);
        let vs = linspace(self.domain.v.0, self.domain.v.1, nv);
        let grid = us
            .iter()
            .map(|&u| {
                vs.iter()
                    .map(|&v| {
                        let p = position(&[u, v]);
                        Vector3::new(p[0], p[1], p[2])
                    })
                    .collect()
            })
            .collect();
        Ok(grid)
    }
}

impl SurfaceDerivation {
    fn vars(&self) -> [&str; 2] {
        [self.parameters.0.as_str(), self.parameters.1.as_str()]
    }

    pub fn normal_at(&self, u: f64, v: f64) -> Result<Vector3<f64>, EvalError> {
        evaluate3(&self.normal, &self.vars(), u, v)
    }

    pub fn partials_at(&self, u: f64, v: f64) -> Result<(Vector3<f64>, Vector3<f64>), EvalError> {
        let vars = self.vars();
        Ok((evaluate3(&self.r_u, &vars, u, v)?, evaluate3(&self.r_v, &vars, u, v)?))
    }

    pub fn raw_normal_at(&self, u: f64, v: f64) -> Result<Vector3<f64>, EvalError> {
        evaluate3(&self.raw_normal, &self.vars(), u, v)
    }
}

fn evaluate3(vector: &ExprVector, vars: &[&str], u: f64, v: f64) -> Result<Vector3<f64>, EvalError> {
    let value = vector.evaluate(vars, &[u, v])?;
    Ok(Vector3::new(value[0], value[1], value[2]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::f64::consts::FRAC_PI_2;

    fn sample_points(n: usize) -> Vec<(f64, f64)> {
        let mut rng = StdRng::seed_from_u64(42);
        (0..n)
            .map(|_| (rng.random_range(0.0..2.0 * PI), rng.random_range(0.1..PI - 0.1)))
            .collect()
    }

    #[test]
    fn position_matches_direct_formula() {
        let surface = ParametricSurface::heart();
        for (u, v) in sample_points(10) {
            let p = surface.position_at(u, v).unwrap();
            let x = v.sin() * (15.0 * u.sin() - 4.0 * (3.0 * u).sin());
            let y = 8.0 * v.cos();
            let z = v.sin()
                * (15.0 * u.cos() - 5.0 * (2.0 * u).cos() - 2.0 * (3.0 * u).cos() - (4.0 * u).cos());
            assert_relative_eq!(p, Vector3::new(x, y, z), epsilon = 1e-12);
        }
    }

    #[test]
    fn position_at_origin() {
        let p = ParametricSurface::heart().position_at(0.0, 0.0).unwrap();
        assert!(p.iter().all(|c| c.is_finite()));
        assert_relative_eq!(p, Vector3::new(0.0, 8.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn partials_at_u_zero() {
        let derivation = ParametricSurface::heart().derive();
        let v: f64 = 0.7;
        let (r_u, r_v) = derivation.partials_at(0.0, v).unwrap();
        assert_relative_eq!(r_u, Vector3::new(3.0 * v.sin(), 0.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(r_v, Vector3::new(0.0, -8.0 * v.sin(), 7.0 * v.cos()), epsilon = 1e-12);
    }

    #[test]
    fn normal_at_equator() {
        let derivation = ParametricSurface::heart().derive();
        let n = derivation.normal_at(0.0, FRAC_PI_2).unwrap();
        assert_relative_eq!(n, Vector3::new(0.0, 0.0, -1.0), epsilon = 1e-12);
    }

    #[test]
    fn normal_has_unit_length() {
        let derivation = ParametricSurface::heart().derive();
        for (u, v) in sample_points(25) {
            if derivation.raw_normal_at(u, v).unwrap().norm() < 1e-9 {
                continue;
            }
            let n = derivation.normal_at(u, v).unwrap();
            assert_relative_eq!(n.norm(), 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn normal_is_orthogonal_to_partials() {
        let derivation = ParametricSurface::heart().derive();
        for (u, v) in sample_points(25) {
            let (r_u, r_v) = derivation.partials_at(u, v).unwrap();
            let n = derivation.normal_at(u, v).unwrap();
            assert!(n.dot(&r_u).abs() < 1e-9 * (1.0 + r_u.norm()));
            assert!(n.dot(&r_v).abs() < 1e-9 * (1.0 + r_v.norm()));
        }
    }

    #[test]
    fn normal_agrees_with_raw_cross_product() {
        let derivation = ParametricSurface::heart().derive();
        for (u, v) in sample_points(10) {
            let (r_u, r_v) = derivation.partials_at(u, v).unwrap();
            let expected = r_u.cross(&r_v).normalize();
            let n = derivation.normal_at(u, v).unwrap();
            assert_relative_eq!(n, expected, epsilon = 1e-9);
        }
    }

    #[test]
    fn normal_is_degenerate_at_poles() {
        let derivation = ParametricSurface::heart().derive();
        let n = derivation.normal_at(0.3, 0.0).unwrap();
        assert!(n.iter().any(|c| c.is_nan()));
    }

    #[test]
    fn derivation_is_deterministic() {
        let surface = ParametricSurface::heart();
        assert_eq!(surface.derive(), surface.derive());
    }

    #[test]
    fn sample_space_mapping() {
        let domain = ParameterDomain::default();
        let (u, v) = domain.to_sample_space(0.5, 1.0);
        assert_relative_eq!(u, PI);
        assert_relative_eq!(v, PI);
        assert!(domain.contains(u, v));
        assert!(!domain.contains(-0.1, 1.0));
    }

    #[test]
    fn grid_has_requested_shape() {
        let grid = ParametricSurface::heart().sample_grid(6, 4).unwrap();
        assert_eq!(grid.len(), 6);
        assert!(grid.iter().all(|row| row.len() == 4));
        // v = 0 row collapses to the top point
        assert_relative_eq!(grid[3][0], Vector3::new(0.0, 8.0, 0.0), epsilon = 1e-12);
    }
}
