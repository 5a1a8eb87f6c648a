//! Visual inspection of a parametric surface.
//!
//! Two plotters sit behind [`SurfacePlotter`]: an interactive gnuplot window
//! showing u- and v-isolines as a wireframe, and a static PNG drawn with
//! plotters from filled quads.

use crate::surface::ParametricSurface;
use crate::symbolic::symbolic_lambdify::EvalError;
use gnuplot::{AxesCommon, Color, Figure};
use log::info;
use nalgebra::Vector3;
use std::fmt;
use std::path::PathBuf;

#[derive(Debug)]
pub enum PlotError {
    /// the surface could not be evaluated on the grid
    Sampling(EvalError),
    /// the backend failed to draw or to open its output
    Render(String),
}

impl fmt::Display for PlotError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PlotError::Sampling(err) => write!(f, "cannot sample surface: {}", err),
            PlotError::Render(msg) => write!(f, "plotting failed: {}", msg),
        }
    }
}

impl std::error::Error for PlotError {}

impl From<EvalError> for PlotError {
    fn from(err: EvalError) -> Self {
        PlotError::Sampling(err)
    }
}

fn render_error<E: fmt::Display>(err: E) -> PlotError {
    PlotError::Render(err.to_string())
}

pub trait SurfacePlotter {
    fn plot(&self, surface: &ParametricSurface) -> Result<(), PlotError>;
}

/// Interactive wireframe in a gnuplot window.
#[derive(Debug, Clone)]
pub struct GnuplotPlotter {
    pub grid: (usize, usize),
}

impl Default for GnuplotPlotter {
    fn default() -> Self {
        Self { grid: (48, 24) }
    }
}

/// x, y and z columns of a polyline
fn coordinates<'a>(points: impl Iterator<Item = &'a Vector3<f64>>) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
    let mut xs = Vec::new();
    let mut ys = Vec::new();
    let mut zs = Vec::new();
    for p in points {
        xs.push(p.x);
        ys.push(p.y);
        zs.push(p.z);
    }
    (xs, ys, zs)
}

impl SurfacePlotter for GnuplotPlotter {
    fn plot(&self, surface: &ParametricSurface) -> Result<(), PlotError> {
        let grid = surface.sample_grid(self.grid.0, self.grid.1)?;
        let mut fg = Figure::new();
        {
            let axes = fg
                .axes3d()
                .set_title("Heart surface", &[])
                .set_x_label("x", &[])
                .set_y_label("y", &[])
                .set_z_label("z", &[]);
            // v-isolines: one per sampled u
            for row in &grid {
                let (xs, ys, zs) = coordinates(row.iter());
                axes.lines(&xs, &ys, &zs, &[Color("blue".into())]);
            }
            // u-isolines: one per sampled v
            let nv = grid.first().map_or(0, |row| row.len());
            for j in 0..nv {
                let (xs, ys, zs) = coordinates(grid.iter().map(|row| &row[j]));
                axes.lines(&xs, &ys, &zs, &[Color("blue".into())]);
            }
        }
        info!("opening gnuplot window");
        fg.show().map_err(render_error)?;
        Ok(())
    }
}

/// Static PNG rendered with plotters.
#[derive(Debug, Clone)]
pub struct PngPlotter {
    pub path: PathBuf,
    pub resolution: (u32, u32),
    pub grid: (usize, usize),
}

impl PngPlotter {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            resolution: (800, 800),
            grid: (64, 32),
        }
    }
}

fn bounds(values: impl Iterator<Item = f64>) -> std::ops::Range<f64> {
    let (min, max) = values
        .filter(|x| x.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), x| (lo.min(x), hi.max(x)));
    if min > max {
        return -1.0..1.0;
    }
    let pad = 0.05 * (max - min).max(1e-9);
    (min - pad)..(max + pad)
}

impl SurfacePlotter for PngPlotter {
    fn plot(&self, surface: &ParametricSurface) -> Result<(), PlotError> {
        use plotters::prelude::*;

        let grid = surface.sample_grid(self.grid.0, self.grid.1)?;
        let points = || grid.iter().flatten();
        let x_range = bounds(points().map(|p| p.x));
        let y_range = bounds(points().map(|p| p.y));
        let z_range = bounds(points().map(|p| p.z));

        let root = BitMapBackend::new(&self.path, self.resolution).into_drawing_area();
        root.fill(&WHITE).map_err(render_error)?;

        let mut chart = ChartBuilder::on(&root)
            .caption("Heart surface", ("sans-serif", 30))
            .margin(10)
            .build_cartesian_3d(x_range, y_range, z_range)
            .map_err(render_error)?;
        chart.with_projection(|mut pb| {
            pb.yaw = 0.6;
            pb.pitch = 0.3;
            pb.scale = 0.9;
            pb.into_matrix()
        });
        chart.configure_axes().draw().map_err(render_error)?;

        let quads = grid.windows(2).flat_map(|rows| {
            (0..rows[0].len().saturating_sub(1)).map(move |j| {
                [rows[0][j], rows[1][j], rows[1][j + 1], rows[0][j + 1]]
                    .iter()
                    .map(|p| (p.x, p.y, p.z))
                    .collect::<Vec<_>>()
            })
        });
        chart
            .draw_series(quads.map(|quad| Polygon::new(quad, BLUE.mix(0.25).filled())))
            .map_err(render_error)?
            .label("r(u, v)")
            .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 20, y + 5)], BLUE.mix(0.25).filled()));
        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()
            .map_err(render_error)?;

        root.present().map_err(render_error)?;
        info!("surface plot saved to {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_are_padded() {
        let r = bounds([0.0, 10.0, f64::NAN].into_iter());
        assert!(r.start < 0.0 && r.end > 10.0);
        assert_eq!(bounds(std::iter::empty()), -1.0..1.0);
    }

    #[test]
    fn coordinates_split_columns() {
        let points = [Vector3::new(1.0, 2.0, 3.0), Vector3::new(4.0, 5.0, 6.0)];
        let (xs, ys, zs) = coordinates(points.iter());
        assert_eq!(xs, vec![1.0, 4.0]);
        assert_eq!(ys, vec![2.0, 5.0]);
        assert_eq!(zs, vec![3.0, 6.0]);
    }

    #[test]
    fn render_errors_carry_message() {
        let err = render_error("no display");
        assert_eq!(err.to_string(), "plotting failed: no display");
    }
}
