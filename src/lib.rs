// Copyright (c)  by Gleb E. Zaslavkiy
//MIT License
#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
pub mod Utils;
pub mod codegen;
pub mod config;
pub mod surface;
pub mod symbolic;

use crate::Utils::plots::SurfacePlotter;
use crate::codegen::{CCodeGen, Routine};
use crate::config::RunConfig;
use crate::surface::ParametricSurface;
use log::info;
use std::error::Error;
use std::path::PathBuf;

/// Derives the heart surface and its unit normal, writes the generated C
/// pair into `config.output_dir` and, if `config.plot` is set, hands the
/// surface to `plotter`.
///
/// Returns the paths of the written files.
pub fn run(
    config: &RunConfig,
    plotter: &dyn SurfacePlotter,
) -> Result<Vec<PathBuf>, Box<dyn Error>> {
    let surface = ParametricSurface::heart();
    info!("deriving unit normal of the heart surface");
    let derivation = surface.derive();

    let (u, v) = (derivation.parameters.0.as_str(), derivation.parameters.1.as_str());
    let routines = vec![
        Routine::new("surface", &[u, v], derivation.position.clone())?,
        Routine::new("normal", &[u, v], derivation.normal.clone())?,
    ];
    let generator = CCodeGen::new(&config.project, &config.prefix, routines)?;
    let paths = generator.write_files(&config.output_dir)?;

    if config.plot {
        info!("plotting surface");
        plotter.plot(&surface)?;
    }
    info!("done");
    Ok(paths)
}
