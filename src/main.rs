#![allow(non_snake_case)]
use RustedSurface::Utils::logger::init_logger;
use RustedSurface::Utils::plots::{GnuplotPlotter, PngPlotter, SurfacePlotter};
use RustedSurface::config::{PlotBackend, RunConfig};
use RustedSurface::run;
use log::info;
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let config = RunConfig::from_env();
    init_logger(&config)?;
    info!("plot: {}, backend: {}", config.plot, config.plot_backend);

    let plotter: Box<dyn SurfacePlotter> = match config.plot_backend {
        PlotBackend::Gnuplot => Box::new(GnuplotPlotter::default()),
        PlotBackend::Png => Box::new(PngPlotter::new(config.output_dir.join("heart_surface.png"))),
    };
    let paths = run(&config, plotter.as_ref())?;
    for path in paths {
        println!("{}", path.display());
    }
    Ok(())
}
