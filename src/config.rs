use simplelog::LevelFilter;
use std::env;
use std::path::{Path, PathBuf};
use strum_macros::{Display, EnumIter};

/// environment variable switching the plot on; any value, even empty, counts
pub const PLOT_ENV_VAR: &str = "PLOT";

/// Which plotter draws the surface when plotting is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
pub enum PlotBackend {
    /// interactive 3D wireframe in a gnuplot window
    Gnuplot,
    /// static PNG rendered with plotters into the output directory
    Png,
}

/// Everything a run depends on. Built once, then passed down explicitly.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub plot: bool,
    pub plot_backend: PlotBackend,
    /// file stem of the generated `.c`/`.h` pair
    pub prefix: String,
    /// project name written into the banner and the include guard
    pub project: String,
    pub output_dir: PathBuf,
    pub log_level: LevelFilter,
    pub log_to_file: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            plot: false,
            plot_backend: PlotBackend::Gnuplot,
            prefix: "surface".to_string(),
            project: "renderer".to_string(),
            output_dir: PathBuf::from("."),
            log_level: LevelFilter::Info,
            log_to_file: false,
        }
    }
}

impl RunConfig {
    /// Defaults, with `plot` taken from the presence of `PLOT`.
    pub fn from_env() -> Self {
        Self::default().with_plot(env::var_os(PLOT_ENV_VAR).is_some())
    }

    pub fn with_plot(mut self, plot: bool) -> Self {
        self.plot = plot;
        self
    }

    pub fn with_plot_backend(mut self, backend: PlotBackend) -> Self {
        self.plot_backend = backend;
        self
    }

    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.prefix = prefix.to_string();
        self
    }

    pub fn with_project(mut self, project: &str) -> Self {
        self.project = project.to_string();
        self
    }

    pub fn with_output_dir(mut self, dir: &Path) -> Self {
        self.output_dir = dir.to_path_buf();
        self
    }

    pub fn with_log_level(mut self, level: LevelFilter) -> Self {
        self.log_level = level;
        self
    }

    pub fn with_log_to_file(mut self, log_to_file: bool) -> Self {
        self.log_to_file = log_to_file;
        self
    }
}
