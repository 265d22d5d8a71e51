use std::path::PathBuf;
use std::str::FromStr;

use argh::FromArgs;
use config::constants::{
    DEFAULT_H_FOV_DEG, DEFAULT_MAX_DISTANCE, DEFAULT_POINT_SPACING, DEFAULT_RESULTS_FILE,
    DEFAULT_SEED, DEFAULT_V_FOV_DEG, MAX_SAMPLES, RAY_SELF_HIT_EPSILON,
};
use config::{AnalysisSettings, ConfigError};
use glam::DVec3;
use los_analysis::{AnalysisError, ExecutionMode, FovMode, Observer};

/// Line-of-sight visibility of a target surface from a fixed viewpoint
#[derive(Debug, Clone, FromArgs)]
pub struct CLIOptions {
    /// verbose level: off, error, warn, info, debug, trace
    #[argh(option)]
    pub verbose: Option<log::LevelFilter>,
    /// target surface mesh (.stl or .obj)
    #[argh(option)]
    pub target: PathBuf,
    /// occluding environment mesh, may be repeated
    #[argh(option)]
    pub environment: Vec<PathBuf>,
    /// observer position as x,y,z
    #[argh(option)]
    pub observer: Vec3Arg,
    /// viewing direction as x,y,z
    #[argh(option)]
    pub forward: Option<Vec3Arg>,
    /// point to look at as x,y,z, instead of --forward
    #[argh(option)]
    pub look_at: Option<Vec3Arg>,
    /// world up direction as x,y,z (default 0,0,1)
    #[argh(option)]
    pub up: Option<Vec3Arg>,
    /// horizontal field of view, full angle in degrees
    #[argh(option, default = "DEFAULT_H_FOV_DEG")]
    pub h_fov: f64,
    /// vertical field of view, full angle in degrees
    #[argh(option, default = "DEFAULT_V_FOV_DEG")]
    pub v_fov: f64,
    /// bound horizontal and vertical angles separately instead of a cone
    #[argh(switch)]
    pub rectangular_fov: bool,
    /// maximum viewing distance
    #[argh(option, default = "DEFAULT_MAX_DISTANCE")]
    pub max_distance: f64,
    /// average spacing between sample points
    #[argh(option, default = "DEFAULT_POINT_SPACING")]
    pub spacing: f64,
    /// distance by which occlusion rays stop short of the sample
    #[argh(option, default = "RAY_SELF_HIT_EPSILON")]
    pub ray_epsilon: f64,
    /// upper bound on the number of samples
    #[argh(option, default = "MAX_SAMPLES")]
    pub max_samples: usize,
    /// seed of the sampling generator
    #[argh(option, default = "DEFAULT_SEED")]
    pub seed: u64,
    /// classify samples on all cores
    #[argh(switch)]
    pub parallel: bool,
    /// per-sample results table
    #[argh(option, default = "PathBuf::from(DEFAULT_RESULTS_FILE)")]
    pub output: PathBuf,
    /// per-triangle categories table
    #[argh(option)]
    pub categories: Option<PathBuf>,
    /// target mesh colored by category, as ASCII PLY
    #[argh(option)]
    pub ply: Option<PathBuf>,
    /// summary counts as JSON
    #[argh(option)]
    pub summary: Option<PathBuf>,
}

impl CLIOptions {
    pub fn settings(&self) -> Result<AnalysisSettings, ConfigError> {
        AnalysisSettings::new(
            self.spacing,
            self.max_distance,
            self.ray_epsilon,
            self.max_samples,
        )
    }

    pub fn observer(&self) -> los_analysis::Result<Observer> {
        let position = self.observer.0;
        let observer = match (self.forward, self.look_at) {
            (Some(forward), None) => Observer::new(position, forward.0)?,
            (None, Some(target)) => Observer::look_at(position, target.0)?,
            (Some(_), Some(_)) => {
                return Err(AnalysisError::invalid_observer(
                    "--forward and --look-at are mutually exclusive",
                ))
            }
            (None, None) => {
                return Err(AnalysisError::invalid_observer(
                    "either --forward or --look-at is required",
                ))
            }
        };

        let observer = match self.up {
            Some(up) => observer.with_up(up.0)?,
            None => observer,
        };
        let mode = if self.rectangular_fov {
            FovMode::Rectangular
        } else {
            FovMode::Cone
        };
        Ok(observer
            .with_fov_degrees(self.h_fov, self.v_fov)?
            .with_fov_mode(mode))
    }

    pub fn execution_mode(&self) -> ExecutionMode {
        if self.parallel {
            ExecutionMode::Parallel
        } else {
            ExecutionMode::Sequential
        }
    }
}

/// A 3-vector given on the command line as `x,y,z`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vec3Arg(pub DVec3);

impl FromStr for Vec3Arg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = s
            .split(',')
            .map(|p| p.trim().parse::<f64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| format!("invalid vector {s:?}: {e}"))?;
        match parts[..] {
            [x, y, z] => Ok(Self(DVec3::new(x, y, z))),
            _ => Err(format!("expected x,y,z but got {} components", parts.len())),
        }
    }
}
