//! Partial-coherent lithography simulation and mask optimization.
//!
//! Predicts the printed image of a photolithography exposure from a mask
//! and optical parameters, and searches for a mask whose printed image
//! matches a target pattern.
//!
//! - **Optical model** ([`optics`]): coherent transfer function, circular
//!   source and pupil functions, and a transmission cross-coefficient
//!   (TCC) approximated as a 1D self-convolution.
//! - **Imaging simulator** ([`simulator`]): DFT-domain filtering of the mask,
//!   magnitude, sanitization, normalization and thresholding.
//! - **Fitness** ([`fitness`]): mean squared error between the binarized
//!   printed image and the target.
//! - **Genetic Algorithm** ([`ga`]): tournament selection, two-point
//!   crossover, flip mutation and a hall of fame, driven by [`GaConfig`].
//! - **Mask optimizer** ([`optimizer`]) and **pipeline** ([`pipeline`]):
//!   the complete initial-simulate / optimize / re-simulate run.
//!
//! Images are square [`ndarray`] matrices; I/O, image codecs and any user
//! interface are left to the caller.
//!
//! # Example
//!
//! ```
//! use u_litho::{Image, ImagingSimulator, Parameters};
//!
//! let params = Parameters::default().with_image_size(4).with_distance(0.0);
//! let simulator = ImagingSimulator::new(params).unwrap();
//!
//! let printed = simulator.simulate(&Image::ones((4, 4))).unwrap();
//! let binary = simulator.binarize(&printed, None);
//! assert!(printed.iter().all(|&v| (v - 1.0).abs() < 1e-9));
//! assert_eq!(binary, Image::ones((4, 4)));
//! ```

pub mod error;
pub mod fft;
pub mod fitness;
pub mod ga;
pub mod image;
pub mod optics;
pub mod optimizer;
pub mod params;
pub mod pipeline;
pub mod random;
pub mod simulator;

pub use error::{LithoError, Result};
pub use fitness::FitnessEvaluator;
pub use ga::{GaConfig, GenerationRecord};
pub use image::Image;
pub use optics::OpticalModel;
pub use optimizer::{MaskIndividual, MaskOptimizer, OptimizationResult};
pub use params::{Parameters, PARAMETER_NAMES};
pub use pipeline::{LithographyPipeline, Milestone, PipelineReport, ReportSummary};
pub use simulator::{ImagingSimulator, SimulationResult};
