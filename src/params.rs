//! Simulation and optimization parameters.
//!
//! [`Parameters`] is the immutable record shared by the optical model, the
//! imaging simulator and the optimizer. Length-like quantities are in
//! nanometres.

use crate::error::{LithoError, Result};

/// Physical and evolutionary parameters of one run.
///
/// # Defaults
///
/// ```
/// use u_litho::Parameters;
///
/// let params = Parameters::default();
/// assert_eq!(params.wavelength, 405.0);
/// assert_eq!(params.image_size, 30);
/// assert_eq!(params.population_size, 50);
/// assert!(params.validate().is_ok());
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_litho::Parameters;
///
/// let params = Parameters::default()
///     .with_image_size(16)
///     .with_distance(0.0)
///     .with_generations(5);
/// assert_eq!(params.image_size, 16);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Parameters {
    /// Illumination wavelength λ (nm, > 0).
    pub wavelength: f64,

    /// Propagation distance z (nm).
    pub distance: f64,

    /// Pixel pitch of the mask and image grids (nm, > 0).
    pub pixel_size: f64,

    /// Side length of the square mask/image grid, in pixels.
    pub image_size: usize,

    /// Refractive index n of the propagation medium (> 0).
    pub refractive_index: f64,

    /// Partial-coherence factor σ (0–1).
    pub sigma: f64,

    /// Numerical aperture NA of the imaging system (> 0).
    pub numerical_aperture: f64,

    /// Number of individuals in the population.
    pub population_size: usize,

    /// Number of generations to run.
    pub generations: usize,

    /// Probability of applying two-point crossover to a pair (0–1).
    pub crossover_rate: f64,

    /// Probability of attempting mutation on an individual (0–1).
    pub mutation_rate: f64,
}

/// Names accepted by [`Parameters::from_pairs`], in declaration order.
pub const PARAMETER_NAMES: [&str; 11] = [
    "wavelength",
    "distance",
    "pixel_size",
    "image_size",
    "refractive_index",
    "sigma",
    "numerical_aperture",
    "population_size",
    "generations",
    "crossover_rate",
    "mutation_rate",
];

impl Default for Parameters {
    fn default() -> Self {
        Self {
            wavelength: 405.0,
            distance: 8.03e8,
            pixel_size: 7560.0,
            image_size: 30,
            refractive_index: 1.5,
            sigma: 0.5,
            numerical_aperture: 0.5,
            population_size: 50,
            generations: 20,
            crossover_rate: 0.4,
            mutation_rate: 0.4,
        }
    }
}

impl Parameters {
    /// Sets the wavelength (nm).
    pub fn with_wavelength(mut self, wavelength: f64) -> Self {
        self.wavelength = wavelength;
        self
    }

    /// Sets the propagation distance (nm).
    pub fn with_distance(mut self, distance: f64) -> Self {
        self.distance = distance;
        self
    }

    /// Sets the pixel size (nm).
    pub fn with_pixel_size(mut self, pixel_size: f64) -> Self {
        self.pixel_size = pixel_size;
        self
    }

    /// Sets the grid side length.
    pub fn with_image_size(mut self, n: usize) -> Self {
        self.image_size = n;
        self
    }

    /// Sets the refractive index.
    pub fn with_refractive_index(mut self, n: f64) -> Self {
        self.refractive_index = n;
        self
    }

    /// Sets the partial-coherence factor.
    pub fn with_sigma(mut self, sigma: f64) -> Self {
        self.sigma = sigma;
        self
    }

    /// Sets the numerical aperture.
    pub fn with_numerical_aperture(mut self, na: f64) -> Self {
        self.numerical_aperture = na;
        self
    }

    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the number of generations.
    pub fn with_generations(mut self, n: usize) -> Self {
        self.generations = n;
        self
    }

    /// Sets the crossover rate, clamped to `[0, 1]`.
    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the mutation rate, clamped to `[0, 1]`.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Number of pixels (and genes) in one mask.
    ///
    /// Only meaningful for validated parameters.
    pub fn pixel_count(&self) -> usize {
        self.image_size * self.image_size
    }

    /// Validates the parameters.
    ///
    /// Every scalar must be finite. Out-of-range optical values are
    /// rejected here; the optical model itself never fails.
    pub fn validate(&self) -> Result<()> {
        let scalars = [
            ("wavelength", self.wavelength),
            ("distance", self.distance),
            ("pixel_size", self.pixel_size),
            ("refractive_index", self.refractive_index),
            ("sigma", self.sigma),
            ("numerical_aperture", self.numerical_aperture),
            ("crossover_rate", self.crossover_rate),
            ("mutation_rate", self.mutation_rate),
        ];
        for (name, value) in scalars {
            if !value.is_finite() {
                return Err(LithoError::invalid(name, format!("{value} is not finite")));
            }
        }

        positive("wavelength", self.wavelength)?;
        positive("pixel_size", self.pixel_size)?;
        positive("refractive_index", self.refractive_index)?;
        positive("numerical_aperture", self.numerical_aperture)?;
        unit_interval("sigma", self.sigma)?;
        unit_interval("crossover_rate", self.crossover_rate)?;
        unit_interval("mutation_rate", self.mutation_rate)?;

        if self.image_size == 0 {
            return Err(LithoError::invalid("image_size", "must be at least 1"));
        }
        if self.image_size.checked_mul(self.image_size).is_none() {
            return Err(LithoError::invalid(
                "image_size",
                format!("{0}x{0} grid does not fit in memory", self.image_size),
            ));
        }
        if self.population_size == 0 {
            return Err(LithoError::invalid("population_size", "must be at least 1"));
        }
        Ok(())
    }

    /// Builds parameters from a name/value mapping.
    ///
    /// All eleven names in [`PARAMETER_NAMES`] are required and unknown
    /// names are rejected. A non-finite value is replaced by the default
    /// for that name (with a warning). Count-like fields are truncated to
    /// integers. The result is validated before it is returned.
    ///
    /// ```
    /// use u_litho::{Parameters, PARAMETER_NAMES};
    ///
    /// let defaults = Parameters::default();
    /// let mut pairs: Vec<(&str, f64)> = PARAMETER_NAMES
    ///     .iter()
    ///     .map(|&name| (name, defaults.get(name).unwrap()))
    ///     .collect();
    /// pairs[0].1 = f64::NAN; // wavelength falls back to its default
    ///
    /// let params = Parameters::from_pairs(pairs).unwrap();
    /// assert_eq!(params, defaults);
    /// ```
    pub fn from_pairs<'a, I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        let defaults = Parameters::default();
        let mut values: [Option<f64>; 11] = [None; 11];

        for (name, value) in pairs {
            let idx = PARAMETER_NAMES
                .iter()
                .position(|&known| known == name)
                .ok_or_else(|| LithoError::UnknownParameter {
                    name: name.to_string(),
                })?;
            let key = PARAMETER_NAMES[idx];
            let value = if value.is_finite() {
                value
            } else {
                let fallback = defaults.get(key).unwrap_or(1.0);
                log::warn!("parameter `{key}` has invalid value {value}, using default {fallback}");
                fallback
            };
            values[idx] = Some(value);
        }

        let take = |idx: usize| {
            values[idx].ok_or(LithoError::MissingParameter {
                name: PARAMETER_NAMES[idx],
            })
        };
        let count = |idx: usize| -> Result<usize> {
            let v = take(idx)?;
            if v < 0.0 {
                return Err(LithoError::invalid(
                    PARAMETER_NAMES[idx],
                    format!("{v} is negative"),
                ));
            }
            if v >= usize::MAX as f64 {
                return Err(LithoError::invalid(
                    PARAMETER_NAMES[idx],
                    format!("{v} is too large"),
                ));
            }
            Ok(v as usize)
        };

        let params = Parameters {
            wavelength: take(0)?,
            distance: take(1)?,
            pixel_size: take(2)?,
            image_size: count(3)?,
            refractive_index: take(4)?,
            sigma: take(5)?,
            numerical_aperture: take(6)?,
            population_size: count(7)?,
            generations: count(8)?,
            crossover_rate: take(9)?,
            mutation_rate: take(10)?,
        };
        params.validate()?;
        Ok(params)
    }

    /// Looks up a parameter by name, as a float.
    pub fn get(&self, name: &str) -> Option<f64> {
        let value = match name {
            "wavelength" => self.wavelength,
            "distance" => self.distance,
            "pixel_size" => self.pixel_size,
            "image_size" => self.image_size as f64,
            "refractive_index" => self.refractive_index,
            "sigma" => self.sigma,
            "numerical_aperture" => self.numerical_aperture,
            "population_size" => self.population_size as f64,
            "generations" => self.generations as f64,
            "crossover_rate" => self.crossover_rate,
            "mutation_rate" => self.mutation_rate,
            _ => return None,
        };
        Some(value)
    }
}

fn positive(name: &'static str, value: f64) -> Result<()> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(LithoError::invalid(name, format!("{value} must be positive")))
    }
}

fn unit_interval(name: &'static str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(LithoError::invalid(name, format!("{value} is outside [0, 1]")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_pairs() -> Vec<(&'static str, f64)> {
        let defaults = Parameters::default();
        PARAMETER_NAMES
            .iter()
            .map(|&name| (name, defaults.get(name).unwrap()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let p = Parameters::default();
        assert_eq!(p.wavelength, 405.0);
        assert_eq!(p.distance, 8.03e8);
        assert_eq!(p.pixel_size, 7560.0);
        assert_eq!(p.image_size, 30);
        assert_eq!(p.refractive_index, 1.5);
        assert_eq!(p.sigma, 0.5);
        assert_eq!(p.numerical_aperture, 0.5);
        assert_eq!(p.population_size, 50);
        assert_eq!(p.generations, 20);
        assert!((p.crossover_rate - 0.4).abs() < 1e-12);
        assert!((p.mutation_rate - 0.4).abs() < 1e-12);
        assert_eq!(p.pixel_count(), 900);
    }

    #[test]
    fn test_builder_pattern() {
        let p = Parameters::default()
            .with_wavelength(193.0)
            .with_distance(0.0)
            .with_pixel_size(100.0)
            .with_image_size(8)
            .with_refractive_index(1.0)
            .with_sigma(0.7)
            .with_numerical_aperture(0.9)
            .with_population_size(10)
            .with_generations(3)
            .with_crossover_rate(1.5)
            .with_mutation_rate(-1.0);

        assert_eq!(p.wavelength, 193.0);
        assert_eq!(p.image_size, 8);
        assert_eq!(p.population_size, 10);
        assert_eq!(p.generations, 3);
        assert_eq!(p.crossover_rate, 1.0);
        assert_eq!(p.mutation_rate, 0.0);
        assert!(p.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_non_finite() {
        let p = Parameters::default().with_distance(f64::INFINITY);
        let err = p.validate().unwrap_err();
        assert!(matches!(err, LithoError::InvalidParameter { name: "distance", .. }));
    }

    #[test]
    fn test_validate_ranges() {
        assert!(Parameters::default().with_wavelength(0.0).validate().is_err());
        assert!(Parameters::default().with_pixel_size(-1.0).validate().is_err());
        assert!(Parameters::default().with_sigma(1.2).validate().is_err());
        assert!(Parameters::default().with_numerical_aperture(0.0).validate().is_err());
        assert!(Parameters::default().with_image_size(0).validate().is_err());
        assert!(Parameters::default().with_population_size(0).validate().is_err());
        // zero generations is a valid (evaluation-only) run
        assert!(Parameters::default().with_generations(0).validate().is_ok());
    }

    #[test]
    fn test_from_pairs_roundtrip_defaults() {
        let p = Parameters::from_pairs(default_pairs()).unwrap();
        assert_eq!(p, Parameters::default());
    }

    #[test]
    fn test_from_pairs_substitutes_non_finite() {
        let mut pairs = default_pairs();
        pairs[5].1 = f64::NAN; // sigma
        pairs[3].1 = f64::INFINITY; // image_size
        let p = Parameters::from_pairs(pairs).unwrap();
        assert_eq!(p.sigma, 0.5);
        assert_eq!(p.image_size, 30);
    }

    #[test]
    fn test_from_pairs_truncates_counts() {
        let mut pairs = default_pairs();
        pairs[3].1 = 16.7;
        pairs[7].1 = 12.2;
        let p = Parameters::from_pairs(pairs).unwrap();
        assert_eq!(p.image_size, 16);
        assert_eq!(p.population_size, 12);
    }

    #[test]
    fn test_from_pairs_missing() {
        let pairs: Vec<_> = default_pairs()
            .into_iter()
            .filter(|(name, _)| *name != "generations")
            .collect();
        let err = Parameters::from_pairs(pairs).unwrap_err();
        assert_eq!(err, LithoError::MissingParameter { name: "generations" });
    }

    #[test]
    fn test_from_pairs_unknown() {
        let mut pairs = default_pairs();
        pairs.push(("focus", 1.0));
        let err = Parameters::from_pairs(pairs).unwrap_err();
        assert!(matches!(err, LithoError::UnknownParameter { .. }));
    }

    #[test]
    fn test_from_pairs_validates() {
        let mut pairs = default_pairs();
        pairs[6].1 = -0.5; // numerical_aperture
        assert!(Parameters::from_pairs(pairs).is_err());
    }

    #[test]
    fn test_from_pairs_rejects_oversized_counts() {
        let mut pairs = default_pairs();
        pairs[3].1 = 1e30; // image_size
        let err = Parameters::from_pairs(pairs).unwrap_err();
        assert!(matches!(err, LithoError::InvalidParameter { name: "image_size", .. }));
        assert!(err.is_configuration());

        let mut pairs = default_pairs();
        pairs[7].1 = 2f64.powi(64); // population_size
        let err = Parameters::from_pairs(pairs).unwrap_err();
        assert!(matches!(err, LithoError::InvalidParameter { name: "population_size", .. }));
    }

    #[test]
    fn test_from_pairs_rejects_overflowing_grid() {
        // representable as usize, but its square is not
        let mut pairs = default_pairs();
        pairs[3].1 = 2f64.powi(40);
        let err = Parameters::from_pairs(pairs).unwrap_err();
        assert!(matches!(err, LithoError::InvalidParameter { name: "image_size", .. }));
    }

    #[test]
    fn test_validate_rejects_overflowing_grid() {
        let err = Parameters::default()
            .with_image_size(usize::MAX)
            .validate()
            .unwrap_err();
        assert!(matches!(err, LithoError::InvalidParameter { name: "image_size", .. }));
        assert!(Parameters::default().with_image_size(1 << 12).validate().is_ok());
    }

    #[test]
    fn test_get_unknown() {
        assert!(Parameters::default().get("focus").is_none());
    }
}
