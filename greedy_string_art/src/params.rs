use serde::{Deserialize, Serialize};

use crate::{error::Result, Error};

/// Minimum iteration count accepted for a run.
pub const MIN_ITERATIONS: usize = 25;

const FIELDS: [&str; 8] = [
    "resolution",
    "iterations",
    "nail_count",
    "string_width",
    "string_strength",
    "mode",
    "color_change_interval",
    "exclusion",
];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// A single luma plane, drawn with black thread.
    #[default]
    Monochrome,
    /// Red, green and blue planes, one active at a time.
    Rgb,
}

impl Mode {
    pub fn plane_count(self) -> usize {
        match self {
            Mode::Monochrome => 1,
            Mode::Rgb => 3,
        }
    }
}

/// Which nails a scan refuses to pick next.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExclusionRule {
    /// Skip the nail the thread is on and the one it just came from.
    #[default]
    Nail,
    /// Also skip every nail sharing an x or a y coordinate with either of them.
    SharedCoordinate,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    /// Side in pixels of the square the image is resampled to.
    pub resolution: u32,
    pub iterations: usize,
    pub nail_count: usize,
    /// Stroke width of the rendered preview. Does not affect the computation.
    pub string_width: f64,
    /// Darkness removed from a fully covered cell by one chord.
    pub string_strength: f64,
    pub mode: Mode,
    /// Iterations between two colour changes, RGB mode only.
    pub color_change_interval: Option<usize>,
    pub exclusion: ExclusionRule,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            resolution: 300,
            iterations: 5000,
            nail_count: 300,
            string_width: 0.15,
            string_strength: 0.1,
            mode: Mode::Monochrome,
            color_change_interval: None,
            exclusion: ExclusionRule::Nail,
        }
    }
}

impl Params {
    /// Parses a partial configuration, missing fields keep their defaults.
    /// A value of the wrong type is reported against its parameter.
    pub fn from_json(json: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)
            .map_err(|err| Error::configuration("config", err, "is not valid JSON"))?;
        Self::deserialize(&value).map_err(|err| {
            let parameter = FIELDS
                .into_iter()
                .find(|&field| {
                    value.get(field).is_some_and(|v| {
                        let single = serde_json::Map::from_iter([(field.to_owned(), v.clone())]);
                        Self::deserialize(&serde_json::Value::Object(single)).is_err()
                    })
                })
                .unwrap_or("config");
            Error::configuration(parameter, err, "has the wrong type")
        })
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Interval used when none was given explicitly.
    pub fn default_color_change_interval(&self) -> usize {
        self.iterations / MIN_ITERATIONS
    }

    pub fn validate(&self) -> Result<ValidParams> {
        if self.iterations < MIN_ITERATIONS {
            return Err(Error::configuration(
                "iterations",
                self.iterations,
                "must be at least 25",
            ));
        }
        if self.nail_count == 0 {
            return Err(Error::configuration(
                "nail_count",
                self.nail_count,
                "must be positive",
            ));
        }
        if self.resolution < 2 {
            return Err(Error::configuration(
                "resolution",
                self.resolution,
                "must be at least 2",
            ));
        }
        if !self.string_strength.is_finite() || self.string_strength <= 0.0 {
            return Err(Error::configuration(
                "string_strength",
                self.string_strength,
                "must be a positive number",
            ));
        }
        if !self.string_width.is_finite() || self.string_width <= 0.0 {
            return Err(Error::configuration(
                "string_width",
                self.string_width,
                "must be a positive number",
            ));
        }
        let color_change_interval = match self.mode {
            Mode::Monochrome => None,
            Mode::Rgb => {
                let interval = self
                    .color_change_interval
                    .unwrap_or_else(|| self.default_color_change_interval());
                if interval < 1 {
                    return Err(Error::configuration(
                        "color_change_interval",
                        interval,
                        "must be at least 1",
                    ));
                }
                Some(interval)
            }
        };
        Ok(ValidParams {
            params: Params {
                color_change_interval,
                ..self.clone()
            },
        })
    }
}

/// [`Params`] that passed [`Params::validate`]. In RGB mode the colour
/// change interval is always resolved.
#[derive(Clone, Debug, PartialEq)]
pub struct ValidParams {
    params: Params,
}

impl ValidParams {
    pub fn radius(&self) -> f64 {
        (self.params.resolution / 2) as f64 - 0.5
    }
}

impl std::ops::Deref for ValidParams {
    type Target = Params;

    fn deref(&self) -> &Self::Target {
        &self.params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rejected_parameter(params: Params) -> &'static str {
        match params.validate() {
            Err(Error::Configuration { parameter, .. }) => parameter,
            other => panic!("expected a configuration error, got {other:?}"),
        }
    }

    fn rejected_json(json: &str) -> &'static str {
        match Params::from_json(json) {
            Err(Error::Configuration { parameter, .. }) => parameter,
            other => panic!("expected a configuration error, got {other:?}"),
        }
    }

    #[test]
    fn defaults_are_valid() {
        let valid = Params::default().validate().unwrap();
        assert_eq!(valid.resolution, 300);
        assert_eq!(valid.iterations, 5000);
        assert_eq!(valid.nail_count, 300);
        assert_eq!(valid.radius(), 149.5);
        assert_eq!(valid.color_change_interval, None);
    }

    #[test]
    fn too_few_iterations() {
        let params = Params {
            iterations: 24,
            ..Default::default()
        };
        assert_eq!(rejected_parameter(params), "iterations");
        let params = Params {
            iterations: 25,
            ..Default::default()
        };
        assert!(params.validate().is_ok());
    }

    #[test]
    fn zero_nails() {
        let params = Params {
            nail_count: 0,
            ..Default::default()
        };
        assert_eq!(rejected_parameter(params), "nail_count");
    }

    #[test]
    fn non_positive_strength() {
        let params = Params {
            string_strength: f64::NAN,
            ..Default::default()
        };
        assert_eq!(rejected_parameter(params), "string_strength");
        let params = Params {
            string_strength: 0.0,
            ..Default::default()
        };
        assert_eq!(rejected_parameter(params), "string_strength");
    }

    #[test]
    fn rgb_interval_defaults_to_a_25th() {
        let params = Params {
            mode: Mode::Rgb,
            iterations: 300,
            ..Default::default()
        };
        assert_eq!(params.validate().unwrap().color_change_interval, Some(12));
    }

    #[test]
    fn rgb_interval_must_be_positive() {
        let params = Params {
            mode: Mode::Rgb,
            color_change_interval: Some(0),
            ..Default::default()
        };
        assert_eq!(rejected_parameter(params), "color_change_interval");
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let params = Params::from_json(r#"{ "nail_count": 120, "mode": "rgb" }"#).unwrap();
        assert_eq!(params.nail_count, 120);
        assert_eq!(params.mode, Mode::Rgb);
        assert_eq!(params.iterations, 5000);
        assert_eq!(Params::from_json(&params.to_json().unwrap()).unwrap(), params);
    }

    #[test]
    fn non_numeric_value_names_its_parameter() {
        match Params::from_json(r#"{ "nail_count": 120, "iterations": "many" }"#) {
            Err(Error::Configuration {
                parameter, value, ..
            }) => {
                assert_eq!(parameter, "iterations");
                assert!(value.contains("many"), "{value}");
            }
            other => panic!("expected a configuration error, got {other:?}"),
        }
        assert_eq!(rejected_json(r#"{ "mode": "sepia" }"#), "mode");
    }

    #[test]
    fn malformed_json() {
        assert_eq!(rejected_json("{ \"iterations\": "), "config");
        assert_eq!(rejected_json(r#""not an object""#), "config");
    }
}
