//! Supports extracting DH parameters from YAML file (optional)

use std::path::Path;

use tracing::debug;
use yaml_rust2::{Yaml, YamlLoader};

use crate::parameter_error::ParameterError;
use crate::parameters::dh_kinematics::{DhLink, DhParameters, JOINT_COUNT};

impl DhParameters {
    /// Read the robot configuration from YAML file. YAML file like this is supported:
    /// ```yaml
    /// # Epson VT6
    /// dh_parameters:
    ///   - { alpha: deg(-90), a: 0.1, d: 0.412, theta_offset: deg(-90) }
    ///   - { alpha: deg(-90), a: 0.42, d: 0, theta_offset: deg(-90) }
    ///   - { alpha: deg(-90), a: 0, d: 0, theta_offset: 0 }
    ///   - { alpha: deg(-90), a: 0, d: 0.4, theta_offset: deg(90) }
    ///   - { alpha: deg(-90), a: 0, d: 0, theta_offset: deg(-90) }
    ///   - { alpha: 0, a: 0, d: 0.08, theta_offset: 0 }
    /// ```
    /// Angles are in radians unless written as deg(angle). `theta_offset` is optional
    /// and defaults to 0. Exactly six links, base first, are required.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, ParameterError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Reading DH parameters");
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Same as `from_yaml_file` but takes the YAML text.
    pub fn from_yaml_str(contents: &str) -> Result<Self, ParameterError> {
        let docs = YamlLoader::load_from_str(contents)
            .map_err(|e| ParameterError::ParseError(e.to_string()))?;
        let doc = docs.first()
            .ok_or_else(|| ParameterError::ParseError("empty YAML document".to_string()))?;

        let entries = match &doc["dh_parameters"] {
            Yaml::Array(entries) => entries,
            Yaml::BadValue => return Err(ParameterError::MissingField("dh_parameters".to_string())),
            _ => return Err(ParameterError::ParseError("dh_parameters must be a list".to_string())),
        };
        if entries.len() != JOINT_COUNT {
            return Err(ParameterError::InvalidLength { expected: JOINT_COUNT, found: entries.len() });
        }

        let mut links = [DhLink::default(); JOINT_COUNT];
        for (i, entry) in entries.iter().enumerate() {
            links[i] = DhLink {
                alpha: parse_angle(&entry["alpha"], i, "alpha")?,
                a: parse_length(&entry["a"], i, "a")?,
                d: parse_length(&entry["d"], i, "d")?,
                theta_offset: match &entry["theta_offset"] {
                    Yaml::BadValue | Yaml::Null => 0.0,
                    value => parse_angle(value, i, "theta_offset")?,
                },
            };
        }
        DhParameters::new(links)
    }
}

fn field_name(joint: usize, field: &str) -> String {
    format!("dh_parameters[{}].{}", joint, field)
}

fn parse_number(value: &Yaml) -> Option<f64> {
    match value {
        Yaml::Real(_) => value.as_f64(),
        Yaml::Integer(i) => Some(*i as f64),
        _ => None,
    }
}

fn parse_length(value: &Yaml, joint: usize, field: &str) -> Result<f64, ParameterError> {
    match value {
        Yaml::BadValue => Err(ParameterError::MissingField(field_name(joint, field))),
        _ => parse_number(value).ok_or_else(|| {
            ParameterError::ParseError(format!("{} must be a number (got {:?})", field_name(joint, field), value))
        }),
    }
}

/// Angle in radians, or in degrees when written as `deg(x)`.
fn parse_angle(value: &Yaml, joint: usize, field: &str) -> Result<f64, ParameterError> {
    if let Yaml::BadValue = value {
        return Err(ParameterError::MissingField(field_name(joint, field)));
    }
    if let Some(radians) = parse_number(value) {
        return Ok(radians);
    }
    let wrong = || ParameterError::WrongAngle(format!("{}: {:?}", field_name(joint, field), value));
    let text = value.as_str().ok_or_else(wrong)?.trim();
    let degrees = text.strip_prefix("deg(")
        .and_then(|rest| rest.strip_suffix(')'))
        .ok_or_else(wrong)?;
    degrees.trim().parse::<f64>()
        .map(f64::to_radians)
        .map_err(|_| wrong())
}
