//! Defines the DH parameter data structure

pub mod dh_kinematics {
    use crate::parameter_error::ParameterError;
    use crate::utils::deg;

    /// Number of joints in the chain.
    pub const JOINT_COUNT: usize = 6;

    /// Denavit-Hartenberg parameters of one joint. See [parameters_robots.rs](parameters_robots.rs)
    /// for examples of concrete robot models.
    ///
    /// Angles are stored in radians. The joint's local transform is
    /// `Rz(θ + theta_offset) · Tz(d) · Tx(a) · Rx(alpha)`.
    #[derive(Debug, Clone, Copy, PartialEq, Default)]
    pub struct DhLink {
        /// Link twist, rotation about the common normal (x axis), radians.
        pub alpha: f64,

        /// Link length along the common normal (x axis).
        pub a: f64,

        /// Link offset along the previous z axis.
        pub d: f64,

        /// Fixed offset added to the commanded joint angle, radians. Models a robot whose
        /// zero position differs from the DH zero.
        pub theta_offset: f64,
    }

    impl DhLink {
        pub const fn new(alpha: f64, a: f64, d: f64, theta_offset: f64) -> Self {
            DhLink { alpha, a, d, theta_offset }
        }

        /// Same as `new` but `alpha` and `theta_offset` are given in degrees.
        pub fn from_degrees(alpha: f64, a: f64, d: f64, theta_offset: f64) -> Self {
            DhLink::new(alpha.to_radians(), a, d, theta_offset.to_radians())
        }

        pub fn is_finite(&self) -> bool {
            self.alpha.is_finite() && self.a.is_finite() && self.d.is_finite()
                && self.theta_offset.is_finite()
        }
    }

    /// The complete chain of six links, ordered from the base to the tool flange.
    /// Joint `i` is expressed in the frame of joint `i - 1`, so the order matters.
    ///
    /// Instances can only be created through validating constructors, so a `DhParameters`
    /// always contains exactly six links with finite values.
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct DhParameters {
        links: [DhLink; JOINT_COUNT],
    }

    impl DhParameters {
        /// Validates and wraps six links.
        pub fn new(links: [DhLink; JOINT_COUNT]) -> Result<Self, ParameterError> {
            for (i, link) in links.iter().enumerate() {
                if !link.is_finite() {
                    return Err(ParameterError::InvalidInput(format!(
                        "DH parameters of joint {} must be finite (got {:?})", i + 1, link
                    )));
                }
            }
            Ok(DhParameters { links })
        }

        /// Validates and wraps a slice that must hold exactly six links.
        pub fn from_slice(links: &[DhLink]) -> Result<Self, ParameterError> {
            let links: [DhLink; JOINT_COUNT] = links.try_into().map_err(|_| {
                ParameterError::InvalidInput(format!(
                    "expected {} DH parameter records, found {}", JOINT_COUNT, links.len()
                ))
            })?;
            DhParameters::new(links)
        }

        /// For hardcoded robot models whose values are known to be finite.
        pub(crate) const fn from_known_links(links: [DhLink; JOINT_COUNT]) -> Self {
            DhParameters { links }
        }

        pub fn links(&self) -> &[DhLink; JOINT_COUNT] {
            &self.links
        }

        pub fn link(&self, joint: usize) -> &DhLink {
            &self.links[joint]
        }

        /// Upper bound on the distance from the base origin to any frame of the chain:
        /// the sum of all |a| and |d|.
        pub fn max_reach(&self) -> f64 {
            self.links.iter().map(|l| l.a.abs() + l.d.abs()).sum()
        }

        /// Convert to string yaml representation (quick viewing, etc).
        pub fn to_yaml(&self) -> String {
            let mut yaml = String::from("dh_parameters:\n");
            for link in &self.links {
                yaml.push_str(&format!(
                    "  - {{ alpha: {}, a: {}, d: {}, theta_offset: {} }}\n",
                    deg(&link.alpha), link.a, link.d, deg(&link.theta_offset)
                ));
            }
            yaml
        }
    }
}
