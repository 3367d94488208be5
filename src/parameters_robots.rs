//! Hardcoded DH parameters for a few robots

pub mod dh_kinematics {
    use crate::parameters::dh_kinematics::{DhLink, DhParameters};
    use std::f64::consts::FRAC_PI_2;

    #[allow(dead_code)]
    impl DhParameters {
        /// All links zero: every joint rotates about the same z axis through the origin.
        pub fn zero() -> Self {
            DhParameters::from_known_links([DhLink::default(); 6])
        }

        /// Epson VT6 six axis arm, meters.
        pub fn epson_vt6() -> Self {
            DhParameters::from_known_links([
                DhLink::from_degrees(-90.0, 0.100, 0.412, -90.0),
                DhLink::from_degrees(-90.0, 0.420, 0.000, -90.0),
                DhLink::from_degrees(-90.0, 0.000, 0.000, 0.0),
                DhLink::from_degrees(-90.0, 0.000, 0.400, 90.0),
                DhLink::from_degrees(-90.0, 0.000, 0.000, -90.0),
                DhLink::from_degrees(0.0, 0.000, 0.080, 0.0),
            ])
        }

        /// Alternative Epson VT6 dataset. Not the same arm as [`DhParameters::epson_vt6`]:
        /// it has no shoulder offset (`a1 = 0`) and other twists and joint offsets.
        pub fn epson_vt6_alternative() -> Self {
            DhParameters::from_known_links([
                DhLink::from_degrees(-90.0, 0.000, 0.412, 90.0),
                DhLink::from_degrees(0.0, 0.420, 0.000, -90.0),
                DhLink::from_degrees(-90.0, 0.000, 0.000, 0.0),
                DhLink::from_degrees(-90.0, 0.000, 0.400, 180.0),
                DhLink::from_degrees(-90.0, 0.000, 0.000, 180.0),
                DhLink::from_degrees(180.0, 0.000, 0.080, 180.0),
            ])
        }

        /// Textbook elbow manipulator with a spherical wrist: 0.5 m column,
        /// two 0.5 m arm links, 0.5 m wrist offset.
        pub fn elbow_manipulator() -> Self {
            DhParameters::from_known_links([
                DhLink::new(-FRAC_PI_2, 0.0, 0.5, 0.0),
                DhLink::new(0.0, 0.5, 0.0, FRAC_PI_2),
                DhLink::new(0.0, 0.5, 0.0, 0.0),
                DhLink::new(FRAC_PI_2, 0.0, 0.0, 0.0),
                DhLink::new(-FRAC_PI_2, 0.0, 0.5, 0.0),
                DhLink::new(0.0, 0.0, 0.0, 0.0),
            ])
        }

        /// Arm whose joints 2 to 6 all turn about parallel horizontal axes: a 0.257 m
        /// column, then links of 0.247, 0.426, 0.082, 0.304 and 0.067 m in the vertical
        /// plane selected by joint 1. Joint angles of 2 to 6 add up to the elevation of
        /// the last link.
        pub fn planar_six_link() -> Self {
            DhParameters::from_known_links([
                DhLink::new(FRAC_PI_2, 0.0, 0.257, 0.0),
                DhLink::new(0.0, 0.247, 0.0, 0.0),
                DhLink::new(0.0, 0.426, 0.0, 0.0),
                DhLink::new(0.0, 0.082, 0.0, 0.0),
                DhLink::new(0.0, 0.304, 0.0, 0.0),
                DhLink::new(0.0, 0.067, 0.0, 0.0),
            ])
        }

        /// Looks up a bundled robot by name, as used on the command line.
        pub fn by_name(name: &str) -> Option<Self> {
            match name {
                "zero" => Some(Self::zero()),
                "epson_vt6" => Some(Self::epson_vt6()),
                "epson_vt6_alternative" => Some(Self::epson_vt6_alternative()),
                "elbow_manipulator" => Some(Self::elbow_manipulator()),
                "planar_six_link" => Some(Self::planar_six_link()),
                _ => None,
            }
        }

        /// Names accepted by `by_name`.
        pub const NAMES: [&'static str; 5] =
            ["zero", "epson_vt6", "epson_vt6_alternative", "elbow_manipulator", "planar_six_link"];
    }
}
