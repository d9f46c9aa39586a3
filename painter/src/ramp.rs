use std::str::FromStr;

use derive_more::Display;

use base::defs::{Error, ErrorKind::*, Result};

use crate::misc::{color, Color};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RampStop {
    pub position: f64,
    pub color: Color,
}

impl RampStop {
    pub fn new(position: f64, rgb: [f64; 3]) -> Self {
        Self {
            position,
            color: color(rgb),
        }
    }
}

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum Interpolation {
    #[display(fmt = "linear")]
    Linear,
    #[display(fmt = "smooth")]
    Smooth,
}

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum RampPreset {
    #[display(fmt = "Custom")]
    Custom,
    #[display(fmt = "Zbrush Remesh")]
    ZbrushRemesh,
    #[display(fmt = "Heat Map")]
    HeatMap,
}

impl RampPreset {
    pub const ALL: [RampPreset; 3] =
        [RampPreset::Custom, RampPreset::ZbrushRemesh, RampPreset::HeatMap];

    pub fn stops(self) -> Vec<RampStop> {
        match self {
            RampPreset::Custom => vec![
                RampStop::new(0.0, [1.0, 1.0, 1.0]),
                RampStop::new(1.0, [0.0, 0.0, 0.0]),
            ],
            RampPreset::ZbrushRemesh => vec![
                RampStop::new(0.0, [1.0, 0.0, 0.0]),
                RampStop::new(0.5, [1.0, 1.0, 1.0]),
                RampStop::new(1.0, [0.0, 0.0, 1.0]),
            ],
            RampPreset::HeatMap => vec![
                RampStop::new(0.0, [1.0, 1.0, 1.0]),
                RampStop::new(0.25, [0.976, 0.694, 0.016]),
                RampStop::new(0.5, [0.961, 0.329, 0.149]),
                RampStop::new(0.75, [0.533, 0.004, 0.710]),
                RampStop::new(1.0, [0.192, 0.024, 0.580]),
            ],
        }
    }
}

impl FromStr for RampPreset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_lowercase().replace('-', " ");
        RampPreset::ALL
            .iter()
            .find(|p| p.to_string().to_lowercase() == normalized)
            .cloned()
            .ok_or_else(|| {
                Error::new(
                    MalformedData,
                    format!(
                        concat!(
                            "unknown ramp preset '{}' ",
                            "(can be 'Custom', 'Zbrush Remesh' or 'Heat Map')"
                        ),
                        s
                    ),
                )
            })
    }
}

// Piecewise color function over [0, 1] defined by ordered control points.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorRamp {
    stops: Vec<RampStop>,
    interpolation: Interpolation,
}

impl ColorRamp {
    pub fn new(mut stops: Vec<RampStop>) -> Result<Self> {
        if stops.is_empty() {
            let desc = "color ramp needs at least one stop".to_string();
            return Err(Error::new(MalformedData, desc));
        }
        if let Some(s) = stops
            .iter()
            .find(|s| !(0.0..=1.0).contains(&s.position))
        {
            let desc =
                format!("ramp stop position {} is out of [0, 1]", s.position);
            return Err(Error::new(MalformedData, desc));
        }
        if let Some(s) = stops
            .iter()
            .find(|s| s.color.iter().any(|c| !c.is_finite()))
        {
            let desc = format!("ramp stop at {} has bad color", s.position);
            return Err(Error::new(MalformedData, desc));
        }

        // Stable, so coincident stops keep their given order.
        stops.sort_by(|p, q| p.position.total_cmp(&q.position));
        Ok(Self {
            stops,
            interpolation: Interpolation::Linear,
        })
    }

    pub fn from_preset(preset: RampPreset) -> Self {
        Self {
            stops: preset.stops(),
            interpolation: Interpolation::Linear,
        }
    }

    pub fn with_interpolation(mut self, interpolation: Interpolation) -> Self {
        self.interpolation = interpolation;
        self
    }

    pub fn stops(&self) -> &[RampStop] {
        &self.stops
    }

    pub fn interpolation(&self) -> Interpolation {
        self.interpolation
    }

    // The second coordinate is accepted for parity with 2D ramps and ignored.
    pub fn sample(&self, u: f64, _v: f64) -> Color {
        let first = self.stops[0];
        let last = self.stops[self.stops.len() - 1];
        if u.is_nan() || u <= first.position {
            return first.color;
        }
        if u >= last.position {
            return last.color;
        }

        let i = self.stops.partition_point(|s| s.position <= u);
        let (lo, hi) = (self.stops[i - 1], self.stops[i]);
        let mut t = (u - lo.position) / (hi.position - lo.position);
        if self.interpolation == Interpolation::Smooth {
            t = t * t * (3.0 - 2.0 * t);
        }
        (1.0 - t) * lo.color + t * hi.color
    }
}

impl Default for ColorRamp {
    fn default() -> Self {
        Self::from_preset(RampPreset::Custom)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    use base::assert_eq_f32;

    fn assert_eq_color(a: Color, b: [f64; 3]) {
        for k in 0..3 {
            assert_eq_f32!(a[k], b[k]);
        }
    }

    #[test]
    fn test_sample_white_to_black() {
        let ramp = ColorRamp::default();
        assert_eq_color(ramp.sample(0.0, 0.5), [1.0, 1.0, 1.0]);
        assert_eq_color(ramp.sample(0.5, 0.5), [0.5, 0.5, 0.5]);
        assert_eq_color(ramp.sample(1.0, 0.5), [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_sample_clamps_outside_stops() {
        let ramp = ColorRamp::new(vec![
            RampStop::new(0.75, [0.0, 0.0, 1.0]),
            RampStop::new(0.25, [1.0, 0.0, 0.0]),
        ])
        .unwrap();
        assert_eq!(ramp.stops()[0].position, 0.25);
        assert_eq_color(ramp.sample(0.0, 0.5), [1.0, 0.0, 0.0]);
        assert_eq_color(ramp.sample(0.5, 0.5), [0.5, 0.0, 0.5]);
        assert_eq_color(ramp.sample(1.0, 0.5), [0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_sample_smooth() {
        let ramp =
            ColorRamp::default().with_interpolation(Interpolation::Smooth);
        assert_eq_color(ramp.sample(0.5, 0.5), [0.5, 0.5, 0.5]);
        // smoothstep(0.25) = 0.15625
        assert_eq_color(ramp.sample(0.25, 0.5), [0.84375, 0.84375, 0.84375]);
    }

    #[test]
    fn test_presets() {
        let heat = ColorRamp::from_preset(RampPreset::HeatMap);
        assert_eq!(heat.stops().len(), 5);
        assert_eq_color(heat.sample(0.25, 0.5), [0.976, 0.694, 0.016]);
        assert_eq_color(heat.sample(1.0, 0.5), [0.192, 0.024, 0.580]);

        let zbrush = ColorRamp::from_preset(RampPreset::ZbrushRemesh);
        assert_eq_color(zbrush.sample(0.0, 0.5), [1.0, 0.0, 0.0]);
        assert_eq_color(zbrush.sample(0.5, 0.5), [1.0, 1.0, 1.0]);
        assert_eq_color(zbrush.sample(1.0, 0.5), [0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_parse_preset() {
        assert_eq!(
            "Heat Map".parse::<RampPreset>().unwrap(),
            RampPreset::HeatMap
        );
        assert_eq!(
            "zbrush-remesh".parse::<RampPreset>().unwrap(),
            RampPreset::ZbrushRemesh
        );
        assert_eq!("custom".parse::<RampPreset>().unwrap(), RampPreset::Custom);
        assert_eq!(
            "rainbow".parse::<RampPreset>().unwrap_err().kind,
            MalformedData
        );
    }

    #[test]
    fn test_new_rejects_bad_stops() {
        assert!(ColorRamp::new(vec![]).is_err());
        let outside = RampStop::new(1.5, [0.0, 0.0, 0.0]);
        assert!(ColorRamp::new(vec![outside]).is_err());
    }
}
