use std::ops::Range;

use base::defs::{Error, ErrorKind::*, Result};

use crate::misc::{Color, Frame};
use crate::ramp::ColorRamp;
use crate::visibility::MAX_MARGIN;

// A camera and the frames [start, end) to sample through it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CameraShot {
    pub camera: String,
    pub start: Frame,
    pub end: Frame,
}

impl CameraShot {
    pub fn new(camera: &str, start: Frame, end: Frame) -> Result<Self> {
        if start > end {
            let desc = format!(
                "shot of camera '{}' starts at {} after its end {}",
                camera, start, end
            );
            return Err(Error::new(MalformedData, desc));
        }
        Ok(Self {
            camera: camera.to_string(),
            start,
            end,
        })
    }

    // Builds a shot from the inclusive range shown to users.
    pub fn from_inclusive(
        camera: &str,
        first: Frame,
        last: Frame,
    ) -> Result<Self> {
        if first > last {
            let desc = format!(
                "shot of camera '{}' starts at {} after its last frame {}",
                camera, first, last
            );
            return Err(Error::new(MalformedData, desc));
        }
        Self::new(camera, first, last + 1)
    }

    // An empty range collapses to a single frame sample at `start`.
    pub fn frames(&self) -> Range<Frame> {
        if self.start == self.end {
            self.start..self.start + 1
        } else {
            self.start..self.end
        }
    }

    pub fn num_frames(&self) -> usize {
        let frames = self.frames();
        (frames.end - frames.start) as usize
    }
}

pub fn total_frames(shots: &[CameraShot]) -> usize {
    shots.iter().map(CameraShot::num_frames).sum()
}

// Everything one painting run needs.
#[derive(Clone, Debug, PartialEq)]
pub struct ScanRequest {
    pub target: String,
    pub shots: Vec<CameraShot>,
    pub margin: usize,
    pub ramp: ColorRamp,
    pub unseen_color: Option<Color>,
}

impl ScanRequest {
    pub fn builder(target: &str) -> ScanRequestBuilder {
        ScanRequestBuilder::new(target)
    }
}

pub struct ScanRequestBuilder {
    target: String,
    shots: Vec<CameraShot>,
    margin: usize,
    ramp: ColorRamp,
    unseen_color: Option<Color>,
}

impl ScanRequestBuilder {
    pub fn new(target: &str) -> Self {
        Self {
            target: target.to_string(),
            shots: Vec::new(),
            margin: 0,
            ramp: ColorRamp::default(),
            unseen_color: None,
        }
    }

    pub fn shot(mut self, shot: CameraShot) -> Self {
        self.shots.push(shot);
        self
    }

    pub fn shots<I>(mut self, shots: I) -> Self
    where
        I: IntoIterator<Item = CameraShot>,
    {
        self.shots.extend(shots);
        self
    }

    pub fn margin(mut self, margin: usize) -> Self {
        self.margin = margin;
        self
    }

    pub fn ramp(mut self, ramp: ColorRamp) -> Self {
        self.ramp = ramp;
        self
    }

    pub fn unseen_color(mut self, color: Option<Color>) -> Self {
        self.unseen_color = color;
        self
    }

    pub fn build(self) -> Result<ScanRequest> {
        if self.target.is_empty() {
            let desc = "no target mesh specified".to_string();
            return Err(Error::new(InvalidTarget, desc));
        }
        if self.shots.is_empty() {
            let desc = format!("no shots to scan '{}' with", self.target);
            return Err(Error::new(NoShots, desc));
        }
        if self.margin > MAX_MARGIN {
            let desc = format!(
                "vertex margin {} is out of [0, {}]",
                self.margin, MAX_MARGIN
            );
            return Err(Error::new(MalformedData, desc));
        }
        Ok(ScanRequest {
            target: self.target,
            shots: self.shots,
            margin: self.margin,
            ramp: self.ramp,
            unseen_color: self.unseen_color,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn shots(ranges: &[[Frame; 2]]) -> Vec<CameraShot> {
        ranges
            .iter()
            .map(|r| CameraShot::new("cam", r[0], r[1]).unwrap())
            .collect()
    }

    #[test]
    fn test_total_frames() {
        assert_eq!(total_frames(&shots(&[[10, 20], [5, 8]])), 13);
        assert_eq!(total_frames(&shots(&[[100, 150]])), 50);
        assert_eq!(total_frames(&shots(&[[1, 2], [3, 5], [7, 10]])), 6);
    }

    #[test]
    fn test_shot_ranges() {
        let shot = CameraShot::from_inclusive("cam", 1, 24).unwrap();
        assert_eq!(shot.frames(), 1..25);
        assert_eq!(shot.num_frames(), 24);

        let single = CameraShot::new("cam", 7, 7).unwrap();
        assert_eq!(single.frames(), 7..8);
        assert_eq!(single.num_frames(), 1);

        assert_eq!(
            CameraShot::new("cam", 8, 7).unwrap_err().kind,
            MalformedData
        );
        assert!(CameraShot::from_inclusive("cam", 8, 7).is_err());
    }

    #[test]
    fn test_builder_validation() {
        let shot = CameraShot::new("cam", 1, 10).unwrap();

        let err = ScanRequest::builder("body").build().unwrap_err();
        assert_eq!(err.kind, NoShots);

        let err = ScanRequest::builder("").shot(shot.clone()).build();
        assert_eq!(err.unwrap_err().kind, InvalidTarget);

        let err = ScanRequest::builder("body")
            .shot(shot.clone())
            .margin(MAX_MARGIN + 1)
            .build();
        assert_eq!(err.unwrap_err().kind, MalformedData);

        let request = ScanRequest::builder("body")
            .shots(vec![shot.clone(), shot])
            .margin(2)
            .build()
            .unwrap();
        assert_eq!(request.shots.len(), 2);
        assert_eq!(request.margin, 2);
        assert_eq!(request.ramp, ColorRamp::default());
        assert_eq!(request.unseen_color, None);
    }
}
