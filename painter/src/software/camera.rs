use nalgebra::Perspective3;

use base::defs::{Error, ErrorKind::*, Result};

use crate::misc::{Frame, Matrix4, Point3, ProjectedPoint, Vector2, Vector3};

const Z_NEAR: f64 = 0.01;
const Z_FAR: f64 = 1E4;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraKey {
    pub frame: Frame,
    pub eye: Point3,
    pub target: Point3,
    pub up: Vector3,
}

impl CameraKey {
    pub fn new(frame: Frame, eye: Point3, target: Point3) -> Self {
        Self {
            frame,
            eye,
            target,
            up: Vector3::y(),
        }
    }

    pub fn with_up(mut self, up: Vector3) -> Self {
        self.up = up;
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraPose {
    pub eye: Point3,
    pub target: Point3,
    pub up: Vector3,
}

impl CameraPose {
    pub fn view(&self) -> Matrix4 {
        Matrix4::look_at_rh(&self.eye, &self.target, &self.up)
    }
}

// Perspective camera whose pose is keyframed over time.
#[derive(Clone, Debug)]
pub struct CameraTrack {
    fov_y: f64,
    keys: Vec<CameraKey>,
}

impl CameraTrack {
    pub fn new(fov_y: f64, mut keys: Vec<CameraKey>) -> Result<Self> {
        if !(fov_y > 0.0 && fov_y < std::f64::consts::PI) {
            let desc =
                format!("camera field of view {} is out of (0, pi)", fov_y);
            return Err(Error::new(MalformedData, desc));
        }
        if keys.is_empty() {
            let desc = "camera has no keyframes".to_string();
            return Err(Error::new(MalformedData, desc));
        }
        for key in &keys {
            let dir = key.target - key.eye;
            if dir.norm() == 0.0 || dir.cross(&key.up).norm() == 0.0 {
                let desc =
                    format!("degenerate camera key at frame {}", key.frame);
                return Err(Error::new(MalformedData, desc));
            }
        }

        keys.sort_by_key(|k| k.frame);
        Ok(Self { fov_y, keys })
    }

    pub fn fov_y(&self) -> f64 {
        self.fov_y
    }

    // Linear blend of the surrounding keys, held outside the key range.
    pub fn pose(&self, frame: Frame) -> CameraPose {
        let i = self.keys.partition_point(|k| k.frame <= frame);
        if i == 0 || i == self.keys.len() {
            let key = &self.keys[i.saturating_sub(1)];
            return CameraPose {
                eye: key.eye,
                target: key.target,
                up: key.up,
            };
        }

        let (lo, hi) = (&self.keys[i - 1], &self.keys[i]);
        let t = (frame - lo.frame) as f64 / (hi.frame - lo.frame) as f64;
        CameraPose {
            eye: lo.eye + (hi.eye - lo.eye) * t,
            target: lo.target + (hi.target - lo.target) * t,
            up: lo.up.lerp(&hi.up, t),
        }
    }
}

// Maps world points to viewport pixels (origin at the top left corner) and
// view depth. Points behind the camera get a non-positive depth.
pub struct Projector {
    view: Matrix4,
    perspective: Perspective3<f64>,
    width: f64,
    height: f64,
}

impl Projector {
    pub fn new(
        pose: &CameraPose,
        fov_y: f64,
        width: f64,
        height: f64,
    ) -> Self {
        let aspect = width / height;
        Self {
            view: pose.view(),
            perspective: Perspective3::new(aspect, fov_y, Z_NEAR, Z_FAR),
            width,
            height,
        }
    }

    pub fn project(&self, point: &Point3) -> ProjectedPoint {
        let local = self.view.transform_point(point);
        let ndc = self.perspective.project_point(&local);
        ProjectedPoint {
            point: Vector2::new(
                (ndc.x + 1.0) / 2.0 * self.width,
                (1.0 - ndc.y) / 2.0 * self.height,
            ),
            depth: -local.z,
        }
    }

    pub fn contains(&self, pixel: Vector2) -> bool {
        (0.0..=self.width).contains(&pixel.x)
            && (0.0..=self.height).contains(&pixel.y)
    }
}
