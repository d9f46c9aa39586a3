// Imports, typedefs and simple functionality common to all modules of the
// painting process.

pub type Vector3 = nalgebra::Vector3<f64>;
pub type Point3 = nalgebra::Point3<f64>;
pub type Matrix4 = nalgebra::Matrix4<f64>;
pub type Vector2 = nalgebra::Vector2<f64>;

pub type Frame = i64;
pub type MeshId = usize;

// Linear RGB with components in [0, 1].
pub type Color = Vector3;

pub fn color(rgb: [f64; 3]) -> Color {
    Color::new(rgb[0], rgb[1], rgb[2])
}

#[derive(Clone, Copy, Debug)]
pub struct ProjectedPoint {
    pub point: Vector2,
    pub depth: f64,
}

pub fn orientation(v0: Vector2, v1: Vector2, v2: Vector2) -> f64 {
    (v1[0] * v2[1] - v1[1] * v2[0])
        + (v2[0] * v0[1] - v2[1] * v0[0])
        + (v0[0] * v1[1] - v0[1] * v1[0])
}

// Strict containment for a counter-clockwise triangle.
pub fn containment_check(v: Vector2, f: [Vector2; 3]) -> bool {
    let [v0, v1, v2] = f;
    if v == v0 || v == v1 || v == v2 {
        return false;
    }
    let s0 = orientation(v, v1, v2);
    let s1 = orientation(v0, v, v2);
    let s2 = orientation(v0, v1, v);
    s0 > 0.0 && s1 > 0.0 && s2 > 0.0
}

pub fn max(a: [f64; 3]) -> f64 {
    a.iter().cloned().fold(f64::NEG_INFINITY, f64::max)
}
