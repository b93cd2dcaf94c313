//! Fixed-arity float payload types used by several parameter leaves.
//!
//! These mirror the wire layout exactly (N consecutive little-endian f32s)
//! and exist as distinct types, rather than bare arrays, so the document-tree
//! bridge can tag them unambiguously (`!vec2`, `!vec3`, `!vec4`, `!quat`).

/// Two-component float vector (`sead::Vector2<float>`).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Vec2 { x, y }
    }
}

/// Three-component float vector (`sead::Vector3<float>`).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Vec3 { x, y, z }
    }
}

/// Four-component float vector (`sead::Vector4<float>`).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec4 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Vec4 {
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Vec4 { x, y, z, w }
    }
}

/// Quaternion (`sead::Quat<float>`).
///
/// No interpolation or normalization is applied; the four components are
/// read and written verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Quat {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
}

impl Quat {
    pub const fn new(a: f32, b: f32, c: f32, d: f32) -> Self {
        Quat { a, b, c, d }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec2_construction() {
        let v = Vec2::new(1.0, 2.0);
        assert_eq!(v.x, 1.0);
        assert_eq!(v.y, 2.0);
    }

    #[test]
    fn test_vec3_default() {
        assert_eq!(Vec3::default(), Vec3::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn test_vec4_equality() {
        let a = Vec4::new(1.0, 0.5, 0.0, 1.0);
        let b = Vec4::new(1.0, 0.5, 0.0, 1.0);
        assert_eq!(a, b);
    }

    #[test]
    fn test_quat_fields() {
        let q = Quat::new(1.0, 0.0, 0.0, 0.0);
        assert_eq!(q.a, 1.0);
        assert_eq!(q.d, 0.0);
    }
}
