//! Value types used by parameter leaves and tree keys.

pub mod buffer;
pub mod color;
pub mod crc32;
pub mod curve;
pub mod strings;
pub mod vector;

pub use buffer::{BufferBinary, BufferF32, BufferInt, BufferU32};
pub use color::Color;
pub use crc32::Crc32;
pub use curve::{Curve, CurveSegment};
pub use strings::{String256, String32, String64};
pub use vector::{Quat, Vec2, Vec3, Vec4};
