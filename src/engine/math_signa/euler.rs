use std::f32::consts::PI;
use std::fmt::{Display, Formatter};
use glam::{EulerRot, Quat, Vec3};

// Intrinsic X, then Y, then Z. This is the default order of most web/DCC tooling that emits keypoints
pub const KEYPOINT_EULER_ORDER: EulerRot = EulerRot::XYZ;

// Euler angles in radians
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct EulerAngles
{
    pub x: f32,
    pub y: f32,
    pub z: f32,
}
impl EulerAngles
{
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    #[inline] #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self { Self { x, y, z } }

    #[inline] #[must_use]
    pub fn from_quat(rotation: Quat) -> Self
    {
        let (x, y, z) = rotation.to_euler(KEYPOINT_EULER_ORDER);
        Self { x, y, z }
    }

    #[inline] #[must_use]
    pub fn to_quat(self) -> Quat
    {
        Quat::from_euler(KEYPOINT_EULER_ORDER, self.x, self.y, self.z)
    }

    #[inline] #[must_use]
    pub fn is_finite(self) -> bool { self.x.is_finite() && self.y.is_finite() && self.z.is_finite() }

    // limit each component to [-PI, PI] (clamps, does not wrap)
    #[inline] #[must_use]
    pub fn clamped_to_half_turn(self) -> Self
    {
        Self
        {
            x: self.x.clamp(-PI, PI),
            y: self.y.clamp(-PI, PI),
            z: self.z.clamp(-PI, PI),
        }
    }

    #[inline] #[must_use]
    pub fn with_x(self, x: f32) -> Self { Self { x, ..self } }
}
impl From<Vec3> for EulerAngles
{
    fn from(v: Vec3) -> Self { Self::new(v.x, v.y, v.z) }
}
impl From<EulerAngles> for Vec3
{
    fn from(e: EulerAngles) -> Self { Vec3::new(e.x, e.y, e.z) }
}
// Display the angles, by default as radians, alternatively as degrees
impl Display for EulerAngles
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result
    {
        if f.alternate()
        {
            f.write_fmt(format_args!("({:.1}deg, {:.1}deg, {:.1}deg)", self.x.to_degrees(), self.y.to_degrees(), self.z.to_degrees()))
        }
        else
        {
            f.write_fmt(format_args!("({:.3}rad, {:.3}rad, {:.3}rad)", self.x, self.y, self.z))
        }
    }
}
