use glam::{Mat4, Quat, Vec3};

// Local (parent relative) transform of a scene node
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct Transform
{
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}
impl Default for Transform
{
    fn default() -> Self { Self::IDENTITY }
}
impl Transform
{
    pub const IDENTITY: Self = Self
    {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    #[inline] #[must_use]
    pub fn from_rotation(rotation: Quat) -> Self { Self { rotation, ..Self::IDENTITY } }

    #[inline] #[must_use]
    pub fn from_position(position: Vec3) -> Self { Self { position, ..Self::IDENTITY } }

    #[inline] #[must_use]
    pub fn to_world_mtx(&self) -> Mat4 { Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position) }

    // Rotation and position are finite and the rotation is (approximately) unit length
    #[must_use]
    pub fn is_valid(&self) -> bool
    {
        self.position.is_finite() && self.scale.is_finite() && self.rotation.is_finite() && self.rotation.is_normalized()
    }
}
