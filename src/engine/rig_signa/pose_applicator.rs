use glam::{Quat, Vec3};
use math_signa::{clamp_per_axis, damp_position, damp_rotation, EulerAngles, Transform};
use nab_signa::timing::FSeconds;
use crate::config::{IdleConfig, PoseConfig};
use crate::keypoints::ValidSample;
use crate::RetargetConfig;

// Moves bones toward keypoint targets, and breathes while there are no targets
#[derive(Debug, Clone, PartialEq)]
pub struct PoseApplicator
{
    pose: PoseConfig,
    idle: IdleConfig,
}
impl PoseApplicator
{
    #[must_use]
    pub fn new(pose: PoseConfig, idle: IdleConfig) -> Self
    {
        Self { pose, idle }
    }

    #[must_use]
    pub fn from_config(config: &RetargetConfig) -> Self
    {
        Self::new(config.pose.clone(), config.idle.clone())
    }

    #[inline] #[must_use] pub fn pose_config(&self) -> &PoseConfig { &self.pose }
    #[inline] #[must_use] pub fn idle_config(&self) -> &IdleConfig { &self.idle }

    // Only the root identifier takes positional samples
    #[inline] #[must_use]
    pub fn is_root(&self, identifier: &str) -> bool
    {
        identifier == self.pose.root_bone
    }

    #[must_use]
    pub fn target_rotation(&self, euler: EulerAngles) -> Quat
    {
        let euler = if self.pose.clamp_euler { euler.clamped_to_half_turn() } else { euler };
        euler.to_quat()
    }

    // Where the root is pulled toward, before damping
    #[must_use]
    pub fn root_target(&self, position: Vec3) -> Vec3
    {
        clamp_per_axis(position, self.pose.root_min, self.pose.root_max) + self.pose.root_offset
    }

    // One tick of damping toward the sample
    pub fn apply_sample(&self, local: &mut Transform, sample: &ValidSample, is_root: bool)
    {
        local.rotation = damp_rotation(local.rotation, self.target_rotation(sample.rotation), self.pose.damp);

        if let (true, Some(position)) = (is_root, sample.position)
        {
            local.position = damp_position(local.position, self.root_target(position), self.pose.damp);
        }
    }

    #[inline] #[must_use]
    pub fn idle_angle(&self, elapsed: FSeconds) -> f32
    {
        (elapsed.as_f32() * self.idle.frequency).sin() * self.idle.amplitude
    }

    // Overwrites the x euler angle of the bone, the other two are kept
    pub fn apply_idle(&self, local: &mut Transform, elapsed: FSeconds)
    {
        let euler = EulerAngles::from_quat(local.rotation).with_x(self.idle_angle(elapsed));
        local.rotation = euler.to_quat();
    }
}
impl Default for PoseApplicator
{
    fn default() -> Self { Self::new(PoseConfig::default(), IdleConfig::default()) }
}

#[cfg(test)]
mod tests
{
    use approx::{assert_abs_diff_eq, assert_ulps_eq};
    use crate::BoneSample;
    use super::*;

    fn valid(sample: BoneSample) -> ValidSample
    {
        sample.validate().unwrap()
    }

    fn assert_same_rotation(a: Quat, b: Quat)
    {
        assert_abs_diff_eq!(a.dot(b).abs(), 1.0, epsilon = 1e-5);
    }

    #[test]
    fn root_clamp_and_offset()
    {
        let applicator = PoseApplicator::default();
        assert_abs_diff_eq!(applicator.root_target(Vec3::new(2.0, 0.0, -3.0)), Vec3::new(1.0, 0.9, -1.0), epsilon = 1e-6);
        assert_abs_diff_eq!(applicator.root_target(Vec3::new(0.2, -4.0, 0.3)), Vec3::new(0.2, 0.4, 0.3), epsilon = 1e-6);
    }

    #[test]
    fn root_position_is_damped()
    {
        let applicator = PoseApplicator::default();
        let mut local = Transform::IDENTITY;
        let sample = valid(BoneSample::rotation(0.0, 0.0, 0.0).with_position(Vec3::new(2.0, 0.0, -3.0)));

        applicator.apply_sample(&mut local, &sample, true);
        assert_abs_diff_eq!(local.position, Vec3::new(0.5, 0.45, -0.5), epsilon = 1e-6);
        applicator.apply_sample(&mut local, &sample, true);
        assert_abs_diff_eq!(local.position, Vec3::new(0.75, 0.675, -0.75), epsilon = 1e-6);
    }

    #[test]
    fn only_root_moves()
    {
        let applicator = PoseApplicator::default();
        assert!(applicator.is_root("Hips"));
        assert!(!applicator.is_root("Spine"));

        let mut local = Transform::from_position(Vec3::new(0.0, 0.1, 0.0));
        let sample = valid(BoneSample::rotation(0.3, 0.0, 0.0).with_position(Vec3::new(1.0, 1.0, 1.0)));
        applicator.apply_sample(&mut local, &sample, false);
        assert_eq!(local.position, Vec3::new(0.0, 0.1, 0.0));
        assert!(local.rotation.angle_between(Quat::IDENTITY) > 0.0);
    }

    #[test]
    fn rotation_converges_monotonically()
    {
        let applicator = PoseApplicator::default();
        let target_euler = EulerAngles::new(1.2, -0.4, 2.9);
        let target = applicator.target_rotation(target_euler);
        let sample = valid(BoneSample::rotation(target_euler.x, target_euler.y, target_euler.z));

        let mut local = Transform::from_rotation(Quat::from_rotation_y(-2.0));
        let mut distance = local.rotation.angle_between(target);
        for _ in 0..30
        {
            applicator.apply_sample(&mut local, &sample, false);
            let next = local.rotation.angle_between(target);
            assert!(next <= distance + 1e-3, "moved away from target: {distance} -> {next}");
            assert_ulps_eq!(local.rotation.length(), 1.0, max_ulps = 8);
            distance = next;
        }
        assert!(distance < 1e-2);
        assert_same_rotation(local.rotation, target);
    }

    #[test]
    fn full_damp_snaps()
    {
        let mut pose = PoseConfig::default();
        pose.damp = 1.0;
        let applicator = PoseApplicator::new(pose, IdleConfig::default());
        let sample = valid(BoneSample::rotation(0.0, 0.7, 0.0));
        let mut local = Transform::IDENTITY;
        applicator.apply_sample(&mut local, &sample, false);
        assert_same_rotation(local.rotation, Quat::from_rotation_y(0.7));
    }

    #[test]
    fn euler_clamp()
    {
        let mut pose = PoseConfig::default();
        let huge = EulerAngles::new(7.0, 0.0, 0.0);

        let unclamped = PoseApplicator::new(pose.clone(), IdleConfig::default()).target_rotation(huge);
        assert_same_rotation(unclamped, Quat::from_rotation_x(7.0));

        pose.clamp_euler = true;
        let clamped = PoseApplicator::new(pose, IdleConfig::default()).target_rotation(huge);
        assert_same_rotation(clamped, Quat::from_rotation_x(std::f32::consts::PI));
    }

    #[test]
    fn idle_breathing()
    {
        let applicator = PoseApplicator::default();
        assert_eq!(applicator.idle_angle(FSeconds(0.0)), 0.0);
        assert_abs_diff_eq!(applicator.idle_angle(FSeconds(std::f32::consts::FRAC_PI_4)), 0.1, epsilon = 1e-6);

        let mut local = Transform::from_rotation(EulerAngles::new(0.0, 0.2, -0.1).to_quat());
        applicator.apply_idle(&mut local, FSeconds(std::f32::consts::FRAC_PI_4));
        let euler = EulerAngles::from_quat(local.rotation);
        assert_abs_diff_eq!(euler.x, 0.1, epsilon = 1e-5);
        assert_abs_diff_eq!(euler.y, 0.2, epsilon = 1e-5);
        assert_abs_diff_eq!(euler.z, -0.1, epsilon = 1e-5);
    }
}
