use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::io;
use std::path::Path;
use std::time::Duration;
use glam::Vec3;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoseConfig
{
    // per-tick blend weight toward the target pose, (0, 1]
    #[serde(default = "default_damp")]
    pub damp: f32,
    // the only bone that receives positional samples
    #[serde(default = "default_root_bone")]
    pub root_bone: String,
    #[serde(default = "default_root_min")]
    pub root_min: Vec3,
    #[serde(default = "default_root_max")]
    pub root_max: Vec3,
    // added after clamping, keeps the root above the ground
    #[serde(default = "default_root_offset")]
    pub root_offset: Vec3,
    // limit incoming euler angles to [-PI, PI]
    #[serde(default)]
    pub clamp_euler: bool,
}
fn default_damp() -> f32 { 0.5 }
fn default_root_bone() -> String { "Hips".to_string() }
fn default_root_min() -> Vec3 { Vec3::new(-1.0, -0.5, -1.0) }
fn default_root_max() -> Vec3 { Vec3::new(1.0, 0.5, 1.0) }
fn default_root_offset() -> Vec3 { Vec3::new(0.0, 0.9, 0.0) }

impl Default for PoseConfig
{
    fn default() -> Self
    {
        Self
        {
            damp: default_damp(),
            root_bone: default_root_bone(),
            root_min: default_root_min(),
            root_max: default_root_max(),
            root_offset: default_root_offset(),
            clamp_euler: false,
        }
    }
}

// Breathing motion used while there is no keypoint data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdleConfig
{
    #[serde(default = "default_idle_bone")]
    pub bone: String,
    // radians
    #[serde(default = "default_idle_amplitude")]
    pub amplitude: f32,
    // radians per second
    #[serde(default = "default_idle_frequency")]
    pub frequency: f32,
}
fn default_idle_bone() -> String { "Neck".to_string() }
fn default_idle_amplitude() -> f32 { 0.1 }
fn default_idle_frequency() -> f32 { 2.0 }

impl Default for IdleConfig
{
    fn default() -> Self
    {
        Self
        {
            bone: default_idle_bone(),
            amplitude: default_idle_amplitude(),
            frequency: default_idle_frequency(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackConfig
{
    // ~30 frames per second
    #[serde(default = "default_frame_period_ms")]
    pub frame_period_ms: u64,
}
fn default_frame_period_ms() -> u64 { 33 }

impl Default for PlaybackConfig
{
    fn default() -> Self { Self { frame_period_ms: default_frame_period_ms() } }
}
impl PlaybackConfig
{
    #[inline] #[must_use]
    pub fn frame_period(&self) -> Duration { Duration::from_millis(self.frame_period_ms) }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetargetConfig
{
    pub pose: PoseConfig,
    pub idle: IdleConfig,
    pub playback: PlaybackConfig,
    // replaces the built-in candidates for an identifier, or adds a new identifier
    pub aliases: IndexMap<String, Vec<String>>,
    // identifier -> identifier to retry with; added to the built-in wrist synonyms
    pub synonyms: IndexMap<String, String>,
}

#[derive(Debug, PartialEq)]
pub enum ConfigError
{
    DampOutOfRange(f32),
    InvertedRootRange { min: Vec3, max: Vec3 },
    NonFiniteValue(&'static str),
    EmptyBoneName(&'static str),
    ZeroFramePeriod,
    EmptyAliasList(String),
}
impl Error for ConfigError { }
impl Display for ConfigError
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result { Debug::fmt(self, f) }
}

#[derive(Debug)]
pub enum LoadConfigError
{
    IOError(io::Error),
    ParseError(toml::de::Error),
    Invalid(ConfigError),
}
impl Error for LoadConfigError { }
impl Display for LoadConfigError
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result { Debug::fmt(self, f) }
}

impl RetargetConfig
{
    pub fn from_toml_str(toml: &str) -> Result<Self, LoadConfigError>
    {
        let config: Self = toml::from_str(toml).map_err(LoadConfigError::ParseError)?;
        config.validate().map_err(LoadConfigError::Invalid)?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadConfigError>
    {
        let toml = std::fs::read_to_string(path).map_err(LoadConfigError::IOError)?;
        Self::from_toml_str(&toml)
    }

    // A missing file is not an error, the defaults are used instead
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, LoadConfigError>
    {
        match Self::load(&path)
        {
            Err(LoadConfigError::IOError(e)) if e.kind() == io::ErrorKind::NotFound =>
            {
                log::info!("No retarget config at {:?}, using defaults", path.as_ref());
                Ok(Self::default())
            }
            other => other,
        }
    }

    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error>
    {
        toml::to_string_pretty(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError>
    {
        let pose = &self.pose;
        if !pose.damp.is_finite() || pose.damp <= 0.0 || pose.damp > 1.0
        {
            return Err(ConfigError::DampOutOfRange(pose.damp));
        }
        for (name, value) in [("pose.root_min", pose.root_min), ("pose.root_max", pose.root_max), ("pose.root_offset", pose.root_offset)]
        {
            if !value.is_finite() { return Err(ConfigError::NonFiniteValue(name)); }
        }
        if !pose.root_min.cmple(pose.root_max).all()
        {
            return Err(ConfigError::InvertedRootRange { min: pose.root_min, max: pose.root_max });
        }
        if pose.root_bone.is_empty() { return Err(ConfigError::EmptyBoneName("pose.root_bone")); }

        if !self.idle.amplitude.is_finite() { return Err(ConfigError::NonFiniteValue("idle.amplitude")); }
        if !self.idle.frequency.is_finite() { return Err(ConfigError::NonFiniteValue("idle.frequency")); }
        if self.idle.bone.is_empty() { return Err(ConfigError::EmptyBoneName("idle.bone")); }

        if self.playback.frame_period_ms == 0 { return Err(ConfigError::ZeroFramePeriod); }

        if let Some((name, _)) = self.aliases.iter().find(|(_, candidates)| candidates.is_empty())
        {
            return Err(ConfigError::EmptyAliasList(name.clone()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn defaults()
    {
        let config = RetargetConfig::default();
        assert_eq!(config.pose.damp, 0.5);
        assert_eq!(config.pose.root_bone, "Hips");
        assert_eq!(config.pose.root_offset, Vec3::new(0.0, 0.9, 0.0));
        assert_eq!(config.idle.bone, "Neck");
        assert_eq!(config.playback.frame_period(), Duration::from_millis(33));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_file_is_default()
    {
        assert_eq!(RetargetConfig::from_toml_str("").unwrap(), RetargetConfig::default());
    }

    #[test]
    fn partial_overrides()
    {
        let config = RetargetConfig::from_toml_str(r#"
            [pose]
            damp = 0.25
            root_max = [2.0, 1.0, 2.0]

            [playback]
            frame_period_ms = 16

            [aliases]
            LeftHandLittle1 = ["LeftHandPinky1", "mixamorig:LeftHandPinky1"]

            [synonyms]
            Pelvis = "Hips"
        "#).unwrap();

        assert_eq!(config.pose.damp, 0.25);
        assert_eq!(config.pose.root_max, Vec3::new(2.0, 1.0, 2.0));
        assert_eq!(config.pose.root_min, Vec3::new(-1.0, -0.5, -1.0));
        assert_eq!(config.pose.root_bone, "Hips");
        assert_eq!(config.idle, IdleConfig::default());
        assert_eq!(config.playback.frame_period_ms, 16);
        assert_eq!(config.aliases["LeftHandLittle1"], ["LeftHandPinky1", "mixamorig:LeftHandPinky1"]);
        assert_eq!(config.synonyms["Pelvis"], "Hips");
    }

    #[test]
    fn validation()
    {
        let bad_damp = RetargetConfig::from_toml_str("[pose]\ndamp = 0.0");
        assert!(matches!(bad_damp, Err(LoadConfigError::Invalid(ConfigError::DampOutOfRange(_)))));

        let too_much_damp = RetargetConfig::from_toml_str("[pose]\ndamp = 1.5");
        assert!(matches!(too_much_damp, Err(LoadConfigError::Invalid(ConfigError::DampOutOfRange(_)))));

        let inverted = RetargetConfig::from_toml_str("[pose]\nroot_min = [0.0, 1.0, 0.0]\nroot_max = [1.0, 0.0, 1.0]");
        assert!(matches!(inverted, Err(LoadConfigError::Invalid(ConfigError::InvertedRootRange { .. }))));

        let zero_period = RetargetConfig::from_toml_str("[playback]\nframe_period_ms = 0");
        assert!(matches!(zero_period, Err(LoadConfigError::Invalid(ConfigError::ZeroFramePeriod))));

        let empty_aliases = RetargetConfig::from_toml_str("[aliases]\nHead = []");
        assert!(matches!(empty_aliases, Err(LoadConfigError::Invalid(ConfigError::EmptyAliasList(n))) if n == "Head"));

        assert!(matches!(RetargetConfig::from_toml_str("[pose\n"), Err(LoadConfigError::ParseError(_))));
    }

    #[test]
    fn round_trips_through_toml()
    {
        let mut config = RetargetConfig::default();
        config.pose.clamp_euler = true;
        config.aliases.insert("Jaw".to_string(), vec!["CC_Base_JawRoot".to_string()]);
        let toml = config.to_toml_string().unwrap();
        assert_eq!(RetargetConfig::from_toml_str(&toml).unwrap(), config);
    }

    #[test]
    fn missing_file_is_default()
    {
        let dir = tempfile::tempdir().unwrap();
        let config = RetargetConfig::load_or_default(dir.path().join("nope.toml")).unwrap();
        assert_eq!(config, RetargetConfig::default());

        std::fs::write(dir.path().join("retarget.toml"), "[idle]\namplitude = 0.2").unwrap();
        let config = RetargetConfig::load_or_default(dir.path().join("retarget.toml")).unwrap();
        assert_eq!(config.idle.amplitude, 0.2);
    }
}
