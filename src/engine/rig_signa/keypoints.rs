use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::io;
use std::path::{Path, PathBuf};
use glam::Vec3;
use indexmap::IndexMap;
use math_signa::EulerAngles;
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplePosition
{
    pub x: f32,
    pub y: f32,
    pub z: f32,
}
impl From<SamplePosition> for Vec3
{
    fn from(p: SamplePosition) -> Self { Vec3::new(p.x, p.y, p.z) }
}
impl From<Vec3> for SamplePosition
{
    fn from(v: Vec3) -> Self { Self { x: v.x, y: v.y, z: v.z } }
}

// Target state of a single bone. x/y/z are euler angles in radians
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoneSample
{
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<SamplePosition>,
}

// A bone sample that passed validation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidSample
{
    pub rotation: EulerAngles,
    pub position: Option<Vec3>,
}

impl BoneSample
{
    #[must_use]
    pub fn rotation(x: f32, y: f32, z: f32) -> Self
    {
        Self { x: Some(x), y: Some(y), z: Some(z), position: None }
    }

    #[must_use]
    pub fn with_position(self, position: Vec3) -> Self
    {
        Self { position: Some(position.into()), ..self }
    }

    // None if the rotation is incomplete or anything present is not finite
    #[must_use]
    pub fn validate(&self) -> Option<ValidSample>
    {
        let rotation = EulerAngles::new(self.x?, self.y?, self.z?);
        if !rotation.is_finite() { return None; }
        let position = match self.position.map(Vec3::from)
        {
            Some(p) if !p.is_finite() => return None,
            other => other,
        };
        Some(ValidSample { rotation, position })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
enum BoneEntry
{
    Sample(BoneSample),
    // anything that isn't a bone sample object; kept so the bone is skipped rather than the frame rejected
    #[serde(skip_serializing)]
    Malformed(IgnoredAny),
}

// One sampled pose: abstract bone identifier -> target, in the order they were produced
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeypointFrame
{
    bones: IndexMap<String, BoneEntry>,
}
impl KeypointFrame
{
    #[must_use]
    pub fn new() -> Self { Self::default() }

    #[must_use]
    pub fn with_bone(mut self, name: impl Into<String>, sample: BoneSample) -> Self
    {
        self.bones.insert(name.into(), BoneEntry::Sample(sample));
        self
    }

    #[inline] #[must_use] pub fn len(&self) -> usize { self.bones.len() }
    #[inline] #[must_use] pub fn is_empty(&self) -> bool { self.bones.is_empty() }

    // The sample for a bone, None if absent or malformed
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&BoneSample>
    {
        match self.bones.get(name)?
        {
            BoneEntry::Sample(sample) => Some(sample),
            BoneEntry::Malformed(_) => None,
        }
    }

    // Every bone in the frame; malformed entries have no sample
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&BoneSample>)>
    {
        self.bones.iter().map(|(name, entry)| (name.as_str(), match entry
        {
            BoneEntry::Sample(sample) => Some(sample),
            BoneEntry::Malformed(_) => None,
        }))
    }
}

// Parse a JSON list of frames. `null` is treated as an empty list
pub fn parse_frames(json: &str) -> Result<Vec<KeypointFrame>, serde_json::Error>
{
    let frames: Option<Vec<KeypointFrame>> = serde_json::from_str(json)?;
    Ok(frames.unwrap_or_default())
}

#[derive(Debug)]
pub enum KeypointLoadError
{
    EmptyWord,
    NotFound(PathBuf),
    IOError(io::Error),
    ParseError(serde_json::Error),
}
impl Error for KeypointLoadError { }
impl Display for KeypointLoadError
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result { Debug::fmt(self, f) }
}

pub fn load_frames_file(path: impl AsRef<Path>) -> Result<Vec<KeypointFrame>, KeypointLoadError>
{
    let path = path.as_ref();
    let json = match std::fs::read_to_string(path)
    {
        Ok(json) => json,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(KeypointLoadError::NotFound(path.to_path_buf())),
        Err(e) => return Err(KeypointLoadError::IOError(e)),
    };
    let frames = parse_frames(&json).map_err(KeypointLoadError::ParseError)?;
    log::debug!("Loaded {} keypoint frames from {path:?}", frames.len());
    Ok(frames)
}

// A directory of pre-extracted animations, one `<word>.json` per word
#[derive(Debug, Clone)]
pub struct KeypointLibrary
{
    root: PathBuf,
}
impl KeypointLibrary
{
    pub fn new(root: impl Into<PathBuf>) -> Self { Self { root: root.into() } }

    #[inline] #[must_use] pub fn root(&self) -> &Path { &self.root }

    // Words are trimmed and lowercased. Words that would escape the library directory are rejected
    #[must_use]
    pub fn normalize_word(word: &str) -> Option<String>
    {
        let word = word.trim().to_lowercase();
        if word.is_empty() || word.contains(['/', '\\']) || word == "." || word == ".."
        {
            return None;
        }
        Some(word)
    }

    pub fn path_for(&self, word: &str) -> Option<PathBuf>
    {
        Self::normalize_word(word).map(|w| self.root.join(format!("{w}.json")))
    }

    pub fn load(&self, word: &str) -> Result<Vec<KeypointFrame>, KeypointLoadError>
    {
        let path = self.path_for(word).ok_or(KeypointLoadError::EmptyWord)?;
        load_frames_file(path)
    }
}
