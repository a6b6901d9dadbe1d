use std::collections::HashMap;
use crate::RetargetConfig;

// Built-in candidates for each abstract bone, covering ReadyPlayerMe-style, Mixamo, generic humanoid and Character Creator rigs
// Order matters: the first candidate that exists in a skeleton wins
const DEFAULT_ALIASES: &[(&str, &[&str])] =
&[
    ("RightArm", &["UpperArm.R", "mixamorig:RightArm", "RightArm", "RightUpperArm", "R_Arm", "Right_Arm"]),
    ("LeftArm", &["UpperArm.L", "mixamorig:LeftArm", "LeftArm", "LeftUpperArm", "L_Arm", "Left_Arm"]),
    ("RightForeArm", &["LowerArm.R", "mixamorig:RightForeArm", "RightForeArm", "RightLowerArm", "R_ForeArm", "Right_ForeArm"]),
    ("LeftForeArm", &["LowerArm.L", "mixamorig:LeftForeArm", "LeftForeArm", "LeftLowerArm", "L_ForeArm", "Left_ForeArm"]),
    ("RightHand", &["Wrist.R", "mixamorig:RightHand", "RightHand", "RightWrist", "R_Hand", "Right_Hand"]),
    ("LeftHand", &["Wrist.L", "mixamorig:LeftHand", "LeftHand", "LeftWrist", "L_Hand", "Left_Hand"]),
    ("Head", &["Head", "mixamorig:Head", "CC_Base_Head"]),
    ("Neck", &["Neck", "mixamorig:Neck", "CC_Base_Neck"]),
    ("Spine", &["Torso", "mixamorig:Spine", "Spine", "Spine1", "Spine01"]),
    ("Hips", &["Hips", "mixamorig:Hips", "Pelvis", "Root"]),
    ("RightUpLeg", &["UpperLeg.R", "mixamorig:RightUpLeg", "RightUpLeg", "RightThigh", "R_UpLeg"]),
    ("RightLeg", &["LowerLeg.R", "mixamorig:RightLeg", "RightLeg", "RightCalf", "R_Leg"]),
    ("LeftUpLeg", &["UpperLeg.L", "mixamorig:LeftUpLeg", "LeftUpLeg", "LeftThigh", "L_UpLeg"]),
    ("LeftLeg", &["LowerLeg.L", "mixamorig:LeftLeg", "LeftLeg", "LeftCalf", "L_Leg"]),
];

// Identifiers that are retried as a different identifier when nothing else matched
const DEFAULT_SYNONYMS: &[(&str, &str)] =
&[
    ("RightWrist", "RightHand"),
    ("LeftWrist", "LeftHand"),
];

// Abstract bone identifier -> ordered list of concrete names used by known rigs
#[derive(Debug, Clone, PartialEq)]
pub struct BoneAliasTable
{
    aliases: HashMap<String, Box<[String]>>,
    synonyms: HashMap<String, String>,
}
impl BoneAliasTable
{
    #[must_use]
    pub fn empty() -> Self
    {
        Self
        {
            aliases: HashMap::new(),
            synonyms: HashMap::new(),
        }
    }

    // The built-in table with any configured aliases/synonyms applied on top
    #[must_use]
    pub fn from_config(config: &RetargetConfig) -> Self
    {
        let mut table = Self::default();
        for (name, candidates) in &config.aliases
        {
            table.set_candidates(name.clone(), candidates.iter().cloned());
        }
        for (name, synonym) in &config.synonyms
        {
            table.set_synonym(name.clone(), synonym.clone());
        }
        table
    }

    // Replaces any existing candidates for this identifier
    pub fn set_candidates(&mut self, name: impl Into<String>, candidates: impl IntoIterator<Item = impl Into<String>>)
    {
        self.aliases.insert(name.into(), candidates.into_iter().map(Into::into).collect());
    }

    pub fn set_synonym(&mut self, name: impl Into<String>, synonym: impl Into<String>)
    {
        self.synonyms.insert(name.into(), synonym.into());
    }

    #[inline] #[must_use]
    pub fn candidates(&self, name: &str) -> Option<&[String]>
    {
        self.aliases.get(name).map(|c| &c[..])
    }

    #[inline] #[must_use]
    pub fn synonym(&self, name: &str) -> Option<&str>
    {
        self.synonyms.get(name).map(String::as_str)
    }

    pub fn identifiers(&self) -> impl Iterator<Item = &str>
    {
        self.aliases.keys().map(String::as_str)
    }
}
impl Default for BoneAliasTable
{
    fn default() -> Self
    {
        let mut table = Self::empty();
        for (name, candidates) in DEFAULT_ALIASES
        {
            table.set_candidates(*name, candidates.iter().copied());
        }
        for (name, synonym) in DEFAULT_SYNONYMS
        {
            table.set_synonym(*name, *synonym);
        }
        table
    }
}
