use std::collections::HashMap;
use world_signa::{NodeIndex, Scene};

// Strip everything but ASCII letters and digits, and lowercase. "mixamorig:Right_Arm" -> "mixamorigrightarm"
#[must_use]
pub fn normalize_bone_name(name: &str) -> String
{
    name.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

// Lookup from bone name (as authored, and normalized) to scene node
// Built once per loaded model, and rebuilt on reload
#[derive(Debug, Default, Clone)]
pub struct BoneRegistry
{
    entries: HashMap<String, NodeIndex>,
    bone_names: Vec<String>, // in traversal order
}
impl BoneRegistry
{
    // Register every bone in the scene
    #[must_use]
    pub fn build(scene: &Scene) -> Self
    {
        let mut registry = Self::default();
        scene.traverse_all(|index, node| if node.is_bone { registry.insert(index, &node.name) });
        registry.log_contents();
        registry
    }

    // Register every bone under (and including) root
    #[must_use]
    pub fn build_from(scene: &Scene, root: NodeIndex) -> Self
    {
        let mut registry = Self::default();
        scene.traverse(root, |index, node| if node.is_bone { registry.insert(index, &node.name) });
        registry.log_contents();
        registry
    }

    // later bones with the same (or same normalized) name replace earlier ones
    fn insert(&mut self, index: NodeIndex, name: &str)
    {
        self.entries.insert(name.to_string(), index);
        self.entries.insert(normalize_bone_name(name), index);
        self.bone_names.push(name.to_string());
    }

    fn log_contents(&self)
    {
        log::debug!("Bone registry built with {} bones: [{}]", self.bone_names.len(), self.bone_names.join(", "));
    }

    // Exact key lookup. Keys include both authored and normalized names
    #[inline] #[must_use]
    pub fn get(&self, key: &str) -> Option<NodeIndex>
    {
        self.entries.get(key).copied()
    }

    // Case and punctuation insensitive lookup
    #[inline] #[must_use]
    pub fn get_normalized(&self, name: &str) -> Option<NodeIndex>
    {
        self.get(&normalize_bone_name(name))
    }

    #[inline] #[must_use] pub fn bone_count(&self) -> usize { self.bone_names.len() }
    #[inline] #[must_use] pub fn is_empty(&self) -> bool { self.bone_names.is_empty() }

    // Authored names of every registered bone, in traversal order
    #[inline] #[must_use]
    pub fn bone_names(&self) -> &[String] { &self.bone_names }

    pub fn keys(&self) -> impl Iterator<Item = &str>
    {
        self.entries.keys().map(String::as_str)
    }
}
