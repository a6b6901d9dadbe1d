use world_signa::{NodeIndex, Scene};
use crate::{normalize_bone_name, BoneAliasTable, BoneRegistry};

// One layer of bone name resolution. Rules are tried in order and the first hit wins
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveRule
{
    // the identifier is a node name in the model as authored
    NativeName,
    // each alias candidate, in order: native name, then registry key, then normalized registry key
    AliasCandidates,
    // the normalized identifier is a registry key
    NormalizedName,
    // retry as a different identifier (e.g. RightWrist -> RightHand), one level deep
    Synonym,
    // identifiers containing "Little" retry their first alias candidate with "Pinky" replaced by "Little",
    // checked against native names only. Only applies to identifiers that have alias candidates
    LittleForPinky,
}

pub const DEFAULT_RESOLVE_RULES: &[ResolveRule] =
&[
    ResolveRule::NativeName,
    ResolveRule::AliasCandidates,
    ResolveRule::NormalizedName,
    ResolveRule::Synonym,
    ResolveRule::LittleForPinky,
];

const MAX_SYNONYM_DEPTH: u32 = 1;

// Maps abstract bone identifiers onto the nodes of one particular skeleton
// Stateless, the same inputs always resolve to the same node
pub struct BoneResolver<'r>
{
    scene: &'r Scene,
    registry: &'r BoneRegistry,
    aliases: &'r BoneAliasTable,
    rules: &'r [ResolveRule],
}
impl<'r> BoneResolver<'r>
{
    #[must_use]
    pub fn new(scene: &'r Scene, registry: &'r BoneRegistry, aliases: &'r BoneAliasTable) -> Self
    {
        Self
        {
            scene,
            registry,
            aliases,
            rules: DEFAULT_RESOLVE_RULES,
        }
    }

    #[must_use]
    pub fn with_rules(self, rules: &'r [ResolveRule]) -> Self
    {
        Self { rules, ..self }
    }

    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<NodeIndex>
    {
        self.resolve_at_depth(name, 0)
    }

    // Try a single rule in isolation
    #[must_use]
    pub fn apply_rule(&self, rule: ResolveRule, name: &str) -> Option<NodeIndex>
    {
        self.apply_rule_at_depth(rule, name, 0)
    }

    fn resolve_at_depth(&self, name: &str, depth: u32) -> Option<NodeIndex>
    {
        self.rules.iter().find_map(|rule| self.apply_rule_at_depth(*rule, name, depth))
    }

    fn apply_rule_at_depth(&self, rule: ResolveRule, name: &str, depth: u32) -> Option<NodeIndex>
    {
        match rule
        {
            ResolveRule::NativeName => self.scene.native_node(name),
            ResolveRule::AliasCandidates =>
            {
                self.aliases.candidates(name)?.iter().find_map(|candidate|
                    self.scene.native_node(candidate)
                        .or_else(|| self.registry.get(candidate))
                        .or_else(|| self.registry.get_normalized(candidate)))
            }
            ResolveRule::NormalizedName => self.registry.get(&normalize_bone_name(name)),
            ResolveRule::Synonym =>
            {
                if depth >= MAX_SYNONYM_DEPTH { return None; }
                let synonym = self.aliases.synonym(name)?;
                self.resolve_at_depth(synonym, depth + 1)
            }
            ResolveRule::LittleForPinky =>
            {
                if !name.contains("Little") { return None; }
                let first = self.aliases.candidates(name)?.first()?;
                self.scene.native_node(&first.replacen("Pinky", "Little", 1))
            }
        }
    }
}
