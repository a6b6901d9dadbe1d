use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use nab_signa::timing::FSeconds;
use world_signa::{NodeIndex, Scene};
use crate::{BoneAliasTable, BoneRegistry, BoneResolver, KeypointFrame, PoseApplicator, RetargetConfig};

// What a single pose update did
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PoseReport
{
    pub applied: usize,
    // unresolved or malformed bones
    pub skipped: usize,
    // no frame was available, the idle motion ran instead
    pub idle: bool,
}

// A loaded model being driven by keypoints
pub struct Avatar
{
    scene: Scene,
    registry: BoneRegistry,
    aliases: Arc<BoneAliasTable>,
    applicator: PoseApplicator,
    resolved: HashMap<String, Option<NodeIndex>>, // cleared on reload
    driven: BTreeSet<NodeIndex>,
}
impl Avatar
{
    #[must_use]
    pub fn new(scene: Scene, aliases: Arc<BoneAliasTable>, applicator: PoseApplicator) -> Self
    {
        let registry = BoneRegistry::build(&scene);
        Self
        {
            scene,
            registry,
            aliases,
            applicator,
            resolved: HashMap::new(),
            driven: BTreeSet::new(),
        }
    }

    #[must_use]
    pub fn from_config(scene: Scene, config: &RetargetConfig) -> Self
    {
        Self::new(scene, Arc::new(BoneAliasTable::from_config(config)), PoseApplicator::from_config(config))
    }

    // Swap in a new model. Everything derived from the old one is discarded
    pub fn reload(&mut self, scene: Scene)
    {
        self.registry = BoneRegistry::build(&scene);
        self.scene = scene;
        self.resolved.clear();
        self.driven.clear();
    }

    #[inline] #[must_use] pub fn scene(&self) -> &Scene { &self.scene }
    #[inline] #[must_use] pub fn registry(&self) -> &BoneRegistry { &self.registry }
    #[inline] #[must_use] pub fn aliases(&self) -> &BoneAliasTable { &self.aliases }
    #[inline] #[must_use] pub fn applicator(&self) -> &PoseApplicator { &self.applicator }

    // Every node that has received a keypoint sample since the model was loaded
    pub fn driven_bones(&self) -> impl Iterator<Item = NodeIndex> + '_
    {
        self.driven.iter().copied()
    }

    // Resolve an identifier against this model, memoized. Failures are logged once
    pub fn resolve(&mut self, name: &str) -> Option<NodeIndex>
    {
        if let Some(cached) = self.resolved.get(name)
        {
            return *cached;
        }

        let resolved = BoneResolver::new(&self.scene, &self.registry, &self.aliases).resolve(name);
        match resolved
        {
            Some(node) => log::debug!("Resolved bone '{name}' to {node:?}"),
            None => log::warn!("No bone found for '{name}', it will be skipped"),
        }
        self.resolved.insert(name.to_string(), resolved);
        resolved
    }

    // Run once per render tick, with the current keypoint frame if there is one
    pub fn update(&mut self, frame: Option<&KeypointFrame>, elapsed: FSeconds) -> PoseReport
    {
        puffin::profile_function!();

        let Some(frame) = frame else
        {
            return self.update_idle(elapsed);
        };

        let mut report = PoseReport::default();
        for (name, sample) in frame.iter()
        {
            let Some(sample) = sample.and_then(|s| s.validate()) else
            {
                report.skipped += 1;
                continue;
            };
            let Some(node) = self.resolve(name) else
            {
                report.skipped += 1;
                continue;
            };
            let is_root = self.applicator.is_root(name);
            let Some(local) = self.scene.local_mut(node) else
            {
                report.skipped += 1;
                continue;
            };

            self.applicator.apply_sample(local, &sample, is_root);
            debug_assert!(local.is_valid(), "Bone '{name}' left with an invalid transform {local:?}");
            self.driven.insert(node);
            report.applied += 1;
        }
        report
    }

    fn update_idle(&mut self, elapsed: FSeconds) -> PoseReport
    {
        let mut report = PoseReport { idle: true, ..Default::default() };
        let idle_bone = self.applicator.idle_config().bone.clone();
        if let Some(local) = self.resolve(&idle_bone).and_then(|node| self.scene.local_mut(node))
        {
            self.applicator.apply_idle(local, elapsed);
            report.applied = 1;
        }
        report
    }
}
impl std::fmt::Debug for Avatar
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result
    {
        f.debug_struct("Avatar")
            .field("Nodes", &self.scene.len())
            .field("Bones", &self.registry.bone_count())
            .field("Resolved", &self.resolved.len())
            .finish()
    }
}
