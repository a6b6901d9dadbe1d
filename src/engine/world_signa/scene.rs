use std::collections::HashMap;
use std::collections::hash_map::Entry;
use glam::Mat4;
use math_signa::Transform;
use nab_signa::debug_panic;
use crate::NodeIndex;

#[derive(Debug, Clone)]
pub struct SceneNode
{
    pub name: String, // as authored by the model
    pub is_bone: bool,
    pub local: Transform,
    pub parent: NodeIndex,
    pub children: Vec<NodeIndex>,
}

// A loaded scene graph. Nodes are only ever added by whoever produces the scene (e.g. the importer),
// consumers get handles (NodeIndex) and may only modify a node's local transform
#[derive(Debug, Default, Clone)]
pub struct Scene
{
    nodes: Vec<SceneNode>,
    roots: Vec<NodeIndex>,
    native_names: Option<HashMap<String, NodeIndex>>,
}
impl Scene
{
    // A scene without a native name table
    #[must_use]
    pub fn new() -> Self { Self::default() }

    // A scene that also tracks nodes by their authored names
    #[must_use]
    pub fn with_native_names() -> Self
    {
        Self
        {
            native_names: Some(HashMap::new()),
            ..Self::default()
        }
    }

    // Parents must be added before their children
    pub fn add_node(&mut self, name: impl Into<String>, is_bone: bool, local: Transform, parent: Option<NodeIndex>) -> NodeIndex
    {
        let index = NodeIndex::some(self.nodes.len());
        let parent = match parent
        {
            Some(p) if p.get().is_some_and(|p| p < self.nodes.len()) => p,
            Some(p) =>
            {
                debug_panic!("Parent {p:?} of new node {index:?} does not exist");
                NodeIndex::none()
            }
            None => NodeIndex::none(),
        };

        let name = name.into();
        if let Some(native_names) = &mut self.native_names
        {
            // first authored name wins
            if let Entry::Vacant(vacant) = native_names.entry(name.clone())
            {
                vacant.insert(index);
            }
        }

        match parent.get()
        {
            Some(p) => self.nodes[p].children.push(index),
            None => self.roots.push(index),
        }
        self.nodes.push(SceneNode
        {
            name,
            is_bone,
            local,
            parent,
            children: Vec::new(),
        });
        index
    }

    #[inline] #[must_use] pub fn len(&self) -> usize { self.nodes.len() }
    #[inline] #[must_use] pub fn is_empty(&self) -> bool { self.nodes.is_empty() }
    #[inline] #[must_use] pub fn roots(&self) -> &[NodeIndex] { &self.roots }
    #[inline] #[must_use] pub fn has_native_names(&self) -> bool { self.native_names.is_some() }

    #[inline] #[must_use]
    pub fn node(&self, index: NodeIndex) -> Option<&SceneNode>
    {
        index.get().and_then(|i| self.nodes.get(i))
    }

    // Mutable access to a node's local transform
    #[inline] #[must_use]
    pub fn local_mut(&mut self, index: NodeIndex) -> Option<&mut Transform>
    {
        index.get().and_then(|i| self.nodes.get_mut(i)).map(|n| &mut n.local)
    }

    // Look up a node by the name it was authored with, if this scene tracks native names
    #[inline] #[must_use]
    pub fn native_node(&self, name: &str) -> Option<NodeIndex>
    {
        self.native_names.as_ref().and_then(|names| names.get(name).copied())
    }

    // Depth-first, pre-order walk of the subtree starting at (and including) root
    pub fn traverse(&self, root: NodeIndex, mut visit: impl FnMut(NodeIndex, &SceneNode))
    {
        let mut stack = vec![root];
        while let Some(index) = stack.pop()
        {
            let Some(node) = self.node(index) else { continue; };
            visit(index, node);
            stack.extend(node.children.iter().rev());
        }
    }

    // Walk every tree in the scene, in root order
    pub fn traverse_all(&self, mut visit: impl FnMut(NodeIndex, &SceneNode))
    {
        for root in &self.roots
        {
            self.traverse(*root, &mut visit);
        }
    }

    // Model-space matrix of a node
    #[must_use]
    pub fn world_matrix(&self, index: NodeIndex) -> Option<Mat4>
    {
        let mut node = self.node(index)?;
        let mut mtx = node.local.to_world_mtx();
        // parents are always added first, so the chain is bounded by the node count
        for _ in 0..self.nodes.len()
        {
            let Some(parent) = self.node(node.parent) else { return Some(mtx); };
            mtx = parent.local.to_world_mtx() * mtx;
            node = parent;
        }
        debug_panic!("Parent chain of {index:?} does not terminate");
        Some(mtx)
    }
}
