use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::path::Path;
use glam::{Quat, Vec3};
use math_signa::Transform;
use crate::{NodeIndex, Scene};

#[derive(Debug)]
pub enum ImportError
{
    Gltf(gltf::Error),
    // a node is listed as the child of more than one parent, or of itself
    MalformedHierarchy { node: usize },
}
impl Error for ImportError { }
impl Display for ImportError
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result { Debug::fmt(self, f) }
}
impl From<gltf::Error> for ImportError
{
    fn from(e: gltf::Error) -> Self { Self::Gltf(e) }
}

// Load the node hierarchy of a .gltf/.glb file. Buffers (meshes, animations) are not loaded
pub fn import_file(path: impl AsRef<Path>) -> Result<Scene, ImportError>
{
    let path = path.as_ref();
    let gltf = gltf::Gltf::open(path)?;
    let scene = scene_from_document(&gltf.document)?;
    log::debug!("Imported {} nodes from {path:?}", scene.len());
    Ok(scene)
}

pub fn import_slice(bytes: &[u8]) -> Result<Scene, ImportError>
{
    let gltf = gltf::Gltf::from_slice(bytes)?;
    scene_from_document(&gltf.document)
}

// Every glTF node becomes a scene node. Nodes used as a joint by any skin are bones
pub fn scene_from_document(document: &gltf::Document) -> Result<Scene, ImportError>
{
    let joints: HashSet<usize> = document.skins()
        .flat_map(|skin| skin.joints().map(|j| j.index()))
        .collect();

    let node_count = document.nodes().len();
    let mut parents = vec![None; node_count];
    for node in document.nodes()
    {
        for child in node.children()
        {
            if child.index() == node.index() || parents[child.index()].is_some()
            {
                return Err(ImportError::MalformedHierarchy { node: child.index() });
            }
            parents[child.index()] = Some(node.index());
        }
    }

    // the scene requires parents before children, so add in hierarchy order and remap
    let mut remap = vec![NodeIndex::none(); node_count];
    let mut scene = Scene::with_native_names();
    let mut stack: Vec<gltf::Node> = document.nodes().filter(|n| parents[n.index()].is_none()).collect();
    stack.reverse();
    while let Some(node) = stack.pop()
    {
        let name = node.name().map(|n| n.to_string()).unwrap_or_else(|| format!("{}", node.index()));
        let (translation, rotation, scale) = node.transform().decomposed();
        let local = Transform
        {
            position: Vec3::from_array(translation),
            rotation: Quat::from_array(rotation),
            scale: Vec3::from_array(scale),
        };
        let parent = parents[node.index()].map(|p| remap[p]);
        remap[node.index()] = scene.add_node(name, joints.contains(&node.index()), local, parent);

        let mut children: Vec<gltf::Node> = node.children().collect();
        children.reverse();
        stack.extend(children);
    }

    // anything unreached is part of a cycle
    if let Some(unreached) = remap.iter().position(|r| r.is_none())
    {
        return Err(ImportError::MalformedHierarchy { node: unreached });
    }

    Ok(scene)
}
