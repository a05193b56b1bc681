use crate::{
    Affine, Error, NodeId, NodeKind, Path, Point2D, Scene, SceneNode, Style, Warning, path_points,
};
use std::collections::{BTreeMap, HashMap};

/// Ordered attribute list of one element.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Attributes(Vec<(String, String)>);

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.push((key.into(), value.into()));
    }

    /// First value recorded for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Receiver for a depth-first element event stream.
///
/// The tokenizer that produces the events lives outside this crate; it only
/// has to call these methods in document order.
pub trait DocumentHandler {
    fn document_start(&mut self) {}

    fn element_start(&mut self, name: &str, attributes: &Attributes);

    fn text(&mut self, _text: &str) {}

    fn element_end(&mut self, name: &str);

    fn document_end(&mut self) {}

    fn parse_error(&mut self, description: &str);
}

#[derive(Clone, Debug, PartialEq)]
pub struct SceneConfig {
    /// `id` of the path whose vertices are the joint positions.
    pub skeleton_path_id: String,
    /// Separator before the numeric joint key in element ids (`bone-4`).
    pub key_separator: char,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            skeleton_path_id: "skeletonPath".to_string(),
            key_separator: '-',
        }
    }
}

/// Joint key of an element id: its trailing `separator`-delimited component,
/// if that component is all ASCII digits.
pub fn parse_joint_key(id: &str, separator: char) -> Option<u32> {
    let tail = id.rsplit(separator).next()?;
    if tail.is_empty() || !tail.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    tail.parse().ok()
}

/// Flat scene produced by [`SceneBuilder`].
#[derive(Clone, Debug)]
pub struct ParsedDocument {
    pub scene: Scene,
    /// Groups by joint key, in document order.
    pub keyed: BTreeMap<u32, Vec<NodeId>>,
    /// Element `id` to node. The first element with a given id wins.
    pub names: HashMap<String, NodeId>,
    pub skeleton_points: Option<Vec<Point2D>>,
    pub warnings: Vec<Warning>,
}

impl ParsedDocument {
    pub fn keyed_nodes(&self, key: u32) -> &[NodeId] {
        self.keyed.get(&key).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn node_by_name(&self, name: &str) -> Option<NodeId> {
        self.names.get(name).copied()
    }
}

#[derive(Debug)]
struct OpenElement {
    name: String,
    pushed_parent: bool,
    is_group: bool,
}

/// Builds the flat scene from element events.
///
/// Groups get the current z counter, which advances once per closed group,
/// so z follows document order rather than nesting depth. Paths take the z
/// of the group they appear in.
#[derive(Debug)]
pub struct SceneBuilder {
    config: SceneConfig,
    scene: Option<Scene>,
    parents: Vec<NodeId>,
    open: Vec<OpenElement>,
    z_counter: u32,
    keyed: BTreeMap<u32, Vec<NodeId>>,
    names: HashMap<String, NodeId>,
    skeleton_points: Option<Vec<Point2D>>,
    warnings: Vec<Warning>,
    errors: Vec<String>,
}

impl Default for SceneBuilder {
    fn default() -> Self {
        Self::new(SceneConfig::default())
    }
}

impl SceneBuilder {
    pub fn new(config: SceneConfig) -> Self {
        Self {
            config,
            scene: None,
            parents: Vec::new(),
            open: Vec::new(),
            z_counter: 0,
            keyed: BTreeMap::new(),
            names: HashMap::new(),
            skeleton_points: None,
            warnings: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn finish(self) -> Result<ParsedDocument, Error> {
        if !self.errors.is_empty() {
            return Err(Error::Document {
                message: self.errors.join("; "),
            });
        }
        let scene = self.scene.ok_or(Error::MissingRoot)?;
        log::debug!(
            "scene built: {} nodes, {} keys, {} skeleton points, {} warnings",
            scene.len(),
            self.keyed.len(),
            self.skeleton_points.as_ref().map_or(0, Vec::len),
            self.warnings.len()
        );
        Ok(ParsedDocument {
            scene,
            keyed: self.keyed,
            names: self.names,
            skeleton_points: self.skeleton_points,
            warnings: self.warnings,
        })
    }

    fn report(&mut self, warning: Warning) {
        log::warn!("{warning}");
        self.warnings.push(warning);
    }

    fn start_group(&mut self, scene_parent: NodeId, attributes: &Attributes) -> NodeId {
        let name = attributes.get("id").map(str::to_string);
        let mut node = SceneNode::new(NodeKind::Group, name);
        node.z_index = self.z_counter;
        if let Some(transform) = attributes.get("transform") {
            if let Some(warning) = node.transform.apply_transform_attr(transform) {
                self.warnings.push(warning);
            }
        }
        let key = node
            .name
            .as_deref()
            .and_then(|id| parse_joint_key(id, self.config.key_separator));

        let Some(scene) = self.scene.as_mut() else {
            return scene_parent;
        };
        let id = scene.add_child(scene_parent, node);
        if let Some(key) = key {
            self.keyed.entry(key).or_default().push(id);
        }
        self.record_name(id);
        id
    }

    fn record_name(&mut self, id: NodeId) {
        let Some(name) = self
            .scene
            .as_ref()
            .and_then(|scene| scene.node(id).name.clone())
        else {
            return;
        };
        if self.names.contains_key(&name) {
            log::debug!("duplicate element id '{name}'; keeping the first");
            return;
        }
        self.names.insert(name, id);
    }

    fn add_path(&mut self, scene_parent: NodeId, attributes: &Attributes) {
        let name = attributes.get("id").map(str::to_string);

        let data = Path::parse(attributes.get("d").unwrap_or_default());
        self.warnings.extend(data.warnings);

        let style = match attributes.get("style") {
            Some(raw) => {
                let (style, warnings) = Style::parse(raw);
                self.warnings.extend(warnings);
                style
            }
            None => Style::default(),
        };

        let mut transform = Affine::IDENTITY;
        if let Some(raw) = attributes.get("transform") {
            if let Some(warning) = transform.apply_transform_attr(raw) {
                self.warnings.push(warning);
            }
        }

        let mut node = SceneNode::new(
            NodeKind::Path {
                path: data.path,
                style,
            },
            name,
        );
        node.transform = transform;
        node.z_index = self.z_counter;

        if let Some(scene) = self.scene.as_mut() {
            let id = scene.add_child(scene_parent, node);
            self.record_name(id);
        }
    }

    fn read_skeleton_path(&mut self, attributes: &Attributes) {
        if attributes.get("transform").is_some() {
            self.report(Warning::SkeletonPathTransformIgnored {
                id: self.config.skeleton_path_id.clone(),
            });
        }
        let (points, warnings) = path_points(attributes.get("d").unwrap_or_default());
        self.warnings.extend(warnings);
        if self.skeleton_points.is_some() {
            log::warn!(
                "duplicate skeleton path '{}'; using the last one",
                self.config.skeleton_path_id
            );
        }
        log::debug!("skeleton path: {} points", points.len());
        self.skeleton_points = Some(points);
    }
}

impl DocumentHandler for SceneBuilder {
    fn document_start(&mut self) {
        log::trace!("document start");
    }

    fn element_start(&mut self, name: &str, attributes: &Attributes) {
        log::trace!("<{name}> ({} attributes)", attributes.len());
        let mut pushed_parent = false;
        let mut is_group = false;

        match (name, self.parents.last().copied()) {
            ("svg", None) if self.scene.is_none() => {
                let scene = Scene::new(attributes.get("id").map(str::to_string));
                self.parents.push(scene.root());
                self.scene = Some(scene);
                pushed_parent = true;
            }
            ("svg" | "g" | "path", None) => {
                self.report(Warning::OutsideRoot {
                    element: name.to_string(),
                });
            }
            ("g", Some(parent)) => {
                let group = self.start_group(parent, attributes);
                self.parents.push(group);
                pushed_parent = true;
                is_group = true;
            }
            ("path", Some(parent)) => {
                if attributes.get("id") == Some(self.config.skeleton_path_id.as_str()) {
                    self.read_skeleton_path(attributes);
                } else {
                    self.add_path(parent, attributes);
                }
            }
            _ => log::debug!("<{name}> not interpreted"),
        }

        self.open.push(OpenElement {
            name: name.to_string(),
            pushed_parent,
            is_group,
        });
    }

    fn text(&mut self, _text: &str) {}

    fn element_end(&mut self, name: &str) {
        let Some(open) = self.open.pop() else {
            self.report(Warning::UnbalancedEnd {
                element: name.to_string(),
            });
            return;
        };
        if open.name != name {
            self.report(Warning::UnbalancedEnd {
                element: name.to_string(),
            });
        }
        if open.pushed_parent {
            self.parents.pop();
        }
        if open.is_group {
            self.z_counter += 1;
        }
    }

    fn document_end(&mut self) {
        if !self.open.is_empty() {
            log::warn!("document ended with {} open elements", self.open.len());
        }
    }

    fn parse_error(&mut self, description: &str) {
        log::error!("event source error: {description}");
        self.errors.push(description.to_string());
    }
}
