//! Consolidation of flat field paths into one nested tree per table.
//!
//! Nodes live in an arena owned by [`SchemaTree`] and are addressed by
//! [`NodeId`]. The root is always an object branch. Children of a branch are
//! keyed by segment name in sorted order, so two trees built from the same
//! path/definition pairs compare equal regardless of declaration order.

use super::types::FieldDefinition;
use crate::error::{Result, SurqlGenError};
use std::collections::BTreeMap;

/// Index of a node inside its [`SchemaTree`].
pub type NodeId = usize;

/// Segment name used for the element node of a list branch.
pub const ELEMENT_SEGMENT: &str = "*";

#[derive(Debug, Clone)]
pub enum NodeKind {
    /// A typed scalar.
    Leaf(FieldDefinition),
    /// A nested object. `definition` is set when the object path itself was
    /// declared (e.g. `address TYPE object`).
    Branch {
        definition: Option<FieldDefinition>,
        children: BTreeMap<String, NodeId>,
    },
    /// An array. `element` describes the shape of every item.
    List {
        definition: Option<FieldDefinition>,
        element: Option<NodeId>,
    },
}

#[derive(Debug, Clone)]
pub struct SchemaNode {
    pub segment: String,
    pub kind: NodeKind,
}

impl SchemaNode {
    fn empty_branch(segment: &str) -> Self {
        Self {
            segment: segment.to_string(),
            kind: NodeKind::Branch {
                definition: None,
                children: BTreeMap::new(),
            },
        }
    }

    /// The definition declared at exactly this node's path, if any.
    pub fn definition(&self) -> Option<&FieldDefinition> {
        match &self.kind {
            NodeKind::Leaf(def) => Some(def),
            NodeKind::Branch { definition, .. } | NodeKind::List { definition, .. } => {
                definition.as_ref()
            }
        }
    }
}

/// The consolidated field tree of one table.
#[derive(Debug, Clone)]
pub struct SchemaTree {
    table: String,
    nodes: Vec<SchemaNode>,
}

/// One step along a field path.
#[derive(Debug, PartialEq, Eq)]
enum Step<'a> {
    Field(&'a str),
    Element,
}

impl SchemaTree {
    pub const ROOT: NodeId = 0;

    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            nodes: vec![SchemaNode::empty_branch("")],
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn root(&self) -> &SchemaNode {
        &self.nodes[Self::ROOT]
    }

    pub fn node(&self, id: NodeId) -> &SchemaNode {
        &self.nodes[id]
    }

    /// Children of a branch in sorted segment order. Empty for other kinds.
    pub fn children(&self, id: NodeId) -> Vec<(&str, NodeId)> {
        match &self.nodes[id].kind {
            NodeKind::Branch { children, .. } => children
                .iter()
                .map(|(name, child)| (name.as_str(), *child))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Follow a dotted path from the root. `*` steps into a list element.
    pub fn find(&self, path: &str) -> Option<NodeId> {
        let mut current = Self::ROOT;
        for step in parse_path(path).ok()? {
            current = match (&self.nodes[current].kind, step) {
                (NodeKind::Branch { children, .. }, Step::Field(name)) => *children.get(name)?,
                (NodeKind::List { element, .. }, Step::Element) => (*element)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Place one definition into the tree at the position named by its path.
    pub fn insert(&mut self, definition: FieldDefinition) -> Result<()> {
        let steps = parse_path(&definition.name).map_err(|_| SurqlGenError::EmptyFieldPath {
            table: self.table.clone(),
            path: definition.name.clone(),
        })?;

        let mut current = Self::ROOT;
        for step in steps {
            current = match step {
                Step::Field(name) => self.child_field(current, name),
                Step::Element => self.child_element(current),
            };
        }
        self.attach(current, definition);
        Ok(())
    }

    fn push(&mut self, node: SchemaNode) -> NodeId {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    fn child_field(&mut self, parent: NodeId, name: &str) -> NodeId {
        self.ensure_branch(parent);
        if let NodeKind::Branch { children, .. } = &self.nodes[parent].kind {
            if let Some(existing) = children.get(name) {
                return *existing;
            }
        }
        let id = self.push(SchemaNode::empty_branch(name));
        if let NodeKind::Branch { children, .. } = &mut self.nodes[parent].kind {
            children.insert(name.to_string(), id);
        }
        id
    }

    fn child_element(&mut self, parent: NodeId) -> NodeId {
        self.ensure_list(parent);
        if let NodeKind::List {
            element: Some(existing),
            ..
        } = &self.nodes[parent].kind
        {
            return *existing;
        }
        let id = self.push(SchemaNode::empty_branch(ELEMENT_SEGMENT));
        if let NodeKind::List { element, .. } = &mut self.nodes[parent].kind {
            *element = Some(id);
        }
        id
    }

    /// Make `id` an object branch, keeping any definition already declared.
    fn ensure_branch(&mut self, id: NodeId) {
        let node = &mut self.nodes[id];
        let replacement = match &mut node.kind {
            NodeKind::Branch { .. } => return,
            NodeKind::Leaf(def) => Some(def.clone()),
            NodeKind::List {
                definition,
                element,
            } => {
                if element.is_some() {
                    log::warn!(
                        "Field '{}' on table '{}' used as both array and object; keeping object",
                        node.segment,
                        self.table
                    );
                }
                definition.take()
            }
        };
        node.kind = NodeKind::Branch {
            definition: replacement,
            children: BTreeMap::new(),
        };
    }

    /// Make `id` a list branch, keeping any definition already declared.
    fn ensure_list(&mut self, id: NodeId) {
        let node = &mut self.nodes[id];
        let replacement = match &mut node.kind {
            NodeKind::List { .. } => return,
            NodeKind::Leaf(def) => Some(def.clone()),
            NodeKind::Branch {
                definition,
                children,
            } => {
                if !children.is_empty() {
                    log::warn!(
                        "Field '{}' on table '{}' used as both object and array; keeping array",
                        node.segment,
                        self.table
                    );
                }
                definition.take()
            }
        };
        node.kind = NodeKind::List {
            definition: replacement,
            element: None,
        };
    }

    /// Set the definition at `id`. A repeated path overwrites (last wins).
    fn attach(&mut self, id: NodeId, def: FieldDefinition) {
        let table = &self.table;
        let node = &mut self.nodes[id];
        if node.definition().is_some() {
            log::debug!(
                "Duplicate definition for '{}' on table '{table}'; last one wins",
                def.name
            );
        }
        // An intermediate branch that never received children is a plain leaf.
        let childless = matches!(&node.kind, NodeKind::Branch { children, .. } if children.is_empty());
        if childless {
            node.kind = NodeKind::Leaf(def);
            return;
        }
        match &mut node.kind {
            NodeKind::Leaf(existing) => *existing = def,
            NodeKind::Branch { definition, .. } | NodeKind::List { definition, .. } => {
                *definition = Some(def);
            }
        }
    }

    fn subtree_eq(&self, a: NodeId, other: &SchemaTree, b: NodeId) -> bool {
        let (left, right) = (&self.nodes[a], &other.nodes[b]);
        if left.segment != right.segment {
            return false;
        }
        match (&left.kind, &right.kind) {
            (NodeKind::Leaf(x), NodeKind::Leaf(y)) => x == y,
            (
                NodeKind::Branch {
                    definition: dx,
                    children: cx,
                },
                NodeKind::Branch {
                    definition: dy,
                    children: cy,
                },
            ) => {
                dx == dy
                    && cx.len() == cy.len()
                    && cx.iter().zip(cy.iter()).all(|((kx, ix), (ky, iy))| {
                        kx == ky && self.subtree_eq(*ix, other, *iy)
                    })
            }
            (
                NodeKind::List {
                    definition: dx,
                    element: ex,
                },
                NodeKind::List {
                    definition: dy,
                    element: ey,
                },
            ) => {
                dx == dy
                    && match (ex, ey) {
                        (Some(ix), Some(iy)) => self.subtree_eq(*ix, other, *iy),
                        (None, None) => true,
                        _ => false,
                    }
            }
            _ => false,
        }
    }
}

/// Trees are equal when their reachable structure matches, independent of
/// arena layout.
impl PartialEq for SchemaTree {
    fn eq(&self, other: &Self) -> bool {
        self.table == other.table && self.subtree_eq(Self::ROOT, other, Self::ROOT)
    }
}

/// Split a field path into steps. `*`, `[]`, `[*]` and `[<n>]` (alone or as a
/// segment suffix such as `tags[*]`) denote the element of an array.
fn parse_path(path: &str) -> std::result::Result<Vec<Step<'_>>, ()> {
    let mut steps = Vec::new();
    for segment in path.split('.') {
        let mut rest = segment.trim();
        let mut markers = 0;
        while let Some(open) = rest.rfind('[') {
            if !rest.ends_with(']') || !is_index_marker(&rest[open + 1..rest.len() - 1]) {
                break;
            }
            markers += 1;
            rest = &rest[..open];
        }
        match rest {
            "" if markers == 0 => return Err(()),
            "" => {}
            "*" => steps.push(Step::Element),
            name => steps.push(Step::Field(name)),
        }
        steps.extend(std::iter::repeat_with(|| Step::Element).take(markers));
    }
    // The root is always an object, so a path must start with a field name.
    match steps.first() {
        Some(Step::Field(_)) => Ok(steps),
        _ => Err(()),
    }
}

fn is_index_marker(inner: &str) -> bool {
    inner.is_empty() || inner == "*" || inner.chars().all(|c| c.is_ascii_digit())
}

/// Build the tree for `table` from its definitions in declaration order.
///
/// Definitions whose `table` names a different table are skipped.
pub fn consolidate(table: &str, fields: &[FieldDefinition]) -> Result<SchemaTree> {
    let mut tree = SchemaTree::new(table);
    for field in fields {
        if !field.table.is_empty() && field.table != table {
            log::warn!(
                "Skipping field '{}' of table '{}' while building '{table}'",
                field.name,
                field.table
            );
            continue;
        }
        tree.insert(field.clone())?;
    }
    log::debug!("Consolidated {} fields for table '{table}'", fields.len());
    Ok(tree)
}
