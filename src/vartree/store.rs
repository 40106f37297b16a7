use std::fmt;

use thiserror::Error;

/// Errors raised by the tree container
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The node id refers to an erased or foreign row
    #[error("stale node id {0}")]
    StaleNode(NodeId),
    /// The schema has no column with this name
    #[error("unknown column \"{0}\"")]
    UnknownColumn(String),
    /// A typed accessor was used against a column of another kind
    #[error("column \"{column}\" holds {actual}, not {requested}")]
    ColumnType {
        column: String,
        requested: &'static str,
        actual: &'static str,
    },
}

/// Stable handle to a row in a `TreeStore`.
///
/// Ids are an index plus a generation; erasing a row bumps the slot's
/// generation, so handles held across an erase are detected as stale
/// instead of silently addressing a recycled row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index, self.generation)
    }
}

/// Kind of value a column holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Flag,
    Int,
}

impl ColumnKind {
    fn name(self) -> &'static str {
        match self {
            ColumnKind::Text => "text",
            ColumnKind::Flag => "flag",
            ColumnKind::Int => "int",
        }
    }
}

/// A single cell value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnValue {
    Text(String),
    Flag(bool),
    Int(i64),
}

impl ColumnValue {
    fn kind(&self) -> ColumnKind {
        match self {
            ColumnValue::Text(_) => ColumnKind::Text,
            ColumnValue::Flag(_) => ColumnKind::Flag,
            ColumnValue::Int(_) => ColumnKind::Int,
        }
    }

    fn default_for(kind: ColumnKind) -> Self {
        match kind {
            ColumnKind::Text => ColumnValue::Text(String::new()),
            ColumnKind::Flag => ColumnValue::Flag(false),
            ColumnKind::Int => ColumnValue::Int(0),
        }
    }
}

/// Ordered, named, typed column layout for one store instance.
///
/// Each panel builds its own schema and hands it to the store it owns;
/// there is no process-wide column registry.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    columns: Vec<(String, ColumnKind)>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column; builder style
    pub fn column(mut self, name: &str, kind: ColumnKind) -> Self {
        self.columns.push((name.to_string(), kind));
        self
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|(n, _)| n == name)
    }

    fn default_row(&self) -> Vec<ColumnValue> {
        self.columns
            .iter()
            .map(|(_, kind)| ColumnValue::default_for(*kind))
            .collect()
    }
}

struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    values: Vec<ColumnValue>,
}

struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// Hierarchical row store backing the tree panels.
///
/// The store owns every node in a slot arena; rows are addressed by
/// generation-checked `NodeId`s or by child-index paths. Rows at the top
/// level (the panel anchors) have no parent.
pub struct TreeStore {
    schema: Schema,
    slots: Vec<Slot>,
    free: Vec<u32>,
    roots: Vec<NodeId>,
}

impl TreeStore {
    pub fn new(schema: Schema) -> Self {
        Self {
            schema,
            slots: Vec::new(),
            free: Vec::new(),
            roots: Vec::new(),
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Number of live rows
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.node.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(|s| s.node.is_none())
    }

    /// Whether the id still addresses a live row
    pub fn contains(&self, node: NodeId) -> bool {
        self.slot(node).is_some()
    }

    /// Append a new row under `parent`, or at the top level for `None`
    pub fn append(&mut self, parent: Option<NodeId>) -> Result<NodeId, StoreError> {
        if let Some(p) = parent {
            self.node(p)?;
        }
        let values = self.schema.default_row();
        let id = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.node = Some(Node {
                    parent,
                    children: Vec::new(),
                    values,
                });
                NodeId {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot {
                    generation: 0,
                    node: Some(Node {
                        parent,
                        children: Vec::new(),
                        values,
                    }),
                });
                NodeId {
                    index,
                    generation: 0,
                }
            }
        };
        match parent {
            Some(p) => self.node_mut(p)?.children.push(id),
            None => self.roots.push(id),
        }
        Ok(id)
    }

    /// Immediate children of `parent` (top-level rows for `None`)
    pub fn children(&self, parent: Option<NodeId>) -> Result<&[NodeId], StoreError> {
        match parent {
            Some(p) => Ok(&self.node(p)?.children),
            None => Ok(&self.roots),
        }
    }

    pub fn parent(&self, node: NodeId) -> Result<Option<NodeId>, StoreError> {
        Ok(self.node(node)?.parent)
    }

    /// Remove a row and its entire subtree
    pub fn erase(&mut self, node: NodeId) -> Result<(), StoreError> {
        let parent = self.node(node)?.parent;
        match parent {
            Some(p) => self.node_mut(p)?.children.retain(|c| *c != node),
            None => self.roots.retain(|c| *c != node),
        }
        self.drop_subtree(node);
        Ok(())
    }

    /// Remove every child of `node`, keeping the row itself
    pub fn clear_children(&mut self, node: NodeId) -> Result<(), StoreError> {
        let children = std::mem::take(&mut self.node_mut(node)?.children);
        for child in children {
            self.drop_subtree(child);
        }
        Ok(())
    }

    /// Get a raw cell value
    pub fn get(&self, node: NodeId, column: &str) -> Result<&ColumnValue, StoreError> {
        let index = self.column_index(column)?;
        Ok(&self.node(node)?.values[index])
    }

    /// Set a raw cell value; the kind must match the schema
    pub fn set(&mut self, node: NodeId, column: &str, value: ColumnValue) -> Result<(), StoreError> {
        let index = self.column_index(column)?;
        let expected = self.schema.columns[index].1;
        if value.kind() != expected {
            return Err(StoreError::ColumnType {
                column: column.to_string(),
                requested: value.kind().name(),
                actual: expected.name(),
            });
        }
        self.node_mut(node)?.values[index] = value;
        Ok(())
    }

    /// Text cell accessor
    pub fn text(&self, node: NodeId, column: &str) -> Result<&str, StoreError> {
        match self.get(node, column)? {
            ColumnValue::Text(s) => Ok(s),
            other => Err(self.type_error(column, "text", other)),
        }
    }

    pub fn set_text(&mut self, node: NodeId, column: &str, value: &str) -> Result<(), StoreError> {
        self.set(node, column, ColumnValue::Text(value.to_string()))
    }

    /// Flag cell accessor
    pub fn flag(&self, node: NodeId, column: &str) -> Result<bool, StoreError> {
        match self.get(node, column)? {
            ColumnValue::Flag(b) => Ok(*b),
            other => Err(self.type_error(column, "flag", other)),
        }
    }

    pub fn set_flag(&mut self, node: NodeId, column: &str, value: bool) -> Result<(), StoreError> {
        self.set(node, column, ColumnValue::Flag(value))
    }

    /// Int cell accessor
    pub fn int(&self, node: NodeId, column: &str) -> Result<i64, StoreError> {
        match self.get(node, column)? {
            ColumnValue::Int(v) => Ok(*v),
            other => Err(self.type_error(column, "int", other)),
        }
    }

    pub fn set_int(&mut self, node: NodeId, column: &str, value: i64) -> Result<(), StoreError> {
        self.set(node, column, ColumnValue::Int(value))
    }

    /// Child-index path from the top level down to `node`
    pub fn path_of(&self, node: NodeId) -> Result<Vec<usize>, StoreError> {
        let mut path = Vec::new();
        let mut current = node;
        loop {
            let parent = self.node(current)?.parent;
            let siblings = self.children(parent)?;
            let position = siblings
                .iter()
                .position(|c| *c == current)
                .ok_or(StoreError::StaleNode(current))?;
            path.push(position);
            match parent {
                Some(p) => current = p,
                None => break,
            }
        }
        path.reverse();
        Ok(path)
    }

    /// Row addressed by a child-index path, if it exists
    pub fn node_at_path(&self, path: &[usize]) -> Option<NodeId> {
        let mut current: Option<NodeId> = None;
        for step in path {
            let children = self.children(current).ok()?;
            current = Some(*children.get(*step)?);
        }
        current
    }

    /// Depth-first iteration over every live row
    pub fn iter(&self) -> TreeIter<'_> {
        let mut stack: Vec<NodeId> = self.roots.clone();
        stack.reverse();
        TreeIter { store: self, stack }
    }

    fn drop_subtree(&mut self, node: NodeId) {
        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            let slot = &mut self.slots[id.index as usize];
            if slot.generation != id.generation {
                continue;
            }
            if let Some(n) = slot.node.take() {
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(id.index);
                stack.extend(n.children);
            }
        }
    }

    fn column_index(&self, column: &str) -> Result<usize, StoreError> {
        self.schema
            .index_of(column)
            .ok_or_else(|| StoreError::UnknownColumn(column.to_string()))
    }

    fn type_error(&self, column: &str, requested: &'static str, actual: &ColumnValue) -> StoreError {
        StoreError::ColumnType {
            column: column.to_string(),
            requested,
            actual: actual.kind().name(),
        }
    }

    fn slot(&self, node: NodeId) -> Option<&Node> {
        let slot = self.slots.get(node.index as usize)?;
        if slot.generation != node.generation {
            return None;
        }
        slot.node.as_ref()
    }

    fn node(&self, node: NodeId) -> Result<&Node, StoreError> {
        self.slot(node).ok_or(StoreError::StaleNode(node))
    }

    fn node_mut(&mut self, node: NodeId) -> Result<&mut Node, StoreError> {
        let slot = self
            .slots
            .get_mut(node.index as usize)
            .ok_or(StoreError::StaleNode(node))?;
        if slot.generation != node.generation {
            return Err(StoreError::StaleNode(node));
        }
        slot.node.as_mut().ok_or(StoreError::StaleNode(node))
    }
}

/// Iterator returned by `TreeStore::iter`
pub struct TreeIter<'a> {
    store: &'a TreeStore,
    stack: Vec<NodeId>,
}

impl Iterator for TreeIter<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        if let Ok(children) = self.store.children(Some(id)) {
            for child in children.iter().rev() {
                self.stack.push(*child);
            }
        }
        Some(id)
    }
}
