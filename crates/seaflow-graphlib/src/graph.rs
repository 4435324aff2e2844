//! The [`Graph`] container.
//!
//! Nodes carry a label of type `N`, edges a label of type `E`, and the graph itself a label of
//! type `G`. Layout passes keep their working state (ranks, orders, coordinates) in these labels.
//!
//! Every node slot lists the indices of its outgoing and incoming edges in insertion order, so
//! adjacency queries and `(v, w, name)` lookups only scan the edges of one node. Removals rebuild
//! those lists from scratch.

use rustc_hash::FxBuildHasher;

type HashMap<K, V> = hashbrown::HashMap<K, V, FxBuildHasher>;

#[derive(Debug, Clone, Copy, Default)]
pub struct GraphOptions {
    /// Allow several `v -> w` edges told apart by name. Without it edge names are ignored.
    pub multigraph: bool,
}

/// Endpoints `v -> w` of an edge, plus its name on multigraphs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EdgeKey {
    pub v: String,
    pub w: String,
    pub name: Option<String>,
}

impl EdgeKey {
    pub fn new(
        v: impl Into<String>,
        w: impl Into<String>,
        name: Option<impl Into<String>>,
    ) -> Self {
        Self {
            v: v.into(),
            w: w.into(),
            name: name.map(Into::into),
        }
    }

    pub fn is_self_loop(&self) -> bool {
        self.v == self.w
    }

    /// The key of the same connection running `w -> v`, stored under `name`.
    ///
    /// Cycle removal flips an edge under a fresh `rev{i}` name so it cannot collide with an
    /// existing `w -> v` edge, and flips it back under its original name.
    pub fn flipped(&self, name: Option<String>) -> Self {
        Self {
            v: self.w.clone(),
            w: self.v.clone(),
            name,
        }
    }

    fn leads_to(&self, w: &str, name: Option<&str>) -> bool {
        self.w == w && self.name.as_deref() == name
    }
}

struct Slot<N> {
    id: String,
    label: N,
    out: Vec<usize>,
    in_: Vec<usize>,
}

struct Edge<E> {
    key: EdgeKey,
    label: E,
}

pub struct Graph<N, E, G>
where
    N: Default + 'static,
    E: Default,
    G: Default,
{
    options: GraphOptions,
    label: G,
    default_node_label: Box<dyn Fn() -> N + Send + Sync>,
    nodes: Vec<Slot<N>>,
    index: HashMap<String, usize>,
    edges: Vec<Edge<E>>,
}

impl<N, E, G> Graph<N, E, G>
where
    N: Default + 'static,
    E: Default,
    G: Default,
{
    pub fn new(options: GraphOptions) -> Self {
        Self {
            options,
            label: G::default(),
            default_node_label: Box::new(N::default),
            nodes: Vec::new(),
            index: HashMap::default(),
            edges: Vec::new(),
        }
    }

    pub fn set_graph(&mut self, label: G) -> &mut Self {
        self.label = label;
        self
    }

    pub fn graph(&self) -> &G {
        &self.label
    }

    pub fn graph_mut(&mut self) -> &mut G {
        &mut self.label
    }

    /// Label given to nodes that are created implicitly by [`Graph::set_edge`].
    pub fn set_default_node_label<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn() -> N + Send + Sync + 'static,
    {
        self.default_node_label = Box::new(f);
        self
    }

    fn slot(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    fn find_edge(&self, v: &str, w: &str, name: Option<&str>) -> Option<usize> {
        let name = if self.options.multigraph { name } else { None };
        let v_ix = self.slot(v)?;
        self.nodes[v_ix]
            .out
            .iter()
            .copied()
            .find(|&e| self.edges[e].key.leads_to(w, name))
    }

    fn rebuild(&mut self) {
        self.index.clear();
        for (ix, slot) in self.nodes.iter_mut().enumerate() {
            slot.out.clear();
            slot.in_.clear();
            self.index.insert(slot.id.clone(), ix);
        }
        for (e, edge) in self.edges.iter().enumerate() {
            let v = self.index.get(edge.key.v.as_str()).copied();
            let w = self.index.get(edge.key.w.as_str()).copied();
            if let (Some(v), Some(w)) = (v, w) {
                self.nodes[v].out.push(e);
                self.nodes[w].in_.push(e);
            }
        }
    }

    // ---- nodes -------------------------------------------------------------------------------

    pub fn has_node(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Inserts a node, or replaces the label of an existing one without moving it.
    pub fn set_node(&mut self, id: impl Into<String>, label: N) -> &mut Self {
        let id = id.into();
        if let Some(ix) = self.slot(&id) {
            self.nodes[ix].label = label;
            return self;
        }
        self.index.insert(id.clone(), self.nodes.len());
        self.nodes.push(Slot {
            id,
            label,
            out: Vec::new(),
            in_: Vec::new(),
        });
        self
    }

    fn ensure_node(&mut self, id: &str) {
        if !self.has_node(id) {
            let label = (self.default_node_label)();
            self.set_node(id, label);
        }
    }

    pub fn node(&self, id: &str) -> Option<&N> {
        self.slot(id).map(|ix| &self.nodes[ix].label)
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut N> {
        let ix = self.slot(id)?;
        Some(&mut self.nodes[ix].label)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(|n| n.id.as_str())
    }

    pub fn node_ids(&self) -> Vec<String> {
        self.nodes.iter().map(|n| n.id.clone()).collect()
    }

    pub fn for_each_node<F>(&self, mut f: F)
    where
        F: FnMut(&str, &N),
    {
        for n in &self.nodes {
            f(&n.id, &n.label);
        }
    }

    pub fn for_each_node_mut<F>(&mut self, mut f: F)
    where
        F: FnMut(&str, &mut N),
    {
        for n in &mut self.nodes {
            f(&n.id, &mut n.label);
        }
    }

    /// Removes a node and every edge touching it.
    pub fn remove_node(&mut self, id: &str) -> bool {
        if !self.has_node(id) {
            return false;
        }
        self.nodes.retain(|n| n.id != id);
        self.edges.retain(|e| e.key.v != id && e.key.w != id);
        self.rebuild();
        true
    }

    /// Nodes without incoming edges, in insertion order.
    pub fn sources(&self) -> Vec<&str> {
        self.nodes
            .iter()
            .filter(|n| n.in_.is_empty())
            .map(|n| n.id.as_str())
            .collect()
    }

    // ---- edges -------------------------------------------------------------------------------

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn edges(&self) -> impl Iterator<Item = &EdgeKey> {
        self.edges.iter().map(|e| &e.key)
    }

    pub fn edge_keys(&self) -> Vec<EdgeKey> {
        self.edges.iter().map(|e| e.key.clone()).collect()
    }

    pub fn for_each_edge_mut<F>(&mut self, mut f: F)
    where
        F: FnMut(&EdgeKey, &mut E),
    {
        for e in &mut self.edges {
            f(&e.key, &mut e.label);
        }
    }

    pub fn set_edge(&mut self, v: impl Into<String>, w: impl Into<String>) -> &mut Self {
        self.set_edge_named(v, w, None::<String>, None)
    }

    pub fn set_edge_key(&mut self, key: EdgeKey, label: E) -> &mut Self {
        self.set_edge_named(key.v, key.w, key.name, Some(label))
    }

    /// Inserts an edge, creating missing endpoints with the default node label. Setting an
    /// existing edge only replaces its label when one is given.
    pub fn set_edge_named(
        &mut self,
        v: impl Into<String>,
        w: impl Into<String>,
        name: Option<impl Into<String>>,
        label: Option<E>,
    ) -> &mut Self {
        let (v, w) = (v.into(), w.into());
        let name = if self.options.multigraph {
            name.map(Into::into)
        } else {
            None
        };

        if let Some(e) = self.find_edge(&v, &w, name.as_deref()) {
            if let Some(label) = label {
                self.edges[e].label = label;
            }
            return self;
        }

        self.ensure_node(&v);
        self.ensure_node(&w);
        let e = self.edges.len();
        if let (Some(v_ix), Some(w_ix)) = (self.slot(&v), self.slot(&w)) {
            self.nodes[v_ix].out.push(e);
            self.nodes[w_ix].in_.push(e);
        }
        self.edges.push(Edge {
            key: EdgeKey { v, w, name },
            label: label.unwrap_or_default(),
        });
        self
    }

    pub fn set_path(&mut self, nodes: &[&str]) -> &mut Self {
        for pair in nodes.windows(2) {
            self.set_edge(pair[0], pair[1]);
        }
        self
    }

    pub fn has_edge(&self, v: &str, w: &str, name: Option<&str>) -> bool {
        self.find_edge(v, w, name).is_some()
    }

    pub fn edge(&self, v: &str, w: &str, name: Option<&str>) -> Option<&E> {
        let e = self.find_edge(v, w, name)?;
        Some(&self.edges[e].label)
    }

    pub fn edge_by_key(&self, key: &EdgeKey) -> Option<&E> {
        self.edge(&key.v, &key.w, key.name.as_deref())
    }

    pub fn edge_mut_by_key(&mut self, key: &EdgeKey) -> Option<&mut E> {
        let e = self.find_edge(&key.v, &key.w, key.name.as_deref())?;
        Some(&mut self.edges[e].label)
    }

    pub fn remove_edge_key(&mut self, key: &EdgeKey) -> bool {
        let Some(e) = self.find_edge(&key.v, &key.w, key.name.as_deref()) else {
            return false;
        };
        self.edges.remove(e);
        self.rebuild();
        true
    }

    // ---- adjacency ---------------------------------------------------------------------------

    /// Successors of `v` in edge insertion order. Parallel edges yield repeated entries.
    pub fn successors(&self, v: &str) -> Vec<&str> {
        let Some(ix) = self.slot(v) else {
            return Vec::new();
        };
        self.nodes[ix]
            .out
            .iter()
            .map(|&e| self.edges[e].key.w.as_str())
            .collect()
    }

    /// Predecessors of `v` in edge insertion order. Parallel edges yield repeated entries.
    pub fn predecessors(&self, v: &str) -> Vec<&str> {
        let Some(ix) = self.slot(v) else {
            return Vec::new();
        };
        self.nodes[ix]
            .in_
            .iter()
            .map(|&e| self.edges[e].key.v.as_str())
            .collect()
    }

    /// Outgoing edges of `v`, optionally restricted to those ending at `w`.
    pub fn out_edges(&self, v: &str, w: Option<&str>) -> Vec<EdgeKey> {
        let Some(ix) = self.slot(v) else {
            return Vec::new();
        };
        self.nodes[ix]
            .out
            .iter()
            .map(|&e| &self.edges[e].key)
            .filter(|k| w.is_none_or(|w| k.w == w))
            .cloned()
            .collect()
    }

    /// Incoming edges of `v`, optionally restricted to those starting at `u`.
    pub fn in_edges(&self, v: &str, u: Option<&str>) -> Vec<EdgeKey> {
        let Some(ix) = self.slot(v) else {
            return Vec::new();
        };
        self.nodes[ix]
            .in_
            .iter()
            .map(|&e| &self.edges[e].key)
            .filter(|k| u.is_none_or(|u| k.v == u))
            .cloned()
            .collect()
    }
}

impl<N, E, G> Default for Graph<N, E, G>
where
    N: Default + 'static,
    E: Default,
    G: Default,
{
    fn default() -> Self {
        Self::new(GraphOptions::default())
    }
}
