//! Undirected conversation graph with union-find component extraction

use rustc_hash::FxHashMap;

/// Graph over nodes `0..n`; only connectivity is retained
#[derive(Debug, Clone)]
pub struct ConversationGraph {
    parent: Vec<usize>,
    rank: Vec<usize>,
    edges: usize,
}

impl ConversationGraph {
    pub fn new(nodes: usize) -> Self {
        Self {
            parent: (0..nodes).collect(),
            rank: vec![0; nodes],
            edges: 0,
        }
    }

    pub fn node_count(&self) -> usize {
        self.parent.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges
    }

    pub fn add_edge(&mut self, a: usize, b: usize) {
        self.edges += 1;
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb,
            std::cmp::Ordering::Greater => self.parent[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
            }
        }
    }

    pub fn connected(&mut self, a: usize, b: usize) -> bool {
        self.find(a) == self.find(b)
    }

    fn find(&mut self, node: usize) -> usize {
        let mut root = node;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        // path compression
        let mut current = node;
        while self.parent[current] != root {
            let next = self.parent[current];
            self.parent[current] = root;
            current = next;
        }
        root
    }

    /// Connected components, each ascending, ordered by their smallest node
    pub fn components(&mut self) -> Vec<Vec<usize>> {
        let mut slots: FxHashMap<usize, usize> = FxHashMap::default();
        let mut components: Vec<Vec<usize>> = Vec::new();
        for node in 0..self.parent.len() {
            let root = self.find(node);
            let slot = *slots.entry(root).or_insert_with(|| {
                components.push(Vec::new());
                components.len() - 1
            });
            components[slot].push(node);
        }
        components
    }
}
