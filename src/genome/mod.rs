pub mod connection;
pub use connection::Connection;

use crate::{
    network::Network,
    random::{EvolutionEvent, Happens},
};
use fxhash::{FxHashMap, FxHashSet};
use log::trace;
use rand::{
    seq::{IndexedRandom, IteratorRandom},
    Rng,
};
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, VecDeque};

/// Node ids. Inputs are negative, outputs count up from zero, and hidden nodes follow the outputs
pub type NodeId = i64;

/// The single source of innovation ids for a run. The same path always yields the same id, no
/// matter which genome asks or when
#[derive(Debug, Clone, Default)]
pub struct InnoGen {
    /// highest innovation id handed out so far
    pub head: usize,
    seen: FxHashMap<(NodeId, NodeId), usize>,
}

impl InnoGen {
    pub fn new(head: usize) -> Self {
        Self {
            head,
            seen: FxHashMap::default(),
        }
    }

    pub fn next_innovation(&mut self, path: (NodeId, NodeId)) -> usize {
        match self.seen.get(&path) {
            Some(n) => *n,
            None => {
                self.head += 1;
                self.seen.insert(path, self.head);
                self.head
            }
        }
    }

    /// Learn an innovation id assigned elsewhere, like one read back from a saved genome
    pub fn observe(&mut self, connection: &Connection) {
        self.seen
            .entry(connection.path())
            .or_insert(connection.inno);
        self.head = self.head.max(connection.inno);
    }

    /// Forget every path. Genes already living in genomes keep their ids
    pub fn reset(&mut self) {
        self.head = 0;
        self.seen.clear();
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

/// perturb a parameter by a standard normal sample, or occasionally replace it with one
pub(crate) fn mutate_param(v: &mut f64, rng: &mut impl Happens) {
    let sample: f64 = rng.sample(StandardNormal);
    if rng.happens(EvolutionEvent::PerturbParam) {
        *v += sample;
    } else {
        *v = sample;
    }
}

/// A feed-forward genome: a bag of connection genes, a bias per node, and the hidden nodes its
/// genes have discovered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Genome {
    sensory: usize,
    action: usize,
    connections: Vec<Connection>,
    #[serde(default)]
    bias: FxHashMap<NodeId, f64>,
    #[serde(default)]
    hidden: BTreeSet<NodeId>,
    #[serde(skip)]
    pub fitness: f64,
}

impl Genome {
    /// A new genome with no connections, and a known input and output size
    pub fn new(sensory: usize, action: usize) -> Self {
        Self {
            sensory,
            action,
            connections: vec![],
            bias: FxHashMap::default(),
            hidden: BTreeSet::new(),
            fitness: 0.,
        }
    }

    #[inline]
    pub fn sensory(&self) -> usize {
        self.sensory
    }

    #[inline]
    pub fn action(&self) -> usize {
        self.action
    }

    /// id of the `idx`th input node
    #[inline]
    pub fn sensory_id(&self, idx: usize) -> NodeId {
        idx as NodeId - self.sensory as NodeId
    }

    /// id of the `idx`th output node
    #[inline]
    pub fn action_id(&self, idx: usize) -> NodeId {
        idx as NodeId
    }

    pub fn sensory_ids(&self) -> impl Iterator<Item = NodeId> {
        -(self.sensory as NodeId)..0
    }

    pub fn action_ids(&self) -> impl Iterator<Item = NodeId> {
        0..self.action as NodeId
    }

    #[inline]
    pub fn is_sensory(&self, id: NodeId) -> bool {
        (-(self.sensory as NodeId)..0).contains(&id)
    }

    #[inline]
    pub fn is_action(&self, id: NodeId) -> bool {
        (0..self.action as NodeId).contains(&id)
    }

    #[inline]
    pub fn hidden(&self) -> &BTreeSet<NodeId> {
        &self.hidden
    }

    #[inline]
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    #[inline]
    pub fn connections_mut(&mut self) -> &mut [Connection] {
        &mut self.connections
    }

    /// bias of some node, 0 when it was never set
    pub fn bias(&self, id: NodeId) -> f64 {
        self.bias.get(&id).copied().unwrap_or(0.)
    }

    pub fn set_bias(&mut self, id: NodeId, bias: f64) {
        self.bias.insert(id, bias);
    }

    pub(crate) fn biases(&self) -> &FxHashMap<NodeId, f64> {
        &self.bias
    }

    pub(crate) fn extend_biases(&mut self, biases: &FxHashMap<NodeId, f64>) {
        self.bias.extend(biases.iter().map(|(k, v)| (*k, *v)));
    }

    /// Push a connection onto the genome, learning about any hidden node it touches
    pub fn push_connection(&mut self, connection: Connection) {
        debug_assert!(
            !self.connections.iter().any(|c| c.path() == connection.path()),
            "duplicate path {:?}",
            connection.path()
        );
        for id in [connection.from, connection.to] {
            if id >= self.action as NodeId {
                self.hidden.insert(id);
            }
        }
        self.connections.push(connection);
    }

    /// Push 2 connections onto the genome, first then second
    pub fn push_2_connections(&mut self, first: Connection, second: Connection) {
        self.connections.reserve(2);
        self.push_connection(first);
        self.push_connection(second);
    }

    /// Forward adjacency over enabled connections
    fn adjacency(&self) -> FxHashMap<NodeId, Vec<NodeId>> {
        let mut adj: FxHashMap<NodeId, Vec<NodeId>> = FxHashMap::default();
        for c in self.connections.iter().filter(|c| c.enabled) {
            adj.entry(c.from).or_default().push(c.to);
        }
        adj
    }

    /// Shortest hop count from any input to every node reachable from one, following enabled
    /// connections. Nodes missing from the result are unreachable.
    pub fn depths(&self) -> FxHashMap<NodeId, usize> {
        let adj = self.adjacency();
        let mut depth = FxHashMap::default();
        let mut queue = VecDeque::new();
        for id in self.sensory_ids() {
            depth.insert(id, 0);
            queue.push_back(id);
        }

        while let Some(id) = queue.pop_front() {
            let d = depth[&id];
            for next in adj.get(&id).into_iter().flatten() {
                if !depth.contains_key(next) {
                    depth.insert(*next, d + 1);
                    queue.push_back(*next);
                }
            }
        }

        depth
    }

    /// Whether `to` can be reached from `from` through enabled connections
    pub fn reaches(&self, from: NodeId, to: NodeId) -> bool {
        reaches(&self.adjacency(), from, to)
    }

    /// Every path that a new connection may take: not already a gene, not a self loop, leading
    /// strictly away from the inputs, and never closing a cycle
    pub fn open_paths(&self) -> Vec<(NodeId, NodeId)> {
        let taken = self
            .connections
            .iter()
            .map(Connection::path)
            .collect::<FxHashSet<_>>();
        let depths = self.depths();
        let adj = self.adjacency();

        let sources = self.sensory_ids().chain(self.hidden.iter().copied());
        let mut open = Vec::new();
        for from in sources {
            let Some(from_depth) = depths.get(&from) else {
                continue;
            };
            for to in self.hidden.iter().copied().chain(self.action_ids()) {
                if from == to || taken.contains(&(from, to)) {
                    continue;
                }
                if depths.get(&to).is_some_and(|to_depth| to_depth <= from_depth) {
                    continue;
                }
                if reaches(&adj, to, from) {
                    continue;
                }
                open.push((from, to));
            }
        }

        open
    }

    pub fn open_path(&self, rng: &mut impl Rng) -> Option<(NodeId, NodeId)> {
        self.open_paths().choose(rng).copied()
    }

    /// The id a freshly bisected node gets
    pub fn next_hidden_id(&self) -> NodeId {
        match self.hidden.last() {
            Some(id) => id + 1,
            None => self.action as NodeId,
        }
    }

    /// Perturb or replace every connection weight
    pub fn mutate_weights(&mut self, rng: &mut impl Happens) {
        for c in self.connections.iter_mut() {
            mutate_param(&mut c.weight, rng);
        }
    }

    /// Perturb or replace the bias of every output and hidden node
    pub fn mutate_biases(&mut self, rng: &mut impl Happens) {
        let ids = self
            .action_ids()
            .chain(self.hidden.iter().copied())
            .collect::<Vec<_>>();
        for id in ids {
            mutate_param(self.bias.entry(id).or_insert(0.), rng);
        }
    }

    /// Generate a new connection along some open path. Returns false if the genome has no open
    /// path left
    pub fn mutate_connection(&mut self, rng: &mut impl Happens, inno: &mut InnoGen) -> bool {
        let Some((from, to)) = self.open_path(rng) else {
            trace!("no open path for a new connection");
            return false;
        };

        let weight: f64 = rng.sample(StandardNormal);
        trace!("new connection {from} -> {to} ({weight:.3})");
        self.push_connection(Connection::new(from, to, weight, inno));
        true
    }

    /// Bisect a random enabled connection with a new hidden node. Returns false if there are no
    /// enabled connections to bisect
    pub fn mutate_node(&mut self, rng: &mut impl Happens, inno: &mut InnoGen) -> bool {
        let Some(idx) = self
            .connections
            .iter()
            .enumerate()
            .filter_map(|(idx, c)| c.enabled.then_some(idx))
            .choose(rng)
        else {
            trace!("no enabled connection to bisect");
            return false;
        };

        let center = self.next_hidden_id();
        let (first, second) = self.connections[idx].bisect(center, inno);
        trace!(
            "bisected {:?} with node {center}",
            self.connections[idx].path()
        );
        self.push_2_connections(first, second);
        true
    }

    /// Perform 0 or more mutations on this genome: bisection, new connection, weights, biases,
    /// each gated by its own roll
    pub fn mutate(&mut self, rng: &mut impl Happens, inno: &mut InnoGen) {
        if rng.happens(EvolutionEvent::AddNode) {
            self.mutate_node(rng, inno);
        }
        if rng.happens(EvolutionEvent::AddConnection) {
            self.mutate_connection(rng, inno);
        }
        if rng.happens(EvolutionEvent::MutateWeight) {
            self.mutate_weights(rng);
        }
        if rng.happens(EvolutionEvent::MutateBias) {
            self.mutate_biases(rng);
        }
    }

    /// Inherit a gene during crossover. Genes whose path is already present are dropped, and a
    /// gene that would close a cycle is kept disabled.
    pub(crate) fn inherit(&mut self, mut connection: Connection) {
        if self.connections.iter().any(|c| c.path() == connection.path()) {
            return;
        }
        if connection.enabled && self.reaches(connection.to, connection.from) {
            trace!("inherited {:?} disabled, it closes a cycle", connection.path());
            connection.disable();
        }
        self.push_connection(connection);
    }

    pub fn network(&self) -> Network {
        Network::from_genome(self)
    }
}

fn reaches(adj: &FxHashMap<NodeId, Vec<NodeId>>, from: NodeId, to: NodeId) -> bool {
    if from == to {
        return true;
    }

    let mut seen = FxHashSet::default();
    let mut stack = vec![from];
    while let Some(id) = stack.pop() {
        for next in adj.get(&id).into_iter().flatten() {
            if *next == to {
                return true;
            }
            if seen.insert(*next) {
                stack.push(*next);
            }
        }
    }

    false
}
