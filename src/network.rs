//! Feed-forward networks expressed by a [Genome].
//!
//! A network is an arena of neurons addressed by index, where every compute neuron lists the
//! `(index, weight)` pairs feeding it. Evaluation pulls values from the outputs backward, and
//! remembers every neuron's value for the span of a single call.

use crate::{
    error::{Error, Result},
    genome::{Genome, NodeId},
};
use fxhash::FxHashMap;

pub mod activate {
    pub fn relu(x: f64) -> f64 {
        if x < 0. {
            0.
        } else {
            x
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Neuron {
    /// takes its value from the input vector
    Input,
    Compute { inputs: Vec<(usize, f64)>, bias: f64 },
}

#[derive(Debug, Clone, Copy)]
enum Memo {
    Pending,
    Visiting,
    Done(f64),
}

#[derive(Debug, Clone)]
pub struct Network {
    neurons: Vec<Neuron>,
    /// node id of every neuron, by index
    ids: Vec<NodeId>,
    index: FxHashMap<NodeId, usize>,
    sensory: Vec<usize>,
    action: Vec<usize>,
}

impl Network {
    pub fn from_genome(genome: &Genome) -> Self {
        let mut network = Self {
            neurons: Vec::new(),
            ids: Vec::new(),
            index: FxHashMap::default(),
            sensory: Vec::with_capacity(genome.sensory()),
            action: Vec::with_capacity(genome.action()),
        };

        for id in genome.sensory_ids() {
            let idx = network.neuron(id, genome);
            network.sensory.push(idx);
        }
        for id in genome.action_ids() {
            let idx = network.neuron(id, genome);
            network.action.push(idx);
        }

        for c in genome.connections().iter().filter(|c| c.enabled()) {
            let from = network.neuron(c.from, genome);
            let to = network.neuron(c.to, genome);
            match &mut network.neurons[to] {
                Neuron::Compute { inputs, bias } => {
                    inputs.push((from, c.weight));
                    *bias = genome.bias(c.to);
                }
                Neuron::Input => panic!("connection {:?} leads into an input", c.path()),
            }
        }

        network
    }

    /// Index of the neuron for `id`, creating it if this is the first time we see it. A neuron's
    /// bias only applies once some enabled connection leads into it, so it starts at 0
    fn neuron(&mut self, id: NodeId, genome: &Genome) -> usize {
        if let Some(idx) = self.index.get(&id) {
            return *idx;
        }

        let idx = self.neurons.len();
        self.neurons.push(if genome.is_sensory(id) {
            Neuron::Input
        } else {
            Neuron::Compute {
                inputs: vec![],
                bias: 0.,
            }
        });
        self.ids.push(id);
        self.index.insert(id, idx);
        idx
    }

    pub fn sensory(&self) -> usize {
        self.sensory.len()
    }

    pub fn action(&self) -> usize {
        self.action.len()
    }

    pub fn len(&self) -> usize {
        self.neurons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.neurons.is_empty()
    }

    /// Evaluate the network on one input vector, whose length must match the input count.
    /// Output `i` is the value of the `i`th output node
    pub fn evaluate(&self, input: &[f64]) -> Result<Vec<f64>> {
        if input.len() != self.sensory.len() {
            return Err(Error::ShapeMismatch {
                expected: self.sensory.len(),
                got: input.len(),
            });
        }

        let mut memo = vec![Memo::Pending; self.neurons.len()];
        for (idx, v) in self.sensory.iter().zip(input) {
            memo[*idx] = Memo::Done(*v);
        }

        Ok(self
            .action
            .iter()
            .map(|idx| self.value(*idx, &mut memo))
            .collect())
    }

    fn value(&self, idx: usize, memo: &mut [Memo]) -> f64 {
        match memo[idx] {
            Memo::Done(v) => return v,
            Memo::Visiting => panic!("cycle through node {}", self.ids[idx]),
            Memo::Pending => {}
        }

        let Neuron::Compute { inputs, bias } = &self.neurons[idx] else {
            unreachable!("input node {} was never assigned", self.ids[idx]);
        };

        memo[idx] = Memo::Visiting;
        let sum = inputs
            .iter()
            .map(|(from, w)| self.value(*from, memo) * w)
            .sum::<f64>();
        let v = activate::relu(sum + bias);
        memo[idx] = Memo::Done(v);
        v
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        assert_f64_approx,
        genome::{Connection, InnoGen},
        random::{EvolutionEvent, ProbBinding, ProbStatic, WyRng},
    };

    fn single(weight: f64) -> Genome {
        let mut inno = InnoGen::new(0);
        let mut genome = Genome::new(2, 1);
        genome.push_connection(Connection::new(genome.sensory_id(0), 0, weight, &mut inno));
        genome
    }

    #[test]
    fn test_single_connection() {
        let network = single(2.).network();
        assert_eq!(network.sensory(), 2);
        assert_eq!(network.action(), 1);
        assert_eq!(network.len(), 3);
        assert_eq!(network.evaluate(&[3., 99.]).unwrap(), vec![6.]);
    }

    #[test]
    fn test_relu() {
        let network = single(-2.).network();
        assert_eq!(network.evaluate(&[3., 0.]).unwrap(), vec![0.]);

        let mut genome = single(-2.);
        genome.set_bias(0, 10.);
        assert_eq!(genome.network().evaluate(&[3., 0.]).unwrap(), vec![4.]);
    }

    #[test]
    fn test_unconnected_output_ignores_bias() {
        let mut genome = Genome::new(2, 1);
        genome.set_bias(0, 5.);
        assert_eq!(genome.network().evaluate(&[3., 99.]).unwrap(), vec![0.]);
    }

    #[test]
    fn test_source_only_hidden_ignores_bias() {
        // -1 -> 1 is disabled, so 1 only feeds 0
        let mut inno = InnoGen::new(0);
        let mut genome = Genome::new(1, 1);
        genome.push_connection(Connection::new(-1, 1, 1., &mut inno));
        genome.push_connection(Connection::new(1, 0, 1., &mut inno));
        genome.connections_mut()[0].disable();
        genome.set_bias(1, 4.);
        assert_eq!(genome.network().evaluate(&[2.]).unwrap(), vec![0.]);

        genome.set_bias(0, 0.5);
        assert_eq!(genome.network().evaluate(&[2.]).unwrap(), vec![0.5]);
    }

    #[test]
    fn test_shape_mismatch() {
        let network = single(1.).network();
        for input in [&[][..], &[1.][..], &[1., 2., 3.][..]] {
            match network.evaluate(input) {
                Err(Error::ShapeMismatch { expected, got }) => {
                    assert_eq!(expected, 2);
                    assert_eq!(got, input.len());
                }
                other => panic!("expected a shape mismatch, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_bisection_preserves_output() {
        let mut inno = InnoGen::new(0);
        let mut genome = single(2.);
        let before = genome.network().evaluate(&[3., 99.]).unwrap();

        let mut rng = ProbBinding::new(ProbStatic::default(), WyRng::seeded(0));
        assert!(genome.mutate_node(&mut rng, &mut inno));
        let network = genome.network();
        assert_eq!(network.len(), 4);
        assert_eq!(network.evaluate(&[3., 99.]).unwrap(), before);
    }

    #[test]
    fn test_diamond_memo() {
        // -1 -> 1, then 1 fans out to 2 and 3 which both feed 0
        let mut inno = InnoGen::new(0);
        let mut genome = Genome::new(1, 1);
        genome.push_connection(Connection::new(-1, 1, 2., &mut inno));
        genome.push_connection(Connection::new(1, 2, 1., &mut inno));
        genome.push_connection(Connection::new(1, 3, 1., &mut inno));
        genome.push_connection(Connection::new(2, 0, 1., &mut inno));
        genome.push_connection(Connection::new(3, 0, 1., &mut inno));
        genome.set_bias(1, 1.);

        let network = genome.network();
        // 1 = relu(2 * 1.5 + 1) = 4, so 2 and 3 are 4 and 0 is 8
        assert_f64_approx!(network.evaluate(&[1.5]).unwrap()[0], 8.);
        assert_f64_approx!(network.evaluate(&[1.5]).unwrap()[0], 8.);
        assert_f64_approx!(network.evaluate(&[0.]).unwrap()[0], 2.);
    }

    #[test]
    fn test_disabled_ignored() {
        let mut genome = single(2.);
        genome.connections_mut()[0].disable();
        let network = genome.network();
        assert_eq!(network.len(), 3);
        assert_eq!(network.evaluate(&[3., 99.]).unwrap(), vec![0.]);
    }

    #[test]
    fn test_deterministic_across_genomes() {
        // the same hidden id means different things in both genomes
        let mut inno = InnoGen::new(0);
        let mut l = Genome::new(1, 1);
        l.push_connection(Connection::new(-1, 1, 1., &mut inno));
        l.push_connection(Connection::new(1, 0, 1., &mut inno));
        let mut r = l.clone();
        r.connections_mut()[0].weight = 5.;

        let (l_net, r_net) = (l.network(), r.network());
        for _ in 0..3 {
            assert_eq!(l_net.evaluate(&[1.]).unwrap(), vec![1.]);
            assert_eq!(r_net.evaluate(&[1.]).unwrap(), vec![5.]);
        }
    }

    #[test]
    fn test_mutated_outputs_shape() {
        let mut inno = InnoGen::new(0);
        let overrides = [
            (EvolutionEvent::AddNode, u64::MAX / 2),
            (EvolutionEvent::AddConnection, u64::MAX),
        ];
        let mut rng = ProbBinding::new(
            ProbStatic::default().with_overrides(&overrides),
            WyRng::seeded(17),
        );
        let mut genome = Genome::new(4, 3);
        for _ in 0..40 {
            genome.mutate(&mut rng, &mut inno);
            let network = genome.network();
            let input = [0.5, -1., 2., 0.];
            let out = network.evaluate(&input).unwrap();
            assert_eq!(out.len(), 3);
            assert!(out.iter().all(|v| *v >= 0.));
            assert_eq!(out, network.evaluate(&input).unwrap());
        }
    }

    #[test]
    #[should_panic(expected = "cycle through node")]
    fn test_cycle_panics() {
        let mut inno = InnoGen::new(0);
        let mut genome = Genome::new(1, 1);
        genome.push_connection(Connection::new(-1, 1, 1., &mut inno));
        genome.push_connection(Connection::new(1, 2, 1., &mut inno));
        genome.push_connection(Connection::new(2, 1, 1., &mut inno));
        genome.push_connection(Connection::new(2, 0, 1., &mut inno));
        let _ = genome.network().evaluate(&[1.]);
    }
}
