//! Probability gates and the crate's default random source.
//!
//! Probabilities are stored as a `u64` threshold, so that an event happens when a raw
//! `next_u64` roll falls under it. This keeps the hot mutation paths free of float conversion.

use crate::config::Config;
use log::warn;
use rand::{RngCore, SeedableRng};
use std::{
    fs::File,
    io::{self, Read},
    time::{SystemTime, UNIX_EPOCH},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvolutionEvent {
    AddNode,
    AddConnection,
    MutateWeight,
    MutateBias,
    PerturbParam,
    KeepExclusive,
    PickLeft,
    CrossSpecie,
}

pub const fn percent(x: u64) -> u64 {
    x * (u64::MAX / 100)
}

pub const fn permille(x: u64) -> u64 {
    x * (u64::MAX / 1000)
}

/// Threshold for an arbitrary probability in `[0, 1]`
pub fn chance(p: f64) -> u64 {
    (p.clamp(0., 1.) * u64::MAX as f64) as u64
}

pub trait Probabilities {
    type Update;
    fn probability(&self, evt: EvolutionEvent) -> u64;
    fn update(&mut self, stats: Self::Update);
}

pub trait Happens: RngCore + Probabilities {
    fn happens(&mut self, evt: EvolutionEvent) -> bool;
}

impl<T: RngCore + Probabilities> Happens for T {
    fn happens(&mut self, evt: EvolutionEvent) -> bool {
        self.probability(evt) > self.next_u64()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbStatic {
    add_node: u64,
    add_connection: u64,
    mutate_weight: u64,
    mutate_bias: u64,
    perturb_param: u64,
    keep_exclusive: u64,
    pick_left: u64,
    cross_specie: u64,
}

impl ProbStatic {
    pub fn with_overrides(mut self, updates: &[(EvolutionEvent, u64)]) -> Self {
        for update in updates {
            self.update(*update);
        }
        self
    }
}

impl Default for ProbStatic {
    fn default() -> Self {
        Self {
            add_node: percent(3),
            add_connection: percent(5),
            mutate_weight: percent(80),
            mutate_bias: percent(80),
            perturb_param: percent(90),
            keep_exclusive: percent(80),
            pick_left: percent(50),
            cross_specie: permille(1),
        }
    }
}

impl From<&Config> for ProbStatic {
    fn from(config: &Config) -> Self {
        Self {
            add_node: chance(config.add_node),
            add_connection: chance(config.add_connection),
            mutate_weight: chance(config.mutate_weight),
            mutate_bias: chance(config.mutate_bias),
            perturb_param: chance(config.perturb),
            keep_exclusive: chance(config.keep_exclusive),
            pick_left: chance(config.pick_left),
            cross_specie: chance(config.cross_specie),
        }
    }
}

impl Probabilities for ProbStatic {
    type Update = (EvolutionEvent, u64);
    fn probability(&self, evt: EvolutionEvent) -> u64 {
        match evt {
            EvolutionEvent::AddNode => self.add_node,
            EvolutionEvent::AddConnection => self.add_connection,
            EvolutionEvent::MutateWeight => self.mutate_weight,
            EvolutionEvent::MutateBias => self.mutate_bias,
            EvolutionEvent::PerturbParam => self.perturb_param,
            EvolutionEvent::KeepExclusive => self.keep_exclusive,
            EvolutionEvent::PickLeft => self.pick_left,
            EvolutionEvent::CrossSpecie => self.cross_specie,
        }
    }

    fn update(&mut self, (evt, v): Self::Update) {
        match evt {
            EvolutionEvent::AddNode => self.add_node = v,
            EvolutionEvent::AddConnection => self.add_connection = v,
            EvolutionEvent::MutateWeight => self.mutate_weight = v,
            EvolutionEvent::MutateBias => self.mutate_bias = v,
            EvolutionEvent::PerturbParam => self.perturb_param = v,
            EvolutionEvent::KeepExclusive => self.keep_exclusive = v,
            EvolutionEvent::PickLeft => self.pick_left = v,
            EvolutionEvent::CrossSpecie => self.cross_specie = v,
        }
    }
}

/// wyrand, small and fast enough to be rolled for every single gene
#[derive(Debug, Clone)]
pub struct WyRng {
    state: u64,
}

impl WyRng {
    pub fn seeded(state: u64) -> Self {
        Self { state }
    }
}

impl RngCore for WyRng {
    fn next_u32(&mut self) -> u32 {
        self.next_u64() as u32
    }

    fn next_u64(&mut self) -> u64 {
        const WY_CONST_0: u64 = 0x2d35_8dcc_aa6c_78a5;
        const WY_CONST_1: u64 = 0x8bb8_4b93_962e_acc9;
        self.state = self.state.wrapping_add(WY_CONST_0);
        let t = u128::from(self.state) * u128::from(self.state ^ WY_CONST_1);
        (t as u64) ^ (t >> 64) as u64
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        for chunk in dst.chunks_mut(8) {
            let bytes = self.next_u64().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }
}

impl SeedableRng for WyRng {
    type Seed = [u8; 8];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::seeded(u64::from_le_bytes(seed))
    }
}

/// Binds a set of [Probabilities] to a random source, so that the pair can roll [Happens]
pub struct ProbBinding<P: Probabilities, R: RngCore> {
    p: P,
    r: R,
}

impl<P: Probabilities, R: RngCore> ProbBinding<P, R> {
    pub fn new(p: P, r: R) -> Self {
        Self { p, r }
    }
}

impl<P: Probabilities, R: RngCore> Probabilities for ProbBinding<P, R> {
    type Update = P::Update;
    fn probability(&self, evt: EvolutionEvent) -> u64 {
        self.p.probability(evt)
    }

    fn update(&mut self, stats: Self::Update) {
        self.p.update(stats);
    }
}

impl<P: Probabilities, R: RngCore> RngCore for ProbBinding<P, R> {
    fn next_u32(&mut self) -> u32 {
        self.r.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.r.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.r.fill_bytes(dest)
    }
}

pub fn seed_urandom() -> io::Result<u64> {
    let mut file = File::open("/dev/urandom")?;
    let mut buffer = [0u8; 8];
    file.read_exact(&mut buffer)?;
    Ok(u64::from_le_bytes(buffer))
}

/// A [WyRng] seeded from `/dev/urandom`, or from the clock where that isn't available
pub fn default_rng() -> WyRng {
    let seed = seed_urandom().unwrap_or_else(|e| {
        warn!("cannot read /dev/urandom ({e}), seeding from the clock");
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0)
    });
    WyRng::seeded(seed)
}
