//! Probabilistic events driving mutation and crossover, and the random number generators they
//! are rolled against.

use crate::{
    config::MutationRates,
    constants::{
        NEATLING_KEEP_DISABLED_PROB, NEATLING_PERTURB_WEIGHT_PROB, NEATLING_PICK_RECESSIVE_PROB,
    },
};
use core::cmp::min;
use rand::RngCore;
use std::{
    fs::File,
    io::{self, Read},
    time::{SystemTime, UNIX_EPOCH},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvolutionEvent {
    /// visit every gene of a genome, perturbing or replacing its weight
    MutateWeight,
    /// add one new connection
    MutateConnection,
    /// split one existing connection with a new node
    MutateBisection,
    /// perturb a single weight, rather than replacing it
    PerturbWeight,
    /// a gene shared by both parents takes the less fit parent's weight
    PickRecessive,
    /// a gene disabled in either parent stays disabled in the child
    KeepDisabled,
}

/// Map a probability in `[0, 1]` onto the range of a `u64` roll
pub fn chance(p: f64) -> u64 {
    if p.is_nan() || p <= 0. {
        0
    } else if p >= 1. {
        u64::MAX
    } else {
        (p * u64::MAX as f64) as u64
    }
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

#[derive(Debug, Clone)]
pub struct ProbStatic {
    mutate_weight: u64,
    mutate_connection: u64,
    mutate_bisection: u64,
    perturb_weight: u64,
    pick_recessive: u64,
    keep_disabled: u64,
}

impl ProbStatic {
    pub fn with_overrides(mut self, updates: &[(EvolutionEvent, u64)]) -> Self {
        for update in updates {
            self.update(*update);
        }
        self
    }

    /// Static probabilities whose per-genome mutation rates come from `rates`
    pub fn with_rates(rates: &MutationRates) -> Self {
        Self::default().with_overrides(&[
            (EvolutionEvent::MutateWeight, chance(rates.weight)),
            (EvolutionEvent::MutateConnection, chance(rates.connection)),
            (EvolutionEvent::MutateBisection, chance(rates.node)),
        ])
    }
}

impl Default for ProbStatic {
    fn default() -> Self {
        let rates = MutationRates::default();
        Self {
            mutate_weight: chance(rates.weight),
            mutate_connection: chance(rates.connection),
            mutate_bisection: chance(rates.node),
            perturb_weight: chance(NEATLING_PERTURB_WEIGHT_PROB),
            pick_recessive: chance(NEATLING_PICK_RECESSIVE_PROB),
            keep_disabled: chance(NEATLING_KEEP_DISABLED_PROB),
        }
    }
}

impl Probabilities for ProbStatic {
    type Update = (EvolutionEvent, u64);
    fn probability(&self, evt: EvolutionEvent) -> u64 {
        match evt {
            EvolutionEvent::MutateWeight => self.mutate_weight,
            EvolutionEvent::MutateConnection => self.mutate_connection,
            EvolutionEvent::MutateBisection => self.mutate_bisection,
            EvolutionEvent::PerturbWeight => self.perturb_weight,
            EvolutionEvent::PickRecessive => self.pick_recessive,
            EvolutionEvent::KeepDisabled => self.keep_disabled,
        }
    }

    fn update(&mut self, (evt, v): Self::Update) {
        match evt {
            EvolutionEvent::MutateWeight => self.mutate_weight = v,
            EvolutionEvent::MutateConnection => self.mutate_connection = v,
            EvolutionEvent::MutateBisection => self.mutate_bisection = v,
            EvolutionEvent::PerturbWeight => self.perturb_weight = v,
            EvolutionEvent::PickRecessive => self.pick_recessive = v,
            EvolutionEvent::KeepDisabled => self.keep_disabled = v,
        }
    }
}

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
        let mut idx = 0;
        while idx < dst.len() {
            let lim = min(8, dst.len() - idx);
            dst[idx..idx + lim].copy_from_slice(&self.next_u64().to_ne_bytes()[..lim]);
            idx += lim;
        }
    }
}

/// Binds a set of [Probabilities] to some rng, so that the pair may be handed to anything that
/// [Happens]
pub struct ProbBinding<P: Probabilities, R: RngCore> {
    p: P,
    r: R,
}

impl<P: Probabilities, R: RngCore> ProbBinding<P, R> {
    pub fn new(p: P, r: R) -> Self {
        Self { p, r }
    }

    pub fn probabilities(&self) -> &P {
        &self.p
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
    WyRng::seeded(seed_urandom().unwrap_or_else(|_| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0x5eed)
    }))
}
