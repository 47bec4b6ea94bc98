//! Frequency-gated mutation operators.
//!
//! An [`Operator`] is one rewrite rule bound to one node kind. Applying it
//! seeds a fresh [`MinStdRand`] from the caller's seed and only rewrites when
//! `seed % period == 0`, where the period comes from the operator's [`Tier`]
//! looked up in the surface's [`PeriodTable`].
//!
//! A [`Mutator`] owns the operator catalog of one mutation surface and
//! dispatches per node kind through the [`Mutable`] trait.

use serde::Serialize;
use tracing::{debug, trace};

use crate::config::MutationConfig;
use crate::random::MinStdRand;

/// Sampling tier of an operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Tier {
    Frequent,
    Occasional,
    Rare,
}

/// Sampling periods of one mutation surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodTable {
    pub frequent: u32,
    pub occasional: u32,
    pub rare: u32,
}

impl PeriodTable {
    /// Returns the period configured for `tier`.
    pub const fn period(&self, tier: Tier) -> u32 {
        match tier {
            Tier::Frequent => self.frequent,
            Tier::Occasional => self.occasional,
            Tier::Rare => self.rare,
        }
    }
}

/// Rewrite function of an operator.
pub type Rewrite<T> = fn(&mut T, &mut MinStdRand);

/// A registered, frequency-gated rewrite rule.
pub struct Operator<T> {
    /// Stable identifier, used as a log field.
    pub name: &'static str,
    /// Human readable description of the rewrite.
    pub info: &'static str,
    pub tier: Tier,
    pub rewrite: Rewrite<T>,
}

impl<T> Operator<T> {
    pub const fn new(name: &'static str, info: &'static str, tier: Tier, rewrite: Rewrite<T>) -> Self {
        Self {
            name,
            info,
            tier,
            rewrite,
        }
    }

    /// Returns true if this operator fires for `seed`.
    pub fn triggers(&self, seed: u32, periods: &PeriodTable) -> bool {
        seed % periods.period(self.tier) == 0
    }
}

impl<T: Serialize> Operator<T> {
    /// Applies the operator to `node` if `seed` samples it.
    ///
    /// Returns whether the rewrite ran. With `log_changes` set, the node is
    /// serialized before and after the rewrite and both snapshots are logged
    /// under the `yulsmith::mutation` target.
    pub fn apply(&self, node: &mut T, seed: u32, periods: &PeriodTable, log_changes: bool) -> bool {
        if !self.triggers(seed, periods) {
            trace!(target: "yulsmith::mutation", operator = self.name, seed, "skipped");
            return false;
        }

        let mut rng = MinStdRand::new(seed);
        if log_changes {
            let before = snapshot(node);
            (self.rewrite)(node, &mut rng);
            debug!(
                target: "yulsmith::mutation",
                operator = self.name,
                seed,
                before = %before,
                after = %snapshot(node),
                "{}",
                self.info
            );
        } else {
            (self.rewrite)(node, &mut rng);
            debug!(target: "yulsmith::mutation", operator = self.name, seed, "{}", self.info);
        }
        true
    }
}

impl<T> std::fmt::Debug for Operator<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Operator")
            .field("name", &self.name)
            .field("tier", &self.tier)
            .finish()
    }
}

fn snapshot<T: Serialize>(node: &T) -> String {
    serde_json::to_string(node).unwrap_or_else(|err| format!("<unserializable: {}>", err))
}

/// A node kind with operators registered in catalog `C`.
pub trait Mutable<C>: Serialize + Sized {
    /// Returns the operators registered for this kind.
    fn operators(catalog: &C) -> &[Operator<Self>];
}

/// Operator dispatcher for one mutation surface.
#[derive(Debug)]
pub struct Mutator<C> {
    catalog: C,
    periods: PeriodTable,
    log_changes: bool,
}

impl<C> Mutator<C> {
    pub fn new(catalog: C, periods: PeriodTable, config: &MutationConfig) -> Self {
        Self {
            catalog,
            periods,
            log_changes: config.log_changes,
        }
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn periods(&self) -> &PeriodTable {
        &self.periods
    }

    /// Offers `node` to every operator registered for its kind.
    ///
    /// Each operator receives its own seed, drawn in registration order from
    /// a generator seeded with `seed`. Returns the number of operators that
    /// fired.
    pub fn mutate<K: Mutable<C>>(&self, node: &mut K, seed: u32) -> usize {
        let mut seeds = MinStdRand::new(seed);
        let mut fired = 0;
        for operator in K::operators(&self.catalog) {
            if operator.apply(node, seeds.draw(), &self.periods, self.log_changes) {
                fired += 1;
            }
        }
        fired
    }
}
