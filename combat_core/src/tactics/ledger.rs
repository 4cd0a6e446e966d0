//! TacticsLedger - Bounded counters per tactic kind

use super::{TacticKind, DEFAULT_TACTIC_CAP};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-kind tactic balances, each kept in `[0, cap]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TacticsLedger {
    counts: BTreeMap<TacticKind, u32>,
    cap: u32,
}

impl Default for TacticsLedger {
    fn default() -> Self {
        Self::with_cap(DEFAULT_TACTIC_CAP)
    }
}

impl TacticsLedger {
    /// Create an empty ledger with the default cap
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty ledger with a custom cap
    pub fn with_cap(cap: u32) -> Self {
        TacticsLedger {
            counts: TacticKind::all().iter().map(|kind| (*kind, 0)).collect(),
            cap,
        }
    }

    pub fn cap(&self) -> u32 {
        self.cap
    }

    /// Current balance for a kind
    pub fn get(&self, kind: TacticKind) -> u32 {
        self.counts.get(&kind).copied().unwrap_or(0)
    }

    /// Award tactics, saturating at the cap
    pub fn add_tactic(&mut self, kind: TacticKind, amount: u32) {
        let entry = self.counts.entry(kind).or_insert(0);
        *entry = entry.saturating_add(amount).min(self.cap);
    }

    /// Spend tactics. Returns false and leaves the balance untouched if short.
    pub fn use_tactic(&mut self, kind: TacticKind, amount: u32) -> bool {
        let entry = self.counts.entry(kind).or_insert(0);
        if *entry >= amount {
            *entry -= amount;
            true
        } else {
            false
        }
    }

    /// First cost entry the ledger cannot cover, as `(kind, required, available)`
    pub fn first_shortfall(&self, costs: &BTreeMap<TacticKind, u32>) -> Option<(TacticKind, u32, u32)> {
        costs
            .iter()
            .map(|(kind, required)| (*kind, *required, self.get(*kind)))
            .find(|(_, required, available)| available < required)
    }

    /// Spend several kinds at once. Either every entry is deducted or none is.
    pub fn use_tactics(&mut self, costs: &BTreeMap<TacticKind, u32>) -> bool {
        if self.first_shortfall(costs).is_some() {
            return false;
        }
        for (kind, amount) in costs {
            self.use_tactic(*kind, *amount);
        }
        true
    }

    /// Read-only view of every balance
    pub fn snapshot(&self) -> BTreeMap<TacticKind, u32> {
        self.counts.clone()
    }

    /// Zero every balance
    pub fn reset(&mut self) {
        for count in self.counts.values_mut() {
            *count = 0;
        }
    }
}
