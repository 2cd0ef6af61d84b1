//! Timed status effects
//!
//! Each unit carries a small table keyed by effect kind. Durations are in
//! simulated seconds and decay every tick, including while the unit is
//! stunned. Heal-over-time stores the heal still owed as its magnitude and
//! pays it out in proportion to elapsed time.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::battle::constants::TIME_EPSILON;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EffectKind {
    /// Cannot act
    Stunned,
    /// Cannot be targeted by enemies
    Invisible,
    /// Attack interval multiplier from the clan bonus
    ClanHaste,
    /// Heal over time from the clan bonus
    ClanHeal,
    /// Attack interval multiplier granted on a captain kill
    AceHitSpeed,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EffectState {
    /// Seconds left
    pub remaining: f32,
    /// Meaning depends on the kind (multiplier, heal still owed, unused)
    pub magnitude: f32,
}

/// What happened during one decay step
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecayOutcome {
    pub healed: f32,
    pub expired: Vec<EffectKind>,
}

impl DecayOutcome {
    pub fn expired(&self, kind: EffectKind) -> bool {
        self.expired.contains(&kind)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusTable {
    effects: BTreeMap<EffectKind, EffectState>,
}

impl StatusTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or refresh an effect, replacing any previous state
    pub fn apply(&mut self, kind: EffectKind, duration: f32, magnitude: f32) {
        if duration <= TIME_EPSILON {
            return;
        }
        self.effects.insert(
            kind,
            EffectState {
                remaining: duration,
                magnitude,
            },
        );
    }

    /// Stun for at least `duration`; a longer running stun is kept
    pub fn stun(&mut self, duration: f32) {
        let current = self.remaining(EffectKind::Stunned);
        if duration > current {
            self.apply(EffectKind::Stunned, duration, 0.0);
        }
    }

    pub fn remove(&mut self, kind: EffectKind) -> Option<EffectState> {
        self.effects.remove(&kind)
    }

    pub fn clear(&mut self) {
        self.effects.clear();
    }

    pub fn has(&self, kind: EffectKind) -> bool {
        self.effects.contains_key(&kind)
    }

    pub fn get(&self, kind: EffectKind) -> Option<&EffectState> {
        self.effects.get(&kind)
    }

    pub fn remaining(&self, kind: EffectKind) -> f32 {
        self.effects.get(&kind).map_or(0.0, |e| e.remaining)
    }

    pub fn is_stunned(&self) -> bool {
        self.has(EffectKind::Stunned)
    }

    pub fn is_invisible(&self) -> bool {
        self.has(EffectKind::Invisible)
    }

    /// Combined attack interval multiplier from haste effects
    pub fn interval_multiplier(&self) -> f32 {
        [EffectKind::ClanHaste, EffectKind::AceHitSpeed]
            .iter()
            .filter_map(|k| self.effects.get(k))
            .map(|e| e.magnitude)
            .product()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&EffectKind, &EffectState)> {
        self.effects.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// Advance every effect by `dt` seconds
    pub fn decay(&mut self, dt: f32) -> DecayOutcome {
        let mut outcome = DecayOutcome::default();

        for (kind, state) in self.effects.iter_mut() {
            if *kind == EffectKind::ClanHeal && state.remaining > 0.0 {
                let share = (dt / state.remaining).min(1.0);
                let heal = state.magnitude * share;
                state.magnitude -= heal;
                outcome.healed += heal;
            }
            state.remaining -= dt;
            if state.remaining <= TIME_EPSILON {
                outcome.expired.push(*kind);
            }
        }

        for kind in &outcome.expired {
            self.effects.remove(kind);
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stun_keeps_longer() {
        let mut table = StatusTable::new();
        table.stun(2.0);
        table.stun(1.0);
        assert_eq!(table.remaining(EffectKind::Stunned), 2.0);
        table.stun(3.0);
        assert_eq!(table.remaining(EffectKind::Stunned), 3.0);
    }

    #[test]
    fn test_decay_expires() {
        let mut table = StatusTable::new();
        table.stun(0.25);
        assert!(table.decay(0.1).expired.is_empty());
        assert!(table.decay(0.1).expired.is_empty());
        let outcome = table.decay(0.1);
        assert!(outcome.expired(EffectKind::Stunned));
        assert!(!table.is_stunned());
    }

    #[test]
    fn test_exact_duration_expires_on_time() {
        let mut table = StatusTable::new();
        table.apply(EffectKind::Invisible, 0.3, 0.0);
        table.decay(0.1);
        table.decay(0.1);
        assert!(table.decay(0.1).expired(EffectKind::Invisible));
    }

    #[test]
    fn test_heal_over_time_pays_in_full() {
        let mut table = StatusTable::new();
        table.apply(EffectKind::ClanHeal, 3.0, 300.0);
        let mut total = 0.0;
        for _ in 0..30 {
            total += table.decay(0.1).healed;
        }
        assert!((total - 300.0).abs() < 1e-2, "healed {}", total);
        assert!(!table.has(EffectKind::ClanHeal));
    }

    #[test]
    fn test_heal_is_proportional() {
        let mut table = StatusTable::new();
        table.apply(EffectKind::ClanHeal, 2.0, 100.0);
        let healed = table.decay(0.5).healed;
        assert!((healed - 25.0).abs() < 1e-4);
    }

    #[test]
    fn test_interval_multiplier_stacks() {
        let mut table = StatusTable::new();
        assert_eq!(table.interval_multiplier(), 1.0);
        table.apply(EffectKind::ClanHaste, 3.0, 0.7);
        table.apply(EffectKind::AceHitSpeed, 3.0, 0.8);
        assert!((table.interval_multiplier() - 0.56).abs() < 1e-6);
    }

    #[test]
    fn test_zero_duration_ignored() {
        let mut table = StatusTable::new();
        table.apply(EffectKind::Invisible, 0.0, 0.0);
        assert!(table.is_empty());
    }
}
