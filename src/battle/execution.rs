//! Battle execution loop
//!
//! Setup resets every unit, derives synergies and runs combat-start
//! abilities. Each tick then walks the units in ascending id order
//! (clan check -> status decay -> leap -> targeting -> attack -> movement),
//! counts bombs down, removes the fallen, places summons and checks for a
//! winner.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::battle::abilities::{knockback, leap, stealth, Ability, Attack, LeapProgress};
use crate::battle::board::UNREACHABLE;
use crate::battle::constants::TIME_EPSILON;
use crate::battle::hex::HexCoord;
use crate::battle::pathfinding::{is_in_range, path_steps, CellSet};
use crate::battle::resolution::{Battlefield, Bomb};
use crate::battle::roster::Scenario;
use crate::battle::status::{EffectKind, EffectState};
use crate::battle::synergy::clan::CLAN_BUFF_SECONDS;
use crate::battle::synergy::{BenchGrant, Tier};
use crate::battle::unit_type::SynergyTag;
use crate::battle::units::CombatUnit;
use crate::core::config::CombatConfig;
use crate::core::error::Result;
use crate::core::types::{PlayerId, Side, Tick, UnitId};

/// Battle phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BattlePhase {
    #[default]
    Setup, // Units placed, synergies derived
    Active,   // Ticking
    Finished, // Winner or draw decided
}

/// Battle outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BattleOutcome {
    #[default]
    Undecided,
    Victory(Side),
    Draw,
}

/// Why the battle stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    /// At least one side has nobody left standing
    Elimination,
    /// The tick bound ran out
    TickLimit,
}

/// Log entry for battle events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleEvent {
    pub tick: Tick,
    pub event_type: BattleEventType,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BattleEventType {
    BattleStarted,
    SynergyActivated { side: Side, tag: SynergyTag, tier: Tier },
    CursePlaced { side: Side, unit: UnitId },
    TargetAcquired { unit: UnitId, target: UnitId },
    Moved { unit: UnitId, from: HexCoord, to: HexCoord },
    Hit { attacker: Option<UnitId>, target: UnitId, damage: f32, crit: bool },
    UnitDowned { unit: UnitId, by: Option<UnitId> },
    UnitRemoved { unit: UnitId, cell: HexCoord },
    Stunned { unit: UnitId, seconds: f32 },
    ClanBuff { unit: UnitId },
    Vanished { unit: UnitId, seconds: f32 },
    LeapStarted { unit: UnitId, landing: HexCoord },
    LeapLanded { unit: UnitId, cell: HexCoord },
    Dashed { unit: UnitId, from: HexCoord, to: HexCoord },
    KnockedBack { unit: UnitId, target: UnitId, to: HexCoord },
    Barrage { unit: UnitId, rockets: usize },
    BombPlanted { cell: HexCoord, side: Side },
    BombDetonated { cell: HexCoord, victims: usize },
    Summoned { unit: UnitId, cell: HexCoord },
    SpawnBlocked { cell: HexCoord },
    BenchGranted { grant: BenchGrant },
    BattleEnded { outcome: BattleOutcome, reason: EndReason },
}

/// Log of events from a single tick
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BattleEventLog {
    pub events: Vec<BattleEvent>,
}

impl BattleEventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event_type: BattleEventType, description: String, tick: Tick) {
        self.events.push(BattleEvent {
            tick,
            event_type,
            description,
        });
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BattleEvent> {
        self.events.iter()
    }
}

/// Final result handed to the round layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleReport {
    pub winner: Option<PlayerId>,
    pub winning_side: Option<Side>,
    /// Non-summoned units of the winner still standing
    pub surviving_units: usize,
    pub surviving_summons: usize,
    pub ticks: Tick,
    pub end_reason: EndReason,
    pub bench_grants: Vec<BenchGrant>,
}

impl BattleReport {
    pub fn is_draw(&self) -> bool {
        self.winning_side.is_none()
    }
}

/// Read-only view of one unit for renderers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitSnapshot {
    pub id: UnitId,
    pub name: String,
    pub side: Side,
    pub owner: PlayerId,
    pub star: u8,
    pub summoned: bool,
    pub position: Option<HexCoord>,
    pub hp: f32,
    pub max_hp: f32,
    pub alive: bool,
    pub target: Option<UnitId>,
    pub effects: Vec<(EffectKind, EffectState)>,
}

impl From<&CombatUnit> for UnitSnapshot {
    fn from(unit: &CombatUnit) -> Self {
        Self {
            id: unit.id,
            name: unit.name().to_string(),
            side: unit.side,
            owner: unit.owner,
            star: unit.star(),
            summoned: unit.summoned,
            position: unit.position,
            hp: unit.hp,
            max_hp: unit.max_hp,
            alive: unit.alive,
            target: unit.current_target,
            effects: unit.status.iter().map(|(k, s)| (*k, *s)).collect(),
        }
    }
}

/// Board state after a tick plus that tick's events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleSnapshot {
    pub tick: Tick,
    pub time: f32,
    pub phase: BattlePhase,
    pub units: Vec<UnitSnapshot>,
    pub bombs: Vec<Bomb>,
    pub events: Vec<BattleEvent>,
}

impl BattleSnapshot {
    /// One-line JSON frame for streaming to a viewer
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Complete battle state
#[derive(Debug, Clone)]
pub struct BattleState {
    pub field: Battlefield,
    pub owners: [PlayerId; 2],

    // Time
    pub tick: Tick,
    pub phase: BattlePhase,
    pub outcome: BattleOutcome,
    pub end_reason: Option<EndReason>,

    // Rewards waiting for the economy layer
    pub bench_grants: Vec<BenchGrant>,

    // Log
    pub battle_log: Vec<BattleEvent>,
    last_events: BattleEventLog,
}

impl BattleState {
    /// Build a battle from deployed units; ids must match their slots
    pub fn new(config: CombatConfig, units: Vec<CombatUnit>, owners: [PlayerId; 2], seed: u64) -> Result<Self> {
        let field = Battlefield::new(config, units, owners, seed)?;
        Ok(Self {
            field,
            owners,
            tick: 0,
            phase: BattlePhase::Setup,
            outcome: BattleOutcome::Undecided,
            end_reason: None,
            bench_grants: Vec::new(),
            battle_log: Vec::new(),
            last_events: BattleEventLog::new(),
        })
    }

    /// Deploy both rosters of a scenario and build the battle
    pub fn from_scenario(scenario: &Scenario) -> Result<Self> {
        let units = scenario.deploy()?;
        Self::new(scenario.config.clone(), units, scenario.owners(), scenario.seed)
    }

    /// Is the battle finished?
    pub fn is_finished(&self) -> bool {
        matches!(self.phase, BattlePhase::Finished)
    }

    pub fn unit(&self, id: UnitId) -> Option<&CombatUnit> {
        self.field.units.get(id.index())
    }

    pub fn units(&self) -> &[CombatUnit] {
        &self.field.units
    }

    /// Events produced by the most recent tick (or setup)
    pub fn last_events(&self) -> &BattleEventLog {
        &self.last_events
    }

    /// Run combat-start effects and move to the tick loop
    ///
    /// Called implicitly by the first `run_tick`.
    pub fn start_battle(&mut self) {
        if self.phase != BattlePhase::Setup {
            return;
        }
        self.field.log(BattleEventType::BattleStarted, "Battle has begun!".into());
        info!(units = self.field.units.len(), "battle started");

        for side in Side::both() {
            let set = self.field.synergy(side).clone();
            set.log_active();
            for (tag, tier) in set.active() {
                self.field.log(
                    BattleEventType::SynergyActivated { side, tag, tier },
                    format!("{:?} {:?} synergy {:?}", side, tag, tier),
                );
            }
            for &cursed in &set.undead.cursed {
                self.field.log(
                    BattleEventType::CursePlaced { side, unit: cursed },
                    format!("{:?} curses {}", side, cursed),
                );
            }
        }

        let chargers: Vec<UnitId> = self
            .field
            .units
            .iter()
            .filter(|u| u.is_standing() && Ability::for_kind(u.kind()) == Ability::Knockback)
            .map(|u| u.id)
            .collect();
        for charger in chargers {
            knockback::knockback(&mut self.field, charger);
        }

        for side in Side::both() {
            let set = self.field.synergy(side);
            let (reward, owner) = (set.goblin.clone(), set.owner);
            if let Some(grant) = reward.roll(owner, &mut self.field.rng) {
                info!(player = owner.0, unit = %grant.unit, "goblin reward queued");
                self.field.log(
                    BattleEventType::BenchGranted { grant },
                    format!("player {} will receive a {}", owner.0, grant.unit),
                );
                self.bench_grants.push(grant);
            }
        }

        self.phase = BattlePhase::Active;
        self.flush_events();
    }

    /// Run a complete battle tick
    pub fn run_tick(&mut self) -> BattleEventLog {
        if self.phase == BattlePhase::Setup {
            self.start_battle();
        }
        if self.is_finished() {
            return BattleEventLog::new();
        }

        self.field.tick = self.tick;
        self.field.now = self.tick as f32 * self.field.dt();

        // ===== PHASE 1: UNITS =====
        self.phase_units();

        // ===== PHASE 2: BOMBS =====
        self.field.tick_bombs();

        // ===== PHASE 3: DEATHS =====
        let removed = self.field.resolve_deaths();
        if !removed.is_empty() {
            debug!(tick = self.tick, removed = removed.len(), "death check");
        }

        // ===== PHASE 4: SPAWNS =====
        self.field.resolve_spawns();

        // ===== PHASE 5: WIN CHECK =====
        self.tick += 1;
        if let Some(outcome) = check_battle_end(self) {
            self.end_battle(outcome, EndReason::Elimination);
        } else if self.tick >= self.field.config.max_ticks {
            self.end_battle(BattleOutcome::Draw, EndReason::TickLimit);
        }

        self.flush_events()
    }

    /// Tick until the battle ends and return the report
    pub fn run_to_completion(&mut self) -> BattleReport {
        while !self.is_finished() {
            self.run_tick();
        }
        self.report()
    }

    /// Drain rewards so the economy layer can apply them once
    pub fn take_bench_grants(&mut self) -> Vec<BenchGrant> {
        std::mem::take(&mut self.bench_grants)
    }

    pub fn report(&self) -> BattleReport {
        let winning_side = match self.outcome {
            BattleOutcome::Victory(side) => Some(side),
            _ => None,
        };
        let standing = |summoned: bool| {
            winning_side.map_or(0, |side| {
                self.field
                    .units
                    .iter()
                    .filter(|u| u.side == side && u.is_standing() && u.summoned == summoned)
                    .count()
            })
        };
        BattleReport {
            winner: winning_side.map(|side| self.owners[side.index()]),
            winning_side,
            surviving_units: standing(false),
            surviving_summons: standing(true),
            ticks: self.tick,
            end_reason: self.end_reason.unwrap_or(EndReason::Elimination),
            bench_grants: self.bench_grants.clone(),
        }
    }

    pub fn snapshot(&self) -> BattleSnapshot {
        BattleSnapshot {
            tick: self.tick,
            time: self.tick as f32 * self.field.dt(),
            phase: self.phase,
            units: self.field.units.iter().map(UnitSnapshot::from).collect(),
            bombs: self.field.bombs.clone(),
            events: self.last_events.events.clone(),
        }
    }

    /// End the battle with an outcome
    pub fn end_battle(&mut self, outcome: BattleOutcome, reason: EndReason) {
        self.phase = BattlePhase::Finished;
        self.outcome = outcome;
        self.end_reason = Some(reason);
        info!(tick = self.tick, ?outcome, ?reason, "battle ended");
        self.field.log(
            BattleEventType::BattleEnded { outcome, reason },
            format!("Battle ended: {:?} ({:?})", outcome, reason),
        );
    }

    fn flush_events(&mut self) -> BattleEventLog {
        let events = std::mem::take(&mut self.field.events);
        self.battle_log.extend(events.events.iter().cloned());
        self.last_events = events.clone();
        events
    }

    fn phase_units(&mut self) {
        // Summons placed this tick act from the next one
        let order: Vec<UnitId> = self
            .field
            .units
            .iter()
            .filter(|u| u.position.is_some())
            .map(|u| u.id)
            .collect();
        for id in order {
            self.act(id);
        }
    }

    /// One unit's turn; downed units still finish the tick's exchange
    fn act(&mut self, id: UnitId) {
        if self.field.unit(id).position.is_none() {
            return;
        }
        let standing = self.field.unit(id).alive;

        if standing {
            self.clan_check(id);
            stealth::check_threshold(&mut self.field, id);
        }

        self.decay_status(id);
        if self.field.unit(id).is_stunned() {
            return;
        }

        let ability = Ability::for_kind(self.field.unit(id).kind());
        if standing && ability == Ability::Leap {
            match leap::progress(&mut self.field, id) {
                LeapProgress::Grounded => {}
                LeapProgress::Airborne | LeapProgress::Landed => return,
            }
        }

        let Some(target) = self.acquire_target(id) else {
            return;
        };

        if self.in_range(id, target) {
            self.try_attack(id, target, ability);
        } else if standing {
            self.try_move(id, target);
        }
    }

    fn clan_check(&mut self, id: UnitId) {
        let unit = self.field.unit(id);
        let Some(buff) = self.field.synergy(unit.side).clan.buff_for(unit) else {
            return;
        };
        let name = unit.name();
        let heal = unit.max_hp * buff.heal_fraction;

        let unit = self.field.unit_mut(id);
        unit.clan_triggered = true;
        unit.status.apply(EffectKind::ClanHeal, CLAN_BUFF_SECONDS, heal);
        unit.status
            .apply(EffectKind::ClanHaste, CLAN_BUFF_SECONDS, buff.interval_multiplier);
        debug!(unit = %id, heal, "clan buff");
        self.field.log(
            BattleEventType::ClanBuff { unit: id },
            format!("{} {} rallies: heal {:.0}", name, id, heal),
        );
    }

    fn decay_status(&mut self, id: UnitId) {
        let dt = self.field.dt();
        let unit = self.field.unit_mut(id);
        let outcome = unit.status.decay(dt);
        if outcome.healed > 0.0 {
            unit.heal(outcome.healed);
        }
        if outcome.expired(EffectKind::Stunned) {
            unit.attack_count = 0;
            unit.streak_target = None;
            unit.dash_pending = false;
        }
    }

    fn steps_to(&self, id: UnitId, target: UnitId, occupied: &CellSet) -> u32 {
        let unit = self.field.unit(id);
        match (unit.position, self.field.unit(target).position) {
            (Some(from), Some(to)) => path_steps(&self.field.board, from, to, unit.range(), occupied)
                .unwrap_or(UNREACHABLE),
            _ => UNREACHABLE,
        }
    }

    /// Keep a valid target unless another is strictly closer by path
    fn acquire_target(&mut self, id: UnitId) -> Option<UnitId> {
        let side = self.field.unit(id).side;
        let candidates = self.field.targetable_enemies(side);
        if candidates.is_empty() {
            self.field.unit_mut(id).set_target(None);
            return None;
        }
        let occupied = self.field.occupied(Some(id));

        let best = candidates
            .iter()
            .map(|&enemy| {
                (
                    self.steps_to(id, enemy, &occupied),
                    self.field.distance_between(id, enemy),
                    enemy,
                )
            })
            .min()
            .map(|(steps, _, enemy)| (steps, enemy))?;

        let current = self
            .field
            .unit(id)
            .current_target
            .filter(|t| self.field.unit(*t).is_targetable());
        let chosen = match current {
            Some(held) if self.steps_to(id, held, &occupied) <= best.0 => held,
            _ => best.1,
        };

        if self.field.unit(id).current_target != Some(chosen) {
            self.field.unit_mut(id).set_target(Some(chosen));
            let name = self.field.unit(id).name();
            self.field.log(
                BattleEventType::TargetAcquired {
                    unit: id,
                    target: chosen,
                },
                format!("{} {} targets {}", name, id, chosen),
            );
        }
        Some(chosen)
    }

    fn in_range(&self, id: UnitId, target: UnitId) -> bool {
        let unit = self.field.unit(id);
        match (unit.position, self.field.unit(target).position) {
            (Some(from), Some(to)) => is_in_range(&self.field.board, from, to, unit.range()),
            _ => false,
        }
    }

    fn attack_interval(&self, id: UnitId) -> f32 {
        let unit = self.field.unit(id);
        unit.definition.attack_interval
            * self.field.synergy(unit.side).interval_multiplier(unit)
            * unit.status.interval_multiplier()
    }

    fn try_attack(&mut self, id: UnitId, target: UnitId, ability: Ability) {
        let now = self.field.now;
        let Some(ready_at) = self.field.unit(id).attack_ready_at else {
            let dt = self.field.dt();
            self.field.unit_mut(id).attack_ready_at = Some(now + dt);
            return;
        };
        if now + TIME_EPSILON < ready_at {
            return;
        }

        if ability.attack(&mut self.field, id, target) {
            let side = self.field.unit(id).side;
            self.field.synergies[side.index()]
                .ranger
                .on_attack(&mut self.field.units[id.index()]);
            let next = now + self.attack_interval(id);
            self.field.unit_mut(id).attack_ready_at = Some(next);
        } else {
            // Retarget next tick
            self.field.unit_mut(id).set_target(None);
        }
    }

    fn try_move(&mut self, id: UnitId, target: UnitId) {
        let now = self.field.now;
        let unit = self.field.unit(id);
        if now - unit.last_move_time + TIME_EPSILON < unit.move_interval() {
            return;
        }
        let (Some(from), Some(goal)) = (unit.position, self.field.unit(target).position) else {
            return;
        };
        let range = unit.range();
        let occupied = self.field.occupied(Some(id));

        let mut best: Option<(u32, HexCoord)> = None;
        for step in self.field.board.neighbors(from) {
            if occupied.contains(&step) {
                continue;
            }
            let Some(steps) = path_steps(&self.field.board, step, goal, range, &occupied) else {
                continue;
            };
            if best.map_or(true, |(b, _)| steps < b) {
                best = Some((steps, step));
            }
        }
        let Some((_, to)) = best else {
            return;
        };

        if self.field.relocate(id, to) {
            let name = self.field.unit(id).name();
            self.field.unit_mut(id).last_move_time = now;
            self.field.log(
                BattleEventType::Moved { unit: id, from, to },
                format!("{} {} moves {} -> {}", name, id, from, to),
            );
        }
    }
}

/// Check if battle should end
pub fn check_battle_end(state: &BattleState) -> Option<BattleOutcome> {
    let home = state.field.standing_count(Side::Home);
    let away = state.field.standing_count(Side::Away);
    match (home, away) {
        (0, 0) => Some(BattleOutcome::Draw),
        (_, 0) => Some(BattleOutcome::Victory(Side::Home)),
        (0, _) => Some(BattleOutcome::Victory(Side::Away)),
        _ => None,
    }
}
