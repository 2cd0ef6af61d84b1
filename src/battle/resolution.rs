//! Damage resolution and the shared battlefield context
//!
//! `Battlefield` owns everything a tick mutates: the grid, the unit arena,
//! per-side synergies, reserved cells, pending bombs and summons, and the
//! random source. Abilities take it by `&mut` and never touch globals.
//!
//! Kills are two-step. A hit that takes a unit to zero HP only *downs* it;
//! the unit becomes untargetable at once but keeps its cell until the death
//! check at the end of the tick, where it is removed from the grid, scrubbed
//! from every target slot, and its death hooks fire.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::battle::board::HexBoard;
use crate::battle::constants::{
    by_star, BOMB_DAMAGE_BY_STAR, BOMB_FUSE_SECONDS, BOMB_STUN_SECONDS, TIME_EPSILON,
};
use crate::battle::execution::{BattleEventLog, BattleEventType};
use crate::battle::grid::Grid;
use crate::battle::hex::HexCoord;
use crate::battle::pathfinding::{occupied_set, CellSet};
use crate::battle::status::EffectKind;
use crate::battle::synergy::ace::{ACE_HIT_SPEED_MULTIPLIER, ACE_HIT_SPEED_SECONDS};
use crate::battle::synergy::SynergySet;
use crate::battle::unit_type::{UnitDefinition, UnitKind};
use crate::battle::units::CombatUnit;
use crate::core::config::{validate_crit, CombatConfig};
use crate::core::error::{Result, SkirmishError};
use crate::core::types::{PlayerId, Side, Tick, UnitId};

/// Whether a hit may roll for a critical
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Crit {
    Roll,
    Never,
}

/// Result of one landed hit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitOutcome {
    pub damage: f32,
    pub crit: bool,
    pub downed: bool,
}

/// Delayed area damage left behind by a dying unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bomb {
    pub cell: HexCoord,
    /// Side that planted it; its units are never hurt
    pub side: Side,
    pub source: UnitId,
    pub damage: f32,
    pub radius: u32,
    pub stun: f32,
    pub fuse: f32,
}

/// Summon queued by a kill, resolved once at the end of the tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnRequest {
    pub cell: HexCoord,
    pub side: Side,
    pub owner: PlayerId,
    pub kind: UnitKind,
    pub star: u8,
}

/// Everything a battle mutates during a tick
#[derive(Debug, Clone)]
pub struct Battlefield {
    pub config: CombatConfig,
    pub board: HexBoard,
    pub grid: Grid,
    pub units: Vec<CombatUnit>,
    /// Indexed by `Side::index`
    pub synergies: Vec<SynergySet>,
    pub reserved: CellSet,
    pub bombs: Vec<Bomb>,
    pub spawns: Vec<SpawnRequest>,
    pub rng: ChaCha8Rng,
    pub tick: Tick,
    pub now: f32,
    pub events: BattleEventLog,
}

impl Battlefield {
    /// Place units on a fresh board and derive both sides' synergies
    ///
    /// Units are reset to their deploy state first. Brawler health is
    /// applied before curses are chosen so curses see final max HP.
    pub fn new(config: CombatConfig, mut units: Vec<CombatUnit>, owners: [PlayerId; 2], seed: u64) -> Result<Self> {
        config.validate()?;
        let board = HexBoard::new(config.board_rows, config.board_cols);
        let mut grid = Grid::new(&board);

        for (index, unit) in units.iter_mut().enumerate() {
            if unit.id.index() != index {
                return Err(SkirmishError::InvalidScenario(format!(
                    "unit id {} stored at slot {}",
                    unit.id, index
                )));
            }
            unit.reset();
            if unit.crit_chance.is_some() || unit.crit_multiplier.is_some() {
                validate_crit(
                    unit.crit_chance.unwrap_or(config.crit_chance),
                    unit.crit_multiplier.unwrap_or(config.crit_multiplier),
                )?;
            }
            if let Some(cell) = unit.position {
                grid.place(unit.id, cell)?;
            }
        }

        let mut synergies: Vec<SynergySet> = Side::both()
            .into_iter()
            .map(|side| SynergySet::from_roster(side, owners[side.index()], &units, &board))
            .collect();
        for set in &synergies {
            set.brawler.apply(&mut units, set.side);
        }
        for set in synergies.iter_mut() {
            set.undead.place_curses(&units, set.side);
        }

        Ok(Self {
            config,
            board,
            grid,
            units,
            synergies,
            reserved: CellSet::default(),
            bombs: Vec::new(),
            spawns: Vec::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            tick: 0,
            now: 0.0,
            events: BattleEventLog::new(),
        })
    }

    pub fn synergy(&self, side: Side) -> &SynergySet {
        &self.synergies[side.index()]
    }

    pub fn unit(&self, id: UnitId) -> &CombatUnit {
        &self.units[id.index()]
    }

    pub fn unit_mut(&mut self, id: UnitId) -> &mut CombatUnit {
        &mut self.units[id.index()]
    }

    pub fn dt(&self) -> f32 {
        self.config.tick_seconds
    }

    pub fn log(&mut self, event_type: BattleEventType, description: String) {
        self.events.push(event_type, description, self.tick);
    }

    /// Cells blocked for movement, optionally ignoring one unit's own cell
    pub fn occupied(&self, excluding: Option<UnitId>) -> CellSet {
        occupied_set(&self.units, excluding, &self.reserved)
    }

    /// Free for a unit to enter: on the board, empty, not reserved
    pub fn is_open(&self, cell: HexCoord) -> bool {
        self.grid.is_free(cell) && !self.reserved.contains(&cell)
    }

    /// Hop distance between two units, `u32::MAX` if either is off the board
    pub fn distance_between(&self, a: UnitId, b: UnitId) -> u32 {
        match (self.unit(a).position, self.unit(b).position) {
            (Some(pa), Some(pb)) => self.board.distance(pa, pb),
            _ => u32::MAX,
        }
    }

    /// Targetable enemies of `side`, ascending id
    pub fn targetable_enemies(&self, side: Side) -> Vec<UnitId> {
        self.units
            .iter()
            .filter(|u| u.side != side && u.is_targetable())
            .map(|u| u.id)
            .collect()
    }

    /// Targetable enemy of `side` standing on `cell`
    pub fn enemy_at(&self, cell: HexCoord, side: Side) -> Option<UnitId> {
        self.grid
            .get(cell)
            .filter(|id| {
                let unit = self.unit(*id);
                unit.side != side && unit.is_targetable()
            })
    }

    pub fn standing_count(&self, side: Side) -> usize {
        self.units.iter().filter(|u| u.side == side && u.is_standing()).count()
    }

    /// Crit chance and multiplier for hits by `attacker`
    pub fn crit_stats(&self, attacker: UnitId) -> (f32, f32) {
        let unit = self.unit(attacker);
        (
            unit.crit_chance.unwrap_or(self.config.crit_chance),
            unit.crit_multiplier.unwrap_or(self.config.crit_multiplier),
        )
    }

    pub fn roll_crit(&mut self, chance: f32) -> bool {
        self.rng.gen::<f32>() < chance
    }

    /// Move a unit through the grid; a rejected move is logged and ignored
    pub fn relocate(&mut self, id: UnitId, to: HexCoord) -> bool {
        let Some(from) = self.unit(id).position else {
            return false;
        };
        if from == to {
            return true;
        }
        match self.grid.move_unit(id, from, to) {
            Ok(()) => {
                self.unit_mut(id).position = Some(to);
                true
            }
            Err(err) => {
                warn!(unit = %id, %from, %to, error = %err, "move rejected");
                false
            }
        }
    }

    pub fn stun(&mut self, id: UnitId, seconds: f32) {
        let unit = self.unit_mut(id);
        if !unit.alive {
            return;
        }
        unit.status.stun(seconds);
        let name = unit.name();
        self.log(
            BattleEventType::Stunned { unit: id, seconds },
            format!("{} {} stunned for {:.1}s", name, id, seconds),
        );
    }

    /// Hit `target` with the attacker's damage times `multiplier`
    ///
    /// Synergy modifiers of both sides apply. Returns `None` if the target
    /// is no longer standing.
    pub fn strike(&mut self, attacker: UnitId, target: UnitId, multiplier: f32, crit: Crit) -> Option<HitOutcome> {
        let target_unit = self.units.get(target.index())?;
        if !target_unit.alive || target_unit.position.is_none() {
            return None;
        }
        let attacker_unit = self.units.get(attacker.index())?;
        let distance = self.distance_between(attacker, target);
        let dealt = self
            .synergy(attacker_unit.side)
            .damage_dealt_multiplier(attacker_unit, distance, &self.units);
        let mut damage = attacker_unit.definition.damage * dealt * multiplier;

        let (chance, crit_multiplier) = self.crit_stats(attacker);
        let is_crit = crit == Crit::Roll && self.roll_crit(chance);
        if is_crit {
            damage *= crit_multiplier;
        }
        Some(self.apply_damage(target, damage, Some(attacker), is_crit))
    }

    /// Apply pre-computed damage, with the defender's reductions and lifesteal
    pub fn apply_damage(&mut self, target: UnitId, raw: f32, attacker: Option<UnitId>, crit: bool) -> HitOutcome {
        let defender = self.unit(target);
        let damage = raw * self.synergy(defender.side).damage_taken_multiplier(defender);
        let downed = self.unit_mut(target).take_damage(damage, attacker);

        if let Some(attacker) = attacker {
            let side = self.unit(attacker).side;
            let lifesteal = self.synergy(side).ace.lifesteal(attacker);
            if lifesteal > 0.0 {
                self.unit_mut(attacker).heal(damage * lifesteal);
            }
        }

        let target_name = self.unit(target).name();
        debug!(?attacker, %target, damage, crit, downed, "hit");
        self.log(
            BattleEventType::Hit {
                attacker,
                target,
                damage,
                crit,
            },
            format!(
                "{}{} {} takes {:.1}",
                if crit { "CRIT " } else { "" },
                target_name,
                target,
                damage
            ),
        );
        if downed {
            self.log(
                BattleEventType::UnitDowned {
                    unit: target,
                    by: attacker,
                },
                format!("{} {} is down", target_name, target),
            );
        }

        HitOutcome {
            damage,
            crit,
            downed,
        }
    }

    /// Count bombs down and detonate the ones whose fuse ran out
    pub fn tick_bombs(&mut self) {
        let dt = self.dt();
        for bomb in self.bombs.iter_mut() {
            bomb.fuse -= dt;
        }
        let (ready, pending): (Vec<Bomb>, Vec<Bomb>) = std::mem::take(&mut self.bombs)
            .into_iter()
            .partition(|b| b.fuse <= TIME_EPSILON);
        self.bombs = pending;

        for bomb in ready {
            let victims: Vec<UnitId> = self
                .units
                .iter()
                .filter(|u| u.side != bomb.side && u.is_targetable())
                .filter(|u| matches!(u.position, Some(p) if self.board.distance(bomb.cell, p) <= bomb.radius))
                .map(|u| u.id)
                .collect();
            for &victim in &victims {
                self.apply_damage(victim, bomb.damage, Some(bomb.source), false);
                self.stun(victim, bomb.stun);
            }
            info!(cell = %bomb.cell, victims = victims.len(), "bomb detonated");
            self.log(
                BattleEventType::BombDetonated {
                    cell: bomb.cell,
                    victims: victims.len(),
                },
                format!("bomb at {} hits {} units", bomb.cell, victims.len()),
            );
        }
    }

    /// Remove every downed unit and fire its death hooks
    ///
    /// Returns the removed ids in ascending order.
    pub fn resolve_deaths(&mut self) -> Vec<UnitId> {
        let downed: Vec<UnitId> = self
            .units
            .iter()
            .filter(|u| !u.alive && u.position.is_some())
            .map(|u| u.id)
            .collect();

        for &victim in &downed {
            let Some(cell) = self.unit(victim).position else {
                continue;
            };
            self.grid.vacate(victim, cell);
            let unit = self.unit_mut(victim);
            unit.position = None;
            unit.current_target = None;
            let leap = unit.leap.airborne.take();
            if let Some(leap) = leap {
                self.reserved.remove(&leap.landing);
            }

            for other in self.units.iter_mut() {
                if other.current_target == Some(victim) {
                    other.set_target(None);
                }
                if other.streak_target == Some(victim) {
                    other.streak_target = None;
                    other.attack_count = 0;
                }
            }

            self.on_death(victim, cell);
        }
        downed
    }

    fn on_death(&mut self, victim: UnitId, cell: HexCoord) {
        let (victim_side, victim_kind, victim_star, victim_summoned, killer) = {
            let u = self.unit(victim);
            (u.side, u.kind(), u.star(), u.summoned, u.downed_by)
        };
        info!(unit = %victim, name = victim_kind.name(), %cell, "unit removed");
        self.log(
            BattleEventType::UnitRemoved { unit: victim, cell },
            format!("{} {} removed from {}", victim_kind, victim, cell),
        );

        if self.synergies[victim_side.opponent().index()]
            .undead
            .on_enemy_death(victim)
        {
            info!(unit = %victim, "cursed unit fell");
        }

        if let Some(killer) = killer.filter(|k| self.unit(*k).side != victim_side) {
            let (killer_side, killer_kind, killer_star, killer_owner) = {
                let k = self.unit(killer);
                (k.side, k.kind(), k.star(), k.owner)
            };

            if self.synergy(killer_side).is_captain(killer) {
                for ally in self.units.iter_mut().filter(|u| u.side == killer_side && u.alive) {
                    ally.status.apply(
                        EffectKind::AceHitSpeed,
                        ACE_HIT_SPEED_SECONDS,
                        ACE_HIT_SPEED_MULTIPLIER,
                    );
                }
                debug!(captain = %killer, "captain kill hastes team");
            }

            if killer_kind == UnitKind::SkeletonKing && !victim_summoned {
                self.spawns.push(SpawnRequest {
                    cell,
                    side: killer_side,
                    owner: killer_owner,
                    kind: UnitKind::Skeleton,
                    star: killer_star,
                });
            }
        }

        if victim_kind == UnitKind::GiantSkeleton {
            let bomb = Bomb {
                cell,
                side: victim_side,
                source: victim,
                damage: by_star(&BOMB_DAMAGE_BY_STAR, victim_star),
                radius: victim_star as u32,
                stun: BOMB_STUN_SECONDS,
                fuse: BOMB_FUSE_SECONDS,
            };
            self.log(
                BattleEventType::BombPlanted {
                    cell,
                    side: victim_side,
                },
                format!("bomb planted at {}", cell),
            );
            self.bombs.push(bomb);
        }
    }

    /// Create queued summons on cells that are still free
    pub fn resolve_spawns(&mut self) -> Vec<UnitId> {
        let mut created = Vec::new();
        for request in std::mem::take(&mut self.spawns) {
            if !self.is_open(request.cell) {
                debug!(cell = %request.cell, "spawn blocked");
                self.log(
                    BattleEventType::SpawnBlocked { cell: request.cell },
                    format!("no room to summon at {}", request.cell),
                );
                continue;
            }
            let definition = match UnitDefinition::new(request.kind, request.star) {
                Ok(def) => def,
                Err(err) => {
                    warn!(error = %err, "summon skipped");
                    continue;
                }
            };
            let id = UnitId(self.units.len());
            if let Err(err) = self.grid.place(id, request.cell) {
                warn!(error = %err, "summon placement rejected");
                continue;
            }
            self.units.push(CombatUnit::summon(
                id,
                request.side,
                request.owner,
                definition,
                request.cell,
            ));
            info!(unit = %id, kind = %request.kind, cell = %request.cell, "summoned");
            self.log(
                BattleEventType::Summoned {
                    unit: id,
                    cell: request.cell,
                },
                format!("{} {} summoned at {}", request.kind, id, request.cell),
            );
            created.push(id);
        }
        created
    }
}

/// Crit-free battlefield around the given units, for module tests
#[cfg(test)]
pub(crate) fn test_field(units: Vec<CombatUnit>) -> Battlefield {
    Battlefield::new(CombatConfig::without_crits(), units, [PlayerId(1), PlayerId(2)], 1)
        .expect("test units fit on the board")
}
