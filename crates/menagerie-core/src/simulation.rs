//! The simulation engine: turn scheduling and the round, match and tournament
//! lifecycle.
//!
//! One call to [`Simulation::step`] plays one tick:
//!
//! 1. **MATCH**: the first tick after construction (or after a tournament
//!    ends) starts a match, pairing the next two competitors in round-robin
//!    play.
//! 2. **ACT**: every placed entity is collected in row-major order and the
//!    order is shuffled. Each entity still on the grid when its turn comes
//!    acts: animals decide and resolve, temporary blocks count down.
//! 3. **PRIZES**: in standard mode prizes appear at fixed intervals.
//! 4. **ADVANCE**: the move counter moves on; past the last move the round is
//!    scored and the arena is laid out again, and past the last round of a
//!    round-robin match the match is scored and the next pairing begins.
//!
//! # Determinism
//!
//! All randomness flows from one `ChaCha8Rng` seeded at construction, and
//! each brain created through a registry receives a seed drawn from it. With
//! the same seed, config and enrolment order two simulations play identical
//! games.
//!
//! # Example
//!
//! ```
//! use menagerie_core::brain::BrainRegistry;
//! use menagerie_core::simulation::Simulation;
//!
//! let registry = BrainRegistry::with_builtins();
//! let mut sim = Simulation::with_seed(42);
//! sim.add_brain(&registry, "finder").unwrap();
//! sim.add_brain(&registry, "random").unwrap();
//!
//! for _ in 0..10 {
//!     sim.step().unwrap();
//! }
//!
//! assert_eq!(sim.move_number(), 11);
//! assert_eq!(sim.round_number(), 1);
//! ```

use std::collections::BTreeMap;
use std::fmt;

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::arena::Arena;
use crate::brain::{Brain, BrainRegistry};
use crate::config::{ConfigError, EngineConfig};
use crate::entity::{AnimalComponents, Color, Entity, EntityId, EntityInner, EntityTag, PrizeKind, Record};
use crate::error::{EngineError, EngineResult};
use crate::event::{TickEvent, TickReport};
use crate::grid::Direction;
use crate::layout::{
    find_prize_location, find_start_location, find_super_slot, place_prize, random_heading,
    ArenaLayout, ChallengeMode,
};
use crate::resolver::{decay, resolve_action, ResolveContext};
use crate::snapshot::Snapshot;
use crate::tournament::RoundRobin;

// =============================================================================
// Standing
// =============================================================================

/// One line of the tournament table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standing {
    /// The animal.
    pub id: EntityId,
    /// Its name.
    pub name: String,
    /// Its tallies.
    pub record: Record,
}

// =============================================================================
// Simulation
// =============================================================================

/// Owns the arena, the brains and every session counter.
///
/// Animals live in two lists:
/// - the **roster**: every enrolled animal, in enrolment order. Round-robin
///   pairings index into it.
/// - the **active** list: the animals competing right now. Only these are
///   placed when a round starts.
///
/// Animals not competing stay in arena storage, unplaced, so their records
/// survive between matches.
pub struct Simulation {
    config: EngineConfig,
    seed: u64,
    rng: ChaCha8Rng,
    arena: Arena,
    layout: ArenaLayout,
    brains: BTreeMap<EntityId, Box<dyn Brain>>,
    roster: Vec<EntityId>,
    active: Vec<EntityId>,
    round_robin: Option<RoundRobin>,
    move_number: u32,
    round_number: u32,
    match_ready: bool,
    message: String,
}

impl fmt::Debug for Simulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Simulation")
            .field("config", &self.config)
            .field("seed", &self.seed)
            .field("arena", &self.arena)
            .field("layout", &self.layout)
            .field("brains", &format!("[{} brains]", self.brains.len()))
            .field("roster", &self.roster)
            .field("active", &self.active)
            .field("round_robin", &self.round_robin)
            .field("move_number", &self.move_number)
            .field("round_number", &self.round_number)
            .field("match_ready", &self.match_ready)
            .field("message", &self.message)
            .finish()
    }
}

impl Simulation {
    /// Creates a simulation from a validated config.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if the config fails validation.
    pub fn new(config: EngineConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        let mode = ChallengeMode::try_from(config.play_mode)
            .map_err(|e| ConfigError::Invalid(vec![e.to_string()]))?;
        Ok(Self::build(config, mode, seed))
    }

    /// Creates a simulation with the default config.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self::build(EngineConfig::default(), ChallengeMode::Standard, seed)
    }

    fn build(config: EngineConfig, mode: ChallengeMode, seed: u64) -> Self {
        Self {
            arena: Arena::new(config.rows, config.cols),
            config,
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
            layout: ArenaLayout::new(mode),
            brains: BTreeMap::new(),
            roster: Vec::new(),
            active: Vec::new(),
            round_robin: None,
            move_number: 1,
            round_number: 1,
            match_ready: false,
            message: String::new(),
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The engine constants.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The seed the simulation was created with.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// The arena, for rendering and inspection.
    #[must_use]
    pub const fn arena(&self) -> &Arena {
        &self.arena
    }

    /// Mutable arena access for scenario setup.
    ///
    /// Changes made here bypass the resolvers; keep the grid consistent.
    pub fn arena_mut(&mut self) -> &mut Arena {
        &mut self.arena
    }

    /// Current layout settings.
    #[must_use]
    pub const fn layout(&self) -> &ArenaLayout {
        &self.layout
    }

    /// The next move to play, starting at 1.
    #[must_use]
    pub const fn move_number(&self) -> u32 {
        self.move_number
    }

    /// The round being played, starting at 1.
    #[must_use]
    pub const fn round_number(&self) -> u32 {
        self.round_number
    }

    /// Returns true once the current match has been set up.
    #[must_use]
    pub const fn is_match_ready(&self) -> bool {
        self.match_ready
    }

    /// The latest status message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Every enrolled animal in enrolment order.
    #[must_use]
    pub fn roster(&self) -> &[EntityId] {
        &self.roster
    }

    /// The animals competing right now.
    #[must_use]
    pub fn active(&self) -> &[EntityId] {
        &self.active
    }

    /// The round-robin cursor, while a tournament is running.
    #[must_use]
    pub const fn round_robin(&self) -> Option<&RoundRobin> {
        self.round_robin.as_ref()
    }

    /// An animal's tallies.
    #[must_use]
    pub fn record(&self, id: EntityId) -> Option<Record> {
        self.arena
            .get(id)
            .and_then(Entity::as_animal)
            .map(|a| a.record)
    }

    /// An animal's score in the current round.
    #[must_use]
    pub fn score(&self, id: EntityId) -> Option<i64> {
        self.arena
            .get(id)
            .and_then(Entity::as_animal)
            .map(|a| a.score)
    }

    /// Best current-round score among active animals, 0 with none active.
    #[must_use]
    pub fn max_score(&self) -> i64 {
        self.active
            .iter()
            .filter_map(|&id| self.score(id))
            .max()
            .unwrap_or(0)
    }

    /// The roster ranked by matches won, then tied, then total score.
    /// Equal entries keep enrolment order.
    #[must_use]
    pub fn standings(&self) -> Vec<Standing> {
        let mut table: Vec<Standing> = self
            .roster
            .iter()
            .filter_map(|&id| {
                let animal = self.arena.get(id)?.as_animal()?;
                Some(Standing {
                    id,
                    name: animal.name.clone(),
                    record: animal.record,
                })
            })
            .collect();
        table.sort_by(|a, b| a.record.standing_order(&b.record));
        table
    }

    // =========================================================================
    // Enrolment
    // =========================================================================

    /// Adds an animal to the roster without putting it in play.
    ///
    /// The animal wears the brain's preferred colour, or a palette colour
    /// picked by its roster position.
    pub fn enroll(&mut self, brain: Box<dyn Brain>) -> EntityId {
        let color = brain
            .preferred_color()
            .unwrap_or_else(|| Color::palette(self.roster.len()));
        let id = self.arena.spawn(
            EntityInner::Animal(AnimalComponents::named(brain.name())),
            Direction::North,
            color,
        );
        debug!(animal = %id, name = brain.name(), "enrolled");
        self.brains.insert(id, brain);
        self.roster.push(id);
        id
    }

    /// Builds a brain from `registry` with a seed drawn from the simulation
    /// and enrols it.
    ///
    /// # Errors
    ///
    /// `UnknownBrain` if `name` is not registered.
    pub fn enroll_brain(&mut self, registry: &BrainRegistry, name: &str) -> EngineResult<EntityId> {
        let brain = registry.create(name, self.rng.gen())?;
        Ok(self.enroll(brain))
    }

    /// Enrols an animal, puts it in play and restarts the round.
    ///
    /// # Errors
    ///
    /// Arena invariant violations while laying out the round.
    pub fn add_animal(&mut self, brain: Box<dyn Brain>) -> EngineResult<EntityId> {
        let id = self.enroll(brain);
        self.active.push(id);
        self.initialize_round()?;
        Ok(id)
    }

    /// [`add_animal`](Self::add_animal) with a brain built from `registry`.
    ///
    /// # Errors
    ///
    /// `UnknownBrain` if `name` is not registered.
    pub fn add_brain(&mut self, registry: &BrainRegistry, name: &str) -> EngineResult<EntityId> {
        let brain = registry.create(name, self.rng.gen())?;
        self.add_animal(brain)
    }

    /// Takes every animal out of play and abandons any tournament.
    ///
    /// Enrolled animals stay on the roster with their records.
    pub fn clear_animals(&mut self) {
        self.arena.clear_grid();
        self.active.clear();
        self.round_robin = None;
        self.match_ready = false;
        self.message = "Animals cleared".to_string();
    }

    /// Zeroes every enrolled animal's score and tallies.
    ///
    /// # Errors
    ///
    /// `UnknownEntity` if a roster entry is missing from the arena.
    pub fn reset_scores(&mut self) -> EngineResult<()> {
        for &id in &self.roster {
            animal_mut(&mut self.arena, id)?.clear_scores();
        }
        Ok(())
    }

    // =========================================================================
    // Layout controls
    // =========================================================================

    /// Switches challenge mode and restarts the round.
    ///
    /// # Errors
    ///
    /// Arena invariant violations while laying out the round.
    pub fn set_play_mode(&mut self, mode: ChallengeMode) -> EngineResult<()> {
        self.layout.set_mode(mode);
        self.message = format!("Play mode {}", mode.number());
        self.initialize_round()
    }

    /// Flips the standard block layout and restarts the round.
    ///
    /// # Errors
    ///
    /// Arena invariant violations while laying out the round.
    pub fn toggle_blocks(&mut self) -> EngineResult<()> {
        self.layout.toggle_blocks();
        self.initialize_round()
    }

    /// Clears the grid, lays out the arena and places every active animal.
    ///
    /// Each animal banks its round score, its brain hears `on_round_start`,
    /// and it gets a start cell near the centre with a random heading. An
    /// animal with no free cell sits the round out. The move counter goes
    /// back to 1.
    ///
    /// # Errors
    ///
    /// Arena invariant violations.
    pub fn initialize_round(&mut self) -> EngineResult<()> {
        self.arena.clear_grid();
        self.layout
            .initialize(&mut self.arena, &mut self.rng, &self.config)?;

        for index in 0..self.active.len() {
            let id = self.active[index];
            animal_mut(&mut self.arena, id)?.reset_for_round();

            match find_start_location(&self.arena, &mut self.rng) {
                Some(loc) => {
                    self.arena.place(id, loc)?;
                    let heading = random_heading(&mut self.rng);
                    self.arena.set_heading(id, heading)?;
                }
                None => warn!(animal = %id, "no free start cell, animal sits out the round"),
            }

            if let Some(brain) = self.brains.get_mut(&id) {
                brain.on_round_start();
            }
        }

        self.move_number = 1;
        Ok(())
    }

    // =========================================================================
    // Round robin
    // =========================================================================

    /// Starts a round-robin over the whole roster.
    ///
    /// Every tally is cleared and the next tick starts the first match.
    ///
    /// # Errors
    ///
    /// `RosterTooSmall` with fewer than two enrolled animals.
    pub fn start_round_robin(&mut self) -> EngineResult<()> {
        let rr = RoundRobin::new(self.roster.len())?;
        self.reset_scores()?;
        self.arena.clear_grid();
        self.active.clear();
        self.round_robin = Some(rr);
        self.match_ready = false;
        self.message = format!(
            "Round robin: {} competitors, {} matches",
            rr.competitors(),
            rr.match_count()
        );
        info!(
            competitors = rr.competitors(),
            matches = rr.match_count(),
            "round robin started"
        );
        Ok(())
    }

    /// Sets up the current match: picks the pairing in round-robin play and
    /// lays out round 1.
    fn begin_match(&mut self) -> EngineResult<()> {
        if let Some((a, b)) = self.round_robin.and_then(|rr| rr.current_pair()) {
            let (first, second) = (self.roster[a], self.roster[b]);
            self.active = vec![first, second];
            self.message = format!("{} vs {}", self.name(first), self.name(second));
            info!(first = %self.name(first), second = %self.name(second), "match started");
        }
        self.round_number = 1;
        self.initialize_round()?;
        self.match_ready = true;
        Ok(())
    }

    /// Scores the finished pairing and moves to the next one, or ends the
    /// tournament.
    fn complete_match(&mut self, events: &mut Vec<TickEvent>) -> EngineResult<()> {
        let Some(mut rr) = self.round_robin else {
            return Ok(());
        };
        let Some((a, b)) = rr.current_pair() else {
            return Ok(());
        };
        let (first, second) = (self.roster[a], self.roster[b]);
        let won = (
            animal_mut(&mut self.arena, first)?.record.rounds_won,
            animal_mut(&mut self.arena, second)?.record.rounds_won,
        );

        if won.0 + won.1 < self.config.rounds_per_match {
            warn!(
                first = %self.name(first),
                second = %self.name(second),
                rounds = won.0 + won.1,
                expected = self.config.rounds_per_match,
                "incomplete match"
            );
        }

        for (id, mine, theirs) in [(first, won.0, won.1), (second, won.1, won.0)] {
            let record = &mut animal_mut(&mut self.arena, id)?.record;
            match mine.cmp(&theirs) {
                std::cmp::Ordering::Greater => record.matches_won += 1,
                std::cmp::Ordering::Less => record.matches_lost += 1,
                std::cmp::Ordering::Equal => record.matches_tied += 1,
            }
            record.rounds_won = 0;
        }

        info!(
            first = %self.name(first),
            second = %self.name(second),
            first_rounds = won.0,
            second_rounds = won.1,
            "match complete"
        );
        events.push(TickEvent::MatchCompleted {
            first,
            second,
            rounds_won: won,
        });

        if rr.advance() {
            self.round_robin = Some(rr);
            self.begin_match()
        } else {
            self.finish_tournament(events);
            Ok(())
        }
    }

    fn finish_tournament(&mut self, events: &mut Vec<TickEvent>) {
        self.round_robin = None;
        self.arena.clear_grid();
        self.active.clear();
        self.match_ready = false;

        for standing in self.standings() {
            info!(
                name = %standing.name,
                total_score = standing.record.total_score,
                won = standing.record.matches_won,
                tied = standing.record.matches_tied,
                lost = standing.record.matches_lost,
                "final standing"
            );
        }
        info!("tournament complete");
        self.message = "Tournament complete".to_string();
        events.push(TickEvent::TournamentComplete);
    }

    // =========================================================================
    // Ticks
    // =========================================================================

    /// Plays one tick.
    ///
    /// # Errors
    ///
    /// Arena invariant violations raised while resolving actions or laying
    /// out a round. The simulation should be considered corrupt afterwards.
    pub fn step(&mut self) -> EngineResult<TickReport> {
        if !self.match_ready {
            self.begin_match()?;
        }

        let mut events = Vec::new();
        let mut order = self.arena.placed_ids();
        order.shuffle(&mut self.rng);

        for id in order {
            // Earlier actors may have removed or evicted this entity.
            let tag = match self.arena.get(id) {
                Some(entity) if entity.is_placed() => entity.tag(),
                _ => continue,
            };
            match tag {
                EntityTag::Animal => events.extend(self.act(id)?),
                EntityTag::Block => events.extend(decay::tick_block(&mut self.arena, id)?),
                EntityTag::Prize | EntityTag::Trail => {}
            }
        }

        if self.layout.mode().spawns_prizes() {
            self.spawn_prizes(&mut events)?;
        }

        self.move_number += 1;
        if self.move_number > self.config.moves_per_round {
            self.complete_round(&mut events)?;
            if self.round_number > self.config.rounds_per_match && self.round_robin.is_some() {
                self.complete_match(&mut events)?;
            }
        }

        debug_assert!(
            self.arena.verify_consistency().is_ok(),
            "arena grid and entity locations disagree after move {}",
            self.move_number
        );
        Ok(TickReport {
            move_number: self.move_number,
            round_number: self.round_number,
            events,
        })
    }

    /// Lets one animal decide and resolves its action.
    fn act(&mut self, id: EntityId) -> EngineResult<Vec<TickEvent>> {
        let snapshot = Snapshot::capture(&self.arena, id, self.move_number, self.round_number)?;
        let Some(brain) = self.brains.get_mut(&id) else {
            return Ok(Vec::new());
        };
        let action = brain.decide(&snapshot);
        let preferred = brain.preferred_color();

        let mut ctx = ResolveContext::new(&mut self.arena, &mut self.rng, &self.config);
        let events = resolve_action(&mut ctx, id, action)?;

        if let Some(color) = preferred {
            let entity = self.arena.entity_mut(id)?;
            if entity.color() != color {
                entity.set_color(color);
            }
        }
        Ok(events)
    }

    /// Periodic prizes for standard mode.
    fn spawn_prizes(&mut self, events: &mut Vec<TickEvent>) -> EngineResult<()> {
        let tick = self.move_number;
        if (tick - 1) % self.config.turns_per_prize == 0 {
            if let Some(at) = find_prize_location(&self.arena, &mut self.rng, &self.config) {
                let prize = place_prize(&mut self.arena, PrizeKind::Standard, self.config.prize_value, at)?;
                events.push(TickEvent::PrizeSpawned {
                    prize,
                    kind: PrizeKind::Standard,
                    at,
                });
            }
        }
        if tick % self.config.turns_per_super_prize == 0 {
            if let Some(at) = find_super_slot(&self.arena, &mut self.rng, &self.config) {
                let prize = place_prize(
                    &mut self.arena,
                    PrizeKind::Super,
                    self.config.super_prize_value,
                    at,
                )?;
                events.push(TickEvent::PrizeSpawned {
                    prize,
                    kind: PrizeKind::Super,
                    at,
                });
            }
        }
        Ok(())
    }

    /// Credits a round win to every active animal tied at the best score,
    /// then starts the next round.
    fn complete_round(&mut self, events: &mut Vec<TickEvent>) -> EngineResult<()> {
        let best_score = self.max_score();
        let winners: Vec<EntityId> = self
            .active
            .iter()
            .copied()
            .filter(|&id| self.score(id) == Some(best_score))
            .collect();
        for &id in &winners {
            animal_mut(&mut self.arena, id)?.record.rounds_won += 1;
        }

        for &id in &self.active {
            debug!(
                round = self.round_number,
                name = %self.name(id),
                score = self.score(id).unwrap_or_default(),
                "round score"
            );
        }
        info!(
            round = self.round_number,
            best_score,
            winners = winners.len(),
            "round complete"
        );
        events.push(TickEvent::RoundCompleted {
            round: self.round_number,
            best_score,
            winners,
        });

        self.round_number += 1;
        self.message = format!("Starting round #{}", self.round_number);
        self.initialize_round()
    }

    // =========================================================================
    // Runners
    // =========================================================================

    /// Plays `ticks` ticks, returning every event in order.
    ///
    /// # Errors
    ///
    /// The first error raised by [`step`](Self::step).
    pub fn run_ticks(&mut self, ticks: u32) -> EngineResult<Vec<TickEvent>> {
        let mut events = Vec::new();
        for _ in 0..ticks {
            events.extend(self.step()?.events);
        }
        Ok(events)
    }

    /// Plays until the current round is scored and returns that tick's
    /// report.
    ///
    /// # Errors
    ///
    /// The first error raised by [`step`](Self::step).
    pub fn run_round(&mut self) -> EngineResult<TickReport> {
        loop {
            let report = self.step()?;
            if report.completed_round() {
                return Ok(report);
            }
        }
    }

    /// Plays out a match.
    ///
    /// In round-robin play this runs until the current pairing is scored.
    /// Otherwise it runs rounds until the round counter passes
    /// `rounds_per_match`.
    ///
    /// # Errors
    ///
    /// The first error raised by [`step`](Self::step).
    pub fn run_match(&mut self) -> EngineResult<TickReport> {
        if self.round_robin.is_some() {
            loop {
                let report = self.step()?;
                let done = report
                    .events
                    .iter()
                    .any(|e| matches!(e, TickEvent::MatchCompleted { .. }));
                if done {
                    return Ok(report);
                }
            }
        }

        let mut report = self.run_round()?;
        while self.round_number <= self.config.rounds_per_match {
            report = self.run_round()?;
        }
        Ok(report)
    }

    /// Runs a round-robin over the whole roster to completion and returns
    /// the final standings.
    ///
    /// Starts a fresh tournament unless one is already in progress.
    ///
    /// # Errors
    ///
    /// `RosterTooSmall` with fewer than two enrolled animals, or the first
    /// error raised by [`step`](Self::step).
    pub fn run_tournament(&mut self) -> EngineResult<Vec<Standing>> {
        if self.round_robin.is_none() {
            self.start_round_robin()?;
        }
        loop {
            if self.step()?.completed_tournament() {
                return Ok(self.standings());
            }
        }
    }

    fn name(&self, id: EntityId) -> String {
        self.arena
            .get(id)
            .and_then(Entity::as_animal)
            .map_or_else(|| id.to_string(), |a| a.name.clone())
    }
}

fn animal_mut(arena: &mut Arena, id: EntityId) -> EngineResult<&mut AnimalComponents> {
    arena
        .entity_mut(id)?
        .as_animal_mut()
        .ok_or(EngineError::UnknownEntity(id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brain::Action;
    use crate::tests::ScriptedBrain;

    fn small_config() -> EngineConfig {
        EngineConfig {
            moves_per_round: 5,
            rounds_per_match: 3,
            ..EngineConfig::default()
        }
    }

    mod construction_tests {
        use super::*;

        #[test]
        fn new_rejects_invalid_config() {
            let config = EngineConfig {
                rows: 3,
                ..EngineConfig::default()
            };
            assert!(matches!(
                Simulation::new(config, 1),
                Err(ConfigError::Invalid(_))
            ));
        }

        #[test]
        fn play_mode_comes_from_config() {
            let config = EngineConfig {
                play_mode: 1,
                ..EngineConfig::default()
            };
            let sim = Simulation::new(config, 1).unwrap();
            assert_eq!(sim.layout().mode(), ChallengeMode::SinglePrize);
            assert!(!sim.layout().with_blocks());
        }

        #[test]
        fn starts_at_move_one_round_one() {
            let sim = Simulation::with_seed(3);
            assert_eq!(sim.move_number(), 1);
            assert_eq!(sim.round_number(), 1);
            assert!(!sim.is_match_ready());
            assert_eq!(sim.max_score(), 0);
        }
    }

    mod enrolment_tests {
        use super::*;

        #[test]
        fn add_animal_places_it_near_centre() {
            let mut sim = Simulation::with_seed(3);
            let id = sim
                .add_animal(Box::new(ScriptedBrain::resting("rester")))
                .unwrap();

            let loc = sim.arena().get(id).unwrap().location().unwrap();
            assert!((9..=11).contains(&loc.row) && (9..=11).contains(&loc.col));
            assert_eq!(sim.active(), &[id]);
            assert_eq!(sim.roster(), &[id]);
            sim.arena().verify_consistency().unwrap();
        }

        #[test]
        fn enroll_does_not_place() {
            let mut sim = Simulation::with_seed(3);
            let id = sim.enroll(Box::new(ScriptedBrain::resting("bench")));
            assert!(!sim.arena().get(id).unwrap().is_placed());
            assert!(sim.active().is_empty());
        }

        #[test]
        fn palette_colour_without_preference() {
            let mut sim = Simulation::with_seed(3);
            let a = sim.enroll(Box::new(ScriptedBrain::resting("a")));
            let b = sim.enroll(Box::new(ScriptedBrain::resting("b")));
            assert_eq!(sim.arena().get(a).unwrap().color(), Color::palette(0));
            assert_eq!(sim.arena().get(b).unwrap().color(), Color::palette(1));
        }

        #[test]
        fn registry_brains_use_registered_names() {
            let registry = BrainRegistry::with_builtins();
            let mut sim = Simulation::with_seed(3);
            let id = sim.add_brain(&registry, "finder").unwrap();
            assert_eq!(sim.name(id), "FinderAnimal");
            assert_eq!(
                sim.add_brain(&registry, "nope").unwrap_err(),
                EngineError::UnknownBrain("nope".to_string())
            );
        }

        #[test]
        fn clear_animals_keeps_roster() {
            let mut sim = Simulation::with_seed(3);
            let id = sim
                .add_animal(Box::new(ScriptedBrain::resting("a")))
                .unwrap();
            sim.clear_animals();
            assert!(sim.active().is_empty());
            assert_eq!(sim.roster(), &[id]);
            assert_eq!(sim.arena().grid().occupied_count(), 0);
        }
    }

    mod tick_tests {
        use super::*;

        #[test]
        fn first_step_readies_match() {
            let mut sim = Simulation::with_seed(5);
            sim.add_animal(Box::new(ScriptedBrain::resting("a")))
                .unwrap();
            let report = sim.step().unwrap();
            assert!(sim.is_match_ready());
            assert_eq!(report.move_number, 2);
            assert_eq!(report.round_number, 1);
        }

        #[test]
        fn preferred_colour_adopted_after_acting() {
            let mut sim = Simulation::with_seed(5);
            let brain = ScriptedBrain::resting("gold").with_color(Color::GOLD);
            let id = sim.add_animal(Box::new(brain)).unwrap();
            sim.arena_mut().get_mut(id).unwrap().set_color(Color::BLUE);

            sim.step().unwrap();
            assert_eq!(sim.arena().get(id).unwrap().color(), Color::GOLD);
        }

        #[test]
        fn standard_mode_spawns_prize_on_first_move() {
            let mut sim = Simulation::with_seed(5);
            sim.add_animal(Box::new(ScriptedBrain::resting("a")))
                .unwrap();
            let report = sim.step().unwrap();
            assert!(report.events.iter().any(|e| matches!(
                e,
                TickEvent::PrizeSpawned {
                    kind: PrizeKind::Standard,
                    ..
                }
            )));
        }

        /// Steps `ticks` times and returns the move number and kind of every
        /// prize spawned on that move.
        fn spawned_prizes(sim: &mut Simulation, ticks: u32) -> Vec<(u32, PrizeKind)> {
            let mut spawned = Vec::new();
            for _ in 0..ticks {
                let tick = sim.move_number();
                for event in sim.step().unwrap().events {
                    if let TickEvent::PrizeSpawned { kind, .. } = event {
                        spawned.push((tick, kind));
                    }
                }
            }
            spawned
        }

        #[test]
        fn standard_mode_follows_the_prize_schedule() {
            let mut sim = Simulation::with_seed(5);
            sim.add_animal(Box::new(ScriptedBrain::resting("a")))
                .unwrap();

            let spawned = spawned_prizes(&mut sim, 200);
            let supers: Vec<u32> = spawned
                .iter()
                .filter(|(_, kind)| *kind == PrizeKind::Super)
                .map(|&(tick, _)| tick)
                .collect();
            assert_eq!(supers, vec![100, 200]);

            let standard: Vec<u32> = spawned
                .iter()
                .filter(|(_, kind)| *kind == PrizeKind::Standard)
                .map(|&(tick, _)| tick)
                .collect();
            assert_eq!(standard.first(), Some(&1));
            assert!(standard.iter().all(|tick| (tick - 1) % 10 == 0), "{standard:?}");
            assert!(standard.len() > 1);
        }

        #[test]
        fn super_prize_skipped_when_every_slot_is_taken() {
            let mut sim = Simulation::with_seed(5);
            sim.add_animal(Box::new(ScriptedBrain::resting("a")))
                .unwrap();
            sim.step().unwrap();

            let (rows, cols) = (sim.arena().rows(), sim.arena().cols());
            for slot in crate::layout::super_prize_slots(rows, cols) {
                sim.arena_mut()
                    .spawn_at(
                        EntityInner::Block(crate::entity::BlockComponents::permanent()),
                        Direction::North,
                        Color::GRAY,
                        slot,
                    )
                    .unwrap();
            }

            let spawned = spawned_prizes(&mut sim, 150);
            assert!(spawned.iter().all(|(_, kind)| *kind == PrizeKind::Standard));
            assert!(!spawned.is_empty());
            sim.arena().verify_consistency().unwrap();
        }

        #[test]
        fn single_prize_mode_spawns_nothing() {
            let mut sim = Simulation::with_seed(5);
            sim.set_play_mode(ChallengeMode::SinglePrize).unwrap();
            sim.add_animal(Box::new(ScriptedBrain::resting("a")))
                .unwrap();
            let events = sim.run_ticks(200).unwrap();
            assert!(!events
                .iter()
                .any(|e| matches!(e, TickEvent::PrizeSpawned { .. })));
        }

        #[test]
        fn wall_blocks_expire() {
            let config = EngineConfig {
                wall_block_duration: 3,
                play_mode: 1,
                ..EngineConfig::default()
            };
            let mut sim = Simulation::new(config, 9).unwrap();
            let script = vec![Action::BuildWall(Direction::North), Action::Rest];
            sim.add_animal(Box::new(ScriptedBrain::new("builder", script)))
                .unwrap();

            let events = sim.run_ticks(5).unwrap();
            let built = events
                .iter()
                .find_map(|e| match e {
                    TickEvent::WallBuilt { cells, .. } => Some(cells.len()),
                    _ => None,
                })
                .unwrap();
            let expired = events
                .iter()
                .filter(|e| matches!(e, TickEvent::BlockExpired { .. }))
                .count();
            assert_eq!(expired, built);
        }

        #[test]
        fn layout_blocks_expire_after_their_lifetime() {
            let config = EngineConfig {
                layout_block_lifetime: 2,
                ..EngineConfig::default()
            };
            let mut sim = Simulation::new(config, 9).unwrap();
            sim.add_animal(Box::new(ScriptedBrain::resting("a")))
                .unwrap();
            let blocks = sim
                .arena()
                .occupants()
                .iter()
                .filter(|(_, e)| e.tag() == EntityTag::Block)
                .count();
            assert!(blocks > 0);

            let first = sim.step().unwrap();
            assert!(!first
                .events
                .iter()
                .any(|e| matches!(e, TickEvent::BlockExpired { .. })));
            let second = sim.step().unwrap();
            let expired = second
                .events
                .iter()
                .filter(|e| matches!(e, TickEvent::BlockExpired { .. }))
                .count();
            assert_eq!(expired, blocks);
        }

        #[test]
        fn round_rolls_over_after_last_move() {
            let mut sim = Simulation::new(small_config(), 5).unwrap();
            sim.add_animal(Box::new(ScriptedBrain::resting("a")))
                .unwrap();

            for expected in 2..=5 {
                let report = sim.step().unwrap();
                assert_eq!(report.move_number, expected);
                assert!(!report.completed_round());
            }
            let report = sim.step().unwrap();
            assert!(report.completed_round());
            assert_eq!(report.move_number, 1);
            assert_eq!(report.round_number, 2);
            assert_eq!(sim.message(), "Starting round #2");
        }
    }

    mod round_robin_tests {
        use super::*;

        #[test]
        fn start_requires_two_competitors() {
            let mut sim = Simulation::with_seed(1);
            sim.enroll(Box::new(ScriptedBrain::resting("a")));
            assert_eq!(
                sim.start_round_robin(),
                Err(EngineError::RosterTooSmall {
                    needed: 2,
                    found: 1,
                })
            );
        }

        #[test]
        fn first_step_pairs_first_two() {
            let mut sim = Simulation::new(small_config(), 1).unwrap();
            let ids: Vec<_> = ["a", "b", "c"]
                .iter()
                .map(|name| sim.enroll(Box::new(ScriptedBrain::resting(name))))
                .collect();
            sim.start_round_robin().unwrap();
            sim.step().unwrap();

            assert_eq!(sim.active(), &ids[..2]);
            assert!(sim.arena().get(ids[2]).unwrap().location().is_none());
        }

        #[test]
        fn resting_animals_tie_every_match() {
            let mut sim = Simulation::new(small_config(), 1).unwrap();
            for name in ["a", "b", "c"] {
                sim.enroll(Box::new(ScriptedBrain::resting(name)));
            }
            let standings = sim.run_tournament().unwrap();

            assert_eq!(standings.len(), 3);
            for standing in standings {
                assert_eq!(standing.record.matches_tied, 2);
                assert_eq!(standing.record.matches_won, 0);
                assert_eq!(standing.record.rounds_won, 0);
            }
            assert!(sim.round_robin().is_none());
            assert_eq!(sim.message(), "Tournament complete");
        }
    }
}
