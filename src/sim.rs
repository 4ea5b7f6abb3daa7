use std::fmt;

use anyhow::Result;
use log::{debug, info};

use crate::{
    config::SimSettings,
    pipeline::IncubationPipeline,
    population::{Population, Sex},
    report::{RowSink, TimeSeriesRow},
    rng::SimRng,
    species::SpeciesProfile,
};

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Total population reached the configured ceiling.
    MaxPopulationReached,
    /// No living females and no viable eggs left anywhere in the pipeline.
    Extinction,
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Termination::MaxPopulationReached => write!(f, "population max reached"),
            Termination::Extinction => write!(f, "extinction"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimState {
    Running,
    Terminated(Termination),
}

/// Single-species stochastic population simulation.
///
/// One seeded random stream drives every draw; within a tick the order is
/// always female deaths, male deaths, hatch sex rolls, lay rolls, so a seed
/// fully determines the run.
pub struct Simulation {
    settings: SimSettings,
    p_male: f64,
    human_mode: bool,
    tick: u64,
    population: Population,
    pipeline: IncubationPipeline,
    rng: SimRng,
}

impl Simulation {
    pub fn new(settings: SimSettings, profile: &SpeciesProfile, human_mode: bool, seed: u64) -> Self {
        let (p_male, _) = profile.sex_ratio.probabilities();
        let population = Population::from_ratio(settings.starting_population, p_male);
        let pipeline = IncubationPipeline::new(profile.egg_cycles);
        Self {
            settings,
            p_male,
            human_mode,
            tick: 0,
            population,
            pipeline,
            rng: SimRng::new(seed),
        }
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn population(&self) -> Population {
        self.population
    }

    pub fn pipeline_len(&self) -> usize {
        self.pipeline.len()
    }

    /// Run one death check per individual of the given sex. The iteration
    /// count is fixed at entry, so at most that many can die and the count
    /// never goes negative.
    fn death_step(&mut self, sex: Sex) {
        let alive = self.population.count(sex);
        for _ in 0..alive {
            if self.rng.death_roll() <= self.settings.death_threshold {
                self.population.record_death(sex);
            }
        }
    }

    /// Hatch `eggs_ready` eggs, assigning each a sex by an independent roll
    /// against the male probability. Zero eggs is a valid no-op.
    fn hatch_step(&mut self, eggs_ready: u64) {
        info!("{eggs_ready} eggs are hatching");
        for _ in 0..eggs_ready {
            if self.rng.sex_roll() <= self.p_male {
                self.population.record_hatch(Sex::Male);
            } else {
                self.population.record_hatch(Sex::Female);
            }
        }
    }

    /// One lay check per living female. Returns the eggs laid this tick,
    /// which is at most the female count. A fertility rate of 100 or more
    /// makes every check succeed; the rate is intentionally not clamped.
    fn lay_eggs(&mut self, fertility_rate: u32) -> u64 {
        let mut eggs_laid = 0;
        for _ in 0..self.population.female {
            if self.rng.lay_roll() <= fertility_rate {
                eggs_laid += 1;
            }
        }
        eggs_laid
    }

    /// Pick this tick's fertility rate. The branches are ordered: human
    /// interference with males present takes priority over the female-only
    /// fallback, and with no females the rate is zero.
    fn fertility_rate(&self) -> u32 {
        if self.population.male >= 1
            && self.human_mode
            && self.tick <= self.settings.human_mode_cutoff_tick
        {
            self.settings.fertility_rate_with_humans
        } else if self.population.female >= 1 {
            self.settings.fertility_rate_no_males
        } else {
            0
        }
    }

    /// Advance the simulation by one tick, emitting the pre-mutation counts
    /// to the sink first so rows are indexed from tick 0.
    pub fn step(&mut self, sink: &mut dyn RowSink) -> Result<SimState> {
        sink.emit(&TimeSeriesRow {
            tick: self.tick,
            female: self.population.female,
            male: self.population.male,
        })?;
        self.tick += 1;

        self.death_step(Sex::Female);
        self.death_step(Sex::Male);

        let eggs_ready = self.pipeline.take_due();
        self.hatch_step(eggs_ready);

        let fertility_rate = self.fertility_rate();
        let eggs_laid = self.lay_eggs(fertility_rate);
        self.pipeline.queue(eggs_laid);

        let total = self.population.total();
        debug!(
            "tick {}: total {} (female {}, male {}), {} eggs laid",
            self.tick, total, self.population.female, self.population.male, eggs_laid
        );

        if total >= self.settings.max_population {
            info!("population max reached at tick {}", self.tick);
            return Ok(SimState::Terminated(Termination::MaxPopulationReached));
        }
        // A species is only truly gone once no female is alive and no egg in
        // the pipeline could still produce one.
        if self.population.female == 0 && !self.pipeline.has_viable_eggs() {
            info!("extinction at tick {}", self.tick);
            return Ok(SimState::Terminated(Termination::Extinction));
        }
        Ok(SimState::Running)
    }

    /// Run to termination, returning the reason the loop stopped.
    pub fn run(&mut self, sink: &mut dyn RowSink) -> Result<Termination> {
        loop {
            if let SimState::Terminated(reason) = self.step(sink)? {
                return Ok(reason);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::species::SexRatio;

    fn profile(male: u32, female: u32, egg_cycles: usize) -> SpeciesProfile {
        SpeciesProfile {
            sex_ratio: SexRatio { male, female },
            egg_cycles,
        }
    }

    fn sim_with(settings: SimSettings, male: u64, female: u64, cycles: usize) -> Simulation {
        let mut sim = Simulation::new(settings, &profile(1, 1, cycles), false, 42);
        sim.population = Population { male, female };
        sim
    }

    #[test]
    fn starting_split_follows_sex_ratio() {
        let sim = Simulation::new(SimSettings::default(), &profile(7, 1, 20), false, 0);
        assert_eq!(sim.population.male, 14);
        assert_eq!(sim.population.female, 2);
        assert_eq!(sim.pipeline_len(), 20);
        assert_eq!(sim.tick(), 0);
    }

    #[test]
    fn death_step_never_increases_and_never_underflows() {
        let mut sim = sim_with(SimSettings::default(), 0, 50, 1);
        sim.death_step(Sex::Female);
        assert!(sim.population.female <= 50);
        sim.death_step(Sex::Male);
        assert_eq!(sim.population.male, 0);
    }

    #[test]
    fn death_step_with_certain_threshold_removes_everyone() {
        let settings = SimSettings {
            death_threshold: 10_000,
            ..SimSettings::default()
        };
        let mut sim = sim_with(settings, 9, 7, 1);
        sim.death_step(Sex::Female);
        sim.death_step(Sex::Male);
        assert_eq!(sim.population.female, 0);
        assert_eq!(sim.population.male, 0);
    }

    #[test]
    fn death_step_with_zero_threshold_removes_nobody() {
        let settings = SimSettings {
            death_threshold: 0,
            ..SimSettings::default()
        };
        let mut sim = sim_with(settings, 9, 7, 1);
        sim.death_step(Sex::Female);
        sim.death_step(Sex::Male);
        assert_eq!(sim.population.female, 7);
        assert_eq!(sim.population.male, 9);
    }

    #[test]
    fn hatching_zero_eggs_changes_nothing() {
        let mut sim = sim_with(SimSettings::default(), 3, 4, 1);
        sim.hatch_step(0);
        assert_eq!(sim.population, Population { male: 3, female: 4 });
    }

    #[test]
    fn hatching_with_certain_male_probability_adds_only_males() {
        let mut sim = sim_with(SimSettings::default(), 0, 0, 1);
        sim.p_male = 1.0;
        sim.hatch_step(25);
        assert_eq!(sim.population.male, 25);
        assert_eq!(sim.population.female, 0);
    }

    #[test]
    fn zero_fertility_lays_no_eggs() {
        let mut sim = sim_with(SimSettings::default(), 0, 40, 1);
        assert_eq!(sim.lay_eggs(0), 0);
    }

    #[test]
    fn saturated_fertility_lays_one_egg_per_female() {
        let mut sim = sim_with(SimSettings::default(), 0, 40, 1);
        assert_eq!(sim.lay_eggs(100), 40);
        // Rates above 100 are permitted and behave the same way.
        assert_eq!(sim.lay_eggs(250), 40);
    }

    #[test]
    fn fertility_policy_prefers_human_branch() {
        let mut sim = sim_with(SimSettings::default(), 5, 5, 1);
        sim.human_mode = true;
        sim.tick = 100;
        assert_eq!(sim.fertility_rate(), 50);
    }

    #[test]
    fn fertility_policy_falls_back_after_cutoff() {
        let mut sim = sim_with(SimSettings::default(), 5, 5, 1);
        sim.human_mode = true;
        sim.tick = 101;
        assert_eq!(sim.fertility_rate(), 10);
    }

    #[test]
    fn fertility_policy_without_humans_uses_fallback_even_with_males() {
        let mut sim = sim_with(SimSettings::default(), 5, 5, 1);
        assert_eq!(sim.fertility_rate(), 10);
    }

    #[test]
    fn fertility_policy_is_zero_without_females() {
        let mut sim = sim_with(SimSettings::default(), 5, 0, 1);
        assert_eq!(sim.fertility_rate(), 0);
    }

    #[test]
    fn ceiling_terminates_with_max_reason() {
        let settings = SimSettings {
            max_population: 10,
            death_threshold: 0,
            ..SimSettings::default()
        };
        let mut sim = sim_with(settings, 6, 6, 3);
        let mut rows: Vec<TimeSeriesRow> = Vec::new();
        let state = sim.step(&mut rows).unwrap();
        assert_eq!(
            state,
            SimState::Terminated(Termination::MaxPopulationReached)
        );
        // The row for the tick is emitted before the check fires.
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].tick, 0);
    }

    #[test]
    fn no_females_and_empty_pipeline_is_extinction() {
        let settings = SimSettings {
            death_threshold: 0,
            ..SimSettings::default()
        };
        let mut sim = sim_with(settings, 4, 0, 5);
        let mut rows: Vec<TimeSeriesRow> = Vec::new();
        let state = sim.step(&mut rows).unwrap();
        assert_eq!(state, SimState::Terminated(Termination::Extinction));
    }

    #[test]
    fn eggs_in_the_pipeline_block_extinction() {
        let settings = SimSettings {
            death_threshold: 0,
            ..SimSettings::default()
        };
        let mut sim = sim_with(settings, 4, 0, 5);
        sim.pipeline.take_due();
        sim.pipeline.queue(3);
        let mut rows: Vec<TimeSeriesRow> = Vec::new();
        assert_eq!(sim.step(&mut rows).unwrap(), SimState::Running);
    }

    #[test]
    fn pipeline_length_is_preserved_by_step() {
        let mut sim = Simulation::new(SimSettings::default(), &profile(1, 1, 10), false, 3);
        let mut rows: Vec<TimeSeriesRow> = Vec::new();
        for _ in 0..50 {
            if let SimState::Terminated(_) = sim.step(&mut rows).unwrap() {
                break;
            }
            assert_eq!(sim.pipeline_len(), 10);
        }
    }

    #[test]
    fn identical_seeds_give_identical_runs() {
        let settings = SimSettings {
            max_population: 2_000,
            ..SimSettings::default()
        };
        let mut rows_a: Vec<TimeSeriesRow> = Vec::new();
        let mut rows_b: Vec<TimeSeriesRow> = Vec::new();
        let mut sim_a = Simulation::new(settings.clone(), &profile(1, 1, 10), true, 99);
        let mut sim_b = Simulation::new(settings, &profile(1, 1, 10), true, 99);
        let end_a = sim_a.run(&mut rows_a).unwrap();
        let end_b = sim_b.run(&mut rows_b).unwrap();
        assert_eq!(end_a, end_b);
        assert_eq!(rows_a, rows_b);
    }
}
