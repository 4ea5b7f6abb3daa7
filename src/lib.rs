pub mod chart;
pub mod config;
pub mod pipeline;
pub mod population;
pub mod report;
pub mod rng;
pub mod sim;
pub mod species;

pub use config::SimSettings;
pub use sim::{SimState, Simulation, Termination};
pub use species::{SpeciesBook, SpeciesError, SpeciesProfile};
