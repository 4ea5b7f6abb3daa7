use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use broodsim::{
    chart,
    config::SimSettings,
    report::{self, CsvSink},
    sim::Simulation,
    species::SpeciesBook,
};

#[derive(Debug, Parser)]
#[command(author, version, about = "Single-species stochastic population simulator")]
struct Cli {
    /// Which species to simulate
    #[arg(default_value = "bulbasaur")]
    species: String,

    /// Toggles human interaction in the environment
    #[arg(long)]
    human: bool,

    /// Path to the species data JSON file
    #[arg(long, default_value = "species_data.json")]
    species_data: PathBuf,

    /// Optional YAML file overriding the built-in simulation constants
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Directory for the CSV export and the rendered chart
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Seed for the random stream
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let settings = match &cli.settings {
        Some(path) => SimSettings::load(path)?,
        None => SimSettings::default(),
    };
    let book = SpeciesBook::load(&cli.species_data)?;
    let profile = book.profile(&cli.species)?;

    let mut sim = Simulation::new(settings, &profile, cli.human, cli.seed);
    let mut sink = CsvSink::create(&cli.out_dir, &cli.species)?;
    let outcome = sim.run(&mut sink)?;
    let csv_path = sink.finish()?;

    let series = report::read_series(&csv_path)?;
    let chart_path = cli.out_dir.join(chart::svg_file_name(&cli.species));
    chart::render(&series, &cli.species, &chart_path)?;

    println!(
        "Run for '{}' ended after {} ticks: {}. Series in {}, chart in {}.",
        cli.species,
        sim.tick(),
        outcome,
        csv_path.display(),
        chart_path.display()
    );
    Ok(())
}
