use core::ops::ControlFlow;
use neatling::{
    evolve, random::default_rng, Config, EvolutionHooks, EvolutionTarget, Hook, InputMode,
    OutputMode, Population, Stats,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const XOR_DATA: [[f64; 2]; 4] = [[1., 0.], [0., 1.], [1., 1.], [0., 0.]];
const XOR_EXPECTED: [[f64; 1]; 4] = [[1.], [1.], [0.], [0.]];
const GENERATIONS: usize = 300;

fn report(stats: &Stats) -> ControlFlow<()> {
    if stats.generation % 25 == 0 {
        match stats.summary().to_json() {
            Ok(json) => println!("{json}"),
            Err(e) => eprintln!("cannot summarize generation {}: {e}", stats.generation),
        }
    }
    ControlFlow::Continue(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "neatling=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => std::fs::read_to_string(path)?.parse()?,
        None => Config {
            output: OutputMode::Raw,
            ..Config::default()
        },
    };

    let mut population = Population::new(2, 1, config, default_rng())?;
    let solved: Hook = Box::new(|stats| {
        if stats.generation > 0 && stats.any_fitter_than(-1e-3) {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    });
    let report: Hook = Box::new(report);
    let mut hooks = EvolutionHooks::new(vec![report, solved]);

    let generation = evolve(
        &mut population,
        &XOR_DATA,
        &XOR_EXPECTED,
        InputMode::Points,
        EvolutionTarget::Generation(GENERATIONS),
        &mut hooks,
    )?;

    let fittest = population.fittest().ok_or("empty population")?;
    println!(
        "generation {generation}: fitness {:?} with {} hidden nodes",
        fittest.fitness(),
        fittest.hidden_count()
    );
    for (input, output) in XOR_DATA.iter().zip(fittest.predict(
        &XOR_DATA,
        InputMode::Points,
        population.config().output,
    )?) {
        println!("{input:?} -> {output:.3?}");
    }
    println!(
        "solved: {}",
        population.test_best(&XOR_DATA, &XOR_EXPECTED, InputMode::Points)?
    );

    Ok(())
}
