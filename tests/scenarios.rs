use approx::relative_eq;
use neatling::{
    evolve, random::default_rng, CarryOver, Coefficients, Config, EvolutionHooks,
    EvolutionTarget, Genotype, Individual, InnoGen, InputMode, OutputMode, Population, Specie,
    SplitPolicy,
};
use rand::{rngs::StdRng, SeedableRng};

const XOR_DATA: [[f64; 2]; 4] = [[1., 0.], [0., 1.], [1., 1.], [0., 0.]];
const XOR_EXPECTED: [[f64; 1]; 4] = [[1.], [1.], [0.], [0.]];

fn init_logs() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("neatling=debug")
        .with_test_writer()
        .try_init();
}

#[test]
fn founders_exhaust_routes() {
    let population = Population::new(2, 1, Config::default(), StdRng::seed_from_u64(0)).unwrap();
    assert_eq!(population.len(), 2);

    let mut inno = InnoGen::new(population.inno_head());
    let mut rng = StdRng::seed_from_u64(1);
    for founder in population.individuals() {
        let mut genotype = founder.genotype().clone();
        assert!(genotype.genes().is_empty());
        for from in genotype.sensory() {
            assert_eq!(
                genotype.routes(from).unwrap().iter().copied().collect::<Vec<_>>(),
                genotype.action().collect::<Vec<_>>()
            );
        }

        for _ in 0..20 {
            genotype.mutate_connection(&mut rng, &mut inno);
        }
        assert_eq!(genotype.genes().len(), 2);
        assert!(genotype.saturated());
    }
    // both founders agree on both ids
    assert_eq!(inno.head, population.inno_head() + 2);
}

/// A genotype whose network computes xor exactly, through 4 saturated hidden nodes
fn xor_genotype() -> Genotype {
    let (mut genotype, head) = Genotype::new(2, 1);
    let mut inno = InnoGen::new(head);
    let mut rng = StdRng::seed_from_u64(0);

    genotype.insert_gene((0, 2), None, &mut inno, &mut rng);
    let p = genotype.bisect((0, 2), &mut inno).unwrap();
    genotype.insert_gene((0, 2), None, &mut inno, &mut rng);
    let q = genotype.bisect((0, 2), &mut inno).unwrap();
    let u = genotype.bisect((p, 2), &mut inno).unwrap();
    let v = genotype.bisect((q, 2), &mut inno).unwrap();

    for (path, w) in [
        ((1, p), -1000.),
        ((1, q), 1000.),
        ((q, u), -750.),
        ((p, v), -750.),
    ] {
        genotype.insert_gene(path, Some(w), &mut inno, &mut rng);
    }
    for (path, w) in [
        ((0, p), 1000.),
        ((0, q), -1000.),
        ((p, u), 250.),
        ((q, v), 250.),
        ((u, 2), 1.),
        ((v, 2), 1.),
    ] {
        genotype.gene_mut(&path).unwrap().weight = w;
    }
    genotype
}

#[test]
fn xor_exact_fitness() {
    let mut xor = Individual::from_genotype(xor_genotype());
    let fitness = xor
        .evaluate(&XOR_DATA, &XOR_EXPECTED, InputMode::Points, OutputMode::Raw)
        .unwrap();
    assert_eq!(fitness, 0.);

    let outputs = xor
        .predict(&XOR_DATA, InputMode::Points, OutputMode::Raw)
        .unwrap();
    for (out, want) in outputs.iter().zip(XOR_EXPECTED) {
        assert_eq!(out[0].round(), want[0]);
    }

    // the same network read as a probability is only ever half sure of a zero
    let outputs = xor
        .predict(&XOR_DATA, InputMode::Points, OutputMode::Probability)
        .unwrap();
    assert!(relative_eq!(outputs[2][0], 0.5));
    assert!(outputs[0][0] > 0.7);
}

#[test]
fn matching_gene_distance() {
    let mut inno = InnoGen::new(3);
    let mut rng = StdRng::seed_from_u64(0);
    let (mut l, _) = Individual::new(2, 1, SplitPolicy::Reuse);
    let (mut r, _) = Individual::new(2, 1, SplitPolicy::Reuse);
    l.genotype
        .insert_gene((0, 2), Some(1.), &mut inno, &mut rng);
    r.genotype
        .insert_gene((0, 2), Some(3.), &mut inno, &mut rng);

    let specie = Specie::new(l.clone());
    let coefficients = Coefficients::from((1., 1., 1.));
    assert!(relative_eq!(specie.delta(&r.genotype, &coefficients), 2.));
    assert_eq!(specie.delta(&l.genotype, &coefficients), 0.);
}

#[test]
fn evolve_from_json_config() {
    init_logs();
    let config: Config = r#"{
        "population": 60,
        "split": "disable",
        "carry_over": "representatives",
        "output": "raw",
        "mutation": {"connection": 0.3, "node": 0.1}
    }"#
    .parse()
    .unwrap();
    assert_eq!(config.carry_over, CarryOver::Representatives);

    let mut population = Population::new(2, 1, config, default_rng()).unwrap();
    let generation = evolve(
        &mut population,
        &XOR_DATA,
        &XOR_EXPECTED,
        InputMode::Sequence,
        EvolutionTarget::Generation(20),
        &mut EvolutionHooks::default(),
    )
    .unwrap();

    assert_eq!(generation, 20);
    assert_eq!(population.errors().len(), 21);
    assert!(population.errors().iter().all(|e| e.is_finite()));
    assert!(population.species().iter().any(|s| s.age > 0));
    for individual in population.individuals() {
        assert_eq!(individual.genotype().split_policy(), SplitPolicy::Disable);
    }
}

#[test]
fn evolve_reports_errors() {
    let mut population =
        Population::new(2, 1, Config::default(), StdRng::seed_from_u64(9)).unwrap();
    let result = evolve(
        &mut population,
        &[[1., 0., 0.]],
        &[[1.]],
        InputMode::Points,
        EvolutionTarget::Generation(1),
        &mut EvolutionHooks::default(),
    );
    assert!(matches!(
        result,
        Err(neatling::Error::InputWidth { want: 2, found: 3 })
    ));
}
