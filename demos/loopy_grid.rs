use clap::Parser;
use dairs::{
    algorithms::{new_inference_algorithm, parse_algorithm_string},
    cluster_graph::ClusterGraph,
    core::{Factor, FactorGraph, InferenceAlgorithm, PropertySet, Var, VarSet},
};
use rand::{rngs::StdRng, SeedableRng};

/// Runs belief propagation on a random binary model on a square lattice
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Linear size of the lattice
    #[arg(long, default_value_t = 10)]
    side: usize,

    /// Inverse temperature, the scale of random log-potentials
    #[arg(long, default_value_t = 0.5)]
    beta: f64,

    /// Seed of the generator sampling potentials
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Algorithm with properties, e.g. BP[maxiter=1000,tol=1e-9,logdomain=0,updates=SEQMAX]
    #[arg(
        long,
        default_value = "BP[maxiter=1000,tol=1e-9,logdomain=0,updates=SEQMAX,verbose=1]"
    )]
    alg: String,

    /// YAML file with a map of properties overriding the ones given in `alg`,
    /// values must be quoted strings
    #[arg(long)]
    config: Option<String>,
}

fn grid(side: usize, beta: f64, rng: &mut StdRng) -> FactorGraph {
    let var = |x: usize, y: usize| Var::new((x + side * y) as i64, 2);
    let mut factors = Vec::with_capacity(3 * side * side);
    for x in 0..side {
        for y in 0..side {
            factors.push(Factor::random_exp_gauss(VarSet::from(var(x, y)), beta, rng));
            if x + 1 < side {
                let scope: VarSet = [var(x, y), var(x + 1, y)].into_iter().collect();
                factors.push(Factor::random_exp_gauss(scope, beta, rng));
            }
            if y + 1 < side {
                let scope: VarSet = [var(x, y), var(x, y + 1)].into_iter().collect();
                factors.push(Factor::random_exp_gauss(scope, beta, rng));
            }
        }
    }
    FactorGraph::new(factors).expect("Lattice factors must be consistent")
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    let (name, mut opts) = parse_algorithm_string(&args.alg).unwrap();
    if let Some(path) = &args.config {
        let file = std::fs::File::open(path).expect("Cannot open the config file");
        // values are strings, e.g. `tol: "1e-9"`
        let overrides: PropertySet =
            serde_yaml::from_reader(file).expect("Config must map property names to strings");
        opts.merge(overrides);
    }
    let mut rng = StdRng::seed_from_u64(args.seed);
    let fg = grid(args.side, args.beta, &mut rng);
    let junction = ClusterGraph::from_clusters(&fg.cliques()).var_elim_min_fill();
    let width = junction.clusters().iter().map(|c| c.len()).max().unwrap_or(0);
    println!(
        "{} variables, {} factors, MinFill elimination cliques have up to {} variables",
        fg.nr_vars(),
        fg.nr_factors(),
        width
    );
    let mut alg = new_inference_algorithm(name, fg, &opts).unwrap();
    let maxdiff = alg.run().unwrap();
    println!(
        "{}: {} passes, maxdiff {:e}",
        alg.identify(),
        alg.iterations(),
        maxdiff
    );
    println!("Bethe logZ: {}", alg.log_z().unwrap());
    let magnetization = alg
        .factor_graph()
        .vars()
        .iter()
        .map(|v| {
            let b = alg.belief_var(v).unwrap();
            b.p()[0] - b.p()[1]
        })
        .sum::<f64>()
        / alg.factor_graph().nr_vars() as f64;
    println!("Average magnetization: {}", magnetization);
}
