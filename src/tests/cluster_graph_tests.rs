use std::collections::BTreeSet;

use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};

use super::utils::gen_random_torus;
use crate::{
    cluster_graph::{
        elimination_choice_min_fill, elimination_cost_min_fill, elimination_cost_min_neighbors,
        elimination_cost_min_weight, elimination_cost_weighted_min_fill, greedy_choice,
        ClusterGraph,
    },
    core::{ErrorKind, Var, VarSet},
};

fn var_set(vars: &[Var], indices: &[usize]) -> VarSet {
    indices.iter().map(|i| vars[*i]).collect()
}

#[inline]
fn gen_random_clusters(rng: &mut impl Rng, vars: &[Var], clusters_number: usize) -> Vec<VarSet> {
    (0..clusters_number)
        .map(|_| {
            let size = rng.gen_range(1..=3);
            vars.choose_multiple(&mut *rng, size).copied().collect()
        })
        .collect()
}

#[test]
fn insert_is_idempotent() {
    let x: Vec<_> = (0..4).map(|l| Var::new(l, 2)).collect();
    let mut cl = ClusterGraph::new();
    cl.insert(var_set(&x, &[0, 1]));
    cl.insert(var_set(&x, &[2, 3]));
    let before = cl.clone();
    cl.insert(var_set(&x, &[1, 0]));
    assert_eq!(cl, before);
    assert_eq!(cl.size(), 2);
    assert!(cl.graph().is_consistent());
}

#[test]
fn erase_non_maximal_leaves_antichain() {
    let mut rng = StdRng::seed_from_u64(1);
    let x: Vec<_> = (0..8).map(|l| Var::new(l, 2)).collect();
    for _ in 0..20 {
        let clusters = gen_random_clusters(&mut rng, &x, 12);
        let mut cl = ClusterGraph::from_clusters(&clusters);
        cl.erase_non_maximal();
        assert!(cl.graph().is_consistent());
        for (pos, lhs) in cl.clusters().iter().enumerate() {
            for (other_pos, rhs) in cl.clusters().iter().enumerate() {
                if pos != other_pos {
                    assert!(!lhs.is_subset_of(rhs));
                }
            }
        }
        // every original cluster is still covered
        for cluster in &clusters {
            assert!(cl.clusters().iter().any(|c| cluster.is_subset_of(c)));
        }
        for big_i in 0..cl.size() {
            assert!(cl.is_maximal(big_i));
        }
    }
}

#[test]
fn erase_subsuming() {
    let x: Vec<_> = (0..4).map(|l| Var::new(l, 2)).collect();
    let mut cl = ClusterGraph::from_clusters(&[
        var_set(&x, &[0, 1]),
        var_set(&x, &[1, 2]),
        var_set(&x, &[2, 3]),
    ]);
    let i = cl.find_var(&x[1]).unwrap();
    cl.erase_subsuming(i);
    assert_eq!(cl.clusters(), &[var_set(&x, &[2, 3])]);
    assert!(cl.graph().nb1(i).is_empty());
    assert!(cl.graph().is_consistent());
}

#[test]
fn neighborhoods() {
    let x: Vec<_> = (0..4).map(|l| Var::new(l, 2)).collect();
    let cl = ClusterGraph::from_clusters(&[var_set(&x, &[0, 1]), var_set(&x, &[1, 2])]);
    let i1 = cl.find_var(&x[1]).unwrap();
    assert_eq!(cl.delta_inclusive(i1), var_set(&x, &[0, 1, 2]));
    assert_eq!(cl.delta(i1), var_set(&x, &[0, 2]));
    let i0 = cl.find_var(&x[0]).unwrap();
    let i2 = cl.find_var(&x[2]).unwrap();
    assert!(cl.adj(i0, i1));
    assert!(!cl.adj(i0, i2));
    assert!(cl.find_var(&x[3]).is_none());
}

#[test]
fn var_elim_covers_clusters() {
    let mut rng = StdRng::seed_from_u64(2);
    let x: Vec<_> = (0..10).map(|l| Var::new(l, rng.gen_range(2..4))).collect();
    let choices: Vec<Box<dyn Fn(&ClusterGraph, &BTreeSet<usize>) -> usize>> = vec![
        Box::new(elimination_choice_min_fill),
        Box::new(greedy_choice(elimination_cost_weighted_min_fill)),
        Box::new(greedy_choice(elimination_cost_min_neighbors)),
        Box::new(greedy_choice(elimination_cost_min_weight)),
    ];
    for _ in 0..10 {
        let clusters = gen_random_clusters(&mut rng, &x, 8);
        let cl = ClusterGraph::from_clusters(&clusters);
        for choose in &choices {
            let cliques = cl.var_elim(choose);
            let union = cliques.clusters().iter().fold(VarSet::new(), |acc, c| &acc | c);
            let all_vars: VarSet = cl.vars().iter().copied().collect();
            assert_eq!(union, all_vars);
            for cluster in &clusters {
                assert!(cliques.clusters().iter().any(|c| cluster.is_subset_of(c)));
            }
            assert!(cliques.graph().is_consistent());
            // every variable is eliminated exactly once, by the clique recording it
            assert_eq!(cliques.size(), cl.vars().len());
            let recorded = cliques.clusters();
            for (pos, clique) in recorded.iter().enumerate() {
                let later = recorded[(pos + 1)..]
                    .iter()
                    .fold(VarSet::new(), |acc, c| &acc | c);
                assert!(clique.iter().any(|v| !later.contains(v)));
            }
        }
    }
}

#[test]
fn var_elim_on_torus() {
    let mut rng = StdRng::seed_from_u64(3);
    let fg = gen_random_torus(&mut rng, 4, 1.);
    let cl = ClusterGraph::from_clusters(&fg.cliques());
    let cliques = cl.var_elim_min_fill();
    let width = cliques.clusters().iter().map(|c| c.len()).max().unwrap();
    // a 4 x 4 torus can not be triangulated with cliques of less than 5 variables
    assert!(width >= 5);
    assert!(width < 16);
}

#[test]
fn min_fill_costs() {
    let x: Vec<_> = (0..4).map(|l| Var::new(l, 2)).collect();
    let clique = ClusterGraph::from_clusters(&[var_set(&x, &[0, 1, 2, 3])]);
    for i in 0..4 {
        assert_eq!(elimination_cost_min_fill(&clique, i), 0);
    }
    // a chain x0 - x1 - x2 - x3
    let chain = ClusterGraph::from_clusters(&[
        var_set(&x, &[0, 1]),
        var_set(&x, &[1, 2]),
        var_set(&x, &[2, 3]),
    ]);
    let costs: Vec<_> = (0..4).map(|i| elimination_cost_min_fill(&chain, i)).collect();
    assert_eq!(costs, [0, 1, 1, 0]);
    let remaining = (0..4).collect();
    assert_eq!(elimination_choice_min_fill(&chain, &remaining), 0);
    let remaining = (1..4).collect();
    assert_eq!(elimination_choice_min_fill(&chain, &remaining), 3);
    assert_eq!(elimination_cost_min_neighbors(&chain, 1), 2);
    assert_eq!(elimination_cost_min_weight(&chain, 1), 4);
}

#[test]
fn weighted_min_fill_cost() {
    let vars = [Var::new(0, 2), Var::new(1, 3), Var::new(2, 5)];
    let chain = ClusterGraph::from_clusters(&[var_set(&vars, &[0, 1]), var_set(&vars, &[1, 2])]);
    let i1 = chain.find_var(&vars[1]).unwrap();
    assert_eq!(elimination_cost_weighted_min_fill(&chain, i1), 10);
    assert_eq!(elimination_cost_min_fill(&chain, i1), 1);
}

#[test]
fn var_elim_sequence() {
    let x: Vec<_> = (0..4).map(|l| Var::new(l, 2)).collect();
    let chain = ClusterGraph::from_clusters(&[
        var_set(&x, &[0, 1]),
        var_set(&x, &[1, 2]),
        var_set(&x, &[2, 3]),
    ]);
    let cliques = chain.var_elim_sequence(&[x[1], x[2]]).unwrap();
    assert_eq!(cliques.clusters(), &[var_set(&x, &[0, 1, 2]), var_set(&x, &[0, 2, 3])]);
    let err = chain.var_elim_sequence(&[x[0], Var::new(9, 2)]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ObjectNotFound);
}

#[test]
fn costs_of_wide_clusters_saturate() {
    let x: Vec<_> = (0..66).map(|l| Var::new(l, 2)).collect();
    let all: VarSet = x.iter().copied().collect();
    let wide = ClusterGraph::from_clusters(&[all]);
    assert_eq!(elimination_cost_min_weight(&wide, 0), usize::MAX);
    assert_eq!(elimination_cost_min_fill(&wide, 0), 0);
    let remaining = (0..66).collect();
    assert_eq!(greedy_choice(elimination_cost_min_weight)(&wide, &remaining), 0);
    let cliques = wide.var_elim(greedy_choice(elimination_cost_min_weight));
    assert_eq!(cliques.size(), 66);
    // fill pairs of huge variables
    let big = 1usize << 40;
    let vars = [Var::new(0, big), Var::new(1, 2), Var::new(2, big)];
    let chain = ClusterGraph::from_clusters(&[var_set(&vars, &[0, 1]), var_set(&vars, &[1, 2])]);
    let i1 = chain.find_var(&vars[1]).unwrap();
    assert_eq!(elimination_cost_weighted_min_fill(&chain, i1), usize::MAX);
    assert_eq!(elimination_cost_min_weight(&chain, i1), usize::MAX);
}
