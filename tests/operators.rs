mod common;

use common::{pick_node, ScriptedSource};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use stdgp::engines::generation::ramped_half_and_half;
use stdgp::types::{FitnessKind, Operator, Terminal};
use stdgp::{
    discard_deep, get_offspring, subtree_crossover, subtree_mutation, Candidate, DoubleTournament,
    RunSettings, Tree,
};

fn settings(max_depth: usize) -> Arc<RunSettings> {
    Arc::new(RunSettings {
        operators: vec![Operator::Add, Operator::Sub, Operator::Mul, Operator::Div],
        terminals: vec![
            Terminal::Variable(0),
            Terminal::Variable(1),
            Terminal::Variable(2),
            Terminal::Constant(1.0),
        ],
        max_depth,
        model_name: "SymbolicRegression".to_string(),
        fitness_kind: FitnessKind::Rmse,
    })
}

fn leaf(t: Terminal) -> Tree {
    Tree::leaf(t)
}

fn x(i: usize) -> Tree {
    leaf(Terminal::Variable(i))
}

/// Two parents: ( x0 + 1 ) and ( x1 * x2 ), the second with its own settings
fn two_parents() -> (Vec<Candidate>, Arc<RunSettings>, Arc<RunSettings>) {
    let first = settings(3);
    let second = settings(5);
    let population = vec![
        Candidate::new(
            Arc::clone(&first),
            Tree::branch(Operator::Add, &[x(0), leaf(Terminal::Constant(1.0))]).unwrap(),
        ),
        Candidate::new(
            Arc::clone(&second),
            Tree::branch(Operator::Mul, &[x(1), x(2)]).unwrap(),
        ),
    ];
    (population, first, second)
}

/// Selecting index `i` out of two with n_dt = sf = sp = 1 takes one tournament
/// draw and one draw over the single-entry pool.
fn select(i: usize) -> Vec<usize> {
    vec![i, 0]
}

fn single_draw_selection() -> DoubleTournament {
    DoubleTournament::new(1, 1, 1, false).unwrap()
}

#[test]
fn test_crossover_swaps_parents_in_place() {
    let (mut population, first, _) = two_parents();
    let mut draws = Vec::new();
    draws.extend(select(0));
    draws.extend(select(1));
    draws.extend(pick_node(2, 3)); // the constant 1 in ( x0 + 1 )
    draws.extend(pick_node(1, 3)); // x1 in ( x1 * x2 )
    let mut rng = ScriptedSource::new(&draws);

    let offspring = subtree_crossover(&mut rng, &mut population, &single_draw_selection()).unwrap();

    assert!(rng.is_exhausted());
    assert_eq!(offspring.len(), 2);
    assert_eq!(offspring[0].to_string(), "( x0 + x1 )");
    assert_eq!(offspring[1].to_string(), "( 1 * x2 )");
    assert_eq!(population[0].to_string(), "( x0 + x1 )");
    assert_eq!(population[1].to_string(), "( 1 * x2 )");
    assert!(Arc::ptr_eq(offspring[0].settings(), &first));
    assert!(Arc::ptr_eq(offspring[1].settings(), &first));
}

#[test]
fn test_crossover_on_root_reassigns_whole_tree() {
    let (mut population, _, _) = two_parents();
    let mut draws = Vec::new();
    draws.extend(select(0));
    draws.extend(select(1));
    draws.extend(pick_node(0, 3)); // root of ( x0 + 1 )
    draws.extend(pick_node(2, 3)); // x2
    let mut rng = ScriptedSource::new(&draws);

    let offspring = subtree_crossover(&mut rng, &mut population, &single_draw_selection()).unwrap();

    assert_eq!(offspring[0].to_string(), "x2");
    assert_eq!(offspring[1].to_string(), "( x1 * ( x0 + 1 ) )");
    assert_eq!(offspring[0].size(), 1);
    assert_eq!(offspring[1].size(), 5);
    assert_eq!(offspring[1].depth(), 2);
}

#[test]
fn test_crossover_with_itself() {
    let (mut population, _, _) = two_parents();
    let mut draws = Vec::new();
    draws.extend(select(1));
    draws.extend(select(1));
    draws.extend(pick_node(1, 3)); // x1
    draws.extend(pick_node(2, 3)); // x2
    let mut rng = ScriptedSource::new(&draws);

    let offspring = subtree_crossover(&mut rng, &mut population, &single_draw_selection()).unwrap();

    assert_eq!(offspring.len(), 2);
    assert_eq!(offspring[0].to_string(), "( x2 * x1 )");
    assert_eq!(offspring[1].to_string(), "( x2 * x1 )");
    assert_eq!(population[1].to_string(), "( x2 * x1 )");
}

#[test]
fn test_crossover_with_itself_on_nested_nodes_keeps_tree() {
    let (mut population, _, _) = two_parents();
    let mut draws = Vec::new();
    draws.extend(select(0));
    draws.extend(select(0));
    draws.extend(pick_node(0, 3)); // root
    draws.extend(pick_node(1, 3)); // x0, inside the root
    let mut rng = ScriptedSource::new(&draws);

    let offspring = subtree_crossover(&mut rng, &mut population, &single_draw_selection()).unwrap();

    assert_eq!(offspring[0].to_string(), "( x0 + 1 )");
    assert_eq!(offspring[1].to_string(), "( x0 + 1 )");
}

#[test]
fn test_crossover_offspring_are_independent() {
    let mut rng = StdRng::seed_from_u64(31);
    let run = settings(4);
    let mut population = ramped_half_and_half(&mut rng, &run, 12, 4).unwrap();
    let selection = DoubleTournament::new(3, 3, 2, true).unwrap();

    let mut offspring = subtree_crossover(&mut rng, &mut population, &selection).unwrap();
    let sibling = offspring[1].to_string();
    let parents: Vec<String> = population.iter().map(|c| c.to_string()).collect();

    let root = offspring[0].tree().root();
    offspring[0].tree_mut().replace_subtree(root, &x(9));

    assert_eq!(offspring[0].to_string(), "x9");
    assert_eq!(offspring[1].to_string(), sibling);
    let after: Vec<String> = population.iter().map(|c| c.to_string()).collect();
    assert_eq!(after, parents);
}

#[test]
fn test_mutation_regrows_within_ceiling() {
    let mut rng = StdRng::seed_from_u64(77);
    let selection = DoubleTournament::new(2, 2, 2, false).unwrap();

    for max_depth in [0, 1, 3, 5] {
        let run = settings(max_depth);
        for _ in 0..25 {
            // A lone leaf: the only node is the root, so the offspring is exactly
            // the grown subtree
            let mut population = vec![Candidate::new(Arc::clone(&run), x(0))];
            let offspring = subtree_mutation(&mut rng, &mut population, &selection).unwrap();

            assert_eq!(offspring.len(), 1);
            assert!(offspring[0].depth() <= max_depth);
            assert_eq!(offspring[0].to_string(), population[0].to_string());
        }
    }
}

#[test]
fn test_mutation_edits_selected_parent() {
    let (mut population, _, second) = two_parents();
    let mut draws = Vec::new();
    draws.extend(select(1));
    draws.extend(pick_node(2, 3)); // x2
    // grow: the single terminal choice picks the constant
    let mut rng = ScriptedSource::new(&[draws, vec![3]].concat()).with_units(&[0.9]);

    let offspring = subtree_mutation(&mut rng, &mut population, &single_draw_selection()).unwrap();

    assert!(rng.is_exhausted());
    assert_eq!(offspring[0].to_string(), "( x1 * 1 )");
    assert_eq!(population[1].to_string(), "( x1 * 1 )");
    assert_eq!(population[0].to_string(), "( x0 + 1 )");
    assert!(Arc::ptr_eq(offspring[0].settings(), &second));
}

#[test]
fn test_dispatcher_splits_on_one_half() {
    let (mut population, _, _) = two_parents();
    let selection = single_draw_selection();

    let mut draws = Vec::new();
    draws.extend(select(0));
    draws.extend(select(1));
    draws.extend(pick_node(1, 3));
    draws.extend(pick_node(1, 3));
    let mut rng = ScriptedSource::new(&draws).with_units(&[0.49]);
    assert_eq!(get_offspring(&mut rng, &mut population, &selection).unwrap().len(), 2);

    let mut draws = Vec::new();
    draws.extend(select(0));
    draws.extend(pick_node(0, 3));
    draws.push(0); // grown terminal
    let mut rng = ScriptedSource::new(&draws).with_units(&[0.5, 0.9]);
    assert_eq!(get_offspring(&mut rng, &mut population, &selection).unwrap().len(), 1);
    assert!(rng.is_exhausted());
}

#[test]
fn test_replay_is_bit_identical() {
    let run = settings(4);
    let selection = DoubleTournament::new(3, 4, 2, false).unwrap();

    let replay = |seed: u64| {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut population = ramped_half_and_half(&mut rng, &run, 16, 4).unwrap();
        let mut produced = Vec::new();
        for _ in 0..40 {
            for child in get_offspring(&mut rng, &mut population, &selection).unwrap() {
                produced.push(child.to_string());
            }
        }
        let parents: Vec<String> = population.iter().map(|c| c.to_string()).collect();
        (produced, parents)
    };

    assert_eq!(replay(2024), replay(2024));
}

#[test]
fn test_depth_filter_properties() {
    let mut rng = StdRng::seed_from_u64(8);
    let run = settings(6);
    let batch = ramped_half_and_half(&mut rng, &run, 40, 6).unwrap();
    let order: Vec<String> = batch.iter().map(|c| c.to_string()).collect();
    let input_len = batch.len();

    let kept = discard_deep(batch, 3);

    assert!(kept.len() <= input_len);
    assert!(kept.iter().all(|c| c.depth() <= 3));
    // relative order preserved
    let mut cursor = order.iter();
    for candidate in &kept {
        let text = candidate.to_string();
        assert!(cursor.any(|seen| *seen == text));
    }
}
