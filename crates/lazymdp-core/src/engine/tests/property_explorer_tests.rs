use std::collections::{HashSet, VecDeque};
use std::rc::Rc;

use proptest::prelude::*;

use crate::{Mdp, Operator};

const MAX_OUT_DEGREE: usize = 3;

/// One operator per adjacency slot: slot `k` applies where the state has a `k`-th edge.
fn graph_mdp(adjacency: Rc<Vec<Vec<usize>>>) -> Mdp<usize, u8> {
    let operators = (0..MAX_OUT_DEGREE).map(|slot| {
        let guard = Rc::clone(&adjacency);
        let edges = Rc::clone(&adjacency);
        Operator::new(
            format!("edge_{slot}"),
            move |s: &usize| slot < guard[*s].len(),
            move |s: &usize| edges[*s][slot],
        )
    });

    let mut mdp: Mdp<usize, u8> = Mdp::new(0);
    mdp.register_actions([0])
        .register_operators(operators.collect::<Vec<_>>())
        .register_start_state(0);
    mdp
}

fn reachable_by_bfs(adjacency: &[Vec<usize>]) -> HashSet<usize> {
    let mut seen = HashSet::from([0]);
    let mut queue = VecDeque::from([0]);
    while let Some(state) = queue.pop_front() {
        for &next in &adjacency[state] {
            if seen.insert(next) {
                queue.push_back(next);
            }
        }
    }
    seen
}

fn arbitrary_graph() -> impl Strategy<Value = Vec<Vec<usize>>> {
    (1usize..24).prop_flat_map(|size| {
        proptest::collection::vec(
            proptest::collection::vec(0..size, 0..=MAX_OUT_DEGREE),
            size,
        )
    })
}

proptest! {
    #[test]
    fn closure_matches_independent_bfs(adjacency in arbitrary_graph()) {
        let adjacency = Rc::new(adjacency);
        let mut mdp = graph_mdp(Rc::clone(&adjacency));

        mdp.generate_all_states().expect("operators registered");

        let known: HashSet<usize> = mdp.known_states().iter().copied().collect();
        prop_assert_eq!(known.len(), mdp.state_count());
        prop_assert_eq!(known, reachable_by_bfs(&adjacency));
    }

    #[test]
    fn neighbors_are_stable_across_calls(adjacency in arbitrary_graph()) {
        let adjacency = Rc::new(adjacency);
        let mut mdp = graph_mdp(Rc::clone(&adjacency));
        mdp.generate_all_states().expect("operators registered");

        for state in mdp.known_states().to_vec() {
            let first = mdp.state_neighbors(&state).expect("operators registered");
            let second = mdp.state_neighbors(&state).expect("operators registered");
            prop_assert_eq!(first, second);
        }
    }
}
