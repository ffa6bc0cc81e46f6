use std::cell::Cell;
use std::rc::Rc;

use crate::{Component, EngineError, Mdp, Operator};

fn ring_mdp(size: u32, applications: Rc<Cell<usize>>) -> Mdp<u32, char> {
    let mut mdp: Mdp<u32, char> = Mdp::new(1);
    mdp.register_actions(['n'])
        .register_operators([
            Operator::new("next", |_: &u32| true, {
                let applications = Rc::clone(&applications);
                move |s: &u32| {
                    applications.set(applications.get() + 1);
                    (s + 1) % size
                }
            }),
            Operator::new("prev", |_: &u32| true, move |s: &u32| {
                applications.set(applications.get() + 1);
                (s + size - 1) % size
            }),
        ])
        .register_transition_function(|_, _, _| 0.5)
        .register_reward_function(|_, _, _| 0.0)
        .register_start_state(0);
    mdp
}

#[test]
fn neighbors_are_memoized_after_first_expansion() {
    let applications = Rc::new(Cell::new(0));
    let mut mdp = ring_mdp(4, Rc::clone(&applications));

    let first = mdp.state_neighbors(&0).expect("operators registered");
    assert_eq!(first, vec![1, 3]);
    assert_eq!(applications.get(), 2);

    let second = mdp.state_neighbors(&0).expect("operators registered");
    assert_eq!(first, second);
    assert_eq!(applications.get(), 2);
}

#[test]
fn expansion_registers_successors_as_known() {
    let mut mdp = ring_mdp(6, Rc::new(Cell::new(0)));
    assert_eq!(mdp.known_states(), &[0]);

    mdp.state_neighbors(&0).expect("operators registered");
    assert_eq!(mdp.known_states(), &[0, 1, 5]);
}

#[test]
fn generate_all_states_expands_each_state_of_a_cycle_once() {
    let applications = Rc::new(Cell::new(0));
    let mut mdp = ring_mdp(5, Rc::clone(&applications));

    let discovered = mdp.generate_all_states().expect("operators registered");
    assert_eq!(discovered, 4);
    assert_eq!(mdp.state_count(), 5);
    // Two operators per state, each state expanded exactly once.
    assert_eq!(applications.get(), 10);

    assert_eq!(mdp.generate_all_states().expect("operators registered"), 0);
    assert_eq!(applications.get(), 10);
}

#[test]
fn duplicate_successors_are_collapsed() {
    let mut mdp: Mdp<u8, char> = Mdp::new(0);
    mdp.register_operators([
        Operator::new("a", |s: &u8| *s == 0, |_: &u8| 1),
        Operator::new("b", |s: &u8| *s == 0, |_: &u8| 1),
        Operator::new("c", |s: &u8| *s == 0, |_: &u8| 2),
    ])
    .register_start_state(0);

    assert_eq!(mdp.state_neighbors(&0).expect("operators registered"), vec![1, 2]);
}

#[test]
fn inapplicable_operators_are_skipped() {
    let mut mdp: Mdp<u8, char> = Mdp::new(0);
    mdp.register_operators([
        Operator::new("up", |s: &u8| *s < 2, |s: &u8| s + 1),
        Operator::new("never", |_: &u8| false, |_: &u8| 99),
    ])
    .register_start_state(0);

    mdp.generate_all_states().expect("operators registered");
    assert_eq!(mdp.known_states(), &[0, 1, 2]);
    assert!(!mdp.is_known(&99));
    assert_eq!(mdp.state_neighbors(&2).expect("operators registered"), Vec::<u8>::new());
}

#[test]
fn exploration_requires_operators() {
    let mut mdp: Mdp<u8, char> = Mdp::new(0);
    mdp.register_start_state(0);

    assert_eq!(
        mdp.generate_all_states(),
        Err(EngineError::NotInitialized {
            component: Component::Operators
        })
    );
}
