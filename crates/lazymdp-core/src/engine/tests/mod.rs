mod explorer_tests;
mod property_explorer_tests;
mod q_learning_tests;

use crate::{Mdp, Operator};

/// Two states: `move` takes A to the absorbing B for a reward of 10, `stay` keeps A.
pub(super) fn two_state_mdp(seed: u64) -> Mdp<&'static str, &'static str> {
    let mut mdp: Mdp<&'static str, &'static str> = Mdp::new(seed);
    mdp.register_actions(["stay", "move"])
        .register_operators([Operator::new("to_b", |s: &&str| *s == "A", |_| "B")])
        .register_transition_function(|s, a, sp| match (*s, *a, *sp) {
            ("A", "move", "B") => 1.0,
            ("A", "stay", "A") => 1.0,
            ("B", _, "B") => 1.0,
            _ => 0.0,
        })
        .register_reward_function(|s, a, sp| match (*s, *a, *sp) {
            ("A", "move", "B") => 10.0,
            _ => 0.0,
        })
        .register_start_state("A");
    mdp
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(super) enum Chain {
    At(u8),
    Dead,
}

pub(super) const CHAIN_EXIT_REWARD: f64 = 10.0;

/// Three cells in a row; `right` advances and leaving the last cell ends in `Dead`.
pub(super) fn chain_mdp(seed: u64) -> Mdp<Chain, &'static str> {
    fn advance(state: &Chain) -> Chain {
        match state {
            Chain::At(2) | Chain::Dead => Chain::Dead,
            Chain::At(i) => Chain::At(i + 1),
        }
    }

    let mut mdp: Mdp<Chain, &'static str> = Mdp::new(seed);
    mdp.register_actions(["stay", "right"])
        .register_operators([Operator::new(
            "advance",
            |s: &Chain| *s != Chain::Dead,
            advance,
        )])
        .register_transition_function(|s, a, sp| {
            let target = match (*s, *a) {
                (Chain::Dead, _) | (_, "stay") => *s,
                _ => advance(s),
            };
            if *sp == target { 1.0 } else { 0.0 }
        })
        .register_reward_function(|s, a, sp| match (*s, *a, *sp) {
            (Chain::At(2), "right", Chain::Dead) => CHAIN_EXIT_REWARD,
            _ => 0.0,
        })
        .register_start_state(Chain::At(0))
        .register_terminal_state(Chain::Dead);
    mdp
}
