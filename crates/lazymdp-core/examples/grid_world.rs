//! The 4×3 grid world with slippery moves, a wall, a goal and a pit.
//!
//! A random episode runs first, then every solver. Value iteration and
//! Q-learning share `config.discount`, 0.9 by default. Pass a config file
//! with `discount: 0.5` to learn with the shorter horizon.

use lazymdp_core::{Domain, Mdp, Operator, SolverConfig};

const COLS: i8 = 4;
const ROWS: i8 = 3;
const WALL: (i8, i8) = (1, 1);
const GOAL: (i8, i8) = (3, 2);
const PIT: (i8, i8) = (3, 1);
const LIVING_REWARD: f64 = -0.04;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Cell {
    At(i8, i8),
    Dead,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Dir {
    North,
    South,
    East,
    West,
    Exit,
}

impl Dir {
    fn label(self) -> &'static str {
        match self {
            Dir::North => "N",
            Dir::South => "S",
            Dir::East => "E",
            Dir::West => "W",
            Dir::Exit => "X",
        }
    }

    fn offset(self) -> (i8, i8) {
        match self {
            Dir::North => (0, 1),
            Dir::South => (0, -1),
            Dir::East => (1, 0),
            Dir::West => (-1, 0),
            Dir::Exit => (0, 0),
        }
    }

    /// The two directions an intended move can slip into.
    fn slips(self) -> [Dir; 2] {
        match self {
            Dir::North | Dir::South => [Dir::East, Dir::West],
            Dir::East | Dir::West => [Dir::North, Dir::South],
            Dir::Exit => [Dir::Exit, Dir::Exit],
        }
    }
}

fn is_exit_cell(cell: Cell) -> bool {
    matches!(cell, Cell::At(c, r) if (c, r) == GOAL || (c, r) == PIT)
}

/// Cell reached by moving `dir` from `cell`, or `None` if the move leaves the grid or hits the wall.
fn shift(cell: Cell, dir: Dir) -> Option<Cell> {
    let Cell::At(c, r) = cell else {
        return None;
    };
    let (dc, dr) = dir.offset();
    let (nc, nr) = (c + dc, r + dr);
    let inside = (0..COLS).contains(&nc) && (0..ROWS).contains(&nr);
    (inside && (nc, nr) != WALL && !is_exit_cell(cell)).then_some(Cell::At(nc, nr))
}

struct GridWorld;

impl Domain for GridWorld {
    type State = Cell;
    type Action = Dir;

    fn actions(&self) -> Vec<Dir> {
        vec![Dir::North, Dir::South, Dir::East, Dir::West, Dir::Exit]
    }

    fn operators(&self) -> Vec<Operator<Cell>> {
        let mut operators: Vec<Operator<Cell>> = [Dir::North, Dir::South, Dir::East, Dir::West]
            .into_iter()
            .map(|dir| {
                Operator::new(
                    dir.label(),
                    move |s: &Cell| shift(*s, dir).is_some(),
                    move |s: &Cell| shift(*s, dir).unwrap_or(*s),
                )
            })
            .collect();
        operators.push(Operator::new(
            "exit",
            |s: &Cell| is_exit_cell(*s),
            |_: &Cell| Cell::Dead,
        ));
        operators
    }

    fn transition(&self, state: &Cell, action: &Dir, next: &Cell) -> f64 {
        if *state == Cell::Dead {
            return if *next == Cell::Dead { 1.0 } else { 0.0 };
        }
        if is_exit_cell(*state) {
            return if *next == Cell::Dead { 1.0 } else { 0.0 };
        }
        if *action == Dir::Exit {
            return if next == state { 1.0 } else { 0.0 };
        }

        let [left, right] = action.slips();
        [(*action, 0.8), (left, 0.1), (right, 0.1)]
            .into_iter()
            .filter(|(dir, _)| shift(*state, *dir).unwrap_or(*state) == *next)
            .map(|(_, p)| p)
            .sum()
    }

    fn reward(&self, state: &Cell, _: &Dir, next: &Cell) -> f64 {
        match (*state, *next) {
            (Cell::At(c, r), Cell::Dead) if (c, r) == GOAL => 1.0,
            (Cell::At(c, r), Cell::Dead) if (c, r) == PIT => -1.0,
            (Cell::Dead, _) => 0.0,
            _ => LIVING_REWARD,
        }
    }

    fn start_state(&self) -> Cell {
        Cell::At(0, 0)
    }

    fn terminal_state(&self) -> Option<Cell> {
        Some(Cell::Dead)
    }
}

/// Render one value per cell, top row first, in the grid's layout.
fn grid_string(cell_text: impl Fn(Cell) -> Option<String>) -> String {
    let mut out = String::new();
    for r in (0..ROWS).rev() {
        for c in 0..COLS {
            let text = cell_text(Cell::At(c, r)).unwrap_or_else(|| "#".to_string());
            out.push_str(&format!("[{text:>7}]\t"));
        }
        out.push_str("\n\n");
    }
    out
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = std::env::args()
        .nth(1)
        .map(SolverConfig::from_yaml_path)
        .unwrap_or_else(SolverConfig::from_default_yaml)
        .expect("failed to load solver config");

    let mut mdp: Mdp<Cell, Dir> = Mdp::from_config(&config);
    mdp.register_domain(GridWorld);

    let episode = mdp
        .random_episode(config.random_episode_steps)
        .expect("grid world registered");
    println!(
        "random episode: steps={} reward={:.2} terminated={}",
        episode.steps, episode.total_reward, episode.terminated
    );

    let solution = mdp.solve(&config).expect("grid world solve failed");

    println!("GW values:");
    println!(
        "{}",
        grid_string(|cell| solution.values.get(&cell).ok().map(|v| format!("{v:.3}")))
    );
    println!("GW Q values (max per cell):");
    println!(
        "{}",
        grid_string(|cell| solution.q.max_value(&cell).ok().map(|v| format!("{v:.3}")))
    );
    println!("GW policy:");
    println!(
        "{}",
        grid_string(|cell| solution.policy.get(&cell).ok().map(|d| d.label().to_string()))
    );
    println!(
        "episodes={} steps={} truncated={}",
        solution.learning.episodes, solution.learning.steps, solution.learning.truncated_episodes
    );
}
