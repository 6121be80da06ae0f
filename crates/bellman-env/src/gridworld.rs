//! Stochastic gridworld

use serde::{Deserialize, Serialize};

use bellman_core::{Action, Environment, Mdp, RLError, Result, Transitions};

/// Grid coordinate, `y` grows downwards from the top row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    /// Column
    pub x: usize,
    /// Row
    pub y: usize,
}

impl Cell {
    /// Create a new cell
    #[must_use]
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

/// Gridworld moves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Move {
    /// Towards row 0
    Up,
    /// Away from row 0
    Down,
    /// Towards column 0
    Left,
    /// Away from column 0
    Right,
    /// Stay put, only used as the no-op
    None,
}

impl Move {
    /// Every real move, in the order they are offered
    pub const ALL: [Move; 4] = [Move::Up, Move::Down, Move::Left, Move::Right];

    fn perpendicular(self) -> [Move; 2] {
        match self {
            Move::Up | Move::Down => [Move::Left, Move::Right],
            Move::Left | Move::Right => [Move::Up, Move::Down],
            Move::None => [Move::None, Move::None],
        }
    }
}

impl Action for Move {
    fn noop() -> Self {
        Move::None
    }
}

/// Content of a grid cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Tile {
    /// Walkable cell
    Empty,
    /// Blocked cell, not a state
    Wall,
    /// Absorbing cell paying its reward on entry
    Exit(f64),
}

/// Rectangular gridworld with noisy moves
///
/// A move goes in the intended direction with probability `1 - noise` and
/// in each perpendicular direction with probability `noise / 2`. Moves into
/// a wall or off the grid leave the agent in place.
#[derive(Debug, Clone)]
pub struct Gridworld {
    width: usize,
    height: usize,
    tiles: Vec<Tile>,
    start: Cell,
    noise: f64,
    living_reward: f64,
}

impl Gridworld {
    /// Parse a grid from rows of whitespace-separated tokens
    ///
    /// `.` is empty, `#` a wall, `S` the start cell and a number an exit
    /// paying that reward.
    pub fn from_rows(rows: &[&str], noise: f64, living_reward: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&noise) {
            return Err(RLError::InvalidConfig(format!(
                "noise must be in [0, 1], got {noise}"
            )));
        }

        let mut tiles = Vec::new();
        let mut start = None;
        let mut width = None;

        for (y, row) in rows.iter().enumerate() {
            let tokens: Vec<&str> = row.split_whitespace().collect();
            match width {
                None => width = Some(tokens.len()),
                Some(w) if w != tokens.len() => {
                    return Err(RLError::DimensionMismatch {
                        expected: w,
                        actual: tokens.len(),
                    })
                }
                Some(_) => {}
            }

            for (x, token) in tokens.into_iter().enumerate() {
                let tile = match token {
                    "." => Tile::Empty,
                    "#" => Tile::Wall,
                    "S" => {
                        start = Some(Cell::new(x, y));
                        Tile::Empty
                    }
                    other => Tile::Exit(other.parse().map_err(|_| {
                        RLError::InvalidConfig(format!("unknown grid token {other:?}"))
                    })?),
                };
                tiles.push(tile);
            }
        }

        let width = width.filter(|&w| w > 0).ok_or_else(|| {
            RLError::InvalidConfig("grid must have at least one column".to_string())
        })?;
        let start =
            start.ok_or_else(|| RLError::InvalidConfig("grid has no start cell".to_string()))?;

        Ok(Self {
            width,
            height: rows.len(),
            tiles,
            start,
            noise,
            living_reward,
        })
    }

    /// The 4x3 grid from Russell & Norvig: +1 and -1 exits on the right
    /// and a wall in the middle, with 20% noise
    #[must_use]
    pub fn book_grid() -> Self {
        Self::from_rows(&[". . . 1", ". # . -1", "S . . ."], 0.2, 0.0)
            .unwrap_or_else(|_| unreachable!("book grid layout is valid"))
    }

    /// Start cell
    #[must_use]
    pub fn start(&self) -> Cell {
        self.start
    }

    /// Noise of the moves
    #[must_use]
    pub fn noise(&self) -> f64 {
        self.noise
    }

    /// Width and height
    #[must_use]
    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Tile at `cell`, `None` off the grid
    #[must_use]
    pub fn tile(&self, cell: Cell) -> Option<Tile> {
        (cell.x < self.width && cell.y < self.height)
            .then(|| self.tiles[cell.y * self.width + cell.x])
    }

    fn is_open(&self, cell: Cell) -> bool {
        matches!(self.tile(cell), Some(Tile::Empty | Tile::Exit(_)))
    }

    fn target(&self, from: Cell, m: Move) -> Cell {
        let to = match m {
            Move::Up if from.y > 0 => Cell::new(from.x, from.y - 1),
            Move::Down => Cell::new(from.x, from.y + 1),
            Move::Left if from.x > 0 => Cell::new(from.x - 1, from.y),
            Move::Right => Cell::new(from.x + 1, from.y),
            _ => from,
        };
        if self.is_open(to) {
            to
        } else {
            from
        }
    }
}

impl Mdp for Gridworld {
    type State = Cell;
    type Action = Move;

    fn reachable_states(&self) -> Vec<Cell> {
        (0..self.height)
            .flat_map(|y| (0..self.width).map(move |x| Cell::new(x, y)))
            .filter(|&c| self.is_open(c))
            .collect()
    }

    fn legal_actions(&self, state: &Cell) -> Vec<Move> {
        match self.tile(*state) {
            Some(Tile::Empty) => Move::ALL.to_vec(),
            _ => Vec::new(),
        }
    }

    fn transition_probabilities(&self, state: &Cell, action: &Move) -> Result<Transitions<Cell>> {
        if self.tile(*state) != Some(Tile::Empty) {
            return Err(RLError::Mdp(format!("no transition out of {state:?}")));
        }
        if action.is_noop() {
            return Err(RLError::Mdp("the no-op action has no transition".to_string()));
        }

        let [left, right] = action.perpendicular();
        let outcomes = [
            (self.target(*state, *action), 1.0 - self.noise),
            (self.target(*state, left), self.noise / 2.0),
            (self.target(*state, right), self.noise / 2.0),
        ];

        let mut transitions: Transitions<Cell> = Vec::with_capacity(3);
        for (cell, p) in outcomes {
            if p <= 0.0 {
                continue;
            }
            match transitions.iter_mut().find(|(c, _)| *c == cell) {
                Some((_, total)) => *total += p,
                None => transitions.push((cell, p)),
            }
        }
        Ok(transitions)
    }

    fn reward(&self, _state: &Cell, _action: &Move, next_state: &Cell) -> Result<f64> {
        match self.tile(*next_state) {
            Some(Tile::Exit(reward)) => Ok(reward),
            Some(Tile::Empty) => Ok(self.living_reward),
            _ => Err(RLError::Mdp(format!("{next_state:?} is not a state"))),
        }
    }

    fn is_absorbing(&self, state: &Cell) -> bool {
        matches!(self.tile(*state), Some(Tile::Exit(_)))
    }
}

impl Environment for Gridworld {
    type State = Cell;
    type Action = Move;

    fn legal_actions(&self, state: &Cell) -> Vec<Move> {
        Mdp::legal_actions(self, state)
    }
}
