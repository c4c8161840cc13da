//! Number grid projection: cells `1..=max_number` laid out in rows of [`GRID_COLUMNS`].

use std::collections::BTreeSet;

/// Number of cells per grid row.
pub const GRID_COLUMNS: usize = 10;

/// Display state of a cell. Precedence is winner > taken > selected > available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellState {
    Available,
    Taken,
    Selected,
    Winner,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridCell {
    pub number: u32,
    pub state: CellState,
}

/// Conditions outside the grid that block every click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClickGuard {
    /// The minigame accepts tickets right now.
    pub window_open: bool,
    /// The acting user already holds a ticket for this minigame.
    pub holds_ticket: bool,
}

impl Default for ClickGuard {
    fn default() -> Self {
        Self {
            window_open: true,
            holds_ticket: false,
        }
    }
}

/// Cell totals shown next to the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GridCounts {
    pub available: u32,
    pub taken: u32,
    pub winners: u32,
}

/// Pure projection of the registry state; clicking never touches the network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberGrid {
    max_number: u32,
    taken: BTreeSet<u32>,
    winners: BTreeSet<u32>,
    selected: Option<u32>,
    guard: ClickGuard,
}

impl NumberGrid {
    pub fn new(max_number: u32) -> Self {
        Self {
            max_number,
            taken: BTreeSet::new(),
            winners: BTreeSet::new(),
            selected: None,
            guard: ClickGuard::default(),
        }
    }

    pub fn with_taken(mut self, taken: impl IntoIterator<Item = u32>) -> Self {
        self.taken.extend(taken);
        self
    }

    pub fn with_winners(mut self, winners: impl IntoIterator<Item = u32>) -> Self {
        self.winners.extend(winners);
        self
    }

    pub fn with_selection(mut self, selected: Option<u32>) -> Self {
        self.selected = selected;
        self
    }

    pub fn with_guard(mut self, guard: ClickGuard) -> Self {
        self.guard = guard;
        self
    }

    pub fn max_number(&self) -> u32 {
        self.max_number
    }

    pub fn selected(&self) -> Option<u32> {
        self.selected
    }

    /// State of `number`, or `None` when it is not on the grid.
    pub fn cell_state(&self, number: u32) -> Option<CellState> {
        if !self.contains(number) {
            return None;
        }
        let state = if self.winners.contains(&number) {
            CellState::Winner
        } else if self.taken.contains(&number) {
            CellState::Taken
        } else if self.selected == Some(number) {
            CellState::Selected
        } else {
            CellState::Available
        };
        Some(state)
    }

    /// True when the cell itself can be picked (not taken, not a winner), ignoring the guard.
    pub fn is_selectable(&self, number: u32) -> bool {
        self.contains(number) && !self.taken.contains(&number) && !self.winners.contains(&number)
    }

    /// Route a click. Returns the new pending number, or `None` when the click is a no-op.
    pub fn click(&mut self, number: u32) -> Option<u32> {
        if !self.guard.window_open || self.guard.holds_ticket || !self.is_selectable(number) {
            return None;
        }
        self.selected = Some(number);
        Some(number)
    }

    pub fn cells(&self) -> Vec<GridCell> {
        (1..=self.max_number)
            .filter_map(|number| {
                self.cell_state(number)
                    .map(|state| GridCell { number, state })
            })
            .collect()
    }

    /// Cells split into rows of [`GRID_COLUMNS`]; the last row may be shorter.
    pub fn rows(&self) -> Vec<Vec<GridCell>> {
        self.cells()
            .chunks(GRID_COLUMNS)
            .map(<[GridCell]>::to_vec)
            .collect()
    }

    pub fn counts(&self) -> GridCounts {
        let mut counts = GridCounts::default();
        for cell in self.cells() {
            match cell.state {
                CellState::Winner => {
                    counts.winners += 1;
                    counts.taken += 1;
                }
                CellState::Taken => counts.taken += 1,
                CellState::Available | CellState::Selected => counts.available += 1,
            }
        }
        counts
    }

    fn contains(&self, number: u32) -> bool {
        (1..=self.max_number).contains(&number)
    }
}
