//! Click selection - turns two board clicks into a swap request

use crate::types::Pos;

/// What a click did to the selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickResult {
    /// First click: the cell is now selected
    Selected(Pos),
    /// Second click on a neighbour: swap these cells
    Swap(Pos, Pos),
    /// Second click elsewhere (or on the same cell): nothing selected anymore
    Cleared,
    /// Off the board
    Ignored,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    selected: Option<Pos>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<Pos> {
        self.selected
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }

    pub fn click(&mut self, pos: Pos) -> ClickResult {
        if !pos.in_bounds() {
            return ClickResult::Ignored;
        }
        match self.selected.take() {
            None => {
                self.selected = Some(pos);
                ClickResult::Selected(pos)
            }
            Some(first) if first.is_adjacent(pos) => ClickResult::Swap(first, pos),
            Some(_) => ClickResult::Cleared,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adjacent_second_click_swaps() {
        let mut sel = Selection::new();
        assert_eq!(sel.click(Pos::new(4, 4)), ClickResult::Selected(Pos::new(4, 4)));
        assert_eq!(
            sel.click(Pos::new(5, 4)),
            ClickResult::Swap(Pos::new(4, 4), Pos::new(5, 4))
        );
        assert_eq!(sel.selected(), None);
    }

    #[test]
    fn test_distant_or_diagonal_click_clears() {
        let mut sel = Selection::new();
        sel.click(Pos::new(4, 4));
        assert_eq!(sel.click(Pos::new(5, 5)), ClickResult::Cleared);
        assert_eq!(sel.selected(), None);

        sel.click(Pos::new(4, 4));
        assert_eq!(sel.click(Pos::new(4, 4)), ClickResult::Cleared);

        sel.click(Pos::new(0, 0));
        assert_eq!(sel.click(Pos::new(0, 2)), ClickResult::Cleared);
    }

    #[test]
    fn test_out_of_bounds_is_ignored() {
        let mut sel = Selection::new();
        sel.click(Pos::new(19, 19));
        assert_eq!(sel.click(Pos::new(19, 20)), ClickResult::Ignored);
        assert_eq!(sel.selected(), Some(Pos::new(19, 19)));
    }
}
