use tracing::trace;

/// Two click column swap: the first click picks the origin, the second the destination.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReorderSelection {
    #[default]
    Idle,
    PendingSwap(usize),
}

/// What a click on a swap icon asks the table to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReorderStep {
    /// Highlight the origin and mark every other column as a target.
    Select(usize),
    /// Swap the two columns, then clear the styling of `origin`.
    Swap { origin: usize, destination: usize },
}

impl ReorderSelection {
    pub fn click(&mut self, column: usize) -> ReorderStep {
        let step = match *self {
            ReorderSelection::Idle => {
                *self = ReorderSelection::PendingSwap(column);
                ReorderStep::Select(column)
            }
            ReorderSelection::PendingSwap(origin) => {
                *self = ReorderSelection::Idle;
                ReorderStep::Swap {
                    origin,
                    destination: column,
                }
            }
        };
        trace!("Reorder click on {column}: {step:?}, now {:?}", self);
        step
    }

    pub fn is_active(&self) -> bool {
        matches!(self, ReorderSelection::PendingSwap(_))
    }

    pub fn origin(&self) -> Option<usize> {
        match self {
            ReorderSelection::Idle => None,
            ReorderSelection::PendingSwap(origin) => Some(*origin),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_click_selects_origin() {
        let mut sel = ReorderSelection::default();
        assert_eq!(sel.click(2), ReorderStep::Select(2));
        assert!(sel.is_active());
        assert_eq!(sel.origin(), Some(2));
    }

    #[test]
    fn second_click_swaps_and_resets() {
        let mut sel = ReorderSelection::PendingSwap(0);
        assert_eq!(
            sel.click(3),
            ReorderStep::Swap {
                origin: 0,
                destination: 3
            }
        );
        assert_eq!(sel, ReorderSelection::Idle);
        assert_eq!(sel.origin(), None);
    }

    #[test]
    fn clicking_origin_again_still_swaps() {
        let mut sel = ReorderSelection::default();
        sel.click(1);
        assert_eq!(
            sel.click(1),
            ReorderStep::Swap {
                origin: 1,
                destination: 1
            }
        );
        assert!(!sel.is_active());
    }
}
