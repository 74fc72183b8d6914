//! Sequential navigation through cards in list order.

use cork_core::id::CardId;
use cork_core::store::CardStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Prev,
}

/// Index of the card to select next, or `None` when nothing changes.
///
/// With no selection (or a selection no longer on the board) `Next` picks
/// the first card and `Prev` the last. Otherwise moves one step, clamped to
/// the list bounds with no wraparound.
pub fn navigate(cards: &CardStore, selected: Option<CardId>, direction: Direction) -> Option<usize> {
    let last = cards.len().checked_sub(1)?;
    let current = selected.and_then(|id| cards.index_of(id));

    let Some(current) = current else {
        return Some(match direction {
            Direction::Next => 0,
            Direction::Prev => last,
        });
    };

    let target = match direction {
        Direction::Next => (current + 1).min(last),
        Direction::Prev => current.saturating_sub(1),
    };
    (target != current).then_some(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cork_core::model::{Card, CardCategory};

    fn store(n: usize) -> CardStore {
        let mut s = CardStore::new();
        for i in 0..n {
            s.insert(Card::new(
                CardId::intern(&format!("nav_{i}")),
                "",
                "",
                CardCategory::Source,
            ))
            .unwrap();
        }
        s
    }

    fn id(i: usize) -> Option<CardId> {
        Some(CardId::intern(&format!("nav_{i}")))
    }

    #[test]
    fn empty_list_is_noop() {
        let s = store(0);
        assert_eq!(navigate(&s, None, Direction::Next), None);
        assert_eq!(navigate(&s, None, Direction::Prev), None);
    }

    #[test]
    fn no_selection_picks_ends() {
        let s = store(4);
        assert_eq!(navigate(&s, None, Direction::Next), Some(0));
        assert_eq!(navigate(&s, None, Direction::Prev), Some(3));
        // Stale selection behaves like none.
        let stale = Some(CardId::intern("nav_gone"));
        assert_eq!(navigate(&s, stale, Direction::Next), Some(0));
    }

    #[test]
    fn clamps_at_both_ends() {
        let s = store(3);
        assert_eq!(navigate(&s, id(2), Direction::Next), None);
        assert_eq!(navigate(&s, id(0), Direction::Prev), None);
        assert_eq!(navigate(&s, id(1), Direction::Next), Some(2));
        assert_eq!(navigate(&s, id(1), Direction::Prev), Some(0));
    }
}
