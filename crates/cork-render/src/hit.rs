//! Hit testing: point → card lookup.
//!
//! Reverse-walks the card list (last painted = topmost) to find what sits
//! under a canvas-space point. Each card carries a square link affordance in
//! its top-right corner; a hit there wins over the card body.

use cork_core::id::CardId;
use cork_core::model::{Card, Point, Rect};
use cork_core::store::Board;
use cork_core::viewport::{ViewportSize, ViewportTransform};
use smallvec::SmallVec;

/// What a pointer landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    Background,
    Card(CardId),
    /// The card's "link" affordance.
    LinkHandle(CardId),
}

impl Hit {
    pub fn card(&self) -> Option<CardId> {
        match self {
            Hit::Background => None,
            Hit::Card(id) | Hit::LinkHandle(id) => Some(*id),
        }
    }
}

/// Canvas-space rectangle of a card's link handle.
pub fn link_handle_rect(card: &Card, handle_size: f32) -> Rect {
    let b = card.bounds();
    let side = handle_size.min(b.width).min(b.height);
    Rect::new(b.right() - side, b.y, side, side)
}

/// Find the topmost card at canvas point `p`.
pub fn hit_test(board: &Board, p: Point, handle_size: f32) -> Hit {
    for card in board.cards.iter().rev() {
        if !card.bounds().contains(p) {
            continue;
        }
        if handle_size > 0.0 && link_handle_rect(card, handle_size).contains(p) {
            return Hit::LinkHandle(card.id);
        }
        return Hit::Card(card.id);
    }
    Hit::Background
}

/// Hit test a screen-space point. The handle keeps its on-screen size, so
/// it is converted to canvas units at the current scale.
pub fn hit_test_screen(
    board: &Board,
    transform: &ViewportTransform,
    screen: Point,
    handle_size: f32,
) -> Hit {
    let p = transform.to_canvas(screen);
    let hit = hit_test(board, p, handle_size / transform.scale());
    log::trace!("hit ({}, {}) -> {hit:?}", screen.x, screen.y);
    hit
}

/// Every card under `p`, topmost first.
pub fn cards_at(board: &Board, p: Point) -> SmallVec<[CardId; 4]> {
    board
        .cards
        .iter()
        .rev()
        .filter(|card| card.bounds().contains(p))
        .map(|card| card.id)
        .collect()
}

/// Cards intersecting the visible canvas rectangle, in paint order.
pub fn visible_cards(board: &Board, visible: Rect) -> Vec<CardId> {
    board
        .cards
        .iter()
        .filter(|card| card.bounds().intersects(&visible))
        .map(|card| card.id)
        .collect()
}

/// Convenience for callers holding a transform and viewport size.
pub fn visible_cards_in(
    board: &Board,
    transform: &ViewportTransform,
    viewport: ViewportSize,
) -> Vec<CardId> {
    visible_cards(board, transform.visible_rect(viewport))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cork_core::model::{CardCategory, Size};
    use pretty_assertions::assert_eq;

    fn board_with(cards: &[(&str, f32, f32)]) -> Board {
        let mut board = Board::new();
        for (name, x, y) in cards {
            board
                .cards
                .insert(
                    Card::new(CardId::intern(name), *name, "", CardCategory::Source)
                        .at(Point::new(*x, *y))
                        .sized(Size::new(100.0, 100.0)),
                )
                .unwrap();
        }
        board
    }

    #[test]
    fn topmost_card_wins() {
        let board = board_with(&[("under", 0.0, 0.0), ("over", 50.0, 50.0)]);
        assert_eq!(
            hit_test(&board, Point::new(60.0, 90.0), 10.0),
            Hit::Card(CardId::intern("over"))
        );
        assert_eq!(
            hit_test(&board, Point::new(10.0, 10.0), 10.0),
            Hit::Card(CardId::intern("under"))
        );
        assert_eq!(hit_test(&board, Point::new(500.0, 500.0), 10.0), Hit::Background);
        let stack = cards_at(&board, Point::new(75.0, 75.0));
        assert_eq!(
            stack.as_slice(),
            &[CardId::intern("over"), CardId::intern("under")]
        );
    }

    #[test]
    fn link_handle_in_top_right_corner() {
        let board = board_with(&[("linkable", 0.0, 0.0)]);
        let id = CardId::intern("linkable");
        assert_eq!(hit_test(&board, Point::new(95.0, 5.0), 10.0), Hit::LinkHandle(id));
        assert_eq!(hit_test(&board, Point::new(85.0, 5.0), 10.0), Hit::Card(id));
        assert_eq!(hit_test(&board, Point::new(95.0, 5.0), 0.0), Hit::Card(id));
    }

    #[test]
    fn screen_hit_accounts_for_transform() {
        let board = board_with(&[("far", 1000.0, 1000.0)]);
        let mut transform = ViewportTransform::default();
        transform.set_scale(0.5);
        transform.pan = Point::new(-400.0, -400.0);
        // canvas (1050, 1050) -> screen (125, 125)
        assert_eq!(
            hit_test_screen(&board, &transform, Point::new(125.0, 125.0), 18.0),
            Hit::Card(CardId::intern("far"))
        );
        // Handle stays 18px on screen: 36 canvas units at scale 0.5.
        assert_eq!(
            hit_test_screen(&board, &transform, Point::new(148.0, 102.0), 18.0),
            Hit::LinkHandle(CardId::intern("far"))
        );
    }

    #[test]
    fn culling_skips_offscreen_cards() {
        let board = board_with(&[("on", 10.0, 10.0), ("off", 5000.0, 10.0)]);
        let transform = ViewportTransform::default();
        let visible = visible_cards_in(&board, &transform, ViewportSize::new(800.0, 600.0));
        assert_eq!(visible, vec![CardId::intern("on")]);
    }
}
