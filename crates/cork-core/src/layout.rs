//! Batch placement for imported cards.
//!
//! One column per imported document, sections stacked top to bottom.
//! A new batch starts to the right of whatever is already on the board.

use crate::config::CanvasConfig;
use crate::model::{Point, Rect};

/// Compute card positions for a batch.
///
/// `columns[i]` is the number of cards produced by document `i`. The result
/// has the same shape: one `Vec<Point>` per document, in section order.
pub fn layout_batch(
    existing: Option<Rect>,
    columns: &[usize],
    config: &CanvasConfig,
) -> Vec<Vec<Point>> {
    let origin = match existing {
        Some(bounds) => Point::new(bounds.right() + config.card_gap, bounds.y),
        None => config.layout_origin,
    };
    let step_x = config.card_width + config.card_gap;
    let step_y = config.card_height + config.card_gap;

    columns
        .iter()
        .enumerate()
        .map(|(col, &rows)| {
            (0..rows)
                .map(|row| {
                    Point::new(
                        origin.x + col as f32 * step_x,
                        origin.y + row as f32 * step_y,
                    )
                })
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_board_starts_at_origin() {
        let config = CanvasConfig::default();
        let placed = layout_batch(None, &[2, 1], &config);
        assert_eq!(
            placed,
            vec![
                vec![Point::new(100.0, 100.0), Point::new(100.0, 380.0)],
                vec![Point::new(480.0, 100.0)],
            ]
        );
    }

    #[test]
    fn batch_lands_right_of_existing_content() {
        let config = CanvasConfig::default();
        let existing = Rect::new(-50.0, 40.0, 500.0, 900.0);
        let placed = layout_batch(Some(existing), &[1], &config);
        assert_eq!(placed, vec![vec![Point::new(510.0, 40.0)]]);
    }

    #[test]
    fn zero_sections_yield_empty_column() {
        let placed = layout_batch(None, &[0, 1], &CanvasConfig::default());
        assert!(placed[0].is_empty());
        assert_eq!(placed[1], vec![Point::new(480.0, 100.0)]);
    }
}
