//! JSON view of the board for the JS renderer.

use cork_core::model::{Card, Point};
use cork_core::store::Board;
use cork_editor::InteractionController;
use cork_render::Orientation;
use cork_render::hit::visible_cards_in;
use cork_render::path::connection_paths;
use serde_json::{Value, json};

fn point(p: Point) -> Value {
    json!({ "x": p.x, "y": p.y })
}

fn card_json(card: &Card, selected: bool, visible: bool) -> Value {
    json!({
        "id": card.id.as_str(),
        "title": card.title,
        "content": card.content,
        "x": card.position.x,
        "y": card.position.y,
        "width": card.size.width,
        "height": card.size.height,
        "category": card.category.name(),
        "color": card.color.to_hex(),
        "selected": selected,
        "visible": visible,
    })
}

/// Cards in navigation order, connections in creation order with their
/// canvas-space SVG paths, and the view state.
pub(crate) fn snapshot(board: &Board, controller: &InteractionController) -> Value {
    let selected = controller.selected();
    let visible = visible_cards_in(board, controller.transform(), controller.viewport());

    let cards: Vec<Value> = board
        .cards
        .iter()
        .map(|card| card_json(card, selected == Some(card.id), visible.contains(&card.id)))
        .collect();

    let connections: Vec<Value> = connection_paths(board)
        .into_iter()
        .map(|(conn, path)| {
            let mut obj = json!({
                "id": conn.id.as_str(),
                "source": conn.source.as_str(),
                "target": conn.target.as_str(),
                "path": path.to_svg(),
                "midpoint": point(path.midpoint()),
                "orientation": match path.orientation {
                    Orientation::Vertical => "vertical",
                    Orientation::Horizontal => "horizontal",
                },
            });
            if let Some(label) = &conn.label {
                obj["label"] = Value::String(label.clone());
            }
            obj
        })
        .collect();

    let transform = controller.transform();
    let mode = controller.mode();
    let mut obj = json!({
        "cards": cards,
        "connections": connections,
        "pan": point(transform.pan),
        "scale": transform.scale(),
        "selected": selected.map(|id| id.as_str().to_string()),
        "mode": mode.name(),
    });
    if let cork_editor::InteractionMode::Connecting { source } = mode {
        obj["connectingFrom"] = Value::String(source.as_str().to_string());
    }
    obj
}
