//! Card and connection stores, plus the `Board` that owns both.
//!
//! Cards are kept in a plain ordered `Vec` (paint order, navigation order)
//! with an id → index map. Connections live in a petgraph `StableDiGraph`
//! whose nodes are card ids and whose edges carry the `Connection` record,
//! so duplicate detection is a `find_edge` and removing a card drops every
//! edge that touches it.

use crate::id::{CardId, ConnectionId};
use crate::model::{Card, Connection, Point, Rect};
use petgraph::Direction;
use petgraph::graph::{EdgeIndex, NodeIndex};
use petgraph::stable_graph::StableDiGraph;
use std::collections::HashMap;

// ─── Card Store ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct CardStore {
    cards: Vec<Card>,
    /// Index from CardId → position in `cards`.
    id_index: HashMap<CardId, usize>,
}

impl CardStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a card. Fails if the id is already taken.
    pub fn insert(&mut self, card: Card) -> Result<(), String> {
        if self.id_index.contains_key(&card.id) {
            return Err(format!("duplicate card id {}", card.id));
        }
        self.id_index.insert(card.id, self.cards.len());
        self.cards.push(card);
        Ok(())
    }

    pub fn get(&self, id: CardId) -> Option<&Card> {
        self.id_index.get(&id).map(|&i| &self.cards[i])
    }

    pub fn get_mut(&mut self, id: CardId) -> Option<&mut Card> {
        self.id_index.get(&id).copied().map(|i| &mut self.cards[i])
    }

    pub fn contains(&self, id: CardId) -> bool {
        self.id_index.contains_key(&id)
    }

    pub fn index_of(&self, id: CardId) -> Option<usize> {
        self.id_index.get(&id).copied()
    }

    pub fn at(&self, index: usize) -> Option<&Card> {
        self.cards.get(index)
    }

    pub fn first(&self) -> Option<&Card> {
        self.cards.first()
    }

    pub fn last(&self) -> Option<&Card> {
        self.cards.last()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Cards in list order (first painted first).
    pub fn iter(&self) -> std::slice::Iter<'_, Card> {
        self.cards.iter()
    }

    pub fn as_slice(&self) -> &[Card] {
        &self.cards
    }

    /// Update a card in place by identity. The id itself must not change.
    /// Returns `false` if no card has this id.
    pub fn update(&mut self, id: CardId, f: impl FnOnce(&mut Card)) -> bool {
        let Some(card) = self.get_mut(id) else {
            return false;
        };
        f(card);
        card.id = id;
        card.size = card.size.sanitized();
        true
    }

    pub fn move_to(&mut self, id: CardId, position: Point) -> bool {
        if !position.is_finite() {
            log::debug!("ignoring non-finite position for {id}");
            return false;
        }
        self.update(id, |card| card.position = position)
    }

    /// Remove a card, shifting later cards down one slot.
    pub fn remove(&mut self, id: CardId) -> Option<Card> {
        let idx = self.id_index.remove(&id)?;
        let removed = self.cards.remove(idx);
        for card in &self.cards[idx..] {
            if let Some(slot) = self.id_index.get_mut(&card.id) {
                *slot -= 1;
            }
        }
        Some(removed)
    }

    /// Union of all card bounds, or `None` for an empty store.
    pub fn bounds(&self) -> Option<Rect> {
        self.cards
            .iter()
            .map(Card::bounds)
            .reduce(|acc, r| acc.union(&r))
    }
}

// ─── Connection Store ────────────────────────────────────────────────────

/// Edge weight: the connection plus its creation sequence number.
/// Stable graphs recycle vacated edge slots, so `EdgeIndex` alone does not
/// give creation order.
#[derive(Debug, Clone)]
struct Link {
    seq: u64,
    connection: Connection,
}

#[derive(Debug, Clone, Default)]
pub struct ConnectionStore {
    graph: StableDiGraph<CardId, Link>,
    /// Index from CardId → graph node.
    node_index: HashMap<CardId, NodeIndex>,
    next_seq: u64,
}

impl ConnectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn node_for(&mut self, card: CardId) -> NodeIndex {
        if let Some(&idx) = self.node_index.get(&card) {
            return idx;
        }
        let idx = self.graph.add_node(card);
        self.node_index.insert(card, idx);
        idx
    }

    fn find(&self, source: CardId, target: CardId) -> Option<EdgeIndex> {
        let s = self.node_index.get(&source)?;
        let t = self.node_index.get(&target)?;
        self.graph.find_edge(*s, *t)
    }

    /// Add `source → target`. Self-links and existing pairs are ignored
    /// and yield `None`.
    pub fn connect(
        &mut self,
        source: CardId,
        target: CardId,
        label: Option<String>,
    ) -> Option<ConnectionId> {
        if source == target {
            log::debug!("ignoring self-connection on {source}");
            return None;
        }
        if self.contains(source, target) {
            log::debug!("ignoring duplicate connection {source} -> {target}");
            return None;
        }
        let id = ConnectionId::between(source, target);
        let s = self.node_for(source);
        let t = self.node_for(target);
        let seq = self.next_seq;
        self.next_seq += 1;
        self.graph.add_edge(
            s,
            t,
            Link {
                seq,
                connection: Connection {
                    id,
                    source,
                    target,
                    label,
                },
            },
        );
        Some(id)
    }

    pub fn contains(&self, source: CardId, target: CardId) -> bool {
        self.find(source, target).is_some()
    }

    pub fn len(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.edge_count() == 0
    }

    /// Connections in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &Connection> {
        let mut links: Vec<&Link> = self.graph.edge_indices().map(|e| &self.graph[e]).collect();
        links.sort_by_key(|l| l.seq);
        links.into_iter().map(|l| &l.connection)
    }

    pub fn outgoing(&self, card: CardId) -> Vec<&Connection> {
        self.directed(card, Direction::Outgoing)
    }

    pub fn incoming(&self, card: CardId) -> Vec<&Connection> {
        self.directed(card, Direction::Incoming)
    }

    fn directed(&self, card: CardId, dir: Direction) -> Vec<&Connection> {
        let Some(&idx) = self.node_index.get(&card) else {
            return Vec::new();
        };
        let mut links: Vec<&Link> = self
            .graph
            .edges_directed(idx, dir)
            .map(|e| e.weight())
            .collect();
        links.sort_by_key(|l| l.seq);
        links.into_iter().map(|l| &l.connection).collect()
    }

    /// Drop every connection touching `card`. Returns how many went.
    pub fn remove_card(&mut self, card: CardId) -> usize {
        let Some(idx) = self.node_index.remove(&card) else {
            return 0;
        };
        let touching = self.graph.edges_directed(idx, Direction::Outgoing).count()
            + self.graph.edges_directed(idx, Direction::Incoming).count();
        self.graph.remove_node(idx);
        touching
    }
}

// ─── Board ───────────────────────────────────────────────────────────────

/// A change to the board, produced by interaction or import and applied
/// through [`Board::apply`].
#[derive(Debug, Clone, PartialEq)]
pub enum BoardMutation {
    AddCard {
        card: Box<Card>,
    },
    MoveCard {
        id: CardId,
        position: Point,
    },
    /// Replace a card's contents, matched by identity.
    UpdateCard {
        card: Box<Card>,
    },
    RemoveCard {
        id: CardId,
    },
    Connect {
        source: CardId,
        target: CardId,
        label: Option<String>,
    },
}

#[derive(Debug, Clone, Default)]
pub struct Board {
    pub cards: CardStore,
    pub connections: ConnectionStore,
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a mutation. Returns `true` if the board changed.
    pub fn apply(&mut self, mutation: BoardMutation) -> bool {
        match mutation {
            BoardMutation::AddCard { card } => match self.cards.insert(*card) {
                Ok(()) => true,
                Err(e) => {
                    log::warn!("{e}");
                    false
                }
            },
            BoardMutation::MoveCard { id, position } => self.cards.move_to(id, position),
            BoardMutation::UpdateCard { card } => {
                let id = card.id;
                self.cards.update(id, |existing| *existing = *card)
            }
            BoardMutation::RemoveCard { id } => self.remove_card(id).is_some(),
            BoardMutation::Connect {
                source,
                target,
                label,
            } => self.connect(source, target, label).is_some(),
        }
    }

    /// Connect two existing cards. Unknown endpoints, self-links and
    /// duplicates are ignored.
    pub fn connect(
        &mut self,
        source: CardId,
        target: CardId,
        label: Option<String>,
    ) -> Option<ConnectionId> {
        if !self.cards.contains(source) || !self.cards.contains(target) {
            log::debug!("ignoring connection with unknown endpoint {source} -> {target}");
            return None;
        }
        self.connections.connect(source, target, label)
    }

    /// Remove a card and every connection that references it.
    pub fn remove_card(&mut self, id: CardId) -> Option<Card> {
        let card = self.cards.remove(id)?;
        let dropped = self.connections.remove_card(id);
        if dropped > 0 {
            log::debug!("removed {dropped} connection(s) with card {id}");
        }
        Some(card)
    }

    /// Connect each id to the next one. Returns the number of new connections.
    pub fn sequence(&mut self, ids: &[CardId]) -> usize {
        ids.windows(2)
            .filter(|pair| self.connect(pair[0], pair[1], None).is_some())
            .count()
    }

    pub fn bounds(&self) -> Option<Rect> {
        self.cards.bounds()
    }
}
