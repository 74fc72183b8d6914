//! Core data model for Corkboard boards.
//!
//! A board is an ordered list of cards (positioned, sized content blocks in
//! canvas space) plus directed connections between them. List order doubles
//! as paint order and as the order used by sequential navigation.

use crate::id::{CardId, ConnectionId};
use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

// ─── Geometry ────────────────────────────────────────────────────────────

/// A 2D point or vector. Canvas or screen space depending on context.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Point {
    type Output = Point;
    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;
    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Point {
    type Output = Point;
    fn mul(self, rhs: f32) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

impl Div<f32> for Point {
    type Output = Point;
    fn div(self, rhs: f32) -> Point {
        Point::new(self.x / rhs, self.y / rhs)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Clamp negative or non-finite dimensions to zero.
    pub fn sanitized(self) -> Self {
        let fix = |v: f32| if v.is_finite() && v > 0.0 { v } else { 0.0 };
        Self::new(fix(self.width), fix(self.height))
    }
}

/// Axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_origin_size(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    /// AABB overlap test.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn top_center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y)
    }

    pub fn bottom_center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.bottom())
    }

    pub fn left_center(&self) -> Point {
        Point::new(self.x, self.y + self.height / 2.0)
    }

    pub fn right_center(&self) -> Point {
        Point::new(self.right(), self.y + self.height / 2.0)
    }

    /// Smallest rectangle containing both.
    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let r = self.right().max(other.right());
        let b = self.bottom().max(other.bottom());
        Rect::new(x, y, r - x, b - y)
    }

    /// Grow on every side by `amount`.
    pub fn inflate(&self, amount: f32) -> Rect {
        Rect::new(
            self.x - amount,
            self.y - amount,
            self.width + amount * 2.0,
            self.height + amount * 2.0,
        )
    }
}

// ─── Colors ──────────────────────────────────────────────────────────────

/// RGBA color. Stored as 4 × f32 [0.0, 1.0].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

fn hex_val(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

impl Color {
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    const fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0)
    }

    /// Parse `#RGB`, `#RGBA`, `#RRGGBB` or `#RRGGBBAA` (leading `#` optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let digits = hex
            .bytes()
            .map(hex_val)
            .collect::<Option<Vec<u8>>>()?;

        let channels: Vec<u8> = match digits.len() {
            3 | 4 => digits.iter().map(|d| d * 17).collect(),
            6 | 8 => digits.chunks(2).map(|p| (p[0] << 4) | p[1]).collect(),
            _ => return None,
        };
        let alpha = channels.get(3).copied().unwrap_or(255);
        Some(Self::rgba(
            channels[0] as f32 / 255.0,
            channels[1] as f32 / 255.0,
            channels[2] as f32 / 255.0,
            alpha as f32 / 255.0,
        ))
    }

    /// Emit as `#RRGGBB`, or `#RRGGBBAA` when not fully opaque.
    pub fn to_hex(&self) -> String {
        let c = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        let (r, g, b, a) = (c(self.r), c(self.g), c(self.b), c(self.a));
        if a == 255 {
            format!("#{r:02X}{g:02X}{b:02X}")
        } else {
            format!("#{r:02X}{g:02X}{b:02X}{a:02X}")
        }
    }
}

// ─── Cards ───────────────────────────────────────────────────────────────

/// What a card holds, which also decides its default color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CardCategory {
    /// Imported document section.
    Source,
    Summary,
    Note,
    /// Assistant reply promoted onto the board.
    AiResponse,
}

impl CardCategory {
    pub fn name(self) -> &'static str {
        match self {
            CardCategory::Source => "source",
            CardCategory::Summary => "summary",
            CardCategory::Note => "note",
            CardCategory::AiResponse => "ai-response",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "source" => Some(CardCategory::Source),
            "summary" => Some(CardCategory::Summary),
            "note" => Some(CardCategory::Note),
            "ai-response" => Some(CardCategory::AiResponse),
            _ => None,
        }
    }

    pub fn default_color(self) -> Color {
        match self {
            CardCategory::Source => Color::rgb8(0x3B, 0x82, 0xF6),
            CardCategory::Summary => Color::rgb8(0x10, 0xB9, 0x81),
            CardCategory::Note => Color::rgb8(0xF5, 0x9E, 0x0B),
            CardCategory::AiResponse => Color::rgb8(0x8B, 0x5C, 0xF6),
        }
    }
}

/// A positioned, sized content block on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub title: String,
    pub content: String,
    /// Top-left corner in canvas space.
    pub position: Point,
    pub size: Size,
    pub category: CardCategory,
    pub color: Color,
}

impl Card {
    pub fn new(
        id: CardId,
        title: impl Into<String>,
        content: impl Into<String>,
        category: CardCategory,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            content: content.into(),
            position: Point::ZERO,
            size: Size::default(),
            category,
            color: category.default_color(),
        }
    }

    pub fn at(mut self, position: Point) -> Self {
        self.position = position;
        self
    }

    pub fn sized(mut self, size: Size) -> Self {
        self.size = size.sanitized();
        self
    }

    /// Canvas-space bounding rectangle.
    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.position, self.size)
    }
}

// ─── Connections ─────────────────────────────────────────────────────────

/// A directed edge `source → target` between two cards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub id: ConnectionId,
    pub source: CardId,
    pub target: CardId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}
