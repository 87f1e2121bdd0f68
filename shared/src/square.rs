use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// All squares known to a session, keyed by cell id (`"x,y"`).
pub type SquareMap = HashMap<String, Square>;

/// Integer cell coordinate on the unbounded grid plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i64,
    pub y: i64,
}

impl Position {
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Canonical cell id. Every stored square's map key equals its own id.
    pub fn cell_id(&self) -> String {
        format!("{},{}", self.x, self.y)
    }

    /// Parse a cell id back into a position. Exact inverse of `cell_id`.
    pub fn from_cell_id(id: &str) -> Option<Self> {
        let (x, y) = id.split_once(',')?;
        Some(Self {
            x: x.parse().ok()?,
            y: y.parse().ok()?,
        })
    }
}

/// One owned cell of the grid. Created on first purchase, mutated in place
/// on customization or transfer, never deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Square {
    pub id: String,
    pub owner: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub content: SquareContent,
}

impl Square {
    pub fn new(position: Position, owner: impl Into<String>, price: f64) -> Self {
        Self {
            id: position.cell_id(),
            owner: Some(owner.into()),
            price,
            content: SquareContent::default(),
        }
    }

    pub fn position(&self) -> Option<Position> {
        Position::from_cell_id(&self.id)
    }
}

/// Per-square custom content. Every field is independently optional;
/// absence means "use the render-time default".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SquareContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Data URI or URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
}

impl SquareContent {
    /// Merge a customization patch: present fields in `patch` replace ours.
    pub fn apply(&mut self, patch: SquareContent) {
        if patch.text.is_some() {
            self.text = patch.text;
        }
        if patch.image.is_some() {
            self.image = patch.image;
        }
        if patch.background_color.is_some() {
            self.background_color = patch.background_color;
        }
        if patch.link.is_some() {
            self.link = patch.link;
        }
        if patch.font_size.is_some() {
            self.font_size = patch.font_size;
        }
        if patch.font_weight.is_some() {
            self.font_weight = patch.font_weight;
        }
        if patch.font_family.is_some() {
            self.font_family = patch.font_family;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_id_round_trips_negative_coordinates() {
        for pos in [
            Position::new(0, 0),
            Position::new(-3, 7),
            Position::new(1_000_000, -999_999),
        ] {
            assert_eq!(Position::from_cell_id(&pos.cell_id()), Some(pos));
        }
    }

    #[test]
    fn from_cell_id_rejects_malformed_ids() {
        assert_eq!(Position::from_cell_id(""), None);
        assert_eq!(Position::from_cell_id("12"), None);
        assert_eq!(Position::from_cell_id("a,b"), None);
        assert_eq!(Position::from_cell_id("1,2,3"), None);
    }

    #[test]
    fn content_serializes_camel_case_and_omits_absent_fields() {
        let content = SquareContent {
            text: Some("hello".into()),
            background_color: Some("#336699".into()),
            ..SquareContent::default()
        };
        let json = serde_json::to_value(&content).expect("serialize content");
        assert_eq!(json["text"], "hello");
        assert_eq!(json["backgroundColor"], "#336699");
        assert!(json.get("image").is_none());
        assert!(json.get("fontSize").is_none());
    }

    #[test]
    fn apply_patch_replaces_only_present_fields() {
        let mut content = SquareContent {
            text: Some("old".into()),
            link: Some("https://example.com".into()),
            ..SquareContent::default()
        };
        content.apply(SquareContent {
            text: Some("new".into()),
            font_size: Some(24.0),
            ..SquareContent::default()
        });
        assert_eq!(content.text.as_deref(), Some("new"));
        assert_eq!(content.font_size, Some(24.0));
        assert_eq!(content.link.as_deref(), Some("https://example.com"));
    }

    #[test]
    fn square_new_derives_id_from_position() {
        let square = Square::new(Position::new(-2, 5), "alice", 42.5);
        assert_eq!(square.id, "-2,5");
        assert_eq!(square.position(), Some(Position::new(-2, 5)));
        assert_eq!(square.owner.as_deref(), Some("alice"));
    }
}
