//! Two-slot player color assignment.
//!
//! At most one player per color and one color per player. Serialized as a
//! `{ playerId: "black" | "white" }` map.

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

use crate::board::Stone;

use super::error::ColorError;
use super::types::PlayerId;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColorAssignment {
    black: Option<PlayerId>,
    white: Option<PlayerId>,
}

impl ColorAssignment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn black(&self) -> Option<&PlayerId> {
        self.black.as_ref()
    }

    pub fn white(&self) -> Option<&PlayerId> {
        self.white.as_ref()
    }

    /// Player holding `color`, if any
    pub fn player_for(&self, color: Stone) -> Option<&PlayerId> {
        match color {
            Stone::Black => self.black.as_ref(),
            Stone::White => self.white.as_ref(),
            Stone::Empty => None,
        }
    }

    /// Color assigned to `player`, if any
    pub fn color_of(&self, player: &PlayerId) -> Option<Stone> {
        if self.black.as_ref() == Some(player) {
            Some(Stone::Black)
        } else if self.white.as_ref() == Some(player) {
            Some(Stone::White)
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.black.is_some() as usize + self.white.is_some() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Give `color` to `player`.
    ///
    /// Re-assigning the color a player already holds is a no-op.
    pub fn assign(&mut self, player: PlayerId, color: Stone) -> Result<(), ColorError> {
        if !color.is_stone() {
            return Err(ColorError::NotAColor(color));
        }
        if let Some(existing) = self.color_of(&player) {
            return if existing == color {
                Ok(())
            } else {
                Err(ColorError::AlreadyAssigned {
                    player,
                    color: existing,
                })
            };
        }
        let slot = match color {
            Stone::Black => &mut self.black,
            _ => &mut self.white,
        };
        if let Some(holder) = slot {
            return Err(ColorError::SlotTaken {
                color,
                holder: holder.clone(),
            });
        }
        *slot = Some(player);
        Ok(())
    }

    /// Read an assignment from an untrusted JSON map.
    ///
    /// Entries whose value is not exactly `"black"` or `"white"`, or that
    /// conflict with an earlier entry, are dropped.
    pub fn from_json(raw: &Value) -> ColorAssignment {
        let mut colors = ColorAssignment::new();
        let Some(entries) = raw.as_object() else {
            if !raw.is_null() {
                tracing::warn!("player colors is not an object, ignoring");
            }
            return colors;
        };
        for (player, value) in entries {
            let color = Stone::from_json(value);
            if !color.is_stone() {
                tracing::warn!(%player, "unknown player color, ignoring entry");
                continue;
            }
            if let Err(err) = colors.assign(PlayerId::new(player.as_str()), color) {
                tracing::warn!(%player, %err, "conflicting player color, ignoring entry");
            }
        }
        colors
    }
}

impl Serialize for ColorAssignment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        if let Some(player) = &self.black {
            map.serialize_entry(player, &Stone::Black)?;
        }
        if let Some(player) = &self.white {
            map.serialize_entry(player, &Stone::White)?;
        }
        map.end()
    }
}
