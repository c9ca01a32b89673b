//! Post-it palette and per-card style assignment.
//!
//! # Responsibility
//! - Map a memo to a palette entry by identity.
//! - Map a display position to a small card rotation.
//!
//! # Invariants
//! - Color depends only on `color_index` or `id`, never on position.
//! - Rotation depends only on the current display position.

use crate::model::memo::Memo;

/// One palette entry as CSS color strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostitColor {
    pub background: &'static str,
    pub text: &'static str,
    pub shadow: &'static str,
}

pub const PALETTE_SIZE: usize = 6;

/// Yellow, pink, mint, lavender, peach, sky.
pub const POSTIT_COLORS: [PostitColor; PALETTE_SIZE] = [
    PostitColor {
        background: "#fef08a",
        text: "#713f12",
        shadow: "rgba(113,63,18,0.25)",
    },
    PostitColor {
        background: "#fecdd3",
        text: "#9f1239",
        shadow: "rgba(159,18,57,0.2)",
    },
    PostitColor {
        background: "#bbf7d0",
        text: "#14532d",
        shadow: "rgba(20,83,45,0.2)",
    },
    PostitColor {
        background: "#ddd6fe",
        text: "#4c1d95",
        shadow: "rgba(76,29,149,0.2)",
    },
    PostitColor {
        background: "#fed7aa",
        text: "#9a3412",
        shadow: "rgba(154,52,18,0.2)",
    },
    PostitColor {
        background: "#bae6fd",
        text: "#0c4a6e",
        shadow: "rgba(12,74,110,0.2)",
    },
];

/// Rotation cycle in degrees, indexed by display position.
pub const ROTATIONS_DEG: [f32; 6] = [-1.2, 0.8, -0.6, 1.4, -0.9, 0.5];

const GUIDELINE_ROTATION_DEG: f32 = -0.8;

/// Resolved presentation style for one card.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PostitStyle {
    pub background: &'static str,
    pub text: &'static str,
    pub shadow: &'static str,
    pub rotation_deg: f32,
}

impl PostitStyle {
    /// CSS `box-shadow` value.
    pub fn box_shadow(&self) -> String {
        format!("4px 4px 12px {}", self.shadow)
    }

    /// CSS `transform` value.
    pub fn transform(&self) -> String {
        format!("rotate({}deg)", self.rotation_deg)
    }
}

/// Returns the palette slot for a memo.
///
/// Explicit in-range `color_index` wins; otherwise the slot is the sum over the
/// id's characters of each one's leading UTF-16 unit, modulo the palette size.
pub fn color_index_for(memo: &Memo) -> usize {
    match memo.color_index {
        Some(index) if index < PALETTE_SIZE => index,
        _ => id_color_index(&memo.id),
    }
}

/// Identity-derived palette slot.
pub fn id_color_index(id: &str) -> usize {
    let hash: u64 = id
        .chars()
        .map(|c| u64::from(c.encode_utf16(&mut [0; 2])[0]))
        .sum();
    (hash % PALETTE_SIZE as u64) as usize
}

/// Rotation for a display position.
pub fn rotation_for_position(position: usize) -> f32 {
    ROTATIONS_DEG[position % ROTATIONS_DEG.len()]
}

/// Full card style for a memo rendered at `position`.
pub fn postit_style(memo: &Memo, position: usize) -> PostitStyle {
    let color = POSTIT_COLORS[color_index_for(memo)];
    PostitStyle {
        background: color.background,
        text: color.text,
        shadow: color.shadow,
        rotation_deg: rotation_for_position(position),
    }
}

/// Fixed style of the guideline card.
pub fn guideline_style() -> PostitStyle {
    let color = POSTIT_COLORS[0];
    PostitStyle {
        background: color.background,
        text: color.text,
        shadow: color.shadow,
        rotation_deg: GUIDELINE_ROTATION_DEG,
    }
}
