//! Deterministic entity colors. The same caption always hashes to the
//! same HSL hue, so visually grouped entities stay stable across
//! sessions and processes.

const SATURATION: u32 = 65;
const FILL_LIGHTNESS: u32 = 82;
const BORDER_LIGHTNESS_DELTA: u32 = 37;

/// Fill and border color pair derived from an entity name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorPair {
    pub fill: String,
    pub border: String,
}

/// Shift-and-add string hash mapped onto the HSL hue circle.
fn hue_for(name: &str) -> u32 {
    let mut hash: i32 = 0;
    for ch in name.chars() {
        hash = hash.wrapping_mul(31).wrapping_add(ch as i32);
    }
    hash.unsigned_abs() % 360
}

pub fn colors_for(name: &str) -> ColorPair {
    let hue = hue_for(name);
    ColorPair {
        fill: format!("hsl({hue}, {SATURATION}%, {FILL_LIGHTNESS}%)"),
        border: format!(
            "hsl({hue}, {SATURATION}%, {}%)",
            FILL_LIGHTNESS - BORDER_LIGHTNESS_DELTA
        ),
    }
}

/// Write the fill/border pair for a caption into a style map.
pub fn stamp_caption_colors(
    style: &mut std::collections::BTreeMap<String, serde_json::Value>,
    caption: &str,
) {
    let pair = colors_for(caption);
    style.insert("fill".to_string(), serde_json::Value::String(pair.fill));
    style.insert("border".to_string(), serde_json::Value::String(pair.border));
}
