//! Marker tints per target category.

use missileworks_core::enums::TargetType;
use missileworks_core::types::Rgba;

/// Alpha used for neutral markers.
const NEUTRAL_ALPHA: u8 = 120;

/// Display tint for a target category.
pub fn color_for(target_type: TargetType) -> Rgba {
    match target_type {
        TargetType::Player | TargetType::Friendly => Rgba::GREEN,
        TargetType::Hostile => Rgba::ORANGE_RED,
        TargetType::Untargetable => Rgba::BLACK,
        TargetType::Neutral => Rgba::WHITE.with_alpha(NEUTRAL_ALPHA),
        TargetType::Dead => Rgba::TRANSPARENT,
    }
}
