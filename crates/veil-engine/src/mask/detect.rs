use crate::coords::Affine;
use crate::scene::SceneNode;

use super::MaskTechnique;

/// Picks a technique for `mask`. Never fails; anything unrecognized falls
/// back to stencil.
///
/// A rectangle is upgraded to an area clip only when `area_clip` is enabled
/// and its world transform keeps it axis-aligned: rotation, rounded to
/// 0.01°, a multiple of 90° and no shear.
pub fn classify(mask: &dyn SceneNode, area_clip: bool) -> MaskTechnique {
    if mask.is_image_like() {
        return MaskTechnique::AlphaFilter;
    }

    if area_clip && mask.is_axis_aligned_rect() && keeps_axis_alignment(mask.world_transform()) {
        MaskTechnique::AreaClip
    } else {
        MaskTechnique::Stencil
    }
}

fn keeps_axis_alignment(m: Affine) -> bool {
    let centidegrees = (m.rotation_degrees() * 100.0).round() as i64;
    if centidegrees % 9000 != 0 {
        return false;
    }

    // Transformed axes must stay perpendicular.
    let (a, b, c, d) = (m.a as f64, m.b as f64, m.c as f64, m.d as f64);
    let dot = a * c + b * d;
    let scale = (a * a + b * b).sqrt() * (c * c + d * d).sqrt();
    dot.abs() <= scale * 1e-4
}
