// Pure pointer helpers shared by the effects. No browser types here so the
// host-side tests can include this file directly.
use glam::Vec2;

/// Client (viewport) coordinates to coordinates local to an element rect.
#[inline]
pub fn client_to_local(client: Vec2, rect_left: f32, rect_top: f32) -> Vec2 {
    Vec2::new(client.x - rect_left, client.y - rect_top)
}

/// Client coordinates to normalized surface UV with a top-left origin,
/// clamped to [0, 1]. Falls back to the center for an empty surface.
#[inline]
pub fn client_to_uv(client: Vec2, rect_left: f32, rect_top: f32, width: f32, height: f32) -> Vec2 {
    if width <= 0.0 || height <= 0.0 {
        return Vec2::splat(0.5);
    }
    let local = client_to_local(client, rect_left, rect_top);
    Vec2::new(
        (local.x / width).clamp(0.0, 1.0),
        (local.y / height).clamp(0.0, 1.0),
    )
}

/// Backing-store size in device pixels for a CSS size, at least 1x1.
#[inline]
pub fn backing_size(css_w: f32, css_h: f32, dpr: f64) -> (u32, u32) {
    let w = (css_w as f64 * dpr).round().max(1.0) as u32;
    let h = (css_h as f64 * dpr).round().max(1.0) as u32;
    (w, h)
}

/// Parse a `data-parallax` speed; unparsable values disable the effect.
#[inline]
pub fn parse_parallax_speed(raw: Option<&str>) -> f32 {
    raw.and_then(|s| s.trim().parse::<f32>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Source rectangle `(sx, sy, sw, sh)` that crops an image of `image` size
/// to fill `dest` without distortion, centered (CSS `object-fit: cover`).
pub fn cover_crop(image: Vec2, dest: Vec2) -> Option<[f32; 4]> {
    if image.x <= 0.0 || image.y <= 0.0 || dest.x <= 0.0 || dest.y <= 0.0 {
        return None;
    }
    let scale = (dest.x / image.x).max(dest.y / image.y);
    let sw = dest.x / scale;
    let sh = dest.y / scale;
    Some([(image.x - sw) * 0.5, (image.y - sh) * 0.5, sw, sh])
}
