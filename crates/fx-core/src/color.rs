/// Parse `#rrggbb` (or `#rgb`) into sRGB components in [0, 1].
pub fn parse_hex_rgb(s: &str) -> Option<[f32; 3]> {
    let hex = s.trim().strip_prefix('#')?;
    let expanded: String = match hex.len() {
        3 => hex.chars().flat_map(|c| [c, c]).collect(),
        6 => hex.to_string(),
        _ => return None,
    };
    let channel = |i: usize| -> Option<f32> {
        u8::from_str_radix(expanded.get(i..i + 2)?, 16)
            .ok()
            .map(|v| v as f32 / 255.0)
    };
    Some([channel(0)?, channel(2)?, channel(4)?])
}

/// Parse a CSS-style `"r, g, b"` triplet of 0..=255 integers.
pub fn parse_rgb_triplet(s: &str) -> Option<[u8; 3]> {
    let mut it = s.split(',').map(|p| p.trim().parse::<u8>());
    let r = it.next()?.ok()?;
    let g = it.next()?.ok()?;
    let b = it.next()?.ok()?;
    if it.next().is_some() {
        return None;
    }
    Some([r, g, b])
}

/// `rgba(r, g, b, a)` string for canvas fill and stroke styles.
pub fn rgba(rgb: [u8; 3], alpha: f32) -> String {
    format!(
        "rgba({}, {}, {}, {})",
        rgb[0],
        rgb[1],
        rgb[2],
        alpha.clamp(0.0, 1.0)
    )
}
