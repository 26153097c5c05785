//! Per-source line colors.

/// Glasbey categorical palette, as sRGB hex strings. Neighbouring entries are
/// chosen to be as far apart as possible perceptually.
///
/// This is the first 64 entries of the 256-color glasbey table, so source
/// colors repeat from the 65th source on.
pub const GLASBEY: [&str; 64] = [
    "#d60000", "#8c3bff", "#018700", "#00acc6", "#97ff00", "#ff7ed1", "#6b004f", "#ffa52f",
    "#573b00", "#005659", "#0000dd", "#00fdcf", "#a17569", "#bcb6ff", "#95b577", "#bf03b8",
    "#645474", "#790000", "#0774d8", "#729a7c", "#ff7752", "#004b00", "#8e7b01", "#f2007b",
    "#8eba00", "#a57bb8", "#5901a3", "#e2afaf", "#a03a52", "#a1c8c8", "#9e4b00", "#546744",
    "#bac389", "#5e7b87", "#60383b", "#8287ff", "#380000", "#e252ff", "#2f5282", "#7ecaff",
    "#c4668e", "#008069", "#919eb6", "#cc7407", "#7e2a8e", "#00bda3", "#2db152", "#4d33ff",
    "#00e400", "#ff00cd", "#c85748", "#e49cff", "#1ca1ff", "#6e70aa", "#c89a69", "#77563b",
    "#03dae6", "#c1a3c3", "#ff6989", "#ba00fd", "#915280", "#9e0174", "#93a14f", "#364424",
];

/// Color of the `index`-th source as linear RGBA in `[0, 1]`. Wraps around the
/// palette.
pub fn source_color(index: usize) -> [f32; 4] {
    let hex = GLASBEY[index % GLASBEY.len()];
    let [r, g, b] = parse_hex(hex).unwrap_or([255, 255, 255]);
    [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0]
}

fn parse_hex(hex: &str) -> Option<[u8; 3]> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(digits.get(i..i + 2)?, 16).ok();
    Some([channel(0)?, channel(2)?, channel(4)?])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_entries_parse() {
        for hex in GLASBEY {
            assert!(parse_hex(hex).is_some(), "bad entry {}", hex);
        }
    }

    #[test]
    fn test_first_colors() {
        assert_eq!(source_color(0), [214.0 / 255.0, 0.0, 0.0, 1.0]);
        assert_eq!(source_color(2), [1.0 / 255.0, 135.0 / 255.0, 0.0, 1.0]);
        assert_ne!(source_color(0), source_color(1));
    }

    #[test]
    fn test_colors_cycle() {
        assert_eq!(GLASBEY.len(), 64);
        assert_ne!(source_color(63), source_color(0));
        assert_eq!(source_color(64), source_color(0));
        assert_eq!(source_color(GLASBEY.len()), source_color(0));
        assert_eq!(source_color(GLASBEY.len() + 5), source_color(5));
    }
}
