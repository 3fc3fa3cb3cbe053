use crate::{color::Rgb, math::unit_to_u8};

/// Convert HSV (all components 0.0-1.0) to 8-bit RGB
///
/// Six-sector conversion. Hue wraps, saturation and value are clamped.
/// Zero saturation yields a gray of the given value regardless of hue.
#[allow(clippy::many_single_char_names)]
pub fn hsv_to_rgb(hue: f32, saturation: f32, value: f32) -> Rgb {
    let s = saturation.clamp(0.0, 1.0);
    let v = value.clamp(0.0, 1.0);
    if s <= 0.0 {
        let gray = unit_to_u8(v);
        return Rgb {
            r: gray,
            g: gray,
            b: gray,
        };
    }

    let h6 = crate::math::fract(hue) * 6.0;
    let sector = libm::floorf(h6);
    let f = h6 - sector;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));

    let (r, g, b) = match (sector as u8) % 6 {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };

    Rgb {
        r: unit_to_u8(r),
        g: unit_to_u8(g),
        b: unit_to_u8(b),
    }
}
