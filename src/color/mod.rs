mod bias;
mod hsv;
mod table;

pub use bias::{HueBias, HueCurve};
pub use hsv::hsv_to_rgb;
use smart_leds::RGB8;
pub use table::ColorTable;

pub type Rgb = RGB8;

pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };
