mod color;

pub use color::rgb_from_hex;
