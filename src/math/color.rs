/// Convert a packed 0xRRGGBB color to linear-ish [0, 1] floats
pub fn rgb_from_hex(hex: u32) -> [f32; 3] {
    let r = ((hex >> 16) & 0xff) as f32 / 255.0;
    let g = ((hex >> 8) & 0xff) as f32 / 255.0;
    let b = (hex & 0xff) as f32 / 255.0;

    [r, g, b]
}
