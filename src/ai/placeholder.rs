//! Deterministic stand-in image used when generation is unavailable:
//! a square PNG in the brand's primary colour with a band of the
//! secondary colour along the bottom.

use std::io::Cursor;

use crate::db::models::BrandProfile;

pub const PLACEHOLDER_SIZE: u32 = 1080;

const FALLBACK_PRIMARY: Rgb = Rgb(0x3B, 0x82, 0xF6);
const FALLBACK_SECONDARY: Rgb = Rgb(0xFF, 0xFF, 0xFF);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// `#RRGGBB` or `#RGB`, leading `#` optional.
    pub fn parse_hex(value: &str) -> Option<Self> {
        let hex = value.trim().trim_start_matches('#');
        if !hex.is_ascii() {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        match hex.len() {
            6 => Some(Rgb(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            3 => {
                let short = |i: usize| channel(&hex[i..i + 1]).map(|v| v * 17);
                Some(Rgb(short(0)?, short(1)?, short(2)?))
            }
            _ => None,
        }
    }
}

/// Primary and secondary colours taken from the profile palette.
pub fn palette(profile: &BrandProfile) -> (Rgb, Rgb) {
    let mut colors = profile.color_list().into_iter().filter_map(Rgb::parse_hex);
    let primary = colors.next().unwrap_or(FALLBACK_PRIMARY);
    let secondary = colors.next().unwrap_or(FALLBACK_SECONDARY);
    (primary, secondary)
}

/// Encodes a `size`×`size` RGB image: primary fill with a secondary band
/// over the bottom sixth.
pub fn render_png(size: u32, primary: Rgb, secondary: Rgb) -> Result<Vec<u8>, png::EncodingError> {
    let band_start = size - size / 6;
    let mut pixels = Vec::with_capacity(size as usize * size as usize * 3);
    for y in 0..size {
        let Rgb(r, g, b) = if y >= band_start { secondary } else { primary };
        for _ in 0..size {
            pixels.extend_from_slice(&[r, g, b]);
        }
    }

    let mut out = Vec::new();
    let mut encoder = png::Encoder::new(Cursor::new(&mut out), size, size);
    encoder.set_color(png::ColorType::Rgb);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(&pixels)?;
    writer.finish()?;
    Ok(out)
}

pub fn placeholder_for(profile: &BrandProfile) -> Result<Vec<u8>, png::EncodingError> {
    let (primary, secondary) = palette(profile);
    render_png(PLACEHOLDER_SIZE, primary, secondary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        assert_eq!(Rgb::parse_hex("#3B82F6"), Some(Rgb(0x3B, 0x82, 0xF6)));
        assert_eq!(Rgb::parse_hex("fff"), Some(Rgb(255, 255, 255)));
        assert_eq!(Rgb::parse_hex("#12345"), None);
        assert_eq!(Rgb::parse_hex("#GGGGGG"), None);
        assert_eq!(Rgb::parse_hex("azul"), None);
    }

    #[test]
    fn test_palette_skips_invalid_entries() {
        let profile = BrandProfile {
            brand_colors: "rojo, #000000, #ABC".to_string(),
            ..Default::default()
        };
        assert_eq!(palette(&profile), (Rgb(0, 0, 0), Rgb(0xAA, 0xBB, 0xCC)));

        let empty = BrandProfile {
            brand_colors: String::new(),
            ..Default::default()
        };
        assert_eq!(palette(&empty), (FALLBACK_PRIMARY, FALLBACK_SECONDARY));
    }

    #[test]
    fn test_png_decodes_with_band() {
        let bytes = render_png(12, Rgb(1, 2, 3), Rgb(4, 5, 6)).unwrap();
        let decoder = png::Decoder::new(Cursor::new(bytes));
        let mut reader = decoder.read_info().unwrap();
        let mut pixels = vec![0; reader.output_buffer_size()];
        let info = reader.next_frame(&mut pixels).unwrap();

        assert_eq!((info.width, info.height), (12, 12));
        assert_eq!(info.color_type, png::ColorType::Rgb);
        assert_eq!(info.bit_depth, png::BitDepth::Eight);

        let row = info.line_size;
        // rows 0..10 are primary, rows 10..12 the band
        assert_eq!(&pixels[..3], &[1, 2, 3]);
        assert_eq!(&pixels[9 * row..9 * row + 3], &[1, 2, 3]);
        assert_eq!(&pixels[10 * row..10 * row + 3], &[4, 5, 6]);
        assert_eq!(&pixels[12 * row - 3..12 * row], &[4, 5, 6]);
    }

    #[test]
    fn test_placeholder_is_deterministic() {
        let profile = BrandProfile::default();
        assert_eq!(
            placeholder_for(&profile).unwrap(),
            placeholder_for(&profile).unwrap()
        );
    }
}
