use font8x8::{UnicodeFonts, BASIC_FONTS};
use image::{Rgb, RgbImage};
use std::path::Path;

use crate::{BrandShare, SovError};

const WIDTH: u32 = 1200;
const HEIGHT: u32 = 600;
const MARGIN_LEFT: u32 = 100;
const MARGIN_RIGHT: u32 = 40;
const MARGIN_TOP: u32 = 70;
const MARGIN_BOTTOM: u32 = 60;
const GRID_STEPS: u32 = 5;
const MIN_SLOT: u32 = 8;

const GLYPH: u32 = 8;
const TITLE_SCALE: u32 = 3;
const LABEL_SCALE: u32 = 2;
const TITLE: &str = "Share of Voice (SoV) Comparison";
const Y_LABEL: &str = "SoV Percentage (%)";

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const AXIS: Rgb<u8> = Rgb([60, 60, 60]);
const GRID: Rgb<u8> = Rgb([225, 225, 225]);
const TEXT: Rgb<u8> = Rgb([30, 30, 30]);
const TARGET_BAR: Rgb<u8> = Rgb([0xFF, 0x6B, 0x6B]);
const OTHER_BAR: Rgb<u8> = Rgb([0x4E, 0xCD, 0xC4]);

/// Horizontal text anchored at its top-left corner.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLabel {
    pub text: String,
    pub x: u32,
    pub y: u32,
    pub scale: u32,
}

impl TextLabel {
    fn centered(text: String, center_x: u32, y: u32, scale: u32) -> Self {
        let x = center_x.saturating_sub(text_width(&text, scale) / 2);
        Self { text, x, y, scale }
    }
}

struct Layout {
    plot_width: u32,
    plot_height: u32,
    baseline: u32,
    slot: u32,
    bar_width: u32,
    scale_max: f64,
}

impl Layout {
    fn new(shares: &[BrandShare]) -> Result<Self, SovError> {
        if shares.is_empty() {
            return Err(SovError::Chart("no brands to plot".to_string()));
        }
        let plot_width = WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
        let slot = u32::try_from(shares.len())
            .ok()
            .map(|count| plot_width / count)
            .unwrap_or(0);
        if slot < MIN_SLOT {
            return Err(SovError::Chart(format!(
                "{} brands do not fit in a {}px chart",
                shares.len(),
                WIDTH
            )));
        }

        let peak = shares
            .iter()
            .map(|share| share.weighted_sov)
            .filter(|value| value.is_finite())
            .fold(0.0_f64, f64::max);

        Ok(Self {
            plot_width,
            plot_height: HEIGHT - MARGIN_TOP - MARGIN_BOTTOM,
            baseline: HEIGHT - MARGIN_BOTTOM,
            slot,
            bar_width: (slot * 3 / 5).max(1),
            scale_max: ((peak / 10.0).ceil() * 10.0).clamp(10.0, 100.0),
        })
    }

    fn slot_center(&self, index: usize) -> u32 {
        MARGIN_LEFT + self.slot * index as u32 + self.slot / 2
    }

    fn bar_height(&self, value: f64) -> u32 {
        let value = if value.is_finite() {
            value.clamp(0.0, self.scale_max)
        } else {
            0.0
        };
        (value / self.scale_max * self.plot_height as f64).round() as u32
    }
}

fn text_width(text: &str, scale: u32) -> u32 {
    text.chars().count() as u32 * GLYPH * scale
}

/// Cuts `text` to what fits in `width` pixels at `scale`.
fn fit_text(text: &str, width: u32, scale: u32) -> String {
    let max_chars = (width / (GLYPH * scale)) as usize;
    text.chars().take(max_chars).collect()
}

/// Title, axis ticks, brand names under the bars and values above them.
/// The rotated y-axis caption is drawn separately.
pub fn chart_labels(shares: &[BrandShare]) -> Result<Vec<TextLabel>, SovError> {
    let layout = Layout::new(shares)?;
    let mut labels = vec![TextLabel::centered(TITLE.to_string(), WIDTH / 2, 20, TITLE_SCALE)];

    let glyph_height = GLYPH * LABEL_SCALE;
    for step in 0..=GRID_STEPS {
        let y = layout.baseline - layout.plot_height * step / GRID_STEPS;
        let text = format!("{:.0}", layout.scale_max * step as f64 / GRID_STEPS as f64);
        let x = (MARGIN_LEFT - 8).saturating_sub(text_width(&text, LABEL_SCALE));
        labels.push(TextLabel {
            text,
            x,
            y: y.saturating_sub(glyph_height / 2),
            scale: LABEL_SCALE,
        });
    }

    for (index, share) in shares.iter().enumerate() {
        let center = layout.slot_center(index);
        labels.push(TextLabel::centered(
            fit_text(&share.brand, layout.slot, LABEL_SCALE),
            center,
            layout.baseline + 12,
            LABEL_SCALE,
        ));
        let top = layout.baseline - layout.bar_height(share.weighted_sov);
        let value = if share.weighted_sov.is_finite() {
            share.weighted_sov
        } else {
            0.0
        };
        labels.push(TextLabel::centered(
            fit_text(&format!("{:.1}%", value), layout.slot, LABEL_SCALE),
            center,
            top.saturating_sub(glyph_height + 6),
            LABEL_SCALE,
        ));
    }

    Ok(labels)
}

/// Bar per brand in the given order; the target brand is drawn in red.
/// The y axis tops out at the next multiple of ten above the largest share.
pub fn render_chart(target: &str, shares: &[BrandShare]) -> Result<RgbImage, SovError> {
    let layout = Layout::new(shares)?;
    let mut image = RgbImage::from_pixel(WIDTH, HEIGHT, BACKGROUND);

    for step in 0..=GRID_STEPS {
        let y = layout.baseline - layout.plot_height * step / GRID_STEPS;
        let color = if step == 0 { AXIS } else { GRID };
        fill_rect(&mut image, MARGIN_LEFT, y, layout.plot_width, 1, color);
    }
    fill_rect(&mut image, MARGIN_LEFT, MARGIN_TOP, 1, layout.plot_height, AXIS);

    for (index, share) in shares.iter().enumerate() {
        let height = layout.bar_height(share.weighted_sov);
        if height == 0 {
            continue;
        }
        let x = MARGIN_LEFT + layout.slot * index as u32 + layout.slot.saturating_sub(layout.bar_width) / 2;
        let color = if share.brand.eq_ignore_ascii_case(target) {
            TARGET_BAR
        } else {
            OTHER_BAR
        };
        fill_rect(&mut image, x, layout.baseline - height, layout.bar_width, height, color);
    }

    for label in chart_labels(shares)? {
        draw_text(&mut image, &label);
    }
    let caption_bottom = MARGIN_TOP + (layout.plot_height + text_width(Y_LABEL, LABEL_SCALE)) / 2;
    draw_text_vertical(&mut image, Y_LABEL, 10, caption_bottom, LABEL_SCALE);

    Ok(image)
}

pub fn render_sov_chart(path: &Path, target: &str, shares: &[BrandShare]) -> Result<(), SovError> {
    let image = render_chart(target, shares)?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    image
        .save(path)
        .map_err(|err| SovError::Chart(format!("failed to write {}: {}", path.display(), err)))?;
    tracing::info!(path = %path.display(), brands = shares.len(), "rendered SoV chart");
    Ok(())
}

fn fill_rect(image: &mut RgbImage, x: u32, y: u32, width: u32, height: u32, color: Rgb<u8>) {
    let x_end = x.saturating_add(width).min(image.width());
    let y_end = y.saturating_add(height).min(image.height());
    for py in y..y_end {
        for px in x..x_end {
            image.put_pixel(px, py, color);
        }
    }
}

fn draw_text(image: &mut RgbImage, label: &TextLabel) {
    let advance = GLYPH * label.scale;
    for (index, ch) in label.text.chars().enumerate() {
        let Some(glyph) = BASIC_FONTS.get(ch) else {
            continue;
        };
        let origin = label.x + advance * index as u32;
        for (row, bits) in glyph.iter().enumerate() {
            for col in 0..GLYPH {
                if bits & (1u8 << col) != 0 {
                    fill_rect(
                        image,
                        origin + col * label.scale,
                        label.y + row as u32 * label.scale,
                        label.scale,
                        label.scale,
                        TEXT,
                    );
                }
            }
        }
    }
}

/// Reads bottom to top, starting at (`x`, `bottom`).
fn draw_text_vertical(image: &mut RgbImage, text: &str, x: u32, bottom: u32, scale: u32) {
    let advance = GLYPH * scale;
    for (index, ch) in text.chars().enumerate() {
        let Some(glyph) = BASIC_FONTS.get(ch) else {
            continue;
        };
        let Some(cell_top) = bottom.checked_sub(advance * (index as u32 + 1)) else {
            break;
        };
        for (row, bits) in glyph.iter().enumerate() {
            for col in 0..GLYPH {
                if bits & (1u8 << col) != 0 {
                    fill_rect(
                        image,
                        x + row as u32 * scale,
                        cell_top + (GLYPH - 1 - col) * scale,
                        scale,
                        scale,
                        TEXT,
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shares() -> Vec<BrandShare> {
        vec![
            BrandShare {
                brand: "Atomberg".to_string(),
                weighted_sov: 42.0,
            },
            BrandShare {
                brand: "Havells".to_string(),
                weighted_sov: 21.0,
            },
        ]
    }

    fn slot() -> u32 {
        (WIDTH - MARGIN_LEFT - MARGIN_RIGHT) / 2
    }

    #[test]
    fn target_bar_is_highlighted() {
        let image = render_chart("atomberg", &shares()).unwrap();
        assert_eq!(image.dimensions(), (WIDTH, HEIGHT));

        let baseline = HEIGHT - MARGIN_BOTTOM;
        let first_center = MARGIN_LEFT + slot() / 2;
        let second_center = MARGIN_LEFT + slot() + slot() / 2;
        assert_eq!(*image.get_pixel(first_center, baseline - 5), TARGET_BAR);
        assert_eq!(*image.get_pixel(second_center, baseline - 5), OTHER_BAR);
    }

    #[test]
    fn taller_share_draws_taller_bar() {
        let image = render_chart("Atomberg", &shares()).unwrap();
        let plot_height = HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
        // Scale tops out at 50: Atomberg reaches 84% of the plot, Havells 42%.
        let sample_y = HEIGHT - MARGIN_BOTTOM - plot_height * 6 / 10;
        assert_eq!(*image.get_pixel(MARGIN_LEFT + slot() / 2, sample_y), TARGET_BAR);
        assert_ne!(*image.get_pixel(MARGIN_LEFT + slot() + slot() / 2, sample_y), OTHER_BAR);
    }

    #[test]
    fn brand_names_sit_centered_under_their_bars() {
        let labels = chart_labels(&shares()).unwrap();
        let baseline = HEIGHT - MARGIN_BOTTOM;

        assert!(labels.iter().any(|label| label.text == TITLE));
        for (index, brand) in ["Atomberg", "Havells"].iter().enumerate() {
            let label = labels
                .iter()
                .find(|label| label.text == *brand)
                .expect("brand label");
            let center = MARGIN_LEFT + slot() * index as u32 + slot() / 2;
            let width = text_width(brand, LABEL_SCALE);
            assert_eq!(label.x + width / 2, center);
            assert!(label.y > baseline && label.y + GLYPH * LABEL_SCALE <= HEIGHT);
        }

        let value = labels
            .iter()
            .find(|label| label.text == "42.0%")
            .expect("value label");
        assert!(value.y < baseline - (HEIGHT - MARGIN_TOP - MARGIN_BOTTOM) * 84 / 100);
        assert!(labels.iter().any(|label| label.text == "50"));
    }

    #[test]
    fn labels_are_drawn_in_text_color() {
        let image = render_chart("Atomberg", &shares()).unwrap();
        let labels = chart_labels(&shares()).unwrap();
        let brand = labels
            .iter()
            .find(|label| label.text == "Atomberg")
            .unwrap();
        let inked = (brand.x..brand.x + text_width("Atomberg", LABEL_SCALE))
            .flat_map(|x| (brand.y..brand.y + GLYPH * LABEL_SCALE).map(move |y| (x, y)))
            .filter(|(x, y)| *image.get_pixel(*x, *y) == TEXT)
            .count();
        assert!(inked > 0);

        // The rotated caption sits in the left margin.
        let caption = (10..10 + GLYPH * LABEL_SCALE)
            .flat_map(|x| (MARGIN_TOP..HEIGHT - MARGIN_BOTTOM).map(move |y| (x, y)))
            .filter(|(x, y)| *image.get_pixel(*x, *y) == TEXT)
            .count();
        assert!(caption > 0);
    }

    #[test]
    fn long_brand_names_are_cut_to_their_slot() {
        let mut many: Vec<BrandShare> = (0..20)
            .map(|index| BrandShare {
                brand: format!("Brand{}", index),
                weighted_sov: 5.0,
            })
            .collect();
        many[0].brand = "An extremely long brand name".to_string();
        let labels = chart_labels(&many).unwrap();
        let slot = (WIDTH - MARGIN_LEFT - MARGIN_RIGHT) / 20;
        assert!(labels
            .iter()
            .filter(|label| label.scale == LABEL_SCALE)
            .all(|label| text_width(&label.text, LABEL_SCALE) <= slot.max(MARGIN_LEFT)));
    }

    #[test]
    fn empty_shares_are_rejected() {
        assert!(matches!(render_chart("Atomberg", &[]), Err(SovError::Chart(_))));
    }

    #[test]
    fn too_many_brands_are_rejected() {
        let crowd: Vec<BrandShare> = (0..2_000)
            .map(|index| BrandShare {
                brand: format!("B{}", index),
                weighted_sov: 1.0,
            })
            .collect();
        assert!(matches!(render_chart("B0", &crowd), Err(SovError::Chart(_))));
    }

    #[test]
    fn writes_png_file() {
        let path = std::env::temp_dir()
            .join("sov-agent-chart-test")
            .join("sov_comparison.png");
        render_sov_chart(&path, "Atomberg", &shares()).unwrap();
        assert!(path.exists());
        let _ = std::fs::remove_file(&path);
    }
}
