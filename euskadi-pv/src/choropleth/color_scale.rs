
use crate::pipeline::config::ColorOrder;

/// RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

pub const GREEN: Rgb = Rgb(0x00, 0x80, 0x00);
pub const YELLOW: Rgb = Rgb(0xff, 0xff, 0x00);
pub const RED: Rgb = Rgb(0xff, 0x00, 0x00);

impl Rgb {
    /// CSS color name, for the names `ColorOrder::colors` returns
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "green" => Some(GREEN),
            "yellow" => Some(YELLOW),
            "red" => Some(RED),
            _ => None,
        }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }

    fn lerp(self, other: Rgb, t: f64) -> Rgb {
        let channel = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Rgb(
            channel(self.0, other.0),
            channel(self.1, other.1),
            channel(self.2, other.2),
        )
    }
}

/// Linear colormap: colors evenly spaced between vmin and vmax
#[derive(Debug, Clone, PartialEq)]
pub struct ColorScale {
    pub colors: Vec<Rgb>,
    pub vmin: f64,
    pub vmax: f64,
    pub caption: String,
}

impl ColorScale {
    pub fn new(order: ColorOrder, vmin: f64, vmax: f64, caption: &str) -> Self {
        let colors = order
            .colors()
            .iter()
            .filter_map(|name| Rgb::from_name(name))
            .collect();

        ColorScale {
            colors,
            vmin,
            vmax,
            caption: caption.to_string(),
        }
    }

    /// Color for a value; values outside [vmin, vmax] are clamped
    pub fn color_at(&self, value: f64) -> Rgb {
        let last = self.colors.len().saturating_sub(1);
        if last == 0 || self.vmax <= self.vmin {
            return self.colors.first().copied().unwrap_or(GREEN);
        }

        let t = ((value - self.vmin) / (self.vmax - self.vmin)).clamp(0.0, 1.0);
        let position = t * last as f64;
        let idx = (position.floor() as usize).min(last - 1);
        self.colors[idx].lerp(self.colors[idx + 1], position - idx as f64)
    }

    pub fn hex_at(&self, value: f64) -> String {
        self.color_at(value).to_hex()
    }

    /// Hex stops for a CSS gradient legend
    pub fn hex_stops(&self) -> Vec<String> {
        self.colors.iter().map(|c| c.to_hex()).collect()
    }
}
