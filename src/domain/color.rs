// Colour values as Grafana expects them in panel JSON
use serde::{Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb(pub u8, pub u8, pub u8);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba(pub u8, pub u8, pub u8, pub f64);

pub const GREEN: Rgba = Rgba(50, 172, 45, 0.97);
pub const ORANGE: Rgba = Rgba(237, 129, 40, 0.89);
pub const RED: Rgba = Rgba(245, 54, 54, 0.9);

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("rgb({}, {}, {})", self.0, self.1, self.2))
    }
}

impl Serialize for Rgba {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!(
            "rgba({}, {}, {}, {})",
            self.0, self.1, self.2, self.3
        ))
    }
}
