use crate::units::Mm;
use serde::{Deserialize, Serialize};

/// Page margins in millimetres.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub left: Mm,
    pub right: Mm,
    pub top: Mm,
    pub bottom: Mm,
}

impl Margins {
    pub const DEFAULT_MM: f32 = 5.0;

    pub fn all(mm: Mm) -> Margins {
        Margins {
            left: mm,
            right: mm,
            top: mm,
            bottom: mm,
        }
    }

    /// Apply overrides key by key; keys left unset keep their current value.
    pub fn merge(self, overrides: &MarginOverrides) -> Margins {
        Margins {
            left: overrides.left.map(Mm).unwrap_or(self.left),
            right: overrides.right.map(Mm).unwrap_or(self.right),
            top: overrides.top.map(Mm).unwrap_or(self.top),
            bottom: overrides.bottom.map(Mm).unwrap_or(self.bottom),
        }
    }
}

impl Default for Margins {
    fn default() -> Self {
        Margins::all(Mm(Margins::DEFAULT_MM))
    }
}

/// A partial set of margins in millimetres, as found in configuration files.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MarginOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bottom: Option<f32>,
}

impl MarginOverrides {
    pub fn is_empty(&self) -> bool {
        self.left.is_none() && self.right.is_none() && self.top.is_none() && self.bottom.is_none()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn partial_overrides_merge_by_key() {
        let overrides = MarginOverrides {
            left: Some(10.0),
            top: Some(15.0),
            ..Default::default()
        };
        let margins = Margins::default().merge(&overrides);
        assert_eq!(margins.left, Mm(10.0));
        assert_eq!(margins.right, Mm(5.0));
        assert_eq!(margins.top, Mm(15.0));
        assert_eq!(margins.bottom, Mm(5.0));

        // a second partial override leaves earlier ones in place
        let margins = margins.merge(&MarginOverrides {
            bottom: Some(2.0),
            ..Default::default()
        });
        assert_eq!(margins.left, Mm(10.0));
        assert_eq!(margins.bottom, Mm(2.0));
    }

    #[test]
    fn overrides_read_from_toml() {
        let overrides: MarginOverrides = toml::from_str("left = 8.0\nbottom = 12").expect("can parse");
        assert_eq!(overrides.left, Some(8.0));
        assert_eq!(overrides.bottom, Some(12.0));
        assert!(overrides.right.is_none());
        assert!(!overrides.is_empty());
    }
}
