//! Static tables of supported devices and page patterns.
//!
//! Devices are identified by [`DeviceId`] and described by a [`DeviceSpec`] in the
//! [`DEVICES`] table. Lookups are case-insensitive and accept the canonical key
//! (`remarkable2`), any alias (`rm2`) or the display name (`reMarkable 2`).

use crate::error::{NotebookError, Result};
use crate::units::{Mm, Pt};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum DeviceId {
    Remarkable1,
    Remarkable2,
    RemarkableMove,
    RemarkablePro,
    BooxNoteAir,
    BooxMaxLumi,
    BooxNoteAir3C,
    BooxNoteAir3,
    BooxNoteAir4C,
    BooxTabMiniC,
    BooxNoteMax,
    BooxGo103,
    SupernoteA5X,
    SupernoteA6X,
    SupernoteA6X2,
    SupernoteManta,
    A4,
    A5,
    Letter,
    Legal,
}

#[derive(Debug, PartialEq)]
pub struct DeviceSpec {
    pub id: DeviceId,
    /// Canonical lookup key
    pub key: &'static str,
    /// Human-readable name, also used for batch output file names
    pub display_name: &'static str,
    pub width: Mm,
    pub height: Mm,
    pub aliases: &'static [&'static str],
}

impl DeviceSpec {
    pub fn size(&self) -> (Pt, Pt) {
        (self.width.into(), self.height.into())
    }

    fn matches(&self, name: &str) -> bool {
        self.key == name
            || self.aliases.iter().any(|a| *a == name)
            || self.display_name.to_lowercase() == name
    }
}

impl fmt::Display for DeviceSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name)
    }
}

const fn device(
    id: DeviceId,
    key: &'static str,
    display_name: &'static str,
    width_mm: f32,
    height_mm: f32,
    aliases: &'static [&'static str],
) -> DeviceSpec {
    DeviceSpec {
        id,
        key,
        display_name,
        width: Mm(width_mm),
        height: Mm(height_mm),
        aliases,
    }
}

/// Every supported page size, in listing order.
pub static DEVICES: &[DeviceSpec] = &[
    // reMarkable
    device(DeviceId::Remarkable1, "remarkable1", "reMarkable 1", 157.0, 210.0, &["rm1"]),
    device(DeviceId::Remarkable2, "remarkable2", "reMarkable 2", 157.0, 210.0, &["rm2"]),
    device(
        DeviceId::RemarkableMove,
        "remarkablemove",
        "reMarkable Paper Pro Move",
        91.0,
        162.0,
        &["move"],
    ),
    device(
        DeviceId::RemarkablePro,
        "remarkablepro",
        "reMarkable Paper Pro",
        179.0,
        239.0,
        &["pro"],
    ),
    // Onyx Boox
    device(DeviceId::BooxNoteAir, "booxnoteair", "Onyx Boox Note Air", 157.0, 209.0, &[]),
    device(DeviceId::BooxMaxLumi, "booxmaxlumi", "Onyx Boox Max Lumi", 203.0, 270.0, &[]),
    device(
        DeviceId::BooxNoteAir3C,
        "booxnoteair3c",
        "Onyx Boox Note Air 3C",
        157.0,
        209.0,
        &[],
    ),
    device(DeviceId::BooxNoteAir3, "booxnoteair3", "Onyx Boox Note Air 3", 157.0, 209.0, &[]),
    device(
        DeviceId::BooxNoteAir4C,
        "booxnoteair4c",
        "Onyx Boox Note Air 4C",
        157.0,
        209.0,
        &[],
    ),
    device(DeviceId::BooxTabMiniC, "booxtabminic", "Onyx Boox Tab Mini C", 119.0, 158.0, &[]),
    device(DeviceId::BooxNoteMax, "booxnotemax", "Onyx Boox Note Max", 203.0, 270.0, &[]),
    device(DeviceId::BooxGo103, "booxgo103", "Onyx Boox Go 10.3", 157.0, 209.0, &[]),
    // Supernote
    device(DeviceId::SupernoteA5X, "supernotea5x", "Supernote A5X", 158.0, 210.0, &[]),
    device(DeviceId::SupernoteA6X, "supernotea6x", "Supernote A6X", 119.0, 159.0, &[]),
    device(
        DeviceId::SupernoteA6X2,
        "supernotea6x2",
        "Supernote A6X2 (Nomad)",
        119.0,
        159.0,
        &["nomad"],
    ),
    device(
        DeviceId::SupernoteManta,
        "supernotemanta",
        "Supernote A5X2 (Manta)",
        163.0,
        217.0,
        &["manta"],
    ),
    // paper
    device(DeviceId::A4, "a4", "A4", 210.0, 297.0, &[]),
    device(DeviceId::A5, "a5", "A5", 148.0, 210.0, &[]),
    device(DeviceId::Letter, "letter", "Letter", 215.9, 279.4, &[]),
    device(DeviceId::Legal, "legal", "Legal", 215.9, 355.6, &[]),
];

/// The tablets a batch run covers when no device list is given.
const DEFAULT_BATCH_DEVICES: &[&str] = &[
    "remarkable1",
    "remarkable2",
    "move",
    "pro",
    "booxnoteair",
    "booxmaxlumi",
    "booxnoteair3c",
    "booxnoteair3",
    "booxnoteair4c",
    "booxtabminic",
    "booxnotemax",
    "booxgo103",
    "supernotea5x",
    "supernotea6x",
    "supernotea6x2",
    "supernotemanta",
];

/// Look up a device by key, alias or display name, ignoring case.
pub fn resolve(name: &str) -> Result<&'static DeviceSpec> {
    let needle = name.trim().to_lowercase();
    DEVICES
        .iter()
        .find(|d| d.matches(&needle))
        .ok_or_else(|| NotebookError::UnknownDevice(name.to_string()))
}

pub fn list_devices() -> &'static [DeviceSpec] {
    DEVICES
}

pub fn default_batch_devices() -> Vec<String> {
    DEFAULT_BATCH_DEVICES.iter().map(ToString::to_string).collect()
}

/// The background drawn on every content page.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternKind {
    Dots,
    Lines,
    Grid,
    Blank,
}

impl PatternKind {
    pub fn name(&self) -> &'static str {
        match self {
            PatternKind::Dots => "dots",
            PatternKind::Lines => "lines",
            PatternKind::Grid => "grid",
            PatternKind::Blank => "blank",
        }
    }

    /// Title-cased name, as used in output file names
    pub fn title(&self) -> &'static str {
        match self {
            PatternKind::Dots => "Dots",
            PatternKind::Lines => "Lines",
            PatternKind::Grid => "Grid",
            PatternKind::Blank => "Blank",
        }
    }

    pub fn all() -> &'static [PatternKind] {
        &[
            PatternKind::Dots,
            PatternKind::Lines,
            PatternKind::Grid,
            PatternKind::Blank,
        ]
    }
}

pub fn list_patterns() -> &'static [PatternKind] {
    PatternKind::all()
}

impl fmt::Display for PatternKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for PatternKind {
    type Err = NotebookError;

    fn from_str(s: &str) -> Result<Self> {
        let needle = s.trim().to_lowercase();
        PatternKind::all()
            .iter()
            .copied()
            .find(|p| p.name() == needle)
            .ok_or_else(|| {
                NotebookError::invalid(format!(
                    "unknown page pattern `{s}`, expected one of: dots, lines, grid, blank"
                ))
            })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn keys_and_aliases_resolve_to_the_same_spec() {
        for spec in list_devices() {
            let by_key = resolve(spec.key).expect("can resolve key");
            assert!(std::ptr::eq(by_key, spec));
            for alias in spec.aliases {
                let by_alias = resolve(alias).expect("can resolve alias");
                assert!(std::ptr::eq(by_alias, spec), "alias {alias}");
                assert_eq!(by_alias.id, spec.id);
            }
            let by_name = resolve(spec.display_name).expect("can resolve display name");
            assert_eq!(by_name.id, spec.id);
        }
    }

    #[test]
    fn lookups_ignore_case_and_whitespace() {
        assert_eq!(resolve("  RM2 ").unwrap().id, DeviceId::Remarkable2);
        assert_eq!(resolve("BooxNoteAir").unwrap().id, DeviceId::BooxNoteAir);
        assert_eq!(resolve("reMarkable paper pro").unwrap().id, DeviceId::RemarkablePro);
    }

    #[test]
    fn unknown_devices_are_reported() {
        match resolve("kindle-scribe") {
            Err(NotebookError::UnknownDevice(name)) => assert_eq!(name, "kindle-scribe"),
            other => panic!("expected UnknownDevice, got {other:?}"),
        }
    }

    #[test]
    fn keys_and_aliases_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for spec in list_devices() {
            assert!(seen.insert(spec.key));
            for alias in spec.aliases {
                assert!(seen.insert(*alias), "duplicate alias {alias}");
            }
        }
    }

    #[test]
    fn default_batch_devices_all_resolve() {
        let devices = default_batch_devices();
        assert_eq!(devices.len(), 16);
        for d in devices {
            resolve(&d).expect("default device resolves");
        }
    }

    #[test]
    fn patterns_parse_case_insensitively() {
        assert_eq!("Grid".parse::<PatternKind>().unwrap(), PatternKind::Grid);
        assert_eq!(" dots".parse::<PatternKind>().unwrap(), PatternKind::Dots);
        assert!(matches!(
            "hexagons".parse::<PatternKind>(),
            Err(NotebookError::InvalidParameter(_))
        ));
        assert_eq!(list_patterns().len(), 4);
    }
}
