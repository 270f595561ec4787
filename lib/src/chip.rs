// SPDX-FileCopyrightText: 2021 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::line::Id;
use crate::sysfs::{read_attr, Sysfs};
use crate::{Error, Result};
#[cfg(feature = "serde")]
use serde_derive::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::ops::Range;
use std::os::unix::prelude::OsStrExt;
use std::path::Path;

/// Compare two chip names.
///
// Sorts names naturally, assuming any chip numbering is at the end of the name - as it is for gpiochips.
pub fn name_compare(a: &str, b: &str) -> std::cmp::Ordering {
    path_compare(Path::new(a), Path::new(b))
}

/// Compare two chip paths.
///
// Sorts paths naturally, assuming any chip numbering is at the end of the path - as it is for gpiochips.
pub fn path_compare(a: &Path, b: &Path) -> std::cmp::Ordering {
    let a = a.as_os_str().as_bytes();
    let b = b.as_os_str().as_bytes();

    if a.len() == b.len() {
        // if equal length then just compare lexicographically
        return a.cmp(b);
    }
    for it in a.iter().zip(b.iter()) {
        let (ai, bi) = it;
        if *ai != *bi {
            if !ai.is_ascii_digit() || !bi.is_ascii_digit() {
                // if either is not a digit then this character is definitive
                return (*ai).cmp(bi);
            }
            // else drop thru to length comparison
            break;
        }
    }
    // equal up to to the length of the shortest - or to digits and shorter numbers are smaller
    a.len().cmp(&b.len())
}

/// Returns the info for all the GPIO chips in the standard sysfs location.
///
/// The chips are sorted in name order.
pub fn chips() -> Result<Vec<Info>> {
    Sysfs::default().chips()
}

/// Returns the chip containing the pin with the given id, if any.
pub fn find_chip(id: Id) -> Option<Info> {
    Sysfs::default().find_chip(id)
}

/// The publicly available information for a GPIO chip, as reported by sysfs.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Info {
    /// The name of the chip in the sysfs GPIO class, e.g. `gpiochip512`.
    pub name: String,

    /// A functional name for the chip, such as a product number.
    ///
    /// May be empty.
    pub label: String,

    /// The id of the first pin on the chip.
    pub base: Id,

    /// The number of pins on the chip.
    pub ngpio: u32,

    /// The name of the GPIO device backing the chip, e.g. `gpiochip0`,
    /// which also names the chip's character device.
    ///
    /// Empty if it could not be determined.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "String::is_empty"))]
    pub device: String,
}

impl Info {
    /// The ids of the pins on the chip.
    pub fn ids(&self) -> Range<Id> {
        self.base..self.base.saturating_add(self.ngpio)
    }

    /// Returns true if the pin with the given id belongs to the chip.
    pub fn contains(&self, id: Id) -> bool {
        self.ids().contains(&id)
    }

    /// The id of the pin at the given offset on the chip.
    pub fn id_of(&self, offset: u32) -> Option<Id> {
        if offset < self.ngpio {
            return Some(self.base + offset);
        }
        None
    }
}

impl fmt::Display for Info {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = if self.label.is_empty() {
            "??"
        } else {
            &self.label
        };
        write!(
            f,
            "{} [{}] ({} lines from {})",
            self.name, label, self.ngpio, self.base
        )
    }
}

impl Sysfs {
    /// Returns the info for all the GPIO chips in this sysfs GPIO class.
    ///
    /// The chips are sorted in name order.
    pub fn chips(&self) -> Result<Vec<Info>> {
        let entries = fs::read_dir(self.root()).map_err(|e| Error::io(self.root(), e))?;
        let mut names = entries
            .filter_map(|x| x.ok())
            .filter_map(|de| de.file_name().into_string().ok())
            .filter(|n| is_chip_name(n))
            .collect::<Vec<String>>();
        names.sort_unstable_by(|a, b| name_compare(a, b));
        let mut chips = Vec::new();
        for name in names {
            match self.chip_info(&name) {
                Ok(info) => chips.push(info),
                Err(e) => debug_log!("skipping {}: {}", name, e),
            }
        }
        Ok(chips)
    }

    /// Returns the info for the named chip, e.g. `gpiochip512`.
    pub fn chip_info(&self, name: &str) -> Result<Info> {
        let dir = self.root().join(name);
        let base = read_number(&dir, "base")?;
        let ngpio = read_number(&dir, "ngpio")?;
        // label is optional
        let label = read_attr(&dir.join("label")).unwrap_or_default();
        let device = fs::canonicalize(dir.join("device"))
            .ok()
            .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
            .unwrap_or_default();
        Ok(Info {
            name: name.into(),
            label,
            base,
            ngpio,
            device,
        })
    }

    /// Returns the chip containing the pin with the given id, if any.
    pub fn find_chip(&self, id: Id) -> Option<Info> {
        self.chips().ok()?.into_iter().find(|c| c.contains(id))
    }
}

fn is_chip_name(n: &str) -> bool {
    match n.strip_prefix("gpiochip") {
        Some(num) => !num.is_empty() && num.chars().all(|c| c.is_ascii_digit()),
        None => false,
    }
}

fn read_number(dir: &Path, attr: &str) -> Result<u32> {
    let path = dir.join(attr);
    let s = read_attr(&path)?;
    s.parse::<u32>().map_err(|_| Error::Io {
        path,
        source: std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("\"{}\" is not a number", s),
        ),
    })
}
