use std::fmt;

use serde::{Deserialize, Serialize};

/// Logical column roles the pipeline needs from the sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Street name and house number.
    Street,
    /// City name; may carry stray postal digits.
    City,
    /// Postal code.
    Postal,
    /// Column receiving the `latitude, longitude` text.
    Gps,
}

impl Role {
    /// All roles in the order they are asked for.
    pub const ALL: [Role; 4] = [Role::Street, Role::City, Role::Postal, Role::Gps];

    /// Question shown when the header for this role is requested.
    pub fn question(self) -> &'static str {
        match self {
            Role::Street => "What is the title of the column with street names? ",
            Role::City => "What is the title of the column with city names? ",
            Role::Postal => "What is the title of the column with postal codes? ",
            Role::Gps => "What is the title of the column where the GPS coordinates should go? ",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Street => write!(f, "street"),
            Role::City => write!(f, "city"),
            Role::Postal => write!(f, "postal"),
            Role::Gps => write!(f, "gps"),
        }
    }
}

/// Role → column header mapping supplied by the user.
///
/// A freshly acquired mapping may name headers the sheet does not have; only
/// the mapping returned by [`correct_mapping`](crate::validate::correct_mapping)
/// is guaranteed to resolve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    pub street: String,
    pub city: String,
    pub postal: String,
    pub gps: String,
}

impl ColumnMapping {
    pub fn new(
        street: impl Into<String>,
        city: impl Into<String>,
        postal: impl Into<String>,
        gps: impl Into<String>,
    ) -> Self {
        Self {
            street: street.into(),
            city: city.into(),
            postal: postal.into(),
            gps: gps.into(),
        }
    }

    /// Header mapped to the given role.
    pub fn header(&self, role: Role) -> &str {
        match role {
            Role::Street => &self.street,
            Role::City => &self.city,
            Role::Postal => &self.postal,
            Role::Gps => &self.gps,
        }
    }

    /// Replaces the header mapped to the given role.
    pub fn set_header(&mut self, role: Role, header: impl Into<String>) {
        let slot = match role {
            Role::Street => &mut self.street,
            Role::City => &mut self.city,
            Role::Postal => &mut self.postal,
            Role::Gps => &mut self.gps,
        };
        *slot = header.into();
    }
}

/// Column headers already known before prompting, e.g. from the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PresetColumns {
    pub street: Option<String>,
    pub city: Option<String>,
    pub postal: Option<String>,
    pub gps: Option<String>,
}

impl PresetColumns {
    pub fn get(&self, role: Role) -> Option<&str> {
        match role {
            Role::Street => self.street.as_deref(),
            Role::City => self.city.as_deref(),
            Role::Postal => self.postal.as_deref(),
            Role::Gps => self.gps.as_deref(),
        }
    }
}

/// In-memory copy of the first worksheet: a header row followed by data rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    /// Header cells rendered as text.
    pub headers: Vec<String>,
    /// Data rows, each padded to the header width.
    pub rows: Vec<Vec<String>>,
    /// Zero-based `(row, column)` of the header row's first cell in the sheet.
    pub origin: (u32, u32),
}

impl Table {
    /// Position of the column with the given header, if any.
    pub fn column_index(&self, header: &str) -> Option<usize> {
        self.headers.iter().position(|candidate| candidate == header)
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(column))
            .map(String::as_str)
    }

    /// Zero-based sheet position of a data cell, accounting for the header row.
    pub fn sheet_position(&self, row: usize, column: usize) -> (u32, u32) {
        let (origin_row, origin_col) = self.origin;
        (
            origin_row + 1 + row as u32,
            origin_col + column as u32,
        )
    }
}

/// Address triple submitted to the geocoder for one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressRow {
    pub street: String,
    pub city: String,
    pub postal: String,
}

impl AddressRow {
    /// Free-form query string in `street, city, postal` order.
    pub fn query(&self) -> String {
        [&self.street, &self.city, &self.postal]
            .into_iter()
            .map(|part| part.trim())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for AddressRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}, {:?}, {:?}]", self.street, self.city, self.postal)
    }
}

/// A resolved position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Renders the value written into the output cell.
impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.latitude, self.longitude)
    }
}
