//! Host location descriptors and canonical binding keys.
//!
//! # Responsibility
//! - Turn a `(workbook, sheet, address)` descriptor into the canonical key
//!   `"[<workbook>]<sheet><address>"`, byte-for-byte.
//! - Parse canonical keys back into descriptors.
//!
//! # Invariants
//! - Equal locations always produce equal keys.
//! - Distinct accepted locations produce distinct keys: a key is split at the
//!   leftmost `$`/`!` whose remainder is a valid address, and a location whose
//!   own key would split differently is rejected as ambiguous.

pub mod dispatch;

use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

const SHEET_NAME_MAX_CHARS: usize = 31;
const SHEET_FORBIDDEN_CHARS: &[char] = &['[', ']', ':', '*', '?', '/', '\\'];

// One area: cell, cell range, column range or row range.
const AREA_PATTERN: &str = concat!(
    r"(?:",
    r"\$?[A-Z]{1,3}\$?[1-9][0-9]*(?::\$?[A-Z]{1,3}\$?[1-9][0-9]*)?",
    r"|\$?[A-Z]{1,3}:\$?[A-Z]{1,3}",
    r"|\$?[1-9][0-9]*:\$?[1-9][0-9]*",
    r")"
);

// Multi-area selections arrive as a comma-separated list, e.g. `$A$1,$C$3`.
static ADDRESS_BODY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!("^{AREA_PATTERN}(?:,{AREA_PATTERN})*$")).expect("valid address regex")
});

/// Host location validation and key parsing errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationError {
    EmptyWorkbook,
    InvalidWorkbook(String),
    EmptySheet,
    InvalidSheet(String),
    InvalidAddress(String),
    /// Sheet and address run together so the key would read back differently.
    AmbiguousKey(String),
    MalformedKey(String),
}

impl Display for LocationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyWorkbook => write!(f, "workbook name must not be empty"),
            Self::InvalidWorkbook(value) => {
                write!(f, "workbook name must not contain brackets: `{value}`")
            }
            Self::EmptySheet => write!(f, "sheet name must not be empty"),
            Self::InvalidSheet(value) => write!(f, "sheet name is invalid: `{value}`"),
            Self::InvalidAddress(value) => {
                write!(f, "address must be `!`-qualified or `$`-absolute A1 form: `{value}`")
            }
            Self::AmbiguousKey(value) => {
                write!(f, "sheet and address do not split back uniquely: `{value}`")
            }
            Self::MalformedKey(value) => write!(f, "not a canonical binding key: `{value}`"),
        }
    }
}

impl Error for LocationError {}

/// Validated host cell or range location.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HostLocation {
    workbook: String,
    sheet: String,
    address: String,
}

impl HostLocation {
    /// Validates and builds a location.
    ///
    /// `address` is taken as the host reports it, e.g. `$A$1`, `$A$1:$C$4`,
    /// the multi-area `$A$1,$C$3` or the sheet-qualified `!A1`.
    pub fn new(
        workbook: impl Into<String>,
        sheet: impl Into<String>,
        address: impl Into<String>,
    ) -> Result<Self, LocationError> {
        let workbook = workbook.into();
        let sheet = sheet.into();
        let address = address.into();

        if workbook.is_empty() {
            return Err(LocationError::EmptyWorkbook);
        }
        if workbook.contains(['[', ']']) {
            return Err(LocationError::InvalidWorkbook(workbook));
        }
        if sheet.is_empty() {
            return Err(LocationError::EmptySheet);
        }
        if sheet.contains(SHEET_FORBIDDEN_CHARS) || sheet.chars().count() > SHEET_NAME_MAX_CHARS {
            return Err(LocationError::InvalidSheet(sheet));
        }
        if !is_valid_address(&address) {
            return Err(LocationError::InvalidAddress(address));
        }

        let location = Self {
            workbook,
            sheet,
            address,
        };
        let key = location.canonical_key();
        match split_key(&key) {
            Some((_, sheet, _)) if sheet == location.sheet => Ok(location),
            _ => Err(LocationError::AmbiguousKey(key)),
        }
    }

    /// Parses a canonical key produced by [`canonical_key`](Self::canonical_key).
    pub fn parse_key(key: &str) -> Result<Self, LocationError> {
        let (workbook, sheet, address) =
            split_key(key).ok_or_else(|| LocationError::MalformedKey(key.to_string()))?;
        Self::new(workbook, sheet, address)
    }

    pub fn workbook(&self) -> &str {
        &self.workbook
    }

    pub fn sheet(&self) -> &str {
        &self.sheet
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// Returns `"[<workbook>]<sheet><address>"`.
    pub fn canonical_key(&self) -> String {
        format!("[{}]{}{}", self.workbook, self.sheet, self.address)
    }
}

impl Display for HostLocation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]{}{}", self.workbook, self.sheet, self.address)
    }
}

/// Splits `[wb]sheet+address` at the leftmost point leaving a valid address.
fn split_key(key: &str) -> Option<(&str, &str, &str)> {
    let rest = key.strip_prefix('[')?;
    let (workbook, rest) = rest.split_once(']')?;
    rest.char_indices()
        .filter(|(index, ch)| *index > 0 && matches!(*ch, '$' | '!'))
        .map(|(index, _)| rest.split_at(index))
        .find(|(_, address)| is_valid_address(address))
        .map(|(sheet, address)| (workbook, sheet, address))
}

fn is_valid_address(address: &str) -> bool {
    let body = match address.strip_prefix('!') {
        Some(qualified) => qualified,
        None if address.starts_with('$') => address,
        None => return false,
    };
    ADDRESS_BODY_RE.is_match(body)
}
