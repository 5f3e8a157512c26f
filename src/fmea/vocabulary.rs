//! Device reason-code translation.
//!
//! The line controller reports failures as English enum-style codes while
//! the FMEA worksheet and the duration model use the plant's own defect
//! vocabulary.

use regex::Regex;
use std::sync::LazyLock;

use super::normalize_reason;

/// Separators panels put between code words: spaces, underscores, dashes, slashes.
static CODE_SEPARATORS: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"[\s_\-/]+").ok());

const DEVICE_CODES: &[(&str, &str)] = &[
    ("SLOTTER_MISALIGNMENT", "SLOTER LARI"),
    ("SLOTTER_CRACK", "SLOTTER PECAH"),
    ("CREASING_CRACK", "CREASING PECAH"),
    ("CREASING_MISALIGNMENT", "CREASING MIRING"),
    ("INK_BLOBBING", "PRINT BLOBOR"),
    ("PRINT_GHOSTING", "PRINTING BOTAK"),
    ("PRINT_DOUBLE_IMAGE", "PRINTING DOUBLE"),
    ("PRINT_BLUR", "PRINTING BLUR"),
    ("DIECUT_INCOMPLETE_CUT", "DIECUT TIDAK PUTUS"),
    ("DIECUT_CRACK", "DIECUT PECAH"),
    ("FEEDER_JAM", "FEEDER TROUBLE"),
    ("FEEDER_ELECTRICAL_FAULT", "FEEDER ELEKTRIK"),
    ("FEEDER_MECHANICAL_FAULT", "FEEDER MEKANIK"),
    ("ORDER_CHANGE", "GANTI ORDER"),
];

/// Translate a device reason code into the canonical vocabulary.
///
/// Code words may be separated by any run of spaces, underscores, dashes or
/// slashes. Anything that is not a known code is returned normalized but
/// otherwise untouched.
pub fn translate_reason(reason: &str) -> String {
    let key = normalize_reason(reason);
    let Some(separators) = CODE_SEPARATORS.as_ref() else {
        return key;
    };
    let code = separators.replace_all(key.trim_matches(&['_', '-', '/'][..]), "_");
    DEVICE_CODES
        .iter()
        .find(|(device, _)| *device == code)
        .map_or(key, |(_, canonical)| (*canonical).to_string())
}
