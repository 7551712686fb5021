//! Language tags understood by the service

use std::collections::BTreeMap;

/// Published language table, human-readable name to script-tagged code
pub const LANGUAGE_CODES: &[(&str, &str)] = &[
    ("English", "eng_Latn"),
    ("Hindi", "hin_Deva"),
    ("Bengali", "ben_Beng"),
    ("Malayalam", "mal_Mlym"),
    ("Kannada", "kan_Knda"),
    ("Telugu", "tel_Telu"),
    ("Tamil", "tam_Taml"),
    ("Gujarati", "guj_Gujr"),
    ("Marathi", "mar_Deva"),
    ("Punjabi", "pan_Guru"),
    ("Urdu", "urd_Arab"),
    ("Oriya", "ory_Orya"),
    ("Assamese", "asm_Beng"),
    ("Bhojpuri", "bho_Deva"),
];

/// Tags the IndicTrans2 family was trained on
const MODEL_CODES: &[&str] = &[
    "asm_Beng", "ben_Beng", "brx_Deva", "doi_Deva", "eng_Latn", "gom_Deva", "guj_Gujr",
    "hin_Deva", "kan_Knda", "kas_Arab", "kas_Deva", "mai_Deva", "mal_Mlym", "mar_Deva",
    "mni_Beng", "mni_Mtei", "npi_Deva", "ory_Orya", "pan_Guru", "san_Deva", "sat_Olck",
    "snd_Arab", "snd_Deva", "tam_Taml", "tel_Telu", "urd_Arab",
];

/// Tag for English
pub const ENGLISH: &str = "eng_Latn";

/// Language table as a name-keyed map
pub fn language_table() -> BTreeMap<&'static str, &'static str> {
    LANGUAGE_CODES.iter().copied().collect()
}

/// Whether a tag is accepted by the processor
pub fn is_supported(code: &str) -> bool {
    MODEL_CODES.contains(&code) || LANGUAGE_CODES.iter().any(|(_, c)| *c == code)
}

/// Script part of a tag (`hin_Deva` -> `Deva`)
pub fn script_of(code: &str) -> Option<&str> {
    code.split_once('_').map(|(_, script)| script)
}
