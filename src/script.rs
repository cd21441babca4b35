//! Script and language classification.
//!
//! [`detect_script`] is a pure function from text to a closed set of script
//! tags. Each script maps to the languages whose keyword tables apply to it.

use serde::{Deserialize, Serialize};
use unicode_bidi::{bidi_class, BidiClass};

/// Writing system of a text run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Script {
    Latin,
    Cyrillic,
    Arabic,
    Hebrew,
    /// Han ideographs without kana (Chinese).
    Han,
    /// Kana, possibly mixed with Han.
    Japanese,
    /// Hangul.
    Korean,
    /// Digits, punctuation and symbols only.
    Common,
}

/// Languages with keyword, month and warning-word tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    English,
    Spanish,
    French,
    German,
    Russian,
    Arabic,
    Chinese,
    Japanese,
    Korean,
}

impl Language {
    /// All languages with pattern tables.
    pub const ALL: [Language; 9] = [
        Language::English,
        Language::Spanish,
        Language::French,
        Language::German,
        Language::Russian,
        Language::Arabic,
        Language::Chinese,
        Language::Japanese,
        Language::Korean,
    ];

    /// ISO 639-1 code.
    pub fn code(self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Spanish => "es",
            Language::French => "fr",
            Language::German => "de",
            Language::Russian => "ru",
            Language::Arabic => "ar",
            Language::Chinese => "zh",
            Language::Japanese => "ja",
            Language::Korean => "ko",
        }
    }
}

impl Script {
    /// Languages whose keyword tables are matched against text in this script.
    ///
    /// English is always included so that mixed documents still match
    /// English section keywords.
    pub fn languages(self) -> &'static [Language] {
        match self {
            Script::Latin | Script::Common => &[
                Language::English,
                Language::Spanish,
                Language::French,
                Language::German,
            ],
            Script::Cyrillic => &[Language::Russian, Language::English],
            Script::Arabic | Script::Hebrew => &[Language::Arabic, Language::English],
            Script::Han => &[Language::Chinese, Language::Japanese, Language::English],
            Script::Japanese => &[Language::Japanese, Language::Chinese, Language::English],
            Script::Korean => &[Language::Korean, Language::English],
        }
    }

    /// Whether the script is written right to left.
    pub fn is_rtl(self) -> bool {
        matches!(self, Script::Arabic | Script::Hebrew)
    }

    /// Whether the script is Chinese, Japanese or Korean.
    pub fn is_cjk(self) -> bool {
        matches!(self, Script::Han | Script::Japanese | Script::Korean)
    }

    /// Whether letter case is meaningful in this script.
    pub fn is_cased(self) -> bool {
        matches!(self, Script::Latin | Script::Cyrillic)
    }
}

/// Classify a single character, or `None` for script-neutral characters.
fn char_script(c: char) -> Option<Script> {
    let code = c as u32;
    match code {
        0x0041..=0x005A | 0x0061..=0x007A | 0x00C0..=0x024F | 0x1E00..=0x1EFF => {
            Some(Script::Latin)
        }
        0x0400..=0x052F => Some(Script::Cyrillic),
        0x0590..=0x05FF => Some(Script::Hebrew),
        0x0600..=0x06FF | 0x0750..=0x077F | 0x08A0..=0x08FF | 0xFB50..=0xFDFF | 0xFE70..=0xFEFF => {
            Some(Script::Arabic)
        }
        0x3040..=0x309F | 0x30A0..=0x30FF | 0x31F0..=0x31FF | 0xFF66..=0xFF9F => {
            Some(Script::Japanese)
        }
        0x1100..=0x11FF | 0x3130..=0x318F | 0xAC00..=0xD7AF => Some(Script::Korean),
        0x4E00..=0x9FFF | 0x3400..=0x4DBF | 0x20000..=0x2EBEF | 0xF900..=0xFAFF => {
            Some(Script::Han)
        }
        _ => None,
    }
}

/// Detect the dominant script of a text.
///
/// Any kana makes the text Japanese even when Han characters dominate.
pub fn detect_script(text: &str) -> Script {
    let mut counts = [0usize; 7];
    let mut has_kana = false;

    for c in text.chars() {
        if let Some(script) = char_script(c) {
            if script == Script::Japanese {
                has_kana = true;
            }
            counts[script_slot(script)] += 1;
        }
    }

    let (slot, count) = counts
        .iter()
        .enumerate()
        .max_by_key(|(slot, count)| (**count, std::cmp::Reverse(*slot)))
        .map(|(slot, count)| (slot, *count))
        .unwrap_or((0, 0));

    if count == 0 {
        return Script::Common;
    }

    let script = SLOTS[slot];
    if has_kana && script == Script::Han {
        Script::Japanese
    } else {
        script
    }
}

const SLOTS: [Script; 7] = [
    Script::Latin,
    Script::Cyrillic,
    Script::Arabic,
    Script::Hebrew,
    Script::Han,
    Script::Japanese,
    Script::Korean,
];

fn script_slot(script: Script) -> usize {
    SLOTS.iter().position(|s| *s == script).unwrap_or(0)
}

/// Check if character is from a script that doesn't use word spaces.
/// Chinese and Japanese don't use spaces between words, but Korean does.
pub fn is_spaceless_script_char(c: char) -> bool {
    let code = c as u32;

    (0x4E00..=0x9FFF).contains(&code)
        || (0x3400..=0x4DBF).contains(&code)
        || (0x20000..=0x2EBEF).contains(&code)
        || (0x3040..=0x309F).contains(&code)
        || (0x30A0..=0x30FF).contains(&code)
        || (0x3000..=0x303F).contains(&code)
}

/// Convert visually ordered right-to-left text into logical order.
///
/// Positional extraction emits glyphs left to right. Reversing restores the
/// logical order of right-to-left letters; embedded runs of left-to-right
/// letters and digits are then reversed back so they read forwards.
pub fn visual_to_logical(text: &str) -> String {
    let reversed: Vec<char> = text.chars().rev().collect();
    let mut result = String::with_capacity(text.len());
    let mut ltr_run: Vec<char> = Vec::new();

    for c in reversed {
        if is_ltr_char(c) || (!ltr_run.is_empty() && is_number_separator(c)) {
            ltr_run.push(c);
            continue;
        }
        flush_ltr_run(&mut ltr_run, &mut result);
        result.push(mirror_bracket(c));
    }
    flush_ltr_run(&mut ltr_run, &mut result);

    result
}

fn is_ltr_char(c: char) -> bool {
    matches!(bidi_class(c), BidiClass::L | BidiClass::EN | BidiClass::AN)
}

fn is_number_separator(c: char) -> bool {
    matches!(bidi_class(c), BidiClass::CS | BidiClass::ES)
}

fn flush_ltr_run(run: &mut Vec<char>, out: &mut String) {
    // A separator can only sit between two LTR characters.
    let trailing: Vec<char> = {
        let mut t = Vec::new();
        while run.last().is_some_and(|c| is_number_separator(*c)) {
            if let Some(c) = run.pop() {
                t.push(c);
            }
        }
        t
    };
    out.extend(run.drain(..).rev());
    out.extend(trailing);
}

fn mirror_bracket(c: char) -> char {
    match c {
        '(' => ')',
        ')' => '(',
        '[' => ']',
        ']' => '[',
        '{' => '}',
        '}' => '{',
        '<' => '>',
        '>' => '<',
        _ => c,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_script_samples() {
        assert_eq!(detect_script("Introduction"), Script::Latin);
        assert_eq!(detect_script("Einführung"), Script::Latin);
        assert_eq!(detect_script("Введение"), Script::Cyrillic);
        assert_eq!(detect_script("مقدمة"), Script::Arabic);
        assert_eq!(detect_script("מבוא"), Script::Hebrew);
        assert_eq!(detect_script("第一章 概述"), Script::Han);
        assert_eq!(detect_script("はじめに"), Script::Japanese);
        assert_eq!(detect_script("第1章 はじめに"), Script::Japanese);
        assert_eq!(detect_script("제1장 서론"), Script::Korean);
        assert_eq!(detect_script("1.2.3"), Script::Common);
        assert_eq!(detect_script(""), Script::Common);
    }

    #[test]
    fn test_script_properties() {
        assert!(Script::Arabic.is_rtl());
        assert!(Script::Hebrew.is_rtl());
        assert!(!Script::Latin.is_rtl());
        assert!(Script::Korean.is_cjk());
        assert!(Script::Latin.is_cased());
        assert!(!Script::Han.is_cased());
        assert!(Script::Cyrillic.languages().contains(&Language::Russian));
        assert!(Script::Latin.languages().contains(&Language::German));
    }

    #[test]
    fn test_spaceless_chars() {
        assert!(is_spaceless_script_char('中'));
        assert!(is_spaceless_script_char('の'));
        assert!(!is_spaceless_script_char('한'));
        assert!(!is_spaceless_script_char('a'));
    }

    #[test]
    fn test_visual_to_logical_arabic_with_number() {
        // "فصل 12" rendered left to right
        let visual = "12 لصف";
        assert_eq!(visual_to_logical(visual), "فصل 12");
    }

    #[test]
    fn test_visual_to_logical_keeps_latin_words() {
        // "ملف PDF" rendered left to right
        let visual = "PDF فلم";
        assert_eq!(visual_to_logical(visual), "ملف PDF");
    }

    #[test]
    fn test_visual_to_logical_decimal_number() {
        let visual = "1.2 مسق";
        assert_eq!(visual_to_logical(visual), "قسم 1.2");
    }
}
