//! Multilingual pattern tables.
//!
//! Keyword, month and warning-word tables for nine languages together with
//! the compiled regular expressions built from them. The tables are built
//! once per process behind [`PatternTables::shared`] and are read-only
//! afterwards; pipeline stages receive them by reference.

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::LazyLock;

use regex::{Regex, RegexSet};

use crate::script::{Language, Script};

/// Category of a section keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordClass {
    /// "Part", "Section", "Teil", "部".
    Part,
    /// "Chapter", "Kapitel", "第3章", "제2장".
    Chapter,
    /// "Appendix", "Annexe", "付録".
    Appendix,
    /// Whole-line front/back matter: "Introduction", "Conclusion", "References".
    Matter,
    /// "Table of Contents", "目次".
    Contents,
}

impl KeywordClass {
    /// Outline depth implied by the keyword.
    pub fn depth(self) -> u8 {
        match self {
            KeywordClass::Appendix => 2,
            _ => 1,
        }
    }
}

/// Raw word lists for one language.
struct LanguageTable {
    language: Language,
    part: &'static [&'static str],
    chapter: &'static [&'static str],
    appendix: &'static [&'static str],
    matter: &'static [&'static str],
    contents: &'static [&'static str],
    months: &'static [&'static str],
    warnings: &'static [&'static str],
}

const TABLES: [LanguageTable; 9] = [
    LanguageTable {
        language: Language::English,
        part: &["part", "section"],
        chapter: &["chapter", "chap."],
        appendix: &["appendix", "annex"],
        matter: &[
            "introduction", "conclusion", "conclusions", "summary", "references",
            "bibliography", "acknowledgements", "acknowledgments", "abstract", "preface",
            "overview", "background",
        ],
        contents: &["table of contents", "contents"],
        months: &[
            "january", "february", "march", "april", "may", "june", "july", "august",
            "september", "october", "november", "december", "jan", "feb", "mar", "apr",
            "jun", "jul", "aug", "sep", "sept", "oct", "nov", "dec",
        ],
        warnings: &["required", "must", "mandatory", "warning", "notice", "please", "attention"],
    },
    LanguageTable {
        language: Language::Spanish,
        part: &["parte", "sección"],
        chapter: &["capítulo"],
        appendix: &["apéndice", "anexo"],
        matter: &["introducción", "conclusión", "conclusiones", "resumen", "referencias", "bibliografía"],
        contents: &["índice", "contenido", "tabla de contenidos"],
        months: &[
            "enero", "febrero", "marzo", "abril", "mayo", "junio", "julio", "agosto",
            "septiembre", "octubre", "noviembre", "diciembre",
        ],
        warnings: &["requerido", "obligatorio", "advertencia", "aviso", "atención"],
    },
    LanguageTable {
        language: Language::French,
        part: &["partie", "section"],
        chapter: &["chapitre"],
        appendix: &["annexe", "appendice"],
        matter: &["introduction", "conclusion", "résumé", "synthèse", "références", "bibliographie", "avant-propos"],
        contents: &["table des matières", "sommaire"],
        months: &[
            "janvier", "février", "mars", "avril", "mai", "juin", "juillet", "août",
            "septembre", "octobre", "novembre", "décembre",
        ],
        warnings: &["requis", "obligatoire", "avertissement", "avis"],
    },
    LanguageTable {
        language: Language::German,
        part: &["teil", "abschnitt"],
        chapter: &["kapitel"],
        appendix: &["anhang", "anlage"],
        matter: &["einführung", "einleitung", "vorwort", "zusammenfassung", "fazit", "literatur", "literaturverzeichnis", "quellen"],
        contents: &["inhaltsverzeichnis", "inhalt"],
        months: &[
            "januar", "februar", "märz", "april", "mai", "juni", "juli", "august",
            "september", "oktober", "november", "dezember",
        ],
        warnings: &["erforderlich", "pflicht", "warnung", "hinweis", "achtung"],
    },
    LanguageTable {
        language: Language::Russian,
        part: &["часть", "раздел"],
        chapter: &["глава"],
        appendix: &["приложение", "дополнение"],
        matter: &["введение", "предисловие", "заключение", "выводы", "резюме", "литература", "библиография"],
        contents: &["содержание", "оглавление"],
        months: &[
            "январь", "февраль", "март", "апрель", "май", "июнь", "июль", "август",
            "сентябрь", "октябрь", "ноябрь", "декабрь", "января", "февраля", "марта",
            "апреля", "мая", "июня", "июля", "августа", "сентября", "октября", "ноября",
            "декабря",
        ],
        warnings: &["обязательно", "необходимо", "предупреждение", "уведомление", "внимание"],
    },
    LanguageTable {
        language: Language::Arabic,
        part: &["جزء", "الجزء", "قسم", "القسم"],
        chapter: &["فصل", "الفصل", "باب", "الباب"],
        appendix: &["ملحق", "الملحق", "مرفق"],
        matter: &["مقدمة", "المقدمة", "تمهيد", "خاتمة", "الخاتمة", "ملخص", "الملخص", "مراجع", "المراجع", "مصادر"],
        contents: &["فهرس المحتويات", "المحتويات", "فهرس"],
        months: &[
            "يناير", "فبراير", "مارس", "أبريل", "مايو", "يونيو", "يوليو", "أغسطس",
            "سبتمبر", "أكتوبر", "نوفمبر", "ديسمبر",
        ],
        warnings: &["مطلوب", "إجباري", "تحذير", "إشعار", "انتباه"],
    },
    LanguageTable {
        language: Language::Chinese,
        part: &["部分"],
        chapter: &["章节", "章節"],
        appendix: &["附录", "附錄", "附件"],
        matter: &["介绍", "介紹", "序言", "导言", "導言", "概述", "结论", "結論", "总结", "總結", "参考文献", "參考文獻"],
        contents: &["目录", "目錄"],
        months: &[
            "一月", "二月", "三月", "四月", "五月", "六月", "七月", "八月", "九月", "十月",
            "十一月", "十二月",
        ],
        warnings: &["必需", "必须", "必須", "注意", "警告", "通知", "强制", "強制"],
    },
    LanguageTable {
        language: Language::Japanese,
        part: &["パート"],
        chapter: &["チャプター"],
        appendix: &["付録", "別添", "参考資料"],
        matter: &["はじめに", "序論", "概要", "まえがき", "結論", "まとめ", "おわりに", "参考文献"],
        contents: &["目次", "もくじ"],
        months: &[],
        warnings: &["必須", "注意", "警告", "お知らせ", "義務"],
    },
    LanguageTable {
        language: Language::Korean,
        part: &[],
        chapter: &["챕터"],
        appendix: &["부록", "첨부", "참고자료"],
        matter: &["서론", "개요", "머리말", "결론", "요약", "맺음말", "참고문헌"],
        contents: &["목차", "차례"],
        months: &[],
        warnings: &["필수", "주의", "경고", "알림", "의무"],
    },
];

/// Compiled patterns for one language.
struct LanguagePatterns {
    /// "Part 2", "Chapter IV: Methods", "Appendix A - Data".
    sectioned: Vec<(KeywordClass, Regex)>,
    /// Whole-line matter and contents headings, optionally numbered.
    whole_line: Vec<(KeywordClass, Regex)>,
    /// Dates written with month names.
    month_date: Option<Regex>,
    /// Instruction and warning vocabulary.
    warning: Option<Regex>,
}

/// Process-wide, read-only pattern tables.
pub struct PatternTables {
    languages: HashMap<Language, LanguagePatterns>,
    numbered: Regex,
    lettered: Regex,
    roman: Regex,
    cjk_chapter: Regex,
    korean_chapter: Regex,
    toc_entry: Regex,
    list_marker: Regex,
    numeric_date: RegexSet,
    form_noise: RegexSet,
    caps_instruction: Regex,
    trailing_function_word: Regex,
    space_before_punct: Regex,
    split_capital: Regex,
}

static SHARED: LazyLock<PatternTables> = LazyLock::new(PatternTables::build);

/// Marker that starts a list item, as matched by [`PatternTables::list_marker`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListMarker {
    /// A bullet glyph such as "•" or "-".
    Bullet(char),
    /// Numeric marker with its components, e.g. `[2]` for "2." or `[1, 3]` for "1.3".
    Number(Vec<u32>),
    /// Single-letter marker ("a)", "B.").
    Letter(char),
    /// Lower or upper case Roman numeral marker with its value.
    Roman(u32),
}

impl ListMarker {
    /// Whether `next` directly follows `self` in a list sequence.
    pub fn is_followed_by(&self, next: &ListMarker) -> bool {
        match (self, next) {
            (ListMarker::Bullet(a), ListMarker::Bullet(b)) => a == b,
            (ListMarker::Number(a), ListMarker::Number(b)) => {
                a.len() == b.len()
                    && a[..a.len() - 1] == b[..b.len() - 1]
                    && a.last().map(|v| v + 1) == b.last().copied()
            }
            (ListMarker::Letter(a), ListMarker::Letter(b)) => {
                (*a as u32) + 1 == *b as u32
            }
            (ListMarker::Roman(a), ListMarker::Roman(b)) => a + 1 == *b,
            // "i." and "v." parse as letters; they still continue a Roman sequence
            (ListMarker::Letter(a), ListMarker::Roman(b)) => {
                roman_value(&a.to_string()).is_some_and(|v| v + 1 == *b)
            }
            (ListMarker::Roman(a), ListMarker::Letter(b)) => {
                roman_value(&b.to_string()).is_some_and(|v| *a + 1 == v)
            }
            _ => false,
        }
    }
}

/// A numbered heading prefix: depth and the text after the number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Numbering {
    /// Number of components: "1" → 1, "1.1" → 2, "1.1.1" → 3.
    pub depth: u8,
    /// Whether this is a lettered or Roman marker rather than digits.
    pub alphabetic: bool,
}

impl PatternTables {
    /// The tables shared by every worker in the process.
    pub fn shared() -> &'static PatternTables {
        &SHARED
    }

    fn build() -> Self {
        let languages = TABLES
            .iter()
            .map(|table| (table.language, compile_language(table)))
            .collect();

        Self {
            languages,
            numbered: compile(r"^(\d{1,3}(?:\.\d{1,3}){0,5})\.?\s+(\S)"),
            lettered: compile(r"^([A-H])[.)]\s+(\p{Lu})"),
            roman: compile(r"^((?:X{0,3})(?:IX|IV|V?I{0,3}))[.)]\s+(\p{Lu})"),
            cjk_chapter: compile(
                r"^第\s*[0-9０-９一二三四五六七八九十百千零〇]+\s*[章部節节編编篇]",
            ),
            korean_chapter: compile(r"^제\s*[0-9]+\s*[장부편절]"),
            toc_entry: compile(
                r"^(.+?)\s*(?:(?:[.·•…_\-–]\s?){2,}|\t+|\s{3,})\s*(\d{1,4}|[ivxlcdm]{1,6})\s*$",
            ),
            list_marker: compile(
                r"^\s*(?:(?P<bullet>[•·▪▫■□○●◦‣⁃・※►▶➤\-*+–])|(?P<num>\d{1,3}(?:\.\d{1,3})*)[.)]?|(?P<letter>[a-zA-Z])[.)]|\(?(?P<paren>[a-zA-Z0-9]{1,3})\)|(?P<roman>[ivxlcdm]{1,6}|[IVXLCDM]{1,6})[.)])\s+\S",
            ),
            numeric_date: compile_set(&[
                r"^\d{1,2}[/.\-]\d{1,2}[/.\-]\d{2,4}\.?$",
                r"^\d{4}[/.\-]\d{1,2}[/.\-]\d{1,2}\.?$",
                r"^\d{4}\s*年\s*\d{1,2}\s*月(?:\s*\d{1,2}\s*日)?$",
                r"^\d{1,2}\s*月\s*\d{1,2}\s*日$",
                r"^\d{4}\s*년\s*\d{1,2}\s*월(?:\s*\d{1,2}\s*일)?$",
            ]),
            form_noise: compile_set(&[
                // blank fill-ins and separators
                r"^[_\-–—.\s]{3,}$",
                r"_{3,}",
                r"\.{5,}",
                // field labels
                r"(?i)^\s*(?:RSVP|Name|Date|Time|Phone|Tel|Fax|E-?mail|Address|Sign|Signature|Age|Place|Designation|Relationship|Amount|Details?)\s*[:：]?\s*[_\-]*\s*$",
                r"^\s*(?:名前|日付|時間|電話|メール|住所|署名|年齢|姓名|日期|时间|电话|邮箱|地址|签名|年龄|이름|날짜|전화|주소|서명)\s*[:：]?\s*[_\-]*\s*$",
                r"(?i)^\s*(?:Signature\s+of\s+\w+|署名者|签名者)",
                // option lines and serial-number headers
                r"(?i)^\s*(?:Yes|No|Maybe|N/?A|はい|いいえ|是|否)\s*[:：]?\s*$",
                r"(?i)^(?:S\.?\s?No\.?|Sl\.?\s?No\.?|Sr\.?\s?No\.?|Serial\s*No\.?|Serial\s*Number|番号|序号)\s*[:：]?\s*$",
                // numbered form fields
                r"(?i)^\d+\.\s*(?:Amount|Name|Address|Details?|Signature|Designation|金額|名前|住所|詳細|署名|金额|姓名|地址|详情|签名)\b",
                // web and e-mail
                r"(?i)https?://|\bwww\.|\.(?:com|org|net|edu|gov)\b",
                r"[\w.+\-]+@[\w\-]+\.[\w.]+",
                // street addresses
                r"(?i)^\d+\s+[\p{L}\s.]+\b(?:street|st|avenue|ave|road|rd|drive|dr|lane|ln|parkway|pkwy|boulevard|blvd|way|court|ct)\b\.?(?:,|\s*$|\s+\d)",
                r"^[A-Z]{2}\s+\d{5}(?:-\d{4})?$",
                r"^[A-Z][a-z]+(?:\s+[A-Z][a-z]+)*,\s*[A-Z]{2}\s+\d{5}(?:-\d{4})?$",
                r"(?i)^(?:Suite|Ste|Apt|Unit|Building|Bldg|Floor|P\.?O\.?\s*Box)\b.*\d+",
                r"\d+\s*(?:丁目|番地|号室)",
                // page furniture
                r"(?i)^(?:page\s+)?\d+\s*(?:/|of)\s*\d+$",
                r"^\d{1,4}$",
            ]),
            caps_instruction: compile(r"^[\p{Lu}\s,'’]+\b(?:REQUIRED|MUST|SHOULD|PLEASE|VISIT)\b"),
            trailing_function_word: compile(
                r"(?i)\s(?:and|or|of|in|to|for|with|by|at|on|the|an|und|oder|der|die|das|et|ou|de|du|des|la|le|el|los|las|del|и|или|в|на|с|к)$",
            ),
            space_before_punct: compile(r"\s+([!?.,;:])"),
            // "Y ou" → "You"; a standalone "A" or "I" is a real word.
            split_capital: compile(r"(^|\s)([B-HJ-Z])\s([a-z]{2,})\b"),
        }
    }

    /// Remove whitespace in front of closing punctuation.
    pub fn tighten_punctuation<'t>(&self, text: &'t str) -> Cow<'t, str> {
        self.space_before_punct.replace_all(text, "$1")
    }

    /// Rejoin a capital letter split from the rest of its word ("Y ou").
    pub fn repair_split_capitals<'t>(&self, text: &'t str) -> Cow<'t, str> {
        self.split_capital.replace_all(text, "$1$2$3")
    }

    /// Match a numbered heading prefix ("1", "1.1", "A.", "IV.").
    ///
    /// Digits must be followed by a capital letter or an uncased letter, so
    /// "3 apples" is not a heading but "3 Results" and "3 結果" are.
    pub fn numbering(&self, text: &str) -> Option<Numbering> {
        if let Some(caps) = self.numbered.captures(text) {
            let number = caps.get(1)?.as_str();
            let next = caps.get(2)?.as_str().chars().next()?;
            if next.is_uppercase() || (next.is_alphabetic() && !next.is_lowercase()) {
                let depth = number.split('.').filter(|p| !p.is_empty()).count();
                return Some(Numbering {
                    depth: depth.min(u8::MAX as usize) as u8,
                    alphabetic: false,
                });
            }
            return None;
        }

        if self.lettered.is_match(text) {
            return Some(Numbering {
                depth: 1,
                alphabetic: true,
            });
        }

        if let Some(caps) = self.roman.captures(text) {
            if caps.get(1).is_some_and(|m| !m.as_str().is_empty()) {
                return Some(Numbering {
                    depth: 1,
                    alphabetic: true,
                });
            }
        }

        None
    }

    /// Match a section keyword for text in the given script.
    pub fn keyword(&self, text: &str, script: Script) -> Option<KeywordClass> {
        let trimmed = text.trim();
        if self.cjk_chapter.is_match(trimmed) || self.korean_chapter.is_match(trimmed) {
            return Some(KeywordClass::Chapter);
        }

        let lower = trimmed.to_lowercase();
        for language in script.languages() {
            let Some(patterns) = self.languages.get(language) else {
                continue;
            };
            for (class, regex) in patterns.whole_line.iter().chain(&patterns.sectioned) {
                if regex.is_match(&lower) {
                    return Some(*class);
                }
            }
        }
        None
    }

    /// Whether a line is a table-of-contents entry: label, leader, page number.
    pub fn is_toc_entry(&self, text: &str) -> bool {
        self.toc_entry.is_match(text.trim())
    }

    /// Extract the list marker at the start of a line.
    pub fn list_marker(&self, text: &str) -> Option<ListMarker> {
        let caps = self.list_marker.captures(text)?;

        if let Some(m) = caps.name("bullet") {
            return m.as_str().chars().next().map(ListMarker::Bullet);
        }
        if let Some(m) = caps.name("num") {
            let parts: Option<Vec<u32>> = m.as_str().split('.').map(|p| p.parse().ok()).collect();
            return parts.map(ListMarker::Number);
        }
        if let Some(m) = caps.name("roman") {
            if let Some(value) = roman_value(m.as_str()) {
                return Some(ListMarker::Roman(value));
            }
        }
        if let Some(m) = caps.name("letter") {
            return m
                .as_str()
                .chars()
                .next()
                .map(|c| ListMarker::Letter(c.to_ascii_lowercase()));
        }
        if let Some(m) = caps.name("paren") {
            let s = m.as_str();
            if let Ok(n) = s.parse::<u32>() {
                return Some(ListMarker::Number(vec![n]));
            }
            let mut chars = s.chars();
            if let (Some(c), None) = (chars.next(), chars.next()) {
                return Some(ListMarker::Letter(c.to_ascii_lowercase()));
            }
            return roman_value(s).map(ListMarker::Roman);
        }
        None
    }

    /// Whether a line is a date written in any supported language.
    pub fn is_date(&self, text: &str, script: Script) -> bool {
        let trimmed = text.trim();
        if self.numeric_date.is_match(trimmed) {
            return true;
        }
        let lower = trimmed.to_lowercase();
        script.languages().iter().any(|language| {
            self.languages
                .get(language)
                .and_then(|p| p.month_date.as_ref())
                .is_some_and(|r| r.is_match(&lower))
        })
    }

    /// Whether a line looks like a form field, address, URL or similar placeholder.
    pub fn is_form_noise(&self, text: &str) -> bool {
        self.form_noise.is_match(text.trim())
    }

    /// Whether a line is an instruction or warning rather than a heading.
    ///
    /// Long lines containing warning vocabulary and all-caps imperatives
    /// ("PLEASE VISIT ...") qualify; a short "Important Notice" does not.
    pub fn is_instruction(&self, text: &str, script: Script) -> bool {
        let trimmed = text.trim();
        if self.caps_instruction.is_match(trimmed) {
            return true;
        }

        let long = trimmed.chars().count() > 60 || trimmed.split_whitespace().count() > 8;
        let sentence = trimmed.ends_with(['.', '!', '。', '！']);
        if !(long || sentence) {
            return false;
        }

        let lower = trimmed.to_lowercase();
        script.languages().iter().any(|language| {
            self.languages
                .get(language)
                .and_then(|p| p.warning.as_ref())
                .is_some_and(|r| r.is_match(&lower))
        })
    }

    /// Whether a line ends with a conjunction, article or preposition.
    pub fn ends_with_function_word(&self, text: &str) -> bool {
        self.trailing_function_word.is_match(text.trim_end())
    }
}

fn compile_language(table: &LanguageTable) -> LanguagePatterns {
    let mut sectioned = Vec::new();
    for (class, words) in [
        (KeywordClass::Part, table.part),
        (KeywordClass::Chapter, table.chapter),
        (KeywordClass::Appendix, table.appendix),
    ] {
        if words.is_empty() {
            continue;
        }
        // keyword, one identifier token, optional ":" or "-" and a title
        let pattern = format!(
            r"^(?:{})(?:\s+(?:[0-9]+(?:\.[0-9]+)*|\p{{L}}+))?\s*(?:[:.\-–—]\s*.*)?$",
            alternation(words)
        );
        sectioned.push((class, compile(&pattern)));
    }

    let mut whole_line = Vec::new();
    for (class, words) in [
        (KeywordClass::Contents, table.contents),
        (KeywordClass::Matter, table.matter),
    ] {
        if words.is_empty() {
            continue;
        }
        let pattern = format!(
            r"^(?:[0-9]+(?:\.[0-9]+)*\.?\s+)?(?:{})\s*[:：]?$",
            alternation(words)
        );
        whole_line.push((class, compile(&pattern)));
    }

    let month_date = (!table.months.is_empty()).then(|| {
        let months = alternation(table.months);
        compile(&format!(
            r"^(?:\d{{1,2}}\.?\s+(?:de\s+)?(?:{m})\.?,?\s+(?:de\s+)?\d{{4}}|(?:{m})\.?\s+\d{{1,2}}(?:st|nd|rd|th)?,?\s+\d{{4}}|(?:{m})\.?,?\s+\d{{4}})\.?$",
            m = months
        ))
    });

    let warning = (!table.warnings.is_empty())
        .then(|| compile(&format!(r"(?:^|\W)(?:{})(?:\W|$)", alternation(table.warnings))));

    LanguagePatterns {
        sectioned,
        whole_line,
        month_date,
        warning,
    }
}

fn alternation(words: &[&str]) -> String {
    let mut sorted: Vec<&str> = words.to_vec();
    // longest first so "table of contents" wins over "contents"
    sorted.sort_by_key(|w| std::cmp::Reverse(w.chars().count()));
    sorted
        .iter()
        .map(|w| regex::escape(w))
        .collect::<Vec<_>>()
        .join("|")
}

fn roman_value(s: &str) -> Option<u32> {
    let upper = s.to_ascii_uppercase();
    let mut total = 0u32;
    let mut prev = 0u32;
    for c in upper.chars().rev() {
        let v = match c {
            'I' => 1,
            'V' => 5,
            'X' => 10,
            'L' => 50,
            'C' => 100,
            'D' => 500,
            'M' => 1000,
            _ => return None,
        };
        if v < prev {
            total = total.checked_sub(v)?;
        } else {
            total += v;
            prev = v;
        }
    }
    (total > 0).then_some(total)
}

// Every pattern in this module is a literal checked by the unit tests below.
fn compile(pattern: &str) -> Regex {
    match Regex::new(pattern) {
        Ok(regex) => regex,
        Err(e) => panic!("invalid built-in pattern {:?}: {}", pattern, e),
    }
}

fn compile_set(patterns: &[&str]) -> RegexSet {
    match RegexSet::new(patterns) {
        Ok(set) => set,
        Err(e) => panic!("invalid built-in pattern set: {}", e),
    }
}
