//! Korean name romanization
//!
//! Revised Romanization applied syllable by syllable, without the
//! assimilation rules between syllables. Common surnames use their
//! conventional passport spellings instead (김 → Kim, 이 → Lee).

const SYLLABLE_BASE: u32 = 0xAC00;
const SYLLABLE_LAST: u32 = 0xD7A3;
const MEDIAL_COUNT: u32 = 21;
const FINAL_COUNT: u32 = 28;

const INITIALS: [&str; 19] = [
    "g", "kk", "n", "d", "tt", "r", "m", "b", "pp", "s", "ss", "", "j", "jj", "ch", "k", "t", "p",
    "h",
];

const MEDIALS: [&str; 21] = [
    "a", "ae", "ya", "yae", "eo", "e", "yeo", "ye", "o", "wa", "wae", "oe", "yo", "u", "wo", "we",
    "wi", "yu", "eu", "ui", "i",
];

const FINALS: [&str; 28] = [
    "", "k", "k", "k", "n", "n", "n", "t", "l", "k", "m", "l", "l", "l", "p", "l", "m", "p", "p",
    "t", "t", "ng", "t", "t", "k", "t", "p", "t",
];

const SURNAMES: &[(char, &str)] = &[
    ('김', "Kim"),
    ('이', "Lee"),
    ('박', "Park"),
    ('최', "Choi"),
    ('정', "Jung"),
    ('강', "Kang"),
    ('조', "Cho"),
    ('윤', "Yoon"),
    ('장', "Jang"),
    ('임', "Lim"),
    ('한', "Han"),
    ('오', "Oh"),
    ('서', "Seo"),
    ('신', "Shin"),
    ('권', "Kwon"),
    ('황', "Hwang"),
    ('안', "Ahn"),
    ('송', "Song"),
    ('류', "Ryu"),
    ('유', "Yoo"),
    ('전', "Jeon"),
    ('홍', "Hong"),
    ('고', "Ko"),
    ('문', "Moon"),
    ('양', "Yang"),
    ('손', "Son"),
    ('배', "Bae"),
    ('백', "Baek"),
    ('허', "Heo"),
    ('남', "Nam"),
    ('심', "Shim"),
    ('노', "Noh"),
    ('하', "Ha"),
    ('곽', "Kwak"),
    ('성', "Sung"),
    ('차', "Cha"),
    ('주', "Joo"),
    ('우', "Woo"),
    ('구', "Koo"),
    ('민', "Min"),
    ('진', "Jin"),
];

/// Romanize a single precomposed Hangul syllable, lowercase.
///
/// Returns `None` for anything outside U+AC00..=U+D7A3.
pub fn romanize_syllable(c: char) -> Option<String> {
    let code = c as u32;
    if !(SYLLABLE_BASE..=SYLLABLE_LAST).contains(&code) {
        return None;
    }
    let index = code - SYLLABLE_BASE;
    let initial = (index / (MEDIAL_COUNT * FINAL_COUNT)) as usize;
    let medial = ((index % (MEDIAL_COUNT * FINAL_COUNT)) / FINAL_COUNT) as usize;
    let final_ = (index % FINAL_COUNT) as usize;
    Some(format!("{}{}{}", INITIALS[initial], MEDIALS[medial], FINALS[final_]))
}

fn surname(c: char) -> Option<&'static str> {
    SURNAMES.iter().find(|(k, _)| *k == c).map(|(_, v)| *v)
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Romanize a Korean personal name as `"Surname Givenname"`.
///
/// The first syllable is treated as the surname. Non-Hangul characters are
/// kept as-is; whitespace is dropped.
///
/// ```
/// use smartcon_domain::romanize_name;
///
/// assert_eq!(romanize_name("김철수"), "Kim Cheolsu");
/// assert_eq!(romanize_name("이 영희"), "Lee Yeonghui");
/// ```
pub fn romanize_name(name: &str) -> String {
    let mut chars = name.chars().filter(|c| !c.is_whitespace());
    let Some(first) = chars.next() else {
        return String::new();
    };

    let family = match surname(first) {
        Some(s) => s.to_string(),
        None => capitalize(&romanize_syllable(first).unwrap_or_else(|| first.to_string())),
    };

    let given: String = chars
        .map(|c| romanize_syllable(c).unwrap_or_else(|| c.to_string()))
        .collect();

    if given.is_empty() {
        family
    } else {
        format!("{} {}", family, capitalize(&given))
    }
}

/// Uppercase initials of each romanized syllable, used as a company code.
///
/// ```
/// use smartcon_domain::company_abbreviation;
///
/// assert_eq!(company_abbreviation("김철수"), "KCS");
/// assert_eq!(company_abbreviation("이영희"), "LYH");
/// ```
pub fn company_abbreviation(ceo_name: &str) -> String {
    let mut out = String::new();
    for (i, c) in ceo_name.chars().filter(|c| !c.is_whitespace()).enumerate() {
        let romanized = match (i, surname(c)) {
            (0, Some(s)) => s.to_string(),
            _ => romanize_syllable(c).unwrap_or_else(|| c.to_string()),
        };
        if let Some(initial) = romanized.chars().find(char::is_ascii_alphanumeric) {
            out.push(initial.to_ascii_uppercase());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syllable_decomposition() {
        assert_eq!(romanize_syllable('가').as_deref(), Some("ga"));
        assert_eq!(romanize_syllable('힣').as_deref(), Some("hit"));
        assert_eq!(romanize_syllable('철').as_deref(), Some("cheol"));
        assert_eq!(romanize_syllable('영').as_deref(), Some("yeong"));
        assert_eq!(romanize_syllable('A'), None);
    }

    #[test]
    fn test_unknown_surname_falls_back_to_syllable() {
        assert_eq!(romanize_name("탁민수"), "Tak Minsu");
    }

    #[test]
    fn test_single_syllable_and_empty() {
        assert_eq!(romanize_name("박"), "Park");
        assert_eq!(romanize_name("   "), "");
    }

    #[test]
    fn test_abbreviation_skips_symbols_keeps_latin() {
        assert_eq!(company_abbreviation("박 지성"), "PJS");
        assert_eq!(company_abbreviation("최J-민"), "CJM");
        assert_eq!(company_abbreviation(""), "");
    }

    #[test]
    fn test_abbreviation_for_vowel_initial_syllable() {
        // 은 has a silent initial, so the vowel supplies the letter.
        assert_eq!(company_abbreviation("김은아"), "KEA");
    }
}
