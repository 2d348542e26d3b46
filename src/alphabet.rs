use rand::Rng;

pub const ALPHABET_LEN: usize = 26;

/// Which half of the alphabet a round is drawn from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum LetterCase {
    Upper,
    Lower,
}

impl LetterCase {
    /// Fair coin flip. Independent of the case-sensitive setting, which only
    /// affects how answers are compared.
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        if rng.gen_bool(0.5) {
            LetterCase::Upper
        } else {
            LetterCase::Lower
        }
    }

    pub fn of(c: char) -> Option<Self> {
        if c.is_ascii_uppercase() {
            Some(LetterCase::Upper)
        } else if c.is_ascii_lowercase() {
            Some(LetterCase::Lower)
        } else {
            None
        }
    }
}

/// The 26 letters of the requested case, in alphabetical order
pub fn letters(case: LetterCase) -> [char; ALPHABET_LEN] {
    let base = match case {
        LetterCase::Upper => b'A',
        LetterCase::Lower => b'a',
    };
    std::array::from_fn(|i| (base + i as u8) as char)
}

/// Letter at `index` (wrapped into 0..26)
pub fn letter_at(case: LetterCase, index: usize) -> char {
    letters(case)[index % ALPHABET_LEN]
}

/// Compare two letters, folding case unless `case_sensitive` is set
pub fn letters_match(a: char, b: char, case_sensitive: bool) -> bool {
    if case_sensitive {
        a == b
    } else {
        a.eq_ignore_ascii_case(&b)
    }
}
