//! Range expression translation.
//!
//! A range is split into a delimiter-preserving token stream and scanned left
//! to right. Two pieces of state travel across tokens: the modifier waiting for
//! its atom (`~`, `^`, a leading `=`, or the partial right side of a hyphen
//! range) and the explicit comparator (`<`/`>`) seen before the atom. Both are
//! cleared once an atom is finalized.

use lazy_static::lazy_static;
use regex::Regex;

use super::caret::expand_caret;
use super::version::{convert_version, replace_alias, Comparator};
use super::{has_wildcard, leading_int, replace_wildcards};

lazy_static! {
    static ref VERSION_PREFIX_RE: Regex = Regex::new(r"[vV](\d+)").unwrap();

    // The hyphen marker has to win over the bare space
    static ref TOKEN_RE: Regex = Regex::new(r" - |<|>|=|\|\||[ ]|,|~|\^").unwrap();
}

/// Operators that bind to the atom following them
const TIGHT_OPERATORS: [&str; 7] = ["<", ">", "=", "~", "^", "||", "&&"];

/// Modifier waiting for the next atom
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum Modifier {
    #[default]
    None,
    Tilde,
    Caret,
    /// `=` as the first token of the range
    Equal,
    /// Right side of a hyphen range that is missing components
    PartialUpperBound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct TranslationState {
    pub modifier: Modifier,
    pub comparator: Option<Comparator>,
}

impl TranslationState {
    /// A tilde followed by an explicit comparator expresses both bounds itself
    fn tilde_with_comparator(&self) -> bool {
        self.modifier == Modifier::Tilde && self.comparator.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Token<'a> {
    Hyphen,
    /// Empty text, `<`, `>`, `=` (past the first token) and `,`
    Separator(&'a str),
    Tilde,
    Equal,
    Caret,
    Space,
    Or,
    Atom(&'a str),
}

impl<'a> Token<'a> {
    fn classify(raw: &'a str, first: bool) -> Self {
        match raw {
            " - " => Token::Hyphen,
            "=" if first => Token::Equal,
            "" | "<" | ">" | "=" | "," => Token::Separator(raw),
            "~" => Token::Tilde,
            "^" => Token::Caret,
            " " => Token::Space,
            "||" => Token::Or,
            _ => Token::Atom(raw),
        }
    }
}

/// Translate an npm/bower range expression into a Composer constraint
pub fn convert_range(range: &str) -> String {
    let cleaned = clean_range(&range.to_lowercase());
    let tokens = tokenize(&cleaned);

    let mut translation = RangeTranslation::new(&tokens);
    translation.run();
    let converted = translation.output.concat();

    log::trace!("Converted range \"{}\" to \"{}\"", range, converted);
    converted
}

fn clean_range(range: &str) -> String {
    let mut range = range.to_string();
    for operator in TIGHT_OPERATORS {
        range = range.replace(&format!("{} ", operator), operator);
    }

    let range = VERSION_PREFIX_RE.replace_all(&range, "${1}");
    range.replace(" ||", "||").replace(" &&", ",").replace("&&", ",")
}

/// Split on every delimiter, keeping the delimiters and the (possibly empty)
/// text between them
pub(crate) fn tokenize(range: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut last = 0;

    for delimiter in TOKEN_RE.find_iter(range) {
        tokens.push(&range[last..delimiter.start()]);
        tokens.push(delimiter.as_str());
        last = delimiter.end();
    }
    tokens.push(&range[last..]);

    tokens
}

struct RangeTranslation<'a> {
    tokens: &'a [&'a str],
    output: Vec<String>,
    state: TranslationState,
}

impl<'a> RangeTranslation<'a> {
    fn new(tokens: &'a [&'a str]) -> Self {
        RangeTranslation {
            tokens,
            output: tokens.iter().map(|token| token.to_string()).collect(),
            state: TranslationState::default(),
        }
    }

    fn run(&mut self) {
        let mut first = true;

        for i in 0..self.tokens.len() {
            let raw = self.tokens[i];
            let token = Token::classify(raw, first);
            if !raw.is_empty() {
                first = false;
            }

            match token {
                Token::Hyphen => self.hyphen(i),
                Token::Separator(separator) => self.separator(i, separator),
                Token::Tilde => self.state.modifier = Modifier::Tilde,
                Token::Equal => self.consume_modifier(i, Modifier::Equal),
                Token::Caret => self.consume_modifier(i, Modifier::Caret),
                Token::Space => self.output[i] = ",".to_string(),
                Token::Or => self.output[i] = "|".to_string(),
                Token::Atom(atom) => self.atom(i, atom),
            }
        }
    }

    /// `A - B`: the left atom becomes the lower bound, the marker the upper comparator
    fn hyphen(&mut self, i: usize) {
        if i > 0 {
            let lower = replace_wildcards(&self.output[i - 1], "0");
            self.output[i - 1] = format!(">={}", lower);
        }

        let upper = self.tokens.get(i + 1).copied().unwrap_or("");
        if upper.contains('.') && !has_wildcard(upper) {
            self.output[i] = ",<=".to_string();
        } else {
            self.output[i] = ",<".to_string();
            self.state.modifier = Modifier::PartialUpperBound;
        }
    }

    fn separator(&mut self, i: usize, separator: &str) {
        if let Some(comparator) = Comparator::from_token(separator) {
            self.state.comparator = Some(comparator);
        }
        if self.state.tilde_with_comparator() {
            self.output[i].clear();
        }
    }

    fn consume_modifier(&mut self, i: usize, modifier: Modifier) {
        self.state.modifier = modifier;
        self.output[i].clear();
    }

    fn atom(&mut self, i: usize, atom: &str) {
        if self.state.modifier == Modifier::Caret {
            self.output[i] = expand_caret(atom);
            self.state.modifier = Modifier::None;
            return;
        }

        let atom = match self.state.modifier {
            Modifier::PartialUpperBound => bump_partial_upper_bound(atom),
            Modifier::None if i == 0 && !atom.contains('.') && is_numeric(atom) => {
                // A lone leading major version means `~major` unless it opens a hyphen range
                if self.tokens.get(i + 1) == Some(&" - ") {
                    atom.to_string()
                } else {
                    format!("~{}", atom)
                }
            }
            Modifier::Tilde => replace_wildcards(atom, "0"),
            _ => atom.to_string(),
        };

        self.output[i] = finalize_atom(&atom, self.state);
        self.state = TranslationState::default();
    }
}

/// Normalize an atom and apply the pending comparator to it
fn finalize_atom(atom: &str, state: TranslationState) -> String {
    let mut converted = convert_version(Some(atom));

    if let Some(comparator) = state.comparator {
        converted = replace_alias(&converted, comparator);
        if state.modifier == Modifier::Tilde {
            converted = format!("{},{}{}", converted, comparator.as_str(), converted);
        }
    }

    converted
}

/// Exclusive upper bound of a partial hyphen right side: `2.3.x` -> `2.4.0`, `2` -> `3.0`
fn bump_partial_upper_bound(atom: &str) -> String {
    let mut atom = atom.to_string();
    if !atom.contains('.') {
        atom.push_str(".x");
    }

    let mut components: Vec<String> = atom.split('.').map(str::to_string).collect();
    let change = components.len() - 2;
    components[change] = leading_int(&components[change]).saturating_add(1).to_string();

    replace_wildcards(&components.join("."), "0")
}

/// Loose numeric check for a bare integer atom (optional sign and exponent)
fn is_numeric(value: &str) -> bool {
    let value = value.trim_start();
    let value = value.strip_prefix(|c: char| c == '+' || c == '-').unwrap_or(value);
    let (mantissa, exponent) = match value.find(|c: char| c == 'e' || c == 'E') {
        Some(pos) => (&value[..pos], Some(&value[pos + 1..])),
        None => (value, None),
    };

    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    all_digits(mantissa)
        && exponent.map_or(true, |exp| {
            all_digits(exp.strip_prefix(|c: char| c == '+' || c == '-').unwrap_or(exp))
        })
}
