//! Ingredient matching against free-text video titles and descriptions.
//!
//! [`AliasTable::matches`] tries five strategies in order and stops at the
//! first hit:
//!
//! 1. case-folded substring (`"soy sauce"` in `"Easy Soy Sauce Noodles"`),
//! 2. space-stripped substring (`"soy sauce"` in `"soysauce"`),
//! 3. compound words: both words of a two-word term present anywhere,
//! 4. alias spellings, checked in both directions and space-stripped,
//! 5. edit-distance fuzzy match for single-word terms of four or more letters.
//!
//! Multi-word terms and multi-word aliases never take the fuzzy path.

use std::collections::HashMap;
use std::sync::LazyLock;

use flavorpulse_core::AliasEntry;
use regex::Regex;

use crate::types::normalize_term;

/// Built-in spelling variants keyed by canonical ingredient name.
///
/// Covers transliterations (Korean, Japanese, Arabic), British/American
/// naming differences, and common misspellings seen in video titles.
pub(crate) const BUILTIN_ALIASES: &[(&str, &[&str])] = &[
    ("gochujang", &["kochujang", "gochu jang", "korean chili paste"]),
    ("gochugaru", &["kochukaru", "korean chili flakes", "korean red pepper flakes"]),
    ("doenjang", &["daenjang", "doenjjang", "korean soybean paste"]),
    ("kimchi", &["kimchee", "gimchi"]),
    ("soy sauce", &["shoyu", "soya sauce"]),
    ("miso", &["miso paste"]),
    ("matcha", &["maccha", "green tea powder"]),
    ("sriracha", &["siracha", "sirracha"]),
    ("za'atar", &["zaatar", "zatar", "zahtar"]),
    ("harissa", &["hrissa"]),
    ("tahini", &["tahina", "tahineh"]),
    ("ghee", &["clarified butter"]),
    ("paneer", &["panir"]),
    ("tofu", &["bean curd", "doufu"]),
    ("cilantro", &["coriander leaves", "fresh coriander"]),
    ("scallion", &["green onion", "spring onion"]),
    ("chickpea", &["garbanzo", "chick pea", "chana"]),
    ("eggplant", &["aubergine", "brinjal"]),
    ("zucchini", &["courgette"]),
    ("bell pepper", &["capsicum", "sweet pepper"]),
    ("arugula", &["rocket leaves", "roquette"]),
    ("shrimp", &["prawn", "prawns"]),
    ("yogurt", &["yoghurt", "yogourt"]),
    ("chili", &["chile", "chilli"]),
    ("cardamom", &["cardamon", "elaichi"]),
    ("phyllo", &["filo", "fillo"]),
    ("turmeric", &["haldi"]),
    ("cornstarch", &["cornflour", "corn starch"]),
    ("powdered sugar", &["icing sugar", "confectioners sugar"]),
    ("heavy cream", &["double cream", "whipping cream"]),
];

static BUILTIN_TABLE: LazyLock<AliasTable> = LazyLock::new(|| {
    let mut table = AliasTable::empty();
    for (canonical, variants) in BUILTIN_ALIASES {
        table.insert(canonical, variants.iter().copied());
    }
    table
});

static WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\p{L}{4,}").expect("valid word regex"));

/// Ingredient spelling groups with a reverse index from every spelling.
///
/// Each group holds the canonical name first, followed by its variants.
#[derive(Debug, Clone, Default)]
pub struct AliasTable {
    groups: Vec<Vec<String>>,
    index: HashMap<String, usize>,
}

impl AliasTable {
    /// A table with no aliases; matching falls back to strategies 1–3 and 5.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in alias table.
    #[must_use]
    pub fn builtin() -> &'static AliasTable {
        &BUILTIN_TABLE
    }

    /// The built-in table extended with caller-supplied entries.
    #[must_use]
    pub fn builtin_with(entries: &[AliasEntry]) -> Self {
        let mut table = BUILTIN_TABLE.clone();
        for entry in entries {
            table.insert(&entry.canonical, entry.variants.iter().map(String::as_str));
        }
        table
    }

    /// Adds `variants` to the group containing `canonical`, creating it if needed.
    ///
    /// A variant already owned by another group keeps its first owner.
    pub fn insert<'v, I>(&mut self, canonical: &str, variants: I)
    where
        I: IntoIterator<Item = &'v str>,
    {
        let canonical = normalize_term(canonical);
        if canonical.is_empty() {
            return;
        }

        let group_idx = if let Some(&idx) = self.index.get(&canonical) {
            idx
        } else {
            self.groups.push(vec![canonical.clone()]);
            let idx = self.groups.len() - 1;
            self.index.insert(canonical, idx);
            idx
        };

        for variant in variants {
            let variant = normalize_term(variant);
            if variant.is_empty() {
                continue;
            }
            match self.index.get(&variant) {
                Some(&owner) if owner != group_idx => {
                    tracing::debug!(
                        variant = %variant,
                        "alias variant already belongs to another ingredient; skipping"
                    );
                }
                Some(_) => {}
                None => {
                    self.index.insert(variant.clone(), group_idx);
                    if let Some(group) = self.groups.get_mut(group_idx) {
                        group.push(variant);
                    }
                }
            }
        }
    }

    /// Number of canonical ingredients.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Every other spelling in `term`'s group (canonical and variants).
    ///
    /// `term` must already be normalized.
    fn spellings_for(&self, term: &str) -> Vec<&str> {
        self.index
            .get(term)
            .and_then(|&idx| self.groups.get(idx))
            .map(|group| {
                group
                    .iter()
                    .map(String::as_str)
                    .filter(|s| *s != term)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Returns `true` if `text` mentions the ingredient `term`.
    #[must_use]
    pub fn matches(&self, term: &str, text: &str) -> bool {
        let term = normalize_term(term);
        if term.is_empty() {
            return false;
        }
        let text = text.to_lowercase();

        if text.contains(&term) {
            return true;
        }

        let compact_text = strip_whitespace(&text);
        if compact_text.contains(&strip_whitespace(&term)) {
            return true;
        }

        if compound_match(&term, &text) {
            return true;
        }

        let aliases = self.spellings_for(&term);
        if aliases
            .iter()
            .any(|alias| text.contains(alias) || compact_text.contains(&strip_whitespace(alias)))
        {
            return true;
        }

        fuzzy_match(&term, &aliases, &text)
    }
}

/// Matches `term` against `text` using the built-in alias table.
#[must_use]
pub fn matches(term: &str, text: &str) -> bool {
    BUILTIN_TABLE.matches(term, text)
}

fn strip_whitespace(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Two-word terms whose words are both at least three characters match when
/// each word appears somewhere in `text`, in any order.
fn compound_match(term: &str, text: &str) -> bool {
    let words: Vec<&str> = term.split(' ').collect();
    match words.as_slice() {
        [first, second] if first.chars().count() >= 3 && second.chars().count() >= 3 => {
            text.contains(first) && text.contains(second)
        }
        _ => false,
    }
}

/// Edit-distance tolerance: 1 for candidates of four characters, 2 above.
fn max_distance(candidate: &str) -> usize {
    if candidate.chars().count() <= 4 {
        1
    } else {
        2
    }
}

fn fuzzy_match(term: &str, aliases: &[&str], text: &str) -> bool {
    if term.contains(' ') || term.chars().count() < 4 {
        return false;
    }

    let candidates: Vec<&str> = std::iter::once(term)
        .chain(
            aliases
                .iter()
                .copied()
                .filter(|a| !a.contains(' ') && a.chars().count() >= 4),
        )
        .collect();

    WORD_RE.find_iter(text).any(|word| {
        candidates
            .iter()
            .any(|c| strsim::levenshtein(word.as_str(), c) <= max_distance(c))
    })
}
