//! Rule-based medication entity recognizer.
//!
//! Tags the Med7 label set (DRUG, STRENGTH, DOSAGE, ROUTE, FORM, FREQUENCY,
//! DURATION) in label text using regexes. A DRUG is a known drug name, a word
//! ending in a pharmacological stem, a configured lexicon term, or the word
//! right before a strength ("Zyrtec 10mg").

use anyhow::Result;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;

use pillscan_core::{Entity, EntityLabel, EntityRecognizer};

// --- Compiled regexes ---

static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b[A-Za-z][A-Za-z\-]{2,}\b").unwrap());

static STRENGTH_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b\d+(?:[.,]\d+)?\s?(?:mcg|mg|µg|ml|iu|g|units?)(?:\s?/\s?\d*\s?(?:ml|g|l))?\b").unwrap()
});

static WORD_BEFORE_STRENGTH_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b([a-z][a-z\-]{2,})\s+\d+(?:[.,]\d+)?\s?(?:mcg|mg|µg|ml|iu|g)\b").unwrap()
});

static DOSAGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:\d+|one|two|three|four)\s+(?:tablets?|capsules?|caplets?|puffs?|drops?|teaspoons?|spoonfuls?|sachets?)\b").unwrap()
});

static FORM_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:tablets?|capsules?|caplets?|syrup|suspension|cream|ointment|gel|drops|injection|inhaler|lozenges?|sachets?|patch(?:es)?|solution|spray)\b").unwrap()
});

static ROUTE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:oral(?:ly)?|by mouth|topical(?:ly)?|intravenous(?:ly)?|subcutaneous(?:ly)?|intramuscular(?:ly)?|sublingual(?:ly)?|rectal(?:ly)?|nasal|inhaled|ophthalmic)\b").unwrap()
});

static FREQUENCY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:once|twice|three times|four times)\s+(?:a\s+|per\s+)?(?:day|daily|week)\b|\bevery\s+\d+\s+hours?\b|\b(?:daily|at bedtime|as needed|bid|tid|qid|prn)\b").unwrap()
});

static DURATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bfor\s+\d+\s+(?:days?|weeks?|months?)\b").unwrap()
});

/// Common generic names that carry no recognizable stem.
const KNOWN_DRUGS: &[&str] = &[
    "acetaminophen", "aspirin", "codeine", "diclofenac", "heparin", "insulin",
    "metformin", "morphine", "paracetamol", "prednisolone", "prednisone",
    "salbutamol", "tramadol", "warfarin",
];

/// Suffixes of pharmacological classes (WHO INN stems).
const DRUG_STEMS: &[&str] = &[
    "cillin", "mycin", "micin", "cycline", "floxacin", "azole", "sartan", "pril",
    "olol", "dipine", "statin", "vir", "mab", "nib", "tidine", "profen", "triptan",
    "setron", "caine", "azepam", "oxetine", "semide", "thiazide", "gliptin", "formin",
];

/// Words that precede a strength without being a drug name.
const STOP_WORDS: &[&str] = &[
    "take", "takes", "each", "contains", "containing", "of", "and", "with", "per",
    "dose", "doses", "strength", "total", "equivalent", "to", "max", "maximum", "every",
];

#[derive(Debug, Default)]
pub struct RuleBasedRecognizer {
    /// Extra drug names, lowercased.
    lexicon: Vec<String>,
}

impl RuleBasedRecognizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add brand or local drug names to recognize verbatim (case-insensitive).
    pub fn with_terms<I, S>(mut self, terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.lexicon.extend(
            terms
                .into_iter()
                .map(|t| t.as_ref().trim().to_lowercase())
                .filter(|t| !t.is_empty()),
        );
        self
    }

    /// Tag all entities in `text`, sorted by position.
    pub fn extract(&self, text: &str) -> Vec<Entity> {
        let mut entities = Vec::new();

        self.add_drugs(&mut entities, text);
        add_matches(&mut entities, text, &STRENGTH_RE, EntityLabel::Strength);
        add_matches(&mut entities, text, &DOSAGE_RE, EntityLabel::Dosage);
        add_matches(&mut entities, text, &DURATION_RE, EntityLabel::Duration);
        add_matches(&mut entities, text, &FREQUENCY_RE, EntityLabel::Frequency);
        add_matches(&mut entities, text, &ROUTE_RE, EntityLabel::Route);
        // Form words also appear inside dosages ("two tablets").
        add_matches(&mut entities, text, &FORM_RE, EntityLabel::Form);

        entities.sort_by_key(|e| e.start);
        entities
    }

    fn is_drug_word(&self, word: &str) -> bool {
        let lower = word.to_lowercase();
        KNOWN_DRUGS.contains(&lower.as_str())
            || self.lexicon.iter().any(|t| *t == lower)
            || DRUG_STEMS
                .iter()
                .any(|stem| lower.len() > stem.len() + 2 && lower.ends_with(stem))
    }

    fn add_drugs(&self, entities: &mut Vec<Entity>, text: &str) {
        for m in WORD_RE.find_iter(text) {
            if self.is_drug_word(m.as_str()) {
                push_if_free(entities, EntityLabel::Drug, m.as_str(), m.start(), m.end());
            }
        }

        for phrase in self.lexicon.iter().filter(|t| t.contains(' ')) {
            let pattern = format!(r"(?i)\b{}\b", regex::escape(phrase));
            if let Ok(re) = Regex::new(&pattern) {
                add_matches(entities, text, &re, EntityLabel::Drug);
            }
        }

        for caps in WORD_BEFORE_STRENGTH_RE.captures_iter(text) {
            let Some(word) = caps.get(1) else { continue };
            let lower = word.as_str().to_lowercase();
            if STOP_WORDS.contains(&lower.as_str()) || FORM_RE.is_match(word.as_str()) {
                continue;
            }
            push_if_free(entities, EntityLabel::Drug, word.as_str(), word.start(), word.end());
        }
    }
}

/// Add every match of `re` that does not overlap an entity already found.
fn add_matches(entities: &mut Vec<Entity>, text: &str, re: &Regex, label: EntityLabel) {
    for m in re.find_iter(text) {
        push_if_free(entities, label.clone(), m.as_str(), m.start(), m.end());
    }
}

fn push_if_free(entities: &mut Vec<Entity>, label: EntityLabel, value: &str, start: usize, end: usize) {
    let overlaps = entities.iter().any(|e| start < e.end && end > e.start);
    if !overlaps {
        entities.push(Entity {
            label,
            text: value.to_string(),
            start,
            end,
        });
    }
}

#[async_trait]
impl EntityRecognizer for RuleBasedRecognizer {
    fn name(&self) -> &str {
        "rules"
    }

    async fn recognize(&self, text: &str) -> Result<Vec<Entity>> {
        Ok(self.extract(text))
    }
}

/// Recognizer that never finds anything; matching then runs on the raw text.
#[derive(Debug, Default)]
pub struct NoopRecognizer;

#[async_trait]
impl EntityRecognizer for NoopRecognizer {
    fn name(&self) -> &str {
        "none"
    }

    async fn recognize(&self, _text: &str) -> Result<Vec<Entity>> {
        Ok(Vec::new())
    }
}
