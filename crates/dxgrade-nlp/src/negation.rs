//! Rule-based clinical negation detection.
//!
//! A NegEx-style detector: negation trigger phrases govern a bounded token
//! window before (pre-triggers) or after (post-triggers) the target span,
//! with pseudo-negation phrases that suppress a trigger and conjunctions
//! that terminate its scope.

use dxgrade_core::text::NegationDetector;

/// Trigger phrases that negate a following span ("no evidence of X").
const PRE_TRIGGERS: &[&str] = &[
    "no",
    "not",
    "no evidence of",
    "without evidence of",
    "no signs of",
    "no sign of",
    "without",
    "denies",
    "denied",
    "absence of",
    "negative for",
    "free of",
    "never had",
    "ruled out for",
    "rules out",
    "cannot",
    "declined",
    "unremarkable for",
];

/// Trigger phrases that negate a preceding span ("X was ruled out").
const POST_TRIGGERS: &[&str] = &[
    "was ruled out",
    "is ruled out",
    "were ruled out",
    "are ruled out",
    "has been ruled out",
    "have been ruled out",
    "was excluded",
    "is excluded",
    "unlikely",
    "not seen",
    "not demonstrated",
    "is negative",
    "was negative",
];

/// Phrases that look like triggers but do not negate; a trigger occurring
/// inside one of these is ignored.
const PSEUDO_PHRASES: &[&str] = &[
    "no increase",
    "no change",
    "no definite change",
    "not ruled out",
    "not been ruled out",
    "not rule out",
    "cannot rule out",
    "cannot exclude",
    "not certain if",
    "not certain whether",
    "gram negative",
    "without difficulty",
];

/// Conjunctions that end a trigger's scope.
const TERMINATORS: &[&str] = &[
    "but", "however", "although", "though", "except", "yet", "aside", "apart",
];

/// Tokens a trigger can reach past before its scope ends.
const DEFAULT_WINDOW: usize = 5;

/// NegEx-style negation detector over free clinical text.
pub struct NegexDetector {
    pre_triggers: Vec<Vec<String>>,
    post_triggers: Vec<Vec<String>>,
    pseudo_phrases: Vec<Vec<String>>,
    terminators: Vec<String>,
    window: usize,
}

impl Default for NegexDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl NegexDetector {
    pub fn new() -> Self {
        Self::with_window(DEFAULT_WINDOW)
    }

    pub fn with_window(window: usize) -> Self {
        Self {
            pre_triggers: PRE_TRIGGERS.iter().map(|t| tokenize(t)).collect(),
            post_triggers: POST_TRIGGERS.iter().map(|t| tokenize(t)).collect(),
            pseudo_phrases: PSEUDO_PHRASES.iter().map(|t| tokenize(t)).collect(),
            terminators: TERMINATORS.iter().map(|t| t.to_string()).collect(),
            window,
        }
    }

    /// Whether the span's occurrences in the text are negated. Returns true
    /// only when the span occurs and every occurrence sits in the scope of a
    /// non-pseudo trigger, so a single affirmed mention keeps a keyword
    /// positive.
    pub fn detect(&self, text: &str, span: &str) -> bool {
        let span_tokens = tokenize(span);
        if span_tokens.is_empty() {
            return false;
        }

        let mut found_any = false;
        for sentence in split_sentences(text) {
            let tokens = tokenize(sentence);
            let occurrences = find_subsequences(&tokens, &span_tokens);
            if occurrences.is_empty() {
                continue;
            }
            let pseudo_spans = self.pseudo_spans(&tokens);
            for (start, end) in occurrences {
                found_any = true;
                if !self.occurrence_negated(&tokens, start, end, &pseudo_spans) {
                    return false;
                }
            }
        }
        found_any
    }

    /// Token ranges covered by pseudo-negation phrases.
    fn pseudo_spans(&self, tokens: &[String]) -> Vec<(usize, usize)> {
        let mut spans = Vec::new();
        for phrase in &self.pseudo_phrases {
            spans.extend(find_subsequences(tokens, phrase));
        }
        spans
    }

    fn occurrence_negated(
        &self,
        tokens: &[String],
        start: usize,
        end: usize,
        pseudo_spans: &[(usize, usize)],
    ) -> bool {
        let in_pseudo = |ts: usize, te: usize| {
            pseudo_spans.iter().any(|&(ps, pe)| ps <= ts && te <= pe)
        };

        for trigger in &self.pre_triggers {
            for (ts, te) in find_subsequences(tokens, trigger) {
                if te <= start
                    && start - te <= self.window
                    && !self.scope_terminated(&tokens[te..start])
                    && !in_pseudo(ts, te)
                {
                    return true;
                }
            }
        }

        for trigger in &self.post_triggers {
            for (ts, te) in find_subsequences(tokens, trigger) {
                if ts >= end
                    && ts - end <= self.window
                    && !self.scope_terminated(&tokens[end..ts])
                    && !in_pseudo(ts, te)
                {
                    return true;
                }
            }
        }

        false
    }

    fn scope_terminated(&self, between: &[String]) -> bool {
        between.iter().any(|t| self.terminators.contains(t))
    }
}

impl NegationDetector for NegexDetector {
    fn is_negated(&self, sentence: &str, span: &str) -> bool {
        self.detect(sentence, span)
    }
}

fn split_sentences(text: &str) -> impl Iterator<Item = &str> {
    text.split(['.', ';', '!', '?', '\n'])
}

fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_string())
        .collect()
}

/// All (start, end-exclusive) positions where `pattern` occurs in `tokens`.
fn find_subsequences(tokens: &[String], pattern: &[String]) -> Vec<(usize, usize)> {
    if pattern.is_empty() || pattern.len() > tokens.len() {
        return Vec::new();
    }
    (0..=tokens.len() - pattern.len())
        .filter(|&i| tokens[i..i + pattern.len()] == *pattern)
        .map(|i| (i, i + pattern.len()))
        .collect()
}
