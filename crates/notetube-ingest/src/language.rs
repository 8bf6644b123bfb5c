//! Language detection via stop-word marker frequencies.
//!
//! Covers the Latin-script languages the study tool is used with. Detection
//! reports `None` when no marker word is found; callers substitute their
//! configured fallback language.

/// Result of language detection for a text fragment.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionResult {
    /// ISO 639-1 code, or `None` if nothing could be detected.
    pub language: Option<&'static str>,
    /// Share of marker hits won by the detected language (0.0–1.0).
    pub confidence: f32,
}

const ENGLISH_MARKERS: &[&str] = &[
    "the", "is", "are", "was", "were", "with", "from", "this", "that", "and", "for", "not",
    "but", "have", "has", "had", "will", "would", "can", "could", "should", "it", "they", "we",
    "you", "which", "what", "of", "to", "in",
];
const ITALIAN_MARKERS: &[&str] = &[
    "il", "lo", "gli", "di", "che", "è", "e", "per", "non", "sono", "della", "dello", "delle",
    "degli", "nel", "nella", "alla", "anche", "come", "più", "questo", "questa", "essere",
    "viene", "cioè", "quindi", "perché", "inoltre", "però", "ad", "un", "uno", "dei", "si",
];
const FRENCH_MARKERS: &[&str] = &[
    "le", "les", "des", "est", "dans", "avec", "une", "sur", "pas", "qui", "sont", "ont",
    "fait", "plus", "mais", "aussi", "cette", "ces", "nous", "vous", "ils", "elles", "du",
    "au", "aux", "être",
];
const SPANISH_MARKERS: &[&str] = &[
    "el", "los", "las", "está", "esta", "tiene", "por", "pero", "también", "tambien", "más",
    "son", "hay", "ser", "estar", "muy", "todo", "puede", "sobre", "nos", "ese", "esa",
    "estos", "y", "es", "al", "lo", "qué",
];
const GERMAN_MARKERS: &[&str] = &[
    "der", "die", "das", "und", "ist", "nicht", "ein", "eine", "mit", "auf", "für", "von",
    "sich", "den", "dem", "des", "auch", "wird", "sind", "werden", "oder", "bei", "zu",
];

/// Candidate languages in tie-break order.
const LANGUAGES: &[(&str, &[&str])] = &[
    ("en", ENGLISH_MARKERS),
    ("it", ITALIAN_MARKERS),
    ("fr", FRENCH_MARKERS),
    ("es", SPANISH_MARKERS),
    ("de", GERMAN_MARKERS),
];

/// Detect the language of a text fragment.
pub fn detect_language(text: &str) -> DetectionResult {
    let lower = text.to_lowercase();
    let mut scores = [0u32; 5];

    for word in lower.split_whitespace() {
        let w = word.trim_matches(|c: char| !c.is_alphanumeric());
        if w.is_empty() {
            continue;
        }
        for (i, (_, markers)) in LANGUAGES.iter().enumerate() {
            if markers.contains(&w) {
                scores[i] += 1;
            }
        }
    }

    let total: u32 = scores.iter().sum();
    let mut best = 0usize;
    for i in 1..scores.len() {
        if scores[i] > scores[best] {
            best = i;
        }
    }

    if scores[best] == 0 {
        return DetectionResult {
            language: None,
            confidence: 0.0,
        };
    }

    DetectionResult {
        language: Some(LANGUAGES[best].0),
        confidence: scores[best] as f32 / total as f32,
    }
}
