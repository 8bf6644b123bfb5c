//! Per-language stop-word tables.
//!
//! Every lookup also includes the English table: study notes routinely mix
//! English technical terms into other languages.

use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};

const ENGLISH: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and", "any",
    "are", "as", "at", "be", "because", "been", "before", "being", "below", "between", "both",
    "but", "by", "can", "could", "did", "do", "does", "doing", "down", "during", "each", "either",
    "etc", "even", "every", "few", "for", "from", "further", "had", "has", "have", "having", "he",
    "her", "here", "hers", "herself", "him", "himself", "his", "how", "however", "i", "if", "in",
    "into", "is", "it", "its", "itself", "just", "may", "me", "might", "more", "most", "must",
    "my", "myself", "no", "nor", "not", "now", "of", "off", "on", "once", "one", "only", "or",
    "other", "our", "ours", "ourselves", "out", "over", "own", "same", "shall", "she", "should",
    "so", "some", "such", "than", "that", "the", "their", "theirs", "them", "themselves", "then",
    "there", "these", "they", "this", "those", "through", "thus", "to", "too", "under", "until",
    "up", "upon", "us", "use", "used", "uses", "using", "very", "via", "was", "we", "were",
    "what", "when", "where", "whether", "which", "while", "who", "whom", "why", "will", "with",
    "within", "without", "would", "yet", "you", "your", "yours", "yourself",
];

const ITALIAN: &[&str] = &[
    "a", "abbia", "abbiamo", "ad", "agli", "ai", "al", "alla", "alle", "allo", "anche", "ancora",
    "avere", "aveva", "avevano", "c", "che", "chi", "ci", "cioè", "coi", "col", "come", "con",
    "contro", "cui", "da", "dagli", "dai", "dal", "dalla", "dalle", "dallo", "degli", "dei", "del",
    "della", "delle", "dello", "dentro", "di", "dopo", "dove", "e", "ecc", "ed", "esempio", "essa",
    "esse", "essere", "essi", "esso", "fa", "fino", "fra", "gli", "ha", "hanno", "ho", "i", "il",
    "in", "inoltre", "io", "l", "la", "le", "lei", "li", "lo", "loro", "lui", "ma", "mentre", "mi",
    "molto", "ne", "negli", "nei", "nel", "nella", "nelle", "nello", "noi", "non", "nostro", "o",
    "ogni", "oppure", "per", "perché", "perciò", "però", "più", "poi", "può", "possono", "qual",
    "quale", "quali", "quando", "quanto", "quella", "quelle", "quelli", "quello", "questa",
    "queste", "questi", "questo", "qui", "quindi", "se", "sei", "senza", "si", "sia", "siamo",
    "sono", "sopra", "sotto", "sta", "stato", "su", "sua", "sue", "sugli", "sui", "sul", "sulla",
    "sulle", "suo", "suoi", "tra", "tu", "tutti", "tutto", "un", "una", "uno", "vi", "viene",
    "vengono", "voi", "è",
];

const FRENCH: &[&str] = &[
    "a", "ai", "au", "aux", "avec", "c", "ce", "ces", "cette", "d", "dans", "de", "des", "du",
    "elle", "elles", "en", "est", "et", "être", "eu", "il", "ils", "j", "je", "l", "la", "le",
    "les", "leur", "leurs", "lui", "m", "mais", "me", "mes", "moi", "mon", "n", "ne", "nos",
    "notre", "nous", "on", "ont", "ou", "où", "par", "pas", "pour", "qu", "que", "qui", "s", "sa",
    "se", "ses", "son", "sont", "sur", "t", "ta", "te", "tes", "toi", "ton", "tu", "un", "une",
    "vos", "votre", "vous", "y", "été", "plus", "aussi", "comme", "donc",
];

const SPANISH: &[&str] = &[
    "a", "al", "algo", "como", "con", "de", "del", "donde", "e", "el", "ella", "ellas", "ellos",
    "en", "entre", "era", "es", "esa", "ese", "eso", "esta", "está", "este", "esto", "estos",
    "fue", "ha", "hay", "la", "las", "le", "les", "lo", "los", "más", "me", "mi", "muy", "no",
    "nos", "o", "para", "pero", "por", "porque", "que", "qué", "se", "sea", "ser", "si", "sin",
    "sobre", "son", "su", "sus", "también", "te", "tiene", "todo", "tu", "un", "una", "uno", "y",
    "ya",
];

const GERMAN: &[&str] = &[
    "aber", "als", "am", "an", "auch", "auf", "aus", "bei", "bin", "bis", "da", "das", "dass",
    "dem", "den", "der", "des", "die", "doch", "du", "durch", "ein", "eine", "einem", "einen",
    "einer", "eines", "er", "es", "für", "hat", "ich", "ihr", "im", "in", "ist", "ja", "kann",
    "mit", "nach", "nicht", "noch", "nur", "ob", "oder", "sein", "sich", "sie", "sind", "so",
    "um", "und", "uns", "von", "vor", "war", "was", "werden", "wie", "wir", "wird", "zu", "zum",
    "zur",
];

static TABLES: Lazy<HashMap<&'static str, HashSet<&'static str>>> = Lazy::new(|| {
    let mut m = HashMap::new();
    for (code, words) in [
        ("en", ENGLISH),
        ("it", ITALIAN),
        ("fr", FRENCH),
        ("es", SPANISH),
        ("de", GERMAN),
    ] {
        let mut set: HashSet<&'static str> = words.iter().copied().collect();
        set.extend(ENGLISH.iter().copied());
        m.insert(code, set);
    }
    m
});

/// Whether `word` is a stop word for `language`. Unknown languages use the
/// English table. Tokens shorter than two characters always count.
pub fn is_stopword(language: &str, word: &str) -> bool {
    if word.chars().count() < 2 {
        return true;
    }
    let table = TABLES
        .get(language)
        .or_else(|| TABLES.get("en"));
    table.map(|t| t.contains(word)).unwrap_or(false)
}
