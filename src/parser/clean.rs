use std::sync::LazyLock;

use regex::Regex;

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<.*?>").unwrap());
static PUNCT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w\s,]").unwrap());
static SPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Strip tags, blank out punctuation other than commas, squeeze whitespace, lower-case.
pub fn clean_text(text: &str) -> String {
    let no_tags = TAG_RE.replace_all(text, "");
    let no_punct = PUNCT_RE.replace_all(&no_tags, " ");
    SPACE_RE.replace_all(&no_punct, " ").trim().to_lowercase()
}

/// True for values that carry no information: empty or some spelling of "n/a".
pub fn is_blank(raw: &str, cleaned: &str) -> bool {
    let raw = raw.trim();
    raw.is_empty() || raw.eq_ignore_ascii_case("n/a") || cleaned.is_empty() || cleaned == "n/a"
}
