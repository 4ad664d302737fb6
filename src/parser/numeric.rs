use std::sync::LazyLock;

use regex::Regex;

// The optional `-` and separator space also accept the "5 10 lpa" form left by cleaning.
static SALARY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)₹?\s*(\d+(?:\.\d+)?)\s*-?\s*(\d+(?:\.\d+)?)?\s*(lpa|lakh|lac|cr)").unwrap()
});
static EXPERIENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*-?\s*(\d+(?:\.\d+)?)?\s*(?:years|yrs)").unwrap()
});
static POSTED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+)\s*(day|week|month)").unwrap());

const LAKH: f64 = 100_000.0;
const CRORE: f64 = 10_000_000.0;

/// `"₹5-10 LPA"` → `(500000, 1000000)`, in rupees.
pub fn parse_salary(text: &str) -> Option<(f64, f64)> {
    let caps = SALARY_RE.captures(text)?;
    let (min, max) = bounds(caps.get(1)?.as_str(), caps.get(2).map(|m| m.as_str()))?;
    let scale = match caps[3].to_lowercase().as_str() {
        "cr" => CRORE,
        _ => LAKH,
    };
    Some((min * scale, max * scale))
}

/// `"2-5 Years"` → `(2, 5)`.
pub fn parse_experience(text: &str) -> Option<(f64, f64)> {
    let caps = EXPERIENCE_RE.captures(text)?;
    bounds(caps.get(1)?.as_str(), caps.get(2).map(|m| m.as_str()))
}

/// `"Posted 2 weeks ago"` → `14`. Months count as 30 days.
pub fn parse_posted_days(text: &str) -> Option<u32> {
    let caps = POSTED_RE.captures(text)?;
    let count: u32 = caps[1].parse().ok()?;
    let per_unit = match caps[2].to_lowercase().as_str() {
        "week" => 7,
        "month" => 30,
        _ => 1,
    };
    count.checked_mul(per_unit)
}

fn bounds(first: &str, second: Option<&str>) -> Option<(f64, f64)> {
    let min: f64 = first.parse().ok()?;
    let max = match second {
        Some(s) => s.parse().ok()?,
        None => min,
    };
    Some((min, max))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn salary() {
        assert_eq!(parse_salary("₹5-10 LPA"), Some((500_000.0, 1_000_000.0)));
        assert_eq!(parse_salary("₹2.5 Cr"), Some((25_000_000.0, 25_000_000.0)));
        assert_eq!(parse_salary("3-6 Lacs PA"), Some((300_000.0, 600_000.0)));
        assert_eq!(parse_salary("12 lakh per annum"), Some((1_200_000.0, 1_200_000.0)));
        assert_eq!(parse_salary("5 10 lpa"), Some((500_000.0, 1_000_000.0)));
        assert_eq!(parse_salary("negotiable"), None);
        assert_eq!(parse_salary("Not disclosed"), None);
    }

    #[test]
    fn salary_ignores_experience_units() {
        assert_eq!(parse_salary("2-5 Years"), None);
    }

    #[test]
    fn experience() {
        assert_eq!(parse_experience("2-5 Years"), Some((2.0, 5.0)));
        assert_eq!(parse_experience("3 Yrs"), Some((3.0, 3.0)));
        assert_eq!(parse_experience("0 - 1.5 years"), Some((0.0, 1.5)));
        assert_eq!(parse_experience("Fresher"), None);
    }

    #[test]
    fn experience_ignores_salary_units() {
        assert_eq!(parse_experience("5-10 LPA"), None);
    }

    #[test]
    fn posted_days() {
        assert_eq!(parse_posted_days("Posted 3 days ago"), Some(3));
        assert_eq!(parse_posted_days("2 weeks ago"), Some(14));
        assert_eq!(parse_posted_days("1 month ago"), Some(30));
        assert_eq!(parse_posted_days("1 Day Ago"), Some(1));
        assert_eq!(parse_posted_days("Just now"), None);
        assert_eq!(parse_posted_days("Few hours ago"), None);
    }
}
