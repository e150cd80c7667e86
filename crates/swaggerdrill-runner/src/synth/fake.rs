//! Plausible-looking fake values for string formats

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{Duration, SecondsFormat, Utc};
use rand::Rng;
use rand::distributions::Alphanumeric;

const LOREM: &[&str] = &[
    "lorem", "ipsum", "dolor", "sit", "amet", "consectetur", "adipiscing", "elit", "sed", "do",
    "eiusmod", "tempor", "incididunt", "ut", "labore", "et", "dolore", "magna", "aliqua", "enim",
    "ad", "minim", "veniam", "quis", "nostrud", "exercitation", "ullamco", "laboris", "nisi",
    "aliquip", "ex", "ea", "commodo", "consequat", "duis", "aute", "irure", "in", "voluptate",
    "velit", "esse", "cillum", "fugiat", "nulla", "pariatur", "excepteur", "sint", "occaecat",
    "cupidatat", "non", "proident", "sunt", "culpa", "qui", "officia", "deserunt", "mollit",
    "anim", "id", "est", "laborum",
];

const FIRST_NAMES: &[&str] = &[
    "alex", "sam", "jordan", "taylor", "morgan", "casey", "riley", "jamie", "avery", "quinn",
];

const LAST_NAMES: &[&str] = &[
    "smith", "garcia", "chen", "novak", "okafor", "silva", "tanaka", "muller", "kowalski", "haddad",
];

const TLDS: &[&str] = &["com", "net", "org", "io"];

fn pick<'a>(rng: &mut impl Rng, from: &[&'a str]) -> &'a str {
    from[rng.gen_range(0..from.len())]
}

pub fn word(rng: &mut impl Rng) -> String {
    pick(rng, LOREM).to_string()
}

/// Three space-separated lorem words.
pub fn words(rng: &mut impl Rng) -> String {
    (0..3).map(|_| pick(rng, LOREM)).collect::<Vec<_>>().join(" ")
}

/// Three to six capitalized sentences.
pub fn paragraph(rng: &mut impl Rng) -> String {
    let sentences = rng.gen_range(3..=6);
    (0..sentences)
        .map(|_| {
            let len = rng.gen_range(4..=10);
            let body = (0..len).map(|_| pick(rng, LOREM)).collect::<Vec<_>>().join(" ");
            let mut chars = body.chars();
            match chars.next() {
                Some(first) => format!("{}{}.", first.to_ascii_uppercase(), chars.as_str()),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn email(rng: &mut impl Rng) -> String {
    format!(
        "{}.{}{}@example.{}",
        pick(rng, FIRST_NAMES),
        pick(rng, LAST_NAMES),
        rng.gen_range(1..100),
        pick(rng, TLDS)
    )
}

pub fn url(rng: &mut impl Rng) -> String {
    format!("https://{}-{}.{}", pick(rng, LOREM), pick(rng, LOREM), pick(rng, TLDS))
}

pub fn uuid(rng: &mut impl Rng) -> String {
    uuid::Builder::from_random_bytes(rng.r#gen()).into_uuid().to_string()
}

pub fn password(rng: &mut impl Rng) -> String {
    (0..15).map(|_| char::from(rng.sample(Alphanumeric))).collect()
}

/// Base64 of a lorem word.
pub fn byte(rng: &mut impl Rng) -> String {
    STANDARD.encode(word(rng))
}

pub fn ipv4(rng: &mut impl Rng) -> String {
    let octets: [u8; 4] = rng.r#gen();
    std::net::Ipv4Addr::from(octets).to_string()
}

pub fn ipv6(rng: &mut impl Rng) -> String {
    let segments: [u16; 8] = rng.r#gen();
    std::net::Ipv6Addr::from(segments).to_string()
}

/// Instant within the past year.
fn past(rng: &mut impl Rng) -> chrono::DateTime<Utc> {
    Utc::now() - Duration::milliseconds(rng.gen_range(0..365 * 24 * 3600 * 1000_i64))
}

/// `YYYY-MM-DD`
pub fn date(rng: &mut impl Rng) -> String {
    past(rng).format("%Y-%m-%d").to_string()
}

/// RFC 3339 with milliseconds, `Z` suffix.
pub fn date_time(rng: &mut impl Rng) -> String {
    past(rng).to_rfc3339_opts(SecondsFormat::Millis, true)
}
