use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;

pub const GOALKEEPER: &str = "Goalkeeper";
pub const CENTRE_BACK: &str = "Centre-Back";
pub const RIGHT_BACK: &str = "Right-Back";
pub const LEFT_BACK: &str = "Left-Back";
pub const DEFENSIVE_MID: &str = "Defensive Mid";
pub const CENTRAL_MID: &str = "Central Mid";
pub const RIGHT_MID: &str = "Right Mid";
pub const LEFT_MID: &str = "Left Mid";
pub const RIGHT_WING: &str = "Right Wing";
pub const LEFT_WING: &str = "Left Wing";
pub const WINGER: &str = "Winger";
pub const STRIKER: &str = "Striker";

const UNKNOWN_TAG: &str = "Unknown";

// Order matters: the first phrase contained in the label wins.
const PHRASES: &[(&str, &str)] = &[
    ("attacking midfield", CENTRAL_MID),
    ("defensive midfield", DEFENSIVE_MID),
    ("central midfield", CENTRAL_MID),
    ("right midfield", RIGHT_MID),
    ("left midfield", LEFT_MID),
    ("right winger", RIGHT_WING),
    ("left winger", LEFT_WING),
    ("right wing", RIGHT_WING),
    ("left wing", LEFT_WING),
    ("centre-forward", STRIKER),
    ("center-forward", STRIKER),
    ("second striker", STRIKER),
    ("striker", STRIKER),
    ("centre-back", CENTRE_BACK),
    ("center-back", CENTRE_BACK),
    ("right-back", RIGHT_BACK),
    ("left-back", LEFT_BACK),
    ("right back", RIGHT_BACK),
    ("left back", LEFT_BACK),
    ("goalkeeper", GOALKEEPER),
];

// Opposite sides count as related: the role is the signal, not the flank.
const RELATED: &[(&str, &[&str])] = &[
    (STRIKER, &[RIGHT_WING, LEFT_WING, WINGER]),
    (RIGHT_WING, &[LEFT_WING, RIGHT_MID, WINGER]),
    (LEFT_WING, &[LEFT_MID, WINGER]),
    (RIGHT_MID, &[LEFT_MID]),
    (CENTRAL_MID, &[DEFENSIVE_MID]),
    (RIGHT_BACK, &[LEFT_BACK]),
];

static RELATIONS: Lazy<HashMap<&'static str, HashSet<&'static str>>> = Lazy::new(|| {
    let mut out: HashMap<&'static str, HashSet<&'static str>> = HashMap::new();
    for &(tag, related) in RELATED {
        for &other in related {
            out.entry(tag).or_default().insert(other);
            out.entry(other).or_default().insert(tag);
        }
    }
    out
});

/// Maps a free-text position label to its canonical tag.
///
/// Never fails: labels that match nothing come back title-cased, and an
/// empty label becomes "Unknown".
pub fn normalize_position(raw: &str) -> String {
    let s = raw.trim().to_lowercase();
    if s.is_empty() {
        return UNKNOWN_TAG.to_string();
    }

    if let Some((_, tag)) = PHRASES.iter().find(|(phrase, _)| s.contains(phrase)) {
        return tag.to_string();
    }

    if let Some(tag) = keyword_fallback(&s) {
        return tag.to_string();
    }

    title_case(raw.trim())
}

fn keyword_fallback(s: &str) -> Option<&'static str> {
    if s.contains("wing") {
        return Some(sided(s, RIGHT_WING, LEFT_WING).unwrap_or(WINGER));
    }
    if s.contains("striker") || s.contains("forward") || s.contains("attack") {
        return Some(STRIKER);
    }
    if s.contains("midfield") {
        return Some(sided(s, RIGHT_MID, LEFT_MID).unwrap_or(CENTRAL_MID));
    }
    if s.contains("back") || s.contains("defence") || s.contains("defender") {
        return Some(sided(s, RIGHT_BACK, LEFT_BACK).unwrap_or(CENTRE_BACK));
    }
    if s.contains("keeper") {
        return Some(GOALKEEPER);
    }
    None
}

fn sided(s: &str, right: &'static str, left: &'static str) -> Option<&'static str> {
    if s.contains("right") {
        Some(right)
    } else if s.contains("left") {
        Some(left)
    } else {
        None
    }
}

fn title_case(raw: &str) -> String {
    raw.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(|c| c.to_lowercase()))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// True when two canonical tags are the same or listed as related.
pub fn positions_similar(a: &str, b: &str) -> bool {
    if a == b {
        return true;
    }
    RELATIONS.get(a).is_some_and(|related| related.contains(b))
}

/// Tags considered similar to `tag`, not including itself.
pub fn related_positions(tag: &str) -> Vec<&'static str> {
    let mut out = RELATIONS
        .get(tag)
        .map(|set| set.iter().copied().collect::<Vec<_>>())
        .unwrap_or_default();
    out.sort_unstable();
    out
}
