use chrono::NaiveDate;
use footle::daily::DailySelector;
use footle::player::{Player, Popularity};

fn roster() -> Vec<Player> {
    ["Bukayo Saka", "Declan Rice", "Mohamed Salah", "Virgil van Dijk", "Cole Palmer"]
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let mut p = Player::new(
                *name,
                "England",
                "GB-ENG",
                "Arsenal",
                "Central Midfield",
                25,
                Popularity::market_value(50_000_000),
                "2026-01-01",
            );
            p.id = i as i64 + 1;
            p
        })
        .collect()
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 5, d).expect("valid date")
}

#[test]
fn same_date_gives_same_player() {
    let selector = DailySelector::default();
    let players = roster();
    let a = selector.pick(&players, day(1)).expect("pick");
    let b = selector.pick(&players, day(1)).expect("pick");
    assert_eq!(a.id, b.id);
}

#[test]
fn pick_ignores_input_order() {
    let selector = DailySelector::default();
    let players = roster();
    let mut reversed = players.clone();
    reversed.reverse();
    for d in 1..=10 {
        assert_eq!(
            selector.pick(&players, day(d)).map(|p| p.id),
            selector.pick(&reversed, day(d)).map(|p| p.id),
            "day {d}"
        );
    }
}

#[test]
fn answer_changes_across_days() {
    let selector = DailySelector::default();
    let players = roster();
    let mut ids: Vec<i64> = (1..=28)
        .filter_map(|d| selector.pick(&players, day(d)).map(|p| p.id))
        .collect();
    ids.sort_unstable();
    ids.dedup();
    assert!(ids.len() > 1);
}

#[test]
fn empty_roster_has_no_answer() {
    assert!(DailySelector::default().pick(&[], day(1)).is_none());
}

#[test]
fn test_player_override_matches_name_fragment() {
    let selector = DailySelector::new(Some("  SALAH ".to_string()));
    assert_eq!(selector.test_player(), Some("salah"));
    for d in 1..=5 {
        let p = selector.pick(&roster(), day(d)).expect("pick");
        assert_eq!(p.name, "Mohamed Salah");
    }
}

#[test]
fn unmatched_override_falls_back_to_date_pick() {
    let players = roster();
    let selector = DailySelector::new(Some("nobody".to_string()));
    assert_eq!(
        selector.pick(&players, day(3)).map(|p| p.id),
        DailySelector::default().pick(&players, day(3)).map(|p| p.id)
    );
}

#[test]
fn blank_override_is_ignored() {
    assert_eq!(DailySelector::new(Some("   ".to_string())).test_player(), None);
}
