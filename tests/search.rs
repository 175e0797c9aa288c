use footle::player::{Player, Popularity};
use footle::search::{SEARCH_LIMIT, rank_matches};

fn player(id: i64, name: &str, team: &str) -> Player {
    let mut p = Player::new(
        name,
        "England",
        "GB-ENG",
        team,
        "Central Midfield",
        25,
        Popularity::market_value(10_000_000),
        "2026-01-01",
    );
    p.id = id;
    p
}

fn names(players: &[Player], query: &str) -> Vec<String> {
    rank_matches(players, query)
        .into_iter()
        .map(|s| s.name)
        .collect()
}

#[test]
fn prefix_matches_rank_ahead_of_substring_matches() {
    let players = vec![
        player(1, "Mohamed Salah", "Liverpool"),
        player(2, "Salah Eddine", "Nottingham Forest"),
        player(3, "Bukayo Saka", "Arsenal"),
    ];
    assert_eq!(names(&players, "sala"), vec!["Salah Eddine", "Mohamed Salah"]);
}

#[test]
fn exact_name_ranks_first() {
    let players = vec![
        player(1, "Rodrigo Muniz", "Fulham"),
        player(2, "Rodri", "Manchester City"),
        player(3, "Rodrigo Bentancur", "Tottenham"),
    ];
    assert_eq!(
        names(&players, "RODRI"),
        vec!["Rodri", "Rodrigo Bentancur", "Rodrigo Muniz"]
    );
}

#[test]
fn known_team_breaks_ties_within_a_tier() {
    let players = vec![
        player(1, "Alex Free", "Unknown"),
        player(2, "Alex Signed", "Brentford"),
        player(3, "Alex Blank", ""),
    ];
    assert_eq!(
        names(&players, "alex"),
        vec!["Alex Signed", "Alex Blank", "Alex Free"]
    );
}

#[test]
fn results_are_capped() {
    let players: Vec<Player> = (1..=25)
        .map(|i| player(i, &format!("Player {i:02}"), "Everton"))
        .collect();
    let hits = rank_matches(&players, "player");
    assert_eq!(hits.len(), SEARCH_LIMIT);
    assert_eq!(hits[0].name, "Player 01");
    assert_eq!(hits[9].name, "Player 10");
}

#[test]
fn blank_query_matches_nothing() {
    let players = vec![player(1, "Mohamed Salah", "Liverpool")];
    assert!(rank_matches(&players, "").is_empty());
    assert!(rank_matches(&players, "   ").is_empty());
}

#[test]
fn matching_folds_non_ascii_case() {
    let players = vec![player(1, "Martin Ødegaard", "Arsenal")];
    assert_eq!(names(&players, "øDEGAARD"), vec!["Martin Ødegaard"]);
}

#[test]
fn summaries_carry_id_team_and_league() {
    let players = vec![player(42, "Declan Rice", "Arsenal")];
    let hits = rank_matches(&players, "rice");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, 42);
    assert_eq!(hits[0].team, "Arsenal");
    assert_eq!(hits[0].league, "Premier League");
}

#[test]
fn name_tie_break_ignores_case() {
    let players = vec![
        player(1, "Oleksandr Zinchenko", "Arsenal"),
        player(2, "de Ligt Matthijs", "Manchester United"),
        player(3, "Andy Robertson", "Liverpool"),
    ];
    assert_eq!(
        names(&players, "e"),
        vec!["Andy Robertson", "de Ligt Matthijs", "Oleksandr Zinchenko"]
    );
}
