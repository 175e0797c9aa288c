use serde::{Deserialize, Serialize};

use crate::player::{Player, Popularity};
use crate::position::{normalize_position, positions_similar};

pub const AGE_CLOSE_YEARS: u64 = 2;
pub const MARKET_VALUE_CLOSE: u64 = 10_000_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionFeedback {
    pub exact: bool,
    pub similar: bool,
}

/// Grading for a numeric attribute.
///
/// `higher` means the answer's value is higher than the guess (guess higher
/// next time); `lower` means the answer's value is lower. At most one of
/// `correct`, `higher`, `lower` is set, and `correct` implies `close`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumericFeedback {
    pub correct: bool,
    pub close: bool,
    pub higher: bool,
    pub lower: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopularityFeedback {
    #[serde(flatten)]
    pub grade: NumericFeedback,
    /// The answer's value, already formatted for display.
    pub display: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    pub nation: bool,
    pub league: bool,
    pub team: bool,
    pub position: PositionFeedback,
    pub age: NumericFeedback,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub appearances: Option<PopularityFeedback>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_value: Option<PopularityFeedback>,
    pub correct: bool,
}

pub fn compare(guessed: &Player, target: &Player) -> Feedback {
    let guessed_group = normalize_position(&guessed.position);
    let target_group = normalize_position(&target.position);

    let (appearances, market_value) = match (&guessed.popularity, &target.popularity) {
        (Popularity::Appearances(g), Popularity::Appearances(t)) => (
            Some(PopularityFeedback {
                grade: grade(u64::from(*g), u64::from(*t), None),
                display: target.popularity.display(),
            }),
            None,
        ),
        (Popularity::MarketValue { value: g, .. }, Popularity::MarketValue { value: t, .. }) => (
            None,
            Some(PopularityFeedback {
                grade: grade(*g, *t, Some(MARKET_VALUE_CLOSE)),
                display: target.popularity.display(),
            }),
        ),
        // Mixed data sources share no scale.
        _ => (None, None),
    };

    Feedback {
        nation: guessed.nation == target.nation,
        league: guessed.league == target.league,
        team: guessed.team == target.team,
        position: PositionFeedback {
            exact: guessed.position == target.position,
            similar: positions_similar(&guessed_group, &target_group),
        },
        age: grade(
            u64::from(guessed.age),
            u64::from(target.age),
            Some(AGE_CLOSE_YEARS),
        ),
        appearances,
        market_value,
        correct: guessed.id == target.id,
    }
}

fn grade(guessed: u64, target: u64, close_within: Option<u64>) -> NumericFeedback {
    let correct = guessed == target;
    let close = correct || close_within.is_some_and(|band| guessed.abs_diff(target) <= band);
    NumericFeedback {
        correct,
        close,
        higher: guessed < target,
        lower: guessed > target,
    }
}
