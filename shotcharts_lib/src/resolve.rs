//! Player and team name resolution.
//!
//! Matching runs in tiers: exact (case-insensitive), then normalized
//! (diacritics folded, punctuation stripped), then fuzzy against the
//! normalized names. A fuzzy match is accepted only at or above the
//! similarity threshold; anything weaker fails with the closest
//! candidates as a correction hint, and ties never resolve arbitrarily.

use serde::{Deserialize, Serialize};

use crate::error::{Result, ShotChartsError};

/// Similarity score below which a fuzzy match is rejected.
pub const SIMILARITY_THRESHOLD: f64 = 0.85;

const MAX_SUGGESTIONS: usize = 3;

/// One player in the league directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerEntry {
    pub id: i64,
    pub name: String,
}

/// One franchise in the league directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamEntry {
    pub id: i64,
    /// Three-letter code, e.g. "SAC".
    pub abbreviation: String,
    pub name: String,
}

#[derive(Deserialize)]
struct TeamSeedFile {
    team: Vec<TeamEntry>,
}

/// Loads the embedded 30-team directory.
///
/// The seed file is compiled in; parse failures mean the build itself
/// shipped broken data.
pub fn load_team_directory() -> Result<Vec<TeamEntry>> {
    let toml_content = include_str!("../seed_data/teams.toml");
    let seed: TeamSeedFile = toml::from_str(toml_content)
        .map_err(|e| ShotChartsError::SeedData(format!("embedded team directory: {e}")))?;
    Ok(seed.team)
}

/// Similarity function over two normalized names, scoring in [0, 1].
pub type Similarity = fn(&str, &str) -> f64;

/// Matching policy: a similarity function plus the acceptance threshold.
/// Swappable without touching the tiered control flow.
pub struct NameMatcher {
    similarity: Similarity,
    threshold: f64,
}

impl Default for NameMatcher {
    fn default() -> Self {
        Self {
            similarity: strsim::jaro_winkler,
            threshold: SIMILARITY_THRESHOLD,
        }
    }
}

impl NameMatcher {
    pub fn new(similarity: Similarity, threshold: f64) -> Self {
        Self {
            similarity,
            threshold,
        }
    }

    /// Resolves a player name to its directory entry.
    pub fn find_player<'a>(
        &self,
        players: &'a [PlayerEntry],
        name: &str,
    ) -> Result<&'a PlayerEntry> {
        // Exact tier, case-insensitive
        let query_lower = name.to_lowercase();
        let exact: Vec<&PlayerEntry> = players
            .iter()
            .filter(|p| p.name.to_lowercase() == query_lower)
            .collect();
        if let Some(outcome) = settle(&exact, name)? {
            return Ok(outcome);
        }

        // Normalized tier
        let query_norm = normalize_name(name);
        if !query_norm.is_empty() {
            let normalized: Vec<&PlayerEntry> = players
                .iter()
                .filter(|p| normalize_name(&p.name) == query_norm)
                .collect();
            if let Some(outcome) = settle(&normalized, name)? {
                return Ok(outcome);
            }
        }

        // Fuzzy tier
        let mut scored: Vec<(f64, &PlayerEntry)> = players
            .iter()
            .map(|p| ((self.similarity)(&query_norm, &normalize_name(&p.name)), p))
            .collect();
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

        let best = match scored.first() {
            Some(&(score, _)) => score,
            None => {
                return Err(ShotChartsError::PlayerNotFound {
                    name: name.to_string(),
                    suggestions: vec![],
                })
            }
        };
        if best < self.threshold {
            return Err(ShotChartsError::PlayerNotFound {
                name: name.to_string(),
                suggestions: top_names(&scored),
            });
        }
        let tied: Vec<&PlayerEntry> = scored
            .iter()
            .take_while(|(score, _)| (best - score).abs() < f64::EPSILON)
            .map(|(_, p)| *p)
            .collect();
        match settle(&tied, name)? {
            Some(outcome) => Ok(outcome),
            None => Err(ShotChartsError::PlayerNotFound {
                name: name.to_string(),
                suggestions: top_names(&scored),
            }),
        }
    }

    /// Resolves a team by three-letter code or franchise name.
    pub fn find_team<'a>(&self, teams: &'a [TeamEntry], query: &str) -> Result<&'a TeamEntry> {
        let query_lower = query.to_lowercase();
        if let Some(team) = teams.iter().find(|t| {
            t.abbreviation.to_lowercase() == query_lower || t.name.to_lowercase() == query_lower
        }) {
            return Ok(team);
        }

        let query_norm = normalize_name(query);
        if !query_norm.is_empty() {
            if let Some(team) = teams.iter().find(|t| normalize_name(&t.name) == query_norm) {
                return Ok(team);
            }
        }

        // Fuzzy tier scores both the code and the name, keeping the better
        let mut scored: Vec<(f64, &TeamEntry)> = teams
            .iter()
            .map(|t| {
                let by_name = (self.similarity)(&query_norm, &normalize_name(&t.name));
                let by_code =
                    (self.similarity)(&query_norm, &t.abbreviation.to_lowercase());
                (by_name.max(by_code), t)
            })
            .collect();
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

        let best = match scored.first() {
            Some(&(score, _)) => score,
            None => {
                return Err(ShotChartsError::TeamNotFound {
                    name: query.to_string(),
                    suggestions: vec![],
                })
            }
        };
        if best < self.threshold {
            let suggestions = scored
                .iter()
                .take(MAX_SUGGESTIONS)
                .map(|(_, t)| format!("{} ({})", t.name, t.abbreviation))
                .collect();
            return Err(ShotChartsError::TeamNotFound {
                name: query.to_string(),
                suggestions,
            });
        }
        let tied: Vec<&TeamEntry> = scored
            .iter()
            .take_while(|(score, _)| (best - score).abs() < f64::EPSILON)
            .map(|(_, t)| *t)
            .collect();
        if tied.len() > 1 {
            return Err(ShotChartsError::AmbiguousName {
                name: query.to_string(),
                candidates: tied.iter().map(|t| t.name.clone()).collect(),
            });
        }
        Ok(tied[0])
    }
}

/// Resolves a player name with the default matching policy.
pub fn find_player_id(players: &[PlayerEntry], name: &str) -> Result<i64> {
    NameMatcher::default()
        .find_player(players, name)
        .map(|p| p.id)
}

/// Resolves a team code or name with the default matching policy.
pub fn find_team_id(teams: &[TeamEntry], query: &str) -> Result<i64> {
    NameMatcher::default().find_team(teams, query).map(|t| t.id)
}

/// Collapses a tier's matches: none keeps searching, one distinct player
/// wins, several distinct players are ambiguous. Duplicate directory rows
/// for the same id count as one player.
fn settle<'a>(
    matches: &[&'a PlayerEntry],
    name: &str,
) -> Result<Option<&'a PlayerEntry>> {
    match matches {
        [] => Ok(None),
        [only] => Ok(Some(*only)),
        [first, rest @ ..] => {
            if rest.iter().all(|p| p.id == first.id) {
                return Ok(Some(*first));
            }
            Err(ShotChartsError::AmbiguousName {
                name: name.to_string(),
                candidates: matches.iter().map(|p| p.name.clone()).collect(),
            })
        }
    }
}

fn top_names(scored: &[(f64, &PlayerEntry)]) -> Vec<String> {
    scored
        .iter()
        .take(MAX_SUGGESTIONS)
        .map(|(_, p)| p.name.clone())
        .collect()
}

/// Lowercases, folds diacritics, and replaces punctuation with spaces,
/// collapsing runs: `"De'Aaron Fox"` and `"de aaron fox"` compare equal.
pub fn normalize_name(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        for lc in c.to_lowercase() {
            let folded = fold_diacritic(lc);
            if folded.is_alphanumeric() {
                out.push(folded);
            } else {
                out.push(' ');
            }
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Maps common accented Latin letters to their base letter. Covers the
/// characters that actually appear in league rosters.
fn fold_diacritic(c: char) -> char {
    match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ă' | 'ą' => 'a',
        'ç' | 'ć' | 'č' => 'c',
        'ď' | 'đ' => 'd',
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ė' | 'ę' => 'e',
        'ğ' => 'g',
        'ì' | 'í' | 'î' | 'ï' | 'ī' => 'i',
        'ł' => 'l',
        'ñ' | 'ń' => 'n',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' => 'o',
        'ř' => 'r',
        'ś' | 'ş' | 'š' => 's',
        'ť' => 't',
        'ù' | 'ú' | 'û' | 'ü' | 'ū' => 'u',
        'ý' | 'ÿ' => 'y',
        'ź' | 'ż' | 'ž' => 'z',
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster() -> Vec<PlayerEntry> {
        vec![
            PlayerEntry {
                id: 1628368,
                name: "De'Aaron Fox".to_string(),
            },
            PlayerEntry {
                id: 1627734,
                name: "Domantas Sabonis".to_string(),
            },
            PlayerEntry {
                id: 1629029,
                name: "Luka Dončić".to_string(),
            },
            PlayerEntry {
                id: 1630169,
                name: "Anthony Edwards".to_string(),
            },
        ]
    }

    #[test]
    fn normalize_strips_punctuation_to_spaces() {
        assert_eq!(normalize_name("De'Aaron Fox"), "de aaron fox");
        assert_eq!(normalize_name("de aaron fox"), "de aaron fox");
    }

    #[test]
    fn normalize_folds_diacritics() {
        assert_eq!(normalize_name("Luka Dončić"), "luka doncic");
        assert_eq!(normalize_name("Dāvis Bertāns"), "davis bertans");
    }

    #[test]
    fn normalize_collapses_whitespace() {
        assert_eq!(normalize_name("  K.J.   Martin "), "k j martin");
    }

    #[test]
    fn exact_match_case_insensitive() {
        let players = roster();
        assert_eq!(find_player_id(&players, "de'aaron fox").unwrap(), 1628368);
        assert_eq!(find_player_id(&players, "ANTHONY EDWARDS").unwrap(), 1630169);
    }

    #[test]
    fn normalized_match_bridges_apostrophes_and_accents() {
        let players = roster();
        assert_eq!(find_player_id(&players, "de aaron fox").unwrap(), 1628368);
        assert_eq!(find_player_id(&players, "Luka Doncic").unwrap(), 1629029);
    }

    #[test]
    fn fuzzy_match_tolerates_typos() {
        let players = roster();
        assert_eq!(find_player_id(&players, "Domantis Sabonis").unwrap(), 1627734);
    }

    #[test]
    fn exact_match_wins_over_higher_scoring_fuzzy() {
        let players = vec![
            PlayerEntry {
                id: 1,
                name: "Bob Smith".to_string(),
            },
            PlayerEntry {
                id: 2,
                name: "Robert Smithson".to_string(),
            },
        ];
        // A similarity function that adores the wrong candidate
        let matcher = NameMatcher::new(
            |_, b| if b.contains("robert") { 0.99 } else { 0.1 },
            0.85,
        );
        let found = matcher.find_player(&players, "Bob Smith").unwrap();
        assert_eq!(found.id, 1);
    }

    #[test]
    fn below_threshold_fails_with_closest_candidates() {
        let players = roster();
        let err = find_player_id(&players, "Michael Jordan").unwrap_err();
        match err {
            ShotChartsError::PlayerNotFound { suggestions, .. } => {
                assert_eq!(suggestions.len(), 3);
            }
            other => panic!("expected PlayerNotFound, got {other}"),
        }
    }

    #[test]
    fn tied_fuzzy_scores_are_ambiguous() {
        let players = vec![
            PlayerEntry {
                id: 10,
                name: "Jalen Green".to_string(),
            },
            PlayerEntry {
                id: 11,
                name: "Jalen Brown".to_string(),
            },
        ];
        // Everything ties above the threshold
        let matcher = NameMatcher::new(|_, _| 0.9, 0.85);
        let err = matcher.find_player(&players, "Jalen").unwrap_err();
        assert!(matches!(err, ShotChartsError::AmbiguousName { .. }));
    }

    #[test]
    fn duplicate_exact_names_are_ambiguous() {
        let players = vec![
            PlayerEntry {
                id: 100,
                name: "Mike James".to_string(),
            },
            PlayerEntry {
                id: 200,
                name: "Mike James".to_string(),
            },
        ];
        let err = find_player_id(&players, "Mike James").unwrap_err();
        match err {
            ShotChartsError::AmbiguousName { candidates, .. } => {
                assert_eq!(candidates.len(), 2);
            }
            other => panic!("expected AmbiguousName, got {other}"),
        }
    }

    #[test]
    fn duplicate_rows_for_one_player_are_not_ambiguous() {
        let players = vec![
            PlayerEntry {
                id: 100,
                name: "Mike James".to_string(),
            },
            PlayerEntry {
                id: 100,
                name: "Mike James".to_string(),
            },
        ];
        assert_eq!(find_player_id(&players, "Mike James").unwrap(), 100);
    }

    #[test]
    fn team_directory_loads_thirty_teams() {
        let teams = load_team_directory().unwrap();
        assert_eq!(teams.len(), 30);
        assert!(teams.iter().any(|t| t.abbreviation == "SAC"));
    }

    #[test]
    fn team_by_abbreviation_and_name() {
        let teams = load_team_directory().unwrap();
        assert_eq!(find_team_id(&teams, "sac").unwrap(), 1610612758);
        assert_eq!(find_team_id(&teams, "Sacramento Kings").unwrap(), 1610612758);
    }

    #[test]
    fn team_fuzzy_match_tolerates_typos() {
        let teams = load_team_directory().unwrap();
        assert_eq!(
            find_team_id(&teams, "Sacremento Kings").unwrap(),
            1610612758
        );
    }

    #[test]
    fn unknown_team_fails_with_suggestions() {
        let teams = load_team_directory().unwrap();
        let err = find_team_id(&teams, "Seattle SuperSonics").unwrap_err();
        match err {
            ShotChartsError::TeamNotFound { suggestions, .. } => {
                assert!(!suggestions.is_empty());
            }
            other => panic!("expected TeamNotFound, got {other}"),
        }
    }
}
