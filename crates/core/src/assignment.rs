//! Load-balanced auto-assignment scoring.
//!
//! Candidates are the active staff of the ticket's department. Each is
//! scored on specialty keyword matches against the ticket text plus an
//! inverse-load bonus; the highest score wins and first-seen order breaks
//! ties (strict-greater comparison).

/// Load above which the inverse-load bonus bottoms out at zero.
const LOAD_CAP: i32 = 5;

/// Score weight for each matching specialty keyword.
const SPECIALTY_WEIGHT: i32 = 2;

/// A staff member considered for assignment.
#[derive(Debug, Clone)]
pub struct Candidate<'a> {
    pub email: &'a str,
    pub specialties: &'a [String],
    pub current_load: i32,
}

/// Score one candidate against the (lowercased) ticket text.
///
/// `score = 2 x specialty hits + (5 - min(current_load, 5))`. Adding load
/// can only lower the score, never raise it.
pub fn score(text_lower: &str, candidate: &Candidate<'_>) -> i32 {
    let specialty_score: i32 = candidate
        .specialties
        .iter()
        .filter(|s| text_lower.contains(&s.to_lowercase()))
        .count() as i32
        * SPECIALTY_WEIGHT;

    let load_score = LOAD_CAP - candidate.current_load.min(LOAD_CAP).max(0);

    specialty_score + load_score
}

/// Pick the best candidate for a ticket, returning an index into
/// `candidates`. Returns `None` for an empty roster.
pub fn select<'a>(text: &str, candidates: &[Candidate<'a>]) -> Option<usize> {
    if candidates.is_empty() {
        return None;
    }

    let text_lower = text.to_lowercase();
    let mut best_index = 0;
    let mut best_score = 0;

    for (index, candidate) in candidates.iter().enumerate() {
        let candidate_score = score(&text_lower, candidate);
        if candidate_score > best_score {
            best_score = candidate_score;
            best_index = index;
        }
    }

    Some(best_index)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate<'a>(email: &'a str, specialties: &'a [String], load: i32) -> Candidate<'a> {
        Candidate {
            email,
            specialties,
            current_load: load,
        }
    }

    #[test]
    fn specialty_match_outweighs_small_load_difference() {
        let net: Vec<String> = vec!["network".into()];
        let none: Vec<String> = vec![];
        let candidates = [
            candidate("idle@staff.example", &none, 0),      // score 5
            candidate("expert@staff.example", &net, 1),     // score 2 + 4 = 6
        ];
        let picked = select("the network is down in block C", &candidates).unwrap();
        assert_eq!(candidates[picked].email, "expert@staff.example");
    }

    #[test]
    fn lower_load_wins_without_specialty_matches() {
        let none: Vec<String> = vec![];
        let candidates = [
            candidate("busy@staff.example", &none, 3), // score 2
            candidate("free@staff.example", &none, 0), // score 5
        ];
        let picked = select("printer jam", &candidates).unwrap();
        assert_eq!(candidates[picked].email, "free@staff.example");
    }

    #[test]
    fn first_seen_order_breaks_ties() {
        let none: Vec<String> = vec![];
        let candidates = [
            candidate("first@staff.example", &none, 2),
            candidate("second@staff.example", &none, 2),
        ];
        let picked = select("anything", &candidates).unwrap();
        assert_eq!(candidates[picked].email, "first@staff.example");
    }

    #[test]
    fn adding_load_never_raises_a_score() {
        let specialties: Vec<String> = vec!["hardware".into()];
        for load in 0..10 {
            let lighter = score(
                "hardware fault",
                &candidate("a@staff.example", &specialties, load),
            );
            let heavier = score(
                "hardware fault",
                &candidate("a@staff.example", &specialties, load + 1),
            );
            assert!(heavier <= lighter, "load {load}: {heavier} > {lighter}");
        }
    }

    #[test]
    fn load_bonus_bottoms_out_at_zero() {
        let none: Vec<String> = vec![];
        assert_eq!(score("x", &candidate("a@s", &none, 5)), 0);
        assert_eq!(score("x", &candidate("a@s", &none, 50)), 0);
    }

    #[test]
    fn selection_is_deterministic() {
        let hw: Vec<String> = vec!["hardware".into(), "software".into()];
        let net: Vec<String> = vec!["network".into()];
        let candidates = [
            candidate("a@staff.example", &hw, 2),
            candidate("b@staff.example", &net, 1),
        ];
        let text = "my software keeps crashing";
        let first = select(text, &candidates).unwrap();
        for _ in 0..10 {
            assert_eq!(select(text, &candidates).unwrap(), first);
        }
    }

    #[test]
    fn empty_roster_selects_nobody() {
        assert_eq!(select("anything", &[]), None);
    }

    #[test]
    fn specialty_matching_is_case_insensitive() {
        let specialties: Vec<String> = vec!["WiFi".into()];
        let c = candidate("a@staff.example", &specialties, 5);
        assert_eq!(score("the wifi is down", &c), 2);
    }
}
