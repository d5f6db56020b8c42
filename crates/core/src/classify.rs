//! Keyword-based classification of ticket text.
//!
//! Departments, priorities, and tags are inferred by scoring free text
//! against fixed keyword tables. Matching is naive case-insensitive
//! *substring* matching, not word-boundary tokenization: short keywords can
//! false-positive on unrelated words (e.g. "key" inside "monkey"). This is
//! a known imprecision kept for predictable, explainable behaviour.

use crate::ticket::TicketPriority;

/// Department the classifier falls back to when nothing matches.
pub const DEFAULT_DEPARTMENT: &str = "IT Support";

/// Maximum number of tags generated for a ticket.
pub const MAX_TAGS: usize = 5;

/// Keyword table per department, in enumeration order. Order matters:
/// score ties resolve to the earliest entry.
pub const DEPARTMENT_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "IT Support",
        &[
            "password", "reset", "computer", "laptop", "wifi", "internet", "network", "software",
            "hardware", "login", "account", "email", "portal", "access", "system", "printer",
            "printing", "scan", "virus", "malware", "browser", "website", "download", "upload",
        ],
    ),
    (
        "Library",
        &[
            "book", "borrow", "return", "library", "resource", "journal", "article", "database",
            "research", "reserve", "renew", "fine", "overdue", "catalog", "collection", "shelf",
            "librarian", "study room", "reference",
        ],
    ),
    (
        "Finance",
        &[
            "fee", "payment", "invoice", "receipt", "scholarship", "bursary", "loan", "mpesa",
            "bank", "transaction", "deposit", "refund", "balance", "statement", "financial aid",
            "billing", "account", "credit", "debit", "charge",
        ],
    ),
    (
        "Academics",
        &[
            "course", "class", "lecture", "professor", "instructor", "grade", "exam", "test",
            "assignment", "syllabus", "curriculum", "credit", "semester", "registration",
            "withdraw", "transcript", "academic", "faculty", "dean", "department",
        ],
    ),
    (
        "Admissions",
        &[
            "application", "admit", "admission", "enroll", "enrollment", "document",
            "certificate", "diploma", "transcript", "recommendation", "reference", "deadline",
            "requirement", "transfer", "freshman", "undergraduate", "graduate", "international",
        ],
    ),
    (
        "Facilities",
        &[
            "room", "building", "hall", "dormitory", "hostel", "maintenance", "repair",
            "cleaning", "security", "key", "lock", "light", "electricity", "water", "plumbing",
            "heating", "cooling", "air conditioning", "furniture", "parking",
        ],
    ),
    (
        "Student Affairs",
        &[
            "club", "organization", "activity", "event", "counseling", "health", "wellness",
            "disability", "accommodation", "housing", "residence", "meal", "food", "dining",
            "recreation", "sport", "gym", "id card", "student life",
        ],
    ),
];

/// Keyword table per priority, most urgent first. Earlier entries win ties,
/// so a text matching equally many "urgent" and "high" keywords is urgent.
const PRIORITY_KEYWORDS: &[(TicketPriority, &[&str])] = &[
    (
        TicketPriority::Urgent,
        &[
            "urgent", "emergency", "immediately", "critical", "severe", "asap", "right now",
            "deadline today", "locked out", "cannot access", "broken", "not working", "down",
            "error", "failed", "serious", "important", "crucial", "vital",
        ],
    ),
    (
        TicketPriority::High,
        &[
            "important", "soon", "quickly", "priority", "significant", "major", "pressing",
            "needed", "required", "essential", "necessary", "key", "vital", "crucial",
        ],
    ),
    (
        TicketPriority::Medium,
        &[
            "moderate", "average", "standard", "normal", "regular", "routine", "common", "usual",
            "typical", "general", "ordinary",
        ],
    ),
    (
        TicketPriority::Low,
        &[
            "minor", "trivial", "small", "insignificant", "whenever", "low priority",
            "not urgent", "when possible", "at your convenience", "no rush", "take your time",
            "eventually",
        ],
    ),
];

/// Names of all departments, in enumeration order.
pub fn department_names() -> impl Iterator<Item = &'static str> {
    DEPARTMENT_KEYWORDS.iter().map(|(name, _)| *name)
}

/// Number of keywords from `keywords` present in `text_lower` as substrings.
/// Each keyword counts at most once regardless of repetition.
fn keyword_hits(text_lower: &str, keywords: &[&str]) -> usize {
    keywords.iter().filter(|kw| text_lower.contains(*kw)).count()
}

/// Infer the department for a ticket from its title + description.
///
/// Highest keyword score wins; ties and an all-zero score fall back to the
/// first department in enumeration order (IT Support).
pub fn detect_department(text: &str) -> &'static str {
    let text_lower = text.to_lowercase();
    let mut best = DEFAULT_DEPARTMENT;
    let mut best_score = 0;

    for (department, keywords) in DEPARTMENT_KEYWORDS {
        let score = keyword_hits(&text_lower, keywords);
        if score > best_score {
            best_score = score;
            best = department;
        }
    }

    best
}

/// Infer the priority for a ticket from its title + description.
/// Defaults to `medium` when no keyword matches.
pub fn detect_priority(text: &str) -> TicketPriority {
    let text_lower = text.to_lowercase();
    let mut best = TicketPriority::Medium;
    let mut best_score = 0;

    for (priority, keywords) in PRIORITY_KEYWORDS {
        let score = keyword_hits(&text_lower, keywords);
        if score > best_score {
            best_score = score;
            best = *priority;
        }
    }

    best
}

/// Collect descriptive tags for a ticket: every department keyword found in
/// the text, deduplicated, capped at [`MAX_TAGS`]. Scanning stops at the cap
/// so tag sets are stable under table growth past the fifth hit.
pub fn generate_tags(text: &str) -> Vec<String> {
    let text_lower = text.to_lowercase();
    let mut tags: Vec<String> = Vec::new();

    for (_, keywords) in DEPARTMENT_KEYWORDS {
        for kw in *keywords {
            if text_lower.contains(kw) && !tags.iter().any(|t| t == kw) {
                tags.push((*kw).to_string());
                if tags.len() >= MAX_TAGS {
                    return tags;
                }
            }
        }
    }

    tags
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn portal_login_text_maps_to_it_support() {
        let text = "Cannot access student portal. I forgot my password and the login page \
                    rejects me.";
        assert_eq!(detect_department(text), "IT Support");
    }

    #[test]
    fn library_text_maps_to_library() {
        assert_eq!(
            detect_department("I need to renew a book and pay an overdue fine at the library"),
            "Library"
        );
    }

    #[test]
    fn unmatched_text_falls_back_to_it_support() {
        assert_eq!(detect_department("hello there"), DEFAULT_DEPARTMENT);
        assert_eq!(detect_department(""), DEFAULT_DEPARTMENT);
    }

    #[test]
    fn classification_is_deterministic() {
        let text = "My fee payment receipt never arrived and my balance looks wrong";
        let first = detect_department(text);
        for _ in 0..10 {
            assert_eq!(detect_department(text), first);
        }
        assert_eq!(first, "Finance");
    }

    #[test]
    fn priority_defaults_to_medium() {
        assert_eq!(
            detect_priority("Question about the cafeteria menu"),
            TicketPriority::Medium
        );
    }

    #[test]
    fn urgent_keywords_win() {
        assert_eq!(
            detect_priority("This is urgent, an emergency, please fix immediately"),
            TicketPriority::Urgent
        );
    }

    #[test]
    fn substring_matching_is_not_word_aware() {
        // "key" (Facilities) matches inside "monkey" -- accepted imprecision.
        let tags = generate_tags("a monkey stole my lunch");
        assert!(tags.contains(&"key".to_string()));
    }

    #[test]
    fn tags_are_deduplicated_and_capped() {
        // "account" appears in both the IT Support and Finance tables; it
        // must be collected once.
        let tags = generate_tags("my account account account");
        assert_eq!(tags.iter().filter(|t| *t == "account").count(), 1);

        let tags = generate_tags(
            "password reset for my computer and laptop, wifi and internet are down, \
             network problems with software",
        );
        assert_eq!(tags.len(), MAX_TAGS);
        assert_eq!(tags, ["password", "reset", "computer", "laptop", "wifi"]);
    }

    #[test]
    fn tag_generation_is_deterministic() {
        let text = "printer out of toner, printing fails, scan broken";
        assert_eq!(generate_tags(text), generate_tags(text));
    }

    #[test]
    fn department_names_are_in_enumeration_order() {
        let names: Vec<_> = department_names().collect();
        assert_eq!(names[0], "IT Support");
        assert_eq!(names.len(), 7);
        assert!(names.contains(&"Student Affairs"));
    }
}
