//! Additive keyword fit scoring.
//!
//! A listing starts at [`BASE_SCORE`], earns [`KEYWORD_POINTS`] for every
//! entry of [`FIT_KEYWORDS`] found in its title or excerpt, and
//! [`LOCATION_POINTS`] when its location matches a configured target. The
//! total is capped at [`MAX_SCORE`].

use crate::types::{JobListing, ScoredListing};

pub const BASE_SCORE: u32 = 50;
pub const KEYWORD_POINTS: u32 = 10;
pub const LOCATION_POINTS: u32 = 20;
pub const MAX_SCORE: u8 = 100;

pub const FIT_KEYWORDS: [&str; 6] = [
    "localization",
    "project manager",
    "transcreation",
    "remote",
    "pm",
    "manager",
];

#[derive(Debug, Clone)]
pub struct FitScorer {
    target_locations: Vec<String>,
}

impl FitScorer {
    pub fn new(target_locations: &[String]) -> Self {
        Self {
            target_locations: target_locations
                .iter()
                .map(|loc| loc.to_lowercase())
                .collect(),
        }
    }

    pub fn score(&self, listing: &JobListing) -> u8 {
        let title = listing.title.to_lowercase();
        let excerpt = listing.excerpt.to_lowercase();

        let keyword_total: u32 = FIT_KEYWORDS
            .iter()
            .filter(|keyword| title.contains(*keyword) || excerpt.contains(*keyword))
            .map(|_| KEYWORD_POINTS)
            .sum();

        let location = listing.location.to_lowercase();
        let location_bonus = if self
            .target_locations
            .iter()
            .any(|target| location.contains(target.as_str()))
        {
            LOCATION_POINTS
        } else {
            0
        };

        let total = BASE_SCORE + keyword_total + location_bonus;
        total.min(MAX_SCORE as u32) as u8
    }

    pub fn score_all(&self, listings: Vec<JobListing>) -> Vec<ScoredListing> {
        listings
            .into_iter()
            .map(|listing| {
                let fit_score = self.score(&listing);
                ScoredListing::new(listing, fit_score)
            })
            .collect()
    }
}

/// Keeps only listings whose score reaches `min_fit_score`, preserving order.
pub fn retain_qualified(listings: Vec<ScoredListing>, min_fit_score: u8) -> Vec<ScoredListing> {
    listings
        .into_iter()
        .filter(|scored| scored.fit_score >= min_fit_score)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn listing(title: &str, excerpt: &str, location: &str) -> JobListing {
        JobListing::new(
            title,
            "Acme",
            "https://linkedin.com/jobs/view/1".to_string(),
            excerpt,
            location.to_string(),
            Utc::now(),
        )
        .unwrap()
    }

    fn scorer(locations: &[&str]) -> FitScorer {
        let locations: Vec<String> = locations.iter().map(|l| l.to_string()).collect();
        FitScorer::new(&locations)
    }

    #[test]
    fn test_strong_match_is_capped_at_100() {
        let scorer = scorer(&["remote"]);
        let job = listing(
            "Localization Project Manager",
            "Fully remote role",
            "Remote",
        );
        assert_eq!(scorer.score(&job), 100);
    }

    #[test]
    fn test_unrelated_listing_gets_base_score() {
        let scorer = scorer(&["remote"]);
        let job = listing("Barista", "Pour coffee all day", "Pune");
        assert_eq!(scorer.score(&job), 50);
    }

    #[test]
    fn test_each_keyword_counts_once() {
        let scorer = scorer(&["berlin"]);
        // "manager" appears twice, "project manager" once.
        let job = listing("Project Manager", "manager of managers", "Pune");
        assert_eq!(scorer.score(&job), 70);
    }

    #[test]
    fn test_pm_matches_as_substring() {
        let scorer = scorer(&["berlin"]);
        let job = listing("Developer", "we ship npm packages", "Pune");
        assert_eq!(scorer.score(&job), 60);
    }

    #[test]
    fn test_location_bonus_is_case_insensitive_substring() {
        let scorer = scorer(&["REMOTE", "Mumbai"]);
        let job = listing("Barista", "", "mumbai, india");
        assert_eq!(scorer.score(&job), 70);
    }

    #[test]
    fn test_score_is_always_in_bounds() {
        let scorer = scorer(&["remote"]);
        let titles = [
            "",
            "localization transcreation project manager pm remote",
            "x",
        ];
        for title in titles {
            let job = JobListing {
                title: title.to_string(),
                company: "Acme".to_string(),
                link: "https://linkedin.com/x".to_string(),
                excerpt: "remote localization".to_string(),
                location: "remote".to_string(),
                source: "linkedin".to_string(),
                created_at: Utc::now(),
            };
            let score = scorer.score(&job);
            assert!((50..=100).contains(&score));
        }
    }

    #[test]
    fn test_retain_qualified_uses_inclusive_threshold() {
        let scorer = scorer(&["remote"]);
        let scored = scorer.score_all(vec![
            listing("Barista", "", "Pune"),
            listing("Localization Project Manager", "", "remote"),
            listing("Localization lead", "", "Pune"),
        ]);
        let scores: Vec<u8> = scored.iter().map(|s| s.fit_score).collect();
        assert_eq!(scores, vec![50, 100, 60]);

        let kept = retain_qualified(scored, 60);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].listing.title, "Localization Project Manager");
        assert_eq!(kept[1].listing.title, "Localization lead");
    }
}
