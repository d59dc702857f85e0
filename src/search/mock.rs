use chrono::{DateTime, Duration, Utc};
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{stable_hash64, Platform, SearchResult};

const MAX_MOCK_RESULTS: usize = 10;

const CHANNELS: &[&str] = &[
    "Tech Burner",
    "Home Gadget Lab",
    "Geekyranjit",
    "Trakin Tech",
    "Smart Home India",
    "Review Room",
];

const SITES: &[&str] = &[
    "www.amazon.in",
    "www.flipkart.com",
    "www.91mobiles.com",
    "www.smartprix.com",
    "www.livemint.com",
    "www.digit.in",
];

const POSITIVE_COMMENTS: &[&str] = &[
    "Great fan, very quiet and the remote works perfectly",
    "Excellent energy savings, my bill went down",
    "Love the design, looks elegant on the ceiling",
    "Best purchase this summer, highly recommended",
];

const NEGATIVE_COMMENTS: &[&str] = &[
    "Terrible after sales service, waited two weeks",
    "The app is useless and keeps disconnecting",
    "Noisy motor after three months, disappointed",
];

const NEUTRAL_COMMENTS: &[&str] = &[
    "Which model is this?",
    "How much does installation cost?",
    "Does it work with Alexa?",
];

/// Deterministic fixtures for platforms running without live credentials.
/// The same keyword and reference time always yield the same results.
#[derive(Debug, Clone)]
pub struct MockSearch {
    brand: String,
    competitors: Vec<String>,
    reference_time: DateTime<Utc>,
}

impl MockSearch {
    pub fn new(brand: &str, competitors: &[String], reference_time: DateTime<Utc>) -> Self {
        Self {
            brand: brand.to_string(),
            competitors: competitors.to_vec(),
            reference_time,
        }
    }

    pub fn search(&self, platform: Platform, keyword: &str, top_n: usize) -> Vec<SearchResult> {
        let seed = stable_hash64(&format!("{}:{}", platform.label(), keyword.to_lowercase()));
        let mut rng = StdRng::seed_from_u64(seed);
        let count = top_n.min(MAX_MOCK_RESULTS);

        (0..count)
            .map(|index| self.build_result(&mut rng, platform, keyword, index))
            .collect()
    }

    fn build_result(
        &self,
        rng: &mut StdRng,
        platform: Platform,
        keyword: &str,
        index: usize,
    ) -> SearchResult {
        let featured = self.pick_brand(rng);
        let rival = self.pick_competitor(rng, &featured);
        let (title, description) = headline(rng.gen_range(0..8), keyword, &featured, &rival);

        let rank_position = index + 1;
        let slug = urlencoding::encode(&keyword.to_lowercase().replace(' ', "-")).into_owned();

        match platform {
            Platform::YouTube => {
                let view_count = rank_position as u64 * 10_000 + rng.gen_range(1_000..=5_000);
                let like_count = (view_count as f64 * rng.gen_range(0.01..0.03)) as u64;
                let comment_count = (view_count as f64 * rng.gen_range(0.001..0.005)) as u64;
                let comments = sample_comments(rng);
                SearchResult {
                    keyword: keyword.to_string(),
                    platform,
                    title,
                    description,
                    channel: CHANNELS[rng.gen_range(0..CHANNELS.len())].to_string(),
                    link: format!("https://www.youtube.com/watch?v=mock-{}-{}", slug, rank_position),
                    view_count,
                    like_count,
                    comment_count,
                    published_at: Some(self.reference_time - Duration::weeks(rank_position as i64)),
                    rank_position,
                    comments,
                }
            }
            Platform::Google => {
                let site = SITES[rng.gen_range(0..SITES.len())];
                SearchResult {
                    keyword: keyword.to_string(),
                    platform,
                    title,
                    description,
                    channel: site.to_string(),
                    link: format!("https://{}/{}-{}", site, slug, rank_position),
                    view_count: 0,
                    like_count: 0,
                    comment_count: 0,
                    published_at: None,
                    rank_position,
                    comments: Vec::new(),
                }
            }
        }
    }

    // Target brand shows up about a third of the time.
    fn pick_brand(&self, rng: &mut StdRng) -> String {
        if self.competitors.is_empty() || rng.gen::<f64>() < 0.35 {
            return self.brand.clone();
        }
        self.competitors[rng.gen_range(0..self.competitors.len())].clone()
    }

    fn pick_competitor(&self, rng: &mut StdRng, featured: &str) -> String {
        let pool: Vec<&String> = self
            .competitors
            .iter()
            .filter(|competitor| !competitor.eq_ignore_ascii_case(featured))
            .collect();
        if pool.is_empty() {
            return self.brand.clone();
        }
        pool[rng.gen_range(0..pool.len())].clone()
    }
}

fn headline(template: usize, keyword: &str, brand: &str, rival: &str) -> (String, String) {
    match template {
        0 => (
            format!("{} {} review - honest opinion after 6 months", brand, keyword),
            format!("Long term review of the {} {}: noise, power draw and build quality.", brand, keyword),
        ),
        1 => (
            format!("{} vs {}: which {} should you buy?", brand, rival, keyword),
            format!("Side by side comparison of {} and {} on speed, energy use and price.", brand, rival),
        ),
        2 => (
            format!("{} buying guide 2024", keyword),
            format!("Everything to check before buying a {}: motor type, warranty and remote features.", keyword),
        ),
        3 => (
            format!("{} {} unboxing and installation", brand, keyword),
            format!("Step by step installation of the {} {} at home.", brand, keyword),
        ),
        4 => (
            format!("Best {} in India - excellent energy savings with {}", keyword, brand),
            format!("Why the {} {} is a great pick for saving power this summer.", brand, keyword),
        ),
        5 => (
            format!("{} launches new {} with BLDC motor", brand, keyword),
            format!("{} announced a new {} range with app control and lower power use.", brand, keyword),
        ),
        6 => (
            format!("Why I regret buying this {}", keyword),
            format!("Noisy motor and poor service: my experience with a {} from {}.", keyword, brand),
        ),
        _ => (
            format!("How to choose a {} for your home", keyword),
            "Room size, blade sweep and smart features explained.".to_string(),
        ),
    }
}

fn sample_comments(rng: &mut StdRng) -> Vec<String> {
    let mut comments = Vec::with_capacity(3);
    for _ in 0..3 {
        let roll = rng.gen::<f64>();
        let pool = if roll < 0.55 {
            POSITIVE_COMMENTS
        } else if roll < 0.8 {
            NEUTRAL_COMMENTS
        } else {
            NEGATIVE_COMMENTS
        };
        comments.push(pool[rng.gen_range(0..pool.len())].to_string());
    }
    comments
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn mock() -> MockSearch {
        let competitors = vec!["Havells".to_string(), "Crompton".to_string()];
        let reference = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        MockSearch::new("Atomberg", &competitors, reference)
    }

    #[test]
    fn fixtures_are_deterministic() {
        let first = mock().search(Platform::YouTube, "smart fan", 20);
        let second = mock().search(Platform::YouTube, "smart fan", 20);
        assert_eq!(first.len(), 10);
        for (a, b) in first.iter().zip(second.iter()) {
            assert_eq!(a.title, b.title);
            assert_eq!(a.view_count, b.view_count);
            assert_eq!(a.comments, b.comments);
        }
    }

    #[test]
    fn youtube_fixture_metrics_follow_rank() {
        let results = mock().search(Platform::YouTube, "BLDC fan", 5);
        assert_eq!(results.len(), 5);
        for result in &results {
            let base = result.rank_position as u64 * 10_000;
            assert!(result.view_count >= base + 1_000 && result.view_count <= base + 5_000);
            assert!(result.like_count <= result.view_count * 3 / 100);
            assert!(result.published_at.is_some());
        }
    }

    #[test]
    fn google_fixtures_have_no_engagement() {
        let results = mock().search(Platform::Google, "smart fan", 3);
        assert!(results.iter().all(|result| result.view_count == 0));
        assert_eq!(results[2].rank_position, 3);
    }
}
