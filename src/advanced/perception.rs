//! Compares what the target brand says about itself with what viewers and
//! reviewers say back.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::advanced::{AnalysisInput, TermGroups};
use crate::sentiment::{aggregate_labels, SentimentLabel};
use crate::{mean, Platform, SearchResult};

const MESSAGING: TermGroups = &[
    ("energy_efficiency", &["energy", "efficient", "power saving", "electricity", "save"]),
    ("smart_features", &["smart", "remote", "app", "wifi", "alexa"]),
    ("quiet_operation", &["quiet", "silent", "noiseless"]),
    ("modern_design", &["design", "stylish", "modern", "sleek", "looks"]),
    ("value_proposition", &["value", "worth", "affordable", "price"]),
];

const ATTRIBUTES: TermGroups = &[
    ("quality", &["quality", "build", "durable", "sturdy"]),
    ("price", &["price", "cost", "expensive", "cheap", "affordable"]),
    ("features", &["feature", "remote", "smart", "speed", "mode"]),
    ("design", &["design", "look", "color", "finish", "style"]),
    ("performance", &["performance", "air", "speed", "cooling", "efficient"]),
];

const ASSOCIATIONS: TermGroups = &[
    ("premium", &["premium", "luxury", "high-end"]),
    ("budget", &["budget", "cheap", "low cost"]),
    ("reliable", &["reliable", "durable", "long lasting"]),
    ("service", &["service", "technician", "support"]),
    ("noise", &["noise", "noisy", "sound", "hum"]),
    ("warranty", &["warranty", "guarantee", "replacement"]),
    ("installation", &["install", "fitting", "mounting"]),
    ("wobble", &["wobble", "shake", "vibration"]),
    ("delivery", &["delivery", "shipping", "arrived"]),
    ("power_cuts", &["inverter", "power cut", "backup"]),
    ("dust", &["dust", "cleaning"]),
];

const INFLUENCER_TERMS: &[&str] = &["review", "unboxing"];
const INFLUENCER_VIEWS: u64 = 50_000;
const RESONATING_RATE: f64 = 20.0;
const IGNORED_RATE: f64 = 5.0;
const MAX_ASSOCIATIONS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    Aligned,
    OverPromised,
    UnderCommunicated,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageAlignment {
    pub message: String,
    pub advertised_mentions: usize,
    pub discussed_mentions: usize,
    pub advertised_share: f64,
    pub discussed_share: f64,
    pub alignment: Alignment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resonance {
    Resonating,
    Moderate,
    Ignored,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValueProposition {
    pub proposition: String,
    pub discussion_rate: f64,
    pub resonance: Resonance,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrandAttributeScore {
    pub brand: String,
    pub mentions: usize,
    pub sentiment: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributeComparison {
    pub attribute: String,
    pub scores: Vec<BrandAttributeScore>,
    pub leader: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Association {
    pub association: String,
    pub mentions: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LabelDistribution {
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,
}

impl LabelDistribution {
    fn add(&mut self, label: SentimentLabel) {
        match label {
            SentimentLabel::Positive => self.positive += 1,
            SentimentLabel::Neutral => self.neutral += 1,
            SentimentLabel::Negative => self.negative += 1,
        }
    }

    fn total(&self) -> usize {
        self.positive + self.neutral + self.negative
    }

    pub fn positive_ratio(&self) -> f64 {
        match self.total() {
            0 => 0.0,
            total => self.positive as f64 / total as f64,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VoiceComparison {
    pub influencer: LabelDistribution,
    pub customer: LabelDistribution,
    /// Influencer positive ratio minus customer positive ratio.
    pub positivity_gap: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformPerception {
    pub platform: Platform,
    pub distribution: LabelDistribution,
    pub dominant: SentimentLabel,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PerceptionGapAnalysis {
    pub messaging_vs_reality: Vec<MessageAlignment>,
    pub value_propositions: Vec<ValueProposition>,
    pub competitive_attributes: Vec<AttributeComparison>,
    pub unexpected_associations: Vec<Association>,
    pub influencer_vs_customer: VoiceComparison,
    pub platform_perception: Vec<PlatformPerception>,
    pub alignment_recommendations: Vec<String>,
}

fn share(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}

fn count_matching(texts: &[String], terms: &[&str]) -> usize {
    texts.iter().filter(|text| crate::contains_any(text, terms)).count()
}

/// Empty until the brand has both its own coverage and audience comments.
fn messaging_vs_reality(advertised: &[String], discussed: &[String]) -> Vec<MessageAlignment> {
    if advertised.is_empty() || discussed.is_empty() {
        return Vec::new();
    }
    MESSAGING
        .iter()
        .map(|(message, terms)| {
            let advertised_mentions = count_matching(advertised, terms);
            let discussed_mentions = count_matching(discussed, terms);
            let advertised_share = share(advertised_mentions, advertised.len());
            let discussed_share = share(discussed_mentions, discussed.len());
            let alignment = if advertised_share - discussed_share > 20.0 {
                Alignment::OverPromised
            } else if discussed_share - advertised_share > 20.0 {
                Alignment::UnderCommunicated
            } else {
                Alignment::Aligned
            };
            MessageAlignment {
                message: message.to_string(),
                advertised_mentions,
                discussed_mentions,
                advertised_share,
                discussed_share,
                alignment,
            }
        })
        .collect()
}

fn value_propositions(discussed: &[String]) -> Vec<ValueProposition> {
    if discussed.is_empty() {
        return Vec::new();
    }
    MESSAGING
        .iter()
        .map(|(message, terms)| {
            let discussion_rate = share(count_matching(discussed, terms), discussed.len());
            ValueProposition {
                proposition: message.to_string(),
                discussion_rate,
                resonance: if discussion_rate > RESONATING_RATE {
                    Resonance::Resonating
                } else if discussion_rate < IGNORED_RATE {
                    Resonance::Ignored
                } else {
                    Resonance::Moderate
                },
            }
        })
        .collect()
}

/// Lowercased title, description and comments of every result naming `brand`.
fn brand_texts(results: &[SearchResult], brand: &str) -> Vec<String> {
    results
        .iter()
        .filter(|result| result.mentions(brand))
        .flat_map(|result| {
            std::iter::once(result.text())
                .chain(result.comments.iter().cloned())
                .map(|text| text.to_lowercase())
        })
        .collect()
}

fn competitive_attributes(input: &AnalysisInput<'_>) -> Vec<AttributeComparison> {
    let texts: Vec<(&String, Vec<String>)> = input
        .brands
        .iter()
        .map(|brand| (brand, brand_texts(input.results, brand)))
        .collect();

    ATTRIBUTES
        .iter()
        .map(|(attribute, terms)| {
            let scores: Vec<BrandAttributeScore> = texts
                .iter()
                .map(|(brand, texts)| {
                    let values: Vec<f64> = texts
                        .iter()
                        .filter(|text| crate::contains_any(text, terms))
                        .map(|text| input.sentiment.assess(text).score)
                        .collect();
                    BrandAttributeScore {
                        brand: brand.to_string(),
                        mentions: values.len(),
                        sentiment: mean(&values),
                    }
                })
                .collect();
            let leader = scores
                .iter()
                .filter(|score| score.mentions > 0)
                .max_by(|a, b| a.sentiment.partial_cmp(&b.sentiment).unwrap_or(Ordering::Equal))
                .map(|score| score.brand.clone());
            AttributeComparison {
                attribute: attribute.to_string(),
                scores,
                leader,
            }
        })
        .collect()
}

fn unexpected_associations(texts: &[String]) -> Vec<Association> {
    let mut found: Vec<Association> = ASSOCIATIONS
        .iter()
        .map(|(association, terms)| Association {
            association: association.to_string(),
            mentions: count_matching(texts, terms),
        })
        .filter(|entry| entry.mentions > 0)
        .collect();
    found.sort_by(|a, b| b.mentions.cmp(&a.mentions));
    found.truncate(MAX_ASSOCIATIONS);
    found
}

fn influencer_vs_customer(input: &AnalysisInput<'_>) -> VoiceComparison {
    let mut influencer = LabelDistribution::default();
    let mut customer = LabelDistribution::default();
    for result in input.brand_results() {
        let title = result.title.to_lowercase();
        if result.view_count > INFLUENCER_VIEWS || crate::contains_any(&title, INFLUENCER_TERMS) {
            influencer.add(input.sentiment.label(&result.text()));
        }
        for comment in &result.comments {
            customer.add(input.sentiment.label(comment));
        }
    }
    VoiceComparison {
        positivity_gap: influencer.positive_ratio() - customer.positive_ratio(),
        influencer,
        customer,
    }
}

fn platform_perception(input: &AnalysisInput<'_>) -> Vec<PlatformPerception> {
    Platform::ALL
        .iter()
        .filter_map(|platform| {
            let labels: Vec<SentimentLabel> = input
                .brand_results()
                .filter(|result| result.platform == *platform)
                .map(|result| input.sentiment.result_label(result))
                .collect();
            if labels.is_empty() {
                return None;
            }
            let mut distribution = LabelDistribution::default();
            for label in &labels {
                distribution.add(*label);
            }
            Some(PlatformPerception {
                platform: *platform,
                distribution,
                dominant: aggregate_labels(&labels),
            })
        })
        .collect()
}

fn recommendations(analysis: &PerceptionGapAnalysis) -> Vec<String> {
    let mut out = Vec::new();
    for entry in &analysis.messaging_vs_reality {
        let message = entry.message.replace('_', " ");
        match entry.alignment {
            Alignment::OverPromised => out.push(format!(
                "Back up {} claims with demonstrations; audiences rarely bring it up",
                message
            )),
            Alignment::UnderCommunicated => out.push(format!(
                "Audiences talk about {} more than the brand does; feature it in messaging",
                message
            )),
            Alignment::Aligned => {}
        }
    }
    for proposition in &analysis.value_propositions {
        if proposition.resonance == Resonance::Resonating {
            out.push(format!(
                "Lead campaigns with {}, which drives {:.1}% of discussion",
                proposition.proposition.replace('_', " "),
                proposition.discussion_rate
            ));
        }
    }
    if analysis.influencer_vs_customer.positivity_gap > 0.2 {
        out.push(
            "Customer comments are less positive than creator coverage; address post-purchase issues"
                .to_string(),
        );
    }
    if let Some(association) = analysis.unexpected_associations.first() {
        out.push(format!(
            "Audiences associate the brand with '{}'; decide whether to own or counter it",
            association.association.replace('_', " ")
        ));
    }
    out
}

pub fn analyze_perception(input: &AnalysisInput<'_>) -> PerceptionGapAnalysis {
    if input.results.is_empty() {
        return PerceptionGapAnalysis::default();
    }

    let advertised: Vec<String> = input
        .brand_results()
        .map(|result| result.text().to_lowercase())
        .collect();
    let discussed: Vec<String> = input
        .brand_results()
        .flat_map(|result| result.comments.iter().map(|comment| comment.to_lowercase()))
        .collect();
    let all_brand_text = brand_texts(input.results, input.brand());

    let mut analysis = PerceptionGapAnalysis {
        messaging_vs_reality: messaging_vs_reality(&advertised, &discussed),
        value_propositions: value_propositions(&discussed),
        competitive_attributes: competitive_attributes(input),
        unexpected_associations: unexpected_associations(&all_brand_text),
        influencer_vs_customer: influencer_vs_customer(input),
        platform_perception: platform_perception(input),
        alignment_recommendations: Vec::new(),
    };
    analysis.alignment_recommendations = recommendations(&analysis);
    analysis
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advanced::fixtures::{result, Owned};

    fn commented(title: &str, views: u64, comments: &[&str]) -> SearchResult {
        let mut item = result(Platform::YouTube, "smart fan", 1, title, views);
        item.comments = comments.iter().map(|comment| comment.to_string()).collect();
        item
    }

    #[test]
    fn advertised_but_undiscussed_message_is_over_promised() {
        let owned = Owned::new(vec![commented(
            "Atomberg smart fan saves energy",
            1_000,
            &["great looks", "installation was quick", "great design"],
        )]);
        let analysis = analyze_perception(&owned.input());

        let energy = analysis
            .messaging_vs_reality
            .iter()
            .find(|entry| entry.message == "energy_efficiency")
            .unwrap();
        assert_eq!(energy.alignment, Alignment::OverPromised);
        let design = analysis
            .value_propositions
            .iter()
            .find(|entry| entry.proposition == "modern_design")
            .unwrap();
        assert_eq!(design.resonance, Resonance::Resonating);
        assert!(!analysis.alignment_recommendations.is_empty());
    }

    #[test]
    fn creator_and_customer_voices_are_split() {
        let owned = Owned::new(vec![commented(
            "Atomberg review: great fan",
            80_000,
            &["poor quality", "bad motor, noisy"],
        )]);
        let analysis = analyze_perception(&owned.input());
        let voices = &analysis.influencer_vs_customer;
        assert_eq!(voices.influencer.positive, 1);
        assert_eq!(voices.customer.negative, 2);
        assert!(voices.positivity_gap > 0.2);
        assert!(analysis
            .unexpected_associations
            .iter()
            .any(|entry| entry.association == "noise"));
    }

    #[test]
    fn attribute_leader_needs_mentions() {
        let owned = Owned::new(vec![
            result(Platform::Google, "fan", 1, "Havells great build quality", 0),
            result(Platform::Google, "fan", 2, "Crompton poor quality", 0),
        ]);
        let analysis = analyze_perception(&owned.input());
        let quality = analysis
            .competitive_attributes
            .iter()
            .find(|entry| entry.attribute == "quality")
            .unwrap();
        assert_eq!(quality.leader.as_deref(), Some("Havells"));
        assert_eq!(quality.scores[0].mentions, 0);
    }

    #[test]
    fn no_results_gives_empty_analysis() {
        let owned = Owned::new(Vec::new());
        let analysis = analyze_perception(&owned.input());
        assert!(analysis.messaging_vs_reality.is_empty());
        assert!(analysis.value_propositions.is_empty());
        assert!(analysis.competitive_attributes.is_empty());
        assert!(analysis.alignment_recommendations.is_empty());
    }

    #[test]
    fn competitor_only_results_skip_brand_messaging() {
        let owned = Owned::new(vec![commented("Havells fan review", 5_000, &["great design"])]);
        let analysis = analyze_perception(&owned.input());
        assert!(analysis.messaging_vs_reality.is_empty());
        assert!(analysis.value_propositions.is_empty());
        assert!(analysis.platform_perception.is_empty());
        assert!(analysis.unexpected_associations.is_empty());
        assert_eq!(analysis.influencer_vs_customer.positivity_gap, 0.0);
        assert!(analysis.alignment_recommendations.is_empty());
    }
}
