//! Rule-based valence scorer: lexicon on a ±4 scale, boosters, negation,
//! capitalization and punctuation emphasis, normalized to `[-1, 1]`.

const LEXICON: &[(&str, f64)] = &[
    ("amazing", 2.8),
    ("awesome", 3.1),
    ("beautiful", 2.9),
    ("best", 3.2),
    ("better", 1.9),
    ("brilliant", 2.8),
    ("comfortable", 1.6),
    ("cool", 1.3),
    ("durable", 1.6),
    ("easy", 1.9),
    ("efficient", 1.8),
    ("elegant", 2.1),
    ("excellent", 2.7),
    ("fantastic", 2.6),
    ("fast", 1.0),
    ("favorite", 2.0),
    ("fine", 0.8),
    ("good", 1.9),
    ("great", 3.1),
    ("happy", 2.7),
    ("helpful", 1.8),
    ("impressed", 2.2),
    ("impressive", 2.3),
    ("innovative", 1.8),
    ("love", 3.2),
    ("loved", 2.9),
    ("loving", 2.9),
    ("nice", 1.8),
    ("perfect", 2.7),
    ("quiet", 1.3),
    ("recommend", 1.5),
    ("recommended", 1.5),
    ("reliable", 1.9),
    ("saving", 1.4),
    ("savings", 1.4),
    ("silent", 1.1),
    ("smooth", 1.5),
    ("solid", 1.4),
    ("stylish", 1.9),
    ("super", 2.9),
    ("superb", 3.1),
    ("thanks", 1.9),
    ("useful", 1.9),
    ("value", 1.2),
    ("win", 2.8),
    ("wonderful", 2.7),
    ("worth", 0.9),
    ("angry", -2.3),
    ("awful", -2.0),
    ("bad", -2.5),
    ("broke", -1.8),
    ("broken", -2.1),
    ("cheap", -0.8),
    ("complaint", -1.6),
    ("costly", -1.2),
    ("defective", -2.2),
    ("disappointed", -2.1),
    ("disappointing", -2.2),
    ("expensive", -1.2),
    ("fail", -2.5),
    ("failed", -2.3),
    ("fake", -2.1),
    ("faulty", -2.0),
    ("hate", -2.7),
    ("horrible", -2.5),
    ("issue", -1.0),
    ("issues", -1.1),
    ("loud", -0.9),
    ("noisy", -1.6),
    ("overpriced", -1.9),
    ("poor", -2.1),
    ("problem", -1.7),
    ("problems", -1.7),
    ("refund", -1.0),
    ("regret", -2.0),
    ("slow", -1.2),
    ("terrible", -2.5),
    ("ugly", -2.3),
    ("useless", -1.8),
    ("waste", -1.8),
    ("weak", -1.9),
    ("worse", -2.1),
    ("worst", -3.1),
    ("wrong", -2.1),
];

const BOOSTER_INCR: f64 = 0.293;
const BOOSTER_DECR: f64 = -0.293;
const CAPS_INCR: f64 = 0.733;
const NEGATION_SCALAR: f64 = -0.74;
const EXCLAMATION_INCR: f64 = 0.292;
const NORMALIZATION_ALPHA: f64 = 15.0;

const BOOSTERS: &[(&str, f64)] = &[
    ("absolutely", BOOSTER_INCR),
    ("completely", BOOSTER_INCR),
    ("extremely", BOOSTER_INCR),
    ("highly", BOOSTER_INCR),
    ("incredibly", BOOSTER_INCR),
    ("really", BOOSTER_INCR),
    ("so", BOOSTER_INCR),
    ("totally", BOOSTER_INCR),
    ("very", BOOSTER_INCR),
    ("barely", BOOSTER_DECR),
    ("hardly", BOOSTER_DECR),
    ("kinda", BOOSTER_DECR),
    ("slightly", BOOSTER_DECR),
    ("somewhat", BOOSTER_DECR),
    ("marginally", BOOSTER_DECR),
];

const NEGATIONS: &[&str] = &[
    "not", "no", "never", "none", "nothing", "nor", "neither", "without", "dont", "don't",
    "doesnt", "doesn't", "isnt", "isn't", "wasnt", "wasn't", "cant", "can't", "cannot", "wont",
    "won't", "aint", "ain't",
];

struct Token<'a> {
    raw: &'a str,
    lower: String,
}

/// Compound score in `[-1, 1]`. Text with no lexicon hits scores 0.
pub fn valence_score(text: &str) -> f64 {
    let tokens: Vec<Token<'_>> = text
        .split_whitespace()
        .map(|word| word.trim_matches(|c: char| !c.is_alphanumeric() && c != '\''))
        .filter(|word| !word.is_empty())
        .map(|raw| Token {
            raw,
            lower: raw.to_lowercase(),
        })
        .collect();
    if tokens.is_empty() {
        return 0.0;
    }

    let mixed_caps = has_mixed_caps(&tokens);
    let mut sentiments = vec![0.0; tokens.len()];

    for (index, token) in tokens.iter().enumerate() {
        if booster(&token.lower).is_some() {
            continue;
        }
        let Some(mut valence) = lexicon(&token.lower) else {
            continue;
        };

        if mixed_caps && is_all_caps(token.raw) {
            valence += CAPS_INCR * valence.signum();
        }

        for distance in 1..=3 {
            let Some(prev_index) = index.checked_sub(distance) else {
                break;
            };
            let prev = &tokens[prev_index];
            if let Some(mut scalar) = booster(&prev.lower) {
                if valence < 0.0 {
                    scalar = -scalar;
                }
                if mixed_caps && is_all_caps(prev.raw) {
                    scalar += CAPS_INCR * valence.signum();
                }
                scalar *= match distance {
                    1 => 1.0,
                    2 => 0.95,
                    _ => 0.9,
                };
                valence += scalar;
            }
            if is_negation(&prev.lower) {
                valence *= NEGATION_SCALAR;
            }
        }

        sentiments[index] = valence;
    }

    if let Some(but_index) = tokens.iter().position(|token| token.lower == "but") {
        for (index, value) in sentiments.iter_mut().enumerate() {
            if index < but_index {
                *value *= 0.5;
            } else if index > but_index {
                *value *= 1.5;
            }
        }
    }

    let mut sum: f64 = sentiments.iter().sum();
    if sum != 0.0 {
        let exclamations = text.chars().filter(|c| *c == '!').count().min(4) as f64;
        sum += exclamations * EXCLAMATION_INCR * sum.signum();
    }

    normalize(sum)
}

fn normalize(sum: f64) -> f64 {
    if sum == 0.0 {
        return 0.0;
    }
    (sum / (sum * sum + NORMALIZATION_ALPHA).sqrt()).clamp(-1.0, 1.0)
}

fn lexicon(word: &str) -> Option<f64> {
    LEXICON
        .iter()
        .find(|(entry, _)| *entry == word)
        .map(|(_, value)| *value)
}

fn booster(word: &str) -> Option<f64> {
    BOOSTERS
        .iter()
        .find(|(entry, _)| *entry == word)
        .map(|(_, value)| *value)
}

fn is_negation(word: &str) -> bool {
    NEGATIONS.iter().any(|entry| *entry == word) || word.ends_with("n't")
}

fn is_all_caps(word: &str) -> bool {
    word.chars().any(|c| c.is_alphabetic()) && !word.chars().any(|c| c.is_lowercase())
}

// Caps only count as emphasis when the text is not shouted end to end.
fn has_mixed_caps(tokens: &[Token<'_>]) -> bool {
    let caps = tokens.iter().filter(|token| is_all_caps(token.raw)).count();
    caps > 0 && caps < tokens.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_unknown_text_score_zero() {
        assert_eq!(valence_score(""), 0.0);
        assert_eq!(valence_score("ceiling fan installation"), 0.0);
    }

    #[test]
    fn single_word_normalizes() {
        let expected = 3.1 / (3.1f64 * 3.1 + 15.0).sqrt();
        assert!((valence_score("great") - expected).abs() < 1e-9);
    }

    #[test]
    fn negation_flips_polarity() {
        assert!(valence_score("this fan is good") > 0.05);
        assert!(valence_score("this fan is not good") < -0.05);
    }

    #[test]
    fn booster_and_caps_intensify() {
        let plain = valence_score("the fan is good");
        assert!(valence_score("the fan is very good") > plain);
        assert!(valence_score("the fan is GOOD") > plain);
    }

    #[test]
    fn clause_after_but_dominates() {
        assert!(valence_score("looks great but noisy and poor build") < 0.0);
    }

    #[test]
    fn exclamation_adds_emphasis() {
        assert!(valence_score("love it!!!") > valence_score("love it"));
    }
}
