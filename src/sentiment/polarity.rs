//! Word-polarity scorer: averages the polarity of matched words, with
//! intensifiers scaling and negations reversing the next sentiment word.

const POLARITY: &[(&str, f64)] = &[
    ("amazing", 0.6),
    ("awesome", 1.0),
    ("beautiful", 0.85),
    ("best", 1.0),
    ("better", 0.5),
    ("brilliant", 0.9),
    ("comfortable", 0.4),
    ("cool", 0.35),
    ("durable", 0.4),
    ("easy", 0.43),
    ("efficient", 0.5),
    ("elegant", 0.6),
    ("excellent", 1.0),
    ("fantastic", 0.4),
    ("favorite", 0.5),
    ("fine", 0.4),
    ("good", 0.7),
    ("great", 0.8),
    ("happy", 0.8),
    ("helpful", 0.5),
    ("impressive", 1.0),
    ("innovative", 0.5),
    ("love", 0.5),
    ("loved", 0.7),
    ("nice", 0.6),
    ("perfect", 1.0),
    ("quiet", 0.3),
    ("recommended", 0.4),
    ("reliable", 0.6),
    ("silent", 0.2),
    ("smart", 0.21),
    ("smooth", 0.4),
    ("solid", 0.3),
    ("stylish", 0.6),
    ("super", 0.33),
    ("superb", 1.0),
    ("useful", 0.3),
    ("wonderful", 1.0),
    ("worth", 0.3),
    ("angry", -0.5),
    ("awful", -1.0),
    ("bad", -0.7),
    ("broken", -0.4),
    ("cheap", -0.4),
    ("costly", -0.3),
    ("defective", -0.6),
    ("disappointed", -0.75),
    ("disappointing", -0.6),
    ("expensive", -0.5),
    ("fake", -0.5),
    ("faulty", -0.5),
    ("hate", -0.8),
    ("horrible", -1.0),
    ("loud", -0.1),
    ("noisy", -0.4),
    ("overpriced", -0.6),
    ("poor", -0.4),
    ("sad", -0.5),
    ("slow", -0.3),
    ("terrible", -1.0),
    ("ugly", -0.7),
    ("useless", -0.5),
    ("weak", -0.4),
    ("worse", -0.4),
    ("worst", -1.0),
    ("wrong", -0.5),
];

const INTENSIFIERS: &[(&str, f64)] = &[
    ("very", 1.3),
    ("really", 1.2),
    ("extremely", 1.5),
    ("incredibly", 1.4),
    ("highly", 1.3),
    ("so", 1.2),
    ("too", 1.1),
    ("quite", 1.1),
    ("slightly", 0.7),
    ("somewhat", 0.8),
];

const NEGATIONS: &[&str] = &["not", "no", "never", "neither", "nor", "without"];
const NEGATION_SCALAR: f64 = -0.5;

/// Mean polarity of matched words in `[-1, 1]`; 0 when nothing matches.
pub fn polarity_score(text: &str) -> f64 {
    let mut matched = Vec::new();
    let mut multiplier = 1.0;
    let mut negated = false;

    for word in text.split_whitespace() {
        let word = word
            .trim_matches(|c: char| !c.is_alphanumeric() && c != '\'')
            .to_lowercase();
        if word.is_empty() {
            continue;
        }

        if NEGATIONS.iter().any(|entry| *entry == word) || word.ends_with("n't") {
            negated = true;
            continue;
        }
        if let Some((_, factor)) = INTENSIFIERS.iter().find(|(entry, _)| *entry == word) {
            multiplier *= factor;
            continue;
        }
        if let Some((_, polarity)) = POLARITY.iter().find(|(entry, _)| *entry == word) {
            let mut value = (polarity * multiplier).clamp(-1.0, 1.0);
            if negated {
                value *= NEGATION_SCALAR;
            }
            matched.push(value);
            negated = false;
        }
        multiplier = 1.0;
    }

    if matched.is_empty() {
        return 0.0;
    }
    let mean = matched.iter().sum::<f64>() / matched.len() as f64;
    mean.clamp(-1.0, 1.0)
}
