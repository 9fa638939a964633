//! Rule-based intent extraction.
//!
//! A deterministic stand-in for the language-understanding service: it
//! recognises ages, incomes, vocabulary words for region, category and
//! occupation (English and a few Telugu forms), yes/no answers and requests
//! for scheme details. A bare number is attributed to the numeric field the
//! session is waiting for.

use async_trait::async_trait;
use regex::Regex;
use sahayak_config::VocabularyConfig;
use sahayak_core::profile::{Field, FieldValue};
use sahayak_core::utterance::{ExtractionContext, Intent, IntentExtractor, Signal};

/// Telugu spellings mapped onto the canonical English vocabulary value.
const TELUGU_ALIASES: &[(Field, &str, &str)] = &[
    (Field::Region, "ఆంధ్ర ప్రదేశ్", "andhra pradesh"),
    (Field::Region, "ఆంధ్రప్రదేశ్", "andhra pradesh"),
    (Field::Region, "తెలంగాణ", "telangana"),
    (Field::Region, "కర్ణాటక", "karnataka"),
    (Field::Region, "తమిళనాడు", "tamil nadu"),
    (Field::Category, "ఎస్సీ", "sc"),
    (Field::Category, "ఎస్టీ", "st"),
    (Field::Category, "బీసీ", "bc"),
    (Field::Category, "ఓబీసీ", "obc"),
    (Field::Category, "జనరల్", "general"),
    (Field::Occupation, "రైతు", "farmer"),
    (Field::Occupation, "విద్యార్థి", "student"),
    (Field::Occupation, "నేత", "weaver"),
    (Field::Occupation, "మత్స్యకార", "fisherman"),
    (Field::Occupation, "కూలీ", "labourer"),
    (Field::Occupation, "వీధి వ్యాపారి", "street vendor"),
];

const TELUGU_YES: &[&str] = &["అవును", "అవు", "సరే"];
const TELUGU_NO: &[&str] = &["లేదు", "కాదు"];
const TELUGU_DETAILS: &[&str] = &["వివర"];

const MAX_AGE: u64 = 120;

pub struct RuleBasedExtractor {
    age: Regex,
    income: Regex,
    number: Regex,
    affirm: Regex,
    deny: Regex,
    details: Regex,
    vocabulary: Vec<(Field, String, Regex)>,
}

impl RuleBasedExtractor {
    pub fn new(vocabulary: &VocabularyConfig) -> Result<Self, regex::Error> {
        let mut terms = Vec::new();
        let groups = [
            (Field::Region, &vocabulary.regions),
            (Field::Category, &vocabulary.categories),
            (Field::Occupation, &vocabulary.occupations),
        ];
        for (field, words) in groups {
            for word in words {
                let canonical = word.trim().to_lowercase();
                if canonical.is_empty() {
                    continue;
                }
                let pattern = Regex::new(&format!(r"(?i)\b{}\b", regex::escape(&canonical)))?;
                terms.push((field, canonical, pattern));
            }
        }

        Ok(Self {
            age: Regex::new(
                r"(?i)\bage\D{0,12}?(\d{1,3})\b|\b(\d{1,3})\s*(?:years?|yrs?)\b|వయస్సు\D{0,12}?(\d{1,3})|(\d{1,3})\s*(?:సంవత్సరాలు|ఏళ్ళు|ఏళ్లు)",
            )?,
            income: Regex::new(
                r"(?i)(?:\bincome|\bearn\w*|\bsalary|ఆదాయం)\D{0,20}?(\d[\d,]*)|(\d[\d,]*)\s*(?:rupees|rs\b|రూపాయలు)|₹\s*(\d[\d,]*)",
            )?,
            number: Regex::new(r"\d[\d,]*")?,
            affirm: Regex::new(r"(?i)\b(?:yes|yeah|yep|ok|okay|sure|correct|retry|go ahead)\b")?,
            deny: Regex::new(r"(?i)\b(?:no|nope|not|stop|cancel|wrong)\b")?,
            details: Regex::new(r"(?i)\b(?:details?|more|about|explain)\b")?,
            vocabulary: terms,
        })
    }

    /// Extractor over the built-in vocabulary.
    pub fn with_defaults() -> Result<Self, regex::Error> {
        Self::new(&VocabularyConfig::default())
    }

    fn numbers(&self, text: &str, intent: &mut Intent, awaiting: Option<Field>) {
        if let Some(age) = first_capture(&self.age, text).filter(|n| *n <= MAX_AGE) {
            *intent = std::mem::take(intent).with_assignment(Field::Age, FieldValue::Number(age));
        }
        if let Some(income) = first_capture(&self.income, text) {
            *intent =
                std::mem::take(intent).with_assignment(Field::Income, FieldValue::Number(income));
        }

        // A bare number answers the numeric question just asked.
        let Some(field) = awaiting.filter(Field::is_numeric) else {
            return;
        };
        if !intent.assignments.is_empty() {
            return;
        }
        let bare = self.number.find(text).and_then(|m| parse_number(m.as_str()));
        if let Some(n) = bare.filter(|n| field != Field::Age || *n <= MAX_AGE) {
            *intent = std::mem::take(intent).with_assignment(field, FieldValue::Number(n));
        }
    }

    fn words(&self, text: &str, intent: &mut Intent) {
        for (field, canonical, pattern) in &self.vocabulary {
            if intent.value_for(*field).is_none() && pattern.is_match(text) {
                *intent = std::mem::take(intent).with_assignment(*field, FieldValue::text(canonical));
            }
        }
        for (field, alias, canonical) in TELUGU_ALIASES {
            if intent.value_for(*field).is_none() && text.contains(alias) {
                *intent = std::mem::take(intent).with_assignment(*field, FieldValue::text(canonical));
            }
        }
    }

    fn signal(&self, text: &str) -> Option<Signal> {
        let yes = self.affirm.is_match(text) || TELUGU_YES.iter().any(|t| text.contains(t));
        let no = self.deny.is_match(text) || TELUGU_NO.iter().any(|t| text.contains(t));
        match (yes, no) {
            (true, false) => Some(Signal::Affirm),
            (false, true) => Some(Signal::Deny),
            _ => None,
        }
    }
}

fn parse_number(raw: &str) -> Option<u64> {
    raw.replace(',', "").parse().ok()
}

/// The first participating group of the first match.
fn first_capture(re: &Regex, text: &str) -> Option<u64> {
    let caps = re.captures(text)?;
    caps.iter()
        .skip(1)
        .flatten()
        .next()
        .and_then(|m| parse_number(m.as_str()))
}

#[async_trait]
impl IntentExtractor for RuleBasedExtractor {
    fn name(&self) -> &str {
        "rules"
    }

    async fn extract(&self, text: &str, context: &ExtractionContext) -> Intent {
        let lowered = text.to_lowercase();
        let mut intent = Intent::default();
        self.numbers(&lowered, &mut intent, context.awaiting);
        self.words(&lowered, &mut intent);
        if let Some(signal) = self.signal(&lowered) {
            intent = intent.with_signal(signal);
        }
        if self.details.is_match(&lowered) || TELUGU_DETAILS.iter().any(|t| lowered.contains(t)) {
            intent = intent.with_details_request();
        }
        intent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn extract(text: &str, awaiting: Option<Field>) -> Intent {
        RuleBasedExtractor::with_defaults()
            .unwrap()
            .extract(text, &ExtractionContext { awaiting })
            .await
    }

    #[tokio::test]
    async fn sentence_with_several_fields() {
        let intent = extract(
            "I am 40 years old, a farmer from Andhra Pradesh and earn 80,000 rupees",
            None,
        )
        .await;
        assert_eq!(intent.value_for(Field::Age), Some(&FieldValue::Number(40)));
        assert_eq!(intent.value_for(Field::Income), Some(&FieldValue::Number(80_000)));
        assert_eq!(
            intent.value_for(Field::Region),
            Some(&FieldValue::text("andhra pradesh"))
        );
        assert_eq!(intent.value_for(Field::Occupation), Some(&FieldValue::text("farmer")));
        assert!(intent.signal.is_none());
    }

    #[tokio::test]
    async fn bare_number_goes_to_awaited_field() {
        let intent = extract("40", Some(Field::Age)).await;
        assert_eq!(intent.value_for(Field::Age), Some(&FieldValue::Number(40)));

        let intent = extract("1,20,000", Some(Field::Income)).await;
        assert_eq!(intent.value_for(Field::Income), Some(&FieldValue::Number(120_000)));

        let intent = extract("40", Some(Field::Region)).await;
        assert!(intent.is_empty());

        let intent = extract("40", None).await;
        assert!(intent.is_empty());
    }

    #[tokio::test]
    async fn labelled_number_is_not_reused_for_awaited_field() {
        let intent = extract("my age is 25", Some(Field::Income)).await;
        assert_eq!(intent.value_for(Field::Age), Some(&FieldValue::Number(25)));
        assert!(intent.value_for(Field::Income).is_none());
    }

    #[tokio::test]
    async fn implausible_age_is_ignored() {
        let intent = extract("500", Some(Field::Age)).await;
        assert!(intent.value_for(Field::Age).is_none());
    }

    #[tokio::test]
    async fn telugu_words_and_numbers() {
        let intent = extract("నేను తెలంగాణ రైతు, వయస్సు 45", None).await;
        assert_eq!(intent.value_for(Field::Age), Some(&FieldValue::Number(45)));
        assert_eq!(intent.value_for(Field::Region), Some(&FieldValue::text("telangana")));
        assert_eq!(intent.value_for(Field::Occupation), Some(&FieldValue::text("farmer")));
    }

    #[tokio::test]
    async fn category_matches_whole_words() {
        let intent = extract("I belong to OBC", None).await;
        assert_eq!(intent.value_for(Field::Category), Some(&FieldValue::text("obc")));
    }

    #[tokio::test]
    async fn yes_and_no() {
        assert_eq!(extract("yes please", None).await.signal, Some(Signal::Affirm));
        assert_eq!(extract("అవును", None).await.signal, Some(Signal::Affirm));
        assert_eq!(extract("No", None).await.signal, Some(Signal::Deny));
        assert_eq!(extract("లేదు", None).await.signal, Some(Signal::Deny));
        // Mixed answers carry no signal.
        assert_eq!(extract("yes no", None).await.signal, None);
    }

    #[tokio::test]
    async fn correction_carries_value_and_signal() {
        let intent = extract("yes, my age is 25", Some(Field::Age)).await;
        assert_eq!(intent.value_for(Field::Age), Some(&FieldValue::Number(25)));
        assert_eq!(intent.signal, Some(Signal::Affirm));
    }

    #[tokio::test]
    async fn details_request() {
        let intent = extract("tell me more about this scheme", None).await;
        assert!(intent.wants_details);
        assert!(intent.signal.is_none());

        assert!(extract("పథకం వివరాలు చెప్పండి", None).await.wants_details);
        assert!(!extract("yes", None).await.wants_details);
    }

    #[tokio::test]
    async fn gibberish_is_empty() {
        assert!(extract("hmm", None).await.is_empty());
    }
}
