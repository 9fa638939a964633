//! Outbound message templates, in Telugu and English.

use sahayak_core::profile::Field;
use sahayak_core::session::Language;
use sahayak_core::tool::{FailureReason, ToolFailure, ToolKind};
use sahayak_core::verdict::Verdict;

#[derive(Debug, Clone, Copy)]
pub struct Prompts {
    language: Language,
}

impl Prompts {
    pub fn new(language: Language) -> Self {
        Self { language }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn greeting(&self) -> &'static str {
        match self.language {
            Language::Telugu => {
                "నమస్కారం! ప్రభుత్వ సంక్షేమ పథకాలను కనుగొని దరఖాస్తు చేయడంలో నేను మీకు సహాయం చేస్తాను."
            }
            Language::English => {
                "Hello! I will help you find and apply for government welfare schemes."
            }
        }
    }

    pub fn ask(&self, field: Field) -> &'static str {
        match (self.language, field) {
            (Language::Telugu, Field::Age) => "దయచేసి మీ వయస్సును చెప్పండి.",
            (Language::Telugu, Field::Income) => {
                "దయచేసి మీ వార్షిక ఆదాయాన్ని (ఒక సంఖ్యలో) చెప్పండి."
            }
            (Language::Telugu, Field::Region) => "మీరు ఏ రాష్ట్రంలో నివసిస్తున్నారు?",
            (Language::Telugu, Field::Category) => {
                "మీ సామాజిక వర్గం ఏమిటి? (ఉదా: SC, ST, BC, OBC, జనరల్)"
            }
            (Language::Telugu, Field::Occupation) => {
                "మీ వృత్తి ఏమిటి? (ఉదా: రైతు, విద్యార్థి, నేత కార్మికుడు)"
            }
            (Language::English, Field::Age) => "Please tell me your age.",
            (Language::English, Field::Income) => {
                "Please state your annual household income as a number."
            }
            (Language::English, Field::Region) => "Which state do you live in?",
            (Language::English, Field::Category) => {
                "What is your social category (for example SC, ST, BC, OBC, general)?"
            }
            (Language::English, Field::Occupation) => {
                "What is your occupation (for example farmer, student, weaver)?"
            }
        }
    }

    pub fn clarify(&self) -> &'static str {
        match self.language {
            Language::Telugu => {
                "క్షమించండి, నేను స్పష్టంగా వినలేకపోయాను. దయచేసి మళ్లీ చెప్పండి."
            }
            Language::English => "Sorry, I could not hear that clearly. Please say it again.",
        }
    }

    /// The prompt for a recovery cause. `awaiting` is the field being asked
    /// when the cause is unrecognised input.
    pub fn recovery(&self, verdict: &Verdict, awaiting: Option<Field>) -> String {
        let te = self.language == Language::Telugu;
        match verdict {
            Verdict::Contradiction { field, old, new } => {
                let name = self.field_name(*field);
                if te {
                    format!(
                        "మీరు ముందు మీ {name} {old} అని చెప్పారు, ఇప్పుడు {new} అంటున్నారు. {new} సరైనదా? (అవును/లేదు)"
                    )
                } else {
                    format!(
                        "Earlier you said your {name} is {old}, now you said {new}. Is {new} correct? (yes/no)"
                    )
                }
            }

            Verdict::ToolFailure(ToolFailure {
                reason: FailureReason::MissingDocument { documents },
                ..
            }) => {
                let docs = documents.join(", ");
                if te {
                    format!("దరఖాస్తుకు ఈ పత్రాలు అవసరం: {docs}. అవి మీ వద్ద ఉన్నాయా? (అవును/లేదు)")
                } else {
                    format!("The application needs these documents: {docs}. Do you have them? (yes/no)")
                }
            }

            Verdict::ToolFailure(ToolFailure {
                reason: FailureReason::Rejected { reason },
                ..
            }) => {
                if te {
                    format!("దరఖాస్తు తిరస్కరించబడింది: {reason}. మళ్లీ ప్రయత్నించమంటారా? (అవును/లేదు)")
                } else {
                    format!("The application was rejected: {reason}. Shall I try again? (yes/no)")
                }
            }

            Verdict::ToolFailure(failure) => {
                let service = self.tool_name(failure.tool);
                if te {
                    format!(
                        "క్షమించండి, {service} సేవ ప్రస్తుతం స్పందించడం లేదు. మళ్లీ ప్రయత్నించమంటారా? (అవును/లేదు)"
                    )
                } else {
                    format!("Sorry, the {service} service did not respond. Shall I try again? (yes/no)")
                }
            }

            Verdict::NoEligibleScheme => {
                if te {
                    "క్షమించండి, ప్రస్తుత సమాచారం ప్రకారం మీకు అనుకూలమైన పథకం కనిపించలేదు. మీ వివరాలలో ఏదైనా సరిచేయాలనుకుంటున్నారా, లేదా మళ్లీ వెతకమంటారా?".to_string()
                } else {
                    "Sorry, I could not find a suitable scheme for these details. Would you like to correct a detail, or shall I search again?".to_string()
                }
            }

            Verdict::InputUnrecognized => match awaiting {
                Some(field) => format!("{} {}", self.clarify(), self.ask(field)),
                None => self.clarify().to_string(),
            },

            Verdict::Valid | Verdict::MissingFields { .. } | Verdict::Declined => {
                self.clarify().to_string()
            }
        }
    }

    pub fn submitted(&self, scheme_name: Option<&str>, application_id: &str) -> String {
        match (self.language, scheme_name) {
            (Language::Telugu, Some(name)) => format!(
                "{name} కోసం మీ దరఖాస్తు విజయవంతంగా సమర్పించబడింది. దరఖాస్తు ID: {application_id}"
            ),
            (Language::Telugu, None) => {
                format!("మీ దరఖాస్తు విజయవంతంగా సమర్పించబడింది. దరఖాస్తు ID: {application_id}")
            }
            (Language::English, Some(name)) => format!(
                "Your application for {name} has been submitted. Application ID: {application_id}"
            ),
            (Language::English, None) => {
                format!("Your application has been submitted. Application ID: {application_id}")
            }
        }
    }

    /// The conclusion after recovery attempts ran out, naming what is left.
    pub fn unresolved(&self, verdict: &Verdict, awaiting: Option<Field>) -> String {
        let what = self.describe(verdict, awaiting);
        match self.language {
            Language::Telugu => format!(
                "క్షమించండి, దీన్ని పరిష్కరించలేకపోయాను: {what}. దయచేసి దగ్గరలోని మీసేవ కేంద్రాన్ని సంప్రదించండి."
            ),
            Language::English => format!(
                "Sorry, I could not resolve this: {what}. Please visit your nearest help centre."
            ),
        }
    }

    pub fn declined(&self) -> &'static str {
        match self.language {
            Language::Telugu => {
                "సరే, నేను దరఖాస్తును నిలిపివేస్తున్నాను. మరింత సహాయం కావాలనుకుంటే చెప్పండి."
            }
            Language::English => {
                "Okay, I have stopped the application. Let me know if you need more help."
            }
        }
    }

    /// One-line summary of a successful retrieval.
    pub fn schemes_found(&self, names: &[&str]) -> String {
        let names = names.join(", ");
        match self.language {
            Language::Telugu => format!("మీకు సరిపోయే పథకాలు: {names}."),
            Language::English => format!("Schemes that may suit you: {names}."),
        }
    }

    /// One-line summary of a successful eligibility check.
    pub fn eligible_for(&self, scheme_name: &str) -> String {
        match self.language {
            Language::Telugu => format!("మీకు {scheme_name} పథకానికి అర్హత ఉంది."),
            Language::English => format!("You are eligible for {scheme_name}."),
        }
    }

    /// A scheme's description, for a user who asked about it mid-confirmation.
    pub fn scheme_details(&self, scheme_name: &str, description: &str) -> String {
        match (self.language, description.trim()) {
            (Language::Telugu, "") => {
                format!("క్షమించండి, {scheme_name} గురించి వివరాలు నాకు లభించలేదు.")
            }
            (Language::English, "") => {
                format!("Sorry, I have no further details about {scheme_name}.")
            }
            (_, description) => format!("{scheme_name}: {description}"),
        }
    }

    pub fn working(&self, tool: ToolKind) -> String {
        let service = self.tool_name(tool);
        match self.language {
            Language::Telugu => format!("ఒక్క క్షణం, {service} జరుగుతోంది."),
            Language::English => format!("One moment, the {service} is in progress."),
        }
    }

    fn describe(&self, verdict: &Verdict, awaiting: Option<Field>) -> String {
        let te = self.language == Language::Telugu;
        match verdict {
            Verdict::Contradiction { field, old, new } => {
                let name = self.field_name(*field);
                if te {
                    format!("మీ {name} ({old} లేదా {new})")
                } else {
                    format!("your {name} ({old} or {new})")
                }
            }
            Verdict::ToolFailure(ToolFailure {
                reason: FailureReason::MissingDocument { documents },
                ..
            }) => {
                let docs = documents.join(", ");
                if te {
                    format!("అవసరమైన పత్రాలు: {docs}")
                } else {
                    format!("the required documents: {docs}")
                }
            }
            Verdict::ToolFailure(failure) => {
                let service = self.tool_name(failure.tool);
                if te {
                    format!("{service} సేవ అందుబాటులో లేదు ({})", failure.reason.code())
                } else {
                    format!("the {service} service is unavailable ({})", failure.reason.code())
                }
            }
            Verdict::NoEligibleScheme => {
                if te {
                    "మీకు సరిపోయే పథకం లభించలేదు".to_string()
                } else {
                    "no matching scheme was found".to_string()
                }
            }
            Verdict::InputUnrecognized => match (te, awaiting) {
                (true, Some(field)) => format!("మీ {} నాకు అర్థం కాలేదు", self.field_name(field)),
                (true, None) => "మీ సమాధానం నాకు అర్థం కాలేదు".to_string(),
                (false, Some(field)) => {
                    format!("I could not understand your {}", self.field_name(field))
                }
                (false, None) => "I could not understand your answer".to_string(),
            },
            Verdict::Valid | Verdict::MissingFields { .. } | Verdict::Declined => {
                if te {
                    "మీ అభ్యర్థన".to_string()
                } else {
                    "your request".to_string()
                }
            }
        }
    }

    fn field_name(&self, field: Field) -> &'static str {
        match (self.language, field) {
            (Language::Telugu, Field::Age) => "వయస్సు",
            (Language::Telugu, Field::Income) => "వార్షిక ఆదాయం",
            (Language::Telugu, Field::Region) => "రాష్ట్రం",
            (Language::Telugu, Field::Category) => "సామాజిక వర్గం",
            (Language::Telugu, Field::Occupation) => "వృత్తి",
            (Language::English, Field::Age) => "age",
            (Language::English, Field::Income) => "annual income",
            (Language::English, Field::Region) => "state",
            (Language::English, Field::Category) => "category",
            (Language::English, Field::Occupation) => "occupation",
        }
    }

    fn tool_name(&self, tool: ToolKind) -> &'static str {
        match (self.language, tool) {
            (Language::Telugu, ToolKind::Retrieve) => "పథకాల శోధన",
            (Language::Telugu, ToolKind::Evaluate) => "అర్హత పరిశీలన",
            (Language::Telugu, ToolKind::Apply) => "దరఖాస్తు సమర్పణ",
            (Language::English, ToolKind::Retrieve) => "scheme search",
            (Language::English, ToolKind::Evaluate) => "eligibility check",
            (Language::English, ToolKind::Apply) => "application submission",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sahayak_core::profile::FieldValue;

    #[test]
    fn every_field_has_a_question_in_both_languages() {
        for language in [Language::Telugu, Language::English] {
            let prompts = Prompts::new(language);
            for field in Field::CANONICAL {
                assert!(!prompts.ask(field).is_empty());
            }
        }
        assert!(Prompts::new(Language::Telugu).ask(Field::Age).contains("వయస్సు"));
    }

    #[test]
    fn missing_document_prompt_names_documents() {
        let verdict = Verdict::ToolFailure(ToolFailure {
            tool: ToolKind::Apply,
            reason: FailureReason::MissingDocument {
                documents: vec!["income certificate".into()],
            },
        });
        for language in [Language::Telugu, Language::English] {
            let text = Prompts::new(language).recovery(&verdict, None);
            assert!(text.contains("income certificate"), "{text}");
        }
    }

    #[test]
    fn contradiction_prompt_states_both_values() {
        let verdict = Verdict::Contradiction {
            field: Field::Age,
            old: FieldValue::Number(40),
            new: FieldValue::Number(25),
        };
        let text = Prompts::new(Language::English).recovery(&verdict, None);
        assert!(text.contains("40") && text.contains("25"));
        assert!(text.contains("age"));
    }

    #[test]
    fn unrecognised_input_re_asks_the_field() {
        let text = Prompts::new(Language::English)
            .recovery(&Verdict::InputUnrecognized, Some(Field::Income));
        assert!(text.starts_with("Sorry"));
        assert!(text.ends_with("Please state your annual household income as a number."));
    }

    #[test]
    fn unresolved_states_what_remains() {
        let prompts = Prompts::new(Language::English);
        let text = prompts.unresolved(&Verdict::NoEligibleScheme, None);
        assert!(text.contains("no matching scheme"));

        let failure = Verdict::ToolFailure(ToolFailure {
            tool: ToolKind::Retrieve,
            reason: FailureReason::Timeout { after_secs: 10 },
        });
        assert!(prompts.unresolved(&failure, None).contains("scheme search"));
    }

    #[test]
    fn scheme_details_fall_back_when_undescribed() {
        let prompts = Prompts::new(Language::English);
        assert_eq!(
            prompts.scheme_details("PM-KISAN", "Income support for farmers."),
            "PM-KISAN: Income support for farmers."
        );
        assert!(prompts.scheme_details("PM-KISAN", " ").contains("no further details"));
        assert!(Prompts::new(Language::Telugu)
            .scheme_details("PM-KISAN", "")
            .contains("వివరాలు"));
    }

    #[test]
    fn submitted_carries_the_application_id() {
        let text = Prompts::new(Language::Telugu).submitted(Some("PM-KISAN"), "APP-1A2B3C4D");
        assert!(text.contains("APP-1A2B3C4D"));
        assert!(text.contains("PM-KISAN"));
    }
}
