//! Keyword-based intent detection.
//!
//! Everything here is a pure function of the input text (and, for follow-up
//! recognition, the session context). Matching is case-insensitive.

use crate::session::ConversationContext;
use cloudbuddy_knowledge::{AccessMethod, KnowledgeBase};

/// Weight each matching keyword adds to a service's score.
const KEYWORD_WEIGHT: u32 = 2;

/// Service keyword table. Order is the tie-break order.
const SERVICE_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "ec2",
        &["ec2", "instance", "server", "virtual machine", "ami", "compute"],
    ),
    ("s3", &["s3", "bucket", "storage", "object", "file storage"]),
    ("lambda", &["lambda", "serverless", "function", "faas"]),
    (
        "iam",
        &["iam", "user", "role", "permission", "policy", "access"],
    ),
    (
        "vpc",
        &["vpc", "network", "subnet", "security group", "routing"],
    ),
    ("rds", &["rds", "database", "mysql", "postgres", "sql"]),
    (
        "cloudwatch",
        &["cloudwatch", "monitoring", "logs", "metrics", "alarm"],
    ),
];

const CONSOLE_KEYWORDS: &[&str] = &["console", "gui", "dashboard", "web", "ui"];
const CLI_KEYWORDS: &[&str] = &["cli", "command", "terminal", "cmd"];
const SDK_KEYWORDS: &[&str] = &["sdk", "python", "boto3", "code", "javascript", "api"];

const FOLLOW_UP_INDICATORS: &[&str] = &[
    "aur",
    "and",
    "also",
    "kya",
    "how about",
    "what about",
    "uske baad",
    "phir",
    "then",
    "next",
    "more",
    "detail",
    "explain",
    "batao",
    "samjhao",
    "iske alawa",
];

/// Single-word greetings, matched as whole words.
const GREETING_WORDS: &[&str] = &["hello", "hi", "hey", "namaste"];

/// Multi-word greetings, matched as phrases.
const GREETING_PHRASES: &[&str] = &["aur bhai"];

/// Word stems that mark a request for a practice question.
const PRACTICE_STEMS: &[&str] = &["practice", "quiz", "question", "test"];

/// A service and how strongly a message points at it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceScore {
    /// Service identifier.
    pub service: &'static str,
    /// Sum of keyword weights.
    pub score: u32,
}

/// Detects services, topics, access methods, and conversational intent.
#[derive(Debug, Clone, Default)]
pub struct Detector {
    knowledge: KnowledgeBase,
}

impl Detector {
    /// Creates a detector resolving topics against `knowledge`.
    #[must_use]
    pub fn new(knowledge: KnowledgeBase) -> Self {
        Self { knowledge }
    }

    /// Scores every service against the text.
    ///
    /// Only services with a non-zero score are returned, highest first.
    /// Equal scores keep the keyword table's declared order.
    #[must_use]
    pub fn score_services(&self, text: &str) -> Vec<ServiceScore> {
        let lower = text.to_lowercase();
        let mut scores: Vec<ServiceScore> = SERVICE_KEYWORDS
            .iter()
            .map(|&(service, keywords)| ServiceScore {
                service,
                score: keywords
                    .iter()
                    .filter(|keyword| lower.contains(**keyword))
                    .count() as u32
                    * KEYWORD_WEIGHT,
            })
            .filter(|score| score.score > 0)
            .collect();
        // stable: ties stay in table order
        scores.sort_by(|a, b| b.score.cmp(&a.score));
        scores
    }

    /// Returns the best-scoring service, if any keyword matched.
    #[must_use]
    pub fn detect_service(&self, text: &str) -> Option<&'static str> {
        self.score_services(text)
            .first()
            .map(|score| score.service)
    }

    /// Returns the first subtopic of `service` mentioned in the text.
    #[must_use]
    pub fn detect_topic(&self, text: &str, service: Option<&str>) -> Option<String> {
        let entry = self.knowledge.get(service?)?;
        let lower = text.to_lowercase();
        entry
            .subtopics
            .iter()
            .find(|topic| lower.contains(&topic.to_lowercase()))
            .map(|topic| (*topic).to_string())
    }

    /// Returns the access method the text asks about.
    ///
    /// Console keywords win over CLI keywords, which win over SDK keywords.
    #[must_use]
    pub fn detect_access_method(&self, text: &str) -> Option<AccessMethod> {
        let lower = text.to_lowercase();
        AccessMethod::ALL.into_iter().find(|method| {
            let keywords = match method {
                AccessMethod::Console => CONSOLE_KEYWORDS,
                AccessMethod::Cli => CLI_KEYWORDS,
                AccessMethod::Sdk => SDK_KEYWORDS,
            };
            keywords.iter().any(|keyword| lower.contains(keyword))
        })
    }

    /// Returns true if the text continues an existing conversation.
    ///
    /// Always false for a session with no history.
    #[must_use]
    pub fn is_follow_up(&self, text: &str, context: &ConversationContext) -> bool {
        if context.is_empty() {
            return false;
        }
        let lower = text.to_lowercase();
        FOLLOW_UP_INDICATORS
            .iter()
            .any(|indicator| lower.contains(indicator))
    }

    /// Returns true if the text is a greeting.
    ///
    /// Greeting words must match a whole word, so "this" is not "hi".
    #[must_use]
    pub fn is_greeting(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        words(&lower).any(|word| GREETING_WORDS.contains(&word))
            || GREETING_PHRASES
                .iter()
                .any(|phrase| lower.contains(phrase))
    }

    /// Returns true if the text asks for a practice question.
    ///
    /// Stems match at the start of a word rather than anywhere in the text,
    /// so "quizzes" counts and "latest" does not.
    #[must_use]
    pub fn is_practice_request(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        words(&lower).any(|word| PRACTICE_STEMS.iter().any(|stem| word.starts_with(stem)))
    }

    /// Returns the knowledge base topics are resolved against.
    #[must_use]
    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }
}

fn words(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Exchange;

    fn detector() -> Detector {
        Detector::new(KnowledgeBase::aws())
    }

    fn context_with_history() -> ConversationContext {
        let mut context = ConversationContext::default();
        context.record(Exchange::new("ec2 kya hai", "...", Some("ec2".into()), None));
        context
    }

    #[test]
    fn keyword_table_matches_knowledge_base() {
        let kb = KnowledgeBase::aws();
        let table: Vec<_> = SERVICE_KEYWORDS.iter().map(|(id, _)| *id).collect();
        let ids: Vec<_> = kb.ids().collect();
        assert_eq!(table, ids);
    }

    #[test]
    fn detects_obvious_services() {
        let d = detector();
        assert_eq!(d.detect_service("S3 bucket kaise banaye"), Some("s3"));
        assert_eq!(d.detect_service("Lambda function timeout"), Some("lambda"));
        assert_eq!(d.detect_service("RDS mysql backup"), Some("rds"));
        assert_eq!(d.detect_service("cloudwatch alarm setup"), Some("cloudwatch"));
    }

    #[test]
    fn no_keywords_means_no_service() {
        assert_eq!(detector().detect_service("kya haal hai"), None);
        assert!(detector().score_services("").is_empty());
    }

    #[test]
    fn detection_is_deterministic_and_in_range() {
        let d = detector();
        let kb = KnowledgeBase::aws();
        for text in [
            "ec2 instance kaise launch kare console mein",
            "iam role policy for lambda function",
            "vpc subnet routing and security group",
            "random words only",
        ] {
            let first = d.detect_service(text);
            assert_eq!(first, d.detect_service(text));
            if let Some(service) = first {
                assert!(kb.contains(service));
            }
        }
    }

    #[test]
    fn ties_resolve_in_declared_order() {
        // "instance" (ec2) and "bucket" (s3) both score 2
        let scores = detector().score_services("instance aur bucket");
        assert_eq!(scores[0], ServiceScore { service: "ec2", score: 2 });
        assert_eq!(scores[1], ServiceScore { service: "s3", score: 2 });
        assert_eq!(detector().detect_service("bucket aur instance"), Some("ec2"));
    }

    #[test]
    fn higher_score_wins() {
        let scores = detector().score_services("iam user role policy for ec2");
        assert_eq!(scores[0].service, "iam");
        assert_eq!(scores[0].score, 8);
    }

    #[test]
    fn topic_requires_known_service() {
        let d = detector();
        assert_eq!(d.detect_topic("versioning on", None), None);
        assert_eq!(d.detect_topic("versioning on", Some("dynamodb")), None);
        assert_eq!(
            d.detect_topic("S3 Versioning kaise on kare", Some("s3")),
            Some("versioning".to_string())
        );
    }

    #[test]
    fn topic_first_declared_match_wins() {
        // both "launch" and "pricing" appear; "launch" is declared first
        assert_eq!(
            detector().detect_topic("pricing before launch", Some("ec2")),
            Some("launch".to_string())
        );
    }

    #[test]
    fn topic_preserves_declared_casing() {
        assert_eq!(
            detector().detect_topic("custom ami banana hai", Some("ec2")),
            Some("AMI".to_string())
        );
    }

    #[test]
    fn access_method_priority() {
        let d = detector();
        assert_eq!(
            d.detect_access_method("console se ya cli se?"),
            Some(AccessMethod::Console)
        );
        assert_eq!(
            d.detect_access_method("terminal command batao"),
            Some(AccessMethod::Cli)
        );
        assert_eq!(
            d.detect_access_method("boto3 python example"),
            Some(AccessMethod::Sdk)
        );
        assert_eq!(d.detect_access_method("kaise kare"), None);
    }

    #[test]
    fn follow_up_needs_history() {
        let d = detector();
        let empty = ConversationContext::default();
        assert!(!d.is_follow_up("aur kya?", &empty));
        assert!(!d.is_follow_up("explain more detail then next", &empty));
        assert!(d.is_follow_up("aur kya?", &context_with_history()));
        assert!(d.is_follow_up("What ABOUT pricing", &context_with_history()));
        assert!(!d.is_follow_up("s3 bucket", &context_with_history()));
    }

    #[test]
    fn greetings_match_whole_words() {
        let d = detector();
        assert!(d.is_greeting("Hi!"));
        assert!(d.is_greeting("namaste ji"));
        assert!(d.is_greeting("aur bhai, kaise ho"));
        assert!(!d.is_greeting("which instance type"));
        assert!(!d.is_greeting("this is ec2"));
    }

    #[test]
    fn practice_requests() {
        let d = detector();
        assert!(d.is_practice_request("ek practice question do"));
        assert!(d.is_practice_request("S3 quiz"));
        assert!(d.is_practice_request("mujhe test karo"));
        assert!(d.is_practice_request("questions on iam"));
        assert!(!d.is_practice_request("latest ec2 pricing"));
    }
}
