//! Fixed questions served when the model cannot be used.

use crate::difficulty::Difficulty;
use crate::question::PracticeQuestion;

fn owned(options: [&str; 4]) -> Vec<String> {
    options.iter().map(|o| (*o).to_string()).collect()
}

/// Returns the canned question for `service` at `difficulty`.
///
/// Only `s3`/beginner and `ec2`/intermediate have real questions; every
/// other pair gets a placeholder asking the user to try again.
#[must_use]
pub fn fallback_question(service: &str, difficulty: Difficulty) -> PracticeQuestion {
    match (service, difficulty) {
        ("s3", Difficulty::Beginner) => PracticeQuestion {
            question: "S3 bucket create karne ke liye minimum kya chahiye?".to_string(),
            options: owned([
                "Bucket name aur region",
                "Only bucket name",
                "Name, region aur policy",
                "AWS account only",
            ]),
            correct: 0,
            explanation:
                "Bucket name unique hona chahiye globally aur region select karna zaroori hai."
                    .to_string(),
            service: "s3".to_string(),
            difficulty: Difficulty::Beginner,
            topic: "basic".to_string(),
        },
        ("ec2", Difficulty::Intermediate) => PracticeQuestion {
            question: "Production environment ke liye EC2 instance choose karte time kya consider karna chahiye?".to_string(),
            options: owned([
                "Only price",
                "CPU aur memory requirements",
                "All resources aur redundancy",
                "Storage type only",
            ]),
            correct: 2,
            explanation: "Production mein CPU, memory, storage, network aur high availability sab consider karna padta hai yaar.".to_string(),
            service: "ec2".to_string(),
            difficulty: Difficulty::Intermediate,
            topic: "production".to_string(),
        },
        _ => PracticeQuestion {
            question: format!(
                "{} ke baare mein ek question generate nahi kar paya yaar!",
                service.to_uppercase()
            ),
            options: owned([
                "Try again",
                "Different service",
                "Check connection",
                "Contact support",
            ]),
            correct: 0,
            explanation: "Technical issue hai, phir se try karo.".to_string(),
            service: service.to_string(),
            difficulty,
            topic: "error".to_string(),
        },
    }
}
