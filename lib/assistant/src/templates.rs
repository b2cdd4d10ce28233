//! Reply templates and prompt builders.

use cloudbuddy_conversation::ConversationContext;
use cloudbuddy_knowledge::{AccessMethod, ServiceEntry};
use cloudbuddy_practice::Difficulty;
use std::fmt::Write as _;

/// How many earlier exchanges are quoted in a model prompt.
pub const PROMPT_HISTORY: usize = 2;

/// How many follow-up suggestions a reply carries at most.
pub const MAX_SUGGESTIONS: usize = 3;

/// Introduction sent in reply to a greeting.
pub const GREETING: &str = r#"# **Namaste yaar! 🙏 AWS Expert Assistant**

AWS sikhne aur troubleshoot karne ke liye ready hun!

## **Main kya kar sakta hun:**

• **Service Explanations** - EC2, S3, Lambda, IAM, VPC, RDS, CloudWatch
• **Step-by-Step Guides** - Console, CLI, aur SDK sab methods
• **Troubleshooting Help** - Problems solve karne mein madad
• **Practice Questions** - Dynamic AI-generated quiz
• **Screenshot Analysis** - AWS console ki images dekh kar help
• **Follow-up Support** - Detailed discussions

## **Popular Services:**
1. **EC2** - Virtual servers aur compute
2. **S3** - Object storage aur static hosting
3. **Lambda** - Serverless functions
4. **IAM** - Users aur permissions

Kya sikhna chahte ho today? 🚀"#;

/// Capabilities menu for messages that name no known service.
pub const SERVICES_MENU: &str = r#"# **AWS Services Available**

Main tumhe ye sab services mein help kar sakta hun:

## **Compute Services:**
• **EC2** - Virtual servers aur instances
• **Lambda** - Serverless functions

## **Storage Services:**
• **S3** - Object storage aur static hosting

## **Database Services:**
• **RDS** - Managed relational databases

## **Networking:**
• **VPC** - Virtual private cloud

## **Security:**
• **IAM** - Identity and access management

## **Monitoring:**
• **CloudWatch** - Logs aur metrics

**Kya specific service ke baare mein jaanna hai?**
Format: "S3 console mein kaise use kare" ya "EC2 troubleshoot karo" 🤔"#;

/// Sent when a reply could not be produced.
pub const APOLOGY: &str = r#"**Oops! Technical Issue 😅**

Kuch gadbad ho gayi yaar! Possible solutions:

1. **Phir se try karo** - Message resend kar do
2. **Simple language** - Basic English ya Hindi mein poocho
3. **Specific question** - Exact service name mention karo

**Example:** "S3 bucket kaise banate hain console mein?"

Main phir ready hun! 🚀"#;

/// Sent for screenshots when no model is configured.
pub const SCREENSHOT_UNAVAILABLE: &str = r#"**Screenshot Analysis Not Available** 📷

Gemini API key nahi mila yaar!

**Alternative Solutions:**
1. **Describe karo** - Text mein batao kya dikh raha hai
2. **Error message** - Jo error aa rahi hai wo copy paste kar do
3. **Service name** - Konsi AWS service use kar rahe ho

**API Key setup ke liye:** `export GEMINI_API_KEY='your-key'`"#;

/// Sent when screenshot analysis fails.
pub const SCREENSHOT_FAILED: &str = r#"**Screenshot Analysis Failed** 😅

Image process nahi kar paya yaar!

**Alternatives:**
• **Describe karo** - Text mein detail batao
• **Error code** - Exact error message share karo
• **Console section** - Konsa AWS service page khula hai

Phir main help kar sakta hun! 🔧"#;

/// Formats a knowledge base entry as a Markdown reply.
///
/// With an access method only that method's instructions are shown;
/// otherwise all three are listed.
#[must_use]
pub fn format_service_info(
    entry: &ServiceEntry,
    access: Option<AccessMethod>,
    topic: Option<&str>,
) -> String {
    let mut out = format!("## **{}**\n\n{}\n\n", entry.name, entry.description);

    if let Some(topic) = topic {
        let _ = write!(out, "**{}** ke baare mein specific info:\n\n", title_case(topic));
    }

    match access {
        Some(method) => {
            let steps = entry.instructions(method);
            let _ = match method {
                AccessMethod::Console => write!(out, "**Console Steps:**\n{steps}\n\n"),
                AccessMethod::Cli => write!(out, "**CLI Command:**\n```bash\n{steps}\n```\n\n"),
                AccessMethod::Sdk => write!(out, "**SDK Code:**\n```python\n{steps}\n```\n\n"),
            };
        }
        None => {
            out.push_str("**Access kaise kare:**\n");
            for method in AccessMethod::ALL {
                let steps = entry.instructions(method);
                let _ = match method {
                    AccessMethod::Console => writeln!(out, "• **Console**: {steps}"),
                    AccessMethod::Cli => writeln!(out, "• **CLI**: `{steps}`"),
                    AccessMethod::Sdk => writeln!(out, "• **SDK**: `{steps}`"),
                };
            }
            out.push('\n');
        }
    }

    out.push_str("**Common Issues aur Solutions:**\n");
    for (i, issue) in entry.troubleshooting.iter().enumerate() {
        let _ = writeln!(out, "{}. {issue}", i + 1);
    }

    if !entry.subtopics.is_empty() {
        let _ = writeln!(out, "\n**Related Topics:** {}", entry.subtopics.join(", "));
    }

    let _ = write!(
        out,
        "\n{} ke baare mein aur kya jaanna hai?",
        entry.id.to_uppercase()
    );
    out
}

/// Upper-cases the first letter of every word and lower-cases the rest.
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;
    for c in text.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}

/// Suggested next questions for a service, from its first subtopics.
#[must_use]
pub fn follow_up_suggestions(entry: &ServiceEntry) -> Vec<String> {
    let service = entry.id.to_uppercase();
    entry
        .subtopics
        .iter()
        .take(MAX_SUGGESTIONS)
        .map(|topic| format!("{service} {topic} ke baare mein batao"))
        .collect()
}

/// Header shown above a practice question. `None` means a random service.
#[must_use]
pub fn practice_header(service: Option<&str>, difficulty: Difficulty) -> String {
    match service {
        Some(service) => format!(
            "**{} Practice Question** ({difficulty} level) 🤔",
            service.to_uppercase()
        ),
        None => format!("**Random AWS Practice Question** ({difficulty} level) 🤔"),
    }
}

fn context_summary(context: &ConversationContext) -> String {
    let mut info = String::new();
    if let Some(service) = &context.current_service {
        let _ = write!(info, "Previous context: User was asking about {service}");
        if let Some(topic) = &context.current_topic {
            let _ = write!(info, " specifically {topic}");
        }
    }
    if context.is_empty() {
        return info;
    }
    if let Ok(recent) = serde_json::to_string(context.recent(PROMPT_HISTORY)) {
        let _ = write!(info, "\nRecent conversation: {recent}");
    }
    info
}

/// Builds the model prompt for a text question.
#[must_use]
pub fn enhanced_prompt(
    message: &str,
    context: &ConversationContext,
    detected_service: Option<&str>,
) -> String {
    let context_info = context_summary(context);
    let detected = detected_service
        .map(|service| format!("Detected service: {service}"))
        .unwrap_or_default();

    format!(
        r#"You are an AWS expert who speaks in natural Hinglish and provides well-structured responses.

FORMATTING RULES (VERY IMPORTANT):
1. Use bullet points (•) for lists of features, steps, or options
2. Use numbered points (1. 2. 3.) for sequential steps or procedures
3. Use **bold** for important terms and headings
4. Use `code blocks` for commands and code
5. Write in paragraphs when explaining concepts
6. Always end with a follow-up question to continue the conversation

RESPONSE STRUCTURE:
- Start with a brief explanation paragraph
- Use bullet points or numbered lists as appropriate
- Include practical examples
- End with "Aur kuch puchna hai iske baare mein?" or similar

TONE: Friendly Hinglish - use "yaar", "bhai", "dekho", naturally

{context_info}

User's question: {message}
{detected}

Provide a helpful, well-formatted response in Hinglish."#
    )
}

/// Builds the model prompt sent alongside a console screenshot.
#[must_use]
pub fn screenshot_prompt(message: &str, context: &ConversationContext) -> String {
    let context_info = context
        .current_service
        .as_ref()
        .map(|service| format!("User is working with {service}"))
        .unwrap_or_default();

    format!(
        r#"Analyze this AWS console screenshot and provide structured response in Hinglish.

Context: {context_info}
User question: {message}

Provide response in this format:
**Service Detected:** [service name]

**Current Status:** [what's happening]

**Issues Found:**
• [issue 1]
• [issue 2]

**Solutions:**
1. [step 1]
2. [step 2]
3. [step 3]

**Next Steps:**
What should they do next?

Keep it practical and in Hinglish tone."#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use cloudbuddy_conversation::Exchange;
    use cloudbuddy_knowledge::KnowledgeBase;

    fn ec2() -> &'static ServiceEntry {
        KnowledgeBase::aws().get("ec2").expect("ec2 entry")
    }

    #[test]
    fn console_only_reply_omits_other_methods() {
        let reply = format_service_info(ec2(), Some(AccessMethod::Console), None);

        assert!(reply.starts_with("## **Amazon EC2**\n\nVirtual servers in the cloud\n\n"));
        assert!(reply.contains("**Console Steps:**\nEC2 Dashboard → Launch Instance"));
        assert!(!reply.contains("CLI Command"));
        assert!(!reply.contains("SDK Code"));
        assert!(reply.ends_with("EC2 ke baare mein aur kya jaanna hai?"));
    }

    #[test]
    fn cli_reply_uses_bash_fence() {
        let reply = format_service_info(ec2(), Some(AccessMethod::Cli), None);
        assert!(reply.contains("**CLI Command:**\n```bash\naws ec2 run-instances"));
    }

    #[test]
    fn sdk_reply_shows_entry_instructions() {
        let entry = ec2();
        let reply = format_service_info(entry, Some(AccessMethod::Sdk), None);
        let expected = format!(
            "**SDK Code:**\n```python\n{}\n```\n\n",
            entry.instructions(AccessMethod::Sdk)
        );
        assert!(reply.contains(&expected));
        assert!(!reply.contains("Console Steps"));
    }

    #[test]
    fn no_method_lists_all_three() {
        let reply = format_service_info(ec2(), None, None);

        assert!(reply.contains("**Access kaise kare:**\n• **Console**: "));
        assert!(reply.contains("• **CLI**: `aws ec2 run-instances"));
        assert!(reply.contains("• **SDK**: `boto3.client"));
        assert!(reply.contains("`\n\n**Common Issues aur Solutions:**\n1. Check IAM permissions\n"));
        assert!(reply.contains(
            "**Related Topics:** launch, security groups, key pairs, AMI, instance types, pricing"
        ));
    }

    #[test]
    fn topic_heading_is_title_cased() {
        let reply = format_service_info(ec2(), None, Some("security groups"));
        assert!(reply.contains("**Security Groups** ke baare mein specific info:"));
    }

    #[test]
    fn title_case_lowercases_the_rest() {
        assert_eq!(title_case("AMI"), "Ami");
        assert_eq!(title_case("key pairs"), "Key Pairs");
    }

    #[test]
    fn suggestions_use_first_three_subtopics() {
        assert_eq!(
            follow_up_suggestions(ec2()),
            vec![
                "EC2 launch ke baare mein batao",
                "EC2 security groups ke baare mein batao",
                "EC2 key pairs ke baare mein batao",
            ]
        );
    }

    #[test]
    fn practice_headers() {
        assert_eq!(
            practice_header(Some("ec2"), Difficulty::Beginner),
            "**EC2 Practice Question** (beginner level) 🤔"
        );
        assert_eq!(
            practice_header(None, Difficulty::Advanced),
            "**Random AWS Practice Question** (advanced level) 🤔"
        );
    }

    #[test]
    fn prompt_quotes_sticky_context_and_recent_history() {
        let mut context = ConversationContext::default();
        for i in 0..3 {
            context.record(Exchange::new(
                format!("question {i}"),
                "answer",
                Some("s3".to_string()),
                Some("versioning".to_string()),
            ));
        }

        let prompt = enhanced_prompt("aur batao", &context, Some("s3"));

        assert!(prompt.contains("Previous context: User was asking about s3 specifically versioning"));
        assert!(prompt.contains("Recent conversation: "));
        assert!(!prompt.contains("question 0"));
        assert!(prompt.contains("question 2"));
        assert!(prompt.contains("User's question: aur batao\nDetected service: s3"));
    }

    #[test]
    fn prompt_without_context_has_no_history() {
        let prompt = enhanced_prompt("hello", &ConversationContext::default(), None);
        assert!(!prompt.contains("Previous context"));
        assert!(!prompt.contains("Recent conversation"));
    }

    #[test]
    fn screenshot_prompt_mentions_current_service() {
        let context = ConversationContext {
            current_service: Some("ec2".to_string()),
            ..ConversationContext::default()
        };
        let prompt = screenshot_prompt("ye error kya hai?", &context);
        assert!(prompt.contains("Context: User is working with ec2"));
        assert!(prompt.contains("User question: ye error kya hai?"));
    }
}
