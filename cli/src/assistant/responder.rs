//! # Folio Knowledge Responder
//!
//! File: cli/src/assistant/responder.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Answers a free-text question with exactly one canned reply built from the
//! knowledge base. Matching is case-insensitive substring containment against
//! [`RULES`], an ordered priority list: the **first** rule with a matching
//! keyword wins, there is no scoring. Unmatched questions (including the empty
//! string) get [`FALLBACK`], so an answer is always produced.
//!
//! ## Rule Order
//!
//! The order of [`RULES`] is part of the observable behavior. Keywords overlap
//! on purpose and precedence decides:
//! - "where are you from, what's your name" is an origin question (`from` before `name`).
//! - "work history" is a role question (`work` before `experience`/`work history`).
//! - the scheduling rule sits below contact, so "meet by email" answers with contact details.
//!
//! ## Examples
//!
//! ```rust
//! let responder = KnowledgeResponder::new(Arc::new(KnowledgeBase::builtin()), BookingLink::default());
//! assert_eq!(responder.find_answer("What's your NAME?"), "My name is Waddhanabot Yi.");
//! ```
//!
use super::knowledge::KnowledgeBase;
use std::sync::Arc;
use tracing::debug;

/// Reply used when no rule matches.
pub const FALLBACK: &str = "I'm not sure about that. Could you please ask something about my skills, experience, education, projects, or contact information? Or would you like to schedule a meeting?";

/// The subject a question was classified under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topic {
    Origin,
    Identity,
    WorkAuthorization,
    Role,
    Gratitude,
    Skills,
    Experience,
    Education,
    Projects,
    Contact,
    Scheduling,
    Passion,
}

/// One entry of the priority list: any keyword present selects the topic.
#[derive(Debug)]
pub struct Rule {
    pub topic: Topic,
    pub keywords: &'static [&'static str],
}

impl Rule {
    fn matches(&self, lowered: &str) -> bool {
        self.keywords.iter().any(|k| lowered.contains(k))
    }
}

/// Evaluated top to bottom; do not reorder.
pub const RULES: &[Rule] = &[
    Rule { topic: Topic::Origin, keywords: &["from"] },
    Rule { topic: Topic::Identity, keywords: &["name", "who are you"] },
    Rule { topic: Topic::WorkAuthorization, keywords: &["visa", "sponsorship", "work authorization"] },
    Rule { topic: Topic::Role, keywords: &["role", "work", "job"] },
    Rule { topic: Topic::Gratitude, keywords: &["thanks", "thank you"] },
    Rule { topic: Topic::Skills, keywords: &["skills", "technologies"] },
    Rule { topic: Topic::Experience, keywords: &["experience", "work history"] },
    Rule { topic: Topic::Education, keywords: &["education", "study", "background"] },
    Rule { topic: Topic::Projects, keywords: &["project", "portfolio"] },
    Rule { topic: Topic::Contact, keywords: &["contact", "email", "phone", "linkedin", "github"] },
    // The conversation controller intercepts these before the responder is asked.
    Rule { topic: Topic::Scheduling, keywords: &["schedule", "appointment", "meet", "calendly"] },
    Rule { topic: Topic::Passion, keywords: &["passion", "passionate"] },
];

/// Where visitors book a meeting, as advertised by the scheduling answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingLink {
    pub url: String,
    pub service: String,
}

impl Default for BookingLink {
    fn default() -> Self {
        Self {
            url: "https://calendly.com/thanon43".to_string(),
            service: "Calendly".to_string(),
        }
    }
}

/// Stateless question answering over a shared, immutable knowledge base.
#[derive(Debug, Clone)]
pub struct KnowledgeResponder {
    knowledge: Arc<KnowledgeBase>,
    booking: BookingLink,
}

impl KnowledgeResponder {
    pub fn new(knowledge: Arc<KnowledgeBase>, booking: BookingLink) -> Self {
        Self { knowledge, booking }
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    pub fn booking(&self) -> &BookingLink {
        &self.booking
    }

    /// Returns the topic of the first rule matching `question`, if any.
    pub fn classify(question: &str) -> Option<Topic> {
        let lowered = question.to_lowercase();
        RULES.iter().find(|rule| rule.matches(&lowered)).map(|rule| rule.topic)
    }

    /// # Find Answer (`find_answer`)
    ///
    /// Produces the reply for `question`. Never fails and never returns an
    /// empty string; the same question always yields the same answer.
    pub fn find_answer(&self, question: &str) -> String {
        let topic = Self::classify(question);
        debug!("Question classified as {:?}", topic);
        topic
            .and_then(|topic| self.render(topic))
            .filter(|answer| !answer.is_empty())
            .unwrap_or_else(|| FALLBACK.to_string())
    }

    /// `None` only when the knowledge base lacks the entry a topic describes.
    fn render(&self, topic: Topic) -> Option<String> {
        let kb = &*self.knowledge;
        let answer = match topic {
            Topic::Origin => kb.profile.origin.clone(),
            Topic::Identity => format!("My name is {}.", kb.name),
            Topic::WorkAuthorization => kb.profile.work_authorization.clone(),
            Topic::Role => format!("I am a {}.", kb.role),
            Topic::Gratitude => "My pleasure!".to_string(),
            Topic::Skills => format!("I am skilled in: {}.", kb.skills.join(", ")),
            Topic::Experience => {
                let exp = kb.experience.first()?;
                format!("I worked as a {} at {}. {}", exp.role, exp.company, exp.description)
            }
            Topic::Education => {
                let edu = kb.education.first()?;
                format!(
                    "I studied {} at {}, graduating in {}. My relevant coursework includes: {}.",
                    edu.degree,
                    edu.school,
                    edu.year,
                    edu.coursework.join(", ")
                )
            }
            Topic::Projects => {
                let project = kb.projects.first()?;
                format!(
                    "One of my notable projects is {}: {}. It was built using {}.",
                    project.name,
                    project.description,
                    project.technologies.join(", ")
                )
            }
            Topic::Contact => format!(
                "You can contact me via email at {}, phone at {}, LinkedIn at {}, or GitHub at {}.",
                kb.contact.email, kb.contact.phone, kb.contact.linkedin, kb.contact.github
            ),
            Topic::Scheduling => format!(
                "You can schedule a meeting with me through my {} link: {}",
                self.booking.service, self.booking.url
            ),
            Topic::Passion => kb.profile.passion.clone(),
        };
        Some(answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn responder() -> KnowledgeResponder {
        KnowledgeResponder::new(Arc::new(KnowledgeBase::builtin()), BookingLink::default())
    }

    #[test]
    fn test_name_questions_mention_name() {
        let r = responder();
        for q in ["name?", "What is your NAME", "tell me your name please", "who are you"] {
            assert!(
                r.find_answer(q).contains("Waddhanabot Yi"),
                "answer to {:?} should contain the name",
                q
            );
        }
    }

    #[test]
    fn test_origin_takes_precedence_over_name() {
        let r = responder();
        let answer = r.find_answer("where are you from, what's your name");
        assert_eq!(
            answer,
            "I am from Cambodia, but I am currently located in Washington state, USA!"
        );
        assert_eq!(
            KnowledgeResponder::classify("where are you from, what's your name"),
            Some(Topic::Origin)
        );
    }

    #[test]
    fn test_work_history_resolves_to_role() {
        assert_eq!(KnowledgeResponder::classify("your work history?"), Some(Topic::Role));
        assert_eq!(responder().find_answer("your work history?"), "I am a Software Developer.");
    }

    #[test]
    fn test_empty_question_gets_fallback() {
        let r = responder();
        assert_eq!(r.find_answer(""), FALLBACK);
        assert!(!r.find_answer("").is_empty());
        assert_eq!(r.find_answer("tell me a joke"), FALLBACK);
    }

    #[test]
    fn test_find_answer_is_idempotent() {
        let r = responder();
        for q in ["skills", "education?", "random words", "passion"] {
            assert_eq!(r.find_answer(q), r.find_answer(q));
        }
    }

    #[test]
    fn test_skills_joined_in_order() {
        let answer = responder().find_answer("What SKILLS do you have?");
        assert!(answer.starts_with("I am skilled in: Python, C/C++, Java, Kotlin,"));
        assert!(answer.ends_with("UX/UI Design, 3D Modeling."));
    }

    #[test]
    fn test_experience_describes_first_entry_only() {
        let answer = responder().find_answer("Tell me about your experience");
        assert!(answer.starts_with("I worked as a Software Developer Intern at SquatchSports. "));
        assert!(!answer.contains("Peer Mentor"));
    }

    #[test]
    fn test_education_includes_coursework() {
        let answer = responder().find_answer("where did you study");
        assert!(answer.starts_with(
            "I studied Bachelor of Science in Computer Science at Washington State University, graduating in Jan 2020 – Dec 2024."
        ));
        assert!(answer.ends_with("Computer Architecture, Project Management."));
    }

    #[test]
    fn test_project_describes_first_entry() {
        let answer = responder().find_answer("show me a project");
        assert!(answer.starts_with("One of my notable projects is Scent Compass AI App: "));
        assert!(answer.ends_with("It was built using Python, HTML/CSS, JavaScript, Flask, Selenium."));
    }

    #[test]
    fn test_contact_lists_all_channels() {
        assert_eq!(
            responder().find_answer("how do I contact you"),
            "You can contact me via email at thanon43@gmail.com, phone at 500-595-9295, LinkedIn at linkedin.com/in/waddhanabot-yi/, or GitHub at https://github.com/WBotCS."
        );
    }

    #[test]
    fn test_scheduling_rule_reachable_directly() {
        let r = responder();
        assert_eq!(
            r.find_answer("can I book via calendly"),
            "You can schedule a meeting with me through my Calendly link: https://calendly.com/thanon43"
        );
        assert_eq!(KnowledgeResponder::classify("appointment"), Some(Topic::Scheduling));
    }

    #[test]
    fn test_fixed_statements() {
        let r = responder();
        assert_eq!(r.find_answer("Thanks!"), "My pleasure!");
        assert!(r.find_answer("do you need visa sponsorship").starts_with("I have work authorization."));
        assert!(r.find_answer("what are you passionate about").starts_with("I am passionate about"));
    }

    #[test]
    fn test_rule_order_is_stable() {
        let topics: Vec<Topic> = RULES.iter().map(|r| r.topic).collect();
        assert_eq!(
            topics,
            vec![
                Topic::Origin,
                Topic::Identity,
                Topic::WorkAuthorization,
                Topic::Role,
                Topic::Gratitude,
                Topic::Skills,
                Topic::Experience,
                Topic::Education,
                Topic::Projects,
                Topic::Contact,
                Topic::Scheduling,
                Topic::Passion,
            ]
        );
    }

    #[test]
    fn test_missing_entry_falls_back() {
        let mut kb = KnowledgeBase::builtin();
        kb.projects.clear();
        let r = KnowledgeResponder::new(Arc::new(kb), BookingLink::default());
        assert_eq!(r.find_answer("projects"), FALLBACK);
    }
}
