//! # Folio Knowledge Base
//!
//! File: cli/src/assistant/knowledge.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! The fixed biographical and professional record the chat assistant answers
//! from. A knowledge base is built once at startup (either the built-in profile
//! or a TOML file), validated, wrapped in an `Arc` and never mutated afterwards.
//!
//! ## File Format
//!
//! A knowledge file is the TOML rendering of [`KnowledgeBase`]; run
//! `folio knowledge --export` to get the built-in profile as a starting point.
//!
//! ```toml
//! name = "Jane Doe"
//! role = "Platform Engineer"
//! skills = ["Rust", "Go"]
//!
//! [contact]
//! phone = "555-000-1111"
//! email = "jane@example.com"
//! linkedin = "linkedin.com/in/jane/"
//! github = "https://github.com/jane"
//!
//! [profile]
//! origin = "I am from Lisbon."
//! work_authorization = "I am authorized to work in the EU."
//! passion = "I am passionate about distributed systems."
//!
//! [[experience]]
//! company = "Acme"
//! # ...
//! ```
//!
use crate::core::error::{FolioError, Result};
use anyhow::{anyhow, Context};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use tracing::{debug, info};

/// Everything the assistant knows about the site owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KnowledgeBase {
    pub name: String,
    pub role: String,
    #[serde(default)]
    pub skills: Vec<String>,
    pub contact: Contact,
    /// Fixed narrative answers that are not derived from the lists below.
    pub profile: Profile,
    #[serde(default)]
    pub technical_skills: TechnicalSkills,
    #[serde(default)]
    pub experience: Vec<Experience>,
    #[serde(default)]
    pub education: Vec<Education>,
    #[serde(default)]
    pub projects: Vec<Project>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Contact {
    pub phone: String,
    pub email: String,
    pub linkedin: String,
    pub github: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Profile {
    pub origin: String,
    pub work_authorization: String,
    pub passion: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Experience {
    pub company: String,
    pub role: String,
    pub period: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Education {
    pub school: String,
    pub degree: String,
    pub year: String,
    pub location: String,
    #[serde(default)]
    pub coursework: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Project {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub technologies: Vec<String>,
    pub date: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TechnicalSkills {
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub tools: Vec<String>,
    #[serde(default)]
    pub frameworks: Vec<String>,
}

impl KnowledgeBase {
    /// # Load Knowledge Base (`load`)
    ///
    /// Returns the knowledge base read from `path`, or the built-in profile when
    /// no path is given. A file that parses but fails [`KnowledgeBase::validate`]
    /// is rejected.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            debug!("No knowledge file configured, using the built-in profile.");
            return Ok(Self::builtin());
        };

        info!("Loading knowledge base from: {}", path.display());
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read knowledge file: {}", path.display()))?;
        let kb = Self::from_toml(&content)
            .with_context(|| format!("Invalid knowledge file: {}", path.display()))?;
        Ok(kb)
    }

    /// Parses and validates a TOML knowledge document.
    pub fn from_toml(content: &str) -> Result<Self> {
        let kb: Self = toml::from_str(content).context("Failed to parse knowledge TOML")?;
        kb.validate()?;
        Ok(kb)
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize knowledge base to TOML")
    }

    /// # Validate Knowledge Base (`validate`)
    ///
    /// The responder describes the *first* experience, education and project
    /// entry, so each list must have one.
    pub fn validate(&self) -> Result<()> {
        let required = [("name", &self.name), ("role", &self.role)];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(anyhow!(FolioError::Knowledge(format!(
                    "'{}' must not be empty.",
                    field
                ))));
            }
        }
        if self.experience.is_empty() {
            return Err(anyhow!(FolioError::Knowledge(
                "at least one [[experience]] entry is required.".into()
            )));
        }
        if self.education.is_empty() {
            return Err(anyhow!(FolioError::Knowledge(
                "at least one [[education]] entry is required.".into()
            )));
        }
        if self.projects.is_empty() {
            return Err(anyhow!(FolioError::Knowledge(
                "at least one [[projects]] entry is required.".into()
            )));
        }
        Ok(())
    }

    /// The site owner's own profile, compiled into the binary.
    pub fn builtin() -> Self {
        Self {
            name: "Waddhanabot Yi".into(),
            role: "Software Developer".into(),
            contact: Contact {
                phone: "500-595-9295".into(),
                email: "thanon43@gmail.com".into(),
                linkedin: "linkedin.com/in/waddhanabot-yi/".into(),
                github: "https://github.com/WBotCS".into(),
            },
            profile: Profile {
                origin: "I am from Cambodia, but I am currently located in Washington state, USA!".into(),
                work_authorization: "I have work authorization. I am currently on F1-OPT (STEM extension eligible). I do not require sponsorship for the first two years, but after that, I will require work visa sponsorship.".into(),
                passion: "I am passionate about software development, artificial intelligence, and machine learning. I enjoy creating innovative solutions to complex problems that could make an impact!".into(),
            },
            skills: strings(&[
                "Python",
                "C/C++",
                "Java",
                "Kotlin",
                "HTML/CSS",
                "JavaScript",
                "Machine Learning",
                "Artificial Intelligence",
                "Data Structures",
                "Database Management",
                "Systems Programming",
                "Project Management",
                "UX/UI Design",
                "3D Modeling",
            ]),
            experience: vec![
                Experience {
                    company: "SquatchSports".into(),
                    role: "Software Developer Intern".into(),
                    period: "Jan 2024 – Dec 2024".into(),
                    description: "Successfully led a cross-functional team to develop a mobile application to determine basketball shot make or miss using AI, achieving 95% accuracy through the integration of the MediaPipe Framework. Designed and implemented advanced tracking features for shot positions and outcomes by leveraging data from machine learning models, enhancing player performance analysis by 30%. Led a cross-functional Agile team, managing sprint planning, task prioritization, and stakeholder communication to deliver features ahead of schedule.".into(),
                },
                Experience {
                    company: "WSU Agricultural and Sciences".into(),
                    role: "Technical Lab Assistant I".into(),
                    period: "Sep 2023 – May 2024".into(),
                    description: "Developed training datasets from nematode data, leading to a 20% improvement in the accuracy of AI-based plant disease models. Streamlined experimental setup and maintenance for a 15% increase in lab productivity. Assisted with the execution of experiments in a laboratory setting, ensuring high standards of data quality.".into(),
                },
                Experience {
                    company: "WSU International Program".into(),
                    role: "Peer Mentor".into(),
                    period: "Apr 2021 – May 2022".into(),
                    description: "Accomplished a 50% increase in event attendance by planning and executing engaging programs tailored to international students’ interests. Improved cultural adaptation for 100+ international students by providing comprehensive support and resources. Enhanced the integration and experience of international program participants by creating and delivering workshops and resources.".into(),
                },
            ],
            education: vec![Education {
                school: "Washington State University".into(),
                degree: "Bachelor of Science in Computer Science".into(),
                year: "Jan 2020 – Dec 2024".into(),
                location: "Pullman, WA".into(),
                coursework: strings(&[
                    "Data Structures",
                    "Software Engineering",
                    "Database Management",
                    "Artificial Intelligence",
                    "Machine Learning",
                    "Systems Programming",
                    "Computer Architecture",
                    "Project Management",
                ]),
            }],
            projects: vec![
                Project {
                    name: "Scent Compass AI App".into(),
                    description: "Achieved a 95% satisfaction rate in fragrance recommendations by engineering a content-based AI recommender with features like one-hot encoding, deployed using Flask and JavaScript. Built and deployed a user-friendly web app that improved the fragrance-matching process through machine learning (cosine similarity).".into(),
                    technologies: strings(&["Python", "HTML/CSS", "JavaScript", "Flask", "Selenium"]),
                    date: "January 2025".into(),
                },
                Project {
                    name: "Theia Accessibility App".into(),
                    description: "Created an Android application using Java and Android Studio to assist visually impaired individuals with navigation. Facilitated seamless navigation for users with disabilities by developing a Java-based mobile app with GPS, camera, and voice command integration, achieving 90% usability scores in testing. Designed and implemented features to provide inclusive, point-A-to-point-B navigation for users with mobility challenges.".into(),
                    technologies: strings(&["Java", "Kotlin", "Android Studio"]),
                    date: "August 2024".into(),
                },
                Project {
                    name: "Doctor Patient Portal Web".into(),
                    description: "Accomplished a 40% improvement in user accessibility by designing and developing an intuitive web portal interface using HTML, CSS, and JavaScript. Maintained comprehensive technical documentation throughout the development process to ensure seamless knowledge transfer and system scalability.".into(),
                    technologies: strings(&["HTML/CSS", "UML"]),
                    date: "March 2023".into(),
                },
            ],
            technical_skills: TechnicalSkills {
                languages: strings(&["Python", "C/C++", "Java", "Kotlin", "HTML/CSS", "JavaScript"]),
                tools: strings(&[
                    "VS Code",
                    "Android Studio",
                    "Git",
                    "AWS",
                    "Microsoft Office",
                    "Adobe Creative",
                    "AutoDesk",
                ]),
                frameworks: strings(&[
                    "UX/UI Design",
                    "Machine Learning",
                    "Application Development",
                    "System Analysis",
                    "Project Management",
                    "IT Support",
                    "Quality Inspection",
                    "3D Modeling",
                ]),
            },
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
