//! # Folio Knowledge Command
//!
//! File: cli/src/commands/knowledge.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Implements `folio knowledge`, which shows what the assistant knows. By
//! default it prints a short summary of the active knowledge base; with
//! `--export` it prints the whole record as TOML, ready to be edited and passed
//! back with `--knowledge <FILE>` or `[knowledge] file = ...` in `.folio.toml`.
//!
//! ```bash
//! folio knowledge
//! folio knowledge --export > knowledge.toml
//! ```
//!
use super::KnowledgeArgs;
use crate::assistant::{self, KnowledgeBase};
use crate::core::config;
use crate::core::error::Result;
use clap::Parser;
use std::path::Path;

#[derive(Parser, Debug)]
pub struct KnowledgeCmdArgs {
    /// Print the full knowledge base as TOML instead of a summary.
    #[arg(long)]
    pub export: bool,

    #[command(flatten)]
    pub source: KnowledgeArgs,
}

pub async fn handle_knowledge(args: KnowledgeCmdArgs) -> Result<()> {
    let cfg = config::load_config()?;
    let override_file = args.source.knowledge.as_deref();
    let responder = assistant::build_responder(&cfg, override_file)?;
    let kb = responder.knowledge();

    if args.export {
        print!("{}", kb.to_toml()?);
    } else {
        let source = override_file
            .or(cfg.knowledge.file.as_deref().map(Path::new))
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "built-in profile".to_string());
        print!("{}", summarize(kb, &source));
    }
    Ok(())
}

fn summarize(kb: &KnowledgeBase, source: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!("Knowledge source: {}\n", source));
    out.push_str(&format!("Name:        {}\n", kb.name));
    out.push_str(&format!("Role:        {}\n", kb.role));
    out.push_str(&format!("Skills:      {}\n", kb.skills.len()));
    out.push_str(&format!("Experience:  {}\n", kb.experience.len()));
    out.push_str(&format!("Education:   {}\n", kb.education.len()));
    out.push_str(&format!("Projects:    {}\n", kb.projects.len()));
    for project in &kb.projects {
        out.push_str(&format!("  - {} ({})\n", project.name, project.date));
    }
    out
}
