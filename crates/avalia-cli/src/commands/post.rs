//! Post and reply commands

use super::render::print_comment;
use super::workspace::Workspace;
use super::GlobalOpts;
use anyhow::{Context, Result};
use avalia_core::types::{CommentId, DisciplineKey, ProfessorKey};
use clap::Args;

/// Arguments for the post command
#[derive(Debug, Args)]
pub struct PostArgs {
    /// Discipline code
    #[arg(long, short)]
    pub discipline: String,

    /// Professor, for a comment about a professor of the discipline
    #[arg(long, short)]
    pub professor: Option<String>,

    /// Comment text
    pub text: String,
}

/// Arguments for the reply command
#[derive(Debug, Args)]
pub struct ReplyArgs {
    /// Comment to reply to
    pub parent: CommentId,

    /// Reply text
    pub text: String,
}

pub fn execute_post(opts: &GlobalOpts, args: PostArgs) -> Result<()> {
    use colored::Colorize;

    let workspace = Workspace::open(opts)?;
    let author = workspace.caller()?;

    let comment = workspace
        .service
        .post_root(
            author,
            args.text,
            DisciplineKey::new(args.discipline),
            args.professor.map(ProfessorKey::new),
        )
        .context("Failed to post comment")?;

    println!("{} Posted comment #{}", "✓".green(), comment.id());
    print_comment(&comment, 1);
    if comment.is_alarming() {
        println!("{} Flagged for moderator review.", "⚠".yellow());
    }
    Ok(())
}

pub fn execute_reply(opts: &GlobalOpts, args: ReplyArgs) -> Result<()> {
    use colored::Colorize;

    let workspace = Workspace::open(opts)?;
    let author = workspace.caller()?;

    let comment = workspace
        .service
        .reply(author, args.text, args.parent)
        .context(format!("Failed to reply to #{}", args.parent))?;

    println!(
        "{} Posted reply #{} to #{}",
        "✓".green(),
        comment.id(),
        args.parent
    );
    print_comment(&comment, 1);
    if comment.is_alarming() {
        println!("{} Flagged for moderator review.", "⚠".yellow());
    }
    Ok(())
}
