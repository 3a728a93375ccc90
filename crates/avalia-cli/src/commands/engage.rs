//! Edit, vote, report and delete commands

use super::render::print_comment;
use super::workspace::Workspace;
use super::GlobalOpts;
use anyhow::{Context, Result};
use avalia_core::comment::{VoteChoice, VoteOutcome};
use avalia_core::types::CommentId;
use clap::{Args, ValueEnum};

/// Vote direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Direction {
    Up,
    Down,
}

impl From<Direction> for VoteChoice {
    fn from(direction: Direction) -> Self {
        VoteChoice::from_upvote(direction == Direction::Up)
    }
}

/// Arguments for the edit command
#[derive(Debug, Args)]
pub struct EditArgs {
    /// Comment to edit
    pub id: CommentId,

    /// New text
    pub text: String,
}

/// Arguments for the vote command
#[derive(Debug, Args)]
pub struct VoteArgs {
    /// Comment to vote on
    pub id: CommentId,

    /// Vote direction
    #[arg(value_enum)]
    pub direction: Direction,
}

/// Arguments for the report command
#[derive(Debug, Args)]
pub struct ReportArgs {
    /// Comment to report
    pub id: CommentId,
}

/// Arguments for the delete command
#[derive(Debug, Args)]
pub struct DeleteArgs {
    /// Comment to delete
    pub id: CommentId,

    /// Skip confirmation
    #[arg(long, short)]
    pub yes: bool,
}

pub fn execute_edit(opts: &GlobalOpts, args: EditArgs) -> Result<()> {
    use colored::Colorize;

    let workspace = Workspace::open(opts)?;
    let caller = workspace.caller()?;

    let comment = workspace
        .service
        .edit_own(args.id, &caller, args.text)
        .context(format!("Failed to edit #{}", args.id))?;

    println!("{} Edited comment #{}", "✓".green(), comment.id());
    print_comment(&comment, 1);
    Ok(())
}

pub fn execute_vote(opts: &GlobalOpts, args: VoteArgs) -> Result<()> {
    use colored::Colorize;

    let workspace = Workspace::open(opts)?;
    let caller = workspace.caller()?;

    let tally = workspace
        .service
        .vote(&caller, args.id, args.direction.into())
        .context(format!("Failed to vote on #{}", args.id))?;

    let action = match tally.outcome {
        VoteOutcome::Added { .. } => "Vote recorded",
        VoteOutcome::Cancelled { .. } => "Vote withdrawn",
        VoteOutcome::Switched { .. } => "Vote switched",
    };
    println!(
        "{} {} on #{}: ▲{} ▼{}",
        "✓".green(),
        action,
        args.id,
        tally.up_votes,
        tally.down_votes
    );
    Ok(())
}

pub fn execute_report(opts: &GlobalOpts, args: ReportArgs) -> Result<()> {
    use colored::Colorize;

    let workspace = Workspace::open(opts)?;
    let caller = workspace.caller()?;

    let added = workspace
        .service
        .report(args.id, &caller)
        .context(format!("Failed to report #{}", args.id))?;

    if added {
        println!("{} Reported comment #{}", "✓".green(), args.id);
    } else {
        println!("{} You already reported comment #{}", "⚠".yellow(), args.id);
    }
    Ok(())
}

pub fn execute_delete(opts: &GlobalOpts, args: DeleteArgs) -> Result<()> {
    use colored::Colorize;

    let workspace = Workspace::open(opts)?;
    let caller = workspace.actor()?;

    if !args.yes {
        use dialoguer::Confirm;

        let replies = workspace.service.count_descendants(args.id).unwrap_or(0);
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Delete comment #{} and its {} replies?",
                args.id, replies
            ))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("Delete cancelled.");
            return Ok(());
        }
    }

    let deleted = workspace
        .service
        .delete(args.id, &caller)
        .context(format!("Failed to delete #{}", args.id))?;

    if deleted {
        println!("{} Deleted comment #{}", "✓".green(), args.id);
    } else {
        println!("{} Comment #{} does not exist", "⚠".yellow(), args.id);
    }
    Ok(())
}
