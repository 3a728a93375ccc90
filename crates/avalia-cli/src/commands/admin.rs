//! Admin command
//!
//! Moderation feeds and actions. Every subcommand acts as `--as`, which must
//! be listed under `[moderation] admins` and not banned.

use super::render::{print_comment, print_page};
use super::workspace::Workspace;
use super::GlobalOpts;
use anyhow::{Context, Result};
use avalia_core::ban::AccountBanService;
use avalia_core::types::{CommentId, UserKey};
use clap::Subcommand;

/// Admin subcommands
#[derive(Debug, Subcommand)]
pub enum AdminCommand {
    /// List all root comments, newest first
    Comments {
        /// Zero-based page
        #[arg(long, default_value = "0")]
        page: usize,

        /// Page size (defaults to queries.default_page_size)
        #[arg(long)]
        size: Option<usize>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List alarming root comments
    Alarming {
        /// Zero-based page
        #[arg(long, default_value = "0")]
        page: usize,

        /// Page size (defaults to queries.default_page_size)
        #[arg(long)]
        size: Option<usize>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List reported root comments, most reported first
    Reported {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show moderation counters
    Stats {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Clear the alarm flag of a comment
    MarkSafe {
        /// Comment ID
        id: CommentId,
    },

    /// Delete a comment and its replies
    Delete {
        /// Comment ID
        id: CommentId,

        /// Skip confirmation
        #[arg(long, short)]
        yes: bool,
    },

    /// Ban the author of a comment
    Ban {
        /// Comment ID
        id: CommentId,

        /// Reason recorded with the ban
        #[arg(long, short)]
        reason: Option<String>,
    },

    /// Lift a ban
    Unban {
        /// User key
        user: String,
    },

    /// List banned accounts
    Bans {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Execute the admin command
pub fn execute(opts: &GlobalOpts, cmd: AdminCommand) -> Result<()> {
    let workspace = Workspace::open(opts)?;
    let admin = workspace.admin()?;
    tracing::debug!("Admin command as {}", admin);

    match cmd {
        AdminCommand::Comments { page, size, json } => {
            let page = workspace.queries.list_all_roots(page, size)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&page)?);
            } else {
                print_page(&page);
            }
            Ok(())
        }
        AdminCommand::Alarming { page, size, json } => {
            let page = workspace.queries.list_alarming(page, size)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&page)?);
            } else {
                print_page(&page);
            }
            Ok(())
        }
        AdminCommand::Reported { json } => list_reported(&workspace, json),
        AdminCommand::Stats { json } => show_stats(&workspace, json),
        AdminCommand::MarkSafe { id } => mark_safe(&workspace, id),
        AdminCommand::Delete { id, yes } => delete(&workspace, id, yes),
        AdminCommand::Ban { id, reason } => ban(&workspace, id, &admin, reason),
        AdminCommand::Unban { user } => unban(&workspace, &user),
        AdminCommand::Bans { json } => list_bans(&workspace, json),
    }
}

fn list_reported(workspace: &Workspace, as_json: bool) -> Result<()> {
    let reported = workspace.queries.list_reported()?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&reported)?);
        return Ok(());
    }

    if reported.is_empty() {
        println!("No reported comments.");
    }
    for comment in &reported {
        print_comment(comment, 0);
        println!();
    }
    Ok(())
}

fn show_stats(workspace: &Workspace, as_json: bool) -> Result<()> {
    use colored::Colorize;

    let stats = workspace.queries.stats()?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("{}", "Moderation:".bold().underline());
    println!("  Comments:  {}", stats.total);
    println!("  Alarming:  {}", stats.alarming.to_string().red());
    println!("  Reported:  {}", stats.reported.to_string().yellow());
    println!(
        "  {}",
        format!(
            "(escalation after {} reports)",
            workspace.config.moderation.escalation_threshold
        )
        .dimmed()
    );
    Ok(())
}

fn mark_safe(workspace: &Workspace, id: CommentId) -> Result<()> {
    use colored::Colorize;

    let comment = workspace
        .service
        .mark_safe(id)
        .context(format!("Failed to mark #{} safe", id))?;
    println!("{} Comment #{} marked safe", "✓".green(), comment.id());
    Ok(())
}

fn delete(workspace: &Workspace, id: CommentId, yes: bool) -> Result<()> {
    use colored::Colorize;

    if !yes {
        use dialoguer::Confirm;

        let confirmed = Confirm::new()
            .with_prompt(format!("Delete comment #{} and all its replies?", id))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("Delete cancelled.");
            return Ok(());
        }
    }

    if workspace.service.delete_as_admin(id)? {
        println!("{} Deleted comment #{}", "✓".green(), id);
    } else {
        println!("{} Comment #{} does not exist", "⚠".yellow(), id);
    }
    Ok(())
}

fn ban(
    workspace: &Workspace,
    id: CommentId,
    admin: &UserKey,
    reason: Option<String>,
) -> Result<()> {
    use colored::Colorize;

    let author = workspace.service.get(id)?.author().clone();
    let banned = workspace
        .service
        .ban_author_of(id, admin, reason)
        .context(format!("Failed to ban the author of #{}", id))?;

    if banned {
        println!("{} Banned {}", "✓".green(), author);
    } else {
        println!("{} {} is already banned", "⚠".yellow(), author);
    }
    Ok(())
}

fn unban(workspace: &Workspace, user: &str) -> Result<()> {
    use colored::Colorize;

    let user = UserKey::new(user);
    if workspace.bans().unban(&user)? {
        println!("{} Lifted the ban on {}", "✓".green(), user);
    } else {
        println!("{} {} is not banned", "⚠".yellow(), user);
    }
    Ok(())
}

fn list_bans(workspace: &Workspace, as_json: bool) -> Result<()> {
    use colored::Colorize;

    let bans = workspace.bans().list()?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&bans)?);
        return Ok(());
    }

    if bans.is_empty() {
        println!("No banned accounts.");
        return Ok(());
    }

    println!("{}", "Banned accounts:".bold().underline());
    for record in &bans {
        println!(
            "  {} by {} on {}{}",
            record.user.to_string().red(),
            record.banned_by,
            record.banned_at.format("%Y-%m-%d"),
            record
                .reason
                .as_ref()
                .map(|r| format!(": {}", r))
                .unwrap_or_default()
        );
    }
    Ok(())
}
