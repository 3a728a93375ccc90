//! Thread and feed display commands

use super::render::print_thread;
use super::workspace::Workspace;
use super::GlobalOpts;
use anyhow::{Context, Result};
use avalia_core::types::{CommentId, DisciplineKey, ProfessorKey};
use clap::Args;

/// Arguments for the show command
#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Comment whose thread to show
    pub id: CommentId,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the feed command
#[derive(Debug, Args)]
pub struct FeedArgs {
    /// Discipline code
    pub discipline: String,

    /// Show comments about this professor instead of general ones
    #[arg(long, short)]
    pub professor: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn execute_show(opts: &GlobalOpts, args: ShowArgs) -> Result<()> {
    let workspace = Workspace::open(opts)?;
    let viewer = workspace.identity().ok();

    let thread = workspace
        .service
        .thread(args.id, viewer.as_ref())
        .context(format!("Failed to load thread #{}", args.id))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&thread)?);
        return Ok(());
    }

    if let Ok(venue) = workspace.service.placement_of(args.id) {
        use colored::Colorize;
        let label = match venue.professor {
            Some(professor) => format!("{} / {}", venue.discipline, professor),
            None => venue.discipline.to_string(),
        };
        println!("{}", label.bold().underline());
        println!();
    }
    print_thread(&thread);
    Ok(())
}

pub fn execute_feed(opts: &GlobalOpts, args: FeedArgs) -> Result<()> {
    use colored::Colorize;

    let workspace = Workspace::open(opts)?;
    let viewer = workspace.identity().ok();
    let discipline = DisciplineKey::new(args.discipline);

    let (title, feed) = match args.professor {
        Some(professor) => {
            let professor = ProfessorKey::new(professor);
            let title = format!("{} / {}", discipline, professor);
            let feed = workspace
                .service
                .professor_feed(discipline, professor, viewer.as_ref())?;
            (title, feed)
        }
        None => {
            let title = discipline.to_string();
            let feed = workspace
                .service
                .discipline_feed(discipline, viewer.as_ref())?;
            (title, feed)
        }
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&feed)?);
        return Ok(());
    }

    println!("{}", title.bold().underline());
    println!();
    if feed.is_empty() {
        println!("No comments yet.");
    }
    for thread in &feed {
        print_thread(thread);
        println!();
    }
    Ok(())
}
