//! Terminal rendering of comments and threads

use avalia_core::comment::{Comment, VoteState};
use avalia_core::page::Page;
use avalia_core::service::ThreadNode;
use colored::Colorize;

/// One-line header: id, initials, author, date, counters and flags
pub fn header(comment: &Comment) -> String {
    let mut line = format!(
        "{} [{}] {} · {}  ▲{} ▼{}",
        format!("#{}", comment.id()).bold(),
        comment.author().initials().cyan(),
        comment.author(),
        comment.created_at().format("%Y-%m-%d %H:%M").to_string().dimmed(),
        comment.up_votes(),
        comment.down_votes(),
    );

    if comment.has_reports() {
        line.push_str(&format!(" ⚑{}", comment.report_count()));
    }
    if comment.is_edited() {
        line.push_str(&format!(" {}", "(edited)".dimmed()));
    }
    if comment.is_alarming() {
        line.push_str(&format!(" {}", "ALARMING".red().bold()));
    }
    if comment.is_reported() {
        line.push_str(&format!(" {}", "REPORTED".yellow().bold()));
    }
    line
}

/// Header of a root comment followed by where it lives
pub fn venue_line(comment: &Comment) -> Option<String> {
    comment.venue().map(|venue| match &venue.professor {
        Some(professor) => format!("{} / {}", venue.discipline, professor),
        None => venue.discipline.to_string(),
    })
}

pub fn print_comment(comment: &Comment, indent: usize) {
    let pad = "  ".repeat(indent);
    println!("{}{}", pad, header(comment));
    if let Some(venue) = venue_line(comment) {
        println!("{}  {}", pad, venue.dimmed());
    }
    for line in comment.text().lines() {
        println!("{}  {}", pad, line);
    }
}

fn vote_marker(state: VoteState) -> &'static str {
    match state {
        VoteState::Up => " (you: ▲)",
        VoteState::Down => " (you: ▼)",
        VoteState::None => "",
    }
}

/// Print a thread with nested indentation
pub fn print_thread(thread: &ThreadNode) {
    for (depth, node) in thread.walk() {
        print_comment(&node.comment, depth);
        let pad = "  ".repeat(depth);
        let mut meta = format!("{} repl{}", node.reply_count, if node.reply_count == 1 { "y" } else { "ies" });
        if node.is_owner {
            meta.push_str(", yours");
        }
        meta.push_str(vote_marker(node.viewer_vote));
        println!("{}  {}", pad, meta.dimmed());
    }
}

pub fn print_page(page: &Page<Comment>) {
    if page.is_empty() {
        println!("No comments found.");
    }
    for comment in &page.content {
        print_comment(comment, 0);
        println!();
    }
    println!(
        "{}",
        format!(
            "Page {} of {} ({} total)",
            page.current_page + 1,
            page.total_pages.max(1),
            page.total_elements
        )
        .dimmed()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use avalia_core::types::{CommentId, DisciplineKey, ProfessorKey, UserKey};

    fn comment() -> Comment {
        Comment::create(
            CommentId(7),
            UserKey::new("joao@unb.br"),
            "texto",
            Some(DisciplineKey::new("CIC0004")),
            Some(ProfessorKey::new("p-1")),
            None,
        )
        .unwrap()
    }

    #[test]
    fn test_header_mentions_id_and_initials() {
        colored::control::set_override(false);
        let line = header(&comment());
        assert!(line.starts_with("#7 [JO] joao@unb.br"));
        assert!(line.ends_with("▲0 ▼0"));
    }

    #[test]
    fn test_venue_line() {
        assert_eq!(venue_line(&comment()).as_deref(), Some("CIC0004 / p-1"));
    }
}
