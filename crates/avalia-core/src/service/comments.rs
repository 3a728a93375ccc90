//! Comment service
//!
//! Every mutation of an existing comment is a read-modify-write through
//! [`CommentRepository::save`]. A stale save is retried up to `max_retries`
//! extra times before the caller sees `Conflict`.

use super::thread::{build_thread, ThreadNode};
use crate::ban::{AccountBanService, BanRequest};
use crate::comment::{
    AlarmPolicy, Comment, CommentBuilder, CommentValidator, HeuristicAlarmPolicy, Venue,
    VoteChoice, VoteTally,
};
use crate::config::Config;
use crate::error::{AvaliaError, Result};
use crate::repository::{CommentRepository, RootFilter};
use crate::types::{Actor, CommentId, DisciplineKey, Operation, ProfessorKey, UserKey};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, warn};

/// What a mutation closure decided
enum Mutation<T> {
    /// Persist the modified comment
    Write(T),
    /// Nothing changed; skip the save
    Skip(T),
}

/// Engine entry point for comment creation, engagement and moderation
pub struct CommentService {
    repository: Arc<dyn CommentRepository>,
    bans: Arc<dyn AccountBanService>,
    alarm: Arc<dyn AlarmPolicy>,
    validator: CommentValidator,
    escalation_threshold: usize,
    max_retries: u32,
}

impl CommentService {
    /// Service with the default configuration
    pub fn new(repository: Arc<dyn CommentRepository>, bans: Arc<dyn AccountBanService>) -> Self {
        Self::with_config(repository, bans, &Config::default())
    }

    pub fn with_config(
        repository: Arc<dyn CommentRepository>,
        bans: Arc<dyn AccountBanService>,
        config: &Config,
    ) -> Self {
        Self {
            repository,
            bans,
            alarm: Arc::new(HeuristicAlarmPolicy::new(config.alarm.clone())),
            validator: CommentValidator::from_config(&config.comments),
            escalation_threshold: config.moderation.escalation_threshold,
            max_retries: config.moderation.max_retries,
        }
    }

    /// Replace the alarm policy
    pub fn with_alarm_policy(mut self, policy: Arc<dyn AlarmPolicy>) -> Self {
        self.alarm = policy;
        self
    }

    pub fn repository(&self) -> &Arc<dyn CommentRepository> {
        &self.repository
    }

    pub fn bans(&self) -> &Arc<dyn AccountBanService> {
        &self.bans
    }

    pub fn escalation_threshold(&self) -> usize {
        self.escalation_threshold
    }

    // Creation

    /// Post a root comment on a discipline, optionally scoped to a professor
    pub fn post_root(
        &self,
        author: UserKey,
        text: impl Into<String>,
        discipline: DisciplineKey,
        professor: Option<ProfessorKey>,
    ) -> Result<Comment> {
        let text = text.into();
        self.validator.validate_content(&text)?;

        let builder = CommentBuilder::root(author, discipline, professor).text(text);
        builder.validate()?;

        let id = self.repository.next_id()?;
        let mut comment = builder.build(id)?;
        comment.update_alarm_status(self.alarm.as_ref());

        let stored = self.repository.insert(comment)?;
        info!("Posted comment {} by {}", stored.id(), stored.author());
        Ok(stored)
    }

    /// Reply to an existing comment
    pub fn reply(
        &self,
        author: UserKey,
        text: impl Into<String>,
        parent: CommentId,
    ) -> Result<Comment> {
        let text = text.into();
        self.validator.validate_content(&text)?;

        if !self.repository.exists(parent)? {
            return Err(AvaliaError::ParentNotFound(parent));
        }

        let id = self.repository.next_id()?;
        let mut comment = CommentBuilder::reply(author, parent).text(text).build(id)?;
        comment.update_alarm_status(self.alarm.as_ref());

        let stored = self.repository.insert(comment)?;
        info!("Reply {} posted under {}", stored.id(), parent);
        Ok(stored)
    }

    // Engagement

    /// Replace the text of the caller's own comment
    ///
    /// Only the author may edit, admins included. The alarm flag is
    /// re-evaluated against the new text.
    pub fn edit_own(
        &self,
        id: CommentId,
        caller: &UserKey,
        text: impl Into<String>,
    ) -> Result<Comment> {
        let text = text.into();
        self.validator.validate_content(&text)?;

        let (comment, ()) = self.mutate(Operation::Edit, id, |comment| {
            if !comment.is_authored_by(caller) {
                return Err(AvaliaError::Forbidden {
                    operation: Operation::Edit,
                    comment: id,
                    caller: caller.clone(),
                });
            }
            comment.edit(text.clone())?;
            comment.update_alarm_status(self.alarm.as_ref());
            Ok(Mutation::Write(()))
        })?;
        Ok(comment)
    }

    /// Apply a vote; repeating it cancels, the opposite direction switches
    pub fn vote(&self, user: &UserKey, id: CommentId, choice: VoteChoice) -> Result<VoteTally> {
        let (comment, outcome) = self.mutate(Operation::Vote, id, |comment| {
            Ok(Mutation::Write(comment.vote(user, choice)))
        })?;

        Ok(VoteTally {
            outcome,
            up_votes: comment.up_votes(),
            down_votes: comment.down_votes(),
            state: comment.has_voted(user),
        })
    }

    /// File a report; `false` when `user` already reported this comment
    pub fn report(&self, id: CommentId, user: &UserKey) -> Result<bool> {
        let threshold = self.escalation_threshold;
        let (comment, (added, escalated)) = self.mutate(Operation::Report, id, |comment| {
            let was_reported = comment.is_reported();
            if comment.add_report(user, threshold) {
                Ok(Mutation::Write((true, !was_reported && comment.is_reported())))
            } else {
                Ok(Mutation::Skip((false, false)))
            }
        })?;

        if escalated {
            info!(
                "Comment {} escalated after {} reports",
                id,
                comment.report_count()
            );
        }
        Ok(added)
    }

    /// Delete a comment and its replies as the author or an admin
    ///
    /// Returns `false` when the comment does not exist.
    pub fn delete(&self, id: CommentId, caller: &Actor) -> Result<bool> {
        let comment = match self.repository.load(id)? {
            Some(comment) => comment,
            None => return Ok(false),
        };

        if !comment.is_authored_by(&caller.key) && !caller.is_admin() {
            return Err(AvaliaError::Forbidden {
                operation: Operation::Delete,
                comment: id,
                caller: caller.key.clone(),
            });
        }

        self.remove_subtree(id)
    }

    // Moderation

    /// Clear the alarm flag
    pub fn mark_safe(&self, id: CommentId) -> Result<Comment> {
        let (comment, ()) = self.mutate(Operation::MarkSafe, id, |comment| {
            comment.mark_safe();
            Ok(Mutation::Write(()))
        })?;
        info!("Comment {} marked safe", id);
        Ok(comment)
    }

    /// Delete a comment and its replies without an ownership check
    pub fn delete_as_admin(&self, id: CommentId) -> Result<bool> {
        self.remove_subtree(id)
    }

    /// Ban the author of a comment through the ban service
    ///
    /// Returns `false` when the author was already banned.
    pub fn ban_author_of(
        &self,
        id: CommentId,
        admin: &UserKey,
        reason: Option<String>,
    ) -> Result<bool> {
        let comment = self.load_required(id, Operation::BanAuthor)?;
        let author = comment.author().clone();

        let request = BanRequest::new(author.clone(), admin.clone(), reason)?;
        let banned = self.bans.ban(request)?;
        if banned {
            info!("{} banned {} over comment {}", admin, author, id);
        }
        Ok(banned)
    }

    // Reads

    /// Load a comment that must exist
    pub fn get(&self, id: CommentId) -> Result<Comment> {
        self.load_required(id, Operation::Load)
    }

    pub fn find(&self, id: CommentId) -> Result<Option<Comment>> {
        self.repository.load(id)
    }

    /// Direct replies of a comment, oldest first
    pub fn children(&self, id: CommentId) -> Result<Vec<Comment>> {
        self.load_required(id, Operation::Load)?;
        self.repository.children(id)
    }

    pub fn count_descendants(&self, id: CommentId) -> Result<usize> {
        self.load_required(id, Operation::Load)?;
        self.repository.count_descendants(id)
    }

    /// Discipline and professor a comment inherits from its root
    pub fn placement_of(&self, id: CommentId) -> Result<Venue> {
        let mut current = self.load_required(id, Operation::Load)?;
        let mut seen = HashSet::from([id]);

        loop {
            let parent = match current.venue() {
                Some(venue) => return Ok(venue.clone()),
                None => match current.parent_id() {
                    Some(parent) => parent,
                    None => {
                        return Err(AvaliaError::Storage(format!(
                            "Comment {} has neither a venue nor a parent",
                            current.id()
                        )))
                    }
                },
            };

            if !seen.insert(parent) {
                return Err(AvaliaError::Storage(format!(
                    "Cycle detected above comment {}",
                    id
                )));
            }
            current = self
                .repository
                .load(parent)?
                .ok_or(AvaliaError::ParentNotFound(parent))?;
        }
    }

    /// A comment and all its replies as seen by `viewer`
    pub fn thread(&self, id: CommentId, viewer: Option<&UserKey>) -> Result<ThreadNode> {
        let root = self.load_required(id, Operation::Load)?;
        build_thread(self.repository.as_ref(), root, viewer)
    }

    /// General comments of a discipline (no professor), newest first
    pub fn discipline_feed(
        &self,
        discipline: DisciplineKey,
        viewer: Option<&UserKey>,
    ) -> Result<Vec<ThreadNode>> {
        self.feed(RootFilter::venue(discipline, None), viewer)
    }

    /// Comments on one professor of a discipline, newest first
    pub fn professor_feed(
        &self,
        discipline: DisciplineKey,
        professor: ProfessorKey,
        viewer: Option<&UserKey>,
    ) -> Result<Vec<ThreadNode>> {
        self.feed(RootFilter::venue(discipline, Some(professor)), viewer)
    }

    fn feed(&self, filter: RootFilter, viewer: Option<&UserKey>) -> Result<Vec<ThreadNode>> {
        self.repository
            .find_roots(&filter)?
            .into_iter()
            .map(|root| build_thread(self.repository.as_ref(), root, viewer))
            .collect()
    }

    // Internals

    fn load_required(&self, id: CommentId, operation: Operation) -> Result<Comment> {
        self.repository
            .load(id)?
            .ok_or(AvaliaError::CommentNotFound { id, operation })
    }

    fn remove_subtree(&self, id: CommentId) -> Result<bool> {
        let removed = self.repository.delete_subtree(id)?;
        if removed > 0 {
            info!("Deleted comment {} and {} replies", id, removed - 1);
        }
        Ok(removed > 0)
    }

    /// Load, modify and save one comment, retrying on stale versions
    fn mutate<T>(
        &self,
        operation: Operation,
        id: CommentId,
        mut apply: impl FnMut(&mut Comment) -> Result<Mutation<T>>,
    ) -> Result<(Comment, T)> {
        let attempts = self.max_retries.saturating_add(1);

        for attempt in 1..=attempts {
            let mut comment = self.load_required(id, operation)?;

            let value = match apply(&mut comment)? {
                Mutation::Skip(value) => return Ok((comment, value)),
                Mutation::Write(value) => value,
            };

            match self.repository.save(&comment) {
                Ok(saved) => return Ok((saved, value)),
                Err(err) if err.is_retryable() => {
                    warn!(
                        "Concurrent {} on comment {} (attempt {}/{})",
                        operation, id, attempt, attempts
                    );
                }
                Err(err) if err.is_not_found() => {
                    return Err(AvaliaError::CommentNotFound { id, operation });
                }
                Err(err) => return Err(err),
            }
        }

        Err(AvaliaError::Conflict {
            operation,
            comment: id,
            attempts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ban::BanRegistry;
    use crate::comment::{AlarmSnapshot, VoteOutcome, VoteState};
    use crate::repository::MemoryRepository;
    use pretty_assertions::assert_eq;

    fn user(name: &str) -> UserKey {
        UserKey::new(format!("{}@unb.br", name))
    }

    fn service() -> CommentService {
        CommentService::new(
            Arc::new(MemoryRepository::new()),
            Arc::new(BanRegistry::new()),
        )
    }

    fn post(service: &CommentService, text: &str) -> Comment {
        service
            .post_root(user("ana"), text, DisciplineKey::new("CIC0004"), None)
            .unwrap()
    }

    #[test]
    fn test_reply_inherits_placement() {
        let service = service();
        let root = service
            .post_root(
                user("ana"),
                "Prova difícil",
                DisciplineKey::new("CIC0004"),
                Some(ProfessorKey::new("p-17")),
            )
            .unwrap();
        let reply = service.reply(user("bia"), "Concordo", root.id()).unwrap();
        let nested = service.reply(user("caio"), "Eu também", reply.id()).unwrap();

        assert_eq!(reply.parent_id(), Some(root.id()));
        assert_eq!(&service.placement_of(nested.id()).unwrap(), root.venue().unwrap());
    }

    #[test]
    fn test_post_validation() {
        let service = service();
        let blank = service.post_root(user("ana"), "  ", DisciplineKey::new("CIC0004"), None);
        assert!(matches!(blank, Err(AvaliaError::Validation(_))));

        let long = service.post_root(
            user("ana"),
            "a".repeat(2001),
            DisciplineKey::new("CIC0004"),
            None,
        );
        assert!(matches!(long, Err(AvaliaError::Validation(_))));

        let padded = service.post_root(
            user("ana"),
            format!("{}   ", "a".repeat(1999)),
            DisciplineKey::new("CIC0004"),
            None,
        );
        assert!(matches!(padded, Err(AvaliaError::Validation(_))));

        let comment = post(&service, "curto");
        let edited =
            service.edit_own(comment.id(), &user("ana"), format!("  {}", "a".repeat(1999)));
        assert!(matches!(edited, Err(AvaliaError::Validation(_))));
    }

    #[test]
    fn test_reply_to_missing_parent() {
        let service = service();
        let result = service.reply(user("bia"), "oi", CommentId(42));
        assert!(matches!(result, Err(AvaliaError::ParentNotFound(CommentId(42)))));
    }

    #[test]
    fn test_double_vote_cancels() {
        let service = service();
        let comment = post(&service, "Boa aula");

        service.vote(&user("bia"), comment.id(), VoteChoice::Up).unwrap();
        let tally = service.vote(&user("bia"), comment.id(), VoteChoice::Up).unwrap();

        assert_eq!(tally.outcome, VoteOutcome::Cancelled { choice: VoteChoice::Up });
        assert_eq!((tally.up_votes, tally.down_votes), (0, 0));
        assert_eq!(tally.state, VoteState::None);
    }

    #[test]
    fn test_vote_switch() {
        let service = service();
        let comment = post(&service, "Boa aula");

        service.vote(&user("bia"), comment.id(), VoteChoice::Up).unwrap();
        let tally = service.vote(&user("bia"), comment.id(), VoteChoice::Down).unwrap();

        assert_eq!(
            tally.outcome,
            VoteOutcome::Switched {
                from: VoteChoice::Up,
                to: VoteChoice::Down
            }
        );
        assert_eq!((tally.up_votes, tally.down_votes), (0, 1));
        assert_eq!(tally.state, VoteState::Down);
    }

    #[test]
    fn test_vote_missing_comment() {
        let service = service();
        let err = service
            .vote(&user("bia"), CommentId(9), VoteChoice::Up)
            .unwrap_err();
        assert!(matches!(
            err,
            AvaliaError::CommentNotFound {
                operation: Operation::Vote,
                ..
            }
        ));
    }

    #[test]
    fn test_duplicate_report_counts_once() {
        let service = service();
        let comment = post(&service, "Texto");

        assert!(service.report(comment.id(), &user("bia")).unwrap());
        assert!(!service.report(comment.id(), &user("bia")).unwrap());
        assert_eq!(service.get(comment.id()).unwrap().report_count(), 1);
    }

    #[test]
    fn test_report_escalation() {
        let service = service();
        let comment = post(&service, "Texto");

        for name in ["bia", "caio", "davi"] {
            assert!(service.report(comment.id(), &user(name)).unwrap());
        }
        assert!(!service.report(comment.id(), &user("bia")).unwrap());

        let stored = service.get(comment.id()).unwrap();
        assert!(stored.is_reported());
        assert_eq!(stored.report_count(), 3);
    }

    #[test]
    fn test_count_descendants() {
        let service = service();
        let root = post(&service, "raiz");
        let a = service.reply(user("bia"), "a", root.id()).unwrap();
        service.reply(user("caio"), "b", root.id()).unwrap();
        service.reply(user("davi"), "a1", a.id()).unwrap();

        assert_eq!(service.count_descendants(root.id()).unwrap(), 3);
    }

    #[test]
    fn test_delete_cascade() {
        let service = service();
        let root = post(&service, "raiz");
        let a = service.reply(user("bia"), "a", root.id()).unwrap();
        let a1 = service.reply(user("davi"), "a1", a.id()).unwrap();

        assert!(service.delete(root.id(), &Actor::user("ana@unb.br")).unwrap());
        assert!(service.find(a.id()).unwrap().is_none());
        assert!(service.find(a1.id()).unwrap().is_none());
        assert_eq!(service.repository().count_roots(&RootFilter::All).unwrap(), 0);
    }

    #[test]
    fn test_delete_requires_owner_or_admin() {
        let service = service();
        let comment = post(&service, "meu");

        let err = service
            .delete(comment.id(), &Actor::user("bia@unb.br"))
            .unwrap_err();
        assert!(matches!(err, AvaliaError::Forbidden { .. }));
        assert!(service.find(comment.id()).unwrap().is_some());

        assert!(service.delete(comment.id(), &Actor::admin("root@unb.br")).unwrap());
    }

    #[test]
    fn test_delete_missing_is_noop() {
        let service = service();
        assert!(!service.delete(CommentId(3), &Actor::user("ana@unb.br")).unwrap());
        assert!(!service.delete_as_admin(CommentId(3)).unwrap());
    }

    #[test]
    fn test_edit_own_only() {
        let service = service();
        let comment = post(&service, "original");

        let err = service
            .edit_own(comment.id(), &user("bia"), "invadido")
            .unwrap_err();
        assert!(matches!(err, AvaliaError::Forbidden { .. }));

        let edited = service.edit_own(comment.id(), &user("ana"), "revisado").unwrap();
        assert_eq!(edited.text(), "revisado");
        assert!(edited.is_edited());
    }

    #[test]
    fn test_alarm_mark_safe_scenario() {
        let service = service();
        let comment = post(&service, "ok");
        assert!(!comment.is_alarming());

        let edited = service
            .edit_own(comment.id(), &user("ana"), "Professor idiota")
            .unwrap();
        assert!(edited.is_alarming());

        assert!(!service.mark_safe(comment.id()).unwrap().is_alarming());
        service.vote(&user("bia"), comment.id(), VoteChoice::Down).unwrap();
        assert!(!service.get(comment.id()).unwrap().is_alarming());
    }

    #[test]
    fn test_alarm_on_reply() {
        let service = service();
        let root = post(&service, "ok");
        let reply = service.reply(user("bia"), "Que lixo de aula", root.id()).unwrap();

        assert!(reply.is_alarming());
        assert!(!service.get(root.id()).unwrap().is_alarming());
    }

    #[test]
    fn test_custom_alarm_policy() {
        let policy = |snapshot: &AlarmSnapshot<'_>| snapshot.text.contains("prova");
        let service = service().with_alarm_policy(Arc::new(policy));

        assert!(post(&service, "vendo prova antiga").is_alarming());
        assert!(!post(&service, "idiota").is_alarming());
    }

    #[test]
    fn test_ban_author_of() {
        let service = service();
        let comment = post(&service, "spam");
        let admin = user("admin");

        assert!(service
            .ban_author_of(comment.id(), &admin, Some("spam".to_string()))
            .unwrap());
        assert!(!service.ban_author_of(comment.id(), &admin, None).unwrap());
        assert!(service.bans().is_banned(&user("ana")).unwrap());

        let missing = service.ban_author_of(CommentId(77), &admin, None);
        assert!(missing.unwrap_err().is_not_found());
    }

    #[test]
    fn test_thread_view() {
        let service = service();
        let root = post(&service, "raiz");
        let a = service.reply(user("bia"), "a", root.id()).unwrap();
        let b = service.reply(user("caio"), "b", root.id()).unwrap();
        let a1 = service.reply(user("ana"), "a1", a.id()).unwrap();
        service.vote(&user("bia"), root.id(), VoteChoice::Down).unwrap();

        let thread = service.thread(root.id(), Some(&user("bia"))).unwrap();
        assert_eq!(thread.reply_count, 3);
        assert_eq!(thread.viewer_vote_value(), -1);
        assert!(!thread.is_owner);
        assert!(!thread.deleted);
        assert_eq!(thread.author_initials, "AN");

        let ids: Vec<CommentId> = thread.replies.iter().map(ThreadNode::id).collect();
        assert_eq!(ids, vec![a.id(), b.id()]);
        assert!(thread.replies[0].is_owner);
        assert_eq!(thread.replies[0].replies[0].id(), a1.id());

        let walked: Vec<(usize, CommentId)> =
            thread.walk().into_iter().map(|(d, n)| (d, n.id())).collect();
        assert_eq!(
            walked,
            vec![(0, root.id()), (1, a.id()), (2, a1.id()), (1, b.id())]
        );
    }

    #[test]
    fn test_feeds() {
        let service = service();
        let general = post(&service, "geral");
        let scoped = service
            .post_root(
                user("bia"),
                "sobre o professor",
                DisciplineKey::new("CIC0004"),
                Some(ProfessorKey::new("p-17")),
            )
            .unwrap();
        service
            .post_root(user("caio"), "outra", DisciplineKey::new("MAT0025"), None)
            .unwrap();

        let discipline = service
            .discipline_feed(DisciplineKey::new("CIC0004"), None)
            .unwrap();
        assert_eq!(discipline.len(), 1);
        assert_eq!(discipline[0].id(), general.id());

        let professor = service
            .professor_feed(
                DisciplineKey::new("CIC0004"),
                ProfessorKey::new("p-17"),
                None,
            )
            .unwrap();
        assert_eq!(professor.len(), 1);
        assert_eq!(professor[0].id(), scoped.id());
    }

    #[test]
    fn test_concurrent_votes_and_reports_lose_nothing() {
        let mut config = Config::default();
        config.moderation.max_retries = 64;
        let service = CommentService::with_config(
            Arc::new(MemoryRepository::new()),
            Arc::new(BanRegistry::new()),
            &config,
        );
        let id = post(&service, "popular").id();

        std::thread::scope(|scope| {
            for n in 0..16 {
                let service = &service;
                scope.spawn(move || {
                    let voter = user(&format!("aluno{}", n));
                    let choice = VoteChoice::from_upvote(n % 4 != 0);
                    service.vote(&voter, id, choice).unwrap();
                    service.report(id, &voter).unwrap();
                });
            }
        });

        let stored = service.get(id).unwrap();
        assert_eq!(stored.up_votes(), 12);
        assert_eq!(stored.down_votes(), 4);
        assert_eq!(stored.report_count(), 16);
        assert!(stored.is_reported());
        assert!(stored.check_invariants().is_ok());
    }

    /// Repository whose saves always lose the race
    struct AlwaysStale(MemoryRepository);

    impl CommentRepository for AlwaysStale {
        fn next_id(&self) -> Result<CommentId> {
            self.0.next_id()
        }
        fn insert(&self, comment: Comment) -> Result<Comment> {
            self.0.insert(comment)
        }
        fn load(&self, id: CommentId) -> Result<Option<Comment>> {
            self.0.load(id)
        }
        fn save(&self, comment: &Comment) -> Result<Comment> {
            Err(AvaliaError::StaleVersion {
                id: comment.id(),
                expected: comment.version(),
                found: comment.version() + 1,
            })
        }
        fn delete_subtree(&self, id: CommentId) -> Result<usize> {
            self.0.delete_subtree(id)
        }
        fn children(&self, id: CommentId) -> Result<Vec<Comment>> {
            self.0.children(id)
        }
        fn count_descendants(&self, id: CommentId) -> Result<usize> {
            self.0.count_descendants(id)
        }
        fn find_roots(&self, filter: &RootFilter) -> Result<Vec<Comment>> {
            self.0.find_roots(filter)
        }
    }

    #[test]
    fn test_conflict_after_retries() {
        let service = CommentService::new(
            Arc::new(AlwaysStale(MemoryRepository::new())),
            Arc::new(BanRegistry::new()),
        );
        let comment = post(&service, "disputado");

        let err = service
            .vote(&user("bia"), comment.id(), VoteChoice::Up)
            .unwrap_err();
        assert!(matches!(
            err,
            AvaliaError::Conflict {
                operation: Operation::Vote,
                attempts: 4,
                ..
            }
        ));
    }

    #[test]
    fn test_duplicate_report_skips_save() {
        let repository = AlwaysStale(MemoryRepository::new());
        let mut comment = CommentBuilder::root(user("ana"), DisciplineKey::new("CIC0004"), None)
            .text("texto")
            .build(repository.next_id().unwrap())
            .unwrap();
        comment.add_report(&user("bia"), 3);
        let id = repository.insert(comment).unwrap().id();

        let service = CommentService::new(Arc::new(repository), Arc::new(BanRegistry::new()));
        assert!(!service.report(id, &user("bia")).unwrap());
        assert!(service.report(id, &user("caio")).is_err());
    }
}
