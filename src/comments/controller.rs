use super::mutation::{self, MutationState, Snapshot};
use super::thread::{CommentThread, Scope};
use super::tree;
use crate::api::Api;
use crate::config::CommentSettings;
use crate::error::ApiError;
use crate::models::{Comment, CommentId, NewComment, UserProfile};
use std::rc::Rc;
use std::time::Duration;

/// Why a submit never got as far as the network.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitRefused {
    #[error("comment is empty")]
    Empty,
    #[error("login required")]
    LoginRequired,
    #[error("the comment being replied to is gone")]
    UnknownParent,
}

/// A submit whose provisional node is on screen and whose request has
/// not been answered yet.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingSubmit {
    pub snapshot: Snapshot,
    pub body: NewComment,
    pub state: MutationState,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Reload the whole tree once `reload_after` has passed.
    Confirmed { reload_after: Duration },
    /// Provisional node removed; `notice` should go away after `dismiss_after`.
    RolledBack { notice: u64, dismiss_after: Duration },
    /// Rolled back because the session is gone.
    LoginRequired,
}

impl SubmitOutcome {
    /// Where the submit's state machine ended up.
    pub fn state(&self) -> MutationState {
        MutationState::Applied.settle(matches!(self, SubmitOutcome::Confirmed { .. }))
    }
}

/// What a delete request came back with.
#[derive(Debug, Clone)]
pub enum DeleteResponse {
    /// The backend refused or never answered; nothing was deleted.
    Refused(ApiError),
    /// The comment is gone; this is the tree fetched afterwards.
    Deleted(Result<Vec<Comment>, ApiError>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum DeleteOutcome {
    /// Nothing was sent.
    Cancelled,
    Reloaded,
    /// Deleted on the backend, but the tree could not be fetched again.
    /// The message belongs with other load failures.
    ReloadFailed { message: String },
    /// The tree is unchanged. A notice is only raised when configured to.
    Failed { notice: Option<(u64, Duration)> },
    LoginRequired,
}

/// Submit, delete and reload for one article's comments, on behalf of the
/// current viewer.
pub struct CommentController<A> {
    api: Rc<A>,
    viewer: Option<UserProfile>,
    settings: CommentSettings,
}

impl<A> Clone for CommentController<A> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            viewer: self.viewer.clone(),
            settings: self.settings.clone(),
        }
    }
}

impl<A: Api> CommentController<A> {
    pub fn new(api: Rc<A>, viewer: Option<UserProfile>, settings: CommentSettings) -> Self {
        Self {
            api,
            viewer,
            settings,
        }
    }

    #[inline]
    pub fn viewer(&self) -> Option<&UserProfile> {
        self.viewer.as_ref()
    }

    #[inline]
    pub fn settings(&self) -> &CommentSettings {
        &self.settings
    }

    /// Fetches the tree and replaces whatever the thread showed.
    pub async fn reload(&self, thread: &mut CommentThread) -> Result<(), ApiError> {
        let roots = self.fetch(thread.article().clone()).await?;
        thread.replace(roots);
        Ok(())
    }

    pub async fn fetch(&self, article: crate::models::ArticleId) -> Result<Vec<Comment>, ApiError> {
        self.api.comments(&article).await.map_err(|err| {
            tracing::error!("failed to load comments of article {article}: {err}");
            err
        })
    }

    /// Shows the provisional node right away. Nothing is sent yet.
    pub fn begin_submit(
        &self,
        thread: &mut CommentThread,
        parent: Option<&CommentId>,
        content: &str,
        now: chrono::NaiveDateTime,
    ) -> Result<PendingSubmit, SubmitRefused> {
        let author = self.viewer.as_ref().ok_or(SubmitRefused::LoginRequired)?;
        let content = content.trim();
        if content.is_empty() {
            return Err(SubmitRefused::Empty);
        }

        let mut millis = now.and_utc().timestamp_millis();
        let id = loop {
            let id = match parent {
                None => CommentId::provisional(millis),
                Some(_) => CommentId::provisional_reply(millis),
            };
            if !tree::contains(thread.roots(), &id) {
                break id;
            }
            millis += 1;
        };

        let node = Comment::provisional(
            id,
            thread.article().clone(),
            parent.cloned(),
            author,
            content.to_string(),
            now,
        );
        let snapshot =
            mutation::apply(thread, parent, node).map_err(|_| SubmitRefused::UnknownParent)?;
        if parent.is_some() {
            thread.close_reply();
        }

        Ok(PendingSubmit {
            body: NewComment {
                article_id: thread.article().clone(),
                content: content.to_string(),
                parent_id: parent.cloned(),
            },
            snapshot,
            state: MutationState::Idle.apply(),
        })
    }

    pub async fn send(&self, pending: &PendingSubmit) -> Result<(), ApiError> {
        self.api.create_comment(&pending.body).await
    }

    /// Settles a submit against the answer of its request.
    pub fn finish_submit(
        &self,
        thread: &mut CommentThread,
        pending: PendingSubmit,
        result: Result<(), ApiError>,
    ) -> SubmitOutcome {
        let err = match result {
            Ok(()) => {
                tracing::info!(
                    "comment {} confirmed, reloading in {:?}",
                    pending.snapshot.provisional_id,
                    self.settings.reload_delay
                );
                return SubmitOutcome::Confirmed {
                    reload_after: self.settings.reload_delay,
                };
            }
            Err(err) => err,
        };

        tracing::error!("error posting comment: {err}");
        *thread = mutation::rollback(thread, &pending.snapshot);
        if err.is_not_authenticated() {
            return SubmitOutcome::LoginRequired;
        }

        let what = if pending.snapshot.parent_id.is_some() {
            "reply"
        } else {
            "comment"
        };
        let notice = thread.push_notice(
            Scope::of(pending.snapshot.parent_id.as_ref()),
            format!("Failed to post {what}: {}", err.user_message()),
        );
        SubmitOutcome::RolledBack {
            notice,
            dismiss_after: self.settings.notice_ttl,
        }
    }

    /// The whole submit on a thread that stays borrowed across the request.
    pub async fn submit(
        &self,
        thread: &mut CommentThread,
        parent: Option<&CommentId>,
        content: &str,
        now: chrono::NaiveDateTime,
    ) -> Result<SubmitOutcome, SubmitRefused> {
        let pending = self.begin_submit(thread, parent, content, now)?;
        let result = self.send(&pending).await;
        Ok(self.finish_submit(thread, pending, result))
    }

    /// Checks that a delete may proceed. `confirm` is only asked when it can.
    pub fn check_delete(&self, id: &CommentId, confirm: impl FnOnce() -> bool) -> Option<DeleteOutcome> {
        if self.viewer.is_none() {
            return Some(DeleteOutcome::LoginRequired);
        }
        if id.is_provisional() || !confirm() {
            return Some(DeleteOutcome::Cancelled);
        }
        None
    }

    /// Deletes, then fetches the tree again when the delete went through.
    pub async fn request_delete(
        &self,
        article: crate::models::ArticleId,
        id: &CommentId,
    ) -> DeleteResponse {
        match self.api.delete_comment(id).await {
            Ok(()) => DeleteResponse::Deleted(self.fetch(article).await),
            Err(err) => DeleteResponse::Refused(err),
        }
    }

    pub fn finish_delete(
        &self,
        thread: &mut CommentThread,
        id: &CommentId,
        response: DeleteResponse,
    ) -> DeleteOutcome {
        let err = match response {
            DeleteResponse::Deleted(Ok(roots)) => {
                thread.replace(roots);
                return DeleteOutcome::Reloaded;
            }
            DeleteResponse::Deleted(Err(err)) => {
                tracing::warn!("comment {id} deleted, but reloading failed: {err}");
                if err.is_not_authenticated() {
                    return DeleteOutcome::LoginRequired;
                }
                return DeleteOutcome::ReloadFailed {
                    message: err.user_message(),
                };
            }
            DeleteResponse::Refused(err) => err,
        };

        tracing::error!("error deleting comment {id}: {err}");
        if err.is_not_authenticated() {
            return DeleteOutcome::LoginRequired;
        }
        if !self.settings.surface_delete_errors {
            return DeleteOutcome::Failed { notice: None };
        }

        let scope = Scope::of(tree::parent_of(thread.roots(), id));
        let notice = thread.push_notice(
            scope,
            format!("Failed to delete comment: {}", err.user_message()),
        );
        DeleteOutcome::Failed {
            notice: Some((notice, self.settings.notice_ttl)),
        }
    }

    pub async fn delete(
        &self,
        thread: &mut CommentThread,
        id: &CommentId,
        confirm: impl FnOnce() -> bool,
    ) -> DeleteOutcome {
        if let Some(outcome) = self.check_delete(id, confirm) {
            return outcome;
        }
        let response = self.request_delete(thread.article().clone(), id).await;
        self.finish_delete(thread, id, response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::{Call, MockApi};
    use crate::comments::tree::tests::{node, sample};
    use crate::models::{ArticleId, UserId};

    fn viewer() -> UserProfile {
        UserProfile {
            id: UserId::new("10"),
            username: "ferris".into(),
            ..Default::default()
        }
    }

    fn now() -> chrono::NaiveDateTime {
        chrono::NaiveDate::from_ymd_opt(2024, 5, 1)
            .and_then(|d| d.and_hms_opt(12, 0, 0))
            .unwrap()
    }

    async fn setup(viewer: Option<UserProfile>) -> (Rc<MockApi>, CommentController<MockApi>, CommentThread) {
        let api = Rc::new(MockApi::new());
        api.push_comments(Ok(sample()));
        let controller = CommentController::new(api.clone(), viewer, CommentSettings::default());
        let mut thread = CommentThread::new(ArticleId::new("7"));
        controller.reload(&mut thread).await.unwrap();
        (api, controller, thread)
    }

    fn creates(api: &MockApi) -> usize {
        api.count(|x| matches!(x, Call::CreateComment(_)))
    }

    #[tokio::test]
    async fn blank_content_creates_nothing() {
        let (api, controller, mut thread) = setup(Some(viewer())).await;
        let refused = controller.submit(&mut thread, None, "  \n\t ", now()).await;

        assert_eq!(refused, Err(SubmitRefused::Empty));
        assert_eq!(thread.count(), 4);
        assert!(!thread.has_pending());
        assert_eq!(creates(&api), 0);
    }

    #[tokio::test]
    async fn anonymous_submit_asks_for_login() {
        let (api, controller, mut thread) = setup(None).await;
        let refused = controller.submit(&mut thread, None, "hello", now()).await;
        assert_eq!(refused, Err(SubmitRefused::LoginRequired));
        assert_eq!(creates(&api), 0);
    }

    #[tokio::test]
    async fn provisional_node_shows_before_the_request() {
        let (api, controller, mut thread) = setup(Some(viewer())).await;
        let pending = controller
            .begin_submit(&mut thread, None, " first! ", now())
            .unwrap();

        assert_eq!(creates(&api), 0);
        assert_eq!(pending.state, MutationState::Applied);
        assert_eq!(thread.count(), 5);
        let first = &thread.roots()[0];
        assert!(first.id.is_provisional());
        assert_eq!(first.content, "first!");
        assert!(thread.is_pending(&first.id));

        let result = controller.send(&pending).await;
        let outcome = controller.finish_submit(&mut thread, pending, result);
        assert_eq!(
            outcome,
            SubmitOutcome::Confirmed {
                reload_after: Duration::from_secs(1)
            }
        );
        assert_eq!(outcome.state(), MutationState::Confirmed);

        api.push_comments(Ok(vec![node("100", "10", vec![])]));
        controller.reload(&mut thread).await.unwrap();
        assert_eq!(thread.count(), 1);
        assert!(!thread.has_pending());
    }

    #[tokio::test]
    async fn failed_submit_rolls_back_and_raises_a_notice() {
        let (api, controller, mut thread) = setup(Some(viewer())).await;
        api.push_create(Err(ApiError::Application {
            code: 500,
            msg: "slow down".into(),
        }));

        let parent = CommentId::new("2");
        let outcome = controller
            .submit(&mut thread, Some(&parent), "me too", now())
            .await
            .unwrap();

        let SubmitOutcome::RolledBack {
            notice,
            dismiss_after,
        } = outcome
        else {
            panic!("expected a rollback, got {outcome:?}");
        };
        assert_eq!(outcome.state(), MutationState::RolledBack);
        assert_eq!(dismiss_after, Duration::from_secs(5));
        assert_eq!(thread.count(), 4);
        assert!(!thread.has_pending());
        assert_eq!(tree::find(thread.roots(), &parent).unwrap().replies.len(), 1);

        let scope = Scope::Replies(parent);
        let shown: Vec<_> = thread.notices_for(&scope).collect();
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].id, notice);
        assert_eq!(shown[0].text, "Failed to post reply: slow down");
    }

    #[tokio::test]
    async fn transport_failure_restores_count() {
        let (api, controller, mut thread) = setup(Some(viewer())).await;
        api.push_create(Err(ApiError::Transport("offline".into())));
        controller.submit(&mut thread, None, "hi", now()).await.unwrap();
        assert_eq!(thread.count(), 4);
        assert_eq!(thread.notices()[0].text, "Failed to post comment: offline");
    }

    #[tokio::test]
    async fn expired_session_rolls_back_to_login() {
        let (api, controller, mut thread) = setup(Some(viewer())).await;
        api.push_create(Err(ApiError::NotAuthenticated));
        let outcome = controller.submit(&mut thread, None, "hi", now()).await;
        assert_eq!(outcome, Ok(SubmitOutcome::LoginRequired));
        assert_eq!(thread.count(), 4);
        assert!(thread.notices().is_empty());
    }

    #[tokio::test]
    async fn reply_to_long_id_sends_exact_parent() {
        let api = Rc::new(MockApi::new());
        let raw = r#"[{"id": 12345678901234567, "userId": 5, "content": "root"}]"#;
        api.push_comments(Ok(serde_json::from_str(raw).unwrap()));
        let controller = CommentController::new(api.clone(), Some(viewer()), CommentSettings::default());
        let mut thread = CommentThread::new(ArticleId::new("7"));
        controller.reload(&mut thread).await.unwrap();

        let parent = thread.roots()[0].id.clone();
        controller
            .submit(&mut thread, Some(&parent), "precise", now())
            .await
            .unwrap();

        let sent = api
            .calls()
            .into_iter()
            .find_map(|x| match x {
                Call::CreateComment(body) => Some(body),
                _ => None,
            })
            .unwrap();
        assert_eq!(
            serde_json::to_value(&sent).unwrap()["parentId"],
            "12345678901234567"
        );
    }

    #[tokio::test]
    async fn delete_needs_confirmation() {
        let (api, controller, mut thread) = setup(Some(viewer())).await;
        let outcome = controller
            .delete(&mut thread, &CommentId::new("1"), || false)
            .await;
        assert_eq!(outcome, DeleteOutcome::Cancelled);
        assert_eq!(api.count(|x| matches!(x, Call::DeleteComment(_))), 0);
        assert_eq!(thread.count(), 4);
    }

    #[tokio::test]
    async fn confirmed_delete_reloads_without_the_subtree() {
        let (api, controller, mut thread) = setup(Some(viewer())).await;
        api.push_comments(Ok(vec![node("4", "12", vec![])]));

        let outcome = controller
            .delete(&mut thread, &CommentId::new("1"), || true)
            .await;
        assert_eq!(outcome, DeleteOutcome::Reloaded);
        assert_eq!(
            api.count(|x| x == &Call::DeleteComment(CommentId::new("1"))),
            1
        );
        for gone in ["1", "2", "3"] {
            assert!(!tree::contains(thread.roots(), &CommentId::new(gone)));
        }
        assert_eq!(thread.count(), 1);
    }

    #[tokio::test]
    async fn failed_reload_after_delete_is_a_load_failure() {
        let (api, controller, mut thread) = setup(Some(viewer())).await;
        api.push_delete(Ok(()));
        api.push_comments(Err(ApiError::Transport("offline".into())));

        let outcome = controller
            .delete(&mut thread, &CommentId::new("3"), || true)
            .await;
        assert_eq!(
            outcome,
            DeleteOutcome::ReloadFailed {
                message: "offline".into()
            }
        );
        assert_eq!(api.count(|x| matches!(x, Call::DeleteComment(_))), 1);
        assert!(thread.notices().is_empty());
    }

    #[tokio::test]
    async fn failed_delete_is_quiet_by_default() {
        let (api, controller, mut thread) = setup(Some(viewer())).await;
        api.push_delete(Err(ApiError::Transport("offline".into())));

        let outcome = controller
            .delete(&mut thread, &CommentId::new("3"), || true)
            .await;
        assert_eq!(outcome, DeleteOutcome::Failed { notice: None });
        assert_eq!(thread.count(), 4);
        assert!(thread.notices().is_empty());
    }

    #[tokio::test]
    async fn failed_delete_can_be_surfaced() {
        let api = Rc::new(MockApi::new());
        api.push_comments(Ok(sample()));
        api.push_delete(Err(ApiError::Transport("offline".into())));
        let settings = CommentSettings {
            surface_delete_errors: true,
            ..Default::default()
        };
        let controller = CommentController::new(api.clone(), Some(viewer()), settings);
        let mut thread = CommentThread::new(ArticleId::new("7"));
        controller.reload(&mut thread).await.unwrap();

        let outcome = controller
            .delete(&mut thread, &CommentId::new("3"), || true)
            .await;
        let DeleteOutcome::Failed {
            notice: Some((id, ttl)),
        } = outcome
        else {
            panic!("expected a surfaced failure, got {outcome:?}");
        };
        assert_eq!(ttl, Duration::from_secs(5));
        let scope = Scope::Replies(CommentId::new("2"));
        assert_eq!(thread.notices_for(&scope).next().map(|x| x.id), Some(id));
    }
}
