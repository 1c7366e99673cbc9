use crate::api::{use_api, HttpApi};
use crate::auth::{redirect_to_login, use_session, Session};
use crate::comments::{
    plan_thread, CommentController, CommentThread, CommentView, DeleteOutcome, Notice, Scope,
    SubmitOutcome, SubmitRefused, PENDING_LABEL,
};
use crate::config::Config;
use crate::models::{ArticleId, CommentId};
use leptos::*;
use std::rc::Rc;

const DELETE_PROMPT: &str = "Are you sure you want to delete this comment?";

fn confirm_delete() -> bool {
    #[cfg(feature = "hydrate")]
    {
        window().confirm_with_message(DELETE_PROMPT).unwrap_or(false)
    }
    #[cfg(not(feature = "hydrate"))]
    {
        tracing::debug!("no browser to ask: {DELETE_PROMPT}");
        false
    }
}

/// Everything a node needs to act on the thread. All fields are handles,
/// so the whole thing is `Copy` and moves freely into event handlers.
#[derive(Clone, Copy)]
struct ThreadHandle {
    thread: RwSignal<CommentThread>,
    load_error: RwSignal<Option<String>>,
    reply_draft: RwSignal<String>,
    session: Session,
    api: StoredValue<Rc<HttpApi>>,
}

impl ThreadHandle {
    fn controller(self) -> CommentController<HttpApi> {
        CommentController::new(
            self.api.get_value(),
            self.session.viewer.get_untracked(),
            Config::global().comments.clone(),
        )
    }

    fn reload(self) {
        let controller = self.controller();
        let article = self.thread.with_untracked(|x| x.article().clone());
        spawn_local(async move {
            match controller.fetch(article).await {
                Ok(roots) => {
                    self.load_error.set(None);
                    self.thread.update(|x| x.replace(roots));
                }
                Err(err) => self.load_error.set(Some(err.user_message())),
            }
        });
    }

    fn dismiss_later(self, notice: u64, after: std::time::Duration) {
        set_timeout(move || self.thread.update(|x| x.dismiss_notice(notice)), after);
    }

    /// Starts a submit. Returns whether the text was taken, so the form
    /// can clear itself.
    fn submit(self, parent: Option<CommentId>, content: String) -> bool {
        let controller = self.controller();
        let now = chrono::Local::now().naive_local();
        let begun = self
            .thread
            .try_update(|x| controller.begin_submit(x, parent.as_ref(), &content, now));

        let pending = match begun {
            Some(Ok(pending)) => pending,
            Some(Err(SubmitRefused::LoginRequired)) => {
                redirect_to_login();
                return false;
            }
            Some(Err(refused)) => {
                tracing::debug!("comment not sent: {refused}");
                return false;
            }
            None => return false,
        };

        spawn_local(async move {
            let result = controller.send(&pending).await;
            let outcome = self
                .thread
                .try_update(|x| controller.finish_submit(x, pending, result));
            match outcome {
                Some(SubmitOutcome::Confirmed { reload_after }) => {
                    set_timeout(move || self.reload(), reload_after)
                }
                Some(SubmitOutcome::RolledBack {
                    notice,
                    dismiss_after,
                }) => self.dismiss_later(notice, dismiss_after),
                Some(SubmitOutcome::LoginRequired) => redirect_to_login(),
                None => {}
            }
        });
        true
    }

    fn delete(self, id: CommentId) {
        let controller = self.controller();
        if let Some(outcome) = controller.check_delete(&id, confirm_delete) {
            self.after_delete(outcome);
            return;
        }
        let article = self.thread.with_untracked(|x| x.article().clone());
        spawn_local(async move {
            let response = controller.request_delete(article, &id).await;
            if let Some(outcome) = self
                .thread
                .try_update(|x| controller.finish_delete(x, &id, response))
            {
                self.after_delete(outcome);
            }
        });
    }

    fn after_delete(self, outcome: DeleteOutcome) {
        match outcome {
            DeleteOutcome::LoginRequired => redirect_to_login(),
            DeleteOutcome::ReloadFailed { message } => self.load_error.set(Some(message)),
            DeleteOutcome::Failed {
                notice: Some((notice, ttl)),
            } => self.dismiss_later(notice, ttl),
            DeleteOutcome::Cancelled | DeleteOutcome::Reloaded | DeleteOutcome::Failed { .. } => {}
        }
    }
}

fn render_notices(notices: Vec<Notice>) -> View {
    notices
        .into_iter()
        .map(|notice| view! { <div class="alert alert-danger comment-notice">{notice.text}</div> })
        .collect_view()
}

/// Reply form under one node. Stays mounted only while that node is the
/// reply target.
fn render_reply_form(handle: ThreadHandle, parent: CommentId) -> View {
    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        let content = handle.reply_draft.get_untracked();
        if handle.submit(Some(parent.clone()), content) {
            handle.reply_draft.set(String::new());
        }
    };

    view! {
        <form class="card comment-form reply-form" on:submit=on_submit>
            <div class="card-block">
                <textarea
                    class="form-control"
                    placeholder="Write a reply..."
                    rows="2"
                    prop:value=move || handle.reply_draft.get()
                    on:input=move |ev| handle.reply_draft.set(event_target_value(&ev))
                ></textarea>
            </div>
            <div class="card-footer">
                <button class="btn btn-sm btn-primary" type="submit">"Post Reply"</button>
                " "
                <button
                    class="btn btn-sm btn-outline-secondary"
                    type="button"
                    on:click=move |_| handle.thread.update(CommentThread::close_reply)
                >
                    "Cancel"
                </button>
            </div>
        </form>
    }
    .into_view()
}

fn render_node(handle: ThreadHandle, node: CommentView) -> View {
    let CommentView {
        id,
        author,
        avatar,
        date,
        content,
        pending,
        show_reply,
        show_delete,
        children,
    } = node;

    let (replying, notices) = handle.thread.with_untracked(|x| {
        let scope = Scope::Replies(id.clone());
        (
            x.reply_target() == Some(&id),
            x.notices_for(&scope).cloned().collect::<Vec<_>>(),
        )
    });

    let reply_id = id.clone();
    let open_reply = move |_| {
        handle.reply_draft.set(String::new());
        handle.thread.update(|x| x.open_reply(reply_id.clone()));
    };
    let delete_id = id.clone();
    let on_delete = move |_| handle.delete(delete_id.clone());

    view! {
        <div class="card comment" class:comment-pending=pending>
            <div class="card-block">
                <p class="card-text">{content}</p>
            </div>
            <div class="card-footer">
                <img src=avatar class="comment-author-img" alt="" />
                " "
                <span class="comment-author">{author}</span>
                <span class="date-posted">{date}</span>
                {pending.then(|| view! { <span class="tag-default tag-pill">{PENDING_LABEL}</span> })}
                <span class="mod-options">
                    {show_reply.then(|| view! {
                        <button class="btn btn-sm btn-link" on:click=open_reply>
                            <i class="ion-reply"></i>" Reply"
                        </button>
                    })}
                    {show_delete.then(|| view! {
                        <button class="btn btn-sm btn-link text-danger" on:click=on_delete>
                            <i class="ion-trash-a"></i>" Delete"
                        </button>
                    })}
                </span>
            </div>
        </div>
        {replying.then(|| render_reply_form(handle, id.clone()))}
        {render_notices(notices)}
        <div class="comment-replies" style="margin-left: 2rem;">
            {children
                .into_iter()
                .map(|child| render_node(handle, child))
                .collect_view()}
        </div>
    }
    .into_view()
}

/// The comment area of an article: root form, then the whole tree.
#[component]
pub fn CommentSection(article: ArticleId) -> impl IntoView {
    let session = use_session();
    let handle = ThreadHandle {
        thread: create_rw_signal(CommentThread::new(article)),
        load_error: create_rw_signal(None),
        reply_draft: create_rw_signal(String::new()),
        session,
        api: store_value(use_api()),
    };
    let root_draft = create_rw_signal(String::new());

    // Runs once in the browser; the server renders the empty shell.
    create_effect(move |_| handle.reload());

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        if handle.submit(None, root_draft.get_untracked()) {
            root_draft.set(String::new());
        }
    };

    let placeholder = Config::global().placeholder_avatar.clone();
    let tree = move || {
        let viewer = session.user_id();
        let views = handle
            .thread
            .with(|x| plan_thread(x, viewer.as_ref(), &placeholder));
        let empty = handle.thread.with(CommentThread::shows_placeholder);
        if empty {
            return view! { <p class="text-xs-center">"No comments yet. Be the first to comment!"</p> }
                .into_view();
        }
        views
            .into_iter()
            .map(|node| render_node(handle, node))
            .collect_view()
    };
    let root_notices = move || {
        handle
            .thread
            .with(|x| render_notices(x.notices_for(&Scope::Root).cloned().collect()))
    };

    view! {
        <section class="col-xs-12 col-md-8 offset-md-2" id="comments">
            <h3>"Comments ("{move || handle.thread.with(CommentThread::count)}")"</h3>
            <form class="card comment-form" on:submit=on_submit>
                <div class="card-block">
                    <textarea
                        class="form-control"
                        placeholder=move || if session.is_logged_in() {
                            "Write a comment..."
                        } else {
                            "Log in to join the discussion"
                        }
                        rows="3"
                        prop:value=move || root_draft.get()
                        on:input=move |ev| root_draft.set(event_target_value(&ev))
                    ></textarea>
                </div>
                <div class="card-footer">
                    <button class="btn btn-sm btn-primary" type="submit">"Post Comment"</button>
                </div>
            </form>
            {root_notices}
            {move || handle.load_error.get().map(|err| view! {
                <p class="error-messages text-xs-center">"Could not load comments: "{err}</p>
            })}
            {tree}
        </section>
    }
}
