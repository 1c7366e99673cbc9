use crate::api::{use_api, Api};
use crate::auth::{redirect_to_login, use_session};
use crate::error::ApiError;
use crate::interaction::{Settled, Toggle};
use crate::models::ArticleId;
use leptos::*;

/// The two per-reader flags an article carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reaction {
    Like,
    Collect,
}

impl Reaction {
    fn icon(self) -> &'static str {
        match self {
            Self::Like => "ion-heart",
            Self::Collect => "ion-bookmark",
        }
    }

    fn label(self, active: bool) -> &'static str {
        match (self, active) {
            (Self::Like, false) => " Like",
            (Self::Like, true) => " Liked",
            (Self::Collect, false) => " Collect",
            (Self::Collect, true) => " Collected",
        }
    }

    async fn send<A: Api + ?Sized>(self, api: &A, article: &ArticleId, on: bool) -> Result<(), ApiError> {
        match self {
            Self::Like => api.set_like(article, on).await,
            Self::Collect => api.set_collect(article, on).await,
        }
    }
}

/// Like or collect button. Flips at once; the request follows and the
/// button settles on whatever the server accepted last.
#[component]
pub fn ReactionButton(
    reaction: Reaction,
    article: ArticleId,
    active: bool,
    count: u64,
) -> impl IntoView {
    let session = use_session();
    let api = store_value(use_api());
    let article = store_value(article);
    let state = create_rw_signal(Toggle::new(active, count));

    let on_click = move |_| {
        if !session.is_logged_in() {
            redirect_to_login();
            return;
        }
        let Some(pending) = state.try_update(Toggle::begin) else {
            return;
        };
        spawn_local(async move {
            let result = reaction
                .send(&*api.get_value(), &article.get_value(), pending.target)
                .await;
            if let Err(err) = &result {
                tracing::error!("{reaction:?} on article {} failed: {err}", article.get_value());
            }
            let settled = state.try_update(|x| x.settle(pending, result.is_ok()));
            if settled == Some(Settled::Reverted) {
                tracing::debug!("{reaction:?} reverted to the confirmed state");
            }
            if matches!(result, Err(ref err) if err.is_not_authenticated()) {
                redirect_to_login();
            }
        });
    };

    view! {
        <button
            class=move || if state.with(Toggle::active) {
                "btn btn-sm btn-primary"
            } else {
                "btn btn-sm btn-outline-primary"
            }
            on:click=on_click
        >
            <i class=reaction.icon()></i>
            {move || reaction.label(state.with(Toggle::active))}
            <span class="counter">" ("{move || state.with(Toggle::count)}")"</span>
        </button>
    }
}
