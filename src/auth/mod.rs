use crate::api::{use_api, Api};
use crate::models::{UserId, UserProfile};
use leptos::*;

pub type ViewerSignal = RwSignal<Option<UserProfile>>;

/// Who is looking at the page. Filled once from `GET /api/user/profile`
/// after the page hydrates; stays empty for visitors.
#[derive(Debug, Clone, Copy)]
pub struct Session {
    pub viewer: ViewerSignal,
    /// Whether the profile request has answered, successfully or not.
    pub resolved: RwSignal<bool>,
}

impl Session {
    pub fn user_id(&self) -> Option<UserId> {
        self.viewer.with(|x| x.as_ref().map(|u| u.id.clone()))
    }

    pub fn is_logged_in(&self) -> bool {
        self.viewer.with(Option::is_some)
    }

    pub fn is_admin(&self) -> bool {
        self.viewer.with(|x| x.as_ref().map_or(false, |u| u.is_admin))
    }

    /// Whether the viewer may manage content owned by `owner`.
    pub fn can_manage(&self, owner: Option<&UserId>) -> bool {
        self.viewer.with(|x| match x {
            Some(viewer) => viewer.is_admin || owner == Some(&viewer.id),
            None => false,
        })
    }
}

#[component]
pub fn SessionProvider(children: Children) -> impl IntoView {
    let session = Session {
        viewer: create_rw_signal(None),
        resolved: create_rw_signal(false),
    };
    provide_context(session);

    let api = use_api();
    // Effects only run in the browser, where the session cookie lives.
    create_effect(move |_| {
        let api = api.clone();
        spawn_local(async move {
            match api.profile().await {
                Ok(profile) => {
                    tracing::info!("logged in as {}", profile.username);
                    session.viewer.set(Some(profile));
                }
                Err(err) if err.is_not_authenticated() => session.viewer.set(None),
                Err(err) => {
                    tracing::warn!("could not load the current user: {err}");
                    session.viewer.set(None);
                }
            }
            session.resolved.set(true);
        });
    });

    children()
}

pub fn use_session() -> Session {
    match use_context::<Session>() {
        Some(session) => session,
        None => {
            tracing::warn!("no session in context, treating the viewer as a visitor");
            Session {
                viewer: create_rw_signal(None),
                resolved: create_rw_signal(true),
            }
        }
    }
}

/// Login page URL that brings the visitor back to `current` afterwards.
pub fn login_redirect_url(current: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(current.as_bytes()).collect();
    format!("/login?redirect={encoded}")
}

/// Sends the browser to the login page, remembering where it was.
pub fn redirect_to_login() {
    #[cfg(feature = "hydrate")]
    {
        let location = window().location();
        let current = location.href().unwrap_or_else(|_| "/".to_string());
        if let Err(err) = location.set_href(&login_redirect_url(&current)) {
            tracing::error!("could not leave for the login page: {err:?}");
        }
    }
}

/// Ends the session on the backend and forgets the viewer locally, even
/// when the backend call fails.
pub async fn logout<A: Api + ?Sized>(api: &A, session: Session) {
    if let Err(err) = api.logout().await {
        tracing::error!("logout failed: {err}");
    }
    session.viewer.set(None);
}
