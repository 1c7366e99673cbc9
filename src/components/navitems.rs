use crate::api::use_api;
use crate::auth::{logout, use_session};
use crate::models::UserProfile;
use leptos::*;
use leptos_router::*;

/// Round avatar for users without an uploaded image: initials on a hue
/// derived from the username.
#[component]
pub fn InitialsAvatar(user: UserProfile, #[prop(default = 26)] size: u32) -> impl IntoView {
    let style = format!(
        "width:{size}px;height:{size}px;line-height:{size}px;border-radius:50%;\
         display:inline-block;text-align:center;color:#fff;background:hsl({}, 60%, 45%);",
        user.avatar_hue()
    );
    match user.avatar_url.clone().filter(|x| !x.is_empty()) {
        Some(url) => view! {
            <img src=url class="user-pic" width=size height=size alt=user.username.clone() />
        }
        .into_view(),
        None => view! { <span class="user-pic" style=style>{user.initials()}</span> }.into_view(),
    }
}

#[component]
pub(crate) fn NavItems() -> impl IntoView {
    let session = use_session();
    let api = store_value(use_api());
    let navigate = store_value(use_navigate());

    let on_logout = move |_| {
        spawn_local(async move {
            logout(&*api.get_value(), session).await;
            navigate.with_value(|navigate| navigate("/", Default::default()));
        });
    };

    view! {
        <li class="nav-item">
            <A class="nav-link" href="/articles">
                <i class="ion-document-text"></i>
                " Articles"
            </A>
        </li>

        <Show
            when=move || session.is_logged_in()
            fallback=|| view! {
                <li class="nav-item">
                    <a class="nav-link" href="/login">
                        <i class="ion-log-in"></i>
                        " Login"
                    </a>
                </li>
                <li class="nav-item">
                    <a class="nav-link" href="/register">
                        <i class="ion-plus-round"></i>
                        " Register"
                    </a>
                </li>
            }
        >
            <Show when=move || session.is_admin() fallback=|| ()>
                <li class="nav-item">
                    <a class="nav-link" href="/admin">
                        <i class="ion-gear-a"></i>
                        " Admin"
                    </a>
                </li>
            </Show>
            <li class="nav-item">
                <A class="nav-link" href="/profile">
                    {move || session.viewer.get().map(|user| {
                        let name = user.username.clone();
                        view! { <InitialsAvatar user /> " " {name} }
                    })}
                </A>
            </li>
            <li class="nav-item">
                <button class="btn btn-link nav-link" on:click=on_logout>
                    <i class="ion-log-out"></i>
                    " Logout"
                </button>
            </li>
        </Show>
    }
}
