use super::settings::{AvatarUploader, ProfileEditor};
use crate::api::{use_api, Api};
use crate::auth::{redirect_to_login, use_session};
use crate::components::{ArticlePreviewList, AuthorStatsPanel, InitialsAvatar};
use crate::config::Config;
use crate::models::{format_date, ActivityType, ListQuery, UserActivity, UserId, UserProfile};
use leptos::*;
use leptos_meta::*;
use leptos_router::*;

const ACTIVITY_PAGE_SIZE: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ProfileTab {
    Articles,
    Collections,
    Activity,
    Statistics,
}

impl ProfileTab {
    const ALL: [ProfileTab; 4] = [
        ProfileTab::Articles,
        ProfileTab::Collections,
        ProfileTab::Activity,
        ProfileTab::Statistics,
    ];

    fn label(self, own: bool) -> &'static str {
        match (self, own) {
            (ProfileTab::Articles, true) => "My Articles",
            (ProfileTab::Articles, false) => "Articles",
            (ProfileTab::Collections, _) => "Collections",
            (ProfileTab::Activity, _) => "Activity",
            (ProfileTab::Statistics, _) => "Statistics",
        }
    }

    /// Collections and statistics are private to their owner.
    fn visible(self, own: bool) -> bool {
        own || matches!(self, ProfileTab::Articles | ProfileTab::Activity)
    }
}

#[tracing::instrument]
#[component]
pub fn Profile() -> impl IntoView {
    let session = use_session();
    let params = use_params_map();
    let route_user = create_memo(move |_| {
        params.with(|x| x.get("id").filter(|x| !x.is_empty()).map(|x| UserId::new(x.as_str())))
    });

    // `/profile` belongs to the viewer; visitors are sent to log in once
    // the session is known.
    create_effect(move |_| {
        if session.resolved.get() && route_user.get().is_none() && !session.is_logged_in() {
            redirect_to_login();
        }
    });

    let shown = move || match route_user.get() {
        Some(id) if Some(&id) != session.user_id().as_ref() => Some((id, false)),
        _ => session.user_id().map(|id| (id, true)),
    };

    view! {
        <Title text="Profile"/>
        <div class="profile-page">
            {move || match shown() {
                Some((user, own)) => view! { <ProfileBody user own /> }.into_view(),
                None => view! {
                    <div class="container"><p>"Loading profile..."</p></div>
                }
                .into_view(),
            }}
        </div>
    }
}

#[component]
fn ProfileBody(user: UserId, own: bool) -> impl IntoView {
    let tab = create_rw_signal(ProfileTab::Articles);
    let user = store_value(user);

    view! {
        {if own {
            view! { <OwnUserInfo /> }.into_view()
        } else {
            view! { <PublicUserInfo user=user.get_value() /> }.into_view()
        }}

        <div class="container">
            <div class="row">
                <div class="col-xs-12 col-md-10 offset-md-1">
                    <div class="articles-toggle">
                        <ul class="nav nav-pills outline-active">
                            {ProfileTab::ALL
                                .into_iter()
                                .filter(|x| x.visible(own))
                                .map(|x| view! {
                                    <li class="nav-item">
                                        <a
                                            class="nav-link"
                                            class:active=move || tab.get() == x
                                            href="#"
                                            on:click=move |ev| {
                                                ev.prevent_default();
                                                tab.set(x);
                                            }
                                        >
                                            {x.label(own)}
                                        </a>
                                    </li>
                                })
                                .collect_view()}
                        </ul>
                    </div>

                    {move || match tab.get() {
                        ProfileTab::Articles => view! { <UserArticles user=user.get_value() own /> }.into_view(),
                        ProfileTab::Collections => view! { <Collections /> }.into_view(),
                        ProfileTab::Activity => view! { <Activities user=user.get_value() /> }.into_view(),
                        ProfileTab::Statistics => view! { <AuthorStatsPanel author=user.get_value() /> }.into_view(),
                    }}
                </div>
            </div>
        </div>
    }
}

fn render_profile(user: &UserProfile) -> View {
    let joined = user
        .join_date
        .as_ref()
        .map(|x| format!("Joined {}", format_date(Some(x))));
    view! {
        <InitialsAvatar user=user.clone() size=100 />
        <h4>{user.username.clone()}</h4>
        {user.email.clone().map(|x| view! { <p class="text-muted">{x}</p> })}
        <p>
            {user
                .bio
                .clone()
                .filter(|x| !x.trim().is_empty())
                .unwrap_or_else(|| "No bio available".to_string())}
        </p>
        {joined.map(|x| view! { <p class="text-muted"><small>{x}</small></p> })}
    }
    .into_view()
}

#[component]
fn OwnUserInfo() -> impl IntoView {
    let session = use_session();
    let editing = create_rw_signal(false);

    view! {
        <div class="user-info">
            <div class="container">
                <div class="row">
                    <div class="col-xs-12 col-md-10 offset-md-1">
                        {move || session.viewer.get().map(|profile| {
                            if editing.get() {
                                view! { <ProfileEditor profile editing /> }.into_view()
                            } else {
                                view! {
                                    {render_profile(&profile)}
                                    <AvatarUploader />
                                    <button
                                        class="btn btn-sm btn-outline-secondary action-btn"
                                        on:click=move |_| editing.set(true)
                                    >
                                        <i class="ion-gear-a"></i>
                                        " Edit Profile"
                                    </button>
                                }
                                .into_view()
                            }
                        })}
                    </div>
                </div>
            </div>
        </div>
    }
}

/// Header for someone else's profile. There is no public profile
/// endpoint, so the name comes from their newest activity.
#[component]
fn PublicUserInfo(user: UserId) -> impl IntoView {
    let api = store_value(use_api());
    let id = store_value(user);
    let latest = create_local_resource(
        || (),
        move |_| async move {
            api.get_value()
                .activities(&id.get_value(), None, 1, 1)
                .await
                .ok()
                .and_then(|page| page.records.into_iter().next())
        },
    );

    view! {
        <div class="user-info">
            <div class="container">
                <div class="row">
                    <div class="col-xs-12 col-md-10 offset-md-1">
                        <Suspense fallback=|| view! { <p>"Loading user profile"</p> }>
                            {move || latest.get().map(|activity| {
                                let profile = UserProfile {
                                    id: id.get_value(),
                                    username: activity
                                        .as_ref()
                                        .and_then(|x| x.username.clone())
                                        .unwrap_or_else(|| format!("User {}", id.get_value())),
                                    avatar_url: activity.and_then(|x| x.avatar_url),
                                    ..Default::default()
                                };
                                render_profile(&profile)
                            })}
                        </Suspense>
                    </div>
                </div>
            </div>
        </div>
    }
}

#[component]
fn UserArticles(user: UserId, own: bool) -> impl IntoView {
    let api = store_value(use_api());
    let page = create_rw_signal(1u32);
    let base = ListQuery::default()
        .set_author(user.as_str())
        .set_size(Config::global().page_size);
    // Visitors only see what is published.
    let base = if own {
        base
    } else {
        base.set_status(Some(crate::models::STATUS_PUBLISHED))
    };
    let query = create_memo(move |_| base.clone().set_page(page.get()));
    let articles = create_local_resource(
        move || query.get(),
        move |query| async move { api.get_value().articles(&query).await },
    );

    view! {
        <ArticlePreviewList articles empty_text="No articles are here... yet." />
        <PagerButtons
            page
            pages=Signal::derive(move || {
                articles.with(|x| x.as_ref().and_then(|x| x.as_ref().ok()).map_or(0, |x| x.pages))
            })
        />
    }
}

#[component]
fn Collections() -> impl IntoView {
    let api = store_value(use_api());
    let page = create_rw_signal(1u32);
    let size = Config::global().page_size;
    let articles = create_local_resource(
        move || page.get(),
        move |page| async move { api.get_value().collections(page, size).await },
    );

    view! {
        <ArticlePreviewList articles empty_text="Nothing collected yet." />
        <PagerButtons
            page
            pages=Signal::derive(move || {
                articles.with(|x| x.as_ref().and_then(|x| x.as_ref().ok()).map_or(0, |x| x.pages))
            })
        />
    }
}

/// Page controls for lists that keep their page in a signal rather than
/// in the URL.
#[component]
fn PagerButtons(page: RwSignal<u32>, pages: Signal<u64>) -> impl IntoView {
    view! {
        <Show when=move || { pages.get() > 1 } fallback=|| ()>
            <nav>
                <ul class="pagination">
                    <li class="page-item" class:disabled=move || { page.get() <= 1 }>
                        <button
                            class="page-link"
                            on:click=move |_| page.update(|x| *x = x.saturating_sub(1).max(1))
                        >
                            "Previous"
                        </button>
                    </li>
                    <li class="page-item active">
                        <span class="page-link">{move || format!("Page {} of {}", page.get(), pages.get())}</span>
                    </li>
                    <li class="page-item" class:disabled=move || { u64::from(page.get()) >= pages.get() }>
                        <button
                            class="page-link"
                            on:click=move |_| {
                                if u64::from(page.get_untracked()) < pages.get_untracked() {
                                    page.update(|x| *x += 1);
                                }
                            }
                        >
                            "Next"
                        </button>
                    </li>
                </ul>
            </nav>
        </Show>
    }
}

#[component]
fn Activities(user: UserId) -> impl IntoView {
    let api = store_value(use_api());
    let user = store_value(user);
    let filter = create_rw_signal(None::<ActivityType>);
    let page = create_rw_signal(1u32);
    let activities = create_local_resource(
        move || (filter.get(), page.get()),
        move |(filter, page)| async move {
            api.get_value()
                .activities(&user.get_value(), filter.as_ref(), page, ACTIVITY_PAGE_SIZE)
                .await
        },
    );

    let choose = move |kind: Option<ActivityType>| {
        page.set(1);
        filter.set(kind);
    };

    view! {
        <div class="activity-filters">
            <button
                class="btn btn-sm"
                class:btn-primary=move || filter.with(Option::is_none)
                on:click=move |_| choose(None)
            >
                "All"
            </button>
            {ActivityType::FILTERS
                .into_iter()
                .map(|kind| {
                    let selected = kind.clone();
                    let pick = kind.clone();
                    let on_pick = move |_| choose(Some(pick.clone()));
                    view! {
                        " "
                        <button
                            class="btn btn-sm"
                            class:btn-primary=move || filter.with(|x| x.as_ref() == Some(&selected))
                            on:click=on_pick
                        >
                            <i class=kind.icon()></i>" "{kind.label()}
                        </button>
                    }
                })
                .collect_view()}
        </div>

        <Suspense fallback=|| view! { <p>"Loading activity..."</p> }>
            {move || activities.get().map(|result| match result {
                Ok(list) if list.is_empty() => view! {
                    <p class="text-muted">"No activity yet."</p>
                }
                .into_view(),
                Ok(list) => list.records.into_iter().map(render_activity).collect_view(),
                Err(err) => view! {
                    <p class="error-messages">"Could not load activity: "{err.user_message()}</p>
                }
                .into_view(),
            })}
        </Suspense>

        <PagerButtons
            page
            pages=Signal::derive(move || {
                activities.with(|x| x.as_ref().and_then(|x| x.as_ref().ok()).map_or(0, |x| x.pages))
            })
        />
    }
}

fn render_activity(activity: UserActivity) -> View {
    let when = activity
        .time_ago
        .clone()
        .unwrap_or_else(|| format_date(activity.created_at.as_ref()));
    let title = activity
        .target_title
        .clone()
        .unwrap_or_else(|| "an article".to_string());
    let target = match activity.target_href() {
        Some(href) => view! { <A href=href>{title}</A> }.into_view(),
        None => title.into_view(),
    };
    let comment = activity.comment_text();

    view! {
        <div class="card activity">
            <div class="card-block">
                <i class=activity.activity_type.icon()></i>
                " "{activity.activity_type.action_text()}" "{target}
                {comment.map(|x| view! { <blockquote class="text-muted">{x}</blockquote> })}
                <span class="date pull-xs-right">{when}</span>
            </div>
        </div>
    }
    .into_view()
}
