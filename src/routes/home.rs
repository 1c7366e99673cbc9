use crate::api::{use_api, Api};
use crate::auth::use_session;
use crate::components::{ArticlePreviewList, Pager, PopularArticles};
use crate::models::{ListQuery, STATUS_DRAFT, STATUS_PUBLISHED};
use leptos::*;
use leptos_meta::*;
use leptos_router::*;

/// Article listing: keyword search, status filter and paging, all kept in
/// the query string so the page can be shared.
#[tracing::instrument]
#[component]
pub fn HomePage() -> impl IntoView {
    let api = store_value(use_api());
    let session = use_session();
    let query = use_query::<ListQuery>();
    let current = create_memo(move |_| query.get().unwrap_or_default());

    let articles = create_local_resource(
        move || current.get(),
        move |query| async move { api.get_value().articles(&query).await },
    );

    let keyword = create_rw_signal(current.get_untracked().get_keyword().to_string());
    let navigate = use_navigate();
    let on_search = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        let target = current.get_untracked().set_keyword(&keyword.get_untracked());
        navigate(&target.to_string(), Default::default());
    };

    let status_href = move |status: Option<i32>| current.get().set_status(status).to_string();

    view! {
        <Title text="Articles"/>
        <div class="home-page">
            <div class="banner">
                <div class="container">
                    <h1 class="logo-font">"DevSpace"</h1>
                    <p>"A place to share your knowledge."</p>
                </div>
            </div>

            <div class="container page">
                <div class="row">
                    <div class="col-md-9">
                        <form class="form-inline search-form" on:submit=on_search>
                            <input
                                class="form-control"
                                type="search"
                                placeholder="Search articles"
                                prop:value=move || keyword.get()
                                on:input=move |ev| keyword.set(event_target_value(&ev))
                            />
                            " "
                            <button class="btn btn-primary" type="submit">"Search"</button>
                        </form>

                        <div class="feed-toggle">
                            <ul class="nav nav-pills outline-active">
                                <li class="nav-item">
                                    <a
                                        class="nav-link"
                                        class:active=move || current.with(|x| x.get_status().is_none())
                                        href=move || status_href(None)
                                    >
                                        "All"
                                    </a>
                                </li>
                                <li class="nav-item">
                                    <a
                                        class="nav-link"
                                        class:active=move || current.with(|x| x.get_status() == Some(STATUS_PUBLISHED))
                                        href=move || status_href(Some(STATUS_PUBLISHED))
                                    >
                                        "Published"
                                    </a>
                                </li>
                                <Show when=move || session.is_logged_in() fallback=|| ()>
                                    <li class="nav-item">
                                        <a
                                            class="nav-link"
                                            class:active=move || current.with(|x| x.get_status() == Some(STATUS_DRAFT))
                                            href=move || status_href(Some(STATUS_DRAFT))
                                        >
                                            "Drafts"
                                        </a>
                                    </li>
                                </Show>
                            </ul>
                        </div>

                        <ArticlePreviewList
                            articles
                            empty_text="No articles are here... yet."
                            keyword=Signal::derive(move || current.with(|x| x.get_keyword().to_string()))
                        />

                        <Suspense fallback=|| ()>
                            {move || articles.get().and_then(Result::ok).map(|page| {
                                let base = current.get_untracked();
                                view! { <Pager page href=move |n: u64| base.clone().set_page(u32::try_from(n).unwrap_or(u32::MAX)).to_string() /> }
                            })}
                        </Suspense>
                    </div>

                    <div class="col-md-3">
                        <PopularArticles />
                    </div>
                </div>
            </div>
        </div>
    }
}
