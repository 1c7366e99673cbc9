use crate::api::{use_api, Api};
use crate::auth::{redirect_to_login, use_session};
use crate::components::{ArticleStatsPanel, CommentSection, Reaction, ReactionButton, TagList};
use crate::config::Config;
use crate::content::{outline, Heading};
use crate::models::{format_date, ArticleId};
use leptos::*;
use leptos_meta::*;
use leptos_router::*;

#[tracing::instrument]
#[component]
pub fn Article() -> impl IntoView {
    let params = use_params_map();
    let api = store_value(use_api());
    let article_id = create_memo(move |_| {
        params.with(|x| x.get("id").cloned().unwrap_or_default())
    });
    let article = create_local_resource(
        move || article_id.get(),
        move |id| async move { api.get_value().article(&ArticleId::new(id)).await },
    );

    let title = create_rw_signal(String::from("Loading"));

    view! {
        <Title text=move || title.get()/>

        <Suspense fallback=move || view! {
            <div class="article-page">
                <div class="container">
                    <div class="article-content">
                        <p>"Loading Article..."</p>
                    </div>
                </div>
            </div>
        }>
            {move || article.get().map(|result| match result {
                Ok(article) => {
                    title.set(article.title.clone());
                    view! { <ArticlePage article /> }.into_view()
                }
                Err(err) => view! {
                    <div class="article-page">
                        <div class="container">
                            <div class="article-content">
                                <p class="error-messages text-xs-center">
                                    "Error loading article: "{err.user_message()}
                                </p>
                            </div>
                        </div>
                    </div>
                }
                .into_view(),
            })}
        </Suspense>
    }
}

#[component]
fn ArticlePage(article: crate::models::Article) -> impl IntoView {
    let session = use_session();
    let author = article.author_id.clone();
    let can_manage = create_memo(move |_| session.can_manage(author.as_ref()));
    let id = article.id.clone();
    let stats_id = id.clone();
    let outline = outline(&article.content);

    view! {
        <article class="article-page">
            <header class="banner">
                <div class="container">
                    <h1>{article.title.clone()}</h1>
                    <ArticleMeta article=article.clone() can_manage />
                </div>
            </header>

            <div class="container page">
                <div class="row article-content">
                    <div class="col-md-9">
                        <div class="article-body" id="article-content" inner_html=outline.html></div>
                    </div>
                    <div class="col-md-3">
                        <TableOfContents headings=outline.headings />
                    </div>
                </div>

                <TagList tags=article.tags.clone() />

                <hr />

                <div class="article-actions">
                    <ReactionButton
                        reaction=Reaction::Like
                        article=id.clone()
                        active=article.liked_by_current_user
                        count=article.like_count
                    />
                    " "
                    <ReactionButton
                        reaction=Reaction::Collect
                        article=id.clone()
                        active=article.collected_by_current_user
                        count=article.collect_count
                    />
                </div>

                <div class="row">
                    <div class="col-xs-12 col-md-8 offset-md-2">
                        <AuthorCard article=article.clone() />
                    </div>
                </div>

                {move || can_manage.get().then(|| view! {
                    <div class="row">
                        <div class="col-xs-12 col-md-8 offset-md-2">
                            <ArticleStatsPanel article=stats_id.clone() />
                        </div>
                    </div>
                })}

                <div class="row">
                    <CommentSection article=id />
                </div>
            </div>
        </article>
    }
}

#[component]
fn ArticleMeta(article: crate::models::Article, can_manage: Memo<bool>) -> impl IntoView {
    let api = store_value(use_api());
    let navigate = store_value(use_navigate());
    let id = store_value(article.id.clone());
    let show_confirm = create_rw_signal(false);
    let deleting = create_rw_signal(false);
    let delete_error = create_rw_signal(None::<String>);

    let on_confirm = move |_| {
        deleting.set(true);
        spawn_local(async move {
            match api.get_value().delete_article(&id.get_value()).await {
                Ok(()) => {
                    tracing::info!("article {} deleted", id.get_value());
                    navigate.with_value(|navigate| navigate("/articles", Default::default()));
                }
                Err(err) => {
                    tracing::error!("could not delete article {}: {err}", id.get_value());
                    deleting.set(false);
                    show_confirm.set(false);
                    if err.is_not_authenticated() {
                        redirect_to_login();
                    } else {
                        delete_error.set(Some(err.user_message()));
                    }
                }
            }
        });
    };

    let profile_ref = article
        .author_id
        .as_ref()
        .map(|x| format!("/profile/{x}"))
        .unwrap_or_default();
    let avatar = article
        .author_avatar_url
        .clone()
        .filter(|x| !x.is_empty())
        .unwrap_or_else(|| Config::global().placeholder_avatar.clone());
    let author_name = article.author_name().to_string();

    view! {
        <div class="article-meta">
            <A href=profile_ref.clone()>
                <img src=avatar alt="" />
            </A>
            <div class="info">
                <A href=profile_ref class="author">{author_name.clone()}</A>
                <span class="date">{format_date(article.created_at.as_ref())}</span>
                <span class="date"><i class="ion-eye"></i>" "{article.view_count}" views"</span>
            </div>
            <Show when=move || can_manage.get() fallback=|| ()>
                <A
                    class="btn btn-sm btn-outline-secondary"
                    href=format!("/articles/edit/{}", id.get_value())
                >
                    <i class="ion-compose"></i>
                    " Edit article"
                </A>
                " "
                <button
                    class="btn btn-sm btn-outline-danger"
                    on:click=move |_| show_confirm.set(true)
                >
                    <i class="ion-trash-a"></i>
                    " Delete article"
                </button>
            </Show>
            {move || delete_error.get().map(|err| view! {
                <p class="error-messages">"Could not delete the article: "{err}</p>
            })}
            <Show when=move || show_confirm.get() fallback=|| ()>
                <div class="modal-backdrop">
                    <div class="modal-dialog card">
                        <div class="card-block">
                            <h4>"Delete article"</h4>
                            <p>"Are you sure you want to delete this article? This cannot be undone."</p>
                        </div>
                        <div class="card-footer">
                            <button
                                class="btn btn-sm btn-danger"
                                disabled=move || deleting.get()
                                on:click=on_confirm
                            >
                                {move || if deleting.get() { "Deleting..." } else { "Delete" }}
                            </button>
                            " "
                            <button
                                class="btn btn-sm"
                                disabled=move || deleting.get()
                                on:click=move |_| show_confirm.set(false)
                            >
                                "Cancel"
                            </button>
                        </div>
                    </div>
                </div>
            </Show>
        </div>
    }
}

#[component]
fn AuthorCard(article: crate::models::Article) -> impl IntoView {
    let profile_ref = article
        .author_id
        .as_ref()
        .map(|x| format!("/profile/{x}"))
        .unwrap_or_default();
    let avatar = article
        .author_avatar_url
        .clone()
        .filter(|x| !x.is_empty())
        .unwrap_or_else(|| Config::global().placeholder_avatar.clone());
    let bio = article
        .author_bio
        .clone()
        .filter(|x| !x.trim().is_empty())
        .unwrap_or_else(|| "No bio available".to_string());

    view! {
        <div class="card author-card">
            <div class="card-block">
                <A href=profile_ref.clone()>
                    <img src=avatar class="user-img" width="100" height="100" alt="" />
                </A>
                <h4><A href=profile_ref>{article.author_name().to_string()}</A></h4>
                <p>{bio}</p>
            </div>
        </div>
    }
}

fn scroll_to(id: &str) {
    #[cfg(feature = "hydrate")]
    {
        match document().get_element_by_id(id) {
            Some(target) => target.scroll_into_view(),
            None => tracing::debug!("no section #{id} to scroll to"),
        }
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = id;
    }
}

/// Links to the article's headings, indented by level. Collapsible; the
/// last section jumped to stays marked.
#[component]
fn TableOfContents(headings: Vec<Heading>) -> impl IntoView {
    let expanded = create_rw_signal(true);
    let active = create_rw_signal(None::<String>);

    let entries = if headings.is_empty() {
        view! { <p class="text-muted toc-empty">"This article has no sections."</p> }.into_view()
    } else {
        headings
            .into_iter()
            .map(|heading| {
                let href = format!("#{}", heading.id);
                let class = format!("toc-link toc-h{}", heading.level);
                let target = heading.id.clone();
                let marked = heading.id;
                let on_click = move |ev: ev::MouseEvent| {
                    ev.prevent_default();
                    scroll_to(&target);
                    active.set(Some(target.clone()));
                };
                view! {
                    <a
                        href=href
                        class=class
                        class:active=move || active.with(|x| x.as_deref() == Some(marked.as_str()))
                        on:click=on_click
                    >
                        {heading.text}
                    </a>
                }
            })
            .collect_view()
    };

    view! {
        <div class="card toc-sticky" id="table-of-contents">
            <div class="card-header">
                "Contents "
                <button
                    class="btn btn-sm btn-link toc-toggle"
                    aria-expanded=move || expanded.get().to_string()
                    on:click=move |_| expanded.update(|x| *x = !*x)
                >
                    <i class=move || if expanded.get() { "ion-chevron-down" } else { "ion-chevron-right" }></i>
                </button>
            </div>
            <nav class="card-block toc-container" class:collapsed=move || !expanded.get()>
                {entries}
            </nav>
        </div>
    }
}
