use crate::api::{use_api, Api};
use crate::content::{highlight, Fragment};
use crate::error::ApiError;
use crate::models::{format_date, ArticleSummary, ListQuery, Page, STATUS_DRAFT};
use leptos::*;
use leptos_router::*;

pub type ArticlesResource<S> = Resource<S, Result<Page<ArticleSummary>, ApiError>>;

const POPULAR_COUNT: u32 = 5;

/// Renders article previews. Matches of `keyword` in titles and excerpts
/// are marked.
#[component]
pub fn ArticlePreviewList<S: 'static + Clone>(
    articles: ArticlesResource<S>,
    empty_text: &'static str,
    #[prop(optional, into)] keyword: MaybeSignal<String>,
) -> impl IntoView {
    let articles_view = move || {
        let keyword = keyword.get();
        articles.with(move |x| {
            x.clone().map(move |res| match res {
                Ok(page) if page.is_empty() => view! {
                    <div class="article-preview">{empty_text}</div>
                }
                .into_view(),
                Ok(page) => page
                    .records
                    .into_iter()
                    .map(|article| view! { <ArticlePreview article keyword=keyword.clone() /> })
                    .collect_view(),
                Err(err) => view! {
                    <div class="article-preview">
                        <p class="error-messages text-xs-center">
                            "Error loading articles: "{err.user_message()}
                        </p>
                    </div>
                }
                .into_view(),
            })
        })
    };

    view! {
        <Suspense fallback=|| view! {
            <div class="article-preview">
                <p class="text-xs-center">"Loading articles..."</p>
            </div>
        }>
            {articles_view.clone()}
        </Suspense>
    }
}

fn render_fragments(fragments: Vec<Fragment>) -> View {
    fragments
        .into_iter()
        .map(|x| {
            if x.hit {
                view! { <span class="text-danger">{x.text}</span> }.into_view()
            } else {
                x.text.into_view()
            }
        })
        .collect_view()
}

#[component]
fn ArticlePreview(article: ArticleSummary, keyword: String) -> impl IntoView {
    let href = format!("/articles/{}", article.id);
    let author_href = article
        .author_id
        .as_ref()
        .map(|id| format!("/profile/{id}"))
        .unwrap_or_default();
    let author = article.author_name().to_string();
    let date = format_date(article.created_at.as_ref());
    let draft = article.status == Some(STATUS_DRAFT);
    let title = render_fragments(highlight(&article.title, &keyword));
    let excerpt = render_fragments(highlight(&article.excerpt(), &keyword));
    let (views, likes, collects) = (article.view_count, article.like_count, article.collect_count);
    let tags = article.tags;

    view! {
        <div class="article-preview">
            <div class="article-meta">
                <div class="info">
                    <A href=author_href class="author">{author}</A>
                    <span class="date">{date}</span>
                </div>
                <span class="pull-xs-right counters">
                    <i class="ion-eye"></i>" "{views}" "
                    <i class="ion-heart"></i>" "{likes}" "
                    <i class="ion-bookmark"></i>" "{collects}
                </span>
            </div>
            <A href=href class="preview-link">
                <h1>
                    {title}
                    {draft.then(|| view! { " " <span class="tag-default tag-pill">"Draft"</span> })}
                </h1>
                <p>{excerpt}</p>
                <span class="btn">"Read more..."</span>
                <TagList tags />
            </A>
        </div>
    }
}

/// Sidebar with the first articles the backend lists.
#[component]
pub fn PopularArticles() -> impl IntoView {
    let api = store_value(use_api());
    let popular = create_local_resource(
        || (),
        move |_| async move {
            let query = ListQuery::default().set_size(POPULAR_COUNT);
            api.get_value().articles(&query).await
        },
    );

    view! {
        <div class="sidebar popular-articles">
            <p>"Popular Articles"</p>
            <Suspense fallback=|| view! { <p class="text-muted">"Loading..."</p> }>
                {move || popular.get().map(|result| match result {
                    Ok(page) if page.is_empty() => view! {
                        <p class="text-muted">"No popular articles yet."</p>
                    }
                    .into_view(),
                    Ok(page) => page
                        .records
                        .into_iter()
                        .map(|article| {
                            let href = format!("/articles/{}", article.id);
                            view! {
                                <A href=href class="popular-article">
                                    <div class="popular-title">{article.title}</div>
                                    <small class="text-muted">
                                        <i class="ion-eye"></i>" "{article.view_count}" "
                                        <i class="ion-heart"></i>" "{article.like_count}
                                    </small>
                                </A>
                            }
                        })
                        .collect_view(),
                    Err(err) => {
                        tracing::error!("could not load popular articles: {err}");
                        view! { <p class="error-messages">"Could not load popular articles."</p> }
                            .into_view()
                    }
                })}
            </Suspense>
        </div>
    }
}

#[component]
pub fn TagList(tags: Vec<String>) -> impl IntoView {
    if tags.is_empty() {
        return view! { <span class="no-tags">"No tags"</span> }.into_view();
    }
    view! {
        <ul class="tag-list">
            {tags
                .into_iter()
                .map(|tag| view! { <li class="tag-default tag-pill tag-outline">{tag}</li> })
                .collect_view()}
        </ul>
    }
    .into_view()
}

/// Previous/next controls. `href` turns a page number into a link.
#[component]
pub fn Pager<T: 'static, F: Fn(u64) -> String + 'static>(
    page: Page<T>,
    href: F,
) -> impl IntoView {
    if page.pages <= 1 {
        return ().into_view();
    }
    let (has_previous, has_next) = (page.has_previous(), page.has_next());
    let previous = has_previous.then(|| href(page.current - 1)).unwrap_or_default();
    let next = has_next.then(|| href(page.current + 1)).unwrap_or_default();

    view! {
        <nav>
            <ul class="pagination">
                <li class="page-item" class:disabled=!has_previous>
                    <A class="page-link" href=previous>"Previous"</A>
                </li>
                <li class="page-item active">
                    <span class="page-link">
                        {format!("Page {} of {}", page.current, page.pages)}
                    </span>
                </li>
                <li class="page-item" class:disabled=!has_next>
                    <A class="page-link" href=next>"Next"</A>
                </li>
            </ul>
        </nav>
    }
    .into_view()
}
