use crate::api::{use_api, Api};
use crate::models::{ArticleId, ChangeIndicator, DailyStats, UserId};
use crate::stats::{author_stats, PERIODS};
use leptos::*;

#[component]
fn PeriodPicker(days: RwSignal<u32>) -> impl IntoView {
    view! {
        <div class="btn-group btn-group-sm" role="group">
            {PERIODS
                .into_iter()
                .map(|period| view! {
                    <button
                        type="button"
                        class="btn"
                        class:btn-primary=move || days.get() == period
                        class:btn-outline-primary=move || days.get() != period
                        on:click=move |_| days.set(period)
                    >
                        {format!("{period} days")}
                    </button>
                })
                .collect_view()}
        </div>
    }
}

#[component]
fn Total(label: &'static str, value: u64, #[prop(optional)] change: Option<ChangeIndicator>) -> impl IntoView {
    view! {
        <div class="col-xs-3 stat-total">
            <h4>{value}</h4>
            <small>{label}</small>
            {change.map(|change| view! {
                <div class=change.class()>
                    <i class=change.icon()></i>" "{change.to_string()}
                </div>
            })}
        </div>
    }
}

/// Day-by-day numbers, newest last.
#[component]
fn DailyTable(dates: Vec<String>, daily: DailyStats) -> impl IntoView {
    if dates.is_empty() {
        return view! { <p class="text-muted">"No data for this period."</p> }.into_view();
    }
    let cell = |series: &[u64], day: usize| series.get(day).copied().unwrap_or_default();
    view! {
        <table class="table table-sm">
            <thead>
                <tr><th>"Date"</th><th>"Views"</th><th>"Likes"</th><th>"Collects"</th></tr>
            </thead>
            <tbody>
                {dates
                    .into_iter()
                    .enumerate()
                    .map(|(day, date)| view! {
                        <tr>
                            <td>{date}</td>
                            <td>{cell(&daily.views, day)}</td>
                            <td>{cell(&daily.likes, day)}</td>
                            <td>{cell(&daily.collects, day)}</td>
                        </tr>
                    })
                    .collect_view()}
            </tbody>
        </table>
    }
    .into_view()
}

/// Statistics of one article, for its author and for admins.
#[component]
pub fn ArticleStatsPanel(article: ArticleId) -> impl IntoView {
    let api = store_value(use_api());
    let days = create_rw_signal(PERIODS[0]);
    let stats = create_local_resource(
        move || days.get(),
        move |days| {
            let article = article.clone();
            async move { api.get_value().article_stats(&article, days).await }
        },
    );

    view! {
        <div class="card stats-panel">
            <div class="card-header">
                "Statistics "
                <PeriodPicker days />
            </div>
            <div class="card-block">
                <Suspense fallback=|| view! { <p>"Loading statistics..."</p> }>
                    {move || stats.get().map(|result| match result {
                        Ok(stats) => view! {
                            <div class="row">
                                <Total
                                    label="Views"
                                    value=stats.total_view_count
                                    change=ChangeIndicator::from_ratio(stats.view_count_week_over_week)
                                />
                                <Total
                                    label="Likes"
                                    value=stats.total_like_count
                                    change=ChangeIndicator::from_ratio(stats.like_count_week_over_week)
                                />
                                <Total
                                    label="Collects"
                                    value=stats.total_collect_count
                                    change=ChangeIndicator::from_ratio(stats.collect_count_week_over_week)
                                />
                                <Total label="Comments" value=stats.total_comment_count />
                            </div>
                            <DailyTable dates=stats.dates daily=stats.daily_stats />
                        }
                        .into_view(),
                        Err(err) => view! {
                            <p class="error-messages">"Could not load statistics: "{err.user_message()}</p>
                        }
                        .into_view(),
                    })}
                </Suspense>
            </div>
        </div>
    }
}

/// Totals over an author's newest published articles.
#[component]
pub fn AuthorStatsPanel(author: UserId) -> impl IntoView {
    let api = store_value(use_api());
    let days = create_rw_signal(PERIODS[0]);
    let stats = create_local_resource(
        move || days.get(),
        move |days| {
            let author = author.clone();
            async move { author_stats(&*api.get_value(), &author, days).await }
        },
    );

    view! {
        <div class="card stats-panel">
            <div class="card-header">
                "Article statistics "
                <PeriodPicker days />
            </div>
            <div class="card-block">
                <Suspense fallback=|| view! { <p>"Loading statistics..."</p> }>
                    {move || stats.get().map(|result| match result {
                        Ok(total) if total.is_empty() => view! {
                            <p class="text-muted">"No published articles to measure yet."</p>
                        }
                        .into_view(),
                        Ok(total) => view! {
                            <div class="row">
                                <Total label="Views" value=total.total_views />
                                <Total label="Likes" value=total.total_likes />
                                <Total label="Collects" value=total.total_collects />
                                <Total label="Comments" value=total.total_comments />
                            </div>
                            {(total.failed > 0).then(|| view! {
                                <p class="text-muted">
                                    {format!("{} article(s) could not be measured.", total.failed)}
                                </p>
                            })}
                            <DailyTable dates=total.dates daily=total.daily />
                        }
                        .into_view(),
                        Err(err) => view! {
                            <p class="error-messages">"Could not load statistics: "{err.user_message()}</p>
                        }
                        .into_view(),
                    })}
                </Suspense>
            </div>
        </div>
    }
}
