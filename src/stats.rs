//! Statistics summed over several articles.

use crate::api::Api;
use crate::error::ApiError;
use crate::models::{ArticleId, ArticleStats, DailyStats, ListQuery, UserId, STATUS_PUBLISHED};
use futures::future::join_all;

/// Periods, in days, the statistics views offer.
pub const PERIODS: [u32; 3] = [7, 30, 90];

/// How many of the newest published articles feed the author totals.
pub const AUTHOR_ARTICLES: u32 = 10;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregateStats {
    /// Articles whose statistics arrived.
    pub articles: usize,
    /// Articles whose statistics could not be fetched.
    pub failed: usize,
    pub total_views: u64,
    pub total_likes: u64,
    pub total_collects: u64,
    pub total_comments: u64,
    pub dates: Vec<String>,
    pub daily: DailyStats,
}

impl AggregateStats {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.articles == 0
    }
}

/// Sums every successful result. The day axis is the first successful
/// result's; series of other articles are cut or padded to it.
pub fn aggregate(results: impl IntoIterator<Item = Result<ArticleStats, ApiError>>) -> AggregateStats {
    let mut total = AggregateStats::default();
    for result in results {
        let stats = match result {
            Ok(stats) => stats,
            Err(err) => {
                tracing::warn!("skipping article statistics: {err}");
                total.failed += 1;
                continue;
            }
        };

        if total.articles == 0 {
            total.dates = stats.dates.clone();
            total.daily = DailyStats::zeroed(total.dates.len());
        }
        total.articles += 1;
        total.total_views += stats.total_view_count;
        total.total_likes += stats.total_like_count;
        total.total_collects += stats.total_collect_count;
        total.total_comments += stats.total_comment_count;
        total.daily.accumulate(&stats.daily_stats);
    }
    total
}

/// Fetches the statistics of every article at once and waits for all of
/// them, failures included.
pub async fn collect<A: Api + ?Sized>(api: &A, articles: &[ArticleId], days: u32) -> AggregateStats {
    let results = join_all(articles.iter().map(|id| api.article_stats(id, days))).await;
    aggregate(results)
}

/// Totals over the newest published articles of `author`.
pub async fn author_stats<A: Api + ?Sized>(
    api: &A,
    author: &UserId,
    days: u32,
) -> Result<AggregateStats, ApiError> {
    let query = ListQuery::default()
        .set_author(author.as_str())
        .set_status(Some(STATUS_PUBLISHED))
        .set_size(AUTHOR_ARTICLES);
    let page = api.articles(&query).await?;
    let ids: Vec<ArticleId> = page.records.into_iter().map(|x| x.id).collect();
    tracing::debug!("aggregating {} articles over {days} days", ids.len());
    Ok(collect(api, &ids, days).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::{Call, MockApi};
    use crate::models::{ArticleSummary, Page};

    fn stats(views: u64, daily: Vec<u64>) -> ArticleStats {
        ArticleStats {
            total_view_count: views,
            total_like_count: 1,
            dates: (1..=daily.len()).map(|d| format!("2024-05-0{d}")).collect(),
            daily_stats: DailyStats {
                views: daily,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn sums_successes_and_counts_failures() {
        let total = aggregate(vec![
            Ok(stats(10, vec![4, 6])),
            Err(ApiError::Transport("offline".into())),
            Ok(stats(5, vec![1, 2, 2])),
        ]);
        assert_eq!(total.articles, 2);
        assert_eq!(total.failed, 1);
        assert_eq!(total.total_views, 15);
        assert_eq!(total.total_likes, 2);
        assert_eq!(total.dates.len(), 2);
        assert_eq!(total.daily.views, vec![5, 8]);
        assert_eq!(total.daily.likes, vec![0, 0]);
    }

    #[test]
    fn nothing_successful_is_empty() {
        let total = aggregate(vec![Err(ApiError::NotAuthenticated)]);
        assert!(total.is_empty());
        assert_eq!(total.failed, 1);
        assert!(total.dates.is_empty());
    }

    #[tokio::test]
    async fn collect_waits_for_every_article() {
        let api = MockApi::new();
        api.set_stats("1", Ok(stats(3, vec![1])))
            .set_stats("2", Err(ApiError::Transport("timeout".into())))
            .set_stats("3", Ok(stats(4, vec![2])));
        let ids: Vec<ArticleId> = ["1", "2", "3"].into_iter().map(ArticleId::from).collect();

        let total = collect(&api, &ids, 30).await;
        assert_eq!(total.articles, 2);
        assert_eq!(total.failed, 1);
        assert_eq!(total.total_views, 7);
        assert_eq!(api.count(|x| matches!(x, Call::ArticleStats(_, 30))), 3);
    }

    #[tokio::test]
    async fn author_stats_reads_published_articles() {
        let api = MockApi::new();
        api.push_articles(Ok(Page {
            records: vec![ArticleSummary {
                id: ArticleId::new("1"),
                ..Default::default()
            }],
            total: 1,
            pages: 1,
            current: 1,
            size: 10,
        }))
        .set_stats("1", Ok(stats(9, vec![9])));

        let total = author_stats(&api, &UserId::new("5"), 7).await.unwrap();
        assert_eq!(total.total_views, 9);

        let Some(Call::Articles(query)) = api.calls().into_iter().next() else {
            panic!("articles were not listed first");
        };
        assert_eq!(
            query.api_path(),
            "/api/articles?pageNum=1&pageSize=10&authorId=5&status=1"
        );
    }
}
