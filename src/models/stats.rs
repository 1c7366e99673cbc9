use super::ArticleId;
use serde::Deserialize;

/// Daily series keyed by metric, each aligned with `ArticleStats::dates`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DailyStats {
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub views: Vec<u64>,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub likes: Vec<u64>,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub collects: Vec<u64>,
}

impl DailyStats {
    pub fn zeroed(days: usize) -> Self {
        Self {
            views: vec![0; days],
            likes: vec![0; days],
            collects: vec![0; days],
        }
    }

    /// Adds `other` day by day. Days beyond this series' length are dropped.
    pub fn accumulate(&mut self, other: &DailyStats) {
        fn add(into: &mut [u64], from: &[u64]) {
            into.iter_mut()
                .zip(from)
                .for_each(|(acc, x)| *acc = acc.saturating_add(*x));
        }
        add(&mut self.views, &other.views);
        add(&mut self.likes, &other.likes);
        add(&mut self.collects, &other.collects);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleStats {
    #[serde(default)]
    pub article_id: Option<ArticleId>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "super::lenient_count")]
    pub total_view_count: u64,
    #[serde(default, deserialize_with = "super::lenient_count")]
    pub total_like_count: u64,
    #[serde(default, deserialize_with = "super::lenient_count")]
    pub total_collect_count: u64,
    #[serde(default, deserialize_with = "super::lenient_count")]
    pub total_comment_count: u64,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub dates: Vec<String>,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub daily_stats: DailyStats,
    #[serde(default)]
    pub view_count_week_over_week: Option<f64>,
    #[serde(default)]
    pub like_count_week_over_week: Option<f64>,
    #[serde(default)]
    pub collect_count_week_over_week: Option<f64>,
}

/// Week-over-week movement, as a rounded whole percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeIndicator {
    Up(u32),
    Down(u32),
    Flat,
}

impl ChangeIndicator {
    /// `ratio` is a fraction: `0.25` means twenty-five percent up.
    pub fn from_ratio(ratio: Option<f64>) -> Self {
        match ratio.filter(|x| x.is_finite()) {
            Some(x) if x > 0.0 => ChangeIndicator::Up((x * 100.0).round().abs() as u32),
            Some(x) if x < 0.0 => ChangeIndicator::Down((x * 100.0).round().abs() as u32),
            _ => ChangeIndicator::Flat,
        }
    }

    pub fn class(&self) -> &'static str {
        match self {
            ChangeIndicator::Up(_) => "text-success",
            ChangeIndicator::Down(_) => "text-danger",
            ChangeIndicator::Flat => "text-secondary",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            ChangeIndicator::Up(_) => "ion-arrow-up-c",
            ChangeIndicator::Down(_) => "ion-arrow-down-c",
            ChangeIndicator::Flat => "ion-minus",
        }
    }
}

impl std::fmt::Display for ChangeIndicator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChangeIndicator::Up(x) | ChangeIndicator::Down(x) => write!(f, "{x}%"),
            ChangeIndicator::Flat => f.write_str("0%"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn change_indicator_rounds_fraction_to_percent() {
        assert_eq!(ChangeIndicator::from_ratio(Some(0.256)), ChangeIndicator::Up(26));
        assert_eq!(ChangeIndicator::from_ratio(Some(-0.5)), ChangeIndicator::Down(50));
        assert_eq!(ChangeIndicator::from_ratio(Some(0.0)), ChangeIndicator::Flat);
        assert_eq!(ChangeIndicator::from_ratio(None), ChangeIndicator::Flat);
        assert_eq!(ChangeIndicator::from_ratio(Some(f64::NAN)), ChangeIndicator::Flat);
        assert_eq!(ChangeIndicator::Down(50).to_string(), "50%");
    }

    #[test]
    fn accumulate_stays_within_own_days() {
        let mut total = DailyStats::zeroed(2);
        total.accumulate(&DailyStats {
            views: vec![1, 2, 3],
            likes: vec![4],
            collects: vec![],
        });
        assert_eq!(total.views, vec![1, 2]);
        assert_eq!(total.likes, vec![4, 0]);
        assert_eq!(total.collects, vec![0, 0]);
    }

    #[test]
    fn decodes_stats_payload() {
        let raw = r#"{"articleId": "3", "totalViewCount": 10, "dates": ["2024-05-01"],
                      "dailyStats": {"views": [10], "likes": null}, "viewCountWeekOverWeek": 0.1}"#;
        let stats: ArticleStats = serde_json::from_str(raw).unwrap();
        assert_eq!(stats.total_view_count, 10);
        assert_eq!(stats.daily_stats.views, vec![10]);
        assert!(stats.daily_stats.likes.is_empty());
        assert_eq!(stats.view_count_week_over_week, Some(0.1));
    }
}
