mod article_preview;
mod buttons;
mod comment_tree;
mod navitems;
mod stats_panel;

pub use article_preview::{ArticlePreviewList, ArticlesResource, Pager, PopularArticles, TagList};
pub use buttons::{Reaction, ReactionButton};
pub use comment_tree::CommentSection;
pub(crate) use navitems::NavItems;
pub use navitems::InitialsAvatar;
pub use stats_panel::{ArticleStatsPanel, AuthorStatsPanel};
