use super::tree;
use crate::models::{ArticleId, Comment, CommentId};

/// Container a notice is attached to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Scope {
    Root,
    Replies(CommentId),
}

impl Scope {
    pub fn of(parent: Option<&CommentId>) -> Self {
        parent.map_or(Scope::Root, |x| Scope::Replies(x.clone()))
    }
}

/// A transient error shown at the top of a container.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub id: u64,
    pub scope: Scope,
    pub text: String,
}

/// Everything the comment section of one article shows, for as long as
/// the page is open.
#[derive(Debug, Clone, Default)]
pub struct CommentThread {
    article: ArticleId,
    pub(super) roots: Vec<Comment>,
    /// Provisional ids in the order they were applied.
    pub(super) pending: Vec<CommentId>,
    pub(super) count: usize,
    notices: Vec<Notice>,
    next_notice: u64,
    reply_to: Option<CommentId>,
    loaded: bool,
}

impl CommentThread {
    pub fn new(article: ArticleId) -> Self {
        Self {
            article,
            ..Default::default()
        }
    }

    #[inline]
    pub fn article(&self) -> &ArticleId {
        &self.article
    }

    #[inline]
    pub fn roots(&self) -> &[Comment] {
        &self.roots
    }

    /// The displayed comment count, provisional nodes included.
    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// True once loaded with nothing to show; the placeholder goes away as
    /// soon as any node, provisional or not, is present.
    #[inline]
    pub fn shows_placeholder(&self) -> bool {
        self.loaded && self.roots.is_empty()
    }

    #[inline]
    pub fn is_pending(&self, id: &CommentId) -> bool {
        self.pending.contains(id)
    }

    #[inline]
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Swaps in a freshly fetched tree. Any provisional nodes go with the
    /// old one.
    pub fn replace(&mut self, roots: Vec<Comment>) {
        self.count = tree::total_count(&roots);
        self.roots = roots;
        self.pending.clear();
        self.loaded = true;
        if let Some(target) = &self.reply_to {
            if !tree::contains(&self.roots, target) {
                self.reply_to = None;
            }
        }
    }

    pub fn open_reply(&mut self, id: CommentId) {
        self.reply_to = Some(id);
    }

    pub fn close_reply(&mut self) {
        self.reply_to = None;
    }

    #[inline]
    pub fn reply_target(&self) -> Option<&CommentId> {
        self.reply_to.as_ref()
    }

    pub fn push_notice(&mut self, scope: Scope, text: String) -> u64 {
        self.next_notice += 1;
        let id = self.next_notice;
        self.notices.insert(0, Notice { id, scope, text });
        id
    }

    pub fn dismiss_notice(&mut self, id: u64) {
        self.notices.retain(|x| x.id != id);
    }

    pub fn notices_for<'a>(&'a self, scope: &'a Scope) -> impl Iterator<Item = &'a Notice> + 'a {
        self.notices.iter().filter(move |x| &x.scope == scope)
    }

    #[inline]
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comments::tree::tests::sample;

    #[test]
    fn replace_recounts_and_forgets_provisional_nodes() {
        let mut thread = CommentThread::new(ArticleId::new("7"));
        assert!(!thread.shows_placeholder());

        thread.replace(Vec::new());
        assert!(thread.shows_placeholder());
        assert_eq!(thread.count(), 0);

        thread.pending.push(CommentId::new("temp-1"));
        thread.replace(sample());
        assert_eq!(thread.count(), 4);
        assert!(!thread.has_pending());
        assert!(!thread.shows_placeholder());
    }

    #[test]
    fn reply_target_is_dropped_when_the_node_disappears() {
        let mut thread = CommentThread::new(ArticleId::new("7"));
        thread.replace(sample());
        thread.open_reply(CommentId::new("3"));
        thread.replace(sample());
        assert_eq!(thread.reply_target(), Some(&CommentId::new("3")));

        thread.replace(Vec::new());
        assert_eq!(thread.reply_target(), None);
    }

    #[test]
    fn notices_are_scoped_and_dismissable() {
        let mut thread = CommentThread::new(ArticleId::new("7"));
        let root = thread.push_notice(Scope::Root, "a".into());
        thread.push_notice(Scope::Replies(CommentId::new("2")), "b".into());

        assert_eq!(thread.notices_for(&Scope::Root).count(), 1);
        thread.dismiss_notice(root);
        assert_eq!(thread.notices_for(&Scope::Root).count(), 0);
        assert_eq!(thread.notices().len(), 1);
    }
}
