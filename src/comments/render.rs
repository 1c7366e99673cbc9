//! Turns a comment forest into what each node shows.

use super::CommentThread;
use crate::models::{format_date, Comment, CommentId, UserId};

#[derive(Debug, Clone, PartialEq)]
pub struct CommentView {
    pub id: CommentId,
    pub author: String,
    pub avatar: String,
    pub date: String,
    pub content: String,
    /// Unconfirmed: shows "Posting..." and no controls.
    pub pending: bool,
    pub show_reply: bool,
    pub show_delete: bool,
    pub children: Vec<CommentView>,
}

pub const PENDING_LABEL: &str = "Posting...";

/// Plans every node of `roots`, depth first, keeping the input order.
pub fn plan(
    roots: &[Comment],
    viewer: Option<&UserId>,
    is_pending: &dyn Fn(&CommentId) -> bool,
    placeholder: &str,
) -> Vec<CommentView> {
    roots
        .iter()
        .map(|node| plan_node(node, viewer, is_pending, placeholder))
        .collect()
}

/// [`plan`] for the current state of a thread.
pub fn plan_thread(thread: &CommentThread, viewer: Option<&UserId>, placeholder: &str) -> Vec<CommentView> {
    plan(
        thread.roots(),
        viewer,
        &|id: &CommentId| thread.is_pending(id) || id.is_provisional(),
        placeholder,
    )
}

fn plan_node(
    node: &Comment,
    viewer: Option<&UserId>,
    is_pending: &dyn Fn(&CommentId) -> bool,
    placeholder: &str,
) -> CommentView {
    let pending = is_pending(&node.id);
    CommentView {
        id: node.id.clone(),
        author: node.display_name().to_string(),
        avatar: node.avatar_or(placeholder).to_string(),
        date: format_date(node.created_at.as_ref()),
        content: node.content.clone(),
        pending,
        show_reply: !pending,
        show_delete: !pending && viewer.map_or(false, |x| node.is_authored_by(x)),
        children: plan(&node.replies, viewer, is_pending, placeholder),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comments::tree::tests::{node, sample};
    use crate::models::ArticleId;

    const PLACEHOLDER: &str = "https://via.placeholder.com/32";

    fn never(_: &CommentId) -> bool {
        false
    }

    #[test]
    fn delete_only_for_the_owner() {
        let viewer = UserId::new("10");
        let views = plan(&sample(), Some(&viewer), &never, PLACEHOLDER);

        assert_eq!(views.len(), 2);
        assert!(views[0].show_delete);
        assert!(!views[0].children[0].show_delete);
        assert!(views[0].children[0].children[0].show_delete);
        assert!(!views[1].show_delete);
        assert!(views.iter().all(|x| x.show_reply));
    }

    #[test]
    fn anonymous_viewers_never_see_delete() {
        let views = plan(&sample(), None, &never, PLACEHOLDER);
        assert!(views.iter().all(|x| !x.show_delete));
    }

    #[test]
    fn pending_nodes_have_no_controls() {
        let mut thread = CommentThread::new(ArticleId::new("7"));
        thread.replace(sample());
        let mut provisional = node("temp-99", "10", vec![]);
        provisional.username = None;
        crate::comments::mutation::apply(&mut thread, None, provisional).unwrap();

        let viewer = UserId::new("10");
        let views = plan_thread(&thread, Some(&viewer), PLACEHOLDER);
        let first = &views[0];
        assert!(first.pending);
        assert!(!first.show_reply);
        assert!(!first.show_delete);
        assert_eq!(first.author, "Anonymous");
        assert_eq!(first.avatar, PLACEHOLDER);
        assert_eq!(first.date, "Unknown");
        assert!(!views[1].pending);
    }

    #[test]
    fn missing_replies_render_as_leaves() {
        let raw = r#"[{"id": 1, "content": "x"}, {"id": 2, "content": "y", "replies": []}]"#;
        let roots: Vec<Comment> = serde_json::from_str(raw).unwrap();
        let views = plan(&roots, None, &never, PLACEHOLDER);
        assert!(views.iter().all(|x| x.children.is_empty()));
    }
}
