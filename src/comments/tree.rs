//! Queries and edits over an article's comment forest.

use crate::models::{Comment, CommentId};

/// Number of nodes shown for an article: every root plus every reply at
/// every depth.
pub fn total_count(roots: &[Comment]) -> usize {
    roots.len()
        + roots
            .iter()
            .map(|root| count_nested(&root.replies))
            .sum::<usize>()
}

/// Nodes reachable from `list`, the list itself included.
pub fn count_nested(list: &[Comment]) -> usize {
    let mut stack: Vec<&[Comment]> = vec![list];
    let mut count = 0;
    while let Some(level) = stack.pop() {
        count += level.len();
        stack.extend(
            level
                .iter()
                .filter(|x| !x.replies.is_empty())
                .map(|x| x.replies.as_slice()),
        );
    }
    count
}

pub fn find<'a>(roots: &'a [Comment], id: &CommentId) -> Option<&'a Comment> {
    let mut stack: Vec<&Comment> = roots.iter().collect();
    while let Some(node) = stack.pop() {
        if &node.id == id {
            return Some(node);
        }
        stack.extend(node.replies.iter());
    }
    None
}

/// Id of the node whose replies hold `id`; `None` for roots and strangers.
pub fn parent_of<'a>(roots: &'a [Comment], id: &CommentId) -> Option<&'a CommentId> {
    let mut stack: Vec<&Comment> = roots.iter().collect();
    while let Some(node) = stack.pop() {
        if node.replies.iter().any(|x| &x.id == id) {
            return Some(&node.id);
        }
        stack.extend(node.replies.iter());
    }
    None
}

#[inline]
pub fn contains(roots: &[Comment], id: &CommentId) -> bool {
    find(roots, id).is_some()
}

fn find_mut<'a>(list: &'a mut [Comment], id: &CommentId) -> Option<&'a mut Comment> {
    for node in list.iter_mut() {
        if &node.id == id {
            return Some(node);
        }
        if let Some(found) = find_mut(&mut node.replies, id) {
            return Some(found);
        }
    }
    None
}

/// Puts `node` first among the roots, or first among the replies of
/// `parent`. Hands the node back when the parent is not in the tree.
pub fn insert_front(
    roots: &mut Vec<Comment>,
    parent: Option<&CommentId>,
    node: Comment,
) -> Result<(), Comment> {
    let container = match parent {
        None => roots,
        Some(parent) => match find_mut(roots, parent) {
            Some(parent) => &mut parent.replies,
            None => return Err(node),
        },
    };
    container.insert(0, node);
    Ok(())
}

/// Detaches the node with `id`, together with its replies.
pub fn remove(roots: &mut Vec<Comment>, id: &CommentId) -> Option<Comment> {
    if let Some(pos) = roots.iter().position(|x| &x.id == id) {
        return Some(roots.remove(pos));
    }
    roots
        .iter_mut()
        .find_map(|node| remove(&mut node.replies, id))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn node(id: &str, author: &str, replies: Vec<Comment>) -> Comment {
        Comment {
            id: CommentId::new(id),
            user_id: Some(crate::models::UserId::new(author)),
            username: Some(format!("user{author}")),
            content: format!("comment {id}"),
            replies,
            ..Default::default()
        }
    }

    /// Two roots; the first has one reply which has one reply of its own.
    pub(crate) fn sample() -> Vec<Comment> {
        vec![
            node("1", "10", vec![node("2", "11", vec![node("3", "10", vec![])])]),
            node("4", "12", vec![]),
        ]
    }

    fn walk(list: &[Comment]) -> usize {
        list.iter().map(|x| 1 + walk(&x.replies)).sum()
    }

    #[test]
    fn counts_every_node_once() {
        let roots = sample();
        assert_eq!(total_count(&roots), 2 + (1 + 1) + 0);
        assert_eq!(total_count(&roots), walk(&roots));
        assert_eq!(total_count(&[]), 0);
    }

    #[test]
    fn counting_survives_deep_chains() {
        let mut chain = node("leaf", "1", vec![]);
        for depth in 0..10_000 {
            chain = node(&depth.to_string(), "1", vec![chain]);
        }
        let roots = vec![chain];
        assert_eq!(total_count(&roots), 10_001);
        // Comment drops recursively, so unwind the chain by hand.
        let mut next = roots;
        while let Some(mut x) = next.pop() {
            next.append(&mut x.replies);
        }
    }

    #[test]
    fn inserts_at_front_of_the_right_container() {
        let mut roots = sample();
        insert_front(&mut roots, None, node("r", "1", vec![])).unwrap();
        assert_eq!(roots[0].id.as_str(), "r");

        insert_front(&mut roots, Some(&CommentId::new("2")), node("n", "1", vec![])).unwrap();
        let parent = find(&roots, &CommentId::new("2")).unwrap();
        assert_eq!(parent.replies[0].id.as_str(), "n");
        assert_eq!(parent.replies.len(), 2);

        let orphan = insert_front(&mut roots, Some(&CommentId::new("404")), node("o", "1", vec![]));
        assert_eq!(orphan.unwrap_err().id.as_str(), "o");
    }

    #[test]
    fn parent_is_found_structurally() {
        let roots = sample();
        assert_eq!(parent_of(&roots, &CommentId::new("3")), Some(&CommentId::new("2")));
        assert_eq!(parent_of(&roots, &CommentId::new("1")), None);
    }

    #[test]
    fn remove_takes_descendants_along() {
        let mut roots = sample();
        let removed = remove(&mut roots, &CommentId::new("2")).unwrap();
        assert_eq!(count_nested(std::slice::from_ref(&removed)), 2);
        assert!(!contains(&roots, &CommentId::new("3")));
        assert_eq!(total_count(&roots), 2);
        assert!(remove(&mut roots, &CommentId::new("2")).is_none());
    }
}
