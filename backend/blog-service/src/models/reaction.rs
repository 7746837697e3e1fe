//! Reaction sets and the targeted updates applied to them
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Set of user ids who reacted to an item.
///
/// Order carries no meaning; a user id appears at most once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Uuid>", into = "Vec<Uuid>")]
pub struct ReactionSet(Vec<Uuid>);

impl ReactionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, user_id: Uuid) -> bool {
        self.0.contains(&user_id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Uuid> {
        self.0.iter()
    }

    /// Returns `true` if the id was inserted
    pub fn add_if_absent(&mut self, user_id: Uuid) -> bool {
        if self.contains(user_id) {
            false
        } else {
            self.0.push(user_id);
            true
        }
    }

    /// Returns `true` if the id was present
    pub fn remove_if_present(&mut self, user_id: Uuid) -> bool {
        let before = self.0.len();
        self.0.retain(|id| *id != user_id);
        self.0.len() != before
    }

    pub fn apply(&mut self, op: SetOp, user_id: Uuid) {
        match op {
            SetOp::Keep => {}
            SetOp::AddIfAbsent => {
                self.add_if_absent(user_id);
            }
            SetOp::RemoveIfPresent => {
                self.remove_if_present(user_id);
            }
        }
    }
}

impl From<Vec<Uuid>> for ReactionSet {
    fn from(ids: Vec<Uuid>) -> Self {
        ids.into_iter().collect()
    }
}

impl From<ReactionSet> for Vec<Uuid> {
    fn from(set: ReactionSet) -> Self {
        set.0
    }
}

impl FromIterator<Uuid> for ReactionSet {
    fn from_iter<I: IntoIterator<Item = Uuid>>(iter: I) -> Self {
        let mut set = ReactionSet::new();
        for id in iter {
            set.add_if_absent(id);
        }
        set
    }
}

/// Membership change for a single user id on one reaction set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOp {
    Keep,
    AddIfAbsent,
    RemoveIfPresent,
}

impl SetOp {
    /// Tag understood by the Postgres reaction update statement
    pub fn as_sql(self) -> &'static str {
        match self {
            SetOp::Keep => "keep",
            SetOp::AddIfAbsent => "add",
            SetOp::RemoveIfPresent => "remove",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReactionKind {
    Like,
    Dislike,
}

impl ReactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ReactionKind::Like => "like",
            ReactionKind::Dislike => "dislike",
        }
    }
}

/// A targeted update for one user's membership in an item's like and
/// dislike sets. Stores apply it atomically without rewriting the sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReactionUpdate {
    pub user_id: Uuid,
    pub likes: SetOp,
    pub dislikes: SetOp,
}

impl ReactionUpdate {
    /// Apply to in-memory sets. Items without a dislike set pass `None`.
    pub fn apply_to(&self, likes: &mut ReactionSet, dislikes: Option<&mut ReactionSet>) {
        likes.apply(self.likes, self.user_id);
        if let Some(dislikes) = dislikes {
            dislikes.apply(self.dislikes, self.user_id);
        }
    }

    /// Whether this update adds the user to either set
    pub fn adds_reaction(&self) -> bool {
        self.likes == SetOp::AddIfAbsent || self.dislikes == SetOp::AddIfAbsent
    }
}

/// Counts returned to the client after a toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReactionCounts {
    pub likes: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dislikes: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_remove() {
        let user = Uuid::new_v4();
        let mut set = ReactionSet::new();

        assert!(set.add_if_absent(user));
        assert!(!set.add_if_absent(user));
        assert_eq!(set.len(), 1);

        assert!(set.remove_if_present(user));
        assert!(!set.remove_if_present(user));
        assert!(set.is_empty());
    }

    #[test]
    fn test_from_vec_drops_duplicates() {
        let user = Uuid::new_v4();
        let set = ReactionSet::from(vec![user, user, Uuid::new_v4()]);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_serializes_as_array() {
        let user = Uuid::new_v4();
        let set = ReactionSet::from(vec![user]);
        let json = serde_json::to_value(&set).unwrap();
        assert_eq!(json, serde_json::json!([user]));
    }

    #[test]
    fn test_update_skips_missing_dislike_set() {
        let user = Uuid::new_v4();
        let mut likes = ReactionSet::new();
        let update = ReactionUpdate {
            user_id: user,
            likes: SetOp::AddIfAbsent,
            dislikes: SetOp::RemoveIfPresent,
        };

        update.apply_to(&mut likes, None);
        assert!(likes.contains(user));
        assert!(update.adds_reaction());
    }

    #[test]
    fn test_counts_omit_dislikes_for_comments() {
        let counts = ReactionCounts {
            likes: 1,
            dislikes: None,
        };
        assert_eq!(
            serde_json::to_value(counts).unwrap(),
            serde_json::json!({ "likes": 1 })
        );
    }
}
