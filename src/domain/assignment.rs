// src/domain/assignment.rs

use chrono::{DateTime, Utc};

/// A user eligible to receive a pending lead. Ephemeral: built by the
/// caller for one selection and thrown away.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub user_id: String,
    /// Load metric supplied by the caller; what it counts depends on the
    /// mode (active leads vs. today's assignments).
    pub load_score: f64,
    pub last_assigned_at: Option<DateTime<Utc>>,
}

/// How to pick among candidates.
///
/// LoadBalanced and RoundRobin are intentionally identical today: both take
/// the lowest `load_score`, and the caller changes what that score counts.
/// True sequence-based round-robin was never implemented upstream and is
/// preserved as-is. SkillBased is a placeholder that keeps the caller's
/// ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentMode {
    LoadBalanced,
    RoundRobin,
    SkillBased,
}

impl AssignmentMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "load_balanced" => Some(AssignmentMode::LoadBalanced),
            "round_robin" => Some(AssignmentMode::RoundRobin),
            "skill_based" => Some(AssignmentMode::SkillBased),
            _ => None,
        }
    }
}

/// Picks the user to assign a pending lead to. Returns `None` only for an
/// empty candidate list; callers must treat that as "leave unassigned",
/// not as an error.
pub fn best_candidate(candidates: &[Candidate], mode: AssignmentMode) -> Option<String> {
    if candidates.is_empty() {
        return None;
    }

    match mode {
        AssignmentMode::LoadBalanced | AssignmentMode::RoundRobin => {
            let mut pool: Vec<&Candidate> = candidates.iter().collect();
            // Stable sort: ties keep the caller's order.
            pool.sort_by(|a, b| {
                a.load_score
                    .partial_cmp(&b.load_score)
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
            pool.first().map(|c| c.user_id.clone())
        }
        AssignmentMode::SkillBased => candidates.first().map(|c| c.user_id.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(user_id: &str, load_score: f64) -> Candidate {
        Candidate {
            user_id: user_id.into(),
            load_score,
            last_assigned_at: None,
        }
    }

    #[test]
    fn empty_pool_yields_none_for_every_mode() {
        for mode in [
            AssignmentMode::LoadBalanced,
            AssignmentMode::RoundRobin,
            AssignmentMode::SkillBased,
        ] {
            assert_eq!(best_candidate(&[], mode), None);
        }
    }

    #[test]
    fn load_balanced_picks_the_least_loaded() {
        let pool = [candidate("a", 7.0), candidate("b", 2.0), candidate("c", 4.0)];
        assert_eq!(
            best_candidate(&pool, AssignmentMode::LoadBalanced),
            Some("b".into())
        );
    }

    #[test]
    fn round_robin_behaves_like_load_balanced() {
        let pool = [candidate("a", 3.0), candidate("b", 1.0)];
        assert_eq!(
            best_candidate(&pool, AssignmentMode::RoundRobin),
            best_candidate(&pool, AssignmentMode::LoadBalanced),
        );
    }

    #[test]
    fn ties_keep_caller_order() {
        let pool = [candidate("first", 2.0), candidate("second", 2.0)];
        assert_eq!(
            best_candidate(&pool, AssignmentMode::LoadBalanced),
            Some("first".into())
        );
    }

    #[test]
    fn skill_based_returns_the_first_candidate() {
        let pool = [candidate("x", 99.0), candidate("y", 0.0)];
        assert_eq!(
            best_candidate(&pool, AssignmentMode::SkillBased),
            Some("x".into())
        );
    }
}
