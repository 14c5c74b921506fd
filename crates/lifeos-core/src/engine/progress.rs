//! Goal progress derived from milestones.

use crate::records::GoalMilestone;

/// Percentage of completed milestones, 0-100.
///
/// Milestones count equally regardless of `order`. An empty list is 0%.
/// Halves round up: `round(100 * completed / total)` is evaluated in integers
/// as `(200 * completed + total) / (2 * total)`.
pub fn compute_goal_progress(milestones: &[GoalMilestone]) -> u8 {
    let total = milestones.len();
    if total == 0 {
        return 0;
    }
    let completed = milestones.iter().filter(|m| m.completed).count();
    ((200 * completed + total) / (2 * total)) as u8
}

/// Rewrite `order` to each milestone's zero-based position.
pub fn renumber_milestones(milestones: &mut [GoalMilestone]) {
    for (position, milestone) in milestones.iter_mut().enumerate() {
        milestone.order = position as u32;
    }
}
