pub mod goal_chase;

pub use goal_chase::GoalChase;
