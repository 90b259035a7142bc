use voxel_catalog::Condition;

/// Fatal problems found while compiling an agent's goals. Raised once, before any agent
/// starts ticking.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompilationError {
    #[error("cycle while expanding {condition} (via {})", chain(.path))]
    Cycle {
        condition: Condition,
        path: Vec<Condition>,
    },
    #[error("expanding {condition} exceeds the depth limit of {limit}")]
    DepthExceeded { condition: Condition, limit: usize },
    #[error("malformed goal: {0}")]
    MalformedGoal(String),
}

fn chain(path: &[Condition]) -> String {
    path.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" -> ")
}
