use voxel_core::{Actuator, Blackboard, KnowledgeBase, Observation};

/// Everything a leaf may look at or drive during one tick of one agent.
///
/// Built fresh by the runner for every frame; the observation is immutable for the whole tick.
pub struct AgentContext<'a> {
    pub agent: &'a str,
    pub observation: &'a Observation,
    pub knowledge: &'a dyn KnowledgeBase,
    pub blackboard: &'a Blackboard,
    pub actuator: &'a mut dyn Actuator,
}

impl<'a> AgentContext<'a> {
    pub fn new(
        agent: &'a str,
        observation: &'a Observation,
        knowledge: &'a dyn KnowledgeBase,
        blackboard: &'a Blackboard,
        actuator: &'a mut dyn Actuator,
    ) -> Self {
        Self {
            agent,
            observation,
            knowledge,
            blackboard,
            actuator,
        }
    }
}
