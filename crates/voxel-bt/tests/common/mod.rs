use std::collections::BTreeMap;
use std::fmt;

use voxel_bt::{Leaf, NodeState, Status};

/// Test context: leaf statuses are looked up by name so tests can flip them between ticks.
#[derive(Debug, Default)]
pub struct ProbeWorld {
    pub statuses: BTreeMap<&'static str, Status>,
    pub ticked: Vec<&'static str>,
    pub exited: Vec<(&'static str, NodeState)>,
}

impl ProbeWorld {
    pub fn set(&mut self, name: &'static str, status: Status) {
        self.statuses.insert(name, status);
    }

    pub fn set_all(&mut self, names: &[&'static str], status: Status) {
        for name in names {
            self.set(name, status);
        }
    }

    pub fn take_ticked(&mut self) -> Vec<&'static str> {
        std::mem::take(&mut self.ticked)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Probe(pub &'static str);

impl Leaf<ProbeWorld> for Probe {
    fn tick(&mut self, world: &mut ProbeWorld) -> Status {
        world.ticked.push(self.0);
        world
            .statuses
            .get(self.0)
            .copied()
            .unwrap_or(Status::Failure)
    }

    fn on_exit(&mut self, world: &mut ProbeWorld, new_state: NodeState) {
        world.exited.push((self.0, new_state));
    }
}

impl fmt::Display for Probe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}
