/*
 * Flock Module
 *
 * The ordered collection of agents plus the one neighbor query every
 * steering rule goes through. The query is a plain all-pairs scan; keeping
 * it behind `neighbors_within` means the rules never see how neighbors
 * are found.
 */

use nannou::prelude::Vec3;

use crate::agent::Agent;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Flock {
    agents: Vec<Agent>,
}

/// An agent inside some radius, with its distance from the querying agent.
#[derive(Clone, Copy, Debug)]
pub struct Neighbor<'a> {
    pub agent: &'a Agent,
    pub distance: f32,
}

impl Flock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_agents(agents: Vec<Agent>) -> Self {
        Self { agents }
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn push(&mut self, agent: Agent) {
        self.agents.push(agent);
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Agent> {
        self.agents.get_mut(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Agent> {
        self.agents.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Agent> {
        self.agents.iter_mut()
    }

    pub fn as_slice(&self) -> &[Agent] {
        &self.agents
    }

    pub fn truncate(&mut self, len: usize) {
        self.agents.truncate(len);
    }

    /// Every agent strictly closer than `radius` to `agent`, excluding any
    /// at distance zero (the agent itself, or one sitting exactly on top).
    pub fn neighbors_within<'a>(
        &'a self,
        agent: &Agent,
        radius: f32,
    ) -> impl Iterator<Item = Neighbor<'a>> + 'a {
        let origin = agent.position;
        self.agents.iter().filter_map(move |other| {
            let distance = origin.distance(other.position);
            if distance > 0.0 && distance < radius {
                Some(Neighbor {
                    agent: other,
                    distance,
                })
            } else {
                None
            }
        })
    }

    // Average position of the whole flock
    pub fn centroid(&self) -> Option<Vec3> {
        if self.agents.is_empty() {
            return None;
        }
        let sum = self
            .agents
            .iter()
            .fold(Vec3::ZERO, |acc, agent| acc + agent.position);
        Some(sum / self.agents.len() as f32)
    }
}

impl<'a> IntoIterator for &'a Flock {
    type Item = &'a Agent;
    type IntoIter = std::slice::Iter<'a, Agent>;

    fn into_iter(self) -> Self::IntoIter {
        self.agents.iter()
    }
}

impl FromIterator<Agent> for Flock {
    fn from_iter<I: IntoIterator<Item = Agent>>(iter: I) -> Self {
        Self {
            agents: iter.into_iter().collect(),
        }
    }
}
