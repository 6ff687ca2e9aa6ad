//! Lock-step playback of every particle emitter in the previewed content.

use serde::{Deserialize, Serialize};

use crate::content::{ComponentFlags, ContentRoot, NodeId};
use crate::hierarchy::descendants;
use crate::host::{ParticleSimulator, SceneQuery};

/// Synchronous pre-simulation run right after load
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WarmUpConfig {
    /// Total simulated time in seconds
    pub total_time: f32,
    /// Number of equal steps
    pub steps: u32,
    /// Lower bound for a single step
    pub min_step: f32,
    /// Step used when the computed step is not positive
    pub fallback_step: f32,
}

impl Default for WarmUpConfig {
    fn default() -> Self {
        Self {
            total_time: 0.8,
            steps: 6,
            min_step: 0.01,
            fallback_step: 0.05,
        }
    }
}

impl WarmUpConfig {
    pub fn new(total_time: f32, steps: u32) -> Self {
        Self {
            total_time,
            steps,
            ..Default::default()
        }
    }

    /// Length of one warm-up step
    pub fn step_length(&self) -> f32 {
        let step = if self.steps > 0 {
            (self.total_time / self.steps as f32).max(self.min_step)
        } else {
            self.total_time
        };

        if step > 0.0 {
            step
        } else {
            self.fallback_step
        }
    }
}

/// Playback state shared by every emitter in the set
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

/// Drives all emitters of the current content together.
///
/// With an empty emitter set every operation is a no-op.
#[derive(Debug, Default)]
pub struct ParticleDriver {
    emitters: Vec<NodeId>,
    state: PlaybackState,
}

impl ParticleDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the emitter set with every emitter under `root`
    pub fn collect<Q: SceneQuery + ?Sized>(&mut self, query: &Q, root: ContentRoot) {
        self.emitters = descendants(query, root)
            .filter(|&node| query.components(node).intersects(ComponentFlags::PARTICLE_EMITTER))
            .collect();
        self.state = PlaybackState::Stopped;
    }

    /// Drop the emitter set
    pub fn clear(&mut self) {
        self.emitters.clear();
        self.state = PlaybackState::Stopped;
    }

    /// Rewind every emitter to time zero, clear live particles and play
    pub fn restart<S: ParticleSimulator + ?Sized>(&mut self, sim: &mut S) {
        if self.emitters.is_empty() {
            return;
        }

        for &emitter in &self.emitters {
            sim.simulate(emitter, 0.0, true);
            sim.play(emitter);
        }
        self.state = PlaybackState::Playing;
    }

    /// Advance `config.total_time` in `config.steps` steps without rendering,
    /// then pause.
    pub fn warm_up<S: ParticleSimulator + ?Sized>(&mut self, sim: &mut S, config: &WarmUpConfig) {
        if self.emitters.is_empty() {
            return;
        }

        for &emitter in &self.emitters {
            sim.simulate(emitter, 0.0, true);
            sim.play(emitter);
        }

        let step = config.step_length();
        for _ in 0..config.steps {
            for &emitter in &self.emitters {
                sim.simulate(emitter, step, false);
            }
        }

        for &emitter in &self.emitters {
            sim.pause(emitter);
        }
        self.state = PlaybackState::Paused;

        log::debug!(
            "Warmed up {} emitter(s): {} x {:.3}s",
            self.emitters.len(),
            config.steps,
            step
        );
    }

    /// Advance every emitter by `delta` while playing
    pub fn tick<S: ParticleSimulator + ?Sized>(&mut self, sim: &mut S, delta: f32) {
        if self.state != PlaybackState::Playing {
            return;
        }

        for &emitter in &self.emitters {
            sim.simulate(emitter, delta, false);
        }
    }

    /// Switch between playing and paused
    pub fn toggle_play<S: ParticleSimulator + ?Sized>(&mut self, sim: &mut S) {
        if self.emitters.is_empty() {
            return;
        }

        if self.state == PlaybackState::Playing {
            for &emitter in &self.emitters {
                sim.pause(emitter);
            }
            self.state = PlaybackState::Paused;
        } else {
            for &emitter in &self.emitters {
                sim.play(emitter);
            }
            self.state = PlaybackState::Playing;
        }
    }

    #[inline]
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    #[inline]
    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    pub fn emitters(&self) -> &[NodeId] {
        &self.emitters
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.emitters.is_empty()
    }
}
