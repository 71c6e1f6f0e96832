use std::collections::VecDeque;

use rand::Rng;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const PARTICLE_COUNT: usize = 60;

/// Pairs closer than this are joined by a line.
pub const LINK_DISTANCE: f32 = 100.0;

/// Opacity of the background wash painted over the previous frame.
pub const FADE_ALPHA: f32 = 0.1;

const LINK_MAX_OPACITY: f32 = 0.15;
const MAX_SPEED: f32 = 0.25;

// ---------------------------------------------------------------------------
// Particle
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
struct Particle {
    x: f32,
    y: f32,
    vx: f32,
    vy: f32,
    radius: f32,
    opacity: f32,
}

impl Particle {
    fn random<R: Rng>(rng: &mut R, width: f32, height: f32) -> Self {
        Particle {
            x: rng.gen::<f32>() * width,
            y: rng.gen::<f32>() * height,
            vx: (rng.gen::<f32>() - 0.5) * 2.0 * MAX_SPEED,
            vy: (rng.gen::<f32>() - 0.5) * 2.0 * MAX_SPEED,
            radius: rng.gen::<f32>() * 2.0 + 1.0,
            opacity: rng.gen::<f32>() * 0.5 + 0.2,
        }
    }

    /// Move by one velocity step, then bounce off any wall already crossed.
    /// The position is not clamped, only the velocity sign flips.
    fn advance(&mut self, width: f32, height: f32) {
        self.x += self.vx;
        self.y += self.vy;

        if self.x < 0.0 || self.x > width {
            self.vx = -self.vx;
        }
        if self.y < 0.0 || self.y > height {
            self.vy = -self.vy;
        }
    }
}

// ---------------------------------------------------------------------------
// Draw commands
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dot {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub opacity: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Link {
    pub from: [f32; 2],
    pub to: [f32; 2],
    pub opacity: f32,
}

/// Everything painted in one frame, in canvas coordinates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    /// Opacity of the background wash laid over earlier frames.
    pub fade: f32,
    pub dots: Vec<Dot>,
    pub links: Vec<Link>,
}

// ---------------------------------------------------------------------------
// ParticleField
// ---------------------------------------------------------------------------

/// Fixed-size particle set bouncing inside a `width × height` canvas.
#[derive(Debug, Clone)]
pub struct ParticleField {
    width: f32,
    height: f32,
    particles: Vec<Particle>,
}

impl ParticleField {
    pub fn new<R: Rng>(rng: &mut R, width: f32, height: f32, count: usize) -> Self {
        let particles = (0..count)
            .map(|_| Particle::random(&mut *rng, width, height))
            .collect();
        Self {
            width,
            height,
            particles,
        }
    }

    /// Change the wall positions. Particles keep their state and bounce back
    /// in on their own if now outside.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    /// Advance every particle once and describe the resulting frame.
    pub fn step(&mut self) -> Frame {
        for p in &mut self.particles {
            p.advance(self.width, self.height);
        }

        Frame {
            fade: FADE_ALPHA,
            dots: self
                .particles
                .iter()
                .map(|p| Dot {
                    x: p.x,
                    y: p.y,
                    radius: p.radius,
                    opacity: p.opacity,
                })
                .collect(),
            links: self.links(),
        }
    }

    /// Every unordered pair closer than [`LINK_DISTANCE`], with opacity
    /// falling off linearly with distance.
    fn links(&self) -> Vec<Link> {
        let mut links = Vec::new();
        for (i, a) in self.particles.iter().enumerate() {
            for b in &self.particles[i + 1..] {
                let dist = (a.x - b.x).hypot(a.y - b.y);
                if dist < LINK_DISTANCE {
                    links.push(Link {
                        from: [a.x, a.y],
                        to: [b.x, b.y],
                        opacity: LINK_MAX_OPACITY * (1.0 - dist / LINK_DISTANCE),
                    });
                }
            }
        }
        links
    }
}

// ---------------------------------------------------------------------------
// FrameTicker
// ---------------------------------------------------------------------------

/// Steps a field once per displayed frame until cancelled.
#[derive(Debug)]
pub struct FrameTicker {
    field: ParticleField,
    frames: u64,
    cancelled: bool,
}

impl FrameTicker {
    pub fn new(field: ParticleField) -> Self {
        Self {
            field,
            frames: 0,
            cancelled: false,
        }
    }

    /// Produce the next frame, or `None` once cancelled.
    pub fn tick(&mut self) -> Option<Frame> {
        if self.cancelled {
            return None;
        }
        self.frames += 1;
        Some(self.field.step())
    }

    /// Stop the loop. Returns `true` only for the call that actually stopped it.
    pub fn cancel(&mut self) -> bool {
        if self.cancelled {
            return false;
        }
        self.cancelled = true;
        log::debug!("Particle loop stopped after {} frames", self.frames);
        true
    }

    pub fn is_running(&self) -> bool {
        !self.cancelled
    }

    pub fn field_mut(&mut self) -> &mut ParticleField {
        &mut self.field
    }
}

// ---------------------------------------------------------------------------
// Trail
// ---------------------------------------------------------------------------

/// Recent frames for painters that start from a blank surface each frame.
///
/// A frame drawn `age` frames ago has been washed over `age` times, so it is
/// shown at `(1 - fade)^age` of its opacity.
#[derive(Debug, Clone)]
pub struct Trail {
    frames: VecDeque<Frame>,
    depth: usize,
}

impl Trail {
    pub fn new(depth: usize) -> Self {
        Self {
            frames: VecDeque::with_capacity(depth),
            depth: depth.max(1),
        }
    }

    pub fn push(&mut self, frame: Frame) {
        if self.frames.len() == self.depth {
            self.frames.pop_front();
        }
        self.frames.push_back(frame);
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }

    /// Frames from oldest to newest with their opacity multiplier.
    pub fn layers(&self) -> impl Iterator<Item = (f32, &Frame)> + '_ {
        let newest = self.frames.len().saturating_sub(1);
        self.frames.iter().enumerate().map(move |(i, frame)| {
            let age = (newest - i) as i32;
            ((1.0 - frame.fade).powi(age), frame)
        })
    }
}
