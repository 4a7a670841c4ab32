//! Drifting dots joined by faint lines behind the dashboard. Purely cosmetic.

use eframe::egui;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const PARTICLE_COUNT: usize = 50;
const LINK_DISTANCE: f32 = 100.0;

#[derive(Debug, Clone, Copy)]
struct Particle {
    pos: egui::Pos2,
    vel: egui::Vec2,
    size: f32,
}

pub struct Backdrop {
    particles: Vec<Particle>,
    bounds: egui::Vec2,
}

impl Backdrop {
    pub fn new(bounds: egui::Vec2, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let particles = (0..PARTICLE_COUNT)
            .map(|_| Particle {
                pos: egui::pos2(rng.gen_range(0.0..bounds.x.max(1.0)), rng.gen_range(0.0..bounds.y.max(1.0))),
                vel: egui::vec2(rng.gen_range(-0.5..0.5), rng.gen_range(-0.5..0.5)),
                size: rng.gen_range(2.0..6.0),
            })
            .collect();
        Self { particles, bounds }
    }

    pub fn resize(&mut self, bounds: egui::Vec2) {
        self.bounds = bounds;
    }

    /// Moves every particle one frame, wrapping at the edges.
    pub fn step(&mut self) {
        let b = self.bounds;
        for p in &mut self.particles {
            p.pos += p.vel;
            if p.pos.x < 0.0 {
                p.pos.x = b.x;
            } else if p.pos.x > b.x {
                p.pos.x = 0.0;
            }
            if p.pos.y < 0.0 {
                p.pos.y = b.y;
            } else if p.pos.y > b.y {
                p.pos.y = 0.0;
            }
        }
    }

    fn links(&self) -> impl Iterator<Item = (egui::Pos2, egui::Pos2)> + '_ {
        self.particles.iter().enumerate().flat_map(move |(i, a)| {
            self.particles[i + 1..]
                .iter()
                .filter(move |b| a.pos.distance(b.pos) < LINK_DISTANCE)
                .map(move |b| (a.pos, b.pos))
        })
    }

    pub fn paint(&self, painter: &egui::Painter, origin: egui::Pos2) {
        let line = egui::Stroke::new(1.0, egui::Color32::from_rgba_unmultiplied(37, 99, 235, 30));
        for (a, b) in self.links() {
            painter.line_segment([origin + a.to_vec2(), origin + b.to_vec2()], line);
        }
        let dot = egui::Color32::from_rgba_unmultiplied(37, 99, 235, 60);
        for p in &self.particles {
            painter.circle_filled(origin + p.pos.to_vec2(), p.size / 2.0, dot);
        }
    }
}
