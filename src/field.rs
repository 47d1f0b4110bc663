// The particle field: owns the particle set and the surface bounds, advances
// the particles once per frame and draws them plus the links between
// neighbours.

use crate::config::{FieldConfig, ResizePolicy};
use crate::error::FieldError;
use crate::particle::Particle;
use crate::surface::{Bounds, DrawSurface};
use rand::Rng;
use vecmath::Vector2;

/// A line between two particles closer than the link distance.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Connection {
    pub a: usize,
    pub b: usize,
    pub from: [f64; 2],
    pub to: [f64; 2],
    pub distance: f64,
    pub alpha: f64,
}

pub struct ParticleField {
    config: FieldConfig,
    bounds: Bounds,
    particles: Vec<Particle>,
}

impl ParticleField {
    pub fn generate<R: Rng>(
        config: FieldConfig,
        bounds: Bounds,
        rng: &mut R,
    ) -> Result<ParticleField, FieldError> {
        config.validate()?;
        let mut particles = Vec::with_capacity(config.particle_count as usize);
        for _ in 0..config.particle_count {
            particles.push(Particle::random(rng, bounds, &config));
        }
        Ok(ParticleField {
            config,
            bounds,
            particles,
        })
    }

    pub fn from_particles(
        config: FieldConfig,
        bounds: Bounds,
        particles: Vec<Particle>,
    ) -> Result<ParticleField, FieldError> {
        config.validate()?;
        Ok(ParticleField {
            config,
            bounds,
            particles,
        })
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn resize(&mut self, bounds: Bounds) {
        if bounds == self.bounds {
            return;
        }
        self.bounds = bounds;
        if self.config.resize_policy == ResizePolicy::Clamp {
            for particle in &mut self.particles {
                particle.pos = bounds.clamp(particle.pos);
            }
        }
    }

    pub fn tick(&mut self) {
        let bounds = self.bounds;
        for particle in &mut self.particles {
            particle.step(bounds);
        }
    }

    // Every unordered pair, self-pairs included, closer than the link distance.
    // Quadratic in the particle count.
    pub fn connections(&self) -> impl Iterator<Item = Connection> + '_ {
        let max_distance = self.config.link_distance;
        let link_alpha = self.config.link_alpha;
        let particles = &self.particles;
        (0..particles.len()).flat_map(move |a| {
            (a..particles.len()).filter_map(move |b| {
                let from: Vector2<f64> = particles[a].pos;
                let to: Vector2<f64> = particles[b].pos;
                let distance = vecmath::vec2_len(vecmath::vec2_sub(from, to));
                if distance < max_distance {
                    Some(Connection {
                        a,
                        b,
                        from,
                        to,
                        distance,
                        alpha: (1.0 - distance / max_distance) * link_alpha,
                    })
                } else {
                    None
                }
            })
        })
    }

    pub fn render<S: DrawSurface + ?Sized>(&self, surface: &mut S) {
        surface.clear();
        for particle in &self.particles {
            surface.fill_circle(
                particle.pos,
                particle.radius(),
                particle.color(),
                particle.opacity(),
            );
        }
        for connection in self.connections() {
            surface.stroke_line(
                connection.from,
                connection.to,
                self.config.link_color,
                connection.alpha,
                self.config.link_width,
            );
        }
    }

    /// One animation frame: move everything, then redraw.
    pub fn frame<S: DrawSurface + ?Sized>(&mut self, surface: &mut S) {
        self.tick();
        self.render(surface);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[derive(Debug, PartialEq)]
    enum Op {
        Clear,
        Circle([f64; 2], f64, Color, f64),
        Line([f64; 2], [f64; 2], Color, f64, f64),
    }

    struct Recorder {
        bounds: Bounds,
        ops: Vec<Op>,
    }

    impl Recorder {
        fn new(bounds: Bounds) -> Recorder {
            Recorder {
                bounds,
                ops: Vec::new(),
            }
        }

        fn lines(&self) -> Vec<&Op> {
            self.ops
                .iter()
                .filter(|op| matches!(op, Op::Line(..)))
                .collect()
        }
    }

    impl DrawSurface for Recorder {
        fn bounds(&self) -> Bounds {
            self.bounds
        }

        fn clear(&mut self) {
            self.ops.push(Op::Clear);
        }

        fn fill_circle(&mut self, center: [f64; 2], radius: f64, color: Color, alpha: f64) {
            self.ops.push(Op::Circle(center, radius, color, alpha));
        }

        fn stroke_line(
            &mut self,
            from: [f64; 2],
            to: [f64; 2],
            color: Color,
            alpha: f64,
            width: f64,
        ) {
            self.ops.push(Op::Line(from, to, color, alpha, width));
        }
    }

    fn particle_at(x: f64, y: f64) -> Particle {
        Particle::new([x, y], [0.0, 0.0], 1.0, Color::VIOLET, 0.3)
    }

    fn seeded(count: u32, bounds: Bounds, seed: u64) -> ParticleField {
        let config = FieldConfig::default().with_particle_count(count);
        let mut rng = StdRng::seed_from_u64(seed);
        ParticleField::generate(config, bounds, &mut rng).unwrap()
    }

    #[test]
    fn generates_exactly_the_requested_count() {
        let field = seeded(100, Bounds::new(1280, 720), 1);
        assert_eq!(field.particles().len(), 100);
        for p in field.particles() {
            assert!(p.color() == Color::CYAN || p.color() == Color::VIOLET);
            assert!(p.opacity() >= 0.1 && p.opacity() < 0.6);
        }
    }

    #[test]
    fn same_seed_same_field() {
        let a = seeded(50, Bounds::new(300, 200), 42);
        let b = seeded(50, Bounds::new(300, 200), 42);
        assert_eq!(a.particles(), b.particles());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = FieldConfig {
            link_distance: -1.0,
            ..FieldConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(0);
        assert!(ParticleField::generate(config, Bounds::new(10, 10), &mut rng).is_err());
    }

    #[test]
    fn particles_stay_within_one_step_of_bounds() {
        let bounds = Bounds::new(200, 120);
        let mut field = seeded(100, bounds, 3);
        let margin = field.config().max_speed;
        for _ in 0..5_000 {
            field.tick();
            for p in field.particles() {
                assert!(p.pos[0] >= -margin && p.pos[0] <= bounds.width as f64 + margin);
                assert!(p.pos[1] >= -margin && p.pos[1] <= bounds.height as f64 + margin);
            }
        }
    }

    #[test]
    fn two_close_particles_draw_one_link() {
        let bounds = Bounds::new(400, 400);
        let field = ParticleField::from_particles(
            FieldConfig::default(),
            bounds,
            vec![particle_at(0.0, 0.0), particle_at(10.0, 0.0)],
        )
        .unwrap();

        let links: Vec<Connection> = field.connections().filter(|c| c.a != c.b).collect();
        assert_eq!(links.len(), 1);
        let expected = (1.0 - 10.0 / 150.0) * 0.2;
        assert!((links[0].alpha - expected).abs() < 1e-12);
        assert!((links[0].alpha - 0.18667).abs() < 1e-4);
    }

    #[test]
    fn links_only_below_threshold() {
        let field = ParticleField::from_particles(
            FieldConfig::default(),
            Bounds::new(1000, 1000),
            vec![
                particle_at(0.0, 0.0),
                particle_at(150.0, 0.0),
                particle_at(0.0, 149.0),
            ],
        )
        .unwrap();

        let pairs: Vec<(usize, usize)> = field
            .connections()
            .filter(|c| c.a != c.b)
            .map(|c| (c.a, c.b))
            .collect();
        assert_eq!(pairs, vec![(0, 2)]);
    }

    #[test]
    fn self_pairs_are_zero_length_full_alpha() {
        let field = ParticleField::from_particles(
            FieldConfig::default(),
            Bounds::new(100, 100),
            vec![particle_at(5.0, 5.0)],
        )
        .unwrap();
        let links: Vec<Connection> = field.connections().collect();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].distance, 0.0);
        assert_eq!(links[0].from, links[0].to);
        assert!((links[0].alpha - 0.2).abs() < 1e-12);
    }

    #[test]
    fn render_clears_then_circles_then_lines() {
        let bounds = Bounds::new(400, 400);
        let field = ParticleField::from_particles(
            FieldConfig::default(),
            bounds,
            vec![particle_at(0.0, 0.0), particle_at(10.0, 0.0)],
        )
        .unwrap();
        let mut surface = Recorder::new(bounds);
        field.render(&mut surface);

        assert_eq!(surface.ops[0], Op::Clear);
        assert_eq!(surface.ops[1], Op::Circle([0.0, 0.0], 1.0, Color::VIOLET, 0.3));
        assert_eq!(surface.ops[2], Op::Circle([10.0, 0.0], 1.0, Color::VIOLET, 0.3));
        // (0,0), (0,1), (1,1)
        assert_eq!(surface.lines().len(), 3);
        match &surface.ops[4] {
            Op::Line(from, to, color, alpha, width) => {
                assert_eq!(*from, [0.0, 0.0]);
                assert_eq!(*to, [10.0, 0.0]);
                assert_eq!(*color, Color::CYAN);
                assert!((alpha - (1.0 - 10.0 / 150.0) * 0.2).abs() < 1e-12);
                assert_eq!(*width, 1.0);
            }
            other => panic!("expected a line, got {:?}", other),
        }
    }

    #[test]
    fn frame_moves_before_drawing() {
        let bounds = Bounds::new(100, 100);
        let mut field = ParticleField::from_particles(
            FieldConfig::default(),
            bounds,
            vec![Particle::new([99.9, 50.0], [0.5, 0.0], 1.0, Color::CYAN, 0.5)],
        )
        .unwrap();
        let mut surface = Recorder::new(bounds);
        field.frame(&mut surface);

        assert_eq!(field.particles()[0].vel, [-0.5, 0.0]);
        match &surface.ops[1] {
            Op::Circle(center, ..) => assert!((center[0] - 100.4).abs() < 1e-9),
            other => panic!("expected a circle, got {:?}", other),
        }
    }

    #[test]
    fn resize_to_same_size_changes_nothing() {
        let mut field = seeded(20, Bounds::new(500, 400), 9);
        let before = field.particles().to_vec();
        field.resize(Bounds::new(500, 400));
        field.resize(Bounds::new(500, 400));
        assert_eq!(field.bounds(), Bounds::new(500, 400));
        assert_eq!(field.particles(), &before[..]);
    }

    #[test]
    fn shrinking_resize_reflects_later_by_default() {
        let mut field = ParticleField::from_particles(
            FieldConfig::default(),
            Bounds::new(500, 500),
            vec![Particle::new([400.0, 400.0], [0.5, 0.5], 1.0, Color::CYAN, 0.5)],
        )
        .unwrap();
        field.resize(Bounds::new(100, 100));
        assert_eq!(field.particles()[0].pos, [400.0, 400.0]);

        field.tick();
        assert_eq!(field.particles()[0].vel, [-0.5, -0.5]);
        // Still outside, so the velocity flips back on the following frame.
        field.tick();
        assert_eq!(field.particles()[0].vel, [0.5, 0.5]);
    }

    #[test]
    fn shrinking_resize_clamps_with_clamp_policy() {
        let config = FieldConfig::default().with_resize_policy(ResizePolicy::Clamp);
        let mut field = ParticleField::from_particles(
            config,
            Bounds::new(500, 500),
            vec![Particle::new([400.0, 50.0], [0.5, -0.25], 1.0, Color::CYAN, 0.5)],
        )
        .unwrap();
        field.resize(Bounds::new(100, 100));
        assert_eq!(field.particles()[0].pos, [100.0, 50.0]);
        assert_eq!(field.particles()[0].vel, [0.5, -0.25]);
    }
}
