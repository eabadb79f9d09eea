//! Asteroid field collision demo
//!
//! Scatters ships and asteroids over a wrapping arena, steps every collider
//! once per frame and logs the contacts the narrow phase reports. The
//! collision pipeline is configured from `arena.toml` when present.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sat_engine::physics::{ColliderSystem, FrameStats, Polygon};
use sat_engine::prelude::*;
use std::rc::Rc;
use thiserror::Error;

const CONFIG_PATH: &str = "arena.toml";
const SEED: u64 = 0x5EED;
const SHIP_COUNT: usize = 4;
const ASTEROID_COUNT: usize = 24;
const FRAMES: u32 = 600;
const DT: f64 = 1.0 / 60.0;
const ARENA_HALF_SIZE: f64 = 400.0;

/// Ship outline pointing along +X, centroid at the origin
const SHIP_HULL: [Vec2; 3] = [
    Vec2::new(10.0, 0.0),
    Vec2::new(-5.0, 6.0),
    Vec2::new(-5.0, -6.0),
];

#[derive(Debug, Error)]
enum ArenaError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("scene: {0}")]
    Shape(#[from] ShapeError),
    #[error("collision: {0}")]
    Collider(#[from] ColliderError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ActorKind {
    Ship,
    Asteroid,
}

impl ActorKind {
    const fn mask(self) -> CollisionMask {
        match self {
            Self::Ship => CollisionMask::PLAYER,
            Self::Asteroid => CollisionMask::DEBRIS,
        }
    }
}

/// Anything flying around the arena
struct Actor {
    entity: Entity,
    kind: ActorKind,
    position: Vec2,
    velocity: Vec2,
    contacts: u32,
    frame_ends: u32,
}

impl Actor {
    fn advance(&mut self, dt: f64) {
        self.position += self.velocity * dt;
        for axis in 0..2 {
            if self.position[axis] > ARENA_HALF_SIZE {
                self.position[axis] -= 2.0 * ARENA_HALF_SIZE;
            } else if self.position[axis] < -ARENA_HALF_SIZE {
                self.position[axis] += 2.0 * ARENA_HALF_SIZE;
            }
        }
    }
}

impl CollisionHost for Actor {
    fn on_collide(
        &mut self,
        candidate: Entity,
        time: f64,
        target_mask: CollisionMask,
        contact: Option<&CollisionResult>,
    ) -> ScanStatus {
        let Some(contact) = contact else {
            return ScanStatus::Continue;
        };
        self.contacts += 1;
        log::info!(
            "t={time:.2}: {:?} {} hit {candidate} ({target_mask:?}), overlap {:.3} along ({:.2}, {:.2})",
            self.kind,
            self.entity,
            contact.overlap,
            contact.unit_vector.x,
            contact.unit_vector.y
        );

        // Ships bounce off the first thing they hit and stop looking
        if self.kind == ActorKind::Ship {
            if let Some(impulse) = contact.impulse_for(self.entity) {
                self.position += impulse;
                if impulse.norm() > 0.0 {
                    self.velocity = -self.velocity;
                }
            }
            return ScanStatus::Stop;
        }
        ScanStatus::Continue
    }

    fn on_collide_end(&mut self, _time: f64) {
        self.frame_ends += 1;
    }
}

impl HostEntity for Actor {
    fn position(&self) -> Vec2 {
        self.position
    }

    fn collision_host(&mut self) -> Option<&mut dyn CollisionHost> {
        Some(self)
    }
}

struct Arena {
    world: World,
    actors: Vec<Actor>,
    colliders: Vec<ConvexColliderComponent>,
    system: ColliderSystem,
}

impl Arena {
    fn populate(config: &CollisionConfig, rng: &mut StdRng) -> Result<Self, ArenaError> {
        let index = config.broad_phase.build();
        let mut world = World::new();
        let mut actors = Vec::with_capacity(SHIP_COUNT + ASTEROID_COUNT);
        let mut colliders = Vec::with_capacity(SHIP_COUNT + ASTEROID_COUNT);

        let kinds = std::iter::repeat(ActorKind::Ship)
            .take(SHIP_COUNT)
            .chain(std::iter::repeat(ActorKind::Asteroid).take(ASTEROID_COUNT));
        for kind in kinds {
            let entity = world.create_entity();
            let position = Vec2::new(
                rng.gen_range(-ARENA_HALF_SIZE..ARENA_HALF_SIZE),
                rng.gen_range(-ARENA_HALF_SIZE..ARENA_HALF_SIZE),
            );
            let heading = rng.gen_range(0.0..std::f64::consts::TAU);
            let (shape, speed) = match kind {
                ActorKind::Ship => (
                    Shape::Polygon(Polygon::transformed(&SHIP_HULL, position, heading)?),
                    rng.gen_range(60.0..120.0),
                ),
                ActorKind::Asteroid => (
                    Shape::regular_polygon(position, rng.gen_range(10.0..30.0), rng.gen_range(5..9))?,
                    rng.gen_range(10.0..40.0),
                ),
            };
            world.attach_hull(entity, shape);

            let mut collider = ConvexColliderComponent::with_config(entity, Rc::clone(&index), config);
            collider.set_collision_mask(kind.mask())?;
            colliders.push(collider);
            actors.push(Actor {
                entity,
                kind,
                position,
                velocity: Vec2::new(heading.cos(), heading.sin()) * speed,
                contacts: 0,
                frame_ends: 0,
            });
        }

        log::info!(
            "Arena populated with {SHIP_COUNT} ships and {ASTEROID_COUNT} asteroids ({:?} broad phase)",
            config.broad_phase.kind
        );
        Ok(Self {
            world,
            actors,
            colliders,
            system: ColliderSystem::new(),
        })
    }

    fn step(&mut self, time: f64) -> Result<FrameStats, ArenaError> {
        for actor in &mut self.actors {
            actor.advance(DT);
            self.world.move_hull_to(actor.entity, actor.position);
        }

        let entries = self
            .colliders
            .iter_mut()
            .zip(self.actors.iter_mut())
            .map(|(collider, actor)| (collider as &mut dyn Collider, actor as &mut dyn HostEntity));
        let stats = self.system.step(time, &self.world, entries)?;

        // Ships may have been pushed out of an overlap during the scan
        for actor in &self.actors {
            self.world.move_hull_to(actor.entity, actor.position);
        }
        Ok(stats)
    }
}

fn run() -> Result<(), ArenaError> {
    let config = CollisionConfig::load_or_default(CONFIG_PATH)?;
    config.validate()?;
    sat_engine::foundation::logging::init_with(&config.logging);

    let mut rng = StdRng::seed_from_u64(SEED);
    let mut arena = Arena::populate(&config, &mut rng)?;

    let mut stopped = 0;
    for frame in 0..FRAMES {
        let stats = arena.step(f64::from(frame) * DT)?;
        stopped += stats.stopped;
    }

    for actor in &arena.actors {
        log::debug!(
            "{:?} {}: {} contacts, {} same-mask frame ends",
            actor.kind,
            actor.entity,
            actor.contacts,
            actor.frame_ends
        );
    }
    let contacts: u32 = arena.actors.iter().map(|actor| actor.contacts).sum();
    log::info!(
        "Simulated {} frames: {contacts} contacts, {stopped} scans stopped early",
        arena.system.frame()
    );
    Ok(())
}

fn main() {
    if let Err(e) = run() {
        sat_engine::foundation::logging::init();
        log::error!("Arena failed: {e}");
        std::process::exit(1);
    }
}
