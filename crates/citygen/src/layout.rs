use crate::config::{CityConfig, LayoutError};
use crate::grid::{CityGrid, StreetAxis};
use cityloop_common::{Color, Transform};
use cityloop_kernel::{Aabb, ColliderIndex, EntityKind, RenderPayload, World};
use glam::{Vec2, Vec3};

const STREET_COLOR: Color = Color::from_hex(0x333333);
const GROUND_COLOR: Color = Color::from_hex(0x3a5f3a);
const LAMP_COLOR: Color = Color::from_hex(0xffd9a0);
const PROP_COLOR: Color = Color::from_hex(0xc0c8d0);
const BUILDING_PALETTE: [Color; 5] = [
    Color::from_hex(0x8a8d91),
    Color::from_hex(0x6b7b8c),
    Color::from_hex(0xa39e93),
    Color::from_hex(0x5c6670),
    Color::from_hex(0xb5aa99),
];

/// Street surface rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StreetRect {
    pub axis: StreetAxis,
    pub center: Vec3,
    /// Extent along X and Z.
    pub size: Vec2,
}

/// One building: a box standing on the ground plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Building {
    /// Block coordinates the building belongs to.
    pub block: (u32, u32),
    /// Ground-level center of the footprint.
    pub base_center: Vec3,
    /// Width (X), height (Y), depth (Z).
    pub size: Vec3,
    pub color: Color,
}

impl Building {
    /// Collision volume: exact footprint, from the ground to the roof.
    pub fn collider(&self) -> Aabb {
        Aabb::from_footprint(self.base_center.x, self.base_center.z, self.size, 0.0)
    }

    /// Transform of the rendered box, which is centered on its midpoint.
    pub fn transform(&self) -> Transform {
        Transform::from_position(self.base_center + Vec3::new(0.0, self.size.y * 0.5, 0.0))
    }

    pub fn payload(&self) -> RenderPayload {
        RenderPayload::Box {
            size: self.size,
            color: self.color,
        }
    }
}

/// Decorative reflective sphere. No collider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prop {
    pub center: Vec3,
    pub radius: f32,
}

/// Placement data for one generation pass.
#[derive(Debug, Clone)]
pub struct CityLayout {
    pub grid: CityGrid,
    pub streets: Vec<StreetRect>,
    pub buildings: Vec<Building>,
    pub lights: Vec<Vec3>,
    pub props: Vec<Prop>,
    light_range: f32,
}

/// Counts of what `CityLayout::populate` added.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PopulateStats {
    pub streets: usize,
    pub buildings: usize,
    pub lights: usize,
    pub props: usize,
    pub colliders: usize,
}

/// Derives the street lattice and scatters buildings, lights and props.
#[derive(Debug, Clone)]
pub struct CityLayoutGenerator {
    config: CityConfig,
    grid: CityGrid,
}

impl CityLayoutGenerator {
    pub fn new(config: CityConfig) -> Result<Self, LayoutError> {
        config.validate()?;
        let grid = CityGrid::new(&config);
        Ok(Self { config, grid })
    }

    pub fn config(&self) -> &CityConfig {
        &self.config
    }

    pub fn grid(&self) -> &CityGrid {
        &self.grid
    }

    /// RNG for one pass: seeded from the config, or from entropy.
    pub fn rng(&self) -> fastrand::Rng {
        match self.config.seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        }
    }

    /// Produce a full layout. Pure apart from consuming `rng`.
    pub fn generate(&self, rng: &mut fastrand::Rng) -> CityLayout {
        let _span = tracing::info_span!("city_generate", city_size = self.config.city_size).entered();

        let streets = self.streets();
        let mut buildings = Vec::new();
        let mut lights = Vec::new();
        let mut props = Vec::new();

        for row in 0..self.config.city_size {
            for column in 0..self.config.city_size {
                self.place_buildings(column, row, rng, &mut buildings);
                self.place_lights(column, row, rng, &mut lights);
                if rng.f32() < self.config.prop_fraction {
                    props.push(self.prop_for_block(column, row));
                }
            }
        }

        tracing::debug!(
            streets = streets.len(),
            buildings = buildings.len(),
            lights = lights.len(),
            props = props.len(),
            "city layout generated"
        );

        CityLayout {
            grid: self.grid,
            streets,
            buildings,
            lights,
            props,
            light_range: self.config.light_range,
        }
    }

    fn streets(&self) -> Vec<StreetRect> {
        let chunk = self.grid.chunk_size();
        let width = self.config.street_width;
        // Streets span one full lattice period starting at the outer curb of street 0.
        let span_center = self.grid.street_center(0) - width * 0.5 + chunk * 0.5;
        let mut streets = Vec::with_capacity(self.config.city_size as usize * 2);
        for k in 0..self.config.city_size {
            let c = self.grid.street_center(k);
            streets.push(StreetRect {
                axis: StreetAxis::NorthSouth,
                center: Vec3::new(c, 0.0, span_center),
                size: Vec2::new(width, chunk),
            });
            streets.push(StreetRect {
                axis: StreetAxis::EastWest,
                center: Vec3::new(span_center, 0.0, c),
                size: Vec2::new(chunk, width),
            });
        }
        streets
    }

    /// Split the buildable area of a block into lots along X and fill each
    /// lot with one randomly sized building.
    fn place_buildings(
        &self,
        column: u32,
        row: u32,
        rng: &mut fastrand::Rng,
        out: &mut Vec<Building>,
    ) {
        let c = &self.config;
        let count = rng.u32(c.min_buildings_per_block..=c.max_buildings_per_block);
        let lot = c.lot_width(count);
        let center = self.grid.block_center(column, row);
        let x0 = center.x - c.buildable_width() * 0.5;
        let z_lo = center.z - c.buildable_width() * 0.5;
        let z_hi = center.z + c.buildable_width() * 0.5;

        for i in 0..count {
            let lot_lo = x0 + i as f32 * (lot + c.building_padding);
            let width = range(rng, c.min_building_size, lot);
            let depth = range(rng, c.min_building_size, c.buildable_width());
            let height = range(rng, c.min_building_height, c.max_building_height);
            let x = range(rng, lot_lo + width * 0.5, lot_lo + lot - width * 0.5);
            let z = range(rng, z_lo + depth * 0.5, z_hi - depth * 0.5);
            out.push(Building {
                block: (column, row),
                base_center: Vec3::new(x, 0.0, z),
                size: Vec3::new(width, height, depth),
                color: BUILDING_PALETTE[rng.usize(..BUILDING_PALETTE.len())],
            });
        }
    }

    /// One lamp site at the middle of each block side, on the street just
    /// outside the curb. Each site is an independent draw.
    fn place_lights(&self, column: u32, row: u32, rng: &mut fastrand::Rng, out: &mut Vec<Vec3>) {
        let center = self.grid.block_center(column, row);
        let reach = self.config.block_size * 0.5 + 1.0;
        let y = self.config.light_height;
        let sites = [
            Vec3::new(center.x, y, center.z - reach),
            Vec3::new(center.x, y, center.z + reach),
            Vec3::new(center.x - reach, y, center.z),
            Vec3::new(center.x + reach, y, center.z),
        ];
        for site in sites {
            if rng.f32() < self.config.street_light_fraction {
                out.push(site);
            }
        }
    }

    /// Props sit in the padding strip at a block corner, clear of buildings.
    fn prop_for_block(&self, column: u32, row: u32) -> Prop {
        let center = self.grid.block_center(column, row);
        let pad = self.config.building_padding;
        let inset = self.config.block_size * 0.5 - pad * 0.5;
        let radius = (pad * 0.4).max(0.1);
        Prop {
            center: Vec3::new(center.x - inset, radius, center.z - inset),
            radius,
        }
    }
}

/// Uniform draw in `[lo, hi]`; collapses to `lo` when the range is empty.
fn range(rng: &mut fastrand::Rng, lo: f32, hi: f32) -> f32 {
    if hi <= lo {
        lo
    } else {
        lo + rng.f32() * (hi - lo)
    }
}

impl CityLayout {
    pub fn chunk_size(&self) -> f32 {
        self.grid.chunk_size()
    }

    /// Append every visual element to the scene and every building collider
    /// to the index.
    pub fn populate(&self, world: &mut World, colliders: &mut ColliderIndex) -> PopulateStats {
        let chunk = self.chunk_size();
        world.spawn(
            EntityKind::Ground,
            Transform::from_position(Vec3::new(0.0, -0.01, 0.0)),
            RenderPayload::Plane {
                size: Vec2::splat(chunk * 3.0),
                color: GROUND_COLOR,
            },
        );

        for street in &self.streets {
            world.spawn(
                EntityKind::Street,
                Transform::from_position(street.center),
                RenderPayload::Plane {
                    size: street.size,
                    color: STREET_COLOR,
                },
            );
        }

        for building in &self.buildings {
            world.spawn(EntityKind::Building, building.transform(), building.payload());
            colliders.push(building.collider());
        }

        for light in &self.lights {
            world.spawn(
                EntityKind::StreetLight,
                Transform::from_position(*light),
                RenderPayload::PointLight {
                    color: LAMP_COLOR,
                    intensity: 0.0,
                    range: self.light_range,
                },
            );
        }

        for prop in &self.props {
            world.spawn(
                EntityKind::Prop,
                Transform::from_position(prop.center),
                RenderPayload::Sphere {
                    radius: prop.radius,
                    color: PROP_COLOR,
                    reflective: true,
                },
            );
        }

        let stats = PopulateStats {
            streets: self.streets.len(),
            buildings: self.buildings.len(),
            lights: self.lights.len(),
            props: self.props.len(),
            colliders: self.buildings.len(),
        };
        tracing::debug!(?stats, "city populated");
        stats
    }
}
