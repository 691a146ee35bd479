use crate::coins::CoinField;
use crate::config::{ConfigError, SimConfig};
use crate::slot::{AssetSlot, CharacterRig};
use cityloop_citygen::{CityGrid, CityLayoutGenerator, LayoutError, PopulateStats};
use cityloop_common::{Color, EntityId, WorldShift};
use cityloop_input::{Action, InputState};
use cityloop_kernel::{ColliderIndex, EntityKind, RenderPayload, World, WorldEvent};
use cityloop_motion::{
    Character, CharacterStep, ControlMode, ModeSwitch, ModeTransition, Vehicle, VehicleControls,
};
use cityloop_render::{OrbitCamera, RenderMode, RenderView};
use cityloop_sky::{CycleError, DayNightCycle, LampDimmer, LightingState};
use cityloop_stream::{TickStats, TickTimer, WorldWrapper, WrapError};
use glam::{Vec2, Vec3};
use std::time::Duration;

const CHARACTER_PROXY_SIZE: Vec3 = Vec3::new(0.8, 1.8, 0.8);
const CHARACTER_COLOR: Color = Color::from_hex(0x3366cc);
const VEHICLE_SIZE: Vec3 = Vec3::new(2.0, 1.4, 4.2);
const VEHICLE_COLOR: Color = Color::from_hex(0xcc2222);

#[derive(Debug, thiserror::Error)]
pub enum SimError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error(transparent)]
    Cycle(#[from] CycleError),
    #[error(transparent)]
    Wrap(#[from] WrapError),
}

/// What happened during one tick.
#[derive(Debug, Clone, Default)]
pub struct TickReport {
    pub tick: u64,
    pub mode: ControlMode,
    /// Result of a vehicle toggle request, if one was made.
    pub transition: Option<ModeTransition>,
    pub render_mode_changed: bool,
    pub character: Option<CharacterStep>,
    pub vehicle_collided: bool,
    pub coins_collected: u32,
    /// Offset applied by a chunk wrap.
    pub wrapped: Option<Vec3>,
    /// Structural scene changes, for the rendering side to mirror.
    pub events: Vec<WorldEvent>,
}

/// Owns the whole scene and advances it one tick at a time.
pub struct Simulation {
    config: SimConfig,
    world: World,
    colliders: ColliderIndex,
    grid: CityGrid,
    populated: PopulateStats,
    character: Character,
    vehicle: Vehicle,
    modes: ModeSwitch,
    camera: OrbitCamera,
    wrapper: WorldWrapper,
    cycle: DayNightCycle,
    lamps: LampDimmer,
    lighting: LightingState,
    coins: CoinField,
    rig: AssetSlot<CharacterRig>,
    render_mode: RenderMode,
    character_id: EntityId,
    vehicle_id: EntityId,
    timer: TickTimer,
    viewport: (u32, u32),
    running: bool,
}

impl Simulation {
    /// Validate the config, generate and populate the city, and place the
    /// vehicle on the central street with the character beside it.
    pub fn new(config: SimConfig) -> Result<Self, SimError> {
        config.validate()?;
        let generator = CityLayoutGenerator::new(config.city.clone())?;
        let mut rng = generator.rng();
        let layout = generator.generate(&mut rng);

        let mut world = World::new();
        let mut colliders = ColliderIndex::new();
        let populated = layout.populate(&mut world, &mut colliders);
        let grid = layout.grid;

        let street = grid.central_street();
        let vehicle = Vehicle::new(Vec3::new(street, config.vehicle.ground_y, street), 0.0);
        let mut character = Character::new(Vec3::ZERO, 0.0);
        character.place_on_ground(vehicle.left_side(config.vehicle.exit_offset), &config.character);

        let vehicle_id = world.spawn(
            EntityKind::Vehicle,
            vehicle.transform(),
            RenderPayload::Box {
                size: VEHICLE_SIZE,
                color: VEHICLE_COLOR,
            },
        );
        let character_id = world.spawn(
            EntityKind::Character,
            character.transform(),
            RenderPayload::Box {
                size: CHARACTER_PROXY_SIZE,
                color: CHARACTER_COLOR,
            },
        );

        let coins = CoinField::scatter(config.coins.clone(), &grid, &mut rng, &mut world);

        let mut camera = OrbitCamera::new(&config.camera);
        camera.follow(character.position, config.camera.character_look_height);

        let wrapper = WorldWrapper::new(grid.chunk_size())?;
        let cycle = DayNightCycle::new(&config.sky)?;
        let lighting = cycle.current();
        let lamps = LampDimmer::new(config.sky.lamps.clone());
        let modes = ModeSwitch::new(&config.vehicle);
        let timer = TickTimer::new(
            config.timing.history,
            Duration::from_millis(config.timing.spike_threshold_ms),
        );

        tracing::info!(
            buildings = populated.buildings,
            lights = populated.lights,
            coins = coins.total(),
            chunk = grid.chunk_size(),
            "simulation ready"
        );

        Ok(Self {
            config,
            world,
            colliders,
            grid,
            populated,
            character,
            vehicle,
            modes,
            camera,
            wrapper,
            cycle,
            lamps,
            lighting,
            coins,
            rig: AssetSlot::Pending,
            render_mode: RenderMode::default(),
            character_id,
            vehicle_id,
            timer,
            viewport: (1280, 720),
            running: true,
        })
    }

    /// Advance the whole simulation by `dt` seconds.
    ///
    /// `dt` is integrated as given: a long stall produces one large step.
    pub fn tick(&mut self, input: &mut InputState, dt: f32) -> TickReport {
        if !self.running {
            return TickReport {
                tick: self.world.tick(),
                mode: self.modes.mode(),
                ..TickReport::default()
            };
        }
        let _span = tracing::info_span!("sim_tick", tick = self.world.tick() + 1).entered();
        let mut report = TickReport::default();

        self.handle_input(input, &mut report);

        if self.modes.is_driving() {
            let controls = VehicleControls::from_input(input);
            let step = self
                .vehicle
                .update(&self.config.vehicle, controls, &self.colliders, dt);
            report.vehicle_collided = step.collided;
        } else {
            let respawn_at = self.vehicle.left_side(self.config.vehicle.exit_offset);
            let step = self.character.update(
                &self.config.character,
                input,
                self.camera.azimuth(),
                &self.colliders,
                respawn_at,
                dt,
            );
            report.character = Some(step);
        }

        let agent = self.active_position();
        report.coins_collected = self.coins.update(&mut self.world, agent, dt);

        self.follow_active();

        if let Some(offset) = self.wrapper.check(self.active_position()) {
            let participants: &mut [&mut dyn WorldShift] = &mut [
                &mut self.world,
                &mut self.colliders,
                &mut self.character,
                &mut self.vehicle,
            ];
            self.wrapper.apply(offset, participants);
            self.follow_active();
            report.wrapped = Some(offset);
        }

        self.cycle.advance(dt);
        self.lighting = self.cycle.current();
        let lamp = self.lamps.update(self.lighting.sun_intensity, dt);
        for (_, light) in self.world.iter_kind_mut(EntityKind::StreetLight) {
            light.payload.set_light_intensity(lamp);
        }

        self.sync_proxies(dt);

        self.world.step();
        self.timer.record_secs(dt);
        input.end_tick();

        report.tick = self.world.tick();
        report.mode = self.modes.mode();
        report.events = self.world.drain_events();
        tracing::trace!(
            tick = report.tick,
            x = self.active_position().x,
            z = self.active_position().z,
            "tick complete"
        );
        report
    }

    fn handle_input(&mut self, input: &mut InputState, report: &mut TickReport) {
        if input.just_pressed(Action::ToggleVehicle) {
            report.transition = Some(self.modes.toggle(
                &mut self.character,
                &mut self.vehicle,
                &self.config.character,
            ));
        }
        if input.just_pressed(Action::ToggleRenderMode) {
            self.render_mode = self.render_mode.toggled();
            report.render_mode_changed = true;
            tracing::info!(mode = self.render_mode.label(), "render mode toggled");
        }
        let delta = input.take_pointer_delta();
        if input.is_captured() && delta != Vec2::ZERO {
            self.camera.rotate(delta.x, delta.y);
        }
    }

    fn follow_active(&mut self) {
        let (target, height) = if self.modes.is_driving() {
            (self.vehicle.position, self.config.camera.vehicle_look_height)
        } else {
            (self.character.position, self.config.camera.character_look_height)
        };
        self.camera.follow(target, height);
    }

    fn sync_proxies(&mut self, dt: f32) {
        self.world
            .set_transform(self.vehicle_id, self.vehicle.transform());
        self.world
            .set_transform(self.character_id, self.character.transform());
        self.world
            .set_visible(self.character_id, self.character.visible);
        if let Some(rig) = self.rig.get_mut() {
            rig.update(&self.character, dt);
        }
    }

    /// Host callback for the character model load. The placeholder box is
    /// swapped for the model only on success.
    pub fn attach_rig(&mut self, result: Result<CharacterRig, String>) {
        if !self.rig.resolve("character rig", result) {
            return;
        }
        if let Some(rig) = self.rig.get() {
            if let Some(proxy) = self.world.get_mut(self.character_id) {
                proxy.payload = RenderPayload::Model {
                    asset: rig.asset.clone(),
                };
            }
        }
    }

    /// Viewport resize from the host.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera.set_aspect(width, height);
        if width > 0 && height > 0 {
            self.viewport = (width, height);
        }
    }

    /// Stop ticking and let go of all input.
    pub fn shutdown(&mut self, input: &mut InputState) {
        if !self.running {
            return;
        }
        input.release();
        self.running = false;
        tracing::info!(tick = self.world.tick(), "simulation shut down");
    }

    /// Frame description for the renderer.
    pub fn render_view(&self) -> RenderView {
        RenderView {
            background: self.lighting.background,
            sun_position: self.lighting.sun_position,
            hud: self.coins.hud_text(),
            ..RenderView::from_camera(&self.camera, self.render_mode)
        }
    }

    /// Position of whichever agent is being controlled.
    pub fn active_position(&self) -> Vec3 {
        if self.modes.is_driving() {
            self.vehicle.position
        } else {
            self.character.position
        }
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn colliders(&self) -> &ColliderIndex {
        &self.colliders
    }

    pub fn grid(&self) -> &CityGrid {
        &self.grid
    }

    pub fn populated(&self) -> PopulateStats {
        self.populated
    }

    pub fn character(&self) -> &Character {
        &self.character
    }

    /// Direct access for tooling, e.g. teleporting the character.
    pub fn character_mut(&mut self) -> &mut Character {
        &mut self.character
    }

    pub fn vehicle(&self) -> &Vehicle {
        &self.vehicle
    }

    /// Direct access for tooling, e.g. placing the vehicle.
    pub fn vehicle_mut(&mut self) -> &mut Vehicle {
        &mut self.vehicle
    }

    pub fn mode(&self) -> ControlMode {
        self.modes.mode()
    }

    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    pub fn lighting(&self) -> &LightingState {
        &self.lighting
    }

    pub fn cycle_mut(&mut self) -> &mut DayNightCycle {
        &mut self.cycle
    }

    pub fn lamp_intensity(&self) -> f32 {
        self.lamps.intensity()
    }

    pub fn coins(&self) -> &CoinField {
        &self.coins
    }

    pub fn rig(&self) -> &AssetSlot<CharacterRig> {
        &self.rig
    }

    pub fn render_mode(&self) -> RenderMode {
        self.render_mode
    }

    pub fn wrapper(&self) -> &WorldWrapper {
        &self.wrapper
    }

    pub fn timing(&self) -> TickStats {
        self.timer.stats()
    }

    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    pub fn tick_count(&self) -> u64 {
        self.world.tick()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }
}
