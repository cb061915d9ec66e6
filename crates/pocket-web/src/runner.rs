use pocket_engine::{
    AssetManifest, EngineContext, FixedTimestep, Game, GameConfig, InputEvent, InputQueue,
    ProtocolLayout, RenderBuffer, RequestId, TextureHandle,
};
use pocket_engine::bridge::protocol::{
    HEADER_EVENT_COUNT, HEADER_FLOATS, HEADER_FRAME_COUNTER, HEADER_INSTANCE_COUNT,
    HEADER_PENDING_TEXTURES,
};
use pocket_engine::systems::render::build_render_buffer;

/// Generic game runner that wires up the engine loop.
///
/// Each concrete game (e.g., `pool-table`) creates a `thread_local!` GameRunner
/// and exports free functions via `#[wasm_bindgen]`, because wasm-bindgen
/// cannot export generic structs directly.
pub struct GameRunner<G: Game> {
    game: G,
    ctx: EngineContext,
    input: InputQueue,
    render_buffer: RenderBuffer,
    timestep: FixedTimestep,
    config: GameConfig,
    layout: ProtocolLayout,
    header: [f32; HEADER_FLOATS],
    initialized: bool,
    frame: u64,
}

impl<G: Game> GameRunner<G> {
    pub fn new(game: G) -> Self {
        let config = game.config();
        let timestep = FixedTimestep::new(config.fixed_dt);
        let layout = ProtocolLayout::from_config(&config);

        Self {
            game,
            ctx: EngineContext::with_config(&config),
            input: InputQueue::new(),
            render_buffer: RenderBuffer::with_capacity(config.max_instances),
            timestep,
            header: layout.initial_header(),
            layout,
            config,
            initialized: false,
            frame: 0,
        }
    }

    /// Initialize the game. Call once after construction.
    pub fn init(&mut self) {
        self.game.init(&mut self.ctx);
        self.ctx.apply_textures();
        build_render_buffer(
            self.ctx.scene.iter(),
            &mut self.render_buffer,
            self.layout.max_instances,
        );
        self.write_header();
        self.initialized = true;
    }

    /// Push an input event into the queue.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Swap in an asset manifest. A bad manifest is logged and ignored.
    pub fn load_manifest(&mut self, json: &str) {
        match AssetManifest::from_json(json) {
            Ok(manifest) => {
                self.ctx.textures.set_manifest(manifest);
                self.ctx.textures.request_environment();
            }
            Err(err) => log::warn!("ignoring asset manifest: {}", err),
        }
    }

    /// Run one frame: fixed physics steps each followed by a game update,
    /// then texture hand-in and the render buffer.
    pub fn tick(&mut self, dt: f32) {
        if !self.initialized {
            return;
        }

        self.ctx.clear_frame_data();

        let steps = self.timestep.accumulate(dt);
        for _ in 0..steps {
            #[cfg(feature = "physics")]
            self.ctx.step_physics();
            self.game.update(&mut self.ctx, &self.input);
        }

        // Input only counts once a step has seen it.
        if steps > 0 {
            self.input.drain();
        }

        self.ctx.apply_textures();
        build_render_buffer(
            self.ctx.scene.iter(),
            &mut self.render_buffer,
            self.layout.max_instances,
        );
        self.frame += 1;
        self.write_header();
    }

    /// Refresh the per-frame header slots. Capacities and version were
    /// filled in at construction.
    fn write_header(&mut self) {
        let events = self.game_events_len();
        self.header[HEADER_FRAME_COUNTER] = self.frame as f32;
        self.header[HEADER_INSTANCE_COUNT] = self.render_buffer.instance_count() as f32;
        self.header[HEADER_EVENT_COUNT] = events as f32;
        self.header[HEADER_PENDING_TEXTURES] = self.ctx.textures.pending_count() as f32;
    }

    // ---- Texture hand-off ----

    /// Pending texture loads as a JSON array of `{id, path, target}`.
    pub fn take_texture_requests(&mut self) -> String {
        match self.ctx.textures.pending_json() {
            Ok(json) => json,
            Err(err) => {
                log::warn!("could not encode texture requests: {}", err);
                "[]".to_string()
            }
        }
    }

    /// The host finished loading request `request` as texture `texture`.
    pub fn texture_loaded(&mut self, request: u32, texture: u32) {
        self.ctx.textures.complete(RequestId(request), TextureHandle(texture));
    }

    pub fn texture_failed(&mut self, request: u32, reason: &str) {
        self.ctx.textures.fail(RequestId(request), reason);
    }

    // ---- Pointer accessors for SharedArrayBuffer reads ----

    pub fn header(&self) -> &[f32; HEADER_FLOATS] {
        &self.header
    }

    pub fn header_ptr(&self) -> *const f32 {
        self.header.as_ptr()
    }

    pub fn instances_ptr(&self) -> *const f32 {
        self.render_buffer.instances_ptr()
    }

    pub fn instance_count(&self) -> u32 {
        self.render_buffer.instance_count()
    }

    pub fn game_events_ptr(&self) -> *const f32 {
        self.ctx.events.as_ptr() as *const f32
    }

    /// Events this frame, capped at the protocol's event capacity.
    pub fn game_events_len(&self) -> u32 {
        self.ctx.events.len().min(self.layout.max_events) as u32
    }

    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    pub fn fixed_dt(&self) -> f32 {
        self.config.fixed_dt
    }

    // ---- Capacity accessors (read by TypeScript via wasm_bindgen exports) ----

    pub fn max_instances(&self) -> u32 {
        self.layout.max_instances as u32
    }

    pub fn max_events(&self) -> u32 {
        self.layout.max_events as u32
    }

    pub fn buffer_total_floats(&self) -> u32 {
        self.layout.buffer_total_floats as u32
    }

    pub fn context(&self) -> &EngineContext {
        &self.ctx
    }

    pub fn game(&self) -> &G {
        &self.game
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pocket_engine::{GameEvent, Mesh, SphereGeometry, StandardMaterial, TextureSource};

    /// Counts updates and drops one textured mesh into the scene.
    struct Probe {
        updates: u32,
        saw_key: bool,
    }

    impl Game for Probe {
        fn init(&mut self, ctx: &mut EngineContext) {
            let mesh = ctx.scene.spawn(Mesh::new(
                SphereGeometry::new(0.03, 16, 16),
                StandardMaterial::default(),
            ));
            ctx.textures.load("1ball.png", mesh);
        }

        fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue) {
            self.updates += 1;
            self.saw_key |= input.key_pressed(82);
            ctx.emit_event(GameEvent::new(1.0, self.updates as f32));
        }
    }

    fn runner() -> GameRunner<Probe> {
        let mut runner = GameRunner::new(Probe { updates: 0, saw_key: false });
        runner.init();
        runner
    }

    #[test]
    fn tick_runs_fixed_steps() {
        let mut runner = runner();
        runner.tick(1.0 / 60.0);
        assert_eq!(runner.game().updates, 1);
        assert_eq!(runner.game_events_len(), 1);
        runner.tick(0.001);
        assert_eq!(runner.game().updates, 1);
        assert_eq!(runner.game_events_len(), 0, "events are per frame");
    }

    #[test]
    fn input_reaches_update() {
        let mut runner = runner();
        runner.push_input(InputEvent::KeyDown { key_code: 82 });
        runner.tick(1.0 / 60.0);
        assert!(runner.game().saw_key);
    }

    #[test]
    fn no_ticks_before_init() {
        let mut runner = GameRunner::new(Probe { updates: 0, saw_key: false });
        runner.tick(1.0);
        assert_eq!(runner.game().updates, 0);
    }

    #[test]
    fn texture_round_trip() {
        let mut runner = runner();
        let json = runner.take_texture_requests();
        assert!(json.contains("./assets/pool-table/1ball.png"), "got {}", json);
        assert_eq!(runner.take_texture_requests(), "[]");

        runner.texture_loaded(1, 6);
        runner.tick(1.0 / 60.0);
        let mesh = runner.context().scene.iter().next().unwrap();
        assert_eq!(mesh.material.map, Some(TextureHandle(6)));
        assert_eq!(runner.instance_count(), 1);
    }

    #[test]
    fn header_tracks_frame_state() {
        use pocket_engine::bridge::protocol::{HEADER_MAX_INSTANCES, HEADER_PROTOCOL_VERSION, PROTOCOL_VERSION};

        let mut runner = runner();
        assert_eq!(runner.header()[HEADER_MAX_INSTANCES], 64.0);
        assert_eq!(runner.header()[HEADER_PROTOCOL_VERSION], PROTOCOL_VERSION);
        assert_eq!(runner.header()[HEADER_PENDING_TEXTURES], 1.0, "texture queued in init");
        assert_eq!(runner.header()[HEADER_INSTANCE_COUNT], 1.0);

        runner.take_texture_requests();
        runner.tick(1.0 / 60.0);
        assert_eq!(runner.header()[HEADER_FRAME_COUNTER], 1.0);
        assert_eq!(runner.header()[HEADER_EVENT_COUNT], 1.0);
        assert_eq!(runner.header()[HEADER_PENDING_TEXTURES], 0.0);
    }

    #[test]
    fn manifest_changes_paths_and_bad_json_is_ignored() {
        let mut runner = runner();
        runner.load_manifest("{ nope");
        runner.load_manifest(r#"{ "texture_base_path": "/t/", "environment": "env.hdr" }"#);
        let json = runner.take_texture_requests();
        assert!(json.contains("/t/1ball.png"), "got {}", json);
        assert!(json.contains("/t/env.hdr"), "got {}", json);
    }
}
