use rand::Rng;

use super::config::{ConfigError, GameConfig};
use super::direction::Direction;
use super::entity::{Entity, SpriteSet};
use super::grid::{Cell, Grid, Position};
use super::snake::Snake;
use super::spawner::FoodSpawner;
use crate::platform::{Audio, ImageId, InputState, Key, Renderer, SoundId};

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Escape or window close
    Quit,
    Wall,
    SelfCollision,
    /// No free cell left for food
    BoardFull,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Running,
    /// Terminal
    Stopped(StopReason),
}

/// Type of collision that ended a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionType {
    Wall,
    SelfCollision,
}

/// What happened during one movement tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepInfo {
    pub ate_food: bool,
    pub collision: Option<CollisionType>,
}

// Direction keys in the order they are examined; the last accepted one wins
const DIRECTION_KEYS: [(Key, Direction); 4] = [
    (Key::Left, Direction::Left),
    (Key::Right, Direction::Right),
    (Key::Up, Direction::Up),
    (Key::Down, Direction::Down),
];

/// One game from the starting snake to a terminal state.
///
/// Movement runs on a fixed timestep: `velocity * delta` cells of progress
/// accumulate every frame and each whole cell is one tick. Rendering has its
/// own accumulator and only happens once per render interval.
pub struct Session<R> {
    config: GameConfig,
    grid: Grid,
    sprites: SpriteSet,
    snake: Snake,
    food: Entity,
    spawner: FoodSpawner<R>,
    direction: Direction,
    state: SessionState,
    score: u32,
    velocity: f32,
    move_progress: f32,
    render_accumulator: f32,
    ticks: u64,
}

impl<R: Rng> Session<R> {
    pub fn new(config: GameConfig, sprites: SpriteSet, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;

        let grid = config.grid();
        let snake = Snake::new(&grid, &config.start_cells, config.start_direction, &sprites)?;
        let mut spawner = FoodSpawner::new(&grid, config.spawn, rng);
        let food_cell = spawner
            .spawn(&snake.cells())
            .ok_or(ConfigError::NoRoomForFood)?;
        let food = Entity::new(food_cell, Direction::Up, sprites.food);

        log::info!(
            "session started on a {}x{} board, snake length {}, velocity {} cells/s",
            grid.columns(),
            grid.rows(),
            snake.len(),
            config.velocity
        );

        Ok(Self {
            grid,
            sprites,
            snake,
            food,
            spawner,
            direction: config.start_direction,
            state: SessionState::Running,
            score: 0,
            velocity: config.velocity,
            move_progress: 0.0,
            // Render on the very first frame
            render_accumulator: config.render_interval(),
            ticks: 0,
            config,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn food(&self) -> &Entity {
        &self.food
    }

    pub fn food_cell(&self) -> Cell {
        self.food.cell
    }

    /// Direction the next tick will move in
    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == SessionState::Running
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Current speed in cells per second
    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    /// Movement ticks performed so far
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// One iteration of the game loop.
    ///
    /// Reads input, advances movement by `delta` seconds, plays sounds for
    /// what happened and draws a frame when the render interval has elapsed.
    pub fn frame<I, D, A>(
        &mut self,
        input: &I,
        delta: f32,
        renderer: &mut D,
        audio: &mut A,
    ) -> SessionState
    where
        I: InputState,
        D: Renderer,
        A: Audio,
    {
        if !self.is_running() {
            return self.state;
        }

        if input.has_quit_requested() || input.is_key_just_pressed(Key::Escape) {
            self.stop(StopReason::Quit);
            return self.state;
        }
        self.update_direction(input);

        let delta = delta.clamp(0.0, self.config.max_frame_delta);
        self.render_accumulator += delta;

        for step in self.advance(delta) {
            if step.ate_food {
                audio.play(SoundId::Eat);
            }
            if step.collision.is_some() {
                audio.play(SoundId::Crash);
            }
        }

        if self.render_accumulator >= self.config.render_interval() {
            self.draw(renderer);
            renderer.present_frame();
            self.render_accumulator = 0.0;
        }

        self.state
    }

    /// Apply the arrow keys to the held direction. A key reversing the
    /// snake's current heading is ignored.
    pub fn update_direction<I: InputState>(&mut self, input: &I) {
        for (key, direction) in DIRECTION_KEYS {
            if input.is_key_just_pressed(key) || input.is_key_held(key) {
                self.request_direction(direction);
            }
        }
    }

    /// Returns whether `direction` was accepted for the next tick.
    pub fn request_direction(&mut self, direction: Direction) -> bool {
        if self.snake.heading().is_opposite(direction) {
            return false;
        }
        self.direction = direction;
        true
    }

    /// Accumulate `velocity * delta` cells of movement and run a tick for every
    /// whole cell, stopping early if the session ends.
    pub fn advance(&mut self, delta: f32) -> Vec<StepInfo> {
        let mut steps = Vec::new();
        if !self.is_running() {
            return steps;
        }

        self.move_progress += self.velocity * delta;
        while self.move_progress >= 1.0 && self.is_running() {
            self.move_progress -= 1.0;
            steps.push(self.tick());
        }
        steps
    }

    /// Move one cell and resolve wall, self and food collisions.
    pub fn tick(&mut self) -> StepInfo {
        let mut info = StepInfo::default();
        if !self.is_running() {
            return info;
        }

        self.snake.step(self.direction);
        self.ticks += 1;

        if self.grid.is_out_of_bounds(self.snake.head_position()) {
            info.collision = Some(CollisionType::Wall);
            self.stop(StopReason::Wall);
            return info;
        }

        if self.config.self_collision
            && self
                .snake
                .check_self_collision(self.config.self_collision_buffer)
        {
            info.collision = Some(CollisionType::SelfCollision);
            self.stop(StopReason::SelfCollision);
            return info;
        }

        if self.config.food_collision && self.snake.head().overlaps(&self.food, &self.grid) {
            info.ate_food = true;
            self.eat();
        }

        info
    }

    /// Replace the current food item
    pub fn place_food(&mut self, cell: Cell) {
        self.food = Entity::new(cell, Direction::Up, self.sprites.food);
    }

    /// End the session. Has no effect once it is already stopped.
    pub fn stop(&mut self, reason: StopReason) {
        if !self.is_running() {
            return;
        }
        self.state = SessionState::Stopped(reason);
        log::info!(
            "session stopped ({reason:?}) after {} ticks, final score {}",
            self.ticks,
            self.score
        );
    }

    /// Background, snake, food, grid overlay and score, back to front
    pub fn draw<D: Renderer>(&self, renderer: &mut D) {
        renderer.draw_image(ImageId::Background, Position::default());

        // Tail first so the head ends up on top
        for segment in self.snake.segments().iter().rev() {
            renderer.draw_image(segment.sprite.image, segment.position(&self.grid));
        }
        renderer.draw_image(self.food.sprite.image, self.food.position(&self.grid));

        let size = self.grid.cell_size();
        for cell in self.grid.cells() {
            renderer.draw_rect(self.grid.cell_to_pixel(cell), (size, size));
        }

        renderer.draw_text(&format!("Score: {}", self.score), Position::new(8.0, 20.0));
    }

    fn eat(&mut self) {
        self.score += 1;
        self.velocity += self.config.acceleration;
        self.snake.grow();
        log::debug!(
            "food eaten at {:?}, score {}, velocity {}",
            self.food_cell(),
            self.score,
            self.velocity
        );

        match self.spawner.spawn(&self.snake.cells()) {
            Some(cell) => self.place_food(cell),
            None => self.stop(StopReason::BoardFull),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    #[derive(Default)]
    struct FakeInput {
        pressed: HashSet<Key>,
        held: HashSet<Key>,
        quit: bool,
    }

    impl FakeInput {
        fn holding(keys: &[Key]) -> Self {
            Self {
                held: keys.iter().copied().collect(),
                ..Default::default()
            }
        }
    }

    impl InputState for FakeInput {
        fn is_key_just_pressed(&self, key: Key) -> bool {
            self.pressed.contains(&key)
        }

        fn is_key_held(&self, key: Key) -> bool {
            self.held.contains(&key)
        }

        fn has_quit_requested(&self) -> bool {
            self.quit
        }
    }

    #[derive(Default)]
    struct RecordingRenderer {
        images: Vec<ImageId>,
        rects: usize,
        presented: usize,
    }

    impl Renderer for RecordingRenderer {
        fn draw_image(&mut self, image: ImageId, _position: Position) {
            self.images.push(image);
        }

        fn draw_rect(&mut self, _position: Position, _size: (f32, f32)) {
            self.rects += 1;
        }

        fn draw_text(&mut self, _text: &str, _position: Position) {}

        fn present_frame(&mut self) {
            self.presented += 1;
        }
    }

    #[derive(Default)]
    struct RecordingAudio {
        played: Vec<SoundId>,
    }

    impl Audio for RecordingAudio {
        fn play(&mut self, sound: SoundId) {
            self.played.push(sound);
        }

        fn play_looped(&mut self, sound: SoundId) {
            self.played.push(sound);
        }

        fn stop(&mut self, _sound: SoundId) {}
    }

    fn session(config: GameConfig) -> Session<StdRng> {
        let sprites = SpriteSet::cell_sized(config.cell_size);
        Session::new(config, sprites, StdRng::seed_from_u64(42)).unwrap()
    }

    fn config_with_snake(cells: &[(i32, i32)], heading: Direction) -> GameConfig {
        GameConfig {
            start_cells: cells.iter().map(|&(c, r)| Cell::new(c, r)).collect(),
            start_direction: heading,
            ..GameConfig::default()
        }
    }

    fn head_cell(session: &Session<StdRng>) -> Cell {
        session.snake().head_cell()
    }

    #[test]
    fn test_new_session() {
        let session = session(GameConfig::default());
        assert!(session.is_running());
        assert_eq!(session.score(), 0);
        assert_eq!(session.snake().len(), 3);
        assert_eq!(session.direction(), Direction::Down);

        let food = session.food_cell();
        assert!(!session.snake().cells().contains(&food));
    }

    #[test]
    fn test_invalid_config_aborts_start() {
        let config = GameConfig::new(1, 1);
        let result = Session::new(config, SpriteSet::cell_sized(32.0), StdRng::seed_from_u64(1));
        assert!(matches!(result, Err(ConfigError::BoardTooSmall { .. })));
    }

    #[test]
    fn test_prevent_180_degree_turn() {
        let mut session = session(config_with_snake(&[(5, 5), (6, 5), (7, 5)], Direction::Left));
        session.update_direction(&FakeInput::holding(&[Key::Right]));
        assert_eq!(session.direction(), Direction::Left);

        session.update_direction(&FakeInput::holding(&[Key::Up]));
        assert_eq!(session.direction(), Direction::Up);
    }

    #[test]
    fn test_turn_cannot_chain_into_reverse() {
        // Heading up: Left is accepted, Down still reverses the heading
        let mut session = session(config_with_snake(&[(5, 5), (5, 6), (5, 7)], Direction::Up));
        session.update_direction(&FakeInput::holding(&[Key::Left, Key::Down]));
        assert_eq!(session.direction(), Direction::Left);
        session.tick();
        assert_eq!(head_cell(&session), Cell::new(4, 5));
    }

    #[test]
    fn test_just_pressed_counts_as_input() {
        let mut session = session(GameConfig::default());
        let input = FakeInput {
            pressed: [Key::Right].into_iter().collect(),
            ..Default::default()
        };
        session.update_direction(&input);
        assert_eq!(session.direction(), Direction::Right);
    }

    #[test]
    fn test_wall_scenario() {
        let mut session = session(config_with_snake(&[(3, 2), (3, 1), (3, 0)], Direction::Up));
        let (mut renderer, mut audio) = (RecordingRenderer::default(), RecordingAudio::default());
        let input = FakeInput::default();

        // 4 cells/s at 0.25 s per frame is one tick per frame
        assert_eq!(session.frame(&input, 0.25, &mut renderer, &mut audio), SessionState::Running);
        assert_eq!(head_cell(&session), Cell::new(3, 1));
        assert_eq!(session.frame(&input, 0.25, &mut renderer, &mut audio), SessionState::Running);
        assert_eq!(head_cell(&session), Cell::new(3, 0));
        assert_eq!(
            session.frame(&input, 0.25, &mut renderer, &mut audio),
            SessionState::Stopped(StopReason::Wall)
        );
        assert_eq!(session.ticks(), 3);
        assert_eq!(audio.played, vec![SoundId::Crash]);
    }

    #[test]
    fn test_wall_with_fractional_cell_size() {
        for cell_size in [10.3, 7.7, 0.1] {
            let mut config = config_with_snake(&[(2, 1), (1, 1), (0, 1)], Direction::Right);
            config.columns = 40;
            config.cell_size = cell_size;
            config.food_collision = false;
            let mut session = session(config);

            // Columns 3..=38 are safe, column 39 is lethal
            while session.is_running() {
                let step = session.tick();
                if session.is_running() {
                    assert_eq!(step.collision, None);
                }
            }
            assert_eq!(session.state(), SessionState::Stopped(StopReason::Wall));
            assert_eq!(session.ticks(), 37, "cell size {cell_size}");
            assert_eq!(head_cell(&session), Cell::new(39, 1));
        }
    }

    #[test]
    fn test_food_consumption() {
        let mut session = session(GameConfig::default());
        let ahead = head_cell(&session).moved_in_direction(session.direction());
        session.place_food(ahead);
        let (length, velocity) = (session.snake().len(), session.velocity());

        let step = session.tick();

        assert!(step.ate_food);
        assert_eq!(session.score(), 1);
        assert_eq!(session.velocity(), velocity + session.config().acceleration);
        assert_eq!(session.snake().len(), length + 1);
        assert_ne!(session.food_cell(), ahead);
        assert!(session.is_running());
    }

    #[test]
    fn test_food_collision_can_be_disabled() {
        let mut session = session(GameConfig {
            food_collision: false,
            ..GameConfig::default()
        });
        let ahead = head_cell(&session).moved_in_direction(session.direction());
        session.place_food(ahead);

        assert!(!session.tick().ate_food);
        assert_eq!(session.score(), 0);
        assert_eq!(session.snake().len(), 3);
    }

    #[test]
    fn test_self_collision_ends_session() {
        let coil = [(6, 5), (5, 5), (4, 5), (3, 5), (2, 5)];
        let mut session = session(config_with_snake(&coil, Direction::Right));
        session.place_food(Cell::new(15, 15));

        for direction in [Direction::Down, Direction::Left, Direction::Up] {
            session.request_direction(direction);
            session.tick();
        }
        assert_eq!(session.state(), SessionState::Stopped(StopReason::SelfCollision));
    }

    #[test]
    fn test_self_collision_can_be_disabled() {
        let coil = [(6, 5), (5, 5), (4, 5), (3, 5), (2, 5)];
        let mut config = config_with_snake(&coil, Direction::Right);
        config.self_collision = false;
        let mut session = session(config);
        session.place_food(Cell::new(15, 15));

        for direction in [Direction::Down, Direction::Left, Direction::Up] {
            session.request_direction(direction);
            session.tick();
        }
        assert!(session.is_running());
    }

    #[test]
    fn test_render_cadence_is_decoupled() {
        let mut session = session(GameConfig {
            render_fps: 10.0,
            ..GameConfig::default()
        });
        let (mut renderer, mut audio) = (RecordingRenderer::default(), RecordingAudio::default());
        let input = FakeInput::default();

        session.frame(&input, 0.04, &mut renderer, &mut audio);
        assert_eq!(renderer.presented, 1);
        session.frame(&input, 0.04, &mut renderer, &mut audio);
        session.frame(&input, 0.04, &mut renderer, &mut audio);
        assert_eq!(renderer.presented, 1);
        session.frame(&input, 0.04, &mut renderer, &mut audio);
        assert_eq!(renderer.presented, 2);
    }

    #[test]
    fn test_draw_order() {
        let session = session(GameConfig::default());
        let mut renderer = RecordingRenderer::default();
        session.draw(&mut renderer);

        assert_eq!(
            renderer.images,
            vec![
                ImageId::Background,
                ImageId::SnakeBody,
                ImageId::SnakeBody,
                ImageId::SnakeHead,
                ImageId::Food,
            ]
        );
        assert_eq!(renderer.rects, 400);
    }

    #[test]
    fn test_quit_stops_without_rendering() {
        let mut session = session(GameConfig::default());
        let (mut renderer, mut audio) = (RecordingRenderer::default(), RecordingAudio::default());
        let input = FakeInput {
            pressed: [Key::Escape].into_iter().collect(),
            ..Default::default()
        };

        let state = session.frame(&input, 0.1, &mut renderer, &mut audio);
        assert_eq!(state, SessionState::Stopped(StopReason::Quit));
        assert_eq!(renderer.presented, 0);

        let closed = FakeInput {
            quit: true,
            ..Default::default()
        };
        let mut session = self::session(GameConfig::default());
        session.frame(&closed, 0.1, &mut renderer, &mut audio);
        assert_eq!(session.state(), SessionState::Stopped(StopReason::Quit));
    }

    #[test]
    fn test_large_delta_is_clamped() {
        let mut session = session(GameConfig::default());
        let (mut renderer, mut audio) = (RecordingRenderer::default(), RecordingAudio::default());

        session.frame(&FakeInput::default(), 10.0, &mut renderer, &mut audio);
        assert_eq!(session.ticks(), 1);
    }

    #[test]
    fn test_board_full_stops_session() {
        // 3x3 board leaves a 2x2 playable area
        let mut config = GameConfig::new(3, 3);
        config.start_cells = vec![Cell::new(0, 1), Cell::new(0, 0), Cell::new(1, 0)];
        config.start_direction = Direction::Down;
        let mut session = session(config);
        assert_eq!(session.food_cell(), Cell::new(1, 1));

        session.request_direction(Direction::Right);
        assert!(session.tick().ate_food);
        assert_eq!(session.food_cell(), Cell::new(1, 0));

        session.request_direction(Direction::Up);
        assert!(session.tick().ate_food);
        assert_eq!(session.state(), SessionState::Stopped(StopReason::BoardFull));
        assert_eq!(session.score(), 2);
    }

    #[test]
    fn test_stopped_session_ignores_frames() {
        let mut session = session(GameConfig::default());
        session.stop(StopReason::Quit);
        session.stop(StopReason::Wall);
        assert_eq!(session.state(), SessionState::Stopped(StopReason::Quit));

        let (mut renderer, mut audio) = (RecordingRenderer::default(), RecordingAudio::default());
        session.frame(&FakeInput::default(), 1.0, &mut renderer, &mut audio);
        assert_eq!(session.ticks(), 0);
        assert_eq!(renderer.presented, 0);
    }
}
