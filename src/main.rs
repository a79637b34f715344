//! Egg Flight entry point
//!
//! The browser build is driven from JavaScript through `egg_flight::web`.
//! Natively this runs a headless autoplay session: a scripted player that
//! catches most eggs and misses some, until the game is over.

#[cfg(not(target_arch = "wasm32"))]
mod autoplay {
    use std::collections::VecDeque;

    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    use egg_flight::consts::EGG_STAGES;
    use egg_flight::identity::LocalIdentity;
    use egg_flight::scenes::{Button, DisplayCommand};
    use egg_flight::sim::{EggKey, Scene};
    use egg_flight::{Game, GameConfig, HighscoreService, InMemoryHighscores};

    /// Chance the scripted player catches a falling egg
    const CATCH_CHANCE: f64 = 0.9;
    /// Safety stop for the autoplay loop
    const MAX_EGGS: usize = 5_000;

    /// Stands in for the display layer: finishes every exit animation at once
    /// and keeps the eggs that are still falling.
    fn render(game: &mut Game, falling: &mut VecDeque<EggKey>) {
        loop {
            let commands = game.take_commands();
            if commands.is_empty() {
                return;
            }
            for command in commands {
                match command {
                    DisplayCommand::TeardownScene { scene } => {
                        game.scene_removed(scene);
                    }
                    DisplayCommand::SpawnEgg { egg, launch } => {
                        log::debug!(
                            "Egg {}/{} drops after {:.2}s at {:.0} px/s",
                            egg.generation,
                            egg.id,
                            launch.delay_secs,
                            launch.fall_speed
                        );
                        falling.push_back(egg);
                    }
                    DisplayCommand::ClearEggs => falling.clear(),
                    DisplayCommand::ShowLevelLabel { level } => log::info!("Level {}", level),
                    DisplayCommand::AttachScene { view } => {
                        log::info!("Showing {}", view.scene().as_str());
                    }
                    DisplayCommand::ShowScores { rows } => {
                        for row in rows {
                            log::info!("#{:<2} {:<16} {}", row.rank, row.player, row.score);
                        }
                    }
                    DisplayCommand::ShowSubmission { status } => {
                        log::info!("Submission: {:?}", status);
                    }
                    other => log::trace!("{:?}", other),
                }
            }
        }
    }

    pub fn run(seed: u64) {
        let mut game = match Game::new(GameConfig::load(), seed) {
            Ok(game) => game,
            Err(e) => {
                log::error!("Invalid configuration: {}", e);
                return;
            }
        };
        let mut rng = Pcg32::seed_from_u64(seed.wrapping_add(1));
        let mut falling = VecDeque::new();
        let mut identity = LocalIdentity::new("autoplay", "Autoplay");
        let mut board = InMemoryHighscores::load();

        game.start();
        render(&mut game, &mut falling);
        game.press(Button::Play);
        render(&mut game, &mut falling);

        let mut dropped = 0;
        while game.snapshot().scene == Scene::Playing && dropped < MAX_EGGS {
            let Some(egg) = falling.pop_front() else {
                log::warn!("No eggs left in flight");
                break;
            };
            dropped += 1;
            if rng.random_bool(CATCH_CHANCE) {
                for _ in 0..EGG_STAGES {
                    game.tap(egg);
                }
            } else {
                game.ground_reached(egg);
            }
            render(&mut game, &mut falling);
        }

        let snapshot = game.snapshot();
        log::info!(
            "Game over after {} eggs: score {}, level {}",
            dropped,
            snapshot.score,
            snapshot.level
        );

        game.press(Button::Submit);
        if let Err(e) = game.submit_highscore(&mut identity, &mut board) {
            log::warn!("Highscore not submitted: {}", e);
        }
        render(&mut game, &mut falling);

        game.press(Button::Menu);
        render(&mut game, &mut falling);
        game.press(Button::Highscores);
        render(&mut game, &mut falling);
        game.load_highscores(&board);
        render(&mut game, &mut falling);

        match board.top_scores(1) {
            Ok(top) => {
                if let Some(best) = top.first() {
                    log::info!("Best score so far: {} by {}", best.score, best.player.label());
                }
            }
            Err(e) => log::warn!("Could not read highscores: {}", e),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Egg Flight (native) starting...");
    log::info!("Native mode plays a headless demo; build for wasm32 to play in the browser");

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(12345);
    autoplay::run(seed);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is egg_flight::web::wasm_main, this is just to satisfy the compiler
}
