//! BLOCKFALL - a falling-block puzzle game for the terminal

mod audio;
mod bag;
mod board;
mod clock;
mod game;
mod highscore;
mod input;
mod piece;
mod score;
mod settings;
mod snapshot;
mod tetromino;
mod ui;

use audio::AudioManager;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use game::{Action, Game};
use highscore::FileHighScore;
use input::KeyBindings;
use ratatui::{Terminal, backend::CrosstermBackend};
use settings::Settings;
use std::{
    io::{self, stdout},
    time::{Duration, Instant},
};
use tracing_subscriber::EnvFilter;

/// Target frame rate
const TARGET_FPS: u64 = 60;
const FRAME_DURATION: Duration = Duration::from_micros(1_000_000 / TARGET_FPS);

/// Directory for session logs, created if needed
fn blockfall_temp_dir() -> std::path::PathBuf {
    let dir = std::env::temp_dir().join("blockfall");
    let _ = std::fs::create_dir_all(&dir);
    dir
}

fn main() -> io::Result<()> {
    let session_id: u32 = rand::random();

    // The terminal owns stdout, so logs go to a file
    let log_dir = blockfall_temp_dir();
    let log_file = format!("{:08x}.log", session_id);
    let file_appender = tracing_appender::rolling::never(&log_dir, &log_file);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("blockfall=debug")),
        )
        .with_ansi(false)
        .init();

    tracing::info!(
        "BLOCKFALL starting up, session={:08x}, log={}",
        session_id,
        log_dir.join(&log_file).display()
    );

    let settings = Settings::load();
    let keys = KeyBindings::from_settings(&settings);

    // Audio is optional - the game works without it
    let mut audio = AudioManager::new();
    if let Some(a) = audio.as_mut() {
        a.set_sfx_volume(settings.audio.sfx_volume as f32 / 100.0);
    }

    let mut game = Game::new(Box::new(FileHighScore::new()));
    if settings.audio.muted {
        game.toggle_mute();
        game.drain_cues();
    }

    // Setup terminal
    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, &mut game, &keys, &settings, &mut audio);

    // Restore terminal
    disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen)?;

    if let Err(e) = &result {
        tracing::error!("terminal error: {}", e);
    }

    println!("\nThanks for playing BLOCKFALL!");
    if let Some(score) = game.final_score() {
        println!("Game over with {} points", score);
    }
    println!("Score: {} | Best: {}", game.score.points, game.high_score());
    println!("Level: {} | Lines: {}", game.score.level, game.score.lines);
    tracing::info!("shutting down with score {}", game.score.points);

    result
}

/// Frame loop: advance timers, play cues, draw, then take input until the
/// next frame is due
fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    game: &mut Game,
    keys: &KeyBindings,
    settings: &Settings,
    audio: &mut Option<AudioManager>,
) -> io::Result<()> {
    let mut last_frame = Instant::now();

    loop {
        let now = Instant::now();
        game.tick(now.duration_since(last_frame));
        last_frame = now;

        for cue in game.drain_cues() {
            if let Some(audio) = audio.as_mut() {
                audio.play_sfx(cue);
            }
        }

        let snap = game.snapshot();
        terminal.draw(|frame| ui::render_game(frame, &snap, settings))?;

        // Every key that arrives before the next frame is applied at once
        let deadline = now + FRAME_DURATION;
        loop {
            let timeout = deadline.saturating_duration_since(Instant::now());
            if !event::poll(timeout)? {
                break;
            }
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match keys.action_for(key) {
                    Some(Action::Quit) => return Ok(()),
                    Some(action) => game.process_action(action),
                    None => {}
                }
            }
        }
    }
}
