//! Crossterm front end: owns the screen, turns key events into input
//! snapshots and runs the fixed-rate loop around [`Session::tick`].

mod input;
mod render;

use std::io::{self, Stdout};
use std::thread;
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, Show};
use crossterm::event::{
    self, Event, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
    PushKeyboardEnhancementFlags,
};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;
use maze_chase::{AppError, Config, Session};
use tracing::info;

use self::input::{Command, KeyHold};
use self::render::Renderer;

pub fn play(config: &Config) -> Result<(), AppError> {
    let mut rng = rand::thread_rng();
    let session = Session::new(config.columns, config.rows, &mut rng)?;

    let mut stdout = io::stdout();
    terminal::enable_raw_mode()?;
    stdout.execute(EnterAlternateScreen)?;
    stdout.execute(Hide)?;
    let reports_release = terminal::supports_keyboard_enhancement().unwrap_or(false);
    if reports_release {
        stdout.execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))?;
    }

    let result = run(&mut stdout, config, session, reports_release);

    if reports_release {
        stdout.execute(PopKeyboardEnhancementFlags)?;
    }
    stdout.execute(Show)?;
    stdout.execute(LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;
    result.map_err(AppError::from)
}

fn run(
    stdout: &mut Stdout,
    config: &Config,
    mut session: Session,
    reports_release: bool,
) -> io::Result<()> {
    let mut rng = rand::thread_rng();
    let mut keys = KeyHold::new(reports_release);
    let mut renderer = Renderer::new(config.columns, config.rows);
    let tick = Duration::from_millis(config.tick_ms);
    let frame_time = Duration::from_micros(1_000_000 / config.render_fps.max(1));
    let mut last_tick = Instant::now();

    info!(
        columns = config.columns,
        rows = config.rows,
        tick_ms = config.tick_ms,
        reports_release,
        "terminal ready"
    );

    loop {
        let frame_start = Instant::now();
        while event::poll(Duration::from_millis(0))? {
            if let Event::Key(key) = event::read()? {
                match keys.handle(key, Instant::now()) {
                    Some(Command::Quit) => {
                        info!("quit requested");
                        return Ok(());
                    }
                    Some(Command::Start) => {
                        session.start_or_restart(&mut rng);
                    }
                    None => {}
                }
            }
        }

        if last_tick.elapsed() >= tick {
            last_tick = Instant::now();
            let input = keys.snapshot(last_tick);
            session.tick(&input, &mut rng);
        }
        renderer.render(stdout, &session)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_time {
            thread::sleep(frame_time - elapsed);
        }
    }
}
