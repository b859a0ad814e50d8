use std::io::{self, Stdout};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use parking_lot::RwLock;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Terminal;

use crate::audio::{AudioEngine, SharedState};
use crate::command::{Command, CommandSender};
use crate::event::EventLog;
use crate::sample::{default_sample, load_wav};
use crate::sequencer::{ROWS, SLICERS};
use crate::ui::{render_grid, render_slicers, render_transport, render_waveform, GridCursor, Palette};

const BPM_STEP: f32 = 5.0;
const START_STEP: f32 = 2.0;
const DURATION_STEP: f32 = 10.0;
const STATUS_TIMEOUT: Duration = Duration::from_secs(3);

const KEY_HINTS: &str =
    " space play/stop | arrows move | x toggle | c clear | r randomize | +/- bpm | [/] start | ,/. duration | o load | q quit";

/// Line editor for the sample path prompt on the status line
struct PathPrompt {
    buffer: String,
    open: bool,
}

impl PathPrompt {
    fn new() -> Self {
        Self {
            buffer: String::new(),
            open: false,
        }
    }

    fn open(&mut self, prefill: &str) {
        self.buffer = prefill.to_string();
        self.open = true;
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn text(&self) -> &str {
        &self.buffer
    }

    /// Feed one key press. Returns the entered path on Enter; Esc
    /// cancels. Either way the prompt closes itself.
    fn input(&mut self, code: KeyCode) -> Option<PathBuf> {
        match code {
            KeyCode::Char(c) => {
                self.buffer.push(c);
                None
            }
            KeyCode::Backspace => {
                self.buffer.pop();
                None
            }
            KeyCode::Enter => {
                self.open = false;
                if self.buffer.is_empty() {
                    None
                } else {
                    Some(PathBuf::from(self.buffer.clone()))
                }
            }
            KeyCode::Esc => {
                self.open = false;
                None
            }
            _ => None,
        }
    }
}

/// Application state
pub struct App {
    /// Audio engine (kept alive for the stream)
    audio: AudioEngine,
    /// Command sender for dispatching to the audio thread
    command_sender: CommandSender,
    /// Recent user actions for the footer
    event_log: EventLog,
    /// Shared sequencer state (written by the audio thread)
    shared_state: Arc<RwLock<SharedState>>,
    /// Grid navigation
    cursor: GridCursor,
    /// Sample path entry ('o')
    prompt: PathPrompt,
    /// Path of the last successfully loaded sample
    sample_path: Option<PathBuf>,
    /// Colors
    palette: Palette,
    /// Whether the app should quit
    should_quit: bool,
    /// Temporary status message (e.g. decode errors)
    status_message: Option<(String, Instant)>,
}

impl App {
    pub fn new(
        audio: AudioEngine,
        command_sender: CommandSender,
        bpm: f32,
        sample: Option<PathBuf>,
    ) -> Self {
        let shared_state = audio.state.clone();
        let mut app = Self {
            audio,
            command_sender,
            event_log: EventLog::new(),
            shared_state,
            cursor: GridCursor::new(),
            prompt: PathPrompt::new(),
            sample_path: None,
            palette: Palette::default(),
            should_quit: false,
            status_message: None,
        };

        app.dispatch(Command::SetBpm(bpm));
        // The original falls back to a bundled sample.wav when the user
        // has not supplied one
        match sample {
            Some(path) => app.load_sample(&path),
            None => app.load_default_sample(),
        }
        // The original starts off with a random pattern and slicer layout
        app.dispatch(Command::Randomize);
        app
    }

    /// Decode a WAV on this thread and hand the asset to the engine. On
    /// failure nothing is sent, so whatever was loaded before stays
    /// playable.
    fn load_sample(&mut self, path: &Path) {
        match load_wav(path, self.audio.sample_rate()) {
            Ok(asset) => {
                self.sample_path = Some(path.to_path_buf());
                self.dispatch(Command::LoadSample(Box::new(asset)));
            }
            Err(e) => {
                self.set_status(format!("Load failed: {:#}", e));
            }
        }
    }

    fn load_default_sample(&mut self) {
        match default_sample(self.audio.sample_rate()) {
            Ok(asset) => self.dispatch(Command::LoadSample(Box::new(asset))),
            Err(e) => self.set_status(format!("Load failed: {:#}", e)),
        }
    }

    /// Run the main application loop
    pub fn run(&mut self) -> Result<()> {
        let mut terminal = Self::setup_terminal()?;
        let result = self.main_loop(&mut terminal);
        Self::restore_terminal(&mut terminal)?;
        result
    }

    /// Setup the terminal for TUI
    fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        stdout.execute(EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(terminal)
    }

    /// Restore terminal to normal state
    fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        disable_raw_mode()?;
        terminal.backend_mut().execute(LeaveAlternateScreen)?;
        terminal.show_cursor()?;
        Ok(())
    }

    /// Main event loop
    fn main_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        loop {
            terminal.draw(|frame| self.render(frame))?;

            // Poll with a timeout for a responsive playhead (~60fps)
            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key);
                    }
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    /// Log a command and send it to the audio thread
    fn dispatch(&mut self, cmd: Command) {
        self.event_log.log(cmd.description());
        self.command_sender.send(cmd);
    }

    fn set_status(&mut self, msg: String) {
        self.status_message = Some((msg, Instant::now()));
    }

    fn handle_key(&mut self, key: KeyEvent) {
        // The path prompt swallows all keys while it is open
        if self.prompt.is_open() {
            if let Some(path) = self.prompt.input(key.code) {
                self.load_sample(&path);
            }
            return;
        }

        let snapshot = self.shared_state.read().clone();
        let slicer = self.cursor.slicer();
        let slice = snapshot.slices[slicer];

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,

            // Transport
            KeyCode::Char(' ') => self.dispatch(Command::TogglePlay),
            KeyCode::Char('+') | KeyCode::Char('=') => {
                self.dispatch(Command::SetBpm(snapshot.bpm + BPM_STEP))
            }
            KeyCode::Char('-') => self.dispatch(Command::SetBpm(snapshot.bpm - BPM_STEP)),

            // Grid
            KeyCode::Left | KeyCode::Char('h') => self.cursor.move_cursor(-1, 0),
            KeyCode::Right | KeyCode::Char('l') => self.cursor.move_cursor(1, 0),
            KeyCode::Up | KeyCode::Char('k') => self.cursor.move_cursor(0, -1),
            KeyCode::Down | KeyCode::Char('j') => self.cursor.move_cursor(0, 1),
            KeyCode::Enter | KeyCode::Char('x') => self.dispatch(Command::ToggleStep {
                row: self.cursor.row,
                step: self.cursor.step,
            }),
            KeyCode::Char('c') => self.dispatch(Command::ClearPattern),
            KeyCode::Char('r') => self.dispatch(Command::Randomize),

            // Sample loading
            KeyCode::Char('o') => {
                let prefill = self
                    .sample_path
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default();
                self.prompt.open(&prefill);
            }

            // Slicer under the cursor row
            KeyCode::Char('[') => self.dispatch(Command::SetSliceStart {
                slicer,
                percent: slice.start_percent - START_STEP,
            }),
            KeyCode::Char(']') => self.dispatch(Command::SetSliceStart {
                slicer,
                percent: slice.start_percent + START_STEP,
            }),
            KeyCode::Char(',') => self.dispatch(Command::SetSliceDuration {
                slicer,
                ms: slice.duration_ms - DURATION_STEP,
            }),
            KeyCode::Char('.') => self.dispatch(Command::SetSliceDuration {
                slicer,
                ms: slice.duration_ms + DURATION_STEP,
            }),

            _ => {}
        }
    }

    fn render(&mut self, frame: &mut Frame) {
        let snapshot = self.shared_state.read().clone();

        let layout = Layout::vertical([
            Constraint::Length(3),                  // transport
            Constraint::Length(ROWS as u16 + 2),    // grid
            Constraint::Length(4),                  // waveform
            Constraint::Length(SLICERS as u16 + 2), // slicers
            Constraint::Length(3),                  // status
            Constraint::Min(0),
        ])
        .split(frame.area());

        render_transport(
            frame,
            layout[0],
            snapshot.playing,
            snapshot.bpm,
            snapshot.current_step,
            snapshot.sample_name.as_deref(),
            snapshot.sample_secs,
            snapshot.voice_count,
            &self.palette,
        );
        render_grid(
            frame,
            layout[1],
            &snapshot.grid,
            &self.cursor,
            snapshot.current_step,
            snapshot.playing,
            &self.palette,
        );
        render_waveform(
            frame,
            layout[2],
            &snapshot.peaks,
            &snapshot.slices,
            snapshot.duration_ceiling_ms,
            &self.palette,
        );
        render_slicers(
            frame,
            layout[3],
            &snapshot.slices,
            snapshot.duration_ceiling_ms,
            self.cursor.slicer(),
            &self.palette,
        );
        self.render_status(frame, layout[4]);
    }

    /// Footer: transient status message, else the latest logged action,
    /// else key hints
    fn render_status(&mut self, frame: &mut Frame, area: Rect) {
        if let Some((_, at)) = &self.status_message {
            if at.elapsed() > STATUS_TIMEOUT {
                self.status_message = None;
            }
        }

        let (text, style) = if self.prompt.is_open() {
            (
                format!(" Load sample: {}_", self.prompt.text()),
                Style::default().fg(self.palette.accent),
            )
        } else if let Some((msg, _)) = &self.status_message {
            (format!(" {}", msg), Style::default().fg(self.palette.playhead))
        } else if let Some(entry) = self.event_log.latest() {
            (
                format!(" {} |{}", entry.text, KEY_HINTS),
                Style::default().fg(self.palette.dimmed),
            )
        } else {
            (KEY_HINTS.to_string(), Style::default().fg(self.palette.dimmed))
        };

        let status = Paragraph::new(text).style(style).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(self.palette.border)),
        );
        frame.render_widget(status, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_str(prompt: &mut PathPrompt, text: &str) {
        for c in text.chars() {
            prompt.input(KeyCode::Char(c));
        }
    }

    #[test]
    fn test_prompt_enter_yields_the_typed_path() {
        let mut prompt = PathPrompt::new();
        assert!(!prompt.is_open());

        prompt.open("");
        assert!(prompt.is_open());
        type_str(&mut prompt, "loops/break.wav");
        assert_eq!(prompt.text(), "loops/break.wav");

        let path = prompt.input(KeyCode::Enter);
        assert_eq!(path, Some(PathBuf::from("loops/break.wav")));
        assert!(!prompt.is_open());
    }

    #[test]
    fn test_prompt_backspace_edits() {
        let mut prompt = PathPrompt::new();
        prompt.open("");
        type_str(&mut prompt, "a.wav");
        prompt.input(KeyCode::Backspace);
        prompt.input(KeyCode::Backspace);
        prompt.input(KeyCode::Backspace);
        type_str(&mut prompt, "aif");
        assert_eq!(prompt.text(), "a.aif");
    }

    #[test]
    fn test_prompt_esc_cancels() {
        let mut prompt = PathPrompt::new();
        prompt.open("old.wav");
        type_str(&mut prompt, "x");
        assert_eq!(prompt.input(KeyCode::Esc), None);
        assert!(!prompt.is_open());
    }

    #[test]
    fn test_prompt_prefills_the_last_path() {
        let mut prompt = PathPrompt::new();
        prompt.open("last.wav");
        assert_eq!(prompt.text(), "last.wav");
        assert_eq!(prompt.input(KeyCode::Enter), Some(PathBuf::from("last.wav")));
    }

    #[test]
    fn test_prompt_empty_enter_loads_nothing() {
        let mut prompt = PathPrompt::new();
        prompt.open("");
        assert_eq!(prompt.input(KeyCode::Enter), None);
        assert!(!prompt.is_open());
    }
}
