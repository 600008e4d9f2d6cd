//! Interactive TUI: sidebar navigation, essay editor and feedback cards

use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, ListState, Paragraph, Wrap},
};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

use crate::analysis::{build_provider, AnalysisProvider, AnalysisResult};
use crate::config::{ProjectConfig, ProviderKind, UserConfig};
use crate::models::{Category, FeedbackReport, Notice, Status, StatusThresholds};
use crate::submission::TEMPLATES;
use crate::ui::{AnalysisProgress, AppState, RequestId, StepStatus, Theme, View};

/// Progress estimate for providers without a fixed delay
const LLM_EXPECTED: Duration = Duration::from_secs(15);

/// How long to wait for input before checking for finished analyses
const POLL_INTERVAL: Duration = Duration::from_millis(100);

type Completion = (RequestId, AnalysisResult<FeedbackReport>);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Input {
    Essay,
    Title,
    UploadPath,
}

pub struct App {
    state: AppState,
    provider: Result<Arc<dyn AnalysisProvider>, String>,
    runtime: tokio::runtime::Handle,
    tx: Sender<Completion>,
    rx: Receiver<Completion>,
    list_state: ListState,
    card_cursor: usize,
    input: Option<Input>,
    upload_path: String,
    provider_label: String,
    thresholds: StatusThresholds,
}

impl App {
    pub fn new(
        state: AppState,
        provider: Result<Arc<dyn AnalysisProvider>, String>,
        runtime: tokio::runtime::Handle,
        provider_label: String,
        thresholds: StatusThresholds,
    ) -> Self {
        let (tx, rx) = channel();
        let mut list_state = ListState::default();
        list_state.select(Some(0));
        Self {
            state,
            provider,
            runtime,
            tx,
            rx,
            list_state,
            card_cursor: 0,
            input: None,
            upload_path: String::new(),
            provider_label,
            thresholds,
        }
    }

    fn list_len(&self) -> usize {
        match self.state.active_view {
            View::Templates => TEMPLATES.len(),
            View::History => self.state.history.len(),
            _ => 0,
        }
    }

    fn next(&mut self) {
        let len = self.list_len();
        if len == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => (i + 1) % len,
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    fn previous(&mut self) {
        let len = self.list_len();
        if len == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.list_state.select(Some(i));
    }

    fn change_view(&mut self, f: impl FnOnce(&mut AppState)) {
        f(&mut self.state);
        self.list_state.select(Some(0));
    }

    /// Start an analysis of the draft. Submitting again while one is running
    /// supersedes it; the older result is dropped when it arrives.
    fn submit(&mut self) {
        let provider = match &self.provider {
            Ok(p) => Arc::clone(p),
            Err(e) => {
                self.state
                    .set_notice(Notice::error("Provider Unavailable", e.clone()));
                return;
            }
        };
        let Ok(request) = self.state.begin_analysis() else {
            return;
        };
        self.card_cursor = 0;
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let result = provider.analyze(&request.submission).await;
            // Receiver is gone once the UI has exited
            let _ = tx.send((request.id, result));
        });
    }

    fn upload(&mut self) {
        let path = PathBuf::from(self.upload_path.trim());
        match self.state.draft.apply_upload(&path) {
            Ok(notice) => self.state.set_notice(notice),
            Err(e) => {
                warn!("Upload failed: {}", e);
                self.state.set_notice(e.notice());
            }
        }
        self.upload_path.clear();
    }

    /// Apply finished analyses
    fn drain_completions(&mut self) {
        while let Ok((id, result)) = self.rx.try_recv() {
            self.state.complete_analysis(id, result);
        }
    }

    /// Handle one key press. Returns true when the app should quit.
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        if let Some(input) = self.input {
            self.handle_input(input, key);
            return false;
        }

        match key.code {
            KeyCode::Char('q') => return true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return true,
            KeyCode::Esc => {
                if self.state.notice.is_some() {
                    self.state.dismiss_notice();
                } else {
                    return true;
                }
            }
            KeyCode::Tab => self.change_view(AppState::next_view),
            KeyCode::BackTab => self.change_view(AppState::previous_view),
            KeyCode::Char(c @ '1'..='5') => {
                let index = c as usize - '1' as usize;
                self.change_view(|s| s.select_view(View::ALL[index]));
            }
            KeyCode::Char('b') => self.state.toggle_sidebar(),
            KeyCode::Char('t') => self.state.cycle_theme(),
            KeyCode::Char('n') => {
                self.state.new_essay();
                self.card_cursor = 0;
            }
            _ => self.handle_view_key(key),
        }
        false
    }

    fn handle_view_key(&mut self, key: KeyEvent) {
        match self.state.active_view {
            View::Home => {
                if key.code == KeyCode::Enter {
                    self.state.select_view(View::NewEssay);
                }
            }
            View::Templates => match key.code {
                KeyCode::Down | KeyCode::Char('j') => self.next(),
                KeyCode::Up | KeyCode::Char('k') => self.previous(),
                KeyCode::Enter => {
                    let selected = self.list_state.selected().unwrap_or(0);
                    if let Some(template) = TEMPLATES.get(selected) {
                        self.state.use_template(template);
                    }
                }
                _ => {}
            },
            View::NewEssay => match key.code {
                KeyCode::Char('e') => self.input = Some(Input::Essay),
                KeyCode::Char('i') => self.input = Some(Input::Title),
                KeyCode::Char('u') => self.input = Some(Input::UploadPath),
                KeyCode::Char('s') => self.submit(),
                KeyCode::Char('x') => self.state.cancel_analysis(),
                KeyCode::Down | KeyCode::Char('j') => {
                    self.card_cursor = (self.card_cursor + 1) % Category::ALL.len();
                }
                KeyCode::Up | KeyCode::Char('k') => {
                    self.card_cursor =
                        (self.card_cursor + Category::ALL.len() - 1) % Category::ALL.len();
                }
                KeyCode::Char(' ') | KeyCode::Enter => {
                    if self.state.current_report().is_some() {
                        self.state.toggle_card(Category::ALL[self.card_cursor]);
                    }
                }
                _ => {}
            },
            View::History => match key.code {
                KeyCode::Down | KeyCode::Char('j') => self.next(),
                KeyCode::Up | KeyCode::Char('k') => self.previous(),
                KeyCode::Enter => {
                    if let Some(i) = self.list_state.selected() {
                        self.state.open_history(i);
                    }
                }
                _ => {}
            },
            View::Settings => {}
        }
    }

    fn handle_input(&mut self, input: Input, key: KeyEvent) {
        let target = match input {
            Input::Essay => &mut self.state.draft.essay,
            Input::Title => &mut self.state.draft.title,
            Input::UploadPath => &mut self.upload_path,
        };
        match key.code {
            KeyCode::Esc => {
                if input == Input::UploadPath {
                    self.upload_path.clear();
                }
                self.input = None;
            }
            KeyCode::Enter if input == Input::Essay => target.push('\n'),
            KeyCode::Enter => {
                self.input = None;
                if input == Input::UploadPath {
                    self.upload();
                }
            }
            KeyCode::Tab if input == Input::Essay => target.push('\t'),
            KeyCode::Backspace => {
                target.pop();
            }
            KeyCode::Char(c) => target.push(c),
            _ => {}
        }
    }
}

/// Run the TUI, optionally preloading an essay file
pub fn run(project: &ProjectConfig, file: Option<&Path>) -> Result<()> {
    let user = UserConfig::load();
    let provider = build_provider(project, &user).map_err(|e| e.to_string());
    let expected = match project.analysis.provider {
        ProviderKind::Mock => project.analysis.delay(),
        ProviderKind::Llm => LLM_EXPECTED,
    };

    let runtime = tokio::runtime::Runtime::new().context("Failed to create tokio runtime")?;

    let mut state = AppState::new(project.analysis.min_words, expected);
    if let Some(path) = file {
        state.select_view(View::NewEssay);
        match state.draft.apply_upload(path) {
            Ok(notice) => state.set_notice(notice),
            Err(e) => state.set_notice(e.notice()),
        }
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(
        state,
        provider,
        runtime.handle().clone(),
        project.analysis.provider.to_string(),
        project.scoring.thresholds(),
    );
    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    // Pending analyses are abandoned
    runtime.shutdown_background();

    if let Err(err) = res {
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    loop {
        app.drain_completions();
        terminal.draw(|f| ui(f, app))?;

        if !event::poll(POLL_INTERVAL)? {
            continue;
        }
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press && app.handle_key(key) {
                return Ok(());
            }
        }
    }
}

struct Palette {
    fg: Color,
    bg: Color,
    accent: Color,
    muted: Color,
}

fn palette(theme: Theme) -> Palette {
    match theme {
        Theme::Light => Palette {
            fg: Color::Black,
            bg: Color::White,
            accent: Color::Blue,
            muted: Color::Gray,
        },
        Theme::Dark => Palette {
            fg: Color::White,
            bg: Color::Black,
            accent: Color::Cyan,
            muted: Color::DarkGray,
        },
        Theme::System => Palette {
            fg: Color::Reset,
            bg: Color::Reset,
            accent: Color::Cyan,
            muted: Color::DarkGray,
        },
    }
}

fn status_color(status: Status) -> Color {
    match status {
        Status::Excellent => Color::Green,
        Status::Good => Color::Yellow,
        Status::NeedsImprovement => Color::Red,
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let p = palette(app.state.theme);
    f.render_widget(
        Block::default().style(Style::default().fg(p.fg).bg(p.bg)),
        f.area(),
    );

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(f.area());

    // Header
    let header = Paragraph::new(format!(
        " EssaySpark | {} | provider: {} | {} essays this session",
        app.state.active_view.title(),
        app.provider_label,
        app.state.history.len()
    ))
    .style(Style::default().fg(p.accent).bold())
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, chunks[0]);

    let sidebar_width = if app.state.sidebar_collapsed { 5 } else { 18 };
    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(sidebar_width), Constraint::Min(0)])
        .split(chunks[1]);

    render_sidebar(f, main_chunks[0], app, &p);

    let content = main_chunks[1];
    match app.state.active_view {
        View::Home => render_home(f, content, &p),
        View::Templates => render_templates(f, content, app, &p),
        View::NewEssay => render_new_essay(f, content, app, &p),
        View::History => render_history(f, content, app, &p),
        View::Settings => render_settings(f, content, app, &p),
    }

    if let Some(notice) = &app.state.notice {
        render_notice(f, content, notice);
    }

    // Footer
    let help = match (app.input, app.state.active_view) {
        (Some(Input::Essay), _) => " Typing essay  Esc:Done",
        (Some(_), _) => " Typing  Enter:Confirm  Esc:Cancel",
        (None, View::NewEssay) => {
            " e:Edit essay  i:Title  u:Upload .txt  s:Analyze  x:Cancel  j/k,Space:Cards  n:New  Tab:View  q:Quit"
        }
        (None, View::Templates) | (None, View::History) => {
            " j/k:Navigate  Enter:Open  Tab:View  b:Sidebar  t:Theme  q:Quit"
        }
        _ => " Tab/1-5:View  n:New essay  b:Sidebar  t:Theme  q:Quit",
    };
    let footer = Paragraph::new(help).style(Style::default().fg(p.muted));
    f.render_widget(footer, chunks[2]);
}

fn render_sidebar(f: &mut Frame, area: Rect, app: &App, p: &Palette) {
    let items: Vec<ListItem> = View::ALL
        .iter()
        .enumerate()
        .map(|(i, view)| {
            let label = if app.state.sidebar_collapsed {
                format!("{}", i + 1)
            } else {
                format!("{} {}", i + 1, view.title())
            };
            let style = if *view == app.state.active_view {
                Style::default().fg(p.accent).bold()
            } else {
                Style::default()
            };
            ListItem::new(Line::from(Span::styled(label, style)))
        })
        .collect();

    let list = List::new(items).block(Block::default().borders(Borders::ALL));
    f.render_widget(list, area);
}

fn render_home(f: &mut Frame, area: Rect, p: &Palette) {
    let text = vec![
        Line::from(Span::styled("Improve your writing", Style::default().bold())),
        Line::from(""),
        Line::from("Submit an essay and get instant feedback on grammar, structure,"),
        Line::from("coherence and style, with strengths and concrete suggestions."),
        Line::from(""),
        Line::from(Span::styled(
            "Press Enter to start a new essay, or 2 to browse templates.",
            Style::default().fg(p.accent),
        )),
    ];
    let paragraph = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).title(" Home "))
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);
}

fn render_templates(f: &mut Frame, area: Rect, app: &mut App, p: &Palette) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    let items: Vec<ListItem> = TEMPLATES
        .iter()
        .map(|t| {
            ListItem::new(Line::from(vec![
                Span::raw(t.title),
                Span::styled(format!("  {}", t.category), Style::default().fg(p.muted)),
            ]))
        })
        .collect();
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(" Templates "))
        .highlight_style(Style::default().bg(p.muted).fg(Color::White))
        .highlight_symbol("> ");
    f.render_stateful_widget(list, chunks[0], &mut app.list_state);

    if let Some(t) = app.list_state.selected().and_then(|i| TEMPLATES.get(i)) {
        let text = vec![
            Line::from(Span::styled(t.title, Style::default().bold())),
            Line::from(Span::styled(t.category, Style::default().fg(p.accent))),
            Line::from(""),
            Line::from(t.description),
            Line::from(""),
            Line::from(Span::styled(t.prompt, Style::default().italic())),
            Line::from(""),
            Line::from(Span::styled(
                "Enter: Use This Template",
                Style::default().fg(p.accent),
            )),
        ];
        let detail = Paragraph::new(text)
            .block(Block::default().borders(Borders::ALL).title(" Details "))
            .wrap(Wrap { trim: false });
        f.render_widget(detail, chunks[1]);
    }
}

fn render_new_essay(f: &mut Frame, area: Rect, app: &App, p: &Palette) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    render_editor(f, chunks[0], app, p);

    if let Some(progress) = app.state.progress() {
        render_progress(f, chunks[1], &progress, false, p);
    } else if let Some(progress) = app.state.failed_progress() {
        render_progress(f, chunks[1], progress, true, p);
    } else if let Some(report) = app.state.current_report() {
        render_report(f, chunks[1], app, report, p);
    } else {
        let hint = Paragraph::new("Write or upload an essay, then press s to analyze.")
            .style(Style::default().fg(p.muted))
            .block(Block::default().borders(Borders::ALL).title(" Feedback "))
            .wrap(Wrap { trim: false });
        f.render_widget(hint, chunks[1]);
    }
}

fn render_editor(f: &mut Frame, area: Rect, app: &App, p: &Palette) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(area);

    let active = |input: Input| {
        if app.input == Some(input) {
            Style::default().fg(p.accent)
        } else {
            Style::default()
        }
    };

    let title = Paragraph::new(app.state.draft.title.as_str()).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(active(Input::Title))
            .title(" Essay Title (Optional) "),
    );
    f.render_widget(title, chunks[0]);

    let words = app.state.draft.word_count();
    let essay = Paragraph::new(app.state.draft.essay.as_str())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(active(Input::Essay))
                .title(format!(
                    " Essay ({} words, min {}) ",
                    words, app.state.draft.min_words
                )),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(essay, chunks[1]);

    let upload = Paragraph::new(app.upload_path.as_str()).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(active(Input::UploadPath))
            .title(" Upload .txt file (u) "),
    );
    f.render_widget(upload, chunks[2]);
}

fn render_progress(
    f: &mut Frame,
    area: Rect,
    progress: &AnalysisProgress,
    failed: bool,
    p: &Palette,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let (title, color) = if failed {
        (" Analysis Failed ", Color::Red)
    } else {
        (" Analyzing Essay ", p.accent)
    };
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(title))
        .gauge_style(Style::default().fg(color))
        .percent(u16::from(progress.percent));
    f.render_widget(gauge, chunks[0]);

    let lines: Vec<Line> = progress
        .steps
        .iter()
        .map(|step| {
            let (marker, style) = match step.status {
                StepStatus::Completed => ("✓", Style::default().fg(Color::Green)),
                StepStatus::Active => ("…", Style::default().fg(p.accent).bold()),
                StepStatus::Error => ("✗", Style::default().fg(Color::Red)),
                StepStatus::Pending => ("○", Style::default().fg(p.muted)),
            };
            Line::from(Span::styled(format!(" {} {}", marker, step.title), style))
        })
        .collect();
    let steps = Paragraph::new(lines).block(Block::default().borders(Borders::ALL));
    f.render_widget(steps, chunks[1]);
}

fn render_report(f: &mut Frame, area: Rect, app: &App, report: &FeedbackReport, p: &Palette) {
    let overall = app.thresholds.classify(report.overall_score);
    let mut text = vec![
        Line::from(vec![
            Span::styled("Overall Score: ", Style::default().bold()),
            Span::styled(
                format!("{}/100", report.overall_score),
                Style::default().fg(status_color(overall)).bold(),
            ),
        ]),
        Line::from(Span::styled(
            format!(
                "{} words, {} sentences",
                report.stats.word_count, report.stats.sentence_count
            ),
            Style::default().fg(p.muted),
        )),
        Line::from(""),
    ];

    for (i, item) in report.feedback.iter().enumerate() {
        let expanded = app.state.is_expanded(item.category);
        let cursor = if i == app.card_cursor { ">" } else { " " };
        let arrow = if expanded { "▾" } else { "▸" };
        text.push(Line::from(vec![
            Span::raw(format!("{} {} ", cursor, arrow)),
            Span::styled(item.category.label(), Style::default().bold()),
            Span::styled(
                format!("  {} {}", item.score, item.status.label()),
                Style::default().fg(status_color(item.status)),
            ),
        ]));
        if expanded {
            text.push(Line::from(format!("     {}", item.feedback)));
            text.push(Line::from(Span::styled(
                "     Tips:",
                Style::default().fg(p.muted),
            )));
            for s in &item.suggestions {
                text.push(Line::from(format!("       - {}", s)));
            }
        }
    }

    text.push(Line::from(""));
    text.push(Line::from(Span::styled(
        "Key Strengths",
        Style::default().fg(Color::Green).bold(),
    )));
    for s in &report.strengths {
        text.push(Line::from(format!("  + {}", s)));
    }
    text.push(Line::from(""));
    text.push(Line::from(Span::styled(
        "Areas for Improvement",
        Style::default().fg(Color::Yellow).bold(),
    )));
    for s in &report.improvements {
        text.push(Line::from(format!("  > {}", s)));
    }

    let paragraph = Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Essay Analysis: {} ", report.title)),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);
}

fn render_history(f: &mut Frame, area: Rect, app: &mut App, p: &Palette) {
    if app.state.history.is_empty() {
        let empty = Paragraph::new("No essays analyzed yet this session.")
            .style(Style::default().fg(p.muted))
            .block(Block::default().borders(Borders::ALL).title(" History "));
        f.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = app
        .state
        .history
        .iter()
        .map(|entry| {
            let status = app.thresholds.classify(entry.report.overall_score);
            ListItem::new(Line::from(vec![
                Span::styled(
                    entry.completed_at.format("%H:%M:%S ").to_string(),
                    Style::default().fg(p.muted),
                ),
                Span::styled(
                    format!("{:>3} ", entry.report.overall_score),
                    Style::default().fg(status_color(status)).bold(),
                ),
                Span::raw(entry.report.title.clone()),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(" History "))
        .highlight_style(Style::default().bg(p.muted).fg(Color::White))
        .highlight_symbol("> ");
    f.render_stateful_widget(list, area, &mut app.list_state);
}

fn render_settings(f: &mut Frame, area: Rect, app: &App, p: &Palette) {
    let provider_status = match &app.provider {
        Ok(provider) => format!("{} (ready)", provider.name()),
        Err(e) => format!("unavailable: {}", e),
    };
    let text = vec![
        Line::from(vec![
            Span::styled("Theme:    ", Style::default().bold()),
            Span::raw(app.state.theme.label()),
            Span::styled("  (t to change)", Style::default().fg(p.muted)),
        ]),
        Line::from(vec![
            Span::styled("Sidebar:  ", Style::default().bold()),
            Span::raw(if app.state.sidebar_collapsed {
                "collapsed"
            } else {
                "expanded"
            }),
            Span::styled("  (b to toggle)", Style::default().fg(p.muted)),
        ]),
        Line::from(vec![
            Span::styled("Provider: ", Style::default().bold()),
            Span::raw(provider_status),
        ]),
        Line::from(vec![
            Span::styled("Min words: ", Style::default().bold()),
            Span::raw(app.state.draft.min_words.to_string()),
        ]),
    ];
    let paragraph = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).title(" Settings "))
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);
}

fn render_notice(f: &mut Frame, area: Rect, notice: &Notice) {
    let width = area.width.saturating_sub(4).min(70);
    let height = 4;
    if area.height < height + 1 || width < 10 {
        return;
    }
    let popup = Rect {
        x: area.x + area.width.saturating_sub(width + 1),
        y: area.y + area.height - height - 1,
        width,
        height,
    };
    let color = if notice.is_error() {
        Color::Red
    } else {
        Color::Green
    };
    let paragraph = Paragraph::new(notice.description.as_str())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color))
                .title(format!(" {} (Esc) ", notice.title)),
        )
        .wrap(Wrap { trim: true });
    f.render_widget(Clear, popup);
    f.render_widget(paragraph, popup);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{AnalysisError, MockAnalyzer};
    use crate::config::ScoringConfig;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app(rt: &tokio::runtime::Runtime) -> App {
        let provider: Arc<dyn AnalysisProvider> =
            Arc::new(MockAnalyzer::new(ScoringConfig::default(), Duration::ZERO).with_seed(1));
        App::new(
            AppState::new(50, Duration::ZERO),
            Ok(provider),
            rt.handle().clone(),
            "mock".into(),
            StatusThresholds::default(),
        )
    }

    #[test]
    fn test_navigation_keys() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let mut app = app(&rt);
        app.handle_key(key(KeyCode::Tab));
        assert_eq!(app.state.active_view, View::Templates);
        app.handle_key(key(KeyCode::Char('4')));
        assert_eq!(app.state.active_view, View::History);
        app.handle_key(key(KeyCode::Char('b')));
        assert!(app.state.sidebar_collapsed);
        assert!(app.handle_key(key(KeyCode::Char('q'))));
    }

    #[test]
    fn test_template_selection_fills_draft() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let mut app = app(&rt);
        app.handle_key(key(KeyCode::Char('2')));
        app.handle_key(key(KeyCode::Char('j')));
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.state.active_view, View::NewEssay);
        assert_eq!(app.state.draft.title, "Narrative Essay");
    }

    #[test]
    fn test_typing_and_short_submit() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let mut app = app(&rt);
        app.handle_key(key(KeyCode::Char('3')));
        app.handle_key(key(KeyCode::Char('e')));
        for c in "hi there".chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
        app.handle_key(key(KeyCode::Backspace));
        app.handle_key(key(KeyCode::Esc));
        assert_eq!(app.state.draft.essay, "hi ther");

        app.handle_key(key(KeyCode::Char('s')));
        assert!(!app.state.is_analyzing());
        assert_eq!(
            app.state.notice.as_ref().map(|n| n.title.as_str()),
            Some("Essay Too Short")
        );
        app.handle_key(key(KeyCode::Esc));
        assert!(app.state.notice.is_none());
    }

    #[test]
    fn test_submit_completes_through_channel() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let mut app = app(&rt);
        app.state.select_view(View::NewEssay);
        app.state.draft.essay = "word ".repeat(60);
        app.handle_key(key(KeyCode::Char('s')));
        assert!(app.state.is_analyzing());

        let (id, result) = app.rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert!(app.state.complete_analysis(id, result));
        assert_eq!(app.state.history.len(), 1);

        app.handle_key(key(KeyCode::Char(' ')));
        assert!(app.state.is_expanded(Category::Grammar));
    }

    #[test]
    fn test_resubmit_supersedes_running_analysis() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let mut app = app(&rt);
        app.state.select_view(View::NewEssay);
        app.state.draft.essay = "word ".repeat(60);
        app.handle_key(key(KeyCode::Char('s')));
        app.handle_key(key(KeyCode::Char('s')));

        let mut accepted = 0;
        for _ in 0..2 {
            let (id, result) = app.rx.recv_timeout(Duration::from_secs(5)).unwrap();
            if app.state.complete_analysis(id, result) {
                accepted += 1;
            }
        }
        assert_eq!(accepted, 1);
        assert_eq!(app.state.history.len(), 1);
        assert!(!app.state.is_analyzing());
    }

    struct FailingProvider;

    #[async_trait::async_trait]
    impl AnalysisProvider for FailingProvider {
        fn name(&self) -> &str {
            "failing"
        }

        async fn analyze(
            &self,
            _submission: &crate::models::EssaySubmission,
        ) -> AnalysisResult<FeedbackReport> {
            Err(AnalysisError::Task("backend went away".into()))
        }
    }

    #[test]
    fn test_failed_analysis_marks_progress_step() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let provider: Arc<dyn AnalysisProvider> = Arc::new(FailingProvider);
        let mut app = App::new(
            AppState::new(50, Duration::from_secs(3)),
            Ok(provider),
            rt.handle().clone(),
            "failing".into(),
            StatusThresholds::default(),
        );
        app.state.select_view(View::NewEssay);
        app.state.draft.essay = "word ".repeat(60);
        app.handle_key(key(KeyCode::Char('s')));

        let (id, result) = app.rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert!(app.state.complete_analysis(id, result));
        let failed = app.state.failed_progress().expect("failure shown");
        assert!(failed.steps.iter().any(|s| s.status == StepStatus::Error));
        assert_eq!(
            app.state.notice.as_ref().map(|n| n.title.as_str()),
            Some("Analysis Failed")
        );
    }

    #[test]
    fn test_bad_upload_keeps_draft() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let mut app = app(&rt);
        app.state.select_view(View::NewEssay);
        app.state.draft.essay = "keep me".into();
        app.handle_key(key(KeyCode::Char('u')));
        for c in "/no/such/essay.pdf".chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.state.draft.essay, "keep me");
        assert_eq!(
            app.state.notice.as_ref().map(|n| n.title.as_str()),
            Some("Invalid File")
        );
    }
}
