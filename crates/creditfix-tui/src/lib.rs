// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use creditfix_app::{
    CREDIT_ACCOUNTS_ANCHOR, EventSink, InquiryGroup, InquiryRecord, KeyedRecord, PublicRecord,
    RecordId, ReportView, SaveStatus, ScrollOutcome, SectionCommand, SectionEvent, SectionKind,
    SectionSummary, ViewPhase, Viewport, section_anchor, window_start,
};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use ratatui::Terminal;
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::{Duration, Instant};
use time::Date;

/// Terminal rows are treated as this many pixels when a scroll request is
/// expressed in pixels.
pub const ROW_HEIGHT_PX: i32 = 20;

const MARK_SAVED: &str = "[x]";
const MARK_UNSAVED: &str = "[ ]";
const CHEVRON_OPEN: &str = "▾";
const CHEVRON_CLOSED: &str = "▸";
const CREDIT_ACCOUNTS_TITLE: &str = "Credit Accounts";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TuiOptions {
    pub tick: Duration,
}

impl Default for TuiOptions {
    fn default() -> Self {
        Self {
            tick: Duration::from_millis(50),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternalEvent {
    ClearStatus { token: u64 },
}

/// One block of the stacked report page.
#[derive(Debug, Clone, PartialEq, Eq)]
struct PageBlock {
    anchor: &'static str,
    lines: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BlockRows {
    anchor: &'static str,
    start: usize,
    height: usize,
}

/// Row-offset viewport over the stacked page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TerminalViewport {
    offset: usize,
    blocks: Vec<BlockRows>,
    total_rows: usize,
}

impl TerminalViewport {
    pub fn offset(&self) -> usize {
        self.offset
    }

    fn relayout(&mut self, page: &[PageBlock]) {
        let mut start = 0;
        self.blocks = page
            .iter()
            .map(|block| {
                let rows = BlockRows {
                    anchor: block.anchor,
                    start,
                    height: block.lines.len(),
                };
                start += block.lines.len() + 1;
                rows
            })
            .collect();
        self.total_rows = start.saturating_sub(1);
        self.offset = self.offset.min(self.max_offset());
    }

    fn max_offset(&self) -> usize {
        self.total_rows.saturating_sub(1)
    }

    fn rows_for(&self, anchor: &str) -> Option<BlockRows> {
        self.blocks
            .iter()
            .copied()
            .find(|rows| rows.anchor == anchor && rows.height > 0)
    }

    fn scroll_to_row(&mut self, row: usize) {
        self.offset = row.min(self.max_offset());
    }
}

impl Viewport for TerminalViewport {
    fn scroll_into_view(&mut self, section: SectionKind) -> ScrollOutcome {
        match self.rows_for(section.anchor()) {
            Some(rows) => {
                self.scroll_to_row(rows.start);
                ScrollOutcome::Scrolled
            }
            None => ScrollOutcome::Skipped,
        }
    }

    fn scroll_by(&mut self, dy: i32) {
        let rows = dy / ROW_HEIGHT_PX;
        let magnitude = rows.unsigned_abs() as usize;
        let next = if rows < 0 {
            self.offset.saturating_sub(magnitude)
        } else {
            self.offset.saturating_add(magnitude)
        };
        self.scroll_to_row(next);
    }

    fn scroll_to_section(&mut self, selector: &str) {
        if let Some(rows) = section_anchor(selector).and_then(|anchor| self.rows_for(anchor)) {
            self.scroll_to_row(rows.start);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ViewData {
    focus: SectionKind,
    cursors: [usize; 2],
    help_visible: bool,
    status_line: Option<String>,
    status_token: u64,
    viewport: TerminalViewport,
}

impl Default for ViewData {
    fn default() -> Self {
        Self {
            focus: SectionKind::HardInquiries,
            cursors: [0; 2],
            help_visible: false,
            status_line: None,
            status_token: 0,
            viewport: TerminalViewport::default(),
        }
    }
}

impl ViewData {
    const fn cursor_slot(kind: SectionKind) -> usize {
        match kind {
            SectionKind::HardInquiries => 0,
            SectionKind::PublicRecords => 1,
        }
    }

    fn cursor(&self, kind: SectionKind) -> usize {
        self.cursors[Self::cursor_slot(kind)]
    }

    fn cursor_mut(&mut self, kind: SectionKind) -> &mut usize {
        &mut self.cursors[Self::cursor_slot(kind)]
    }
}

pub fn run_app<K: EventSink>(view: &mut ReportView<K>, options: TuiOptions) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    if let Err(error) = execute!(stdout, terminal::EnterAlternateScreen) {
        let _ = disable_raw_mode();
        return Err(error).context("enter alternate screen");
    }

    let result = Terminal::new(CrosstermBackend::new(stdout))
        .context("create terminal")
        .and_then(|mut terminal| {
            drive(&mut terminal, view, options.tick, |timeout| {
                if event::poll(timeout).context("poll event")? {
                    event::read().map(Some).context("read event")
                } else {
                    Ok(None)
                }
            })
        });

    let restored = disable_raw_mode()
        .context("disable raw mode")
        .and_then(|()| {
            execute!(io::stdout(), terminal::LeaveAlternateScreen)
                .context("leave alternate screen")
        });
    result.and(restored)
}

/// Runs the draw/input loop until quit or the first error. Pending timers are
/// always torn down before returning.
fn drive<B, K, F>(
    terminal: &mut Terminal<B>,
    view: &mut ReportView<K>,
    tick: Duration,
    mut next_event: F,
) -> Result<()>
where
    B: Backend,
    K: EventSink,
    F: FnMut(Duration) -> Result<Option<Event>>,
{
    let mut view_data = ViewData::default();
    let (internal_tx, internal_rx) = mpsc::channel();
    let mut last_tick = Instant::now();

    let result = loop {
        process_internal_events(&mut view_data, &internal_rx);

        view_data.viewport.relayout(&build_page(&*view, &view_data));
        let elapsed = last_tick.elapsed();
        last_tick = Instant::now();
        let fired = view.advance(elapsed, &mut view_data.viewport);
        report_events(&mut view_data, &internal_tx, &fired);

        let page = build_page(&*view, &view_data);
        view_data.viewport.relayout(&page);
        if let Err(error) = terminal.draw(|frame| render(frame, &*view, &view_data, &page)) {
            break Err(error).context("draw frame");
        }

        match next_event(tick) {
            Ok(Some(Event::Key(key))) => {
                if handle_key_event(view, &mut view_data, &internal_tx, key) {
                    break Ok(());
                }
            }
            Ok(_) => {}
            Err(error) => break Err(error),
        }
    };

    view.teardown();
    result
}

fn process_internal_events(view_data: &mut ViewData, rx: &Receiver<InternalEvent>) {
    while let Ok(event) = rx.try_recv() {
        match event {
            InternalEvent::ClearStatus { token } if token == view_data.status_token => {
                view_data.status_line = None;
            }
            InternalEvent::ClearStatus { .. } => {}
        }
    }
}

fn schedule_status_clear(internal_tx: &Sender<InternalEvent>, token: u64) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(Duration::from_secs(4));
        let _ = sender.send(InternalEvent::ClearStatus { token });
    });
}

fn emit_status(
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    message: impl Into<String>,
) {
    view_data.status_line = Some(message.into());
    view_data.status_token = view_data.status_token.saturating_add(1);
    schedule_status_clear(internal_tx, view_data.status_token);
}

fn report_events(
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    events: &[SectionEvent],
) {
    if let Some(message) = events.iter().rev().find_map(event_status) {
        emit_status(view_data, internal_tx, message);
    }
}

fn event_status(event: &SectionEvent) -> Option<String> {
    let title = event.section().title();
    match event {
        SectionEvent::GroupSaved { group, saved, .. } => Some(format!(
            "{} {} group {}",
            title,
            group.label(),
            if *saved { "saved" } else { "unsaved" }
        )),
        SectionEvent::SectionReset { .. } => Some(format!("{title} reset")),
        SectionEvent::DisputeSaved { record_id, .. } => Some(format!("saved {record_id}")),
        SectionEvent::DisputeReset { record_id, .. } => Some(format!("reset {record_id}")),
        SectionEvent::SequenceCancelled { .. } => Some(format!("{title} auto-collapse canceled")),
        SectionEvent::SequenceCompleted { .. } => Some(format!("{title} done")),
        _ => None,
    }
}

fn handle_key_event<K: EventSink>(
    view: &mut ReportView<K>,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    if key.code == KeyCode::Char('q')
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
    {
        return true;
    }

    if view_data.help_visible {
        if key.code == KeyCode::Esc || key.code == KeyCode::Char('?') {
            view_data.help_visible = false;
        }
        return false;
    }

    let focus = view_data.focus;
    let events = match key.code {
        KeyCode::Char('?') => {
            view_data.help_visible = true;
            return false;
        }
        KeyCode::Tab | KeyCode::BackTab => {
            view_data.focus = next_focus(view, focus);
            return false;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            move_cursor(view, view_data, 1);
            return false;
        }
        KeyCode::Char('k') | KeyCode::Up => {
            move_cursor(view, view_data, -1);
            return false;
        }
        KeyCode::Enter => view.dispatch(focus, SectionCommand::HeaderClicked),
        KeyCode::Char('r') => view.dispatch(focus, SectionCommand::Reset),
        KeyCode::Char('s') if focus == SectionKind::HardInquiries => {
            toggle_group(view, InquiryGroup::Recent)
        }
        KeyCode::Char('o') if focus == SectionKind::HardInquiries => {
            toggle_group(view, InquiryGroup::Older)
        }
        KeyCode::Char(' ') => {
            let Some(record_id) = cursor_record_id(view, view_data) else {
                emit_status(view_data, internal_tx, "nothing selected");
                return false;
            };
            let command = if view.save_status().is_saved(&record_id) {
                SectionCommand::DisputeReset { record_id }
            } else {
                SectionCommand::DisputeSaved {
                    record_id,
                    status: SaveStatus::Flag(true),
                }
            };
            view.dispatch(focus, command)
        }
        _ => return false,
    };

    report_events(view_data, internal_tx, &events);
    false
}

/// Public records drop out of the focus ring while the report has none.
fn next_focus<K: EventSink>(view: &ReportView<K>, focus: SectionKind) -> SectionKind {
    let other = match focus {
        SectionKind::HardInquiries => SectionKind::PublicRecords,
        SectionKind::PublicRecords => SectionKind::HardInquiries,
    };
    if view.summary(other).visible {
        other
    } else {
        focus
    }
}

fn toggle_group<K: EventSink>(view: &mut ReportView<K>, group: InquiryGroup) -> Vec<SectionEvent> {
    let saved = view
        .section(SectionKind::HardInquiries)
        .view()
        .group(group)
        .saved;
    view.dispatch(
        SectionKind::HardInquiries,
        SectionCommand::GroupSaved {
            group,
            saved: !saved,
        },
    )
}

fn move_cursor<K: EventSink>(view: &ReportView<K>, view_data: &mut ViewData, delta: isize) {
    let focus = view_data.focus;
    let len = section_record_ids(view, focus).len();
    let cursor = view_data.cursor_mut(focus);
    if len == 0 {
        *cursor = 0;
        return;
    }
    *cursor = cursor.saturating_add_signed(delta).min(len - 1);
}

fn cursor_record_id<K: EventSink>(view: &ReportView<K>, view_data: &ViewData) -> Option<RecordId> {
    if view.section(view_data.focus).phase() != ViewPhase::ExpandedOpen {
        return None;
    }
    section_record_ids(view, view_data.focus)
        .get(view_data.cursor(view_data.focus))
        .cloned()
}

fn section_record_ids<K: EventSink>(view: &ReportView<K>, kind: SectionKind) -> Vec<RecordId> {
    match kind {
        SectionKind::HardInquiries => inquiry_rows(view)
            .into_iter()
            .map(|(_, keyed)| keyed.id.clone())
            .collect(),
        SectionKind::PublicRecords => view
            .report()
            .public_records()
            .iter()
            .map(|keyed| keyed.id.clone())
            .collect(),
    }
}

/// Inquiries ordered recent group first, report order within each group.
fn inquiry_rows<K: EventSink>(
    view: &ReportView<K>,
) -> Vec<(InquiryGroup, &KeyedRecord<InquiryRecord>)> {
    let policy = view.policy();
    let start = window_start(policy.reference_date, policy.window_months);
    let is_recent = |keyed: &KeyedRecord<InquiryRecord>| {
        keyed
            .record
            .date()
            .is_some_and(|date| (start..=policy.reference_date).contains(&date))
    };

    let inquiries = view.report().inquiries();
    let recent = inquiries
        .iter()
        .filter(|keyed| is_recent(*keyed))
        .map(|keyed| (InquiryGroup::Recent, keyed));
    let older = inquiries
        .iter()
        .filter(|keyed| !is_recent(*keyed))
        .map(|keyed| (InquiryGroup::Older, keyed));
    recent.chain(older).collect()
}

fn build_page<K: EventSink>(view: &ReportView<K>, view_data: &ViewData) -> Vec<PageBlock> {
    let mut page = vec![
        PageBlock {
            anchor: SectionKind::HardInquiries.anchor(),
            lines: render_inquiries_lines(view, view_data),
        },
        PageBlock {
            anchor: CREDIT_ACCOUNTS_ANCHOR,
            lines: render_accounts_lines(view),
        },
    ];
    if view.summary(SectionKind::PublicRecords).visible {
        page.push(PageBlock {
            anchor: SectionKind::PublicRecords.anchor(),
            lines: render_public_records_lines(view, view_data),
        });
    }
    page
}

fn render(
    frame: &mut ratatui::Frame<'_>,
    view: &ReportView<impl EventSink>,
    view_data: &ViewData,
    page: &[PageBlock],
) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(frame.area());

    let title = Paragraph::new(render_title_text(view))
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .block(Block::default().title("creditfix").borders(Borders::ALL));
    frame.render_widget(title, layout[0]);

    let offset = u16::try_from(view_data.viewport.offset()).unwrap_or(u16::MAX);
    let body = Paragraph::new(render_page_text(page))
        .scroll((offset, 0))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(body, layout[1]);

    let status = Paragraph::new(status_text(view, view_data))
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status, layout[2]);

    if view_data.help_visible {
        let area = centered_rect(70, 50, frame.area());
        frame.render_widget(Clear, area);
        let help = Paragraph::new(help_overlay_text())
            .block(Block::default().title("help").borders(Borders::ALL));
        frame.render_widget(help, area);
    }
}

fn render_title_text(view: &ReportView<impl EventSink>) -> String {
    format!(
        "negative items as of {} | recent window {} months",
        view.policy().reference_date,
        view.policy().window_months
    )
}

fn render_page_text(page: &[PageBlock]) -> String {
    page.iter()
        .map(|block| block.lines.join("\n"))
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn render_header_line(summary: &SectionSummary, focused: bool) -> String {
    let chevron = if summary.phase == ViewPhase::Collapsed {
        CHEVRON_CLOSED
    } else {
        CHEVRON_OPEN
    };
    let focus = if focused { ">" } else { " " };
    let attention = if summary.attention { " !" } else { "" };
    format!(
        "{focus} {chevron} {} ({}){attention}",
        summary.section.title(),
        summary.badge
    )
}

fn render_section_lines(
    summary: &SectionSummary,
    focused: bool,
    rows: impl FnOnce() -> Vec<String>,
) -> Vec<String> {
    let mut lines = vec![render_header_line(summary, focused)];
    if summary.phase == ViewPhase::Collapsed {
        return lines;
    }
    lines.push(format!("    {} | {}", summary.status_text, summary.count_label));
    if summary.phase == ViewPhase::ExpandedOpen {
        lines.extend(rows());
    }
    lines
}

fn render_inquiries_lines<K: EventSink>(view: &ReportView<K>, view_data: &ViewData) -> Vec<String> {
    let kind = SectionKind::HardInquiries;
    let summary = view.summary(kind);
    let focused = view_data.focus == kind;
    render_section_lines(&summary, focused, || {
        let section_view = view.section(kind).view();
        let cursor = view_data.cursor(kind);
        let mut lines = Vec::new();
        let mut current_group = None;
        for (index, (group, keyed)) in inquiry_rows(view).into_iter().enumerate() {
            if current_group != Some(group) {
                current_group = Some(group);
                let state = section_view.group(group);
                let dispute = state
                    .dispute
                    .as_ref()
                    .map(|dispute| format!(" | dispute: {}", dispute.reason))
                    .unwrap_or_default();
                lines.push(format!(
                    "    {} {} inquiries{dispute}",
                    if state.saved { MARK_SAVED } else { MARK_UNSAVED },
                    group.label()
                ));
            }
            lines.push(render_inquiry_row(
                keyed,
                view.save_status().is_saved(&keyed.id),
                focused && index == cursor,
            ));
        }
        lines
    })
}

fn render_inquiry_row(keyed: &KeyedRecord<InquiryRecord>, saved: bool, selected: bool) -> String {
    let record = &keyed.record;
    format!(
        "  {} {} {} | {} | {}",
        if selected { ">" } else { " " },
        if saved { MARK_SAVED } else { MARK_UNSAVED },
        format_date(record.date()),
        record.creditor().unwrap_or("unknown creditor"),
        record.bureau().map_or("--", |bureau| bureau.code())
    )
}

fn render_public_records_lines<K: EventSink>(
    view: &ReportView<K>,
    view_data: &ViewData,
) -> Vec<String> {
    let kind = SectionKind::PublicRecords;
    let summary = view.summary(kind);
    let focused = view_data.focus == kind;
    render_section_lines(&summary, focused, || {
        let cursor = view_data.cursor(kind);
        view.report()
            .public_records()
            .iter()
            .enumerate()
            .map(|(index, keyed)| {
                render_public_record_row(
                    keyed,
                    view.save_status().is_saved(&keyed.id),
                    focused && index == cursor,
                )
            })
            .collect()
    })
}

fn render_public_record_row(keyed: &KeyedRecord<PublicRecord>, saved: bool, selected: bool) -> String {
    let record = &keyed.record;
    format!(
        "  {} {} {} | {} | filed {}",
        if selected { ">" } else { " " },
        if saved { MARK_SAVED } else { MARK_UNSAVED },
        record.record_type().unwrap_or("public record"),
        record.court_name().unwrap_or("unknown court"),
        format_date(record.filed_date())
    )
}

fn render_accounts_lines<K: EventSink>(view: &ReportView<K>) -> Vec<String> {
    let report = view.report();
    let negatives = report.negative_accounts().len();
    vec![
        format!("    {CREDIT_ACCOUNTS_TITLE} ({})", report.total_liabilities()),
        format!(
            "    {} of {} with derogatory marks",
            creditfix_app::Noun::ACCOUNT.count_label(negatives),
            report.total_liabilities()
        ),
    ]
}

fn format_date(date: Option<Date>) -> String {
    date.map_or_else(|| "----------".to_owned(), |date| date.to_string())
}

fn status_text<K: EventSink>(view: &ReportView<K>, view_data: &ViewData) -> String {
    if view_data.help_visible {
        return String::new();
    }
    let hints = match view_data.focus {
        SectionKind::HardInquiries => "tab focus | enter open/close | j/k | space save | s/o group | r reset | ? | q",
        SectionKind::PublicRecords => "tab focus | enter open/close | j/k | space save | r reset | ? | q",
    };
    let pending = view
        .section(view_data.focus)
        .sequencer()
        .pending_phase()
        .map(|phase| format!(" | next: {}", phase.label()))
        .unwrap_or_default();
    match &view_data.status_line {
        Some(status) => format!("{status}{pending} | {hints}"),
        None => format!("{}{pending} | {hints}", view_data.focus.title()),
    }
}

fn help_overlay_text() -> &'static str {
    "sections: tab/shift+tab focus | enter open or hide content\n\
records: j/k move | space save or reset the selected record\n\
inquiries: s save recent group | o save older group | r reset groups\n\
saving the recent group while open collapses the section and moves to credit accounts\n\
global: ? help | q quit"
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
