// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use creditfix_app::{
    AssembledReport, CountPolicy, CreditReport, InquiryGroup, Phase, PublicRecord, RecordId,
    ReportView, SaveStatus, SectionCommand, SectionEvent, SectionKind, SectionViewState,
    ViewPhase,
};
use creditfix_testkit::{
    RecordingViewport, ReportFaker, ReportShape, ViewportCall, fixture_reference_date,
    inquiry_on, report_with,
};
use std::time::Duration;

fn policy() -> CountPolicy {
    CountPolicy::new(fixture_reference_date())
}

fn open_view() -> SectionViewState {
    SectionViewState {
        collapsed: false,
        expanded: true,
        ..SectionViewState::default()
    }
}

fn recording_view(report: &CreditReport) -> ReportView<Vec<SectionEvent>> {
    ReportView::with_sink(AssembledReport::from_report(report), policy(), Vec::new())
        .with_initial_view(&open_view())
}

fn save_recent(view: &mut ReportView<Vec<SectionEvent>>, saved: bool) -> Vec<SectionEvent> {
    view.dispatch(
        SectionKind::HardInquiries,
        SectionCommand::GroupSaved {
            group: InquiryGroup::Recent,
            saved,
        },
    )
}

fn inquiry_phase(view: &ReportView<Vec<SectionEvent>>) -> ViewPhase {
    view.section(SectionKind::HardInquiries).phase()
}

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

#[test]
fn empty_report_reads_zero_inquiries() {
    let view = ReportView::new(
        AssembledReport::from_report(&report_with(0, Vec::new(), Vec::new())),
        policy(),
    );
    let summary = view.summary(SectionKind::HardInquiries);

    assert_eq!(summary.badge, 0);
    assert_eq!(summary.recent, Some(0));
    assert!(!summary.attention);
    assert_eq!(
        summary.status_text,
        "You have 0 inquiries that affect your credit score"
    );
    assert!(!view.summary(SectionKind::PublicRecords).visible);
}

#[test]
fn inquiry_exactly_at_window_start_is_recent() {
    let report = report_with(0, Vec::new(), vec![inquiry_on("2023-06-18")]);
    let view = ReportView::new(AssembledReport::from_report(&report), policy());
    let summary = view.summary(SectionKind::HardInquiries);

    assert_eq!(summary.recent, Some(1));
    assert!(summary.attention);
    assert_eq!(
        summary.status_text,
        "1 inquiry may be impacting your credit score"
    );
}

#[test]
fn collapsed_public_records_badge_counts_unsaved() {
    let records = vec![
        PublicRecord::default().with_liability_id("PR-1"),
        PublicRecord::default().with_subscriber_code("SUB-2"),
        PublicRecord::default(),
    ];
    let mut view = ReportView::new(
        AssembledReport::from_report(&report_with(0, records, Vec::new())),
        policy(),
    );
    view.dispatch(
        SectionKind::PublicRecords,
        SectionCommand::DisputeSaved {
            record_id: RecordId::from("SUB-2"),
            status: SaveStatus::Flag(true),
        },
    );

    let summary = view.summary(SectionKind::PublicRecords);
    assert_eq!(summary.phase, ViewPhase::Collapsed);
    assert_eq!(summary.total, 3);
    assert_eq!(summary.unsaved, 2);
    assert_eq!(summary.badge, 2);
    assert_eq!(summary.status_text, "2 public records need dispute review");
}

#[test]
fn saving_recent_group_collapses_and_scrolls_to_accounts_once() {
    let report = report_with(0, Vec::new(), vec![inquiry_on("2025-01-02")]);
    let mut view = recording_view(&report);
    let mut viewport = RecordingViewport::default();

    save_recent(&mut view, true);
    view.advance(Phase::total_duration(), &mut viewport);

    assert_eq!(inquiry_phase(&view), ViewPhase::Collapsed);
    assert_eq!(
        viewport.section_scrolls(),
        vec!["[data-section=\"credit-accounts\"]"]
    );
    assert_eq!(view.pending_timers(), 0);

    view.advance(Duration::from_secs(10), &mut viewport);
    assert_eq!(viewport.section_scrolls().len(), 1);
}

#[test]
fn phases_fire_in_order_at_cumulative_offsets() {
    let report = report_with(0, Vec::new(), Vec::new());
    let mut view = recording_view(&report);
    let mut viewport = RecordingViewport::default();
    save_recent(&mut view, true);

    let mut observed = Vec::new();
    for step in [ms(499), ms(1), ms(100), ms(500), ms(300), ms(500)] {
        view.advance(step, &mut viewport);
        observed.push((view.now(), inquiry_phase(&view), viewport.calls.len()));
    }

    assert_eq!(
        observed,
        vec![
            (ms(499), ViewPhase::ExpandedOpen, 0),
            (ms(500), ViewPhase::ExpandedOpen, 1),
            (ms(600), ViewPhase::ExpandedOpen, 2),
            (ms(1100), ViewPhase::ExpandedHeaderOnly, 2),
            (ms(1400), ViewPhase::Collapsed, 2),
            (ms(1900), ViewPhase::Collapsed, 3),
        ]
    );
    assert_eq!(
        viewport.calls,
        vec![
            ViewportCall::ScrollIntoView(SectionKind::HardInquiries),
            ViewportCall::ScrollBy(-20),
            ViewportCall::ScrollToSection("[data-section=\"credit-accounts\"]".to_owned()),
        ]
    );
}

#[test]
fn view_passes_through_header_only_before_collapsing() {
    let report = report_with(0, Vec::new(), Vec::new());
    let mut view = recording_view(&report);
    save_recent(&mut view, true);
    view.advance(Phase::total_duration(), &mut RecordingViewport::default());

    let phases = view
        .sink()
        .iter()
        .filter_map(|event| match event {
            SectionEvent::ViewChanged {
                section: SectionKind::HardInquiries,
                phase,
            } => Some(*phase),
            _ => None,
        })
        .collect::<Vec<_>>();
    assert_eq!(
        phases,
        vec![ViewPhase::ExpandedHeaderOnly, ViewPhase::Collapsed]
    );
    assert!(matches!(
        view.sink().last(),
        Some(SectionEvent::SequenceCompleted {
            section: SectionKind::HardInquiries
        })
    ));
}

#[test]
fn repeated_true_does_not_restart_chain() {
    let report = report_with(0, Vec::new(), Vec::new());
    let mut view = recording_view(&report);
    let mut viewport = RecordingViewport::default();

    save_recent(&mut view, true);
    view.advance(ms(300), &mut viewport);
    let again = save_recent(&mut view, true);
    assert!(
        !again
            .iter()
            .any(|event| matches!(event, SectionEvent::SequenceStarted { .. }))
    );
    assert_eq!(view.pending_timers(), 1);

    view.advance(ms(1600), &mut viewport);
    assert_eq!(inquiry_phase(&view), ViewPhase::Collapsed);
    assert_eq!(viewport.section_scrolls().len(), 1);
}

#[test]
fn clearing_flag_cancels_pending_phases() {
    let report = report_with(0, Vec::new(), Vec::new());
    let mut view = recording_view(&report);
    let mut viewport = RecordingViewport::default();

    save_recent(&mut view, true);
    view.advance(ms(700), &mut viewport);
    let events = save_recent(&mut view, false);

    assert!(events.contains(&SectionEvent::SequenceCancelled {
        section: SectionKind::HardInquiries
    }));
    assert_eq!(view.pending_timers(), 0);

    view.advance(Duration::from_secs(5), &mut viewport);
    assert_eq!(inquiry_phase(&view), ViewPhase::ExpandedOpen);
    assert!(viewport.section_scrolls().is_empty());
}

#[test]
fn teardown_mid_chain_stops_all_mutation() {
    let report = report_with(0, Vec::new(), Vec::new());
    let mut view = recording_view(&report);
    let mut viewport = RecordingViewport::default();

    save_recent(&mut view, true);
    view.advance(ms(1200), &mut viewport);
    assert_eq!(inquiry_phase(&view), ViewPhase::ExpandedHeaderOnly);

    view.teardown();
    let calls_before = viewport.calls.len();
    view.advance(Duration::from_secs(5), &mut viewport);

    assert_eq!(inquiry_phase(&view), ViewPhase::ExpandedHeaderOnly);
    assert_eq!(viewport.calls.len(), calls_before);
}

#[test]
fn detached_section_still_collapses() {
    let report = report_with(0, Vec::new(), Vec::new());
    let mut view = recording_view(&report);
    let mut viewport = RecordingViewport::detached();

    save_recent(&mut view, true);
    view.advance(Phase::total_duration(), &mut viewport);

    assert_eq!(inquiry_phase(&view), ViewPhase::Collapsed);
    assert!(
        !viewport
            .calls
            .iter()
            .any(|call| matches!(call, ViewportCall::ScrollBy(_)))
    );
    assert!(view.sink().contains(&SectionEvent::ScrollSkipped {
        section: SectionKind::HardInquiries,
        phase: Phase::ScrollIntoView,
    }));
    assert_eq!(viewport.section_scrolls().len(), 1);
}

#[test]
fn saving_while_collapsed_never_starts_chain() {
    let report = report_with(0, Vec::new(), Vec::new());
    let mut view = ReportView::with_sink(
        AssembledReport::from_report(&report),
        policy(),
        Vec::<SectionEvent>::new(),
    );
    let mut viewport = RecordingViewport::default();

    save_recent(&mut view, true);
    view.dispatch(SectionKind::HardInquiries, SectionCommand::HeaderClicked);
    assert_eq!(inquiry_phase(&view), ViewPhase::ExpandedOpen);

    view.advance(Duration::from_secs(5), &mut viewport);
    assert_eq!(inquiry_phase(&view), ViewPhase::ExpandedOpen);
    assert!(viewport.calls.is_empty());
}

#[test]
fn unsaved_count_never_grows_as_records_are_saved() -> Result<()> {
    let shape = ReportShape {
        public_records: 6,
        ..ReportShape::default()
    };
    let report = ReportFaker::new(11).report(&shape)?;
    let assembled = AssembledReport::from_report(&report);
    let ids = assembled
        .public_records()
        .iter()
        .map(|keyed| keyed.id.clone())
        .collect::<Vec<_>>();
    let mut view = ReportView::new(assembled, policy());

    let mut previous = view.summary(SectionKind::PublicRecords).unsaved;
    assert_eq!(previous, ids.len());
    for id in ids {
        view.dispatch(
            SectionKind::PublicRecords,
            SectionCommand::DisputeSaved {
                record_id: id,
                status: SaveStatus::Flag(true),
            },
        );
        let current = view.summary(SectionKind::PublicRecords).unsaved;
        assert!(current <= previous);
        previous = current;
    }
    assert_eq!(previous, 0);
    Ok(())
}

#[test]
fn synthetic_ids_follow_combined_order() -> Result<()> {
    let report = ReportFaker::new(5).report(&ReportShape {
        negative_accounts: 3,
        public_records: 3,
        ..ReportShape::default()
    })?;
    let assembled = AssembledReport::from_report(&report);

    let keyless = &assembled.public_records()[2];
    assert_eq!(keyless.absolute_index, 5);
    assert_eq!(keyless.id, RecordId::from("record_5"));
    assert!(assembled.contains(&keyless.id));
    Ok(())
}
