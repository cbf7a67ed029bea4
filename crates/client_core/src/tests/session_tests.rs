use super::*;
use crate::test_support::{refused, RecordingTransport};
use shared::{Button, ShoulderButton, StickPosition};
use tokio::io::{AsyncWriteExt, BufReader};

fn session(transport: &RecordingTransport) -> Session<Vec<SessionEvent>> {
    Session::new(
        Dispatcher::new(transport.clone()),
        DEFAULT_HOLD,
        Vec::new(),
        Interrupt::never(),
    )
}

fn invalid_reports(events: &[SessionEvent]) -> usize {
    events
        .iter()
        .filter(|event| matches!(event, SessionEvent::InvalidCommand(_)))
        .count()
}

#[tokio::test(start_paused = true)]
async fn tap_sends_press_then_release_after_hold() {
    let transport = RecordingTransport::new();
    let mut session = session(&transport);

    session.handle_line("A").await;

    let sent = transport.sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].frame, FrameBuilder::new().button(Button::A, true).build());
    assert_eq!(sent[1].frame, FrameBuilder::new().button(Button::A, false).build());
    assert!(sent[1].frame.is_rest());

    let held = sent[1].at - sent[0].at;
    assert!(held >= DEFAULT_HOLD, "held for {held:?}");
    assert!(held < DEFAULT_HOLD + Duration::from_millis(100), "held for {held:?}");
}

#[tokio::test(start_paused = true)]
async fn stick_tokens_send_a_single_unreleased_frame() {
    let transport = RecordingTransport::new();
    let mut session = session(&transport);

    session.handle_line("d").await;
    session.handle_line("a").await;

    let frames = transport.frames();
    assert_eq!(frames.len(), 2);
    assert_eq!(frames[0].left_stick, StickPosition { x: 100, y: 0 });
    assert_eq!(frames[1].left_stick, StickPosition { x: -100, y: 0 });
    assert_eq!(frames[0].right_stick, StickPosition::CENTER);
    assert_eq!(frames[0].buttons, ControllerFrame::rest().buttons);
}

#[tokio::test]
async fn unknown_token_dispatches_nothing_and_reports_once() {
    let transport = RecordingTransport::new();
    let mut session = session(&transport);

    session.handle_line("zzz").await;

    assert!(transport.frames().is_empty());
    let events = session.reporter();
    assert_eq!(invalid_reports(events), 1);
    assert_eq!(
        events[0],
        SessionEvent::InvalidCommand(CommandError::InvalidCommand("zzz".to_string()))
    );
    assert_eq!(session.state(), LoopState::Running);
}

#[tokio::test]
async fn help_reports_without_dispatch() {
    let transport = RecordingTransport::new();
    let mut session = session(&transport);

    session.handle_line("?").await;

    assert!(transport.frames().is_empty());
    assert_eq!(session.reporter().as_slice(), [SessionEvent::HelpRequested]);
}

#[tokio::test(start_paused = true)]
async fn quit_sends_final_rest_frame_and_terminates() {
    let transport = RecordingTransport::new();
    let mut session = session(&transport);

    let summary = session.run(&b"A\nreset\nquit\nB\n"[..]).await;

    let frames = transport.frames();
    assert_eq!(frames.len(), 4);
    assert!(frames[0].buttons.a);
    assert!(frames[1..].iter().all(ControllerFrame::is_rest));
    assert_eq!(summary.cause, Some(TerminationCause::Quit));
    assert_eq!(summary.commands, 3);
    assert_eq!(summary.frames_sent, 4);
    assert_eq!(session.state(), LoopState::Terminated);

    let events = session.reporter();
    assert_eq!(
        events[events.len() - 2],
        SessionEvent::Terminating(TerminationCause::Quit)
    );
    assert_eq!(
        events[events.len() - 1],
        SessionEvent::Dispatched(ControllerFrame::rest())
    );
}

#[tokio::test]
async fn end_of_input_also_resets_the_device() {
    let transport = RecordingTransport::new();
    let mut session = session(&transport);

    let summary = session.run(&b"w\n"[..]).await;

    let frames = transport.frames();
    assert_eq!(frames.len(), 2);
    assert_eq!(frames[0].left_stick, StickPosition { x: 0, y: 100 });
    assert!(frames[1].is_rest());
    assert_eq!(summary.cause, Some(TerminationCause::EndOfInput));
}

#[tokio::test(start_paused = true)]
async fn dispatch_failures_inside_the_loop_are_not_fatal() {
    let transport = RecordingTransport::new().failing_with(refused());
    let mut session = session(&transport);

    let summary = session.run(&b"r\nzzz\nquit\n"[..]).await;

    assert_eq!(summary.failures, 1);
    assert_eq!(summary.cause, Some(TerminationCause::Quit));
    // press (failed), release, final rest
    assert_eq!(transport.frames().len(), 3);

    let events = session.reporter();
    assert!(events.iter().any(|event| matches!(
        event,
        SessionEvent::DispatchFailed { frame, error }
            if frame.shoulder.r && *error == refused()
    )));
    assert_eq!(invalid_reports(events), 1);
}

#[tokio::test]
async fn remote_rejection_is_reported_with_status_and_body() {
    let rejection = DispatchError::RemoteRejected {
        status: 400,
        body: "{\"error\":\"Invalid JSON\"}".to_string(),
    };
    let transport = RecordingTransport::new().failing_with(rejection.clone());
    let mut session = session(&transport);

    session.handle_line("reset").await;

    assert_eq!(
        session.reporter().as_slice(),
        [SessionEvent::DispatchFailed {
            frame: ControllerFrame::rest(),
            error: rejection,
        }]
    );
    assert_eq!(session.state(), LoopState::Running);
}

#[tokio::test]
async fn interrupt_while_waiting_for_input_terminates_with_rest_frame() {
    let transport = RecordingTransport::new();
    let (handle, interrupt) = Interrupt::channel();
    let mut session = Session::new(
        Dispatcher::new(transport.clone()),
        DEFAULT_HOLD,
        Vec::new(),
        interrupt,
    );
    let (_writer, reader) = tokio::io::duplex(64);

    handle.trigger();
    let summary = session.run(BufReader::new(reader)).await;

    assert_eq!(summary.cause, Some(TerminationCause::Interrupted));
    assert_eq!(transport.frames(), vec![ControllerFrame::rest()]);
}

#[tokio::test(start_paused = true)]
async fn interrupt_during_hold_still_releases() {
    let transport = RecordingTransport::new();
    let (handle, interrupt) = Interrupt::channel();
    let mut session = Session::new(
        Dispatcher::new(transport.clone()),
        DEFAULT_HOLD,
        Vec::new(),
        interrupt,
    );
    let (mut writer, reader) = tokio::io::duplex(64);
    writer.write_all(b"zl\n").await.expect("write");

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(300)).await;
        handle.trigger();
    });
    let summary = session.run(BufReader::new(reader)).await;

    let sent = transport.sent();
    assert_eq!(sent.len(), 3);
    assert!(sent[0].frame.shoulder.zl);
    assert!(sent[1].frame.is_rest());
    assert!(sent[2].frame.is_rest());
    assert!(sent[1].at - sent[0].at < DEFAULT_HOLD);
    assert_eq!(summary.cause, Some(TerminationCause::Interrupted));
    drop(writer);
}

#[tokio::test]
async fn failed_probe_never_yields_a_session() {
    let transport = RecordingTransport::new().failing_with(refused());

    let result = Session::connect(
        Dispatcher::new(transport.clone()),
        DEFAULT_HOLD,
        Vec::new(),
        Interrupt::never(),
    )
    .await;

    match result.err().expect("probe should fail") {
        StartupError::Unreachable(err) => assert_eq!(err.source, refused()),
        other => panic!("unexpected startup error: {other:?}"),
    }
    assert_eq!(transport.frames(), vec![ControllerFrame::rest()]);
}

struct StalledTransport;

#[async_trait::async_trait]
impl crate::transport::FrameTransport for StalledTransport {
    async fn send_frame(&self, _frame: &ControllerFrame) -> Result<(), DispatchError> {
        std::future::pending().await
    }

    fn target(&self) -> String {
        "memory://stalled".to_string()
    }
}

#[tokio::test(start_paused = true)]
async fn interrupt_abandons_a_hung_startup_check() {
    let (handle, interrupt) = Interrupt::channel();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(200)).await;
        handle.trigger();
    });

    let started = tokio::time::Instant::now();
    let result = Session::connect(
        Dispatcher::new(StalledTransport),
        DEFAULT_HOLD,
        Vec::new(),
        interrupt,
    )
    .await;

    assert!(matches!(result, Err(StartupError::Interrupted)));
    assert!(started.elapsed() < Duration::from_secs(1));
}

#[tokio::test]
async fn interrupt_before_startup_sends_nothing() {
    let transport = RecordingTransport::new();
    let (handle, interrupt) = Interrupt::channel();
    handle.trigger();

    let result = Session::connect(
        Dispatcher::new(transport.clone()),
        DEFAULT_HOLD,
        Vec::new(),
        interrupt,
    )
    .await;

    assert!(matches!(result, Err(StartupError::Interrupted)));
    assert!(transport.frames().is_empty());
}

#[tokio::test]
async fn successful_probe_starts_running() {
    let transport = RecordingTransport::new();

    let session = Session::connect(
        Dispatcher::new(transport.clone()),
        DEFAULT_HOLD,
        Vec::new(),
        Interrupt::never(),
    )
    .await
    .expect("probe succeeds");

    assert_eq!(session.state(), LoopState::Running);
    assert_eq!(transport.frames(), vec![ControllerFrame::rest()]);
}

#[tokio::test]
async fn terminated_session_ignores_further_commands() {
    let transport = RecordingTransport::new();
    let mut session = session(&transport);

    session.execute(Command::Quit).await;
    session
        .execute(Command::Tap(MomentaryInput::Shoulder(ShoulderButton::R)))
        .await;

    assert_eq!(session.state(), LoopState::Terminated);
    assert_eq!(transport.frames(), vec![ControllerFrame::rest()]);
}
