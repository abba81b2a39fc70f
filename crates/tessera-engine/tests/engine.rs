use std::io::{self, Write};
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::bail;
use parking_lot::Mutex;
use tessera_engine::backend::{
    BackendFactory, HeadlessBackend, HeadlessConfig, HeadlessProbe, RenderBackend,
};
use tessera_engine::bridge::{ChannelWake, HostBridge, WakeReceiver};
use tessera_engine::engine::{EngineConfig, EngineError, EngineState, RenderEngine, ViewState};
use tessera_engine::host::run_headless;
use tessera_engine::input::{InputAdapter, Key, KeyState};
use tessera_engine::logging::LogSink;
use tessera_engine::message::{Command, Notification};
use tessera_engine::panel::{ControlPanel, PanelButton};

const WAIT: Duration = Duration::from_secs(5);

fn fast_headless() -> HeadlessConfig {
    HeadlessConfig {
        frame_interval: Some(Duration::from_millis(1)),
        ..HeadlessConfig::default()
    }
}

fn start() -> (RenderEngine, Arc<HostBridge<ChannelWake>>, WakeReceiver, HeadlessProbe) {
    let (wake, wake_rx) = ChannelWake::new();
    let bridge = Arc::new(HostBridge::new(wake));
    let (factory, probe) = HeadlessBackend::factory(fast_headless());
    let engine = RenderEngine::spawn(EngineConfig::default(), factory, Arc::clone(&bridge))
        .expect("headless engine starts");
    (engine, bridge, wake_rx, probe)
}

/// Waits on the wake channel and drains until `want` notifications arrived.
fn collect(
    bridge: &HostBridge<ChannelWake>,
    wake_rx: &WakeReceiver,
    want: usize,
) -> Vec<Notification> {
    let deadline = Instant::now() + WAIT;
    let mut out = Vec::new();
    while out.len() < want {
        let left = deadline.saturating_duration_since(Instant::now());
        assert!(
            wake_rx.wait_timeout(left),
            "timed out with {} of {want} notifications",
            out.len()
        );
        bridge.drain(|n| out.push(n));
    }
    out
}

#[test_log::test]
fn fifty_moves_right_end_at_500() {
    let (mut engine, bridge, wake_rx, _probe) = start();
    assert_eq!(engine.state(), EngineState::Running);

    let sender = engine.sender();
    for _ in 0..50 {
        sender.post(Command::move_right(10.0));
    }

    let notes = collect(&bridge, &wake_rx, 50);
    assert_eq!(notes.len(), 50);
    assert!(notes.iter().all(|n| n.text.as_str() == "Moved right"));

    let view = engine.stop().expect("first stop returns the view");
    assert_eq!(view, ViewState::new(500.0, 0.0));
    assert_eq!(engine.state(), EngineState::Stopped);
}

#[test_log::test]
fn moves_clamp_to_the_surface() {
    let (mut engine, bridge, wake_rx, probe) = start();

    for _ in 0..100 {
        engine.post_command(Command::move_right(10.0));
        engine.post_command(Command::move_down(10.0));
    }
    collect(&bridge, &wake_rx, 200);

    let view = engine.stop().expect("view");
    assert_eq!(view, ViewState::new(540.0, 380.0));
    assert!(probe.frames() > 0);
}

#[test_log::test]
fn several_producers_sum_up() {
    let (mut engine, bridge, wake_rx, _probe) = start();

    let producers: Vec<_> = (0..4)
        .map(|_| {
            let sender = engine.sender();
            thread::spawn(move || {
                for _ in 0..10 {
                    sender.post(Command::move_right(5.0));
                    sender.post(Command::move_down(5.0));
                }
            })
        })
        .collect();
    for p in producers {
        p.join().expect("producer thread");
    }

    let notes = collect(&bridge, &wake_rx, 80);
    let rights = notes.iter().filter(|n| n.text.as_str() == "Moved right").count();
    assert_eq!(rights, 40);

    let view = engine.stop().expect("view");
    assert_eq!(view, ViewState::new(200.0, 200.0));
}

#[test_log::test]
fn invalid_commands_produce_no_notification() {
    let (mut engine, bridge, wake_rx, _probe) = start();

    engine.post_command(Command::move_left(f32::NAN));
    engine.post_command(Command::move_up(f32::INFINITY));
    engine.post_command(Command::move_right(30.0));

    let notes = collect(&bridge, &wake_rx, 1);
    assert_eq!(notes[0].text.as_str(), "Moved right");

    let view = engine.stop().expect("view");
    assert_eq!(view, ViewState::new(30.0, 0.0));
    assert!(bridge.try_pop().is_none());
}

#[test_log::test]
fn stop_is_idempotent_and_later_posts_are_dropped() {
    let (mut engine, bridge, _wake_rx, _probe) = start();
    let sender = engine.sender();
    assert!(sender.is_accepting());

    assert!(engine.stop().is_some());
    assert!(engine.stop().is_none());

    assert!(!sender.is_accepting());
    sender.post(Command::move_right(10.0));
    engine.post_command(Command::move_right(10.0));
    assert!(bridge.try_pop().is_none());
}

#[test_log::test]
fn backend_creation_failure_is_reported() {
    let (wake, _wake_rx) = ChannelWake::new();
    let bridge = Arc::new(HostBridge::new(wake));
    let factory: BackendFactory = Box::new(|| -> anyhow::Result<Box<dyn RenderBackend>> {
        bail!("no adapter")
    });

    let started = Instant::now();
    let err = RenderEngine::spawn(EngineConfig::default(), factory, bridge)
        .expect_err("spawn must fail");

    assert!(started.elapsed() < WAIT);
    match err {
        EngineError::Backend(reason) => assert!(reason.contains("no adapter")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test_log::test]
fn slow_backend_times_out_without_blocking() {
    let (wake, _wake_rx) = ChannelWake::new();
    let bridge = Arc::new(HostBridge::new(wake));
    let factory: BackendFactory = Box::new(|| -> anyhow::Result<Box<dyn RenderBackend>> {
        thread::sleep(Duration::from_millis(500));
        let (backend, _probe) = HeadlessBackend::new(HeadlessConfig::default());
        Ok(Box::new(backend) as Box<dyn RenderBackend>)
    });
    let config = EngineConfig {
        ready_timeout: Some(Duration::from_millis(50)),
        ..EngineConfig::default()
    };

    let started = Instant::now();
    let err = RenderEngine::spawn(config, factory, bridge).expect_err("spawn must time out");

    assert!(matches!(err, EngineError::ReadyTimeout(_)));
    assert!(started.elapsed() < Duration::from_millis(450));
}

struct FailingBackend {
    frames_left: u32,
}

impl RenderBackend for FailingBackend {
    fn surface_size(&self) -> (f32, f32) {
        (640.0, 480.0)
    }

    fn draw(&mut self, _view: &ViewState, _quad_size: f32) -> anyhow::Result<()> {
        if self.frames_left == 0 {
            bail!("device lost");
        }
        self.frames_left -= 1;
        thread::sleep(Duration::from_millis(1));
        Ok(())
    }
}

#[test_log::test]
fn draw_failure_marks_engine_failed() {
    let (wake, _wake_rx) = ChannelWake::new();
    let bridge = Arc::new(HostBridge::new(wake));
    let factory: BackendFactory = Box::new(|| -> anyhow::Result<Box<dyn RenderBackend>> {
        Ok(Box::new(FailingBackend { frames_left: 3 }))
    });

    let mut engine =
        RenderEngine::spawn(EngineConfig::default(), factory, Arc::clone(&bridge)).expect("starts");

    let deadline = Instant::now() + WAIT;
    while engine.state() != EngineState::Failed {
        assert!(Instant::now() < deadline, "engine never failed");
        thread::sleep(Duration::from_millis(1));
    }
    assert!(engine.failure().is_some_and(|r| r.contains("device lost")));

    engine.post_command(Command::move_right(10.0));
    assert!(engine.stop().is_some());
    assert_eq!(engine.state(), EngineState::Failed);
    assert!(bridge.try_pop().is_none());
}

/// Sink target the test can read while the host loop owns the sink.
#[derive(Clone, Default)]
struct SharedLines(Arc<Mutex<Vec<u8>>>);

impl SharedLines {
    fn count(&self) -> usize {
        self.0.lock().iter().filter(|&&b| b == b'\n').count()
    }

    fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock()).into_owned()
    }
}

impl Write for SharedLines {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test_log::test]
fn headless_host_drains_into_the_sink() {
    let lines = SharedLines::default();
    let watched = lines.clone();

    let report = run_headless(
        fast_headless(),
        EngineConfig::default(),
        LogSink::new(lines),
        move |sender, shutdown| {
            thread::spawn(move || {
                for _ in 0..5 {
                    sender.post(Command::move_down(20.0));
                }
                // Stop only once every move has reached the sink; queued
                // commands are dropped at stop.
                let deadline = Instant::now() + WAIT;
                while watched.count() < 5 && Instant::now() < deadline {
                    thread::sleep(Duration::from_millis(1));
                }
                shutdown.request();
            });
        },
    )
    .expect("headless run");

    assert_eq!(report.notifications, 5);
    assert_eq!(report.final_view, Some(ViewState::new(0.0, 100.0)));
    assert!(report.frames > 0);
}

#[test_log::test]
fn headless_sink_receives_one_line_per_move() {
    let lines = SharedLines::default();
    let watched = lines.clone();

    run_headless(
        fast_headless(),
        EngineConfig::default(),
        LogSink::new(lines.clone()),
        move |sender, shutdown| {
            thread::spawn(move || {
                sender.post(Command::move_right(10.0));
                sender.post(Command::move_up(10.0));
                let deadline = Instant::now() + WAIT;
                while watched.count() < 2 && Instant::now() < deadline {
                    thread::sleep(Duration::from_millis(1));
                }
                shutdown.request();
            });
        },
    )
    .expect("headless run");

    assert_eq!(lines.text(), "Moved right\nMoved up\n");
}

#[test_log::test]
fn panicking_factory_is_reported() {
    let (wake, _wake_rx) = ChannelWake::new();
    let bridge = Arc::new(HostBridge::new(wake));
    let factory: BackendFactory = Box::new(|| -> anyhow::Result<Box<dyn RenderBackend>> {
        panic!("driver blew up");
    });

    let err = RenderEngine::spawn(EngineConfig::default(), factory, bridge)
        .expect_err("spawn must fail");
    assert!(matches!(err, EngineError::WorkerPanicked));
}

#[test_log::test]
fn one_command_per_frame_still_drains_everything() {
    let (wake, wake_rx) = ChannelWake::new();
    let bridge = Arc::new(HostBridge::new(wake));
    let (factory, probe) = HeadlessBackend::factory(fast_headless());
    let config = EngineConfig {
        drain_limit: Some(NonZeroUsize::MIN),
        ..EngineConfig::default()
    };
    let mut engine = RenderEngine::spawn(config, factory, Arc::clone(&bridge)).expect("starts");

    for _ in 0..5 {
        engine.post_command(Command::move_right(10.0));
    }
    let notes = collect(&bridge, &wake_rx, 5);
    assert_eq!(notes.len(), 5);
    // Each pass applies one command and then draws.
    assert!(probe.frames() >= 4);

    assert_eq!(engine.stop(), Some(ViewState::new(50.0, 0.0)));
}

#[test_log::test]
fn input_and_panel_post_through_the_same_sender() {
    let (mut engine, bridge, wake_rx, _probe) = start();

    let input = InputAdapter::new(engine.sender());
    assert!(input.on_key(Key::ArrowRight, KeyState::Pressed));
    assert!(!input.on_key(Key::ArrowRight, KeyState::Released));
    assert!(!input.on_key(Key::Escape, KeyState::Pressed));

    let mut panel = ControlPanel::unbound();
    assert!(!panel.press(PanelButton::Down));
    panel.bind(engine.sender());
    assert!(panel.press(PanelButton::Down));

    let notes = collect(&bridge, &wake_rx, 2);
    let texts: Vec<_> = notes.iter().map(|n| n.text.as_str().to_string()).collect();
    assert_eq!(texts, ["Moved right", "Moved down"]);

    assert_eq!(engine.stop(), Some(ViewState::new(10.0, 10.0)));
}
