use std::io;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop, EventLoopProxy};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::backend::WgpuBackend;
use crate::bridge::{HostBridge, ProxyWake};
use crate::device::{GpuInit, SurfaceMetrics};
use crate::engine::{CommandSender, EngineConfig, RenderEngine};
use crate::input::{InputAdapter, Key, KeyState};
use crate::logging::LogSink;

use super::ShutdownHandle;

/// Window configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "tessera".to_string(),
            initial_size: LogicalSize::new(640.0, 480.0),
        }
    }
}

/// User events injected into the winit event loop from other threads.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum HostEvent {
    /// The outbound notification queue went from empty to non-empty.
    NotificationsReady,
    /// A [`ShutdownHandle`] was triggered.
    ShutdownRequested,
}

type OnReady = Box<dyn FnOnce(CommandSender, ShutdownHandle)>;

/// Entry point for the windowed host.
pub struct Runtime;

impl Runtime {
    /// Opens the window, starts the render engine on it and runs the event
    /// loop until the window closes, Escape is pressed or shutdown is
    /// requested.
    ///
    /// `on_ready` runs on the event-loop thread once the engine is up.
    pub fn run<F>(
        config: RuntimeConfig,
        gpu_init: GpuInit,
        engine_config: EngineConfig,
        on_ready: F,
    ) -> Result<()>
    where
        F: FnOnce(CommandSender, ShutdownHandle) + 'static,
    {
        let event_loop = EventLoop::<HostEvent>::with_user_event()
            .build()
            .context("failed to create winit EventLoop")?;
        event_loop.set_control_flow(ControlFlow::Wait);

        let proxy = event_loop.create_proxy();
        let bridge = Arc::new(HostBridge::new(ProxyWake::new(
            proxy.clone(),
            HostEvent::NotificationsReady,
        )));

        let mut host = Host {
            config,
            gpu_init,
            engine_config,
            bridge,
            proxy,
            on_ready: Some(Box::new(on_ready)),
            window: None,
            metrics: None,
            engine: None,
            input: None,
            sink: LogSink::stderr(),
            error: None,
        };

        event_loop
            .run_app(&mut host)
            .context("winit event loop terminated with error")?;

        match host.error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

struct Host {
    config: RuntimeConfig,
    gpu_init: GpuInit,
    engine_config: EngineConfig,
    bridge: Arc<HostBridge<ProxyWake<HostEvent>>>,
    proxy: EventLoopProxy<HostEvent>,
    on_ready: Option<OnReady>,

    window: Option<Arc<Window>>,
    metrics: Option<SurfaceMetrics>,
    engine: Option<RenderEngine>,
    input: Option<InputAdapter>,
    sink: LogSink<io::Stderr>,
    error: Option<anyhow::Error>,
}

impl Host {
    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("failed to create window")?,
        );

        let metrics = SurfaceMetrics::sample(&window);
        let factory =
            WgpuBackend::factory(Arc::clone(&window), metrics.clone(), self.gpu_init.clone())?;
        let engine = RenderEngine::spawn(
            self.engine_config.clone(),
            factory,
            Arc::clone(&self.bridge),
        )
        .map_err(|e| anyhow!(e))
        .context("failed to start render engine")?;

        let sender = engine.sender();
        self.input = Some(InputAdapter::new(sender.clone()));
        self.engine = Some(engine);
        self.window = Some(window);
        self.metrics = Some(metrics);

        if let Some(on_ready) = self.on_ready.take() {
            let shutdown = ShutdownHandle::from_signal(ProxyWake::new(
                self.proxy.clone(),
                HostEvent::ShutdownRequested,
            ));
            on_ready(sender, shutdown);
        }

        Ok(())
    }

    fn drain_notifications(&mut self) {
        let sink = &mut self.sink;
        let n = self.bridge.drain(|note| sink.emit(&note));
        log::trace!("drained {n} notifications");
    }

    /// Stops the engine, flushes its last notifications and leaves the loop.
    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(mut engine) = self.engine.take() {
            if let Some(view) = engine.stop() {
                log::info!("final quad position ({}, {})", view.x, view.y);
            }
        }
        self.drain_notifications();
        self.input = None;
        self.metrics = None;
        self.window = None;
        event_loop.exit();
    }
}

impl ApplicationHandler<HostEvent> for Host {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() || self.error.is_some() {
            return;
        }

        if let Err(err) = self.start(event_loop) {
            log::error!("{err:#}");
            self.error = Some(err);
            event_loop.exit();
        }
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, event: HostEvent) {
        match event {
            HostEvent::NotificationsReady => self.drain_notifications(),
            HostEvent::ShutdownRequested => self.shutdown(event_loop),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.window.as_ref().map(|w| w.id()) != Some(window_id) {
            return;
        }

        match event {
            WindowEvent::CloseRequested => self.shutdown(event_loop),

            WindowEvent::Resized(size) => {
                if let Some(metrics) = self.metrics.as_ref() {
                    metrics.set_size(size);
                }
            }

            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                if let Some(metrics) = self.metrics.as_ref() {
                    metrics.set_scale_factor(scale_factor);
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                let key = map_key(event.physical_key);
                let state = match event.state {
                    ElementState::Pressed => KeyState::Pressed,
                    ElementState::Released => KeyState::Released,
                };

                if key == Key::Escape && state == KeyState::Pressed {
                    self.shutdown(event_loop);
                    return;
                }
                if let Some(input) = self.input.as_ref() {
                    input.on_key(key, state);
                }
            }

            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(mut engine) = self.engine.take() {
            engine.stop();
        }
        self.drain_notifications();
    }
}

fn map_key(pk: PhysicalKey) -> Key {
    match pk {
        PhysicalKey::Code(code) => match code {
            KeyCode::ArrowUp => Key::ArrowUp,
            KeyCode::ArrowDown => Key::ArrowDown,
            KeyCode::ArrowLeft => Key::ArrowLeft,
            KeyCode::ArrowRight => Key::ArrowRight,
            KeyCode::Escape => Key::Escape,
            other => Key::Unknown(other as u32),
        },
        // NativeKeyCode has no stable numeric form.
        PhysicalKey::Unidentified(_) => Key::Unknown(0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrow_keys_map_to_moves() {
        assert_eq!(map_key(PhysicalKey::Code(KeyCode::ArrowLeft)), Key::ArrowLeft);
        assert_eq!(map_key(PhysicalKey::Code(KeyCode::ArrowDown)), Key::ArrowDown);
        assert_eq!(map_key(PhysicalKey::Code(KeyCode::Escape)), Key::Escape);
        assert!(matches!(map_key(PhysicalKey::Code(KeyCode::KeyQ)), Key::Unknown(_)));
    }
}
