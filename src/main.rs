// src/main.rs

pub mod app;
pub mod cli;
pub mod engine_lib;
pub mod headless;
pub mod rendering_lib;
pub mod ui;

use std::process::ExitCode;

use clap::Parser;
use log::{debug, error, info};
use winit::{
    event::{Event, WindowEvent},
    event_loop::{ControlFlow, EventLoopWindowTarget, EventLoop},
    window::WindowBuilder,
};

use app::{AppError, SnowflakeApp};
use cli::CliArgs;
use koch_snowflake::config::{AnimationSettings, StyleConfig, WindowConfig};

pub async fn run_windowed(
    settings: AnimationSettings,
    window_config: WindowConfig,
    style: StyleConfig,
) -> Result<(), AppError> {
    let event_loop = EventLoop::new()?;
    let window = std::sync::Arc::new(
        WindowBuilder::new()
            .with_title(window_config.title.as_str())
            .with_inner_size(winit::dpi::LogicalSize::new(window_config.width, window_config.height))
            .build(&event_loop)?,
    );

    #[cfg(target_arch = "wasm32")]
    {
        use winit::platform::web::WindowExtWebSys;
        let attached = web_sys::window()
            .and_then(|win| win.document())
            .and_then(|doc| {
                let dst = doc.get_element_by_id("wasm-viewport")?;
                let canvas = web_sys::Element::from(window.canvas()?);
                dst.append_child(&canvas).ok()?;
                Some(())
            });
        if attached.is_none() {
            log::warn!("Couldn't append canvas to document body.");
        }
    }

    let mut app_state = SnowflakeApp::new(window.clone(), settings, style).await?;
    let mut last_time = std::time::Instant::now();

    event_loop.run(move |event, target: &EventLoopWindowTarget<()>| {
        target.set_control_flow(ControlFlow::Poll);

        match event {
            Event::WindowEvent {
                ref event,
                window_id,
            } if window_id == window.id() => {
                if !app_state.handle_window_event(event, &window) {
                    match event {
                        WindowEvent::CloseRequested => {
                            target.exit();
                        }
                        WindowEvent::Resized(physical_size) => {
                            app_state.resize(*physical_size);
                        }
                        _ => {}
                    }
                }
            }
            Event::AboutToWait => {
                if app_state.exit_requested() {
                    target.exit();
                    return;
                }

                let now = std::time::Instant::now();
                let dt = (now - last_time).as_secs_f32();
                last_time = now;

                app_state.update(dt);
                match app_state.render(&window) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        app_state.resize(app_state.get_size());
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        error!("WGPU Out Of Memory! Exiting.");
                        target.exit();
                    }
                    Err(e) => error!("Surface error: {:?}", e),
                }

                if !target.exiting() {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    })?;
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = CliArgs::parse();

    let mut config = match cli::load_config(&cli) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{}", err);
            return ExitCode::from(1);
        }
    };

    cli::init_logger(&cli::resolve_log_level(&cli, &config));

    for override_entry in cli::apply_overrides(&mut config, &cli) {
        debug!("CLI override: {}", override_entry);
    }

    let settings = match config.validate() {
        Ok(settings) => settings,
        Err(err) => {
            error!("{}", err);
            return ExitCode::from(1);
        }
    };

    let result = if cli.headless {
        headless::run(settings, cli.frames)
            .await
            .map(|frames| info!("Presented {} frames", frames))
            .map_err(AppError::from)
    } else {
        run_windowed(settings, config.window, config.style).await
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}", err);
            ExitCode::from(2)
        }
    }
}
