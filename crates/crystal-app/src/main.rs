mod app_state;
mod cli;
mod headless;
mod scene;

use std::process::ExitCode;

use crystal_config::schema::LogLevel;
use crystal_config::CrystalConfig;
use tracing_subscriber::EnvFilter;
use winit::event_loop::EventLoop;

const DEFAULT_LOG_DIRECTIVE: &str = "crystal=info";

/// Filter directive: CLI flag first, then the config's level.
fn log_directive(cli: Option<&str>, config_level: Option<LogLevel>) -> String {
    match (cli, config_level) {
        (Some(directive), _) if directive.contains('=') => directive.to_string(),
        (Some(level), _) => format!("crystal={level}"),
        (None, Some(level)) => format!("crystal={}", level.as_str()),
        (None, None) => DEFAULT_LOG_DIRECTIVE.to_string(),
    }
}

fn init_logging(directive: &str) {
    let directive = directive
        .parse()
        .unwrap_or_else(|_| DEFAULT_LOG_DIRECTIVE.parse().unwrap());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(directive))
        .init();
}

fn main() -> ExitCode {
    let args = cli::parse();

    // Config is read before logging starts so its level can apply; the
    // outcome is logged once the subscriber is up.
    let loaded = crystal_config::load_config(args.config.as_deref());
    let config_level = loaded.as_ref().ok().map(|c| c.logging.level);
    init_logging(&log_directive(args.log_level.as_deref(), config_level));

    tracing::info!("Crystal v{} starting...", env!("CARGO_PKG_VERSION"));

    let mut config = loaded.unwrap_or_else(|e| {
        tracing::warn!("Config load failed, using defaults: {e}");
        CrystalConfig::default()
    });
    if let Some(ref path) = args.model {
        config.scene.model = Some(path.clone());
    }
    if let Some(ref dir) = args.shader_dir {
        config.scene.shader_dir = Some(dir.clone());
    }

    if args.print_config {
        println!("{}", crystal_config::config_to_json(&config));
        return ExitCode::SUCCESS;
    }

    let loader = scene::shader_loader(&config);

    if args.dump_shaders {
        return match headless::dump_shaders(&config, loader.as_ref()) {
            Ok(text) => {
                print!("{text}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                tracing::error!("Shader composition failed: {e}");
                ExitCode::FAILURE
            }
        };
    }

    if args.headless {
        return match headless::run(&config, loader.as_ref(), args.frames) {
            Ok(report) => {
                print!("{}", report.render_text());
                ExitCode::SUCCESS
            }
            Err(e) => {
                tracing::error!("Headless run failed: {e}");
                ExitCode::FAILURE
            }
        };
    }

    let assets = scene::load_model(&config)
        .and_then(|mesh| Ok((mesh, scene::load_environment(&config)?)));
    let (mesh, environment) = match assets {
        Ok(assets) => assets,
        Err(e) => {
            tracing::error!("Failed to load scene: {e}");
            return ExitCode::FAILURE;
        }
    };

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(e) => {
            tracing::error!("Failed to create event loop: {e}");
            return ExitCode::FAILURE;
        }
    };
    let mut app = app_state::CrystalApp::new(config, loader, mesh, environment);

    tracing::info!("Entering event loop");
    if let Err(e) = event_loop.run_app(&mut app) {
        tracing::error!("Event loop error: {e}");
        return ExitCode::FAILURE;
    }
    if app.failed() {
        return ExitCode::FAILURE;
    }
    tracing::info!("Exited cleanly");
    ExitCode::SUCCESS
}
