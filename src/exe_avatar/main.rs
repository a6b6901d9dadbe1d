use std::path::PathBuf;
use std::time::Duration;
use clap::Parser;
use glam::Vec3;
use math_signa::EulerAngles;
use nab_signa::app::{self, AppRun, ExitReason};
use nab_signa::RenderFrameNumber;
use nab_signa::timing::{Clock, Stopwatch};
use rig_signa::frame_scheduler::ScheduleEvent;
use rig_signa::keypoints::{load_frames_file, KeypointLoadError};
use rig_signa::{Avatar, FrameScheduler, FrameSlot, KeypointFrame, KeypointLibrary, Playback, PlaybackStatus, RetargetConfig};
use world_signa::gltf_import;

#[derive(Debug, Parser)]
#[command(about = "Drive a rigged model with keypoint animations")]
struct CliArgs
{
    /// Rigged .gltf/.glb model
    #[arg(long, required_unless_present = "print_config")]
    model: Option<PathBuf>,

    /// A JSON file of keypoint frames to play
    #[arg(long, conflicts_with = "library")]
    keypoints: Option<PathBuf>,

    /// Directory of <word>.json animations
    #[arg(long, requires = "word")]
    library: Option<PathBuf>,

    /// Word to look up in the library
    #[arg(long, requires = "library")]
    word: Option<String>,

    /// Retargeting config (TOML). Defaults are used if the file is missing
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the bones of the model, and what each known identifier resolves to, then exit
    #[arg(long, default_value_t = false)]
    list_bones: bool,

    /// Print the effective config, then exit
    #[arg(long, default_value_t = false)]
    print_config: bool,

    #[arg(long, default_value_t = 60.0)]
    render_hz: f32,

    /// Seconds to keep idling after playback is done
    #[arg(long, default_value_t = 1.0)]
    linger: f32,

    #[cfg(debug_assertions)]
    #[arg(long, default_value_t = false)]
    keep_alive_on_panic: bool,
}

fn main() -> ExitReason
{
    let app_run = AppRun::<CliArgs>::startup("signa", env!("CARGO_PKG_VERSION"));
    {
        #[cfg(debug_assertions)]
        let keep_alive = app_run.args.keep_alive_on_panic;
        #[cfg(not(debug_assertions))]
        let keep_alive = false;
        app::set_panic_hook(keep_alive);
    }

    #[cfg(feature = "frame_profiler")]
    let _puffin_server =
    {
        let server_addr = format!("0.0.0.0:{}", puffin_http::DEFAULT_PORT);
        puffin::set_scopes_on(true);
        match puffin_http::Server::new(&server_addr)
        {
            Ok(server) =>
            {
                log::debug!("Puffin serving on {server_addr}");
                Some(server)
            }
            Err(e) =>
            {
                log::warn!("Failed to start puffin server on {server_addr}: {e}");
                None
            }
        }
    };

    let config = match &app_run.args.config
    {
        Some(path) => RetargetConfig::load_or_default(path),
        None => Ok(RetargetConfig::default()),
    };
    let config = match config
    {
        Ok(config) => config,
        Err(err) =>
        {
            app_run.fail(ExitReason::LoadFailed, format_args!("Failed to load config: {err}"));
            return app_run.get_exit_reason();
        }
    };

    if app_run.args.print_config
    {
        match config.to_toml_string()
        {
            Ok(toml) => println!("{toml}"),
            Err(err) => app_run.fail(ExitReason::InvalidInput, format_args!("Failed to serialize config: {err}")),
        }
        return app_run.get_exit_reason();
    }

    let Some(model_path) = &app_run.args.model else
    {
        app_run.fail(ExitReason::InvalidInput, "No model given");
        return app_run.get_exit_reason();
    };
    let scene = match gltf_import::import_file(model_path)
    {
        Ok(scene) => scene,
        Err(err) =>
        {
            app_run.fail(ExitReason::LoadFailed, format_args!("Failed to import {model_path:?}: {err}"));
            return app_run.get_exit_reason();
        }
    };
    let mut avatar = Avatar::from_config(scene, &config);

    if app_run.args.list_bones
    {
        list_bones(&mut avatar);
        return app_run.get_exit_reason();
    }

    run(&app_run.args, &config, &mut avatar);
    log_final_pose(&avatar);
    app_run.get_exit_reason()
}

fn list_bones(avatar: &mut Avatar)
{
    println!("{} bones:", avatar.registry().bone_count());
    for name in avatar.registry().bone_names()
    {
        println!("  {name}");
    }

    let mut identifiers: Vec<String> = avatar.aliases().identifiers().map(str::to_string).collect();
    identifiers.sort();
    println!("Resolved identifiers:");
    for identifier in identifiers
    {
        match avatar.resolve(&identifier).and_then(|node| avatar.scene().node(node))
        {
            Some(node) => println!("  {identifier} -> {}", node.name),
            None => println!("  {identifier} -> (none)"),
        }
    }
}

// The word to show in status messages, and the frames to play for it
fn load_request(args: &CliArgs) -> Option<(String, Result<Vec<KeypointFrame>, KeypointLoadError>)>
{
    if let Some(path) = &args.keypoints
    {
        let word = path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
        return Some((word, load_frames_file(path)));
    }

    let library = KeypointLibrary::new(args.library.clone()?);
    let word = args.word.clone()?;
    let frames = library.load(&word);
    Some((word, frames))
}

fn run(args: &CliArgs, config: &RetargetConfig, avatar: &mut Avatar)
{
    let render_period = Duration::from_secs_f32(1.0 / args.render_hz.clamp(1.0, 1000.0));
    let linger = Duration::from_secs_f32(args.linger.max(0.0));

    let clock = Clock::new();
    let slot = FrameSlot::new();
    let mut playback = Playback::new(FrameScheduler::new(slot.clone(), config.playback.frame_period()));

    if let Some((word, frames)) = load_request(args)
    {
        playback.request(&word, frames, clock.time().now_nanos());
    }

    let mut idle_timer = Stopwatch::default();
    let mut frame_number = RenderFrameNumber::default();
    loop
    {
        puffin::GlobalProfiler::lock().new_frame();
        let time = clock.tick();
        frame_number.increment();
        let now = time.now_nanos();

        if let ScheduleEvent::Advanced { index } = playback.tick(now)
        {
            log::debug!("[{frame_number}] keypoint frame {index}");
        }

        let frame = slot.load();
        let report = avatar.update(frame.as_deref(), time.total_secs());
        if report.skipped > 0
        {
            log::debug!("[{frame_number}] applied {} bones, skipped {}", report.applied, report.skipped);
        }

        match playback.status()
        {
            PlaybackStatus::Playing(_) => idle_timer.reset(),
            _ => idle_timer.start(now),
        }
        if idle_timer.elapsed(now) >= linger
        {
            break;
        }

        let spent = clock.time().now.elapsed();
        if let Some(remaining) = render_period.checked_sub(spent)
        {
            std::thread::sleep(remaining);
        }
    }

    log::info!("Rendered {} frames, {} keypoint frames received. {}", frame_number.0, slot.writes(), playback.status());
}

fn log_final_pose(avatar: &Avatar)
{
    for index in avatar.driven_bones()
    {
        let (Some(node), Some(world)) = (avatar.scene().node(index), avatar.scene().world_matrix(index)) else { continue; };
        log::info!("{:>24}  local {:.3} {:#}  model {:.3}",
            node.name,
            node.local.position,
            EulerAngles::from_quat(node.local.rotation),
            world.transform_point3(Vec3::ZERO));
    }
}
