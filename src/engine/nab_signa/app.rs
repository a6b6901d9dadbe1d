use std::fmt::{Debug, Display, Formatter};
use std::io::Read;
use std::panic::PanicHookInfo;
use std::process::ExitCode;
use std::sync::atomic::{AtomicI32, Ordering};

// Crates logged at the app's level rather than the global (quieter) one
const SIGNA_CRATES: [&str; 4] =
[
    "math_signa",
    "nab_signa",
    "rig_signa",
    "world_signa",
];

pub trait CliArgs: clap::Parser + Debug { }
impl<T: clap::Parser + Debug> CliArgs for T { }

// The crate a type was declared in, e.g. `signa` for the exe's CLI args
fn crate_name<T>() -> &'static str
{
    let name = std::any::type_name::<T>();
    name.split("::").next().unwrap_or(name)
}

// Dependencies log warnings and up; our crates log debug (info in release). RUST_LOG overrides both
fn init_logging(app_crate: &str)
{
    let crate_level = match cfg!(debug_assertions)
    {
        true => log::LevelFilter::Debug,
        false => log::LevelFilter::Info,
    };

    let mut builder = colog::basic_builder();
    builder
        .filter_level(log::LevelFilter::Warn)
        .filter_module(app_crate, crate_level);
    for signa_crate in SIGNA_CRATES
    {
        builder.filter_module(signa_crate, crate_level);
    }
    builder.parse_default_env().init();
}

// A single run of an app: its parsed arguments, and how it is going to exit
#[derive(Debug)]
pub struct AppRun<TCliArgs: CliArgs>
{
    pub app_name: &'static str,
    pub version_str: &'static str,
    pub start_time: chrono::DateTime<chrono::Local>,
    pub args: TCliArgs,
    pub pid: u32,
    pub is_elevated: bool,
    exit_reason: AtomicI32,
}
impl<TCliArgs: CliArgs> AppRun<TCliArgs>
{
    // Set up logging and parse the command line. Exits the process if the arguments are bad
    pub fn startup(app_name: &'static str, app_version: &'static str) -> Self
    {
        let app_crate = crate_name::<TCliArgs>();
        init_logging(app_crate);

        let app_run = Self
        {
            app_name,
            version_str: app_version,
            start_time: chrono::Local::now(),
            args: TCliArgs::parse(),
            pid: std::process::id(),
            is_elevated: is_root::is_root(),
            exit_reason: AtomicI32::new(ExitReason::NormalExit as i32),
        };

        log::info!(target: app_crate,
            "=== {} v{} [{}] (PID {}){} started at {} ===",
            app_run.app_name,
            app_run.version_str,
            std::env::args().collect::<Vec<_>>().join(" "),
            app_run.pid,
            if app_run.is_elevated { " elevated" } else { "" },
            app_run.start_time.format("%F %T"));
        log::debug!(target: app_crate, "{:?}", app_run.args);

        app_run
    }

    // The first failure is kept, later ones are only logged
    pub fn fail(&self, exit_reason: ExitReason, error: impl Display)
    {
        log::error!("{exit_reason}: {error}");
        let _ = self.exit_reason.compare_exchange(ExitReason::NormalExit as i32, exit_reason as i32, Ordering::SeqCst, Ordering::SeqCst);
    }

    pub fn get_exit_reason(&self) -> ExitReason
    {
        ExitReason::from_code(self.exit_reason.load(Ordering::SeqCst))
    }
}
impl<TCliArgs: CliArgs> Drop for AppRun<TCliArgs>
{
    fn drop(&mut self)
    {
        let run_time = chrono::Local::now() - self.start_time;
        log::info!(target: "app",
            "=== {} (PID {}) exiting after {:.1}s: {} ===",
            self.app_name,
            self.pid,
            run_time.num_milliseconds() as f64 / 1000.0,
            self.get_exit_reason());
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitReason
{
    Unset = -1,
    NormalExit = 0,
    InvalidInput = 2,
    // a model, config or animation could not be loaded
    LoadFailed = 3,
    Panic = 99,
}
impl ExitReason
{
    fn from_code(code: i32) -> Self
    {
        match code
        {
            0 => Self::NormalExit,
            2 => Self::InvalidInput,
            3 => Self::LoadFailed,
            99 => Self::Panic,
            _ => Self::Unset,
        }
    }
}
impl Display for ExitReason
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result
    {
        f.write_str(match self
        {
            Self::Unset => "unknown",
            Self::NormalExit => "normal exit",
            Self::InvalidInput => "invalid input",
            Self::LoadFailed => "load failed",
            Self::Panic => "panic",
        })
    }
}
impl std::process::Termination for ExitReason
{
    fn report(self) -> ExitCode
    {
        ExitCode::from(self as i32 as u8)
    }
}

// What a panic said, and where
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanicReport
{
    pub message: String,
    pub location: Option<String>,
}
impl PanicReport
{
    fn from_hook_info(info: &PanicHookInfo<'_>) -> Self
    {
        let payload = info.payload();
        let message = payload.downcast_ref::<&str>().map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "<non-string panic payload>".to_string());
        Self
        {
            message,
            location: info.location().map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column())),
        }
    }
}
impl Display for PanicReport
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result
    {
        match &self.location
        {
            Some(location) => write!(f, "{} (at {location})", self.message),
            None => f.write_str(&self.message),
        }
    }
}

// Any panic ends the app via fatal_error. Debug builds can optionally wait for a key press first
pub fn set_panic_hook(wait_for_exit: bool)
{
    let default_panic_hook = std::panic::take_hook();

    std::panic::set_hook(Box::new(move |info|
    {
        default_panic_hook(info);

        if wait_for_exit
        {
            eprint!("Press any key to exit... ");
            let mut input = [0u8];
            let _ = std::io::stdin().read(&mut input);
        }

        fatal_error(&PanicReport::from_hook_info(info))
    }));
}

// Exit the app immediately
pub fn fatal_error(report: &PanicReport) -> !
{
    eprintln!("!!! FATAL: {report}");
    eprintln!("Exiting (PID {}) at {} with reason {}",
        std::process::id(),
        chrono::Local::now().format("%F %T"),
        ExitReason::Panic);

    std::process::exit(ExitReason::Panic as i32)
}
