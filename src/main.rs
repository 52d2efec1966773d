#![deny(
    warnings,
    missing_debug_implementations,
    missing_docs,
    clippy::all,
    clippy::pedantic,
    clippy::nursery
)]
//! `freecad-finder` - Locate FreeCAD installation directories for use from a
//! standalone Python.

use std::env;
use std::ffi::OsStr;
use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_cargo::style::CLAP_STYLING;
use freecad_finder::{
    HostEnv, Placement, Platform, Result, RootSource, SearchOptions, SearchResult,
    enumerate_candidate_roots, find_application_paths_with, validate_and_collect,
};

/// Environment variable holding the Python import search list
const PYTHONPATH_VAR: &str = "PYTHONPATH";

/// CLI arguments for `freecad-finder`
#[derive(Parser, Debug)]
#[command(author, version, about, styles = CLAP_STYLING)]
struct Cli {
    #[command(flatten)]
    search: SearchArgs,

    #[command(subcommand)]
    command: Command,
}

/// Options shared by every command
#[derive(Args, Debug)]
struct SearchArgs {
    /// Extra installation root, searched before the defaults (repeatable)
    #[arg(long = "root", value_name = "DIR", global = true)]
    roots: Vec<PathBuf>,

    /// Use another platform's tables; its default locations are listed with
    /// --verbose but only searched when they are absolute paths on this host
    #[arg(long, value_enum, global = true)]
    platform: Option<Platform>,

    /// FreeCAD library root [default: $FREECAD_LIB_ROOT]
    #[arg(long, value_name = "DIR", global = true)]
    lib_root: Option<PathBuf>,

    /// FreeCAD executable whose install is searched [default: $FREECAD_EXECUTABLE]
    #[arg(long, value_name = "FILE", global = true)]
    executable: Option<PathBuf>,

    /// Also list every workbench directory under Mod
    #[arg(long, global = true)]
    module_children: bool,

    /// Only accept installs that contain the FreeCAD core library
    #[arg(long, global = true)]
    require_library: bool,

    /// Report every candidate on stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Command {
    /// Print discovered directories, one per line
    List,
    /// Print $PYTHONPATH with discovered directories added
    Pythonpath {
        /// Put discovered directories before existing entries
        #[arg(long)]
        prepend: bool,
    },
}

impl SearchArgs {
    /// Sample the host, letting flags win over the environment
    fn host(&self) -> HostEnv {
        let mut env = HostEnv::detect();
        if let Some(platform) = self.platform {
            env.platform = platform;
        }
        if let Some(lib_root) = &self.lib_root {
            env.lib_root = Some(lib_root.clone());
        }
        if let Some(executable) = &self.executable {
            env.executable = Some(executable.clone());
        }
        env
    }

    const fn options(&self, placement: Placement) -> SearchOptions {
        SearchOptions {
            module_children: self.module_children,
            require_core_library: self.require_library,
            placement,
        }
    }
}

/// Report every candidate on stderr when verbose
fn trace(args: &SearchArgs, env: &HostEnv) -> Result<()> {
    if !args.verbose {
        return Ok(());
    }
    eprintln!("Searching {} install locations", env.platform);
    for candidate in enumerate_candidate_roots(env, &args.roots)? {
        let path = candidate.path();
        let state = if candidate.source() == RootSource::PlatformDefault && !path.is_absolute() {
            "foreign"
        } else if path.is_dir() {
            "found"
        } else {
            "missing"
        };
        eprintln!("  [{:<7}] {} ({})", state, path.display(), candidate.source());
    }
    Ok(())
}

/// Summarize a finished search on stderr
fn report(args: &SearchArgs, result: &SearchResult) {
    if result.is_empty() {
        eprintln!("No FreeCAD installation found.");
        eprintln!("Tips:");
        eprintln!("  - Pass the install or build directory with --root");
        eprintln!("  - Set FREECAD_LIB_ROOT or FREECAD_EXECUTABLE");
    } else if args.verbose {
        eprintln!("Discovered {} directories", result.len());
    }
}

/// Print discovered directories
fn list(args: &SearchArgs) -> Result<()> {
    let env = args.host();
    trace(args, &env)?;

    let candidates = enumerate_candidate_roots(&env, &args.roots)?;
    let options = args.options(Placement::Append);
    let result = validate_and_collect(env.platform, candidates, &options)?;
    report(args, &result);

    for discovered in &result {
        if args.verbose {
            let kind = discovered.kind.to_string();
            println!("{kind:<12} {}", discovered.path.display());
        } else {
            println!("{}", discovered.path.display());
        }
    }
    Ok(())
}

/// Print the import search list with discovered directories registered
fn pythonpath(args: &SearchArgs, prepend: bool) -> Result<()> {
    let placement = if prepend { Placement::Prepend } else { Placement::Append };
    let env = args.host();
    trace(args, &env)?;

    let mut target: Vec<PathBuf> = env::var_os(PYTHONPATH_VAR)
        .map(|value| env::split_paths(&value).filter(|p| !p.as_os_str().is_empty()).collect())
        .unwrap_or_default();
    let before = target.len();
    let result =
        find_application_paths_with(&env, &args.roots, &args.options(placement), &mut target)?;
    report(args, &result);
    if args.verbose {
        eprintln!("Added {} entries to {PYTHONPATH_VAR}", target.len() - before);
    }

    write_line(&env::join_paths(&target)?)
}

/// Write a value and a newline to stdout without re-encoding it
fn write_line(value: &OsStr) -> Result<()> {
    let mut out = io::stdout().lock();
    #[cfg(unix)]
    {
        use std::os::unix::ffi::OsStrExt;
        out.write_all(value.as_bytes())?;
    }
    #[cfg(not(unix))]
    {
        // Windows consoles expect text; unpaired surrogates cannot be written
        out.write_all(value.to_string_lossy().as_bytes())?;
    }
    out.write_all(b"\n")?;
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::List => list(&cli.search),
        Command::Pythonpath { prepend } => pythonpath(&cli.search, prepend),
    };

    if let Err(e) = result {
        eprintln!("{}", e.user_message());
        std::process::exit(1);
    }
}
