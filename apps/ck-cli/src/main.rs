use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use ck_core::{CurvePoint, PointStatus};
use ck_session::{SessionDef, SessionError};
use ck_store::{CurveStore, SignalKind, StoreError};

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "ck-cli")]
#[command(about = "CurveKit CLI - inspect sessions and exercise the curve store", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Work with session files
    #[command(subcommand)]
    Session(SessionCommands),
    /// Walk through the display-mode transitions with two sample curves
    Demo,
    /// Simulate an interactive drag and report notification counts
    Drag {
        /// Number of points in the dragged curve
        #[arg(long, default_value_t = 100)]
        points: usize,
        /// Number of drag steps
        #[arg(long, default_value_t = 60)]
        steps: usize,
        /// Apply each step without batching
        #[arg(long)]
        unbatched: bool,
    },
}

#[derive(Subcommand)]
enum SessionCommands {
    /// Validate a session file (YAML, or JSON by extension)
    Validate {
        /// Path to the session file
        path: PathBuf,
    },
    /// Restore a session into a fresh store and print the derived display state
    Show {
        /// Path to the session file
        path: PathBuf,
        /// Load a placeholder curve under this name before restoring
        #[arg(long = "curve")]
        curves: Vec<String>,
    },
    /// Write a new session file
    New {
        /// Output path
        path: PathBuf,
        /// Curve to select (repeatable)
        #[arg(long = "select")]
        selected: Vec<String>,
        /// Show every visible curve
        #[arg(long)]
        show_all: bool,
    },
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Session(cmd) => match cmd {
            SessionCommands::Validate { path } => cmd_session_validate(&path),
            SessionCommands::Show { path, curves } => cmd_session_show(&path, &curves),
            SessionCommands::New {
                path,
                selected,
                show_all,
            } => cmd_session_new(&path, selected, show_all),
        },
        Commands::Demo => cmd_demo(),
        Commands::Drag {
            points,
            steps,
            unbatched,
        } => cmd_drag(points, steps, !unbatched),
    }
}

fn cmd_session_validate(path: &Path) -> CliResult<()> {
    println!("Validating session: {}", path.display());
    let session = ck_session::load(path)?;
    println!(
        "✓ Session is valid (version {}, {} selected curves)",
        session.version,
        session.selected_curves.len()
    );
    Ok(())
}

fn cmd_session_show(path: &Path, curves: &[String]) -> CliResult<()> {
    let session = ck_session::load(path)?;
    let store = CurveStore::new();
    for name in curves {
        store.set_curve_data(name, placeholder_curve(3))?;
    }
    ck_session::restore(&store, &session)?;
    print_display_state(&store);
    Ok(())
}

fn cmd_session_new(path: &Path, selected: Vec<String>, show_all: bool) -> CliResult<()> {
    let session = SessionDef::new(selected, show_all);
    ck_session::save(path, &session)?;
    println!("✓ Wrote session: {}", path.display());
    Ok(())
}

fn cmd_demo() -> CliResult<()> {
    let store = CurveStore::new();
    store.on_selection_state_changed(|curves, show_all| {
        println!("  -> selection_state_changed: {curves:?}, show_all={show_all}");
    });

    store.set_curve_data("A", vec![CurvePoint::new(1, 0.0, 0.0)])?;
    store.set_curve_data("B", vec![CurvePoint::new(1, 5.0, 5.0)])?;

    println!("set_selected_curves([A, B])");
    store.set_selected_curves(["A", "B"]);
    print_display_state(&store);

    println!("set_show_all_curves(true)");
    store.set_show_all_curves(true);
    print_display_state(&store);

    println!("set_selected_curves([])");
    store.set_selected_curves(Vec::<String>::new());
    print_display_state(&store);

    println!("set_show_all_curves(false)");
    store.set_show_all_curves(false);
    print_display_state(&store);

    Ok(())
}

fn cmd_drag(points: usize, steps: usize, batched: bool) -> CliResult<()> {
    let points = points.max(1);
    let store = CurveStore::new();
    store.set_curve_data("drag", placeholder_curve(points))?;
    store.reset_stats();

    let delivered = Arc::new(AtomicUsize::new(0));
    {
        let delivered = Arc::clone(&delivered);
        store.subscribe(SignalKind::CurvesChanged, move |_| {
            delivered.fetch_add(1, Ordering::Relaxed);
        });
    }

    let index = points / 2;
    let start = Instant::now();
    let drag = |s: &CurveStore| -> CliResult<()> {
        for step in 0..steps {
            let offset = step as f64 * 0.25;
            s.set_point_position("drag", index, index as f64 + offset, offset)?;
        }
        s.set_point_status("drag", index, PointStatus::Keyframe)?;
        Ok(())
    };
    if batched {
        store.transaction(drag)?;
    } else {
        drag(&store)?;
    }
    let elapsed = start.elapsed();

    let stats = store.stats();
    println!(
        "Drag of point {index} over {steps} steps ({}):",
        if batched { "batched" } else { "unbatched" }
    );
    println!("  curves_changed delivered: {}", delivered.load(Ordering::Relaxed));
    println!("  dispatched:               {}", stats.dispatched);
    println!("  coalesced:                {}", stats.coalesced);
    println!("  batches closed:           {}", stats.batches_closed);
    println!("  elapsed:                  {:.3} ms", elapsed.as_secs_f64() * 1e3);
    Ok(())
}

fn placeholder_curve(len: usize) -> Vec<CurvePoint> {
    (0..len)
        .map(|i| CurvePoint::new(i as i32 + 1, i as f64, 0.0))
        .collect()
}

fn print_display_state(store: &CurveStore) {
    let selected: Vec<String> = store.get_selected_curves().into_iter().collect();
    println!("  Selected curves: {selected:?}");
    println!("  Show all:        {}", store.get_show_all_curves());
    println!("  Display mode:    {}", store.display_mode());
    println!("  Visible curves:  {:?}", store.visible_curve_names());
}
