//! Command-line front-end over the `imagefs` library.
//!
//! Thin by design: this binary only parses arguments, loads/creates the
//! image, dispatches to the matching [`imagefs::FileSystem`] method, and
//! prints the result. None of the namespace or allocation logic lives
//! here. Exit codes follow a three-way convention: `0` on success, `-1`
//! for a namespace-level failure (bad path, not found, already exists, out
//! of space, ...), `-2` for an image-level failure (I/O error, corrupt or
//! truncated image).

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use imagefs::FsError;

/// Operate on a fixed-capacity image-backed toy filesystem.
#[derive(Parser, Debug)]
#[command(name = "imagefs", version, about)]
struct Cli {
    /// Path to the image file.
    image: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a new image with the given inode/data-block capacity.
    Create {
        /// Number of inode and data block slots.
        #[arg(long, default_value_t = 128)]
        slots: u32,
    },
    /// Create a directory.
    Mkdir { path: String },
    /// Create an empty regular file.
    Mkfile { path: String },
    /// List the immediate children of a directory.
    List { path: String },
    /// Append bytes read from stdin to a regular file.
    Writef { path: String },
    /// Print the contents of a regular file to stdout.
    Readf { path: String },
    /// Remove a file or directory, recursively.
    Rm { path: String },
    /// Import a host file into a directory, named after its basename.
    Import {
        host_path: PathBuf,
        internal_dir: String,
    },
    /// Export an internal file to a new host file.
    Export {
        internal_path: String,
        host_path: PathBuf,
    },
    /// Recursively print a directory's contents, indented by depth.
    Tree { path: String },
}

fn print_tree(fs: &imagefs::FileSystem, path: &str, depth: usize) -> imagefs::Result<()> {
    for line in fs.list(path)?.lines() {
        println!("{}{}", "  ".repeat(depth), line);
        if let Some(name) = line.strip_prefix("DIR ") {
            let child = if path == "/" {
                format!("/{name}")
            } else {
                format!("{path}/{name}")
            };
            print_tree(fs, &child, depth + 1)?;
        }
    }
    Ok(())
}

fn load(image: &std::path::Path) -> Result<imagefs::FileSystem> {
    imagefs::FileSystem::load(image)
        .with_context(|| format!("loading image {}", image.display()))
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Create { slots } => {
            imagefs::FileSystem::create(&cli.image, slots)
                .with_context(|| format!("creating image {}", cli.image.display()))?;
            println!("created {} with {slots} slots", cli.image.display());
        }
        Command::Mkdir { path } => {
            let mut fs = load(&cli.image)?;
            fs.mkdir(&path).with_context(|| format!("mkdir {path}"))?;
            fs.dump(&cli.image)?;
        }
        Command::Mkfile { path } => {
            let mut fs = load(&cli.image)?;
            fs.mkfile(&path).with_context(|| format!("mkfile {path}"))?;
            fs.dump(&cli.image)?;
        }
        Command::List { path } => {
            let fs = load(&cli.image)?;
            print!("{}", fs.list(&path).with_context(|| format!("list {path}"))?);
        }
        Command::Writef { path } => {
            let mut fs = load(&cli.image)?;
            let mut data = Vec::new();
            std::io::Read::read_to_end(&mut std::io::stdin(), &mut data)
                .context("reading stdin")?;
            let written = fs
                .writef(&path, &data)
                .with_context(|| format!("writef {path}"))?;
            fs.dump(&cli.image)?;
            eprintln!("wrote {written}/{} bytes", data.len());
        }
        Command::Readf { path } => {
            let fs = load(&cli.image)?;
            let data = fs.readf(&path).with_context(|| format!("readf {path}"))?;
            std::io::Write::write_all(&mut std::io::stdout(), &data).context("writing stdout")?;
        }
        Command::Rm { path } => {
            let mut fs = load(&cli.image)?;
            fs.rm(&path).with_context(|| format!("rm {path}"))?;
            fs.dump(&cli.image)?;
        }
        Command::Import {
            host_path,
            internal_dir,
        } => {
            let mut fs = load(&cli.image)?;
            fs.import(&host_path, &internal_dir).with_context(|| {
                format!(
                    "importing {} into {internal_dir}",
                    host_path.display()
                )
            })?;
            fs.dump(&cli.image)?;
        }
        Command::Export {
            internal_path,
            host_path,
        } => {
            let fs = load(&cli.image)?;
            fs.export(&internal_path, &host_path).with_context(|| {
                format!("exporting {internal_path} to {}", host_path.display())
            })?;
        }
        Command::Tree { path } => {
            let fs = load(&cli.image)?;
            print_tree(&fs, &path, 0).with_context(|| format!("tree {path}"))?;
        }
    }
    Ok(())
}

/// Map the root `FsError` in `e`'s cause chain, if any, to this CLI's
/// two-way exit code split: fatal I/O or a corrupt image during
/// `load`/`create` is distinguished from an ordinary namespace-level
/// operation failure.
fn exit_code_for(e: &anyhow::Error) -> u8 {
    let is_image_level = e
        .chain()
        .find_map(|cause| cause.downcast_ref::<FsError>())
        .is_some_and(|fs_err| {
            matches!(
                fs_err,
                FsError::Io(_) | FsError::Serialize(_) | FsError::InvalidImage(_)
            )
        });
    if is_image_level {
        254 // -2
    } else {
        255 // -1
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::from(0),
        Err(e) => {
            eprintln!("imagefs: {e:#}");
            ExitCode::from(exit_code_for(&e))
        }
    }
}
