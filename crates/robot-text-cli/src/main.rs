use anyhow::{Context, Result, bail};
use robot_text_config::Config;
use robot_text_engine::{
    DumpOptions, ExecutableHolder, FileFormat, ModelElement, ParseOutput, RobotFile, RobotVersion,
    Severity, TableKind, dump, io,
};
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};
use std::{env, fs, process};

const USAGE: &str = "Usage: robot-text-cli [--version X.Y] [--config PATH] <tokens|model|check|fmt> [paths...]";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Tokens,
    Model,
    Check,
    Fmt,
}

#[derive(Debug, PartialEq)]
struct Args {
    version: Option<RobotVersion>,
    config: Option<PathBuf>,
    command: Command,
    paths: Vec<String>,
}

fn parse_args(args: &[String]) -> Result<Args> {
    let mut version = None;
    let mut config = None;
    let mut command = None;
    let mut paths = Vec::new();

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--version" if command.is_none() => {
                let value = iter.next().context("--version needs a value")?;
                version = Some(value.parse::<RobotVersion>()?);
            }
            "--config" if command.is_none() => {
                let value = iter.next().context("--config needs a path")?;
                config = Some(PathBuf::from(value));
            }
            other if command.is_none() => {
                command = Some(match other {
                    "tokens" => Command::Tokens,
                    "model" => Command::Model,
                    "check" => Command::Check,
                    "fmt" => Command::Fmt,
                    _ => bail!("Unknown command {other:?}"),
                });
            }
            other => paths.push(other.to_string()),
        }
    }

    let command = command.context("No command given")?;
    if matches!(command, Command::Tokens | Command::Model) && paths.len() != 1 {
        bail!("{command:?} takes exactly one file");
    }

    Ok(Args {
        version,
        config,
        command,
        paths,
    })
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    let loaded = match path {
        Some(path) => {
            Config::load_from_path(path)?.with_context(|| format!("No config file at {}", path.display()))?
        }
        None => Config::load()?.unwrap_or_default(),
    };
    Ok(loaded)
}

fn has_glob_meta(arg: &str) -> bool {
    arg.contains(['*', '?', '['])
}

/// Turn command line arguments into files: glob patterns are expanded,
/// directories scanned, and with no arguments the configured suite roots
/// are used.
fn resolve_paths(args: &[String], config: &Config) -> Result<Vec<PathBuf>> {
    if args.is_empty() {
        if config.suite_roots.is_empty() {
            bail!("No paths given and no suite_roots configured");
        }
        return Ok(config.suite_files()?);
    }

    let mut files = Vec::new();
    for arg in args {
        if has_glob_meta(arg) {
            for entry in glob::glob(arg).with_context(|| format!("Invalid pattern {arg:?}"))? {
                let path = entry?;
                if path.is_file() && FileFormat::from_path(&path).is_some() {
                    files.push(path);
                }
            }
        } else {
            let path = PathBuf::from(arg);
            if path.is_dir() {
                files.extend(io::scan_robot_files(&path)?);
            } else {
                files.push(path);
            }
        }
    }
    files.retain(|path| !config.is_excluded(path));
    Ok(files)
}

fn print_tokens(file: &RobotFile) {
    for line in file.lines() {
        for id in line.tokens() {
            if let Some(token) = file.get_token(id)
                && let Some(position) = token.position()
            {
                println!(
                    "{}:{} {:?} {:?}",
                    position.line,
                    position.column,
                    token.primary_type(),
                    token.text()
                );
            }
        }
    }
}

fn element_summary(file: &RobotFile, element: &ModelElement) -> String {
    let cells: Vec<&str> = element
        .element_tokens()
        .into_iter()
        .filter_map(|id| file.get_token_text(id))
        .collect();
    format!("{:?}: {}", element.kind(), cells.join(" | "))
}

fn print_holder(file: &RobotFile, holder: &ExecutableHolder) {
    let name = file.get_token_text(holder.name()).unwrap_or_default();
    println!("  {:?} {name:?}", holder.kind());
    for element in holder.elements() {
        println!("    {}", element_summary(file, element));
    }
}

fn print_model(file: &RobotFile) {
    const TABLES: [TableKind; 5] = [
        TableKind::Settings,
        TableKind::Variables,
        TableKind::TestCases,
        TableKind::Tasks,
        TableKind::Keywords,
    ];
    for kind in TABLES.into_iter().filter(|kind| file.has_table(*kind)) {
        println!("{kind:?}");
        if let Some(table) = file.element_table(kind) {
            for element in table.elements() {
                println!("  {}", element_summary(file, element));
            }
        }
        if let Some(table) = file.holder_table(kind) {
            for holder in table.holders() {
                print_holder(file, holder);
            }
        }
    }
}

fn print_diagnostics(path: &Path, output: &ParseOutput) {
    output.report_to(&mut |diagnostic: &robot_text_engine::Diagnostic| {
        eprintln!("{}:{diagnostic}", path.display());
        ControlFlow::Continue(())
    });
}

/// Parse every file, report diagnostics and verify that an untouched dump
/// reproduces the source. Returns whether every file passed.
fn check(paths: &[PathBuf], version: RobotVersion) -> bool {
    let mut passed = true;
    for (path, result) in io::parse_files_parallel(paths, version) {
        let output = match result {
            Ok(output) => output,
            Err(e) => {
                eprintln!("{}: {e}", path.display());
                passed = false;
                continue;
            }
        };
        print_diagnostics(&path, &output);

        let errors = output
            .diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count();
        let round_trip = match fs::read_to_string(&path) {
            Ok(source) => dump(&output.file, &DumpOptions::default()) == source,
            Err(e) => {
                eprintln!("{}: {e}", path.display());
                false
            }
        };
        if !round_trip {
            eprintln!("{}: dump does not reproduce the source", path.display());
        }
        if errors > 0 || !round_trip {
            passed = false;
            println!("FAIL {}", path.display());
        } else {
            println!("ok   {}", path.display());
        }
    }
    passed
}

fn format_files(paths: &[PathBuf], version: RobotVersion, options: &DumpOptions) -> Result<()> {
    let options = DumpOptions {
        regenerate_all: true,
        ..options.clone()
    };
    for path in paths {
        let output = io::parse_path(path, version)?;
        io::save_file(&output.file, path, &options)?;
        println!("formatted {}", path.display());
    }
    Ok(())
}

fn run(args: Args) -> Result<bool> {
    let config = load_config(args.config.as_deref())?;
    let version = args.version.unwrap_or(config.robot_version);
    log::debug!("using Robot Framework {version}");

    match args.command {
        Command::Tokens | Command::Model => {
            let path = Path::new(&args.paths[0]);
            let output = io::parse_path(path, version)?;
            print_diagnostics(path, &output);
            if args.command == Command::Tokens {
                print_tokens(&output.file);
            } else {
                print_model(&output.file);
            }
            Ok(true)
        }
        Command::Check => {
            let paths = resolve_paths(&args.paths, &config)?;
            log::info!("checking {} files", paths.len());
            Ok(check(&paths, version))
        }
        Command::Fmt => {
            let paths = resolve_paths(&args.paths, &config)?;
            format_files(&paths, version, &config.dump)?;
            Ok(true)
        }
    }
}

fn main() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let raw: Vec<String> = env::args().skip(1).collect();
    let args = match parse_args(&raw) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("{USAGE}");
            process::exit(2);
        }
    };

    match run(args) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("Error: {e:#}");
            process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_args_with_options() {
        let parsed = parse_args(&args(&["--version", "3.0", "--config", "/tmp/c.toml", "check", "a.robot", "b.robot"])).unwrap();

        assert_eq!(
            parsed,
            Args {
                version: Some(RobotVersion::minor(3, 0)),
                config: Some(PathBuf::from("/tmp/c.toml")),
                command: Command::Check,
                paths: args(&["a.robot", "b.robot"]),
            }
        );
    }

    #[test]
    fn test_parse_args_rejects_bad_input() {
        assert!(parse_args(&args(&[])).is_err());
        assert!(parse_args(&args(&["lint"])).is_err());
        assert!(parse_args(&args(&["--version", "x", "check"])).is_err());
        assert!(parse_args(&args(&["tokens"])).is_err());
        assert!(parse_args(&args(&["model", "a.robot", "b.robot"])).is_err());
    }

    #[test]
    fn test_resolve_paths_expands_globs_and_directories() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir(root.join("nested")).unwrap();
        fs::write(root.join("a.robot"), "*** Settings ***\n").unwrap();
        fs::write(root.join("b.robot"), "*** Settings ***\n").unwrap();
        fs::write(root.join("notes.md"), "# notes\n").unwrap();
        fs::write(root.join("nested").join("c.resource"), "*** Keywords ***\n").unwrap();
        let config = Config::default();

        let globbed = resolve_paths(&[format!("{}/*", root.display())], &config).unwrap();
        assert_eq!(globbed, vec![root.join("a.robot"), root.join("b.robot")]);

        let scanned = resolve_paths(&[root.join("nested").display().to_string()], &config).unwrap();
        assert_eq!(scanned, vec![root.join("nested").join("c.resource")]);
    }

    #[test]
    fn test_resolve_paths_falls_back_to_suite_roots() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("a.robot"), "*** Settings ***\n").unwrap();
        let config = Config {
            suite_roots: vec![temp_dir.path().to_path_buf()],
            ..Config::default()
        };

        let files = resolve_paths(&[], &config).unwrap();

        assert_eq!(files, vec![temp_dir.path().join("a.robot")]);
        assert!(resolve_paths(&[], &Config::default()).is_err());
    }

    #[test]
    fn test_check_detects_failures() {
        let temp_dir = TempDir::new().unwrap();
        let good = temp_dir.path().join("good.robot");
        fs::write(&good, "*** Test Cases ***\nT\n    Log    hi\n").unwrap();
        let missing = temp_dir.path().join("missing.robot");

        assert!(check(std::slice::from_ref(&good), RobotVersion::LATEST));
        assert!(!check(&[good, missing], RobotVersion::LATEST));
    }

    #[test]
    fn test_fmt_rewrites_with_configured_layout() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("suite.robot");
        fs::write(&path, "*** Test Cases ***\nT\n  Log  hi\n").unwrap();
        let options = DumpOptions {
            separator_width: 4,
            ..DumpOptions::default()
        };

        format_files(std::slice::from_ref(&path), RobotVersion::LATEST, &options).unwrap();

        let formatted = fs::read_to_string(&path).unwrap();
        assert!(formatted.contains("    Log    hi\n"), "got {formatted:?}");
        assert!(check(&[path], RobotVersion::LATEST));
    }
}
