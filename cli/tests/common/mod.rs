// Shared helpers for integration tests.
//
// Provides a temporary home + dotfiles tree, a log that records every
// message, a prompter that replays scripted answers and a filesystem that
// refuses writes under chosen prefixes.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::SystemTime;

use clap::Parser;
use dotstow_cli::cli::Cli;
use dotstow_cli::commands::deploy::{Environment, deploy};
use dotstow_cli::deploy::Prompter;
use dotstow_cli::error::DeployError;
use dotstow_cli::logging::{Log, ProjectStatus};
use dotstow_cli::operations::{FileKind, FileSystemOps, SystemFileSystemOps};
use dotstow_cli::platform::{Os, Platform};
use dotstow_cli::style::Line;

/// An isolated home directory and dotfiles repository.
///
/// Paths are canonical so that link targets can be compared directly.
pub struct Fixture {
    _tmp: tempfile::TempDir,
    /// The home directory.
    pub home: PathBuf,
    /// `<home>/dotfiles`.
    pub dotfiles: PathBuf,
    /// Stand-in for `/etc`, outside home.
    pub etc: PathBuf,
}

impl Fixture {
    /// Create an empty home with an empty `dotfiles/` inside it.
    pub fn new() -> Self {
        let tmp = tempfile::tempdir().expect("create temp dir");
        let root = dunce::canonicalize(tmp.path()).expect("canonicalize temp dir");
        let home = root.join("home");
        let dotfiles = home.join("dotfiles");
        let etc = root.join("etc");
        std::fs::create_dir_all(&dotfiles).expect("create dotfiles");
        std::fs::create_dir_all(&etc).expect("create etc");
        Self {
            _tmp: tmp,
            home,
            dotfiles,
            etc,
        }
    }

    /// Write a source file under the dotfiles root and return its path.
    pub fn source(&self, rel: &str) -> PathBuf {
        write_file(&self.dotfiles.join(rel), rel)
    }

    /// Write a real file under home and return its path.
    pub fn home_file(&self, rel: &str) -> PathBuf {
        write_file(&self.home.join(rel), "local")
    }

    /// Create a real directory (with one file in it) under home.
    pub fn home_dir(&self, rel: &str) -> PathBuf {
        let dir = self.home.join(rel);
        write_file(&dir.join("keep"), "local");
        dir
    }

    /// Create a symlink under home pointing at `referent`.
    #[cfg(unix)]
    pub fn home_link(&self, rel: &str, referent: &Path) -> PathBuf {
        let link = self.home.join(rel);
        std::os::unix::fs::symlink(referent, &link).expect("create symlink");
        link
    }

    /// Write `dotstow.toml` with `etc_target` pointing at the fixture's etc.
    pub fn route_etc_to_fixture(&self, extra: &str) {
        let toml = format!("etc_target = {:?}\n{extra}", self.etc.display().to_string());
        std::fs::write(self.dotfiles.join("dotstow.toml"), toml).expect("write dotstow.toml");
    }

    /// Run the deploy command with `args` as an ordinary user.
    pub fn run(&self, args: &[&str], prompter: ScriptedPrompter) -> Outcome {
        self.run_with(args, false, &SystemFileSystemOps, prompter)
    }

    /// Run the deploy command with full control over privilege and filesystem.
    pub fn run_with(
        &self,
        args: &[&str],
        elevated: bool,
        fs: &dyn FileSystemOps,
        prompter: ScriptedPrompter,
    ) -> Outcome {
        let mut argv = vec!["dotstow", "--home"];
        let home = self.home.display().to_string();
        argv.push(&home);
        argv.extend_from_slice(args);
        let cli = Cli::parse_from(argv);

        let log = RecordingLog::default();
        let asked = prompter.asked.clone();
        let result = deploy(
            &cli,
            &Environment::default(),
            &Platform::new(Os::Linux, elevated),
            fs,
            Box::new(prompter),
            &log,
        );
        Outcome { result, log, asked }
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

fn write_file(path: &Path, contents: &str) -> PathBuf {
    std::fs::create_dir_all(path.parent().expect("parent")).expect("create parent");
    std::fs::write(path, contents).expect("write file");
    path.to_path_buf()
}

/// Set the modification time of `path`.
pub fn set_mtime(path: &Path, time: SystemTime) {
    std::fs::File::options()
        .write(true)
        .open(path)
        .expect("open for mtime")
        .set_modified(time)
        .expect("set mtime");
}

/// Where `link` points, or `None` if it is not a symlink.
pub fn link_of(link: &Path) -> Option<PathBuf> {
    std::fs::read_link(link).ok()
}

/// Result of one deploy run.
pub struct Outcome {
    /// What `deploy` returned.
    pub result: Result<(), DeployError>,
    /// Everything that was logged.
    pub log: RecordingLog,
    /// Questions put to the prompter, rendered without colour.
    pub asked: Arc<Mutex<Vec<String>>>,
}

impl Outcome {
    /// Number of prompts shown.
    pub fn prompts(&self) -> usize {
        self.asked.lock().expect("asked lock").len()
    }

    /// Exit code the binary would report.
    pub fn exit_code(&self) -> u8 {
        self.result.as_ref().map_or_else(DeployError::exit_code, |_| 0)
    }
}

/// A [`Log`] that keeps every message in memory.
#[derive(Default)]
pub struct RecordingLog {
    lines: Mutex<Vec<String>>,
    projects: Mutex<Vec<(String, ProjectStatus, Option<String>)>>,
}

impl RecordingLog {
    fn push(&self, level: &str, msg: &str) {
        self.lines
            .lock()
            .expect("lines lock")
            .push(format!("{level} {msg}"));
    }

    /// All messages, prefixed with their level.
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().expect("lines lock").clone()
    }

    /// Whether any message contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.lines().iter().any(|l| l.contains(needle))
    }

    /// Recorded project results.
    pub fn projects(&self) -> Vec<(String, ProjectStatus, Option<String>)> {
        self.projects.lock().expect("projects lock").clone()
    }

    /// Status recorded for `name`.
    pub fn status_of(&self, name: &str) -> Option<ProjectStatus> {
        self.projects()
            .into_iter()
            .find(|(n, _, _)| n == name)
            .map(|(_, status, _)| status)
    }
}

impl Log for RecordingLog {
    fn stage(&self, msg: &str) {
        self.push("STAGE", msg);
    }
    fn info(&self, msg: &str) {
        self.push("INFO", msg);
    }
    fn debug(&self, msg: &str) {
        self.push("DEBUG", msg);
    }
    fn warn(&self, msg: &str) {
        self.push("WARN", msg);
    }
    fn error(&self, msg: &str) {
        self.push("ERROR", msg);
    }
    fn dry_run(&self, msg: &str) {
        self.push("DRY", msg);
    }
    fn record_project(&self, name: &str, status: ProjectStatus, message: Option<&str>) {
        self.projects.lock().expect("projects lock").push((
            name.to_string(),
            status,
            message.map(String::from),
        ));
    }
}

/// A [`Prompter`] that replays a fixed list of answers.
///
/// Running out of answers behaves like closed input.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<String>,
    asked: Arc<Mutex<Vec<String>>>,
}

impl ScriptedPrompter {
    /// Answer with `answers`, in order.
    pub fn new(answers: &[&str]) -> Self {
        Self {
            answers: answers.iter().map(ToString::to_string).collect(),
            asked: Arc::default(),
        }
    }

    /// A prompter that must never be consulted.
    pub fn none() -> Self {
        Self::new(&[])
    }
}

impl Prompter for ScriptedPrompter {
    fn ask(&mut self, question: &[Line]) -> io::Result<Option<String>> {
        let rendered: Vec<String> = question.iter().map(ToString::to_string).collect();
        self.asked
            .lock()
            .expect("asked lock")
            .push(rendered.join("\n"));
        Ok(self.answers.pop_front())
    }
}

/// Real filesystem that fails every mutation under `prefix` with
/// permission denied.
#[derive(Debug)]
pub struct DenyingFs {
    prefix: PathBuf,
}

impl DenyingFs {
    /// Deny mutations under `prefix`.
    pub fn under(prefix: impl Into<PathBuf>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    fn check(&self, path: &Path) -> io::Result<()> {
        if path.starts_with(&self.prefix) {
            Err(io::Error::from(io::ErrorKind::PermissionDenied))
        } else {
            Ok(())
        }
    }
}

impl FileSystemOps for DenyingFs {
    fn kind(&self, path: &Path) -> io::Result<Option<FileKind>> {
        SystemFileSystemOps.kind(path)
    }
    fn exists(&self, path: &Path) -> bool {
        SystemFileSystemOps.exists(path)
    }
    fn is_dir(&self, path: &Path) -> bool {
        SystemFileSystemOps.is_dir(path)
    }
    fn modified(&self, path: &Path) -> io::Result<SystemTime> {
        SystemFileSystemOps.modified(path)
    }
    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        SystemFileSystemOps.canonicalize(path)
    }
    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        SystemFileSystemOps.read_dir(path)
    }
    fn symlink(&self, source: &Path, link: &Path, is_dir: bool) -> io::Result<()> {
        self.check(link)?;
        SystemFileSystemOps.symlink(source, link, is_dir)
    }
    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        self.check(path)?;
        SystemFileSystemOps.create_dir_all(path)
    }
    fn remove_link_or_file(&self, path: &Path) -> io::Result<()> {
        self.check(path)?;
        SystemFileSystemOps.remove_link_or_file(path)
    }
    fn remove_dir_all(&self, path: &Path) -> io::Result<()> {
        self.check(path)?;
        SystemFileSystemOps.remove_dir_all(path)
    }
}
