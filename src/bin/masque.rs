//! masque - generate CSS mask icon code from SVG files
//!
//! Reads SVG files, prints (or writes) the generated CSS and HTML, and can
//! emit a standalone preview page or copy the output to the clipboard.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::rc::Rc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info, warn};

use masque::{
    Clipboard, Command, Configurable, CopyTarget, DataUrlPreviews, HexColor, IconSize,
    MasqueError, MasqueProfile, Outcome, SelectorStyle, Session, Setting, UploadedFile, logging,
};

/// masque - generate CSS mask icon code from SVG files
#[derive(Parser, Debug)]
#[command(name = "masque", version, about, long_about = None)]
struct Args {
    /// SVG files to turn into icons (other files are skipped)
    #[arg(required_unless_present = "print_settings")]
    files: Vec<PathBuf>,

    /// JSON profile with style settings and output options
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Icon size in em
    #[arg(long)]
    size: Option<IconSize>,

    /// Base icon color (#rgb or #rrggbb)
    #[arg(long)]
    color: Option<HexColor>,

    /// Color on hover and focus
    #[arg(long)]
    color_hover: Option<HexColor>,

    /// Color under [data-theme="dark"]
    #[arg(long)]
    color_dark: Option<HexColor>,

    /// How icons are selected in CSS and named in HTML
    #[arg(long, value_enum)]
    selector: Option<SelectorStyle>,

    /// Directory prefix of the icon paths in the CSS
    #[arg(long)]
    icon_dir: Option<String>,

    /// Write the CSS here instead of stdout
    #[arg(long)]
    css: Option<PathBuf>,

    /// Write the HTML here instead of stdout
    #[arg(long)]
    html: Option<PathBuf>,

    /// Write a standalone preview page
    #[arg(long)]
    preview: Option<PathBuf>,

    /// Copy the generated CSS or HTML to the system clipboard
    #[arg(long, value_enum)]
    copy: Option<CopyTarget>,

    /// Print the effective settings as JSON and exit
    #[arg(long)]
    print_settings: bool,

    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Clipboard backed by the desktop clipboard.
struct SystemClipboard;

impl Clipboard for SystemClipboard {
    fn write_text(&mut self, text: &str) -> masque::Result<()> {
        cli_clipboard::set_contents(text.to_owned())
            .map_err(|e| MasqueError::Clipboard(e.to_string()))
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    logging::init(args.verbose);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    let profile = load_profile(&args)?;

    if args.print_settings {
        println!("{}", profile.to_json_pretty()?);
        return Ok(());
    }

    let mut session =
        Session::new(Rc::new(DataUrlPreviews::new())).with_clipboard(SystemClipboard);
    session.apply_profile(&profile);

    let files = args
        .files
        .iter()
        .map(|path| UploadedFile::from_path(path))
        .collect::<Result<Vec<_>, _>>()?;
    let submitted = files.len();
    session.dispatch(Command::FilesSubmitted(files));

    let accepted = session.registry().len();
    if accepted < submitted {
        info!(skipped = submitted - accepted, "skipped non-SVG or duplicate files");
    }
    if accepted == 0 {
        warn!("no SVG icons found");
    }

    write_or_print(args.css.as_deref(), session.css())?;
    write_or_print(args.html.as_deref(), session.html())?;

    if let Some(path) = &args.preview {
        let page = preview_page(&session);
        fs::write(path, page).with_context(|| format!("failed to write {}", path.display()))?;
        info!("wrote preview to {}", path.display());
    }

    if let Some(target) = args.copy {
        // Failures are logged by the session.
        if let Outcome::Copied(feedback) = session.dispatch(Command::CopyRequested(target)) {
            eprintln!("{} ({target})", feedback.label);
        }
    }

    Ok(())
}

/// The profile file (if any) with command-line overrides applied on top.
fn load_profile(args: &Args) -> Result<MasqueProfile> {
    let mut profile = match &args.settings {
        Some(path) => {
            debug!("loading settings from {}", path.display());
            MasqueProfile::from_file(path)?
        }
        None => MasqueProfile::default(),
    };

    let overrides = [
        args.size.map(Setting::Size),
        args.color.map(Setting::Color),
        args.color_hover.map(Setting::ColorHover),
        args.color_dark.map(Setting::ColorDark),
    ];
    for setting in overrides.into_iter().flatten() {
        profile.style.set(setting);
    }

    if let Some(selector) = args.selector {
        profile.output.selector = selector;
    }
    if let Some(dir) = &args.icon_dir {
        profile.output.icon_dir = dir.clone();
    }

    Ok(profile)
}

fn write_or_print(path: Option<&Path>, text: &str) -> Result<()> {
    match path {
        Some(path) => {
            fs::write(path, text).with_context(|| format!("failed to write {}", path.display()))?;
            info!("wrote {}", path.display());
        }
        None => print_text(&mut io::stdout().lock(), text)?,
    }
    Ok(())
}

/// Writes `text`, ending it with a newline if it lacks one.
fn print_text(out: &mut impl Write, text: &str) -> io::Result<()> {
    out.write_all(text.as_bytes())?;
    if !text.ends_with('\n') {
        writeln!(out)?;
    }
    Ok(())
}

/// A self-contained page showing every icon with the generated styles.
fn preview_page(session: &Session) -> String {
    let view = session.view();
    format!(
        "<!doctype html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>masque preview</title>\n<style>\n{}</style>\n</head>\n<body>\n{}\n</body>\n</html>\n",
        view.css,
        view.preview_html(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("masque").chain(args.iter().copied())).unwrap()
    }

    fn profile_file(json: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    #[test]
    fn files_are_required_unless_printing_settings() {
        assert!(Args::try_parse_from(["masque"]).is_err());
        assert!(Args::try_parse_from(["masque", "--print-settings"]).is_ok());
    }

    #[test]
    fn defaults_without_settings_or_flags() {
        let profile = load_profile(&parse(&["a.svg"])).unwrap();
        assert_eq!(profile, MasqueProfile::default());
    }

    #[test]
    fn flags_override_settings_file() {
        let file = profile_file(
            r##"{"style":{"size":2,"color":"#ff0000"},"output":{"selector":"class","iconDir":"svg"}}"##,
        );
        let path = file.path().to_str().unwrap();

        let profile =
            load_profile(&parse(&["--settings", path, "--color", "#00ff00", "a.svg"])).unwrap();
        assert_eq!(profile.style.size.to_string(), "2em");
        assert_eq!(profile.style.color.to_string(), "#00ff00");
        assert_eq!(profile.output.selector, SelectorStyle::Class);
        assert_eq!(profile.output.icon_dir, "svg");

        let profile = load_profile(&parse(&[
            "--settings",
            path,
            "--selector",
            "attribute",
            "--icon-dir",
            "assets/icons",
            "a.svg",
        ]))
        .unwrap();
        assert_eq!(profile.style.color.to_string(), "#ff0000");
        assert_eq!(profile.output.selector, SelectorStyle::Attribute);
        assert_eq!(profile.output.icon_dir, "assets/icons");
    }

    #[test]
    fn invalid_flag_values_are_rejected() {
        assert!(Args::try_parse_from(["masque", "--size", "0", "a.svg"]).is_err());
        assert!(Args::try_parse_from(["masque", "--color", "red", "a.svg"]).is_err());
        assert!(Args::try_parse_from(["masque", "--selector", "id", "a.svg"]).is_err());
    }

    #[test]
    fn missing_settings_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json");
        let args = parse(&["--settings", path.to_str().unwrap(), "a.svg"]);
        assert!(load_profile(&args).is_err());
    }

    #[test]
    fn print_text_terminates_lines() {
        let mut out = Vec::new();
        print_text(&mut out, "<!-- x -->").unwrap();
        print_text(&mut out, "a {}\n").unwrap();
        assert_eq!(out, b"<!-- x -->\na {}\n");
    }

    #[test]
    fn write_or_print_writes_files_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("icons.css");

        write_or_print(Some(&path), "a {}").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "a {}");
    }

    #[test]
    fn preview_page_embeds_css_and_previews() {
        let mut session = Session::new(Rc::new(DataUrlPreviews::new()));
        let file = UploadedFile::new("Star.svg", "image/svg+xml", b"<svg/>".to_vec());
        session.dispatch(Command::FilesSubmitted(vec![file]));

        let page = preview_page(&session);
        assert!(page.starts_with("<!doctype html>\n"));
        assert!(page.contains(&format!("<style>\n{}</style>", session.css())));
        assert!(page.contains("data-icon=\"star\""));
        assert!(page.contains("data:image/svg+xml,"));
        assert!(page.ends_with("</html>\n"));
    }

    #[test]
    fn empty_preview_page_shows_placeholder() {
        let session = Session::new(Rc::new(DataUrlPreviews::new()));
        assert!(preview_page(&session).contains("Icons will appear here."));
    }
}
