//! `toarubar-check`: validates a toarubar config outside of the compositor.
//!
//! Usage: `toarubar-check [-v] <config file> [title template]`
//!
//! Every `plugin:toarubar:` value, `toarubar-button` and `title-var`
//! declaration in the file is run through the same parsers the plugin uses.
//! Errors are reported with their line numbers, then the resolved
//! configuration is printed. If a title template is given, it is expanded
//! against a sample window.

use std::env;
use std::error::Error;
use std::fs;
use std::process;

use tracing::{Level, debug, info, warn};
use tracing_subscriber::{fmt as logger, fmt::format::FmtSpan};

use toarubar::BarsState;
use toarubar::config::{BUTTON_KEYWORD, NAMESPACE, TITLE_VAR_KEYWORD};
use toarubar::title::{self, WindowSnapshot};

const USAGE: &str = "usage: toarubar-check [-v] <config file> [title template]";

fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let mut verbose = false;
    let mut positional = Vec::new();
    for arg in env::args().skip(1) {
        match arg.as_str() {
            "-v" | "--verbose" => verbose = true,
            "-h" | "--help" => {
                println!("{}", USAGE);
                return Ok(())
            }
            _ => positional.push(arg),
        }
    }

    let level = if verbose { Level::TRACE } else { Level::INFO };
    logger::fmt()
        .with_span_events(FmtSpan::ACTIVE)
        .with_max_level(level)
        .try_init()?;

    let Some(path) = positional.first() else {
        eprintln!("{}", USAGE);
        process::exit(2);
    };

    let source = fs::read_to_string(path)?;
    let mut state = BarsState::default();
    let errors = load(&mut state, &source);
    for (lineno, err) in errors.iter() {
        warn!("line {}: {}", lineno, err);
    }

    info!("resolved configuration: {:#?}", state.config);
    for (idx, button) in state.buttons.iter().enumerate() {
        info!("button {}: {:?}", idx, button);
    }
    if !state.title_vars.is_empty() {
        info!("title variables: {}", state.title_vars);
    }

    if let Some(template) = positional.get(1) {
        let sample = WindowSnapshot {
            title: "sample title".into(),
            class: "sample.class".into(),
            initial_title: "sample title".into(),
            initial_class: "sample.class".into(),
            is_mapped: true,
            ..WindowSnapshot::default()
        };
        println!("{}", title::expand(template, &sample, &state.title_vars));
    }

    if !errors.is_empty() {
        warn!("{} error(s) in {}", errors.len(), path);
        process::exit(1);
    }
    Ok(())
}

/// Feeds every line of a config file through the plugin's parsers.
///
/// Understands `name {` ... `}` categories, so both
/// `plugin { toarubar { bar_height = 20 } }` and the flat
/// `plugin:toarubar:bar_height = 20` spellings work. Returns every line
/// that failed to parse, with its 1-based line number.
fn load(state: &mut BarsState, source: &str) -> Vec<(usize, String)> {
    let mut categories: Vec<String> = Vec::new();
    let mut errors = Vec::new();

    for (idx, raw) in source.lines().enumerate() {
        let lineno = idx + 1;
        let line = raw.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue
        }

        if line == "}" {
            if categories.pop().is_none() {
                errors.push((lineno, "unbalanced '}'".to_string()));
            }
            continue
        }
        if let Some(name) = line.strip_suffix('{') {
            categories.push(name.trim().to_string());
            continue
        }

        let Some((key, value)) = line.split_once('=') else {
            errors.push((lineno, "expected 'key = value'".to_string()));
            continue
        };
        let mut full = categories.join(":");
        if !full.is_empty() {
            full.push(':');
        }
        full.push_str(key.trim());
        let value = value.trim();

        let keyword = full.rsplit(':').next().unwrap_or("");
        let result = if keyword == BUTTON_KEYWORD {
            state.add_button(value).map(|_| ())
        } else if keyword == TITLE_VAR_KEYWORD {
            state.title_vars.declare(value)
        } else if full.starts_with(NAMESPACE) {
            state.config.set(&full, value)
        } else {
            debug!("line {}: skipping {}", lineno, full);
            Ok(())
        };

        if let Err(e) = result {
            errors.push((lineno, e.to_string()));
        }
    }

    if !categories.is_empty() {
        let last = source.lines().count();
        errors.push((last, format!("unclosed categories: {}", categories.join(", "))));
    }
    errors
}

#[cfg(test)]
mod test {
    use super::*;

    const CONFIG: &str = "\
plugin {
    toarubar {
        bar_height = 20
        bar_color = rgb(zzzzzz)
        toarubar-button = rgb(ff4040), 10, X, killactive
        toarubar-button = rgb(ff4040), , X, killactive
    }
}
plugin:toarubar:bar_padding = 3
general:gaps_in = 5
";

    #[test_log::test]
    fn test_load_reports_line_numbers() {
        let mut state = BarsState::default();
        let errors = load(&mut state, CONFIG);

        let lines: Vec<usize> = errors.iter().map(|(line, _)| *line).collect();
        assert_eq!(lines, vec![4, 6]);

        assert_eq!(state.config.bar_height, 20);
        assert_eq!(state.config.bar_padding, 3);
        assert_eq!(state.buttons.len(), 1);
        assert_eq!(state.buttons[0].command, "killactive");
    }

    #[test_log::test]
    fn test_load_structural_errors() {
        let mut state = BarsState::default();
        let errors = load(&mut state, "}\nnot a declaration\nplugin {\n");

        assert_eq!(errors.len(), 3);
        assert_eq!(errors[0], (1, "unbalanced '}'".to_string()));
        assert_eq!(errors[1], (2, "expected 'key = value'".to_string()));
        assert_eq!(errors[2].0, 3);
        assert!(errors[2].1.contains("plugin"));
    }
}
