//! Comma-separated event scripts for explore mode.
//!
//! Steps: `route:<id>`, `click:<id>`, `next`, `prev`, `show`, `hide`,
//! `reset`, and `eta[:<HH:MM>][@<origin>]`. Omitted ETA fields take the
//! dataset defaults.

use routebook_engine::ExplorerEvent;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScriptError {
    #[error("unknown script step `{0}`")]
    UnknownStep(String),
    #[error("script step `{step}` needs a value")]
    MissingValue { step: String },
}

pub fn split_csv(s: &str) -> Vec<String> {
    s.split(',')
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

/// Parse a whole script into events, failing on the first bad step.
pub fn parse_script(script: &str) -> Result<Vec<ExplorerEvent>, ScriptError> {
    split_csv(script)
        .iter()
        .map(|step| parse_step(step))
        .collect()
}

fn parse_step(step: &str) -> Result<ExplorerEvent, ScriptError> {
    let (name, value) = match step.split_once(':') {
        Some((name, value)) => (name.trim(), Some(value.trim())),
        None => (step, None),
    };
    let missing = || ScriptError::MissingValue {
        step: step.to_string(),
    };

    match (name, value) {
        ("next", None) => Ok(ExplorerEvent::Next),
        ("prev", None) => Ok(ExplorerEvent::Prev),
        ("reset", None) => Ok(ExplorerEvent::Reset),
        ("show", None) => Ok(ExplorerEvent::ToggleVisibility { visible: true }),
        ("hide", None) => Ok(ExplorerEvent::ToggleVisibility { visible: false }),
        ("route", Some(id)) if !id.is_empty() => Ok(ExplorerEvent::SelectRoute {
            route_id: id.to_string(),
        }),
        ("click", Some(id)) if !id.is_empty() => Ok(ExplorerEvent::PointClicked {
            point_id: id.to_string(),
        }),
        ("route" | "click", _) => Err(missing()),
        ("eta", None) => Ok(ExplorerEvent::RequestEta {
            start_time: None,
            origin: None,
        }),
        ("eta", Some(arg)) => {
            let (start, origin) = match arg.split_once('@') {
                Some((start, origin)) => (start.trim(), Some(origin.trim())),
                None => (arg, None),
            };
            Ok(ExplorerEvent::RequestEta {
                start_time: Some(start).filter(|text| !text.is_empty()).map(str::to_string),
                origin: origin.filter(|o| !o.is_empty()).map(str::to_string),
            })
        }
        _ => Err(ScriptError::UnknownStep(step.to_string())),
    }
}
