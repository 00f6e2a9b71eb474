//! JSON bridge for web-view editors.
//!
//! The page posts commands as JSON objects tagged by `msg`:
//!
//! | `msg`    | fields                                  |
//! |----------|-----------------------------------------|
//! | `SPVFUI` | `paramIdx`, `value`                     |
//! | `BPCFUI` | `paramIdx`                              |
//! | `EPCFUI` | `paramIdx`                              |
//! | `SAMFUI` | `msgTag`, `ctrlTag`, `data` (base64)    |
//! | `SMMFUI` | `statusByte`, `dataByte1`, `dataByte2`  |
//!
//! In the other direction [`script_for`] renders an engine message as the
//! script call the page expects (`SPVFD`, `SCVFD`, `SAMFD`, `SCMFD`, `SMMFD`).
//! Once the page has loaded, [`params_json`] and [`script_for_json`] announce
//! every parameter as a JSON message on tag [`JSON_MSG_TAG`].

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crosstalk_core::{ControlTag, Message, MidiEvent, MsgTag, ParamIndex, TagMap};

use crate::endpoint::UiEndpoint;
use crate::{Error, Result};

/// A command posted by the web page.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "msg")]
pub enum WebViewCommand {
    #[serde(rename = "SPVFUI")]
    SetParameterValue {
        #[serde(rename = "paramIdx")]
        param: i64,
        value: f64,
    },
    #[serde(rename = "BPCFUI")]
    BeginEdit {
        #[serde(rename = "paramIdx")]
        param: i64,
    },
    #[serde(rename = "EPCFUI")]
    EndEdit {
        #[serde(rename = "paramIdx")]
        param: i64,
    },
    #[serde(rename = "SAMFUI")]
    ArbitraryMessage {
        #[serde(rename = "msgTag")]
        tag: i32,
        #[serde(rename = "ctrlTag", default = "no_control")]
        control: i32,
        #[serde(default)]
        data: String,
    },
    #[serde(rename = "SMMFUI")]
    Midi {
        #[serde(rename = "statusByte")]
        status: u8,
        #[serde(rename = "dataByte1")]
        data1: u8,
        #[serde(rename = "dataByte2")]
        data2: u8,
    },
}

fn no_control() -> i32 {
    -1
}

fn param_index(raw: i64) -> Result<ParamIndex> {
    u32::try_from(raw)
        .map(ParamIndex)
        .map_err(|_| Error::InvalidParameter(raw))
}

impl WebViewCommand {
    pub fn parse(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Forward the command to the engine through `ui`.
    pub fn apply(&self, ui: &mut UiEndpoint) -> Result<()> {
        match self {
            Self::SetParameterValue { param, value } => {
                ui.send_parameter_value(param_index(*param)?, *value)
            }
            Self::BeginEdit { param } => ui.begin_edit(param_index(*param)?),
            Self::EndEdit { param } => ui.end_edit(param_index(*param)?),
            Self::ArbitraryMessage { tag, control, data } => {
                let bytes = STANDARD.decode(data)?;
                let control = (*control >= 0).then_some(ControlTag(*control));
                ui.send_message(MsgTag(*tag), control, &bytes)
            }
            Self::Midi {
                status,
                data1,
                data2,
            } => ui.send_midi(MidiEvent::new(0, *status, *data1, *data2)),
        }
    }
}

/// Tag of arbitrary messages whose payload is JSON for the page.
pub const JSON_MSG_TAG: MsgTag = MsgTag(-1);

#[derive(Debug, Serialize)]
struct ParamDescription<'a> {
    id: u32,
    name: &'a str,
    default: f64,
    value: f64,
}

#[derive(Debug, Serialize)]
struct ParamsAnnouncement<'a> {
    id: &'static str,
    params: Vec<ParamDescription<'a>>,
}

/// `{"id":"params","params":[...]}` listing every parameter in `tags`.
///
/// `values` holds current normalized values by index; parameters past its
/// end report their default.
pub fn params_json(tags: &TagMap, values: &[f64]) -> Result<String> {
    let params = tags
        .params
        .iter()
        .enumerate()
        .map(|(i, spec)| ParamDescription {
            id: i as u32,
            name: &spec.name,
            default: spec.default,
            value: values.get(i).copied().unwrap_or(spec.default),
        })
        .collect();
    let announcement = ParamsAnnouncement {
        id: "params",
        params,
    };
    Ok(serde_json::to_string(&announcement)?)
}

/// Script call delivering `json` to the page as an arbitrary message on
/// [`JSON_MSG_TAG`].
///
/// Runs on the UI thread, so `json` is not bound by the queue's payload limit.
pub fn script_for_json(json: &str) -> String {
    let encoded = STANDARD.encode(json);
    format!(
        "SAMFD({}, {}, \"{}\")",
        JSON_MSG_TAG.0,
        encoded.len(),
        encoded
    )
}

/// Parse a JSON command from the page and apply it.
pub fn handle_json(ui: &mut UiEndpoint, json: &str) -> Result<()> {
    let command = WebViewCommand::parse(json).inspect_err(|e| {
        tracing::debug!("Rejected web-view command: {}", e);
    })?;
    command.apply(ui)
}

/// Script call that delivers `message` to the page, if it has one.
///
/// Sysex and edit gestures have no page-side counterpart and return `None`.
pub fn script_for(message: &Message<'_>) -> Option<String> {
    match *message {
        Message::ParameterChange { param, value, .. } => {
            Some(format!("SPVFD({}, {:.6})", param.0, value))
        }
        Message::ControlValue { control, value } => {
            Some(format!("SCVFD({}, {:.6})", control.0, value))
        }
        Message::Arbitrary { tag, control, data } => {
            let encoded = STANDARD.encode(data);
            Some(match control {
                Some(control) => format!(
                    "SCMFD({}, {}, {}, \"{}\")",
                    control.0,
                    tag.0,
                    encoded.len(),
                    encoded
                ),
                None => format!("SAMFD({}, {}, \"{}\")", tag.0, encoded.len(), encoded),
            })
        }
        Message::Midi(event) => Some(format!(
            "SMMFD({}, {}, {})",
            event.status, event.data1, event.data2
        )),
        Message::Sysex { .. } | Message::BeginEdit { .. } | Message::EndEdit { .. } => None,
    }
}
