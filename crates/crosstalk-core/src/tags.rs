//! Typed identifiers and the tag map shared by both endpoints.
//!
//! Parameters, controls and custom message kinds are declared once in a
//! [`TagMap`] and handed to the UI and the engine at construction, so neither
//! side relies on ambient constants.
//!
//! # Example
//!
//! ```
//! use crosstalk_core::TagMap;
//!
//! let tags = TagMap::builder()
//!     .param("gain", 0.5)
//!     .control("volume_slider", Some("gain"))
//!     .control("button", None)
//!     .message("hello")
//!     .message("data")
//!     .build()
//!     .unwrap();
//!
//! let gain = tags.param("gain").unwrap();
//! assert_eq!(tags.control_for_param(gain), tags.control("volume_slider"));
//! ```

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Index of a plugin parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParamIndex(pub u32);

/// Opaque identifier of a UI control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ControlTag(pub i32);

/// Sub-type of an arbitrary data message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MsgTag(pub i32);

impl ParamIndex {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for ParamIndex {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl From<i32> for ControlTag {
    fn from(value: i32) -> Self {
        Self(value)
    }
}

impl From<i32> for MsgTag {
    fn from(value: i32) -> Self {
        Self(value)
    }
}

/// A declared parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamSpec {
    pub name: String,
    /// Default normalized value (0.0-1.0).
    #[serde(default)]
    pub default: f64,
}

/// A declared UI control, optionally bound to a parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlSpec {
    pub name: String,
    #[serde(default)]
    pub param: Option<String>,
}

/// Names of parameters, controls and message tags. Ids follow declaration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TagMap {
    pub params: Vec<ParamSpec>,
    pub controls: Vec<ControlSpec>,
    pub messages: Vec<String>,
}

impl TagMap {
    pub fn builder() -> TagMapBuilder {
        TagMapBuilder::default()
    }

    pub fn validate(&self) -> Result<()> {
        for (i, p) in self.params.iter().enumerate() {
            if self.params[..i].iter().any(|q| q.name == p.name) {
                return Err(Error::InvalidConfig(format!(
                    "duplicate parameter '{}'",
                    p.name
                )));
            }
            if !(0.0..=1.0).contains(&p.default) {
                return Err(Error::InvalidConfig(format!(
                    "parameter '{}' default {} outside 0.0-1.0",
                    p.name, p.default
                )));
            }
        }

        for (i, c) in self.controls.iter().enumerate() {
            if self.controls[..i].iter().any(|d| d.name == c.name) {
                return Err(Error::InvalidConfig(format!(
                    "duplicate control '{}'",
                    c.name
                )));
            }
            if let Some(param) = &c.param {
                if self.param(param).is_none() {
                    return Err(Error::InvalidConfig(format!(
                        "control '{}' bound to unknown parameter '{}'",
                        c.name, param
                    )));
                }
            }
        }

        for (i, m) in self.messages.iter().enumerate() {
            if self.messages[..i].contains(m) {
                return Err(Error::InvalidConfig(format!("duplicate message tag '{m}'")));
            }
        }

        Ok(())
    }

    #[inline]
    pub fn param_count(&self) -> usize {
        self.params.len()
    }

    pub fn param(&self, name: &str) -> Option<ParamIndex> {
        self.params
            .iter()
            .position(|p| p.name == name)
            .map(|i| ParamIndex(i as u32))
    }

    pub fn control(&self, name: &str) -> Option<ControlTag> {
        self.controls
            .iter()
            .position(|c| c.name == name)
            .map(|i| ControlTag(i as i32))
    }

    pub fn message(&self, name: &str) -> Option<MsgTag> {
        self.messages
            .iter()
            .position(|m| m == name)
            .map(|i| MsgTag(i as i32))
    }

    pub fn param_spec(&self, param: ParamIndex) -> Option<&ParamSpec> {
        self.params.get(param.index())
    }

    pub fn message_name(&self, tag: MsgTag) -> Option<&str> {
        usize::try_from(tag.0)
            .ok()
            .and_then(|i| self.messages.get(i))
            .map(String::as_str)
    }

    /// The first control bound to `param`, if any.
    pub fn control_for_param(&self, param: ParamIndex) -> Option<ControlTag> {
        let name = &self.param_spec(param)?.name;
        self.controls
            .iter()
            .position(|c| c.param.as_deref() == Some(name.as_str()))
            .map(|i| ControlTag(i as i32))
    }

    /// The parameter a control is bound to, if any.
    pub fn param_for_control(&self, control: ControlTag) -> Option<ParamIndex> {
        let spec = usize::try_from(control.0)
            .ok()
            .and_then(|i| self.controls.get(i))?;
        self.param(spec.param.as_deref()?)
    }

    /// Default normalized values, indexed by parameter.
    pub fn defaults(&self) -> impl Iterator<Item = f64> + '_ {
        self.params.iter().map(|p| p.default)
    }
}

#[derive(Debug, Default)]
pub struct TagMapBuilder {
    map: TagMap,
}

impl TagMapBuilder {
    pub fn param(mut self, name: impl Into<String>, default: f64) -> Self {
        self.map.params.push(ParamSpec {
            name: name.into(),
            default,
        });
        self
    }

    pub fn control(mut self, name: impl Into<String>, param: Option<&str>) -> Self {
        self.map.controls.push(ControlSpec {
            name: name.into(),
            param: param.map(str::to_owned),
        });
        self
    }

    pub fn message(mut self, name: impl Into<String>) -> Self {
        self.map.messages.push(name.into());
        self
    }

    pub fn build(self) -> Result<TagMap> {
        self.map.validate()?;
        Ok(self.map)
    }
}
