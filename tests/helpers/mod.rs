//! Test helpers and fixtures for crosstalk integration tests

#![allow(dead_code)]

use std::sync::Once;

use crosstalk::prelude::*;

/// Standard block size for deterministic testing
pub const TEST_BLOCK_LEN: usize = 512;

static TRACING: Once = Once::new();

/// Route `tracing` output through the test harness. Filter with `RUST_LOG`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Tag map of a small gain plugin with a scope and a "hello" button.
///
/// - params: `gain` (0), `mix` (1)
/// - controls: `gain_knob` (0, bound to gain), `hello_button` (1), `scope` (2)
/// - messages: `hello` (0), `data` (1)
pub fn test_tags() -> TagMap {
    TagMap::builder()
        .param("gain", 0.5)
        .param("mix", 1.0)
        .control("gain_knob", Some("gain"))
        .control("hello_button", None)
        .control("scope", None)
        .message("hello")
        .message("data")
        .build()
        .expect("Failed to build test tag map")
}

pub fn test_channel() -> (UiEndpoint, EngineEndpoint) {
    init_tracing();
    channel(test_tags()).expect("Failed to create test channel")
}

/// Records everything the engine forwards to its host-side handler.
#[derive(Debug, Default)]
pub struct Recorder {
    pub messages: Vec<(MsgTag, Option<ControlTag>, Vec<u8>)>,
    pub sysex: Vec<(Vec<u8>, u32)>,
    pub edits: Vec<(ParamIndex, bool)>,
    pub applied: Vec<(ParamIndex, f64)>,
}

impl MessageHandler for Recorder {
    fn on_message(&mut self, tag: MsgTag, control: Option<ControlTag>, data: &[u8]) {
        self.messages.push((tag, control, data.to_vec()));
    }

    fn on_sysex(&mut self, data: &[u8], sample_offset: u32) {
        self.sysex.push((data.to_vec(), sample_offset));
    }

    fn on_edit(&mut self, param: ParamIndex, begin: bool) {
        self.edits.push((param, begin));
    }

    fn on_parameter_applied(&mut self, param: ParamIndex, value: f64) {
        self.applied.push((param, value));
    }
}
