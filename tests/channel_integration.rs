//! End-to-end tests for a UI <-> engine channel
//!
//! Each test drives both endpoints from one thread, alternating audio blocks
//! and UI ticks the way a host would.
//!
//! Run with:
//! ```bash
//! cargo test -p crosstalk --test channel_integration
//! ```

mod helpers;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use approx::assert_relative_eq;
use crosstalk::prelude::*;
use helpers::{init_tracing, test_channel, test_tags, Recorder, TEST_BLOCK_LEN};
use proptest::prelude::*;

const GAIN: ParamIndex = ParamIndex(0);

/// Dispatch table with a single slider bound to `GAIN`.
fn slider_table() -> (DispatchTable, Rc<Cell<Option<f64>>>) {
    let slider = Rc::new(Cell::new(None));
    let mut table = DispatchTable::new();
    let s = Rc::clone(&slider);
    table.on_param_change(move |param, value| {
        if param == GAIN {
            s.set(Some(value));
        }
    });
    (table, slider)
}

// ---------------------------------------------------------------------------
// Parameters
// ---------------------------------------------------------------------------

#[test]
fn test_parameter_change_applied_and_echoed() {
    let (mut ui, mut engine) = test_channel();
    let mut recorder = Recorder::default();
    let (mut table, slider) = slider_table();

    ui.send_parameter_value(GAIN, 0.75).unwrap();

    let report = engine.process_inbound(TEST_BLOCK_LEN, &mut recorder);
    assert_eq!(report.parameters, 1);
    assert_relative_eq!(engine.params().get(GAIN).unwrap(), 0.75);
    assert_eq!(recorder.applied, vec![(GAIN, 0.75)]);

    let tick = ui.tick(&mut table);
    assert_eq!(tick.delivered, 1);
    assert_relative_eq!(slider.get().unwrap(), 0.75);
}

#[test]
fn test_echo_suppressed_while_editing() {
    let (mut ui, mut engine) = test_channel();
    let mut recorder = Recorder::default();
    let (mut table, slider) = slider_table();

    ui.begin_edit(GAIN).unwrap();
    ui.send_parameter_value(GAIN, 0.3).unwrap();
    engine.process_inbound(TEST_BLOCK_LEN, &mut recorder);

    let tick = ui.tick(&mut table);
    assert_eq!(tick.suppressed, 1);
    assert_eq!(slider.get(), None);

    ui.send_parameter_value(GAIN, 0.4).unwrap();
    ui.end_edit(GAIN).unwrap();
    engine.process_inbound(TEST_BLOCK_LEN, &mut recorder);

    let tick = ui.tick(&mut table);
    assert_eq!(tick.delivered, 1);
    assert_relative_eq!(slider.get().unwrap(), 0.4);
    assert_eq!(recorder.edits, vec![(GAIN, true), (GAIN, false)]);
    assert_relative_eq!(engine.params().get(GAIN).unwrap(), 0.4);
}

#[test]
fn test_echo_disabled() {
    init_tracing();
    let (mut ui, mut engine) = ChannelBuilder::new()
        .tags(test_tags())
        .echo_parameter_changes(false)
        .build()
        .unwrap();
    let (mut table, slider) = slider_table();

    ui.send_parameter_value(GAIN, 0.9).unwrap();
    engine.process_inbound(TEST_BLOCK_LEN, &mut ());

    assert_eq!(ui.tick(&mut table), TickReport::default());
    assert_eq!(slider.get(), None);
    assert_relative_eq!(engine.params().get(GAIN).unwrap(), 0.9);
}

#[test]
fn test_unbound_parameter_defaults_survive() {
    let (_ui, engine) = test_channel();
    assert_relative_eq!(engine.params().get(ParamIndex(0)).unwrap(), 0.5);
    assert_relative_eq!(engine.params().get(ParamIndex(1)).unwrap(), 1.0);
    assert_eq!(engine.params().get(ParamIndex(2)), None);
}

#[test]
fn test_knob_control_change_maps_to_gain() {
    let (mut ui, mut engine) = test_channel();
    let knob = ui.tags().control("gain_knob").unwrap();

    ui.send_control_change(knob, 0.2).unwrap();
    engine.process_inbound(TEST_BLOCK_LEN, &mut ());

    assert_relative_eq!(engine.params().get(GAIN).unwrap(), 0.2);
}

proptest! {
    #[test]
    fn test_values_clamped_end_to_end(value in -10.0f64..10.0) {
        let (mut ui, mut engine) = test_channel();
        ui.send_parameter_value(GAIN, value).unwrap();
        engine.process_inbound(TEST_BLOCK_LEN, &mut ());

        let applied = engine.params().get(GAIN).unwrap();
        prop_assert!((0.0..=1.0).contains(&applied));
        prop_assert_eq!(applied, value.clamp(0.0, 1.0));
    }
}

// ---------------------------------------------------------------------------
// MIDI and custom messages
// ---------------------------------------------------------------------------

#[test]
fn test_virtual_keyboard_notes_reach_block_events() {
    let (mut ui, mut engine) = test_channel();

    ui.note_on(60, 100).unwrap();
    ui.note_off(60).unwrap();

    let report = engine.process_inbound(TEST_BLOCK_LEN, &mut ());
    assert_eq!(report.midi, 2);

    let events = engine.events().as_slice();
    assert!(events[0].is_note_on());
    assert!(events[1].is_note_off());
    assert_eq!(events[0].note(), Some(60));
    assert!(events.iter().all(|e| e.sample_offset == 0));

    // Next block starts with an empty list.
    engine.process_inbound(TEST_BLOCK_LEN, &mut ());
    assert!(engine.events().is_empty());
}

#[test]
fn test_engine_midi_reaches_ui() {
    let (mut ui, mut engine) = test_channel();
    let received = Rc::new(RefCell::new(Vec::new()));
    let mut table = DispatchTable::new();
    let r = Rc::clone(&received);
    table.on_midi(move |event| r.borrow_mut().push(event.bytes()));

    let event = MidiEvent::control_change(0, 0, 7, 64).unwrap();
    engine.sender().send_midi(event).unwrap();
    ui.tick(&mut table);

    assert_eq!(*received.borrow(), vec![[0xB0, 7, 64]]);
}

#[test]
fn test_hello_button_reaches_engine() {
    let (mut ui, mut engine) = test_channel();
    let mut recorder = Recorder::default();
    let hello = ui.tags().message("hello").unwrap();
    let button = ui.tags().control("hello_button");

    ui.send_message(hello, button, &[]).unwrap();
    let report = engine.process_inbound(TEST_BLOCK_LEN, &mut recorder);

    assert_eq!(report.forwarded, 1);
    assert_eq!(recorder.messages, vec![(hello, button, Vec::new())]);
}

#[test]
fn test_undeclared_tag_not_forwarded() {
    let (mut ui, mut engine) = test_channel();
    let mut recorder = Recorder::default();

    ui.send_message(MsgTag(99), None, b"x").unwrap();
    let report = engine.process_inbound(TEST_BLOCK_LEN, &mut recorder);

    assert_eq!(report.ignored, 1);
    assert_eq!(report.forwarded, 0);
    assert!(recorder.messages.is_empty());
}

#[test]
fn test_sysex_both_directions() {
    let (mut ui, mut engine) = test_channel();
    let mut recorder = Recorder::default();
    let sysex = [0xF0, 0x7E, 0x7F, 0x06, 0x01, 0xF7];

    ui.send_sysex(&sysex).unwrap();
    engine.process_inbound(TEST_BLOCK_LEN, &mut recorder);
    assert_eq!(recorder.sysex, vec![(sysex.to_vec(), 0)]);

    let received = Rc::new(RefCell::new(Vec::new()));
    let mut table = DispatchTable::new();
    let r = Rc::clone(&received);
    table.on_sysex(move |data, _| r.borrow_mut().extend_from_slice(data));

    engine.sender().send_sysex(&sysex, 0).unwrap();
    ui.tick(&mut table);
    assert_eq!(*received.borrow(), sysex.to_vec());
}

#[test]
fn test_control_value_drives_meter() {
    let (mut ui, mut engine) = test_channel();
    let scope = ui.tags().control("scope").unwrap();
    let meter = Rc::new(Cell::new(0.0));
    let mut table = DispatchTable::new();
    let m = Rc::clone(&meter);
    table.on_control_value(move |control, value| {
        if control == scope {
            m.set(value);
        }
    });

    engine.sender().send_control_value(scope, 0.8).unwrap();
    ui.tick(&mut table);
    assert_relative_eq!(meter.get(), 0.8);
}

// ---------------------------------------------------------------------------
// Data packets
// ---------------------------------------------------------------------------

fn ramp() -> Vec<f32> {
    (0..DATA_PACKET_SIZE)
        .map(|i| i as f32 / DATA_PACKET_SIZE as f32 - 0.5)
        .collect()
}

fn plot_table(data: MsgTag) -> (DispatchTable, Rc<RefCell<PlotBuffer>>) {
    let plot = Rc::new(RefCell::new(PlotBuffer::default()));
    let mut table = DispatchTable::new();
    let p = Rc::clone(&plot);
    table.on_message(data, move |_, bytes| {
        p.borrow_mut().update_from_bytes(bytes);
        true
    });
    (table, plot)
}

#[test]
fn test_data_packet_updates_plot_in_order() {
    let (mut ui, mut engine) = test_channel();
    let data = engine.tags().message("data").unwrap();
    let scope = engine.tags().control("scope");
    let (mut table, plot) = plot_table(data);
    let samples = ramp();

    assert!(engine
        .send_paced_packet(data, scope, &samples, TEST_BLOCK_LEN)
        .unwrap());

    let tick = ui.tick(&mut table);
    assert_eq!(tick.delivered, 1);

    let plot = plot.borrow();
    assert_eq!(plot.samples(), samples.as_slice());
    assert_eq!(plot.revision(), 1);
}

#[test]
fn test_every_nth_block_cadence() {
    init_tracing();
    let (mut ui, mut engine) = ChannelBuilder::new()
        .tags(test_tags())
        .packet_cadence(PacketCadence::EveryNthBlock(4))
        .build()
        .unwrap();
    let data = engine.tags().message("data").unwrap();
    let (mut table, plot) = plot_table(data);
    let samples = ramp();

    let sent: Vec<bool> = (0..16)
        .map(|_| {
            engine
                .send_paced_packet(data, None, &samples, TEST_BLOCK_LEN)
                .unwrap()
        })
        .collect();

    assert_eq!(sent.iter().filter(|&&s| s).count(), 4);
    assert!(sent[3] && sent[7] && !sent[0]);

    ui.tick(&mut table);
    assert_eq!(plot.borrow().revision(), 4);
}

#[test]
fn test_sample_interval_cadence() {
    init_tracing();
    let (_ui, mut engine) = ChannelBuilder::new()
        .tags(test_tags())
        .packet_cadence(PacketCadence::SampleInterval(2048))
        .build()
        .unwrap();
    let data = engine.tags().message("data").unwrap();
    let samples = ramp();

    let sent = (0..16)
        .filter(|_| {
            engine
                .send_paced_packet(data, None, &samples, TEST_BLOCK_LEN)
                .unwrap()
        })
        .count();
    assert_eq!(sent, 4);

    engine.reset();
    let sent_after_reset = (0..3)
        .filter(|_| {
            engine
                .send_paced_packet(data, None, &samples, TEST_BLOCK_LEN)
                .unwrap()
        })
        .count();
    assert_eq!(sent_after_reset, 0);
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[test]
fn test_channel_from_json_preset() {
    init_tracing();
    let tags: TagMap = serde_json::from_str(
        r#"{
            "params": [{"name": "cutoff", "default": 0.25}],
            "controls": [{"name": "cutoff_knob", "param": "cutoff"}],
            "messages": ["scope"]
        }"#,
    )
    .unwrap();
    let config: ChannelConfig = serde_json::from_str(
        r#"{"ui_to_engine_capacity": 16, "packet_cadence": {"every_nth_block": 2}}"#,
    )
    .unwrap();

    let (mut ui, mut engine) = ChannelBuilder::new()
        .config(config)
        .tags(tags)
        .build()
        .unwrap();
    assert_relative_eq!(engine.params().get(ParamIndex(0)).unwrap(), 0.25);

    let knob = ui.tags().control("cutoff_knob").unwrap();
    ui.send_control_change(knob, 0.6).unwrap();
    engine.process_inbound(TEST_BLOCK_LEN, &mut ());
    assert_relative_eq!(engine.params().get(ParamIndex(0)).unwrap(), 0.6);

    let scope = engine.tags().message("scope").unwrap();
    let sent = (0..4)
        .filter(|_| {
            engine
                .send_paced_packet(scope, None, &ramp(), TEST_BLOCK_LEN)
                .unwrap()
        })
        .count();
    assert_eq!(sent, 2);

    let capacity_hits = (0..20)
        .filter(|_| ui.send_parameter_value(ParamIndex(0), 0.1).is_err())
        .count();
    assert_eq!(capacity_hits, 4);
}

// ---------------------------------------------------------------------------
// Back-pressure
// ---------------------------------------------------------------------------

#[test]
fn test_drain_limit_spreads_over_blocks() {
    init_tracing();
    let (mut ui, mut engine) = ChannelBuilder::new()
        .tags(test_tags())
        .engine_drain_limit(4)
        .build()
        .unwrap();

    for i in 0..10 {
        ui.send_parameter_value(GAIN, i as f64 / 10.0).unwrap();
    }

    let reports: Vec<DrainReport> = (0..3)
        .map(|_| engine.process_inbound(TEST_BLOCK_LEN, &mut ()))
        .collect();

    assert_eq!(
        reports.iter().map(|r| r.parameters).collect::<Vec<_>>(),
        vec![4, 4, 2]
    );
    assert!(reports[0].more_pending && reports[1].more_pending);
    assert!(!reports[2].more_pending);
    assert_relative_eq!(engine.params().get(GAIN).unwrap(), 0.9);
}

#[test]
fn test_full_queue_drops_newest_and_counts() {
    init_tracing();
    let (mut ui, mut engine) = ChannelBuilder::new()
        .tags(test_tags())
        .ui_to_engine_capacity(8)
        .build()
        .unwrap();

    let failures = (0..10)
        .filter_map(|i| ui.send_parameter_value(GAIN, i as f64 / 10.0).err())
        .collect::<Vec<_>>();
    assert_eq!(failures.len(), 2);
    assert!(failures.iter().all(|e| e.is_drop()));

    let stats = ui.outbound_stats();
    assert_eq!(stats.pushed(), 8);
    assert_eq!(stats.dropped(), 2);

    // Earlier entries are intact: the last applied value is the eighth one.
    let report = engine.process_inbound(TEST_BLOCK_LEN, &mut ());
    assert_eq!(report.parameters, 8);
    assert_relative_eq!(engine.params().get(GAIN).unwrap(), 0.7);
}
