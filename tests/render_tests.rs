use polysynth::audio::{AudioError, BufferSink, OutputSink, RingSink};
use ringbuf::traits::Consumer;
use polysynth::synth::envelope::Envelope;
use polysynth::synth::instruments::{self, InstrumentKind};
use polysynth::synth::{Mixer, PolySynth, RenderClock, Streamer, SynthError};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[test]
fn test_rejects_zero_sample_rate() {
    assert!(matches!(
        RenderClock::new(0),
        Err(SynthError::InvalidSampleRate(0))
    ));
}

#[test]
fn test_silence_renders_as_zeros() {
    let clock = Arc::new(RenderClock::new(44_100).unwrap());
    let template = instruments::bell().unwrap();
    let poly = Arc::new(PolySynth::new(template, Arc::clone(&clock)));
    let mixer = Mixer::new();
    mixer.push(poly);

    let mut sink = BufferSink::new();
    clock.render(&mixer, &mut sink, 4410).unwrap();

    assert_eq!(sink.frames(), 4410);
    assert!(sink.bytes().iter().all(|b| *b == 0));
    assert_eq!(clock.ticks(), 4410);
    assert!((clock.now() - 0.1).abs() < 1e-12);
}

#[test]
fn test_tick_samples_before_advancing() {
    let clock = RenderClock::new(4).unwrap();
    let ramp = |t: f64| t;
    let mut sink = BufferSink::new();
    clock.render(&ramp, &mut sink, 4).unwrap();

    // 0, 0.25, 0.5 and 0.75 of full scale
    assert_eq!(sink.samples(), vec![0, 8191, 16383, 24575]);
    assert_eq!(clock.now(), 1.0);
}

#[test]
fn test_sink_clips_loud_mix() {
    let clock = RenderClock::new(100).unwrap();
    let mixer = Mixer::new();
    mixer.add((0..3).map(|_| Arc::new(|_t: f64| 0.6) as Arc<dyn Streamer>));
    let mut sink = BufferSink::new();
    clock.render(&mixer, &mut sink, 2).unwrap();
    assert_eq!(sink.samples(), vec![i16::MAX, i16::MAX]);
}

#[test]
fn test_note_renders_then_decays_to_silence() {
    let clock = Arc::new(RenderClock::new(8000).unwrap());
    let template = InstrumentKind::Harmonica.template().unwrap();
    let poly = Arc::new(PolySynth::new(template, Arc::clone(&clock)));
    let mixer = Mixer::new();
    mixer.push(poly.clone());

    let mut sink = BufferSink::new();
    poly.trigger_attack(&[440.0]);
    clock.render(&mixer, &mut sink, 800).unwrap();
    assert!(sink.samples().iter().any(|s| *s != 0));

    poly.trigger_release(&[440.0]);
    // Release is 0.2 s; render well past it
    clock.render(&mixer, &mut sink, 2400).unwrap();
    assert_eq!(poly.live_voices(), 0);

    let mut tail = BufferSink::new();
    clock.render(&mixer, &mut tail, 100).unwrap();
    assert!(tail.samples().iter().all(|s| *s == 0));
}

#[test]
fn test_bell_rings_without_release_then_falls_silent() {
    let clock = Arc::new(RenderClock::new(8000).unwrap());
    let poly = Arc::new(PolySynth::new(instruments::bell().unwrap(), Arc::clone(&clock)));

    poly.trigger_attack(&[220.0]);
    let mut sink = BufferSink::new();
    clock.render(poly.as_ref(), &mut sink, 9600).unwrap();

    let samples = sink.samples();
    assert!(samples[..8000].iter().any(|s| *s != 0));
    // Attack 0.1 s + decay 1.0 s: everything after 1.1 s is silent
    assert!(samples[8900..].iter().all(|s| *s == 0));
}

#[test]
fn test_threaded_render_feeds_ring() {
    let clock = Arc::new(RenderClock::new(44_100).unwrap());
    let template = polysynth::synth::VoiceTemplate::from_waveform(
        polysynth::synth::oscillator::Waveform::Sine,
        Envelope::asr(1.0, 0.001, 0.001).unwrap(),
        0.5,
    )
    .unwrap();
    let poly = Arc::new(PolySynth::new(template, Arc::clone(&clock)));
    poly.trigger_attack(&[440.0]);

    let (sink, mut consumer) = RingSink::new(64);
    let handle = clock.start(poly, Box::new(sink)).unwrap();

    let mut frames = Vec::new();
    let deadline = Instant::now() + Duration::from_secs(5);
    while frames.len() < 256 && Instant::now() < deadline {
        match consumer.try_pop() {
            Some(frame) => frames.push(frame),
            None => std::thread::yield_now(),
        }
    }
    assert_eq!(frames.len(), 256);
    assert!(frames.iter().any(|f| *f != [0, 0]));

    // Dropping the device side ends the loop
    drop(consumer);
    let result = handle.stop();
    assert!(matches!(result, Ok(()) | Err(AudioError::Disconnected)));
    assert!(clock.ticks() >= 256);
}

#[test]
fn test_ring_sink_disconnects_without_consumer() {
    let (mut sink, consumer) = RingSink::new(4);
    assert!(sink.write([1, 0]).is_ok());
    drop(consumer);
    assert!(matches!(
        sink.write([2, 0]),
        Err(AudioError::Disconnected)
    ));
}

#[test]
fn test_ring_sink_waits_for_room() {
    let (mut sink, mut consumer) = RingSink::new(2);
    let writer = std::thread::spawn(move || {
        for i in 0..8u8 {
            sink.write([i, 0]).unwrap();
        }
    });

    let mut popped = Vec::new();
    let deadline = Instant::now() + Duration::from_secs(5);
    while popped.len() < 8 && Instant::now() < deadline {
        match consumer.try_pop() {
            Some(frame) => popped.push(frame[0]),
            None => std::thread::yield_now(),
        }
    }
    writer.join().unwrap();
    // Nothing dropped, nothing reordered
    assert_eq!(popped, (0..8).collect::<Vec<u8>>());
}
