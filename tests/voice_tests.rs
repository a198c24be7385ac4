use polysynth::synth::envelope::Envelope;
use polysynth::synth::oscillator::Waveform;
use polysynth::synth::{RenderClock, Streamer, SynthError, VoiceTemplate};
use std::sync::Arc;
use std::time::Duration;

const EPS: f64 = 1e-9;

/// Signal that passes the envelope gain straight through, so a voice's
/// output is `base amplitude * envelope`.
fn gain_template(envelope: Envelope, amplitude: f64) -> VoiceTemplate {
    VoiceTemplate::new(|amp, _freq, _t| amp, envelope, amplitude).unwrap()
}

fn clock_at(sample_rate: u32, ticks: u64) -> Arc<RenderClock> {
    let clock = Arc::new(RenderClock::new(sample_rate).unwrap());
    for _ in 0..ticks {
        clock.advance();
    }
    clock
}

#[test]
fn test_voice_is_silent_until_attacked() {
    let clock = clock_at(1000, 0);
    let voice = gain_template(Envelope::asr(1.0, 0.01, 0.01).unwrap(), 0.5).spawn(clock);
    for i in 0..50 {
        assert_eq!(voice.stream(i as f64 / 1000.0), 0.0);
    }
    assert!(!voice.finished());
}

#[test]
fn test_attack_uses_clock_time() {
    let clock = clock_at(1000, 100);
    let voice = gain_template(Envelope::asr(1.0, 0.01, 0.01).unwrap(), 0.5).spawn(clock);
    voice.trigger_attack(330.0);

    assert_eq!(voice.frequency(), 330.0);
    assert_eq!(voice.envelope().attack_time(), Some(0.1));
    // Fully attacked and scaled by the base amplitude
    assert!((voice.stream(0.2) - 0.5).abs() < EPS);
}

#[test]
fn test_sample_is_amplitude_times_signal() {
    let clock = clock_at(1000, 0);
    let template =
        VoiceTemplate::from_waveform(Waveform::Sine, Envelope::asr(1.0, 0.01, 0.1).unwrap(), 0.25)
            .unwrap();
    let voice = template.spawn(clock);
    voice.trigger_attack(2.0);

    let t = 1.125;
    let expected = 0.25 * Waveform::Sine.evaluate(1.0, 2.0, t);
    assert!((voice.stream(t) - expected).abs() < EPS);
}

#[test]
fn test_finished_latches() {
    let clock = clock_at(1000, 0);
    let voice = gain_template(Envelope::ad(1.0, 0.01, 0.01).unwrap(), 1.0).spawn(clock);
    voice.trigger_attack(440.0);

    // Silent onset sample does not count
    assert_eq!(voice.stream(0.0), 0.0);
    assert!(!voice.finished());

    assert!(voice.stream(0.005) > 0.0);
    assert!(!voice.finished());

    assert_eq!(voice.stream(0.03), 0.0);
    assert!(voice.finished());

    // Rendering an earlier time again does not revive it
    assert!(voice.stream(0.005) > 0.0);
    assert!(voice.finished());
}

#[test]
fn test_reattack_clears_finished() {
    let clock = clock_at(1000, 0);
    let voice = gain_template(Envelope::ad(1.0, 0.01, 0.01).unwrap(), 1.0).spawn(clock);
    voice.trigger_attack(440.0);
    voice.stream(0.05);
    assert!(voice.finished());

    voice.trigger_attack(440.0);
    assert!(!voice.finished());
}

#[test]
fn test_envelope_finished_follows_clock_not_render_time() {
    let clock = clock_at(1000, 0);
    let voice = gain_template(Envelope::ad(1.0, 0.01, 0.01).unwrap(), 1.0).spawn(clock.clone());
    voice.trigger_attack(440.0);

    voice.stream(1.0);
    assert!(!voice.envelope_finished());

    for _ in 0..25 {
        clock.advance();
    }
    assert!(voice.envelope_finished());
}

#[test]
fn test_voices_from_one_template_are_independent() {
    let clock = clock_at(1000, 0);
    let template = gain_template(Envelope::asr(1.0, 0.01, 0.01).unwrap(), 1.0);
    let a = template.spawn(clock.clone());
    let b = template.spawn(clock);

    a.trigger_attack(440.0);
    assert!(a.stream(0.5) > 0.0);
    assert_eq!(b.stream(0.5), 0.0);
    assert!(!template.envelope().started());
}

#[test]
fn test_release_starts_release_phase() {
    let clock = clock_at(1000, 0);
    let voice = gain_template(Envelope::asr(1.0, 0.01, 0.02).unwrap(), 1.0).spawn(clock.clone());
    voice.trigger_attack(440.0);
    for _ in 0..100 {
        clock.advance();
    }
    voice.trigger_release();

    assert_eq!(voice.envelope().release_time(), Some(0.1));
    assert!((voice.stream(0.11) - 0.5).abs() < EPS);
    assert_eq!(voice.stream(0.2), 0.0);
}

#[test]
fn test_attack_release_helper_releases() {
    let clock = clock_at(1000, 0);
    let voice = gain_template(Envelope::asr(1.0, 0.01, 0.02).unwrap(), 1.0).spawn(clock);
    voice.trigger_attack_release(220.0, Duration::from_millis(1));
    let env = voice.envelope();
    assert!(env.started());
    assert!(env.released());
}

#[test]
fn test_template_amplitude_validation() {
    let template = gain_template(Envelope::asr(1.0, 0.01, 0.02).unwrap(), 1.0);
    assert!(matches!(
        template.with_amplitude(-1.0),
        Err(SynthError::InvalidAmplitude { .. })
    ));
    assert_eq!(template.with_amplitude(0.05).unwrap().amplitude(), 0.05);
}
