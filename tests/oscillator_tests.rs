use polysynth::synth::oscillator::{Oscillator, Waveform, DEFAULT_HARMONICS};
use polysynth::synth::Streamer;
use std::f64::consts::PI;

const EPS: f64 = 1e-9;

#[test]
fn test_sine_values() {
    let osc = Oscillator::sine(0.5, 2.0);
    // Quarter, half and three-quarter period of a 2 Hz wave
    assert!((osc.stream(0.125) - 0.5).abs() < EPS);
    assert!(osc.stream(0.25).abs() < EPS);
    assert!((osc.stream(0.375) + 0.5).abs() < EPS);
}

#[test]
fn test_square_is_scaled_by_amplitude() {
    let sq = Waveform::Square;
    assert_eq!(sq.evaluate(0.3, 1.0, 0.25), 0.3);
    assert_eq!(sq.evaluate(0.3, 1.0, 0.75), -0.3);
    assert_eq!(sq.evaluate(0.0, 1.0, 0.25), 0.0);
}

#[test]
fn test_analog_square_is_odd_symmetric() {
    let sq = Waveform::AnalogSquare {
        harmonics: DEFAULT_HARMONICS,
    };
    let freq = 110.0;
    let quarter = 1.0 / (4.0 * freq);
    let high = sq.evaluate(1.0, freq, quarter);
    let low = sq.evaluate(1.0, freq, 3.0 * quarter);
    assert!(high > 0.0);
    assert!((high + low).abs() < 1e-9);
    assert!(sq.evaluate(1.0, freq, 0.0).abs() < EPS);
    assert_eq!(sq.evaluate(0.0, freq, quarter), 0.0);
}

#[test]
fn test_analog_square_single_harmonic_is_scaled_sine() {
    // With one harmonic the series is (2 / pi) * (2 / pi) * sin(wt)
    let sq = Waveform::AnalogSquare { harmonics: 1 };
    let expected = 4.0 / (PI * PI);
    assert!((sq.evaluate(1.0, 1.0, 0.25) - expected).abs() < EPS);
}

#[test]
fn test_triangle_peak_and_clamping() {
    let tri = Waveform::Triangle;
    assert!((tri.evaluate(1.0, 1.0, 0.25) - (2.0 / PI).asin()).abs() < EPS);
    assert_eq!(tri.evaluate(0.0, 1.0, 0.25), 0.0);

    // Arguments past the arcsine domain clip to its edge
    let loud = tri.evaluate(5.0, 1.0, 0.25);
    assert!(loud.is_finite());
    assert!((loud - PI / 2.0).abs() < EPS);
}

#[test]
fn test_sawtooth_ramp() {
    let saw = Oscillator::sawtooth(1.0, 1.0);
    assert!((saw.stream(0.0) + 1.0).abs() < EPS);
    assert!(saw.stream(0.5).abs() < EPS);
    assert!((saw.stream(0.75) - 0.5).abs() < EPS);
    // Wraps every period
    assert!((saw.stream(1.5) - saw.stream(0.5)).abs() < EPS);
}

#[test]
fn test_sawtooth_zero_frequency_is_silent() {
    assert_eq!(Waveform::Sawtooth.evaluate(1.0, 0.0, 0.3), 0.0);
}

#[test]
fn test_analog_sawtooth() {
    let saw = Waveform::AnalogSawtooth { harmonics: 1 };
    assert!((saw.evaluate(1.0, 1.0, 0.25) - 2.0 / PI).abs() < EPS);
    let saw = Waveform::AnalogSawtooth {
        harmonics: DEFAULT_HARMONICS,
    };
    assert!(saw.evaluate(1.0, 220.0, 0.0).abs() < EPS);
    assert!(saw.evaluate(1.0, 220.0, 0.001).abs() < 1.5);
}

#[test]
fn test_seeded_noise_is_reproducible_and_bounded() {
    let a = Oscillator::noise_seeded(0.25, 42);
    let b = Oscillator::noise_seeded(0.25, 42);
    let mut any_nonzero = false;
    for i in 0..1000 {
        let t = i as f64 / 44_100.0;
        let x = a.stream(t);
        assert_eq!(x, b.stream(t));
        assert!((-0.25..=0.25).contains(&x));
        any_nonzero |= x != 0.0;
    }
    assert!(any_nonzero);
}

#[test]
fn test_silent_noise() {
    let noise = Oscillator::noise_seeded(0.0, 7);
    for i in 0..100 {
        assert_eq!(noise.stream(i as f64), 0.0);
    }
}

#[test]
fn test_params_can_change_while_shared() {
    let osc = std::sync::Arc::new(Oscillator::sine(1.0, 1.0));
    osc.set_amplitude(0.5);
    osc.set_frequency(2.0);
    assert_eq!(osc.amplitude(), 0.5);
    assert_eq!(osc.frequency(), 2.0);
    assert!((osc.stream(0.125) - 0.5).abs() < EPS);
}
