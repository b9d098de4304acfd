//! Synthetic instrument feeding the graph in the standalone binary.

use std::collections::VecDeque;
use std::f64::consts::PI;

use rustfft::num_complex::Complex;
use rustfft::FftPlanner;
use uuid::Uuid;

use crate::state::dataset::{Dataset, MemoryStore, PlotType, Sample};

const SAMPLE_RATE_HZ: f64 = 1000.0;
const WINDOW_LEN: usize = 512;

/// Hann weight for sample `n` of a `len` long window.
fn hann(n: usize, len: usize) -> f64 {
    0.5 - 0.5 * (2.0 * PI * n as f64 / len as f64).cos()
}

/// One-sided amplitude and phase spectra of `samples`, which must be evenly
/// spaced in x. Returns `None` for fewer than two samples.
pub fn spectrum(samples: &[Sample]) -> Option<(Vec<Sample>, Vec<Sample>)> {
    let len = samples.len();
    if len < 2 {
        return None;
    }
    let dt = (samples[len - 1].x - samples[0].x) / (len - 1) as f64;
    if !(dt > 0.0) {
        return None;
    }

    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(len);
    let mut data: Vec<Complex<f64>> = samples
        .iter()
        .enumerate()
        .map(|(i, s)| Complex::new(s.y * hann(i, len), 0.0))
        .collect();
    fft.process(&mut data);

    let half = len / 2;
    let scale = 2.0 / len as f64;
    let bin_hz = 1.0 / (dt * len as f64);
    let (amp, phase) = data
        .iter()
        .take(half)
        .enumerate()
        .map(|(k, c)| {
            let f = k as f64 * bin_hz;
            (Sample::new(f, c.norm() * scale), Sample::new(f, c.arg()))
        })
        .unzip();
    Some((amp, phase))
}

/// Two-tone test signal with a slowly drifting second channel.
pub struct DemoSource {
    tick: u64,
    time: VecDeque<Sample>,
    live: Dataset,
    fft_amplitude: Uuid,
    fft_phase: Uuid,
    channel1: Uuid,
    channel2: Uuid,
}

impl DemoSource {
    /// Create the source and register its stored datasets in `store`.
    pub fn new(store: &mut MemoryStore) -> Self {
        let fft_amplitude = store.insert(Dataset::new("Spectrum", PlotType::FftAmplitude, Vec::new()));
        let fft_phase = store.insert(Dataset::new("Phase", PlotType::FftPhase, Vec::new()));
        let channel1 = store.insert(Dataset::new("Scope CH1", PlotType::Oscilloscope1, Vec::new()));
        let channel2 = store.insert(Dataset::new("Scope CH2", PlotType::Oscilloscope2, Vec::new()));
        Self {
            tick: 0,
            time: VecDeque::with_capacity(WINDOW_LEN),
            live: Dataset::new("Live signal", PlotType::Time, Vec::new()),
            fft_amplitude,
            fft_phase,
            channel1,
            channel2,
        }
    }

    pub fn live(&self) -> &Dataset {
        &self.live
    }

    fn signal(t: f64) -> f64 {
        (2.0 * PI * 50.0 * t).sin() + 0.3 * (2.0 * PI * 120.0 * t + 0.7).sin()
    }

    /// Advance by `samples` samples, refresh every stored dataset and return
    /// the peak amplitude of the current window.
    pub fn advance(&mut self, store: &mut MemoryStore, samples: usize) -> f64 {
        for _ in 0..samples {
            let t = self.tick as f64 / SAMPLE_RATE_HZ;
            if self.time.len() == WINDOW_LEN {
                self.time.pop_front();
            }
            self.time.push_back(Sample::new(t, Self::signal(t)));
            self.tick += 1;
        }
        let window: Vec<Sample> = self.time.iter().copied().collect();

        if let Some((amp, phase)) = spectrum(&window) {
            if let Some(d) = store.get_mut(self.fft_amplitude) {
                d.set_samples(amp);
            }
            if let Some(d) = store.get_mut(self.fft_phase) {
                d.set_samples(phase);
            }
        }

        let t0 = window.first().map_or(0.0, |s| s.x);
        let drift = (self.tick as f64 / 5000.0).sin();
        if let Some(d) = store.get_mut(self.channel1) {
            d.set_samples(window.iter().map(|s| Sample::new(s.x - t0, s.y)).collect());
        }
        if let Some(d) = store.get_mut(self.channel2) {
            let ch2 = window
                .iter()
                .map(|s| Sample::new(s.x - t0, 0.5 * s.y.signum() + drift))
                .collect();
            d.set_samples(ch2);
        }

        let peak = window.iter().fold(0.0f64, |m, s| m.max(s.y.abs()));
        self.live.set_samples(window);
        peak
    }
}
