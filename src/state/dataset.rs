use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::processing::angle::{constrain_angle, unwrap_sequence};

/// One measurement sample in plot space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub x: f64,
    pub y: f64,
}

impl Sample {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// What a graph view displays. Exactly one is active per view.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlotType {
    #[default]
    Time,
    FftAmplitude,
    FftPhase,
    FftPhaseUnwrapped,
    Oscilloscope1,
    Oscilloscope2,
}

impl PlotType {
    pub const ALL: [PlotType; 6] = [
        PlotType::Time,
        PlotType::FftAmplitude,
        PlotType::FftPhase,
        PlotType::FftPhaseUnwrapped,
        PlotType::Oscilloscope1,
        PlotType::Oscilloscope2,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            PlotType::Time => "Time",
            PlotType::FftAmplitude => "FFT Amplitude",
            PlotType::FftPhase => "FFT Phase",
            PlotType::FftPhaseUnwrapped => "FFT Phase (unwrapped)",
            PlotType::Oscilloscope1 => "Oscilloscope CH1",
            PlotType::Oscilloscope2 => "Oscilloscope CH2",
        }
    }

    /// (x title, y title) for this view.
    pub fn axis_titles(&self) -> (&'static str, &'static str) {
        match self {
            PlotType::Time => ("Time", "Amplitude"),
            PlotType::FftAmplitude => ("Frequency", "Amplitude"),
            PlotType::FftPhase => ("Frequency", "Phase (rad)"),
            PlotType::FftPhaseUnwrapped => ("Time", "Phase (rad, unwrapped)"),
            PlotType::Oscilloscope1 => ("Time", "Channel 1 (V)"),
            PlotType::Oscilloscope2 => ("Time", "Channel 2 (V)"),
        }
    }

    pub fn is_fft(&self) -> bool {
        matches!(
            self,
            PlotType::FftAmplitude | PlotType::FftPhase | PlotType::FftPhaseUnwrapped
        )
    }

    pub fn needs_unwrap(&self) -> bool {
        *self == PlotType::FftPhaseUnwrapped
    }

    /// Whether data of type `other` can be shown in this view as is.
    pub fn is_compatible(&self, other: PlotType) -> bool {
        let phase = |t: PlotType| matches!(t, PlotType::FftPhase | PlotType::FftPhaseUnwrapped);
        *self == other || (phase(*self) && phase(other))
    }

    /// Map raw dataset samples to the values drawn for this view.
    ///
    /// Unwrapping always runs over the full sequence; it is not incremental.
    pub fn transform(&self, samples: &[Sample]) -> Vec<Sample> {
        match self {
            PlotType::Time | PlotType::Oscilloscope1 | PlotType::Oscilloscope2 => samples.to_vec(),
            PlotType::FftAmplitude => samples
                .iter()
                .map(|s| Sample::new(s.x, s.y.abs()))
                .collect(),
            PlotType::FftPhase => samples
                .iter()
                .map(|s| Sample::new(s.x, constrain_angle(s.y)))
                .collect(),
            PlotType::FftPhaseUnwrapped => {
                let raw: Vec<f64> = samples.iter().map(|s| s.y).collect();
                samples
                    .iter()
                    .zip(unwrap_sequence(&raw))
                    .map(|(s, y)| Sample::new(s.x, y))
                    .collect()
            }
        }
    }
}

/// Stroke widths offered for lines and markers.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineWidth {
    #[default]
    Normal,
    Large,
    Larger,
}

impl LineWidth {
    pub const ALL: [LineWidth; 3] = [LineWidth::Normal, LineWidth::Large, LineWidth::Larger];

    pub fn pixels(&self) -> f32 {
        match self {
            LineWidth::Normal => 1.0,
            LineWidth::Large => 2.0,
            LineWidth::Larger => 3.0,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LineWidth::Normal => "Normal",
            LineWidth::Large => "Large",
            LineWidth::Larger => "Larger",
        }
    }
}

/// A named measurement owned by the acquisition side. The graph only reads it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    pub uid: Uuid,
    pub label: String,
    pub plot_type: PlotType,
    samples: Vec<Sample>,
}

impl Dataset {
    pub fn new(label: impl Into<String>, plot_type: PlotType, samples: Vec<Sample>) -> Self {
        Self {
            uid: Uuid::new_v4(),
            label: label.into(),
            plot_type,
            samples,
        }
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Replace the sample data in place, keeping the identity.
    pub fn set_samples(&mut self, samples: Vec<Sample>) {
        self.samples = samples;
    }

    pub fn point_count(&self) -> usize {
        self.samples.len()
    }
}

/// Read access to the datasets the acquisition layer owns.
pub trait DatasetStore {
    fn get_dataset(&self, uid: Uuid) -> Option<&Dataset>;

    /// Resolve an application-level item index to a dataset uid.
    fn uid_for_item(&self, item: usize) -> Option<Uuid>;

    fn item_count(&self) -> usize;
}

/// Insertion-ordered in-memory store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryStore {
    datasets: Vec<Dataset>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a dataset, replacing any stored dataset with the same uid.
    pub fn insert(&mut self, dataset: Dataset) -> Uuid {
        let uid = dataset.uid;
        match self.datasets.iter_mut().find(|d| d.uid == uid) {
            Some(existing) => *existing = dataset,
            None => self.datasets.push(dataset),
        }
        uid
    }

    pub fn get_mut(&mut self, uid: Uuid) -> Option<&mut Dataset> {
        self.datasets.iter_mut().find(|d| d.uid == uid)
    }

    pub fn remove(&mut self, uid: Uuid) -> Option<Dataset> {
        let pos = self.datasets.iter().position(|d| d.uid == uid)?;
        Some(self.datasets.remove(pos))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Dataset> {
        self.datasets.iter()
    }
}

impl DatasetStore for MemoryStore {
    fn get_dataset(&self, uid: Uuid) -> Option<&Dataset> {
        self.datasets.iter().find(|d| d.uid == uid)
    }

    fn uid_for_item(&self, item: usize) -> Option<Uuid> {
        self.datasets.get(item).map(|d| d.uid)
    }

    fn item_count(&self) -> usize {
        self.datasets.len()
    }
}
