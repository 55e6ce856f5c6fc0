// src/data_input/sim_data.rs

/// Signal names looked up in simulation output files.
pub const KEY_TIME: &str = "time";
pub const KEY_OMEGA_R: &str = "omega_r";
pub const KEY_OMEGA_R_ALIAS: &str = "rotor_speed";
pub const KEY_HARDWARE_ISR: &str = "hardware_ISR";
pub const KEY_SOFTWARE_ISR: &str = "software_ISR";
pub const KEY_OMEGA_SW: &str = "omega_sw";
pub const KEY_PHASE_CURRENT: &str = "i_a";
pub const KEY_BACK_EMF: &str = "e_a";

/// Flattened signals of one simulation run, all the same length as `time`.
#[derive(Debug, Default, Clone)]
pub struct SimulationData {
    pub time: Vec<f64>,                 // Sample time (s).
    pub omega_r: Vec<f64>,              // Ground-truth electrical rotor speed (rad/s).
    pub hardware_isr: Vec<f64>,         // Hardware Hall interrupt indicator.
    pub software_isr: Option<Vec<f64>>, // Software-timed interrupt indicator.
    pub omega_sw: Option<Vec<f64>>,     // Speed estimate logged by the controller model.
    pub i_a: Option<Vec<f64>>,          // Phase A current (A).
    pub e_a: Option<Vec<f64>>,          // Phase A back-EMF (V).
}

impl SimulationData {
    /// Builds a record and truncates every signal to the shortest length, so
    /// that indices valid for `time` are valid for every signal.
    pub fn aligned(
        time: Vec<f64>,
        omega_r: Vec<f64>,
        hardware_isr: Vec<f64>,
        software_isr: Option<Vec<f64>>,
        omega_sw: Option<Vec<f64>>,
        i_a: Option<Vec<f64>>,
        e_a: Option<Vec<f64>>,
    ) -> Self {
        let mut data = Self {
            time,
            omega_r,
            hardware_isr,
            software_isr,
            omega_sw,
            i_a,
            e_a,
        };
        data.truncate_to_shortest();
        data
    }

    fn truncate_to_shortest(&mut self) {
        let optional_lens = [&self.software_isr, &self.omega_sw, &self.i_a, &self.e_a]
            .into_iter()
            .flatten()
            .map(Vec::len);
        let n = [self.time.len(), self.omega_r.len(), self.hardware_isr.len()]
            .into_iter()
            .chain(optional_lens)
            .min()
            .unwrap_or(0);

        if n < self.time.len() || n < self.omega_r.len() || n < self.hardware_isr.len() {
            println!(
                "  Warning: signal lengths differ (time={}, omega_r={}, hardware_ISR={}); truncating to {}.",
                self.time.len(),
                self.omega_r.len(),
                self.hardware_isr.len(),
                n
            );
        }

        self.time.truncate(n);
        self.omega_r.truncate(n);
        self.hardware_isr.truncate(n);
        for signal in [&mut self.software_isr, &mut self.omega_sw, &mut self.i_a, &mut self.e_a]
            .into_iter()
            .flatten()
        {
            signal.truncate(n);
        }
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Time span covered by the trace, if any samples exist.
    pub fn time_range(&self) -> Option<(f64, f64)> {
        Some((*self.time.first()?, *self.time.last()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aligned_truncates_every_signal() {
        let data = SimulationData::aligned(
            vec![0.0, 1.0, 2.0, 3.0],
            vec![5.0, 5.0, 5.0],
            vec![0.0, 1.0, 0.0, 1.0, 0.0],
            Some(vec![0.0; 10]),
            None,
            Some(vec![1.0, 2.0]),
            None,
        );
        assert_eq!(data.len(), 2);
        assert_eq!(data.omega_r.len(), 2);
        assert_eq!(data.hardware_isr.len(), 2);
        assert_eq!(data.software_isr.as_ref().map(Vec::len), Some(2));
        assert_eq!(data.i_a, Some(vec![1.0, 2.0]));
        assert_eq!(data.time_range(), Some((0.0, 1.0)));
    }

    #[test]
    fn test_empty_record() {
        let data = SimulationData::default();
        assert!(data.is_empty());
        assert!(data.time_range().is_none());
    }
}
