use std::path::Path;

use serde::Deserialize;

use crate::{
    core::FrameIndex,
    error::{TrajplotError, TrajplotResult},
};

/// One recorded position, one animation frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sample {
    pub time: f64,
    pub x: f64,
    pub y: f64,
}

/// The full recorded sequence, in file order. Loaded once, immutable after.
#[derive(Clone, Debug)]
pub struct Trajectory {
    samples: Vec<Sample>,
}

/// Raw CSV row. Files written by the radar simulator carry `target_id`,
/// `vx` and `vy` next to the three columns we replay; serde drops anything
/// else unnamed.
#[derive(Deserialize)]
struct Row {
    time: f64,
    x: f64,
    y: f64,
    target_id: Option<u64>,
}

impl Trajectory {
    pub fn new(samples: Vec<Sample>) -> TrajplotResult<Self> {
        if samples.is_empty() {
            return Err(TrajplotError::data("trajectory contains no samples"));
        }
        Ok(Self { samples })
    }

    #[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>, target: Option<u64>) -> TrajplotResult<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|e| {
            TrajplotError::data(format!("failed to open '{}': {e}", path.display()))
        })?;
        let traj = Self::from_csv_reader(std::io::BufReader::new(file), target)?;
        tracing::info!(samples = traj.len(), "loaded trajectory");
        Ok(traj)
    }

    /// Read `time,x,y` rows from a delimited table with a header row.
    /// `target` keeps only rows with that `target_id` when the column exists.
    pub fn from_csv_reader<R: std::io::Read>(
        reader: R,
        target: Option<u64>,
    ) -> TrajplotResult<Self> {
        let mut samples = Vec::new();
        for rec in csv::Reader::from_reader(reader).deserialize() {
            let row: Row = rec.map_err(|e| TrajplotError::data(format!("bad csv row: {e}")))?;
            if let (Some(want), Some(id)) = (target, row.target_id)
                && want != id
            {
                continue;
            }
            samples.push(Sample {
                time: row.time,
                x: row.x,
                y: row.y,
            });
        }
        Self::new(samples)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Record for frame `i`. The driver only supplies valid indices; an
    /// out-of-range index is a caller bug surfaced as an error.
    pub fn get(&self, frame: FrameIndex) -> TrajplotResult<Sample> {
        self.samples
            .get(frame.0 as usize)
            .copied()
            .ok_or_else(|| {
                TrajplotError::validation(format!(
                    "frame {} out of range (trajectory has {} samples)",
                    frame.0,
                    self.samples.len()
                ))
            })
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn last_time(&self) -> f64 {
        self.samples.last().map(|s| s.time).unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_minimal_table() {
        let csv = "time,x,y\n0.0,0.0,0.0\n1.0,10.0,0.0\n2.0,10.0,10.0\n";
        let traj = Trajectory::from_csv_reader(csv.as_bytes(), None).unwrap();
        assert_eq!(traj.len(), 3);
        assert_eq!(
            traj.get(FrameIndex(2)).unwrap(),
            Sample {
                time: 2.0,
                x: 10.0,
                y: 10.0
            }
        );
    }

    #[test]
    fn ignores_extra_columns() {
        let csv = "time,target_id,x,y,vx,vy\n0.1,0,1.5,2.5,5.0,5.0\n";
        let traj = Trajectory::from_csv_reader(csv.as_bytes(), None).unwrap();
        assert_eq!(traj.len(), 1);
        assert_eq!(traj.get(FrameIndex(0)).unwrap().x, 1.5);
    }

    #[test]
    fn target_filter_keeps_one_id() {
        let csv = "time,target_id,x,y\n0.0,0,1.0,1.0\n0.0,1,9.0,9.0\n0.1,0,2.0,2.0\n";
        let traj = Trajectory::from_csv_reader(csv.as_bytes(), Some(0)).unwrap();
        assert_eq!(traj.len(), 2);
        assert_eq!(traj.get(FrameIndex(1)).unwrap().x, 2.0);
    }

    #[test]
    fn empty_table_fails_fast() {
        let csv = "time,x,y\n";
        let err = Trajectory::from_csv_reader(csv.as_bytes(), None).unwrap_err();
        assert!(err.to_string().contains("no samples"));
    }

    #[test]
    fn missing_column_is_a_data_error() {
        let csv = "time,x\n0.0,1.0\n";
        assert!(Trajectory::from_csv_reader(csv.as_bytes(), None).is_err());
    }

    #[test]
    fn out_of_range_frame_is_an_error() {
        let csv = "time,x,y\n0.0,0.0,0.0\n";
        let traj = Trajectory::from_csv_reader(csv.as_bytes(), None).unwrap();
        assert!(traj.get(FrameIndex(1)).is_err());
    }
}
